use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Tank,
    Damage,
    Support,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Tank, Role::Damage, Role::Support];

    pub fn key(&self) -> &'static str {
        match self {
            Role::Tank => "tank",
            Role::Damage => "damage",
            Role::Support => "support",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// One value per role, always all three slots.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PerRole<T> {
    pub tank: T,
    pub damage: T,
    pub support: T,
}

impl<T> PerRole<T> {
    pub fn from_fn<F: FnMut(Role) -> T>(mut f: F) -> Self {
        Self {
            tank: f(Role::Tank),
            damage: f(Role::Damage),
            support: f(Role::Support),
        }
    }

    pub fn get(&self, role: Role) -> &T {
        match role {
            Role::Tank => &self.tank,
            Role::Damage => &self.damage,
            Role::Support => &self.support,
        }
    }

    pub fn get_mut(&mut self, role: Role) -> &mut T {
        match role {
            Role::Tank => &mut self.tank,
            Role::Damage => &mut self.damage,
            Role::Support => &mut self.support,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, &T)> {
        Role::ALL.into_iter().map(move |r| (r, self.get(r)))
    }
}
