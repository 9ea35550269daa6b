use super::{
    ids::PlayerTag,
    role::{PerRole, Role},
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Averages {
    pub eliminations: Option<f64>,
    pub damage: Option<f64>,
    pub deaths: Option<f64>,
    pub healing: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoleStats {
    pub games_played: Option<f64>,
    pub winrate: Option<f64>,
    pub average: Averages,
}

/// Stats of one player, every role explicitly present or `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStats {
    pub tag: PlayerTag,
    pub roles: PerRole<Option<RoleStats>>,
}

impl PlayerStats {
    pub fn empty(tag: PlayerTag) -> Self {
        Self {
            tag,
            roles: PerRole::default(),
        }
    }

    pub fn records(&self) -> Vec<(Role, StatsRecord)> {
        self.roles
            .iter()
            .filter_map(|(role, stats)| stats.as_ref().map(|s| (role, StatsRecord::from_role(&self.tag, role, s))))
            .collect()
    }
}

/// Column order of a stats table. `healing_per_10` only exists for support.
pub const STATS_COLUMNS: [&str; 6] = [
    "btag",
    "games_played",
    "winrate",
    "elims_per_10",
    "dmg_per_10",
    "death_per_10",
];
pub const HEALING_COLUMN: &str = "healing_per_10";

pub fn stats_columns(role: Role) -> Vec<&'static str> {
    let mut columns = STATS_COLUMNS.to_vec();
    if role == Role::Support {
        columns.push(HEALING_COLUMN);
    }
    columns
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsRecord {
    pub btag: PlayerTag,
    pub games_played: Option<f64>,
    pub winrate: Option<f64>,
    pub elims_per_10: Option<f64>,
    pub dmg_per_10: Option<f64>,
    pub death_per_10: Option<f64>,
    /// Outer `None`: the column does not exist (tank, damage).
    pub healing_per_10: Option<Option<f64>>,
}

impl StatsRecord {
    pub fn from_role(tag: &PlayerTag, role: Role, stats: &RoleStats) -> Self {
        let mut record = Self {
            btag: tag.clone(),
            games_played: stats.games_played,
            winrate: stats.winrate,
            elims_per_10: stats.average.eliminations,
            dmg_per_10: stats.average.damage,
            death_per_10: stats.average.deaths,
            healing_per_10: None,
        };

        if role == Role::Support {
            record.healing_per_10 = Some(stats.average.healing);
        }
        record
    }

    pub fn has_healing(&self) -> bool {
        self.healing_per_10.is_some()
    }
}
