use super::{ids::PlayerTag, role::PerRole};

/// Column holding the player tag in the rank table. Must not clash with a role key.
pub const RANK_TAG_FIELD: &str = "tag";

/// Competitive rank per role, `None` when the player has no placement for it.
#[derive(Debug, Clone, PartialEq)]
pub struct RankRecord {
    pub tag: PlayerTag,
    pub ranks: PerRole<Option<String>>,
}

impl RankRecord {
    pub fn unranked(tag: PlayerTag) -> Self {
        Self {
            tag,
            ranks: PerRole::default(),
        }
    }
}
