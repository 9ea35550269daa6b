use super::{
    rank::RankRecord,
    role::{PerRole, Role},
    stats::{PlayerStats, StatsRecord},
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RosterResult {
    pub ranks: Vec<RankRecord>,
    pub stats: PerRole<Vec<StatsRecord>>,
}

impl RosterResult {
    pub fn push_rank(&mut self, record: RankRecord) {
        self.ranks.push(record);
    }

    pub fn push_stats(&mut self, player: &PlayerStats) {
        for (role, record) in player.records() {
            self.stats.get_mut(role).push(record);
        }
    }

    pub fn stats_for(&self, role: Role) -> &[StatsRecord] {
        self.stats.get(role)
    }
}
