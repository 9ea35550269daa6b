use std::{sync::Arc, thread};

use json::JsonValue;

use crate::model::{
    ids::{normalize_tags, PlayerTag},
    rank::RankRecord,
    roster::RosterResult,
    stats::PlayerStats,
};

use super::gameapi::{
    client::{Endpoint, Fetcher},
    parsing::{rank::parse_rank, stats::parse_player_stats},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    Sequential,
    /// Up to `workers` players are fetched at the same time.
    Parallel { workers: usize },
}

/// Runs both extractors over a whole roster.
///
/// Never fails: a player whose payload can't be fetched ends up with the same
/// empty rank record and no stats rows as a player without competitive data.
pub struct RosterAggregator<'a, F: Fetcher> {
    fetcher: &'a F,
    mode: FetchMode,
}

impl<'a, F: Fetcher> RosterAggregator<'a, F> {
    pub fn new(fetcher: &'a F, mode: FetchMode) -> Self {
        Self { fetcher, mode }
    }

    pub fn aggregate<S: AsRef<str>>(&self, raw_tags: &[S]) -> RosterResult {
        let tags = normalize_tags(raw_tags);
        let players: Vec<(RankRecord, PlayerStats)> = match self.mode {
            FetchMode::Sequential => tags.iter().map(|t| self.fetch_player(t)).collect(),
            FetchMode::Parallel { workers } => self.fetch_parallel(&tags, workers.max(1)),
        };

        let mut result = RosterResult::default();
        for (rank, stats) in players {
            result.push_rank(rank);
            result.push_stats(&stats);
        }
        result
    }

    fn fetch_parallel(&self, tags: &[PlayerTag], workers: usize) -> Vec<(RankRecord, PlayerStats)> {
        let mut players = Vec::with_capacity(tags.len());

        for chunk in tags.chunks(workers) {
            thread::scope(|scope| {
                let handles: Vec<_> = chunk
                    .iter()
                    .map(|tag| (tag, scope.spawn(move || self.fetch_player(tag))))
                    .collect();

                // Joined here so a panicking worker doesn't take the scope down with it
                for (tag, handle) in handles {
                    let player = handle.join().unwrap_or_else(|_| {
                        log::warn!("Worker for {} died, leaving player empty", tag);
                        (RankRecord::unranked(tag.clone()), PlayerStats::empty(tag.clone()))
                    });
                    players.push(player);
                }
            });
        }

        players
    }

    fn fetch_player(&self, tag: &PlayerTag) -> (RankRecord, PlayerStats) {
        let summary = self.fetch_or_null(tag, Endpoint::Summary);
        let rank = parse_rank(&summary, tag.clone());

        let stats_json = self.fetch_or_null(tag, Endpoint::CompetitiveStats);
        let stats = parse_player_stats(&stats_json, tag.clone());

        if stats.roles.iter().all(|(_, r)| r.is_none()) {
            log::debug!("{} has no competitive stats", tag);
        }
        (rank, stats)
    }

    fn fetch_or_null(&self, tag: &PlayerTag, endpoint: Endpoint) -> Arc<JsonValue> {
        match self.fetcher.request(tag, endpoint) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("Request {:?} for {} failed: {}", endpoint, tag, err);
                Arc::new(JsonValue::Null)
            }
        }
    }
}
