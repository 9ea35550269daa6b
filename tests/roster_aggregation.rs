// tests/roster_aggregation.rs
use std::{
    collections::HashMap,
    sync::Arc,
    thread,
    time::Duration,
};

use json::JsonValue;

use owroster::model::{ids::PlayerTag, rank::RankRecord, role::Role};
use owroster::service::{
    aggregator::{FetchMode, RosterAggregator},
    gameapi::client::{Endpoint, Fetcher, RequestError},
};

/// Serves canned payloads, optionally slowing some tags down.
#[derive(Default)]
struct FixtureFetcher {
    payloads: HashMap<(String, Endpoint), JsonValue>,
    delays: HashMap<String, Duration>,
}

impl FixtureFetcher {
    fn with(mut self, tag: &str, endpoint: Endpoint, payload: &str) -> Self {
        self.payloads
            .insert((tag.to_string(), endpoint), json::parse(payload).unwrap());
        self
    }

    fn delay(mut self, tag: &str, millis: u64) -> Self {
        self.delays.insert(tag.to_string(), Duration::from_millis(millis));
        self
    }
}

impl Fetcher for FixtureFetcher {
    fn request(&self, tag: &PlayerTag, endpoint: Endpoint) -> Result<Arc<JsonValue>, RequestError> {
        if let Some(delay) = self.delays.get(tag.as_str()) {
            thread::sleep(*delay);
        }
        match self.payloads.get(&(tag.as_str().to_string(), endpoint)) {
            Some(json) => Ok(Arc::new(json.clone())),
            None => Err(RequestError::InvalidResponse(format!("{}/{}", tag, endpoint.path()), 404)),
        }
    }
}

const TANK_STATS: &str = r#"{"roles": {"tank": {"games_played": 10, "winrate": 55.0,
    "average": {"eliminations": 12, "damage": 500, "deaths": 3}}}}"#;

#[test]
fn rank_scenario_support_only() {
    let fetcher = FixtureFetcher::default().with(
        "X-9",
        Endpoint::Summary,
        r#"{"competitive": {"pc": {"support": {"division": "Platinum", "tier": 1}}}}"#,
    );

    let result = RosterAggregator::new(&fetcher, FetchMode::Sequential).aggregate(&["X#9"]);

    assert_eq!(result.ranks.len(), 1);
    let rank = &result.ranks[0];
    assert_eq!(rank.tag.as_str(), "X-9");
    assert_eq!(rank.ranks.tank, None);
    assert_eq!(rank.ranks.damage, None);
    assert_eq!(rank.ranks.support.as_deref(), Some("Platinum1"));
}

#[test]
fn stats_scenario_tank_only() {
    let fetcher = FixtureFetcher::default().with("Y-1", Endpoint::CompetitiveStats, TANK_STATS);

    let result = RosterAggregator::new(&fetcher, FetchMode::Sequential).aggregate(&["Y#1"]);

    let tank = result.stats_for(Role::Tank);
    assert_eq!(tank.len(), 1);
    assert_eq!(tank[0].btag.as_str(), "Y-1");
    assert_eq!(tank[0].games_played, Some(10.0));
    assert_eq!(tank[0].winrate, Some(55.0));
    assert_eq!(tank[0].elims_per_10, Some(12.0));
    assert_eq!(tank[0].dmg_per_10, Some(500.0));
    assert_eq!(tank[0].death_per_10, Some(3.0));
    assert!(!tank[0].has_healing());
    assert!(result.stats_for(Role::Damage).is_empty());
    assert!(result.stats_for(Role::Support).is_empty());

    // The summary was never served, so the rank row is there but empty
    assert_eq!(result.ranks, vec![RankRecord::unranked(PlayerTag::normalize("Y#1"))]);
}

#[test]
fn order_follows_roster_even_when_first_fetch_is_slowest() {
    let fetcher = FixtureFetcher::default()
        .with("A-1", Endpoint::Summary, r#"{"competitive": {"pc": {"tank": {"division": "Gold", "tier": 3}}}}"#)
        .with("B-2", Endpoint::Summary, r#"{"competitive": {"pc": {"tank": {"division": "Silver", "tier": 2}}}}"#)
        .with("A-1", Endpoint::CompetitiveStats, TANK_STATS)
        .with("B-2", Endpoint::CompetitiveStats, TANK_STATS)
        .delay("A-1", 150);

    for mode in [FetchMode::Sequential, FetchMode::Parallel { workers: 4 }] {
        let result = RosterAggregator::new(&fetcher, mode).aggregate(&["A#1", "B#2"]);

        let ranks: Vec<_> = result
            .ranks
            .iter()
            .map(|r| (r.tag.as_str(), r.ranks.tank.as_deref()))
            .collect();
        assert_eq!(ranks, vec![("A-1", Some("Gold3")), ("B-2", Some("Silver2"))], "{mode:?}");

        let tank: Vec<_> = result.stats_for(Role::Tank).iter().map(|r| r.btag.as_str()).collect();
        assert_eq!(tank, vec!["A-1", "B-2"], "{mode:?}");
    }
}

#[test]
fn parallel_chunks_keep_order_and_duplicates() {
    let roster = ["C#3", "A#1", "B#2", "A#1", "D#4"];
    let mut fetcher = FixtureFetcher::default().delay("C-3", 80).delay("B-2", 40);
    for tag in ["A-1", "B-2", "C-3", "D-4"] {
        fetcher = fetcher.with(tag, Endpoint::CompetitiveStats, TANK_STATS);
    }

    let sequential = RosterAggregator::new(&fetcher, FetchMode::Sequential).aggregate(&roster);
    let parallel = RosterAggregator::new(&fetcher, FetchMode::Parallel { workers: 2 }).aggregate(&roster);

    assert_eq!(sequential, parallel);
    let tags: Vec<_> = parallel.ranks.iter().map(|r| r.tag.as_str()).collect();
    assert_eq!(tags, vec!["C-3", "A-1", "B-2", "A-1", "D-4"]);
    assert_eq!(parallel.stats_for(Role::Tank).len(), 5);
}

#[test]
fn missing_players_do_not_abort_the_roster() {
    let fetcher = FixtureFetcher::default()
        .with("Ok-1", Endpoint::CompetitiveStats, TANK_STATS)
        .with("Null-2", Endpoint::Summary, "null")
        .with("Null-2", Endpoint::CompetitiveStats, "null");

    let result = RosterAggregator::new(&fetcher, FetchMode::Sequential).aggregate(&["Gone#0", "Null#2", "Ok#1"]);

    assert_eq!(result.ranks.len(), 3);
    for rank in &result.ranks {
        assert_eq!(*rank, RankRecord::unranked(rank.tag.clone()));
    }
    let tank: Vec<_> = result.stats_for(Role::Tank).iter().map(|r| r.btag.as_str()).collect();
    assert_eq!(tank, vec!["Ok-1"]);
}

#[test]
fn every_role_lands_in_its_own_table() {
    let fetcher = FixtureFetcher::default().with(
        "Flex-5",
        Endpoint::CompetitiveStats,
        r#"{"roles": {
            "tank": {"games_played": 3, "winrate": 66.67, "average": {"eliminations": 20, "damage": 9000, "deaths": 4}},
            "damage": {"games_played": 5, "winrate": 40, "average": {"eliminations": 25, "damage": 11000, "deaths": 6}},
            "support": {"games_played": 2, "winrate": 50, "average": {"eliminations": 10, "damage": 3000, "deaths": 5, "healing": 8500}}
        }}"#,
    );

    let result = RosterAggregator::new(&fetcher, FetchMode::Sequential).aggregate(&["Flex#5"]);

    for role in Role::ALL {
        let rows = result.stats_for(role);
        assert_eq!(rows.len(), 1, "{role}");
        assert_eq!(rows[0].has_healing(), role == Role::Support, "{role}");
    }
    assert_eq!(result.stats_for(Role::Support)[0].healing_per_10, Some(Some(8500.0)));
    assert_eq!(result.stats_for(Role::Damage)[0].games_played, Some(5.0));
}
