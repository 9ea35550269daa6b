use std::{fmt, path::PathBuf};

use chrono::Local;

use crate::{config::RunConfig, model::roster::RosterResult};

use super::{
    aggregator::RosterAggregator,
    export::{sink_for, SinkError},
    gameapi::client::{ApiClient, ClientInitError, Fetcher},
    roster_source::{SheetRoster, SourceError, TagSource},
};

/// Reads the roster, aggregates it against the api and exports the tables.
pub fn run(config: &RunConfig) -> Result<Vec<PathBuf>, RunError> {
    let client = ApiClient::new(config.client.clone())?;

    let tags = if config.tags.is_empty() {
        SheetRoster::new(&client, &config.source_url, &config.roster_column).tags()?
    } else {
        config.tags.tags()?
    };

    let result = collect(&client, config, &tags);
    let written = sink_for(&config.export).export(&result)?;
    Ok(written)
}

/// Aggregation step alone, with any fetcher.
pub fn collect<F: Fetcher>(fetcher: &F, config: &RunConfig, tags: &[String]) -> RosterResult {
    let started = Local::now();
    log::info!("Fetching {} players ({:?})", tags.len(), config.mode);

    let result = RosterAggregator::new(fetcher, config.mode).aggregate(tags);

    let elapsed = Local::now() - started;
    log::info!(
        "Done in {}.{:03}s: {} ranks, {} tank, {} damage, {} support",
        elapsed.num_seconds(),
        elapsed.num_milliseconds() % 1000,
        result.ranks.len(),
        result.stats.tank.len(),
        result.stats.damage.len(),
        result.stats.support.len()
    );
    result
}

#[derive(Debug)]
pub enum RunError {
    ClientFailed(ClientInitError),
    RosterFailed(SourceError),
    ExportFailed(SinkError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RunError::ClientFailed(err) => write!(f, "Could not set up http client: {}", err),
            RunError::RosterFailed(err) => write!(f, "Could not read roster: {}", err),
            RunError::ExportFailed(err) => write!(f, "Could not export tables: {}", err),
        }
    }
}

impl From<ClientInitError> for RunError {
    fn from(error: ClientInitError) -> Self {
        Self::ClientFailed(error)
    }
}

impl From<SourceError> for RunError {
    fn from(error: SourceError) -> Self {
        Self::RosterFailed(error)
    }
}

impl From<SinkError> for RunError {
    fn from(error: SinkError) -> Self {
        Self::ExportFailed(error)
    }
}
