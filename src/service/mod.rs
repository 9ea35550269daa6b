pub mod aggregator;
pub mod export;
pub mod gameapi;
pub mod roster_source;
pub mod runner;
