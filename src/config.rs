use std::{path::PathBuf, time::Duration};

use chrono::Local;
use clap::{Parser, ValueEnum};
use once_cell::sync::Lazy;

use crate::service::{
    aggregator::FetchMode,
    gameapi::client::{ClientOptions, DEFAULT_BASE_URL},
    roster_source::DEFAULT_ROSTER_COLUMN,
};

/// Used when no sequence id is given, so runs on different days don't overwrite each other.
static TODAY: Lazy<String> = Lazy::new(|| Local::now().format("%Y%m%d").to_string());

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    #[value(alias = "csv")]
    Tabular,
}

impl ExportFormat {
    pub fn ext(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Tabular => "csv",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// Cup or season number, part of every file name.
    pub sequence_id: String,
    pub out_dir: PathBuf,
    pub file_prefix: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Json,
            sequence_id: TODAY.clone(),
            out_dir: PathBuf::from("."),
            file_prefix: String::new(),
        }
    }
}

/// Everything one run needs, handed to the aggregator and sink at call time.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub source_url: String,
    pub roster_column: String,
    /// Tags given directly, take precedence over `source_url`.
    pub tags: Vec<String>,
    pub client: ClientOptions,
    pub mode: FetchMode,
    pub export: ExportOptions,
}

/// Fetch competitive ranks and role stats for a roster and export them per role
#[derive(Parser, Debug)]
#[command(name = "owroster")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Roster csv, either an http(s) url (published sheet export) or a local path
    #[arg(short = 'u', long = "source-url", default_value = "")]
    pub source_url: String,

    /// Header of the roster column holding the battletags
    #[arg(long = "column", default_value = DEFAULT_ROSTER_COLUMN)]
    pub roster_column: String,

    /// Battletag to fetch, may be repeated; replaces the roster sheet
    #[arg(short = 't', long = "tag")]
    pub tags: Vec<String>,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value_t = ExportFormat::Json)]
    pub format: ExportFormat,

    /// Cup or season number used in the output file names
    #[arg(short = 'n', long = "sequence-id", default_value = TODAY.as_str())]
    pub sequence_id: String,

    /// Directory the tables are written to
    #[arg(short = 'o', long = "out-dir", default_value = ".")]
    pub out_dir: PathBuf,

    /// Prepended to every output file name
    #[arg(long = "prefix", default_value = "")]
    pub file_prefix: String,

    /// Stats api base url
    #[arg(long = "api-base", default_value = DEFAULT_BASE_URL)]
    pub api_base: String,

    /// Request timeout in seconds, 0 disables it
    #[arg(long = "timeout", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Fetch this many players at once instead of one after another
    #[arg(short = 'p', long = "parallel")]
    pub parallel: Option<usize>,

    /// Load payloads from local JSON files in this directory instead of the api
    #[arg(short = 'l', long = "load-local")]
    pub load_local: Option<PathBuf>,

    /// Store api responses as JSON files in this directory
    #[arg(short = 's', long = "store-responses")]
    pub store_responses: Option<PathBuf>,
}

impl From<Args> for RunConfig {
    fn from(args: Args) -> Self {
        let mode = match args.parallel {
            Some(workers) if workers > 1 => FetchMode::Parallel { workers },
            _ => FetchMode::Sequential,
        };

        RunConfig {
            source_url: args.source_url,
            roster_column: args.roster_column,
            tags: args.tags,
            client: ClientOptions {
                base_url: args.api_base,
                timeout: (args.timeout_secs > 0).then(|| Duration::from_secs(args.timeout_secs)),
                load_local: args.load_local,
                store_responses: args.store_responses,
            },
            mode,
            export: ExportOptions {
                format: args.format,
                sequence_id: args.sequence_id,
                out_dir: args.out_dir,
                file_prefix: args.file_prefix,
            },
        }
    }
}
