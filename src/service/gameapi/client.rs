use std::{
    collections::{hash_map::Entry, HashMap},
    fmt,
    fs::{create_dir_all, File},
    io::{self, Read, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    time::Duration,
};

use json::JsonValue;
use reqwest::blocking::Client;

use crate::model::ids::PlayerTag;

pub const DEFAULT_BASE_URL: &str = "https://overfast-api.tekrop.fr/players";

/// Anything that can hand out the raw payload of a player endpoint.
pub trait Fetcher: Sync {
    fn request(&self, tag: &PlayerTag, endpoint: Endpoint) -> Result<Arc<JsonValue>, RequestError>;
}

#[derive(Debug, PartialEq, Hash, Eq, Clone, Copy)]
pub enum Endpoint {
    /// Player summary, holds the competitive ranks.
    Summary,
    /// Competitive stats summary on pc.
    CompetitiveStats,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Summary => "summary",
            Endpoint::CompetitiveStats => "stats/summary?gamemode=competitive&platform=pc",
        }
    }

    fn file_stem(&self) -> &'static str {
        match self {
            Endpoint::Summary => "summary",
            Endpoint::CompetitiveStats => "stats",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    pub base_url: String,
    pub timeout: Option<Duration>,
    /// Read payloads from `<dir>/<tag>_<endpoint>.json` instead of the network.
    pub load_local: Option<PathBuf>,
    /// Dump every fetched payload into this directory.
    pub store_responses: Option<PathBuf>,
}

pub struct ApiClient {
    client: Client,
    base_url: String,
    load_local: Option<PathBuf>,
    store_responses: Option<PathBuf>,
    cache: Mutex<HashMap<(PlayerTag, Endpoint), Arc<JsonValue>>>,
}

impl ApiClient {
    pub fn new(options: ClientOptions) -> Result<Self, ClientInitError> {
        let mut builder = Client::builder();
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let base_url = if options.base_url.is_empty() {
            DEFAULT_BASE_URL.to_string()
        } else {
            options.base_url.trim_end_matches('/').to_string()
        };

        Ok(Self {
            client,
            base_url,
            load_local: options.load_local,
            store_responses: options.store_responses,
            cache: Mutex::new(HashMap::new()),
        })
    }

    pub fn url(&self, tag: &PlayerTag, endpoint: Endpoint) -> String {
        format!("{}/{}/{}", self.base_url, tag, endpoint.path())
    }

    /// Plain GET returning the body, used for the roster sheet.
    pub fn get_text(&self, url: &str) -> Result<String, RequestError> {
        let response = self.client.get(url).send()?;
        if !response.status().is_success() {
            return Err(RequestError::InvalidResponse(url.to_string(), response.status().as_u16()));
        }
        Ok(response.text()?)
    }

    fn fetch_remote(&self, tag: &PlayerTag, endpoint: Endpoint) -> Result<JsonValue, RequestError> {
        let url = self.url(tag, endpoint);
        log::debug!("GET {}", url);

        let text = self.get_text(&url)?;
        let json = json::parse(text.as_str())?;

        if let Some(dir) = &self.store_responses {
            if let Err(err) = store_response(dir, tag, endpoint, &json) {
                log::warn!("Could not store response for {}: {}", tag, err);
            }
        }

        Ok(json)
    }

    fn fetch_local(&self, dir: &Path, tag: &PlayerTag, endpoint: Endpoint) -> Result<JsonValue, RequestError> {
        let mut file = File::open(local_path(dir, tag, endpoint))?;
        let mut buf = String::new();
        file.read_to_string(&mut buf)?;
        Ok(json::parse(buf.as_str())?)
    }
}

impl Fetcher for ApiClient {
    fn request(&self, tag: &PlayerTag, endpoint: Endpoint) -> Result<Arc<JsonValue>, RequestError> {
        let key = (tag.clone(), endpoint);
        if let Some(json) = self.cache.lock().map_err(|_| RequestError::CachePoisoned)?.get(&key) {
            return Ok(Arc::clone(json));
        }

        // Fetch without holding the lock so parallel runs don't serialize on it
        let json = match &self.load_local {
            Some(dir) => self.fetch_local(dir, tag, endpoint)?,
            None => self.fetch_remote(tag, endpoint)?,
        };

        let mut cache = self.cache.lock().map_err(|_| RequestError::CachePoisoned)?;
        let json = match cache.entry(key) {
            Entry::Occupied(oe) => Arc::clone(oe.get()),
            Entry::Vacant(ve) => Arc::clone(ve.insert(Arc::new(json))),
        };
        Ok(json)
    }
}

fn local_path(dir: &Path, tag: &PlayerTag, endpoint: Endpoint) -> PathBuf {
    dir.join(format!("{}_{}.json", tag, endpoint.file_stem()))
}

fn store_response(dir: &Path, tag: &PlayerTag, endpoint: Endpoint, json: &JsonValue) -> io::Result<()> {
    create_dir_all(dir)?;
    let mut file = File::create(local_path(dir, tag, endpoint))?;
    file.write_all(json.pretty(2).as_bytes())
}

#[derive(Debug)]
pub enum ClientInitError {
    ClientError(reqwest::Error),
}

impl fmt::Display for ClientInitError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ClientInitError::ClientError(err) => write!(f, "Client error: {}", err),
        }
    }
}

impl From<reqwest::Error> for ClientInitError {
    fn from(error: reqwest::Error) -> Self {
        Self::ClientError(error)
    }
}

#[derive(Debug)]
pub enum RequestError {
    ClientFailed(reqwest::Error),
    InvalidResponse(String, u16),
    ParsingFailed(json::Error),
    LocalFileError(io::Error),
    CachePoisoned,
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RequestError::ClientFailed(err) => write!(f, "Client error: {}", err),
            RequestError::InvalidResponse(url, status) => {
                write!(f, "The server returned HTTP {} for {}", status, url)
            }
            RequestError::ParsingFailed(err) => write!(f, "Parsing error: {}", err),
            RequestError::LocalFileError(err) => write!(f, "Local file error: {}", err),
            RequestError::CachePoisoned => write!(f, "Response cache lock poisoned"),
        }
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(error: reqwest::Error) -> Self {
        RequestError::ClientFailed(error)
    }
}

impl From<json::Error> for RequestError {
    fn from(error: json::Error) -> Self {
        RequestError::ParsingFailed(error)
    }
}

impl From<io::Error> for RequestError {
    fn from(error: io::Error) -> Self {
        RequestError::LocalFileError(error)
    }
}
