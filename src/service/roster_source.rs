use std::{fmt, fs, io};

use csv::ReaderBuilder;

use super::gameapi::client::{ApiClient, RequestError};

pub const DEFAULT_ROSTER_COLUMN: &str = "btag";

/// Ordered raw battletags. Duplicates are passed through untouched.
pub trait TagSource {
    fn tags(&self) -> Result<Vec<String>, SourceError>;
}

impl TagSource for Vec<String> {
    fn tags(&self) -> Result<Vec<String>, SourceError> {
        Ok(self.clone())
    }
}

/// Roster kept in a csv sheet, either a published spreadsheet export url or a local file.
pub struct SheetRoster<'a> {
    client: &'a ApiClient,
    source: String,
    column: String,
}

impl<'a> SheetRoster<'a> {
    pub fn new(client: &'a ApiClient, source: &str, column: &str) -> Self {
        Self {
            client,
            source: source.trim().to_string(),
            column: column.to_string(),
        }
    }

    fn is_remote(&self) -> bool {
        self.source.starts_with("http://") || self.source.starts_with("https://")
    }
}

impl TagSource for SheetRoster<'_> {
    fn tags(&self) -> Result<Vec<String>, SourceError> {
        if self.source.is_empty() {
            return Err(SourceError::NoSource);
        }

        let text = if self.is_remote() {
            self.client.get_text(&self.source)?
        } else {
            fs::read_to_string(&self.source)?
        };

        let tags = parse_roster(&text, &self.column)?;
        log::info!("Read {} tags from {}", tags.len(), self.source);
        Ok(tags)
    }
}

/// Picks the tag column out of a csv roster.
///
/// The first row is a header when one of its cells matches `column` (ignoring case),
/// otherwise the sheet has no header and tags are read from the first column.
pub fn parse_roster(text: &str, column: &str) -> Result<Vec<String>, SourceError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = reader.records();
    let first = match rows.next() {
        Some(row) => row?,
        None => return Ok(Vec::new()),
    };

    let mut tags = Vec::new();
    let index = match first.iter().position(|cell| cell.trim().eq_ignore_ascii_case(column)) {
        Some(index) => index,
        None => {
            push_cell(&mut tags, first.get(0));
            0
        }
    };

    for row in rows {
        push_cell(&mut tags, row?.get(index));
    }
    Ok(tags)
}

fn push_cell(tags: &mut Vec<String>, cell: Option<&str>) {
    if let Some(tag) = cell.map(str::trim).filter(|c| !c.is_empty()) {
        tags.push(tag.to_string());
    }
}

#[derive(Debug)]
pub enum SourceError {
    NoSource,
    DownloadFailed(RequestError),
    FileError(io::Error),
    CsvError(csv::Error),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SourceError::NoSource => write!(f, "No roster source given"),
            SourceError::DownloadFailed(err) => write!(f, "Roster download failed: {}", err),
            SourceError::FileError(err) => write!(f, "Roster file error: {}", err),
            SourceError::CsvError(err) => write!(f, "Roster is not valid csv: {}", err),
        }
    }
}

impl From<RequestError> for SourceError {
    fn from(error: RequestError) -> Self {
        Self::DownloadFailed(error)
    }
}

impl From<io::Error> for SourceError {
    fn from(error: io::Error) -> Self {
        Self::FileError(error)
    }
}

impl From<csv::Error> for SourceError {
    fn from(error: csv::Error) -> Self {
        Self::CsvError(error)
    }
}
