use std::fmt::Display;

/// Player identifier as used in API path segments (`Name-1234`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerTag(String);

const RAW_SEPARATOR: char = '#';
const PATH_SEPARATOR: char = '-';

impl PlayerTag {
    /// Rewrites the battletag separator so the tag can be used in a url path.
    /// Every `#` becomes `-`, nothing else is touched.
    pub fn normalize(raw: &str) -> Self {
        PlayerTag(raw.replace(RAW_SEPARATOR, &PATH_SEPARATOR.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn normalize_tags<S: AsRef<str>>(raw_tags: &[S]) -> Vec<PlayerTag> {
    raw_tags.iter().map(|t| PlayerTag::normalize(t.as_ref())).collect()
}

impl Display for PlayerTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlayerTag {
    fn from(value: &str) -> Self {
        PlayerTag::normalize(value)
    }
}

impl From<String> for PlayerTag {
    fn from(value: String) -> Self {
        PlayerTag::normalize(&value)
    }
}
