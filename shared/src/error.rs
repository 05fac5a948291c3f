/// Failure of one metric load. Status and transport failures are request
/// errors; everything wrong with the body is a parse error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("metric request failed: HTTP {0}")]
    Status(u16),
    #[error("metric request failed: {0}")]
    Transport(String),
    #[error("metric response could not be parsed: {0}")]
    Parse(String),
}

impl LoadError {
    pub fn is_request(&self) -> bool {
        matches!(self, LoadError::Status(_) | LoadError::Transport(_))
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, LoadError::Parse(_))
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::Parse(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown metric: {0:?}")]
pub struct UnknownMetric(pub String);
