/// Outcome definitions for processed posts
use std::fmt;

/// Represents what happened to a single discovered post during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostOutcome {
    /// Every requested format was written and the post was logged
    Downloaded,

    /// The post was already present in the download log
    Skipped,

    /// Fetching, extraction, localization, or at least one format failed
    Failed,
}

impl PostOutcome {
    /// Returns true if the post was written in every requested format
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Downloaded)
    }

    /// Returns true if the post ended in an error
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed)
    }

    /// Returns the lowercase label used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Downloaded => "downloaded",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PostOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
