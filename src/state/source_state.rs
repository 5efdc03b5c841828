/// Per-source processing stages
use std::fmt;

/// Represents where a single source is in its processing cycle
///
/// The cycle is strictly linear:
/// `Init → LoadLog → Discover → Process → Summarize`, where `LoadLog` is
/// skipped when incremental mode is off. A source whose output directory
/// cannot be created goes from `Init` straight to `Summarize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceStage {
    /// Output directory prepared, nothing fetched yet
    Init,

    /// Reading the incremental download log
    LoadLog,

    /// Walking the archive listing
    Discover,

    /// Fetching and rendering discovered posts
    Process,

    /// Counts reported, source finished
    Summarize,
}

impl SourceStage {
    /// Returns true if moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: SourceStage) -> bool {
        matches!(
            (self, next),
            (Self::Init, Self::LoadLog)
                | (Self::Init, Self::Discover)
                // Output directory could not be created
                | (Self::Init, Self::Summarize)
                | (Self::LoadLog, Self::Discover)
                | (Self::Discover, Self::Process)
                // Nothing discovered: straight to the summary
                | (Self::Discover, Self::Summarize)
                | (Self::Process, Self::Summarize)
        )
    }

    /// Returns true if the source is done
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Summarize)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::LoadLog => "load_log",
            Self::Discover => "discover",
            Self::Process => "process",
            Self::Summarize => "summarize",
        }
    }
}

impl fmt::Display for SourceStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
