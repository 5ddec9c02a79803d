/// Crawl phase definitions
///
/// A crawl moves `Idle → Running → {Completed, Stopped, Failed}`. Internally
/// the loop re-enters `Running` for every page and detail fetch, but callers
/// only ever observe the single `Running` phase until a terminal one is reached.
use std::fmt;

/// Why a crawl finished normally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompletionReason {
    /// The configured page cap was reached
    CapReached,

    /// The listing had no "next page" link
    NoMorePages,

    /// A listing page contained no restaurant entries
    NoEntries,
}

impl CompletionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CapReached => "cap_reached",
            Self::NoMorePages => "no_more_pages",
            Self::NoEntries => "no_entries",
        }
    }
}

/// Externally observable phase of one crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    // ===== Active Phases =====
    /// Created but not started
    Idle,

    /// Fetching listing and detail pages
    Running,

    // ===== Terminal Phases =====
    /// The loop ended on its own
    Completed(CompletionReason),

    /// The stop signal was observed at a checkpoint
    Stopped,

    /// A listing page could not be fetched
    Failed,
}

impl CrawlPhase {
    /// Returns true if this is a terminal phase
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Idle | Self::Running)
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        match (self, next) {
            (Self::Idle, Self::Running) => true,
            (Self::Running, Self::Running) => true,
            (Self::Running, next) => next.is_terminal(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed(reason) => reason.as_str(),
            Self::Stopped => "stopped",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed(reason) => write!(f, "completed ({})", reason.as_str()),
            other => f.write_str(other.as_str()),
        }
    }
}
