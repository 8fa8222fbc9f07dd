use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::ApplicationStatus;

/// Whether applications in a terminal status (`REJECTED`, `OFFER_ACCEPTED`) may move again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalStatusPolicy {
    /// Any transition is allowed; rejected applications can be reopened.
    #[default]
    Reopenable,
    /// Terminal statuses are final.
    Locked,
}

impl TerminalStatusPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "reopenable" | "open" => Some(Self::Reopenable),
            "locked" | "lock" => Some(Self::Locked),
            _ => None,
        }
    }

    /// Only consulted for real changes; re-applying the current status is always a no-op.
    pub fn permits(self, current: ApplicationStatus, requested: ApplicationStatus) -> bool {
        match self {
            TerminalStatusPolicy::Reopenable => true,
            TerminalStatusPolicy::Locked => !current.is_terminal() || current == requested,
        }
    }
}

impl fmt::Display for TerminalStatusPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminalStatusPolicy::Reopenable => f.write_str("reopenable"),
            TerminalStatusPolicy::Locked => f.write_str("locked"),
        }
    }
}

/// Runtime knobs for the status engine and its HTTP surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineSettings {
    pub terminal_policy: TerminalStatusPolicy,
    /// Attach the error source chain to 500 responses. Off in production.
    pub disclose_error_details: bool,
}
