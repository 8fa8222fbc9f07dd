use super::domain::{ApplicationStatus, HistoryStatus};

/// Reduce a canonical status to the coarse status stored in the audit trail.
pub const fn history_status_for(status: ApplicationStatus) -> HistoryStatus {
    match status {
        ApplicationStatus::Interested | ApplicationStatus::Applied => HistoryStatus::Applied,
        ApplicationStatus::PhoneScreening
        | ApplicationStatus::InterviewStage
        | ApplicationStatus::FinalInterviewStage => HistoryStatus::Interviewing,
        ApplicationStatus::OfferExtended | ApplicationStatus::Negotiation => {
            HistoryStatus::Offered
        }
        ApplicationStatus::OfferAccepted => HistoryStatus::Hired,
        ApplicationStatus::Rejected => HistoryStatus::Rejected,
    }
}

/// Same reduction for a raw status label, e.g. one read back from storage.
///
/// Labels outside the canonical set fall back to `APPLIED`; an audit mapping gap never
/// blocks the write path.
pub fn history_status_for_label(label: &str) -> HistoryStatus {
    ApplicationStatus::from_label(label)
        .map(history_status_for)
        .unwrap_or(HistoryStatus::Applied)
}

impl From<ApplicationStatus> for HistoryStatus {
    fn from(status: ApplicationStatus) -> Self {
        history_status_for(status)
    }
}
