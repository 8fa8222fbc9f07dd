use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for job applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub u64);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Numeric id of the authenticated caller, resolved upstream from the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub u64);

/// Canonical, persisted pipeline state of an application.
///
/// Variants are declared in typical pipeline progression order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    #[default]
    Interested,
    Applied,
    PhoneScreening,
    InterviewStage,
    FinalInterviewStage,
    OfferExtended,
    Negotiation,
    OfferAccepted,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 9] = [
        ApplicationStatus::Interested,
        ApplicationStatus::Applied,
        ApplicationStatus::PhoneScreening,
        ApplicationStatus::InterviewStage,
        ApplicationStatus::FinalInterviewStage,
        ApplicationStatus::OfferExtended,
        ApplicationStatus::Negotiation,
        ApplicationStatus::OfferAccepted,
        ApplicationStatus::Rejected,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Interested => "INTERESTED",
            ApplicationStatus::Applied => "APPLIED",
            ApplicationStatus::PhoneScreening => "PHONE_SCREENING",
            ApplicationStatus::InterviewStage => "INTERVIEW_STAGE",
            ApplicationStatus::FinalInterviewStage => "FINAL_INTERVIEW_STAGE",
            ApplicationStatus::OfferExtended => "OFFER_EXTENDED",
            ApplicationStatus::Negotiation => "NEGOTIATION",
            ApplicationStatus::OfferAccepted => "OFFER_ACCEPTED",
            ApplicationStatus::Rejected => "REJECTED",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.label() == label.trim())
    }

    /// Statuses that usually end the pipeline; leaving them again is governed by policy.
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            ApplicationStatus::OfferAccepted | ApplicationStatus::Rejected
        )
    }

    /// Board column a card with this status is displayed under.
    pub const fn board_column(self) -> BoardColumn {
        match self {
            ApplicationStatus::Interested => BoardColumn::Interested,
            ApplicationStatus::Applied => BoardColumn::Applied,
            ApplicationStatus::PhoneScreening
            | ApplicationStatus::InterviewStage
            | ApplicationStatus::FinalInterviewStage => BoardColumn::Interview,
            ApplicationStatus::OfferExtended | ApplicationStatus::Negotiation => {
                BoardColumn::Offer
            }
            ApplicationStatus::OfferAccepted => BoardColumn::Accepted,
            ApplicationStatus::Rejected => BoardColumn::Rejected,
        }
    }

    /// Sub-stage that resolves to this status, if one exists.
    pub const fn sub_stage(self) -> Option<SubStage> {
        match self {
            ApplicationStatus::PhoneScreening => Some(SubStage::PhoneScreening),
            ApplicationStatus::InterviewStage => Some(SubStage::InterviewStage),
            ApplicationStatus::FinalInterviewStage => Some(SubStage::FinalInterviewStage),
            ApplicationStatus::OfferExtended => Some(SubStage::OfferExtended),
            ApplicationStatus::Negotiation => Some(SubStage::Negotiation),
            _ => None,
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Coarse status recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HistoryStatus {
    Applied,
    Interviewing,
    Offered,
    Hired,
    Rejected,
}

impl HistoryStatus {
    pub const fn label(self) -> &'static str {
        match self {
            HistoryStatus::Applied => "APPLIED",
            HistoryStatus::Interviewing => "INTERVIEWING",
            HistoryStatus::Offered => "OFFERED",
            HistoryStatus::Hired => "HIRED",
            HistoryStatus::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for HistoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Kanban bucket shown to applicants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardColumn {
    Interested,
    Applied,
    Interview,
    Offer,
    Accepted,
    Rejected,
    Referrals,
}

impl BoardColumn {
    /// Display order on the board.
    pub const ALL: [BoardColumn; 7] = [
        BoardColumn::Interested,
        BoardColumn::Applied,
        BoardColumn::Interview,
        BoardColumn::Offer,
        BoardColumn::Accepted,
        BoardColumn::Rejected,
        BoardColumn::Referrals,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            BoardColumn::Interested => "interested",
            BoardColumn::Applied => "applied",
            BoardColumn::Interview => "interview",
            BoardColumn::Offer => "offer",
            BoardColumn::Accepted => "accepted",
            BoardColumn::Rejected => "rejected",
            BoardColumn::Referrals => "referrals",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|column| column.key() == key.trim())
    }
}

impl fmt::Display for BoardColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Optional refinement inside the `interview` and `offer` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubStage {
    PhoneScreening,
    InterviewStage,
    FinalInterviewStage,
    Negotiation,
    OfferExtended,
}

impl SubStage {
    pub const ALL: [SubStage; 5] = [
        SubStage::PhoneScreening,
        SubStage::InterviewStage,
        SubStage::FinalInterviewStage,
        SubStage::Negotiation,
        SubStage::OfferExtended,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            SubStage::PhoneScreening => "phone_screening",
            SubStage::InterviewStage => "interview_stage",
            SubStage::FinalInterviewStage => "final_interview_stage",
            SubStage::Negotiation => "negotiation",
            SubStage::OfferExtended => "offer_extended",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|stage| stage.key() == key.trim())
    }
}

impl fmt::Display for SubStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Persisted application row as seen by the status engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    pub user_id: UserId,
    pub job_id: JobId,
    pub status: ApplicationStatus,
    pub sub_stage: Option<SubStage>,
    pub status_updated: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Append-only audit row written once per accepted status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusHistoryEntry {
    pub application_id: ApplicationId,
    pub status: HistoryStatus,
    pub changed_at: DateTime<Utc>,
}
