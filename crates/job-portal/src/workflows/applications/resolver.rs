//! Maps Kanban selections onto canonical application statuses.
//!
//! Two fixed tables back the resolution: the column defaults and the sub-stage overrides.
//! A recognized sub-stage always wins over the column, so `interview` + `negotiation`
//! resolves to `NEGOTIATION`.

use serde::Serialize;

use super::domain::{ApplicationStatus, BoardColumn, SubStage};

/// Columns accepted by the direct status surface. The remaining columns are only reachable
/// through the column/sub-stage surface.
const DIRECT_STATUS_COLUMNS: [BoardColumn; 5] = [
    BoardColumn::Interested,
    BoardColumn::Applied,
    BoardColumn::Interview,
    BoardColumn::Offer,
    BoardColumn::Referrals,
];

/// Default status applied when a card lands in a column without a sub-stage.
pub const fn column_default_status(column: BoardColumn) -> ApplicationStatus {
    match column {
        BoardColumn::Interested => ApplicationStatus::Interested,
        BoardColumn::Applied => ApplicationStatus::Applied,
        BoardColumn::Interview => ApplicationStatus::InterviewStage,
        BoardColumn::Offer => ApplicationStatus::OfferExtended,
        BoardColumn::Accepted => ApplicationStatus::OfferAccepted,
        BoardColumn::Rejected => ApplicationStatus::Rejected,
        BoardColumn::Referrals => ApplicationStatus::Applied,
    }
}

pub const fn sub_stage_status(sub_stage: SubStage) -> ApplicationStatus {
    match sub_stage {
        SubStage::PhoneScreening => ApplicationStatus::PhoneScreening,
        SubStage::InterviewStage => ApplicationStatus::InterviewStage,
        SubStage::FinalInterviewStage => ApplicationStatus::FinalInterviewStage,
        SubStage::Negotiation => ApplicationStatus::Negotiation,
        SubStage::OfferExtended => ApplicationStatus::OfferExtended,
    }
}

/// Outcome of resolving a board selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub status: ApplicationStatus,
    /// Recognized sub-stage to persist next to the status.
    pub sub_stage: Option<SubStage>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    #[error(
        "invalid status combination: column '{column}' with sub-stage '{}'",
        .sub_stage.as_deref().unwrap_or("none")
    )]
    InvalidStatusCombination {
        column: String,
        sub_stage: Option<String>,
    },
}

/// Resolve a column and optional sub-stage into exactly one canonical status.
pub fn resolve_status(column: &str, sub_stage: Option<&str>) -> Result<Resolution, ResolutionError> {
    if let Some(stage) = sub_stage.and_then(SubStage::from_key) {
        return Ok(Resolution {
            status: sub_stage_status(stage),
            sub_stage: Some(stage),
        });
    }

    match BoardColumn::from_key(column) {
        Some(column) => Ok(Resolution {
            status: column_default_status(column),
            sub_stage: None,
        }),
        None => Err(ResolutionError::InvalidStatusCombination {
            column: column.to_string(),
            sub_stage: sub_stage.map(str::to_string),
        }),
    }
}

/// Resolve the direct status surface, which only knows a subset of columns and never sub-stages.
pub fn resolve_direct_status(status: &str) -> Result<Resolution, ResolutionError> {
    BoardColumn::from_key(status)
        .filter(|column| DIRECT_STATUS_COLUMNS.contains(column))
        .map(|column| Resolution {
            status: column_default_status(column),
            sub_stage: None,
        })
        .ok_or_else(|| ResolutionError::InvalidStatusCombination {
            column: status.to_string(),
            sub_stage: None,
        })
}
