//! Wire shapes for the two status update surfaces and their validation into
//! [`StatusUpdateRequest`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::ApplicationId;
use super::resolver::{resolve_direct_status, resolve_status, Resolution, ResolutionError};
use super::service::StatusUpdateError;

/// Body of the column/sub-stage surface, as posted by the Kanban board.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnStatusPayload {
    pub application_id: Option<Value>,
    pub column_status: Option<String>,
    pub sub_stage: Option<String>,
}

/// Body of the direct status surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectStatusPayload {
    pub application_id: Option<Value>,
    pub status: Option<String>,
}

/// Validated status update. The direct surface is the column surface without a sub-stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusUpdateRequest {
    ByColumn {
        application_id: ApplicationId,
        column: String,
        sub_stage: Option<String>,
    },
    ByStatus {
        application_id: ApplicationId,
        status: String,
    },
}

impl StatusUpdateRequest {
    pub fn application_id(&self) -> ApplicationId {
        match self {
            StatusUpdateRequest::ByColumn { application_id, .. }
            | StatusUpdateRequest::ByStatus { application_id, .. } => *application_id,
        }
    }

    pub fn resolve(&self) -> Result<Resolution, ResolutionError> {
        match self {
            StatusUpdateRequest::ByColumn {
                column, sub_stage, ..
            } => resolve_status(column, sub_stage.as_deref()),
            StatusUpdateRequest::ByStatus { status, .. } => resolve_direct_status(status),
        }
    }
}

impl TryFrom<ColumnStatusPayload> for StatusUpdateRequest {
    type Error = StatusUpdateError;

    fn try_from(payload: ColumnStatusPayload) -> Result<Self, Self::Error> {
        let application_id = parse_application_id(payload.application_id.as_ref())?;
        let column = required_text(payload.column_status, "columnStatus")?;
        let sub_stage = payload
            .sub_stage
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        Ok(StatusUpdateRequest::ByColumn {
            application_id,
            column,
            sub_stage,
        })
    }
}

impl TryFrom<DirectStatusPayload> for StatusUpdateRequest {
    type Error = StatusUpdateError;

    fn try_from(payload: DirectStatusPayload) -> Result<Self, Self::Error> {
        let application_id = parse_application_id(payload.application_id.as_ref())?;
        let status = required_text(payload.status, "status")?;

        Ok(StatusUpdateRequest::ByStatus {
            application_id,
            status,
        })
    }
}

/// Accepts a JSON number or a numeric string.
fn parse_application_id(raw: Option<&Value>) -> Result<ApplicationId, StatusUpdateError> {
    let id = match raw {
        None | Some(Value::Null) => {
            return Err(StatusUpdateError::InvalidInput(
                "applicationId is required".to_string(),
            ))
        }
        Some(Value::Number(number)) => number.as_u64(),
        Some(Value::String(text)) if text.trim().is_empty() => {
            return Err(StatusUpdateError::InvalidInput(
                "applicationId is required".to_string(),
            ))
        }
        Some(Value::String(text)) => text.trim().parse::<u64>().ok(),
        Some(_) => None,
    };

    id.map(ApplicationId).ok_or_else(|| {
        StatusUpdateError::InvalidInput("applicationId must be an unsigned integer".to_string())
    })
}

fn required_text(raw: Option<String>, field: &str) -> Result<String, StatusUpdateError> {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| StatusUpdateError::InvalidInput(format!("{field} is required")))
}
