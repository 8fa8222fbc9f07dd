use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::applications::{ResolutionError, StatusUpdateError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

/// Process-level error surfaced by the binary and its CLI commands.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Resolution(ResolutionError),
    Status(StatusUpdateError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Resolution(err) => write!(f, "resolution error: {}", err),
            AppError::Status(err) => write!(f, "status update error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Resolution(err) => Some(err),
            AppError::Status(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Resolution(_) => StatusCode::BAD_REQUEST,
            AppError::Status(StatusUpdateError::InvalidInput(_))
            | AppError::Status(StatusUpdateError::Resolution(_)) => StatusCode::BAD_REQUEST,
            AppError::Status(StatusUpdateError::NotFound { .. }) => StatusCode::NOT_FOUND,
            AppError::Status(StatusUpdateError::TerminalStatusLocked { .. }) => {
                StatusCode::CONFLICT
            }
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Status(StatusUpdateError::Persistence(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "success": false, "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<ResolutionError> for AppError {
    fn from(value: ResolutionError) -> Self {
        Self::Resolution(value)
    }
}

impl From<StatusUpdateError> for AppError {
    fn from(value: StatusUpdateError) -> Self {
        Self::Status(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::applications::{ApplicationId, RepositoryError};

    #[test]
    fn maps_status_errors_to_http_codes() {
        let cases = [
            (
                AppError::from(StatusUpdateError::InvalidInput("status is required".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::from(StatusUpdateError::NotFound {
                    application_id: ApplicationId(9),
                }),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::from(StatusUpdateError::Persistence(RepositoryError::Unavailable(
                    "offline".into(),
                ))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::from(ResolutionError::InvalidStatusCombination {
                    column: "unknown_column".into(),
                    sub_stage: None,
                }),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
