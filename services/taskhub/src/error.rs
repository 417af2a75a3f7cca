use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use taskhub_core::envelope::failure_body;

/// Taskhub service error variants.
#[derive(Debug, thiserror::Error)]
pub enum TaskhubError {
    #[error("role not found")]
    RoleNotFound,
    #[error("user not found")]
    UserNotFound,
    #[error("team not found")]
    TeamNotFound,
    #[error("task not found")]
    TaskNotFound,
    /// The operation targets a protected entity, such as the Admin role.
    #[error("{0}")]
    ForbiddenOperation(String),
    /// The caller lacks the role required by the route.
    #[error("forbidden")]
    Forbidden,
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl TaskhubError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RoleNotFound => "ROLE_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::TeamNotFound => "TEAM_NOT_FOUND",
            Self::TaskNotFound => "TASK_NOT_FOUND",
            Self::ForbiddenOperation(_) => "FORBIDDEN_OPERATION",
            Self::Forbidden => "FORBIDDEN",
            Self::Validation(_) => "VALIDATION",
            Self::Conflict(_) => "CONFLICT",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn forbidden_operation(message: impl Into<String>) -> Self {
        Self::ForbiddenOperation(message.into())
    }
}

impl IntoResponse for TaskhubError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::RoleNotFound | Self::UserNotFound | Self::TeamNotFound | Self::TaskNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::ForbiddenOperation(_) | Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        let body = failure_body(self.kind(), &self.to_string());
        (status, axum::Json(body)).into_response()
    }
}
