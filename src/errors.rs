use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

// ---------------------------------------------------------------------------
// StoreError: classified once at the storage boundary
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

/// SQLSTATE codes we give a meaning to. Everything else is `Unexpected`.
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const INSUFFICIENT_PRIVILEGE: &str = "42501";

/// Map a database error code and message onto the store classifier.
pub fn classify_db_error(code: Option<&str>, message: &str) -> StoreError {
    match code {
        Some(UNIQUE_VIOLATION) => StoreError::Conflict(message.to_string()),
        Some(FOREIGN_KEY_VIOLATION) => StoreError::NotFound(message.to_string()),
        Some(INSUFFICIENT_PRIVILEGE) => StoreError::Forbidden(message.to_string()),
        _ if message.contains("row-level security") || message.contains("policy") => {
            StoreError::Forbidden(message.to_string())
        }
        _ => StoreError::Unexpected(anyhow::anyhow!("database error: {message}")),
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => StoreError::NotFound("no rows returned".into()),
            sqlx::Error::Database(db_err) => {
                let code = db_err.code();
                classify_db_error(code.as_deref(), db_err.message())
            }
            other => StoreError::Unexpected(other.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// AppError: HTTP boundary
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (message, reason) = match self {
            AppError::NotFound(msg) | AppError::BadRequest(msg) | AppError::Conflict(msg) => {
                (msg, None)
            }
            AppError::Unauthorized => ("Unauthorized".into(), None),
            AppError::Forbidden(reason) => ("Forbidden".into(), Some(reason)),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                ("Internal server error".into(), None)
            }
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                error: message,
                reason,
            }),
        )
            .into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(msg) => AppError::NotFound(msg),
            StoreError::Conflict(msg) => AppError::Conflict(msg),
            StoreError::Forbidden(reason) => AppError::Forbidden(reason),
            StoreError::Unexpected(e) => AppError::Internal(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_is_conflict() {
        let err = classify_db_error(Some("23505"), "duplicate key value");
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[test]
    fn test_foreign_key_violation_is_not_found() {
        let err = classify_db_error(Some("23503"), "violates foreign key constraint");
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn test_policy_violation_is_forbidden() {
        let err = classify_db_error(
            Some("P0001"),
            "new row violates row-level security policy for table \"predictions\"",
        );
        assert!(matches!(err, StoreError::Forbidden(_)));

        let err = classify_db_error(Some("42501"), "permission denied");
        assert!(matches!(err, StoreError::Forbidden(_)));
    }

    #[test]
    fn test_unknown_code_is_unexpected() {
        let err = classify_db_error(Some("57014"), "canceling statement due to statement timeout");
        assert!(matches!(err, StoreError::Unexpected(_)));
    }

    #[test]
    fn test_row_not_found_is_not_found() {
        let err: StoreError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn test_store_error_maps_to_http_status() {
        let cases = [
            (StoreError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (StoreError::Conflict("x".into()), StatusCode::CONFLICT),
            (StoreError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (
                StoreError::Unexpected(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (store_err, expected) in cases {
            let resp = AppError::from(store_err).into_response();
            assert_eq!(resp.status(), expected);
        }
    }
}
