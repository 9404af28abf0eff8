use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::error::DbErr;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "error": "Unprocessable Entity",
    "message": "Insufficient stock: roll Roll A has 12 left, 30 requested",
    "request_id": "req-abc123xyz",
    "timestamp": "2026-01-09T10:30:00.000Z"
}))]
pub struct ErrorResponse {
    /// Canonical reason of the status code
    pub error: String,
    pub message: String,
    /// Offending fields, for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Request body failed its `validator` rules.
    #[error("Validation error: {message}")]
    ValidationError {
        message: String,
        fields: Vec<String>,
    },

    /// Well-formed request that references something unusable, such as an
    /// unknown master id or a vehicle type without a price row.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The record is in the wrong status for the operation.
    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// A PPF roll would drop below zero.
    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),

    #[error("Hash error: {0}")]
    HashError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<ValidationErrors> for ServiceError {
    fn from(err: ValidationErrors) -> Self {
        let mut fields: Vec<String> = err
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect();
        fields.sort();
        ServiceError::ValidationError {
            message: err.to_string(),
            fields,
        }
    }
}

impl ServiceError {
    pub fn db_error(error: DbErr) -> Self {
        ServiceError::DatabaseError(error)
    }

    pub fn not_found(kind: &str, id: impl std::fmt::Display) -> Self {
        ServiceError::NotFound(format!("{} {} not found", kind, id))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ValidationError { .. } | Self::InvalidInput(_) | Self::InvalidStatus(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::InsufficientStock(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::DatabaseError(_) | Self::HashError(_) | Self::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to clients. Server-side failures are reduced to a
    /// generic line; the full error only goes to the log.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_) => "Database error".to_string(),
            Self::HashError(_) | Self::InternalError(_) => "Internal server error".to_string(),
            Self::Unauthorized(reason) => reason.clone(),
            _ => self.to_string(),
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            Self::ValidationError { fields, .. } if !fields.is_empty() => {
                Some(format!("invalid fields: {}", fields.join(", ")))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.response_message(),
            details: self.details(),
            request_id: crate::tracing::current_request_id().map(|rid| rid.as_str().to_string()),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(body)).into_response()
    }
}

pub type AppError = ServiceError;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use validator::Validate;

    #[derive(Validate)]
    struct Booking {
        #[validate(length(min = 1))]
        customer_name: String,
        #[validate(length(min = 10, max = 15))]
        phone: String,
    }

    async fn body_of(err: ServiceError) -> (StatusCode, ErrorResponse) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn error_body_carries_request_id() {
        let (status, body) = crate::tracing::scope_request_id(
            crate::tracing::RequestId::new("req-123"),
            body_of(ServiceError::not_found("Job card", "42")),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "Not Found");
        assert_eq!(body.request_id.as_deref(), Some("req-123"));
    }

    #[tokio::test]
    async fn validation_failures_list_their_fields() {
        let bad = Booking {
            customer_name: String::new(),
            phone: "123".into(),
        };
        let err = ServiceError::from(bad.validate().unwrap_err());
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body.details.as_deref(),
            Some("invalid fields: customer_name, phone")
        );
    }

    #[test]
    fn stock_and_status_errors_map_to_client_codes() {
        assert_eq!(
            ServiceError::InsufficientStock("Roll A".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ServiceError::InvalidStatus("job not completed".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::Conflict("already invoiced".into()).status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn server_side_failures_hide_their_cause() {
        assert_eq!(
            ServiceError::HashError("argon2 params".into()).response_message(),
            "Internal server error"
        );
        assert_eq!(
            ServiceError::db_error(DbErr::Custom("no such table: job_cards".into()))
                .response_message(),
            "Database error"
        );
        assert_eq!(
            ServiceError::Unauthorized("Invalid email or password".into()).response_message(),
            "Invalid email or password"
        );
    }
}
