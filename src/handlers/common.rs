use crate::{errors::ServiceError, ApiResponse};
use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// `Json` extractor whose rejections render as 400 `ErrorResponse`s
#[derive(Debug, Clone, Copy, Default)]
pub struct AppJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> ServiceError {
    ServiceError::InvalidInput(rejection.body_text())
}

/// Result type for handlers that create a resource
pub type CreatedResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ServiceError>;

/// Standard created response
pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, Json(ApiResponse::success(data)))
}

/// Body returned by delete endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Deleted {
    pub id: Uuid,
    pub deleted: bool,
}

impl Deleted {
    pub fn new(id: Uuid) -> Self {
        Self { id, deleted: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        #[allow(dead_code)]
        name: String,
    }

    fn json_request(body: &'static str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn malformed_body_is_a_bad_request() {
        let err = AppJson::<Payload>::from_request(json_request("{not json"), &())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_field_is_a_bad_request() {
        let err = AppJson::<Payload>::from_request(json_request("{}"), &())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn valid_body_extracts() {
        let AppJson(payload) = AppJson::<Payload>::from_request(json_request(r#"{"name":"x"}"#), &())
            .await
            .unwrap();
        assert_eq!(payload.name, "x");
    }
}
