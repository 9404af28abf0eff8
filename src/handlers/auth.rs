use crate::{
    auth::{clear_session_cookie, session_cookie, session_token_from_headers, CurrentUser},
    errors::ServiceError,
    events::Event,
    handlers::common::AppJson,
    services::users::{LoginRequest, UpdateProfileRequest, UserProfile},
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub id: Uuid,
    #[schema(example = "autogarage@system.com")]
    pub email: String,
}

/// Routes reachable without a session
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
}

/// Routes for the signed-in user
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/user", get(current_user).patch(update_current_user))
}

#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in; session cookie set", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Malformed credentials", body = crate::errors::ErrorResponse),
        (status = 401, description = "Invalid email or password", body = crate::errors::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Response, ServiceError> {
    let user = state.services.users.authenticate(&payload).await?;

    let token = state.sessions.create(user.id);
    let cookie = session_cookie(
        &state.config.session_cookie_name,
        &token,
        state.config.session_ttl().as_secs(),
        state.config.session_cookie_secure(),
    )?;

    state
        .event_sender
        .send_or_log(Event::UserLoggedIn {
            user_id: user.id,
            at: Utc::now(),
        })
        .await;

    let body = ApiResponse::success(LoginResponse {
        id: user.id,
        email: user.email,
    });
    Ok(([(header::SET_COOKIE, cookie)], Json(body)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/logout",
    responses(
        (status = 200, description = "Session destroyed and cookie cleared", body = ApiResponse<serde_json::Value>)
    ),
    tag = "auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ServiceError> {
    if let Some(token) = session_token_from_headers(&headers, &state.config.session_cookie_name) {
        state.sessions.destroy(&token);
    }
    let cookie = clear_session_cookie(
        &state.config.session_cookie_name,
        state.config.session_cookie_secure(),
    )?;
    let body = ApiResponse::success(serde_json::json!({ "logged_out": true }));
    Ok(([(header::SET_COOKIE, cookie)], Json(body)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/user",
    responses(
        (status = 200, description = "Signed-in user", body = ApiResponse<UserProfile>),
        (status = 401, description = "No session", body = crate::errors::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn current_user(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<UserProfile> {
    let user = state
        .services
        .users
        .get(current.user_id)
        .await
        .map_err(|_| ServiceError::Unauthorized("Not authenticated".to_string()))?;
    Ok(Json(ApiResponse::success(user.into())))
}

#[utoipa::path(
    patch,
    path = "/api/user",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<UserProfile>),
        (status = 400, description = "Invalid name or password", body = crate::errors::ErrorResponse),
        (status = 401, description = "No session", body = crate::errors::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn update_current_user(
    State(state): State<AppState>,
    current: CurrentUser,
    AppJson(payload): AppJson<UpdateProfileRequest>,
) -> ApiResult<UserProfile> {
    let password_changed = payload.password.is_some();
    let user = state
        .services
        .users
        .update_profile(current.user_id, payload)
        .await?;

    // other browsers signed in with the old password are logged out
    if password_changed {
        state
            .sessions
            .destroy_for_user(current.user_id, Some(&current.token));
    }

    Ok(Json(ApiResponse::success(user.into())))
}
