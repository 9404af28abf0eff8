use crate::{services::dashboard::DashboardSnapshot, ApiResponse, ApiResult, AppState};
use axum::{extract::State, routing::get, Json, Router};

pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(get_dashboard))
}

#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Dashboard snapshot", body = ApiResponse<DashboardSnapshot>),
        (status = 401, description = "No session", body = crate::errors::ErrorResponse)
    ),
    tag = "dashboard"
)]
pub async fn get_dashboard(State(state): State<AppState>) -> ApiResult<DashboardSnapshot> {
    let snapshot = state.services.dashboard.snapshot().await?;
    Ok(Json(ApiResponse::success(snapshot)))
}
