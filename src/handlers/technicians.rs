use crate::{
    entities::technician,
    handlers::common::{created, AppJson, CreatedResult, Deleted},
    services::technicians::{CreateTechnicianRequest, TechnicianFilter, UpdateTechnicianRequest},
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

pub fn technician_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_technicians).post(create_technician))
        .route(
            "/:id",
            get(get_technician)
                .patch(update_technician)
                .delete(delete_technician),
        )
}

#[utoipa::path(
    get,
    path = "/api/technicians",
    params(TechnicianFilter),
    responses(
        (status = 200, description = "Technicians listed", body = ApiResponse<Vec<technician::Model>>),
        (status = 401, description = "No session", body = crate::errors::ErrorResponse)
    ),
    tag = "technicians"
)]
pub async fn list_technicians(
    State(state): State<AppState>,
    Query(filter): Query<TechnicianFilter>,
) -> ApiResult<Vec<technician::Model>> {
    Ok(Json(ApiResponse::success(
        state.services.technicians.list(filter).await?,
    )))
}

#[utoipa::path(
    get,
    path = "/api/technicians/:id",
    params(("id" = Uuid, Path, description = "Technician ID")),
    responses(
        (status = 200, description = "Technician fetched", body = ApiResponse<technician::Model>),
        (status = 404, description = "Technician not found", body = crate::errors::ErrorResponse)
    ),
    tag = "technicians"
)]
pub async fn get_technician(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<technician::Model> {
    Ok(Json(ApiResponse::success(
        state.services.technicians.get(id).await?,
    )))
}

#[utoipa::path(
    post,
    path = "/api/technicians",
    request_body = CreateTechnicianRequest,
    responses(
        (status = 201, description = "Technician created", body = ApiResponse<technician::Model>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "technicians"
)]
pub async fn create_technician(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateTechnicianRequest>,
) -> CreatedResult<technician::Model> {
    Ok(created(state.services.technicians.create(payload).await?))
}

#[utoipa::path(
    patch,
    path = "/api/technicians/:id",
    params(("id" = Uuid, Path, description = "Technician ID")),
    request_body = UpdateTechnicianRequest,
    responses(
        (status = 200, description = "Technician updated", body = ApiResponse<technician::Model>),
        (status = 404, description = "Technician not found", body = crate::errors::ErrorResponse)
    ),
    tag = "technicians"
)]
pub async fn update_technician(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateTechnicianRequest>,
) -> ApiResult<technician::Model> {
    Ok(Json(ApiResponse::success(
        state.services.technicians.update(id, payload).await?,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/technicians/:id",
    params(("id" = Uuid, Path, description = "Technician ID")),
    responses(
        (status = 200, description = "Technician deleted", body = ApiResponse<Deleted>),
        (status = 404, description = "Technician not found", body = crate::errors::ErrorResponse)
    ),
    tag = "technicians"
)]
pub async fn delete_technician(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Deleted> {
    state.services.technicians.delete(id).await?;
    Ok(Json(ApiResponse::success(Deleted::new(id))))
}
