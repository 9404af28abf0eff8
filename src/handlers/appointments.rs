use crate::{
    entities::appointment,
    handlers::common::{created, AppJson, CreatedResult, Deleted},
    services::appointments::{
        AppointmentFilter, CreateAppointmentRequest, UpdateAppointmentRequest,
    },
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

pub fn appointment_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_appointments).post(create_appointment))
        .route(
            "/:id",
            get(get_appointment)
                .patch(update_appointment)
                .delete(delete_appointment),
        )
}

#[utoipa::path(
    get,
    path = "/api/appointments",
    params(AppointmentFilter),
    responses(
        (status = 200, description = "Appointments, soonest first", body = ApiResponse<Vec<appointment::Model>>),
        (status = 401, description = "No session", body = crate::errors::ErrorResponse)
    ),
    tag = "appointments"
)]
pub async fn list_appointments(
    State(state): State<AppState>,
    Query(filter): Query<AppointmentFilter>,
) -> ApiResult<Vec<appointment::Model>> {
    Ok(Json(ApiResponse::success(
        state.services.appointments.list(filter).await?,
    )))
}

#[utoipa::path(
    get,
    path = "/api/appointments/:id",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Appointment fetched", body = ApiResponse<appointment::Model>),
        (status = 404, description = "Appointment not found", body = crate::errors::ErrorResponse)
    ),
    tag = "appointments"
)]
pub async fn get_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<appointment::Model> {
    Ok(Json(ApiResponse::success(
        state.services.appointments.get(id).await?,
    )))
}

#[utoipa::path(
    post,
    path = "/api/appointments",
    request_body = CreateAppointmentRequest,
    responses(
        (status = 201, description = "Appointment booked", body = ApiResponse<appointment::Model>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "appointments"
)]
pub async fn create_appointment(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateAppointmentRequest>,
) -> CreatedResult<appointment::Model> {
    Ok(created(state.services.appointments.create(payload).await?))
}

#[utoipa::path(
    patch,
    path = "/api/appointments/:id",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    request_body = UpdateAppointmentRequest,
    responses(
        (status = 200, description = "Appointment updated", body = ApiResponse<appointment::Model>),
        (status = 404, description = "Appointment not found", body = crate::errors::ErrorResponse)
    ),
    tag = "appointments"
)]
pub async fn update_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateAppointmentRequest>,
) -> ApiResult<appointment::Model> {
    Ok(Json(ApiResponse::success(
        state.services.appointments.update(id, payload).await?,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/appointments/:id",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Appointment deleted", body = ApiResponse<Deleted>),
        (status = 404, description = "Appointment not found", body = crate::errors::ErrorResponse)
    ),
    tag = "appointments"
)]
pub async fn delete_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Deleted> {
    state.services.appointments.delete(id).await?;
    Ok(Json(ApiResponse::success(Deleted::new(id))))
}
