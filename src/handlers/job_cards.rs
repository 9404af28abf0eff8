use crate::{
    entities::{invoice, job_card},
    handlers::common::{created, AppJson, CreatedResult, Deleted},
    services::{
        invoices::GenerateInvoiceRequest,
        job_cards::{CreateJobCardRequest, JobCardFilter, UpdateJobCardRequest},
    },
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

pub fn job_card_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_job_cards).post(create_job_card))
        .route(
            "/:id",
            get(get_job_card)
                .patch(update_job_card)
                .delete(delete_job_card),
        )
        .route("/:id/invoice", post(generate_invoice))
}

#[utoipa::path(
    get,
    path = "/api/job-cards",
    params(JobCardFilter),
    responses(
        (status = 200, description = "Job cards, newest first", body = ApiResponse<Vec<job_card::Model>>),
        (status = 401, description = "No session", body = crate::errors::ErrorResponse)
    ),
    tag = "job-cards"
)]
pub async fn list_job_cards(
    State(state): State<AppState>,
    Query(filter): Query<JobCardFilter>,
) -> ApiResult<Vec<job_card::Model>> {
    Ok(Json(ApiResponse::success(
        state.services.job_cards.list(filter).await?,
    )))
}

#[utoipa::path(
    get,
    path = "/api/job-cards/:id",
    params(("id" = Uuid, Path, description = "Job card ID")),
    responses(
        (status = 200, description = "Job card fetched", body = ApiResponse<job_card::Model>),
        (status = 404, description = "Job card not found", body = crate::errors::ErrorResponse)
    ),
    tag = "job-cards"
)]
pub async fn get_job_card(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<job_card::Model> {
    Ok(Json(ApiResponse::success(
        state.services.job_cards.get(id).await?,
    )))
}

#[utoipa::path(
    post,
    path = "/api/job-cards",
    request_body = CreateJobCardRequest,
    responses(
        (status = 201, description = "Job card created with a new job number", body = ApiResponse<job_card::Model>),
        (status = 400, description = "Invalid request or unpriced line item", body = crate::errors::ErrorResponse),
        (status = 422, description = "PPF roll lacks the requested stock", body = crate::errors::ErrorResponse)
    ),
    tag = "job-cards"
)]
pub async fn create_job_card(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateJobCardRequest>,
) -> CreatedResult<job_card::Model> {
    Ok(created(state.services.job_cards.create(payload).await?))
}

#[utoipa::path(
    patch,
    path = "/api/job-cards/:id",
    params(("id" = Uuid, Path, description = "Job card ID")),
    request_body = UpdateJobCardRequest,
    responses(
        (status = 200, description = "Job card updated and re-priced", body = ApiResponse<job_card::Model>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Job card not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "PPF roll lacks the requested stock", body = crate::errors::ErrorResponse)
    ),
    tag = "job-cards"
)]
pub async fn update_job_card(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateJobCardRequest>,
) -> ApiResult<job_card::Model> {
    Ok(Json(ApiResponse::success(
        state.services.job_cards.update(id, payload).await?,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/job-cards/:id",
    params(("id" = Uuid, Path, description = "Job card ID")),
    responses(
        (status = 200, description = "Job card deleted", body = ApiResponse<Deleted>),
        (status = 404, description = "Job card not found", body = crate::errors::ErrorResponse)
    ),
    tag = "job-cards"
)]
pub async fn delete_job_card(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Deleted> {
    state.services.job_cards.delete(id).await?;
    Ok(Json(ApiResponse::success(Deleted::new(id))))
}

/// The body is optional; an empty request uses the default business.
#[utoipa::path(
    post,
    path = "/api/job-cards/:id/invoice",
    params(("id" = Uuid, Path, description = "Job card ID")),
    request_body(content = GenerateInvoiceRequest, description = "Optional issuing business"),
    responses(
        (status = 201, description = "Invoice generated", body = ApiResponse<invoice::Model>),
        (status = 400, description = "Job card is not completed", body = crate::errors::ErrorResponse),
        (status = 404, description = "Job card not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Job card already invoiced", body = crate::errors::ErrorResponse)
    ),
    tag = "job-cards"
)]
pub async fn generate_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Option<AppJson<GenerateInvoiceRequest>>,
) -> CreatedResult<invoice::Model> {
    let request = payload.map(|AppJson(r)| r).unwrap_or_default();
    Ok(created(
        state.services.invoices.generate(id, request).await?,
    ))
}
