use crate::{
    handlers::common::{created, AppJson, CreatedResult, Deleted},
    services::inquiries::{CreateInquiryRequest, InquiryFilter, InquiryView},
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Path, Query, State},
    routing::{delete, get},
    Json, Router,
};
use uuid::Uuid;

pub fn inquiry_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_inquiries).post(create_inquiry))
        .route("/:id", delete(delete_inquiry))
}

#[utoipa::path(
    get,
    path = "/api/inquiries",
    params(InquiryFilter),
    responses(
        (status = 200, description = "Inquiries with markup, newest first", body = ApiResponse<Vec<InquiryView>>),
        (status = 401, description = "No session", body = crate::errors::ErrorResponse)
    ),
    tag = "inquiries"
)]
pub async fn list_inquiries(
    State(state): State<AppState>,
    Query(filter): Query<InquiryFilter>,
) -> ApiResult<Vec<InquiryView>> {
    Ok(Json(ApiResponse::success(
        state.services.inquiries.list(filter).await?,
    )))
}

#[utoipa::path(
    post,
    path = "/api/inquiries",
    request_body = CreateInquiryRequest,
    responses(
        (status = 201, description = "Inquiry recorded", body = ApiResponse<InquiryView>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "inquiries"
)]
pub async fn create_inquiry(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateInquiryRequest>,
) -> CreatedResult<InquiryView> {
    Ok(created(state.services.inquiries.create(payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/inquiries/:id",
    params(("id" = Uuid, Path, description = "Inquiry ID")),
    responses(
        (status = 200, description = "Inquiry deleted", body = ApiResponse<Deleted>),
        (status = 404, description = "Inquiry not found", body = crate::errors::ErrorResponse)
    ),
    tag = "inquiries"
)]
pub async fn delete_inquiry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Deleted> {
    state.services.inquiries.delete(id).await?;
    Ok(Json(ApiResponse::success(Deleted::new(id))))
}
