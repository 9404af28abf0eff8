use crate::{
    entities::invoice,
    services::invoices::{InvoiceFilter, InvoiceList},
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

/// Invoices are created through `POST /api/job-cards/:id/invoice`.
pub fn invoice_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_invoices))
        .route("/:id", get(get_invoice))
}

#[utoipa::path(
    get,
    path = "/api/invoices",
    params(InvoiceFilter),
    responses(
        (status = 200, description = "Matching invoices and their summed total", body = ApiResponse<InvoiceList>),
        (status = 401, description = "No session", body = crate::errors::ErrorResponse)
    ),
    tag = "invoices"
)]
pub async fn list_invoices(
    State(state): State<AppState>,
    Query(filter): Query<InvoiceFilter>,
) -> ApiResult<InvoiceList> {
    Ok(Json(ApiResponse::success(
        state.services.invoices.list(filter).await?,
    )))
}

#[utoipa::path(
    get,
    path = "/api/invoices/:id",
    params(("id" = Uuid, Path, description = "Invoice ID")),
    responses(
        (status = 200, description = "Invoice fetched", body = ApiResponse<invoice::Model>),
        (status = 404, description = "Invoice not found", body = crate::errors::ErrorResponse)
    ),
    tag = "invoices"
)]
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<invoice::Model> {
    Ok(Json(ApiResponse::success(
        state.services.invoices.get(id).await?,
    )))
}
