//! Master data: services, PPF products, accessories and their categories,
//! vehicle types.

use crate::{
    entities::{accessory_category, accessory_master, ppf_master, service_master, vehicle_type},
    handlers::common::{created, AppJson, CreatedResult, Deleted},
    services::{
        accessories::{CategoryRequest, CreateAccessoryRequest, UpdateAccessoryRequest},
        ppf_masters::{CreatePpfMasterRequest, UpdatePpfMasterRequest},
        service_masters::{CreateServiceMasterRequest, UpdateServiceMasterRequest},
        vehicle_types::VehicleTypeRequest,
    },
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Path, State},
    routing::{get, patch},
    Json, Router,
};
use uuid::Uuid;

pub fn masters_routes() -> Router<AppState> {
    Router::new()
        .route("/services", get(list_services).post(create_service))
        .route("/services/:id", patch(update_service).delete(delete_service))
        .route("/ppf", get(list_ppfs).post(create_ppf))
        .route("/ppf/:id", patch(update_ppf).delete(delete_ppf))
        .route("/accessories", get(list_accessories).post(create_accessory))
        .route(
            "/accessories/:id",
            patch(update_accessory).delete(delete_accessory),
        )
        .route(
            "/accessory-categories",
            get(list_categories).post(create_category),
        )
        .route(
            "/accessory-categories/:id",
            patch(rename_category).delete(delete_category),
        )
        .route(
            "/accessory-categories/:id/accessories",
            get(list_category_accessories),
        )
        .route(
            "/vehicle-types",
            get(list_vehicle_types).post(create_vehicle_type),
        )
        .route(
            "/vehicle-types/:id",
            patch(update_vehicle_type).delete(delete_vehicle_type),
        )
}

// ----- services -----

#[utoipa::path(
    get,
    path = "/api/masters/services",
    responses(
        (status = 200, description = "Services listed", body = ApiResponse<Vec<service_master::Model>>),
        (status = 401, description = "No session", body = crate::errors::ErrorResponse)
    ),
    tag = "masters"
)]
pub async fn list_services(State(state): State<AppState>) -> ApiResult<Vec<service_master::Model>> {
    Ok(Json(ApiResponse::success(
        state.services.service_masters.list().await?,
    )))
}

#[utoipa::path(
    post,
    path = "/api/masters/services",
    request_body = CreateServiceMasterRequest,
    responses(
        (status = 201, description = "Service created", body = ApiResponse<service_master::Model>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "masters"
)]
pub async fn create_service(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateServiceMasterRequest>,
) -> CreatedResult<service_master::Model> {
    Ok(created(state.services.service_masters.create(payload).await?))
}

#[utoipa::path(
    patch,
    path = "/api/masters/services/:id",
    params(("id" = Uuid, Path, description = "Service ID")),
    request_body = UpdateServiceMasterRequest,
    responses(
        (status = 200, description = "Service updated", body = ApiResponse<service_master::Model>),
        (status = 404, description = "Service not found", body = crate::errors::ErrorResponse)
    ),
    tag = "masters"
)]
pub async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateServiceMasterRequest>,
) -> ApiResult<service_master::Model> {
    Ok(Json(ApiResponse::success(
        state.services.service_masters.update(id, payload).await?,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/masters/services/:id",
    params(("id" = Uuid, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service deleted", body = ApiResponse<Deleted>),
        (status = 404, description = "Service not found", body = crate::errors::ErrorResponse)
    ),
    tag = "masters"
)]
pub async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Deleted> {
    state.services.service_masters.delete(id).await?;
    Ok(Json(ApiResponse::success(Deleted::new(id))))
}

// ----- PPF -----

#[utoipa::path(
    get,
    path = "/api/masters/ppf",
    responses(
        (status = 200, description = "PPF products listed", body = ApiResponse<Vec<ppf_master::Model>>)
    ),
    tag = "masters"
)]
pub async fn list_ppfs(State(state): State<AppState>) -> ApiResult<Vec<ppf_master::Model>> {
    Ok(Json(ApiResponse::success(
        state.services.ppf_masters.list().await?,
    )))
}

#[utoipa::path(
    post,
    path = "/api/masters/ppf",
    request_body = CreatePpfMasterRequest,
    responses(
        (status = 201, description = "PPF created; roll ids assigned", body = ApiResponse<ppf_master::Model>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "masters"
)]
pub async fn create_ppf(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreatePpfMasterRequest>,
) -> CreatedResult<ppf_master::Model> {
    Ok(created(state.services.ppf_masters.create(payload).await?))
}

#[utoipa::path(
    patch,
    path = "/api/masters/ppf/:id",
    params(("id" = Uuid, Path, description = "PPF ID")),
    request_body = UpdatePpfMasterRequest,
    responses(
        (status = 200, description = "PPF updated", body = ApiResponse<ppf_master::Model>),
        (status = 404, description = "PPF not found", body = crate::errors::ErrorResponse)
    ),
    tag = "masters"
)]
pub async fn update_ppf(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdatePpfMasterRequest>,
) -> ApiResult<ppf_master::Model> {
    Ok(Json(ApiResponse::success(
        state.services.ppf_masters.update(id, payload).await?,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/masters/ppf/:id",
    params(("id" = Uuid, Path, description = "PPF ID")),
    responses(
        (status = 200, description = "PPF deleted", body = ApiResponse<Deleted>),
        (status = 404, description = "PPF not found", body = crate::errors::ErrorResponse)
    ),
    tag = "masters"
)]
pub async fn delete_ppf(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Deleted> {
    state.services.ppf_masters.delete(id).await?;
    Ok(Json(ApiResponse::success(Deleted::new(id))))
}

// ----- accessories -----

#[utoipa::path(
    get,
    path = "/api/masters/accessories",
    responses(
        (status = 200, description = "Accessories listed", body = ApiResponse<Vec<accessory_master::Model>>)
    ),
    tag = "masters"
)]
pub async fn list_accessories(
    State(state): State<AppState>,
) -> ApiResult<Vec<accessory_master::Model>> {
    Ok(Json(ApiResponse::success(
        state.services.accessories.list().await?,
    )))
}

#[utoipa::path(
    post,
    path = "/api/masters/accessories",
    request_body = CreateAccessoryRequest,
    responses(
        (status = 201, description = "Accessory created", body = ApiResponse<accessory_master::Model>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "masters"
)]
pub async fn create_accessory(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateAccessoryRequest>,
) -> CreatedResult<accessory_master::Model> {
    Ok(created(state.services.accessories.create(payload).await?))
}

#[utoipa::path(
    patch,
    path = "/api/masters/accessories/:id",
    params(("id" = Uuid, Path, description = "Accessory ID")),
    request_body = UpdateAccessoryRequest,
    responses(
        (status = 200, description = "Accessory updated", body = ApiResponse<accessory_master::Model>),
        (status = 404, description = "Accessory not found", body = crate::errors::ErrorResponse)
    ),
    tag = "masters"
)]
pub async fn update_accessory(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateAccessoryRequest>,
) -> ApiResult<accessory_master::Model> {
    Ok(Json(ApiResponse::success(
        state.services.accessories.update(id, payload).await?,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/masters/accessories/:id",
    params(("id" = Uuid, Path, description = "Accessory ID")),
    responses(
        (status = 200, description = "Accessory deleted", body = ApiResponse<Deleted>),
        (status = 404, description = "Accessory not found", body = crate::errors::ErrorResponse)
    ),
    tag = "masters"
)]
pub async fn delete_accessory(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Deleted> {
    state.services.accessories.delete(id).await?;
    Ok(Json(ApiResponse::success(Deleted::new(id))))
}

// ----- accessory categories -----

#[utoipa::path(
    get,
    path = "/api/masters/accessory-categories",
    responses(
        (status = 200, description = "Categories listed", body = ApiResponse<Vec<accessory_category::Model>>)
    ),
    tag = "masters"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> ApiResult<Vec<accessory_category::Model>> {
    Ok(Json(ApiResponse::success(
        state.services.accessories.list_categories().await?,
    )))
}

#[utoipa::path(
    post,
    path = "/api/masters/accessory-categories",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<accessory_category::Model>),
        (status = 409, description = "Name already taken", body = crate::errors::ErrorResponse)
    ),
    tag = "masters"
)]
pub async fn create_category(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CategoryRequest>,
) -> CreatedResult<accessory_category::Model> {
    Ok(created(
        state.services.accessories.create_category(payload).await?,
    ))
}

#[utoipa::path(
    patch,
    path = "/api/masters/accessory-categories/:id",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category renamed along with its accessories", body = ApiResponse<accessory_category::Model>),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Name already taken", body = crate::errors::ErrorResponse)
    ),
    tag = "masters"
)]
pub async fn rename_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<CategoryRequest>,
) -> ApiResult<accessory_category::Model> {
    Ok(Json(ApiResponse::success(
        state.services.accessories.rename_category(id, payload).await?,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/masters/accessory-categories/:id",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deleted", body = ApiResponse<Deleted>),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "masters"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Deleted> {
    state.services.accessories.delete_category(id).await?;
    Ok(Json(ApiResponse::success(Deleted::new(id))))
}

#[utoipa::path(
    get,
    path = "/api/masters/accessory-categories/:id/accessories",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Accessories in the category", body = ApiResponse<Vec<accessory_master::Model>>),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "masters"
)]
pub async fn list_category_accessories(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<accessory_master::Model>> {
    Ok(Json(ApiResponse::success(
        state.services.accessories.list_by_category(id).await?,
    )))
}

// ----- vehicle types -----

#[utoipa::path(
    get,
    path = "/api/masters/vehicle-types",
    responses(
        (status = 200, description = "Vehicle types listed", body = ApiResponse<Vec<vehicle_type::Model>>)
    ),
    tag = "masters"
)]
pub async fn list_vehicle_types(
    State(state): State<AppState>,
) -> ApiResult<Vec<vehicle_type::Model>> {
    Ok(Json(ApiResponse::success(
        state.services.vehicle_types.list().await?,
    )))
}

#[utoipa::path(
    post,
    path = "/api/masters/vehicle-types",
    request_body = VehicleTypeRequest,
    responses(
        (status = 201, description = "Vehicle type created", body = ApiResponse<vehicle_type::Model>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "masters"
)]
pub async fn create_vehicle_type(
    State(state): State<AppState>,
    AppJson(payload): AppJson<VehicleTypeRequest>,
) -> CreatedResult<vehicle_type::Model> {
    Ok(created(state.services.vehicle_types.create(payload).await?))
}

#[utoipa::path(
    patch,
    path = "/api/masters/vehicle-types/:id",
    params(("id" = Uuid, Path, description = "Vehicle type ID")),
    request_body = VehicleTypeRequest,
    responses(
        (status = 200, description = "Vehicle type renamed", body = ApiResponse<vehicle_type::Model>),
        (status = 404, description = "Vehicle type not found", body = crate::errors::ErrorResponse)
    ),
    tag = "masters"
)]
pub async fn update_vehicle_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<VehicleTypeRequest>,
) -> ApiResult<vehicle_type::Model> {
    Ok(Json(ApiResponse::success(
        state.services.vehicle_types.update(id, payload).await?,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/masters/vehicle-types/:id",
    params(("id" = Uuid, Path, description = "Vehicle type ID")),
    responses(
        (status = 200, description = "Vehicle type deleted", body = ApiResponse<Deleted>),
        (status = 404, description = "Vehicle type not found", body = crate::errors::ErrorResponse)
    ),
    tag = "masters"
)]
pub async fn delete_vehicle_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Deleted> {
    state.services.vehicle_types.delete(id).await?;
    Ok(Json(ApiResponse::success(Deleted::new(id))))
}
