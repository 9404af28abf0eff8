use crate::{
    db::DbPool,
    entities::technician::{self, TechnicianStatus},
    errors::ServiceError,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use slog::Logger;
use std::sync::Arc;
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "name": "Ravi Kumar",
    "specialty": "PPF installation",
    "phone": "9876543210"
}))]
pub struct CreateTechnicianRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 200))]
    pub specialty: String,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    #[serde(default)]
    pub status: TechnicianStatus,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTechnicianRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub specialty: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    pub status: Option<TechnicianStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TechnicianFilter {
    pub status: Option<TechnicianStatus>,
}

#[derive(Clone)]
pub struct TechnicianService {
    db_pool: Arc<DbPool>,
    logger: Logger,
}

impl TechnicianService {
    pub fn new(db_pool: Arc<DbPool>, logger: Logger) -> Self {
        Self { db_pool, logger }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: TechnicianFilter,
    ) -> Result<Vec<technician::Model>, ServiceError> {
        let mut query = technician::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(technician::Column::Status.eq(status));
        }
        query
            .order_by_asc(technician::Column::Name)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<technician::Model, ServiceError> {
        technician::Entity::find_by_id(id)
            .one(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::not_found("Technician", id))
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(
        &self,
        request: CreateTechnicianRequest,
    ) -> Result<technician::Model, ServiceError> {
        request.validate()?;
        let model = technician::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name.trim().to_string()),
            specialty: Set(request.specialty.trim().to_string()),
            phone: Set(request.phone),
            status: Set(request.status),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.db_pool)
        .await
        .map_err(ServiceError::db_error)?;
        slog::info!(self.logger, "technician created"; "id" => %model.id);
        Ok(model)
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateTechnicianRequest,
    ) -> Result<technician::Model, ServiceError> {
        request.validate()?;
        let mut active: technician::ActiveModel = self.get(id).await?.into();
        if let Some(name) = request.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(specialty) = request.specialty {
            active.specialty = Set(specialty.trim().to_string());
        }
        if let Some(phone) = request.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(status) = request.status {
            active.status = Set(status);
        }
        let model = active
            .update(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?;
        slog::info!(self.logger, "technician updated"; "id" => %model.id, "status" => %model.status);
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = technician::Entity::delete_by_id(id)
            .exec(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Technician", id));
        }
        Ok(())
    }
}
