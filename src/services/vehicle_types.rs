use crate::{db::DbPool, entities::vehicle_type, errors::ServiceError};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::Deserialize;
use slog::Logger;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[schema(example = json!({"name": "SUV"}))]
pub struct VehicleTypeRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

#[derive(Clone)]
pub struct VehicleTypeService {
    db_pool: Arc<DbPool>,
    logger: Logger,
}

impl VehicleTypeService {
    pub fn new(db_pool: Arc<DbPool>, logger: Logger) -> Self {
        Self { db_pool, logger }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<vehicle_type::Model>, ServiceError> {
        vehicle_type::Entity::find()
            .order_by_asc(vehicle_type::Column::Name)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(
        &self,
        request: VehicleTypeRequest,
    ) -> Result<vehicle_type::Model, ServiceError> {
        request.validate()?;
        let model = vehicle_type::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name.trim().to_string()),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.db_pool)
        .await
        .map_err(ServiceError::db_error)?;
        slog::info!(self.logger, "vehicle type created"; "id" => %model.id, "name" => &model.name);
        Ok(model)
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: Uuid,
        request: VehicleTypeRequest,
    ) -> Result<vehicle_type::Model, ServiceError> {
        request.validate()?;
        let existing = vehicle_type::Entity::find_by_id(id)
            .one(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::not_found("Vehicle type", id))?;

        let mut active: vehicle_type::ActiveModel = existing.into();
        active.name = Set(request.name.trim().to_string());
        active
            .update(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = vehicle_type::Entity::delete_by_id(id)
            .exec(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Vehicle type", id));
        }
        Ok(())
    }
}
