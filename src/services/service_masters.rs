use crate::{
    db::DbPool,
    entities::service_master,
    errors::ServiceError,
    models::{VehiclePrice, VehiclePrices},
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::Deserialize;
use slog::Logger;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::pricing_rows::validate_amount;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "name": "Ceramic Coating",
    "pricing_by_vehicle_type": [
        {"vehicle_type": "Sedan", "price": "12000"},
        {"vehicle_type": "SUV", "price": "15000"}
    ]
}))]
pub struct CreateServiceMasterRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    #[validate(custom = "validate_vehicle_prices")]
    pub pricing_by_vehicle_type: Vec<VehiclePrice>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateServiceMasterRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(custom = "validate_vehicle_prices")]
    pub pricing_by_vehicle_type: Option<Vec<VehiclePrice>>,
}

pub(crate) fn validate_vehicle_prices(rows: &Vec<VehiclePrice>) -> Result<(), ValidationError> {
    for row in rows {
        if row.vehicle_type.trim().is_empty() {
            return Err(ValidationError::new("vehicle_type_required"));
        }
        validate_amount(&row.price)?;
    }
    Ok(())
}

/// CRUD over the services catalogue
#[derive(Clone)]
pub struct ServiceMasterService {
    db_pool: Arc<DbPool>,
    logger: Logger,
}

impl ServiceMasterService {
    pub fn new(db_pool: Arc<DbPool>, logger: Logger) -> Self {
        Self { db_pool, logger }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<service_master::Model>, ServiceError> {
        service_master::Entity::find()
            .order_by_asc(service_master::Column::Name)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<service_master::Model, ServiceError> {
        service_master::Entity::find_by_id(id)
            .one(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::not_found("Service", id))
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(
        &self,
        request: CreateServiceMasterRequest,
    ) -> Result<service_master::Model, ServiceError> {
        request.validate()?;

        let model = service_master::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name.trim().to_string()),
            pricing_by_vehicle_type: Set(VehiclePrices(request.pricing_by_vehicle_type)),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(&*self.db_pool)
        .await
        .map_err(ServiceError::db_error)?;

        slog::info!(self.logger, "service created"; "id" => %model.id, "name" => &model.name);
        Ok(model)
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateServiceMasterRequest,
    ) -> Result<service_master::Model, ServiceError> {
        request.validate()?;

        let existing = self.get(id).await?;
        let mut active: service_master::ActiveModel = existing.into();
        if let Some(name) = request.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(rows) = request.pricing_by_vehicle_type {
            active.pricing_by_vehicle_type = Set(VehiclePrices(rows));
        }

        let model = active
            .update(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?;
        slog::info!(self.logger, "service updated"; "id" => %model.id);
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = service_master::Entity::delete_by_id(id)
            .exec(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Service", id));
        }
        slog::info!(self.logger, "service deleted"; "id" => %id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rejects_blank_vehicle_type_and_negative_price() {
        let blank = vec![VehiclePrice {
            vehicle_type: " ".into(),
            price: dec!(10),
        }];
        assert!(validate_vehicle_prices(&blank).is_err());

        let negative = vec![VehiclePrice {
            vehicle_type: "SUV".into(),
            price: dec!(-1),
        }];
        assert!(validate_vehicle_prices(&negative).is_err());

        let ok = vec![VehiclePrice {
            vehicle_type: "SUV".into(),
            price: dec!(0),
        }];
        assert!(validate_vehicle_prices(&ok).is_ok());
    }

    #[test]
    fn create_request_requires_name() {
        let request = CreateServiceMasterRequest {
            name: String::new(),
            pricing_by_vehicle_type: vec![],
        };
        assert!(request.validate().is_err());
    }
}
