use crate::{
    db::DbPool,
    entities::ppf_master,
    errors::ServiceError,
    models::{PpfPricing, PpfRollInput, PpfRolls, PpfVehiclePricing},
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
    "name": "Gloss PPF",
    "pricing_by_vehicle_type": [
        {"vehicle_type": "Sedan", "options": [
            {"warranty_name": "3 Years", "price": "30000"},
            {"warranty_name": "5 Years", "price": "45000"}
        ]}
    ],
    "rolls": [{"name": "Roll A-12", "stock": "150"}]
}))]
pub struct CreatePpfMasterRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    #[validate(custom = "validate_ppf_pricing")]
    pub pricing_by_vehicle_type: Vec<PpfVehiclePricing>,
    #[serde(default)]
    #[validate(custom = "validate_rolls")]
    pub rolls: Vec<PpfRollInput>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdatePpfMasterRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(custom = "validate_ppf_pricing")]
    pub pricing_by_vehicle_type: Option<Vec<PpfVehiclePricing>>,
    /// Replaces the roll list; rolls without an id get a new one
    #[validate(custom = "validate_rolls")]
    pub rolls: Option<Vec<PpfRollInput>>,
}

fn validate_ppf_pricing(rows: &Vec<PpfVehiclePricing>) -> Result<(), ValidationError> {
    for row in rows {
        if row.vehicle_type.trim().is_empty() {
            return Err(ValidationError::new("vehicle_type_required"));
        }
        for option in &row.options {
            if option.warranty_name.trim().is_empty() {
                return Err(ValidationError::new("warranty_name_required"));
            }
            validate_amount(&option.price)?;
        }
    }
    Ok(())
}

fn validate_rolls(rolls: &Vec<PpfRollInput>) -> Result<(), ValidationError> {
    for roll in rolls {
        if roll.validate().is_err() {
            return Err(ValidationError::new("invalid_roll"));
        }
    }
    Ok(())
}

fn into_rolls(rolls: Vec<PpfRollInput>) -> PpfRolls {
    PpfRolls(rolls.into_iter().map(PpfRollInput::into_roll).collect())
}

/// CRUD over PPF products and their rolls
#[derive(Clone)]
pub struct PpfMasterService {
    db_pool: Arc<DbPool>,
    logger: Logger,
}

impl PpfMasterService {
    pub fn new(db_pool: Arc<DbPool>, logger: Logger) -> Self {
        Self { db_pool, logger }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<ppf_master::Model>, ServiceError> {
        ppf_master::Entity::find()
            .order_by_asc(ppf_master::Column::Name)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<ppf_master::Model, ServiceError> {
        ppf_master::Entity::find_by_id(id)
            .one(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::not_found("PPF", id))
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(
        &self,
        request: CreatePpfMasterRequest,
    ) -> Result<ppf_master::Model, ServiceError> {
        request.validate()?;

        let model = ppf_master::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name.trim().to_string()),
            pricing_by_vehicle_type: Set(PpfPricing(request.pricing_by_vehicle_type)),
            rolls: Set(into_rolls(request.rolls)),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(&*self.db_pool)
        .await
        .map_err(ServiceError::db_error)?;

        slog::info!(self.logger, "ppf created"; "id" => %model.id, "rolls" => model.rolls.0.len());
        Ok(model)
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdatePpfMasterRequest,
    ) -> Result<ppf_master::Model, ServiceError> {
        request.validate()?;

        let existing = self.get(id).await?;
        let mut active: ppf_master::ActiveModel = existing.into();
        if let Some(name) = request.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(rows) = request.pricing_by_vehicle_type {
            active.pricing_by_vehicle_type = Set(PpfPricing(rows));
        }
        if let Some(rolls) = request.rolls {
            active.rolls = Set(into_rolls(rolls));
        }

        let model = active
            .update(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?;
        slog::info!(self.logger, "ppf updated"; "id" => %model.id);
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = ppf_master::Entity::delete_by_id(id)
            .exec(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("PPF", id));
        }
        slog::info!(self.logger, "ppf deleted"; "id" => %id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WarrantyOption;
    use rust_decimal_macros::dec;

    #[test]
    fn pricing_validation_checks_every_option() {
        let rows = vec![PpfVehiclePricing {
            vehicle_type: "Sedan".into(),
            options: vec![
                WarrantyOption {
                    warranty_name: "3 Years".into(),
                    price: dec!(100),
                },
                WarrantyOption {
                    warranty_name: "".into(),
                    price: dec!(100),
                },
            ],
        }];
        assert!(validate_ppf_pricing(&rows).is_err());
    }

    #[test]
    fn negative_roll_stock_is_rejected() {
        let rolls = vec![PpfRollInput {
            id: None,
            name: "Roll".into(),
            stock: dec!(-5),
        }];
        assert!(validate_rolls(&rolls).is_err());
    }
}
