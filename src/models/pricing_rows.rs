//! Pricing matrices stored on master records.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Flat price of a service for one vehicle type
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema, Validate)]
pub struct VehiclePrice {
    #[validate(length(min = 1))]
    #[schema(example = "SUV")]
    pub vehicle_type: String,
    #[schema(value_type = String, example = "1000")]
    #[validate(custom = "validate_amount")]
    pub price: Decimal,
}

#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema,
)]
pub struct VehiclePrices(pub Vec<VehiclePrice>);

/// One warranty tier of a PPF product
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema, Validate)]
pub struct WarrantyOption {
    #[validate(length(min = 1))]
    #[schema(example = "5 Years")]
    pub warranty_name: String,
    #[schema(value_type = String, example = "45000")]
    #[validate(custom = "validate_amount")]
    pub price: Decimal,
}

/// Warranty tiers offered for one vehicle type
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema, Validate)]
pub struct PpfVehiclePricing {
    #[validate(length(min = 1))]
    #[schema(example = "Sedan")]
    pub vehicle_type: String,
    #[serde(default)]
    pub options: Vec<WarrantyOption>,
}

#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema,
)]
pub struct PpfPricing(pub Vec<PpfVehiclePricing>);

/// A physical roll of film and the area left on it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PpfRoll {
    pub id: Uuid,
    #[schema(example = "Roll A-12")]
    pub name: String,
    #[schema(value_type = String, example = "150")]
    pub stock: Decimal,
}

#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema,
)]
pub struct PpfRolls(pub Vec<PpfRoll>);

impl PpfRolls {
    pub fn total_stock(&self) -> Decimal {
        self.0.iter().map(|roll| roll.stock).sum()
    }
}

/// Roll as submitted by a client; the id is minted when absent.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct PpfRollInput {
    pub id: Option<Uuid>,
    #[validate(length(min = 1))]
    pub name: String,
    #[schema(value_type = String, example = "150")]
    #[validate(custom = "validate_amount")]
    pub stock: Decimal,
}

impl PpfRollInput {
    pub fn into_roll(self) -> PpfRoll {
        PpfRoll {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            name: self.name,
            stock: self.stock,
        }
    }
}

/// Largest price, charge, percent or roll length accepted from a client.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000);

pub(crate) fn validate_amount(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("must not be negative".into());
        return Err(err);
    }
    if *value > MAX_AMOUNT {
        let mut err = ValidationError::new("amount_too_large");
        err.message = Some(format!("must not exceed {}", MAX_AMOUNT).into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roll_input_mints_missing_ids() {
        let roll = PpfRollInput {
            id: None,
            name: "Roll 1".into(),
            stock: dec!(120),
        }
        .into_roll();
        assert_eq!(roll.name, "Roll 1");
        assert_ne!(roll.id, Uuid::nil());

        let id = Uuid::new_v4();
        let kept = PpfRollInput {
            id: Some(id),
            name: "Roll 2".into(),
            stock: dec!(10),
        }
        .into_roll();
        assert_eq!(kept.id, id);
    }

    #[test]
    fn negative_values_fail_validation() {
        assert!(validate_amount(&dec!(-1)).is_err());
        assert!(validate_amount(&dec!(0)).is_ok());
        assert!(validate_amount(&dec!(12.5)).is_ok());
    }

    #[test]
    fn amounts_above_the_cap_fail_validation() {
        assert!(validate_amount(&MAX_AMOUNT).is_ok());
        assert!(validate_amount(&(MAX_AMOUNT + dec!(0.01))).is_err());
        assert!(validate_amount(&Decimal::MAX).is_err());
    }

    #[test]
    fn total_stock_sums_rolls() {
        let rolls = PpfRolls(vec![
            PpfRoll {
                id: Uuid::new_v4(),
                name: "A".into(),
                stock: dec!(40),
            },
            PpfRoll {
                id: Uuid::new_v4(),
                name: "B".into(),
                stock: dec!(2.5),
            },
        ]);
        assert_eq!(rolls.total_stock(), dec!(42.5));
    }

    #[test]
    fn pricing_rows_serialize_as_plain_arrays() {
        let prices = VehiclePrices(vec![VehiclePrice {
            vehicle_type: "SUV".into(),
            price: dec!(1000),
        }]);
        let value = serde_json::to_value(&prices).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["vehicle_type"], "SUV");
    }
}
