/*!
 * Job-card pricing.
 *
 * ```text
 * subtotal       = sum(line items) + labor
 * after_discount = subtotal - discount          (not clamped)
 * tax            = after_discount * gst / 100
 * total          = floor(after_discount + tax + 0.5)
 * ```
 *
 * Accessory lines contribute `price * quantity`. The rounding is half-up
 * toward positive infinity, so `-0.5` rounds to `0`.
 */

use crate::errors::ServiceError;
use crate::models::{
    AccessoryLines, PpfLines, PpfVehiclePricing, ServiceLines, VehiclePrice, WarrantyOption,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Every figure derived from a set of line items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PriceBreakdown {
    #[schema(value_type = String, example = "1700")]
    pub subtotal: Decimal,
    #[schema(value_type = String, example = "1600")]
    pub after_discount: Decimal,
    #[schema(value_type = String, example = "288")]
    pub tax: Decimal,
    #[schema(value_type = String, example = "1888")]
    pub total: Decimal,
}

/// Rounds half-up toward positive infinity; `None` when the value sits
/// within a half of `Decimal::MAX`.
pub fn round_half_up(value: Decimal) -> Option<Decimal> {
    value.checked_add(dec!(0.5)).map(|v| v.floor())
}

/// Raised when an intermediate figure leaves the `Decimal` range.
pub fn out_of_range() -> ServiceError {
    ServiceError::InvalidInput("Amounts are too large to price".into())
}

pub fn calculate<I>(
    line_prices: I,
    labor_charge: Decimal,
    discount: Decimal,
    gst_percent: Decimal,
) -> Result<PriceBreakdown, ServiceError>
where
    I: IntoIterator<Item = Decimal>,
{
    let subtotal = line_prices
        .into_iter()
        .try_fold(labor_charge, |acc, price| acc.checked_add(price))
        .ok_or_else(out_of_range)?;
    let after_discount = subtotal.checked_sub(discount).ok_or_else(out_of_range)?;
    let tax = after_discount
        .checked_mul(gst_percent)
        .and_then(|t| t.checked_div(dec!(100)))
        .ok_or_else(out_of_range)?;
    let total = after_discount
        .checked_add(tax)
        .and_then(round_half_up)
        .ok_or_else(out_of_range)?;

    Ok(PriceBreakdown {
        subtotal,
        after_discount,
        tax,
        total,
    })
}

/// Line prices of a job card's snapshots, accessories multiplied out.
/// `None` marks an accessory line whose total overflows.
pub fn snapshot_prices<'a>(
    services: &'a ServiceLines,
    ppfs: &'a PpfLines,
    accessories: &'a AccessoryLines,
) -> impl Iterator<Item = Option<Decimal>> + 'a {
    services
        .0
        .iter()
        .map(|s| Some(s.price))
        .chain(ppfs.0.iter().map(|p| Some(p.price)))
        .chain(accessories.0.iter().map(|a| a.line_total()))
}

pub fn price_job(
    services: &ServiceLines,
    ppfs: &PpfLines,
    accessories: &AccessoryLines,
    labor_charge: Decimal,
    discount: Decimal,
    gst_percent: Decimal,
) -> Result<PriceBreakdown, ServiceError> {
    let lines = snapshot_prices(services, ppfs, accessories)
        .collect::<Option<Vec<_>>>()
        .ok_or_else(out_of_range)?;
    calculate(lines, labor_charge, discount, gst_percent)
}

/// Price row for a vehicle type; first match wins.
pub fn vehicle_price<'a>(rows: &'a [VehiclePrice], vehicle_type: &str) -> Option<&'a VehiclePrice> {
    rows.iter().find(|row| row.vehicle_type == vehicle_type)
}

/// PPF pricing row for a vehicle type; first match wins.
pub fn ppf_vehicle_pricing<'a>(
    rows: &'a [PpfVehiclePricing],
    vehicle_type: &str,
) -> Option<&'a PpfVehiclePricing> {
    rows.iter().find(|row| row.vehicle_type == vehicle_type)
}

pub fn warranty_option<'a>(
    options: &'a [WarrantyOption],
    warranty_name: &str,
) -> Option<&'a WarrantyOption> {
    options.iter().find(|opt| opt.warranty_name == warranty_name)
}

/// Resolves a PPF price for a vehicle type and warranty tier.
pub fn ppf_price(
    rows: &[PpfVehiclePricing],
    vehicle_type: &str,
    warranty_name: &str,
) -> Option<Decimal> {
    ppf_vehicle_pricing(rows, vehicle_type)
        .and_then(|row| warranty_option(&row.options, warranty_name))
        .map(|opt| opt.price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccessoryLine, PpfLine, ServiceLine};
    use assert_matches::assert_matches;
    use uuid::Uuid;

    #[test]
    fn worked_example_with_discount_and_gst() {
        let breakdown = calculate([dec!(1000), dec!(500)], dec!(200), dec!(100), dec!(18)).unwrap();
        assert_eq!(breakdown.subtotal, dec!(1700));
        assert_eq!(breakdown.after_discount, dec!(1600));
        assert_eq!(breakdown.tax, dec!(288));
        assert_eq!(breakdown.total, dec!(1888));
    }

    #[test]
    fn discount_larger_than_subtotal_is_not_clamped() {
        let breakdown = calculate([dec!(1000), dec!(500)], dec!(200), dec!(2000), dec!(18)).unwrap();
        assert_eq!(breakdown.after_discount, dec!(-300));
        assert_eq!(breakdown.tax, dec!(-54));
        assert_eq!(breakdown.total, dec!(-354));
    }

    #[test]
    fn empty_job_costs_nothing() {
        let breakdown = calculate(Vec::new(), Decimal::ZERO, Decimal::ZERO, dec!(18)).unwrap();
        assert_eq!(breakdown.total, Decimal::ZERO);
    }

    #[test]
    fn rounding_is_half_up_toward_positive_infinity() {
        assert_eq!(round_half_up(dec!(10.5)), Some(dec!(11)));
        assert_eq!(round_half_up(dec!(10.49)), Some(dec!(10)));
        assert_eq!(round_half_up(dec!(-0.5)), Some(dec!(0)));
        assert_eq!(round_half_up(dec!(-1.5)), Some(dec!(-1)));
        assert_eq!(round_half_up(dec!(-1.51)), Some(dec!(-2)));
    }

    #[test]
    fn fractional_gst_rounds_total() {
        // 999 * 1.18 = 1178.82
        let breakdown = calculate([dec!(999)], Decimal::ZERO, Decimal::ZERO, dec!(18)).unwrap();
        assert_eq!(breakdown.tax, dec!(179.82));
        assert_eq!(breakdown.total, dec!(1179));
    }

    #[test]
    fn accessories_are_multiplied_by_quantity() {
        let services = ServiceLines(vec![ServiceLine {
            id: Uuid::new_v4(),
            name: "Interior Detailing".into(),
            price: dec!(1000),
        }]);
        let ppfs = PpfLines(vec![PpfLine {
            id: Uuid::new_v4(),
            name: "Gloss".into(),
            price: dec!(2000),
            warranty_name: Some("5 Years".into()),
            roll_id: None,
            roll_used: None,
        }]);
        let accessories = AccessoryLines(vec![AccessoryLine {
            id: Uuid::new_v4(),
            name: "Mats".into(),
            price: dec!(250),
            quantity: 2,
        }]);

        let breakdown = price_job(
            &services,
            &ppfs,
            &accessories,
            dec!(0),
            dec!(0),
            dec!(0),
        )
        .unwrap();
        assert_eq!(breakdown.subtotal, dec!(3500));
        assert_eq!(breakdown.total, dec!(3500));
    }

    #[test]
    fn overflowing_amounts_are_rejected() {
        assert_matches!(
            calculate(Vec::new(), Decimal::MAX, Decimal::ZERO, dec!(18)),
            Err(ServiceError::InvalidInput(_))
        );
        assert_matches!(
            calculate([Decimal::MAX], Decimal::ONE, Decimal::ZERO, Decimal::ZERO),
            Err(ServiceError::InvalidInput(_))
        );
        assert_matches!(
            calculate(Vec::new(), dec!(70000000000000000000000000000), Decimal::ZERO, dec!(18)),
            Err(ServiceError::InvalidInput(_))
        );

        let accessories = AccessoryLines(vec![AccessoryLine {
            id: Uuid::new_v4(),
            name: "Mats".into(),
            price: Decimal::MAX,
            quantity: 2,
        }]);
        assert_matches!(
            price_job(
                &ServiceLines::default(),
                &PpfLines::default(),
                &accessories,
                Decimal::ZERO,
                Decimal::ZERO,
                Decimal::ZERO,
            ),
            Err(ServiceError::InvalidInput(_))
        );
    }

    #[test]
    fn lookups_take_the_first_exact_match() {
        let rows = vec![
            VehiclePrice {
                vehicle_type: "SUV".into(),
                price: dec!(1500),
            },
            VehiclePrice {
                vehicle_type: "SUV".into(),
                price: dec!(9999),
            },
            VehiclePrice {
                vehicle_type: "Sedan".into(),
                price: dec!(1000),
            },
        ];
        assert_eq!(vehicle_price(&rows, "SUV").map(|r| r.price), Some(dec!(1500)));
        assert!(vehicle_price(&rows, "suv").is_none());
        assert!(vehicle_price(&rows, "Hatchback").is_none());
    }

    #[test]
    fn ppf_price_walks_vehicle_then_warranty() {
        let rows = vec![PpfVehiclePricing {
            vehicle_type: "Sedan".into(),
            options: vec![
                WarrantyOption {
                    warranty_name: "3 Years".into(),
                    price: dec!(30000),
                },
                WarrantyOption {
                    warranty_name: "5 Years".into(),
                    price: dec!(45000),
                },
            ],
        }];
        assert_eq!(ppf_price(&rows, "Sedan", "5 Years"), Some(dec!(45000)));
        assert_eq!(ppf_price(&rows, "Sedan", "10 Years"), None);
        assert_eq!(ppf_price(&rows, "SUV", "5 Years"), None);
    }
}
