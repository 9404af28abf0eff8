//! Line-item snapshots embedded in job cards, inquiries and invoices.
//!
//! A snapshot copies the name and price at the time of the write; later
//! edits to master data never reach an existing record.

use rust_decimal::Decimal;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ServiceLine {
    pub id: Uuid,
    #[schema(example = "Ceramic Coating")]
    pub name: String,
    #[schema(value_type = String, example = "1000")]
    pub price: Decimal,
}

#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema,
)]
pub struct ServiceLines(pub Vec<ServiceLine>);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PpfLine {
    pub id: Uuid,
    #[schema(example = "Gloss PPF")]
    pub name: String,
    #[schema(value_type = String, example = "45000")]
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warranty_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub roll_used: Option<Decimal>,
}

#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema,
)]
pub struct PpfLines(pub Vec<PpfLine>);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AccessoryLine {
    pub id: Uuid,
    #[schema(example = "Floor Mats")]
    pub name: String,
    /// Unit price
    #[schema(value_type = String, example = "500")]
    pub price: Decimal,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

impl AccessoryLine {
    /// `price * quantity`, `None` on overflow.
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

pub(crate) fn default_quantity() -> u32 {
    1
}

#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema,
)]
pub struct AccessoryLines(pub Vec<AccessoryLine>);

/// Prospective service on an inquiry, carrying both cost and quote
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct InquiryServiceLine {
    pub service_id: Uuid,
    pub service_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warranty_name: Option<String>,
    #[schema(value_type = String)]
    pub price: Decimal,
    #[schema(value_type = String)]
    pub customer_price: Decimal,
}

#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema,
)]
pub struct InquiryServiceLines(pub Vec<InquiryServiceLine>);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct InquiryAccessoryLine {
    pub accessory_id: Uuid,
    pub accessory_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[schema(value_type = String)]
    pub price: Decimal,
    #[schema(value_type = String)]
    pub customer_price: Decimal,
}

#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema,
)]
pub struct InquiryAccessoryLines(pub Vec<InquiryAccessoryLine>);

/// Printed invoice row; `price` is the line total
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct InvoiceItem {
    #[schema(example = "Floor Mats x 2")]
    pub name: String,
    #[schema(value_type = String, example = "1000")]
    pub price: Decimal,
}

#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema,
)]
pub struct InvoiceItems(pub Vec<InvoiceItem>);

impl InvoiceItems {
    /// Flattens job-card snapshots into printable rows, services first.
    /// `None` when an accessory line total overflows.
    pub fn from_snapshots(
        services: &ServiceLines,
        ppfs: &PpfLines,
        accessories: &AccessoryLines,
    ) -> Option<Self> {
        let mut items = Vec::with_capacity(services.0.len() + ppfs.0.len() + accessories.0.len());
        items.extend(services.0.iter().map(|s| InvoiceItem {
            name: s.name.clone(),
            price: s.price,
        }));
        items.extend(ppfs.0.iter().map(|p| InvoiceItem {
            name: match &p.warranty_name {
                Some(warranty) => format!("{} ({})", p.name, warranty),
                None => p.name.clone(),
            },
            price: p.price,
        }));
        for a in &accessories.0 {
            items.push(InvoiceItem {
                name: if a.quantity > 1 {
                    format!("{} x {}", a.name, a.quantity)
                } else {
                    a.name.clone()
                },
                price: a.line_total()?,
            });
        }
        Some(Self(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn accessory_quantity_defaults_to_one() {
        let line: AccessoryLine = serde_json::from_value(serde_json::json!({
            "id": Uuid::nil(),
            "name": "Mud Flaps",
            "price": "250"
        }))
        .unwrap();
        assert_eq!(line.quantity, 1);
        assert_eq!(line.line_total(), Some(dec!(250)));
    }

    #[test]
    fn invoice_items_flatten_in_order() {
        let services = ServiceLines(vec![ServiceLine {
            id: Uuid::new_v4(),
            name: "Wash".into(),
            price: dec!(300),
        }]);
        let ppfs = PpfLines(vec![PpfLine {
            id: Uuid::new_v4(),
            name: "Matte PPF".into(),
            price: dec!(40000),
            warranty_name: Some("3 Years".into()),
            roll_id: None,
            roll_used: None,
        }]);
        let accessories = AccessoryLines(vec![AccessoryLine {
            id: Uuid::new_v4(),
            name: "Floor Mats".into(),
            price: dec!(500),
            quantity: 2,
        }]);

        let items = InvoiceItems::from_snapshots(&services, &ppfs, &accessories).unwrap();
        let names: Vec<_> = items.0.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Wash", "Matte PPF (3 Years)", "Floor Mats x 2"]);
        assert_eq!(items.0[2].price, dec!(1000));
    }

    #[test]
    fn overflowing_line_total_is_none() {
        let line = AccessoryLine {
            id: Uuid::nil(),
            name: "Mats".into(),
            price: Decimal::MAX,
            quantity: 2,
        };
        assert_eq!(line.line_total(), None);
    }
}
