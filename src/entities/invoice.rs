use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::InvoiceItems;

/// Invoice generated from a completed job card
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = Invoice)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub invoice_no: String,
    #[sea_orm(unique)]
    pub job_card_id: Uuid,
    pub job_no: String,
    pub business: String,
    pub customer_name: String,
    pub phone_number: String,
    pub vehicle_info: String,
    #[sea_orm(column_type = "Json")]
    pub items: InvoiceItems,
    pub labor_charge: Decimal,
    pub discount: Decimal,
    pub subtotal: Decimal,
    pub gst: Decimal,
    pub gst_amount: Decimal,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::job_card::Entity",
        from = "Column::JobCardId",
        to = "super::job_card::Column::Id"
    )]
    JobCard,
}

impl Related<super::job_card::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobCard.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
