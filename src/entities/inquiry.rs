use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{InquiryAccessoryLines, InquiryServiceLines};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = Inquiry)]
#[sea_orm(table_name = "inquiries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Display id, `INQ-<unix millis>`
    pub inquiry_id: String,
    pub customer_name: String,
    pub phone: String,
    pub email: Option<String>,
    #[sea_orm(column_type = "Json")]
    pub services: InquiryServiceLines,
    #[sea_orm(column_type = "Json")]
    pub accessories: InquiryAccessoryLines,
    pub notes: Option<String>,
    pub our_price: Decimal,
    pub customer_price: Decimal,
    pub date: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
