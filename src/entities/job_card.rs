use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{entity::prelude::*, ActiveValue::Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{AccessoryLines, PpfLines, ServiceLines};

/// Lifecycle of a job card. Transitions are unrestricted.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    DeriveActiveEnum,
    ToSchema,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum JobStatus {
    #[default]
    #[sea_orm(string_value = "Pending")]
    Pending,
    #[sea_orm(string_value = "In Progress")]
    #[serde(rename = "In Progress")]
    #[strum(serialize = "In Progress")]
    InProgress,
    #[sea_orm(string_value = "Completed")]
    Completed,
    #[sea_orm(string_value = "Cancelled")]
    Cancelled,
}

impl JobStatus {
    /// Pending and in-progress jobs count as active work.
    pub fn is_active(self) -> bool {
        matches!(self, JobStatus::Pending | JobStatus::InProgress)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = JobCard)]
#[sea_orm(table_name = "job_cards")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub job_no: String,
    pub customer_name: String,
    pub phone_number: String,
    pub email_address: Option<String>,
    pub referral_source: String,
    pub referrer_name: Option<String>,
    pub referrer_phone: Option<String>,
    pub make: String,
    pub model: String,
    pub year: String,
    pub license_plate: String,
    pub vin: Option<String>,
    pub vehicle_type: Option<String>,
    #[sea_orm(column_type = "Json")]
    pub services: ServiceLines,
    #[sea_orm(column_type = "Json")]
    pub ppfs: PpfLines,
    #[sea_orm(column_type = "Json")]
    pub accessories: AccessoryLines,
    pub labor_charge: Decimal,
    pub discount: Decimal,
    pub gst: Decimal,
    pub service_notes: Option<String>,
    pub status: JobStatus,
    pub technician: Option<String>,
    pub estimated_cost: Decimal,
    pub date: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Model {
    pub fn vehicle_info(&self) -> String {
        format!(
            "{} {} {} ({})",
            self.year, self.make, self.model, self.license_plate
        )
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;
        let now = Utc::now();

        if insert {
            active_model.date = Set(now);
        }
        active_model.updated_at = Set(Some(now));

        Ok(active_model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_progress_uses_spaced_wire_name() {
        assert_eq!(
            serde_json::to_value(JobStatus::InProgress).unwrap(),
            serde_json::json!("In Progress")
        );
        assert_eq!(JobStatus::InProgress.to_string(), "In Progress");
        let parsed: JobStatus = serde_json::from_value(serde_json::json!("Completed")).unwrap();
        assert_eq!(parsed, JobStatus::Completed);
    }

    #[test]
    fn only_pending_and_in_progress_are_active() {
        assert!(JobStatus::Pending.is_active());
        assert!(JobStatus::InProgress.is_active());
        assert!(!JobStatus::Completed.is_active());
        assert!(!JobStatus::Cancelled.is_active());
    }
}
