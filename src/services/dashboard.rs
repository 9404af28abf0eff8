use crate::{
    db::DbPool,
    entities::{
        inquiry, invoice,
        job_card::{self, JobStatus},
        ppf_master,
    },
    errors::ServiceError,
    tracing::with_timing,
};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{EntityTrait, Iterable};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

const TREND_DAYS: i64 = 7;
const CUSTOMER_WEEKS: i64 = 4;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DashboardSnapshot {
    /// Sum of invoice totals issued today (UTC)
    #[schema(value_type = String)]
    pub todays_sales: Decimal,
    /// Pending and in-progress job cards
    pub active_service_jobs: u64,
    pub inquiries_today: u64,
    /// Distinct job-card phone numbers
    pub total_customers: u64,
    pub sales_trend: Vec<DailySales>,
    pub job_status_counts: Vec<StatusCount>,
    pub weekly_new_customers: Vec<WeeklyCustomers>,
    pub ppf_stock: Vec<PpfStock>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DailySales {
    #[schema(example = "Mon")]
    pub day: String,
    pub date: NaiveDate,
    #[schema(value_type = String)]
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StatusCount {
    pub status: JobStatus,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct WeeklyCustomers {
    #[schema(example = "Week 4")]
    pub week: String,
    pub week_start: NaiveDate,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PpfStock {
    pub ppf_id: Uuid,
    pub name: String,
    pub rolls: usize,
    #[schema(value_type = String)]
    pub total_stock: Decimal,
}

/// Read-only aggregates over the stored records
#[derive(Clone)]
pub struct DashboardService {
    db_pool: Arc<DbPool>,
}

impl DashboardService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn snapshot(&self) -> Result<DashboardSnapshot, ServiceError> {
        let db = &*self.db_pool;
        with_timing("dashboard_snapshot", || async {
            let invoices = invoice::Entity::find()
                .all(db)
                .await
                .map_err(ServiceError::db_error)?;
            let jobs = job_card::Entity::find()
                .all(db)
                .await
                .map_err(ServiceError::db_error)?;
            let inquiries = inquiry::Entity::find()
                .all(db)
                .await
                .map_err(ServiceError::db_error)?;
            let ppfs = ppf_master::Entity::find()
                .all(db)
                .await
                .map_err(ServiceError::db_error)?;

            Ok::<_, ServiceError>(build_snapshot(
                Utc::now(),
                &invoices,
                &jobs,
                &inquiries,
                &ppfs,
            ))
        })
        .await
    }
}

pub fn build_snapshot(
    now: DateTime<Utc>,
    invoices: &[invoice::Model],
    jobs: &[job_card::Model],
    inquiries: &[inquiry::Model],
    ppfs: &[ppf_master::Model],
) -> DashboardSnapshot {
    let today = now.date_naive();

    let mut daily: HashMap<NaiveDate, Decimal> = HashMap::new();
    for inv in invoices {
        *daily.entry(inv.created_at.date_naive()).or_default() += inv.total;
    }
    let sales_trend = (0..TREND_DAYS)
        .rev()
        .map(|back| {
            let date = today - Duration::days(back);
            DailySales {
                day: date.format("%a").to_string(),
                date,
                amount: daily.get(&date).copied().unwrap_or_default(),
            }
        })
        .collect();

    let job_status_counts = JobStatus::iter()
        .map(|status| StatusCount {
            status,
            count: jobs.iter().filter(|j| j.status == status).count() as u64,
        })
        .collect();

    // first visit per customer, keyed by phone number
    let mut first_seen: HashMap<&str, NaiveDate> = HashMap::new();
    for job in jobs {
        let date = job.date.date_naive();
        first_seen
            .entry(job.phone_number.as_str())
            .and_modify(|d| *d = (*d).min(date))
            .or_insert(date);
    }
    let weekly_new_customers = (0..CUSTOMER_WEEKS)
        .rev()
        .enumerate()
        .map(|(index, back)| {
            let end = today - Duration::days(7 * back);
            let start = end - Duration::days(6);
            WeeklyCustomers {
                week: format!("Week {}", index + 1),
                week_start: start,
                count: first_seen
                    .values()
                    .filter(|d| **d >= start && **d <= end)
                    .count() as u64,
            }
        })
        .collect();

    let ppf_stock = ppfs
        .iter()
        .map(|p| PpfStock {
            ppf_id: p.id,
            name: p.name.clone(),
            rolls: p.rolls.0.len(),
            total_stock: p.rolls.total_stock(),
        })
        .collect();

    DashboardSnapshot {
        todays_sales: daily.get(&today).copied().unwrap_or_default(),
        active_service_jobs: jobs.iter().filter(|j| j.status.is_active()).count() as u64,
        inquiries_today: inquiries
            .iter()
            .filter(|i| i.date.date_naive() == today)
            .count() as u64,
        total_customers: first_seen.len() as u64,
        sales_trend,
        job_status_counts,
        weekly_new_customers,
        ppf_stock,
    }
}
