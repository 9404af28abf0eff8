use crate::{
    db::DbPool,
    entities::{
        invoice,
        job_card::{self, JobStatus},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    models::InvoiceItems,
    pricing,
    services::sequences::{self, INVOICE_SEQUENCE},
};
use chrono::{Datelike, Utc};
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use slog::Logger;
use std::sync::Arc;
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[schema(example = json!({"business": "AGNX"}))]
pub struct GenerateInvoiceRequest {
    /// Issuing business; the configured default applies when omitted
    #[validate(length(min = 1, max = 100))]
    pub business: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InvoiceFilter {
    /// Substring of invoice number, customer name or job number
    pub search: Option<String>,
    pub business: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InvoiceList {
    pub invoices: Vec<invoice::Model>,
    pub count: usize,
    /// Sum of `total` over the returned invoices
    #[schema(value_type = String, example = "25488")]
    pub total_amount: Decimal,
}

/// Read-only invoices projected from completed job cards
#[derive(Clone)]
pub struct InvoiceService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    default_business: String,
    logger: Logger,
}

impl InvoiceService {
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
        default_business: String,
        logger: Logger,
    ) -> Self {
        Self {
            db_pool,
            event_sender,
            default_business,
            logger,
        }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, filter: InvoiceFilter) -> Result<InvoiceList, ServiceError> {
        let mut query = invoice::Entity::find();
        if let Some(term) = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            query = query.filter(
                Condition::any()
                    .add(invoice::Column::InvoiceNo.contains(term))
                    .add(invoice::Column::CustomerName.contains(term))
                    .add(invoice::Column::JobNo.contains(term)),
            );
        }
        if let Some(business) = filter.business.filter(|b| !b.is_empty()) {
            query = query.filter(invoice::Column::Business.eq(business));
        }

        let invoices = query
            .order_by_desc(invoice::Column::CreatedAt)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?;
        let total_amount = invoices.iter().map(|i| i.total).sum();

        Ok(InvoiceList {
            count: invoices.len(),
            total_amount,
            invoices,
        })
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<invoice::Model, ServiceError> {
        invoice::Entity::find_by_id(id)
            .one(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::not_found("Invoice", id))
    }

    /// Issues the invoice for a completed job card. A job card gets at most
    /// one invoice.
    #[instrument(skip(self, request))]
    pub async fn generate(
        &self,
        job_card_id: Uuid,
        request: GenerateInvoiceRequest,
    ) -> Result<invoice::Model, ServiceError> {
        request.validate()?;

        let txn = self.db_pool.begin().await.map_err(ServiceError::db_error)?;

        let job = job_card::Entity::find_by_id(job_card_id)
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::not_found("Job card", job_card_id))?;

        if job.status != JobStatus::Completed {
            return Err(ServiceError::InvalidStatus(format!(
                "Job card {} is {}; only completed jobs can be invoiced",
                job.job_no, job.status
            )));
        }

        let already = invoice::Entity::find()
            .filter(invoice::Column::JobCardId.eq(job_card_id))
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?;
        if let Some(existing) = already {
            return Err(ServiceError::Conflict(format!(
                "Job card {} already invoiced as {}",
                job.job_no, existing.invoice_no
            )));
        }

        let breakdown = pricing::price_job(
            &job.services,
            &job.ppfs,
            &job.accessories,
            job.labor_charge,
            job.discount,
            job.gst,
        )?;
        let items = InvoiceItems::from_snapshots(&job.services, &job.ppfs, &job.accessories)
            .ok_or_else(pricing::out_of_range)?;

        let now = Utc::now();
        let seq = sequences::next_value(&txn, INVOICE_SEQUENCE, now.year()).await?;

        let model = invoice::ActiveModel {
            id: Set(Uuid::new_v4()),
            invoice_no: Set(sequences::format_invoice_no(now.year(), seq)),
            job_card_id: Set(job.id),
            job_no: Set(job.job_no.clone()),
            business: Set(request
                .business
                .unwrap_or_else(|| self.default_business.clone())),
            customer_name: Set(job.customer_name.clone()),
            phone_number: Set(job.phone_number.clone()),
            vehicle_info: Set(job.vehicle_info()),
            items: Set(items),
            labor_charge: Set(job.labor_charge),
            discount: Set(job.discount),
            subtotal: Set(breakdown.subtotal),
            gst: Set(job.gst),
            gst_amount: Set(breakdown.tax.round_dp(2)),
            total: Set(breakdown.total),
            created_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(ServiceError::db_error)?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        counter!("autogarage_invoices_generated_total", 1, "business" => model.business.clone());
        slog::info!(self.logger, "invoice generated";
            "invoice_no" => &model.invoice_no, "job_no" => &model.job_no, "total" => %model.total);
        self.event_sender
            .send_or_log(Event::InvoiceGenerated {
                id: model.id,
                invoice_no: model.invoice_no.clone(),
                total: model.total,
            })
            .await;

        Ok(model)
    }
}
