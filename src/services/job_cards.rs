use crate::{
    db::DbPool,
    entities::{
        accessory_master,
        job_card::{self, JobStatus},
        ppf_master, service_master,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    models::{
        line_items::default_quantity, AccessoryLine, AccessoryLines, PpfLine, PpfLines, PpfRolls,
        ServiceLine, ServiceLines,
    },
    pricing,
    services::sequences::{self, JOB_CARD_SEQUENCE},
};
use chrono::{Datelike, Utc};
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use slog::Logger;
use std::{collections::BTreeMap, sync::Arc};
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::pricing_rows::validate_amount;

/// A line item as submitted by the client.
///
/// Only `id` is required; a missing name or price is filled from the master
/// record, priced for the job card's vehicle type.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct LineItemInput {
    pub id: Uuid,
    pub name: Option<String>,
    #[schema(value_type = Option<String>)]
    #[validate(custom = "validate_amount")]
    pub price: Option<Decimal>,
    /// PPF only: warranty tier used to look up the price
    pub warranty_name: Option<String>,
    /// Accessories only, defaults to 1
    #[validate(range(min = 1, max = 10000))]
    pub quantity: Option<u32>,
    /// PPF only: roll the film was cut from
    pub roll_id: Option<Uuid>,
    #[schema(value_type = Option<String>)]
    #[validate(custom = "validate_amount")]
    pub roll_used: Option<Decimal>,
}

fn validate_line_items(items: &Vec<LineItemInput>) -> Result<(), ValidationError> {
    if items.iter().any(|item| item.validate().is_err()) {
        return Err(ValidationError::new("invalid_line_item"));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "snake_case")]
#[schema(example = json!({
    "customer_name": "Arjun Mehta",
    "phone_number": "9876543210",
    "referral_source": "Google",
    "make": "Hyundai",
    "model": "Creta",
    "year": "2023",
    "license_plate": "MH12AB1234",
    "vehicle_type": "SUV",
    "services": [{"id": "3fa85f64-5717-4562-b3fc-2c963f66afa6"}],
    "labor_charge": "200",
    "discount": "100",
    "gst": "18"
}))]
pub struct CreateJobCardRequest {
    #[validate(length(min = 1, max = 200))]
    pub customer_name: String,
    #[validate(length(min = 1, max = 32))]
    pub phone_number: String,
    #[validate(email)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub referral_source: String,
    pub referrer_name: Option<String>,
    pub referrer_phone: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub make: String,
    #[validate(length(min = 1, max = 100))]
    pub model: String,
    #[validate(length(min = 1, max = 8))]
    pub year: String,
    #[validate(length(min = 1, max = 32))]
    pub license_plate: String,
    pub vin: Option<String>,
    pub vehicle_type: Option<String>,
    #[serde(default)]
    #[validate(custom = "validate_line_items")]
    pub services: Vec<LineItemInput>,
    #[serde(default)]
    #[validate(custom = "validate_line_items")]
    pub ppfs: Vec<LineItemInput>,
    #[serde(default)]
    #[validate(custom = "validate_line_items")]
    pub accessories: Vec<LineItemInput>,
    #[serde(default)]
    #[schema(value_type = String)]
    #[validate(custom = "validate_amount")]
    pub labor_charge: Decimal,
    #[serde(default)]
    #[schema(value_type = String)]
    #[validate(custom = "validate_amount")]
    pub discount: Decimal,
    /// Percent; the configured default applies when omitted
    #[schema(value_type = Option<String>)]
    #[validate(custom = "validate_amount")]
    pub gst: Option<Decimal>,
    pub service_notes: Option<String>,
    pub status: Option<JobStatus>,
    pub technician: Option<String>,
}

/// Partial update; line-item lists replace the stored snapshots wholesale.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateJobCardRequest {
    #[validate(length(min = 1, max = 200))]
    pub customer_name: Option<String>,
    #[validate(length(min = 1, max = 32))]
    pub phone_number: Option<String>,
    #[validate(email)]
    pub email_address: Option<String>,
    pub referral_source: Option<String>,
    pub referrer_name: Option<String>,
    pub referrer_phone: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub make: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub model: Option<String>,
    #[validate(length(min = 1, max = 8))]
    pub year: Option<String>,
    #[validate(length(min = 1, max = 32))]
    pub license_plate: Option<String>,
    pub vin: Option<String>,
    pub vehicle_type: Option<String>,
    #[validate(custom = "validate_line_items")]
    pub services: Option<Vec<LineItemInput>>,
    #[validate(custom = "validate_line_items")]
    pub ppfs: Option<Vec<LineItemInput>>,
    #[validate(custom = "validate_line_items")]
    pub accessories: Option<Vec<LineItemInput>>,
    #[schema(value_type = Option<String>)]
    #[validate(custom = "validate_amount")]
    pub labor_charge: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    #[validate(custom = "validate_amount")]
    pub discount: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    #[validate(custom = "validate_amount")]
    pub gst: Option<Decimal>,
    pub service_notes: Option<String>,
    pub status: Option<JobStatus>,
    pub technician: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct JobCardFilter {
    pub status: Option<JobStatus>,
    /// Matches job number, customer name, phone or licence plate
    pub search: Option<String>,
}

/// Job cards: numbering, line-item snapshots, PPF roll stock and totals.
#[derive(Clone)]
pub struct JobCardService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    default_gst: Decimal,
    logger: Logger,
}

impl JobCardService {
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
        default_gst: Decimal,
        logger: Logger,
    ) -> Self {
        Self {
            db_pool,
            event_sender,
            default_gst,
            logger,
        }
    }

    /// Newest first.
    #[instrument(skip(self))]
    pub async fn list(&self, filter: JobCardFilter) -> Result<Vec<job_card::Model>, ServiceError> {
        let mut query = job_card::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(job_card::Column::Status.eq(status));
        }
        if let Some(term) = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            query = query.filter(
                Condition::any()
                    .add(job_card::Column::JobNo.contains(term))
                    .add(job_card::Column::CustomerName.contains(term))
                    .add(job_card::Column::PhoneNumber.contains(term))
                    .add(job_card::Column::LicensePlate.contains(term)),
            );
        }
        query
            .order_by_desc(job_card::Column::Date)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<job_card::Model, ServiceError> {
        job_card::Entity::find_by_id(id)
            .one(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::not_found("Job card", id))
    }

    /// Numbers the card, snapshots its line items and consumes roll stock in
    /// one transaction.
    #[instrument(skip(self, request), fields(customer = %request.customer_name))]
    pub async fn create(
        &self,
        request: CreateJobCardRequest,
    ) -> Result<job_card::Model, ServiceError> {
        request.validate()?;

        let vehicle_type = request.vehicle_type.clone();
        let gst = request.gst.unwrap_or(self.default_gst);
        let now = Utc::now();

        let txn = self.db_pool.begin().await.map_err(ServiceError::db_error)?;

        let services = resolve_services(&txn, request.services, vehicle_type.as_deref()).await?;
        let ppfs = resolve_ppfs(&txn, request.ppfs, vehicle_type.as_deref()).await?;
        let accessories = resolve_accessories(&txn, request.accessories).await?;
        let roll_events = apply_roll_usage(&txn, &PpfLines::default(), &ppfs).await?;

        let breakdown = pricing::price_job(
            &services,
            &ppfs,
            &accessories,
            request.labor_charge,
            request.discount,
            gst,
        )?;

        let seq = sequences::next_value(&txn, JOB_CARD_SEQUENCE, now.year()).await?;
        let job_no = sequences::format_job_no(now.year(), seq);

        let model = job_card::ActiveModel {
            id: Set(Uuid::new_v4()),
            job_no: Set(job_no),
            customer_name: Set(request.customer_name.trim().to_string()),
            phone_number: Set(request.phone_number.trim().to_string()),
            email_address: Set(request.email_address),
            referral_source: Set(request.referral_source),
            referrer_name: Set(request.referrer_name),
            referrer_phone: Set(request.referrer_phone),
            make: Set(request.make),
            model: Set(request.model),
            year: Set(request.year),
            license_plate: Set(request.license_plate),
            vin: Set(request.vin),
            vehicle_type: Set(vehicle_type),
            services: Set(services),
            ppfs: Set(ppfs),
            accessories: Set(accessories),
            labor_charge: Set(request.labor_charge),
            discount: Set(request.discount),
            gst: Set(gst),
            service_notes: Set(request.service_notes),
            status: Set(request.status.unwrap_or_default()),
            technician: Set(request.technician),
            estimated_cost: Set(breakdown.total),
            date: Set(now),
            updated_at: Set(None),
        }
        .insert(&txn)
        .await
        .map_err(ServiceError::db_error)?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        counter!("autogarage_job_cards_created_total", 1);
        slog::info!(self.logger, "job card created";
            "id" => %model.id, "job_no" => &model.job_no, "estimated_cost" => %model.estimated_cost);

        self.event_sender
            .send_or_log(Event::JobCardCreated {
                id: model.id,
                job_no: model.job_no.clone(),
                estimated_cost: model.estimated_cost,
            })
            .await;
        for event in roll_events {
            self.event_sender.send_or_log(event).await;
        }

        Ok(model)
    }

    /// Merges the request into the stored card and recomputes its total.
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateJobCardRequest,
    ) -> Result<job_card::Model, ServiceError> {
        request.validate()?;

        let txn = self.db_pool.begin().await.map_err(ServiceError::db_error)?;

        let existing = job_card::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::not_found("Job card", id))?;

        let old_status = existing.status;
        let vehicle_type = request
            .vehicle_type
            .clone()
            .or_else(|| existing.vehicle_type.clone());

        let services = match request.services {
            Some(items) => resolve_services(&txn, items, vehicle_type.as_deref()).await?,
            None => existing.services.clone(),
        };
        let ppfs = match request.ppfs {
            Some(items) => resolve_ppfs(&txn, items, vehicle_type.as_deref()).await?,
            None => existing.ppfs.clone(),
        };
        let accessories = match request.accessories {
            Some(items) => resolve_accessories(&txn, items).await?,
            None => existing.accessories.clone(),
        };
        let roll_events = apply_roll_usage(&txn, &existing.ppfs, &ppfs).await?;

        let labor_charge = request.labor_charge.unwrap_or(existing.labor_charge);
        let discount = request.discount.unwrap_or(existing.discount);
        let gst = request.gst.unwrap_or(existing.gst);
        let breakdown =
            pricing::price_job(&services, &ppfs, &accessories, labor_charge, discount, gst)?;

        let mut active: job_card::ActiveModel = existing.into();
        if let Some(v) = request.customer_name {
            active.customer_name = Set(v.trim().to_string());
        }
        if let Some(v) = request.phone_number {
            active.phone_number = Set(v.trim().to_string());
        }
        if let Some(v) = request.email_address {
            active.email_address = Set(Some(v));
        }
        if let Some(v) = request.referral_source {
            active.referral_source = Set(v);
        }
        if let Some(v) = request.referrer_name {
            active.referrer_name = Set(Some(v));
        }
        if let Some(v) = request.referrer_phone {
            active.referrer_phone = Set(Some(v));
        }
        if let Some(v) = request.make {
            active.make = Set(v);
        }
        if let Some(v) = request.model {
            active.model = Set(v);
        }
        if let Some(v) = request.year {
            active.year = Set(v);
        }
        if let Some(v) = request.license_plate {
            active.license_plate = Set(v);
        }
        if let Some(v) = request.vin {
            active.vin = Set(Some(v));
        }
        if let Some(v) = request.service_notes {
            active.service_notes = Set(Some(v));
        }
        if let Some(v) = request.status {
            active.status = Set(v);
        }
        if let Some(v) = request.technician {
            active.technician = Set(Some(v));
        }
        active.vehicle_type = Set(vehicle_type);
        active.services = Set(services);
        active.ppfs = Set(ppfs);
        active.accessories = Set(accessories);
        active.labor_charge = Set(labor_charge);
        active.discount = Set(discount);
        active.gst = Set(gst);
        active.estimated_cost = Set(breakdown.total);

        let model = active.update(&txn).await.map_err(ServiceError::db_error)?;
        txn.commit().await.map_err(ServiceError::db_error)?;

        slog::info!(self.logger, "job card updated";
            "id" => %model.id, "status" => %model.status, "estimated_cost" => %model.estimated_cost);

        if model.status != old_status {
            self.event_sender
                .send_or_log(Event::JobCardStatusChanged {
                    id: model.id,
                    old_status: old_status.to_string(),
                    new_status: model.status.to_string(),
                })
                .await;
        }
        for event in roll_events {
            self.event_sender.send_or_log(event).await;
        }

        Ok(model)
    }

    /// Consumed roll stock is not returned; the job number is not reused.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = job_card::Entity::delete_by_id(id)
            .exec(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Job card", id));
        }
        slog::info!(self.logger, "job card deleted"; "id" => %id);
        self.event_sender
            .send_or_log(Event::JobCardDeleted(id))
            .await;
        Ok(())
    }
}

fn unpriced(kind: &str, name: &str, vehicle_type: Option<&str>) -> ServiceError {
    match vehicle_type {
        Some(vt) => ServiceError::InvalidInput(format!(
            "No price for {} '{}' on vehicle type '{}'",
            kind, name, vt
        )),
        None => ServiceError::InvalidInput(format!(
            "Price for {} '{}' requires a vehicle type",
            kind, name
        )),
    }
}

fn unknown(kind: &str, id: Uuid) -> ServiceError {
    ServiceError::InvalidInput(format!("Unknown {} {}", kind, id))
}

/// Every line item must name an existing master record, even when the
/// client supplies its own name and price.
async fn resolve_services<C: ConnectionTrait>(
    conn: &C,
    items: Vec<LineItemInput>,
    vehicle_type: Option<&str>,
) -> Result<ServiceLines, ServiceError> {
    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        let master = service_master::Entity::find_by_id(item.id)
            .one(conn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| unknown("service", item.id))?;
        let price = match item.price {
            Some(price) => price,
            None => vehicle_type
                .and_then(|vt| pricing::vehicle_price(&master.pricing_by_vehicle_type.0, vt))
                .map(|row| row.price)
                .ok_or_else(|| unpriced("service", &master.name, vehicle_type))?,
        };
        lines.push(ServiceLine {
            id: item.id,
            name: item.name.unwrap_or(master.name),
            price,
        });
    }
    Ok(ServiceLines(lines))
}

async fn resolve_ppfs<C: ConnectionTrait>(
    conn: &C,
    items: Vec<LineItemInput>,
    vehicle_type: Option<&str>,
) -> Result<PpfLines, ServiceError> {
    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        let master = ppf_master::Entity::find_by_id(item.id)
            .one(conn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| unknown("PPF", item.id))?;
        let price = match item.price {
            Some(price) => price,
            None => {
                let warranty = item.warranty_name.as_deref().ok_or_else(|| {
                    ServiceError::InvalidInput(format!(
                        "Price for PPF '{}' requires a warranty_name",
                        master.name
                    ))
                })?;
                vehicle_type
                    .and_then(|vt| pricing::ppf_price(&master.pricing_by_vehicle_type.0, vt, warranty))
                    .ok_or_else(|| unpriced("PPF", &master.name, vehicle_type))?
            }
        };
        lines.push(PpfLine {
            id: item.id,
            name: item.name.unwrap_or(master.name),
            price,
            warranty_name: item.warranty_name,
            roll_id: item.roll_id,
            roll_used: item.roll_used,
        });
    }
    Ok(PpfLines(lines))
}

async fn resolve_accessories<C: ConnectionTrait>(
    conn: &C,
    items: Vec<LineItemInput>,
) -> Result<AccessoryLines, ServiceError> {
    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        let master = accessory_master::Entity::find_by_id(item.id)
            .one(conn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| unknown("accessory", item.id))?;
        lines.push(AccessoryLine {
            id: item.id,
            name: item.name.unwrap_or(master.name),
            price: item.price.unwrap_or(master.price),
            quantity: item.quantity.unwrap_or_else(default_quantity),
        });
    }
    Ok(AccessoryLines(lines))
}

/// Film drawn per `(ppf id, roll id)`.
fn roll_usage(lines: &PpfLines) -> Result<BTreeMap<(Uuid, Uuid), Decimal>, ServiceError> {
    let mut usage = BTreeMap::new();
    for line in &lines.0 {
        if let (Some(roll_id), Some(used)) = (line.roll_id, line.roll_used) {
            let total = usage.entry((line.id, roll_id)).or_insert(Decimal::ZERO);
            *total = total.checked_add(used).ok_or_else(pricing::out_of_range)?;
        }
    }
    Ok(usage)
}

/// Moves roll stock by the difference between two sets of PPF lines.
///
/// Positive deltas consume stock, negative ones return it. Fails with
/// `InsufficientStock` before any roll would go below zero.
async fn apply_roll_usage<C: ConnectionTrait>(
    conn: &C,
    before: &PpfLines,
    after: &PpfLines,
) -> Result<Vec<Event>, ServiceError> {
    let mut deltas = roll_usage(after)?;
    for (key, used) in roll_usage(before)? {
        let delta = deltas.entry(key).or_insert(Decimal::ZERO);
        *delta = delta.checked_sub(used).ok_or_else(pricing::out_of_range)?;
    }

    let mut by_ppf: BTreeMap<Uuid, Vec<(Uuid, Decimal)>> = BTreeMap::new();
    for ((ppf_id, roll_id), delta) in deltas {
        if !delta.is_zero() {
            by_ppf.entry(ppf_id).or_default().push((roll_id, delta));
        }
    }

    let mut events = Vec::new();
    for (ppf_id, changes) in by_ppf {
        let master = ppf_master::Entity::find_by_id(ppf_id)
            .one(conn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| unknown("PPF", ppf_id))?;

        let mut rolls: PpfRolls = master.rolls.clone();
        for (roll_id, delta) in changes {
            let roll = rolls
                .0
                .iter_mut()
                .find(|r| r.id == roll_id)
                .ok_or_else(|| unknown("roll", roll_id))?;
            let remaining = roll.stock.checked_sub(delta).ok_or_else(pricing::out_of_range)?;
            if remaining.is_sign_negative() && !remaining.is_zero() {
                return Err(ServiceError::InsufficientStock(format!(
                    "Roll '{}' has {} left, {} requested",
                    roll.name, roll.stock, delta
                )));
            }
            roll.stock = remaining;
            if delta > Decimal::ZERO {
                events.push(Event::RollStockConsumed {
                    ppf_id,
                    roll_id,
                    used: delta,
                    remaining,
                });
            }
        }

        let mut active: ppf_master::ActiveModel = master.into();
        active.rolls = Set(rolls);
        active.update(conn).await.map_err(ServiceError::db_error)?;
    }

    Ok(events)
}
