use crate::{
    db::DbPool,
    entities::appointment::{self, AppointmentStatus},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{NaiveDate, NaiveTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use slog::Logger;
use std::sync::Arc;
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "customer_name": "Neha Rao",
    "phone": "9000011111",
    "vehicle_info": "2022 Honda City",
    "service_type": "Ceramic Coating",
    "date": "2026-10-21",
    "time": "10:30"
}))]
pub struct CreateAppointmentRequest {
    #[validate(length(min = 1, max = 200))]
    pub customer_name: String,
    #[validate(length(min = 1, max = 32))]
    pub phone: String,
    #[serde(default)]
    pub vehicle_info: String,
    #[validate(length(min = 1, max = 200))]
    pub service_type: String,
    pub date: NaiveDate,
    #[validate(custom = "validate_time")]
    pub time: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAppointmentRequest {
    #[validate(length(min = 1, max = 200))]
    pub customer_name: Option<String>,
    #[validate(length(min = 1, max = 32))]
    pub phone: Option<String>,
    pub vehicle_info: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub service_type: Option<String>,
    pub date: Option<NaiveDate>,
    #[validate(custom = "validate_time")]
    pub time: Option<String>,
    pub status: Option<AppointmentStatus>,
    /// Kept only while the appointment is cancelled
    #[validate(length(max = 500))]
    pub cancel_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AppointmentFilter {
    pub date: Option<NaiveDate>,
    pub status: Option<AppointmentStatus>,
}

fn validate_time(value: &str) -> Result<(), ValidationError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map(|_| ())
        .map_err(|_| ValidationError::new("time_format"))
}

#[derive(Clone)]
pub struct AppointmentService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    logger: Logger,
}

impl AppointmentService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>, logger: Logger) -> Self {
        Self {
            db_pool,
            event_sender,
            logger,
        }
    }

    /// Soonest first.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: AppointmentFilter,
    ) -> Result<Vec<appointment::Model>, ServiceError> {
        let mut query = appointment::Entity::find();
        if let Some(date) = filter.date {
            query = query.filter(appointment::Column::Date.eq(date));
        }
        if let Some(status) = filter.status {
            query = query.filter(appointment::Column::Status.eq(status));
        }
        query
            .order_by_asc(appointment::Column::Date)
            .order_by_asc(appointment::Column::Time)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<appointment::Model, ServiceError> {
        appointment::Entity::find_by_id(id)
            .one(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::not_found("Appointment", id))
    }

    #[instrument(skip(self, request), fields(customer = %request.customer_name))]
    pub async fn create(
        &self,
        request: CreateAppointmentRequest,
    ) -> Result<appointment::Model, ServiceError> {
        request.validate()?;
        let model = appointment::ActiveModel {
            id: Set(Uuid::new_v4()),
            customer_name: Set(request.customer_name.trim().to_string()),
            phone: Set(request.phone.trim().to_string()),
            vehicle_info: Set(request.vehicle_info),
            service_type: Set(request.service_type),
            date: Set(request.date),
            time: Set(request.time),
            status: Set(AppointmentStatus::Scheduled),
            cancel_reason: Set(None),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.db_pool)
        .await
        .map_err(ServiceError::db_error)?;
        slog::info!(self.logger, "appointment booked"; "id" => %model.id, "date" => %model.date);
        Ok(model)
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateAppointmentRequest,
    ) -> Result<appointment::Model, ServiceError> {
        request.validate()?;
        let existing = self.get(id).await?;
        let was_cancelled = existing.status == AppointmentStatus::Cancelled;

        let mut active: appointment::ActiveModel = existing.into();
        if let Some(v) = request.customer_name {
            active.customer_name = Set(v.trim().to_string());
        }
        if let Some(v) = request.phone {
            active.phone = Set(v.trim().to_string());
        }
        if let Some(v) = request.vehicle_info {
            active.vehicle_info = Set(v);
        }
        if let Some(v) = request.service_type {
            active.service_type = Set(v);
        }
        if let Some(v) = request.date {
            active.date = Set(v);
        }
        if let Some(v) = request.time {
            active.time = Set(v);
        }
        match request.status {
            Some(AppointmentStatus::Cancelled) => {
                active.status = Set(AppointmentStatus::Cancelled);
                active.cancel_reason = Set(request.cancel_reason);
            }
            Some(other) => {
                active.status = Set(other);
                active.cancel_reason = Set(None);
            }
            None if was_cancelled && request.cancel_reason.is_some() => {
                active.cancel_reason = Set(request.cancel_reason);
            }
            None => {}
        }

        let model = active
            .update(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?;

        if !was_cancelled && model.status == AppointmentStatus::Cancelled {
            slog::info!(self.logger, "appointment cancelled"; "id" => %model.id);
            self.event_sender
                .send_or_log(Event::AppointmentCancelled {
                    id: model.id,
                    reason: model.cancel_reason.clone(),
                })
                .await;
        }
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = appointment::Entity::delete_by_id(id)
            .exec(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Appointment", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_must_be_hours_and_minutes() {
        assert!(validate_time("09:15").is_ok());
        assert!(validate_time("23:59").is_ok());
        assert!(validate_time("24:00").is_err());
        assert!(validate_time("9am").is_err());
    }
}
