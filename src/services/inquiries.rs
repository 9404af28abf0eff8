use crate::{
    db::DbPool,
    entities::inquiry,
    errors::ServiceError,
    events::{Event, EventSender},
    models::{InquiryAccessoryLine, InquiryAccessoryLines, InquiryServiceLine, InquiryServiceLines},
    pricing,
};
use chrono::Utc;
use metrics::counter;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use slog::Logger;
use std::sync::Arc;
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::pricing_rows::validate_amount;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "customer_name": "Priya Shah",
    "phone": "9123456780",
    "services": [{
        "service_id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
        "service_name": "Ceramic Coating",
        "vehicle_type": "Sedan",
        "price": "10000",
        "customer_price": "12000"
    }],
    "notes": "Wants a quote before Diwali"
}))]
pub struct CreateInquiryRequest {
    #[validate(length(min = 1, max = 200))]
    pub customer_name: String,
    #[validate(length(min = 1, max = 32))]
    pub phone: String,
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(custom = "validate_service_lines")]
    pub services: Vec<InquiryServiceLine>,
    #[serde(default)]
    #[validate(custom = "validate_accessory_lines")]
    pub accessories: Vec<InquiryAccessoryLine>,
    pub notes: Option<String>,
    /// Defaults to the sum of the line items' `price`
    #[schema(value_type = Option<String>)]
    #[validate(custom = "validate_amount")]
    pub our_price: Option<Decimal>,
    /// Defaults to the sum of the line items' `customer_price`
    #[schema(value_type = Option<String>)]
    #[validate(custom = "validate_amount")]
    pub customer_price: Option<Decimal>,
}

fn validate_service_lines(lines: &Vec<InquiryServiceLine>) -> Result<(), ValidationError> {
    for line in lines {
        validate_amount(&line.price)?;
        validate_amount(&line.customer_price)?;
    }
    Ok(())
}

fn validate_accessory_lines(lines: &Vec<InquiryAccessoryLine>) -> Result<(), ValidationError> {
    for line in lines {
        validate_amount(&line.price)?;
        validate_amount(&line.customer_price)?;
    }
    Ok(())
}

/// Checked sum of line-item figures.
fn sum_prices(prices: impl IntoIterator<Item = Decimal>) -> Result<Decimal, ServiceError> {
    prices
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, price| acc.checked_add(price))
        .ok_or_else(pricing::out_of_range)
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InquiryFilter {
    /// Substring of customer name or phone
    pub search: Option<String>,
    /// Only inquiries quoting a service with this name
    pub service: Option<String>,
}

/// Inquiry with its quoted margin
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InquiryView {
    #[serde(flatten)]
    pub inquiry: inquiry::Model,
    #[schema(value_type = String, example = "2000")]
    pub markup: Decimal,
    #[schema(value_type = String, example = "20")]
    pub markup_percent: Decimal,
}

impl From<inquiry::Model> for InquiryView {
    fn from(inquiry: inquiry::Model) -> Self {
        let (markup, markup_percent) = markup(inquiry.our_price, inquiry.customer_price);
        Self {
            inquiry,
            markup,
            markup_percent,
        }
    }
}

/// `customer_price - our_price` and that margin as a percent of cost.
///
/// Both figures saturate instead of overflowing; the percent is zero when
/// the cost is zero.
pub fn markup(our_price: Decimal, customer_price: Decimal) -> (Decimal, Decimal) {
    let markup = customer_price.saturating_sub(our_price);
    let percent = if our_price.is_zero() {
        Decimal::ZERO
    } else {
        markup
            .checked_div(our_price)
            .and_then(|ratio| ratio.checked_mul(dec!(100)))
            .map(|p| p.round_dp(2))
            .unwrap_or_else(|| {
                if markup.is_sign_negative() == our_price.is_sign_negative() {
                    Decimal::MAX
                } else {
                    Decimal::MIN
                }
            })
    };
    (markup, percent)
}

#[derive(Clone)]
pub struct InquiryService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    logger: Logger,
}

impl InquiryService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>, logger: Logger) -> Self {
        Self {
            db_pool,
            event_sender,
            logger,
        }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, filter: InquiryFilter) -> Result<Vec<InquiryView>, ServiceError> {
        let mut query = inquiry::Entity::find();
        if let Some(term) = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            query = query.filter(
                Condition::any()
                    .add(inquiry::Column::CustomerName.contains(term))
                    .add(inquiry::Column::Phone.contains(term)),
            );
        }

        let rows = query
            .order_by_desc(inquiry::Column::Date)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?;

        // services live in a JSON column; filter after loading
        let service = filter.service.filter(|s| !s.trim().is_empty());
        Ok(rows
            .into_iter()
            .filter(|row| match &service {
                Some(name) => row.services.0.iter().any(|s| &s.service_name == name),
                None => true,
            })
            .map(InquiryView::from)
            .collect())
    }

    #[instrument(skip(self, request), fields(customer = %request.customer_name))]
    pub async fn create(&self, request: CreateInquiryRequest) -> Result<InquiryView, ServiceError> {
        request.validate()?;

        let our_price = match request.our_price {
            Some(price) => price,
            None => sum_prices(
                request
                    .services
                    .iter()
                    .map(|s| s.price)
                    .chain(request.accessories.iter().map(|a| a.price)),
            )?,
        };
        let customer_price = match request.customer_price {
            Some(price) => price,
            None => sum_prices(
                request
                    .services
                    .iter()
                    .map(|s| s.customer_price)
                    .chain(request.accessories.iter().map(|a| a.customer_price)),
            )?,
        };

        let now = Utc::now();
        let model = inquiry::ActiveModel {
            id: Set(Uuid::new_v4()),
            inquiry_id: Set(format!("INQ-{}", now.timestamp_millis())),
            customer_name: Set(request.customer_name.trim().to_string()),
            phone: Set(request.phone.trim().to_string()),
            email: Set(request.email),
            services: Set(InquiryServiceLines(request.services)),
            accessories: Set(InquiryAccessoryLines(request.accessories)),
            notes: Set(request.notes),
            our_price: Set(our_price),
            customer_price: Set(customer_price),
            date: Set(now),
        }
        .insert(&*self.db_pool)
        .await
        .map_err(ServiceError::db_error)?;

        counter!("autogarage_inquiries_created_total", 1);
        slog::info!(self.logger, "inquiry created"; "id" => %model.id, "inquiry_id" => &model.inquiry_id);
        self.event_sender
            .send_or_log(Event::InquiryCreated {
                id: model.id,
                inquiry_id: model.inquiry_id.clone(),
            })
            .await;

        Ok(model.into())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = inquiry::Entity::delete_by_id(id)
            .exec(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Inquiry", id));
        }
        Ok(())
    }
}
