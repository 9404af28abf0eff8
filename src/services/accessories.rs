use crate::{
    db::DbPool,
    entities::{accessory_category, accessory_master},
    errors::ServiceError,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Deserialize;
use slog::Logger;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::pricing_rows::validate_amount;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "category": "Interior",
    "name": "Floor Mats",
    "quantity": 20,
    "price": "500"
}))]
pub struct CreateAccessoryRequest {
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub quantity: i32,
    #[schema(value_type = String)]
    #[validate(custom = "validate_amount")]
    pub price: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAccessoryRequest {
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(range(min = 0))]
    pub quantity: Option<i32>,
    #[schema(value_type = Option<String>)]
    #[validate(custom = "validate_amount")]
    pub price: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[schema(example = json!({"name": "Interior"}))]
pub struct CategoryRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

/// Accessory stock items and the categories that group them.
///
/// Accessories reference their category by name, so a rename rewrites the
/// accessories in the same transaction.
#[derive(Clone)]
pub struct AccessoryService {
    db_pool: Arc<DbPool>,
    logger: Logger,
}

impl AccessoryService {
    pub fn new(db_pool: Arc<DbPool>, logger: Logger) -> Self {
        Self { db_pool, logger }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<accessory_master::Model>, ServiceError> {
        accessory_master::Entity::find()
            .order_by_asc(accessory_master::Column::Category)
            .order_by_asc(accessory_master::Column::Name)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<accessory_master::Model, ServiceError> {
        accessory_master::Entity::find_by_id(id)
            .one(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::not_found("Accessory", id))
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(
        &self,
        request: CreateAccessoryRequest,
    ) -> Result<accessory_master::Model, ServiceError> {
        request.validate()?;

        let model = accessory_master::ActiveModel {
            id: Set(Uuid::new_v4()),
            category: Set(request.category.trim().to_string()),
            name: Set(request.name.trim().to_string()),
            quantity: Set(request.quantity),
            price: Set(request.price),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(&*self.db_pool)
        .await
        .map_err(ServiceError::db_error)?;

        slog::info!(self.logger, "accessory created"; "id" => %model.id, "category" => &model.category);
        Ok(model)
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateAccessoryRequest,
    ) -> Result<accessory_master::Model, ServiceError> {
        request.validate()?;

        let mut active: accessory_master::ActiveModel = self.get(id).await?.into();
        if let Some(category) = request.category {
            active.category = Set(category.trim().to_string());
        }
        if let Some(name) = request.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(quantity) = request.quantity {
            active.quantity = Set(quantity);
        }
        if let Some(price) = request.price {
            active.price = Set(price);
        }

        active
            .update(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = accessory_master::Entity::delete_by_id(id)
            .exec(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Accessory", id));
        }
        slog::info!(self.logger, "accessory deleted"; "id" => %id);
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<accessory_category::Model>, ServiceError> {
        accessory_category::Entity::find()
            .order_by_asc(accessory_category::Column::Name)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn get_category(&self, id: Uuid) -> Result<accessory_category::Model, ServiceError> {
        accessory_category::Entity::find_by_id(id)
            .one(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::not_found("Category", id))
    }

    async fn ensure_name_free(&self, name: &str, except: Option<Uuid>) -> Result<(), ServiceError> {
        let existing = accessory_category::Entity::find()
            .filter(accessory_category::Column::Name.eq(name))
            .one(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?;
        match existing {
            Some(found) if Some(found.id) != except => Err(ServiceError::Conflict(format!(
                "Category '{}' already exists",
                name
            ))),
            _ => Ok(()),
        }
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_category(
        &self,
        request: CategoryRequest,
    ) -> Result<accessory_category::Model, ServiceError> {
        request.validate()?;
        let name = request.name.trim().to_string();
        self.ensure_name_free(&name, None).await?;

        let model = accessory_category::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.db_pool)
        .await
        .map_err(ServiceError::db_error)?;

        slog::info!(self.logger, "category created"; "id" => %model.id, "name" => &model.name);
        Ok(model)
    }

    /// Renames a category and every accessory filed under the old name.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn rename_category(
        &self,
        id: Uuid,
        request: CategoryRequest,
    ) -> Result<accessory_category::Model, ServiceError> {
        request.validate()?;
        let new_name = request.name.trim().to_string();
        let existing = self.get_category(id).await?;
        if existing.name == new_name {
            return Ok(existing);
        }
        self.ensure_name_free(&new_name, Some(id)).await?;

        let old_name = existing.name.clone();
        let txn = self.db_pool.begin().await.map_err(ServiceError::db_error)?;

        let mut active: accessory_category::ActiveModel = existing.into();
        active.name = Set(new_name.clone());
        let model = active.update(&txn).await.map_err(ServiceError::db_error)?;

        let moved = accessory_master::Entity::update_many()
            .col_expr(accessory_master::Column::Category, Expr::value(new_name.clone()))
            .col_expr(accessory_master::Column::UpdatedAt, Expr::value(Some(Utc::now())))
            .filter(accessory_master::Column::Category.eq(old_name.clone()))
            .exec(&txn)
            .await
            .map_err(ServiceError::db_error)?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        slog::info!(self.logger, "category renamed";
            "id" => %id, "from" => &old_name, "to" => &new_name, "accessories" => moved.rows_affected);
        Ok(model)
    }

    /// Deleting a category leaves its accessories untouched.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = accessory_category::Entity::delete_by_id(id)
            .exec(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Category", id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_by_category(
        &self,
        category_id: Uuid,
    ) -> Result<Vec<accessory_master::Model>, ServiceError> {
        let category = self.get_category(category_id).await?;
        accessory_master::Entity::find()
            .filter(accessory_master::Column::Category.eq(category.name))
            .order_by_asc(accessory_master::Column::Name)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{establish_connection, run_migrations};
    use crate::logging::discard_logger;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    async fn service() -> AccessoryService {
        let db = establish_connection("sqlite::memory:").await.unwrap();
        run_migrations(&db).await.unwrap();
        AccessoryService::new(Arc::new(db), discard_logger())
    }

    fn mats(category: &str) -> CreateAccessoryRequest {
        CreateAccessoryRequest {
            category: category.into(),
            name: "Floor Mats".into(),
            quantity: 4,
            price: dec!(500),
        }
    }

    #[tokio::test]
    async fn rename_moves_accessories_with_the_category() {
        let svc = service().await;
        let category = svc
            .create_category(CategoryRequest {
                name: "Interior".into(),
            })
            .await
            .unwrap();
        svc.create(mats("Interior")).await.unwrap();
        svc.create(mats("Exterior")).await.unwrap();

        let renamed = svc
            .rename_category(
                category.id,
                CategoryRequest {
                    name: "Cabin".into(),
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "Cabin");

        let listed = svc.list_by_category(category.id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].category, "Cabin");

        let all = svc.list().await.unwrap();
        assert!(all.iter().all(|a| a.category != "Interior"));
    }

    #[tokio::test]
    async fn duplicate_category_names_conflict() {
        let svc = service().await;
        svc.create_category(CategoryRequest {
            name: "Interior".into(),
        })
        .await
        .unwrap();
        let err = svc
            .create_category(CategoryRequest {
                name: "Interior".into(),
            })
            .await
            .unwrap_err();
        assert_matches!(err, ServiceError::Conflict(_));
    }

    #[tokio::test]
    async fn negative_price_is_rejected() {
        let svc = service().await;
        let mut request = mats("Interior");
        request.price = dec!(-1);
        assert_matches!(
            svc.create(request).await,
            Err(ServiceError::ValidationError { .. })
        );
    }
}
