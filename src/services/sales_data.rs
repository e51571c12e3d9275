use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, DbErr, EntityTrait, QueryOrder, Set, TransactionTrait,
};
use tracing::{error, info, instrument};

use crate::{
    chart::{self, ChartData, ChartMode},
    db::DbPool,
    dto::{SalesDataInput, SalesRecord},
    entities::sales_data::{self, Entity as SalesDataEntity},
    errors::ServiceError,
};

pub const FETCH_FAILED: &str = "Failed to fetch sales data";
pub const CREATE_FAILED: &str = "Failed to create sales data";
pub const UPDATE_FAILED: &str = "Failed to update sales data";
pub const DELETE_FAILED: &str = "Failed to delete sales data";

fn storage_error(context: &'static str) -> impl FnOnce(DbErr) -> ServiceError {
    move |e| {
        error!(error = %e, "{}", context);
        ServiceError::storage(context, e)
    }
}

fn not_found(id: i32) -> ServiceError {
    ServiceError::NotFound(format!("Sales data with ID {} not found", id))
}

/// CRUD over the `sales_data` table. Every operation is one round trip to the store.
#[derive(Clone)]
pub struct SalesDataService {
    db_pool: Arc<DbPool>,
}

impl SalesDataService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Every record, ordered by id.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<SalesRecord>, ServiceError> {
        let rows = SalesDataEntity::find()
            .order_by_asc(sales_data::Column::Id)
            .all(&*self.db_pool)
            .await
            .map_err(storage_error(FETCH_FAILED))?;

        Ok(rows.into_iter().map(SalesRecord::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<SalesRecord, ServiceError> {
        SalesDataEntity::find_by_id(id)
            .one(&*self.db_pool)
            .await
            .map_err(storage_error(FETCH_FAILED))?
            .map(SalesRecord::from)
            .ok_or_else(|| not_found(id))
    }

    /// Inserts a record; the store assigns the id and both timestamps.
    #[instrument(skip(self, input), fields(product_name = %input.product_name))]
    pub async fn create(&self, input: SalesDataInput) -> Result<SalesRecord, ServiceError> {
        let model = sales_data::ActiveModel {
            product_name: Set(input.product_name),
            q1_sales: Set(input.q1_sales),
            q2_sales: Set(input.q2_sales),
            q3_sales: Set(input.q3_sales),
            q4_sales: Set(input.q4_sales),
            target: Set(input.target),
            ..Default::default()
        };

        let created = model
            .insert(&*self.db_pool)
            .await
            .map_err(storage_error(CREATE_FAILED))?;

        info!(id = created.id, "Sales data created");
        Ok(created.into())
    }

    /// Replaces all six business fields of an existing record.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i32, input: SalesDataInput) -> Result<SalesRecord, ServiceError> {
        let txn = self
            .db_pool
            .begin()
            .await
            .map_err(storage_error(UPDATE_FAILED))?;

        let existing = SalesDataEntity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(storage_error(UPDATE_FAILED))?
            .ok_or_else(|| not_found(id))?;

        let mut model: sales_data::ActiveModel = existing.into();
        model.product_name = Set(input.product_name);
        model.q1_sales = Set(input.q1_sales);
        model.q2_sales = Set(input.q2_sales);
        model.q3_sales = Set(input.q3_sales);
        model.q4_sales = Set(input.q4_sales);
        model.target = Set(input.target);

        let updated = model
            .update(&txn)
            .await
            .map_err(storage_error(UPDATE_FAILED))?;
        txn.commit().await.map_err(storage_error(UPDATE_FAILED))?;

        info!(id, "Sales data updated");
        Ok(updated.into())
    }

    /// Hard delete; a missing id is reported, not ignored.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let result = SalesDataEntity::delete_by_id(id)
            .exec(&*self.db_pool)
            .await
            .map_err(storage_error(DELETE_FAILED))?;

        if result.rows_affected == 0 {
            return Err(not_found(id));
        }

        info!(id, "Sales data deleted");
        Ok(())
    }

    /// Projects the full record set for one chart view.
    #[instrument(skip(self))]
    pub async fn chart(&self, mode: ChartMode) -> Result<ChartData, ServiceError> {
        let records = self.list().await?;
        Ok(chart::build(&records, mode))
    }
}
