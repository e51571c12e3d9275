use async_trait::async_trait;
use chrono::{DateTime, Duration, SubsecRound, Utc};
use rust_decimal::Decimal;
use sea_orm::{entity::prelude::*, ActiveValue, ActiveValue::Set};
use serde::{Deserialize, Serialize};

/// One row of quarterly sales figures for a product.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales_data")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub product_name: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub q1_sales: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub q2_sales: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub q3_sales: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub q4_sales: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub target: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

/// Current time at the resolution every supported backend can round-trip.
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Timestamp for the next write of a row last touched at `previous`.
///
/// Never returns a value at or before `previous`, even when the clock has not advanced.
pub fn next_timestamp(previous: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = current_timestamp();
    match previous {
        Some(previous) if now <= previous => previous + Duration::microseconds(1),
        _ => now,
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;

        if insert {
            let now = current_timestamp();
            active_model.created_at = Set(now);
            active_model.updated_at = Set(now);
        } else {
            let previous = match &active_model.updated_at {
                ActiveValue::Set(value) | ActiveValue::Unchanged(value) => Some(*value),
                ActiveValue::NotSet => None,
            };
            active_model.updated_at = Set(next_timestamp(previous));
        }

        Ok(active_model)
    }
}
