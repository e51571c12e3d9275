use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::entities::sales_data;
use crate::validation::{
    parse_amount, parse_product_name, single_error, to_cents, validate_amount,
    validate_product_name, FieldErrors, CODE_REQUIRED,
};

/// Create/update body as received. Fields stay untyped so wrong types are reported per
/// field instead of failing deserialization; `null` counts as missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct SalesDataPayload {
    #[validate(required, custom = "validate_product_name")]
    #[schema(value_type = String, example = "Widget")]
    pub product_name: Option<Value>,
    #[validate(required, custom = "validate_amount")]
    #[schema(value_type = f64, example = 1250.5)]
    pub q1_sales: Option<Value>,
    #[validate(required, custom = "validate_amount")]
    #[schema(value_type = f64, example = 980)]
    pub q2_sales: Option<Value>,
    #[validate(required, custom = "validate_amount")]
    #[schema(value_type = f64, example = 1100)]
    pub q3_sales: Option<Value>,
    #[validate(required, custom = "validate_amount")]
    #[schema(value_type = f64, example = 1420.75)]
    pub q4_sales: Option<Value>,
    #[validate(required, custom = "validate_amount")]
    #[schema(value_type = f64, example = 5000)]
    pub target: Option<Value>,
}

impl SalesDataPayload {
    /// Payload built from raw form text, as typed by a user.
    pub fn from_text(
        product_name: &str,
        q1_sales: &str,
        q2_sales: &str,
        q3_sales: &str,
        q4_sales: &str,
        target: &str,
    ) -> Self {
        let text = |raw: &str| Some(Value::String(raw.to_string()));
        Self {
            product_name: text(product_name),
            q1_sales: text(q1_sales),
            q2_sales: text(q2_sales),
            q3_sales: text(q3_sales),
            q4_sales: text(q4_sales),
            target: text(target),
        }
    }
}

/// Validated business fields of a sales record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SalesDataInput {
    pub product_name: String,
    #[schema(value_type = String, example = "1250.50")]
    pub q1_sales: Decimal,
    #[schema(value_type = String, example = "980.00")]
    pub q2_sales: Decimal,
    #[schema(value_type = String, example = "1100.00")]
    pub q3_sales: Decimal,
    #[schema(value_type = String, example = "1420.75")]
    pub q4_sales: Decimal,
    #[schema(value_type = String, example = "5000.00")]
    pub target: Decimal,
}

fn required_field<T>(
    field: &str,
    value: &Option<Value>,
    parse: fn(&Value) -> Result<T, ValidationError>,
) -> Result<T, FieldErrors> {
    let value = value
        .as_ref()
        .ok_or_else(|| single_error(field, &ValidationError::new(CODE_REQUIRED)))?;
    parse(value).map_err(|err| single_error(field, &err))
}

impl TryFrom<SalesDataPayload> for SalesDataInput {
    type Error = FieldErrors;

    /// Runs every field rule, reporting all violations at once.
    fn try_from(payload: SalesDataPayload) -> Result<Self, Self::Error> {
        payload
            .validate()
            .map_err(|errors| crate::validation::flatten_errors(&errors))?;

        Ok(Self {
            product_name: required_field("product_name", &payload.product_name, parse_product_name)?,
            q1_sales: required_field("q1_sales", &payload.q1_sales, parse_amount)?,
            q2_sales: required_field("q2_sales", &payload.q2_sales, parse_amount)?,
            q3_sales: required_field("q3_sales", &payload.q3_sales, parse_amount)?,
            q4_sales: required_field("q4_sales", &payload.q4_sales, parse_amount)?,
            target: required_field("target", &payload.target, parse_amount)?,
        })
    }
}

impl From<&SalesDataInput> for SalesDataPayload {
    fn from(input: &SalesDataInput) -> Self {
        let amount = |value: Decimal| Some(Value::String(value.to_string()));
        Self {
            product_name: Some(Value::String(input.product_name.clone())),
            q1_sales: amount(input.q1_sales),
            q2_sales: amount(input.q2_sales),
            q3_sales: amount(input.q3_sales),
            q4_sales: amount(input.q4_sales),
            target: amount(input.target),
        }
    }
}

/// A stored sales record as served over the API. Amounts always carry two decimals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SalesRecord {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Widget")]
    pub product_name: String,
    #[schema(value_type = String, example = "1250.50")]
    pub q1_sales: Decimal,
    #[schema(value_type = String, example = "980.00")]
    pub q2_sales: Decimal,
    #[schema(value_type = String, example = "1100.00")]
    pub q3_sales: Decimal,
    #[schema(value_type = String, example = "1420.75")]
    pub q4_sales: Decimal,
    #[schema(value_type = String, example = "5000.00")]
    pub target: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SalesRecord {
    pub fn quarters(&self) -> [Decimal; 4] {
        [self.q1_sales, self.q2_sales, self.q3_sales, self.q4_sales]
    }

    pub fn total_sales(&self) -> Decimal {
        self.quarters().into_iter().sum()
    }

    /// Business fields only, e.g. to prefill an edit form.
    pub fn to_input(&self) -> SalesDataInput {
        SalesDataInput {
            product_name: self.product_name.clone(),
            q1_sales: self.q1_sales,
            q2_sales: self.q2_sales,
            q3_sales: self.q3_sales,
            q4_sales: self.q4_sales,
            target: self.target,
        }
    }
}

impl From<sales_data::Model> for SalesRecord {
    fn from(model: sales_data::Model) -> Self {
        Self {
            id: model.id,
            product_name: model.product_name,
            q1_sales: to_cents(model.q1_sales),
            q2_sales: to_cents(model.q2_sales),
            q3_sales: to_cents(model.q3_sales),
            q4_sales: to_cents(model.q4_sales),
            target: to_cents(model.target),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
