//! Field rules shared by the HTTP boundary and the terminal client.
//!
//! Rules report through [`validator::ValidationError`] codes; [`flatten_errors`] turns a
//! [`ValidationErrors`] set into the per-field message map returned to callers.

use std::collections::BTreeMap;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use validator::{ValidationError, ValidationErrors};

/// Field name to every violation message for that field.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

pub const MAX_PRODUCT_NAME_LENGTH: usize = 255;

/// Largest amount a `decimal(12, 2)` column holds.
pub const MAX_AMOUNT: Decimal = dec!(9999999999.99);

pub const CODE_REQUIRED: &str = "required";
pub const CODE_STRING: &str = "string";
pub const CODE_MAX_LENGTH: &str = "max_length";
pub const CODE_NUMERIC: &str = "numeric";
pub const CODE_MIN: &str = "min";
pub const CODE_MAX: &str = "max";

/// Plain decimal or exponent notation. No separators, hex, `NaN` or `Infinity`.
static NUMERIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").expect("numeric pattern compiles")
});

/// Product name: text, not blank once trimmed, at most 255 characters.
pub fn validate_product_name(value: &Value) -> Result<(), ValidationError> {
    parse_product_name(value).map(|_| ())
}

/// Amount: JSON number or numeric string, between 0 and [`MAX_AMOUNT`].
pub fn validate_amount(value: &Value) -> Result<(), ValidationError> {
    parse_amount(value).map(|_| ())
}

pub fn parse_product_name(value: &Value) -> Result<String, ValidationError> {
    let text = value
        .as_str()
        .ok_or_else(|| ValidationError::new(CODE_STRING))?;
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::new(CODE_REQUIRED));
    }
    if trimmed.chars().count() > MAX_PRODUCT_NAME_LENGTH {
        let mut err = ValidationError::new(CODE_MAX_LENGTH);
        err.add_param("max".into(), &MAX_PRODUCT_NAME_LENGTH);
        return Err(err);
    }

    Ok(trimmed.to_string())
}

/// Parses an amount and rounds it half away from zero to cents.
pub fn parse_amount(value: &Value) -> Result<Decimal, ValidationError> {
    let amount = match value {
        Value::Number(number) => parse_decimal(&number.to_string())?,
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(ValidationError::new(CODE_REQUIRED));
            }
            parse_decimal(trimmed)?
        }
        _ => return Err(ValidationError::new(CODE_NUMERIC)),
    };

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ValidationError::new(CODE_MIN));
    }

    let amount = to_cents(amount);
    if amount > MAX_AMOUNT {
        return Err(ValidationError::new(CODE_MAX));
    }

    Ok(amount)
}

fn parse_decimal(raw: &str) -> Result<Decimal, ValidationError> {
    if !NUMERIC_RE.is_match(raw) {
        return Err(ValidationError::new(CODE_NUMERIC));
    }
    if let Ok(amount) = Decimal::from_str(raw).or_else(|_| Decimal::from_scientific(raw)) {
        return Ok(amount);
    }

    // Well-formed but beyond what Decimal represents: classify by magnitude.
    let approx: f64 = raw
        .parse()
        .map_err(|_| ValidationError::new(CODE_NUMERIC))?;
    if approx < 0.0 {
        return Err(ValidationError::new(CODE_MIN));
    }
    if approx > MAX_AMOUNT.to_f64().unwrap_or(f64::MAX) {
        return Err(ValidationError::new(CODE_MAX));
    }
    Ok(Decimal::from_f64(approx).unwrap_or(Decimal::ZERO))
}

/// Rounds to two fractional digits and pins the scale so `10` renders as `10.00`.
pub fn to_cents(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded
}

/// Human label for a payload field, e.g. `q1_sales` -> `q1 sales`.
pub fn field_label(field: &str) -> String {
    field.replace('_', " ")
}

/// Message for a rule failure on `field`.
pub fn message_for(field: &str, error: &ValidationError) -> String {
    let label = field_label(field);
    match error.code.as_ref() {
        CODE_REQUIRED => format!("The {} field is required.", label),
        CODE_STRING => format!("The {} must be a string.", label),
        CODE_MAX_LENGTH => format!(
            "The {} must not be greater than {} characters.",
            label, MAX_PRODUCT_NAME_LENGTH
        ),
        CODE_NUMERIC => format!("The {} must be a number.", label),
        CODE_MIN => format!("The {} must be at least 0.", label),
        CODE_MAX => format!("The {} must not be greater than {}.", label, MAX_AMOUNT),
        _ => error
            .message
            .as_ref()
            .map(|message| message.to_string())
            .unwrap_or_else(|| format!("The {} is invalid.", label)),
    }
}

/// Collects every field failure into a message map.
pub fn flatten_errors(errors: &ValidationErrors) -> FieldErrors {
    let mut flattened = FieldErrors::new();
    for (field, field_errors) in errors.field_errors() {
        let field = field.to_string();
        let messages = field_errors
            .iter()
            .map(|error| message_for(&field, error))
            .collect::<Vec<_>>();
        flattened.entry(field).or_default().extend(messages);
    }
    flattened
}

/// Map holding a single failure, for conversions that fail outside a derive.
pub fn single_error(field: &str, error: &ValidationError) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.insert(field.to_string(), vec![message_for(field, error)]);
    errors
}
