//! Aggregate projections of the sales record set for the bar-chart views.
//!
//! Everything here is pure: the same records and mode always give the same points and
//! scale. Sums stay in [`Decimal`] so totals never drift.

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dto::SalesRecord;

/// Bar colors, assigned by cyclic index.
pub const PALETTE: [&str; 6] = [
    "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEAA7", "#DDA0DD", "#98D8C8",
];

/// Color of the target bar next to each sales bar in the performance view.
pub const TARGET_COLOR: &str = "#FF6B6B";

const QUARTER_LABELS: [&str; 4] = ["Q1", "Q2", "Q3", "Q4"];

pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChartMode {
    /// One bar per quarter, summed across every product
    #[default]
    Quarterly,
    /// Per product: total sales beside its target
    Performance,
    /// Per product: total sales
    Product,
}

impl ChartMode {
    pub const ALL: [ChartMode; 3] = [
        ChartMode::Quarterly,
        ChartMode::Performance,
        ChartMode::Product,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartMode::Quarterly => "quarterly",
            ChartMode::Performance => "performance",
            ChartMode::Product => "product",
        }
    }
}

impl fmt::Display for ChartMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown chart mode '{0}'; expected one of quarterly, performance, product")]
pub struct ParseChartModeError(pub String);

impl FromStr for ChartMode {
    type Err = ParseChartModeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim();
        ChartMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseChartModeError(raw.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuarterTotal {
    #[schema(example = "Q1")]
    pub label: String,
    #[schema(value_type = String, example = "15.00")]
    pub total_value: Decimal,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPerformance {
    pub product_name: String,
    #[schema(value_type = String, example = "4200.00")]
    pub total_sales: Decimal,
    #[schema(value_type = String, example = "5000.00")]
    pub target: Decimal,
    pub color: String,
    #[schema(example = "#FF6B6B")]
    pub target_color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductTotal {
    pub product_name: String,
    #[schema(value_type = String, example = "4200.00")]
    pub total_value: Decimal,
    pub color: String,
}

/// One display-ready data point; the shape depends on the mode that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ChartPoint {
    Quarterly(QuarterTotal),
    Performance(ProductPerformance),
    Product(ProductTotal),
}

impl ChartPoint {
    pub fn label(&self) -> &str {
        match self {
            ChartPoint::Quarterly(point) => &point.label,
            ChartPoint::Performance(point) => &point.product_name,
            ChartPoint::Product(point) => &point.product_name,
        }
    }

    /// Values that compete for the tallest bar.
    pub fn values(&self) -> Vec<Decimal> {
        match self {
            ChartPoint::Quarterly(point) => vec![point.total_value],
            ChartPoint::Performance(point) => vec![point.total_sales, point.target],
            ChartPoint::Product(point) => vec![point.total_value],
        }
    }
}

/// Projection plus the scale its bars are normalized against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChartData {
    pub mode: ChartMode,
    pub points: Vec<ChartPoint>,
    #[schema(value_type = String, example = "20.00")]
    pub scale: Decimal,
}

pub fn quarterly_totals(records: &[SalesRecord]) -> Vec<QuarterTotal> {
    if records.is_empty() {
        return Vec::new();
    }

    let mut totals = [Decimal::ZERO; 4];
    for record in records {
        for (total, amount) in totals.iter_mut().zip(record.quarters()) {
            *total += amount;
        }
    }

    QUARTER_LABELS
        .iter()
        .zip(totals)
        .enumerate()
        .map(|(index, (label, total))| QuarterTotal {
            label: label.to_string(),
            total_value: total,
            color: palette_color(index).to_string(),
        })
        .collect()
}

pub fn performance(records: &[SalesRecord]) -> Vec<ProductPerformance> {
    records
        .iter()
        .map(|record| ProductPerformance {
            product_name: record.product_name.clone(),
            total_sales: record.total_sales(),
            target: record.target,
            color: PALETTE[0].to_string(),
            target_color: TARGET_COLOR.to_string(),
        })
        .collect()
}

pub fn product_totals(records: &[SalesRecord]) -> Vec<ProductTotal> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| ProductTotal {
            product_name: record.product_name.clone(),
            total_value: record.total_sales(),
            color: palette_color(index).to_string(),
        })
        .collect()
}

pub fn project(records: &[SalesRecord], mode: ChartMode) -> Vec<ChartPoint> {
    match mode {
        ChartMode::Quarterly => quarterly_totals(records)
            .into_iter()
            .map(ChartPoint::Quarterly)
            .collect(),
        ChartMode::Performance => performance(records)
            .into_iter()
            .map(ChartPoint::Performance)
            .collect(),
        ChartMode::Product => product_totals(records)
            .into_iter()
            .map(ChartPoint::Product)
            .collect(),
    }
}

/// Largest value across `points`, or 1 when there is nothing positive to scale by.
pub fn scale(points: &[ChartPoint]) -> Decimal {
    let max = points
        .iter()
        .flat_map(ChartPoint::values)
        .max()
        .unwrap_or(Decimal::ZERO);

    if max > Decimal::ZERO {
        max
    } else {
        Decimal::ONE
    }
}

pub fn build(records: &[SalesRecord], mode: ChartMode) -> ChartData {
    let points = project(records, mode);
    let scale = scale(&points);
    ChartData {
        mode,
        points,
        scale,
    }
}

/// Bar height for `value` when the tallest bar is `max_height`.
pub fn normalized_height(value: Decimal, scale: Decimal, max_height: f64) -> f64 {
    if scale <= Decimal::ZERO {
        return 0.0;
    }
    (value / scale).to_f64().unwrap_or(0.0) * max_height
}
