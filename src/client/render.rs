//! Plain-text rendering of records and chart projections for the terminal client.

use std::fmt::Write;

use rust_decimal::Decimal;

use crate::chart::{normalized_height, ChartData, ChartPoint};
use crate::dto::SalesRecord;

const SALES_BAR: char = '█';
const TARGET_BAR: char = '░';

pub fn records_table(records: &[SalesRecord]) -> String {
    if records.is_empty() {
        return "No sales data yet.\n".to_string();
    }

    let name_width = records
        .iter()
        .map(|record| record.product_name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Product".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>5}  {:<name_width$}  {:>14}  {:>14}  {:>14}  {:>14}  {:>15}  {:>14}",
        "ID", "Product", "Q1", "Q2", "Q3", "Q4", "Total", "Target",
    );
    for record in records {
        let _ = writeln!(
            out,
            "{:>5}  {:<name_width$}  {:>14}  {:>14}  {:>14}  {:>14}  {:>15}  {:>14}",
            record.id,
            record.product_name,
            record.q1_sales,
            record.q2_sales,
            record.q3_sales,
            record.q4_sales,
            record.total_sales(),
            record.target,
        );
    }
    out
}

fn bar(value: Decimal, scale: Decimal, width: usize, fill: char) -> String {
    let len = normalized_height(value, scale, width as f64).round().max(0.0) as usize;
    std::iter::repeat(fill).take(len.min(width)).collect()
}

/// Horizontal bar chart; the largest value spans `width` cells.
pub fn chart(data: &ChartData, width: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Sales chart ({}), scale {}", data.mode, data.scale);

    if data.points.is_empty() {
        out.push_str("No data to chart.\n");
        return out;
    }

    let label_width = data
        .points
        .iter()
        .map(|point| point.label().chars().count())
        .max()
        .unwrap_or(0);

    for point in &data.points {
        match point {
            ChartPoint::Performance(p) => {
                let _ = writeln!(
                    out,
                    "{:<label_width$} sales  {} {}",
                    p.product_name,
                    bar(p.total_sales, data.scale, width, SALES_BAR),
                    p.total_sales
                );
                let _ = writeln!(
                    out,
                    "{:<label_width$} target {} {}",
                    "",
                    bar(p.target, data.scale, width, TARGET_BAR),
                    p.target
                );
            }
            other => {
                let value = other.values().first().copied().unwrap_or_default();
                let _ = writeln!(
                    out,
                    "{:<label_width$} {} {}",
                    other.label(),
                    bar(value, data.scale, width, SALES_BAR),
                    value
                );
            }
        }
    }
    out
}
