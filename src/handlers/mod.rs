pub mod charts;
pub mod sales_data;
