pub mod sales_data;

pub use sales_data::SalesDataService;
