pub mod sales_data;

pub use sales_data::{
    ActiveModel as SalesDataActiveModel, Entity as SalesData, Model as SalesDataModel,
};
