//! PostgreSQL repository modules

pub mod sale;

pub use sale::{delete_all, filter_options, insert_batch, query_sales, stats};
