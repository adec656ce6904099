//! SQLite repositories
//!
//! Row types (SaleRow) should be imported from `crate::data::types`.

pub mod sale;

pub use sale::{delete_all, filter_options, insert_batch, query_sales, stats};
