//! Sales dataset domain logic
//!
//! Storage-agnostic pieces shared by every backend: the field name table,
//! the record mapper, the query model, the in-memory pipeline,
//! filter option extraction and summary stats.

pub mod fields;
pub mod options;
pub mod pipeline;
pub mod query;
pub mod record;
pub mod stats;

pub use fields::{FIELDS, Field, FieldDef, FieldKind};
pub use options::{AgeRange, FilterOptions, OptionsCollector, extract_filter_options};
pub use query::{PageWindow, SalesFilters, SalesPage, SalesQuery, SortKey};
pub use record::{FieldValue, SaleRecord};
pub use stats::SalesStats;
