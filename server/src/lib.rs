//! Salesboard server: sales records query API over CSV, SQLite or PostgreSQL

pub mod api;
pub mod app;
pub mod core;
pub mod data;
pub mod domain;
pub mod utils;
