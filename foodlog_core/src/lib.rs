#![forbid(unsafe_code)]

//! Core domain model and business logic for FoodLogr.
//!
//! This crate provides:
//! - Domain types (food entries, daily logs, settings, cached foods)
//! - Macro and weekly report calculations (pure, no I/O)
//! - File-backed document store
//! - API key authentication
//! - The tool operations exposed to callers
//! - CSV export

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod macros;
pub mod reports;
pub mod store;
pub mod auth;
pub mod tools;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use macros::{calories_from_macros, round1, sum_totals, summarize, MacroTotals};
pub use reports::{caloric_balance, generate_weekly_report, summarize_day};
pub use store::{FileStore, FoodLogStore};
pub use auth::AuthClient;
pub use tools::Tools;
