//! Core types and API client for the water quality dashboard.
//!
//! - `model`: sensor readings, predictions, decisions and badges
//! - `api`: typed client for the prediction / IoT ingestion service
//! - `tier`: badge kind to severity tier mapping, gauge value policy
//! - `config`: dashboard configuration (base URL, cadence, coliform unit)

pub mod api;
pub mod config;
pub mod error;
pub mod model;
pub mod tier;
