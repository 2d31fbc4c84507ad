//! Dioxus components and D3.js bridge for the water quality dashboard.
//!
//! This crate provides:
//! - `js_bridge`: Rust wrappers for the D3.js band chart via `js_sys::eval()`
//! - `state`: reactive `AppState` with Dioxus Signals, and the store handle
//!   the refresh controller writes through
//! - `form`: manual prediction form fields and their parsing
//! - `components`: RSX components (cards, gauge, banner, panels, table, modals)

pub mod components;
pub mod form;
pub mod js_bridge;
pub mod state;
