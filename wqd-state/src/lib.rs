//! View-state reconciliation for the water quality dashboard.
//!
//! Shared by the browser dashboard and the CLI:
//! - `history`: bounded chart buffer and history table rows
//! - `store`: `ViewState` and its transitions
//! - `refresh`: the refresh controller that drives the API client
//! - `view`: pure view models derived from `ViewState`

pub mod history;
pub mod refresh;
pub mod store;
pub mod view;
