//! Application state managed via Dioxus context.
//!
//! `AppState` bundles all reactive signals into a single struct provided via
//! `use_context_provider`. Child components retrieve it with `use_context::<AppState>()`.
//!
//! Everything derived from the remote service lives in one `ViewState`
//! signal; the rest are the few UI-only flags (modal visibility, form).

use crate::form::ManualForm;
use dioxus::prelude::*;
use wqd_core::config::DashboardConfig;
use wqd_state::refresh::StateHandle;
use wqd_state::store::ViewState;

/// Shared application state for the dashboard.
#[derive(Clone, Copy)]
pub struct AppState {
    /// Service-derived view state, written by the refresh controller
    pub store: Signal<ViewState>,
    /// Runtime configuration
    pub config: Signal<DashboardConfig>,
    /// Whether the delete-confirmation modal is open
    pub show_confirm: Signal<bool>,
    /// Message for the result modal; the modal is open while this is set
    pub result_message: Signal<Option<String>>,
    /// Manual prediction form fields
    pub form: Signal<ManualForm>,
    /// Validation error from the manual form
    pub form_error: Signal<Option<String>>,
}

impl AppState {
    /// Create a new AppState with default signal values.
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            store: Signal::new(ViewState::new()),
            config: Signal::new(config),
            show_confirm: Signal::new(false),
            result_message: Signal::new(None),
            form: Signal::new(ManualForm::default()),
            form_error: Signal::new(None),
        }
    }

    pub fn handle(&self) -> StoreHandle {
        StoreHandle(self.store)
    }
}

/// [`StateHandle`] over the store signal, so the refresh controller's
/// writes trigger re-renders.
#[derive(Clone, Copy)]
pub struct StoreHandle(pub Signal<ViewState>);

impl StateHandle for StoreHandle {
    fn update<R>(&self, f: impl FnOnce(&mut ViewState) -> R) -> R {
        let mut signal = self.0;
        signal.with_mut(f)
    }

    fn read<R>(&self, f: impl FnOnce(&ViewState) -> R) -> R {
        f(&*self.0.peek())
    }
}
