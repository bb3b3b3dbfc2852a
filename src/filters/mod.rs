/// Filter state holder
use crate::domain::{QueryParams, Window};
use crate::utils::{coerce_number, same_value};
use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

/// Current filter values.
///
/// Every setter is a plain assignment. When the assigned value differs from the
/// current one, the full parameter set is sent to the fetch controller, one
/// message per change.
pub struct FilterState {
    params: QueryParams,
    notify: UnboundedSender<QueryParams>,
    requested: u64,
}

impl FilterState {
    pub fn new(initial: QueryParams, notify: UnboundedSender<QueryParams>) -> Self {
        Self {
            params: initial,
            notify,
            requested: 0,
        }
    }

    pub fn params(&self) -> QueryParams {
        self.params
    }

    pub fn set_window(&mut self, window: Window) {
        if self.params.window != window {
            self.params.window = window;
            self.announce();
        }
    }

    pub fn set_min_mag(&mut self, min_mag: f64) {
        if !same_value(self.params.min_mag, min_mag) {
            self.params.min_mag = min_mag;
            self.announce();
        }
    }

    /// Raw text from the magnitude field; garbage becomes `NaN` and is passed on
    pub fn set_min_mag_text(&mut self, text: &str) {
        self.set_min_mag(coerce_number(text));
    }

    pub fn set_limit(&mut self, limit: i64) {
        if self.params.limit != limit {
            self.params.limit = limit;
            self.announce();
        }
    }

    /// Number of fetch requests delivered to the controller so far
    pub fn requested(&self) -> u64 {
        self.requested
    }

    /// Ask for a fetch with the current values, changed or not
    pub fn announce(&mut self) {
        if self.notify.send(self.params).is_err() {
            warn!("fetch controller is gone; filter update dropped");
            return;
        }
        self.requested += 1;
    }
}
