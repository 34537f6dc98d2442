//! Tap dispatcher - invokes tap handlers in weight order.
//!
//! Init handlers run once and their errors are collected so every handler
//! gets its turn. Filter taps fold a value through each handler.

use std::sync::Arc;

use tipo_sdk::HostError;
use tipo_sdk::host::Host;
use tipo_sdk::types::Screen;
use tracing::{debug, error};

use super::TapRegistry;

/// Outcome of running the init tap.
#[derive(Debug, Default)]
pub struct InitReport {
    /// Handlers that ran.
    pub ran: usize,
    /// Errors returned by failing handlers, in run order.
    pub errors: Vec<HostError>,
}

impl InitReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Dispatcher for invoking taps.
#[derive(Debug, Clone)]
pub struct TapDispatcher {
    registry: Arc<TapRegistry>,
}

impl TapDispatcher {
    /// Create a new tap dispatcher.
    pub fn new(registry: Arc<TapRegistry>) -> Self {
        Self { registry }
    }

    /// Get the tap registry for handler introspection.
    pub fn registry(&self) -> &TapRegistry {
        &self.registry
    }

    /// Run every pending init handler exactly once.
    ///
    /// Handlers are removed before they run, so a second call only runs
    /// handlers attached since the first. A failing handler is logged and
    /// recorded; the rest still run.
    pub fn run_init(&self, host: &dyn Host) -> InitReport {
        let handlers = self.registry.take_init();
        let mut report = InitReport::default();

        for handler in handlers {
            report.ran += 1;
            if let Err(e) = (handler.callback)(host) {
                error!(weight = handler.weight, error = %e, "init tap failed");
                report.errors.push(e);
            }
        }

        debug!(
            ran = report.ran,
            failed = report.errors.len(),
            "init dispatch complete"
        );
        report
    }

    /// Fold contextual help through every help handler.
    ///
    /// Handlers run against a snapshot taken when dispatch starts, so a
    /// handler attached during dispatch first runs on the next call.
    pub fn contextual_help(&self, default_help: String, screen: &Screen) -> String {
        self.registry
            .help_handlers()
            .iter()
            .fold(default_help, |help, handler| (*handler.callback)(help, screen))
    }

    /// Concatenate the markup of every admin head handler.
    pub fn admin_head(&self) -> String {
        self.registry
            .head_handlers()
            .iter()
            .map(|handler| (*handler.callback)())
            .collect()
    }

    /// Fold the title placeholder through every title handler.
    pub fn title_placeholder(&self, default: String, screen: &Screen) -> String {
        self.registry
            .title_handlers()
            .iter()
            .fold(default, |title, handler| (*handler.callback)(title, screen))
    }
}
