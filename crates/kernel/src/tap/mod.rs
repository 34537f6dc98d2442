//! Tap system for host extension points.
//!
//! Taps are named extension points that declarations attach handlers to.
//! When a tap is invoked, its handlers run in weight order (lower = higher
//! priority).

mod dispatcher;
mod registry;

pub use dispatcher::{InitReport, TapDispatcher};
pub use registry::{
    DEFAULT_WEIGHT, KNOWN_TAPS, TAP_ADMIN_HEAD, TAP_CONTEXTUAL_HELP, TAP_ENTER_TITLE_HERE,
    TAP_INIT, TapHandler, TapRegistry,
};
