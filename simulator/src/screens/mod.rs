//! Simulator-only pages. The instrument screens live in the common crate.

mod debug;

pub use debug::{DebugView, draw_debug_page};
