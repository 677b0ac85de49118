//! Utilities Module
//!
//! Common utilities used across the crate.

pub mod logging;

pub use logging::{disable_debug, enable_debug, is_debug_enabled};
