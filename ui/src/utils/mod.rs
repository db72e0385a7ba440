//! Utility Functions and Cross-Cutting Concerns
//!
//! - **console_macros**: logging macros (browser console on wasm, tracing elsewhere)
//! - **platform**: timestamps, timers and the blocking alert
//! - **validation**: CSS helpers for invalid controls and a basic email check

pub mod console_macros;
pub mod platform;
pub mod validation;

pub use platform::*;
pub use validation::*;
