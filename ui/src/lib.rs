//! Form composition layer for the ledger admin UI.
//!
//! `forms` holds the headless state machines (values, validation, wizard,
//! autosave, cascades), `components` the Dioxus views over them and
//! `services` the configuration, notification, storage and REST plumbing.

pub mod app;
pub use app::AdminConsole;

pub mod components;
pub mod forms;
pub mod services;
pub mod utils;
