//! User Interface Components
//!
//! Dioxus wiring over the headless `forms` core:
//!
//! - **field**: one control per field descriptor
//! - **file_input**: file picker with constraint checks and upload status
//! - **form_builder**: single-page form composer
//! - **multi_step**: wizard composer and its step indicator
//! - **autosave_form**: form composer with draft mirroring and debounced saves
//! - **cascade_select**: dependent select chains
//! - **confirm_dialog**: delete confirmation
//! - **toasts**: notification host
//! - **validation_feedback**: per-field error message

use dioxus::prelude::*;

use crate::services::config::FormsConfig;

pub mod autosave_form;
pub mod cascade_select;
pub mod confirm_dialog;
pub mod field;
pub mod file_input;
pub mod form_builder;
pub mod multi_step;
pub mod toasts;
pub mod validation_feedback;

pub use autosave_form::AutosaveForm;
pub use cascade_select::{CascadeLevel, CascadingSelects};
pub use confirm_dialog::ConfirmDialog;
pub use field::FormField;
pub use file_input::FileUploadField;
pub use form_builder::FormBuilder;
pub use multi_step::{MultiStepForm, StepIndicator};
pub use toasts::{use_notifier, ToastHost, ToastNotifier};
pub use validation_feedback::FieldErrorMessage;

/// Configuration from context, or the defaults when no page provided one.
pub fn use_forms_config() -> FormsConfig {
    try_use_context::<FormsConfig>().unwrap_or_default()
}
