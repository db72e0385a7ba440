//! Headless form core
//!
//! Everything a composer needs that is independent of rendering:
//!
//! - **values**: key-path access into JSON value sets and the step merge
//! - **types**: field descriptors and control kinds
//! - **schema**: validation contract and the rule-based schema
//! - **state**: form state reducer and the handle trait used across awaits
//! - **submission**: validate / submit / notify lifecycle
//! - **wizard**: multi-step navigation and final submit
//! - **autosave**: draft mirroring and debounced saves
//! - **file_upload**: picker constraints and upload state
//! - **cascade**: dependent select chains
//! - **confirm**: delete confirmation guard

pub mod autosave;
pub mod cascade;
pub mod confirm;
pub mod file_upload;
pub mod schema;
pub mod state;
pub mod submission;
pub mod types;
pub mod values;
pub mod wizard;

#[cfg(test)]
pub mod scenarios_test;

pub use autosave::{AutosaveConfig, AutosaveOutcome, DebounceTicket, Debouncer};
pub use cascade::{CascadeState, ChildFetch, OptionsSource, OptionsSourceRef, SelectCascade};
pub use confirm::{confirm_action, ConfirmAction, RecordSummary};
pub use file_upload::{
    FileUploadHook, FileUploadState, SelectedFile, UploadEvent, UploadHook, UploadObservers,
};
pub use schema::{FieldErrors, Rule, RuleSchema, Schema, SchemaRef};
pub use state::{dispatch, FormAction, FormState, StateHandle};
pub use submission::{SubmitOptions, SubmitOutcome};
pub use types::{
    dedup_options, initial_values, ChangeCallback, CustomFieldContext, CustomRenderer, DateConfig,
    FieldDescriptor, FieldKind, FileConfig, InputKind, SelectOption, ValidationHints,
};
pub use values::FormValues;
pub use wizard::{Step, StepStatus, WizardOutcome, WizardPhase, WizardState};
