//! Submit lifecycle shared by the form composers.

use super::schema::{FieldErrors, SchemaRef};
use super::state::{dispatch, FormAction, FormState, StateHandle};
use super::values::FormValues;
use crate::services::errors::SubmitError;
use crate::services::notify::{Notification, Notifier};
use crate::services::submit::SubmitHandler;
use crate::{console_error, console_info};

/// How a form reacts around its submit call.
#[derive(Clone, Debug, PartialEq)]
pub struct SubmitOptions {
    /// Announce success before the call settles and keep the values afterwards
    pub optimistic: bool,
    /// Restore defaults after a confirmed success (ignored when optimistic)
    pub reset_on_success: bool,
    pub show_notifications: bool,
    pub success_message: String,
    /// Shown on failure; falls back to `fallback_error_message`
    pub error_message: Option<String>,
    pub fallback_error_message: String,
}

impl Default for SubmitOptions {
    fn default() -> Self {
        Self {
            optimistic: false,
            reset_on_success: true,
            show_notifications: true,
            success_message: "Form submitted successfully".to_string(),
            error_message: None,
            fallback_error_message: "An error occurred while submitting the form".to_string(),
        }
    }
}

impl SubmitOptions {
    fn failure_message(&self) -> String {
        self.error_message
            .clone()
            .unwrap_or_else(|| self.fallback_error_message.clone())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    /// Schema rejected the values; nothing was sent
    Invalid(FieldErrors),
    /// Submission already running; the click was ignored
    Busy,
    Submitted,
    Failed(SubmitError),
}

/// Validate `values`, writing errors into the form on failure.
pub fn validate_into(
    form: &impl StateHandle<FormState>,
    schema: Option<&SchemaRef>,
    values: &FormValues,
) -> Result<FormValues, FieldErrors> {
    let Some(schema) = schema else {
        return Ok(values.clone());
    };
    match schema.validate(values) {
        Ok(validated) => {
            dispatch(form, FormAction::ClearErrors);
            Ok(validated)
        }
        Err(errors) => {
            dispatch(form, FormAction::SetErrors(errors.clone()));
            Err(errors)
        }
    }
}

/// Full submit: validate, call the handler, notify, reset or keep values.
/// The submitting flag is cleared on every path that set it.
pub async fn submit_form(
    form: &impl StateHandle<FormState>,
    schema: Option<&SchemaRef>,
    handler: &dyn SubmitHandler,
    notifier: &dyn Notifier,
    options: &SubmitOptions,
) -> SubmitOutcome {
    let snapshot = form.snapshot();
    if snapshot.is_submitting {
        return SubmitOutcome::Busy;
    }

    let values = match validate_into(form, schema, &snapshot.values) {
        Ok(values) => values,
        Err(errors) => {
            console_info!("[Form] Validation failed for {} field(s)", errors.len());
            return SubmitOutcome::Invalid(errors);
        }
    };

    dispatch(form, FormAction::SetSubmitting(true));
    if options.optimistic && options.show_notifications {
        notifier.notify(Notification::success(options.success_message.clone()));
    }

    let result = handler.submit(values).await;

    let outcome = match result {
        Ok(()) => {
            if !options.optimistic {
                if options.show_notifications {
                    notifier.notify(Notification::success(options.success_message.clone()));
                }
                if options.reset_on_success {
                    dispatch(form, FormAction::Reset);
                }
            }
            SubmitOutcome::Submitted
        }
        Err(error) => {
            console_error!("[Form] Submission failed: {}", error);
            if options.show_notifications {
                notifier.notify(Notification::error(options.failure_message()));
            }
            SubmitOutcome::Failed(error)
        }
    };

    dispatch(form, FormAction::SetSubmitting(false));
    outcome
}
