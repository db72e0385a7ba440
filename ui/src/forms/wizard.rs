//! Multi-step form state machine.
//!
//! The wizard owns the accumulated data; the step form (a plain [`FormState`])
//! is re-bound to it on every transition, so the renderer only ever edits one
//! step's fields while the full data set travels along.

use super::schema::{FieldErrors, RuleSchema, Schema, SchemaRef};
use super::state::{dispatch, FormAction, FormState, StateHandle};
use super::submission::SubmitOptions;
use super::types::{initial_values, FieldDescriptor};
use super::values::{merge_step_data, pick_paths, FormValues};
use crate::services::errors::SubmitError;
use crate::services::notify::{Notification, Notifier};
use crate::services::submit::SubmitHandler;
use crate::{console_error, console_info};

#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub fields: Vec<FieldDescriptor>,
    /// Validates this step's fields only. Derived from the field hints when unset.
    pub schema: Option<SchemaRef>,
}

impl Step {
    pub fn new(id: impl Into<String>, title: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            fields,
            schema: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn schema(mut self, schema: SchemaRef) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Run the step schema and keep only errors for this step's own fields.
    pub fn validate(&self, values: &FormValues) -> Result<FormValues, FieldErrors> {
        let result = match &self.schema {
            Some(schema) => schema.validate(values),
            None => RuleSchema::from_fields(&self.fields).validate(values),
        };
        match result {
            Ok(validated) => Ok(validated),
            Err(mut errors) => {
                let paths: Vec<&str> = self.paths().collect();
                errors.retain_paths(&paths);
                if errors.is_empty() {
                    Ok(values.clone())
                } else {
                    Err(errors)
                }
            }
        }
    }

    fn snapshot(&self, values: &FormValues) -> FormValues {
        pick_paths(values, self.paths())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WizardPhase {
    Editing,
    Submitting,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepStatus {
    Completed,
    Current,
    Pending,
}

/// What a `next` call did.
#[derive(Clone, Debug, PartialEq)]
pub enum StepTransition {
    /// Step validation failed; errors are on the step form
    Blocked,
    Advanced(usize),
    /// Last step validated; these are the merged values to submit
    ReadyToSubmit(FormValues),
}

#[derive(Clone, Debug, PartialEq)]
pub enum WizardOutcome {
    Blocked,
    Moved(usize),
    Submitted,
    Failed(SubmitError),
}

#[derive(Clone, Debug, PartialEq)]
pub struct WizardState {
    pub current_step: usize,
    pub total_steps: usize,
    pub accumulated: FormValues,
    initial: FormValues,
    pub phase: WizardPhase,
    /// Bumped each time the final submit succeeds
    pub completed_submissions: u32,
}

impl WizardState {
    pub fn new(steps: &[Step], defaults: &FormValues) -> Self {
        let all_fields: Vec<FieldDescriptor> = steps.iter().flat_map(|s| s.fields.clone()).collect();
        let initial = initial_values(&all_fields, defaults);
        Self {
            current_step: 0,
            total_steps: steps.len(),
            accumulated: initial.clone(),
            initial,
            phase: WizardPhase::Editing,
            completed_submissions: 0,
        }
    }

    /// Fresh step form bound to the accumulated data.
    pub fn step_form(&self) -> FormState {
        FormState::new(self.accumulated.clone())
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step + 1 >= self.total_steps
    }

    pub fn step_status(&self, index: usize) -> StepStatus {
        if index < self.current_step {
            StepStatus::Completed
        } else if index == self.current_step {
            StepStatus::Current
        } else {
            StepStatus::Pending
        }
    }

    pub fn can_navigate_to(&self, index: usize) -> bool {
        index < self.total_steps && index <= self.current_step + 1
    }

    fn capture(&mut self, step: &Step, step_form: &FormState) {
        self.accumulated = merge_step_data(&self.accumulated, &step.snapshot(&step_form.values));
    }

    fn rebind(&self, step_form: &mut FormState) {
        step_form.reduce_in_place(FormAction::Reinitialize(self.accumulated.clone()));
    }

    pub fn next(&mut self, steps: &[Step], step_form: &mut FormState) -> StepTransition {
        let Some(step) = steps.get(self.current_step) else {
            return StepTransition::Blocked;
        };
        if self.phase == WizardPhase::Submitting {
            return StepTransition::Blocked;
        }

        let validated = match step.validate(&step_form.values) {
            Ok(validated) => validated,
            Err(errors) => {
                console_info!("[Wizard] Step '{}' has {} invalid field(s)", step.id, errors.len());
                step_form.reduce_in_place(FormAction::SetErrors(errors));
                return StepTransition::Blocked;
            }
        };

        self.accumulated = merge_step_data(&self.accumulated, &step.snapshot(&validated));
        if self.is_last_step() {
            // Jumps can skip steps; every one must hold before the final submit
            let first_invalid = steps
                .iter()
                .enumerate()
                .find_map(|(index, s)| s.validate(&self.accumulated).err().map(|errors| (index, errors)));
            if let Some((index, errors)) = first_invalid {
                console_info!("[Wizard] Step '{}' is incomplete, returning to it", steps[index].id);
                self.current_step = index;
                self.rebind(step_form);
                step_form.reduce_in_place(FormAction::SetErrors(errors));
                return StepTransition::Blocked;
            }
            self.phase = WizardPhase::Submitting;
            return StepTransition::ReadyToSubmit(self.accumulated.clone());
        }

        self.current_step += 1;
        self.rebind(step_form);
        StepTransition::Advanced(self.current_step)
    }

    /// Step back without validating. In-progress values are kept.
    pub fn previous(&mut self, steps: &[Step], step_form: &mut FormState) -> usize {
        if let Some(step) = steps.get(self.current_step) {
            self.capture(step, step_form);
        }
        self.current_step = self.current_step.saturating_sub(1);
        self.rebind(step_form);
        self.current_step
    }

    /// Jump to `target` if it is at most one past the current step.
    pub fn go_to(&mut self, target: usize, steps: &[Step], step_form: &mut FormState) -> bool {
        if !self.can_navigate_to(target) || self.phase == WizardPhase::Submitting {
            return false;
        }
        if let Some(step) = steps.get(self.current_step) {
            self.capture(step, step_form);
        }
        self.current_step = target;
        self.rebind(step_form);
        true
    }

    /// Settle a final submit. Success starts over from the initial data.
    pub fn finish_submission(&mut self, succeeded: bool, step_form: &mut FormState) {
        self.phase = WizardPhase::Editing;
        if succeeded {
            self.accumulated = self.initial.clone();
            self.current_step = 0;
            self.completed_submissions += 1;
            self.rebind(step_form);
        }
    }
}

/// Advance the wizard and, from the last step, run the final submit.
pub async fn advance_wizard(
    wizard: &impl StateHandle<WizardState>,
    form: &impl StateHandle<FormState>,
    steps: &[Step],
    handler: &dyn SubmitHandler,
    notifier: &dyn Notifier,
    options: &SubmitOptions,
) -> WizardOutcome {
    let transition = wizard.update(|w| form.update(|f| w.next(steps, f)));
    let values = match transition {
        StepTransition::Blocked => return WizardOutcome::Blocked,
        StepTransition::Advanced(index) => return WizardOutcome::Moved(index),
        StepTransition::ReadyToSubmit(values) => values,
    };

    dispatch(form, FormAction::SetSubmitting(true));
    let result = handler.submit(values).await;
    dispatch(form, FormAction::SetSubmitting(false));

    match result {
        Ok(()) => {
            wizard.update(|w| form.update(|f| w.finish_submission(true, f)));
            if options.show_notifications {
                notifier.notify(Notification::success(options.success_message.clone()));
            }
            WizardOutcome::Submitted
        }
        Err(error) => {
            console_error!("[Wizard] Final submit failed: {}", error);
            wizard.update(|w| form.update(|f| w.finish_submission(false, f)));
            if options.show_notifications {
                let message = options
                    .error_message
                    .clone()
                    .unwrap_or_else(|| options.fallback_error_message.clone());
                notifier.notify(Notification::error(message));
            }
            WizardOutcome::Failed(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::schema::Rule;
    use crate::forms::values::as_form_values;
    use serde_json::json;

    fn steps() -> Vec<Step> {
        vec![
            Step::new(
                "company",
                "Company",
                vec![
                    FieldDescriptor::text("company.name", "Company name").required(),
                    FieldDescriptor::text("company.vat", "VAT number"),
                ],
            ),
            Step::new(
                "contact",
                "Contact",
                vec![FieldDescriptor::email("contact.email", "Email").required()],
            ),
            Step::new(
                "terms",
                "Terms",
                vec![FieldDescriptor::number("terms.days", "Payment days").default_value(json!(30))],
            ),
        ]
    }

    fn set(form: &mut FormState, path: &str, value: serde_json::Value) {
        form.reduce_in_place(FormAction::SetValue {
            path: path.into(),
            value,
        });
    }

    #[test]
    fn test_invalid_step_blocks_next() {
        let steps = steps();
        let mut wizard = WizardState::new(&steps, &FormValues::new());
        let mut form = wizard.step_form();

        assert_eq!(wizard.next(&steps, &mut form), StepTransition::Blocked);
        assert_eq!(wizard.current_step, 0);
        assert_eq!(form.error("company.name"), Some("Company name is required"));
        // Later steps' required fields are not checked yet
        assert!(form.error("contact.email").is_none());
    }

    #[test]
    fn test_values_survive_forward_and_back() {
        let steps = steps();
        let mut wizard = WizardState::new(&steps, &FormValues::new());
        let mut form = wizard.step_form();

        set(&mut form, "company.name", json!("Acme"));
        assert_eq!(wizard.next(&steps, &mut form), StepTransition::Advanced(1));
        set(&mut form, "contact.email", json!("half-typed"));
        assert_eq!(wizard.previous(&steps, &mut form), 0);

        assert_eq!(form.value("company.name"), Some(&json!("Acme")));
        // Unvalidated input from the step we left is kept
        assert_eq!(form.value("contact.email"), Some(&json!("half-typed")));
        assert!(!form.is_dirty());
    }

    #[test]
    fn test_previous_floors_at_zero() {
        let steps = steps();
        let mut wizard = WizardState::new(&steps, &FormValues::new());
        let mut form = wizard.step_form();
        assert_eq!(wizard.previous(&steps, &mut form), 0);
        assert_eq!(wizard.step_status(0), StepStatus::Current);
    }

    #[test]
    fn test_go_to_bounds() {
        let steps = steps();
        let mut wizard = WizardState::new(&steps, &FormValues::new());
        let mut form = wizard.step_form();

        assert!(!wizard.go_to(2, &steps, &mut form));
        assert_eq!(wizard.current_step, 0);
        assert!(!wizard.go_to(7, &steps, &mut form));

        set(&mut form, "company.vat", json!("PL123"));
        assert!(wizard.go_to(1, &steps, &mut form));
        assert_eq!(wizard.current_step, 1);
        assert_eq!(wizard.accumulated["company"]["vat"], json!("PL123"));
        assert_eq!(wizard.step_status(0), StepStatus::Completed);
        assert_eq!(wizard.step_status(2), StepStatus::Pending);
        assert!(wizard.can_navigate_to(2));
    }

    #[test]
    fn test_last_step_yields_merged_values() {
        let steps = steps();
        let mut wizard = WizardState::new(&steps, &FormValues::new());
        let mut form = wizard.step_form();

        set(&mut form, "company.name", json!("Acme"));
        wizard.next(&steps, &mut form);
        set(&mut form, "contact.email", json!("ap@acme.test"));
        wizard.next(&steps, &mut form);

        match wizard.next(&steps, &mut form) {
            StepTransition::ReadyToSubmit(values) => {
                assert_eq!(values["company"]["name"], json!("Acme"));
                assert_eq!(values["contact"]["email"], json!("ap@acme.test"));
                assert_eq!(values["terms"]["days"], json!(30));
            }
            other => panic!("unexpected transition {:?}", other),
        }
        assert_eq!(wizard.phase, WizardPhase::Submitting);
        assert!(!wizard.go_to(0, &steps, &mut form));
    }

    #[test]
    fn test_explicit_step_schema_scoped_to_step_fields() {
        let schema = SchemaRef::new(
            RuleSchema::new()
                .field("a", "A", vec![Rule::Required])
                .field("b", "B", vec![Rule::Required]),
        );
        let step = Step::new("one", "One", vec![FieldDescriptor::text("a", "A")]).schema(schema);
        let values = as_form_values(json!({"a": "x", "b": ""})).unwrap();
        assert!(step.validate(&values).is_ok());
    }

    #[test]
    fn test_final_next_returns_to_skipped_invalid_step() {
        let steps = steps();
        let mut wizard = WizardState::new(&steps, &FormValues::new());
        let mut form = wizard.step_form();

        assert!(wizard.go_to(1, &steps, &mut form));
        set(&mut form, "contact.email", json!("ap@acme.test"));
        assert!(wizard.go_to(2, &steps, &mut form));
        assert!(wizard.is_last_step());

        assert_eq!(wizard.next(&steps, &mut form), StepTransition::Blocked);
        assert_eq!(wizard.current_step, 0);
        assert_eq!(wizard.phase, WizardPhase::Editing);
        assert_eq!(form.error("company.name"), Some("Company name is required"));
        // What was typed on the skipped-to steps is kept
        assert_eq!(form.value("contact.email"), Some(&json!("ap@acme.test")));

        set(&mut form, "company.name", json!("Acme"));
        assert!(wizard.go_to(1, &steps, &mut form));
        assert!(wizard.go_to(2, &steps, &mut form));
        assert!(matches!(
            wizard.next(&steps, &mut form),
            StepTransition::ReadyToSubmit(_)
        ));
    }
}
