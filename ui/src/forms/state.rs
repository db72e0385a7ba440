// Form state and its reducer - no dioxus rendering here, only the Signal binding
use dioxus::prelude::*;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use super::schema::FieldErrors;
use super::values::{get_path, set_path, FormValues};

/// Live values, errors and flags for one form instance.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FormState {
    pub values: FormValues,
    pub defaults: FormValues,
    pub errors: FieldErrors,
    pub touched: BTreeSet<String>,
    /// Paths changed since the last reset or successful save
    pub dirty: BTreeSet<String>,
    /// Bumped on every value change
    pub revision: u64,
    pub is_submitting: bool,
    pub last_saved_at: Option<f64>,
}

/// Action enum for state mutations
#[derive(Clone, Debug, PartialEq)]
pub enum FormAction {
    SetValue { path: String, value: Value },
    Touch(String),
    SetErrors(FieldErrors),
    ClearErrors,
    SetSubmitting(bool),
    /// Back to the defaults the form was created with
    Reset,
    /// Replace values and defaults, e.g. when a wizard step is re-bound
    Reinitialize(FormValues),
    /// A save of `revision` succeeded at `at`
    MarkSaved { revision: u64, at: f64 },
}

impl FormState {
    pub fn new(defaults: FormValues) -> Self {
        Self {
            values: defaults.clone(),
            defaults,
            ..Self::default()
        }
    }

    pub fn reduce_in_place(&mut self, action: FormAction) {
        match action {
            FormAction::SetValue { path, value } => {
                set_path(&mut self.values, &path, value);
                self.errors.remove(&path);
                self.touched.insert(path.clone());
                self.dirty.insert(path);
                self.revision += 1;
            }
            FormAction::Touch(path) => {
                self.touched.insert(path);
            }
            FormAction::SetErrors(errors) => {
                self.errors = errors;
            }
            FormAction::ClearErrors => {
                self.errors = FieldErrors::new();
            }
            FormAction::SetSubmitting(submitting) => {
                self.is_submitting = submitting;
            }
            FormAction::Reset => {
                self.values = self.defaults.clone();
                self.clear_tracking();
            }
            FormAction::Reinitialize(values) => {
                self.defaults = values.clone();
                self.values = values;
                self.clear_tracking();
            }
            FormAction::MarkSaved { revision, at } => {
                self.last_saved_at = Some(at);
                // Edits made while the save was in flight stay dirty
                if revision == self.revision {
                    self.dirty.clear();
                }
            }
        }
    }

    fn clear_tracking(&mut self) {
        self.errors = FieldErrors::new();
        self.touched.clear();
        self.dirty.clear();
        self.revision += 1;
    }

    pub fn value(&self, path: &str) -> Option<&Value> {
        get_path(&self.values, path)
    }

    pub fn error(&self, path: &str) -> Option<&str> {
        self.errors.get(path)
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }
}

/// Shared, mutable access to a piece of state across await points.
///
/// Components hand a `Signal` to the async lifecycle functions; tests hand an
/// `Rc<RefCell<_>>`.
pub trait StateHandle<T> {
    fn snapshot(&self) -> T;
    fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R;
}

impl<T: Clone + 'static> StateHandle<T> for Signal<T> {
    fn snapshot(&self) -> T {
        (*self.peek()).clone()
    }

    fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut signal = *self;
        signal.with_mut(f)
    }
}

impl<T: Clone> StateHandle<T> for Rc<RefCell<T>> {
    fn snapshot(&self) -> T {
        self.borrow().clone()
    }

    fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.borrow_mut())
    }
}

/// Reducer shorthand for form handles.
pub fn dispatch(handle: &impl StateHandle<FormState>, action: FormAction) {
    handle.update(|state| state.reduce_in_place(action));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::values::as_form_values;
    use serde_json::json;

    fn state() -> FormState {
        FormState::new(as_form_values(json!({"name": "", "term": "30"})).unwrap())
    }

    #[test]
    fn test_set_value_tracks_dirty_and_clears_field_error() {
        let mut form = state();
        let mut errors = FieldErrors::new();
        errors.insert("name", "Name is required");
        errors.insert("term", "Term has an unsupported value");
        form.reduce_in_place(FormAction::SetErrors(errors));

        form.reduce_in_place(FormAction::SetValue {
            path: "name".into(),
            value: json!("Acme"),
        });

        assert_eq!(form.value("name"), Some(&json!("Acme")));
        assert!(form.is_dirty());
        assert!(form.touched.contains("name"));
        assert_eq!(form.error("name"), None);
        assert_eq!(form.error("term"), Some("Term has an unsupported value"));
        assert_eq!(form.revision, 1);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut form = state();
        form.reduce_in_place(FormAction::SetValue {
            path: "name".into(),
            value: json!("Acme"),
        });
        form.reduce_in_place(FormAction::Reset);
        assert_eq!(form.value("name"), Some(&json!("")));
        assert!(!form.is_dirty());
        assert!(form.touched.is_empty());
    }

    #[test]
    fn test_mark_saved_ignores_stale_revision() {
        let mut form = state();
        form.reduce_in_place(FormAction::SetValue {
            path: "name".into(),
            value: json!("A"),
        });
        let saved_revision = form.revision;
        form.reduce_in_place(FormAction::SetValue {
            path: "name".into(),
            value: json!("Ab"),
        });

        form.reduce_in_place(FormAction::MarkSaved {
            revision: saved_revision,
            at: 10.0,
        });
        assert_eq!(form.last_saved_at, Some(10.0));
        assert!(form.is_dirty());

        form.reduce_in_place(FormAction::MarkSaved {
            revision: form.revision,
            at: 20.0,
        });
        assert!(!form.is_dirty());
    }

    #[test]
    fn test_reinitialize_replaces_defaults() {
        let mut form = state();
        let next = as_form_values(json!({"name": "Acme", "term": "60"})).unwrap();
        form.reduce_in_place(FormAction::Reinitialize(next.clone()));
        assert_eq!(form.values, next);
        form.reduce_in_place(FormAction::Reset);
        assert_eq!(form.values, next);
    }

    #[test]
    fn test_rc_handle_dispatch() {
        let handle = Rc::new(RefCell::new(state()));
        dispatch(&handle, FormAction::SetSubmitting(true));
        assert!(handle.snapshot().is_submitting);
    }
}
