use dioxus::prelude::*;

use crate::components::FieldErrorMessage;
use crate::forms::cascade::{change_parent, CascadeState, OptionsSourceRef, SelectCascade};
use crate::forms::state::FormState;
use crate::forms::types::{dedup_options, SelectOption};
use crate::forms::values::value_as_text;
use crate::utils::validation::{field_class, field_style};

#[derive(Clone, Debug, PartialEq)]
pub struct CascadeLevel {
    pub path: String,
    pub label: String,
}

impl CascadeLevel {
    pub fn new(path: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
        }
    }
}

struct LevelRow {
    level: CascadeLevel,
    current: String,
    options: Vec<SelectOption>,
    /// Parent still blank or options in flight
    locked: bool,
    has_error: bool,
    error: Option<String>,
    placeholder: String,
}

/// One row per level; a level stays locked until its parent has a value.
fn level_rows(
    state: &FormState,
    loaded: &CascadeState,
    levels: &[CascadeLevel],
    root_options: &[SelectOption],
) -> Vec<LevelRow> {
    let mut parent_blank = false;
    levels
        .iter()
        .enumerate()
        .map(|(index, level)| {
            let current = value_as_text(state.value(&level.path));
            let options = if index == 0 {
                dedup_options(root_options.to_vec())
            } else {
                loaded.options_for(&level.path).to_vec()
            };
            let locked = parent_blank || loaded.is_loading(&level.path);
            parent_blank = current.is_empty();
            let error = state.error(&level.path).map(str::to_string);
            LevelRow {
                placeholder: format!("Select {}", level.label.to_lowercase()),
                level: level.clone(),
                current,
                options,
                locked,
                has_error: error.is_some(),
                error,
            }
        })
        .collect()
}

#[derive(Props, PartialEq, Clone)]
pub struct CascadingSelectsProps {
    pub form: Signal<FormState>,
    /// Root first
    pub levels: Vec<CascadeLevel>,
    pub root_options: Vec<SelectOption>,
    pub source: OptionsSourceRef,
    #[props(default)]
    pub disabled: bool,
}

#[component]
pub fn CascadingSelects(props: CascadingSelectsProps) -> Element {
    let cascade_state = use_signal(CascadeState::default);
    let form = props.form;
    let cascade = SelectCascade::new(props.levels.iter().map(|level| level.path.clone()));

    let rows = level_rows(&form.read(), &cascade_state.read(), &props.levels, &props.root_options);

    rsx! {
        div {
            class: "cascading-selects",
            for LevelRow { level, current, options, locked, has_error, error, placeholder } in rows {
                div {
                    key: "{level.path}",
                    class: "form-field",
                    label { class: "input-label", r#for: "{level.path}", "{level.label}" }
                    select {
                        id: "{level.path}",
                        name: "{level.path}",
                        class: field_class(has_error),
                        style: field_style(has_error),
                        "aria-invalid": has_error,
                        disabled: props.disabled || locked,
                        onchange: {
                            let cascade = cascade.clone();
                            let source = props.source.clone();
                            let path = level.path.clone();
                            move |evt: FormEvent| {
                                let cascade = cascade.clone();
                                let source = source.clone();
                                let path = path.clone();
                                async move {
                                    change_parent(&cascade_state, &form, &cascade, &source, &path, &evt.value()).await;
                                }
                            }
                        },
                        option { value: "", selected: current.is_empty(), "{placeholder}" }
                        for opt in options {
                            option {
                                key: "{opt.value}",
                                value: "{opt.value}",
                                selected: opt.value == current,
                                "{opt.label}"
                            }
                        }
                    }
                    FieldErrorMessage { message: error }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::schema::FieldErrors;
    use crate::forms::state::FormAction;
    use serde_json::json;

    fn levels() -> Vec<CascadeLevel> {
        vec![
            CascadeLevel::new("org.company", "Company"),
            CascadeLevel::new("org.division", "Division"),
        ]
    }

    #[test]
    fn test_rows_flag_levels_with_errors() {
        let mut state = FormState::new(Default::default());
        state.reduce_in_place(FormAction::SetValue {
            path: "org.company".to_string(),
            value: json!("acme"),
        });
        let mut errors = FieldErrors::new();
        errors.insert("org.division", "Division is required");
        state.reduce_in_place(FormAction::SetErrors(errors));

        let rows = level_rows(&state, &CascadeState::default(), &levels(), &[]);

        assert!(!rows[0].has_error);
        assert_eq!(rows[0].error, None);
        assert!(rows[1].has_error);
        assert_eq!(rows[1].error.as_deref(), Some("Division is required"));
        assert_eq!(rows[1].placeholder, "Select division");
    }

    #[test]
    fn test_rows_lock_children_of_blank_parent() {
        let state = FormState::new(Default::default());
        let rows = level_rows(&state, &CascadeState::default(), &levels(), &[]);

        assert!(!rows[0].locked);
        assert!(rows[1].locked);
        assert!(rows.iter().all(|row| !row.has_error));
    }
}
