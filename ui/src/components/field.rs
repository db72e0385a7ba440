use dioxus::prelude::*;
use serde_json::Value;

use crate::components::{FieldErrorMessage, FileUploadField};
use crate::forms::state::{dispatch, FormAction, FormState};
use crate::forms::types::{dedup_options, CustomFieldContext, FieldDescriptor, FieldKind, InputKind};
use crate::forms::values::{number_input_value, value_as_text};
use crate::utils::validation::{field_class, field_style};

#[derive(Props, PartialEq, Clone)]
pub struct FormFieldProps {
    pub field: FieldDescriptor,
    pub form: Signal<FormState>,
    #[props(default)]
    pub disabled: bool,
    /// Called with the field path after the form state has been updated
    #[props(default)]
    pub on_changed: Option<EventHandler<String>>,
}

/// Renders exactly one control for `field`, bound to `form`.
#[component]
pub fn FormField(props: FormFieldProps) -> Element {
    let FormFieldProps {
        field,
        form,
        disabled,
        on_changed,
    } = props;

    let path = field.name.clone();
    let (value, error, submitting) = {
        let state = form.read();
        (
            state.value(&path).cloned(),
            state.error(&path).map(str::to_string),
            state.is_submitting,
        )
    };
    let has_error = error.is_some();
    let disabled = disabled || field.disabled || submitting;
    let text = value_as_text(value.as_ref());
    let invalid = if has_error { "true" } else { "false" };

    let on_input = {
        let path = path.clone();
        let callback = field.on_change.clone();
        use_callback(move |new_value: Value| {
            dispatch(
                &form,
                FormAction::SetValue {
                    path: path.clone(),
                    value: new_value,
                },
            );
            if let Some(callback) = &callback {
                callback.call(&path, &form.peek().values);
            }
            if let Some(on_changed) = on_changed {
                on_changed.call(path.clone());
            }
        })
    };

    if field.hidden {
        return rsx! {};
    }

    let on_blur = {
        let path = path.clone();
        move |_: FocusEvent| dispatch(&form, FormAction::Touch(path.clone()))
    };

    let control = match &field.kind {
        FieldKind::Input(kind) => {
            let kind = *kind;
            let hints = &field.hints;
            rsx! {
                input {
                    id: "{path}",
                    name: "{path}",
                    class: field_class(has_error),
                    style: field_style(has_error),
                    r#type: kind.as_str(),
                    value: "{text}",
                    placeholder: field.placeholder.clone().unwrap_or_default(),
                    disabled,
                    required: hints.required,
                    min: hints.min.map(|n| n.to_string()),
                    max: hints.max.map(|n| n.to_string()),
                    step: hints.step.map(|n| n.to_string()),
                    minlength: hints.min_length.map(|n| n.to_string()),
                    maxlength: hints.max_length.map(|n| n.to_string()),
                    "aria-invalid": invalid,
                    oninput: move |evt: FormEvent| {
                        let raw = evt.value();
                        if kind == InputKind::Number {
                            on_input.call(number_input_value(&raw));
                        } else {
                            on_input.call(Value::String(raw));
                        }
                    },
                    onblur: on_blur,
                }
            }
        }
        FieldKind::TextArea { rows } => rsx! {
            textarea {
                id: "{path}",
                name: "{path}",
                class: field_class(has_error),
                style: field_style(has_error),
                rows: "{rows}",
                value: "{text}",
                placeholder: field.placeholder.clone().unwrap_or_default(),
                disabled,
                maxlength: field.hints.max_length.map(|n| n.to_string()),
                "aria-invalid": invalid,
                oninput: move |evt: FormEvent| on_input.call(Value::String(evt.value())),
                onblur: on_blur,
            }
        },
        FieldKind::Select { options } => {
            let options = dedup_options(options.clone());
            let placeholder = field
                .placeholder
                .clone()
                .unwrap_or_else(|| format!("Select {}", field.label.to_lowercase()));
            rsx! {
                select {
                    id: "{path}",
                    name: "{path}",
                    class: field_class(has_error),
                    style: field_style(has_error),
                    disabled,
                    "aria-invalid": invalid,
                    onchange: move |evt: FormEvent| on_input.call(Value::String(evt.value())),
                    onblur: on_blur,
                    option { value: "", selected: text.is_empty(), "{placeholder}" }
                    for opt in options {
                        option {
                            key: "{opt.value}",
                            value: "{opt.value}",
                            selected: opt.value == text,
                            "{opt.label}"
                        }
                    }
                }
            }
        }
        FieldKind::Date(bounds) | FieldKind::DateTime(bounds) => {
            let input_type = if matches!(field.kind, FieldKind::Date(_)) {
                "date"
            } else {
                "datetime-local"
            };
            rsx! {
                input {
                    id: "{path}",
                    name: "{path}",
                    class: field_class(has_error),
                    style: field_style(has_error),
                    r#type: input_type,
                    value: "{text}",
                    min: bounds.min.clone(),
                    max: bounds.max.clone(),
                    disabled,
                    "aria-invalid": invalid,
                    onchange: move |evt: FormEvent| on_input.call(Value::String(evt.value())),
                    onblur: on_blur,
                }
            }
        }
        FieldKind::File(config) => rsx! {
            FileUploadField {
                name: path.clone(),
                config: config.clone(),
                disabled,
                has_error,
                on_value: on_input,
            }
        },
        FieldKind::Custom(renderer) => renderer.render(CustomFieldContext {
            name: path.clone(),
            label: field.label.clone(),
            value,
            error: error.clone(),
            disabled,
            on_input,
        }),
    };

    rsx! {
        div {
            class: if has_error { "form-field has-error" } else { "form-field" },
            label {
                class: "input-label",
                r#for: "{path}",
                "{field.label}"
                if field.hints.required {
                    span { class: "required-marker", " *" }
                }
            }
            {control}
            if let Some(help) = &field.help_text {
                p { class: "help-text", "{help}" }
            }
            FieldErrorMessage { message: error }
        }
    }
}
