use dioxus::prelude::*;

use crate::components::{use_forms_config, use_notifier, FormField};
use crate::forms::schema::{RuleSchema, SchemaRef};
use crate::forms::state::{dispatch, FormAction, FormState};
use crate::forms::submission::{submit_form, SubmitOptions};
use crate::forms::types::{initial_values, FieldDescriptor};
use crate::forms::values::FormValues;
use crate::services::submit::OnSubmit;

#[derive(Props, PartialEq, Clone)]
pub struct FormBuilderProps {
    pub fields: Vec<FieldDescriptor>,
    /// Derived from the field hints when not given
    #[props(default)]
    pub schema: Option<SchemaRef>,
    /// Win over descriptor defaults
    #[props(default)]
    pub default_values: FormValues,
    pub on_submit: OnSubmit,
    #[props(default)]
    pub on_cancel: Option<EventHandler<()>>,
    #[props(default = "Submit".to_string())]
    pub submit_label: String,
    #[props(default = "Cancel".to_string())]
    pub cancel_label: String,
    #[props(default)]
    pub optimistic: bool,
    #[props(default)]
    pub success_message: Option<String>,
    #[props(default)]
    pub error_message: Option<String>,
    #[props(default = true)]
    pub show_notifications: bool,
    #[props(default = true)]
    pub show_reset: bool,
    #[props(default)]
    pub title: Option<String>,
}

#[component]
pub fn FormBuilder(props: FormBuilderProps) -> Element {
    let config = use_forms_config();
    let notifier = use_notifier();
    let form = use_signal(|| FormState::new(initial_values(&props.fields, &props.default_values)));

    let schema = props
        .schema
        .clone()
        .unwrap_or_else(|| SchemaRef::new(RuleSchema::from_fields(&props.fields)));
    let options = SubmitOptions {
        optimistic: props.optimistic,
        reset_on_success: true,
        show_notifications: props.show_notifications,
        success_message: props
            .success_message
            .clone()
            .unwrap_or(config.notifications.success_message.clone()),
        error_message: props.error_message.clone(),
        fallback_error_message: config.notifications.error_message.clone(),
    };
    let on_submit = props.on_submit.clone();
    let submitting = form.read().is_submitting;

    rsx! {
        form {
            class: "form-builder",
            novalidate: true,
            onsubmit: move |evt: FormEvent| {
                evt.prevent_default();
                let schema = schema.clone();
                let handler = on_submit.clone();
                let notifier = notifier.clone();
                let options = options.clone();
                spawn(async move {
                    submit_form(&form, Some(&schema), &handler, &notifier, &options).await;
                });
            },

            if let Some(title) = &props.title {
                h2 { class: "form-title", "{title}" }
            }

            for field in props.fields.iter().cloned() {
                FormField { key: "{field.name}", field, form }
            }

            div {
                class: "button-section",
                button {
                    class: "submit-button",
                    r#type: "submit",
                    disabled: submitting,
                    if submitting { "Submitting..." } else { "{props.submit_label}" }
                }
                if props.show_reset {
                    button {
                        class: "reset-button",
                        r#type: "button",
                        disabled: submitting,
                        onclick: move |_| dispatch(&form, FormAction::Reset),
                        "Reset"
                    }
                }
                if let Some(on_cancel) = props.on_cancel {
                    button {
                        class: "cancel-button",
                        r#type: "button",
                        onclick: move |_| on_cancel.call(()),
                        "{props.cancel_label}"
                    }
                }
            }
        }
    }
}
