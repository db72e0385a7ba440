use dioxus::prelude::*;

use crate::components::{use_forms_config, use_notifier, FormField};
use crate::forms::autosave::{
    clear_draft, debounced_save, on_values_changed, resolve_initial_values, save_now, AutosaveConfig,
    Debouncer,
};
use crate::forms::schema::SchemaRef;
use crate::forms::state::{dispatch, FormAction, FormState};
use crate::forms::submission::SubmitOptions;
use crate::forms::types::{initial_values, FieldDescriptor};
use crate::forms::values::FormValues;
use crate::services::storage::SnapshotStoreRef;
use crate::services::submit::OnSubmit;
use crate::utils::platform::format_time_of_day;

#[derive(Props, PartialEq, Clone)]
pub struct AutosaveFormProps {
    pub fields: Vec<FieldDescriptor>,
    #[props(default)]
    pub schema: Option<SchemaRef>,
    #[props(default)]
    pub default_values: FormValues,
    pub on_submit: OnSubmit,
    /// Local draft key; no mirroring when unset
    #[props(default)]
    pub storage_key: Option<String>,
    /// Overrides the configured quiet period
    #[props(default)]
    pub debounce_ms: Option<u32>,
    #[props(default = true)]
    pub enabled: bool,
    /// LocalStorage in the browser when not given
    #[props(default)]
    pub store: Option<SnapshotStoreRef>,
    #[props(default = "Save".to_string())]
    pub submit_label: String,
    #[props(default)]
    pub title: Option<String>,
}

#[component]
pub fn AutosaveForm(props: AutosaveFormProps) -> Element {
    let forms_config = use_forms_config();
    let notifier = use_notifier();
    let store = use_hook(|| props.store.clone().unwrap_or_else(SnapshotStoreRef::platform_default));

    let mut config = AutosaveConfig::from_settings(&forms_config.autosave);
    config.storage_key = props.storage_key.clone();
    config.enabled = props.enabled;
    if let Some(debounce_ms) = props.debounce_ms {
        config.debounce_ms = debounce_ms;
    }

    let form = use_signal(|| {
        let defaults = initial_values(&props.fields, &props.default_values);
        FormState::new(resolve_initial_values(&store, config.storage_key.as_deref(), defaults))
    });
    let debouncer = use_signal(Debouncer::default);

    let on_changed = {
        let config = config.clone();
        let store = store.clone();
        let handler = props.on_submit.clone();
        let notifier = notifier.clone();
        use_callback(move |_path: String| {
            let values = form.peek().values.clone();
            let Some(ticket) = on_values_changed(&config, &store, &values, &debouncer) else {
                return;
            };
            let config = config.clone();
            let handler = handler.clone();
            let notifier = notifier.clone();
            spawn(async move {
                debounced_save(ticket, &debouncer, &form, &handler, &notifier, &config).await;
            });
        })
    };

    let options = SubmitOptions {
        success_message: forms_config.notifications.success_message.clone(),
        fallback_error_message: forms_config.notifications.error_message.clone(),
        ..SubmitOptions::default()
    };
    let schema = props.schema.clone();
    let on_submit = props.on_submit.clone();
    let storage_key = props.storage_key.clone();
    let pristine = initial_values(&props.fields, &props.default_values);

    let state = form.read();
    let submitting = state.is_submitting;
    let status = match state.last_saved_at {
        Some(at) => format!("Last saved at {}", format_time_of_day(at)),
        None if state.is_dirty() => "Unsaved changes".to_string(),
        None => String::new(),
    };
    drop(state);

    rsx! {
        div {
            class: "autosave-form",

            if let Some(title) = &props.title {
                h2 { class: "form-title", "{title}" }
            }

            for field in props.fields.iter().cloned() {
                FormField { key: "{field.name}", field, form, on_changed }
            }

            div {
                class: "button-section",
                button {
                    class: "submit-button",
                    r#type: "button",
                    disabled: submitting,
                    onclick: move |_| {
                        let schema = schema.clone();
                        let handler = on_submit.clone();
                        let notifier = notifier.clone();
                        let options = options.clone();
                        spawn(async move {
                            save_now(&form, schema.as_ref(), &handler, &notifier, &options).await;
                        });
                    },
                    if submitting { "Saving..." } else { "{props.submit_label}" }
                }
                if storage_key.is_some() {
                    button {
                        class: "reset-button",
                        r#type: "button",
                        disabled: submitting,
                        onclick: move |_| {
                            clear_draft(&store, storage_key.as_deref());
                            dispatch(&form, FormAction::Reinitialize(pristine.clone()));
                        },
                        "Discard draft"
                    }
                }
                span { class: "autosave-status", "{status}" }
            }
        }
    }
}
