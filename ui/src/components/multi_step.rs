use dioxus::prelude::*;

use crate::components::{use_forms_config, use_notifier, FormField};
use crate::forms::state::FormState;
use crate::forms::submission::SubmitOptions;
use crate::forms::values::FormValues;
use crate::forms::wizard::{advance_wizard, Step, StepStatus, WizardPhase, WizardState};
use crate::services::submit::OnSubmit;

#[derive(Props, PartialEq, Clone)]
pub struct MultiStepFormProps {
    pub steps: Vec<Step>,
    #[props(default)]
    pub default_values: FormValues,
    pub on_submit: OnSubmit,
    #[props(default = "Submit".to_string())]
    pub submit_label: String,
    #[props(default)]
    pub success_message: Option<String>,
    #[props(default)]
    pub error_message: Option<String>,
    #[props(default = true)]
    pub show_notifications: bool,
    #[props(default)]
    pub title: Option<String>,
}

#[component]
pub fn MultiStepForm(props: MultiStepFormProps) -> Element {
    let config = use_forms_config();
    let notifier = use_notifier();
    let wizard = use_signal(|| WizardState::new(&props.steps, &props.default_values));
    let form = use_signal(|| wizard.peek().step_form());

    let options = SubmitOptions {
        optimistic: false,
        reset_on_success: true,
        show_notifications: props.show_notifications,
        success_message: props
            .success_message
            .clone()
            .unwrap_or(config.notifications.success_message.clone()),
        error_message: props.error_message.clone(),
        fallback_error_message: config.notifications.error_message.clone(),
    };

    let snapshot = wizard();
    let Some(step) = props.steps.get(snapshot.current_step).cloned() else {
        return rsx! {};
    };
    let busy = snapshot.phase == WizardPhase::Submitting || form.read().is_submitting;
    let titles: Vec<String> = props.steps.iter().map(|s| s.title.clone()).collect();

    let steps_for_next = props.steps.clone();
    let steps_for_back = props.steps.clone();
    let steps_for_jump = props.steps.clone();
    let on_submit = props.on_submit.clone();

    rsx! {
        div {
            class: "multi-step-form",

            if let Some(title) = &props.title {
                h2 { class: "form-title", "{title}" }
            }

            StepIndicator {
                titles,
                wizard,
                on_select: move |index: usize| {
                    let mut wizard = wizard;
                    let mut form = form;
                    wizard.with_mut(|w| form.with_mut(|f| w.go_to(index, &steps_for_jump, f)));
                },
            }

            div {
                class: "step-body",
                h3 { class: "step-title", "{step.title}" }
                if let Some(description) = &step.description {
                    p { class: "step-description", "{description}" }
                }
                for field in step.fields.iter().cloned() {
                    FormField { key: "{step.id}-{field.name}", field, form }
                }
            }

            div {
                class: "button-section",
                button {
                    class: "back-button",
                    r#type: "button",
                    disabled: busy || snapshot.current_step == 0,
                    onclick: move |_| {
                        let mut wizard = wizard;
                        let mut form = form;
                        wizard.with_mut(|w| form.with_mut(|f| w.previous(&steps_for_back, f)));
                    },
                    "Back"
                }
                button {
                    class: "next-button",
                    r#type: "button",
                    disabled: busy,
                    onclick: move |_| {
                        let steps = steps_for_next.clone();
                        let handler = on_submit.clone();
                        let notifier = notifier.clone();
                        let options = options.clone();
                        spawn(async move {
                            advance_wizard(&wizard, &form, &steps, &handler, &notifier, &options).await;
                        });
                    },
                    if busy {
                        "Submitting..."
                    } else if snapshot.is_last_step() {
                        "{props.submit_label}"
                    } else {
                        "Next"
                    }
                }
            }
        }
    }
}

#[derive(Props, PartialEq, Clone)]
pub struct StepIndicatorProps {
    pub titles: Vec<String>,
    pub wizard: Signal<WizardState>,
    pub on_select: EventHandler<usize>,
}

/// Completed, current and pending markers; only reachable steps are clickable.
#[component]
pub fn StepIndicator(props: StepIndicatorProps) -> Element {
    let wizard = props.wizard.read();
    let items: Vec<(usize, usize, String, &'static str, bool)> = props
        .titles
        .iter()
        .enumerate()
        .map(|(index, title)| {
            let navigable = wizard.can_navigate_to(index)
                && wizard.phase == WizardPhase::Editing
                && index != wizard.current_step;
            let class = match wizard.step_status(index) {
                StepStatus::Completed => "step completed",
                StepStatus::Current => "step current",
                StepStatus::Pending => "step pending",
            };
            (index, index + 1, title.clone(), class, navigable)
        })
        .collect();
    let current = wizard.current_step;
    let on_select = props.on_select;

    rsx! {
        ol {
            class: "step-indicator",
            for (index, number, title, class, navigable) in items {
                li {
                    key: "{index}",
                    class,
                    "aria-current": if index == current { "step" } else { "false" },
                    if navigable {
                        button {
                            class: "step-link",
                            r#type: "button",
                            onclick: move |_| on_select.call(index),
                            span { class: "step-number", "{number}" }
                            span { class: "step-label", "{title}" }
                        }
                    } else {
                        span { class: "step-number", "{number}" }
                        span { class: "step-label", "{title}" }
                    }
                }
            }
        }
    }
}
