use dioxus::prelude::*;

use crate::forms::confirm::{confirm_action, ConfirmAction, RecordSummary};

#[derive(Props, PartialEq, Clone)]
pub struct ConfirmDialogProps {
    pub record: RecordSummary,
    pub on_confirm: EventHandler<()>,
    pub on_cancel: EventHandler<()>,
}

/// Delete prompt. Protected records get an explanation and no way to confirm.
#[component]
pub fn ConfirmDialog(props: ConfirmDialogProps) -> Element {
    let on_confirm = props.on_confirm;
    let on_cancel = props.on_cancel;

    let (heading, body, confirm_label, allowed) = match confirm_action(&props.record) {
        ConfirmAction::Destructive { label } => (
            "Confirm delete".to_string(),
            format!("{} will be removed. This cannot be undone.", props.record.label),
            label,
            true,
        ),
        ConfirmAction::InformationalOnly { message } => {
            ("Cannot delete".to_string(), message, "Delete".to_string(), false)
        }
    };

    rsx! {
        div {
            class: "confirm-dialog",
            role: "alertdialog",
            "aria-modal": "true",
            h3 { class: "confirm-title", "{heading}" }
            p { class: "confirm-body", "{body}" }
            if !allowed {
                p {
                    class: "confirm-note",
                    style: "color: #f59e0b; background-color: #fffbeb; border: 1px solid #f59e0b; padding: 8px; border-radius: 4px;",
                    "ℹ Default records are managed by the system."
                }
            }
            div {
                class: "button-section",
                button {
                    class: "cancel-button",
                    r#type: "button",
                    onclick: move |_| on_cancel.call(()),
                    if allowed { "Cancel" } else { "Close" }
                }
                button {
                    class: "danger-button",
                    r#type: "button",
                    disabled: !allowed,
                    onclick: move |_| {
                        if allowed {
                            on_confirm.call(());
                        }
                    },
                    "{confirm_label}"
                }
            }
        }
    }
}
