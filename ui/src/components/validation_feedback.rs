use dioxus::prelude::*;

#[derive(Props, PartialEq, Clone)]
pub struct FieldErrorMessageProps {
    pub message: Option<String>,
}

#[component]
pub fn FieldErrorMessage(props: FieldErrorMessageProps) -> Element {
    match props.message {
        Some(message) => rsx! {
            div {
                class: "validation-feedback error",
                role: "alert",
                style: "color: #ef4444; background-color: #fef2f2; border: 1px solid #ef4444; padding: 8px; border-radius: 4px; margin-top: 4px;",
                "⚠ {message}"
            }
        },
        None => rsx! {},
    }
}
