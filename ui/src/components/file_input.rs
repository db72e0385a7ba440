use dioxus::prelude::*;
use serde_json::Value;

use crate::forms::file_upload::{
    check_file, guess_mime, process_selection, require_size, FileUploadState, SelectedFile,
    SelectionOutcome,
};
use crate::forms::types::FileConfig;
use crate::utils::platform::show_blocking_alert;
use crate::utils::validation::field_class;

#[derive(Props, PartialEq, Clone)]
pub struct FileUploadFieldProps {
    pub name: String,
    /// Constraints, upload hook and the transition observers
    pub config: FileConfig,
    #[props(default)]
    pub disabled: bool,
    #[props(default)]
    pub has_error: bool,
    /// Receives the value to store in the bound field (`Null` on removal)
    pub on_value: EventHandler<Value>,
}

#[component]
pub fn FileUploadField(props: FileUploadFieldProps) -> Element {
    let upload = use_signal(FileUploadState::default);
    let FileUploadFieldProps {
        name,
        config,
        disabled,
        has_error,
        on_value,
    } = props;

    let accept = config.accept.join(",");
    let state = upload();

    rsx! {
        div {
            class: "file-upload",
            input {
                id: "{name}",
                name: "{name}",
                class: field_class(has_error),
                r#type: "file",
                accept: "{accept}",
                disabled: disabled || state.uploading,
                onchange: {
                    let config = config.clone();
                    move |evt: FormEvent| {
                        let config = config.clone();
                        async move {
                            let Some(engine) = evt.files() else {
                                return;
                            };
                            let Some(file_name) = engine.files().into_iter().next() else {
                                return;
                            };
                            let size_bytes = match require_size(&file_name, engine.file_size(&file_name).await) {
                                Ok(size_bytes) => size_bytes,
                                Err(refused) => {
                                    show_blocking_alert(&refused.to_string());
                                    return;
                                }
                            };
                            let mime = guess_mime(&file_name).to_string();
                            // Contents are only read for files that pass the checks
                            let contents = if check_file(&config, &file_name, size_bytes, &mime).is_ok() {
                                engine.read_file(&file_name).await.unwrap_or_default()
                            } else {
                                Vec::new()
                            };
                            let file = SelectedFile {
                                name: file_name,
                                size_bytes,
                                mime,
                                contents,
                            };

                            let observers = config.observers.clone();
                            let outcome = process_selection(&upload, &config, file, show_blocking_alert, |event| {
                                observers.dispatch(&event)
                            })
                            .await;
                            if let SelectionOutcome::Accepted(value) = outcome {
                                on_value.call(value);
                            }
                        }
                    }
                },
            }

            if let Some(selected) = &state.selected {
                div {
                    class: "file-selected",
                    span { class: "file-name", "{selected.name}" }
                    span { class: "file-size", {format!(" ({})", format_size(selected.size_bytes))} }
                    button {
                        class: "file-remove-button",
                        r#type: "button",
                        disabled: disabled || state.uploading,
                        onclick: {
                            let observers = config.observers.clone();
                            move |_| {
                                let mut upload = upload;
                                let event = upload.with_mut(|s| s.remove());
                                on_value.call(Value::Null);
                                observers.dispatch(&event);
                            }
                        },
                        "Remove"
                    }
                }
            }

            if state.uploading {
                div { class: "file-status uploading", "⏳ Uploading..." }
            }
            if state.succeeded && !state.uploading {
                div { class: "file-status success", "✓ Uploaded" }
            }
            if let Some(error) = &state.error {
                div {
                    class: "file-status error",
                    style: "color: #ef4444;",
                    "⚠ {error}"
                }
            }
        }
    }
}

fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let bytes = bytes as f64;
    if bytes >= KB * KB {
        format!("{:.1} MB", bytes / (KB * KB))
    } else if bytes >= KB {
        format!("{:.1} KB", bytes / KB)
    } else {
        format!("{} B", bytes)
    }
}
