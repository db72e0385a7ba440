//! File picker constraints and upload state.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::rc::Rc;

use super::state::StateHandle;
use super::types::FileConfig;
use crate::services::errors::FileConstraintError;
use crate::{console_error, console_info};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// What the picker handed us.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub size_bytes: u64,
    pub mime: String,
    pub contents: Vec<u8>,
}

impl SelectedFile {
    pub fn info(&self) -> SelectedFileInfo {
        SelectedFileInfo {
            name: self.name.clone(),
            size_bytes: self.size_bytes,
            mime: self.mime.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SelectedFileInfo {
    pub name: String,
    pub size_bytes: u64,
    pub mime: String,
}

/// Caller's upload step. `Ok(Some(v))` stores `v` in the bound field instead
/// of the file name (e.g. a document id returned by the server).
#[async_trait(?Send)]
pub trait FileUploadHook {
    async fn upload(&self, file: SelectedFile) -> Result<Option<Value>, String>;
}

#[derive(Clone)]
pub struct UploadHook(Rc<dyn FileUploadHook>);

impl UploadHook {
    pub fn new(hook: impl FileUploadHook + 'static) -> Self {
        Self(Rc::new(hook))
    }

    pub async fn upload(&self, file: SelectedFile) -> Result<Option<Value>, String> {
        self.0.upload(file).await
    }
}

impl PartialEq for UploadHook {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for UploadHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UploadHook(..)")
    }
}

/// Caller callbacks for the four upload transitions, carried by [`FileConfig`].
/// Each one is independent; unset ones are skipped.
#[derive(Clone, Default)]
pub struct UploadObservers {
    on_start: Option<Rc<dyn Fn(&SelectedFileInfo)>>,
    on_success: Option<Rc<dyn Fn(&SelectedFileInfo)>>,
    on_error: Option<Rc<dyn Fn(&str)>>,
    on_remove: Option<Rc<dyn Fn()>>,
}

impl UploadObservers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_start(mut self, f: impl Fn(&SelectedFileInfo) + 'static) -> Self {
        self.on_start = Some(Rc::new(f));
        self
    }

    pub fn on_success(mut self, f: impl Fn(&SelectedFileInfo) + 'static) -> Self {
        self.on_success = Some(Rc::new(f));
        self
    }

    pub fn on_error(mut self, f: impl Fn(&str) + 'static) -> Self {
        self.on_error = Some(Rc::new(f));
        self
    }

    pub fn on_remove(mut self, f: impl Fn() + 'static) -> Self {
        self.on_remove = Some(Rc::new(f));
        self
    }

    pub fn dispatch(&self, event: &UploadEvent) {
        match event {
            UploadEvent::Started(info) => {
                if let Some(f) = &self.on_start {
                    f(info);
                }
            }
            UploadEvent::Succeeded(info) => {
                if let Some(f) = &self.on_success {
                    f(info);
                }
            }
            UploadEvent::Failed(message) => {
                if let Some(f) = &self.on_error {
                    f(message);
                }
            }
            UploadEvent::Removed => {
                if let Some(f) = &self.on_remove {
                    f();
                }
            }
        }
    }
}

fn same_rc<T: ?Sized>(a: &Option<Rc<T>>, b: &Option<Rc<T>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

impl PartialEq for UploadObservers {
    fn eq(&self, other: &Self) -> bool {
        same_rc(&self.on_start, &other.on_start)
            && same_rc(&self.on_success, &other.on_success)
            && same_rc(&self.on_error, &other.on_error)
            && same_rc(&self.on_remove, &other.on_remove)
    }
}

impl fmt::Debug for UploadObservers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UploadObservers(..)")
    }
}

/// The picker may not report a size; such files cannot be checked and are refused.
pub fn require_size(name: &str, size_bytes: Option<u64>) -> Result<u64, FileConstraintError> {
    size_bytes.ok_or_else(|| FileConstraintError::UnknownSize {
        name: name.to_string(),
    })
}

/// `5.0` renders as `5`, `2.5` as `2.5`.
fn size_label(max_size_mb: f64) -> String {
    if max_size_mb.fract() == 0.0 {
        format!("{}", max_size_mb as u64)
    } else {
        format!("{}", max_size_mb)
    }
}

/// Does `mime` (or the file name's extension) match one accept pattern?
fn matches_pattern(pattern: &str, mime: &str, file_name: &str) -> bool {
    let pattern = pattern.trim().to_ascii_lowercase();
    let mime = mime.to_ascii_lowercase();
    if pattern.is_empty() || pattern == "*/*" || pattern == "*" {
        return true;
    }
    if pattern.starts_with('.') {
        return file_name.to_ascii_lowercase().ends_with(&pattern);
    }
    match pattern.strip_suffix("/*") {
        Some(family) => mime.split('/').next() == Some(family),
        None => mime == pattern,
    }
}

/// Check size first, then type.
pub fn check_file(
    config: &FileConfig,
    name: &str,
    size_bytes: u64,
    mime: &str,
) -> Result<(), FileConstraintError> {
    if size_bytes as f64 > config.max_size_mb * BYTES_PER_MB {
        return Err(FileConstraintError::TooLarge {
            max_label: size_label(config.max_size_mb),
            size_bytes,
        });
    }

    if !config.accept.is_empty()
        && !config
            .accept
            .iter()
            .any(|pattern| matches_pattern(pattern, mime, name))
    {
        return Err(FileConstraintError::DisallowedType {
            mime: if mime.is_empty() { "unknown".to_string() } else { mime.to_string() },
            accepted: config.accept.join(", "),
        });
    }

    Ok(())
}

/// MIME type from the file extension, for pickers that report none.
pub fn guess_mime(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "csv" => "text/csv",
        "txt" => "text/plain",
        "json" => "application/json",
        "xml" => "application/xml",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}

/// Four independent observable flags. An error after an earlier success keeps
/// `succeeded` set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FileUploadState {
    pub selected: Option<SelectedFileInfo>,
    pub uploading: bool,
    pub succeeded: bool,
    pub error: Option<String>,
}

/// Transitions reported to the field's observers.
#[derive(Clone, Debug, PartialEq)]
pub enum UploadEvent {
    Started(SelectedFileInfo),
    Succeeded(SelectedFileInfo),
    Failed(String),
    Removed,
}

impl FileUploadState {
    pub fn start(&mut self, file: SelectedFileInfo) -> UploadEvent {
        self.selected = Some(file.clone());
        self.uploading = true;
        self.error = None;
        UploadEvent::Started(file)
    }

    pub fn succeed(&mut self) -> Option<UploadEvent> {
        self.uploading = false;
        self.succeeded = true;
        self.error = None;
        self.selected.clone().map(UploadEvent::Succeeded)
    }

    pub fn fail(&mut self, message: impl Into<String>) -> UploadEvent {
        let message = message.into();
        self.uploading = false;
        self.error = Some(message.clone());
        UploadEvent::Failed(message)
    }

    pub fn remove(&mut self) -> UploadEvent {
        *self = Self::default();
        UploadEvent::Removed
    }
}

/// Result of handling one picked file.
#[derive(Clone, Debug, PartialEq)]
pub enum SelectionOutcome {
    /// Constraint violation; alert shown, nothing else touched
    Rejected(FileConstraintError),
    /// Accepted; the value to store in the bound field
    Accepted(Value),
    /// Accepted but the upload hook failed
    UploadFailed(String),
}

/// Run constraints, then the upload hook if there is one.
///
/// `alert` runs synchronously on rejection; `on_event` sees every upload
/// transition in order.
pub async fn process_selection(
    state: &impl StateHandle<FileUploadState>,
    config: &FileConfig,
    file: SelectedFile,
    alert: impl Fn(&str),
    mut on_event: impl FnMut(UploadEvent),
) -> SelectionOutcome {
    if let Err(violation) = check_file(config, &file.name, file.size_bytes, &file.mime) {
        alert(&violation.to_string());
        return SelectionOutcome::Rejected(violation);
    }

    let info = file.info();
    let Some(hook) = &config.uploader else {
        state.update(|s| s.selected = Some(info));
        return SelectionOutcome::Accepted(Value::String(file.name));
    };

    console_info!("[FileUpload] Uploading {} ({} bytes)", file.name, file.size_bytes);
    on_event(state.update(|s| s.start(info)));
    let name = file.name.clone();
    match hook.upload(file).await {
        Ok(stored) => {
            if let Some(event) = state.update(|s| s.succeed()) {
                on_event(event);
            }
            SelectionOutcome::Accepted(stored.unwrap_or(Value::String(name)))
        }
        Err(message) => {
            console_error!("[FileUpload] Upload of {} failed: {}", name, message);
            on_event(state.update(|s| s.fail(message.clone())));
            SelectionOutcome::UploadFailed(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::{Cell, RefCell};

    struct CountingHook {
        calls: Rc<Cell<usize>>,
        result: Result<Option<Value>, String>,
    }

    #[async_trait(?Send)]
    impl FileUploadHook for CountingHook {
        async fn upload(&self, _file: SelectedFile) -> Result<Option<Value>, String> {
            self.calls.set(self.calls.get() + 1);
            self.result.clone()
        }
    }

    fn file(name: &str, size_bytes: u64) -> SelectedFile {
        SelectedFile {
            name: name.to_string(),
            size_bytes,
            mime: guess_mime(name).to_string(),
            contents: Vec::new(),
        }
    }

    fn config_with_hook(result: Result<Option<Value>, String>) -> (FileConfig, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let config = FileConfig {
            max_size_mb: 5.0,
            accept: vec!["application/pdf".into(), "image/*".into()],
            uploader: Some(UploadHook::new(CountingHook {
                calls: calls.clone(),
                result,
            })),
            ..FileConfig::default()
        };
        (config, calls)
    }

    #[tokio::test]
    async fn test_oversized_file_alerts_and_skips_upload() {
        let (config, calls) = config_with_hook(Ok(None));
        let alerts = RefCell::new(Vec::new());
        let state = Rc::new(RefCell::new(FileUploadState::default()));

        let outcome = process_selection(
            &state,
            &config,
            file("lease.pdf", 6 * 1024 * 1024),
            |msg| alerts.borrow_mut().push(msg.to_string()),
            |_| {},
        )
        .await;

        assert!(matches!(outcome, SelectionOutcome::Rejected(FileConstraintError::TooLarge { .. })));
        assert_eq!(calls.get(), 0);
        assert_eq!(alerts.borrow().len(), 1);
        assert!(alerts.borrow()[0].contains("exceeds maximum limit of 5MB"));
        assert_eq!(state.snapshot(), FileUploadState::default());
    }

    #[tokio::test]
    async fn test_accepted_file_uses_hook_value() {
        let (config, calls) = config_with_hook(Ok(Some(json!({"document_id": 91}))));
        let state = Rc::new(RefCell::new(FileUploadState::default()));
        let mut events = Vec::new();

        let outcome = process_selection(
            &state,
            &config,
            file("invoice.png", 1024),
            |_| panic!("no alert expected"),
            |event| events.push(event),
        )
        .await;

        assert_eq!(outcome, SelectionOutcome::Accepted(json!({"document_id": 91})));
        assert_eq!(calls.get(), 1);
        assert!(state.borrow().succeeded);
        assert!(!state.borrow().uploading);
        assert!(matches!(events[0], UploadEvent::Started(_)));
        assert!(matches!(events[1], UploadEvent::Succeeded(_)));
    }

    #[tokio::test]
    async fn test_disallowed_type_rejected() {
        let (config, calls) = config_with_hook(Ok(None));
        let state = Rc::new(RefCell::new(FileUploadState::default()));
        let outcome = process_selection(&state, &config, file("ledger.csv", 10), |_| {}, |_| {}).await;
        assert!(matches!(
            outcome,
            SelectionOutcome::Rejected(FileConstraintError::DisallowedType { .. })
        ));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_error_after_success_keeps_success_flag() {
        let mut state = FileUploadState::default();
        let info = file("a.pdf", 1).info();
        state.start(info.clone());
        state.succeed();
        state.start(info);
        state.fail("Server rejected the file");
        assert!(state.succeeded);
        assert_eq!(state.error.as_deref(), Some("Server rejected the file"));
        assert_eq!(state.remove(), UploadEvent::Removed);
        assert_eq!(state, FileUploadState::default());
    }

    #[test]
    fn test_accept_patterns() {
        assert!(matches_pattern("image/*", "image/png", "x.png"));
        assert!(!matches_pattern("image/*", "application/pdf", "x.pdf"));
        assert!(matches_pattern(".CSV", "", "Ledger.csv"));
        assert!(matches_pattern("*/*", "anything/else", "x"));
        assert_eq!(size_label(2.5), "2.5");
        assert_eq!(size_label(10.0), "10");
    }

    #[test]
    fn test_size_at_limit_is_accepted() {
        let config = FileConfig::default();
        assert!(check_file(&config, "a.pdf", 5 * 1024 * 1024, "application/pdf").is_ok());
        assert!(check_file(&config, "a.pdf", 5 * 1024 * 1024 + 1, "application/pdf").is_err());
    }

    fn recording_observers(log: Rc<RefCell<Vec<String>>>) -> UploadObservers {
        let (start, success, error, remove) = (log.clone(), log.clone(), log.clone(), log);
        UploadObservers::new()
            .on_start(move |info| start.borrow_mut().push(format!("start {}", info.name)))
            .on_success(move |info| success.borrow_mut().push(format!("success {}", info.name)))
            .on_error(move |message| error.borrow_mut().push(format!("error {}", message)))
            .on_remove(move || remove.borrow_mut().push("remove".to_string()))
    }

    #[tokio::test]
    async fn test_config_observers_see_each_transition() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (mut config, _) = config_with_hook(Ok(None));
        config.observers = recording_observers(log.clone());
        let state = Rc::new(RefCell::new(FileUploadState::default()));

        let observers = config.observers.clone();
        process_selection(&state, &config, file("a.pdf", 10), |_| {}, |e| observers.dispatch(&e)).await;

        let (mut failing, _) = config_with_hook(Err("Server rejected the file".into()));
        failing.observers = config.observers.clone();
        process_selection(&state, &failing, file("b.pdf", 10), |_| {}, |e| observers.dispatch(&e)).await;
        assert!(state.borrow().succeeded);

        observers.dispatch(&state.borrow_mut().remove());

        assert_eq!(
            *log.borrow(),
            vec![
                "start a.pdf",
                "success a.pdf",
                "start b.pdf",
                "error Server rejected the file",
                "remove",
            ]
        );
    }

    #[test]
    fn test_observers_compare_by_identity() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let observers = recording_observers(log.clone());
        assert_eq!(observers.clone(), observers);
        assert_ne!(recording_observers(log), observers);
        assert_eq!(UploadObservers::new(), UploadObservers::default());
    }

    #[test]
    fn test_missing_size_is_refused() {
        assert_eq!(require_size("a.pdf", Some(12)), Ok(12));
        let refused = require_size("a.pdf", None).unwrap_err();
        assert_eq!(refused.to_string(), "Could not determine the size of a.pdf");
    }
}
