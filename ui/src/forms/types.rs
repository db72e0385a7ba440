// Core field model for the form layer - rendering lives in components::field
use dioxus::prelude::{Element, EventHandler};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::rc::Rc;

use super::file_upload::{UploadHook, UploadObservers};
use super::values::{get_path, set_path, FormValues};
use crate::console_warn;

/// Text-like `<input>` variants.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum InputKind {
    Text,
    Number,
    Email,
    Password,
    Tel,
    Url,
}

impl InputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Text => "text",
            InputKind::Number => "number",
            InputKind::Email => "email",
            InputKind::Password => "password",
            InputKind::Tel => "tel",
            InputKind::Url => "url",
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Drop options whose value was already seen; the first occurrence wins.
pub fn dedup_options(options: Vec<SelectOption>) -> Vec<SelectOption> {
    let mut seen = std::collections::HashSet::new();
    let mut unique = Vec::with_capacity(options.len());
    for option in options {
        if seen.insert(option.value.clone()) {
            unique.push(option);
        } else {
            console_warn!("[FormField] Dropping duplicate select option {:?}", option.value);
        }
    }
    unique
}

/// Constraints for file pickers.
#[derive(Clone, PartialEq, Debug)]
pub struct FileConfig {
    /// Upper bound in megabytes
    pub max_size_mb: f64,
    /// MIME patterns such as `image/*`, `application/pdf` or `.csv`; empty accepts anything
    pub accept: Vec<String>,
    pub uploader: Option<UploadHook>,
    pub observers: UploadObservers,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            max_size_mb: 5.0,
            accept: Vec::new(),
            uploader: None,
            observers: UploadObservers::default(),
        }
    }
}

/// Bounds for date and date-time pickers, as ISO strings.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct DateConfig {
    pub min: Option<String>,
    pub max: Option<String>,
}

/// What a custom renderer receives for its one field.
#[derive(Clone, PartialEq)]
pub struct CustomFieldContext {
    pub name: String,
    pub label: String,
    pub value: Option<Value>,
    pub error: Option<String>,
    pub disabled: bool,
    pub on_input: EventHandler<Value>,
}

/// Caller-supplied render function replacing the built-in control.
#[derive(Clone)]
pub struct CustomRenderer(Rc<dyn Fn(CustomFieldContext) -> Element>);

impl CustomRenderer {
    pub fn new(render: impl Fn(CustomFieldContext) -> Element + 'static) -> Self {
        Self(Rc::new(render))
    }

    pub fn render(&self, context: CustomFieldContext) -> Element {
        (self.0)(context)
    }
}

impl PartialEq for CustomRenderer {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for CustomRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomRenderer(..)")
    }
}

/// Runs after form state has been updated, with the field path and the new value set.
#[derive(Clone)]
pub struct ChangeCallback(Rc<dyn Fn(&str, &FormValues)>);

impl ChangeCallback {
    pub fn new(callback: impl Fn(&str, &FormValues) + 'static) -> Self {
        Self(Rc::new(callback))
    }

    pub fn call(&self, path: &str, values: &FormValues) {
        (self.0)(path, values)
    }
}

impl PartialEq for ChangeCallback {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ChangeCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ChangeCallback(..)")
    }
}

/// One constructor per control kind.
#[derive(Clone, PartialEq, Debug)]
pub enum FieldKind {
    Input(InputKind),
    TextArea { rows: u32 },
    Select { options: Vec<SelectOption> },
    File(FileConfig),
    Date(DateConfig),
    DateTime(DateConfig),
    Custom(CustomRenderer),
}

impl FieldKind {
    /// Map a loose type name onto a control kind. Unknown names become a text input.
    pub fn from_type_str(kind: &str) -> Self {
        match kind.trim().to_ascii_lowercase().as_str() {
            "text" => FieldKind::Input(InputKind::Text),
            "number" => FieldKind::Input(InputKind::Number),
            "email" => FieldKind::Input(InputKind::Email),
            "password" => FieldKind::Input(InputKind::Password),
            "tel" => FieldKind::Input(InputKind::Tel),
            "url" => FieldKind::Input(InputKind::Url),
            "textarea" => FieldKind::TextArea { rows: 3 },
            "select" => FieldKind::Select {
                options: Vec::new(),
            },
            "file" => FieldKind::File(FileConfig::default()),
            "date" => FieldKind::Date(DateConfig::default()),
            "datetime" | "datetime-local" => FieldKind::DateTime(DateConfig::default()),
            other => {
                console_warn!("[FormField] Unknown field type {:?}, rendering text input", other);
                FieldKind::Input(InputKind::Text)
            }
        }
    }
}

/// Validation hints passed through to the control and used by
/// `RuleSchema::from_fields`.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct ValidationHints {
    pub required: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
}

/// Declarative description of one input.
#[derive(Clone, PartialEq, Debug)]
pub struct FieldDescriptor {
    /// Key path into the form values
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub placeholder: Option<String>,
    pub default_value: Option<Value>,
    pub hints: ValidationHints,
    pub help_text: Option<String>,
    pub hidden: bool,
    pub disabled: bool,
    pub on_change: Option<ChangeCallback>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            placeholder: None,
            default_value: None,
            hints: ValidationHints::default(),
            help_text: None,
            hidden: false,
            disabled: false,
            on_change: None,
        }
    }

    pub fn text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Input(InputKind::Text))
    }

    pub fn number(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Input(InputKind::Number))
    }

    pub fn email(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Input(InputKind::Email))
    }

    pub fn textarea(name: impl Into<String>, label: impl Into<String>, rows: u32) -> Self {
        Self::new(name, label, FieldKind::TextArea { rows })
    }

    pub fn select(
        name: impl Into<String>,
        label: impl Into<String>,
        options: Vec<SelectOption>,
    ) -> Self {
        Self::new(
            name,
            label,
            FieldKind::Select {
                options: dedup_options(options),
            },
        )
    }

    pub fn date(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Date(DateConfig::default()))
    }

    pub fn datetime(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::DateTime(DateConfig::default()))
    }

    pub fn file(name: impl Into<String>, label: impl Into<String>, config: FileConfig) -> Self {
        Self::new(name, label, FieldKind::File(config))
    }

    pub fn custom(
        name: impl Into<String>,
        label: impl Into<String>,
        render: impl Fn(CustomFieldContext) -> Element + 'static,
    ) -> Self {
        Self::new(name, label, FieldKind::Custom(CustomRenderer::new(render)))
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn required(mut self) -> Self {
        self.hints.required = true;
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.hints.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.hints.max = Some(max);
        self
    }

    pub fn step(mut self, step: f64) -> Self {
        self.hints.step = Some(step);
        self
    }

    pub fn min_length(mut self, len: usize) -> Self {
        self.hints.min_length = Some(len);
        self
    }

    pub fn max_length(mut self, len: usize) -> Self {
        self.hints.max_length = Some(len);
        self
    }

    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = Some(text.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn on_change(mut self, callback: impl Fn(&str, &FormValues) + 'static) -> Self {
        self.on_change = Some(ChangeCallback::new(callback));
        self
    }
}

/// Build the starting value set: caller defaults first, then descriptor
/// defaults for any path the caller left unset. Hidden fields participate.
pub fn initial_values(fields: &[FieldDescriptor], defaults: &FormValues) -> FormValues {
    let mut values = defaults.clone();
    for field in fields {
        if let Some(default) = &field.default_value {
            if get_path(&values, &field.name).is_none() {
                set_path(&mut values, &field.name, default.clone());
            }
        }
    }
    values
}
