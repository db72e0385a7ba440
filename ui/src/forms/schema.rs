//! Validation schemas.
//!
//! A schema checks a candidate value set and either hands back the values to
//! submit or a per-path error map. [`RuleSchema`] covers the common rules and
//! can be derived from field hints; any closure with the right shape is a
//! schema too.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use super::types::{FieldDescriptor, FieldKind, InputKind};
use super::values::{get_path, is_blank, value_as_text, FormValues};
use crate::utils::is_valid_email;

/// Per-field messages keyed by field path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.insert(path.into(), message.into());
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    pub fn remove(&mut self, path: &str) -> Option<String> {
        self.0.remove(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    /// Keep only errors for the given paths.
    pub fn retain_paths(&mut self, paths: &[&str]) {
        self.0.retain(|path, _| paths.contains(&path.as_str()));
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self
            .0
            .iter()
            .map(|(path, message)| format!("{}: {}", path, message))
            .collect();
        write!(f, "{}", joined.join("; "))
    }
}

pub trait Schema {
    fn validate(&self, values: &FormValues) -> Result<FormValues, FieldErrors>;
}

impl<F> Schema for F
where
    F: Fn(&FormValues) -> Result<FormValues, FieldErrors>,
{
    fn validate(&self, values: &FormValues) -> Result<FormValues, FieldErrors> {
        self(values)
    }
}

/// Shared schema handle usable as a component prop.
#[derive(Clone)]
pub struct SchemaRef(Rc<dyn Schema>);

impl SchemaRef {
    pub fn new(schema: impl Schema + 'static) -> Self {
        Self(Rc::new(schema))
    }

    pub fn validate(&self, values: &FormValues) -> Result<FormValues, FieldErrors> {
        self.0.validate(values)
    }
}

impl PartialEq for SchemaRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for SchemaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SchemaRef(..)")
    }
}

/// Custom rule: `None` when the value passes, otherwise the message.
pub type RuleFn = Rc<dyn Fn(Option<&Value>, &FormValues) -> Option<String>>;

#[derive(Clone)]
pub enum Rule {
    Required,
    MinLength(usize),
    MaxLength(usize),
    Min(f64),
    Max(f64),
    Email,
    OneOf(Vec<String>),
    Custom(RuleFn),
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Required => f.write_str("Required"),
            Rule::MinLength(n) => write!(f, "MinLength({})", n),
            Rule::MaxLength(n) => write!(f, "MaxLength({})", n),
            Rule::Min(n) => write!(f, "Min({})", n),
            Rule::Max(n) => write!(f, "Max({})", n),
            Rule::Email => f.write_str("Email"),
            Rule::OneOf(values) => write!(f, "OneOf({:?})", values),
            Rule::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl Rule {
    fn check(&self, label: &str, value: Option<&Value>, values: &FormValues) -> Option<String> {
        // Only `Required` and custom rules look at blank values
        let blank = is_blank(value);
        match self {
            Rule::Required if blank => Some(format!("{} is required", label)),
            Rule::Required => None,
            Rule::Custom(check) => check(value, values),
            _ if blank => None,
            Rule::MinLength(min) => {
                let len = value_as_text(value).chars().count();
                (len < *min).then(|| format!("{} must be at least {} characters", label, min))
            }
            Rule::MaxLength(max) => {
                let len = value_as_text(value).chars().count();
                (len > *max).then(|| format!("{} must be at most {} characters", label, max))
            }
            Rule::Min(min) => match as_number(value) {
                Some(n) if n < *min => Some(format!("{} must be at least {}", label, min)),
                Some(_) => None,
                None => Some(format!("{} must be a number", label)),
            },
            Rule::Max(max) => match as_number(value) {
                Some(n) if n > *max => Some(format!("{} must be at most {}", label, max)),
                Some(_) => None,
                None => Some(format!("{} must be a number", label)),
            },
            Rule::Email => (!is_valid_email(&value_as_text(value)))
                .then(|| "Please enter a valid email address".to_string()),
            Rule::OneOf(allowed) => {
                let text = value_as_text(value);
                (!allowed.iter().any(|a| a == &text))
                    .then(|| format!("{} has an unsupported value", label))
            }
        }
    }
}

fn as_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[derive(Clone, Debug)]
struct FieldRules {
    path: String,
    label: String,
    rules: Vec<Rule>,
}

/// Ordered rule lists per path. The first failing rule of a field wins.
#[derive(Clone, Debug, Default)]
pub struct RuleSchema {
    fields: Vec<FieldRules>,
}

impl RuleSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, path: impl Into<String>, label: impl Into<String>, rules: Vec<Rule>) -> Self {
        let path = path.into();
        if let Some(existing) = self.fields.iter_mut().find(|f| f.path == path) {
            existing.rules.extend(rules);
        } else {
            self.fields.push(FieldRules {
                path,
                label: label.into(),
                rules,
            });
        }
        self
    }

    /// Derive rules from descriptor hints: required, lengths, numeric bounds,
    /// email shape and select membership.
    pub fn from_fields(fields: &[FieldDescriptor]) -> Self {
        let mut schema = Self::new();
        for field in fields {
            let hints = &field.hints;
            let mut rules = Vec::new();
            if hints.required {
                rules.push(Rule::Required);
            }
            if let Some(n) = hints.min_length {
                rules.push(Rule::MinLength(n));
            }
            if let Some(n) = hints.max_length {
                rules.push(Rule::MaxLength(n));
            }
            if let Some(n) = hints.min {
                rules.push(Rule::Min(n));
            }
            if let Some(n) = hints.max {
                rules.push(Rule::Max(n));
            }
            match &field.kind {
                FieldKind::Input(InputKind::Email) => rules.push(Rule::Email),
                FieldKind::Select { options } if !options.is_empty() => {
                    rules.push(Rule::OneOf(options.iter().map(|o| o.value.clone()).collect()))
                }
                _ => {}
            }
            if !rules.is_empty() {
                schema = schema.field(field.name.clone(), field.label.clone(), rules);
            }
        }
        schema
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.path.as_str())
    }
}

impl Schema for RuleSchema {
    fn validate(&self, values: &FormValues) -> Result<FormValues, FieldErrors> {
        let mut errors = FieldErrors::new();
        for field in &self.fields {
            let value = get_path(values, &field.path);
            if let Some(message) = field
                .rules
                .iter()
                .find_map(|rule| rule.check(&field.label, value, values))
            {
                errors.insert(field.path.clone(), message);
            }
        }

        if errors.is_empty() {
            Ok(values.clone())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::types::SelectOption;
    use crate::forms::values::as_form_values;
    use serde_json::json;

    fn values(v: Value) -> FormValues {
        as_form_values(v).unwrap()
    }

    #[test]
    fn test_required_and_lengths() {
        let schema = RuleSchema::new()
            .field("code", "Code", vec![Rule::Required, Rule::MaxLength(4)])
            .field("name", "Name", vec![Rule::MinLength(3)]);

        let errors = schema.validate(&values(json!({"code": "", "name": "ab"}))).unwrap_err();
        assert_eq!(errors.get("code"), Some("Code is required"));
        assert_eq!(errors.get("name"), Some("Name must be at least 3 characters"));

        let errors = schema.validate(&values(json!({"code": "TOOLONG"}))).unwrap_err();
        assert_eq!(errors.get("code"), Some("Code must be at most 4 characters"));
        // Blank optional field is not checked for length
        assert!(!errors.contains("name"));

        assert!(schema.validate(&values(json!({"code": "CC01", "name": "Ops"}))).is_ok());
    }

    #[test]
    fn test_numeric_bounds_accept_numeric_strings() {
        let schema = RuleSchema::new().field("rate", "Tax rate", vec![Rule::Min(0.0), Rule::Max(100.0)]);
        assert!(schema.validate(&values(json!({"rate": "23"}))).is_ok());
        assert!(schema.validate(&values(json!({"rate": 6}))).is_ok());
        let errors = schema.validate(&values(json!({"rate": 120}))).unwrap_err();
        assert_eq!(errors.get("rate"), Some("Tax rate must be at most 100"));
        let errors = schema.validate(&values(json!({"rate": "abc"}))).unwrap_err();
        assert_eq!(errors.get("rate"), Some("Tax rate must be a number"));
    }

    #[test]
    fn test_from_fields_derives_rules() {
        let fields = vec![
            FieldDescriptor::email("contact.email", "Email").required(),
            FieldDescriptor::select(
                "term",
                "Term",
                vec![SelectOption::new("30", "Net 30"), SelectOption::new("60", "Net 60")],
            ),
            FieldDescriptor::number("days", "Days").min(1.0),
        ];
        let schema = RuleSchema::from_fields(&fields);
        assert_eq!(schema.paths().collect::<Vec<_>>(), vec!["contact.email", "term", "days"]);

        let errors = schema
            .validate(&values(json!({"contact": {"email": "nope"}, "term": "90", "days": 0})))
            .unwrap_err();
        assert_eq!(errors.get("contact.email"), Some("Please enter a valid email address"));
        assert_eq!(errors.get("term"), Some("Term has an unsupported value"));
        assert_eq!(errors.get("days"), Some("Days must be at least 1"));
    }

    #[test]
    fn test_custom_rule_sees_all_values() {
        let end_after_start: RuleFn = Rc::new(|value: Option<&Value>, all: &FormValues| {
            let start = get_path(all, "start").and_then(Value::as_str).unwrap_or_default();
            let end = value.and_then(Value::as_str).unwrap_or_default();
            (end < start).then(|| "End date must be after start date".to_string())
        });
        let schema = RuleSchema::new().field("end", "End", vec![Rule::Custom(end_after_start)]);
        let errors = schema
            .validate(&values(json!({"start": "2026-02-01", "end": "2026-01-01"})))
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(schema
            .validate(&values(json!({"start": "2026-01-01", "end": "2026-02-01"})))
            .is_ok());
    }

    #[test]
    fn test_closure_schema() {
        let schema = SchemaRef::new(|v: &FormValues| {
            if v.contains_key("id") {
                Ok(v.clone())
            } else {
                let mut e = FieldErrors::new();
                e.insert("id", "missing");
                Err(e)
            }
        });
        assert!(schema.validate(&FormValues::new()).is_err());
        assert!(schema.validate(&values(json!({"id": 1}))).is_ok());
    }
}
