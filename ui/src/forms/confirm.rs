//! Delete confirmation guard.

#[derive(Clone, Debug, PartialEq)]
pub struct RecordSummary {
    pub label: String,
    /// System or default records that may not be deleted
    pub protected: bool,
}

impl RecordSummary {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            protected: false,
        }
    }

    pub fn protected(mut self) -> Self {
        self.protected = true;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ConfirmAction {
    Destructive { label: String },
    /// Dialog shows `message` and offers no confirm
    InformationalOnly { message: String },
}

impl ConfirmAction {
    pub fn allows_confirm(&self) -> bool {
        matches!(self, ConfirmAction::Destructive { .. })
    }
}

pub fn confirm_action(record: &RecordSummary) -> ConfirmAction {
    if record.protected {
        ConfirmAction::InformationalOnly {
            message: format!("{} is a default record and cannot be deleted.", record.label),
        }
    } else {
        ConfirmAction::Destructive {
            label: format!("Delete {}", record.label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_record_is_informational() {
        let action = confirm_action(&RecordSummary::new("Standard VAT").protected());
        assert!(!action.allows_confirm());
        assert!(matches!(action, ConfirmAction::InformationalOnly { message } if message.contains("Standard VAT")));
    }

    #[test]
    fn test_ordinary_record_is_destructive() {
        let action = confirm_action(&RecordSummary::new("Cost center 12"));
        assert_eq!(
            action,
            ConfirmAction::Destructive {
                label: "Delete Cost center 12".to_string()
            }
        );
        assert!(action.allows_confirm());
    }
}
