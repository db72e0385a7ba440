//! Fire-and-forget notification sink used by every composer.

use std::fmt;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl NotificationLevel {
    pub fn css_class(&self) -> &'static str {
        match self {
            NotificationLevel::Success => "toast toast-success",
            NotificationLevel::Info => "toast toast-info",
            NotificationLevel::Warning => "toast toast-warning",
            NotificationLevel::Error => "toast toast-error",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    /// Rendered smaller and dismissed sooner (autosave confirmations)
    pub low_emphasis: bool,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }

    pub fn subtle(message: impl Into<String>) -> Self {
        Self {
            low_emphasis: true,
            ..Self::info(message)
        }
    }

    fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            low_emphasis: false,
        }
    }
}

pub trait Notifier {
    fn notify(&self, notification: Notification);
}

/// Shared notifier handle for props and closures.
#[derive(Clone)]
pub struct NotifierRef(Rc<dyn Notifier>);

impl NotifierRef {
    pub fn new(notifier: impl Notifier + 'static) -> Self {
        Self(Rc::new(notifier))
    }
}

impl Notifier for NotifierRef {
    fn notify(&self, notification: Notification) {
        self.0.notify(notification)
    }
}

impl PartialEq for NotifierRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for NotifierRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NotifierRef(..)")
    }
}

/// Discards everything. Used when a composer runs with notifications off.
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, _notification: Notification) {}
}
