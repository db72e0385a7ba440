//! Draft mirroring and debounced saves for long forms.

use super::schema::SchemaRef;
use super::state::{dispatch, FormAction, FormState, StateHandle};
use super::submission::{submit_form, SubmitOptions, SubmitOutcome};
use super::values::FormValues;
use crate::services::config::AutosaveSettings;
use crate::services::errors::SubmitError;
use crate::services::notify::{Notification, Notifier};
use crate::services::storage::SnapshotStore;
use crate::services::submit::SubmitHandler;
use crate::utils::platform::{now_ms, sleep_ms};
use crate::{console_debug, console_error, console_warn};

#[derive(Clone, Debug, PartialEq)]
pub struct AutosaveConfig {
    /// Snapshot key; no local mirroring when unset
    pub storage_key: Option<String>,
    pub debounce_ms: u32,
    pub enabled: bool,
    pub saved_message: String,
}

impl AutosaveConfig {
    pub fn from_settings(settings: &AutosaveSettings) -> Self {
        Self {
            storage_key: None,
            debounce_ms: settings.debounce_ms,
            enabled: true,
            saved_message: settings.saved_message.clone(),
        }
    }

    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = Some(key.into());
        self
    }
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self::from_settings(&AutosaveSettings::default())
    }
}

/// Identifies one scheduled flush. Stale once a newer change is recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DebounceTicket(u64);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Debouncer {
    generation: u64,
}

impl Debouncer {
    pub fn bump(&mut self) -> DebounceTicket {
        self.generation += 1;
        DebounceTicket(self.generation)
    }

    pub fn is_current(&self, ticket: DebounceTicket) -> bool {
        ticket.0 == self.generation
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum AutosaveOutcome {
    /// A newer change arrived during the quiet period
    Superseded,
    /// Nothing changed since the last save
    Clean,
    Saved,
    Failed(SubmitError),
}

/// Stored draft (if readable and an object) wins over `defaults` wholesale.
pub fn resolve_initial_values(
    store: &dyn SnapshotStore,
    storage_key: Option<&str>,
    defaults: FormValues,
) -> FormValues {
    let Some(key) = storage_key else {
        return defaults;
    };
    match store.read_snapshot(key) {
        Ok(Some(snapshot)) => snapshot,
        Ok(None) => defaults,
        Err(e) => {
            console_debug!("[Autosave] Ignoring unreadable draft '{}': {}", key, e);
            defaults
        }
    }
}

/// Record a change: mirror the draft and start a new debounce window.
/// Returns the ticket to flush with once the window elapses.
pub fn on_values_changed(
    config: &AutosaveConfig,
    store: &dyn SnapshotStore,
    values: &FormValues,
    debouncer: &impl StateHandle<Debouncer>,
) -> Option<DebounceTicket> {
    if !config.enabled {
        return None;
    }
    if let Some(key) = &config.storage_key {
        if let Err(e) = store.write_snapshot(key, values) {
            console_warn!("[Autosave] Could not store draft '{}': {}", key, e);
        }
    }
    Some(debouncer.update(|d| d.bump()))
}

/// Save if `ticket` is still the latest change and the form is dirty.
pub async fn flush_if_current(
    ticket: DebounceTicket,
    debouncer: &impl StateHandle<Debouncer>,
    form: &impl StateHandle<FormState>,
    handler: &dyn SubmitHandler,
    notifier: &dyn Notifier,
    config: &AutosaveConfig,
) -> AutosaveOutcome {
    if !debouncer.snapshot().is_current(ticket) {
        return AutosaveOutcome::Superseded;
    }
    let snapshot = form.snapshot();
    if !snapshot.is_dirty() {
        return AutosaveOutcome::Clean;
    }

    match handler.submit(snapshot.values).await {
        Ok(()) => {
            dispatch(
                form,
                FormAction::MarkSaved {
                    revision: snapshot.revision,
                    at: now_ms(),
                },
            );
            notifier.notify(Notification::subtle(config.saved_message.clone()));
            AutosaveOutcome::Saved
        }
        Err(error) => {
            console_error!("[Autosave] Background save failed: {}", error);
            notifier.notify(Notification::error(format!("Autosave failed: {}", error)));
            AutosaveOutcome::Failed(error)
        }
    }
}

/// Wait out the quiet period, then flush.
pub async fn debounced_save(
    ticket: DebounceTicket,
    debouncer: &impl StateHandle<Debouncer>,
    form: &impl StateHandle<FormState>,
    handler: &dyn SubmitHandler,
    notifier: &dyn Notifier,
    config: &AutosaveConfig,
) -> AutosaveOutcome {
    sleep_ms(config.debounce_ms).await;
    flush_if_current(ticket, debouncer, form, handler, notifier, config).await
}

/// Explicit save: validated, immediate, and the values stay in place.
pub async fn save_now(
    form: &impl StateHandle<FormState>,
    schema: Option<&SchemaRef>,
    handler: &dyn SubmitHandler,
    notifier: &dyn Notifier,
    options: &SubmitOptions,
) -> SubmitOutcome {
    let revision = form.snapshot().revision;
    let options = SubmitOptions {
        optimistic: false,
        reset_on_success: false,
        ..options.clone()
    };
    let outcome = submit_form(form, schema, handler, notifier, &options).await;
    if outcome == SubmitOutcome::Submitted {
        dispatch(
            form,
            FormAction::MarkSaved {
                revision,
                at: now_ms(),
            },
        );
    }
    outcome
}

pub fn clear_draft(store: &dyn SnapshotStore, storage_key: Option<&str>) {
    if let Some(key) = storage_key {
        store.remove_snapshot(key);
    }
}
