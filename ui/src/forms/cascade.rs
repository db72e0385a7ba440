//! Dependent select chains (company -> division -> department).

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use super::state::{FormAction, FormState, StateHandle};
use super::types::{dedup_options, SelectOption};
use crate::services::errors::SubmitError;
use crate::{console_info, console_warn};

/// Loads the options of `child_path` for a given parent value.
#[async_trait(?Send)]
pub trait OptionsSource {
    async fn load_options(
        &self,
        child_path: &str,
        parent_value: &str,
    ) -> Result<Vec<SelectOption>, SubmitError>;
}

#[derive(Clone)]
pub struct OptionsSourceRef(Rc<dyn OptionsSource>);

impl OptionsSourceRef {
    pub fn new(source: impl OptionsSource + 'static) -> Self {
        Self(Rc::new(source))
    }
}

#[async_trait(?Send)]
impl OptionsSource for OptionsSourceRef {
    async fn load_options(
        &self,
        child_path: &str,
        parent_value: &str,
    ) -> Result<Vec<SelectOption>, SubmitError> {
        self.0.load_options(child_path, parent_value).await
    }
}

impl PartialEq for OptionsSourceRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for OptionsSourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OptionsSourceRef(..)")
    }
}

/// Field paths ordered from the root select to the deepest child.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectCascade {
    levels: Vec<String>,
}

impl SelectCascade {
    pub fn new<S: Into<String>>(levels: impl IntoIterator<Item = S>) -> Self {
        Self {
            levels: levels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    pub fn descendants(&self, path: &str) -> &[String] {
        match self.levels.iter().position(|level| level == path) {
            Some(index) => &self.levels[index + 1..],
            None => &[],
        }
    }

    pub fn child_of(&self, path: &str) -> Option<&str> {
        self.descendants(path).first().map(String::as_str)
    }
}

/// A child options request the caller should issue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChildFetch {
    pub child_path: String,
    pub parent_value: String,
}

/// Loaded option lists for the non-root levels.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CascadeState {
    options: BTreeMap<String, Vec<SelectOption>>,
    /// Parent value each child is currently waiting on
    pending: BTreeMap<String, String>,
}

impl CascadeState {
    pub fn options_for(&self, path: &str) -> &[SelectOption] {
        self.options.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_loading(&self, path: &str) -> bool {
        self.pending.contains_key(path)
    }

    /// Set `path`, wipe every descendant's value and options, and return the
    /// request for the immediate child (none for a blank value or the last level).
    pub fn on_parent_changed(
        &mut self,
        cascade: &SelectCascade,
        form: &mut FormState,
        path: &str,
        value: &str,
    ) -> Option<ChildFetch> {
        form.reduce_in_place(FormAction::SetValue {
            path: path.to_string(),
            value: value.into(),
        });
        for descendant in cascade.descendants(path) {
            form.reduce_in_place(FormAction::SetValue {
                path: descendant.clone(),
                value: "".into(),
            });
            self.options.remove(descendant);
            self.pending.remove(descendant);
        }

        let child = cascade.child_of(path)?;
        if value.trim().is_empty() {
            return None;
        }
        self.pending.insert(child.to_string(), value.to_string());
        Some(ChildFetch {
            child_path: child.to_string(),
            parent_value: value.to_string(),
        })
    }

    /// Store loaded options unless the parent moved on meanwhile.
    pub fn apply_options(&mut self, fetch: &ChildFetch, options: Vec<SelectOption>) -> bool {
        if self.pending.get(&fetch.child_path) != Some(&fetch.parent_value) {
            console_info!(
                "[Cascade] Dropping stale options for {} (parent {})",
                fetch.child_path,
                fetch.parent_value
            );
            return false;
        }
        self.pending.remove(&fetch.child_path);
        self.options.insert(fetch.child_path.clone(), dedup_options(options));
        true
    }

    pub fn abandon(&mut self, fetch: &ChildFetch) {
        if self.pending.get(&fetch.child_path) == Some(&fetch.parent_value) {
            self.pending.remove(&fetch.child_path);
        }
    }
}

/// Apply a parent change and load the child's options.
pub async fn change_parent(
    cascade_state: &impl StateHandle<CascadeState>,
    form: &impl StateHandle<FormState>,
    cascade: &SelectCascade,
    source: &dyn OptionsSource,
    path: &str,
    value: &str,
) -> bool {
    let fetch = cascade_state.update(|c| form.update(|f| c.on_parent_changed(cascade, f, path, value)));
    let Some(fetch) = fetch else {
        return false;
    };

    match source.load_options(&fetch.child_path, &fetch.parent_value).await {
        Ok(options) => cascade_state.update(|c| c.apply_options(&fetch, options)),
        Err(e) => {
            console_warn!("[Cascade] Could not load options for {}: {}", fetch.child_path, e);
            cascade_state.update(|c| c.abandon(&fetch));
            false
        }
    }
}
