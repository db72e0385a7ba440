//! Signed-in user, provided as Dioxus context by the page shell.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub display_name: String,
    pub tenant_id: String,
    /// Bearer token for the REST client, if any
    pub access_token: Option<String>,
}

impl CurrentUser {
    pub fn is_signed_in(&self) -> bool {
        !self.id.is_empty()
    }
}
