// Client-side REST access for the ERP backend
//
// - rest_client: JSON create/update/delete/list calls with bearer auth
// - resources: adapters onto the form layer's SubmitHandler and OptionsSource

pub mod resources;
pub mod rest_client;

pub use resources::{OptionsRoute, ResourceOptions, ResourceSubmitter, SubmitTarget};
pub use rest_client::{options_from_json, RestClient};
