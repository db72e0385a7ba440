//! Adapters from REST endpoints onto the form layer's submit and options traits.

use async_trait::async_trait;
use std::collections::HashMap;

use super::rest_client::RestClient;
use crate::forms::{FormValues, OptionsSource, SelectOption};
use crate::services::errors::SubmitError;
use crate::services::submit::SubmitHandler;

#[derive(Clone, Debug, PartialEq)]
pub enum SubmitTarget {
    Create,
    Update(String),
}

/// Submits form values to a create or update endpoint.
#[derive(Clone, Debug)]
pub struct ResourceSubmitter {
    client: RestClient,
    resource: String,
    target: SubmitTarget,
}

impl ResourceSubmitter {
    pub fn create(client: RestClient, resource: impl Into<String>) -> Self {
        Self {
            client,
            resource: resource.into(),
            target: SubmitTarget::Create,
        }
    }

    pub fn update(client: RestClient, resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            client,
            resource: resource.into(),
            target: SubmitTarget::Update(id.into()),
        }
    }
}

#[async_trait(?Send)]
impl SubmitHandler for ResourceSubmitter {
    async fn submit(&self, values: FormValues) -> Result<(), SubmitError> {
        match &self.target {
            SubmitTarget::Create => self.client.create(&self.resource, &values).await?,
            SubmitTarget::Update(id) => self.client.update(&self.resource, id, &values).await?,
        };
        Ok(())
    }
}

/// Where a dependent select loads its options from.
#[derive(Clone, Debug, PartialEq)]
pub struct OptionsRoute {
    pub resource: String,
    /// Query parameter carrying the parent's value
    pub parent_param: String,
    pub value_key: String,
    pub label_key: String,
}

impl OptionsRoute {
    pub fn new(resource: impl Into<String>, parent_param: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            parent_param: parent_param.into(),
            value_key: "id".to_string(),
            label_key: "name".to_string(),
        }
    }
}

/// REST-backed options for a select cascade, one route per child field.
#[derive(Clone, Debug)]
pub struct ResourceOptions {
    client: RestClient,
    routes: HashMap<String, OptionsRoute>,
}

impl ResourceOptions {
    pub fn new(client: RestClient) -> Self {
        Self {
            client,
            routes: HashMap::new(),
        }
    }

    pub fn route(mut self, child_path: impl Into<String>, route: OptionsRoute) -> Self {
        self.routes.insert(child_path.into(), route);
        self
    }
}

#[async_trait(?Send)]
impl OptionsSource for ResourceOptions {
    async fn load_options(
        &self,
        child_path: &str,
        parent_value: &str,
    ) -> Result<Vec<SelectOption>, SubmitError> {
        let route = self
            .routes
            .get(child_path)
            .ok_or_else(|| SubmitError::rejected(format!("No options route for {}", child_path)))?;

        let options = self
            .client
            .list_options(
                &route.resource,
                &[(route.parent_param.as_str(), parent_value)],
                &route.value_key,
                &route.label_key,
            )
            .await?;
        Ok(options)
    }
}
