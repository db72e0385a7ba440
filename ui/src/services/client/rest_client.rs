use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use tracing::{error, info, instrument};

use crate::forms::{dedup_options, FormValues, SelectOption};
use crate::services::errors::ClientError;

/// JSON REST client for the ERP resource endpoints.
#[derive(Clone, Debug)]
pub struct RestClient {
    pub(crate) http_client: Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl RestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bearer_token: None,
        }
    }

    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn resource_url(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource.trim_matches('/'))
    }

    fn record_url(&self, resource: &str, id: &str) -> String {
        format!("{}/{}", self.resource_url(resource), id)
    }

    /// POST a new record.
    #[instrument(skip(self, values), err)]
    pub async fn create(&self, resource: &str, values: &FormValues) -> Result<Value, ClientError> {
        let url = self.resource_url(resource);
        info!("Creating record at {}", url);
        self.send_json(self.http_client.post(&url).json(values)).await
    }

    /// PUT a full record replacement.
    #[instrument(skip(self, values), err)]
    pub async fn update(
        &self,
        resource: &str,
        id: &str,
        values: &FormValues,
    ) -> Result<Value, ClientError> {
        let url = self.record_url(resource, id);
        info!("Updating record at {}", url);
        self.send_json(self.http_client.put(&url).json(values)).await
    }

    #[instrument(skip(self), err)]
    pub async fn delete(&self, resource: &str, id: &str) -> Result<(), ClientError> {
        let url = self.record_url(resource, id);
        info!("Deleting record at {}", url);
        self.send_json(self.http_client.delete(&url)).await.map(|_| ())
    }

    /// GET a list endpoint and map each item onto a select option.
    #[instrument(skip(self), err)]
    pub async fn list_options(
        &self,
        resource: &str,
        query: &[(&str, &str)],
        value_key: &str,
        label_key: &str,
    ) -> Result<Vec<SelectOption>, ClientError> {
        let url = self.resource_url(resource);
        let body = self
            .send_json(self.http_client.get(&url).query(query))
            .await?;
        options_from_json(&body, value_key, label_key)
    }

    async fn send_json(&self, request: RequestBuilder) -> Result<Value, ClientError> {
        let request = match &self.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(|e| {
            error!("Request failed: {}", e);
            ClientError::Network {
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            error!("Server returned {}: {}", status, text);
            return Err(ClientError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| ClientError::Decode {
            message: e.to_string(),
        })
    }
}

/// Accepts either a bare array or `{"data": [...]}`.
pub fn options_from_json(
    body: &Value,
    value_key: &str,
    label_key: &str,
) -> Result<Vec<SelectOption>, ClientError> {
    let items = body
        .as_array()
        .or_else(|| body.get("data").and_then(Value::as_array))
        .ok_or_else(|| ClientError::Decode {
            message: "expected a JSON array of options".to_string(),
        })?;

    let options = items
        .iter()
        .filter_map(|item| {
            let value = scalar_text(item.get(value_key)?)?;
            let label = item
                .get(label_key)
                .and_then(scalar_text)
                .unwrap_or_else(|| value.clone());
            Some(SelectOption { value, label })
        })
        .collect();

    Ok(dedup_options(options))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
