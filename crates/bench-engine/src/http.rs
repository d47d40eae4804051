//! Engine client over the HTTP execute endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use bench_types::EngineSettings;

use crate::{EngineError, QueryEngine, QueryResult};

const EXECUTE_PATH: &str = "/api/v4/store/execute";

#[derive(Serialize)]
struct ExecuteRequest<'a> {
    statement: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    args: Option<&'a Value>,
}

#[derive(Deserialize)]
struct ExecuteResponse {
    #[serde(default)]
    items: Vec<Value>,
    #[serde(default)]
    error: Option<ErrorBody>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    description: Option<String>,
}

/// Query engine reached through its HTTP API.
pub struct HttpEngine {
    client: Client,
    url: String,
    api_key: Option<SecretString>,
    version: String,
}

impl HttpEngine {
    /// Create a client from engine settings.
    pub fn new(settings: &EngineSettings) -> Result<Self, EngineError> {
        let mut builder = Client::builder();
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| EngineError::Config(e.to_string()))?;

        let endpoint = settings.endpoint.trim_end_matches('/');
        if endpoint.is_empty() {
            return Err(EngineError::Config("empty endpoint".to_string()));
        }

        Ok(Self {
            client,
            url: format!("{}{}", endpoint, EXECUTE_PATH),
            api_key: settings.api_key.clone(),
            version: settings.version.clone(),
        })
    }
}

#[async_trait]
impl QueryEngine for HttpEngine {
    async fn execute(
        &self,
        statement: &str,
        params: Option<&Value>,
    ) -> Result<QueryResult, EngineError> {
        debug!(statement, "Executing statement");

        let mut request = self.client.post(&self.url).json(&ExecuteRequest {
            statement,
            args: params,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| EngineError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| EngineError::Transport(e.to_string()))?;

        let parsed: Option<ExecuteResponse> = serde_json::from_str(&body).ok();

        if !status.is_success() {
            let description = parsed
                .and_then(|r| r.error)
                .and_then(|e| e.description)
                .unwrap_or_else(|| format!("HTTP {}: {}", status, body));
            return Err(EngineError::from_message(description));
        }

        let parsed = parsed.ok_or_else(|| EngineError::InvalidResponse(body.clone()))?;
        if let Some(error) = parsed.error {
            return Err(EngineError::from_message(
                error
                    .description
                    .unwrap_or_else(|| "unspecified engine error".to_string()),
            ));
        }

        Ok(QueryResult::new(parsed.items))
    }

    fn version(&self) -> &str {
        &self.version
    }
}
