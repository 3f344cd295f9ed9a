//! Generation backend reached over HTTP.
//!
//! The remote service exposes two JSON endpoints:
//!
//! - `POST {endpoint}/plan` with `{description, title}` returning
//!   `{planMarkdown, scenarioCount}`
//! - `POST {endpoint}/code` with `{plan, title, baseUrl, language}` returning
//!   `{files: [{filename, content}], scenarioCount}`

use async_trait::async_trait;
use log::debug;
use serde::{de::DeserializeOwned, Serialize};

use super::{CodeRequest, GeneratedCode, GenerationBackend, PlanRequest, TestPlan};
use crate::error::{PilotError, Result};

/// JSON-over-HTTP client for a remote generation service.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpBackend {
    /// Creates a backend for the service rooted at `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.endpoint.trim_end_matches('/'))
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!("POST {url}");

        let response = self
            .client
            .post(&url)
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| PilotError::generation(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PilotError::generation(format!(
                "{url} returned status {status}"
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| PilotError::generation(format!("invalid response from {url}: {e}")))
    }
}

#[async_trait]
impl GenerationBackend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn synthesize_plan(&self, request: &PlanRequest) -> Result<TestPlan> {
        self.post("plan", request).await
    }

    async fn synthesize_code(&self, request: &CodeRequest) -> Result<GeneratedCode> {
        self.post("code", request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_paths() {
        assert_eq!(
            HttpBackend::new("http://localhost:8080").url("plan"),
            "http://localhost:8080/plan"
        );
        assert_eq!(
            HttpBackend::new("http://localhost:8080/api/").url("code"),
            "http://localhost:8080/api/code"
        );
    }

    #[tokio::test]
    async fn test_transport_failure_is_generation_error() {
        let backend = HttpBackend::new("http://127.0.0.1:1");
        let err = backend
            .synthesize_plan(&PlanRequest {
                description: "story".to_string(),
                title: "Title".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, PilotError::Generation { .. }));
        assert!(err.to_string().contains("http://127.0.0.1:1/plan"));
    }
}
