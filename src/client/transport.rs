use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Value,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced an HTTP response. Carries the underlying
/// failure message verbatim.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

#[async_trait]
pub trait ChefTransport: Send + Sync {
    async fn post_json(&self, path: &str, body: &Value) -> Result<TransportResponse, TransportError>;
}

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl ChefTransport for HttpTransport {
    async fn post_json(&self, path: &str, body: &Value) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        let status = response.status().as_u16();
        let body = if response.status().is_success() {
            response
                .json::<Value>()
                .await
                .map_err(|e| TransportError(e.to_string()))?
        } else {
            // Error pages are not always JSON; the status alone is enough then.
            response.json::<Value>().await.unwrap_or(Value::Null)
        };
        Ok(TransportResponse { status, body })
    }
}
