use crate::adapters::modelfile::{CreateRequest, ModelDefinition};
use crate::config::{ProvisionConfig, ServiceEndpoint};
use crate::domain::model::Existence;
use crate::domain::ports::ModelService;
use crate::utils::error::{ProvisionError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

const TAGS_PATH: &str = "api/tags";
const SHOW_PATH: &str = "api/show";
const CREATE_PATH: &str = "api/create";

/// HTTP client for an Ollama-compatible model service.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: Url,
    create_timeout: Duration,
}

impl OllamaClient {
    pub fn new(config: &ProvisionConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            client,
            base_url: parse_base_url(&config.endpoint)?,
            create_timeout: config.create_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ProvisionError::ConfigError {
                message: format!("cannot build URL for {}: {}", path, e),
            })
    }
}

/// 確保 base URL 以 `/` 結尾，`Url::join` 才不會吃掉最後一段路徑
fn parse_base_url(endpoint: &ServiceEndpoint) -> Result<Url> {
    let mut raw = endpoint.base_url.trim().to_string();
    if !raw.ends_with('/') {
        raw.push('/');
    }

    Url::parse(&raw).map_err(|e| ProvisionError::InvalidConfigValueError {
        field: "base_url".to_string(),
        value: endpoint.base_url.clone(),
        reason: format!("Invalid URL format: {}", e),
    })
}

#[async_trait]
impl ModelService for OllamaClient {
    async fn is_ready(&self) -> bool {
        let url = match self.endpoint(TAGS_PATH) {
            Ok(url) => url,
            Err(_) => return false,
        };

        match self.client.get(url).send().await {
            Ok(response) => {
                tracing::debug!("Readiness check status: {}", response.status());
                response.status().is_success()
            }
            Err(e) => {
                tracing::debug!("Readiness check failed: {}", e);
                false
            }
        }
    }

    async fn lookup(&self, name: &str) -> Existence {
        let url = match self.endpoint(SHOW_PATH) {
            Ok(url) => url,
            Err(e) => return Existence::Unknown(e.to_string()),
        };

        let body = serde_json::json!({ "model": name });

        match self.client.post(url).json(&body).send().await {
            Ok(response) if response.status().is_success() => Existence::Present,
            Ok(response) if response.status() == StatusCode::NOT_FOUND => Existence::Absent,
            Ok(response) => Existence::Unknown(format!("HTTP {}", response.status())),
            Err(e) => Existence::Unknown(e.to_string()),
        }
    }

    async fn create(&self, name: &str, definition_path: &str) -> Result<()> {
        let url = self.endpoint(CREATE_PATH)?;
        let content = tokio::fs::read_to_string(definition_path).await?;

        // 新版服務不再接受原始 modelfile 欄位，需轉成結構化欄位
        let body = CreateRequest {
            model: name,
            definition: ModelDefinition::parse(&content)?,
            stream: false,
        };

        tracing::debug!(
            "Creating {} from {} (base {})",
            name,
            definition_path,
            body.definition.from
        );

        let response = self
            .client
            .post(url)
            .timeout(self.create_timeout)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ProvisionError::CreateFailed {
                name: name.to_string(),
                detail: format!("HTTP {}: {}", status, text.trim()),
            });
        }

        // 非串流模式下，錯誤也可能以 200 + {"error": ...} 回傳
        if let Ok(payload) = serde_json::from_str::<serde_json::Value>(&text) {
            if let Some(error) = payload.get("error").and_then(|v| v.as_str()) {
                return Err(ProvisionError::CreateFailed {
                    name: name.to_string(),
                    detail: error.to_string(),
                });
            }
        }

        Ok(())
    }
}
