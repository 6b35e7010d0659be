use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, error};

use crate::modules::chat::ports::{
    BookingIntent, BookingLink, HealthStatus, Provider, ProviderQuery, ReplyRequest,
    ServiceReply, StartRequest, SymptomServiceError, SymptomServicePort,
};

const START_ENDPOINT: &str = "symptom/start";
const REPLY_ENDPOINT: &str = "symptom/reply";
const PROVIDER_SEARCH_ENDPOINT: &str = "providers/search";
const BOOK_INTENT_ENDPOINT: &str = "book-intent";

/// 医疗机构查询响应
#[derive(Debug, Deserialize)]
struct ProviderSearchResponse {
    providers: Vec<Provider>,
}

/// 根路径响应
#[derive(Debug, Deserialize)]
struct RootResponse {
    ok: bool,
}

/// HTTP 适配器配置
#[derive(Debug, Clone)]
pub struct HttpServiceConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

/// 症状服务 HTTP 适配器
pub struct HttpSymptomService {
    client: Client,
    config: HttpServiceConfig,
}

impl HttpSymptomService {
    /// 创建新的 HTTP 适配器
    pub fn new(config: HttpServiceConfig) -> Result<Self, SymptomServiceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SymptomServiceError::Network(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// 拼接接口 URL
    fn endpoint_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint
        )
    }

    async fn post_json<B, R>(&self, endpoint: &str, body: &B) -> Result<R, SymptomServiceError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoint_url(endpoint);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(Self::transport_error)?;

        Self::decode(response).await
    }

    /// 校验状态码并解析 JSON 响应体
    async fn decode<R: DeserializeOwned>(response: Response) -> Result<R, SymptomServiceError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Symptom service error: {} - {}", status, body);
            return Err(SymptomServiceError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(Self::transport_error)?;
        serde_json::from_slice(&bytes).map_err(|e| SymptomServiceError::Protocol(e.to_string()))
    }

    fn transport_error(e: reqwest::Error) -> SymptomServiceError {
        if e.is_timeout() {
            SymptomServiceError::Network(format!("request timed out: {}", e))
        } else {
            SymptomServiceError::Network(e.to_string())
        }
    }
}

#[async_trait]
impl SymptomServicePort for HttpSymptomService {
    fn service_id(&self) -> &str {
        "http"
    }

    async fn start(&self, request: StartRequest) -> Result<ServiceReply, SymptomServiceError> {
        self.post_json(START_ENDPOINT, &request).await
    }

    async fn reply(&self, request: ReplyRequest) -> Result<ServiceReply, SymptomServiceError> {
        self.post_json(REPLY_ENDPOINT, &request).await
    }

    async fn search_providers(
        &self,
        query: ProviderQuery,
    ) -> Result<Vec<Provider>, SymptomServiceError> {
        let response: ProviderSearchResponse =
            self.post_json(PROVIDER_SEARCH_ENDPOINT, &query).await?;
        Ok(response.providers)
    }

    async fn book_intent(&self, intent: BookingIntent) -> Result<BookingLink, SymptomServiceError> {
        self.post_json(BOOK_INTENT_ENDPOINT, &intent).await
    }

    async fn health_check(&self) -> Result<HealthStatus, SymptomServiceError> {
        let started = Instant::now();
        let url = self.endpoint_url("");
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(Self::transport_error)?;
        let root: RootResponse = Self::decode(response).await?;

        Ok(HealthStatus {
            is_healthy: root.ok,
            latency_ms: Some(started.elapsed().as_millis() as u64),
        })
    }
}
