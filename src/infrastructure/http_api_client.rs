// reqwest-backed implementation of the dashboard API
use crate::application::dashboard_api::{DashboardApi, FetchError};
use crate::domain::anomaly::{AnomalyList, SimilarCases};
use crate::domain::chat::ChatReply;
use crate::domain::dashboard::DashboardSnapshot;
use crate::domain::line::LineId;
use crate::domain::optimization::OptimizationResult;
use crate::domain::scenario::{ProductCatalog, RecommendationResponse};
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

#[derive(Debug, Clone)]
pub struct HttpApiClient {
    base_url: String,
    anomaly_period_days: Option<u32>,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct SimilarRequest<'a> {
    description: &'a str,
}

#[derive(Serialize)]
struct OptimizeRequest<'a> {
    line_id: LineId,
    product_type: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    query: &'a str,
}

impl HttpApiClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anomaly_period_days: None,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_anomaly_period(mut self, days: Option<u32>) -> Self {
        self.anomaly_period_days = days;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn recommend_url(&self, product_type: &str, quantity: &str) -> String {
        self.url(&format!(
            "/api/recommend?product_type={}&quantity={}",
            urlencoding::encode(product_type),
            urlencoding::encode(quantity)
        ))
    }

    fn anomalies_url(&self) -> String {
        match self.anomaly_period_days {
            Some(days) => self.url(&format!("/api/anomalies?period={}", days)),
            None => self.url("/api/anomalies"),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, FetchError> {
        tracing::debug!(url = %url, "GET");
        let response = self.client.get(&url).send().await?;
        Self::decode(response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        url: String,
        body: &B,
    ) -> Result<T, FetchError> {
        tracing::debug!(url = %url, "POST");
        // `json` sets the application/json content type.
        let response = self.client.post(&url).json(body).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, FetchError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait(?Send)]
impl DashboardApi for HttpApiClient {
    async fn get_dashboard(&self) -> Result<DashboardSnapshot, FetchError> {
        self.get_json(self.url("/api/dashboard")).await
    }

    async fn get_products(&self) -> Result<ProductCatalog, FetchError> {
        self.get_json(self.url("/api/products")).await
    }

    async fn recommend(
        &self,
        product_type: &str,
        quantity: &str,
    ) -> Result<RecommendationResponse, FetchError> {
        self.get_json(self.recommend_url(product_type, quantity)).await
    }

    async fn find_similar_anomalies(&self, description: &str) -> Result<SimilarCases, FetchError> {
        self.post_json(self.url("/api/anomaly/similar"), &SimilarRequest { description })
            .await
    }

    async fn get_anomalies(&self) -> Result<AnomalyList, FetchError> {
        self.get_json(self.anomalies_url()).await
    }

    async fn optimize_speed(
        &self,
        line_id: LineId,
        product_type: &str,
    ) -> Result<OptimizationResult, FetchError> {
        self.post_json(
            self.url("/api/speed/optimize"),
            &OptimizeRequest {
                line_id,
                product_type,
            },
        )
        .await
    }

    async fn chat(&self, query: &str) -> Result<ChatReply, FetchError> {
        self.post_json(self.url("/api/chat"), &ChatRequest { query }).await
    }
}
