// API seam - one operation per backend endpoint
use crate::domain::anomaly::{AnomalyList, SimilarCases};
use crate::domain::chat::ChatReply;
use crate::domain::dashboard::DashboardSnapshot;
use crate::domain::line::LineId;
use crate::domain::optimization::OptimizationResult;
use crate::domain::scenario::{ProductCatalog, RecommendationResponse};
use async_trait::async_trait;

/// Failure of a single request. No retries are attempted anywhere, so this
/// is what the caller sees for transport, status and parse problems alike.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unreadable payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Pure request/response access to the monitoring backend. Futures are not
/// `Send`: everything runs on the single UI event loop.
#[async_trait(?Send)]
pub trait DashboardApi {
    async fn get_dashboard(&self) -> Result<DashboardSnapshot, FetchError>;

    async fn get_products(&self) -> Result<ProductCatalog, FetchError>;

    async fn recommend(
        &self,
        product_type: &str,
        quantity: &str,
    ) -> Result<RecommendationResponse, FetchError>;

    async fn find_similar_anomalies(&self, description: &str) -> Result<SimilarCases, FetchError>;

    async fn get_anomalies(&self) -> Result<AnomalyList, FetchError>;

    async fn optimize_speed(
        &self,
        line_id: LineId,
        product_type: &str,
    ) -> Result<OptimizationResult, FetchError>;

    async fn chat(&self, query: &str) -> Result<ChatReply, FetchError>;
}
