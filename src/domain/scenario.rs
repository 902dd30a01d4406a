// Line recommendation ("what-if") domain model
use super::line::LineId;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    #[serde(rename = "type")]
    pub product_type: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductCatalog {
    pub products: Vec<Product>,
}

/// Score of running a production order on one line.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioResult {
    pub line_id: LineId,
    pub score: f64,
    pub predicted_oee: f64,
    pub production_time_hours: f64,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationResponse {
    pub details: ScenarioResult,
    #[serde(default)]
    pub alternatives: Vec<ScenarioResult>,
    #[serde(default)]
    pub confidence: Option<String>,
}

impl RecommendationResponse {
    /// Primary result first, then alternatives in the order received.
    pub fn scenarios(&self) -> impl Iterator<Item = &ScenarioResult> {
        std::iter::once(&self.details).chain(self.alternatives.iter())
    }
}
