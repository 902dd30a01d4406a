// Anomaly history and similar-case domain model
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AnomalyRecord {
    pub date: String,
    pub line: String,
    pub symptom: String,
    pub solution: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnomalyList {
    pub anomalies: Vec<AnomalyRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimilarCase {
    pub similarity: f64,
    pub machine: String,
    pub line: String,
    pub symptom: String,
    #[serde(default)]
    pub cause: Option<String>,
    pub solution: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimilarCases {
    pub similar_cases: Vec<SimilarCase>,
}
