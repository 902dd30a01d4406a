// Dashboard domain model
use super::line::LineId;
use serde::Deserialize;
use std::collections::BTreeMap;

/// One `/api/dashboard` payload. Immutable once received; the next poll
/// replaces it wholesale.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardSnapshot {
    #[serde(default)]
    pub current: BTreeMap<LineId, LineMetrics>,
    pub recommendation: Recommendation,
    #[serde(default)]
    pub predictions: BTreeMap<LineId, Vec<PredictionPoint>>,
    #[serde(default)]
    pub alerts: Vec<Alert>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl DashboardSnapshot {
    pub fn metrics(&self, line: LineId) -> Option<&LineMetrics> {
        self.current.get(&line)
    }

    /// OEE per line in fixed order, absent lines reading as zero.
    pub fn oee_by_line(&self) -> [f64; 3] {
        LineId::ALL.map(|line| self.metrics(line).map(|m| m.oee).unwrap_or(0.0))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineMetrics {
    pub oee: f64,
    /// Availability, performance, quality, status and anything else the
    /// backend sends along; passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Recommendation {
    pub recommended_line: LineId,
    pub reason: String,
}

/// `date` is an axis label; it is shown as sent and never parsed, so an odd
/// format cannot fail the whole snapshot.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictionPoint {
    pub date: String,
    pub oee_predicted: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Alert {
    pub line_id: String,
    pub severity: String,
    pub message: String,
    pub current: f64,
    #[serde(default)]
    pub expected: Option<f64>,
}
