// Speed sweet-spot domain model
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurvePoint {
    pub speed: f64,
    pub output: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptimizationResult {
    pub curve: Vec<CurvePoint>,
    pub optimal_speed: f64,
    pub max_output: f64,
    pub current_speed: f64,
}
