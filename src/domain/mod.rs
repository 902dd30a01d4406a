// Domain layer - Payload types consumed from the monitoring backend
pub mod anomaly;
pub mod chat;
pub mod dashboard;
pub mod line;
pub mod optimization;
pub mod scenario;
