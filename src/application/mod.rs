// Application layer - Client orchestration: state, handlers, polling
pub mod chat_session;
pub mod controller;
pub mod dashboard_api;
pub mod polling;
pub mod tab_controller;
