// Main entry point - Dependency injection and event loop setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::application::controller::DashboardController;
use crate::application::polling::launch;
use crate::application::tab_controller::TabController;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::http_api_client::HttpApiClient;
use crate::presentation::charts::{ChartSurfaceManager, HeadlessChartBackend};
use crate::presentation::console::run_console;
use crate::presentation::dom::MemoryDom;

// Everything runs on one thread, like the page the dashboard lives in.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_dashboard_config()?;

    // Backend access (infrastructure layer)
    let api = Rc::new(
        HttpApiClient::new(config.api.base_url.clone())
            .with_anomaly_period(config.anomalies.period_days),
    );

    // Page and chart surfaces (presentation layer)
    let dom = Rc::new(RefCell::new(MemoryDom::dashboard_page(
        &config.ui.views,
        &config.ui.initial_view,
    )));
    let backend = HeadlessChartBackend::new();
    let ledger = backend.ledger();

    // Client controller (application layer)
    let tabs = TabController::new(config.ui.views.clone(), &config.ui.initial_view)?;
    let controller = DashboardController::new(
        api,
        dom.clone(),
        ChartSurfaceManager::new(Box::new(backend)),
        tabs,
    )
    .discard_stale_responses(config.polling.discard_stale_responses);

    tracing::info!(backend = %config.api.base_url, "starting line dashboard");

    let local = tokio::task::LocalSet::new();
    local
        .run_until(async move {
            launch(
                &controller,
                Duration::from_secs(config.polling.interval_secs),
            );
            let outcome = run_console(controller.clone(), dom, ledger).await;
            controller.shutdown();
            outcome
        })
        .await
}
