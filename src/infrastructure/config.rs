use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub api: ApiSettings,
    pub polling: PollingSettings,
    #[serde(default)]
    pub anomalies: AnomalySettings,
    pub ui: UiSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollingSettings {
    pub interval_secs: u64,
    #[serde(default)]
    pub discard_stale_responses: bool,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AnomalySettings {
    /// History window forwarded to `/api/anomalies`; the backend picks its
    /// own default when unset.
    pub period_days: Option<u32>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UiSettings {
    pub views: Vec<String>,
    pub initial_view: String,
}

fn builder() -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    Ok(config::Config::builder()
        .set_default("api.base_url", "http://127.0.0.1:5000")?
        .set_default("polling.interval_secs", 10)?
        .set_default("polling.discard_stale_responses", false)?
        .set_default(
            "ui.views",
            vec![
                "dashboard",
                "simulation",
                "predictions",
                "anomalies",
                "optimization",
                "agent",
            ],
        )?
        .set_default("ui.initial_view", "dashboard")?)
}

/// Defaults, then `config/dashboard.*` if present, then `DASHBOARD__*`
/// environment variables.
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = builder()?
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(
            config::Environment::with_prefix("DASHBOARD")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
