// Element ids shared with the dashboard markup
use crate::domain::line::LineId;

pub const RECOMMENDED_LINE: &str = "recommended-line";
pub const RECOMMENDATION_REASON: &str = "recommendation-reason";
pub const LAST_UPDATED: &str = "last-updated";
pub const ACTIVE_ALERTS: &str = "active-alerts";

pub const OEE_CHART: &str = "oeeChart";
pub const PREDICTIONS_CHART: &str = "predictionsChart";
pub const SWEET_SPOT_CHART: &str = "sweetSpotChart";

pub const PREDICTIONS_TBODY: &str = "predictions-tbody";
pub const SCENARIOS_GRID: &str = "scenarios-grid";
pub const SIMILAR_CASES: &str = "similar-cases";
pub const ANOMALIES_TBODY: &str = "anomalies-tbody";
pub const OPTIMIZATION_RESULTS: &str = "optimization-results";
pub const SPEED_RECOMMENDATION: &str = "speed-recommendation";
pub const CHAT_MESSAGES: &str = "chat-messages";

pub const PRODUCT_TYPE: &str = "product-type";
pub const QUANTITY: &str = "quantity";
pub const ANOMALY_DESC: &str = "anomaly-desc";
pub const SPEED_LINE_SELECT: &str = "speed-line-select";
pub const SPEED_PRODUCT_SELECT: &str = "speed-product-select";
pub const AGENT_INPUT: &str = "agent-input";

pub const SIMULATE_BTN: &str = "simulate-btn";
pub const SEARCH_BTN: &str = "search-btn";
pub const OPTIMIZE_SPEED_BTN: &str = "optimize-speed-btn";
pub const SEND_AGENT_BTN: &str = "send-agent-btn";

pub const PREDICTIONS_VIEW: &str = "predictions";

pub fn kpi_oee(line: LineId) -> String {
    format!("{}-oee", line.as_str().to_lowercase())
}

/// Tab buttons carry their view id as dataset key.
pub fn tab_button(view: &str) -> String {
    format!("{}-tab", view)
}

/// Every element the renderers address, tab buttons and views excluded.
pub fn page_elements() -> Vec<String> {
    let mut ids: Vec<String> = LineId::ALL.iter().map(|line| kpi_oee(*line)).collect();
    ids.extend(
        [
            RECOMMENDED_LINE,
            RECOMMENDATION_REASON,
            LAST_UPDATED,
            ACTIVE_ALERTS,
            OEE_CHART,
            PREDICTIONS_CHART,
            SWEET_SPOT_CHART,
            PREDICTIONS_TBODY,
            SCENARIOS_GRID,
            SIMILAR_CASES,
            ANOMALIES_TBODY,
            OPTIMIZATION_RESULTS,
            SPEED_RECOMMENDATION,
            CHAT_MESSAGES,
            PRODUCT_TYPE,
            QUANTITY,
            ANOMALY_DESC,
            SPEED_LINE_SELECT,
            SPEED_PRODUCT_SELECT,
            AGENT_INPUT,
            SIMULATE_BTN,
            SEARCH_BTN,
            OPTIMIZE_SPEED_BTN,
            SEND_AGENT_BTN,
        ]
        .map(String::from),
    );
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kpi_ids_are_lowercase() {
        assert_eq!(kpi_oee(LineId::L1), "l1-oee");
        assert_eq!(kpi_oee(LineId::L3), "l3-oee");
    }

    #[test]
    fn test_page_ids_are_unique() {
        let ids = page_elements();
        let unique: std::collections::HashSet<&String> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
    }
}
