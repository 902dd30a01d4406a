// View renderers - map one payload onto one region of the page
//
// Every renderer clears and rebuilds the dynamic children of the container it
// owns, so calling it twice with the same payload leaves the same page.
use crate::domain::anomaly::{AnomalyList, SimilarCase};
use crate::domain::chat::ChatTurn;
use crate::domain::dashboard::{DashboardSnapshot, PredictionPoint};
use crate::domain::line::LineId;
use crate::domain::optimization::OptimizationResult;
use crate::domain::scenario::{ProductCatalog, RecommendationResponse, ScenarioResult};
use crate::presentation::charts::{ChartKind, ChartSpec, ChartSurfaceManager, Dataset, Marker};
use crate::presentation::dom::{Dom, Node};
use crate::presentation::element_ids as ids;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub const ANOMALY_ROWS: usize = 5;

const BAR_COLORS: [&str; 3] = ["#D32F2F", "#424242", "#757575"];
const SWEET_SPOT_COLOR: &str = "#7CB342";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PredictionsError {
    #[error("no predictions for line {0}")]
    MissingLine(LineId),
    #[error("line {line} has {actual} predictions, L1 has {expected}")]
    Misaligned {
        line: LineId,
        expected: usize,
        actual: usize,
    },
}

/// KPIs, alerts and the OEE bar chart: everything drawn on each poll.
pub fn render_dashboard(
    dom: &mut dyn Dom,
    charts: &mut ChartSurfaceManager,
    snapshot: &DashboardSnapshot,
) {
    render_kpis(dom, snapshot);
    render_alerts(dom, snapshot);
    render_oee_chart(charts, snapshot);
}

pub fn render_kpis(dom: &mut dyn Dom, snapshot: &DashboardSnapshot) {
    for line in LineId::ALL {
        // A line missing from the payload keeps whatever it showed before.
        if let Some(metrics) = snapshot.metrics(line) {
            tracing::trace!(line = %line, extra = ?metrics.extra, "line metrics");
            dom.set_text(&ids::kpi_oee(line), &percent(metrics.oee));
        }
    }
    dom.set_text(
        ids::RECOMMENDED_LINE,
        snapshot.recommendation.recommended_line.as_str(),
    );
    dom.set_text(ids::RECOMMENDATION_REASON, &snapshot.recommendation.reason);
}

pub fn render_alerts(dom: &mut dyn Dom, snapshot: &DashboardSnapshot) {
    if let Some(timestamp) = &snapshot.timestamp {
        dom.set_text(ids::LAST_UPDATED, timestamp);
    }
    dom.clear_children(ids::ACTIVE_ALERTS);
    for alert in &snapshot.alerts {
        let mut item = Node::new("div")
            .with_class(&format!("alert {}", alert.severity.to_lowercase()))
            .child(Node::text("strong", format!("{} ({})", alert.severity, alert.line_id)))
            .child(Node::text("p", alert.message.clone()))
            .child(Node::text("p", format!("Current: {}", percent(alert.current))));
        if let Some(expected) = alert.expected {
            item = item.child(Node::text("p", format!("Expected: {}", percent(expected))));
        }
        dom.append_child(ids::ACTIVE_ALERTS, item);
    }
}

/// Always three bars in fixed line order; a missing line is a zero bar.
pub fn render_oee_chart(charts: &mut ChartSurfaceManager, snapshot: &DashboardSnapshot) {
    let mut dataset = Dataset::new("Current OEE (%)", snapshot.oee_by_line().to_vec());
    dataset.background = BAR_COLORS.map(String::from).to_vec();
    dataset.border_color = Some("#ffffff".to_string());

    let mut spec = ChartSpec::new(ChartKind::Bar, line_labels(), vec![dataset]);
    spec.y_min_zero = true;
    spec.y_max = Some(100.0);
    charts.render(ids::OEE_CHART, spec);
}

/// The three prediction sequences, checked to be index-aligned.
pub fn aligned_predictions(
    snapshot: &DashboardSnapshot,
) -> Result<[&[PredictionPoint]; 3], PredictionsError> {
    let series = |line: LineId| {
        snapshot
            .predictions
            .get(&line)
            .map(Vec::as_slice)
            .ok_or(PredictionsError::MissingLine(line))
    };
    let aligned = [series(LineId::L1)?, series(LineId::L2)?, series(LineId::L3)?];

    let expected = aligned[0].len();
    for (line, points) in LineId::ALL.into_iter().zip(aligned) {
        if points.len() != expected {
            return Err(PredictionsError::Misaligned {
                line,
                expected,
                actual: points.len(),
            });
        }
    }
    Ok(aligned)
}

/// Predictions line chart plus its companion table. Nothing is drawn when
/// the sequences are not aligned.
pub fn render_predictions(
    dom: &mut dyn Dom,
    charts: &mut ChartSurfaceManager,
    snapshot: &DashboardSnapshot,
) -> Result<(), PredictionsError> {
    let series = aligned_predictions(snapshot)?;

    let labels: Vec<String> = series[0].iter().map(|p| p.date.clone()).collect();
    let datasets = LineId::ALL
        .into_iter()
        .zip(series)
        .map(|(line, points)| {
            let mut dataset = Dataset::new(
                format!("Line {}", line),
                points.iter().map(|p| p.oee_predicted).collect(),
            );
            dataset.border_color = Some(prediction_color(line).to_string());
            dataset.tension = Some(0.4);
            dataset
        })
        .collect();
    charts.render(
        ids::PREDICTIONS_CHART,
        ChartSpec::new(ChartKind::Line, labels, datasets),
    );

    dom.clear_children(ids::PREDICTIONS_TBODY);
    for (i, first) in series[0].iter().enumerate() {
        let mut row = Node::new("tr").child(Node::text("td", first.date.clone()));
        for points in series {
            row = row.child(Node::text("td", percent(points[i].oee_predicted)));
        }
        dom.append_child(ids::PREDICTIONS_TBODY, row);
    }
    Ok(())
}

/// Fills the product selects of the simulation and optimization panels.
pub fn render_products(dom: &mut dyn Dom, catalog: &ProductCatalog) {
    for select in [ids::PRODUCT_TYPE, ids::SPEED_PRODUCT_SELECT] {
        dom.clear_children(select);
        for product in &catalog.products {
            dom.append_child(
                select,
                Node::text("option", product.name.clone()).with_value(product.product_type.clone()),
            );
        }
    }
}

/// Primary result first, then alternatives, exactly as received.
pub fn render_scenarios(dom: &mut dyn Dom, response: &RecommendationResponse) {
    dom.clear_children(ids::SCENARIOS_GRID);
    for scenario in response.scenarios() {
        dom.append_child(ids::SCENARIOS_GRID, scenario_card(scenario));
    }
}

fn scenario_card(scenario: &ScenarioResult) -> Node {
    Node::new("div")
        .with_class("scenario-card")
        .child(Node::text("h3", scenario.line_id.as_str()))
        .child(Node::text("p", format!("AI score: {}", scenario.score)))
        .child(Node::text("p", format!("Predicted OEE: {}", percent(scenario.predicted_oee))))
        .child(Node::text("p", format!("Time: {}h", scenario.production_time_hours)))
        .child(Node::text("p", format!("Status: {}", scenario.status)))
}

pub fn render_similar(dom: &mut dyn Dom, cases: &[SimilarCase]) {
    dom.clear_children(ids::SIMILAR_CASES);
    dom.append_child(ids::SIMILAR_CASES, Node::text("h3", "Similar cases"));
    for case in cases {
        let mut item = Node::new("div")
            .with_class("similar-case")
            .child(Node::text(
                "p",
                format!(
                    "{} similarity - {} ({})",
                    percent(case.similarity),
                    case.machine,
                    case.line
                ),
            ))
            .child(Node::text("p", format!("Symptom: {}", case.symptom)));
        if let Some(cause) = &case.cause {
            item = item.child(Node::text("p", format!("Cause: {}", cause)));
        }
        item = item.child(Node::text("p", format!("Solution: {}", case.solution)));
        dom.append_child(ids::SIMILAR_CASES, item);
    }
}

/// Most recent anomalies table; only the first rows in received order.
pub fn render_anomalies(dom: &mut dyn Dom, list: &AnomalyList) {
    dom.clear_children(ids::ANOMALIES_TBODY);
    for anomaly in list.anomalies.iter().take(ANOMALY_ROWS) {
        dom.append_child(
            ids::ANOMALIES_TBODY,
            Node::new("tr")
                .child(Node::text("td", display_date(&anomaly.date)))
                .child(Node::text("td", anomaly.line.clone()))
                .child(Node::text("td", anomaly.symptom.clone()))
                .child(Node::text("td", anomaly.solution.clone())),
        );
    }
}

pub fn render_optimization(
    dom: &mut dyn Dom,
    charts: &mut ChartSurfaceManager,
    result: &OptimizationResult,
) {
    dom.set_visible(ids::OPTIMIZATION_RESULTS, true);

    let mut dataset = Dataset::new(
        "Net output (pcs/h)",
        result.curve.iter().map(|c| c.output).collect(),
    );
    dataset.border_color = Some(SWEET_SPOT_COLOR.to_string());
    dataset.background = vec!["rgba(124, 179, 66, 0.1)".to_string()];
    dataset.fill = true;

    let labels = result.curve.iter().map(|c| c.speed.to_string()).collect();
    let mut spec = ChartSpec::new(ChartKind::Line, labels, vec![dataset]);
    spec.markers.push(Marker {
        x: result.optimal_speed,
        label: "Sweet Spot".to_string(),
        color: "red".to_string(),
    });
    charts.render(ids::SWEET_SPOT_CHART, spec);

    dom.clear_children(ids::SPEED_RECOMMENDATION);
    dom.append_child(
        ids::SPEED_RECOMMENDATION,
        Node::text("div", format!("Optimal speed: {} pcs/h", result.optimal_speed))
            .with_class("optimal-speed"),
    );
    dom.append_child(
        ids::SPEED_RECOMMENDATION,
        Node::text(
            "p",
            format!(
                "Max output: {} pcs/h | Current speed: {} pcs/h",
                result.max_output, result.current_speed
            ),
        ),
    );
}

/// Appends one transcript turn and keeps the newest message in view.
pub fn render_chat_turn(dom: &mut dyn Dom, turn: &ChatTurn) {
    dom.append_child(
        ids::CHAT_MESSAGES,
        Node::text("div", turn.text.clone()).with_class(&format!("message {}", turn.role.as_str())),
    );
    dom.scroll_to_bottom(ids::CHAT_MESSAGES);
}

/// Values are shown exactly as received, never rounded here.
fn percent(value: f64) -> String {
    format!("{}%", value)
}

fn line_labels() -> Vec<String> {
    LineId::ALL.iter().map(|l| l.as_str().to_string()).collect()
}

fn prediction_color(line: LineId) -> &'static str {
    match line {
        LineId::L1 => "#D32F2F",
        LineId::L2 => "#BDBDBD",
        LineId::L3 => "#757575",
    }
}

/// Calendar date of a backend timestamp. Unknown formats are shown verbatim.
fn display_date(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.date_naive().to_string();
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return dt.date_naive().to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.date().to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return dt.date().to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.to_string();
    }
    raw.to_string()
}
