// Dashboard controller - owns the client state and wires user actions to
// API calls and renderers
use crate::application::chat_session::ChatSession;
use crate::application::dashboard_api::{DashboardApi, FetchError};
use crate::application::polling::RequestSequencer;
use crate::application::tab_controller::{TabController, TabError};
use crate::domain::chat::ChatTurn;
use crate::domain::dashboard::DashboardSnapshot;
use crate::domain::line::LineId;
use crate::presentation::charts::ChartSurfaceManager;
use crate::presentation::dom::Dom;
use crate::presentation::element_ids as ids;
use crate::presentation::renderers;
use std::cell::RefCell;
use std::rc::Rc;

/// A user action as the page reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Click on a tab button; carries the button's dataset key.
    TabClick(String),
    Click(String),
    KeyPress { id: String, key: String },
    Input { id: String, value: String },
}

#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Tab(#[from] TabError),
    #[error("'{0}' is not a production line")]
    UnknownLine(String),
    #[error("no handler is bound to '{0}'")]
    Unbound(String),
}

struct ClientState {
    /// Latest dashboard payload; each successful fetch overwrites it.
    snapshot: Option<Rc<DashboardSnapshot>>,
    tabs: TabController,
    charts: ChartSurfaceManager,
    chat: ChatSession,
}

/// Cheap to clone: clones share the same page and state, which is how
/// timer callbacks and event handlers reach them.
#[derive(Clone)]
pub struct DashboardController {
    api: Rc<dyn DashboardApi>,
    dom: Rc<RefCell<dyn Dom>>,
    state: Rc<RefCell<ClientState>>,
    sequencer: Rc<RequestSequencer>,
    discard_stale: bool,
}

impl DashboardController {
    pub fn new(
        api: Rc<dyn DashboardApi>,
        dom: Rc<RefCell<dyn Dom>>,
        charts: ChartSurfaceManager,
        tabs: TabController,
    ) -> Self {
        Self {
            api,
            dom,
            state: Rc::new(RefCell::new(ClientState {
                snapshot: None,
                tabs: tabs.with_lazy_view(ids::PREDICTIONS_VIEW),
                charts,
                chat: ChatSession::new(),
            })),
            sequencer: Rc::new(RequestSequencer::new()),
            discard_stale: false,
        }
    }

    /// Drop dashboard responses overtaken by a later request instead of
    /// letting the last one to arrive win.
    pub fn discard_stale_responses(mut self, enabled: bool) -> Self {
        self.discard_stale = enabled;
        self
    }

    pub fn snapshot(&self) -> Option<Rc<DashboardSnapshot>> {
        self.state.borrow().snapshot.clone()
    }

    pub fn active_view(&self) -> String {
        self.state.borrow().tabs.active().to_string()
    }

    pub fn transcript(&self) -> Vec<ChatTurn> {
        self.state.borrow().chat.transcript().to_vec()
    }

    /// Releases every live chart; the page is going away.
    pub fn shutdown(&self) {
        self.state.borrow_mut().charts.release_all();
        tracing::info!("dashboard closed");
    }

    /// Startup fetches, issued together.
    pub async fn start(&self) {
        futures::join!(
            self.load_dashboard(),
            self.load_products(),
            self.load_anomalies()
        );
    }

    /// Fetch-and-render path shared by startup and every poll tick.
    pub async fn load_dashboard(&self) {
        let token = self.sequencer.issue();
        let outcome = self.api.get_dashboard().await;
        self.accept_dashboard(token, outcome);
    }

    pub fn accept_dashboard(&self, token: u64, outcome: Result<DashboardSnapshot, FetchError>) {
        let snapshot = match outcome {
            Ok(snapshot) => Rc::new(snapshot),
            Err(e) => {
                tracing::warn!("Error fetching dashboard: {}", e);
                return;
            }
        };
        if self.discard_stale && !self.sequencer.is_latest(token) {
            tracing::debug!(token, latest = self.sequencer.latest(), "dropping stale dashboard");
            return;
        }

        let state = &mut *self.state.borrow_mut();
        let mut dom = self.dom.borrow_mut();
        state.snapshot = Some(snapshot.clone());
        state.tabs.invalidate();
        renderers::render_dashboard(&mut *dom, &mut state.charts, &snapshot);
        render_due_views(state, &mut *dom);
        tracing::debug!(token, "dashboard rendered");
    }

    pub async fn load_products(&self) {
        match self.api.get_products().await {
            Ok(catalog) => renderers::render_products(&mut *self.dom.borrow_mut(), &catalog),
            Err(e) => tracing::warn!("Error fetching products: {}", e),
        }
    }

    pub async fn load_anomalies(&self) {
        match self.api.get_anomalies().await {
            Ok(list) => renderers::render_anomalies(&mut *self.dom.borrow_mut(), &list),
            Err(e) => tracing::warn!("Error fetching anomalies: {}", e),
        }
    }

    pub fn activate_tab(&self, view: &str) -> Result<(), TabError> {
        let state = &mut *self.state.borrow_mut();
        state.tabs.activate(view)?;

        let mut dom = self.dom.borrow_mut();
        for declared in state.tabs.views() {
            dom.set_active(&ids::tab_button(declared), false);
            dom.set_active(declared, false);
        }
        dom.set_active(&ids::tab_button(view), true);
        dom.set_active(view, true);
        tracing::debug!(view, "tab activated");

        render_due_views(state, &mut *dom);
        Ok(())
    }

    pub async fn simulate(&self) -> Result<(), HandlerError> {
        let (product_type, quantity) = {
            let dom = self.dom.borrow();
            (dom.value(ids::PRODUCT_TYPE), dom.value(ids::QUANTITY))
        };
        let response = self.api.recommend(&product_type, &quantity).await?;
        if let Some(confidence) = &response.confidence {
            tracing::debug!(confidence = %confidence, "recommendation received");
        }
        renderers::render_scenarios(&mut *self.dom.borrow_mut(), &response);
        Ok(())
    }

    pub async fn search_similar(&self) -> Result<(), HandlerError> {
        let description = self.dom.borrow().value(ids::ANOMALY_DESC);
        let cases = self.api.find_similar_anomalies(&description).await?;
        renderers::render_similar(&mut *self.dom.borrow_mut(), &cases.similar_cases);
        Ok(())
    }

    pub async fn optimize_speed(&self) -> Result<(), HandlerError> {
        let (line, product_type) = {
            let dom = self.dom.borrow();
            (dom.value(ids::SPEED_LINE_SELECT), dom.value(ids::SPEED_PRODUCT_SELECT))
        };
        let line_id = LineId::parse(&line).ok_or(HandlerError::UnknownLine(line))?;
        let result = self.api.optimize_speed(line_id, &product_type).await?;

        let state = &mut *self.state.borrow_mut();
        renderers::render_optimization(&mut *self.dom.borrow_mut(), &mut state.charts, &result);
        Ok(())
    }

    /// Never fails: a failed request becomes the fallback assistant turn.
    pub async fn send_chat(&self) {
        let input = self.dom.borrow().value(ids::AGENT_INPUT);
        let query = {
            let mut state = self.state.borrow_mut();
            let Some((query, turn)) = state.chat.begin(&input) else {
                return;
            };
            let mut dom = self.dom.borrow_mut();
            renderers::render_chat_turn(&mut *dom, turn);
            dom.set_value(ids::AGENT_INPUT, "");
            query
        };

        let outcome = self.api.chat(&query).await;

        let mut state = self.state.borrow_mut();
        let turn = state.chat.complete(outcome);
        renderers::render_chat_turn(&mut *self.dom.borrow_mut(), turn);
    }

    /// Routes one page event to its handler.
    ///
    /// Dashboard, product and anomaly loads log their own failures; chat
    /// answers failures in the transcript. Errors returned here come from
    /// the recommend, similar-case and optimize flows, whose panels are left
    /// as they were before the click.
    pub async fn dispatch(&self, event: UiEvent) -> Result<(), HandlerError> {
        match event {
            UiEvent::TabClick(view) => self.activate_tab(&view)?,
            UiEvent::Input { id, value } => self.dom.borrow_mut().set_value(&id, &value),
            UiEvent::Click(id) => match id.as_str() {
                ids::SIMULATE_BTN => self.simulate().await?,
                ids::SEARCH_BTN => self.search_similar().await?,
                ids::OPTIMIZE_SPEED_BTN => self.optimize_speed().await?,
                ids::SEND_AGENT_BTN => self.send_chat().await,
                other => return Err(HandlerError::Unbound(other.to_string())),
            },
            UiEvent::KeyPress { id, key } => {
                if id == ids::AGENT_INPUT && key == "Enter" {
                    self.send_chat().await;
                }
            }
        }
        Ok(())
    }
}

/// Draws every lazy view that is visible, has data, and is behind the
/// latest snapshot.
fn render_due_views(state: &mut ClientState, dom: &mut dyn Dom) {
    let Some(snapshot) = state.snapshot.clone() else {
        return;
    };
    if !state.tabs.needs_render(ids::PREDICTIONS_VIEW, true) {
        return;
    }
    match renderers::render_predictions(dom, &mut state.charts, &snapshot) {
        Ok(()) => state.tabs.mark_rendered(ids::PREDICTIONS_VIEW),
        Err(e) => tracing::warn!("Predictions not rendered: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::chat_session::CHAT_FALLBACK_MESSAGE;
    use crate::application::dashboard_api::stub::StubApi;
    use crate::domain::chat::Role;
    use crate::presentation::charts::{ChartLedger, HeadlessChartBackend};
    use crate::presentation::dom::MemoryDom;
    use serde_json::json;
    use tokio::sync::oneshot;

    const VIEWS: [&str; 6] = [
        "dashboard",
        "simulation",
        "predictions",
        "anomalies",
        "optimization",
        "agent",
    ];

    struct Page {
        api: Rc<StubApi>,
        dom: Rc<RefCell<MemoryDom>>,
        ledger: Rc<RefCell<ChartLedger>>,
        controller: DashboardController,
    }

    fn page(api: StubApi) -> Page {
        let views: Vec<String> = VIEWS.map(String::from).to_vec();
        let api = Rc::new(api);
        let dom = Rc::new(RefCell::new(MemoryDom::dashboard_page(&views, "dashboard")));
        let backend = HeadlessChartBackend::new();
        let ledger = backend.ledger();
        let controller = DashboardController::new(
            api.clone(),
            dom.clone(),
            ChartSurfaceManager::new(Box::new(backend)),
            TabController::new(views, "dashboard").unwrap(),
        );
        Page {
            api,
            dom,
            ledger,
            controller,
        }
    }

    fn predictions(values: [f64; 3]) -> serde_json::Value {
        let line = |v: f64| json!([{"date": "2026-10-20", "oee_predicted": v}]);
        json!({"L1": line(values[0]), "L2": line(values[1]), "L3": line(values[2])})
    }

    fn dashboard(oee: [f64; 3]) -> serde_json::Value {
        json!({
            "current": {"L1": {"oee": oee[0]}, "L2": {"oee": oee[1]}, "L3": {"oee": oee[2]}},
            "recommendation": {"recommended_line": "L3", "reason": "highest OEE"},
            "predictions": predictions(oee)
        })
    }

    fn snapshot(oee: [f64; 3]) -> DashboardSnapshot {
        serde_json::from_value(dashboard(oee)).unwrap()
    }

    fn click(id: &str) -> UiEvent {
        UiEvent::Click(id.to_string())
    }

    fn input(id: &str, value: &str) -> UiEvent {
        UiEvent::Input {
            id: id.to_string(),
            value: value.to_string(),
        }
    }

    #[tokio::test]
    async fn test_startup_renders_dashboard() {
        let api = StubApi::default();
        *api.dashboard.borrow_mut() = Some(dashboard([72.0, 65.0, 80.0]));
        *api.products.borrow_mut() = Some(json!({"products": [
            {"type": "Fond_Plat", "name": "Flat bottom"}
        ]}));
        let page = page(api);

        page.controller.start().await;

        let dom = page.dom.borrow();
        assert_eq!(dom.text_of("l1-oee"), Some("72%"));
        assert_eq!(dom.text_of("l2-oee"), Some("65%"));
        assert_eq!(dom.text_of("l3-oee"), Some("80%"));
        assert_eq!(dom.text_of(ids::RECOMMENDED_LINE), Some("L3"));
        assert_eq!(dom.text_of(ids::RECOMMENDATION_REASON), Some("highest OEE"));
        assert_eq!(dom.value(ids::PRODUCT_TYPE), "Fond_Plat");
        assert!(dom.children_of(ids::ANOMALIES_TBODY).is_empty(), "failed fetch leaves table alone");

        let ledger = page.ledger.borrow();
        let chart = ledger.current(ids::OEE_CHART).unwrap();
        assert_eq!(chart.datasets[0].data, vec![72.0, 65.0, 80.0]);
        assert_eq!(ledger.drawn_on(ids::PREDICTIONS_CHART), 0, "hidden tab is not drawn");

        let mut calls = page.api.calls();
        calls.sort();
        assert_eq!(calls, vec!["anomalies", "dashboard", "products"]);
    }

    #[tokio::test]
    async fn test_failed_poll_keeps_previous_page() {
        let api = StubApi::default();
        *api.dashboard.borrow_mut() = Some(dashboard([72.0, 65.0, 80.0]));
        let page = page(api);
        page.controller.load_dashboard().await;

        *page.api.dashboard.borrow_mut() = None;
        page.controller.load_dashboard().await;

        assert_eq!(page.dom.borrow().text_of("l1-oee"), Some("72%"));
        assert!(page.controller.snapshot().is_some());
        assert_eq!(page.ledger.borrow().drawn_on(ids::OEE_CHART), 1);
    }

    #[tokio::test]
    async fn test_repeated_polls_keep_one_oee_chart() {
        let api = StubApi::default();
        *api.dashboard.borrow_mut() = Some(dashboard([72.0, 65.0, 80.0]));
        let page = page(api);

        for _ in 0..5 {
            page.controller.load_dashboard().await;
        }

        let ledger = page.ledger.borrow();
        assert_eq!(ledger.drawn_on(ids::OEE_CHART), 5);
        assert_eq!(ledger.live_on(ids::OEE_CHART), 1);
    }

    #[test]
    fn test_tab_clicks_are_exclusive() {
        let page = page(StubApi::default());
        for view in ["agent", "predictions", "predictions", "simulation", "dashboard"] {
            page.controller.activate_tab(view).unwrap();
            let dom = page.dom.borrow();
            let active_views: Vec<&str> = VIEWS
                .into_iter()
                .filter(|v| dom.element(v).unwrap().active)
                .collect();
            assert_eq!(active_views, vec![view]);
            let tab = ids::tab_button(view);
            assert_eq!(dom.active_ids(), {
                let mut expected = vec![view, tab.as_str()];
                expected.sort();
                expected
            });
        }
        assert_eq!(page.controller.active_view(), "dashboard");
    }

    #[test]
    fn test_unknown_tab_is_rejected() {
        let page = page(StubApi::default());
        assert!(page.controller.activate_tab("reports").is_err());
        assert_eq!(page.controller.active_view(), "dashboard");
        assert!(page.dom.borrow().element("dashboard").unwrap().active);
    }

    #[test]
    fn test_predictions_wait_for_data() {
        let page = page(StubApi::default());
        page.controller.activate_tab("predictions").unwrap();
        assert_eq!(page.ledger.borrow().drawn_on(ids::PREDICTIONS_CHART), 0);

        // Data arriving while the tab is visible draws it right away.
        page.controller.accept_dashboard(1, Ok(snapshot([70.0, 60.0, 50.0])));
        assert_eq!(page.ledger.borrow().drawn_on(ids::PREDICTIONS_CHART), 1);
        assert_eq!(page.dom.borrow().children_of(ids::PREDICTIONS_TBODY).len(), 1);
    }

    #[test]
    fn test_predictions_render_once_per_snapshot() {
        let page = page(StubApi::default());
        page.controller.accept_dashboard(1, Ok(snapshot([70.0, 60.0, 50.0])));
        assert_eq!(page.ledger.borrow().drawn_on(ids::PREDICTIONS_CHART), 0);

        page.controller.activate_tab("predictions").unwrap();
        page.controller.activate_tab("dashboard").unwrap();
        page.controller.activate_tab("predictions").unwrap();
        assert_eq!(page.ledger.borrow().drawn_on(ids::PREDICTIONS_CHART), 1);

        page.controller.activate_tab("dashboard").unwrap();
        page.controller.accept_dashboard(2, Ok(snapshot([71.0, 61.0, 51.0])));
        page.controller.activate_tab("predictions").unwrap();

        let ledger = page.ledger.borrow();
        assert_eq!(ledger.drawn_on(ids::PREDICTIONS_CHART), 2);
        assert_eq!(ledger.live_on(ids::PREDICTIONS_CHART), 1);
        let dom = page.dom.borrow();
        let row = &dom.children_of(ids::PREDICTIONS_TBODY)[0];
        assert_eq!(row.child_texts(), vec!["2026-10-20", "71%", "61%", "51%"]);
    }

    #[test]
    fn test_last_response_wins_by_default() {
        let page = page(StubApi::default());
        page.controller.accept_dashboard(2, Ok(snapshot([90.0, 90.0, 90.0])));
        page.controller.accept_dashboard(1, Ok(snapshot([10.0, 10.0, 10.0])));
        assert_eq!(page.dom.borrow().text_of("l1-oee"), Some("10%"));
    }

    #[tokio::test]
    async fn test_stale_responses_can_be_discarded() {
        let mut page = page(StubApi::default());
        page.controller = page.controller.clone().discard_stale_responses(true);
        let older = page.controller.sequencer.issue();
        let newer = page.controller.sequencer.issue();

        page.controller.accept_dashboard(newer, Ok(snapshot([90.0, 90.0, 90.0])));
        page.controller.accept_dashboard(older, Ok(snapshot([10.0, 10.0, 10.0])));

        assert_eq!(page.dom.borrow().text_of("l1-oee"), Some("90%"));
        assert_eq!(page.controller.snapshot().unwrap().oee_by_line(), [90.0; 3]);
    }

    /// Two dashboard loads in flight at once; the newer one answers first.
    /// Returns the L1 KPI text once both have settled.
    async fn overlapping_loads(discard_stale: bool) -> String {
        let api = StubApi::default();
        let (older_tx, older_rx) = oneshot::channel();
        let (newer_tx, newer_rx) = oneshot::channel();
        api.dashboard_gates.borrow_mut().extend([older_rx, newer_rx]);
        let mut page = page(api);
        page.controller = page.controller.clone().discard_stale_responses(discard_stale);

        futures::join!(
            page.controller.load_dashboard(),
            page.controller.load_dashboard(),
            async {
                newer_tx.send(dashboard([90.0, 90.0, 90.0])).unwrap();
                tokio::task::yield_now().await;
                older_tx.send(dashboard([10.0, 10.0, 10.0])).unwrap();
            }
        );

        assert_eq!(page.api.calls(), vec!["dashboard"; 2]);
        let text = page.dom.borrow().text_of("l1-oee").unwrap_or_default().to_string();
        text
    }

    #[tokio::test]
    async fn test_overlapping_loads_last_arrival_wins() {
        assert_eq!(overlapping_loads(false).await, "10%");
    }

    #[tokio::test]
    async fn test_overlapping_loads_drop_superseded_response() {
        assert_eq!(overlapping_loads(true).await, "90%");
    }

    #[tokio::test]
    async fn test_odd_prediction_dates_still_render_kpis() {
        let api = StubApi::default();
        let mut payload = dashboard([72.0, 65.0, 80.0]);
        payload["predictions"]["L1"][0]["date"] = json!("2026-10-20T00:00:00");
        *api.dashboard.borrow_mut() = Some(payload);
        let page = page(api);

        page.controller.load_dashboard().await;
        page.controller.activate_tab("predictions").unwrap();

        assert!(page.controller.snapshot().is_some());
        let dom = page.dom.borrow();
        assert_eq!(dom.text_of("l1-oee"), Some("72%"));
        assert_eq!(dom.text_of(ids::RECOMMENDED_LINE), Some("L3"));
        let row = &dom.children_of(ids::PREDICTIONS_TBODY)[0];
        assert_eq!(row.child_texts()[0], "2026-10-20T00:00:00");
        assert_eq!(
            page.ledger.borrow().current(ids::OEE_CHART).unwrap().datasets[0].data,
            vec![72.0, 65.0, 80.0]
        );
    }

    #[tokio::test]
    async fn test_simulate_reads_form_and_renders_cards() {
        let api = StubApi::default();
        let scenario = |line: &str| {
            json!({"line_id": line, "score": 80.0, "predicted_oee": 75.0,
                   "production_time_hours": 1.5, "status": "Good"})
        };
        *api.recommendation.borrow_mut() = Some(json!({
            "details": scenario("L2"),
            "alternatives": [scenario("L1"), scenario("L3")]
        }));
        let page = page(api);

        page.controller.dispatch(input(ids::PRODUCT_TYPE, "Fond_Plat")).await.unwrap();
        page.controller.dispatch(input(ids::QUANTITY, "2500")).await.unwrap();
        page.controller.dispatch(click(ids::SIMULATE_BTN)).await.unwrap();

        assert_eq!(page.api.calls(), vec!["recommend Fond_Plat 2500"]);
        let dom = page.dom.borrow();
        let titles: Vec<String> = dom
            .children_of(ids::SCENARIOS_GRID)
            .iter()
            .map(|card| card.children[0].text_content())
            .collect();
        assert_eq!(titles, vec!["L2", "L1", "L3"]);
    }

    #[tokio::test]
    async fn test_failed_simulation_surfaces_error() {
        let page = page(StubApi::default());
        let result = page.controller.dispatch(click(ids::SIMULATE_BTN)).await;
        assert!(matches!(result, Err(HandlerError::Fetch(_))));
        assert!(page.dom.borrow().children_of(ids::SCENARIOS_GRID).is_empty());
    }

    #[tokio::test]
    async fn test_similar_search() {
        let api = StubApi::default();
        *api.similar.borrow_mut() = Some(json!({"similar_cases": [
            {"similarity": 92.3, "machine": "M1", "line": "L1", "symptom": "jam",
             "solution": "adjust tension"}
        ]}));
        let page = page(api);

        page.controller.dispatch(input(ids::ANOMALY_DESC, "paper jam")).await.unwrap();
        page.controller.dispatch(click(ids::SEARCH_BTN)).await.unwrap();

        assert_eq!(page.api.calls(), vec!["similar paper jam"]);
        assert_eq!(page.dom.borrow().children_of(ids::SIMILAR_CASES).len(), 2);
    }

    #[tokio::test]
    async fn test_optimize_uses_selected_line() {
        let api = StubApi::default();
        *api.optimization.borrow_mut() = Some(json!({
            "curve": [{"speed": 800, "output": 700.0}, {"speed": 900, "output": 760.0}],
            "optimal_speed": 900, "max_output": 760.0, "current_speed": 1000
        }));
        let page = page(api);

        page.controller.dispatch(input(ids::SPEED_LINE_SELECT, "L2")).await.unwrap();
        page.controller.dispatch(input(ids::SPEED_PRODUCT_SELECT, "Fond_Plat")).await.unwrap();
        page.controller.dispatch(click(ids::OPTIMIZE_SPEED_BTN)).await.unwrap();
        page.controller.dispatch(click(ids::OPTIMIZE_SPEED_BTN)).await.unwrap();

        assert_eq!(page.api.calls(), vec!["optimize L2 Fond_Plat"; 2]);
        assert_eq!(page.ledger.borrow().live_on(ids::SWEET_SPOT_CHART), 1);
        assert!(page.dom.borrow().element(ids::OPTIMIZATION_RESULTS).unwrap().visible);

        page.controller.shutdown();
        assert_eq!(page.ledger.borrow().live_on(ids::SWEET_SPOT_CHART), 0);
    }

    #[tokio::test]
    async fn test_optimize_rejects_unknown_line() {
        let page = page(StubApi::default());
        page.controller.dispatch(input(ids::SPEED_LINE_SELECT, "L9")).await.unwrap();
        let result = page.controller.dispatch(click(ids::OPTIMIZE_SPEED_BTN)).await;
        assert!(matches!(result, Err(HandlerError::UnknownLine(line)) if line == "L9"));
        assert!(page.api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_blank_chat_sends_nothing() {
        let page = page(StubApi::default());
        for blank in ["", "   "] {
            page.controller.dispatch(input(ids::AGENT_INPUT, blank)).await.unwrap();
            page.controller.dispatch(click(ids::SEND_AGENT_BTN)).await.unwrap();
        }
        assert!(page.api.calls().is_empty());
        assert!(page.controller.transcript().is_empty());
        assert!(page.dom.borrow().children_of(ids::CHAT_MESSAGES).is_empty());
    }

    #[tokio::test]
    async fn test_chat_failure_shows_fallback() {
        let page = page(StubApi::default());
        page.controller.dispatch(input(ids::AGENT_INPUT, "why is L2 slow?")).await.unwrap();
        page.controller
            .dispatch(UiEvent::KeyPress {
                id: ids::AGENT_INPUT.to_string(),
                key: "Enter".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(
            page.controller.transcript(),
            vec![
                ChatTurn::new(Role::User, "why is L2 slow?"),
                ChatTurn::new(Role::Assistant, CHAT_FALLBACK_MESSAGE),
            ]
        );
        let dom = page.dom.borrow();
        assert_eq!(dom.value(ids::AGENT_INPUT), "");
        let messages = dom.children_of(ids::CHAT_MESSAGES);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].text_content(), CHAT_FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn test_chat_reply_appended() {
        let api = StubApi::default();
        *api.chat.borrow_mut() = Some(json!({"response": "L3 is the best line today."}));
        let page = page(api);

        page.controller.dispatch(input(ids::AGENT_INPUT, " best line? ")).await.unwrap();
        page.controller.dispatch(click(ids::SEND_AGENT_BTN)).await.unwrap();

        assert_eq!(page.api.calls(), vec!["chat best line?"]);
        let transcript = page.controller.transcript();
        assert_eq!(transcript[1].text, "L3 is the best line today.");
        assert_eq!(page.dom.borrow().element(ids::CHAT_MESSAGES).unwrap().scroll_top, 2);
    }

    #[tokio::test]
    async fn test_other_keys_and_buttons() {
        let page = page(StubApi::default());
        page.controller.dispatch(input(ids::AGENT_INPUT, "hello")).await.unwrap();
        page.controller
            .dispatch(UiEvent::KeyPress {
                id: ids::AGENT_INPUT.to_string(),
                key: "a".to_string(),
            })
            .await
            .unwrap();
        assert!(page.api.calls().is_empty());

        let result = page.controller.dispatch(click("export-btn")).await;
        assert!(matches!(result, Err(HandlerError::Unbound(id)) if id == "export-btn"));
    }
}
