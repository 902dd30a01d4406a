// Chart surfaces - at most one live chart per named drawing region
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    pub background: Vec<String>,
    pub border_color: Option<String>,
    pub tension: Option<f64>,
    pub fill: bool,
}

impl Dataset {
    pub fn new(label: impl Into<String>, data: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            data,
            background: Vec::new(),
            border_color: None,
            tension: None,
            fill: false,
        }
    }
}

/// Vertical marker drawn over the plot, e.g. the speed sweet spot.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub x: f64,
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    pub y_min_zero: bool,
    pub y_max: Option<f64>,
    pub markers: Vec<Marker>,
}

impl ChartSpec {
    pub fn new(kind: ChartKind, labels: Vec<String>, datasets: Vec<Dataset>) -> Self {
        Self {
            kind,
            labels,
            datasets,
            y_min_zero: false,
            y_max: None,
            markers: Vec::new(),
        }
    }

    /// One-line description for logs and the console.
    pub fn summary(&self) -> String {
        let mut out = format!("{:?} x={:?}", self.kind, self.labels);
        for dataset in &self.datasets {
            out.push_str(&format!(" | {}={:?}", dataset.label, dataset.data));
            if let Some(color) = &dataset.border_color {
                out.push_str(&format!(" border={}", color));
            }
            if !dataset.background.is_empty() {
                out.push_str(&format!(" fill={}", dataset.background.join(",")));
            }
            if let Some(tension) = dataset.tension {
                out.push_str(&format!(" tension={}", tension));
            }
            if dataset.fill {
                out.push_str(" area");
            }
        }
        match (self.y_min_zero, self.y_max) {
            (true, Some(max)) => out.push_str(&format!(" y=0..{}", max)),
            (true, None) => out.push_str(" y=0.."),
            (false, Some(max)) => out.push_str(&format!(" y=..{}", max)),
            (false, None) => {}
        }
        for marker in &self.markers {
            out.push_str(&format!(" [{}@{} {}]", marker.label, marker.x, marker.color));
        }
        out
    }
}

/// A constructed chart. `destroy` must stop its render loop and unbind it
/// from its surface.
pub trait ChartHandle {
    fn destroy(&mut self);
}

/// The charting primitive: draws `spec` into `surface`.
pub trait ChartBackend {
    fn create(&mut self, surface: &str, spec: &ChartSpec) -> Box<dyn ChartHandle>;
}

pub struct ChartSurfaceManager {
    backend: Box<dyn ChartBackend>,
    live: HashMap<String, Box<dyn ChartHandle>>,
}

impl ChartSurfaceManager {
    pub fn new(backend: Box<dyn ChartBackend>) -> Self {
        Self {
            backend,
            live: HashMap::new(),
        }
    }

    /// Draws `spec` into `surface`, releasing the chart already bound there
    /// before the new one is constructed.
    pub fn render(&mut self, surface: &str, spec: ChartSpec) {
        if let Some(mut previous) = self.live.remove(surface) {
            previous.destroy();
        }
        let handle = self.backend.create(surface, &spec);
        self.live.insert(surface.to_string(), handle);
    }

    pub fn release_all(&mut self) {
        for (surface, mut handle) in self.live.drain() {
            tracing::debug!(surface = %surface, "releasing chart");
            handle.destroy();
        }
    }
}

#[cfg(test)]
impl ChartSurfaceManager {
    pub fn is_bound(&self, surface: &str) -> bool {
        self.live.contains_key(surface)
    }
}

#[derive(Debug, Clone)]
pub struct DrawnChart {
    pub surface: String,
    pub spec: ChartSpec,
    pub alive: bool,
}

/// Every chart a [`HeadlessChartBackend`] has constructed, in order.
#[derive(Debug, Default)]
pub struct ChartLedger {
    charts: Vec<DrawnChart>,
}

impl ChartLedger {
    pub fn live_on(&self, surface: &str) -> usize {
        self.charts
            .iter()
            .filter(|c| c.alive && c.surface == surface)
            .count()
    }

    pub fn drawn_on(&self, surface: &str) -> usize {
        self.charts.iter().filter(|c| c.surface == surface).count()
    }

    pub fn current(&self, surface: &str) -> Option<&ChartSpec> {
        self.charts
            .iter()
            .rev()
            .find(|c| c.alive && c.surface == surface)
            .map(|c| &c.spec)
    }

    /// Surfaces drawn at least once, in first-draw order.
    pub fn surfaces(&self) -> Vec<&str> {
        let mut surfaces: Vec<&str> = Vec::new();
        for chart in &self.charts {
            if !surfaces.contains(&chart.surface.as_str()) {
                surfaces.push(&chart.surface);
            }
        }
        surfaces
    }
}

/// Chart backend for hosts without a canvas: records and logs each draw.
#[derive(Clone, Default)]
pub struct HeadlessChartBackend {
    ledger: Rc<RefCell<ChartLedger>>,
}

impl HeadlessChartBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ledger(&self) -> Rc<RefCell<ChartLedger>> {
        self.ledger.clone()
    }
}

impl ChartBackend for HeadlessChartBackend {
    fn create(&mut self, surface: &str, spec: &ChartSpec) -> Box<dyn ChartHandle> {
        let mut ledger = self.ledger.borrow_mut();
        tracing::info!(surface, points = spec.labels.len(), "chart drawn");
        tracing::debug!(surface, spec = %spec.summary());
        ledger.charts.push(DrawnChart {
            surface: surface.to_string(),
            spec: spec.clone(),
            alive: true,
        });
        Box::new(HeadlessChart {
            ledger: self.ledger.clone(),
            index: ledger.charts.len() - 1,
        })
    }
}

struct HeadlessChart {
    ledger: Rc<RefCell<ChartLedger>>,
    index: usize,
}

impl ChartHandle for HeadlessChart {
    fn destroy(&mut self) {
        if let Some(chart) = self.ledger.borrow_mut().charts.get_mut(self.index) {
            chart.alive = false;
        }
    }
}
