// Tab controller - single-selection state machine over the declared views
use std::collections::HashMap;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TabError {
    #[error("no view is declared for tab key '{0}'")]
    UnknownView(String),
}

/// Exactly one view is active at any time. Views registered as lazy carry a
/// readiness flag: they are drawn only while visible, and only once per
/// dashboard snapshot.
#[derive(Debug, Clone)]
pub struct TabController {
    views: Vec<String>,
    active: String,
    fresh: HashMap<String, bool>,
}

impl TabController {
    /// Starts from whatever view the markup marks active.
    pub fn new(views: Vec<String>, initial: &str) -> Result<Self, TabError> {
        if !views.iter().any(|v| v == initial) {
            return Err(TabError::UnknownView(initial.to_string()));
        }
        Ok(Self {
            views,
            active: initial.to_string(),
            fresh: HashMap::new(),
        })
    }

    pub fn with_lazy_view(mut self, view: &str) -> Self {
        self.fresh.insert(view.to_string(), false);
        self
    }

    pub fn views(&self) -> &[String] {
        &self.views
    }

    pub fn active(&self) -> &str {
        &self.active
    }

    pub fn is_active(&self, view: &str) -> bool {
        self.active == view
    }

    /// Switches to `view`. Deactivating the previous view and activating the
    /// new one happen in one step; there is no state with zero or two views
    /// active.
    pub fn activate(&mut self, view: &str) -> Result<(), TabError> {
        if !self.views.iter().any(|v| v == view) {
            return Err(TabError::UnknownView(view.to_string()));
        }
        self.active = view.to_string();
        Ok(())
    }

    /// A new snapshot arrived: every lazy view now shows outdated data.
    pub fn invalidate(&mut self) {
        for fresh in self.fresh.values_mut() {
            *fresh = false;
        }
    }

    pub fn mark_rendered(&mut self, view: &str) {
        if let Some(fresh) = self.fresh.get_mut(view) {
            *fresh = true;
        }
    }

    /// Render-if-visible-and-data-present rule, shared by tab activation and
    /// data arrival.
    pub fn needs_render(&self, view: &str, has_data: bool) -> bool {
        has_data && self.is_active(view) && self.fresh.get(view) == Some(&false)
    }
}
