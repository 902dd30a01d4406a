// Document seam - the element-id addressed surface the renderers mutate
use crate::domain::line::LineId;
use crate::presentation::element_ids;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Detached element built by a renderer before it is attached.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    pub tag: String,
    pub class: Option<String>,
    pub text: Option<String>,
    pub value: Option<String>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    pub fn text(tag: &str, text: impl Into<String>) -> Self {
        Self::new(tag).with_text(text)
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.class = Some(class.to_string());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn child(mut self, node: Node) -> Self {
        self.children.push(node);
        self
    }

    /// Concatenated text of this node and its descendants, like `textContent`.
    pub fn text_content(&self) -> String {
        let mut out = self.text.clone().unwrap_or_default();
        for child in &self.children {
            out.push_str(&child.text_content());
        }
        out
    }

    /// Text of each direct child, e.g. the cells of a table row.
    pub fn child_texts(&self) -> Vec<String> {
        self.children.iter().map(Node::text_content).collect()
    }
}

pub trait Dom {
    /// Replaces the element's content with plain text.
    fn set_text(&mut self, id: &str, text: &str);
    fn clear_children(&mut self, id: &str);
    fn append_child(&mut self, id: &str, node: Node);
    /// Toggles the `active` class.
    fn set_active(&mut self, id: &str, active: bool);
    fn set_visible(&mut self, id: &str, visible: bool);
    /// Current value of a form control.
    fn value(&self, id: &str) -> String;
    fn set_value(&mut self, id: &str, value: &str);
    fn scroll_to_bottom(&mut self, id: &str);
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub text: String,
    pub children: Vec<Node>,
    pub active: bool,
    pub visible: bool,
    pub value: Option<String>,
    pub scroll_top: usize,
}

impl Default for Element {
    fn default() -> Self {
        Self {
            text: String::new(),
            children: Vec::new(),
            active: false,
            visible: true,
            value: None,
            scroll_top: 0,
        }
    }
}

/// In-process document used by the headless host.
#[derive(Debug, Default, Clone)]
pub struct MemoryDom {
    elements: BTreeMap<String, Element>,
}

impl MemoryDom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dashboard markup: every contract element, one tab button and one view
    /// per declared view, with `initial_view` marked active.
    pub fn dashboard_page(views: &[String], initial_view: &str) -> Self {
        let mut dom = Self::new();
        for id in element_ids::page_elements() {
            dom.elements.insert(id, Element::default());
        }
        for view in views {
            let active = view == initial_view;
            dom.elements.insert(
                element_ids::tab_button(view),
                Element {
                    active,
                    ..Element::default()
                },
            );
            dom.elements.insert(
                view.clone(),
                Element {
                    active,
                    ..Element::default()
                },
            );
        }
        dom.set_visible(element_ids::OPTIMIZATION_RESULTS, false);
        for line in LineId::ALL {
            dom.append_child(
                element_ids::SPEED_LINE_SELECT,
                Node::text("option", line.as_str()).with_value(line.as_str()),
            );
        }
        dom
    }

    /// Human-readable dump of one element, or of the whole page.
    pub fn outline(&self, only: Option<&str>) -> String {
        let mut out = String::new();
        for (id, element) in &self.elements {
            if only.is_some_and(|wanted| wanted != id) {
                continue;
            }
            let mut flags = String::new();
            if element.active {
                flags.push_str(" [active]");
            }
            if !element.visible {
                flags.push_str(" [hidden]");
            }
            if element.scroll_top > 0 {
                let _ = write!(flags, " [scrolled to {}]", element.scroll_top);
            }
            let _ = writeln!(out, "#{}{} {}", id, flags, element.text);
            if let Some(value) = &element.value {
                let _ = writeln!(out, "    value = {}", value);
            }
            for child in &element.children {
                let tag = match &child.class {
                    Some(class) => format!("{}.{}", child.tag, class.replace(' ', ".")),
                    None => child.tag.clone(),
                };
                let text = match &child.text {
                    Some(text) if child.children.is_empty() => text.clone(),
                    _ => child.child_texts().join(" | "),
                };
                let _ = writeln!(out, "    <{}> {}", tag, text);
            }
        }
        out
    }

    fn element_mut(&mut self, id: &str) -> &mut Element {
        self.elements.entry(id.to_string()).or_insert_with(|| {
            tracing::debug!(id, "element missing from markup, creating it");
            Element::default()
        })
    }
}

#[cfg(test)]
impl MemoryDom {
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn text_of(&self, id: &str) -> Option<&str> {
        self.elements.get(id).map(|e| e.text.as_str())
    }

    pub fn children_of(&self, id: &str) -> &[Node] {
        self.elements
            .get(id)
            .map(|e| e.children.as_slice())
            .unwrap_or(&[])
    }

    /// Ids of elements currently carrying the `active` class.
    pub fn active_ids(&self) -> Vec<&str> {
        self.elements
            .iter()
            .filter(|(_, e)| e.active)
            .map(|(id, _)| id.as_str())
            .collect()
    }
}

impl Dom for MemoryDom {
    fn set_text(&mut self, id: &str, text: &str) {
        let element = self.element_mut(id);
        element.children.clear();
        element.text = text.to_string();
    }

    fn clear_children(&mut self, id: &str) {
        let element = self.element_mut(id);
        element.children.clear();
        element.text.clear();
    }

    fn append_child(&mut self, id: &str, node: Node) {
        self.element_mut(id).children.push(node);
    }

    fn set_active(&mut self, id: &str, active: bool) {
        self.element_mut(id).active = active;
    }

    fn set_visible(&mut self, id: &str, visible: bool) {
        self.element_mut(id).visible = visible;
    }

    fn value(&self, id: &str) -> String {
        let Some(element) = self.elements.get(id) else {
            return String::new();
        };
        match &element.value {
            Some(value) => value.clone(),
            // An untouched <select> reads as its first option.
            None => element
                .children
                .iter()
                .find_map(|c| c.value.clone())
                .unwrap_or_default(),
        }
    }

    fn set_value(&mut self, id: &str, value: &str) {
        self.element_mut(id).value = Some(value.to_string());
    }

    fn scroll_to_bottom(&mut self, id: &str) {
        let element = self.element_mut(id);
        element.scroll_top = element.children.len();
    }
}
