//! The harness surface: parse a booking page, mount the widget, drive it
//! with synthetic clicks, and assert on the resulting tree.

use crate::dom::{Dom, NodeId};
use crate::events::{BindingStore, EventState, WidgetAction};
use crate::geometry::{GeometryState, Rect};
use crate::html;
use crate::widget::{CounterKind, GuestSelector, WidgetIds};
use crate::{Error, Result};

/// Booking form markup as the server renders it: the hidden `guests` /
/// `children` inputs come from a Django form (hence the `id_` prefixes), the
/// rest is the page template the widget binds to.
pub const BOOKING_FORM_HTML: &str = r#"
<form id="booking-form" method="post" action="/booking/">
  <label for="id_check_in">Check-in</label>
  <input type="date" name="check_in" class="custom-date-input" id="id_check_in">
  <label for="id_check_out">Check-out</label>
  <input type="date" name="check_out" class="custom-date-input" id="id_check_out">
  <div class="guest-field" id="guest-field">
    <div id="guest-display">
      Guests: <span id="guest-count">1</span>, children: <span id="children-count">0</span>
    </div>
  </div>
  <div id="guest-popup" style="display: none;">
    <div class="counter-row">
      <span>Guests</span>
      <button type="button" class="decrement" data-target="guest">-</button>
      <span id="popup-guest-count">1</span>
      <button type="button" class="increment" data-target="guest">+</button>
    </div>
    <div class="counter-row">
      <span>Children</span>
      <button type="button" class="decrement" data-target="children">-</button>
      <span id="popup-children-count">0</span>
      <button type="button" class="increment" data-target="children">+</button>
    </div>
    <button type="button" id="apply-guests">Apply</button>
  </div>
  <input type="hidden" name="guests" value="1" id="id_guests">
  <input type="hidden" name="children" value="0" id="id_children">
  <button type="submit" id="book">Book</button>
</form>
"#;

#[derive(Debug)]
pub struct BookingPage {
    dom: Dom,
    bindings: BindingStore,
    widget: GuestSelector,
    geometry: GeometryState,
    trace: bool,
    trace_events: bool,
    trace_logs: Vec<String>,
    trace_log_limit: usize,
    trace_to_stderr: bool,
}

impl BookingPage {
    pub fn from_html(html: &str) -> Result<Self> {
        Self::from_html_with_ids(html, &WidgetIds::default())
    }

    pub fn from_html_with_ids(html: &str, ids: &WidgetIds) -> Result<Self> {
        let mut dom = html::parse(html)?;
        let mut bindings = BindingStore::default();
        let widget = GuestSelector::mount(&mut dom, &mut bindings, ids)?;
        let mut page = Self {
            dom,
            bindings,
            widget,
            geometry: GeometryState::default(),
            trace: false,
            trace_events: true,
            trace_logs: Vec::new(),
            trace_log_limit: 10_000,
            trace_to_stderr: true,
        };
        // Initial placement, as the load handler performs it.
        page.widget.position(&mut page.dom, &page.geometry)?;
        Ok(page)
    }

    // --- trace controls -------------------------------------------------

    pub fn enable_trace(&mut self, enabled: bool) {
        self.trace = enabled;
    }

    pub fn set_trace_events(&mut self, enabled: bool) {
        self.trace_events = enabled;
    }

    pub fn set_trace_stderr(&mut self, enabled: bool) {
        self.trace_to_stderr = enabled;
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        if max_entries == 0 {
            return Err(Error::Dom("set_trace_log_limit requires at least 1 entry".into()));
        }
        self.trace_log_limit = max_entries;
        while self.trace_logs.len() > self.trace_log_limit {
            self.trace_logs.remove(0);
        }
        Ok(())
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.trace_logs)
    }

    // --- user actions ---------------------------------------------------

    /// Clicks the first element matching the selector. Disabled controls
    /// swallow the click, as in a browser.
    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.disabled(target) {
            return Ok(());
        }
        self.dispatch_click(target)
    }

    /// A click landing on the document itself: outside every element, so the
    /// only binding that sees it is the document-level dismiss handler.
    pub fn click_document(&mut self) -> Result<()> {
        let root = self.dom.root;
        self.dispatch_click(root)
    }

    fn dispatch_click(&mut self, target: NodeId) -> Result<()> {
        let mut event = EventState::new("click", target);

        let mut path = Vec::new();
        let mut cursor = Some(target);
        while let Some(node) = cursor {
            path.push(node);
            cursor = self.dom.parent(node);
        }

        self.trace_event_line(format!(
            "[event] {} target={} path_len={}",
            event.event_type,
            self.describe_node(target),
            path.len()
        ));

        // Bubble-only dispatch: the page script registers no capture
        // listeners. Each node's bindings run to completion in order.
        for node in path {
            event.current_target = node;
            for action in self.bindings.get(node, &event.event_type) {
                self.run_action(action, &event)?;
            }
        }
        Ok(())
    }

    fn run_action(&mut self, action: WidgetAction, event: &EventState) -> Result<()> {
        match action {
            WidgetAction::OpenPopup => {
                self.widget.open(&mut self.dom)?;
                self.trace_event_line("[widget] open popup".to_string());
            }
            WidgetAction::Increment => {
                self.widget.increment(&mut self.dom, event.current_target)?;
                self.trace_counters("increment");
            }
            WidgetAction::Decrement => {
                self.widget.decrement(&mut self.dom, event.current_target)?;
                self.trace_counters("decrement");
            }
            WidgetAction::Apply => {
                self.widget.apply(&mut self.dom)?;
                self.trace_counters("apply");
            }
            WidgetAction::DismissOutside => {
                self.widget.dismiss_if_outside(&mut self.dom, event.target)?;
            }
        }
        Ok(())
    }

    // --- geometry -------------------------------------------------------

    /// Installs a page-coordinate rect for an element. Elements without one
    /// report a zero rect, like a detached node in a browser.
    pub fn set_mock_rect(&mut self, selector: &str, rect: Rect) -> Result<()> {
        let target = self.select_one(selector)?;
        self.geometry.set_rect(target, rect);
        Ok(())
    }

    pub fn set_scroll(&mut self, x: i64, y: i64) {
        self.geometry.scroll_x = x;
        self.geometry.scroll_y = y;
    }

    /// Re-runs the load-time placement against current geometry.
    pub fn reposition(&mut self) -> Result<()> {
        self.widget.position(&mut self.dom, &self.geometry)
    }

    // --- state inspection -----------------------------------------------

    pub fn guest_count(&self) -> i64 {
        self.widget.guest_count()
    }

    pub fn children_count(&self) -> i64 {
        self.widget.children_count()
    }

    pub fn popup_visible(&self) -> bool {
        self.widget.popup_visible(&self.dom)
    }

    pub fn counter(&self, kind: CounterKind) -> i64 {
        self.widget.counter(kind)
    }

    /// Name/value pairs a native submission of the form would carry, in tree
    /// order.
    pub fn form_data(&self, selector: &str) -> Result<Vec<(String, String)>> {
        let form = self.select_one(selector)?;
        let tag = self.dom.tag_name(form).unwrap_or_default().to_string();
        if !tag.eq_ignore_ascii_case("form") {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "form".into(),
                actual: tag,
            });
        }

        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.dom.nodes[form.0]
            .children
            .iter()
            .rev()
            .copied()
            .collect();
        while let Some(node) = stack.pop() {
            if let Some(element) = self.dom.element(node) {
                let submittable = matches!(
                    element.tag_name.as_str(),
                    "input" | "select" | "textarea"
                );
                if submittable && !element.disabled {
                    if let Some(name) = element.attrs.get("name") {
                        out.push((name.clone(), element.value.clone()));
                    }
                }
            }
            for child in self.dom.nodes[node.0].children.iter().rev() {
                stack.push(*child);
            }
        }
        Ok(out)
    }

    // --- assertions -----------------------------------------------------

    pub fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.text_content(target);
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual,
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_value(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.value(target)?;
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual,
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    /// Asserts on an inline style property, e.g. the popup's `top` after
    /// placement. Expected `None` means the property is not declared.
    pub fn assert_style(
        &self,
        selector: &str,
        property: &str,
        expected: Option<&str>,
    ) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.style_property(target, property);
        if actual.as_deref() != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: format!("{property}: {expected:?}"),
                actual: format!("{property}: {actual:?}"),
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_visible(&self, selector: &str) -> Result<()> {
        self.assert_display(selector, true)
    }

    pub fn assert_hidden(&self, selector: &str) -> Result<()> {
        self.assert_display(selector, false)
    }

    pub fn assert_exists(&self, selector: &str) -> Result<()> {
        let _ = self.select_one(selector)?;
        Ok(())
    }

    pub fn dump_dom(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.dump_node(target))
    }

    fn assert_display(&self, selector: &str, expect_visible: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        let visible = self
            .dom
            .style_property(target, "display")
            .map(|display| display != "none")
            .unwrap_or(true);
        if visible != expect_visible {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: if expect_visible { "visible" } else { "hidden" }.to_string(),
                actual: if visible { "visible" } else { "hidden" }.to_string(),
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    // --- internals ------------------------------------------------------

    fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.dom
            .query_selector(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }

    fn node_snippet(&self, node_id: NodeId) -> String {
        truncate_chars(&self.dom.dump_node(node_id), 200)
    }

    fn describe_node(&self, node_id: NodeId) -> String {
        match self.dom.tag_name(node_id) {
            Some(tag) => match self.dom.attr(node_id, "id") {
                Some(id) => format!("{tag}#{id}"),
                None => tag.to_string(),
            },
            None => "document".to_string(),
        }
    }

    fn trace_counters(&mut self, action: &str) {
        self.trace_event_line(format!(
            "[widget] {action} guests={} children={}",
            self.widget.guest_count(),
            self.widget.children_count()
        ));
    }

    fn trace_event_line(&mut self, line: String) {
        if !self.trace || !self.trace_events {
            return;
        }
        if self.trace_to_stderr {
            eprintln!("{line}");
        }
        self.trace_logs.push(line);
        while self.trace_logs.len() > self.trace_log_limit {
            self.trace_logs.remove(0);
        }
    }
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    let mut it = value.chars();
    let mut out = String::new();
    for _ in 0..max_chars {
        let Some(ch) = it.next() else {
            return out;
        };
        out.push(ch);
    }
    if it.next().is_some() {
        out.push_str("...");
    }
    out
}
