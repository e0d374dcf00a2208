//! The guest selector widget: counter state and its click-driven
//! transitions over the booking form DOM.

use crate::dom::{self, Dom, NodeId};
use crate::events::{BindingStore, WidgetAction};
use crate::geometry::GeometryState;
use crate::selector::{self, SelectorStep};
use crate::{Error, Result};

/// Which counter a +/- button adjusts, named by its `data-target` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterKind {
    Guest,
    Children,
}

impl CounterKind {
    pub(crate) fn from_data_target(raw: &str) -> Option<Self> {
        match raw {
            "guest" => Some(Self::Guest),
            "children" => Some(Self::Children),
            _ => None,
        }
    }
}

/// Element identifiers the server-rendered template is expected to provide.
/// Defaults match the production booking form, where Django derives the
/// hidden input ids `id_guests` / `id_children` from the form field names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetIds {
    /// Visible field that opens the popup when clicked.
    pub anchor_display: String,
    /// Wrapper around the anchor; clicks inside it never dismiss the popup.
    pub anchor_field: String,
    /// Class carried by the anchor wrapper, used by the outside-click check.
    pub anchor_field_class: String,
    pub popup: String,
    pub apply_button: String,
    /// Counter text nodes inside the popup.
    pub popup_guest_count: String,
    pub popup_children_count: String,
    /// Summary text nodes inside the anchor field.
    pub field_guest_count: String,
    pub field_children_count: String,
    /// Hidden form inputs carrying the committed values.
    pub input_guests: String,
    pub input_children: String,
}

impl Default for WidgetIds {
    fn default() -> Self {
        Self {
            anchor_display: "guest-display".to_string(),
            anchor_field: "guest-field".to_string(),
            anchor_field_class: "guest-field".to_string(),
            popup: "guest-popup".to_string(),
            apply_button: "apply-guests".to_string(),
            popup_guest_count: "popup-guest-count".to_string(),
            popup_children_count: "popup-children-count".to_string(),
            field_guest_count: "guest-count".to_string(),
            field_children_count: "children-count".to_string(),
            input_guests: "id_guests".to_string(),
            input_children: "id_children".to_string(),
        }
    }
}

#[derive(Debug)]
pub(crate) struct GuestSelector {
    popup: NodeId,
    anchor_field: NodeId,
    popup_guest_count: NodeId,
    popup_children_count: NodeId,
    field_guest_count: NodeId,
    field_children_count: NodeId,
    input_guests: NodeId,
    input_children: NodeId,
    anchor_scope: Vec<SelectorStep>,
    popup_scope: Vec<SelectorStep>,
    guest_count: i64,
    children_count: i64,
}

impl GuestSelector {
    /// Resolves the template's elements, reads the initial counter values
    /// from the popup display text, and registers the click bindings.
    /// Missing elements fail here, before any event is processed.
    pub(crate) fn mount(
        dom: &mut Dom,
        bindings: &mut BindingStore,
        ids: &WidgetIds,
    ) -> Result<Self> {
        let anchor_display = require_id(dom, &ids.anchor_display)?;
        let anchor_field = require_id(dom, &ids.anchor_field)?;
        let popup = require_id(dom, &ids.popup)?;
        let apply_button = require_id(dom, &ids.apply_button)?;
        let popup_guest_count = require_id(dom, &ids.popup_guest_count)?;
        let popup_children_count = require_id(dom, &ids.popup_children_count)?;
        let field_guest_count = require_id(dom, &ids.field_guest_count)?;
        let field_children_count = require_id(dom, &ids.field_children_count)?;
        let input_guests = require_id(dom, &ids.input_guests)?;
        let input_children = require_id(dom, &ids.input_children)?;

        let guest_count = read_initial_count(dom, popup_guest_count, &ids.popup_guest_count)?;
        let children_count =
            read_initial_count(dom, popup_children_count, &ids.popup_children_count)?;

        let anchor_scope_src = format!(".{}", ids.anchor_field_class);
        let anchor_scope = selector::parse_chain(&anchor_scope_src, &anchor_scope_src)?;
        let popup_scope_src = format!("#{}", ids.popup);
        let popup_scope = selector::parse_chain(&popup_scope_src, &popup_scope_src)?;

        bindings.add(anchor_display, "click", WidgetAction::OpenPopup);
        bindings.add(apply_button, "click", WidgetAction::Apply);
        for button in dom.query_selector_all(".increment")? {
            bindings.add(button, "click", WidgetAction::Increment);
        }
        for button in dom.query_selector_all(".decrement")? {
            bindings.add(button, "click", WidgetAction::Decrement);
        }
        bindings.add(dom.root, "click", WidgetAction::DismissOutside);

        Ok(Self {
            popup,
            anchor_field,
            popup_guest_count,
            popup_children_count,
            field_guest_count,
            field_children_count,
            input_guests,
            input_children,
            anchor_scope,
            popup_scope,
            guest_count,
            children_count,
        })
    }

    pub(crate) fn guest_count(&self) -> i64 {
        self.guest_count
    }

    pub(crate) fn children_count(&self) -> i64 {
        self.children_count
    }

    pub(crate) fn counter(&self, kind: CounterKind) -> i64 {
        match kind {
            CounterKind::Guest => self.guest_count,
            CounterKind::Children => self.children_count,
        }
    }

    pub(crate) fn popup_visible(&self, dom: &Dom) -> bool {
        dom.style_property(self.popup, "display")
            .map(|display| display != "none")
            .unwrap_or(true)
    }

    pub(crate) fn open(&self, dom: &mut Dom) -> Result<()> {
        dom.set_style_property(self.popup, "display", "block")
    }

    /// Increment driven by the clicked button's `data-target`. Unknown
    /// targets fall through without touching either counter, like the
    /// source's if/else chain.
    pub(crate) fn increment(&mut self, dom: &mut Dom, button: NodeId) -> Result<()> {
        match self.counter_for(dom, button) {
            Some(CounterKind::Guest) => {
                self.guest_count = self.guest_count.saturating_add(1);
            }
            Some(CounterKind::Children) => {
                self.children_count = self.children_count.saturating_add(1);
            }
            None => {}
        }
        self.update_display(dom)
    }

    /// Decrement with floors: guests never drop below 1, children never
    /// below 0.
    pub(crate) fn decrement(&mut self, dom: &mut Dom, button: NodeId) -> Result<()> {
        match self.counter_for(dom, button) {
            Some(CounterKind::Guest) if self.guest_count > 1 => {
                self.guest_count -= 1;
            }
            Some(CounterKind::Children) if self.children_count > 0 => {
                self.children_count -= 1;
            }
            _ => {}
        }
        self.update_display(dom)
    }

    /// Commits both counters to the in-field summary and the hidden inputs,
    /// then hides the popup.
    pub(crate) fn apply(&self, dom: &mut Dom) -> Result<()> {
        dom.set_text_content(self.field_guest_count, &self.guest_count.to_string())?;
        dom.set_text_content(self.field_children_count, &self.children_count.to_string())?;
        dom.set_value(self.input_guests, &self.guest_count.to_string())?;
        dom.set_value(self.input_children, &self.children_count.to_string())?;
        dom.set_style_property(self.popup, "display", "none")
    }

    /// Document-level handler: hides the popup unless the click target sits
    /// inside the anchor field or the popup.
    pub(crate) fn dismiss_if_outside(&self, dom: &mut Dom, target: NodeId) -> Result<()> {
        let inside_anchor = dom.closest(target, &self.anchor_scope).is_some();
        let inside_popup = dom.closest(target, &self.popup_scope).is_some();
        if !inside_anchor && !inside_popup {
            dom.set_style_property(self.popup, "display", "none")?;
        }
        Ok(())
    }

    /// Writes the anchor field's viewport-relative origin into the popup's
    /// `top`/`left`, as the page script does on load. The source assigns the
    /// viewport coordinates to page-relative style properties, which drifts
    /// once the page is scrolled; that behavior is preserved as-is.
    pub(crate) fn position(&self, dom: &mut Dom, geometry: &GeometryState) -> Result<()> {
        let rect = geometry.client_rect(self.anchor_field);
        dom.set_style_property(self.popup, "top", &rect.y.to_string())?;
        dom.set_style_property(self.popup, "left", &rect.x.to_string())
    }

    fn update_display(&self, dom: &mut Dom) -> Result<()> {
        dom.set_text_content(self.popup_guest_count, &self.guest_count.to_string())?;
        dom.set_text_content(self.popup_children_count, &self.children_count.to_string())
    }

    fn counter_for(&self, dom: &Dom, button: NodeId) -> Option<CounterKind> {
        dom.attr(button, "data-target")
            .and_then(|raw| CounterKind::from_data_target(&raw))
    }
}

fn require_id(dom: &Dom, id: &str) -> Result<NodeId> {
    dom.by_id(id)
        .ok_or_else(|| Error::SelectorNotFound(format!("#{id}")))
}

fn read_initial_count(dom: &Dom, node: NodeId, id: &str) -> Result<i64> {
    let text = dom.text_content(node);
    dom::parse_leading_int(&text).ok_or_else(|| Error::TypeMismatch {
        selector: format!("#{id}"),
        expected: "integer text".into(),
        actual: text,
    })
}
