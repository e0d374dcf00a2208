//! Click dispatch plumbing.
//!
//! The page script registers plain bubbling listeners, so dispatch here is
//! bubble-only: the target's bindings run first, then each ancestor's up to
//! the document root. Bindings are typed widget actions, not scripts; every
//! handler runs to completion before the next event is processed.

use std::collections::HashMap;

use crate::dom::NodeId;

/// What a bound element does when clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WidgetAction {
    /// Anchor field clicked: show the popup.
    OpenPopup,
    /// `.increment` button clicked: bump the counter named by its
    /// `data-target` attribute.
    Increment,
    /// `.decrement` button clicked: lower that counter, respecting floors.
    Decrement,
    /// Apply button clicked: commit counters to the form and hide the popup.
    Apply,
    /// Document-level binding: hide the popup unless the click landed inside
    /// the anchor field or the popup itself.
    DismissOutside,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Binding {
    pub(crate) event: String,
    pub(crate) action: WidgetAction,
}

#[derive(Debug, Default, Clone)]
pub(crate) struct BindingStore {
    map: HashMap<NodeId, Vec<Binding>>,
}

impl BindingStore {
    pub(crate) fn add(&mut self, node_id: NodeId, event: &str, action: WidgetAction) {
        let bindings = self.map.entry(node_id).or_default();
        // Re-registering the same action for the same event is a no-op,
        // matching addEventListener's dedupe of identical listeners.
        if bindings
            .iter()
            .any(|existing| existing.event == event && existing.action == action)
        {
            return;
        }
        bindings.push(Binding {
            event: event.to_string(),
            action,
        });
    }

    pub(crate) fn get(&self, node_id: NodeId, event: &str) -> Vec<WidgetAction> {
        self.map
            .get(&node_id)
            .map(|bindings| {
                bindings
                    .iter()
                    .filter(|binding| binding.event == event)
                    .map(|binding| binding.action)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct EventState {
    pub(crate) event_type: String,
    pub(crate) target: NodeId,
    pub(crate) current_target: NodeId,
}

impl EventState {
    pub(crate) fn new(event_type: &str, target: NodeId) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: target,
        }
    }
}
