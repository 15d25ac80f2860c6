//! Firing events and dispatch outcomes

use std::cell::Cell;

use crate::bus::NodeId;

/// An event in flight through the bus.
///
/// The target stays fixed while the event bubbles; `current_target` tracks
/// the node whose listeners are running.
#[derive(Debug)]
pub struct DomEvent {
    event_type: String,
    target: NodeId,
    current_target: Cell<NodeId>,
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
}

impl DomEvent {
    /// Create an event fired at `target`
    pub fn new(event_type: impl Into<String>, target: NodeId) -> Self {
        Self {
            event_type: event_type.into(),
            target,
            current_target: Cell::new(target),
            default_prevented: Cell::new(false),
            propagation_stopped: Cell::new(false),
        }
    }

    /// Event type identifier
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Node the event was originally fired at
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Node currently delivering the event
    pub fn current_target(&self) -> NodeId {
        self.current_target.get()
    }

    pub(crate) fn set_current_target(&self, node: NodeId) {
        self.current_target.set(node);
    }

    /// Suppress the default action
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    /// Stop delivery to ancestor nodes. Listeners on the current node still run.
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    /// Whether a listener suppressed the default action
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    /// Whether a listener stopped bubbling
    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }
}

/// Outcome of a single `trigger` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dispatch {
    /// Number of listener invocations, across all nodes reached
    pub listeners_invoked: usize,
    /// Whether any listener suppressed the default action
    pub default_prevented: bool,
    /// Whether bubbling was cut short
    pub propagation_stopped: bool,
}
