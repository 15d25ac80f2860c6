//! Host capability interface
//!
//! The subscribe, unsubscribe and publish primitives the proxy engine needs
//! from the component layer.

use serde_json::Value;
use void_event::{Component, Listener, NodeId, WeakComponent};

/// Event primitives supplied by the owning component.
///
/// Handlers are stored on the host's own bus, so they keep a [`Weak`]
/// handle and upgrade it per firing.
///
/// [`Weak`]: EventHost::Weak
pub trait EventHost: Clone + Send + Sync + 'static {
    /// Non-owning handle to the host
    type Weak: Clone + Send + Sync + 'static;

    /// Create a non-owning handle
    fn downgrade(&self) -> Self::Weak;

    /// Recover the host, or `None` once it has been dropped
    fn upgrade(weak: &Self::Weak) -> Option<Self>;

    /// Subscribe on `target`, or on the host's default node
    fn on(&self, target: Option<NodeId>, event_type: &str, listener: Listener);

    /// Unsubscribe from `target`. `None` as listener removes nothing.
    fn off(&self, target: Option<NodeId>, event_type: &str, listener: Option<&Listener>);

    /// Publish synchronously on `target`
    fn trigger(&self, target: NodeId, event_type: &str, data: Value);
}

impl EventHost for Component {
    type Weak = WeakComponent;

    fn downgrade(&self) -> WeakComponent {
        Component::downgrade(self)
    }

    fn upgrade(weak: &WeakComponent) -> Option<Self> {
        weak.upgrade()
    }

    fn on(&self, target: Option<NodeId>, event_type: &str, listener: Listener) {
        Component::on(self, target, event_type, listener);
    }

    fn off(&self, target: Option<NodeId>, event_type: &str, listener: Option<&Listener>) {
        let removed = Component::off(self, target, event_type, listener);
        log::trace!("off '{}' removed {} listener(s)", event_type, removed);
    }

    fn trigger(&self, target: NodeId, event_type: &str, data: Value) {
        Component::trigger(self, Some(target), event_type, data);
    }
}
