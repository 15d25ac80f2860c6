//! Component handle
//!
//! A component owns one node on the bus. `on`/`off`/`trigger` default to
//! that node when no explicit target is given, and named child nodes stand
//! in for selector lookup.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use serde_json::Value;

use crate::bus::{EventBus, Listener, NodeId};
use crate::event::Dispatch;

/// Handle to a component attached to an event bus. Clones share the node.
#[derive(Clone)]
pub struct Component {
    node: NodeId,
    bus: Arc<EventBus>,
    children: Arc<RwLock<HashMap<String, NodeId>>>,
}

impl Component {
    /// Attach a new component under `parent`, or under the document
    pub fn attach(bus: Arc<EventBus>, parent: Option<NodeId>) -> Self {
        let node = bus.create_node(parent);
        log::debug!("component attached at {}", node);
        Self {
            node,
            bus,
            children: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// The component's own node
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The bus this component is attached to
    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// Create a named child node
    pub fn add_child(&self, name: impl Into<String>) -> NodeId {
        let child = self.bus.create_node(Some(self.node));
        self.children.write().insert(name.into(), child);
        child
    }

    /// Look up a named child node
    pub fn select(&self, name: &str) -> Option<NodeId> {
        self.children.read().get(name).copied()
    }

    /// Subscribe on `target`, defaulting to the component node
    pub fn on(&self, target: Option<NodeId>, event_type: &str, listener: Listener) {
        self.bus.on(target.unwrap_or(self.node), event_type, listener);
    }

    /// Unsubscribe from `target`, defaulting to the component node
    pub fn off(&self, target: Option<NodeId>, event_type: &str, listener: Option<&Listener>) -> usize {
        self.bus.off(target.unwrap_or(self.node), event_type, listener)
    }

    /// Fire an event at `target`, defaulting to the component node
    pub fn trigger(&self, target: Option<NodeId>, event_type: &str, data: Value) -> Dispatch {
        self.bus.trigger(target.unwrap_or(self.node), event_type, data)
    }

    /// Non-owning handle, for callbacks stored on the bus itself
    pub fn downgrade(&self) -> WeakComponent {
        WeakComponent {
            node: self.node,
            bus: Arc::downgrade(&self.bus),
            children: Arc::downgrade(&self.children),
        }
    }
}

/// Non-owning [`Component`] handle. Does not keep the bus alive.
#[derive(Clone)]
pub struct WeakComponent {
    node: NodeId,
    bus: Weak<EventBus>,
    children: Weak<RwLock<HashMap<String, NodeId>>>,
}

impl WeakComponent {
    /// The component's node
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Recover a full handle while the bus is alive.
    ///
    /// Named children are only kept while a strong handle exists; after
    /// that the recovered handle starts with none.
    pub fn upgrade(&self) -> Option<Component> {
        let bus = self.bus.upgrade()?;
        Some(Component {
            node: self.node,
            bus,
            children: self.children.upgrade().unwrap_or_default(),
        })
    }
}

impl fmt::Debug for WeakComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakComponent")
            .field("node", &self.node)
            .field("alive", &(self.bus.strong_count() > 0))
            .finish()
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("node", &self.node)
            .field("children", &self.children.read().len())
            .finish()
    }
}
