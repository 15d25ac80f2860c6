//! Event bus for node-scoped publish and subscribe
//!
//! Listeners are stored per node and event type. `trigger` delivers
//! synchronously, first at the target node and then at each ancestor, until
//! a listener stops propagation or the document root has been reached.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::event::{Dispatch, DomEvent};

/// Node identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Shared event listener. Identity is the shared allocation, so `off`
/// needs a clone of the same `Arc` that was passed to `on`.
pub type Listener = Arc<dyn Fn(&DomEvent, &Value) + Send + Sync>;

/// Wrap a closure as a [`Listener`]
pub fn listener<F>(f: F) -> Listener
where
    F: Fn(&DomEvent, &Value) + Send + Sync + 'static,
{
    Arc::new(f)
}

fn same_listener(a: &Listener, b: &Listener) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

/// Event bus over a tree of nodes
pub struct EventBus {
    /// Root node
    document: NodeId,
    /// Parent links (`None` only for the document)
    parents: RwLock<HashMap<NodeId, Option<NodeId>>>,
    /// Listeners by node, then event type
    listeners: RwLock<HashMap<NodeId, HashMap<String, Vec<Listener>>>>,
    /// Next node ID
    next_node: AtomicU64,
}

impl EventBus {
    /// Create a bus containing only the document node
    pub fn new() -> Self {
        let document = NodeId(0);
        let mut parents = HashMap::new();
        parents.insert(document, None);

        Self {
            document,
            parents: RwLock::new(parents),
            listeners: RwLock::new(HashMap::new()),
            next_node: AtomicU64::new(1),
        }
    }

    /// The root node
    pub fn document(&self) -> NodeId {
        self.document
    }

    /// Create a node under `parent`, or under the document
    pub fn create_node(&self, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.next_node.fetch_add(1, Ordering::Relaxed));
        let parent = parent.unwrap_or(self.document);
        self.parents.write().insert(id, Some(parent));
        id
    }

    /// Parent of a node
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.parents.read().get(&node).copied().flatten()
    }

    /// Check whether a node belongs to this bus
    pub fn contains(&self, node: NodeId) -> bool {
        self.parents.read().contains_key(&node)
    }

    /// Subscribe a listener
    pub fn on(&self, node: NodeId, event_type: &str, listener: Listener) {
        log::trace!("on {} '{}'", node, event_type);
        self.listeners
            .write()
            .entry(node)
            .or_default()
            .entry(event_type.to_string())
            .or_default()
            .push(listener);
    }

    /// Unsubscribe every registration of `listener`.
    ///
    /// `None` removes nothing. Returns the number of registrations removed.
    pub fn off(&self, node: NodeId, event_type: &str, listener: Option<&Listener>) -> usize {
        let Some(listener) = listener else {
            log::debug!("off {} '{}' without a listener, nothing removed", node, event_type);
            return 0;
        };

        let mut listeners = self.listeners.write();
        let Some(entries) = listeners.get_mut(&node).and_then(|by_type| by_type.get_mut(event_type)) else {
            return 0;
        };

        let before = entries.len();
        entries.retain(|existing| !same_listener(existing, listener));
        before - entries.len()
    }

    /// Unsubscribe all listeners for an event type on a node
    pub fn off_all(&self, node: NodeId, event_type: &str) -> usize {
        self.listeners
            .write()
            .get_mut(&node)
            .and_then(|by_type| by_type.remove(event_type))
            .map_or(0, |removed| removed.len())
    }

    /// Number of listeners for an event type on a node
    pub fn listener_count(&self, node: NodeId, event_type: &str) -> usize {
        self.listeners
            .read()
            .get(&node)
            .and_then(|by_type| by_type.get(event_type))
            .map_or(0, Vec::len)
    }

    /// Fire an event at `node` and bubble it towards the document.
    ///
    /// Listener lists are snapshotted per node and no lock is held while a
    /// listener runs.
    pub fn trigger(&self, node: NodeId, event_type: &str, data: Value) -> Dispatch {
        let event = DomEvent::new(event_type, node);
        let mut listeners_invoked = 0;
        let mut current = Some(node);

        while let Some(at) = current {
            let snapshot = self.snapshot(at, event_type);
            if !snapshot.is_empty() {
                event.set_current_target(at);
                for listener in &snapshot {
                    listener(&event, &data);
                    listeners_invoked += 1;
                }
            }

            if event.is_propagation_stopped() {
                log::trace!("'{}' stopped at {}", event_type, at);
                break;
            }
            current = self.parent(at);
        }

        Dispatch {
            listeners_invoked,
            default_prevented: event.is_default_prevented(),
            propagation_stopped: event.is_propagation_stopped(),
        }
    }

    fn snapshot(&self, node: NodeId, event_type: &str) -> Vec<Listener> {
        self.listeners
            .read()
            .get(&node)
            .and_then(|by_type| by_type.get(event_type))
            .cloned()
            .unwrap_or_default()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("document", &self.document)
            .field("nodes", &self.parents.read().len())
            .finish()
    }
}
