//! # void_event - Node-tree Event Bus
//!
//! Synchronous event delivery over a tree of nodes:
//! - Listeners keyed by node and event type
//! - Bubbling from the target node up to the document root
//! - Default-action and propagation control on the firing event
//! - Re-entrant `on`/`off`/`trigger` from inside listeners
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use void_event::prelude::*;
//!
//! let bus = Arc::new(EventBus::new());
//! let component = Component::attach(bus.clone(), None);
//!
//! component.on(None, "ready", listener(|event, _data| {
//!     assert_eq!(event.event_type(), "ready");
//! }));
//!
//! let dispatch = component.trigger(None, "ready", Value::Null);
//! assert_eq!(dispatch.listeners_invoked, 1);
//! ```

pub mod bus;
pub mod component;
pub mod event;

pub use serde_json::Value;

/// Prelude
pub mod prelude {
    pub use crate::bus::{listener, EventBus, Listener, NodeId};
    pub use crate::component::{Component, WeakComponent};
    pub use crate::event::{Dispatch, DomEvent};
    pub use serde_json::Value;
}

pub use prelude::*;
