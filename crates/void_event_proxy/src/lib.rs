//! # void_event_proxy - Event Proxying
//!
//! Lets a component re-publish an event it receives under a different type,
//! target node or payload, without the producer and consumer knowing about
//! each other.
//!
//! - Field-scoped transforms over `{event, data, node}` bundles
//! - Left-to-right composition into a single proxy listener
//! - Default-action and propagation suppression on the source event
//! - Per-instance re-entrancy guard against self-triggering proxies
//! - Rename shorthand that can be removed with the same arguments
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use void_event::{Component, EventBus, Value};
//! use void_event_proxy::prelude::*;
//!
//! let bus = Arc::new(EventBus::new());
//! let component = Component::attach(bus, None);
//! let proxy = EventProxy::new(component.clone());
//!
//! // Re-publish every `uiSaveClicked` as `dataSaveRequested`
//! proxy.proxy("uiSaveClicked", "dataSaveRequested");
//!
//! // Or build the listener from transforms
//! let handler = proxy
//!     .make_proxy(proxy_args![
//!         event_transform(|_| "dataSaveRequested".to_string()),
//!         data_transform(|data| data.clone()),
//!     ])
//!     .unwrap();
//! proxy.proxy("uiSaveShortcut", handler);
//!
//! component.trigger(None, "uiSaveClicked", Value::Null);
//! ```

pub mod bundle;
pub mod compose;
pub mod config;
pub mod error;
mod handler;
pub mod host;
pub mod proxy;
pub mod registry;

pub use bundle::{
    data_transform, event_bundle_transform, event_transform, node_transform, EventBundle,
    Transform,
};
pub use compose::{ComposedTransform, ProxyArg};
pub use config::{ProxyTable, RenameRule};
pub use error::{ProxyError, ProxyResult};
pub use host::EventHost;
pub use proxy::EventProxy;
pub use registry::{HandlerArg, HandlerKey, HandlerRegistry};

pub mod prelude {
    pub use crate::bundle::{
        data_transform, event_bundle_transform, event_transform, node_transform, EventBundle,
        Transform,
    };
    pub use crate::compose::{ComposedTransform, ProxyArg};
    pub use crate::error::{ProxyError, ProxyResult};
    pub use crate::host::EventHost;
    pub use crate::proxy::EventProxy;
    pub use crate::proxy_args;
    pub use crate::registry::HandlerArg;
}
