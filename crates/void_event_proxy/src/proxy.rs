//! Per-component proxy state and the `proxy`/`unproxy` API

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use void_event::{Listener, NodeId};

use crate::bundle::event_transform;
use crate::compose::{ComposedTransform, ProxyArg};
use crate::config::ProxyTable;
use crate::error::ProxyResult;
use crate::handler::proxy_handler;
use crate::host::EventHost;
use crate::registry::{HandlerArg, HandlerKey, HandlerRegistry};

/// Event proxying for one component instance.
///
/// Create one per component at initialization. Clones share the
/// re-entrancy flag and the rename registry.
#[derive(Clone)]
pub struct EventProxy<H: EventHost> {
    host: H,
    /// Set while one of this instance's proxies is re-publishing
    triggering: Arc<AtomicBool>,
    /// Synthesized rename handlers
    registry: Arc<Mutex<HandlerRegistry>>,
}

impl<H: EventHost> EventProxy<H> {
    /// Initialize proxy state for a component
    pub fn new(host: H) -> Self {
        Self {
            host,
            triggering: Arc::new(AtomicBool::new(false)),
            registry: Arc::new(Mutex::new(HandlerRegistry::new())),
        }
    }

    /// The owning component
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Whether a proxy of this instance is currently re-publishing
    pub fn is_triggering(&self) -> bool {
        self.triggering.load(Ordering::SeqCst)
    }

    /// Compose transforms into a proxy listener.
    ///
    /// A trailing `true` lets the source event keep propagating. Any
    /// argument that is not a transform fails with `InvalidArgument`.
    pub fn make_proxy<I>(&self, args: I) -> ProxyResult<Listener>
    where
        I: IntoIterator<Item = ProxyArg>,
    {
        let composed = ComposedTransform::compose(args)?;
        Ok(self.make_proxy_from(composed))
    }

    /// Proxy listener for an already composed pipeline
    pub fn make_proxy_from(&self, composed: ComposedTransform) -> Listener {
        proxy_handler::<H>(self.host.downgrade(), Arc::clone(&self.triggering), composed)
    }

    /// Proxy listener that only renames the event type
    pub fn make_rename_proxy(&self, target: &str) -> Listener {
        let target = target.to_string();
        self.make_proxy_from(ComposedTransform::new(vec![event_transform(move |_| target.clone())]))
    }

    /// Proxy `event_type` on the component node
    pub fn proxy(&self, event_type: &str, handler: impl Into<HandlerArg>) {
        self.subscribe(None, event_type, handler.into());
    }

    /// Proxy `event_type` on an explicit node
    pub fn proxy_on(&self, node: NodeId, event_type: &str, handler: impl Into<HandlerArg>) {
        self.subscribe(Some(node), event_type, handler.into());
    }

    /// Remove a proxy installed by [`proxy`](Self::proxy)
    pub fn unproxy(&self, event_type: &str, handler: impl Into<HandlerArg>) {
        self.unsubscribe(None, event_type, handler.into());
    }

    /// Remove a proxy installed by [`proxy_on`](Self::proxy_on)
    pub fn unproxy_on(&self, node: NodeId, event_type: &str, handler: impl Into<HandlerArg>) {
        self.unsubscribe(Some(node), event_type, handler.into());
    }

    /// Rename handler recorded for a shorthand pair
    pub fn registered_handler(&self, source: &str, target: &str) -> Option<Listener> {
        self.registry.lock().get(&HandlerKey::new(source, target))
    }

    /// Install every rename rule of a table on the component node
    pub fn install(&self, table: &ProxyTable) {
        for rule in &table.renames {
            self.proxy(&rule.source, rule.target.as_str());
        }
        log::debug!("installed {} rename proxies", table.renames.len());
    }

    /// Remove every rename rule of a table from the component node
    pub fn uninstall(&self, table: &ProxyTable) {
        for rule in &table.renames {
            self.unproxy(&rule.source, rule.target.as_str());
        }
    }

    fn subscribe(&self, target: Option<NodeId>, event_type: &str, handler: HandlerArg) {
        let listener = match handler {
            HandlerArg::Explicit(listener) => listener,
            HandlerArg::Rename(target_event) => {
                let listener = self.make_rename_proxy(&target_event);
                let key = HandlerKey::new(event_type, target_event);
                let previous = self.registry.lock().insert(key.clone(), Arc::clone(&listener));
                if previous.is_some() {
                    log::debug!("replacing rename proxy {}, previous listener stays subscribed", key);
                }
                listener
            }
        };

        self.host.on(target, event_type, listener);
    }

    fn unsubscribe(&self, target: Option<NodeId>, event_type: &str, handler: HandlerArg) {
        let listener = match handler {
            HandlerArg::Explicit(listener) => Some(listener),
            HandlerArg::Rename(target_event) => {
                let key = HandlerKey::new(event_type, target_event);
                let found = self.registry.lock().get(&key);
                if found.is_none() {
                    log::debug!("no rename proxy registered for {}", key);
                }
                found
            }
        };

        self.host.off(target, event_type, listener.as_ref());
    }
}

impl<H: EventHost + fmt::Debug> fmt::Debug for EventProxy<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventProxy")
            .field("host", &self.host)
            .field("triggering", &self.is_triggering())
            .field("registry", &*self.registry.lock())
            .finish()
    }
}
