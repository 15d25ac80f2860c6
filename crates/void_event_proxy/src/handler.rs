//! Proxy handler factory
//!
//! Turns a composed transform into a bus listener that suppresses the
//! source event and re-publishes the transformed bundle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::Value;
use void_event::{DomEvent, Listener};

use crate::bundle::EventBundle;
use crate::compose::ComposedTransform;
use crate::host::EventHost;

/// Holds the re-entrancy flag for the duration of a re-publish.
///
/// Released on drop, including while unwinding from a panicking listener.
struct ReentrancyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> ReentrancyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self { flag }
    }
}

impl Drop for ReentrancyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Build the listener for `transform`.
///
/// `triggering` is the owning instance's re-entrancy flag; while it is set,
/// firings still suppress the source event but are not re-published.
pub(crate) fn proxy_handler<H: EventHost>(
    weak_host: H::Weak,
    triggering: Arc<AtomicBool>,
    transform: ComposedTransform,
) -> Listener {
    let propagate_source = transform.propagate_source();

    Arc::new(move |event: &DomEvent, data: &Value| {
        event.prevent_default();
        if !propagate_source {
            event.stop_propagation();
        }

        if triggering.load(Ordering::SeqCst) {
            log::trace!("proxy already publishing, skipping '{}'", event.event_type());
            return;
        }

        let bundle = transform.apply(EventBundle::new(
            event.event_type(),
            data.clone(),
            event.target(),
        ));

        log::debug!(
            "proxying '{}' on {} as '{}' on {}",
            event.event_type(),
            event.target(),
            bundle.event,
            bundle.node
        );

        let Some(host) = H::upgrade(&weak_host) else {
            log::warn!("proxy host dropped, '{}' not re-published", bundle.event);
            return;
        };

        let _guard = ReentrancyGuard::acquire(&triggering);
        host.trigger(bundle.node, &bundle.event, bundle.data);
    })
}
