//! Event bundles and field-scoped transforms
//!
//! A bundle is the `{event, data, node}` triple a proxy pipeline works on.
//! Field transforms rewrite one field and pass the other two through.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use void_event::NodeId;

/// The unit of data flowing through a transform pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct EventBundle {
    /// Event type to publish
    pub event: String,
    /// Payload to publish
    pub data: Value,
    /// Node to publish on
    pub node: NodeId,
}

impl EventBundle {
    /// Create a bundle
    pub fn new(event: impl Into<String>, data: Value, node: NodeId) -> Self {
        Self {
            event: event.into(),
            data,
            node,
        }
    }
}

/// A bundle-to-bundle function
#[derive(Clone)]
pub struct Transform(Arc<dyn Fn(EventBundle) -> EventBundle + Send + Sync>);

impl Transform {
    /// Wrap a whole-bundle function
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(EventBundle) -> EventBundle + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Run the transform
    pub fn apply(&self, bundle: EventBundle) -> EventBundle {
        (self.0)(bundle)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Transform(..)")
    }
}

fn field_transform<T, F>(field: fn(&mut EventBundle) -> &mut T, f: F) -> Transform
where
    T: 'static,
    F: Fn(&T) -> T + Send + Sync + 'static,
{
    Transform::new(move |mut bundle| {
        let slot = field(&mut bundle);
        let next = f(&*slot);
        *slot = next;
        bundle
    })
}

fn event_field(bundle: &mut EventBundle) -> &mut String {
    &mut bundle.event
}

fn data_field(bundle: &mut EventBundle) -> &mut Value {
    &mut bundle.data
}

fn node_field(bundle: &mut EventBundle) -> &mut NodeId {
    &mut bundle.node
}

/// Rewrite the event type
pub fn event_transform<F>(f: F) -> Transform
where
    F: Fn(&str) -> String + Send + Sync + 'static,
{
    field_transform(event_field, move |event: &String| f(event))
}

/// Rewrite the payload
pub fn data_transform<F>(f: F) -> Transform
where
    F: Fn(&Value) -> Value + Send + Sync + 'static,
{
    field_transform(data_field, f)
}

/// Redirect to another node
pub fn node_transform<F>(f: F) -> Transform
where
    F: Fn(&NodeId) -> NodeId + Send + Sync + 'static,
{
    field_transform(node_field, f)
}

/// Rewrite several fields at once, e.g. pick the event type from the payload
pub fn event_bundle_transform<F>(f: F) -> Transform
where
    F: Fn(EventBundle) -> EventBundle + Send + Sync + 'static,
{
    Transform::new(f)
}
