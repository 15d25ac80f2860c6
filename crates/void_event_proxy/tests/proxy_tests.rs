//! Integration tests for void_event_proxy against the void_event bus

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{json, Value};
use void_event::{listener, Component, EventBus, Listener, NodeId};
use void_event_proxy::prelude::*;
use void_event_proxy::ProxyTable;

struct Fixture {
    bus: Arc<EventBus>,
    component: Component,
    proxy: EventProxy<Component>,
    div1: NodeId,
    div2: NodeId,
}

fn setup() -> Fixture {
    let _ = env_logger::builder().is_test(true).try_init();

    let bus = Arc::new(EventBus::new());
    let component = Component::attach(bus.clone(), None);
    let div1 = component.add_child("div1");
    let div2 = component.add_child("div2");
    let proxy = EventProxy::new(component.clone());

    Fixture {
        bus,
        component,
        proxy,
        div1,
        div2,
    }
}

/// Records every call it receives
#[derive(Clone, Default)]
struct Spy {
    calls: Arc<Mutex<Vec<(String, Value)>>>,
}

impl Spy {
    fn listener(&self) -> Listener {
        let calls = self.calls.clone();
        listener(move |event, data| {
            calls.lock().push((event.event_type().to_string(), data.clone()));
        })
    }

    fn count(&self) -> usize {
        self.calls.lock().len()
    }

    fn payloads(&self) -> Vec<Value> {
        self.calls.lock().iter().map(|(_, data)| data.clone()).collect()
    }
}

fn to_target_event() -> Transform {
    event_transform(|_| "targetEvent".to_string())
}

#[test]
fn transforms_event_type() {
    let f = setup();
    let spy = Spy::default();
    f.component.on(None, "targetEvent", spy.listener());

    f.proxy
        .proxy("sourceEvent", f.proxy.make_proxy(proxy_args![to_target_event()]).unwrap());
    f.component.trigger(None, "sourceEvent", Value::Null);

    assert_eq!(spy.count(), 1);
}

#[test]
fn transforms_event_type_based_on_data() {
    let f = setup();
    let spy = Spy::default();
    f.component.on(None, "differentTargetEvent", spy.listener());

    let handler = f
        .proxy
        .make_proxy(proxy_args![event_bundle_transform(|mut bundle| {
            bundle.event = "targetEvent".to_string();
            if bundle.data["actor"] == "Brent Spiner" {
                bundle.event = "differentTargetEvent".to_string();
            }
            bundle
        })])
        .unwrap();
    f.proxy.proxy("sourceEvent", handler);
    f.component
        .trigger(None, "sourceEvent", json!({"actor": "Brent Spiner"}));

    assert_eq!(spy.count(), 1);
}

#[test]
fn can_unproxy_explicit_handler() {
    let f = setup();
    let spy = Spy::default();
    f.component.on(None, "targetEvent", spy.listener());

    let handler = f.proxy.make_proxy(proxy_args![to_target_event()]).unwrap();
    f.proxy.proxy("sourceEvent", &handler);

    f.component.trigger(None, "sourceEvent", Value::Null);
    assert_eq!(spy.count(), 1);
    f.component.trigger(None, "sourceEvent", Value::Null);
    assert_eq!(spy.count(), 2);

    f.proxy.unproxy("sourceEvent", &handler);
    f.component.trigger(None, "sourceEvent", Value::Null);
    assert_eq!(spy.count(), 2);
}

#[test]
fn make_proxy_rejects_non_function() {
    let f = setup();
    let Err(err) = f.proxy.make_proxy(proxy_args!["string", true]) else {
        panic!("make_proxy accepted a string argument");
    };

    assert!(matches!(err, ProxyError::InvalidArgument { position: 0, .. }));
}

#[test]
fn node_transform_fires_on_correct_node() {
    let f = setup();
    let on_div1 = Spy::default();
    let on_div2 = Spy::default();
    let on_document = Spy::default();
    f.component.on(Some(f.div1), "sourceEvent", on_div1.listener());
    f.component.on(Some(f.div2), "sourceEvent", on_div2.listener());
    f.component.on(Some(f.bus.document()), "sourceEvent", on_document.listener());

    let div1 = f.component.select("div1").unwrap();
    let handler = f
        .proxy
        .make_proxy(proxy_args![node_transform(move |_| div1)])
        .unwrap();
    f.proxy.proxy("sourceEvent", handler);
    f.component.trigger(None, "sourceEvent", Value::Null);

    assert_eq!(on_div1.count(), 1);
    assert_eq!(on_div2.count(), 0);
    assert_eq!(on_document.count(), 0);
}

#[test]
fn node_transform_outside_component_skips_default_target() {
    let f = setup();
    let sibling = Component::attach(f.bus.clone(), None);
    let sibling_node = sibling.node();
    let on_default = Spy::default();
    let on_sibling = Spy::default();
    f.component.on(None, "targetEvent", on_default.listener());
    sibling.on(None, "targetEvent", on_sibling.listener());

    let handler = f
        .proxy
        .make_proxy(proxy_args![
            to_target_event(),
            node_transform(move |_| sibling_node),
        ])
        .unwrap();
    f.proxy.proxy("sourceEvent", handler);
    f.component.trigger(None, "sourceEvent", Value::Null);

    assert_eq!(on_sibling.count(), 1);
    assert_eq!(on_default.count(), 0);
}

#[test]
fn node_transform_to_document_skips_default_target() {
    let f = setup();
    let document = f.bus.document();
    let on_default = Spy::default();
    let on_document = Spy::default();
    f.component.on(None, "targetEvent", on_default.listener());
    f.component.on(Some(document), "targetEvent", on_document.listener());

    let handler = f
        .proxy
        .make_proxy(proxy_args![
            to_target_event(),
            node_transform(move |_| document),
        ])
        .unwrap();
    f.proxy.proxy("sourceEvent", handler);
    f.component.trigger(None, "sourceEvent", Value::Null);

    assert_eq!(on_document.count(), 1);
    assert_eq!(on_default.count(), 0);
}

#[test]
fn data_transform_keeps_source_delivery() {
    let f = setup();
    let spy = Spy::default();
    f.component.on(None, "sourceEvent", spy.listener());

    let handler = f
        .proxy
        .make_proxy(proxy_args![data_transform(|data| json!({
            "actor": data["actor"],
            "rank": "Lieutenant Commander"
        }))])
        .unwrap();
    f.proxy.proxy("sourceEvent", handler);
    f.component
        .trigger(None, "sourceEvent", json!({"actor": "Brent Spiner"}));

    assert_eq!(
        spy.payloads(),
        vec![
            json!({"actor": "Brent Spiner"}),
            json!({"actor": "Brent Spiner", "rank": "Lieutenant Commander"}),
        ]
    );
}

#[test]
fn composes_multiple_transforms() {
    let f = setup();
    let spy = Spy::default();
    f.component.on(None, "sourceEvent", spy.listener());

    let handler = f
        .proxy
        .make_proxy(proxy_args![
            data_transform(|data| json!({"actor": data["actor"], "rank": "Lieutenant Commander"})),
            data_transform(|data| {
                let rank = data["rank"].as_str().unwrap_or_default();
                json!({"actor": data["actor"], "rank": format!("{rank}, Sir")})
            }),
        ])
        .unwrap();
    f.proxy.proxy("sourceEvent", handler);
    f.component
        .trigger(None, "sourceEvent", json!({"actor": "Brent Spiner"}));

    assert_eq!(
        spy.payloads(),
        vec![
            json!({"actor": "Brent Spiner"}),
            json!({"actor": "Brent Spiner", "rank": "Lieutenant Commander, Sir"}),
        ]
    );
}

#[test]
fn listens_on_explicit_node() {
    let f = setup();
    let document = f.bus.document();
    let spy = Spy::default();
    f.component.on(Some(document), "targetEvent", spy.listener());

    let handler = f.proxy.make_proxy(proxy_args![to_target_event()]).unwrap();
    f.proxy.proxy_on(document, "sourceEvent", handler);
    f.component.trigger(Some(document), "sourceEvent", Value::Null);

    assert_eq!(spy.count(), 1);
}

#[test]
fn listens_on_explicit_node_and_proxies_to_component() {
    let f = setup();
    let document = f.bus.document();
    let component_node = f.component.node();
    let spy = Spy::default();
    f.component.on(None, "targetEvent", spy.listener());

    let handler = f
        .proxy
        .make_proxy(proxy_args![
            to_target_event(),
            node_transform(move |_| component_node),
        ])
        .unwrap();
    f.proxy.proxy_on(document, "sourceEvent", handler);
    f.component.trigger(Some(document), "sourceEvent", Value::Null);

    assert_eq!(spy.count(), 1);
}

#[test]
fn source_propagation_suppressed_by_default() {
    let f = setup();
    let spy = Spy::default();
    f.component.on(Some(f.bus.document()), "sourceEvent", spy.listener());

    let handler = f.proxy.make_proxy(proxy_args![to_target_event()]).unwrap();
    f.proxy.proxy("sourceEvent", handler);
    let dispatch = f.component.trigger(None, "sourceEvent", Value::Null);

    assert_eq!(spy.count(), 0);
    assert!(dispatch.default_prevented);
    assert!(dispatch.propagation_stopped);
}

#[test]
fn source_propagation_with_trailing_true() {
    let f = setup();
    let spy = Spy::default();
    f.component.on(Some(f.bus.document()), "sourceEvent", spy.listener());

    let handler = f
        .proxy
        .make_proxy(proxy_args![to_target_event(), true])
        .unwrap();
    f.proxy.proxy("sourceEvent", handler);
    let dispatch = f.component.trigger(None, "sourceEvent", Value::Null);

    assert_eq!(spy.count(), 1);
    assert!(dispatch.default_prevented);
    assert!(!dispatch.propagation_stopped);
}

#[test]
fn sugar_can_proxy() {
    let f = setup();
    let spy = Spy::default();
    f.component.on(None, "targetEvent", spy.listener());

    f.proxy.proxy("sourceEvent", "targetEvent");
    f.component
        .trigger(None, "sourceEvent", json!({"actor": "Brent Spiner"}));

    assert_eq!(spy.count(), 1);
    assert_eq!(spy.payloads(), vec![json!({"actor": "Brent Spiner"})]);
}

#[test]
fn sugar_can_unproxy() {
    let f = setup();
    let spy = Spy::default();
    f.component.on(None, "targetEvent", spy.listener());

    f.proxy.proxy("sourceEvent", "targetEvent");
    f.component.trigger(None, "sourceEvent", Value::Null);
    assert_eq!(spy.count(), 1);
    f.component.trigger(None, "sourceEvent", Value::Null);
    assert_eq!(spy.count(), 2);

    f.proxy.unproxy("sourceEvent", "targetEvent");
    f.component.trigger(None, "sourceEvent", Value::Null);
    assert_eq!(spy.count(), 2);
    assert_eq!(f.bus.listener_count(f.component.node(), "sourceEvent"), 0);
}

#[test]
fn sugar_unproxy_of_unknown_pair_is_noop() {
    let f = setup();
    let spy = Spy::default();
    f.component.on(None, "targetEvent", spy.listener());
    f.proxy.proxy("sourceEvent", "targetEvent");

    f.proxy.unproxy("sourceEvent", "neverProxied");
    f.proxy.unproxy("otherEvent", "targetEvent");
    f.component.trigger(None, "sourceEvent", Value::Null);

    assert_eq!(spy.count(), 1);
    assert_eq!(f.bus.listener_count(f.component.node(), "sourceEvent"), 1);
}

#[test]
fn sugar_reproxy_replaces_registry_entry_only() {
    let f = setup();
    let spy = Spy::default();
    f.component.on(None, "targetEvent", spy.listener());

    f.proxy.proxy("sourceEvent", "targetEvent");
    f.proxy.proxy("sourceEvent", "targetEvent");
    f.component.trigger(None, "sourceEvent", Value::Null);
    assert_eq!(spy.count(), 2);

    // Only the most recent handler is remembered, so one remains subscribed
    f.proxy.unproxy("sourceEvent", "targetEvent");
    assert_eq!(f.bus.listener_count(f.component.node(), "sourceEvent"), 1);

    f.component.trigger(None, "sourceEvent", Value::Null);
    assert_eq!(spy.count(), 3);
}

#[test]
fn self_retrigger_does_not_recurse() {
    let f = setup();
    let spy = Spy::default();
    let transforms = Arc::new(AtomicU32::new(0));
    let transforms_clone = transforms.clone();
    f.component.on(None, "sourceEvent", spy.listener());

    let handler = f
        .proxy
        .make_proxy(proxy_args![data_transform(move |data| {
            transforms_clone.fetch_add(1, Ordering::SeqCst);
            json!({"wrapped": data})
        })])
        .unwrap();
    f.proxy.proxy("sourceEvent", handler);
    f.component.trigger(None, "sourceEvent", json!(1));

    assert_eq!(transforms.load(Ordering::SeqCst), 1);
    assert_eq!(spy.payloads(), vec![json!(1), json!({"wrapped": 1})]);
    assert!(!f.proxy.is_triggering());
}

#[test]
fn symmetric_proxies_on_one_instance_terminate() {
    let f = setup();
    let ping = Spy::default();
    let pong = Spy::default();
    f.component.on(None, "ping", ping.listener());
    f.component.on(None, "pong", pong.listener());

    f.proxy.proxy("ping", "pong");
    f.proxy.proxy("pong", "ping");
    f.component.trigger(None, "ping", Value::Null);

    assert_eq!(ping.count(), 1);
    assert_eq!(pong.count(), 1);
}

#[test]
fn guard_is_per_instance() {
    let f = setup();
    let other = Component::attach(f.bus.clone(), None);
    let other_proxy = EventProxy::new(other.clone());
    let other_node = other.node();
    let spy = Spy::default();
    other.on(None, "finalEvent", spy.listener());

    let handler = f
        .proxy
        .make_proxy(proxy_args![
            to_target_event(),
            node_transform(move |_| other_node),
        ])
        .unwrap();
    f.proxy.proxy("sourceEvent", handler);
    other_proxy.proxy("targetEvent", "finalEvent");

    f.component.trigger(None, "sourceEvent", Value::Null);
    assert_eq!(spy.count(), 1);
}

#[test]
fn panicking_listener_releases_guard() {
    let f = setup();
    let armed = Arc::new(AtomicBool::new(true));
    let armed_clone = armed.clone();
    let spy = Spy::default();
    f.component.on(None, "targetEvent", listener(move |_, _| {
        if armed_clone.swap(false, Ordering::SeqCst) {
            panic!("listener failed");
        }
    }));
    f.component.on(None, "targetEvent", spy.listener());
    f.proxy.proxy("sourceEvent", "targetEvent");

    let result = catch_unwind(AssertUnwindSafe(|| {
        f.component.trigger(None, "sourceEvent", Value::Null);
    }));
    assert!(result.is_err());
    assert!(!f.proxy.is_triggering());

    f.component.trigger(None, "sourceEvent", Value::Null);
    assert_eq!(spy.count(), 1);
}

#[test]
fn subscribed_proxies_do_not_keep_bus_alive() {
    let bus = Arc::new(EventBus::new());
    let weak_bus = Arc::downgrade(&bus);
    let component = Component::attach(bus, None);
    let proxy = EventProxy::new(component.clone());

    proxy.proxy("sourceEvent", "targetEvent");
    let handler = proxy.make_proxy(proxy_args![to_target_event(), true]).unwrap();
    proxy.proxy_on(component.node(), "otherEvent", handler);
    component.trigger(None, "sourceEvent", Value::Null);

    drop(proxy);
    drop(component);
    assert!(weak_bus.upgrade().is_none());
}

#[test]
fn installs_rename_table() {
    let f = setup();
    let saved = Spy::default();
    let cancelled = Spy::default();
    f.component.on(None, "dataSaveRequested", saved.listener());
    f.component.on(None, "dataCancelRequested", cancelled.listener());

    let table = ProxyTable::from_toml_str(
        r#"
        [[rename]]
        source = "uiSaveClicked"
        target = "dataSaveRequested"

        [[rename]]
        source = "uiCancelClicked"
        target = "dataCancelRequested"
        "#,
    )
    .unwrap();

    f.proxy.install(&table);
    f.component.trigger(None, "uiSaveClicked", json!({"id": 7}));
    f.component.trigger(None, "uiCancelClicked", Value::Null);
    assert_eq!(saved.payloads(), vec![json!({"id": 7})]);
    assert_eq!(cancelled.count(), 1);

    f.proxy.uninstall(&table);
    f.component.trigger(None, "uiSaveClicked", Value::Null);
    f.component.trigger(None, "uiCancelClicked", Value::Null);
    assert_eq!(saved.count(), 1);
    assert_eq!(cancelled.count(), 1);
}
