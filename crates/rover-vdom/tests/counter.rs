//! A clickable counter driven through the in-memory surface

use rover_vdom::{
    build, children, dispatch_event, mount, Component, ComponentHandle, EventHandler,
    MemorySurface, Node, Props, Result, Scope, SurfaceOp,
};
use serde_json::json;
use std::cell::OnceCell;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Keeps its click handler across renders so equal renders compare equal
#[derive(Default)]
struct Counter {
    on_click: OnceCell<EventHandler>,
}

impl Component for Counter {
    fn render(&self, scope: &Scope<'_>) -> Result<Node> {
        let count = scope.state()["count"].as_i64().unwrap_or(0);
        let on_click = self
            .on_click
            .get_or_init(|| {
                let link = scope.link();
                EventHandler::new(move |_| {
                    let count = link.state()?["count"].as_i64().unwrap_or(0);
                    link.set_state(json!({ "count": count + 1 }))
                })
            })
            .clone();

        let label = scope
            .prop("label")
            .and_then(|label| label.as_str())
            .unwrap_or("count")
            .to_string();

        Ok(build(
            "div",
            Props::new().with("className", "counter"),
            children![
                build("span", None, children![format!("{label}: {count}")]),
                build("button", Props::new().with("onClick", on_click), children!["+"]),
            ],
        ))
    }
}

fn mounted_counter() -> (std::rc::Rc<std::cell::RefCell<MemorySurface>>, ComponentHandle) {
    let surface = MemorySurface::shared();
    let root = surface.borrow().root();
    let handle = ComponentHandle::new(Counter::default());
    handle.set_attribute("label", "clicks").unwrap();
    mount(&Node::Component(handle.clone()), surface.clone(), root).unwrap();
    (surface, handle)
}

#[test]
fn test_first_mount_renders_counter() {
    init_tracing();
    let (surface, _handle) = mounted_counter();
    let surface = surface.borrow();

    assert_eq!(
        surface.inner_html(),
        "<div class=\"counter\"><span>clicks: 0</span><button>+</button></div>"
    );
    let button = surface.find_first("button").unwrap();
    assert_eq!(surface.listener_count(button, "click"), 1);
    assert_eq!(surface.attribute(button, "onClick"), None);
}

#[test]
fn test_click_increments_count() {
    init_tracing();
    let (surface, handle) = mounted_counter();
    let button = surface.borrow().find_first("button").unwrap();

    dispatch_event(&surface, button, "click").unwrap();
    dispatch_event(&surface, button, "click").unwrap();

    assert_eq!(handle.state(), json!({ "count": 2 }));
    let surface = surface.borrow();
    assert_eq!(
        surface.inner_html(),
        "<div class=\"counter\"><span>clicks: 2</span><button>+</button></div>"
    );
    // The button was reused, so its listener is still the only one.
    assert_eq!(surface.find_first("button"), Some(button));
    assert_eq!(surface.listener_count(button, "click"), 1);
}

#[test]
fn test_click_replaces_only_the_label_text() {
    init_tracing();
    let (surface, _handle) = mounted_counter();
    let button = surface.borrow().find_first("button").unwrap();
    surface.borrow_mut().clear_ops();

    dispatch_event(&surface, button, "click").unwrap();

    let ops = surface.borrow_mut().take_ops();
    let created: Vec<_> = ops
        .iter()
        .filter_map(|op| match op {
            SurfaceOp::CreateText { content, .. } => Some(content.as_str()),
            SurfaceOp::CreateElement { tag, .. } => Some(tag.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(created, vec!["clicks: 1"]);
    assert!(!ops.iter().any(|op| matches!(op, SurfaceOp::AddListener { .. })));
}

#[test]
fn test_update_without_changes_is_silent() {
    init_tracing();
    let (surface, handle) = mounted_counter();
    surface.borrow_mut().clear_ops();

    handle.update().unwrap();
    handle.set_state(json!({ "count": 0 })).unwrap();

    assert!(surface.borrow().ops().is_empty());
}

#[test]
fn test_click_bubbles_from_label_text() {
    init_tracing();
    let surface = MemorySurface::shared();
    let root = surface.borrow().root();
    let handle = ComponentHandle::new(Counter::default());
    mount(&Node::Component(handle.clone()), surface.clone(), root).unwrap();

    let button = surface.borrow().find_first("button").unwrap();
    let label = surface.borrow().children(button)[0];
    dispatch_event(&surface, label, "click").unwrap();

    assert_eq!(handle.state()["count"], json!(1));
    assert!(surface.borrow().inner_html().contains("count: 1"));
}
