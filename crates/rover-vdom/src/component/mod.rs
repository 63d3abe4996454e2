mod state;

use crate::config::Config;
use crate::error::{Result, VdomError};
use crate::node::Node;
use crate::reconcile::{self, SpanTree};
use crate::surface::{SharedSurface, SpanId};
use crate::vnode::{PropValue, Props, VNode};
use serde_json::Value;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, warn};

/// A stateful UI unit.
///
/// `render` describes the tree the component currently wants on screen. It
/// must not call [`ComponentLink::set_state`] on its own component; doing so
/// fails with [`VdomError::ReentrantUpdate`].
pub trait Component: 'static {
    fn render(&self, scope: &Scope<'_>) -> Result<Node>;
}

/// What a component remembers about its last materialization
struct Mounted {
    surface: SharedSurface,
    config: Config,
    snapshot: VNode,
    spans: SpanTree,
    /// Set when the last update failed; the surface may hold a partial patch
    stale: bool,
}

struct ComponentCell {
    view: Box<dyn Component>,
    props: Props,
    children: Vec<Node>,
    state: Value,
    mounted: Option<Mounted>,
    this: Weak<RefCell<ComponentCell>>,
}

impl ComponentCell {
    fn render_snapshot(&self) -> Result<VNode> {
        let scope = Scope { cell: self };
        self.view.render(&scope)?.snapshot()
    }
}

/// Read access to a component while it renders
pub struct Scope<'a> {
    cell: &'a ComponentCell,
}

impl<'a> Scope<'a> {
    pub fn props(&self) -> &'a Props {
        &self.cell.props
    }

    pub fn prop(&self, name: &str) -> Option<&'a PropValue> {
        self.cell.props.get(name)
    }

    pub fn children(&self) -> &'a [Node] {
        &self.cell.children
    }

    pub fn state(&self) -> &'a Value {
        &self.cell.state
    }

    /// Handle for event handlers that need to update this component later
    pub fn link(&self) -> ComponentLink {
        ComponentLink(self.cell.this.clone())
    }
}

/// Shared handle to a live component instance
#[derive(Clone)]
pub struct ComponentHandle(Rc<RefCell<ComponentCell>>);

impl ComponentHandle {
    pub fn new(view: impl Component) -> Self {
        Self::from_boxed(Box::new(view))
    }

    pub fn from_boxed(view: Box<dyn Component>) -> Self {
        Self::from_parts(view, Props::new(), Vec::new())
    }

    pub(crate) fn from_parts(view: Box<dyn Component>, props: Props, children: Vec<Node>) -> Self {
        let cell = Rc::new_cyclic(|this| {
            RefCell::new(ComponentCell {
                view,
                props,
                children,
                state: Value::Null,
                mounted: None,
                this: this.clone(),
            })
        });
        Self(cell)
    }

    pub fn set_attribute(&self, name: &str, value: impl Into<PropValue>) -> Result<()> {
        self.cell_mut()?.props.insert(name, value);
        Ok(())
    }

    pub fn append_child(&self, child: Node) -> Result<()> {
        self.cell_mut()?.children.push(child);
        Ok(())
    }

    fn cell_mut(&self) -> Result<std::cell::RefMut<'_, ComponentCell>> {
        self.0
            .try_borrow_mut()
            .map_err(|_| VdomError::ReentrantUpdate)
    }

    pub fn props(&self) -> Props {
        self.0.borrow().props.clone()
    }

    pub fn child_count(&self) -> usize {
        self.0.borrow().children.len()
    }

    pub fn state(&self) -> Value {
        self.0.borrow().state.clone()
    }

    pub fn link(&self) -> ComponentLink {
        ComponentLink(Rc::downgrade(&self.0))
    }

    pub fn is_mounted(&self) -> bool {
        self.0.borrow().mounted.is_some()
    }

    /// Span the component occupied after its last (re)materialization
    pub fn mounted_span(&self) -> Option<SpanId> {
        self.0.borrow().mounted.as_ref().map(|m| m.spans.span)
    }

    /// Snapshot stored by the last mount or update
    pub fn last_snapshot(&self) -> Option<VNode> {
        self.0.borrow().mounted.as_ref().map(|m| m.snapshot.clone())
    }

    pub fn last_spans(&self) -> Option<SpanTree> {
        self.0.borrow().mounted.as_ref().map(|m| m.spans.clone())
    }

    /// Render and read the resulting tree as a fresh snapshot
    pub fn snapshot(&self) -> Result<VNode> {
        let cell = self
            .0
            .try_borrow()
            .map_err(|_| VdomError::ReentrantUpdate)?;
        cell.render_snapshot()
    }

    /// First materialization into `span`
    pub(crate) fn mount(&self, surface: SharedSurface, span: SpanId, config: Config) -> Result<()> {
        let snapshot = self.snapshot()?;
        let spans = {
            let mut surface = surface
                .try_borrow_mut()
                .map_err(|_| VdomError::ReentrantUpdate)?;
            reconcile::materialize(&mut *surface, &snapshot, span)?
        };
        debug!(
            "Mounted <{}> ({} nodes) into span {:?}",
            snapshot.node_type(),
            snapshot.node_count(),
            span
        );

        let mut cell = self.cell_mut()?;
        cell.mounted = Some(Mounted {
            surface,
            config,
            snapshot,
            spans,
            stale: false,
        });
        Ok(())
    }

    /// Re-render and patch the surface against the last snapshot
    pub fn update(&self) -> Result<()> {
        let snapshot = self.snapshot()?;
        let mounted = self
            .cell_mut()?
            .mounted
            .take()
            .ok_or(VdomError::StateUpdateBeforeMount)?;

        let patched = match mounted.surface.try_borrow_mut() {
            Ok(mut surface) if mounted.stale => {
                debug!("Rebuilding span {:?} after a failed update", mounted.spans.span);
                reconcile::rebuild(&mut *surface, &mounted.spans, &snapshot)
            }
            Ok(mut surface) => {
                reconcile::reconcile(&mut *surface, &mounted.snapshot, &mounted.spans, &snapshot)
            }
            Err(_) => Err(VdomError::ReentrantUpdate),
        };

        let mut cell = self.cell_mut()?;
        match patched {
            Ok(spans) => {
                cell.mounted = Some(Mounted {
                    snapshot,
                    spans,
                    stale: false,
                    ..mounted
                });
                Ok(())
            }
            Err(err) => {
                warn!("Update of span {:?} failed: {}", mounted.spans.span, err);
                cell.mounted = Some(Mounted {
                    stale: true,
                    ..mounted
                });
                Err(err)
            }
        }
    }

    /// Deep-merge `patch` into the state, then update synchronously.
    ///
    /// If the update fails the state is restored to what it was before.
    pub fn set_state(&self, patch: Value) -> Result<()> {
        let previous = {
            let mut cell = self.cell_mut()?;
            let limit = cell
                .mounted
                .as_ref()
                .map(|m| m.config.max_merge_depth)
                .ok_or(VdomError::StateUpdateBeforeMount)?;
            let previous = cell.state.clone();
            state::merge_state(&mut cell.state, patch, limit)?;
            debug!("State updated: {}", cell.state);
            previous
        };

        if let Err(err) = self.update() {
            self.cell_mut()?.state = previous;
            return Err(err);
        }
        Ok(())
    }
}

impl fmt::Debug for ComponentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(cell) => f
                .debug_struct("ComponentHandle")
                .field("props", &cell.props)
                .field("children", &cell.children.len())
                .field("state", &cell.state)
                .field("mounted", &cell.mounted.is_some())
                .finish(),
            Err(_) => f.write_str("ComponentHandle(<rendering>)"),
        }
    }
}

/// Weak handle held by event handlers.
///
/// Does not keep the component alive, so a handler stored in the
/// component's own snapshot does not form a cycle.
#[derive(Clone)]
pub struct ComponentLink(Weak<RefCell<ComponentCell>>);

impl ComponentLink {
    pub fn handle(&self) -> Result<ComponentHandle> {
        self.0
            .upgrade()
            .map(ComponentHandle)
            .ok_or(VdomError::ComponentDropped)
    }

    pub fn set_state(&self, patch: Value) -> Result<()> {
        self.handle()?.set_state(patch)
    }

    pub fn update(&self) -> Result<()> {
        self.handle()?.update()
    }

    pub fn state(&self) -> Result<Value> {
        Ok(self.handle()?.state())
    }
}

impl fmt::Debug for ComponentLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentLink(alive={})", self.0.strong_count() > 0)
    }
}
