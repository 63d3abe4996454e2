mod commands;
mod memory;

pub use commands::SurfaceOp;
pub use memory::{dispatch_event, MemorySurface};

use crate::error::SurfaceError;
use smartstring::alias::String as SmartString;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Handle to a node owned by a [`Surface`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

/// Handle to a live span owned by a [`Surface`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpanId(pub(crate) u32);

/// Event delivered to a listener
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub name: SmartString,
    pub target: NodeId,
}

type HandlerFn = dyn Fn(&Event) -> crate::Result<()>;

/// Event listener callback.
///
/// Handlers compare by identity: two handlers are equal only when they share
/// the same allocation.
#[derive(Clone)]
pub struct EventHandler(Rc<HandlerFn>);

impl EventHandler {
    pub fn new(f: impl Fn(&Event) -> crate::Result<()> + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, event: &Event) -> crate::Result<()> {
        (self.0)(event)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for EventHandler {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventHandler({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

pub type SurfaceResult<T> = std::result::Result<T, SurfaceError>;

/// The mutable document tree the reconciler drives.
///
/// Spans are live: when nodes are inserted or removed, every span whose
/// boundary sits in the affected child list is shifted so it keeps naming
/// the same region, the way DOM ranges behave.
pub trait Surface {
    fn create_element(&mut self, tag: &str) -> SurfaceResult<NodeId>;

    fn create_text(&mut self, content: &str) -> SurfaceResult<NodeId>;

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> SurfaceResult<()>;

    fn remove_attribute(&mut self, node: NodeId, name: &str) -> SurfaceResult<()>;

    fn add_event_listener(
        &mut self,
        node: NodeId,
        event: &str,
        handler: EventHandler,
    ) -> SurfaceResult<()>;

    /// Span covering every current child of `parent`
    fn span_over_children(&mut self, parent: NodeId) -> SurfaceResult<SpanId>;

    /// Zero-width span positioned after the last child of `parent`
    fn span_at_end(&mut self, parent: NodeId) -> SurfaceResult<SpanId>;

    /// Zero-width span positioned at the end boundary of `span`
    fn span_after(&mut self, span: SpanId) -> SurfaceResult<SpanId>;

    /// Insert `node` at the start boundary of `span`; the span grows to include it
    fn insert_at_start(&mut self, span: SpanId, node: NodeId) -> SurfaceResult<()>;

    /// Move the start boundary of `span` to just after `node`
    fn set_start_after(&mut self, span: SpanId, node: NodeId) -> SurfaceResult<()>;

    /// Remove every node inside `span`, collapsing it to its start
    fn clear(&mut self, span: SpanId) -> SurfaceResult<()>;

    /// Re-anchor `span` so it encloses exactly `node`
    fn surround(&mut self, span: SpanId, node: NodeId) -> SurfaceResult<()>;

    /// The single node `span` encloses, if it encloses exactly one
    fn surrounded_node(&self, span: SpanId) -> Option<NodeId>;

    /// Forget a span that no virtual node refers to any more
    fn release_span(&mut self, span: SpanId);

    /// Dispose of a node that was created but never attached, with its
    /// subtree. Attached nodes are left in place.
    fn discard(&mut self, node: NodeId);
}

/// Shared reference to the surface a component tree is mounted on
pub type SharedSurface = Rc<RefCell<dyn Surface>>;

/// Overwrite the contents of `span` with `node`.
///
/// The node goes in before the old content is removed so neighbouring spans
/// that share a boundary with this one keep their position.
pub(crate) fn replace_contents(
    surface: &mut dyn Surface,
    span: SpanId,
    node: NodeId,
) -> SurfaceResult<()> {
    surface.insert_at_start(span, node)?;
    surface.set_start_after(span, node)?;
    surface.clear(span)?;
    surface.surround(span, node)
}
