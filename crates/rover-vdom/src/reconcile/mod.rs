//! Snapshot diffing and in-place patching.
//!
//! The reconciler never needs a handle to a node's parent. Every virtual node
//! remembers the span it was materialized into, and replacing a subtree means
//! overwriting that span.
//!
//! Two gaps are kept deliberately and covered by tests:
//! - [`same_node`] only checks the new node's props against the old ones, so
//!   a prop that disappears while the count stays equal goes unnoticed.
//! - Children that disappear between renders are never removed from the
//!   surface.
//!
//! A failed pass leaves the previous span tree usable: spans are only
//! released once a pass succeeds, and nodes built for a subtree that never
//! got attached are discarded.

mod attributes;

pub(crate) use attributes::apply_prop;
pub use attributes::{event_name, surface_attribute_name};

use crate::error::{Result, SurfaceError};
use crate::surface::{replace_contents, NodeId, SpanId, Surface};
use crate::vnode::{PropValue, Props, VNode};
use tracing::trace;

/// Spans a mounted snapshot occupies, mirroring the snapshot's shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanTree {
    pub span: SpanId,
    pub children: Vec<SpanTree>,
}

impl SpanTree {
    pub fn leaf(span: SpanId) -> Self {
        Self {
            span,
            children: Vec::new(),
        }
    }
}

/// Release `tree` and every span below it
pub(crate) fn release_tree(surface: &mut dyn Surface, tree: &SpanTree) {
    let mut stack = vec![tree];
    while let Some(tree) = stack.pop() {
        surface.release_span(tree.span);
        stack.extend(tree.children.iter());
    }
}

/// Whether `new` can reuse the surface node materialized for `old`
pub fn same_node(old: &VNode, new: &VNode) -> bool {
    if old.node_type() != new.node_type() {
        return false;
    }
    match (old, new) {
        (VNode::Element { props: old_props, .. }, VNode::Element { props: new_props, .. }) => {
            // A prop missing from `old` reads as null.
            for (name, value) in new_props {
                if old_props.get(name).unwrap_or(&PropValue::Null) != value {
                    return false;
                }
            }
            old_props.len() <= new_props.len()
        }
        (VNode::Text { content: old }, VNode::Text { content: new }) => old == new,
        _ => false,
    }
}

/// Span bookkeeping for one materialize or reconcile pass.
///
/// Spans belonging to discarded virtual nodes are released only when the
/// pass succeeds, so the previous `SpanTree` stays valid after a failure.
/// A failed pass releases the spans it allocated instead.
struct Pass<'s> {
    surface: &'s mut dyn Surface,
    created: Vec<SpanId>,
    dropped: Vec<SpanId>,
}

impl<'s> Pass<'s> {
    fn new(surface: &'s mut dyn Surface) -> Self {
        Self {
            surface,
            created: Vec::new(),
            dropped: Vec::new(),
        }
    }

    fn span_at_end(&mut self, parent: NodeId) -> Result<SpanId> {
        let span = self.surface.span_at_end(parent)?;
        self.created.push(span);
        Ok(span)
    }

    fn span_after(&mut self, previous: SpanId) -> Result<SpanId> {
        let span = self.surface.span_after(previous)?;
        self.created.push(span);
        Ok(span)
    }

    fn drop_tree(&mut self, tree: &SpanTree) {
        let mut stack = vec![tree];
        while let Some(tree) = stack.pop() {
            self.dropped.push(tree.span);
            stack.extend(tree.children.iter());
        }
    }

    fn drop_children(&mut self, tree: &SpanTree) {
        for child in &tree.children {
            self.drop_tree(child);
        }
    }

    fn finish<T>(self, result: Result<T>) -> Result<T> {
        let stale = if result.is_ok() {
            self.dropped
        } else {
            self.created
        };
        for span in stale {
            self.surface.release_span(span);
        }
        result
    }
}

/// Write `vnode` into `span`, creating fresh surface nodes for the whole subtree
pub fn materialize(surface: &mut dyn Surface, vnode: &VNode, span: SpanId) -> Result<SpanTree> {
    let mut pass = Pass::new(surface);
    let result = materialize_node(&mut pass, vnode, span);
    pass.finish(result)
}

/// Materialize `new` over whatever `old_spans` covers, without diffing
pub(crate) fn rebuild(
    surface: &mut dyn Surface,
    old_spans: &SpanTree,
    new: &VNode,
) -> Result<SpanTree> {
    let mut pass = Pass::new(surface);
    let result = materialize_node(&mut pass, new, old_spans.span);
    if result.is_ok() {
        pass.drop_children(old_spans);
    }
    pass.finish(result)
}

fn materialize_node(pass: &mut Pass<'_>, vnode: &VNode, span: SpanId) -> Result<SpanTree> {
    let (node, result) = match vnode {
        VNode::Text { content } => {
            let node = pass.surface.create_text(content)?;
            (node, Ok(Vec::new()))
        }
        VNode::Element {
            tag,
            props,
            children,
        } => {
            let node = pass.surface.create_element(tag)?;
            (node, fill_element(pass, node, props, children))
        }
    };

    let result = result.and_then(|children| {
        replace_contents(pass.surface, span, node)?;
        Ok(children)
    });
    match result {
        Ok(children) => Ok(SpanTree { span, children }),
        Err(err) => {
            pass.surface.discard(node);
            Err(err)
        }
    }
}

fn fill_element(
    pass: &mut Pass<'_>,
    node: NodeId,
    props: &Props,
    children: &[VNode],
) -> Result<Vec<SpanTree>> {
    for (name, value) in props {
        apply_prop(pass.surface, node, name, value)?;
    }

    let mut child_spans = Vec::with_capacity(children.len());
    for child in children {
        let child_span = pass.span_at_end(node)?;
        child_spans.push(materialize_node(pass, child, child_span)?);
    }
    Ok(child_spans)
}

/// Patch the surface from `old` (mounted at `old_spans`) to `new`.
///
/// Returns the spans `new` now occupies, to be kept for the next cycle. On
/// error `old_spans` still names live spans, though the surface may hold a
/// partial patch.
pub fn reconcile(
    surface: &mut dyn Surface,
    old: &VNode,
    old_spans: &SpanTree,
    new: &VNode,
) -> Result<SpanTree> {
    let mut pass = Pass::new(surface);
    let result = reconcile_node(&mut pass, old, old_spans, new);
    pass.finish(result)
}

fn reconcile_node(
    pass: &mut Pass<'_>,
    old: &VNode,
    old_spans: &SpanTree,
    new: &VNode,
) -> Result<SpanTree> {
    let span = old_spans.span;

    if !same_node(old, new) {
        trace!(
            "Replacing <{}> with <{}> in span {:?}",
            old.node_type(),
            new.node_type(),
            span
        );
        let tree = materialize_node(pass, new, span)?;
        pass.drop_children(old_spans);
        return Ok(tree);
    }

    let new_children = new.children();
    if new_children.is_empty() {
        pass.drop_children(old_spans);
        return Ok(SpanTree::leaf(span));
    }

    let old_children = old.children();
    let mut tail = old_spans.children.last().map(|child| child.span);
    let mut child_spans = Vec::with_capacity(new_children.len());

    for (index, new_child) in new_children.iter().enumerate() {
        if let (Some(old_child), Some(old_child_spans)) =
            (old_children.get(index), old_spans.children.get(index))
        {
            child_spans.push(reconcile_node(pass, old_child, old_child_spans, new_child)?);
            continue;
        }

        let child_span = match tail {
            Some(previous) => pass.span_after(previous)?,
            None => {
                let host = pass
                    .surface
                    .surrounded_node(span)
                    .ok_or(SurfaceError::UnknownSpan(span))?;
                pass.span_at_end(host)?
            }
        };
        trace!("Appending child {} into span {:?}", index, child_span);
        child_spans.push(materialize_node(pass, new_child, child_span)?);
        tail = Some(child_span);
    }

    for stale in old_spans.children.iter().skip(new_children.len()) {
        pass.drop_tree(stale);
    }

    Ok(SpanTree {
        span,
        children: child_spans,
    })
}
