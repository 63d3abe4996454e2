use super::commands::SurfaceOp;
use super::{Event, EventHandler, NodeId, SpanId, Surface, SurfaceResult};
use crate::error::SurfaceError;
use smallvec::SmallVec;
use smartstring::alias::String as SmartString;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;
use std::rc::Rc;

enum MemoryNode {
    Element {
        tag: SmartString,
        attributes: BTreeMap<SmartString, String>,
        listeners: HashMap<SmartString, SmallVec<[EventHandler; 2]>>,
        children: Vec<NodeId>,
    },
    Text {
        content: String,
    },
}

struct Slot {
    node: MemoryNode,
    parent: Option<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Boundary {
    container: NodeId,
    offset: usize,
}

#[derive(Debug, Clone, Copy)]
struct SpanRange {
    start: Boundary,
    end: Boundary,
}

/// Arena-backed document used by tests and by hosts without a real DOM.
///
/// Every mutation is appended to an operation log so callers can assert on
/// exactly what a render or an update touched.
pub struct MemorySurface {
    nodes: Vec<Option<Slot>>,
    free_list: Vec<u32>,
    spans: Vec<Option<SpanRange>>,
    span_free_list: Vec<u32>,
    root: NodeId,
    ops: Vec<SurfaceOp>,
}

impl MemorySurface {
    /// Create a surface with an empty `body` element as its root
    pub fn new() -> Self {
        let root = Slot {
            node: MemoryNode::Element {
                tag: "body".into(),
                attributes: BTreeMap::new(),
                listeners: HashMap::new(),
                children: Vec::new(),
            },
            parent: None,
        };
        Self {
            nodes: vec![Some(root)],
            free_list: Vec::new(),
            spans: Vec::new(),
            span_free_list: Vec::new(),
            root: NodeId(0),
            ops: Vec::new(),
        }
    }

    /// Wrap in the shared handle components expect
    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<SurfaceOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    /// Number of live nodes, attached or not, including the root
    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn span_count(&self) -> usize {
        self.spans.iter().filter(|s| s.is_some()).count()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.slot(node).is_ok()
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.slot(node).ok()?.node {
            MemoryNode::Element { tag, .. } => Some(tag.as_str()),
            MemoryNode::Text { .. } => None,
        }
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        match &self.slot(node).ok()?.node {
            MemoryNode::Text { content } => Some(content.as_str()),
            MemoryNode::Element { .. } => None,
        }
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.slot(node).ok()?.node {
            MemoryNode::Element { attributes, .. } => attributes.get(name).map(|v| v.as_str()),
            MemoryNode::Text { .. } => None,
        }
    }

    pub fn attribute_names(&self, node: NodeId) -> Vec<&str> {
        match self.slot(node).map(|s| &s.node) {
            Ok(MemoryNode::Element { attributes, .. }) => {
                attributes.keys().map(|k| k.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }

    pub fn listener_count(&self, node: NodeId, event: &str) -> usize {
        match self.slot(node).map(|s| &s.node) {
            Ok(MemoryNode::Element { listeners, .. }) => {
                listeners.get(event).map_or(0, |l| l.len())
            }
            _ => 0,
        }
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        match self.slot(node).map(|s| &s.node) {
            Ok(MemoryNode::Element { children, .. }) => children.as_slice(),
            _ => &[],
        }
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.slot(node).ok()?.parent
    }

    /// Attached elements with the given tag, in document order
    pub fn find_all(&self, tag: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if self.tag(id) == Some(tag) {
                found.push(id);
            }
            stack.extend(self.children(id).iter().rev().copied());
        }
        found
    }

    pub fn find_first(&self, tag: &str) -> Option<NodeId> {
        self.find_all(tag).into_iter().next()
    }

    /// Serialize `node` and its subtree
    pub fn to_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_html(node, &mut out);
        out
    }

    /// Serialize the children of the root
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        for &child in self.children(self.root) {
            self.write_html(child, &mut out);
        }
        out
    }

    fn write_html(&self, node: NodeId, out: &mut String) {
        let Ok(slot) = self.slot(node) else {
            return;
        };
        match &slot.node {
            MemoryNode::Text { content } => escape_into(content, out),
            MemoryNode::Element {
                tag,
                attributes,
                children,
                ..
            } => {
                let _ = write!(out, "<{}", tag);
                for (name, value) in attributes {
                    let _ = write!(out, " {}=\"", name);
                    escape_into(value, out);
                    out.push('"');
                }
                out.push('>');
                for &child in children {
                    self.write_html(child, out);
                }
                let _ = write!(out, "</{}>", tag);
            }
        }
    }

    /// Listeners for `event` on `target` and its ancestors, innermost first
    pub fn listeners_for(&self, target: NodeId, event: &str) -> Vec<EventHandler> {
        let mut handlers = Vec::new();
        let mut current = Some(target);
        while let Some(id) = current {
            let Ok(slot) = self.slot(id) else {
                break;
            };
            if let MemoryNode::Element { listeners, .. } = &slot.node {
                if let Some(list) = listeners.get(event) {
                    handlers.extend(list.iter().cloned());
                }
            }
            current = slot.parent;
        }
        handlers
    }

    fn slot(&self, id: NodeId) -> SurfaceResult<&Slot> {
        self.nodes
            .get(id.0 as usize)
            .and_then(|s| s.as_ref())
            .ok_or(SurfaceError::UnknownNode(id))
    }

    fn slot_mut(&mut self, id: NodeId) -> SurfaceResult<&mut Slot> {
        self.nodes
            .get_mut(id.0 as usize)
            .and_then(|s| s.as_mut())
            .ok_or(SurfaceError::UnknownNode(id))
    }

    fn element_children_mut(&mut self, id: NodeId) -> SurfaceResult<&mut Vec<NodeId>> {
        match &mut self.slot_mut(id)?.node {
            MemoryNode::Element { children, .. } => Ok(children),
            MemoryNode::Text { .. } => Err(SurfaceError::NotAnElement(id)),
        }
    }

    fn child_len(&self, id: NodeId) -> SurfaceResult<usize> {
        match &self.slot(id)?.node {
            MemoryNode::Element { children, .. } => Ok(children.len()),
            MemoryNode::Text { .. } => Err(SurfaceError::NotAnElement(id)),
        }
    }

    fn alloc(&mut self, node: MemoryNode) -> NodeId {
        let slot = Slot { node, parent: None };
        if let Some(idx) = self.free_list.pop() {
            self.nodes[idx as usize] = Some(slot);
            NodeId(idx)
        } else {
            self.nodes.push(Some(slot));
            NodeId(self.nodes.len() as u32 - 1)
        }
    }

    fn alloc_span(&mut self, range: SpanRange) -> SpanId {
        if let Some(idx) = self.span_free_list.pop() {
            self.spans[idx as usize] = Some(range);
            SpanId(idx)
        } else {
            self.spans.push(Some(range));
            SpanId(self.spans.len() as u32 - 1)
        }
    }

    fn span(&self, id: SpanId) -> SurfaceResult<SpanRange> {
        self.spans
            .get(id.0 as usize)
            .and_then(|s| *s)
            .ok_or(SurfaceError::UnknownSpan(id))
    }

    fn span_mut(&mut self, id: SpanId) -> SurfaceResult<&mut SpanRange> {
        self.spans
            .get_mut(id.0 as usize)
            .and_then(|s| s.as_mut())
            .ok_or(SurfaceError::UnknownSpan(id))
    }

    fn position(&self, node: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.slot(node).ok()?.parent?;
        let index = self.children(parent).iter().position(|&c| c == node)?;
        Some((parent, index))
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    fn for_each_boundary(&mut self, mut f: impl FnMut(&mut Boundary)) {
        for range in self.spans.iter_mut().flatten() {
            f(&mut range.start);
            f(&mut range.end);
        }
    }

    fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) -> SurfaceResult<()> {
        let children = self.element_children_mut(parent)?;
        let index = index.min(children.len());
        children.insert(index, child);
        self.slot_mut(child)?.parent = Some(parent);
        self.for_each_boundary(|b| {
            if b.container == parent && b.offset > index {
                b.offset += 1;
            }
        });
        self.ops.push(SurfaceOp::InsertChild {
            parent,
            index,
            child,
        });
        Ok(())
    }

    fn remove_child(&mut self, parent: NodeId, index: usize) -> SurfaceResult<NodeId> {
        let children = self.element_children_mut(parent)?;
        if index >= children.len() {
            return Err(SurfaceError::ChildOutOfRange { parent, index });
        }
        let child = children.remove(index);

        // Boundaries inside the removed subtree collapse onto the removal point.
        let mut inside = Vec::new();
        for range in self.spans.iter().flatten() {
            for b in [range.start, range.end] {
                inside.push(self.is_inclusive_ancestor(child, b.container));
            }
        }
        let mut flags = inside.into_iter();
        self.for_each_boundary(|b| {
            if flags.next().unwrap_or(false) {
                *b = Boundary {
                    container: parent,
                    offset: index,
                };
            } else if b.container == parent && b.offset > index {
                b.offset -= 1;
            }
        });

        self.slot_mut(child)?.parent = None;
        self.ops.push(SurfaceOp::RemoveChild {
            parent,
            index,
            child,
        });
        Ok(child)
    }

    fn dispose_subtree(&mut self, root: NodeId) {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(slot) = self.nodes.get_mut(id.0 as usize).and_then(|s| s.take()) else {
                continue;
            };
            if let MemoryNode::Element { children, .. } = slot.node {
                stack.extend(children);
            }
            self.free_list.push(id.0);
        }
    }
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_into(raw: &str, out: &mut String) {
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

fn is_valid_tag(tag: &str) -> bool {
    let mut chars = tag.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
}

impl Surface for MemorySurface {
    fn create_element(&mut self, tag: &str) -> SurfaceResult<NodeId> {
        if !is_valid_tag(tag) {
            return Err(SurfaceError::InvalidTagName(tag.to_string()));
        }
        let node = self.alloc(MemoryNode::Element {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            listeners: HashMap::new(),
            children: Vec::new(),
        });
        self.ops.push(SurfaceOp::CreateElement {
            node,
            tag: tag.to_string(),
        });
        Ok(node)
    }

    fn create_text(&mut self, content: &str) -> SurfaceResult<NodeId> {
        let node = self.alloc(MemoryNode::Text {
            content: content.to_string(),
        });
        self.ops.push(SurfaceOp::CreateText {
            node,
            content: content.to_string(),
        });
        Ok(node)
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> SurfaceResult<()> {
        match &mut self.slot_mut(node)?.node {
            MemoryNode::Element { attributes, .. } => {
                attributes.insert(name.into(), value.to_string());
            }
            MemoryNode::Text { .. } => return Err(SurfaceError::NotAnElement(node)),
        }
        self.ops.push(SurfaceOp::SetAttribute {
            node,
            name: name.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) -> SurfaceResult<()> {
        let removed = match &mut self.slot_mut(node)?.node {
            MemoryNode::Element { attributes, .. } => attributes.remove(name).is_some(),
            MemoryNode::Text { .. } => return Err(SurfaceError::NotAnElement(node)),
        };
        if removed {
            self.ops.push(SurfaceOp::RemoveAttribute {
                node,
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn add_event_listener(
        &mut self,
        node: NodeId,
        event: &str,
        handler: EventHandler,
    ) -> SurfaceResult<()> {
        match &mut self.slot_mut(node)?.node {
            MemoryNode::Element { listeners, .. } => {
                listeners.entry(event.into()).or_default().push(handler);
            }
            MemoryNode::Text { .. } => return Err(SurfaceError::NotAnElement(node)),
        }
        self.ops.push(SurfaceOp::AddListener {
            node,
            event: event.to_string(),
        });
        Ok(())
    }

    fn span_over_children(&mut self, parent: NodeId) -> SurfaceResult<SpanId> {
        let len = self.child_len(parent)?;
        Ok(self.alloc_span(SpanRange {
            start: Boundary {
                container: parent,
                offset: 0,
            },
            end: Boundary {
                container: parent,
                offset: len,
            },
        }))
    }

    fn span_at_end(&mut self, parent: NodeId) -> SurfaceResult<SpanId> {
        let at = Boundary {
            container: parent,
            offset: self.child_len(parent)?,
        };
        Ok(self.alloc_span(SpanRange { start: at, end: at }))
    }

    fn span_after(&mut self, span: SpanId) -> SurfaceResult<SpanId> {
        let at = self.span(span)?.end;
        Ok(self.alloc_span(SpanRange { start: at, end: at }))
    }

    fn insert_at_start(&mut self, span: SpanId, node: NodeId) -> SurfaceResult<()> {
        let container = self.span(span)?.start.container;
        if self.is_inclusive_ancestor(node, container) {
            return Err(SurfaceError::DetachedSpan { span, node });
        }
        if let Some((old_parent, old_index)) = self.position(node) {
            self.remove_child(old_parent, old_index)?;
        }

        let range = self.span(span)?;
        let collapsed = range.start == range.end;
        self.insert_child(container, range.start.offset, node)?;
        if collapsed {
            self.span_mut(span)?.end.offset += 1;
        }
        Ok(())
    }

    fn set_start_after(&mut self, span: SpanId, node: NodeId) -> SurfaceResult<()> {
        let (parent, index) = self
            .position(node)
            .ok_or(SurfaceError::DetachedSpan { span, node })?;
        let range = self.span_mut(span)?;
        range.start = Boundary {
            container: parent,
            offset: index + 1,
        };
        if range.end.container == parent && range.end.offset < range.start.offset {
            range.end = range.start;
        }
        Ok(())
    }

    fn clear(&mut self, span: SpanId) -> SurfaceResult<()> {
        let range = self.span(span)?;
        let container = range.start.container;
        if range.end.container != container {
            return Err(SurfaceError::DetachedSpan {
                span,
                node: range.end.container,
            });
        }
        for index in (range.start.offset..range.end.offset).rev() {
            let removed = self.remove_child(container, index)?;
            self.dispose_subtree(removed);
        }
        Ok(())
    }

    fn surround(&mut self, span: SpanId, node: NodeId) -> SurfaceResult<()> {
        let (parent, index) = self
            .position(node)
            .ok_or(SurfaceError::DetachedSpan { span, node })?;
        let range = self.span_mut(span)?;
        range.start = Boundary {
            container: parent,
            offset: index,
        };
        range.end = Boundary {
            container: parent,
            offset: index + 1,
        };
        Ok(())
    }

    fn surrounded_node(&self, span: SpanId) -> Option<NodeId> {
        let range = self.span(span).ok()?;
        if range.start.container != range.end.container
            || range.end.offset != range.start.offset + 1
        {
            return None;
        }
        self.children(range.start.container)
            .get(range.start.offset)
            .copied()
    }

    fn release_span(&mut self, span: SpanId) {
        if let Some(slot) = self.spans.get_mut(span.0 as usize) {
            if slot.take().is_some() {
                self.span_free_list.push(span.0);
            }
        }
    }

    fn discard(&mut self, node: NodeId) {
        if node == self.root || self.parent(node).is_some() || !self.contains(node) {
            return;
        }
        self.dispose_subtree(node);
    }
}

/// Fire `event` at `target`, running listeners from the target up to the root.
///
/// The surface is not borrowed while handlers run, so a handler may trigger
/// a re-render that mutates it.
pub fn dispatch_event(
    surface: &Rc<RefCell<MemorySurface>>,
    target: NodeId,
    event: &str,
) -> crate::Result<()> {
    let handlers = surface.borrow().listeners_for(target, event);
    let event = Event {
        name: event.into(),
        target,
    };
    for handler in handlers {
        handler.call(&event)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element_with_children(surface: &mut MemorySurface, count: usize) -> NodeId {
        let parent = surface.create_element("ul").unwrap();
        for i in 0..count {
            let span = surface.span_at_end(parent).unwrap();
            let child = surface.create_text(&i.to_string()).unwrap();
            surface.insert_at_start(span, child).unwrap();
            surface.release_span(span);
        }
        parent
    }

    #[test]
    fn test_invalid_tag_rejected() {
        let mut surface = MemorySurface::new();
        assert_eq!(
            surface.create_element("").unwrap_err(),
            SurfaceError::InvalidTagName(String::new())
        );
        assert!(surface.create_element("my div").is_err());
        assert!(surface.create_element("x-widget").is_ok());
    }

    #[test]
    fn test_insert_into_collapsed_span_grows_it() {
        let mut surface = MemorySurface::new();
        let root = surface.root();
        let span = surface.span_at_end(root).unwrap();
        let node = surface.create_element("p").unwrap();

        surface.insert_at_start(span, node).unwrap();

        assert_eq!(surface.surrounded_node(span), Some(node));
        assert_eq!(surface.children(root), &[node]);
    }

    #[test]
    fn test_spans_shift_on_insert_before() {
        let mut surface = MemorySurface::new();
        let parent = element_with_children(&mut surface, 2);
        let second = surface.children(parent)[1];
        let tail = surface.span_at_end(parent).unwrap();
        let probe = surface.create_text("x").unwrap();
        surface.surround(tail, second).unwrap();

        // Insert at the front: the span around the second child must follow it.
        let front = surface.span_over_children(parent).unwrap();
        surface.insert_at_start(front, probe).unwrap();

        assert_eq!(surface.surrounded_node(tail), Some(second));
    }

    #[test]
    fn test_replace_keeps_neighbour_spans() {
        let mut surface = MemorySurface::new();
        let parent = element_with_children(&mut surface, 2);
        let [first, second] = [surface.children(parent)[0], surface.children(parent)[1]];

        let first_span = surface.span_over_children(parent).unwrap();
        surface.surround(first_span, first).unwrap();
        let second_span = surface.span_after(first_span).unwrap();
        surface.surround(second_span, second).unwrap();

        let replacement = surface.create_element("b").unwrap();
        super::super::replace_contents(&mut surface, first_span, replacement).unwrap();

        assert_eq!(surface.children(parent), &[replacement, second]);
        assert_eq!(surface.surrounded_node(first_span), Some(replacement));
        assert_eq!(surface.surrounded_node(second_span), Some(second));
        assert!(!surface.contains(first));
    }

    #[test]
    fn test_clear_disposes_subtree() {
        let mut surface = MemorySurface::new();
        let parent = element_with_children(&mut surface, 3);
        let root = surface.root();
        let span = surface.span_at_end(root).unwrap();
        surface.insert_at_start(span, parent).unwrap();
        let before = surface.node_count();

        surface.clear(span).unwrap();

        assert_eq!(surface.node_count(), before - 4);
        assert!(surface.children(root).is_empty());
        assert_eq!(surface.surrounded_node(span), None);
    }

    #[test]
    fn test_to_html_escapes() {
        let mut surface = MemorySurface::new();
        let root = surface.root();
        let a = surface.create_element("a").unwrap();
        surface.set_attribute(a, "title", "say \"hi\"").unwrap();
        let text = surface.create_text("1 < 2").unwrap();
        let inner = surface.span_at_end(a).unwrap();
        surface.insert_at_start(inner, text).unwrap();
        let outer = surface.span_at_end(root).unwrap();
        surface.insert_at_start(outer, a).unwrap();

        assert_eq!(
            surface.inner_html(),
            "<a title=\"say &quot;hi&quot;\">1 &lt; 2</a>"
        );
    }

    #[test]
    fn test_remove_attribute_only_logs_real_removal() {
        let mut surface = MemorySurface::new();
        let node = surface.create_element("div").unwrap();
        surface.clear_ops();

        surface.remove_attribute(node, "id").unwrap();
        assert!(surface.ops().is_empty());

        surface.set_attribute(node, "id", "x").unwrap();
        surface.remove_attribute(node, "id").unwrap();
        assert_eq!(surface.ops().len(), 2);
        assert_eq!(surface.attribute(node, "id"), None);
    }

    #[test]
    fn test_dispatch_bubbles_to_ancestors() {
        let surface = MemorySurface::shared();
        let hits = Rc::new(RefCell::new(Vec::new()));
        let (outer, inner) = {
            let mut s = surface.borrow_mut();
            let outer = s.create_element("div").unwrap();
            let inner = s.create_element("button").unwrap();
            let span = s.span_at_end(outer).unwrap();
            s.insert_at_start(span, inner).unwrap();
            for (node, label) in [(outer, "outer"), (inner, "inner")] {
                let hits = hits.clone();
                s.add_event_listener(
                    node,
                    "click",
                    EventHandler::new(move |_| {
                        hits.borrow_mut().push(label);
                        Ok(())
                    }),
                )
                .unwrap();
            }
            (outer, inner)
        };

        dispatch_event(&surface, inner, "click").unwrap();
        assert_eq!(*hits.borrow(), vec!["inner", "outer"]);

        dispatch_event(&surface, outer, "click").unwrap();
        assert_eq!(hits.borrow().len(), 3);
    }

    #[test]
    fn test_reinserting_attached_node_moves_it() {
        let mut surface = MemorySurface::new();
        let left = element_with_children(&mut surface, 1);
        let right = surface.create_element("ol").unwrap();
        let child = surface.children(left)[0];
        surface.set_attribute(right, "start", "2").unwrap();
        surface.set_attribute(right, "class", "r").unwrap();
        surface.clear_ops();

        let span = surface.span_at_end(right).unwrap();
        surface.insert_at_start(span, child).unwrap();

        assert_eq!(surface.parent(child), Some(right));
        assert!(surface.children(left).is_empty());
        assert_eq!(surface.to_html(right), "<ol class=\"r\" start=\"2\">0</ol>");
        assert_eq!(surface.attribute_names(right), vec!["class", "start"]);
        let structural: Vec<_> = surface.take_ops().into_iter().filter(SurfaceOp::is_structural).collect();
        assert_eq!(structural.len(), 2);
        assert!(surface.ops().is_empty());
    }

    #[test]
    fn test_inserting_into_own_subtree_fails() {
        let mut surface = MemorySurface::new();
        let parent = element_with_children(&mut surface, 0);
        let span = surface.span_at_end(parent).unwrap();
        assert_eq!(
            surface.insert_at_start(span, parent).unwrap_err(),
            SurfaceError::DetachedSpan { span, node: parent }
        );
    }

    #[test]
    fn test_remove_child_out_of_range() {
        let mut surface = MemorySurface::new();
        let parent = element_with_children(&mut surface, 1);
        assert_eq!(
            surface.remove_child(parent, 4).unwrap_err(),
            SurfaceError::ChildOutOfRange { parent, index: 4 }
        );
    }

    #[test]
    fn test_discard_only_detached_nodes() {
        let mut surface = MemorySurface::new();
        let root = surface.root();
        let before = surface.node_count();

        let detached = element_with_children(&mut surface, 2);
        surface.discard(detached);
        assert_eq!(surface.node_count(), before);

        let attached = element_with_children(&mut surface, 1);
        let span = surface.span_at_end(root).unwrap();
        surface.insert_at_start(span, attached).unwrap();
        surface.discard(attached);
        surface.discard(root);
        assert!(surface.contains(attached));
        assert_eq!(surface.children(root), &[attached]);
    }
}
