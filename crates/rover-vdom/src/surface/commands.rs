use super::NodeId;

/// Mutation recorded by [`MemorySurface`](super::MemorySurface).
///
/// Span bookkeeping is not a mutation and is never recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceOp {
    CreateElement {
        node: NodeId,
        tag: String,
    },
    CreateText {
        node: NodeId,
        content: String,
    },
    SetAttribute {
        node: NodeId,
        name: String,
        value: String,
    },
    RemoveAttribute {
        node: NodeId,
        name: String,
    },
    AddListener {
        node: NodeId,
        event: String,
    },
    InsertChild {
        parent: NodeId,
        index: usize,
        child: NodeId,
    },
    RemoveChild {
        parent: NodeId,
        index: usize,
        child: NodeId,
    },
}

impl SurfaceOp {
    /// True for operations that change what is attached to the document
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            SurfaceOp::InsertChild { .. } | SurfaceOp::RemoveChild { .. }
        )
    }
}
