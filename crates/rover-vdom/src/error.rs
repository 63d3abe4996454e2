use crate::surface::{NodeId, SpanId};
use thiserror::Error;

/// Errors raised by a [`Surface`](crate::surface::Surface) implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("Unknown surface node {0:?}")]
    UnknownNode(NodeId),

    #[error("Unknown span {0:?}")]
    UnknownSpan(SpanId),

    #[error("Invalid tag name: {0:?}")]
    InvalidTagName(String),

    #[error("Child index {index} is out of range for {parent:?}")]
    ChildOutOfRange { parent: NodeId, index: usize },

    #[error("Surface node {0:?} is not an element")]
    NotAnElement(NodeId),

    #[error("Node {node:?} is not a child of the container of span {span:?}")]
    DetachedSpan { span: SpanId, node: NodeId },
}

#[derive(Error, Debug)]
pub enum VdomError {
    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),

    #[error("set_state called on a component that was never mounted")]
    StateUpdateBeforeMount,

    #[error("Component was dropped before the update ran")]
    ComponentDropped,

    #[error("Component re-rendered while it was already rendering")]
    ReentrantUpdate,

    #[error("Invalid attribute {name:?}: event handlers must be bound to on* attributes")]
    InvalidAttribute { name: String },

    #[error("State patch nests deeper than {limit} levels")]
    StateTooDeep { limit: usize },
}

pub type Result<T> = std::result::Result<T, VdomError>;
