mod value;

pub use value::{PropValue, Props};

use smartstring::alias::String as SmartString;

/// Node type reported by text nodes
pub const TEXT_NODE_TYPE: &str = "#text";

/// Immutable snapshot of a rendered tree.
///
/// A snapshot never aliases the live nodes it was read from; rendering again
/// produces a new value.
#[derive(Debug, Clone, PartialEq)]
pub enum VNode {
    Element {
        tag: SmartString,
        props: Props,
        children: Vec<VNode>,
    },
    Text {
        content: String,
    },
}

impl VNode {
    pub fn element(tag: &str, props: Props, children: Vec<VNode>) -> Self {
        VNode::Element {
            tag: tag.into(),
            props,
            children,
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        VNode::Text {
            content: content.into(),
        }
    }

    /// Tag name, or [`TEXT_NODE_TYPE`] for text
    pub fn node_type(&self) -> &str {
        match self {
            VNode::Element { tag, .. } => tag.as_str(),
            VNode::Text { .. } => TEXT_NODE_TYPE,
        }
    }

    pub fn props(&self) -> Option<&Props> {
        match self {
            VNode::Element { props, .. } => Some(props),
            VNode::Text { .. } => None,
        }
    }

    pub fn children(&self) -> &[VNode] {
        match self {
            VNode::Element { children, .. } => children.as_slice(),
            VNode::Text { .. } => &[],
        }
    }

    pub fn content(&self) -> Option<&str> {
        match self {
            VNode::Text { content } => Some(content.as_str()),
            VNode::Element { .. } => None,
        }
    }

    /// Nodes in this subtree, including itself
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(VNode::node_count).sum::<usize>()
    }
}
