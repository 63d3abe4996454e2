use crate::component::ComponentHandle;
use crate::config::Config;
use crate::error::{Result, VdomError};
use crate::reconcile;
use crate::surface::{SharedSurface, SpanId};
use crate::vnode::{PropValue, Props, VNode};
use smartstring::alias::String as SmartString;
use tracing::debug;

/// Element built from a tag name
#[derive(Debug, Clone)]
pub struct ElementWrapper {
    pub tag: SmartString,
    pub props: Props,
    pub children: Vec<Node>,
}

impl ElementWrapper {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.into(),
            props: Props::new(),
            children: Vec::new(),
        }
    }

    pub fn snapshot(&self) -> Result<VNode> {
        let children = self
            .children
            .iter()
            .map(Node::snapshot)
            .collect::<Result<Vec<_>>>()?;
        Ok(VNode::Element {
            tag: self.tag.clone(),
            props: self.props.clone(),
            children,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextWrapper {
    pub content: String,
}

impl TextWrapper {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn snapshot(&self) -> VNode {
        VNode::text(self.content.clone())
    }
}

/// A node of the live tree produced by the builder
#[derive(Debug, Clone)]
pub enum Node {
    Element(ElementWrapper),
    Text(TextWrapper),
    Component(ComponentHandle),
}

impl Node {
    pub fn element(tag: &str) -> Self {
        Node::Element(ElementWrapper::new(tag))
    }

    pub fn text(content: impl Into<String>) -> Self {
        Node::Text(TextWrapper::new(content))
    }

    /// Fails only for a component that is currently rendering
    pub fn set_attribute(&mut self, name: &str, value: impl Into<PropValue>) -> Result<()> {
        match self {
            Node::Element(element) => element.props.insert(name, value),
            Node::Component(handle) => handle.set_attribute(name, value)?,
            Node::Text(_) => debug!("Ignoring attribute {:?} on a text node", name),
        }
        Ok(())
    }

    pub fn append_child(&mut self, child: Node) -> Result<()> {
        match self {
            Node::Element(element) => element.children.push(child),
            Node::Component(handle) => handle.append_child(child)?,
            Node::Text(_) => debug!("Ignoring child appended to a text node"),
        }
        Ok(())
    }

    /// Structural reading of the whole subtree, rendering components on the way
    pub fn snapshot(&self) -> Result<VNode> {
        match self {
            Node::Element(element) => element.snapshot(),
            Node::Text(text) => Ok(text.snapshot()),
            Node::Component(handle) => handle.snapshot(),
        }
    }

    pub fn as_component(&self) -> Option<&ComponentHandle> {
        match self {
            Node::Component(handle) => Some(handle),
            _ => None,
        }
    }

    /// First materialization into `span`.
    ///
    /// Components keep what they need for later updates. Plain elements and
    /// text have no lifecycle, so their span bookkeeping is dropped.
    pub(crate) fn mount(&self, surface: SharedSurface, span: SpanId, config: Config) -> Result<()> {
        match self {
            Node::Component(handle) => handle.mount(surface, span, config),
            Node::Element(_) | Node::Text(_) => {
                let snapshot = self.snapshot()?;
                let mut surface = surface
                    .try_borrow_mut()
                    .map_err(|_| VdomError::ReentrantUpdate)?;
                let spans = reconcile::materialize(&mut *surface, &snapshot, span)?;
                for child in &spans.children {
                    reconcile::release_tree(&mut *surface, child);
                }
                Ok(())
            }
        }
    }
}

impl From<ElementWrapper> for Node {
    fn from(element: ElementWrapper) -> Self {
        Node::Element(element)
    }
}

impl From<TextWrapper> for Node {
    fn from(text: TextWrapper) -> Self {
        Node::Text(text)
    }
}

impl From<ComponentHandle> for Node {
    fn from(handle: ComponentHandle) -> Self {
        Node::Component(handle)
    }
}
