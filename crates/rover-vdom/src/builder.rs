use crate::component::{Component, ComponentHandle};
use crate::node::{ElementWrapper, Node, TextWrapper};
use crate::vnode::Props;
use smartstring::alias::String as SmartString;
use std::fmt;

/// What [`build`] instantiates
#[derive(Clone)]
pub enum Kind {
    Tag(SmartString),
    Component(fn() -> Box<dyn Component>),
}

impl Kind {
    /// A component type constructed with no arguments
    pub fn component<C: Component + Default>() -> Self {
        Kind::Component(|| Box::new(C::default()) as Box<dyn Component>)
    }
}

impl fmt::Debug for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Tag(tag) => write!(f, "Tag({:?})", tag.as_str()),
            Kind::Component(_) => f.write_str("Component"),
        }
    }
}

impl From<&str> for Kind {
    fn from(tag: &str) -> Self {
        Kind::Tag(tag.into())
    }
}

impl From<String> for Kind {
    fn from(tag: String) -> Self {
        Kind::Tag(tag.into())
    }
}

/// A child argument as written at the call site
#[derive(Debug, Clone)]
pub enum Child {
    /// Skipped, for conditional rendering
    Null,
    Text(String),
    /// Flattened in place
    List(Vec<Child>),
    Node(Node),
}

impl From<&str> for Child {
    fn from(text: &str) -> Self {
        Child::Text(text.to_string())
    }
}

impl From<String> for Child {
    fn from(text: String) -> Self {
        Child::Text(text)
    }
}

impl From<&String> for Child {
    fn from(text: &String) -> Self {
        Child::Text(text.clone())
    }
}

impl From<Node> for Child {
    fn from(node: Node) -> Self {
        Child::Node(node)
    }
}

impl From<ComponentHandle> for Child {
    fn from(handle: ComponentHandle) -> Self {
        Child::Node(Node::Component(handle))
    }
}

impl From<ElementWrapper> for Child {
    fn from(element: ElementWrapper) -> Self {
        Child::Node(Node::Element(element))
    }
}

impl<T: Into<Child>> From<Vec<T>> for Child {
    fn from(children: Vec<T>) -> Self {
        Child::List(children.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Child>> From<Option<T>> for Child {
    fn from(child: Option<T>) -> Self {
        child.map_or(Child::Null, Into::into)
    }
}

/// Build a node from a tag or component kind, its attributes and children.
///
/// Strings become text nodes, [`Child::Null`] is skipped and nested lists are
/// flattened depth-first. Nothing is materialized yet.
pub fn build(
    kind: impl Into<Kind>,
    attributes: impl Into<Option<Props>>,
    children: Vec<Child>,
) -> Node {
    let props = attributes.into().unwrap_or_default();

    let mut nodes = Vec::with_capacity(children.len());
    flatten_children(children, &mut nodes);

    match kind.into() {
        Kind::Tag(tag) => Node::Element(ElementWrapper {
            tag,
            props,
            children: nodes,
        }),
        Kind::Component(factory) => {
            Node::Component(ComponentHandle::from_parts(factory(), props, nodes))
        }
    }
}

fn flatten_children(children: Vec<Child>, out: &mut Vec<Node>) {
    for child in children {
        match child {
            Child::Null => {}
            Child::Text(text) => out.push(Node::Text(TextWrapper::new(text))),
            Child::List(nested) => flatten_children(nested, out),
            Child::Node(child) => out.push(child),
        }
    }
}

/// Convert each argument into a [`Child`]
#[macro_export]
macro_rules! children {
    () => {
        ::std::vec::Vec::<$crate::Child>::new()
    };
    ($($child:expr),+ $(,)?) => {
        ::std::vec![$($crate::Child::from($child)),+]
    };
}
