//! Virtual node tree with a component model and in-place reconciliation.
//!
//! Trees are built with [`build`], mounted onto a [`Surface`] with [`mount`]
//! and re-rendered by [`ComponentHandle::set_state`]. [`MemorySurface`] is an
//! in-process surface that records every mutation it receives.

pub mod builder;
pub mod component;
pub mod config;
pub mod error;
pub mod mount;
pub mod node;
pub mod reconcile;
pub mod surface;
pub mod vnode;

pub use builder::{build, Child, Kind};
pub use component::{Component, ComponentHandle, ComponentLink, Scope};
pub use config::Config;
pub use error::{Result, SurfaceError, VdomError};
pub use mount::{mount, mount_with_config};
pub use node::{ElementWrapper, Node, TextWrapper};
pub use reconcile::{materialize, reconcile, same_node, SpanTree};
pub use surface::{
    dispatch_event, Event, EventHandler, MemorySurface, NodeId, SharedSurface, SpanId, Surface,
    SurfaceOp,
};
pub use vnode::{PropValue, Props, VNode, TEXT_NODE_TYPE};
