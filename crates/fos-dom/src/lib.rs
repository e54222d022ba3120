//! fOS DOM - Document Object Model
//!
//! Arena-backed DOM tree with an id index, simple selector queries,
//! focus tracking and a deferred task queue for event-loop turns.

mod attributes;
mod document;
mod dom_events;
mod node;
mod selector;
mod task_queue;
mod tree;

pub use attributes::{Attr, NamedNodeMap};
pub use document::Document;
pub use dom_events::{DomEvent, EventType, Key, Modifiers};
pub use node::{ElementData, Node, NodeData};
pub use selector::Selector;
pub use task_queue::TaskQueue;
pub use tree::{Children, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check that this is not the sentinel
    #[inline]
    pub fn is_valid(&self) -> bool {
        *self != Self::NONE
    }

    /// Arena index
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("Node not found: {0:?}")]
    NotFound(NodeId),

    #[error("Node is not an element: {0:?}")]
    NotAnElement(NodeId),

    #[error("Hierarchy request error")]
    HierarchyRequest,

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
}
