//! Layered graph model used by `narwhal`.
//!
//! An [`LGraph`] is an arena of nodes, ports and edges plus an ordered list of layers. Ports are
//! grouped by [`PortSide`] around their node in clockwise order, and a node may own a nested
//! [`LGraph`] (compound node) whose first and last layers hold the boundary dummies of its
//! hierarchical ports.

mod error;
mod graph;

pub mod components;

pub use error::GraphError;
pub use graph::{
    EdgeId, EdgeSpan, LEdge, LGraph, LNode, LPort, NodeId, NodeKind, PortId, PortSide,
};
