//! Element types stored in an [`LGraph`](super::LGraph).

use super::{EdgeId, LGraph, NodeId, PortId};

/// Side of a node boundary a port sits on.
///
/// The declaration order is the clockwise order used to group a node's ports, starting at
/// `North`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PortSide {
    North,
    East,
    South,
    West,
}

impl PortSide {
    pub const ALL: [PortSide; 4] = [
        PortSide::North,
        PortSide::East,
        PortSide::South,
        PortSide::West,
    ];

    pub fn opposed(self) -> Self {
        match self {
            PortSide::North => PortSide::South,
            PortSide::East => PortSide::West,
            PortSide::South => PortSide::North,
            PortSide::West => PortSide::East,
        }
    }

    /// `true` for sides whose clockwise order runs against the reading direction
    /// (south ports east-to-west, west ports bottom-to-top).
    pub fn is_counter_reading(self) -> bool {
        matches!(self, PortSide::South | PortSide::West)
    }

    pub fn is_east_west(self) -> bool {
        matches!(self, PortSide::East | PortSide::West)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeKind {
    #[default]
    Normal,
    /// Per-layer dummy of an edge spanning several layers.
    LongEdge,
    /// Stand-in for an edge leaving a north or south port; connected to its origin node by a
    /// same-layer edge.
    NorthSouthPort,
    /// Boundary dummy inside a nested graph, representing a hierarchical port of the parent.
    ExternalPort,
}

#[derive(Debug, Clone)]
pub struct LPort {
    pub id: PortId,
    pub node: NodeId,
    pub side: PortSide,
    pub incoming: Vec<EdgeId>,
    pub outgoing: Vec<EdgeId>,
    /// Boundary dummy in the owning node's nested graph.
    pub dummy: Option<NodeId>,
    /// The port continues into the owning node's nested graph.
    pub inside_connections: bool,
}

impl LPort {
    pub fn connected_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.incoming.iter().chain(self.outgoing.iter()).copied()
    }
}

#[derive(Debug, Clone, Default)]
pub struct LNode {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    pub layer: Option<usize>,
    /// Ports in clockwise order: north west-to-east, east top-to-bottom, south east-to-west,
    /// west bottom-to-top.
    pub ports: Vec<PortId>,
    /// Fixed-order constraint: port order must not be changed.
    pub port_order_fixed: bool,
    pub nested: Option<Box<LGraph>>,
}

impl LNode {
    pub fn is_compound(&self) -> bool {
        self.nested.is_some()
    }

    pub fn nested(&self) -> Option<&LGraph> {
        self.nested.as_deref()
    }
}

#[derive(Debug, Clone)]
pub struct LEdge {
    pub id: EdgeId,
    pub source: PortId,
    pub target: PortId,
}

impl LEdge {
    /// The endpoint opposite to `port`.
    pub fn other(&self, port: PortId) -> PortId {
        if self.source == port {
            self.target
        } else {
            self.source
        }
    }
}
