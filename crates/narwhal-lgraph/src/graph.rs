//! The layered graph container.
//!
//! Nodes, ports and edges live in arenas addressed by [`NodeId`], [`PortId`] and [`EdgeId`].
//! Layers hold node ids in top-to-bottom order; a node's port list is kept grouped by side in
//! clockwise order so that each side is a contiguous sub-slice.

use std::ops::Range;

mod entries;
mod ids;
mod validate;

pub use entries::{LEdge, LNode, LPort, NodeKind, PortSide};
pub use ids::{EdgeId, NodeId, PortId};

/// Placement of an edge relative to the layering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeSpan {
    /// An EAST port in layer `l` connected to a WEST port in layer `l + 1`.
    Between { left: PortId, right: PortId },
    /// Both ends are ports on `side` (EAST or WEST) of nodes in the same layer.
    SameLayer { side: PortSide },
    /// A north/south port of an origin node connected to a north/south dummy of the same layer.
    NorthSouth { origin_port: PortId, dummy: NodeId },
    Invalid,
}

#[derive(Debug, Clone, Default)]
pub struct LGraph {
    nodes: Vec<LNode>,
    ports: Vec<LPort>,
    edges: Vec<LEdge>,
    layers: Vec<Vec<NodeId>>,
}

impl LGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_layer(&mut self) -> usize {
        self.layers.push(Vec::new());
        self.layers.len() - 1
    }

    pub fn ensure_layers(&mut self, count: usize) {
        while self.layers.len() < count {
            self.layers.push(Vec::new());
        }
    }

    pub fn add_node(&mut self, layer: usize, name: impl Into<String>) -> NodeId {
        self.add_node_of_kind(layer, name, NodeKind::Normal)
    }

    /// Appends a node at the bottom of `layer`, creating missing layers on the way.
    pub fn add_node_of_kind(
        &mut self,
        layer: usize,
        name: impl Into<String>,
        kind: NodeKind,
    ) -> NodeId {
        self.ensure_layers(layer + 1);
        let id = NodeId(self.nodes.len());
        self.nodes.push(LNode {
            id,
            name: name.into(),
            kind,
            layer: Some(layer),
            ..Default::default()
        });
        self.layers[layer].push(id);
        id
    }

    /// Appends a port to `side` of `node`, after the ports already on that side in clockwise
    /// order.
    pub fn add_port(&mut self, node: NodeId, side: PortSide) -> PortId {
        let id = PortId(self.ports.len());
        self.ports.push(LPort {
            id,
            node,
            side,
            incoming: Vec::new(),
            outgoing: Vec::new(),
            dummy: None,
            inside_connections: false,
        });
        let at = self.nodes[node.0]
            .ports
            .partition_point(|p| self.ports[p.0].side <= side);
        self.nodes[node.0].ports.insert(at, id);
        id
    }

    pub fn add_edge(&mut self, source: PortId, target: PortId) -> EdgeId {
        let id = EdgeId(self.edges.len());
        self.edges.push(LEdge { id, source, target });
        self.ports[source.0].outgoing.push(id);
        self.ports[target.0].incoming.push(id);
        id
    }

    pub fn set_nested(&mut self, node: NodeId, nested: LGraph) {
        self.nodes[node.0].nested = Some(Box::new(nested));
    }

    pub fn take_nested(&mut self, node: NodeId) -> Option<LGraph> {
        self.nodes[node.0].nested.take().map(|g| *g)
    }

    /// Marks `port` as hierarchical, continuing into the nested graph through `dummy`.
    pub fn set_port_dummy(&mut self, port: PortId, dummy: NodeId) {
        let p = &mut self.ports[port.0];
        p.dummy = Some(dummy);
        p.inside_connections = true;
    }

    pub fn set_port_order_fixed(&mut self, node: NodeId, fixed: bool) {
        self.nodes[node.0].port_order_fixed = fixed;
    }

    /// Replaces the node order of `layer` with a permutation of it.
    pub fn set_layer_order(&mut self, layer: usize, order: Vec<NodeId>) {
        debug_assert_eq!(self.layers[layer].len(), order.len());
        self.layers[layer] = order;
    }

    /// Replaces the port list of `node` with a permutation that keeps sides grouped.
    pub fn set_port_order(&mut self, node: NodeId, ports: Vec<PortId>) {
        debug_assert_eq!(self.nodes[node.0].ports.len(), ports.len());
        self.nodes[node.0].ports = ports;
    }

    pub fn node(&self, id: NodeId) -> &LNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut LNode {
        &mut self.nodes[id.0]
    }

    pub fn port(&self, id: PortId) -> &LPort {
        &self.ports[id.0]
    }

    pub fn edge(&self, id: EdgeId) -> &LEdge {
        &self.edges[id.0]
    }

    pub fn nodes(&self) -> &[LNode] {
        &self.nodes
    }

    pub fn ports(&self) -> &[LPort] {
        &self.ports
    }

    pub fn edges(&self) -> &[LEdge] {
        &self.edges
    }

    pub fn layers(&self) -> &[Vec<NodeId>] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> &[NodeId] {
        &self.layers[index]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn port_count(&self) -> usize {
        self.ports.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Looks a node up by name. Linear; meant for tests and diagnostics.
    pub fn node_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().find(|n| n.name == name).map(|n| n.id)
    }

    /// Range of `ports` (a clockwise-grouped port list) that sits on `side`.
    pub fn side_range(&self, ports: &[PortId], side: PortSide) -> Range<usize> {
        let start = ports.partition_point(|p| self.ports[p.0].side < side);
        let end = ports.partition_point(|p| self.ports[p.0].side <= side);
        start..end
    }

    pub fn ports_on_side(&self, node: NodeId, side: PortSide) -> &[PortId] {
        let ports = &self.nodes[node.0].ports;
        &ports[self.side_range(ports, side)]
    }

    /// Ports on `side` in reading order: EAST/WEST top-to-bottom, NORTH/SOUTH west-to-east.
    pub fn ports_along(&self, node: NodeId, side: PortSide) -> Vec<PortId> {
        let mut ports = self.ports_on_side(node, side).to_vec();
        if side.is_counter_reading() {
            ports.reverse();
        }
        ports
    }

    pub fn other_end(&self, edge: EdgeId, port: PortId) -> PortId {
        self.edges[edge.0].other(port)
    }

    pub fn node_of(&self, port: PortId) -> NodeId {
        self.ports[port.0].node
    }

    pub fn layer_of_port(&self, port: PortId) -> Option<usize> {
        self.nodes[self.ports[port.0].node.0].layer
    }

    pub fn edge_span(&self, edge: EdgeId) -> EdgeSpan {
        let Some(e) = self.edges.get(edge.0) else {
            return EdgeSpan::Invalid;
        };
        let (Some(s), Some(t)) = (self.ports.get(e.source.0), self.ports.get(e.target.0)) else {
            return EdgeSpan::Invalid;
        };
        let (Some(ls), Some(lt)) = (
            self.nodes.get(s.node.0).and_then(|n| n.layer),
            self.nodes.get(t.node.0).and_then(|n| n.layer),
        ) else {
            return EdgeSpan::Invalid;
        };

        if ls + 1 == lt {
            return between(s, t);
        }
        if lt + 1 == ls {
            return between(t, s);
        }
        if ls != lt {
            return EdgeSpan::Invalid;
        }

        if s.side == t.side && s.side.is_east_west() {
            return EdgeSpan::SameLayer { side: s.side };
        }
        let s_dummy = self.nodes[s.node.0].kind == NodeKind::NorthSouthPort;
        let t_dummy = self.nodes[t.node.0].kind == NodeKind::NorthSouthPort;
        match (s_dummy, t_dummy) {
            (false, true) if !s.side.is_east_west() => EdgeSpan::NorthSouth {
                origin_port: s.id,
                dummy: t.node,
            },
            (true, false) if !t.side.is_east_west() => EdgeSpan::NorthSouth {
                origin_port: t.id,
                dummy: s.node,
            },
            _ => EdgeSpan::Invalid,
        }
    }

    /// The boundary dummy layer of `node`'s nested graph on `side` together with the nested layer
    /// right beside it. Only EAST and WEST have boundary layers.
    pub fn nested_boundary(&self, node: NodeId, side: PortSide) -> Option<(&[NodeId], &[NodeId])> {
        let nested = self.nodes[node.0].nested()?;
        let n = nested.layers.len();
        if n < 2 {
            return None;
        }
        match side {
            PortSide::West => Some((&nested.layers[0], &nested.layers[1])),
            PortSide::East => Some((&nested.layers[n - 1], &nested.layers[n - 2])),
            PortSide::North | PortSide::South => None,
        }
    }
}

fn between(left: &LPort, right: &LPort) -> EdgeSpan {
    if left.side == PortSide::East && right.side == PortSide::West {
        EdgeSpan::Between {
            left: left.id,
            right: right.id,
        }
    } else {
        EdgeSpan::Invalid
    }
}
