//! Mutable ordering state threaded through one crossing minimization run.
//!
//! The heuristics never mutate the [`LGraph`] directly. They work on a [`SweepState`] built by
//! [`SweepState::prepare`] and the controller writes the result back with [`SweepState::apply`].

use narwhal_lgraph::{EdgeId, EdgeSpan, LGraph, NodeId, PortId, PortSide};

/// Flat port position table, one slot per port of a graph.
///
/// A [`CrossingsCounter`](crate::counting::CrossingsCounter) numbers the ports of the two
/// sequences it is initialized for and keeps those entries current across switches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortPositions(Vec<u32>);

impl PortPositions {
    pub fn new(port_count: usize) -> Self {
        Self(vec![0; port_count])
    }

    pub fn get(&self, port: PortId) -> u32 {
        self.0[port.index()]
    }

    pub fn set(&mut self, port: PortId, position: u32) {
        self.0[port.index()] = position;
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Current port order of every node, indexed by [`NodeId`]. Each list stays grouped by side in
/// clockwise order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortOrder(Vec<Vec<PortId>>);

impl PortOrder {
    pub fn of_graph(graph: &LGraph) -> Self {
        Self(graph.nodes().iter().map(|n| n.ports.clone()).collect())
    }

    pub fn ports(&self, node: NodeId) -> &[PortId] {
        &self.0[node.index()]
    }

    pub(crate) fn ports_mut(&mut self, node: NodeId) -> &mut Vec<PortId> {
        &mut self.0[node.index()]
    }

    pub fn on_side(&self, graph: &LGraph, node: NodeId, side: PortSide) -> &[PortId] {
        let ports = self.ports(node);
        &ports[graph.side_range(ports, side)]
    }

    /// Ports on `side` in reading order: EAST/WEST top-to-bottom, NORTH/SOUTH west-to-east.
    pub fn along(&self, graph: &LGraph, node: NodeId, side: PortSide) -> Vec<PortId> {
        let mut ports = self.on_side(graph, node, side).to_vec();
        if side.is_counter_reading() {
            ports.reverse();
        }
        ports
    }

    /// Swaps the ports at reading-order indices `i` and `i + 1` of `side`.
    pub(crate) fn swap_along(&mut self, graph: &LGraph, node: NodeId, side: PortSide, i: usize) {
        let range = graph.side_range(self.ports(node), side);
        let (a, b) = if side.is_counter_reading() {
            (range.end - 1 - i, range.end - 2 - i)
        } else {
            (range.start + i, range.start + i + 1)
        };
        self.ports_mut(node).swap(a, b);
    }
}

#[derive(Debug, Clone)]
pub struct SweepState {
    pub(crate) order: Vec<Vec<NodeId>>,
    pub(crate) ports: PortOrder,
    pub(crate) positions: PortPositions,
    in_layer_edges: Vec<Vec<EdgeId>>,
    layout_units: Vec<NodeId>,
}

impl SweepState {
    /// Builds the state for `graph` in two passes: sizing every table, then filling it from the
    /// current layering.
    pub fn prepare(graph: &LGraph) -> Self {
        let layer_count = graph.layers().len();
        let mut state = Self {
            order: Vec::with_capacity(layer_count),
            ports: PortOrder(Vec::with_capacity(graph.node_count())),
            positions: PortPositions::new(graph.port_count()),
            in_layer_edges: vec![Vec::new(); layer_count],
            layout_units: Vec::with_capacity(graph.node_count()),
        };

        state.order.extend(graph.layers().iter().cloned());
        for node in graph.nodes() {
            state.ports.0.push(node.ports.clone());
            state.layout_units.push(node.id);
        }
        for edge in graph.edges() {
            let layer = graph.layer_of_port(edge.source);
            match (graph.edge_span(edge.id), layer) {
                (EdgeSpan::SameLayer { .. }, Some(layer)) => {
                    state.in_layer_edges[layer].push(edge.id);
                }
                (EdgeSpan::NorthSouth { origin_port, dummy }, Some(layer)) => {
                    state.in_layer_edges[layer].push(edge.id);
                    state.layout_units[dummy.index()] = graph.node_of(origin_port);
                }
                _ => {}
            }
        }
        state
    }

    pub fn order(&self) -> &[Vec<NodeId>] {
        &self.order
    }

    pub fn layer(&self, index: usize) -> &[NodeId] {
        &self.order[index]
    }

    pub fn layer_count(&self) -> usize {
        self.order.len()
    }

    pub fn port_order(&self) -> &PortOrder {
        &self.ports
    }

    pub fn positions(&self) -> &PortPositions {
        &self.positions
    }

    /// Same-layer and north/south edges of `layer`.
    pub fn in_layer_edges(&self, layer: usize) -> &[EdgeId] {
        &self.in_layer_edges[layer]
    }

    /// Nodes sharing a layout unit move together; a north/south dummy belongs to its origin's
    /// unit, every other node forms its own.
    pub fn layout_unit(&self, node: NodeId) -> NodeId {
        self.layout_units[node.index()]
    }

    /// Writes node and port order back to `graph` and aligns the boundary dummy layers of every
    /// nested graph with the final port order of its compound node. Returns the compound nodes
    /// whose boundary dummy order changed.
    pub fn apply(&self, graph: &mut LGraph) -> Vec<NodeId> {
        for (i, layer) in self.order.iter().enumerate() {
            graph.set_layer_order(i, layer.clone());
        }
        for (i, ports) in self.ports.0.iter().enumerate() {
            graph.set_port_order(NodeId(i), ports.clone());
        }
        sync_nested_boundaries(graph)
    }
}

/// Orders the nodes of a nested boundary `layer`: dummies reached through `along` (a compound
/// node's ports in reading order) first, in that order, then the rest as they are.
pub(crate) fn boundary_order(outer: &LGraph, along: &[PortId], layer: &[NodeId]) -> Vec<NodeId> {
    let mut order: Vec<NodeId> = Vec::with_capacity(layer.len());
    for &port in along {
        if let Some(d) = outer.port(port).dummy
            && layer.contains(&d)
            && !order.contains(&d)
        {
            order.push(d);
        }
    }
    let rest: Vec<NodeId> = layer
        .iter()
        .copied()
        .filter(|n| !order.contains(n))
        .collect();
    order.extend(rest);
    order
}

pub(crate) fn compound_nodes(graph: &LGraph) -> Vec<NodeId> {
    graph
        .nodes()
        .iter()
        .filter(|n| n.is_compound())
        .map(|n| n.id)
        .collect()
}

fn sync_nested_boundaries(graph: &mut LGraph) -> Vec<NodeId> {
    let mut resynced = Vec::new();
    for node in compound_nodes(graph) {
        let mut changed = false;
        for side in [PortSide::West, PortSide::East] {
            let Some((dummies, _)) = graph.nested_boundary(node, side) else {
                continue;
            };
            let order = boundary_order(graph, &graph.ports_along(node, side), dummies);
            if order.as_slice() == dummies {
                continue;
            }
            let Some(nested) = graph.node_mut(node).nested.as_deref_mut() else {
                continue;
            };
            let index = if side == PortSide::West {
                0
            } else {
                nested.layers().len() - 1
            };
            nested.set_layer_order(index, order);
            changed = true;
        }
        if changed {
            resynced.push(node);
        }
    }
    resynced
}

/// The reverse of the write-back in [`SweepState::apply`]: orders the hierarchical ports of every
/// compound node the way their boundary dummies lie in its nested graph. Other ports keep their
/// slots; fixed port orders are left alone.
pub(crate) fn adopt_nested_boundaries(graph: &mut LGraph) {
    for node in compound_nodes(graph) {
        if graph.node(node).port_order_fixed {
            continue;
        }
        let mut ports = graph.node(node).ports.clone();
        for side in [PortSide::West, PortSide::East] {
            let Some((dummies, _)) = graph.nested_boundary(node, side) else {
                continue;
            };
            let range = graph.side_range(&ports, side);
            let mut along = ports[range.clone()].to_vec();
            if side.is_counter_reading() {
                along.reverse();
            }

            let slots: Vec<usize> = (0..along.len())
                .filter(|&i| graph.port(along[i]).dummy.is_some())
                .collect();
            let mut hierarchical: Vec<PortId> = slots.iter().map(|&i| along[i]).collect();
            hierarchical.sort_by_key(|&p| {
                graph
                    .port(p)
                    .dummy
                    .and_then(|d| dummies.iter().position(|&n| n == d))
            });
            for (&slot, port) in slots.iter().zip(hierarchical) {
                along[slot] = port;
            }

            if side.is_counter_reading() {
                along.reverse();
            }
            ports[range].copy_from_slice(&along);
        }
        graph.set_port_order(node, ports);
    }
}
