//! Greedy port distribution.
//!
//! The same bubble local search as greedy switch, run over the ports of one node side instead of
//! the nodes of a layer. Ports are compared in reading order (the clockwise list reversed for
//! SOUTH and WEST), so neighbors in the list are neighbors on the boundary.
//!
//! For compound nodes, two hierarchical ports also pay for the crossings their edges cause inside
//! the nested graph, between the boundary dummies and the layer beside them.

use crate::counting::{CrossingsCounter, InLayerCounter, InLayerPositions, NestedCounter};
use crate::error::Result;
use crate::state::SweepState;
use narwhal_lgraph::{GraphError, LGraph, NodeId, PortId, PortSide};

#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyPortDistributor;

/// Counters shared by all nodes of one layer side.
struct LayerCounters {
    side: PortSide,
    outer: CrossingsCounter,
    in_layer: InLayerCounter,
    arcs: InLayerPositions,
}

impl GreedyPortDistributor {
    /// Distributes the ports of layer `current` on the side facing the layer the sweep came from.
    pub fn distribute_ports_while_sweeping(
        &self,
        graph: &LGraph,
        state: &mut SweepState,
        current: usize,
        forward_sweep: bool,
    ) -> Result<bool> {
        let side = if forward_sweep {
            PortSide::West
        } else {
            PortSide::East
        };
        self.distribute_ports_on_side(graph, state, current, side)
    }

    /// Distributes the `side` ports of every node in `layer` against the neighbor layer on that
    /// side. Returns whether any port moved.
    pub fn distribute_ports_on_side(
        &self,
        graph: &LGraph,
        state: &mut SweepState,
        layer: usize,
        side: PortSide,
    ) -> Result<bool> {
        let Some(mut counters) = LayerCounters::new(graph, state, layer, side) else {
            return Ok(false);
        };
        let nodes = state.layer(layer).to_vec();
        let mut improved = false;
        for node in nodes {
            improved |= self.distribute_ports(graph, state, &mut counters, node)?;
        }
        Ok(improved)
    }

    /// Crossings of the edges of two adjacent ports of `node` on `side`, with `upper` above and
    /// with `lower` above: the outer count against the neighbor layer, the same-layer arcs that
    /// involve either port and, for two hierarchical ports, the count inside the nested graph.
    #[allow(clippy::too_many_arguments)]
    pub fn port_pair_crossings(
        &self,
        graph: &LGraph,
        state: &mut SweepState,
        layer: usize,
        node: NodeId,
        side: PortSide,
        upper: PortId,
        lower: PortId,
    ) -> Result<(u64, u64)> {
        let Some(counters) = LayerCounters::new(graph, state, layer, side) else {
            return Ok((0, 0));
        };
        let nested = nested_counter(graph, state, node, side)?;
        crossings_between_ports(graph, &counters, nested.as_ref(), upper, lower)
    }

    fn distribute_ports(
        &self,
        graph: &LGraph,
        state: &mut SweepState,
        counters: &mut LayerCounters,
        node: NodeId,
    ) -> Result<bool> {
        if graph.node(node).port_order_fixed {
            return Ok(false);
        }
        let side = counters.side;
        let nested = nested_counter(graph, state, node, side)?;

        let mut ports = state.ports.along(graph, node, side);
        let mut improved = false;
        loop {
            let mut continue_switching = false;
            for i in 0..ports.len().saturating_sub(1) {
                let (upper, lower) = (ports[i], ports[i + 1]);
                let (current, switched) =
                    crossings_between_ports(graph, counters, nested.as_ref(), upper, lower)?;
                if switched < current {
                    ports.swap(i, i + 1);
                    state.ports.swap_along(graph, node, side, i);
                    counters
                        .outer
                        .notify_port_switch(graph, &mut state.positions, upper, lower);
                    counters.arcs.notify_port_switch(graph, upper, lower);
                    tracing::trace!(node = %graph.node(node).name, ?side, %upper, %lower, "port switch");
                    continue_switching = true;
                }
            }
            if !continue_switching {
                break;
            }
            improved = true;
        }
        Ok(improved)
    }
}

impl LayerCounters {
    fn new(graph: &LGraph, state: &mut SweepState, layer: usize, side: PortSide) -> Option<Self> {
        let neighbor = match side {
            PortSide::West => layer.checked_sub(1)?,
            PortSide::East => Some(layer + 1).filter(|&l| l < state.layer_count())?,
            PortSide::North | PortSide::South => return None,
        };
        let (left, right) = if side == PortSide::West {
            (neighbor, layer)
        } else {
            (layer, neighbor)
        };
        let outer = CrossingsCounter::between(
            graph,
            &state.ports,
            &mut state.positions,
            &state.order[left],
            &state.order[right],
            side,
        );
        let in_layer = InLayerCounter::new(graph, state.in_layer_edges(layer), side);
        let arcs = if in_layer.is_empty() {
            InLayerPositions::default()
        } else {
            in_layer.positions(graph, &state.ports, &state.order[layer])
        };
        Some(Self {
            side,
            outer,
            in_layer,
            arcs,
        })
    }
}

/// A nested counter if `node` has hierarchical ports on `side`.
fn nested_counter<'g>(
    graph: &'g LGraph,
    state: &SweepState,
    node: NodeId,
    side: PortSide,
) -> Result<Option<NestedCounter<'g>>> {
    let hierarchical = state
        .port_order()
        .on_side(graph, node, side)
        .iter()
        .any(|&p| graph.port(p).inside_connections);
    if !hierarchical {
        return Ok(None);
    }
    NestedCounter::new(graph, node, side)
}

fn crossings_between_ports(
    graph: &LGraph,
    counters: &LayerCounters,
    nested: Option<&NestedCounter<'_>>,
    upper: PortId,
    lower: PortId,
) -> Result<(u64, u64)> {
    let (mut current, mut switched) = counters.outer.count_both_orders_ports(upper, lower);

    let (a, b) = counters
        .in_layer
        .count_both_orders_ports(graph, &counters.arcs, upper, lower);
    current += a;
    switched += b;

    let (up, low) = (graph.port(upper), graph.port(lower));
    if let Some(nested) = nested
        && up.inside_connections
        && low.inside_connections
    {
        let upper_dummy = up
            .dummy
            .ok_or(GraphError::MissingPortDummy { port: upper })?;
        let lower_dummy = low
            .dummy
            .ok_or(GraphError::MissingPortDummy { port: lower })?;
        let (a, b) = nested.count_both_orders(upper_dummy, lower_dummy);
        current += a;
        switched += b;
    }

    Ok((current, switched))
}
