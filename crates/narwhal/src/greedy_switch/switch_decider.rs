use super::GreedySwitchType;
use crate::counting::{CrossingsCounter, InLayerCounter, NorthSouthCounter};
use crate::state::SweepState;
use narwhal_lgraph::{LGraph, NodeId, NodeKind, PortSide};

/// Decides whether exchanging two adjacent nodes of the free layer reduces crossings.
///
/// Built once per free layer; the counters it holds are kept current through
/// [`notify_of_switch`](Self::notify_of_switch).
#[derive(Debug)]
pub(crate) struct SwitchDecider {
    free_layer: usize,
    counters: Vec<CrossingsCounter>,
    in_layer: Vec<InLayerCounter>,
    north_south: NorthSouthCounter,
}

impl SwitchDecider {
    /// `side` is the side of the free layer that faces the fixed layer in one-sided mode.
    pub(crate) fn new(
        graph: &LGraph,
        state: &mut SweepState,
        free_layer: usize,
        side: PortSide,
        kind: GreedySwitchType,
    ) -> Self {
        let sides: &[PortSide] = match kind {
            GreedySwitchType::OneSided => std::slice::from_ref(&side),
            GreedySwitchType::TwoSided => &[PortSide::West, PortSide::East],
        };

        let mut counters = Vec::with_capacity(sides.len());
        let mut in_layer = Vec::with_capacity(sides.len());
        for &side in sides {
            let neighbor = match side {
                PortSide::West => free_layer.checked_sub(1),
                _ => Some(free_layer + 1).filter(|&l| l < state.layer_count()),
            };
            if let Some(neighbor) = neighbor {
                let (left, right) = if side == PortSide::West {
                    (neighbor, free_layer)
                } else {
                    (free_layer, neighbor)
                };
                counters.push(CrossingsCounter::between(
                    graph,
                    &state.ports,
                    &mut state.positions,
                    &state.order[left],
                    &state.order[right],
                    side,
                ));
            }
            let arcs = InLayerCounter::new(graph, state.in_layer_edges(free_layer), side);
            if !arcs.is_empty() {
                in_layer.push(arcs);
            }
        }

        Self {
            free_layer,
            counters,
            in_layer,
            north_south: NorthSouthCounter::new(graph, state.in_layer_edges(free_layer)),
        }
    }

    pub(crate) fn does_switch_reduce_crossings(
        &self,
        graph: &LGraph,
        state: &SweepState,
        upper_index: usize,
        lower_index: usize,
    ) -> bool {
        let layer = state.layer(self.free_layer);
        let (upper, lower) = (layer[upper_index], layer[lower_index]);
        if constraints_prevent_switch(graph, state, upper, lower) {
            return false;
        }

        let mut current: u64 = 0;
        let mut switched: u64 = 0;
        for counter in &self.counters {
            let (a, b) = counter.count_both_orders_nodes(graph, state.port_order(), upper, lower);
            current += a;
            switched += b;
        }

        if !self.in_layer.is_empty() || !self.north_south.is_empty() {
            let mut swapped = layer.to_vec();
            swapped.swap(upper_index, lower_index);
            let ports = state.port_order();
            for arcs in &self.in_layer {
                current += arcs.count(graph, ports, layer);
                switched += arcs.count(graph, ports, &swapped);
            }
            current += self.north_south.count(graph, ports, layer);
            switched += self.north_south.count(graph, ports, &swapped);
        }

        switched < current
    }

    pub(crate) fn notify_of_switch(
        &mut self,
        graph: &LGraph,
        state: &mut SweepState,
        upper: NodeId,
        lower: NodeId,
    ) {
        for counter in &mut self.counters {
            counter.notify_node_switch(graph, &state.ports, &mut state.positions, upper, lower);
        }
    }
}

/// A north/south dummy stays within its origin's layout unit and never passes its origin;
/// long-edge dummies may pass anything.
fn constraints_prevent_switch(
    graph: &LGraph,
    state: &SweepState,
    upper: NodeId,
    lower: NodeId,
) -> bool {
    let upper_kind = graph.node(upper).kind;
    let lower_kind = graph.node(lower).kind;
    if upper_kind == NodeKind::LongEdge || lower_kind == NodeKind::LongEdge {
        return false;
    }
    let upper_bound = upper_kind == NodeKind::NorthSouthPort;
    let lower_bound = lower_kind == NodeKind::NorthSouthPort;
    if !upper_bound && !lower_bound {
        return false;
    }
    if (upper_bound && state.layout_unit(upper) == lower)
        || (lower_bound && state.layout_unit(lower) == upper)
    {
        return true;
    }
    state.layout_unit(upper) != state.layout_unit(lower)
}
