//! Crossing counting primitives.
//!
//! [`CrossingsCounter`] answers "how many crossings for either order of this adjacent pair"
//! between two fixed sequences and stays current through switches. [`InLayerCounter`] and
//! [`NorthSouthCounter`] cover edges whose ends lie in one layer, and [`NestedCounter`] reaches
//! across a compound node's boundary. Counts at different nesting levels are additive;
//! [`count_hierarchy`] sums them.

mod crossings_counter;
mod hierarchical;
mod in_layer;
mod north_south;

pub use crossings_counter::{CrossingsCounter, count_between_layers};
pub use hierarchical::NestedCounter;
pub use in_layer::{InLayerCounter, InLayerPositions};
pub use north_south::NorthSouthCounter;

use crate::state::{PortOrder, SweepState, boundary_order};
use narwhal_lgraph::{LGraph, PortSide};

/// Recounts every crossing of one graph level under the order held in `state`.
pub fn count_all_crossings(graph: &LGraph, state: &SweepState) -> u64 {
    let order = state.order();
    let ports = state.port_order();

    let mut cc: u64 = order
        .windows(2)
        .map(|pair| count_between_layers(graph, ports, &pair[0], &pair[1]))
        .sum();

    for (i, layer) in order.iter().enumerate() {
        let edges = state.in_layer_edges(i);
        if edges.is_empty() {
            continue;
        }
        for side in [PortSide::East, PortSide::West] {
            cc += InLayerCounter::new(graph, edges, side).count(graph, ports, layer);
        }
        cc += NorthSouthCounter::new(graph, edges).count(graph, ports, layer);
    }
    cc
}

/// Crossings inside the nested graphs of compound nodes between each boundary dummy layer and the
/// layer beside it, with the dummies ordered by the compound node's port order in `state`.
///
/// These are the crossings greedy port distribution trades against the outer count. Added to
/// [`count_all_crossings`] they give the cost a sweep of this level can influence.
pub fn count_nested_boundaries(graph: &LGraph, state: &SweepState) -> u64 {
    let mut cc: u64 = 0;
    for node in graph.nodes().iter().filter(|n| n.is_compound()) {
        let Some(nested) = node.nested() else {
            continue;
        };
        let ports = PortOrder::of_graph(nested);
        for side in [PortSide::West, PortSide::East] {
            let Some((dummies, beside)) = graph.nested_boundary(node.id, side) else {
                continue;
            };
            let along = state.port_order().along(graph, node.id, side);
            let order = boundary_order(graph, &along, dummies);
            cc += if side == PortSide::West {
                count_between_layers(nested, &ports, &order, beside)
            } else {
                count_between_layers(nested, &ports, beside, &order)
            };
        }
    }
    cc
}

/// Crossings of `graph` as stored, summed over every nesting level.
pub fn count_hierarchy(graph: &LGraph) -> u64 {
    let own = count_all_crossings(graph, &SweepState::prepare(graph));
    own + graph
        .nodes()
        .iter()
        .filter_map(|n| n.nested())
        .map(count_hierarchy)
        .sum::<u64>()
}
