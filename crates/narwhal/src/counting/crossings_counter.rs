//! Crossing counts between two adjacent port sequences.

use crate::state::{PortOrder, PortPositions};
use narwhal_lgraph::{EdgeSpan, LGraph, NodeId, PortId, PortSide};
use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sequence {
    Left,
    Right,
}

#[derive(Debug, Clone)]
struct Tracked {
    sequence: Sequence,
    /// Positions of the opposite ends of edges into the other sequence, ascending.
    ends: Vec<u32>,
}

/// Counts crossings between the EAST ports of a left node sequence and the WEST ports of a
/// right node sequence.
///
/// `side` names the side whose nodes are compared: `West` compares nodes of the right sequence,
/// `East` nodes of the left sequence. The counter owns no positions; it numbers the ports of
/// both sequences in the shared [`PortPositions`] table and keeps those entries and its end
/// lists current through [`notify_node_switch`](Self::notify_node_switch) and
/// [`notify_port_switch`](Self::notify_port_switch).
#[derive(Debug, Clone)]
pub struct CrossingsCounter {
    side: PortSide,
    tracked: HashMap<PortId, Tracked>,
}

impl CrossingsCounter {
    pub fn between(
        graph: &LGraph,
        ports: &PortOrder,
        positions: &mut PortPositions,
        left: &[NodeId],
        right: &[NodeId],
        side: PortSide,
    ) -> Self {
        debug_assert!(side.is_east_west());
        let mut tracked: HashMap<PortId, Tracked> = HashMap::default();

        let mut next: u32 = 0;
        for (nodes, facing, sequence) in [
            (left, PortSide::East, Sequence::Left),
            (right, PortSide::West, Sequence::Right),
        ] {
            for &node in nodes {
                for port in ports.along(graph, node, facing) {
                    positions.set(port, next);
                    next += 1;
                    tracked.insert(
                        port,
                        Tracked {
                            sequence,
                            ends: Vec::new(),
                        },
                    );
                }
            }
        }

        let mut counter = Self { side, tracked };
        let all: Vec<PortId> = counter.tracked.keys().copied().collect();
        for port in all {
            counter.rebuild_ends(graph, positions, port);
        }
        counter
    }

    pub fn side(&self) -> PortSide {
        self.side
    }

    /// Crossings among the edges of `upper` and `lower` with `upper` above, and with `lower`
    /// above.
    pub fn count_both_orders_ports(&self, upper: PortId, lower: PortId) -> (u64, u64) {
        count_pairs(self.ends(upper), self.ends(lower))
    }

    /// Like [`count_both_orders_ports`](Self::count_both_orders_ports) for all ports of two nodes
    /// on the counted side.
    pub fn count_both_orders_nodes(
        &self,
        graph: &LGraph,
        ports: &PortOrder,
        upper: NodeId,
        lower: NodeId,
    ) -> (u64, u64) {
        let upper_ends = self.node_ends(graph, ports, upper);
        let lower_ends = self.node_ends(graph, ports, lower);
        count_pairs(&upper_ends, &lower_ends)
    }

    /// Updates positions after `upper` and `lower` (adjacent, `upper` above) traded places.
    pub fn notify_node_switch(
        &mut self,
        graph: &LGraph,
        ports: &PortOrder,
        positions: &mut PortPositions,
        upper: NodeId,
        lower: NodeId,
    ) {
        let mut moved: Vec<PortId> = Vec::new();
        for facing in [PortSide::East, PortSide::West] {
            let upper_ports = self.tracked_along(graph, ports, upper, facing);
            let lower_ports = self.tracked_along(graph, ports, lower, facing);
            let Some(&first) = upper_ports.first().or(lower_ports.first()) else {
                continue;
            };
            let mut next = positions.get(first);
            for &port in lower_ports.iter().chain(upper_ports.iter()) {
                if positions.get(port) != next {
                    positions.set(port, next);
                    moved.push(port);
                }
                next += 1;
            }
        }
        self.refresh_neighbors(graph, positions, &moved);
    }

    /// Updates positions after two adjacent ports of one node traded places.
    pub fn notify_port_switch(
        &mut self,
        graph: &LGraph,
        positions: &mut PortPositions,
        upper: PortId,
        lower: PortId,
    ) {
        if !self.tracked.contains_key(&upper) || !self.tracked.contains_key(&lower) {
            return;
        }
        let (pu, pl) = (positions.get(upper), positions.get(lower));
        positions.set(upper, pl);
        positions.set(lower, pu);
        self.refresh_neighbors(graph, positions, &[upper, lower]);
    }

    fn ends(&self, port: PortId) -> &[u32] {
        self.tracked
            .get(&port)
            .map(|t| t.ends.as_slice())
            .unwrap_or(&[])
    }

    fn node_ends(&self, graph: &LGraph, ports: &PortOrder, node: NodeId) -> Vec<u32> {
        let mut ends: Vec<u32> = ports
            .on_side(graph, node, self.side)
            .iter()
            .flat_map(|&p| self.ends(p).iter().copied())
            .collect();
        ends.sort_unstable();
        ends
    }

    fn tracked_along(
        &self,
        graph: &LGraph,
        ports: &PortOrder,
        node: NodeId,
        side: PortSide,
    ) -> Vec<PortId> {
        ports
            .along(graph, node, side)
            .into_iter()
            .filter(|p| self.tracked.contains_key(p))
            .collect()
    }

    fn refresh_neighbors(&mut self, graph: &LGraph, positions: &PortPositions, moved: &[PortId]) {
        let mut stale: HashSet<PortId> = HashSet::default();
        for &port in moved {
            for edge in graph.port(port).connected_edges() {
                let other = graph.other_end(edge, port);
                if self.tracked.contains_key(&other) {
                    stale.insert(other);
                }
            }
        }
        for port in stale {
            self.rebuild_ends(graph, positions, port);
        }
    }

    fn rebuild_ends(&mut self, graph: &LGraph, positions: &PortPositions, port: PortId) {
        let Some(sequence) = self.tracked.get(&port).map(|t| t.sequence) else {
            return;
        };
        let mut ends: Vec<u32> = graph
            .port(port)
            .connected_edges()
            .filter(|&e| matches!(graph.edge_span(e), EdgeSpan::Between { .. }))
            .map(|e| graph.other_end(e, port))
            .filter(|other| {
                self.tracked
                    .get(other)
                    .is_some_and(|t| t.sequence != sequence)
            })
            .map(|other| positions.get(other))
            .collect();
        ends.sort_unstable();
        if let Some(t) = self.tracked.get_mut(&port) {
            t.ends = ends;
        }
    }
}

/// Counts pairs `(u, l)` with `u > l` and with `l > u` for two ascending lists.
fn count_pairs(upper: &[u32], lower: &[u32]) -> (u64, u64) {
    let mut upper_first: u64 = 0;
    let mut lower_first: u64 = 0;
    let mut below = 0usize;
    let mut not_above = 0usize;
    for &u in upper {
        while below < lower.len() && lower[below] < u {
            below += 1;
        }
        while not_above < lower.len() && lower[not_above] <= u {
            not_above += 1;
        }
        upper_first += below as u64;
        lower_first += (lower.len() - not_above) as u64;
    }
    (upper_first, lower_first)
}

/// Counts all crossings between the EAST ports of `left` and the WEST ports of `right` from
/// scratch, using an accumulator tree over the right-hand positions (Barth, Jünger, Mutzel).
pub fn count_between_layers(
    graph: &LGraph,
    ports: &PortOrder,
    left: &[NodeId],
    right: &[NodeId],
) -> u64 {
    let mut right_pos: HashMap<PortId, usize> = HashMap::default();
    for &node in right {
        for port in ports.along(graph, node, PortSide::West) {
            let next = right_pos.len();
            right_pos.insert(port, next);
        }
    }
    if right_pos.is_empty() {
        return 0;
    }

    let mut south_entries: Vec<usize> = Vec::new();
    for &node in left {
        for port in ports.along(graph, node, PortSide::East) {
            let mut entries: Vec<usize> = graph
                .port(port)
                .connected_edges()
                .filter_map(|e| right_pos.get(&graph.other_end(e, port)).copied())
                .collect();
            entries.sort_unstable();
            south_entries.extend(entries);
        }
    }

    let mut first_index: usize = 1;
    while first_index < right_pos.len() {
        first_index <<= 1;
    }
    let tree_size = 2 * first_index - 1;
    first_index -= 1;
    let mut tree: Vec<u64> = vec![0; tree_size];

    let mut cc: u64 = 0;
    for pos in south_entries {
        let mut index = pos + first_index;
        tree[index] += 1;
        let mut weight_sum: u64 = 0;
        while index > 0 {
            if index % 2 == 1 {
                weight_sum += tree[index + 1];
            }
            index = (index - 1) >> 1;
            tree[index] += 1;
        }
        cc += weight_sum;
    }
    cc
}
