//! Same-layer edges drawn between two ports on the EAST (or WEST) side of one layer.
//!
//! Such an arc runs through the gap next to its layer. Two arcs cross when their end positions
//! strictly interleave, and an arc crosses every between-layer edge that leaves a port strictly
//! inside it.

use crate::state::PortOrder;
use narwhal_lgraph::{EdgeId, EdgeSpan, LGraph, NodeId, PortId, PortSide};
use rustc_hash::FxHashMap as HashMap;

#[derive(Debug, Clone)]
pub struct InLayerCounter {
    side: PortSide,
    arcs: Vec<(PortId, PortId)>,
}

/// Reading-order positions of the ports on one side of a layer, with running sums of their
/// between-layer edges.
///
/// Built once per layer side by [`InLayerCounter::positions`] and kept current through
/// [`notify_port_switch`](Self::notify_port_switch).
#[derive(Debug, Clone, Default)]
pub struct InLayerPositions {
    pos: HashMap<PortId, usize>,
    /// `prefix[k]` is the number of between-layer edges at the first `k` ports.
    prefix: Vec<u64>,
}

impl InLayerPositions {
    pub fn position(&self, port: PortId) -> Option<usize> {
        self.pos.get(&port).copied()
    }

    /// Updates the table after two adjacent ports traded places.
    pub fn notify_port_switch(&mut self, graph: &LGraph, upper: PortId, lower: PortId) {
        let (Some(i), Some(j)) = (self.position(upper), self.position(lower)) else {
            return;
        };
        debug_assert_eq!(i.abs_diff(j), 1);
        self.pos.insert(upper, j);
        self.pos.insert(lower, i);
        let (first, at) = if i < j { (lower, i) } else { (upper, j) };
        self.prefix[at + 1] = self.prefix[at] + between_degree(graph, first);
    }
}

#[derive(Debug, Clone, Copy)]
struct Span {
    lo: usize,
    hi: usize,
    touching: bool,
}

impl InLayerCounter {
    /// Picks the arcs on `side` out of the same-layer edges of one layer.
    pub fn new(graph: &LGraph, edges: &[EdgeId], side: PortSide) -> Self {
        let arcs = edges
            .iter()
            .filter(|&&e| graph.edge_span(e) == EdgeSpan::SameLayer { side })
            .map(|&e| (graph.edge(e).source, graph.edge(e).target))
            .collect();
        Self { side, arcs }
    }

    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    pub fn positions(
        &self,
        graph: &LGraph,
        ports: &PortOrder,
        layer: &[NodeId],
    ) -> InLayerPositions {
        let mut positions = InLayerPositions {
            pos: HashMap::default(),
            prefix: vec![0],
        };
        for &node in layer {
            for port in ports.along(graph, node, self.side) {
                let last = positions.prefix[positions.prefix.len() - 1];
                positions.pos.insert(port, positions.pos.len());
                positions.prefix.push(last + between_degree(graph, port));
            }
        }
        positions
    }

    pub fn count(&self, graph: &LGraph, ports: &PortOrder, layer: &[NodeId]) -> u64 {
        if self.arcs.is_empty() {
            return 0;
        }
        let positions = self.positions(graph, ports, layer);
        let spans = self.spans(|p| positions.position(p), |_| false);

        let mut cc: u64 = 0;
        for (i, a) in spans.iter().enumerate() {
            cc += positions.prefix[a.hi] - positions.prefix[a.lo + 1];
            cc += spans[i + 1..].iter().filter(|b| interleave(a, b)).count() as u64;
        }
        cc
    }

    /// Crossings that involve `upper` or `lower` (adjacent on this side, `upper` above), with
    /// `upper` above and with `lower` above. Crossings involving neither port are the same in
    /// both orders and are left out.
    pub fn count_both_orders_ports(
        &self,
        graph: &LGraph,
        positions: &InLayerPositions,
        upper: PortId,
        lower: PortId,
    ) -> (u64, u64) {
        if self.arcs.is_empty() {
            return (0, 0);
        }
        (
            self.count_touching(graph, positions, upper, lower, false),
            self.count_touching(graph, positions, upper, lower, true),
        )
    }

    fn count_touching(
        &self,
        graph: &LGraph,
        positions: &InLayerPositions,
        upper: PortId,
        lower: PortId,
        switched: bool,
    ) -> u64 {
        let (Some(i), Some(j)) = (positions.position(upper), positions.position(lower)) else {
            return 0;
        };
        let at = |p: PortId| -> Option<usize> {
            match p {
                p if switched && p == upper => Some(j),
                p if switched && p == lower => Some(i),
                p => positions.position(p),
            }
        };
        let (first, at_first) = if i < j { (lower, i) } else { (upper, j) };
        let first_degree = between_degree(graph, first);
        let prefix = |k: usize| -> u64 {
            if switched && k == at_first + 1 {
                positions.prefix[at_first] + first_degree
            } else {
                positions.prefix[k]
            }
        };

        let points = [
            (if switched { j } else { i }, between_degree(graph, upper)),
            (if switched { i } else { j }, between_degree(graph, lower)),
        ];
        let spans = self.spans(at, |p| p == upper || p == lower);

        let mut cc: u64 = 0;
        for (k, a) in spans.iter().enumerate() {
            if !a.touching {
                for &(x, degree) in &points {
                    if a.lo < x && x < a.hi {
                        cc += degree;
                    }
                }
                continue;
            }
            cc += prefix(a.hi) - prefix(a.lo + 1);
            // Pairs of two touching arcs are counted from the earlier one.
            cc += spans
                .iter()
                .enumerate()
                .filter(|&(m, b)| m != k && !(b.touching && m < k) && interleave(a, b))
                .count() as u64;
        }
        cc
    }

    fn spans(
        &self,
        at: impl Fn(PortId) -> Option<usize>,
        touches: impl Fn(PortId) -> bool,
    ) -> Vec<Span> {
        self.arcs
            .iter()
            .filter_map(|&(a, b)| {
                let (pa, pb) = (at(a)?, at(b)?);
                Some(Span {
                    lo: pa.min(pb),
                    hi: pa.max(pb),
                    touching: touches(a) || touches(b),
                })
            })
            .filter(|s| s.lo < s.hi)
            .collect()
    }
}

fn interleave(a: &Span, b: &Span) -> bool {
    (a.lo < b.lo && b.lo < a.hi && a.hi < b.hi) || (b.lo < a.lo && a.lo < b.hi && b.hi < a.hi)
}

fn between_degree(graph: &LGraph, port: PortId) -> u64 {
    graph
        .port(port)
        .connected_edges()
        .filter(|&e| matches!(graph.edge_span(e), EdgeSpan::Between { .. }))
        .count() as u64
}
