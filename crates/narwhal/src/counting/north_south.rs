//! Crossings of north/south port edges within one layer.
//!
//! An edge from a NORTH or SOUTH port of an origin node to a north/south dummy of the same layer
//! is drawn as a vertical segment at the port's x position, running from the origin to the
//! dummy's row; the dummy's between-layer edges then leave horizontally from that x position.
//! Whether a dummy lies north or south of its origin follows from the current layer order, so
//! both directions are handled by the same span test.
//!
//! A segment crosses
//! - the horizontal edge of a dummy of the same origin lying strictly between origin and its own
//!   dummy when that edge reaches over the segment's x position, and
//! - each long-edge dummy or foreign north/south dummy with between-layer edges lying strictly
//!   between origin and its own dummy, once.

use crate::state::PortOrder;
use narwhal_lgraph::{EdgeId, EdgeSpan, LGraph, NodeId, NodeKind, PortId};
use rustc_hash::FxHashMap as HashMap;

#[derive(Debug, Clone, Copy)]
struct NorthSouthArc {
    origin: NodeId,
    port: PortId,
    dummy: NodeId,
}

#[derive(Debug, Clone, Default)]
pub struct NorthSouthCounter {
    arcs: Vec<NorthSouthArc>,
}

impl NorthSouthCounter {
    pub fn new(graph: &LGraph, edges: &[EdgeId]) -> Self {
        let arcs = edges
            .iter()
            .filter_map(|&e| match graph.edge_span(e) {
                EdgeSpan::NorthSouth { origin_port, dummy } => Some(NorthSouthArc {
                    origin: graph.node_of(origin_port),
                    port: origin_port,
                    dummy,
                }),
                _ => None,
            })
            .collect();
        Self { arcs }
    }

    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    pub fn count(&self, graph: &LGraph, ports: &PortOrder, layer: &[NodeId]) -> u64 {
        if self.arcs.is_empty() {
            return 0;
        }
        let index: HashMap<NodeId, usize> =
            layer.iter().enumerate().map(|(i, &n)| (n, i)).collect();

        let mut cc: u64 = 0;
        for arc in &self.arcs {
            let (Some(&o), Some(&d)) = (index.get(&arc.origin), index.get(&arc.dummy)) else {
                continue;
            };
            let (lo, hi) = (o.min(d), o.max(d));
            if hi <= lo + 1 {
                continue;
            }
            for &m in &layer[lo + 1..hi] {
                let (east, west) = horizontal_directions(graph, m);
                if !east && !west {
                    continue;
                }
                match graph.node(m).kind {
                    NodeKind::LongEdge => cc += 1,
                    NodeKind::NorthSouthPort => {
                        let mut siblings = self
                            .arcs
                            .iter()
                            .filter(|b| b.dummy == m && b.origin == arc.origin)
                            .peekable();
                        if siblings.peek().is_none() {
                            cc += 1;
                            continue;
                        }
                        let Some(xa) = reading_index(graph, ports, arc.port) else {
                            continue;
                        };
                        for sibling in siblings {
                            let Some(xb) = reading_index(graph, ports, sibling.port) else {
                                continue;
                            };
                            if east && xa > xb {
                                cc += 1;
                            }
                            if west && xa < xb {
                                cc += 1;
                            }
                        }
                    }
                    NodeKind::Normal | NodeKind::ExternalPort => {}
                }
            }
        }
        cc
    }
}

/// Whether `node` has between-layer edges leaving to the east and to the west.
fn horizontal_directions(graph: &LGraph, node: NodeId) -> (bool, bool) {
    let mut east = false;
    let mut west = false;
    for &port in &graph.node(node).ports {
        for edge in graph.port(port).connected_edges() {
            if let EdgeSpan::Between { left, right } = graph.edge_span(edge) {
                east |= left == port;
                west |= right == port;
            }
        }
    }
    (east, west)
}

/// Position of `port` among its node's ports on its side, or `None` if `ports` does not list it.
fn reading_index(graph: &LGraph, ports: &PortOrder, port: PortId) -> Option<usize> {
    let p = graph.port(port);
    ports
        .along(graph, p.node, p.side)
        .iter()
        .position(|&q| q == port)
}
