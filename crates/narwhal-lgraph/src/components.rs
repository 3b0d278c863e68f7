//! Splitting a layered graph into connected components and putting it back together.
//!
//! Components are discovered in layer order, then top-to-bottom within a layer, so the result
//! is deterministic for a given input order. Every component keeps the full layer count of the
//! source graph; recombining stacks the components' layers in component order.

use crate::{LGraph, NodeId, PortId};
use rustc_hash::FxHashMap as HashMap;
use std::collections::VecDeque;

/// Separates `graph` into its weakly connected components.
///
/// Nested graphs are moved into the component that owns their compound node. A graph without
/// nodes yields no components.
pub fn split(mut graph: LGraph) -> Vec<LGraph> {
    let mut component_of: Vec<Option<usize>> = vec![None; graph.node_count()];
    let mut count = 0usize;

    let seeds: Vec<NodeId> = graph.layers().iter().flatten().copied().collect();
    for seed in seeds {
        if component_of[seed.0].is_some() {
            continue;
        }
        component_of[seed.0] = Some(count);
        let mut queue: VecDeque<NodeId> = VecDeque::from([seed]);
        while let Some(v) = queue.pop_front() {
            for &port in &graph.node(v).ports {
                for edge in graph.port(port).connected_edges() {
                    let w = graph.node_of(graph.other_end(edge, port));
                    if component_of[w.0].is_none() {
                        component_of[w.0] = Some(count);
                        queue.push_back(w);
                    }
                }
            }
        }
        count += 1;
    }

    if count <= 1 {
        return if graph.is_empty() {
            Vec::new()
        } else {
            vec![graph]
        };
    }

    (0..count)
        .map(|c| {
            let mut part = LGraph::new();
            transplant(&mut graph, &mut part, |n| component_of[n.0] == Some(c));
            part
        })
        .collect()
}

/// Stacks `parts` back into one graph: in every layer the nodes of earlier parts come first.
pub fn recombine(parts: Vec<LGraph>) -> LGraph {
    let mut graph = LGraph::new();
    for mut part in parts {
        transplant(&mut part, &mut graph, |_| true);
    }
    graph
}

/// Copies the selected nodes of `src` (with their ports, the edges among them and their nested
/// graphs) to the bottom of the matching layers of `dst`.
fn transplant(src: &mut LGraph, dst: &mut LGraph, selected: impl Fn(NodeId) -> bool) {
    dst.ensure_layers(src.layers().len());

    let mut node_map: HashMap<NodeId, NodeId> = HashMap::default();
    let mut port_map: HashMap<PortId, PortId> = HashMap::default();

    let order: Vec<(usize, NodeId)> = src
        .layers()
        .iter()
        .enumerate()
        .flat_map(|(l, nodes)| nodes.iter().map(move |&n| (l, n)))
        .filter(|&(_, n)| selected(n))
        .collect();

    for (layer, old) in order {
        let nested = src.take_nested(old);
        let n = src.node(old);
        let new = dst.add_node_of_kind(layer, n.name.clone(), n.kind);
        dst.set_port_order_fixed(new, n.port_order_fixed);
        node_map.insert(old, new);

        for &old_port in &src.node(old).ports {
            let p = src.port(old_port);
            let new_port = dst.add_port(new, p.side);
            if let Some(dummy) = p.dummy {
                dst.set_port_dummy(new_port, dummy);
            }
            port_map.insert(old_port, new_port);
        }
        if let Some(nested) = nested {
            dst.set_nested(new, nested);
        }
    }

    for edge in src.edges() {
        let (Some(&s), Some(&t)) = (port_map.get(&edge.source), port_map.get(&edge.target)) else {
            continue;
        };
        dst.add_edge(s, t);
    }
}
