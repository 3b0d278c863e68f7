//! Barycenter node ordering.
//!
//! Each node of the free layer is ranked by the mean position of its neighbors' ports in the
//! fixed layer. Nodes without such neighbors keep their slot, ties keep the current relative
//! order, so the result is deterministic. A pass may increase crossings.

use crate::error::Result;
use crate::heuristic::CrossingMinimizationHeuristic;
use crate::state::SweepState;
use narwhal_lgraph::{LGraph, NodeId, PortId, PortSide};
use rustc_hash::FxHashMap as HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct BarycenterEntry {
    pub node: NodeId,
    /// Index in the layer before sorting.
    pub i: usize,
    pub barycenter: Option<f64>,
    pub weight: Option<f64>,
}

/// Barycenters of the nodes of `free_layer` against the neighbor layer on `fixed_side`.
pub fn barycenter(
    graph: &LGraph,
    state: &SweepState,
    free_layer: usize,
    fixed_side: PortSide,
) -> Vec<BarycenterEntry> {
    let fixed_layer = match fixed_side {
        PortSide::West => free_layer.checked_sub(1),
        _ => Some(free_layer + 1).filter(|&l| l < state.layer_count()),
    };
    let ports = state.port_order();

    let mut fixed_pos: HashMap<PortId, usize> = HashMap::default();
    if let Some(fixed_layer) = fixed_layer {
        for &node in state.layer(fixed_layer) {
            for port in ports.along(graph, node, fixed_side.opposed()) {
                fixed_pos.insert(port, fixed_pos.len());
            }
        }
    }

    state
        .layer(free_layer)
        .iter()
        .enumerate()
        .map(|(i, &node)| {
            let mut sum: f64 = 0.0;
            let mut weight: f64 = 0.0;
            for &port in ports.on_side(graph, node, fixed_side) {
                for edge in graph.port(port).connected_edges() {
                    if let Some(&pos) = fixed_pos.get(&graph.other_end(edge, port)) {
                        sum += pos as f64;
                        weight += 1.0;
                    }
                }
            }
            if weight == 0.0 {
                return BarycenterEntry {
                    node,
                    i,
                    barycenter: None,
                    weight: None,
                };
            }
            BarycenterEntry {
                node,
                i,
                barycenter: Some(sum / weight),
                weight: Some(weight),
            }
        })
        .collect()
}

/// Orders entries by barycenter; entries without one stay at their original index.
pub fn sort(entries: &[BarycenterEntry]) -> Vec<NodeId> {
    let mut sortable: Vec<&BarycenterEntry> = Vec::new();
    let mut unsortable: Vec<&BarycenterEntry> = Vec::new();
    for entry in entries {
        if entry.barycenter.is_some() {
            sortable.push(entry);
        } else {
            unsortable.push(entry);
        }
    }

    unsortable.sort_by(|a, b| b.i.cmp(&a.i));
    sortable.sort_by(|a, b| {
        let a_bc = a.barycenter.unwrap_or(0.0);
        let b_bc = b.barycenter.unwrap_or(0.0);
        a_bc.total_cmp(&b_bc).then(a.i.cmp(&b.i))
    });

    let mut out: Vec<NodeId> = Vec::with_capacity(entries.len());

    fn consume_unsortable(out: &mut Vec<NodeId>, unsortable: &mut Vec<&BarycenterEntry>) {
        while let Some(last) = unsortable.last() {
            if last.i > out.len() {
                break;
            }
            out.push(last.node);
            unsortable.pop();
        }
    }

    consume_unsortable(&mut out, &mut unsortable);
    for entry in sortable {
        out.push(entry.node);
        consume_unsortable(&mut out, &mut unsortable);
    }
    out.extend(unsortable.iter().rev().map(|e| e.node));
    out
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BarycenterHeuristic;

impl CrossingMinimizationHeuristic for BarycenterHeuristic {
    fn minimize_crossings(
        &self,
        graph: &LGraph,
        state: &mut SweepState,
        free_layer: usize,
        forward_sweep: bool,
        _is_first_sweep: bool,
    ) -> Result<bool> {
        let fixed_side = if forward_sweep {
            PortSide::West
        } else {
            PortSide::East
        };
        let sorted = sort(&barycenter(graph, state, free_layer, fixed_side));
        if sorted.as_slice() == state.layer(free_layer) {
            return Ok(false);
        }
        state.order[free_layer] = sorted;
        Ok(true)
    }

    fn set_first_layer_order(
        &self,
        _graph: &LGraph,
        _state: &mut SweepState,
        _forward_sweep: bool,
    ) -> Result<bool> {
        Ok(false)
    }

    fn always_improves(&self) -> bool {
        false
    }

    fn is_deterministic(&self) -> bool {
        true
    }
}
