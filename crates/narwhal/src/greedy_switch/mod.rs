//! Greedy switch node ordering.
//!
//! For two neighboring nodes of the free layer, check whether exchanging them reduces the number
//! of crossings; if it does, switch them. Full top-to-bottom scans repeat until one scan switches
//! nothing, which bounds the work by the number of inversions of the layer (n·(n−1)/2 switches).
//!
//! - [`GreedySwitchType::OneSided`] counts against the layer behind the sweep direction only and
//!   never increases the crossings to that layer.
//! - [`GreedySwitchType::TwoSided`] counts against both neighbors. It may increase the total
//!   crossing count, so the sweep controller recounts after every backward sweep and keeps the
//!   best order seen.
//!
//! Ties never switch, so the result is a function of the input order.

mod switch_decider;

use crate::error::Result;
use crate::heuristic::CrossingMinimizationHeuristic;
use crate::state::SweepState;
use narwhal_lgraph::{LGraph, PortSide};
use switch_decider::SwitchDecider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GreedySwitchType {
    OneSided,
    TwoSided,
}

#[derive(Debug, Clone, Copy)]
pub struct GreedySwitchHeuristic {
    kind: GreedySwitchType,
}

impl GreedySwitchHeuristic {
    pub fn new(kind: GreedySwitchType) -> Self {
        Self { kind }
    }

    /// Switches adjacent nodes of `free_layer` until a full scan finds no improving switch.
    /// Returns the number of switches performed.
    pub fn switch_until_converged(
        &self,
        graph: &LGraph,
        state: &mut SweepState,
        free_layer: usize,
        forward_sweep: bool,
    ) -> usize {
        let mut decider = self.decider(graph, state, free_layer, forward_sweep);
        let mut switches = 0;
        loop {
            let n = self.sweep_downward_in_layer(graph, state, &mut decider, free_layer);
            if n == 0 {
                break;
            }
            switches += n;
        }
        switches
    }

    fn decider(
        &self,
        graph: &LGraph,
        state: &mut SweepState,
        free_layer: usize,
        forward_sweep: bool,
    ) -> SwitchDecider {
        let side = if forward_sweep {
            PortSide::West
        } else {
            PortSide::East
        };
        SwitchDecider::new(graph, state, free_layer, side, self.kind)
    }

    fn sweep_downward_in_layer(
        &self,
        graph: &LGraph,
        state: &mut SweepState,
        decider: &mut SwitchDecider,
        layer: usize,
    ) -> usize {
        let mut switches = 0;
        let len = state.layer(layer).len();
        for upper in 0..len.saturating_sub(1) {
            let lower = upper + 1;
            if decider.does_switch_reduce_crossings(graph, state, upper, lower) {
                let (u, l) = (state.order[layer][upper], state.order[layer][lower]);
                decider.notify_of_switch(graph, state, u, l);
                state.order[layer].swap(upper, lower);
                tracing::trace!(layer, upper = %graph.node(u).name, lower = %graph.node(l).name, "greedy switch");
                switches += 1;
            }
        }
        switches
    }
}

impl CrossingMinimizationHeuristic for GreedySwitchHeuristic {
    fn minimize_crossings(
        &self,
        graph: &LGraph,
        state: &mut SweepState,
        free_layer: usize,
        forward_sweep: bool,
        _is_first_sweep: bool,
    ) -> Result<bool> {
        Ok(self.switch_until_converged(graph, state, free_layer, forward_sweep) > 0)
    }

    fn set_first_layer_order(
        &self,
        graph: &LGraph,
        state: &mut SweepState,
        forward_sweep: bool,
    ) -> Result<bool> {
        let Some(last) = state.layer_count().checked_sub(1) else {
            return Ok(false);
        };
        let start = if forward_sweep { 0 } else { last };
        let mut decider = self.decider(graph, state, start, forward_sweep);
        Ok(self.sweep_downward_in_layer(graph, state, &mut decider, start) > 0)
    }

    fn always_improves(&self) -> bool {
        self.kind == GreedySwitchType::OneSided
    }

    fn is_deterministic(&self) -> bool {
        true
    }
}
