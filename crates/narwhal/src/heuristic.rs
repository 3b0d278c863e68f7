//! The contract shared by interchangeable node-order heuristics.

use crate::barycenter::BarycenterHeuristic;
use crate::error::Result;
use crate::greedy_switch::{GreedySwitchHeuristic, GreedySwitchType};
use crate::options::HeuristicKind;
use crate::state::SweepState;
use narwhal_lgraph::LGraph;

pub trait CrossingMinimizationHeuristic {
    /// Reorders `free_layer` against its fixed neighbor(s). Returns whether the order changed.
    fn minimize_crossings(
        &self,
        graph: &LGraph,
        state: &mut SweepState,
        free_layer: usize,
        forward_sweep: bool,
        is_first_sweep: bool,
    ) -> Result<bool>;

    /// Handles the first layer of a sweep, which has no layer behind it.
    fn set_first_layer_order(
        &self,
        graph: &LGraph,
        state: &mut SweepState,
        forward_sweep: bool,
    ) -> Result<bool>;

    /// `true` if a pass can never increase the total crossing count, so the controller does not
    /// need to recount and keep a best-seen order.
    fn always_improves(&self) -> bool;

    fn is_deterministic(&self) -> bool;
}

#[derive(Debug, Clone, Copy)]
pub enum Heuristic {
    GreedySwitch(GreedySwitchHeuristic),
    Barycenter(BarycenterHeuristic),
}

impl Heuristic {
    pub fn from_kind(kind: HeuristicKind) -> Self {
        match kind {
            HeuristicKind::OneSidedGreedySwitch => {
                Self::GreedySwitch(GreedySwitchHeuristic::new(GreedySwitchType::OneSided))
            }
            HeuristicKind::TwoSidedGreedySwitch => {
                Self::GreedySwitch(GreedySwitchHeuristic::new(GreedySwitchType::TwoSided))
            }
            HeuristicKind::Barycenter => Self::Barycenter(BarycenterHeuristic),
        }
    }

    fn inner(&self) -> &dyn CrossingMinimizationHeuristic {
        match self {
            Self::GreedySwitch(h) => h,
            Self::Barycenter(h) => h,
        }
    }
}

impl CrossingMinimizationHeuristic for Heuristic {
    fn minimize_crossings(
        &self,
        graph: &LGraph,
        state: &mut SweepState,
        free_layer: usize,
        forward_sweep: bool,
        is_first_sweep: bool,
    ) -> Result<bool> {
        self.inner()
            .minimize_crossings(graph, state, free_layer, forward_sweep, is_first_sweep)
    }

    fn set_first_layer_order(
        &self,
        graph: &LGraph,
        state: &mut SweepState,
        forward_sweep: bool,
    ) -> Result<bool> {
        self.inner()
            .set_first_layer_order(graph, state, forward_sweep)
    }

    fn always_improves(&self) -> bool {
        self.inner().always_improves()
    }

    fn is_deterministic(&self) -> bool {
        self.inner().is_deterministic()
    }
}
