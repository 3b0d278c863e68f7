//! Layer sweep crossing minimization.
//!
//! Alternates forward (west to east) and backward passes over the layers. In each pass the first
//! layer is handled by [`CrossingMinimizationHeuristic::set_first_layer_order`]; every later layer
//! is reordered against the one the sweep came from, with port distribution on both sides of the
//! boundary between them.
//!
//! Nested graphs of compound nodes are minimized first and their boundary dummy order seeds the
//! compound node's hierarchical port order. When the parent's port distribution reorders those
//! ports anyway, the nested graph is swept again with its boundary layers held in place.

use crate::counting::{count_all_crossings, count_hierarchy, count_nested_boundaries};
use crate::error::Result;
use crate::heuristic::{CrossingMinimizationHeuristic, Heuristic};
use crate::options::CrossMinOptions;
use crate::port_distribution::GreedyPortDistributor;
use crate::state::{SweepState, adopt_nested_boundaries, compound_nodes};
use narwhal_lgraph::{LGraph, NodeId, PortSide, components};
use tracing::{debug, warn};

/// Outcome of one [`LayerSweepCrossingMinimizer::process`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Passes run on the graph level that needed the most.
    pub passes: usize,
    /// Whether any pass changed a node or port order.
    pub improved: bool,
    /// Crossings of the written-back order, summed over all nesting levels.
    pub crossings: u64,
    /// Whether sweeping stopped because cancellation was requested.
    pub cancelled: bool,
}

impl SweepReport {
    fn merge(&mut self, other: SweepReport) {
        self.passes = self.passes.max(other.passes);
        self.improved |= other.improved;
        self.crossings += other.crossings;
        self.cancelled |= other.cancelled;
    }
}

#[derive(Debug, Clone)]
pub struct LayerSweepCrossingMinimizer {
    options: CrossMinOptions,
    heuristic: Heuristic,
    port_distributor: GreedyPortDistributor,
}

impl LayerSweepCrossingMinimizer {
    pub fn new(options: CrossMinOptions) -> Self {
        let heuristic = Heuristic::from_kind(options.heuristic);
        Self {
            options,
            heuristic,
            port_distributor: GreedyPortDistributor,
        }
    }

    pub fn process(&self, graph: &mut LGraph) -> Result<SweepReport> {
        self.process_with(graph, || false)
    }

    /// Like [`process`](Self::process), polling `is_cancelled` before every pass. A cancelled run
    /// still writes back the order reached so far.
    pub fn process_with(
        &self,
        graph: &mut LGraph,
        mut is_cancelled: impl FnMut() -> bool,
    ) -> Result<SweepReport> {
        graph.validate()?;
        if graph.is_empty() {
            return Ok(SweepReport::default());
        }
        if !self.options.separate_components {
            return self.minimize(graph, &mut is_cancelled);
        }

        let parts = components::split(std::mem::take(graph));
        debug!(components = parts.len(), "minimizing components separately");
        let mut report = SweepReport::default();
        let mut failure = None;
        let mut done = Vec::with_capacity(parts.len());
        for mut part in parts {
            if failure.is_none() {
                match self.minimize(&mut part, &mut is_cancelled) {
                    Ok(r) => report.merge(r),
                    Err(err) => failure = Some(err),
                }
            }
            done.push(part);
        }
        *graph = components::recombine(done);
        match failure {
            Some(err) => Err(err),
            None => Ok(report),
        }
    }

    fn minimize(
        &self,
        graph: &mut LGraph,
        is_cancelled: &mut dyn FnMut() -> bool,
    ) -> Result<SweepReport> {
        let mut report = SweepReport::default();

        if self.options.hierarchical {
            for node in compound_nodes(graph) {
                let Some(mut nested) = graph.take_nested(node) else {
                    continue;
                };
                let result = self.minimize(&mut nested, is_cancelled);
                graph.set_nested(node, nested);
                report.merge(result?);
            }
            adopt_nested_boundaries(graph);
        }

        report.merge(self.settle(graph, &[], is_cancelled)?);
        report.crossings = count_hierarchy(graph);
        Ok(report)
    }

    /// Sweeps one graph level with the layers in `fixed` held in place, then sweeps again every
    /// nested graph whose boundary dummies the write-back reordered, with those boundaries fixed.
    fn settle(
        &self,
        graph: &mut LGraph,
        fixed: &[usize],
        is_cancelled: &mut dyn FnMut() -> bool,
    ) -> Result<SweepReport> {
        let (mut report, resynced) = self.sweep_level(graph, fixed, is_cancelled)?;
        if !self.options.hierarchical {
            return Ok(report);
        }
        for node in resynced {
            let boundaries = boundary_layers(graph, node);
            let Some(mut nested) = graph.take_nested(node) else {
                continue;
            };
            debug!(
                node = %graph.node(node).name,
                "boundary reordered, sweeping nested graph again"
            );
            let result = self.settle(&mut nested, &boundaries, is_cancelled);
            graph.set_nested(node, nested);
            report.merge(result?);
        }
        Ok(report)
    }

    /// Alternating passes over one level, then write-back. Returns the pass report (without a
    /// crossing count) and the compound nodes whose boundary dummies were reordered.
    fn sweep_level(
        &self,
        graph: &mut LGraph,
        fixed: &[usize],
        is_cancelled: &mut dyn FnMut() -> bool,
    ) -> Result<(SweepReport, Vec<NodeId>)> {
        let mut state = SweepState::prepare(graph);
        let mut best: Option<(u64, SweepState)> = (!self.heuristic.always_improves())
            .then(|| (level_crossings(graph, &state), state.clone()));

        let mut forward = true;
        let mut passes = 0;
        let mut improved = false;
        let mut cancelled = false;
        while passes < self.options.max_sweeps {
            if is_cancelled() {
                cancelled = true;
                break;
            }
            let changed = self.sweep_once(graph, &mut state, fixed, forward, passes == 0)?;
            passes += 1;
            improved |= changed;
            debug!(pass = passes, forward, changed, "sweep pass");

            let mut stop = !changed;
            if !forward && let Some((best_cc, best_state)) = best.as_mut() {
                let cc = level_crossings(graph, &state);
                debug!(pass = passes, crossings = cc, best = *best_cc, "recount");
                if cc < *best_cc {
                    *best_cc = cc;
                    *best_state = state.clone();
                } else if cc > *best_cc {
                    warn!(pass = passes, crossings = cc, best = *best_cc, "sweep regressed, reverting");
                    state = best_state.clone();
                    stop = true;
                }
            }
            if stop {
                break;
            }
            forward = !forward;
        }

        if let Some((best_cc, best_state)) = best {
            let cc = level_crossings(graph, &state);
            if cc > best_cc {
                warn!(crossings = cc, best = best_cc, "final order regressed, reverting");
                state = best_state;
            }
        }

        let resynced = state.apply(graph);
        let report = SweepReport {
            passes,
            improved,
            crossings: 0,
            cancelled,
        };
        Ok((report, resynced))
    }

    /// Runs one pass. Returns whether any node or port moved.
    fn sweep_once(
        &self,
        graph: &LGraph,
        state: &mut SweepState,
        fixed: &[usize],
        forward: bool,
        is_first_sweep: bool,
    ) -> Result<bool> {
        let n = state.layer_count();
        if n == 0 {
            return Ok(false);
        }
        let layers: Vec<usize> = if forward {
            (0..n).collect()
        } else {
            (0..n).rev().collect()
        };
        let facing = if forward {
            PortSide::East
        } else {
            PortSide::West
        };

        let mut changed = false;
        if !fixed.contains(&layers[0]) {
            changed |= self
                .heuristic
                .set_first_layer_order(graph, state, forward)?;
        }
        for pair in layers.windows(2) {
            let (previous, current) = (pair[0], pair[1]);
            if self.options.distribute_ports {
                changed |= self
                    .port_distributor
                    .distribute_ports_on_side(graph, state, previous, facing)?;
            }
            if !fixed.contains(&current) {
                changed |= self.heuristic.minimize_crossings(
                    graph,
                    state,
                    current,
                    forward,
                    is_first_sweep,
                )?;
            }
            if self.options.distribute_ports {
                changed |= self
                    .port_distributor
                    .distribute_ports_while_sweeping(graph, state, current, forward)?;
            }
        }
        Ok(changed)
    }
}

/// Crossings a sweep of one level can influence: the level itself plus the nested boundary
/// crossings port distribution trades against it.
fn level_crossings(graph: &LGraph, state: &SweepState) -> u64 {
    count_all_crossings(graph, state) + count_nested_boundaries(graph, state)
}

/// Nested layers of `node` that hold the boundary dummies of its hierarchical ports.
fn boundary_layers(graph: &LGraph, node: NodeId) -> Vec<usize> {
    let Some(layers) = graph.node(node).nested().map(|g| g.layers().len()) else {
        return Vec::new();
    };
    [
        (PortSide::West, 0),
        (PortSide::East, layers.saturating_sub(1)),
    ]
    .into_iter()
    .filter(|&(side, _)| {
        graph
            .ports_on_side(node, side)
            .iter()
            .any(|&p| graph.port(p).dummy.is_some())
    })
    .map(|(_, layer)| layer)
    .collect()
}
