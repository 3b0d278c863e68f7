#![forbid(unsafe_code)]

//! Crossing minimization for layered graph drawings.
//!
//! Given an [`LGraph`](lgraph::LGraph) whose nodes are already assigned to layers, `narwhal`
//! reorders the nodes within each layer and the ports around each node so that few edges cross.
//! The search is local and deterministic: greedy switch (or barycenter) for nodes, greedy port
//! distribution for ports, driven by alternating layer sweeps. Compound nodes are handled by
//! minimizing their nested graphs first and counting across the boundary.
//!
//! ```no_run
//! use narwhal::{CrossMinOptions, lgraph::{LGraph, PortSide}};
//!
//! let mut g = LGraph::new();
//! let a = g.add_node(0, "a");
//! let b = g.add_node(1, "b");
//! let out = g.add_port(a, PortSide::East);
//! let inp = g.add_port(b, PortSide::West);
//! g.add_edge(out, inp);
//! let report = narwhal::minimize_crossings(&mut g, &CrossMinOptions::default()).unwrap();
//! assert_eq!(report.crossings, 0);
//! ```

pub use narwhal_lgraph as lgraph;

use lgraph::LGraph;

pub mod barycenter;
pub mod counting;
mod error;
pub mod greedy_switch;
pub mod heuristic;
pub mod options;
pub mod port_distribution;
pub mod state;
pub mod sweep;

pub use error::{Error, Result};
pub use heuristic::{CrossingMinimizationHeuristic, Heuristic};
pub use options::{CrossMinOptions, HeuristicKind};
pub use port_distribution::GreedyPortDistributor;
pub use state::SweepState;
pub use sweep::{LayerSweepCrossingMinimizer, SweepReport};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Runs a [`LayerSweepCrossingMinimizer`] configured by `options` on `graph`.
pub fn minimize_crossings(graph: &mut LGraph, options: &CrossMinOptions) -> Result<SweepReport> {
    LayerSweepCrossingMinimizer::new(options.clone()).process(graph)
}
