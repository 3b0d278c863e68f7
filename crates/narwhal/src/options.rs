//! Configuration handed in by the surrounding layout pipeline.

use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HeuristicKind {
    /// Greedy switch counting against the layer behind the sweep direction only.
    #[default]
    OneSidedGreedySwitch,
    /// Greedy switch counting against both neighbor layers.
    TwoSidedGreedySwitch,
    /// Mean neighbor position sort.
    Barycenter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CrossMinOptions {
    pub heuristic: HeuristicKind,
    /// Upper bound on the number of sweep passes per graph level.
    pub max_sweeps: usize,
    pub distribute_ports: bool,
    /// Minimize nested graphs of compound nodes before their parent graph.
    pub hierarchical: bool,
    /// Split into connected components, minimize each, and stack them back together.
    pub separate_components: bool,
}

impl Default for CrossMinOptions {
    fn default() -> Self {
        Self {
            heuristic: HeuristicKind::default(),
            max_sweeps: 32,
            distribute_ports: true,
            hierarchical: true,
            separate_components: false,
        }
    }
}

impl CrossMinOptions {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
