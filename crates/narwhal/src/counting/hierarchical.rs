//! Crossing counts across the boundary of a compound node.

use super::CrossingsCounter;
use crate::error::Result;
use crate::state::{PortOrder, PortPositions};
use narwhal_lgraph::{GraphError, LGraph, NodeId, PortSide};

/// A [`CrossingsCounter`] scoped to a compound node's nested graph, between the boundary dummies
/// of one outer side and the nested layer beside them.
///
/// It keeps its own position table sized to the nested graph, so it never touches the outer
/// sweep state. Counts are meant to be added to the outer count of the matching ports.
#[derive(Debug, Clone)]
pub struct NestedCounter<'g> {
    nested: &'g LGraph,
    ports: PortOrder,
    counter: CrossingsCounter,
}

impl<'g> NestedCounter<'g> {
    /// Returns `None` for NORTH and SOUTH, which have no boundary layer.
    pub fn new(graph: &'g LGraph, node: NodeId, outer_side: PortSide) -> Result<Option<Self>> {
        if !outer_side.is_east_west() {
            return Ok(None);
        }
        let nested = graph
            .node(node)
            .nested()
            .ok_or(GraphError::MissingNestedGraph { node })?;
        let Some((dummies, beside)) = graph.nested_boundary(node, outer_side) else {
            return Err(GraphError::ShallowNestedGraph {
                node,
                layers: nested.layers().len(),
            }
            .into());
        };

        let ports = PortOrder::of_graph(nested);
        let mut positions = PortPositions::new(nested.port_count());
        let inner_side = outer_side.opposed();
        let counter = if inner_side == PortSide::East {
            CrossingsCounter::between(nested, &ports, &mut positions, dummies, beside, inner_side)
        } else {
            CrossingsCounter::between(nested, &ports, &mut positions, beside, dummies, inner_side)
        };

        Ok(Some(Self {
            nested,
            ports,
            counter,
        }))
    }

    pub fn nested(&self) -> &'g LGraph {
        self.nested
    }

    /// Crossings inside the nested graph among the edges of two boundary dummies, with
    /// `upper_dummy` above and with `lower_dummy` above.
    pub fn count_both_orders(&self, upper_dummy: NodeId, lower_dummy: NodeId) -> (u64, u64) {
        self.counter
            .count_both_orders_nodes(self.nested, &self.ports, upper_dummy, lower_dummy)
    }
}
