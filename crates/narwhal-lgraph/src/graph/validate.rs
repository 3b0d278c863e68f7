//! Structural validation of an [`LGraph`].

use super::{EdgeId, EdgeSpan, LGraph, NodeId, PortId, PortSide};
use crate::GraphError;

impl LGraph {
    /// Checks the contract the crossing minimizer relies on.
    ///
    /// Every node sits in exactly the layer it records, ports are grouped by side, every edge
    /// is either an EAST→WEST edge between adjacent layers or a well-formed same-layer edge, and
    /// every hierarchical port points at a boundary dummy of a nested graph with at least two
    /// layers. Nested graphs are validated recursively.
    pub fn validate(&self) -> Result<(), GraphError> {
        let mut listed = vec![false; self.nodes.len()];
        for (layer, nodes) in self.layers.iter().enumerate() {
            for &node in nodes {
                let Some(n) = self.nodes.get(node.0) else {
                    return Err(GraphError::DanglingNode { layer, node });
                };
                if n.layer != Some(layer) || listed[node.0] {
                    return Err(GraphError::LayerMismatch {
                        node,
                        listed: layer,
                        recorded: n.layer,
                    });
                }
                listed[node.0] = true;
            }
        }
        if let Some(ix) = listed.iter().position(|l| !l) {
            return Err(GraphError::UnlayeredNode { node: NodeId(ix) });
        }

        for node in &self.nodes {
            let grouped = node
                .ports
                .windows(2)
                .all(|w| self.port_side(w[0]) <= self.port_side(w[1]));
            let owned = node
                .ports
                .iter()
                .all(|p| self.ports.get(p.0).is_some_and(|port| port.node == node.id));
            if !grouped || !owned {
                return Err(GraphError::UngroupedPorts { node: node.id });
            }
        }

        for port in &self.ports {
            if let Some(edge) = port.connected_edges().find(|e| e.0 >= self.edges.len()) {
                return Err(GraphError::DanglingEdge {
                    port: port.id,
                    edge,
                });
            }
        }

        for edge in &self.edges {
            self.validate_edge(edge.id)?;
        }

        for node in &self.nodes {
            self.validate_hierarchy(node.id)?;
        }

        Ok(())
    }

    fn port_side(&self, port: PortId) -> Option<PortSide> {
        self.ports.get(port.0).map(|p| p.side)
    }

    fn validate_edge(&self, edge: EdgeId) -> Result<(), GraphError> {
        let e = &self.edges[edge.0];
        let (Some(s), Some(t)) = (self.ports.get(e.source.0), self.ports.get(e.target.0)) else {
            return Err(GraphError::DanglingPort { edge });
        };
        if self.edge_span(edge) != EdgeSpan::Invalid {
            return Ok(());
        }
        let ls = self.nodes[s.node.0].layer;
        let lt = self.nodes[t.node.0].layer;
        match (ls, lt) {
            (Some(a), Some(b)) if a.abs_diff(b) > 1 => Err(GraphError::NonAdjacentEdge { edge }),
            _ => Err(GraphError::MisplacedEdge { edge }),
        }
    }

    fn validate_hierarchy(&self, node: NodeId) -> Result<(), GraphError> {
        let n = &self.nodes[node.0];
        let nested = n.nested();

        for &port in &n.ports {
            let p = &self.ports[port.0];
            if !p.inside_connections {
                continue;
            }
            let Some(nested) = nested else {
                return Err(GraphError::MissingNestedGraph { node });
            };
            let Some(dummy) = p.dummy else {
                return Err(GraphError::MissingPortDummy { port });
            };
            if nested.layers.len() < 2 {
                return Err(GraphError::ShallowNestedGraph {
                    node,
                    layers: nested.layers.len(),
                });
            }
            let boundary = match p.side {
                PortSide::West => nested.layers.first(),
                PortSide::East => nested.layers.last(),
                PortSide::North | PortSide::South => None,
            };
            if !boundary.is_some_and(|layer| layer.contains(&dummy)) {
                return Err(GraphError::DanglingPortDummy { port, dummy });
            }
        }

        if let Some(nested) = nested {
            nested.validate().map_err(|source| GraphError::Nested {
                node,
                source: Box::new(source),
            })?;
        }
        Ok(())
    }
}
