use crate::graph::{EdgeId, NodeId, PortId};

/// Structural violations detected by [`LGraph::validate`](crate::LGraph::validate).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("layer {layer} references unknown node {node}")]
    DanglingNode { layer: usize, node: NodeId },

    #[error("node {node} is listed in layer {listed} but records layer {recorded:?}")]
    LayerMismatch {
        node: NodeId,
        listed: usize,
        recorded: Option<usize>,
    },

    #[error("node {node} is not listed in any layer")]
    UnlayeredNode { node: NodeId },

    #[error("port {port} references unknown edge {edge}")]
    DanglingEdge { port: PortId, edge: EdgeId },

    #[error("edge {edge} references an unknown port")]
    DanglingPort { edge: EdgeId },

    #[error("ports of node {node} are not grouped by side in clockwise order")]
    UngroupedPorts { node: NodeId },

    #[error("edge {edge} spans non-adjacent layers")]
    NonAdjacentEdge { edge: EdgeId },

    #[error("edge {edge} does not attach to the port sides facing its other end")]
    MisplacedEdge { edge: EdgeId },

    #[error("node {node} has hierarchical ports but no nested graph")]
    MissingNestedGraph { node: NodeId },

    #[error("hierarchical port {port} has no boundary dummy")]
    MissingPortDummy { port: PortId },

    #[error("port {port} refers to boundary dummy {dummy} which is missing from the nested graph")]
    DanglingPortDummy { port: PortId, dummy: NodeId },

    #[error("nested graph of node {node} has {layers} layers, at least two are required")]
    ShallowNestedGraph { node: NodeId, layers: usize },

    #[error("nested graph of node {node} is invalid: {source}")]
    Nested {
        node: NodeId,
        #[source]
        source: Box<GraphError>,
    },
}
