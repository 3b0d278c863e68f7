use narwhal_lgraph::components::{recombine, split};
use narwhal_lgraph::{LGraph, NodeKind, PortSide};

fn layer_names(g: &LGraph, layer: usize) -> Vec<&str> {
    g.layer(layer)
        .iter()
        .map(|&n| g.node(n).name.as_str())
        .collect()
}

fn connect(g: &mut LGraph, from: &str, to: &str) {
    let (Some(a), Some(b)) = (g.node_by_name(from), g.node_by_name(to)) else {
        panic!("unknown node {from} or {to}");
    };
    let p = g.add_port(a, PortSide::East);
    let q = g.add_port(b, PortSide::West);
    g.add_edge(p, q);
}

/// Two components interleaved in the second layer: a→b and x→y with y above b.
fn two_components() -> LGraph {
    let mut g = LGraph::new();
    g.add_node(0, "a");
    g.add_node(0, "x");
    g.add_node(1, "y");
    g.add_node(1, "b");
    connect(&mut g, "a", "b");
    connect(&mut g, "x", "y");
    g
}

#[test]
fn split_of_an_empty_graph_is_empty() {
    assert!(split(LGraph::new()).is_empty());
}

#[test]
fn split_keeps_a_connected_graph_whole() {
    let mut g = LGraph::new();
    g.add_node(0, "a");
    g.add_node(1, "b");
    connect(&mut g, "a", "b");

    let parts = split(g);
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].node_count(), 2);
    assert_eq!(parts[0].edge_count(), 1);
}

#[test]
fn split_discovers_components_in_layer_order() {
    let parts = split(two_components());
    assert_eq!(parts.len(), 2);

    assert_eq!(layer_names(&parts[0], 0), vec!["a"]);
    assert_eq!(layer_names(&parts[0], 1), vec!["b"]);
    assert_eq!(layer_names(&parts[1], 0), vec!["x"]);
    assert_eq!(layer_names(&parts[1], 1), vec!["y"]);
    for part in &parts {
        assert_eq!(part.layers().len(), 2);
        assert_eq!(part.edge_count(), 1);
        assert!(part.validate().is_ok());
    }
}

#[test]
fn split_puts_isolated_nodes_in_their_own_component() {
    let mut g = two_components();
    g.add_node(1, "lonely");
    let parts = split(g);
    assert_eq!(parts.len(), 3);
    assert_eq!(layer_names(&parts[2], 1), vec!["lonely"]);
    assert!(parts[2].layer(0).is_empty());
}

#[test]
fn recombine_stacks_components_per_layer() {
    let g = recombine(split(two_components()));
    assert_eq!(layer_names(&g, 0), vec!["a", "x"]);
    assert_eq!(layer_names(&g, 1), vec!["b", "y"]);
    assert_eq!(g.edge_count(), 2);
    assert!(g.validate().is_ok());
}

#[test]
fn split_preserves_kinds_flags_and_nested_graphs() {
    let mut inner = LGraph::new();
    let d = inner.add_node_of_kind(0, "d", NodeKind::ExternalPort);
    inner.add_node(1, "m");

    let mut g = two_components();
    let c = g.add_node_of_kind(0, "c", NodeKind::LongEdge);
    let p = g.add_port(c, PortSide::West);
    g.set_port_dummy(p, d);
    g.set_port_order_fixed(c, true);
    g.set_nested(c, inner);

    let parts = split(g);
    assert_eq!(parts.len(), 3);
    let part = &parts[2];
    let c = part.node_by_name("c").unwrap();
    let node = part.node(c);
    assert_eq!(node.kind, NodeKind::LongEdge);
    assert!(node.port_order_fixed);
    assert_eq!(layer_names(node.nested().unwrap(), 1), vec!["m"]);
    let port = part.port(node.ports[0]);
    assert!(port.inside_connections);
    assert_eq!(port.dummy, Some(d));
    assert!(part.validate().is_ok());
}
