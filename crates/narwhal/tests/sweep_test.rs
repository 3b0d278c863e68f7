use narwhal::counting::count_all_crossings;
use narwhal::lgraph::{GraphError, LGraph, NodeId, PortId, PortSide};
use narwhal::{
    CrossMinOptions, Error, HeuristicKind, LayerSweepCrossingMinimizer, SweepReport, SweepState,
};

fn layer_names(g: &LGraph, layer: usize) -> Vec<&str> {
    g.layer(layer)
        .iter()
        .map(|&n| g.node(n).name.as_str())
        .collect()
}

fn link(g: &mut LGraph, from: &str, to: &str) {
    let (Some(a), Some(b)) = (g.node_by_name(from), g.node_by_name(to)) else {
        panic!("unknown node {from} or {to}");
    };
    let p = g.add_port(a, PortSide::East);
    let q = g.add_port(b, PortSide::West);
    g.add_edge(p, q);
}

fn graph(layers: &[&[&str]], edges: &[(&str, &str)]) -> LGraph {
    let mut g = LGraph::new();
    for (i, names) in layers.iter().enumerate() {
        for name in *names {
            g.add_node(i, *name);
        }
    }
    for (from, to) in edges {
        link(&mut g, from, to);
    }
    g
}

/// One crossing between layers 0 and 1, none between 1 and 2.
fn three_layers() -> LGraph {
    graph(
        &[&["a", "b"], &["c", "d"], &["e", "f"]],
        &[("a", "d"), ("b", "c"), ("c", "e"), ("d", "f")],
    )
}

fn total_crossings(g: &LGraph) -> u64 {
    count_all_crossings(g, &SweepState::prepare(g))
}

#[test]
fn one_forward_sweep_removes_the_crossing() {
    let mut g = three_layers();
    assert_eq!(total_crossings(&g), 1);

    let options = CrossMinOptions {
        max_sweeps: 1,
        ..Default::default()
    };
    let report = LayerSweepCrossingMinimizer::new(options)
        .process(&mut g)
        .unwrap();
    assert_eq!(
        report,
        SweepReport {
            passes: 1,
            improved: true,
            crossings: 0,
            cancelled: false,
        }
    );
    assert_eq!(layer_names(&g, 0), vec!["a", "b"]);
    assert_eq!(layer_names(&g, 1), vec!["d", "c"]);
    assert_eq!(layer_names(&g, 2), vec!["f", "e"]);
    assert_eq!(total_crossings(&g), 0);
}

#[test]
fn sweeping_stops_after_a_pass_without_changes() {
    let mut g = three_layers();
    let report = narwhal::minimize_crossings(&mut g, &CrossMinOptions::default()).unwrap();
    assert_eq!(report.passes, 2);
    assert_eq!(report.crossings, 0);
    assert_eq!(layer_names(&g, 1), vec!["d", "c"]);
}

#[test]
fn a_crossing_free_graph_is_left_alone() {
    let mut g = graph(
        &[&["a", "b"], &["c", "d"]],
        &[("a", "c"), ("b", "d")],
    );
    let report = narwhal::minimize_crossings(&mut g, &CrossMinOptions::default()).unwrap();
    assert_eq!(report.passes, 1);
    assert!(!report.improved);
    assert_eq!(layer_names(&g, 0), vec!["a", "b"]);
    assert_eq!(layer_names(&g, 1), vec!["c", "d"]);
}

#[test]
fn empty_graphs_report_nothing() {
    let mut g = LGraph::new();
    let report = narwhal::minimize_crossings(&mut g, &CrossMinOptions::default()).unwrap();
    assert_eq!(report, SweepReport::default());
}

#[test]
fn two_sided_mode_untangles_a_reversed_layer() {
    let mut g = graph(
        &[&["l0", "l1", "l2", "l3"], &["r3", "r2", "r1", "r0"]],
        &[("l0", "r0"), ("l1", "r1"), ("l2", "r2"), ("l3", "r3")],
    );
    assert_eq!(total_crossings(&g), 6);
    let options = CrossMinOptions {
        heuristic: HeuristicKind::TwoSidedGreedySwitch,
        ..Default::default()
    };
    let report = narwhal::minimize_crossings(&mut g, &options).unwrap();
    assert_eq!(report.crossings, 0);
    assert_eq!(total_crossings(&g), 0);
}

#[test]
fn barycenter_mode_reaches_the_crossing_free_order() {
    let mut g = three_layers();
    let options = CrossMinOptions {
        heuristic: HeuristicKind::Barycenter,
        ..Default::default()
    };
    let report = narwhal::minimize_crossings(&mut g, &options).unwrap();
    assert_eq!(report.crossings, 0);
    assert_eq!(layer_names(&g, 1), vec!["d", "c"]);
    assert_eq!(layer_names(&g, 2), vec!["f", "e"]);
}

#[test]
fn recounting_heuristics_never_end_worse_than_they_started() {
    let edges = [
        ("a", "f"),
        ("a", "g"),
        ("b", "e"),
        ("c", "h"),
        ("d", "e"),
        ("e", "k"),
        ("f", "i"),
        ("g", "j"),
        ("h", "i"),
        ("h", "k"),
    ];
    let layers: [&[&str]; 3] = [
        &["a", "b", "c", "d"],
        &["e", "f", "g", "h"],
        &["i", "j", "k"],
    ];
    for heuristic in [
        HeuristicKind::TwoSidedGreedySwitch,
        HeuristicKind::Barycenter,
    ] {
        let mut g = graph(&layers, &edges);
        let before = total_crossings(&g);
        let options = CrossMinOptions {
            heuristic,
            ..Default::default()
        };
        let report = narwhal::minimize_crossings(&mut g, &options).unwrap();
        assert!(report.crossings <= before, "{heuristic:?}");
        assert_eq!(report.crossings, total_crossings(&g), "{heuristic:?}");
    }
}

#[test]
fn results_are_deterministic() {
    let run = || {
        let mut g = three_layers();
        narwhal::minimize_crossings(&mut g, &CrossMinOptions::default()).unwrap();
        (0..3)
            .map(|i| g.layer(i).to_vec())
            .collect::<Vec<Vec<NodeId>>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn invalid_graphs_are_rejected_untouched() {
    let mut g = three_layers();
    let a = g.node_by_name("a").unwrap();
    let e = g.node_by_name("e").unwrap();
    let p = g.add_port(a, PortSide::East);
    let q = g.add_port(e, PortSide::West);
    let bad = g.add_edge(p, q);

    let err = narwhal::minimize_crossings(&mut g, &CrossMinOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidGraph(GraphError::NonAdjacentEdge { edge }) if edge == bad
    ));
    assert_eq!(
        err.to_string(),
        format!("invalid graph state: edge {bad} spans non-adjacent layers")
    );
    assert_eq!(layer_names(&g, 1), vec!["c", "d"]);
}

#[test]
fn cancellation_is_checked_before_every_pass() {
    let mut g = three_layers();
    let minimizer = LayerSweepCrossingMinimizer::new(CrossMinOptions::default());
    let report = minimizer.process_with(&mut g, || true).unwrap();
    assert!(report.cancelled);
    assert_eq!(report.passes, 0);
    assert_eq!(report.crossings, 1);
    assert_eq!(layer_names(&g, 1), vec!["c", "d"]);

    let mut g = three_layers();
    let mut polls = 0;
    let report = minimizer
        .process_with(&mut g, || {
            polls += 1;
            polls > 1
        })
        .unwrap();
    assert!(report.cancelled);
    assert_eq!(report.passes, 1);
    assert_eq!(report.crossings, 0);
}

#[test]
fn components_are_minimized_separately_and_stacked() {
    let mut g = graph(
        &[&["a", "x", "b"], &["d", "y", "c"]],
        &[("a", "c"), ("b", "d"), ("x", "y")],
    );
    let options = CrossMinOptions {
        separate_components: true,
        ..Default::default()
    };
    let report = narwhal::minimize_crossings(&mut g, &options).unwrap();
    assert_eq!(report.crossings, 0);
    assert_eq!(layer_names(&g, 0), vec!["a", "x", "b"]);
    assert_eq!(layer_names(&g, 1), vec!["c", "y", "d"]);
    assert_eq!(total_crossings(&g), 0);
    assert!(g.validate().is_ok());
}

/// A compound node alone in layer 0 whose nested graph holds one crossing.
fn compound_with_crossing() -> (LGraph, NodeId) {
    let inner = graph(
        &[&["a", "b"], &["c", "d"]],
        &[("a", "d"), ("b", "c")],
    );
    let mut g = LGraph::new();
    let c = g.add_node(0, "compound");
    g.set_nested(c, inner);
    (g, c)
}

#[test]
fn nested_graphs_are_minimized_first() {
    let (mut g, c) = compound_with_crossing();
    let report = narwhal::minimize_crossings(&mut g, &CrossMinOptions::default()).unwrap();
    assert_eq!(report.crossings, 0);
    assert!(report.improved);
    let nested = g.node(c).nested().unwrap();
    assert_eq!(layer_names(nested, 1), vec!["d", "c"]);
}

#[test]
fn nested_graphs_are_skipped_when_not_hierarchical() {
    let (mut g, c) = compound_with_crossing();
    let options = CrossMinOptions {
        hierarchical: false,
        ..Default::default()
    };
    narwhal::minimize_crossings(&mut g, &options).unwrap();
    let nested = g.node(c).nested().unwrap();
    assert_eq!(layer_names(nested, 1), vec!["c", "d"]);
}

#[test]
fn ports_are_left_in_place_when_distribution_is_off() {
    let mut g = LGraph::new();
    let x = g.add_node(0, "x");
    let y = g.add_node(0, "y");
    let c = g.add_node(1, "c");
    let px = g.add_port(x, PortSide::East);
    let py = g.add_port(y, PortSide::East);
    let bottom: PortId = g.add_port(c, PortSide::West);
    let top: PortId = g.add_port(c, PortSide::West);
    g.add_edge(px, bottom);
    g.add_edge(py, top);

    let mut off = g.clone();
    let options = CrossMinOptions {
        distribute_ports: false,
        ..Default::default()
    };
    let report = narwhal::minimize_crossings(&mut off, &options).unwrap();
    assert_eq!(off.ports_along(c, PortSide::West), vec![top, bottom]);
    assert_eq!(report.crossings, 1);

    let report = narwhal::minimize_crossings(&mut g, &CrossMinOptions::default()).unwrap();
    assert_eq!(g.ports_along(c, PortSide::West), vec![bottom, top]);
    assert_eq!(report.crossings, 0);
}

#[test]
fn version_is_exposed() {
    assert_eq!(narwhal::VERSION, env!("CARGO_PKG_VERSION"));
}
