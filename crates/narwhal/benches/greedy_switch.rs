use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use narwhal::lgraph::{LGraph, PortSide};
use narwhal::{CrossMinOptions, HeuristicKind, LayerSweepCrossingMinimizer};
use std::hint::black_box;
use std::time::Duration;

#[derive(Debug, Clone)]
struct GraphSpec {
    layers: usize,
    width: usize,
    /// `(layer, from, to)`: an edge from node `from` of `layer` to node `to` of `layer + 1`.
    edges: Vec<(usize, usize, usize)>,
}

impl GraphSpec {
    fn build(&self) -> LGraph {
        let mut g = LGraph::new();
        let nodes: Vec<Vec<_>> = (0..self.layers)
            .map(|l| {
                (0..self.width)
                    .map(|i| g.add_node(l, format!("n{l}_{i}")))
                    .collect()
            })
            .collect();
        for &(layer, from, to) in &self.edges {
            let p = g.add_port(nodes[layer][from], PortSide::East);
            let q = g.add_port(nodes[layer + 1][to], PortSide::West);
            g.add_edge(p, q);
        }
        g
    }
}

/// Layers of equal width with a shuffled fan of edges between every pair of neighbors.
fn build_spec(layers: usize, width: usize, fanout: usize) -> GraphSpec {
    // Fixed LCG so every run measures the same graph.
    let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = |bound: usize| {
        seed = seed
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        ((seed >> 33) as usize) % bound
    };

    let mut edges = Vec::new();
    for layer in 0..layers.saturating_sub(1) {
        for from in 0..width {
            for _ in 0..fanout {
                edges.push((layer, from, next(width)));
            }
        }
    }
    GraphSpec {
        layers,
        width,
        edges,
    }
}

fn bench_layer_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("layer_sweep");
    group.measurement_time(Duration::from_secs(10));

    let cases = [
        ("l4_w10_f2", 4usize, 10usize, 2usize),
        ("l8_w30_f2", 8usize, 30usize, 2usize),
        ("l12_w60_f3", 12usize, 60usize, 3usize),
    ];

    for heuristic in [
        HeuristicKind::OneSidedGreedySwitch,
        HeuristicKind::TwoSidedGreedySwitch,
    ] {
        let minimizer = LayerSweepCrossingMinimizer::new(CrossMinOptions {
            heuristic,
            ..Default::default()
        });
        for (name, layers, width, fanout) in cases {
            let spec = build_spec(layers, width, fanout);
            group.bench_with_input(
                BenchmarkId::new(format!("{heuristic:?}"), name),
                &spec,
                |b, spec| {
                    b.iter_batched(
                        || spec.build(),
                        |mut g| {
                            let report = minimizer.process(black_box(&mut g));
                            black_box(report.map(|r| r.crossings).unwrap_or_default());
                        },
                        BatchSize::LargeInput,
                    )
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_layer_sweep);
criterion_main!(benches);
