use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use wordglobe::config::{Config, PlacementConfig, PlacementStrategy};
use wordglobe::ingest::parse_keywords;
use wordglobe::ir::Keyword;
use wordglobe::placement::place_labels;
use wordglobe::projection::{Viewport, project};
use wordglobe::render::render_svg;
use wordglobe::scene::{FrameInput, PointerEvent, Scene, step};

fn fixture_keywords() -> Vec<Keyword> {
    let input = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/benches/fixtures/keywords_40.txt"
    ));
    parse_keywords(input).expect("fixture parse failed")
}

fn synthetic_keywords(count: usize) -> Vec<Keyword> {
    (0..count)
        .map(|i| Keyword::new(format!("word{i}"), 1.0 - i as f64 / count.max(1) as f64))
        .collect()
}

fn bench_placement(c: &mut Criterion) {
    let mut group = c.benchmark_group("placement");
    for count in [10usize, 20, 40] {
        let keywords = synthetic_keywords(count);
        for (name, config) in [
            ("scatter", PlacementConfig::default()),
            ("scatter_light", PlacementConfig::light()),
            (
                "spiral",
                PlacementConfig {
                    strategy: PlacementStrategy::Spiral,
                    ..PlacementConfig::default()
                },
            ),
        ] {
            let config = PlacementConfig {
                seed: Some(7),
                ..config
            };
            group.bench_with_input(BenchmarkId::new(name, count), &keywords, |b, keywords| {
                b.iter(|| {
                    let placement = place_labels(black_box(keywords), &config);
                    black_box(placement.stats.relax_rounds);
                });
            });
        }
    }
    group.finish();
}

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");
    let mut config = Config::default();
    config.placement.seed = Some(7);
    let scene = Scene::new(&fixture_keywords(), true, &config);
    let viewport = Viewport::new(config.render.width, config.render.height);

    group.bench_function("project_40", |b| {
        b.iter(|| {
            let projected = project(
                black_box(&scene.placement().labels),
                black_box(0.7),
                &viewport,
                &config.projection,
            );
            black_box(projected.len());
        });
    });

    let hover = FrameInput::new(vec![PointerEvent::Move { x: 450.0, y: 320.0 }]);
    group.bench_function("step_40", |b| {
        b.iter(|| {
            let next = step(scene.clone(), black_box(1.0 / 60.0), &hover, &config);
            black_box(next.projected().len());
        });
    });

    let stepped = step(scene.clone(), 1.0 / 60.0, &hover, &config);
    group.bench_function("render_svg_40", |b| {
        b.iter(|| {
            let svg = render_svg(black_box(&stepped), &config);
            black_box(svg.len());
        });
    });
    group.finish();
}

criterion_group!(benches, bench_placement, bench_frame);
criterion_main!(benches);
