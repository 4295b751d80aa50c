use criterion::{Criterion, criterion_group, criterion_main};
use manatee::core::Viewport;
use manatee::hist::{BinSpec, Binner};
use manatee::plot::{AxisTarget, PlotSurface, Plotter, PlotterConfig, StyleOverrides};
use manatee::render::NullRenderer;
use std::hint::black_box;

fn samples(count: usize) -> (Vec<f64>, Vec<f64>) {
    let values = (0..count)
        .map(|i| ((i as f64) * 0.618_033_988_7).fract() * 100.0)
        .collect();
    let weights = (0..count).map(|i| 0.5 + (i % 7) as f64 * 0.25).collect();
    (values, weights)
}

fn bench_weighted_hist_100k(c: &mut Criterion) {
    let (values, weights) = samples(100_000);
    let binner = Binner::new(BinSpec::count_in(200, 0.0, 100.0));

    c.bench_function("weighted_hist_100k", |b| {
        b.iter(|| {
            let _ = binner
                .hist(black_box(values.as_slice()), Some(black_box(weights.as_slice())))
                .expect("hist should succeed");
        })
    });
}

fn bench_series_arithmetic_1k_bins(c: &mut Criterion) {
    let (values, weights) = samples(50_000);
    let binner = Binner::new(BinSpec::count_in(1_000, 0.0, 100.0));
    let kept = binner
        .hist(&values[..25_000], Some(&weights[..25_000]))
        .expect("kept hist");
    let base = binner.hist(&values, Some(weights.as_slice())).expect("base hist");

    c.bench_function("efficiency_1k_bins", |b| {
        b.iter(|| {
            let _ = black_box(&kept)
                .efficiency(black_box(&base))
                .expect("efficiency should succeed");
        })
    });
}

fn bench_plot_compose_log_errorbars(c: &mut Criterion) {
    let (values, weights) = samples(20_000);
    let binner = Binner::new(BinSpec::count_in(400, 0.0, 100.0));
    let hist = binner.hist(&values, Some(weights.as_slice())).expect("hist");

    let mut plotter = Plotter::<f64>::new(PlotterConfig::default().with_log(true));
    plotter.add(
        hist.clone(),
        AxisTarget::Main,
        None,
        StyleOverrides::new().errorbars(true).markers(true),
    );
    plotter.add(
        hist.cumulative_right(),
        AxisTarget::Twin,
        None,
        StyleOverrides::new().label("cumulative"),
    );
    let mut surface = PlotSurface::new();
    plotter.finish(&mut surface, None).expect("finish");
    let mut renderer = NullRenderer::default();
    let viewport = Viewport::new(1600, 900);

    c.bench_function("plot_compose_log_errorbars_400", |b| {
        b.iter(|| {
            surface
                .render(black_box(&mut renderer), black_box(viewport))
                .expect("render should succeed");
        })
    });
}

criterion_group!(
    benches,
    bench_weighted_hist_100k,
    bench_series_arithmetic_1k_bins,
    bench_plot_compose_log_errorbars
);
criterion_main!(benches);
