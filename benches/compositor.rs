use afterimage::capture::{CaptureConfig, Frame, MockSource, VideoSource};
use afterimage::compose::{composite, draw_cover, EffectParams};
use afterimage::history::FrameStore;
use afterimage::surface::Surface;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Builds a filled frame pool plus a live frame, all from the mock
/// gradient source.
fn filled_store(width: u32, height: u32, captures: usize) -> (FrameStore, Frame) {
    let mut source = MockSource::new();
    source
        .open(&CaptureConfig::with_dimensions(width, height))
        .unwrap();

    let mut store = FrameStore::with_capacity(60);
    store.initialize(width, height);
    let mut frame = Frame::new(width, height);
    for _ in 0..captures {
        source.read_into(&mut frame).unwrap();
        store.capture(&frame).unwrap();
    }
    source.read_into(&mut frame).unwrap();
    (store, frame)
}

fn criterion_benchmark(c: &mut Criterion) {
    let (store, live) = filled_store(320, 240, 60);
    let mut surface = Surface::new(480, 854, 1.0);

    let mut group = c.benchmark_group("composite");
    group.throughput(Throughput::Elements(
        surface.width() as u64 * surface.height() as u64,
    ));
    for samples in [2usize, 5, 9] {
        let params = EffectParams {
            effective_window: 60,
            sample_count: samples,
        };
        group.bench_function(BenchmarkId::new("layers", samples), |b| {
            b.iter(|| composite(black_box(&store), &params, &live, &mut surface).unwrap());
        });
    }
    group.finish();

    c.bench_function("draw_cover", |b| {
        b.iter(|| draw_cover(&mut surface, black_box(&live), 0.2));
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
