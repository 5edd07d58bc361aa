use criterion::{criterion_group, criterion_main, Criterion};

use edgeview::rendering::{synthesize_edge_image, DataUriDecoder, ImageDecoder};
use edgeview::{Dimensions, FrameSampler, SceneConfig};

fn bench_synthesize(c: &mut Criterion) {
    let scene = SceneConfig::default();
    let canvas = Dimensions::new(640, 480);
    let mut sampler = FrameSampler::from_seed(1);

    c.bench_function("synthesize_edge_image_640x480", |b| {
        b.iter(|| {
            let _ = synthesize_edge_image(&mut sampler, canvas, &scene).unwrap();
        })
    });
}

fn bench_decode(c: &mut Criterion) {
    let mut sampler = FrameSampler::from_seed(2);
    let uri = synthesize_edge_image(&mut sampler, Dimensions::new(640, 480), &SceneConfig::default())
        .unwrap()
        .to_data_uri();
    let decoder = DataUriDecoder::new();

    c.bench_function("decode_data_uri_640x480", |b| {
        b.iter(|| {
            let _ = decoder.decode(&uri).unwrap();
        })
    });
}

criterion_group!(benches, bench_synthesize, bench_decode);
criterion_main!(benches);
