use criterion::{criterion_group, criterion_main, Criterion};
use screenmatch::{
    detect_edges, EdgeParams, EdgeStrategy, ExactStrategy, Kernel, MatchMode, NccScalar,
    OwnedImage, SearchImage, TemplatePlan,
};
use std::hint::black_box;

fn make_rgb(width: usize, height: usize) -> OwnedImage<[u8; 3]> {
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let value = ((x * 13) ^ (y * 7) ^ (x * y)) & 0xFF;
            data.push([value as u8, (x & 0xFF) as u8, (y & 0xFF) as u8]);
        }
    }
    OwnedImage::new(data, width, height).unwrap()
}

fn make_luma(width: usize, height: usize) -> OwnedImage<f32> {
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let value = ((x * 13) ^ (y * 7) ^ (x * y)) & 0xFF;
            data.push(value as f32 / 255.0);
        }
    }
    OwnedImage::new(data, width, height).unwrap()
}

fn crop<T: Copy>(img: &OwnedImage<T>, x0: usize, y0: usize, w: usize, h: usize) -> OwnedImage<T> {
    let mut out = Vec::with_capacity(w * h);
    for y in y0..y0 + h {
        out.extend_from_slice(&img.row(y)[x0..x0 + w]);
    }
    OwnedImage::new(out, w, h).unwrap()
}

fn bench_exact(c: &mut Criterion) {
    let haystack = make_rgb(1280, 800);
    let needle = crop(&haystack, 900, 600, 64, 32);
    let strict = ExactStrategy::new(None);
    let tolerant = ExactStrategy::new(Some(0.95));

    c.bench_function("exact_single_strict", |b| {
        b.iter(|| black_box(strict.search(&needle, &haystack, MatchMode::Single)));
    });
    c.bench_function("exact_all_strict", |b| {
        b.iter(|| black_box(strict.search(&needle, &haystack, MatchMode::All)));
    });
    c.bench_function("exact_single_tolerant", |b| {
        b.iter(|| black_box(tolerant.search(&needle, &haystack, MatchMode::Single)));
    });
}

fn bench_edge(c: &mut Criterion) {
    let haystack = make_luma(640, 400);
    let needle = crop(&haystack, 300, 200, 48, 32);
    let params = EdgeParams::default();

    c.bench_function("edge_detect_640x400", |b| {
        b.iter(|| black_box(detect_edges(&haystack, &params)));
    });

    let haystack_edges = detect_edges(&haystack, &params);
    let needle_edges = detect_edges(&needle, &params);
    let image = SearchImage::new(&haystack_edges);
    let plan = TemplatePlan::from_image(&needle_edges);
    c.bench_function("ncc_surface_scalar", |b| {
        b.iter(|| black_box(NccScalar::surface(&image, &plan).unwrap()));
    });

    #[cfg(feature = "rayon")]
    c.bench_function("ncc_surface_rayon", |b| {
        b.iter(|| black_box(screenmatch::NccRayon::surface(&image, &plan).unwrap()));
    });

    let strategy = EdgeStrategy::new(params, 0.9);
    c.bench_function("edge_search_single", |b| {
        b.iter(|| black_box(strategy.search(&needle, &haystack, MatchMode::Single).unwrap()));
    });
}

criterion_group!(benches, bench_exact, bench_edge);
criterion_main!(benches);
