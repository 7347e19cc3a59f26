use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use image::{Rgb, RgbImage};
use visdiff::{DiffConfig, SourceImage, compare_images, diff_rects};

fn gradient(width: u32, height: u32) -> SourceImage {
    SourceImage::from_rgb(
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(y % 251) as u8, (x % 251) as u8, ((x + 2 * y) % 251) as u8])
        }),
        "bench.png",
    )
}

fn with_row_inserted(base: &SourceImage, at: u32) -> SourceImage {
    let rgb = RgbImage::from_fn(base.width(), base.height() + 1, |x, y| {
        if y < at {
            *base.rgb().get_pixel(x, y)
        } else if y == at {
            Rgb([255, 255, 255])
        } else {
            *base.rgb().get_pixel(x, y - 1)
        }
    });
    SourceImage::from_rgb(rgb, "bench-inserted.png")
}

fn bench_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("compare");
    let left = gradient(256, 256);
    let right = with_row_inserted(&left, 128);

    let simple = DiffConfig::default();
    group.bench_function("simple_256", |b| {
        b.iter(|| compare_images(black_box(&left), black_box(&right), &simple));
    });

    let structural = DiffConfig {
        shift_aware: true,
        ..DiffConfig::default()
    };
    group.bench_function("structural_256", |b| {
        b.iter(|| compare_images(black_box(&left), black_box(&right), &structural));
    });

    group.finish();
}

fn bench_rects(c: &mut Criterion) {
    let left = gradient(256, 256);
    let right = with_row_inserted(&left, 128);
    let config = DiffConfig::default();
    let results = compare_images(&left, &right, &config);

    c.bench_function("diff_rects_simple_flood", |b| {
        b.iter(|| diff_rects(black_box(&results), (256, 256), (256, 257), &config));
    });
}

criterion_group!(benches, bench_compare, bench_rects);
criterion_main!(benches);
