//! Performance benchmarks for imageops-segment
//!
//! Measures the full pipeline at typical photo sizes and the individual
//! stages at working resolution.

use criterion::*;
use image::Rgba;
use imageops_segment::stages::{
    close, cluster_colors, downscale, estimate_border_model, flood_fill_background,
    foreground_probability, gaussian_smooth, sobel_edges, threshold_mask, to_grayscale,
    FloodFillParams,
};
use imageops_segment::{
    BackgroundRemover, CancellationToken, FusionWeights, Image, MaskBand, SegmentationConfig,
};
use itertools::iproduct;
use std::hint::black_box;

/// Helper function to create a product-shot style image: a shaded ellipse on a
/// slightly noisy light background
fn create_product_image(width: u32, height: u32) -> Image<Rgba<u8>> {
    let mut image: Image<Rgba<u8>> = Image::new(width, height);
    let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
    let (rx, ry) = (width as f32 * 0.3, height as f32 * 0.35);

    iproduct!(0..height, 0..width).for_each(|(y, x)| {
        let dx = (x as f32 - cx) / rx;
        let dy = (y as f32 - cy) / ry;
        let pixel = if dx.hypot(dy) < 1.0 {
            let shade = (dy * 40.0) as i32;
            let v = |base: i32| (base + shade).clamp(0, 255) as u8;
            Rgba([v(150), v(60), v(40), 255])
        } else {
            let noise = ((x * 13 + y * 7) % 11) as u8;
            Rgba([230 + noise, 228 + noise, 222 + noise, 255])
        };
        image.put_pixel(x, y, pixel);
    });

    image
}

/// Benchmark the full pipeline across different image sizes
fn bench_remove_background(c: &mut Criterion) {
    let sizes = vec![
        (256, 256),   // Below the working limit
        (640, 480),   // VGA
        (1920, 1080), // HD
    ];

    let mut group = c.benchmark_group("remove_background");
    group.sample_size(10);

    let remover = BackgroundRemover::default();
    let token = CancellationToken::new();
    for (width, height) in sizes {
        group.throughput(Throughput::Elements(u64::from(width * height)));
        let image = create_product_image(width, height);

        group.bench_with_input(
            BenchmarkId::new("default_config", format!("{width}x{height}")),
            &image,
            |b, img| b.iter(|| black_box(remover.remove_background(img, &token).unwrap())),
        );
    }

    group.finish();
}

/// Benchmark the effect of the working resolution limit
fn bench_working_resolution(c: &mut Criterion) {
    let image = create_product_image(1920, 1080);
    let token = CancellationToken::new();

    let mut group = c.benchmark_group("working_resolution");
    group.sample_size(10);

    for max_working_dim in [128, 256, 512] {
        let remover = BackgroundRemover::new(SegmentationConfig {
            max_working_dim,
            ..Default::default()
        })
        .unwrap();

        group.bench_with_input(
            BenchmarkId::new("matte", max_working_dim),
            &image,
            |b, img| b.iter(|| black_box(remover.matte(img, &token).unwrap())),
        );
    }

    group.finish();
}

/// Benchmark individual stages on a 512x384 working image
fn bench_stages(c: &mut Criterion) {
    let source = create_product_image(512, 384);
    let working = downscale(&source, 512).unwrap().image;
    let token = CancellationToken::new();
    let model = estimate_border_model(&working);
    let edges = sobel_edges(&to_grayscale(&working));
    let clusters = cluster_colors(&working, 5, 12, false, &token).unwrap();
    let probability =
        foreground_probability(&working, &model, &clusters, &edges, &FusionWeights::default());
    let mask = threshold_mask(&probability, &MaskBand::default());

    let mut group = c.benchmark_group("stages");
    group.sample_size(20);
    group.throughput(Throughput::Elements(512 * 384));

    group.bench_function("downscale_1920x1080", |b| {
        let large = create_product_image(1920, 1080);
        b.iter(|| black_box(downscale(&large, 512).unwrap()))
    });
    group.bench_function("sobel_edges", |b| {
        b.iter(|| black_box(sobel_edges(&to_grayscale(&working))))
    });
    group.bench_function("border_model", |b| {
        b.iter(|| black_box(estimate_border_model(&working)))
    });
    for k in [3usize, 5, 8] {
        group.bench_with_input(BenchmarkId::new("kmeans", k), &k, |b, &k| {
            b.iter(|| black_box(cluster_colors(&working, k, 12, false, &token).unwrap()))
        });
    }
    group.bench_function("probability", |b| {
        b.iter(|| {
            black_box(foreground_probability(
                &working,
                &model,
                &clusters,
                &edges,
                &FusionWeights::default(),
            ))
        })
    });
    group.bench_function("flood_fill", |b| {
        let params = FloodFillParams {
            seed_threshold: 0.35,
            max_color_step: model.threshold() * 0.8,
            absorb_ceiling: 0.5,
            background_probability: 0.1,
        };
        b.iter_batched(
            || probability.clone(),
            |mut map| black_box(flood_fill_background(&working, &mut map, &params, &token).unwrap()),
            BatchSize::SmallInput,
        )
    });
    group.bench_function("closing_r2", |b| b.iter(|| black_box(close(&mask, 2))));
    group.bench_function("gaussian_r2", |b| {
        b.iter(|| black_box(gaussian_smooth(&mask, 2)))
    });

    group.finish();
}

/// Benchmark memory allocation patterns for a batch of small images
fn bench_small_images(c: &mut Criterion) {
    let images: Vec<Image<Rgba<u8>>> = (0..16)
        .map(|i| create_product_image(48 + i * 4, 48))
        .collect();
    let remover = BackgroundRemover::default();
    let token = CancellationToken::new();

    c.bench_function("small_images_sequential", |b| {
        b.iter(|| {
            for image in &images {
                black_box(remover.remove_background(image, &token).unwrap());
            }
        })
    });
}

criterion_group!(
    benches,
    bench_remove_background,
    bench_working_resolution,
    bench_stages,
    bench_small_images,
);
criterion_main!(benches);
