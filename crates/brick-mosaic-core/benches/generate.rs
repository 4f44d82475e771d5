use brick_mosaic_core::prelude::*;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

fn generate_pixels(size: u32) -> Vec<Rgb> {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let palette = Palette::default_bricks();
    let colors: Vec<Rgb> = palette.iter().map(|(_, rgb)| rgb).collect();
    // 4x4 blocks so the packer has runs to work with
    let mut blocks = Vec::new();
    for _ in 0..(size / 4 + 1) * (size / 4 + 1) {
        blocks.push(colors[rng.gen_range(0..colors.len())]);
    }
    let stride = size / 4 + 1;
    (0..size * size)
        .map(|i| {
            let (x, y) = (i % size, i / size);
            blocks[((y / 4) * stride + x / 4) as usize]
        })
        .collect()
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    let palette = Palette::default_bricks();
    let inventory: Inventory = palette
        .colors()
        .iter()
        .flat_map(|c| {
            [(1, 1, 200), (1, 2, 100), (2, 2, 60), (2, 4, 30), (1, 4, 40)]
                .into_iter()
                .map(move |(w, h, q)| InventoryEntry::new(c.id, w, h, q))
        })
        .collect();

    for size in [32u32, 64, 128] {
        let pixels = generate_pixels(size);
        group.throughput(Throughput::Elements((size * size) as u64));
        for strict in [true, false] {
            let name = if strict { "strict" } else { "unconstrained" };
            group.bench_with_input(BenchmarkId::new(name, size), &pixels, |b, pixels| {
                b.iter(|| {
                    let out = generate(pixels, size, size, &inventory, strict, &palette);
                    black_box(out)
                });
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_generate);
criterion_main!(benches);
