use std::collections::HashMap;

use brick_mosaic_core::prelude::*;
use rand::{Rng, SeedableRng};

fn disjoint(pieces: &[PlacedPiece]) -> bool {
    for i in 0..pieces.len() {
        for j in (i + 1)..pieces.len() {
            if pieces[i].overlaps(&pieces[j]) {
                return false;
            }
        }
    }
    true
}

fn small_palette() -> Palette {
    Palette::new(vec![
        PaletteColor::new(1, "White", "#FFFFFF", "Whites"),
        PaletteColor::new(11, "Black", "#05131D", "Blacks"),
        PaletteColor::new(5, "Red", "#C91A09", "Reds"),
        PaletteColor::new(7, "Blue", "#0055BF", "Blues"),
        PaletteColor::new(3, "Yellow", "#F2CD37", "Yellows"),
    ])
    .unwrap()
}

/// Blocky random image (so larger pieces have a chance) plus a random inventory.
fn random_case(seed: u64) -> (u32, u32, Vec<Rgb>, Inventory) {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let w = rng.gen_range(1..=24);
    let h = rng.gen_range(1..=24);
    let palette = small_palette();
    let colors: Vec<Rgb> = palette.iter().map(|(_, rgb)| rgb).collect();
    let block = rng.gen_range(1..=4);
    let mut block_colors: HashMap<(u32, u32), Rgb> = HashMap::new();
    let mut pixels = Vec::with_capacity((w * h) as usize);
    for y in 0..h {
        for x in 0..w {
            let c = *block_colors
                .entry((x / block, y / block))
                .or_insert_with(|| colors[rng.gen_range(0..colors.len())]);
            let jitter = |v: u8, d: i16| (v as i16 + d).clamp(0, 255) as u8;
            let d = rng.gen_range(-12..=12);
            pixels.push(Rgb::new(jitter(c.r, d), jitter(c.g, d), jitter(c.b, -d)));
        }
    }
    let mut entries = Vec::new();
    for _ in 0..rng.gen_range(0..12) {
        let color = palette.colors()[rng.gen_range(0..palette.len())].id;
        entries.push(InventoryEntry::new(
            color,
            rng.gen_range(1..=4),
            rng.gen_range(1..=4),
            rng.gen_range(0..=6),
        ));
    }
    (w, h, pixels, Inventory::new(entries))
}

fn check_tiling(out: &MosaicResult) {
    let (w, h) = (out.width, out.height);
    let area: u64 = out.placed_pieces.iter().map(|p| p.area()).sum();
    assert_eq!(area, w as u64 * h as u64, "pieces must cover the grid exactly");
    assert!(disjoint(&out.placed_pieces), "pieces overlap");
    for p in &out.placed_pieces {
        assert!(p.x + p.width <= w && p.y + p.height <= h, "piece out of bounds");
        for y in p.y..p.y + p.height {
            for x in p.x..p.x + p.width {
                assert_eq!(out.pixel(x, y).unwrap().color_id, p.color_id);
            }
        }
    }
}

#[test]
fn random_grids_are_fully_and_uniformly_tiled() {
    let palette = small_palette();
    for seed in 0..60u64 {
        let (w, h, pixels, inventory) = random_case(seed);
        for strict in [true, false] {
            let out = generate(&pixels, w, h, &inventory, strict, &palette).unwrap();
            assert_eq!(out.pixels.len(), (w * h) as usize);
            check_tiling(&out);
        }
    }
}

#[test]
fn strict_usage_never_exceeds_stock() {
    let palette = small_palette();
    for seed in 100..160u64 {
        let (w, h, pixels, inventory) = random_case(seed);
        let out = generate(&pixels, w, h, &inventory, true, &palette).unwrap();
        let mut stock: HashMap<UsageKey, u32> = HashMap::new();
        for e in &inventory.entries {
            *stock.entry(UsageKey::new(e.color_id, e.dimensions)).or_insert(0) += e.quantity;
        }
        for (key, used) in &out.used_inventory {
            assert!(*used <= stock.get(key).copied().unwrap_or(0), "overused {}", key);
        }
        let from_stock = out.placed_pieces.iter().filter(|p| p.from_stock).count() as u32;
        assert_eq!(from_stock, out.used_inventory.values().sum::<u32>());
    }
}

#[test]
fn identical_inputs_give_identical_results() {
    let palette = small_palette();
    for seed in 200..220u64 {
        let (w, h, pixels, inventory) = random_case(seed);
        let a = generate(&pixels, w, h, &inventory, true, &palette).unwrap();
        let b = generate(&pixels, w, h, &inventory, true, &palette).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn caller_inventory_is_untouched() {
    let palette = small_palette();
    let (w, h, pixels, inventory) = random_case(7);
    let before = inventory.clone();
    let _ = generate(&pixels, w, h, &inventory, true, &palette).unwrap();
    assert_eq!(before, inventory);
}
