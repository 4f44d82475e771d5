//! Assignment pass: picks the color of every grid cell.
//!
//! Strict-mode policy, per cell in row-major order:
//! 1. ideal color (nearest over the full palette) if its stud capacity is left;
//! 2. otherwise the nearest inventory-present color, if its capacity is left;
//! 3. otherwise the ideal color anyway, recorded as a shortage.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::GenerationMode;
use crate::error::{MosaicError, Result};
use crate::inventory::Inventory;
use crate::ledger::AreaLedger;
use crate::model::{ColorId, PixelAssignment, Rgb};
use crate::palette::Palette;
use crate::quantize::{nearest_color, nearest_in_palette};

/// Color grid plus the shortage report.
#[derive(Debug, Clone, Default)]
pub struct Assignment {
    pub pixels: Vec<PixelAssignment>,
    pub missing: BTreeMap<ColorId, u32>,
}

/// Runs the assignment pass. `pixels` is row-major with `pixels.len()` a
/// multiple of `width`; callers validate that beforehand.
///
/// Emits exactly one assignment per input pixel, or fails with
/// [`MosaicError::EmptyPalette`].
pub fn assign_colors(
    pixels: &[Rgb],
    width: u32,
    palette: &Palette,
    inventory: &Inventory,
    mode: GenerationMode,
    ledger: &mut AreaLedger,
) -> Result<Assignment> {
    let in_stock = palette.restricted_to(&inventory.color_set());
    let mut out = Assignment {
        pixels: Vec::with_capacity(pixels.len()),
        missing: BTreeMap::new(),
    };

    for (i, &target) in pixels.iter().enumerate() {
        let x = i as u32 % width;
        let y = i as u32 / width;
        let ideal = nearest_in_palette(target, palette).ok_or(MosaicError::EmptyPalette)?;

        let (color_id, is_substituted) = match mode {
            GenerationMode::Unconstrained => (ideal, false),
            GenerationMode::Strict => {
                if ledger.take_stud(ideal) {
                    (ideal, false)
                } else {
                    let substitute = nearest_color(target, in_stock.iter().copied())
                        .filter(|&sub| ledger.take_stud(sub));
                    match substitute {
                        Some(sub) => (sub, true),
                        None => {
                            *out.missing.entry(ideal).or_insert(0) += 1;
                            (ideal, true)
                        }
                    }
                }
            }
        };

        out.pixels.push(PixelAssignment {
            x,
            y,
            color_id,
            is_substituted,
            original_color_id: ideal,
        });
    }

    debug!(
        cells = out.pixels.len(),
        substituted = out.pixels.iter().filter(|p| p.is_substituted).count(),
        shortage = out.missing.values().sum::<u32>(),
        "assignment pass done"
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{InventoryEntry, PaletteColor};

    fn rgb_palette() -> Palette {
        Palette::new(vec![
            PaletteColor::new(1, "Red", "#FF0000", "Reds"),
            PaletteColor::new(2, "Dark Red", "#800000", "Reds"),
            PaletteColor::new(3, "Blue", "#0000FF", "Blues"),
        ])
        .unwrap()
    }

    #[test]
    fn substitutes_nearest_stocked_color() {
        let palette = rgb_palette();
        let inventory = Inventory::new(vec![
            InventoryEntry::new(2, 1, 1, 1),
            InventoryEntry::new(3, 1, 1, 5),
        ]);
        let mut ledger = AreaLedger::from_inventory(&inventory);
        let px = vec![Rgb::new(255, 0, 0); 2];
        let a = assign_colors(&px, 2, &palette, &inventory, GenerationMode::Strict, &mut ledger).unwrap();
        assert_eq!(a.pixels[0].color_id, 2);
        assert!(a.pixels[0].is_substituted);
        assert_eq!(a.pixels[0].original_color_id, 1);
        // dark red is used up; blue still has stock but is not the nearest stocked color
        assert_eq!(a.pixels[1].color_id, 1);
        assert!(a.pixels[1].is_substituted);
        assert_eq!(a.missing.get(&1), Some(&1));
        assert_eq!(ledger.capacity(3), 5);
    }

    #[test]
    fn exhausted_ideal_is_its_own_nearest_substitute() {
        let palette = rgb_palette();
        let inventory = Inventory::new(vec![
            InventoryEntry::new(1, 1, 1, 1),
            InventoryEntry::new(2, 1, 1, 1),
        ]);
        let mut ledger = AreaLedger::from_inventory(&inventory);
        let px = vec![Rgb::new(255, 0, 0); 3];
        let a = assign_colors(&px, 3, &palette, &inventory, GenerationMode::Strict, &mut ledger).unwrap();
        assert_eq!(a.pixels[0].color_id, 1);
        assert!(!a.pixels[0].is_substituted);
        assert!(a.pixels[1..].iter().all(|p| p.color_id == 1 && p.is_substituted));
        assert_eq!(a.missing.get(&1), Some(&2));
        assert_eq!(ledger.capacity(2), 1);
    }

    #[test]
    fn unconstrained_ignores_stock() {
        let palette = rgb_palette();
        let inventory = Inventory::default();
        let mut ledger = AreaLedger::from_inventory(&inventory);
        let px = vec![Rgb::new(0, 0, 250), Rgb::new(130, 0, 0)];
        let a = assign_colors(&px, 2, &palette, &inventory, GenerationMode::Unconstrained, &mut ledger).unwrap();
        assert_eq!(a.pixels[0].color_id, 3);
        assert_eq!(a.pixels[1].color_id, 2);
        assert!(a.pixels.iter().all(|p| !p.is_substituted));
        assert!(a.missing.is_empty());
    }

    #[test]
    fn one_assignment_per_pixel() {
        let palette = rgb_palette();
        let inventory = Inventory::new(vec![InventoryEntry::new(3, 1, 1, 1)]);
        let mut ledger = AreaLedger::from_inventory(&inventory);
        let px: Vec<Rgb> = (0..12u8).map(|i| Rgb::new(i * 20, 0, 255 - i * 20)).collect();
        let a = assign_colors(&px, 4, &palette, &inventory, GenerationMode::Strict, &mut ledger).unwrap();
        assert_eq!(a.pixels.len(), px.len());
        let coords: Vec<(u32, u32)> = a.pixels.iter().map(|p| (p.x, p.y)).collect();
        let expected: Vec<(u32, u32)> = (0..12).map(|i| (i % 4, i / 4)).collect();
        assert_eq!(coords, expected);
    }
}
