//! Nearest-palette-color lookup.
//!
//! Both the ideal-color lookup (whole palette) and the substitute lookup
//! (inventory-present colors only) go through [`nearest_color`], so distance
//! and tie-break rules are identical for the two.

use crate::model::{ColorId, PaletteColor, Rgb};
use crate::palette::Palette;

/// Returns the candidate closest to `target` by Euclidean RGB distance.
///
/// Ties go to the earliest candidate in iteration order. Returns `None` only
/// for an empty candidate set.
pub fn nearest_color<'a, I>(target: Rgb, candidates: I) -> Option<ColorId>
where
    I: IntoIterator<Item = (&'a PaletteColor, Rgb)>,
{
    let mut best: Option<(ColorId, u32)> = None;
    for (color, rgb) in candidates {
        let d = target.distance_sq(&rgb);
        match best {
            Some((_, bd)) if d >= bd => {}
            _ => best = Some((color.id, d)),
        }
    }
    best.map(|(id, _)| id)
}

/// Nearest color over the whole palette. A validated palette is never empty.
pub fn nearest_in_palette(target: Rgb, palette: &Palette) -> Option<ColorId> {
    nearest_color(target, palette.iter())
}
