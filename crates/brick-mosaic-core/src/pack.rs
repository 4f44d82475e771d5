//! Greedy largest-fit packing of a finished color grid.
//!
//! Cells are visited in row-major order. Each uncovered anchor takes the
//! largest stocked shape of its color (either orientation) whose footprint is
//! in bounds, uncovered and color-uniform; ties in area keep ledger order.
//! With nothing that fits, the anchor gets an unbacked 1x1 filler.
//! There is no backtracking, so avoidable fragmentation is possible.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::config::GenerationMode;
use crate::ledger::ShapeLedger;
use crate::model::{ColorId, Dimensions, PixelAssignment, PlacedPiece, ShapeKey, UsageKey};
use crate::palette::Palette;

/// A shape in placement orientation plus the ledger key it draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub size: Dimensions,
    pub key: ShapeKey,
}

/// Placed pieces and stock consumed by the packer.
#[derive(Debug, Clone, Default)]
pub struct Packing {
    pub pieces: Vec<PlacedPiece>,
    pub used: BTreeMap<UsageKey, u32>,
}

pub struct GreedyPacker<'a> {
    width: u32,
    height: u32,
    cells: &'a [PixelAssignment],
    covered: Vec<bool>,
}

impl<'a> GreedyPacker<'a> {
    /// `cells` must hold exactly `width * height` row-major assignments.
    pub fn new(width: u32, height: u32, cells: &'a [PixelAssignment]) -> Self {
        Self {
            width,
            height,
            cells,
            covered: vec![false; cells.len()],
        }
    }

    fn idx(&self, x: u32, y: u32) -> usize {
        (y * self.width + x) as usize
    }

    pub fn is_covered(&self, x: u32, y: u32) -> bool {
        self.covered[self.idx(x, y)]
    }

    /// In bounds, fully uncovered and every cell of `color`. Shapes larger
    /// than the grid never fit.
    pub fn can_fit(&self, x: u32, y: u32, size: Dimensions, color: ColorId) -> bool {
        let right = x as u64 + size.width as u64;
        let bottom = y as u64 + size.height as u64;
        if right > self.width as u64 || bottom > self.height as u64 {
            return false;
        }
        for yy in y..y + size.height {
            for xx in x..x + size.width {
                let i = self.idx(xx, yy);
                if self.covered[i] || self.cells[i].color_id != color {
                    return false;
                }
            }
        }
        true
    }

    fn cover(&mut self, x: u32, y: u32, size: Dimensions) {
        for yy in y..y + size.height {
            for xx in x..x + size.width {
                let i = self.idx(xx, yy);
                self.covered[i] = true;
            }
        }
    }

    /// Tiles the whole grid.
    pub fn pack(
        mut self,
        palette: &Palette,
        mode: GenerationMode,
        ledger: &mut ShapeLedger,
        id_prefix: &str,
    ) -> Packing {
        let mut out = Packing::default();
        for y in 0..self.height {
            for x in 0..self.width {
                if self.is_covered(x, y) {
                    continue;
                }
                let color = self.cells[self.idx(x, y)].color_id;

                let chosen = if mode.is_strict() {
                    candidates(ledger, color)
                        .into_iter()
                        .find(|c| self.can_fit(x, y, c.size, color))
                } else {
                    None
                };

                let (size, from_stock) = match chosen {
                    Some(c) if ledger.take_piece(color, c.key) => {
                        *out.used.entry(UsageKey::new(color, c.key)).or_insert(0) += 1;
                        (c.size, true)
                    }
                    _ => {
                        trace!(x, y, color, "no stocked shape fits, placing 1x1 filler");
                        (Dimensions::UNIT, false)
                    }
                };

                self.cover(x, y, size);
                out.pieces.push(PlacedPiece {
                    id: format!("{}-{}", id_prefix, out.pieces.len()),
                    x,
                    y,
                    width: size.width,
                    height: size.height,
                    color_id: color,
                    color_hex: palette.hex_of(color).to_string(),
                    from_stock,
                });
            }
        }
        debug!(
            pieces = out.pieces.len(),
            from_stock = out.used.values().sum::<u32>(),
            "packing done"
        );
        out
    }
}

/// Stocked shapes of `color` in both orientations, largest area first.
/// Equal areas keep ledger order, an unrotated shape before its rotation.
pub fn candidates(ledger: &ShapeLedger, color: ColorId) -> Vec<Candidate> {
    let mut list: Vec<Candidate> = Vec::new();
    for key in ledger.available(color) {
        list.push(Candidate { size: key, key });
        if !key.is_square() {
            list.push(Candidate {
                size: key.rotated(),
                key,
            });
        }
    }
    // stable: preserves ledger order among equal areas
    list.sort_by(|a, b| b.size.area().cmp(&a.size.area()));
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::Inventory;
    use crate::model::InventoryEntry;

    #[test]
    fn candidates_sorted_with_rotations() {
        let inv = Inventory::new(vec![
            InventoryEntry::new(1, 1, 2, 1),
            InventoryEntry::new(1, 2, 2, 1),
            InventoryEntry::new(1, 1, 1, 0),
            InventoryEntry::new(1, 2, 1, 3),
        ]);
        let ledger = ShapeLedger::from_inventory(&inv);
        let c = candidates(&ledger, 1);
        let sizes: Vec<String> = c.iter().map(|c| c.size.to_string()).collect();
        assert_eq!(sizes, vec!["2x2", "1x2", "2x1", "2x1", "1x2"]);
        assert_eq!(c[2].key, Dimensions::new(1, 2));
        assert_eq!(c[3].key, Dimensions::new(2, 1));
    }
}
