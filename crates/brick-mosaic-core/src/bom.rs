//! Bill of materials: placed pieces grouped by color and footprint.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{ColorId, Dimensions, MosaicResult, PlacedPiece};
use crate::palette::Palette;

/// Count of placed pieces sharing one color and one placed footprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BomEntry {
    pub color_id: ColorId,
    /// Placed footprint (`width x height` as on the grid, not normalized).
    pub shape: Dimensions,
    pub count: u32,
}

/// A [`BomEntry`] with palette details, for reports and templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BomRow {
    pub color_id: ColorId,
    pub color_name: String,
    pub color_hex: String,
    pub shape: String,
    pub count: u32,
    pub studs: u64,
}

/// Groups `pieces` by `(colorId, width x height)`, ordered by color id then shape.
pub fn bill_of_materials(pieces: &[PlacedPiece]) -> Vec<BomEntry> {
    let mut groups: BTreeMap<(ColorId, Dimensions), u32> = BTreeMap::new();
    for p in pieces {
        *groups.entry((p.color_id, p.dimensions())).or_insert(0) += 1;
    }
    groups
        .into_iter()
        .map(|((color_id, shape), count)| BomEntry {
            color_id,
            shape,
            count,
        })
        .collect()
}

/// BOM entries annotated with color names; unknown colors are named `"#<id>"`.
pub fn bom_rows(result: &MosaicResult, palette: &Palette) -> Vec<BomRow> {
    bill_of_materials(&result.placed_pieces)
        .into_iter()
        .map(|e| BomRow {
            color_id: e.color_id,
            color_name: palette
                .name_of(e.color_id)
                .map(str::to_string)
                .unwrap_or_else(|| format!("#{}", e.color_id)),
            color_hex: palette.hex_of(e.color_id).to_string(),
            shape: e.shape.to_string(),
            count: e.count,
            studs: e.shape.area() * e.count as u64,
        })
        .collect()
}

impl MosaicResult {
    /// Bill of materials for this result's placed pieces.
    pub fn bill_of_materials(&self) -> Vec<BomEntry> {
        bill_of_materials(&self.placed_pieces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece(x: u32, w: u32, h: u32, color: ColorId) -> PlacedPiece {
        PlacedPiece {
            id: format!("p{}", x),
            x,
            y: 0,
            width: w,
            height: h,
            color_id: color,
            color_hex: "#000000".into(),
            from_stock: true,
        }
    }

    #[test]
    fn groups_by_color_and_placed_shape() {
        let pieces = vec![
            piece(0, 1, 2, 5),
            piece(1, 1, 1, 3),
            piece(2, 1, 2, 5),
            piece(3, 2, 1, 5),
        ];
        let bom = bill_of_materials(&pieces);
        assert_eq!(
            bom,
            vec![
                BomEntry { color_id: 3, shape: Dimensions::new(1, 1), count: 1 },
                BomEntry { color_id: 5, shape: Dimensions::new(1, 2), count: 2 },
                BomEntry { color_id: 5, shape: Dimensions::new(2, 1), count: 1 },
            ]
        );
    }
}
