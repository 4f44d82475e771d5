//! Report exporters for a finished mosaic.
//!
//! - [`to_json`]: one JSON document with pieces, BOM, stock used, shortages and stats
//! - [`shopping_list`]: missing studs per ideal color, largest first
//! - [`bom_to_csv`]: the bill of materials as CSV
//!
//! Color names and hex codes come from the palette; ids absent from it are
//! named `"#<id>"` and drawn as `#000000`.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::bom::bom_rows;
use crate::model::{ColorId, MosaicResult};
use crate::palette::Palette;

/// Missing studs of one ideal color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortageRow {
    pub color_id: ColorId,
    pub color_name: String,
    pub color_hex: String,
    pub missing: u32,
}

/// Serialize a result as `{ width, height, pieces, bom, usedInventory, missingBricks, stats }`.
/// Per-pixel assignments are left out; use serde on `MosaicResult` for the full record.
pub fn to_json(result: &MosaicResult, palette: &Palette) -> Value {
    let pieces: Vec<Value> = result
        .placed_pieces
        .iter()
        .map(|p| {
            json!({
                "id": p.id,
                "x": p.x,
                "y": p.y,
                "w": p.width,
                "h": p.height,
                "colorId": p.color_id,
                "colorHex": p.color_hex,
                "fromStock": p.from_stock,
            })
        })
        .collect();
    let used: serde_json::Map<String, Value> = result
        .used_inventory
        .iter()
        .map(|(k, v)| (k.to_string(), json!(v)))
        .collect();
    json!({
        "width": result.width,
        "height": result.height,
        "pieces": pieces,
        "bom": bom_rows(result, palette),
        "usedInventory": used,
        "missingBricks": shopping_list(result, palette),
        "stats": result.stats(),
    })
}

/// Shortages with color names, largest first, then by color id.
pub fn shopping_list(result: &MosaicResult, palette: &Palette) -> Vec<ShortageRow> {
    let mut rows: Vec<ShortageRow> = result
        .missing_bricks
        .iter()
        .map(|(&color_id, &missing)| ShortageRow {
            color_id,
            color_name: palette
                .name_of(color_id)
                .map(str::to_string)
                .unwrap_or_else(|| format!("#{}", color_id)),
            color_hex: palette.hex_of(color_id).to_string(),
            missing,
        })
        .collect();
    rows.sort_by(|a, b| b.missing.cmp(&a.missing).then_with(|| a.color_id.cmp(&b.color_id)));
    rows
}

/// BOM as CSV with a header row.
pub fn bom_to_csv(result: &MosaicResult, palette: &Palette) -> String {
    let mut out = String::from("color_id,color_name,color_hex,shape,count,studs\n");
    for r in bom_rows(result, palette) {
        let name = if r.color_name.contains([',', '"']) {
            format!("\"{}\"", r.color_name.replace('"', "\"\""))
        } else {
            r.color_name
        };
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            r.color_id, name, r.color_hex, r.shape, r.count, r.studs
        ));
    }
    out
}
