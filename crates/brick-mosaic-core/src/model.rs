use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{MosaicError, Result};

/// Palette color identifier (BrickLink/LDraw style numeric id).
pub type ColorId = u32;

/// 8-bit RGB triple.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#RRGGBB` (the `#` is optional, hex digits are case-insensitive).
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(MosaicError::InvalidPalette(format!(
                "invalid hex color '{}'",
                hex
            )));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|e| MosaicError::InvalidPalette(format!("invalid hex color '{}': {}", hex, e)))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Squared Euclidean distance in RGB space. Orders candidates exactly like
    /// [`Rgb::distance`] without the square root.
    pub fn distance_sq(&self, other: &Rgb) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }

    /// Euclidean distance in RGB space.
    pub fn distance(&self, other: &Rgb) -> f64 {
        (self.distance_sq(other) as f64).sqrt()
    }

    /// Perceived brightness in 0..=255.
    pub fn brightness(&self) -> f64 {
        (self.r as f64 * 299.0 + self.g as f64 * 587.0 + self.b as f64 * 114.0) / 1000.0
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(v: [u8; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

/// One entry of the static color palette.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaletteColor {
    pub id: ColorId,
    pub name: String,
    pub hex: String,
    #[serde(default)]
    pub category: String,
}

impl PaletteColor {
    pub fn new(id: ColorId, name: &str, hex: &str, category: &str) -> Self {
        Self {
            id,
            name: name.into(),
            hex: hex.into(),
            category: category.into(),
        }
    }
}

/// Piece footprint in studs. Also serves as the shape key of the stock
/// ledger, in which case it is kept unrotated as stocked.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Shape key of the stock ledger (`WxH`, unrotated).
pub type ShapeKey = Dimensions;

impl Dimensions {
    pub const UNIT: Dimensions = Dimensions {
        width: 1,
        height: 1,
    };

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }
    /// Same piece turned by 90°.
    pub fn rotated(&self) -> Self {
        Self::new(self.height, self.width)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Dimensions {
    type Err = MosaicError;
    fn from_str(s: &str) -> Result<Self> {
        let bad = || MosaicError::InvalidInventory(format!("invalid shape '{}'", s));
        let (w, h) = s
            .split_once(['x', 'X', '×'])
            .ok_or_else(bad)?;
        let width: u32 = w.trim().parse().map_err(|_| bad())?;
        let height: u32 = h.trim().parse().map_err(|_| bad())?;
        Ok(Self::new(width, height))
    }
}

/// One line of the caller's inventory snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryEntry {
    #[serde(default)]
    pub id: String,
    pub color_id: ColorId,
    pub dimensions: Dimensions,
    pub quantity: u32,
}

impl InventoryEntry {
    pub fn new(color_id: ColorId, width: u32, height: u32, quantity: u32) -> Self {
        Self {
            id: format!("{}-{}x{}", color_id, width, height),
            color_id,
            dimensions: Dimensions::new(width, height),
            quantity,
        }
    }
}

/// Color decision for one grid cell.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PixelAssignment {
    pub x: u32,
    pub y: u32,
    /// Color that gets packed.
    pub color_id: ColorId,
    /// True if the ideal color could not be honored from stock.
    pub is_substituted: bool,
    /// Ideal (pre-substitution) color.
    pub original_color_id: ColorId,
}

/// A piece placed on the grid. Footprint is `[x, x+width) × [y, y+height)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlacedPiece {
    pub id: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub color_id: ColorId,
    pub color_hex: String,
    /// True if the piece consumed a stocked shape; false for 1x1 filler.
    #[serde(default)]
    pub from_stock: bool,
}

impl PlacedPiece {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }
    pub fn area(&self) -> u64 {
        self.dimensions().area()
    }
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && y >= self.y && x < self.x + self.width && y < self.y + self.height
    }
    pub fn overlaps(&self, other: &PlacedPiece) -> bool {
        !(self.x >= other.x + other.width
            || other.x >= self.x + self.width
            || self.y >= other.y + other.height
            || other.y >= self.y + self.height)
    }
}

/// Key of `used_inventory`: a stocked shape of one color. Serialized as
/// `"{color}-{W}x{H}"` so it can be a JSON object key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UsageKey {
    pub color_id: ColorId,
    pub shape: ShapeKey,
}

impl UsageKey {
    pub fn new(color_id: ColorId, shape: ShapeKey) -> Self {
        Self { color_id, shape }
    }
}

impl fmt::Display for UsageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.color_id, self.shape)
    }
}

impl FromStr for UsageKey {
    type Err = MosaicError;
    fn from_str(s: &str) -> Result<Self> {
        let (color, shape) = s
            .split_once('-')
            .ok_or_else(|| MosaicError::InvalidInventory(format!("invalid usage key '{}'", s)))?;
        let color_id = color
            .parse()
            .map_err(|_| MosaicError::InvalidInventory(format!("invalid usage key '{}'", s)))?;
        Ok(Self::new(color_id, shape.parse()?))
    }
}

impl Serialize for UsageKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for UsageKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Output of one generation call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MosaicResult {
    pub width: u32,
    pub height: u32,
    /// Row-major, one per grid cell.
    pub pixels: Vec<PixelAssignment>,
    pub placed_pieces: Vec<PlacedPiece>,
    /// Stocked pieces consumed by the packer.
    pub used_inventory: BTreeMap<UsageKey, u32>,
    /// Ideal-color cells that real stock could not back, per ideal color.
    pub missing_bricks: BTreeMap<ColorId, u32>,
}

/// Summary numbers about a generated mosaic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MosaicStats {
    pub grid_width: u32,
    pub grid_height: u32,
    pub total_cells: u64,
    pub piece_count: usize,
    /// Cells whose packed color differs from, or could not be backed as, the ideal color.
    pub substituted_cells: usize,
    /// Sum of `missing_bricks`.
    pub missing_total: u64,
    /// 1x1 filler pieces that consumed no stock.
    pub unbacked_pieces: usize,
    pub largest_piece_area: u64,
    pub average_piece_area: f64,
    /// `1 - pieces / cells`: share of pieces saved versus an all-1x1 build.
    pub reduction: f64,
}

impl MosaicResult {
    /// Computes statistics for this result.
    pub fn stats(&self) -> MosaicStats {
        let total_cells = self.width as u64 * self.height as u64;
        let piece_count = self.placed_pieces.len();
        let substituted_cells = self.pixels.iter().filter(|p| p.is_substituted).count();
        let missing_total = self.missing_bricks.values().map(|&v| v as u64).sum();
        let unbacked_pieces = self.placed_pieces.iter().filter(|p| !p.from_stock).count();
        let largest_piece_area = self
            .placed_pieces
            .iter()
            .map(PlacedPiece::area)
            .max()
            .unwrap_or(0);
        let covered: u64 = self.placed_pieces.iter().map(PlacedPiece::area).sum();
        let average_piece_area = if piece_count > 0 {
            covered as f64 / piece_count as f64
        } else {
            0.0
        };
        let reduction = if total_cells > 0 {
            1.0 - piece_count as f64 / total_cells as f64
        } else {
            0.0
        };
        MosaicStats {
            grid_width: self.width,
            grid_height: self.height,
            total_cells,
            piece_count,
            substituted_cells,
            missing_total,
            unbacked_pieces,
            largest_piece_area,
            average_piece_area,
            reduction,
        }
    }

    /// Assignment for cell `(x, y)`, if inside the grid.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&PixelAssignment> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize)
    }

    /// True if nothing was reported missing.
    pub fn is_complete(&self) -> bool {
        self.missing_bricks.is_empty()
    }
}

impl MosaicStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Grid: {}x{} ({} studs), Pieces: {}, Reduction: {:.2}%, Avg piece: {:.2} studs, Largest: {}, Substituted: {}, Missing: {}, Unbacked 1x1: {}",
            self.grid_width,
            self.grid_height,
            self.total_cells,
            self.piece_count,
            self.reduction * 100.0,
            self.average_piece_area,
            self.largest_piece_area,
            self.substituted_cells,
            self.missing_total,
            self.unbacked_pieces,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrip_and_case() {
        let c = Rgb::from_hex("#C91A09").unwrap();
        assert_eq!(c, Rgb::new(0xc9, 0x1a, 0x09));
        assert_eq!(c.to_hex(), "#c91a09");
        assert_eq!(Rgb::from_hex("ffffff").unwrap(), Rgb::new(255, 255, 255));
        assert!(Rgb::from_hex("#12345").is_err());
        assert!(Rgb::from_hex("#12345g").is_err());
    }

    #[test]
    fn shape_parsing() {
        assert_eq!("2x4".parse::<Dimensions>().unwrap(), Dimensions::new(2, 4));
        assert_eq!("1 × 3".parse::<Dimensions>().unwrap(), Dimensions::new(1, 3));
        assert!("2by4".parse::<Dimensions>().is_err());
    }

    #[test]
    fn usage_key_text_form() {
        let k = UsageKey::new(5, Dimensions::new(1, 2));
        assert_eq!(k.to_string(), "5-1x2");
        assert_eq!("5-1x2".parse::<UsageKey>().unwrap(), k);
        let json = serde_json::to_string(&k).unwrap();
        assert_eq!(json, "\"5-1x2\"");
    }

    #[test]
    fn distance_matches_euclid() {
        let a = Rgb::new(0, 0, 0);
        let b = Rgb::new(3, 4, 0);
        assert_eq!(a.distance_sq(&b), 25);
        assert!((a.distance(&b) - 5.0).abs() < 1e-9);
    }
}
