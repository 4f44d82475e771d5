use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{MosaicError, Result};
use crate::model::{ColorId, PaletteColor, Rgb};

/// Hex used for pieces whose color id is not in the palette.
pub const FALLBACK_HEX: &str = "#000000";

/// Ordered, validated palette. Iteration order is the quantizer's tie-break
/// order, so it is kept exactly as supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PaletteColor>", into = "Vec<PaletteColor>")]
pub struct Palette {
    colors: Vec<PaletteColor>,
    rgb: Vec<Rgb>,
}

impl Palette {
    /// Validates and parses `colors`: non-empty, unique ids, well-formed hex.
    pub fn new(colors: Vec<PaletteColor>) -> Result<Self> {
        if colors.is_empty() {
            return Err(MosaicError::EmptyPalette);
        }
        let mut seen: HashSet<ColorId> = HashSet::with_capacity(colors.len());
        let mut rgb = Vec::with_capacity(colors.len());
        for c in &colors {
            if !seen.insert(c.id) {
                return Err(MosaicError::InvalidPalette(format!(
                    "duplicate color id {} ('{}')",
                    c.id, c.name
                )));
            }
            rgb.push(Rgb::from_hex(&c.hex)?);
        }
        Ok(Self { colors, rgb })
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Colors with their parsed RGB values, in palette order.
    pub fn iter(&self) -> impl Iterator<Item = (&PaletteColor, Rgb)> + '_ {
        self.colors.iter().zip(self.rgb.iter().copied())
    }

    pub fn colors(&self) -> &[PaletteColor] {
        &self.colors
    }

    pub fn get(&self, id: ColorId) -> Option<&PaletteColor> {
        self.colors.iter().find(|c| c.id == id)
    }

    /// Like [`Palette::get`], but an unknown id is an error.
    pub fn require(&self, id: ColorId) -> Result<&PaletteColor> {
        self.get(id).ok_or(MosaicError::UnknownColor(id))
    }

    pub fn rgb_of(&self, id: ColorId) -> Option<Rgb> {
        self.colors
            .iter()
            .position(|c| c.id == id)
            .map(|i| self.rgb[i])
    }

    /// Hex for `id`, or [`FALLBACK_HEX`] when the id is unknown.
    pub fn hex_of(&self, id: ColorId) -> &str {
        self.get(id).map(|c| c.hex.as_str()).unwrap_or(FALLBACK_HEX)
    }

    pub fn name_of(&self, id: ColorId) -> Option<&str> {
        self.get(id).map(|c| c.name.as_str())
    }

    /// Distinct categories, in order of first appearance.
    pub fn categories(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for c in &self.colors {
            if !out.contains(&c.category.as_str()) {
                out.push(c.category.as_str());
            }
        }
        out
    }

    /// Candidate set of palette entries whose id is in `ids`, in palette order.
    pub fn restricted_to<'a>(&'a self, ids: &HashSet<ColorId>) -> Vec<(&'a PaletteColor, Rgb)> {
        self.iter().filter(|(c, _)| ids.contains(&c.id)).collect()
    }

    /// Built-in solid brick palette.
    pub fn default_bricks() -> Self {
        let colors = DEFAULT_BRICK_COLORS
            .iter()
            .map(|&(id, name, hex, category)| PaletteColor::new(id, name, hex, category))
            .collect();
        // Static table: unique ids and valid hex are covered by tests.
        match Self::new(colors) {
            Ok(p) => p,
            Err(e) => panic!("built-in palette is invalid: {e}"),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::default_bricks()
    }
}

impl TryFrom<Vec<PaletteColor>> for Palette {
    type Error = MosaicError;
    fn try_from(colors: Vec<PaletteColor>) -> Result<Self> {
        Self::new(colors)
    }
}

impl From<Palette> for Vec<PaletteColor> {
    fn from(p: Palette) -> Self {
        p.colors
    }
}

const DEFAULT_BRICK_COLORS: &[(ColorId, &str, &str, &str)] = &[
    // Blacks & greys
    (11, "Black", "#05131D", "Blacks"),
    (9, "Light Gray", "#9BA19D", "Greys"),
    (86, "Light Bluish Gray", "#A0A5A9", "Greys"),
    (10, "Dark Gray", "#6D6E5C", "Greys"),
    (85, "Dark Bluish Gray", "#6C6E68", "Greys"),
    // Whites
    (1, "White", "#FFFFFF", "Whites"),
    (49, "Very Light Gray", "#E4E8E8", "Whites"),
    // Reds
    (5, "Red", "#C91A09", "Reds"),
    (59, "Dark Red", "#720E0F", "Reds"),
    (220, "Coral", "#FF698F", "Reds"),
    // Browns & tans
    (2, "Tan", "#E4CD9E", "Browns"),
    (69, "Dark Tan", "#958A73", "Browns"),
    (88, "Reddish Brown", "#582A12", "Browns"),
    (8, "Brown", "#583927", "Browns"),
    (120, "Dark Brown", "#352100", "Browns"),
    (106, "Fabuland Brown", "#CF9C82", "Browns"),
    (28, "Nougat", "#D09168", "Browns"),
    (150, "Medium Nougat", "#CC702A", "Browns"),
    (90, "Light Nougat", "#F6D7B3", "Browns"),
    // Yellows & oranges
    (3, "Yellow", "#F2CD37", "Yellows"),
    (103, "Bright Light Yellow", "#FFF03A", "Yellows"),
    (226, "Cool Yellow", "#FDF38C", "Yellows"),
    (4, "Orange", "#FE8A18", "Oranges"),
    (31, "Medium Orange", "#FFA70B", "Oranges"),
    (110, "Bright Light Orange", "#F8BB3D", "Oranges"),
    (68, "Dark Orange", "#A95500", "Oranges"),
    (191, "Flame Yellowish Orange", "#FCAC00", "Oranges"),
    // Greens
    (6, "Green", "#237841", "Greens"),
    (80, "Dark Green", "#184632", "Greens"),
    (36, "Bright Green", "#4B9F4A", "Greens"),
    (34, "Lime", "#BBE90B", "Greens"),
    (155, "Olive Green", "#9B9A5A", "Greens"),
    (48, "Sand Green", "#A0BCAC", "Greens"),
    (158, "Yellowish Green", "#95B90B", "Greens"),
    // Blues
    (7, "Blue", "#0055BF", "Blues"),
    (63, "Dark Blue", "#0A3463", "Blues"),
    (42, "Medium Blue", "#5A93DB", "Blues"),
    (55, "Sand Blue", "#6074A1", "Blues"),
    (156, "Medium Azure", "#36AEBF", "Blues"),
    (153, "Dark Azure", "#078BC9", "Blues"),
    (105, "Bright Light Blue", "#87C0EA", "Blues"),
    (39, "Earth Blue", "#002541", "Blues"),
    // Purples & pinks
    (89, "Dark Purple", "#3F3691", "Purples"),
    (24, "Purple", "#81007B", "Purples"),
    (157, "Medium Lavender", "#AC78BA", "Purples"),
    (154, "Lavender", "#E1D5ED", "Purples"),
    (222, "Light Purple", "#EE9DC3", "Purples"),
    (23, "Pink", "#FC97AC", "Pinks"),
    (104, "Bright Pink", "#E4ADC8", "Pinks"),
    (47, "Dark Pink", "#C870A0", "Pinks"),
    (71, "Magenta", "#923978", "Pinks"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_palette_is_valid() {
        let colors: Vec<PaletteColor> = DEFAULT_BRICK_COLORS
            .iter()
            .map(|&(id, name, hex, category)| PaletteColor::new(id, name, hex, category))
            .collect();
        let p = Palette::new(colors).expect("built-in palette");
        assert_eq!(p.len(), DEFAULT_BRICK_COLORS.len());
        assert_eq!(p.categories()[0], "Blacks");
        assert_eq!(p.categories().len(), 11);
    }

    #[test]
    fn rejects_duplicates_and_empty() {
        assert!(matches!(Palette::new(vec![]), Err(MosaicError::EmptyPalette)));
        let dup = vec![
            PaletteColor::new(1, "A", "#000000", "X"),
            PaletteColor::new(1, "B", "#FFFFFF", "X"),
        ];
        assert!(matches!(Palette::new(dup), Err(MosaicError::InvalidPalette(_))));
    }

    #[test]
    fn unknown_id_hex_falls_back() {
        let p = Palette::default_bricks();
        assert_eq!(p.hex_of(5), "#C91A09");
        assert_eq!(p.hex_of(999_999), FALLBACK_HEX);
        assert_eq!(p.require(5).map(|c| c.name.as_str()).ok(), Some("Red"));
        assert!(matches!(p.require(999_999), Err(MosaicError::UnknownColor(999_999))));
    }

    #[test]
    fn palette_deserializes_from_list() {
        let json = r##"[{"id":1,"name":"White","hex":"#FFFFFF","category":"Whites"}]"##;
        let p: Palette = serde_json::from_str(json).unwrap();
        assert_eq!(p.rgb_of(1), Some(Rgb::new(255, 255, 255)));
        let bad = r##"[{"id":1,"name":"White","hex":"nope"}]"##;
        assert!(serde_json::from_str::<Palette>(bad).is_err());
    }
}
