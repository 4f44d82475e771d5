//! Core library for turning images into brick mosaics.
//!
//! - Quantization: nearest palette color by Euclidean RGB distance
//! - Assignment: stock-aware color substitution with shortage reporting (strict mode)
//! - Packing: greedy, rotation-aware, largest-fit tiling with stocked pieces
//! - Results are serde-serializable; BOM/shortage exporters and a preview renderer are included.
//!
//! Quick example:
//! ```ignore
//! use brick_mosaic_core::prelude::*;
//! # fn main() -> brick_mosaic_core::Result<()> {
//! let palette = Palette::default_bricks();
//! let inventory = Inventory::new(vec![InventoryEntry::new(5, 1, 2, 10)]);
//! let cfg = MosaicConfig::builder().with_dimensions(2, 2).build();
//! let pixels = vec![Rgb::new(200, 30, 10); 4];
//! let out = generate_mosaic(&pixels, &inventory, &palette, &cfg)?;
//! println!("{}", out.stats().summary());
//! # Ok(()) }
//! ```

pub mod assign;
pub mod bom;
pub mod config;
pub mod error;
pub mod export;
pub mod inventory;
pub mod ledger;
pub mod model;
pub mod pack;
pub mod palette;
pub mod pipeline;
pub mod quantize;
#[cfg(feature = "image")]
pub mod raster;

pub use bom::*;
pub use config::*;
pub use error::*;
pub use export::*;
pub use inventory::*;
pub use model::*;
pub use palette::*;
pub use pipeline::*;

/// Convenience prelude for common types and functions.
/// Importing `brick_mosaic_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::bom::{BomEntry, BomRow, bill_of_materials, bom_rows};
    pub use crate::config::{GenerationMode, MosaicConfig, MosaicConfigBuilder};
    pub use crate::inventory::Inventory;
    pub use crate::model::{
        ColorId, Dimensions, InventoryEntry, MosaicResult, MosaicStats, PaletteColor,
        PixelAssignment, PlacedPiece, Rgb, ShapeKey, UsageKey,
    };
    pub use crate::palette::Palette;
    pub use crate::{MosaicJob, generate, generate_many, generate_mosaic};
}
