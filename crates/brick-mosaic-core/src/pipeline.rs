//! Generation entry points: validate, assign colors, pack pieces.

use tracing::{debug, instrument};

use crate::assign::assign_colors;
use crate::config::{GenerationMode, MosaicConfig};
use crate::error::{MosaicError, Result};
use crate::inventory::Inventory;
use crate::ledger::{AreaLedger, ShapeLedger};
use crate::model::{MosaicResult, Rgb};
use crate::pack::GreedyPacker;
use crate::palette::Palette;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[instrument(skip_all, fields(width = cfg.width, height = cfg.height, mode = ?cfg.mode))]
/// Converts a row-major pixel buffer into a tiled brick mosaic.
///
/// Notes:
/// - Input is validated before any work; a shortage of stock is never an error.
/// - Both ledgers are built here from `inventory` and dropped on return, so
///   concurrent calls never share state.
/// - Identical inputs (including palette and inventory order) give identical results.
pub fn generate_mosaic(
    pixels: &[Rgb],
    inventory: &Inventory,
    palette: &Palette,
    cfg: &MosaicConfig,
) -> Result<MosaicResult> {
    cfg.validate()?;
    if palette.is_empty() {
        return Err(MosaicError::EmptyPalette);
    }
    if pixels.len() != cfg.cell_count() {
        return Err(MosaicError::PixelCountMismatch {
            expected: cfg.cell_count(),
            actual: pixels.len(),
        });
    }
    inventory.validate()?;

    let mut area_ledger = AreaLedger::from_inventory(inventory);
    let assignment = assign_colors(
        pixels,
        cfg.width,
        palette,
        inventory,
        cfg.mode,
        &mut area_ledger,
    )?;

    // The packer gets its own ledger, independent of the assignment's area view.
    let mut shape_ledger = ShapeLedger::from_inventory(inventory);
    let packing = GreedyPacker::new(cfg.width, cfg.height, &assignment.pixels).pack(
        palette,
        cfg.mode,
        &mut shape_ledger,
        &cfg.piece_id_prefix,
    );

    let result = MosaicResult {
        width: cfg.width,
        height: cfg.height,
        pixels: assignment.pixels,
        placed_pieces: packing.pieces,
        used_inventory: packing.used,
        missing_bricks: assignment.missing,
    };
    debug!(summary = %result.stats().summary(), "mosaic generated");
    Ok(result)
}

/// Positional form: `(pixels, width, height, inventory, strict)` with an explicit palette.
pub fn generate(
    pixels: &[Rgb],
    width: u32,
    height: u32,
    inventory: &Inventory,
    strict: bool,
    palette: &Palette,
) -> Result<MosaicResult> {
    let cfg = MosaicConfig {
        width,
        height,
        mode: if strict {
            GenerationMode::Strict
        } else {
            GenerationMode::Unconstrained
        },
        ..Default::default()
    };
    generate_mosaic(pixels, inventory, palette, &cfg)
}

/// One independent generation request.
#[derive(Debug, Clone)]
pub struct MosaicJob {
    pub key: String,
    pub pixels: Vec<Rgb>,
    pub inventory: Inventory,
    pub config: MosaicConfig,
}

/// Runs `jobs` against a shared read-only palette. Results keep job order.
///
/// With the `parallel` feature and `parallel = true`, jobs run on the rayon
/// pool; each call still owns its ledgers.
pub fn generate_many(
    jobs: &[MosaicJob],
    palette: &Palette,
    parallel: bool,
) -> Vec<(String, Result<MosaicResult>)> {
    #[cfg(feature = "parallel")]
    {
        if parallel {
            return jobs
                .par_iter()
                .map(|job| {
                    (
                        job.key.clone(),
                        generate_mosaic(&job.pixels, &job.inventory, palette, &job.config),
                    )
                })
                .collect();
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    jobs.iter()
        .map(|job| {
            (
                job.key.clone(),
                generate_mosaic(&job.pixels, &job.inventory, palette, &job.config),
            )
        })
        .collect()
}
