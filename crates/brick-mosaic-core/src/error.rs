use thiserror::Error;

use crate::model::ColorId;

#[derive(Debug, Error)]
pub enum MosaicError {
    #[error("Invalid mosaic dimensions: {width}x{height} (both must be > 0)")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Pixel buffer has {actual} pixels, expected {expected} (width * height)")]
    PixelCountMismatch { expected: usize, actual: usize },
    #[error("Palette is empty")]
    EmptyPalette,
    #[error("Invalid palette: {0}")]
    InvalidPalette(String),
    #[error("Invalid inventory: {0}")]
    InvalidInventory(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Color {0} is not part of the palette")]
    UnknownColor(ColorId),
}

pub type Result<T> = std::result::Result<T, MosaicError>;
