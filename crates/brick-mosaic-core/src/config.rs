use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{MosaicError, Result};

/// How inventory limits are applied during generation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// Use only stocked pieces; shortages are tracked and reported.
    #[default]
    #[serde(alias = "precise")]
    Strict,
    /// Ignore stock and show the visually ideal color grid (all 1x1 pieces).
    #[serde(alias = "artistic")]
    Unconstrained,
}

impl GenerationMode {
    pub fn is_strict(self) -> bool {
        matches!(self, Self::Strict)
    }
}

impl FromStr for GenerationMode {
    type Err = ();
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" | "precise" => Ok(Self::Strict),
            "unconstrained" | "artistic" => Ok(Self::Unconstrained),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MosaicConfig {
    /// Grid width in studs.
    pub width: u32,
    /// Grid height in studs.
    pub height: u32,
    #[serde(default)]
    pub mode: GenerationMode,
    /// Placed pieces get ids `"{prefix}-{n}"`.
    #[serde(default = "default_piece_id_prefix")]
    pub piece_id_prefix: String,
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            width: 16,
            height: 16,
            mode: GenerationMode::Strict,
            piece_id_prefix: default_piece_id_prefix(),
        }
    }
}

impl MosaicConfig {
    /// Validates the grid dimensions.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(MosaicError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if (self.width as u64) * (self.height as u64) > u32::MAX as u64 {
            return Err(MosaicError::InvalidConfig(format!(
                "grid {}x{} has too many cells",
                self.width, self.height
            )));
        }
        Ok(())
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Create a fluent builder for `MosaicConfig`.
    pub fn builder() -> MosaicConfigBuilder {
        MosaicConfigBuilder::new()
    }
}

fn default_piece_id_prefix() -> String {
    "piece".into()
}

/// Builder for `MosaicConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct MosaicConfigBuilder {
    cfg: MosaicConfig,
}

impl MosaicConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: MosaicConfig::default(),
        }
    }
    pub fn with_dimensions(mut self, w: u32, h: u32) -> Self {
        self.cfg.width = w;
        self.cfg.height = h;
        self
    }
    pub fn mode(mut self, v: GenerationMode) -> Self {
        self.cfg.mode = v;
        self
    }
    pub fn strict(mut self, v: bool) -> Self {
        self.cfg.mode = if v {
            GenerationMode::Strict
        } else {
            GenerationMode::Unconstrained
        };
        self
    }
    pub fn piece_id_prefix(mut self, v: impl Into<String>) -> Self {
        self.cfg.piece_id_prefix = v.into();
        self
    }
    pub fn build(self) -> MosaicConfig {
        self.cfg
    }
}
