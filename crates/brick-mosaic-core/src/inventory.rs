use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{MosaicError, Result};
use crate::model::{ColorId, InventoryEntry};

/// Caller-owned inventory snapshot. Generation only reads it; all mutation
/// happens on ledgers derived from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    pub entries: Vec<InventoryEntry>,
}

impl Inventory {
    pub fn new(entries: Vec<InventoryEntry>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Every entry must have a non-zero footprint.
    pub fn validate(&self) -> Result<()> {
        for e in &self.entries {
            if e.dimensions.width == 0 || e.dimensions.height == 0 {
                return Err(MosaicError::InvalidInventory(format!(
                    "entry '{}' (color {}) has zero-sized shape {}",
                    e.id, e.color_id, e.dimensions
                )));
            }
        }
        Ok(())
    }

    /// Distinct colors, in order of first appearance.
    pub fn colors(&self) -> Vec<ColorId> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .filter(|e| seen.insert(e.color_id))
            .map(|e| e.color_id)
            .collect()
    }

    pub fn color_set(&self) -> HashSet<ColorId> {
        self.entries.iter().map(|e| e.color_id).collect()
    }

    /// Total stud capacity (`quantity * width * height` summed), saturating at `u64::MAX`.
    pub fn total_studs(&self) -> u64 {
        self.entries
            .iter()
            .map(|e| e.dimensions.area().saturating_mul(e.quantity as u64))
            .fold(0u64, u64::saturating_add)
    }

    /// Adds `entry`, folding it into an existing entry with the same color and
    /// shape if there is one.
    pub fn add(&mut self, entry: InventoryEntry) {
        match self
            .entries
            .iter_mut()
            .find(|e| e.color_id == entry.color_id && e.dimensions == entry.dimensions)
        {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(entry.quantity),
            None => self.entries.push(entry),
        }
    }

    /// Folds duplicate (color, shape) entries into their first occurrence.
    pub fn merge_duplicates(&mut self) {
        let entries = std::mem::take(&mut self.entries);
        for e in entries {
            self.add(e);
        }
    }
}

impl From<Vec<InventoryEntry>> for Inventory {
    fn from(entries: Vec<InventoryEntry>) -> Self {
        Self::new(entries)
    }
}

impl FromIterator<InventoryEntry> for Inventory {
    fn from_iter<T: IntoIterator<Item = InventoryEntry>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
