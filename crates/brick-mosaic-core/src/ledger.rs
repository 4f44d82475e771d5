//! Per-call stock ledgers.
//!
//! Two independent views of the same inventory snapshot are built fresh for
//! every generation call and dropped when it returns:
//! - [`AreaLedger`]: stud capacity per color, consulted by the assignment pass.
//! - [`ShapeLedger`]: remaining count per (color, shape), consulted by the packer.
//!
//! Decrementing one never touches the other, so they may disagree about what
//! is still affordable.

use std::collections::HashMap;

use crate::inventory::Inventory;
use crate::model::{ColorId, ShapeKey};

/// colorId -> remaining stud capacity.
#[derive(Debug, Clone, Default)]
pub struct AreaLedger {
    capacity: HashMap<ColorId, u64>,
}

impl AreaLedger {
    pub fn from_inventory(inventory: &Inventory) -> Self {
        let mut capacity: HashMap<ColorId, u64> = HashMap::new();
        for e in &inventory.entries {
            let studs = e.dimensions.area().saturating_mul(e.quantity as u64);
            let c = capacity.entry(e.color_id).or_insert(0);
            *c = c.saturating_add(studs);
        }
        Self { capacity }
    }

    pub fn capacity(&self, color: ColorId) -> u64 {
        self.capacity.get(&color).copied().unwrap_or(0)
    }

    /// Consumes one stud of `color` if any is left.
    pub fn take_stud(&mut self, color: ColorId) -> bool {
        match self.capacity.get_mut(&color) {
            Some(c) if *c > 0 => {
                *c -= 1;
                true
            }
            _ => false,
        }
    }
}

/// colorId -> shapeKey -> remaining quantity. Shapes of one color keep the
/// order in which they first appear in the inventory.
#[derive(Debug, Clone, Default)]
pub struct ShapeLedger {
    stock: HashMap<ColorId, Vec<(ShapeKey, u32)>>,
}

impl ShapeLedger {
    /// Groups by color, then by unrotated shape, summing duplicate shapes.
    pub fn from_inventory(inventory: &Inventory) -> Self {
        let mut stock: HashMap<ColorId, Vec<(ShapeKey, u32)>> = HashMap::new();
        for e in &inventory.entries {
            let shapes = stock.entry(e.color_id).or_default();
            match shapes.iter_mut().find(|(k, _)| *k == e.dimensions) {
                Some((_, q)) => *q = q.saturating_add(e.quantity),
                None => shapes.push((e.dimensions, e.quantity)),
            }
        }
        Self { stock }
    }

    pub fn is_empty(&self) -> bool {
        self.stock.is_empty()
    }

    pub fn remaining(&self, color: ColorId, key: ShapeKey) -> u32 {
        self.stock
            .get(&color)
            .and_then(|shapes| shapes.iter().find(|(k, _)| *k == key))
            .map(|&(_, q)| q)
            .unwrap_or(0)
    }

    /// Shapes of `color` with stock left, in ledger order.
    pub fn available(&self, color: ColorId) -> impl Iterator<Item = ShapeKey> + '_ {
        self.stock
            .get(&color)
            .into_iter()
            .flatten()
            .filter(|(_, q)| *q > 0)
            .map(|&(k, _)| k)
    }

    /// Removes one piece of `key`; false if none was left.
    pub fn take_piece(&mut self, color: ColorId, key: ShapeKey) -> bool {
        let Some(shapes) = self.stock.get_mut(&color) else {
            return false;
        };
        match shapes.iter_mut().find(|(k, _)| *k == key) {
            Some((_, q)) if *q > 0 => {
                *q -= 1;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Dimensions, InventoryEntry};

    fn inv() -> Inventory {
        Inventory::new(vec![
            InventoryEntry::new(5, 1, 2, 1),
            InventoryEntry::new(5, 2, 2, 2),
            InventoryEntry::new(5, 1, 2, 3),
            InventoryEntry::new(7, 1, 1, 2),
        ])
    }

    #[test]
    fn area_capacity_sums_studs() {
        let mut a = AreaLedger::from_inventory(&inv());
        assert_eq!(a.capacity(5), 4 * 2 + 2 * 4);
        assert_eq!(a.capacity(7), 2);
        assert!(a.take_stud(7));
        assert!(a.take_stud(7));
        assert!(!a.take_stud(7));
        assert!(!a.take_stud(99));
    }

    #[test]
    fn area_capacity_saturates_on_huge_stock() {
        let inventory = Inventory::new(vec![
            InventoryEntry::new(5, u32::MAX, u32::MAX, u32::MAX),
            InventoryEntry::new(5, 2, 2, 1),
        ]);
        let mut a = AreaLedger::from_inventory(&inventory);
        assert_eq!(a.capacity(5), u64::MAX);
        assert!(a.take_stud(5));
        assert_eq!(a.capacity(5), u64::MAX - 1);
    }

    #[test]
    fn shape_ledger_merges_and_keeps_order() {
        let mut s = ShapeLedger::from_inventory(&inv());
        let shapes: Vec<_> = s.available(5).collect();
        assert_eq!(shapes, vec![Dimensions::new(1, 2), Dimensions::new(2, 2)]);
        assert_eq!(s.remaining(5, Dimensions::new(1, 2)), 4);
        for _ in 0..2 {
            assert!(s.take_piece(5, Dimensions::new(2, 2)));
        }
        assert!(!s.take_piece(5, Dimensions::new(2, 2)));
        let shapes: Vec<_> = s.available(5).collect();
        assert_eq!(shapes, vec![Dimensions::new(1, 2)]);
    }

    #[test]
    fn ledgers_are_independent() {
        let inventory = inv();
        let mut a = AreaLedger::from_inventory(&inventory);
        let s = ShapeLedger::from_inventory(&inventory);
        while a.take_stud(7) {}
        assert_eq!(a.capacity(7), 0);
        assert_eq!(s.remaining(7, Dimensions::UNIT), 2);
    }
}
