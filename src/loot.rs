//! Loot generation and the value-ranked inventory.
//!
//! Loot is pure score: each entry has a value and the raid's result is the
//! sum of what the player carries out. The inventory has a fixed number of
//! slots and always keeps the most valuable items it has been offered.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LootCategory {
    Medical,
    Ammo,
    Valuables,
    Electronics,
    Intel,
}

/// One inventory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootItem {
    pub name: String,
    pub category: LootCategory,
    pub value: u32,
}

impl LootItem {
    pub fn new(name: impl Into<String>, category: LootCategory, value: u32) -> Self {
        Self {
            name: name.into(),
            category,
            value,
        }
    }
}

/// Base loot entry; the rolled value is scaled by the container's worth.
struct LootTemplate {
    name: &'static str,
    category: LootCategory,
    min_value: u32,
    max_value: u32,
}

static LOOT_TABLE: &[LootTemplate] = &[
    LootTemplate { name: "Bandage", category: LootCategory::Medical, min_value: 20, max_value: 40 },
    LootTemplate { name: "Med Kit", category: LootCategory::Medical, min_value: 60, max_value: 100 },
    LootTemplate { name: "Ammo Box", category: LootCategory::Ammo, min_value: 30, max_value: 60 },
    LootTemplate { name: "Gold Chain", category: LootCategory::Valuables, min_value: 120, max_value: 200 },
    LootTemplate { name: "Watch", category: LootCategory::Valuables, min_value: 80, max_value: 150 },
    LootTemplate { name: "Circuit Board", category: LootCategory::Electronics, min_value: 60, max_value: 120 },
    LootTemplate { name: "Graphics Card", category: LootCategory::Electronics, min_value: 250, max_value: 400 },
    LootTemplate { name: "Intel Folder", category: LootCategory::Intel, min_value: 150, max_value: 300 },
];

/// Roll one loot entry for a searched container. A random template's base
/// value is multiplied by `container_value / LOOT_VALUE_BASELINE`.
pub fn generate_container_loot(container_value: u32, rng: &mut impl Rng) -> LootItem {
    let template = &LOOT_TABLE[rng.gen_range(0..LOOT_TABLE.len())];
    let base = rng.gen_range(template.min_value..=template.max_value) as f32;
    let ratio = container_value as f32 / LOOT_VALUE_BASELINE;
    let value = (base * ratio).round().max(1.0) as u32;
    LootItem::new(template.name, template.category, value)
}

/// Loot dropped by a dead enemy.
pub fn generate_enemy_drop(rng: &mut impl Rng) -> LootItem {
    let value = rng.gen_range(ENEMY_LOOT_DROP_MIN..=ENEMY_LOOT_DROP_MAX);
    LootItem::new("Dog Tag", LootCategory::Valuables, value)
}

/// Loot for a loose item placed at map generation.
pub fn generate_ground_loot(rng: &mut impl Rng) -> LootItem {
    generate_container_loot(LOOT_VALUE_BASELINE as u32, rng)
}

/// What happened to an item offered to the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum InsertOutcome {
    /// Stored in a free slot
    Added,
    /// Stored in place of the cheapest item, which is returned
    Replaced(LootItem),
    /// Not stored; the inventory was full of equal or better items
    Discarded(LootItem),
}

/// Fixed-capacity loot inventory with a running value total.
#[derive(Debug, Clone, Serialize)]
pub struct Inventory {
    items: Vec<LootItem>,
    capacity: usize,
    total_value: u32,
}

impl Inventory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
            total_value: 0,
        }
    }

    pub fn items(&self) -> &[LootItem] {
        &self.items
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// Sum of the values of all held items
    pub fn total_value(&self) -> u32 {
        self.total_value
    }

    /// Offer an item. A full inventory swaps out its cheapest item only for
    /// a strictly more valuable one.
    pub fn insert(&mut self, item: LootItem) -> InsertOutcome {
        if !self.is_full() {
            self.total_value = self.total_value.saturating_add(item.value);
            self.items.push(item);
            return InsertOutcome::Added;
        }

        let cheapest = self
            .items
            .iter()
            .enumerate()
            .min_by_key(|(_, held)| held.value)
            .map(|(i, held)| (i, held.value));

        match cheapest {
            Some((index, min_value)) if item.value > min_value => {
                self.total_value = self
                    .total_value
                    .saturating_sub(min_value)
                    .saturating_add(item.value);
                let replaced = std::mem::replace(&mut self.items[index], item);
                InsertOutcome::Replaced(replaced)
            }
            _ => InsertOutcome::Discarded(item),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn item(value: u32) -> LootItem {
        LootItem::new(format!("item-{value}"), LootCategory::Valuables, value)
    }

    fn full_inventory(values: &[u32]) -> Inventory {
        let mut inv = Inventory::new(values.len());
        for &v in values {
            assert_eq!(inv.insert(item(v)), InsertOutcome::Added);
        }
        inv
    }

    #[test]
    fn test_insert_into_free_slot() {
        let mut inv = Inventory::new(2);
        assert_eq!(inv.insert(item(10)), InsertOutcome::Added);
        assert_eq!(inv.total_value(), 10);
        assert_eq!(inv.len(), 1);
    }

    #[test]
    fn test_full_inventory_discards_cheaper_or_equal() {
        let mut inv = full_inventory(&[50, 20, 80]);
        let before = inv.items().to_vec();

        assert_eq!(inv.insert(item(20)), InsertOutcome::Discarded(item(20)));
        assert_eq!(inv.insert(item(5)), InsertOutcome::Discarded(item(5)));

        assert_eq!(inv.items(), before.as_slice());
        assert_eq!(inv.total_value(), 150);
    }

    #[test]
    fn test_full_inventory_replaces_cheapest() {
        let mut inv = full_inventory(&[50, 20, 80]);
        let total_before = inv.total_value();

        assert_eq!(inv.insert(item(35)), InsertOutcome::Replaced(item(20)));
        assert_eq!(inv.total_value(), total_before + 35 - 20);
        assert!(inv.items().iter().all(|i| i.value != 20));
        assert_eq!(inv.len(), 3);
    }

    #[test]
    fn test_total_matches_sum_after_many_inserts() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut inv = Inventory::new(4);
        for _ in 0..50 {
            inv.insert(item(rng.gen_range(1..500)));
            let sum: u32 = inv.items().iter().map(|i| i.value).sum();
            assert_eq!(inv.total_value(), sum);
            assert!(inv.len() <= inv.capacity());
        }
    }

    #[test]
    fn test_container_loot_scales_with_value() {
        let mut rng = StdRng::seed_from_u64(3);
        let min_base = LOOT_TABLE.iter().map(|t| t.min_value).min().unwrap();
        let max_base = LOOT_TABLE.iter().map(|t| t.max_value).max().unwrap();
        for _ in 0..100 {
            let loot = generate_container_loot(500, &mut rng);
            assert!(loot.value >= min_base * 5 && loot.value <= max_base * 5);
        }
    }

    #[test]
    fn test_enemy_drop_in_range() {
        let mut rng = StdRng::seed_from_u64(5);
        let drop = generate_enemy_drop(&mut rng);
        assert!((ENEMY_LOOT_DROP_MIN..=ENEMY_LOOT_DROP_MAX).contains(&drop.value));
    }
}
