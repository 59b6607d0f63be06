//! Bounded bag of unequipped equipment and item stacks.
//!
//! Capacity counts entries: each equipment instance and each stack takes one,
//! and adding to an existing stack takes none.

use crate::core::error::{GameError, Result};
use crate::items::{EquipmentInstance, ItemId, ItemKind, ItemStack};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    capacity: usize,
    equipment: Vec<EquipmentInstance>,
    stacks: Vec<ItemStack>,
}

impl Inventory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            equipment: Vec::new(),
            stacks: Vec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.equipment.len() + self.stacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn free_entries(&self) -> usize {
        self.capacity.saturating_sub(self.len())
    }

    pub fn is_full(&self) -> bool {
        self.free_entries() == 0
    }

    fn ensure_room(&self) -> Result<()> {
        if self.is_full() {
            Err(GameError::InventoryFull {
                capacity: self.capacity,
            })
        } else {
            Ok(())
        }
    }

    pub fn equipment(&self) -> &[EquipmentInstance] {
        &self.equipment
    }

    pub fn stacks(&self) -> &[ItemStack] {
        &self.stacks
    }

    pub fn find_equipment(&self, id: ItemId) -> Option<&EquipmentInstance> {
        self.equipment.iter().find(|e| e.id == id)
    }

    pub fn find_equipment_mut(&mut self, id: ItemId) -> Option<&mut EquipmentInstance> {
        self.equipment.iter_mut().find(|e| e.id == id)
    }

    pub fn add_equipment(&mut self, item: EquipmentInstance) -> Result<()> {
        self.ensure_room()?;
        self.equipment.push(item);
        Ok(())
    }

    pub fn take_equipment(&mut self, id: ItemId) -> Option<EquipmentInstance> {
        let index = self.equipment.iter().position(|e| e.id == id)?;
        Some(self.equipment.remove(index))
    }

    pub fn find_stack(&self, id: ItemId) -> Option<&ItemStack> {
        self.stacks.iter().find(|s| s.id == id)
    }

    pub fn find_stack_of(&self, kind: &ItemKind) -> Option<&ItemStack> {
        self.stacks.iter().find(|s| &s.kind == kind)
    }

    /// Total quantity held of `kind`.
    pub fn count_of(&self, kind: &ItemKind) -> u32 {
        self.find_stack_of(kind).map(|s| s.quantity).unwrap_or(0)
    }

    /// Whether `kind` can be added without exceeding capacity.
    pub fn can_stack(&self, kind: &ItemKind) -> bool {
        self.find_stack_of(kind).is_some() || !self.is_full()
    }

    /// Adds `quantity` of `kind`, merging into an existing stack when there is
    /// one. `new_id` is used only when a new stack is created. Returns the stack
    /// id and whether a new stack was created.
    pub fn add_stack(
        &mut self,
        kind: ItemKind,
        quantity: u32,
        new_id: ItemId,
    ) -> Result<(ItemId, bool)> {
        if let Some(stack) = self.stacks.iter_mut().find(|s| s.kind == kind) {
            stack.quantity = stack.quantity.saturating_add(quantity);
            return Ok((stack.id, false));
        }
        self.ensure_room()?;
        self.stacks.push(ItemStack {
            id: new_id,
            kind,
            quantity,
        });
        Ok((new_id, true))
    }

    /// Removes one item from stack `id`, dropping the stack when it empties.
    pub fn take_one(&mut self, id: ItemId) -> Result<ItemKind> {
        let index = self
            .stacks
            .iter()
            .position(|s| s.id == id)
            .ok_or(GameError::ItemNotFound(id))?;
        let stack = &mut self.stacks[index];
        let kind = stack.kind;
        stack.quantity -= 1;
        if stack.quantity == 0 {
            self.stacks.remove(index);
        }
        Ok(kind)
    }

    /// Picks a potion stack: `id` if given, otherwise the lowest-tier potion.
    /// Returns the stack id and potency.
    pub fn select_potion(&self, id: Option<ItemId>) -> Option<(ItemId, u32)> {
        let potions = self.stacks.iter().filter_map(|s| match s.kind {
            ItemKind::Potion { tier, potency } => Some((s.id, tier, potency)),
            _ => None,
        });
        match id {
            Some(id) => potions
                .filter(|(sid, _, _)| *sid == id)
                .map(|(sid, _, potency)| (sid, potency))
                .next(),
            None => potions
                .min_by_key(|(_, tier, _)| *tier)
                .map(|(sid, _, potency)| (sid, potency)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::Job;
    use crate::items::{EquipmentSlot, Rarity, StatBlock};

    fn gear(id: u64) -> EquipmentInstance {
        EquipmentInstance::new(
            ItemId(id),
            EquipmentSlot::Helmet,
            Rarity::Common,
            1,
            StatBlock::ZERO,
        )
    }

    fn potion(tier: u8) -> ItemKind {
        ItemKind::Potion {
            tier,
            potency: 50 * tier as u32,
        }
    }

    #[test]
    fn test_capacity_counts_entries() {
        let mut inv = Inventory::new(2);
        inv.add_equipment(gear(1)).unwrap();
        inv.add_stack(potion(1), 3, ItemId(2)).unwrap();
        assert!(inv.is_full());
        assert_eq!(
            inv.add_equipment(gear(3)),
            Err(GameError::InventoryFull { capacity: 2 })
        );
        // Stacking onto an existing stack needs no room
        let (id, created) = inv.add_stack(potion(1), 2, ItemId(4)).unwrap();
        assert_eq!(id, ItemId(2));
        assert!(!created);
        assert_eq!(inv.count_of(&potion(1)), 5);
        assert!(inv.can_stack(&potion(1)));
        assert!(!inv.can_stack(&potion(2)));
    }

    #[test]
    fn test_take_one_removes_empty_stack() {
        let mut inv = Inventory::new(10);
        let book = ItemKind::JobBook { target: Job::Squire };
        inv.add_stack(book, 1, ItemId(5)).unwrap();
        assert_eq!(inv.take_one(ItemId(5)), Ok(book));
        assert!(inv.is_empty());
        assert_eq!(inv.take_one(ItemId(5)), Err(GameError::ItemNotFound(ItemId(5))));
    }

    #[test]
    fn test_take_equipment() {
        let mut inv = Inventory::new(10);
        inv.add_equipment(gear(1)).unwrap();
        inv.add_equipment(gear(2)).unwrap();
        assert_eq!(inv.take_equipment(ItemId(1)).map(|e| e.id), Some(ItemId(1)));
        assert!(inv.take_equipment(ItemId(1)).is_none());
        assert_eq!(inv.len(), 1);
    }

    #[test]
    fn test_select_potion_prefers_lowest_tier() {
        let mut inv = Inventory::new(10);
        inv.add_stack(potion(3), 1, ItemId(1)).unwrap();
        inv.add_stack(potion(1), 1, ItemId(2)).unwrap();
        inv.add_stack(ItemKind::PetEgg { tier: 1 }, 1, ItemId(3)).unwrap();
        assert_eq!(inv.select_potion(None), Some((ItemId(2), 50)));
        assert_eq!(inv.select_potion(Some(ItemId(1))), Some((ItemId(1), 150)));
        assert_eq!(inv.select_potion(Some(ItemId(3))), None);
    }

    #[test]
    fn test_select_potion_none_when_empty() {
        let inv = Inventory::new(10);
        assert!(inv.select_potion(None).is_none());
    }
}
