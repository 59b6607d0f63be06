use super::types::Player;
use crate::core::config::GameConfig;
use crate::core::error::{GameError, Result};
use crate::items::{EquipmentInstance, EquipmentSlot, ItemId, StatBlock};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EquipmentSlots {
    pub helmet: Option<EquipmentInstance>,
    pub armor: Option<EquipmentInstance>,
    pub shoes: Option<EquipmentInstance>,
    pub weapon: Option<EquipmentInstance>,
    pub shield: Option<EquipmentInstance>,
    pub accessory: Option<EquipmentInstance>,
    pub ring: Option<EquipmentInstance>,
    pub pet: Option<EquipmentInstance>,
}

impl EquipmentSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: EquipmentSlot) -> Option<&EquipmentInstance> {
        match slot {
            EquipmentSlot::Helmet => self.helmet.as_ref(),
            EquipmentSlot::Armor => self.armor.as_ref(),
            EquipmentSlot::Shoes => self.shoes.as_ref(),
            EquipmentSlot::Weapon => self.weapon.as_ref(),
            EquipmentSlot::Shield => self.shield.as_ref(),
            EquipmentSlot::Accessory => self.accessory.as_ref(),
            EquipmentSlot::Ring => self.ring.as_ref(),
            EquipmentSlot::Pet => self.pet.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: EquipmentSlot) -> &mut Option<EquipmentInstance> {
        match slot {
            EquipmentSlot::Helmet => &mut self.helmet,
            EquipmentSlot::Armor => &mut self.armor,
            EquipmentSlot::Shoes => &mut self.shoes,
            EquipmentSlot::Weapon => &mut self.weapon,
            EquipmentSlot::Shield => &mut self.shield,
            EquipmentSlot::Accessory => &mut self.accessory,
            EquipmentSlot::Ring => &mut self.ring,
            EquipmentSlot::Pet => &mut self.pet,
        }
    }

    /// Replaces the occupant of `slot`, returning the previous one.
    pub fn set(
        &mut self,
        slot: EquipmentSlot,
        item: Option<EquipmentInstance>,
    ) -> Option<EquipmentInstance> {
        std::mem::replace(self.slot_mut(slot), item)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EquipmentInstance> {
        EquipmentSlot::ALL.into_iter().filter_map(move |s| self.get(s))
    }

    pub fn find(&self, id: ItemId) -> Option<&EquipmentInstance> {
        self.iter().find(|e| e.id == id)
    }

    pub fn find_mut(&mut self, id: ItemId) -> Option<&mut EquipmentInstance> {
        let slot = self.find(id)?.slot;
        self.slot_mut(slot).as_mut()
    }

    /// Sum of the derived stats of everything equipped.
    pub fn bonus(&self) -> StatBlock {
        self.iter()
            .fold(StatBlock::ZERO, |acc, item| acc.plus(&item.stats))
    }
}

/// Moves an instance from inventory into its slot. Any previous occupant
/// goes back to inventory. Returns the id of the replaced instance.
pub fn equip(player: &mut Player, item_id: ItemId, config: &GameConfig) -> Result<Option<ItemId>> {
    let item = player
        .inventory
        .take_equipment(item_id)
        .ok_or(GameError::ItemNotFound(item_id))?;
    let slot = item.slot;
    let previous = player.equipment.set(slot, Some(item));
    let previous_id = previous.as_ref().map(|p| p.id);
    if let Some(previous) = previous {
        // The slot we just vacated in inventory guarantees room.
        player.inventory.add_equipment(previous).ok();
    }
    player.clamp_health();
    debug!(item = %item_id, slot = slot.name(), "equipped");
    player.check_invariants(config);
    Ok(previous_id)
}

/// Moves the occupant of `slot` back to inventory.
pub fn unequip(player: &mut Player, slot: EquipmentSlot, config: &GameConfig) -> Result<ItemId> {
    if player.equipment.get(slot).is_none() {
        return Err(GameError::EmptySlot(slot));
    }
    if player.inventory.is_full() {
        return Err(GameError::InventoryFull {
            capacity: player.inventory.capacity(),
        });
    }
    let Some(item) = player.equipment.set(slot, None) else {
        return Err(GameError::EmptySlot(slot));
    };
    let id = item.id;
    player.inventory.add_equipment(item)?;
    player.clamp_health();
    debug!(item = %id, slot = slot.name(), "unequipped");
    player.check_invariants(config);
    Ok(id)
}
