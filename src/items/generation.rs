use super::types::{EquipmentInstance, EquipmentSlot, ItemId, Rarity, StatBlock};
use crate::core::config::RewardConfig;
use crate::core::constants::MAX_EQUIPMENT_LEVEL;
use crate::core::rng::RandomSource;

/// Builds an equipment instance with stats from the slot profile, scaled by
/// level and rarity. Slots without a profile get an empty stat block.
pub fn generate_equipment(
    id: ItemId,
    slot: EquipmentSlot,
    rarity: Rarity,
    level: u8,
    config: &RewardConfig,
) -> EquipmentInstance {
    let level = level.clamp(1, MAX_EQUIPMENT_LEVEL);
    let per_level = config
        .slot_profile(slot)
        .map(|p| p.per_level)
        .unwrap_or(StatBlock::ZERO);
    let percent = level as u32 * config.rarity_multiplier_percent(rarity);
    EquipmentInstance::new(id, slot, rarity, level, per_level.scaled_percent(percent))
}

pub fn roll_rarity(config: &RewardConfig, rng: &mut impl RandomSource) -> Rarity {
    rng.pick_weighted(&config.rarity_weights)
        .map(|i| Rarity::ALL[i])
        .unwrap_or(Rarity::Common)
}

/// Draws a slot using the configured generation weights.
pub fn roll_slot(config: &RewardConfig, rng: &mut impl RandomSource) -> Option<EquipmentSlot> {
    let weights: Vec<u32> = config.slot_profiles.iter().map(|p| p.weight).collect();
    rng.pick_weighted(&weights)
        .map(|i| config.slot_profiles[i].slot)
}
