use super::types::*;
use crate::character::Player;
use crate::core::config::GameConfig;
use crate::core::error::{GameError, Result};
use crate::core::rng::RandomSource;
use crate::items::{EquipmentInstance, ItemId};
use tracing::info;

/// Equipped or unequipped instance with this id.
fn find_target(player: &Player, id: ItemId) -> Option<&EquipmentInstance> {
    player
        .equipment
        .find(id)
        .or_else(|| player.inventory.find_equipment(id))
}

/// Inventory instances from `material_ids` that can feed `target`, in the
/// order given. Duplicate ids count once.
pub fn eligible_materials(
    player: &Player,
    target: &EquipmentInstance,
    material_ids: &[ItemId],
) -> Vec<ItemId> {
    let mut eligible: Vec<ItemId> = Vec::new();
    for &id in material_ids {
        if eligible.contains(&id) {
            continue;
        }
        if let Some(material) = player.inventory.find_equipment(id) {
            if target.accepts_material(material) {
                eligible.push(id);
            }
        }
    }
    eligible
}

/// Attempts to add one star to `equipment_id`.
///
/// Needs `stars + 1` materials matching the target's slot, rarity and level,
/// plus `level * cost_per_level` gold. Gold and the first `stars + 1` eligible
/// materials are consumed before the roll. On success the derived stats are
/// recomputed from the stored base.
pub fn upgrade_stars(
    player: &mut Player,
    equipment_id: ItemId,
    material_ids: &[ItemId],
    config: &GameConfig,
    rng: &mut impl RandomSource,
) -> Result<UpgradeResult> {
    let enhancement = &config.enhancement;
    let target = find_target(player, equipment_id).ok_or(GameError::ItemNotFound(equipment_id))?;
    let stars = target.stars;
    if stars >= enhancement.max_stars {
        return Err(GameError::MaxStarsReached { stars });
    }
    let cost = enhancement.cost(target.level);
    if player.gold < cost {
        return Err(GameError::InsufficientFunds {
            required: cost,
            available: player.gold,
        });
    }
    let required = stars as usize + 1;
    let mut materials = eligible_materials(player, target, material_ids);
    if materials.len() < required {
        return Err(GameError::InsufficientMaterials {
            required,
            supplied: materials.len(),
        });
    }
    materials.truncate(required);

    player.gold -= cost;
    for id in &materials {
        player.inventory.take_equipment(*id);
    }

    let success_rate = enhancement.success_rate(stars);
    let success = rng.chance(success_rate as f64);
    let mut new_stars = stars;
    if success {
        let bonus = enhancement.bonus_per_star_percent;
        let item = match player.equipment.find_mut(equipment_id) {
            Some(item) => Some(item),
            None => player.inventory.find_equipment_mut(equipment_id),
        };
        if let Some(item) = item {
            item.stars += 1;
            item.recompute_stats(bonus);
            new_stars = item.stars;
        }
    }

    let message = if success {
        format!(
            "Upgrade succeeded! {} {}",
            equipment_id,
            star_display(new_stars, enhancement.max_stars)
        )
    } else {
        format!(
            "Upgrade failed ({}% chance). {} gold and {} materials were consumed.",
            success_rate, cost, required
        )
    };
    info!(item = %equipment_id, success, stars = new_stars, cost, "star upgrade");

    player.check_invariants(config);
    Ok(UpgradeResult {
        item: equipment_id,
        success,
        stars: new_stars,
        success_rate,
        gold_spent: cost,
        materials_consumed: materials,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::equip;
    use crate::core::rng::ScriptedSource;
    use crate::items::{EquipmentSlot, Rarity, StatBlock};

    fn sword(id: u64, level: u8, rarity: Rarity) -> EquipmentInstance {
        EquipmentInstance::new(
            ItemId(id),
            EquipmentSlot::Weapon,
            rarity,
            level,
            StatBlock {
                attack: 10,
                critical_rate: 1,
                ..StatBlock::ZERO
            },
        )
    }

    fn setup(gold: u64, items: Vec<EquipmentInstance>) -> (Player, GameConfig) {
        let config = GameConfig::default();
        let mut player = Player::new("Hero".to_string(), &config, 0);
        player.gold = gold;
        for item in items {
            player.inventory.add_equipment(item).unwrap();
        }
        (player, config)
    }

    #[test]
    fn test_first_star_success() {
        let (mut player, config) = setup(
            500,
            vec![sword(1, 2, Rarity::Rare), sword(2, 2, Rarity::Rare)],
        );
        let mut rng = ScriptedSource::always(0.5);
        let result =
            upgrade_stars(&mut player, ItemId(1), &[ItemId(2)], &config, &mut rng).unwrap();
        assert!(result.success);
        assert_eq!(result.stars, 1);
        assert_eq!(result.gold_spent, 200);
        assert_eq!(player.gold, 300);
        let item = player.inventory.find_equipment(ItemId(1)).unwrap();
        assert_eq!(item.stats.attack, 12);
        assert!(player.inventory.find_equipment(ItemId(2)).is_none());
    }

    #[test]
    fn test_failure_still_consumes() {
        let mut target = sword(1, 1, Rarity::Common);
        target.stars = 1;
        target.recompute_stats(20);
        let (mut player, config) = setup(
            100,
            vec![target, sword(2, 1, Rarity::Common), sword(3, 1, Rarity::Common)],
        );
        // 1 -> 2 is 80%: a roll of 90 fails
        let mut rng = ScriptedSource::always(0.9);
        let result = upgrade_stars(
            &mut player,
            ItemId(1),
            &[ItemId(2), ItemId(3)],
            &config,
            &mut rng,
        )
        .unwrap();
        assert!(!result.success);
        assert_eq!(result.stars, 1);
        assert_eq!(player.gold, 0);
        assert_eq!(player.inventory.len(), 1);
        assert_eq!(player.inventory.find_equipment(ItemId(1)).unwrap().stats.attack, 12);
    }

    #[test]
    fn test_materials_must_match() {
        let mut other_slot = sword(4, 1, Rarity::Common);
        other_slot.slot = EquipmentSlot::Shield;
        let (mut player, config) = setup(
            1_000,
            vec![
                sword(1, 1, Rarity::Common),
                sword(2, 2, Rarity::Common),
                sword(3, 1, Rarity::Rare),
                other_slot,
            ],
        );
        let before = player.clone();
        let mut rng = ScriptedSource::always(0.0);
        let result = upgrade_stars(
            &mut player,
            ItemId(1),
            &[ItemId(1), ItemId(2), ItemId(3), ItemId(4), ItemId(99)],
            &config,
            &mut rng,
        );
        assert_eq!(
            result,
            Err(GameError::InsufficientMaterials {
                required: 1,
                supplied: 0
            })
        );
        assert_eq!(player, before);
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_duplicate_material_ids_count_once() {
        let mut target = sword(1, 1, Rarity::Common);
        target.stars = 1;
        let (mut player, config) = setup(
            1_000,
            vec![target, sword(2, 1, Rarity::Common)],
        );
        let mut rng = ScriptedSource::always(0.0);
        assert_eq!(
            upgrade_stars(&mut player, ItemId(1), &[ItemId(2), ItemId(2)], &config, &mut rng),
            Err(GameError::InsufficientMaterials {
                required: 2,
                supplied: 1
            })
        );
    }

    #[test]
    fn test_preconditions_in_order() {
        let mut maxed = sword(1, 1, Rarity::Common);
        maxed.stars = 5;
        let (mut player, config) = setup(10, vec![maxed, sword(2, 3, Rarity::Common)]);
        let mut rng = ScriptedSource::always(0.0);
        assert_eq!(
            upgrade_stars(&mut player, ItemId(7), &[], &config, &mut rng),
            Err(GameError::ItemNotFound(ItemId(7)))
        );
        assert_eq!(
            upgrade_stars(&mut player, ItemId(1), &[], &config, &mut rng),
            Err(GameError::MaxStarsReached { stars: 5 })
        );
        assert_eq!(
            upgrade_stars(&mut player, ItemId(2), &[], &config, &mut rng),
            Err(GameError::InsufficientFunds {
                required: 300,
                available: 10
            })
        );
    }

    #[test]
    fn test_equipped_target_raises_effective_stats() {
        let (mut player, config) = setup(
            1_000,
            vec![sword(1, 1, Rarity::Common), sword(2, 1, Rarity::Common)],
        );
        equip(&mut player, ItemId(1), &config).unwrap();
        let attack = player.effective_stats().attack;
        let mut rng = ScriptedSource::always(0.0);
        upgrade_stars(&mut player, ItemId(1), &[ItemId(2)], &config, &mut rng).unwrap();
        assert_eq!(player.effective_stats().attack, attack + 2);
        assert_eq!(player.equipment.find(ItemId(1)).unwrap().stars, 1);
    }

    #[test]
    fn test_only_required_materials_are_taken() {
        let (mut player, config) = setup(
            1_000,
            vec![
                sword(1, 1, Rarity::Common),
                sword(2, 1, Rarity::Common),
                sword(3, 1, Rarity::Common),
            ],
        );
        let mut rng = ScriptedSource::always(0.0);
        let result = upgrade_stars(
            &mut player,
            ItemId(1),
            &[ItemId(3), ItemId(2)],
            &config,
            &mut rng,
        )
        .unwrap();
        assert_eq!(result.materials_consumed, vec![ItemId(3)]);
        assert!(player.inventory.find_equipment(ItemId(2)).is_some());
    }
}
