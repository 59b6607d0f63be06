use super::types::*;
use crate::character::Player;
use crate::core::config::{GameConfig, RewardConfig};
use crate::core::error::{GameError, Result};
use crate::core::rng::RandomSource;
use crate::items::{generate_equipment, roll_rarity, roll_slot, EquipmentSlot, ItemId, ItemKind};
use tracing::{debug, warn};

/// Appends a container to the back of the queue. `tier` is clamped to the
/// configured range.
pub fn enqueue_container(player: &mut Player, tier: u32, config: &RewardConfig) -> RewardContainer {
    let container = RewardContainer {
        id: player.allocate_item_id(),
        tier: config.clamp_tier(tier),
    };
    player.containers.push(container);
    debug!(id = %container.id, tier = container.tier, "container enqueued");
    container
}

/// Keeps `tier` or bumps it by one, capped at the max tier.
pub fn roll_reward_tier(tier: u8, config: &RewardConfig, rng: &mut impl RandomSource) -> u8 {
    if rng.chance(config.tier_up_chance) {
        tier.saturating_add(1).min(config.max_tier)
    } else {
        tier
    }
}

pub fn roll_reward_kind(config: &RewardConfig, rng: &mut impl RandomSource) -> RewardKind {
    let w = &config.kind_weights;
    let weights = [w.currency, w.potion, w.pet_egg, w.job_book, w.equipment()];
    rng.pick_weighted(&weights)
        .map(|i| RewardKind::ALL[i])
        .unwrap_or(RewardKind::Equipment)
}

/// Currency amount for a reward tier. The random bonus is inclusive of
/// `random_range`.
pub fn roll_currency(tier: u8, config: &RewardConfig, rng: &mut impl RandomSource) -> u64 {
    let c = &config.currency;
    c.base + tier as u64 * c.per_tier + rng.roll_below(c.random_range + 1) as u64
}

/// Adds one item of `kind`, allocating a stack id only when a new stack is
/// created. Fails without mutation when a new stack would not fit.
fn stash(player: &mut Player, kind: ItemKind) -> Result<ItemId> {
    let new_id = player.peek_item_id();
    let (id, created) = player.inventory.add_stack(kind, 1, new_id)?;
    if created {
        player.allocate_item_id();
    }
    Ok(id)
}

fn materialize(
    player: &mut Player,
    tier: u8,
    kind: RewardKind,
    config: &RewardConfig,
    rng: &mut impl RandomSource,
) -> Result<Reward> {
    let reward = match kind {
        RewardKind::Currency => {
            let amount = roll_currency(tier, config, rng);
            player.gold = player.gold.saturating_add(amount);
            Reward::Currency { amount }
        }
        RewardKind::Potion => {
            let potency = config.potion.potency(tier);
            let stack = stash(player, ItemKind::Potion { tier, potency })?;
            Reward::Potion {
                stack,
                tier,
                potency,
            }
        }
        RewardKind::PetEgg => {
            let stack = stash(player, ItemKind::PetEgg { tier })?;
            Reward::PetEgg { stack, tier }
        }
        RewardKind::JobBook => {
            let target = config.book_target(tier);
            let stack = stash(player, ItemKind::JobBook { target })?;
            Reward::JobBook { stack, target }
        }
        RewardKind::Equipment => {
            let rarity = roll_rarity(config, rng);
            let slot = roll_slot(config, rng).unwrap_or(EquipmentSlot::Weapon);
            if player.inventory.is_full() {
                return Err(GameError::InventoryFull {
                    capacity: player.inventory.capacity(),
                });
            }
            let item = generate_equipment(player.peek_item_id(), slot, rarity, tier, config);
            player.inventory.add_equipment(item.clone())?;
            player.allocate_item_id();
            Reward::Equipment(item)
        }
    };
    Ok(reward)
}

/// Opens the container at `index` and produces exactly one reward.
///
/// The container leaves the queue only when the reward was materialized. If
/// the reward needs an inventory entry and none is free, the call fails with
/// `InventoryFull` and the player is unchanged.
pub fn open_container(
    player: &mut Player,
    index: usize,
    config: &GameConfig,
    rng: &mut impl RandomSource,
) -> Result<OpenedContainer> {
    let container = *player
        .containers
        .get(index)
        .ok_or(GameError::InvalidContainerIndex {
            index,
            len: player.containers.len(),
        })?;

    let rewards = &config.rewards;
    let reward_tier = roll_reward_tier(container.tier, rewards, rng);
    let kind = roll_reward_kind(rewards, rng);
    let reward = match materialize(player, reward_tier, kind, rewards, rng) {
        Ok(reward) => reward,
        Err(e) => {
            warn!(
                container = %container.id,
                kind = kind.name(),
                error = %e,
                "container left unopened"
            );
            return Err(e);
        }
    };

    player.containers.remove(index);
    debug!(
        container = %container.id,
        tier = reward_tier,
        reward = %reward.describe(),
        "container opened"
    );
    player.check_invariants(config);
    Ok(OpenedContainer {
        container,
        reward_tier,
        reward,
    })
}
