use super::equipment::EquipmentSlots;
use super::inventory::Inventory;
use crate::core::config::GameConfig;
use crate::core::constants::*;
use crate::core::error::{GameError, Result};
use crate::items::{ItemId, StatBlock};
use crate::rewards::RewardContainer;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub type PlayerId = Uuid;

/// The seven job tiers, in advancement order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Job {
    #[default]
    Novice,
    Squire,
    Knight,
    Paladin,
    Crusader,
    Templar,
    Champion,
}

impl Job {
    pub const ALL: [Job; 7] = [
        Job::Novice,
        Job::Squire,
        Job::Knight,
        Job::Paladin,
        Job::Crusader,
        Job::Templar,
        Job::Champion,
    ];

    /// 0 for Novice, 6 for Champion.
    pub fn tier(&self) -> usize {
        *self as usize
    }

    pub fn next(&self) -> Option<Job> {
        Job::ALL.get(self.tier() + 1).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Job::Novice => "Novice",
            Job::Squire => "Squire",
            Job::Knight => "Knight",
            Job::Paladin => "Paladin",
            Job::Crusader => "Crusader",
            Job::Templar => "Templar",
            Job::Champion => "Champion",
        }
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The player aggregate. Only the rule functions mutate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,

    pub health: u32,
    /// Stats before equipment. `base.health` is the base max health.
    pub base: StatBlock,
    pub stamina: u32,
    pub max_stamina: u32,
    pub last_stamina_at: i64,

    pub level: u32,
    pub experience: u64,
    pub job: Job,
    /// False exactly while a job advancement is pending.
    pub can_gain_experience: bool,

    pub gold: u64,
    pub equipment: EquipmentSlots,
    pub inventory: Inventory,
    /// Unopened containers, oldest first.
    pub containers: Vec<RewardContainer>,
    pub last_container_at: i64,

    next_item_id: u64,
}

impl Player {
    pub fn new(name: String, config: &GameConfig, now_ms: i64) -> Self {
        let base = StatBlock {
            health: STARTING_MAX_HEALTH,
            attack: STARTING_ATTACK,
            defense: STARTING_DEFENSE,
            agility: STARTING_AGILITY,
            critical_rate: STARTING_CRITICAL_RATE,
            critical_damage: STARTING_CRITICAL_DAMAGE,
        };
        Self {
            id: Uuid::new_v4(),
            name,
            health: base.health,
            base,
            stamina: config.idle.max_stamina,
            max_stamina: config.idle.max_stamina,
            last_stamina_at: now_ms,
            level: 1,
            experience: 0,
            job: Job::Novice,
            can_gain_experience: true,
            gold: STARTING_GOLD,
            equipment: EquipmentSlots::new(),
            inventory: Inventory::new(config.inventory.capacity),
            containers: Vec::new(),
            last_container_at: now_ms,
            next_item_id: 1,
        }
    }

    /// Base stats plus every equipped instance's derived stats.
    pub fn effective_stats(&self) -> StatBlock {
        self.base.plus(&self.equipment.bonus())
    }

    pub fn max_health(&self) -> u32 {
        self.effective_stats().health
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn heal_full(&mut self) {
        self.health = self.max_health();
    }

    /// Heals up to `amount`, never past max health. Returns the amount healed.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let healed = amount.min(self.max_health().saturating_sub(self.health));
        self.health += healed;
        healed
    }

    pub fn clamp_health(&mut self) {
        self.health = self.health.min(self.max_health());
    }

    /// Drinks a potion outside combat. `stack` picks the stack, otherwise the
    /// lowest tier is used. Returns the amount healed.
    pub fn consume_potion(&mut self, stack: Option<ItemId>) -> Result<u32> {
        let (id, potency) = self
            .inventory
            .select_potion(stack)
            .ok_or(GameError::NoConsumableAvailable)?;
        self.inventory.take_one(id)?;
        Ok(self.heal(potency))
    }

    /// Peeks the id the next created item will receive.
    pub fn peek_item_id(&self) -> ItemId {
        ItemId(self.next_item_id)
    }

    pub fn allocate_item_id(&mut self) -> ItemId {
        let id = ItemId(self.next_item_id);
        self.next_item_id += 1;
        id
    }

    /// Debug-only checks of the aggregate invariants.
    pub fn check_invariants(&self, config: &GameConfig) {
        debug_assert!(
            self.health <= self.max_health(),
            "health {} exceeds max {}",
            self.health,
            self.max_health()
        );
        debug_assert!(self.level >= 1, "level must be at least 1");
        let threshold = config.progression.threshold(self.level);
        debug_assert!(
            self.experience <= threshold,
            "experience {} exceeds threshold {}",
            self.experience,
            threshold
        );
        if self.can_gain_experience && !config.progression.is_gate_level(self.level) {
            debug_assert!(self.experience < threshold);
        }
        debug_assert!(self.inventory.len() <= self.inventory.capacity());
        for item in self.equipment.iter() {
            debug_assert!(
                self.inventory.find_equipment(item.id).is_none(),
                "equipped item {} also in inventory",
                item.id
            );
            debug_assert!(item.stars <= config.enhancement.max_stars);
            debug_assert!((1..=MAX_EQUIPMENT_LEVEL).contains(&item.level));
        }
        for item in self.inventory.equipment() {
            debug_assert!(item.stars <= config.enhancement.max_stars);
        }
        debug_assert!(self.inventory.stacks().iter().all(|s| s.quantity > 0));
    }
}
