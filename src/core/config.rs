//! Tunable rule tables.
//!
//! Every numeric constant the rules consult lives here, so a deployment can
//! retune the game from a JSON file without touching code. Missing sections
//! and fields fall back to the defaults in [`super::constants`].

use super::constants::*;
use super::error::{GameError, Result};
use super::rng::weight_total;
use crate::character::Job;
use crate::items::{EquipmentSlot, Rarity, StatBlock};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GameConfig {
    pub combat: CombatConfig,
    pub progression: ProgressionConfig,
    pub rewards: RewardConfig,
    pub enhancement: EnhancementConfig,
    pub idle: IdleConfig,
    pub inventory: InventoryConfig,
    pub stages: StageConfig,
}

impl GameConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: GameConfig =
            serde_json::from_str(json).map_err(|e| GameError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .map_err(|e| GameError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, json)
    }

    /// Rejects tables that would make a rule ill-defined.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(GameError::InvalidConfig(msg.to_string()));

        let c = &self.combat;
        if c.cooldown_floor_ms > c.cooldown_base_ms {
            return invalid("combat.cooldown_floor_ms exceeds cooldown_base_ms");
        }
        if c.readiness_max <= 0.0 || c.agility_factor <= 0.0 || c.reference_tick_ms == 0 {
            return invalid("combat readiness parameters must be positive");
        }

        let p = &self.progression;
        if p.exp_per_level == 0 {
            return invalid("progression.exp_per_level must be positive");
        }
        if p.advancement_interval == 0 {
            return invalid("progression.advancement_interval must be positive");
        }
        if p.advancement_rates.iter().any(|&r| r > 100) || p.advancement_rate_floor > 100 {
            return invalid("progression advancement rates must be percentages");
        }

        let r = &self.rewards;
        if r.max_tier == 0 {
            return invalid("rewards.max_tier must be at least 1");
        }
        if !(0.0..=100.0).contains(&r.tier_up_chance) {
            return invalid("rewards.tier_up_chance must be a percentage");
        }
        if !matches!(r.kind_weights.fixed_total(), Some(total) if total <= 100) {
            return invalid("rewards.kind_weights exceed 100 percent");
        }
        match weight_total(r.rarity_weights) {
            None => return invalid("rewards.rarity_weights overflow"),
            Some(0) => return invalid("rewards.rarity_weights are all zero"),
            Some(_) => {}
        }
        match weight_total(r.slot_profiles.iter().map(|p| p.weight)) {
            None => return invalid("rewards.slot_profiles weights overflow"),
            Some(0) => return invalid("rewards.slot_profiles have no generatable slot"),
            Some(_) => {}
        }
        if r.book_targets.is_empty() {
            return invalid("rewards.book_targets is empty");
        }
        if r.book_targets.contains(&Job::Novice) {
            return invalid("rewards.book_targets cannot target the starting job");
        }

        let e = &self.enhancement;
        if e.success_rates.len() != e.max_stars as usize {
            return invalid("enhancement.success_rates must have one entry per star");
        }
        if e.success_rates.iter().any(|&rate| rate > 100) {
            return invalid("enhancement.success_rates must be percentages");
        }
        if e.success_rates.windows(2).any(|w| w[1] > w[0]) {
            return invalid("enhancement.success_rates must be non-increasing");
        }

        let i = &self.idle;
        if i.container_interval_ms <= 0 || i.stamina_interval_ms <= 0 {
            return invalid("idle intervals must be positive");
        }
        if i.container_levels_per_tier == 0 {
            return invalid("idle.container_levels_per_tier must be positive");
        }

        if self.inventory.capacity == 0 {
            return invalid("inventory.capacity must be positive");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub readiness_max: f64,
    /// Readiness gained per agility point per reference tick.
    pub agility_factor: f64,
    pub reference_tick_ms: u64,
    pub cooldown_base_ms: u64,
    pub cooldown_floor_ms: u64,
    pub cooldown_per_agility_ms: u64,
    pub stamina_cost: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            readiness_max: READINESS_MAX,
            agility_factor: READINESS_AGILITY_FACTOR,
            reference_tick_ms: TICK_INTERVAL_MS,
            cooldown_base_ms: ACTION_COOLDOWN_BASE_MS,
            cooldown_floor_ms: ACTION_COOLDOWN_FLOOR_MS,
            cooldown_per_agility_ms: ACTION_COOLDOWN_PER_AGILITY_MS,
            stamina_cost: ENCOUNTER_STAMINA_COST,
        }
    }
}

impl CombatConfig {
    /// `max(floor, base - agility * per_agility)`
    pub fn cooldown_for(&self, agility: u32) -> u64 {
        self.cooldown_base_ms
            .saturating_sub(agility as u64 * self.cooldown_per_agility_ms)
            .max(self.cooldown_floor_ms)
    }

    pub fn readiness_gain(&self, agility: u32, dt_ms: u64) -> f64 {
        agility as f64 * self.agility_factor * (dt_ms as f64 / self.reference_tick_ms as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// Experience threshold is `level * exp_per_level`.
    pub exp_per_level: u64,
    /// Levels that are a multiple of this gate on job advancement.
    pub advancement_interval: u32,
    /// Stats granted per level. `health` is added to max health.
    pub level_up: StatBlock,
    /// Success percentage indexed by the target job's tier (Squire first).
    pub advancement_rates: [u32; 7],
    pub advancement_rate_floor: u32,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            exp_per_level: XP_PER_LEVEL,
            advancement_interval: JOB_ADVANCEMENT_INTERVAL,
            level_up: StatBlock {
                health: LEVEL_UP_MAX_HEALTH,
                attack: LEVEL_UP_ATTACK,
                defense: LEVEL_UP_DEFENSE,
                agility: LEVEL_UP_AGILITY,
                critical_rate: LEVEL_UP_CRITICAL_RATE,
                critical_damage: LEVEL_UP_CRITICAL_DAMAGE,
            },
            advancement_rates: JOB_ADVANCEMENT_RATES,
            advancement_rate_floor: JOB_ADVANCEMENT_RATE_FLOOR,
        }
    }
}

impl ProgressionConfig {
    pub fn threshold(&self, level: u32) -> u64 {
        level as u64 * self.exp_per_level
    }

    pub fn is_gate_level(&self, level: u32) -> bool {
        level % self.advancement_interval == 0
    }

    /// Success chance for advancing into `target`.
    pub fn advancement_rate(&self, target: Job) -> u32 {
        let index = target.tier().saturating_sub(1).min(6);
        self.advancement_rates[index].max(self.advancement_rate_floor)
    }
}

/// Fixed percentages for the non-equipment reward kinds. Equipment takes
/// whatever is left of 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardKindWeights {
    pub currency: u32,
    pub potion: u32,
    pub pet_egg: u32,
    pub job_book: u32,
}

impl Default for RewardKindWeights {
    fn default() -> Self {
        Self {
            currency: REWARD_WEIGHT_CURRENCY,
            potion: REWARD_WEIGHT_POTION,
            pet_egg: REWARD_WEIGHT_PET_EGG,
            job_book: REWARD_WEIGHT_JOB_BOOK,
        }
    }
}

impl RewardKindWeights {
    /// `None` if the fixed weights overflow.
    pub fn fixed_total(&self) -> Option<u32> {
        weight_total([self.currency, self.potion, self.pet_egg, self.job_book])
    }

    /// Whatever the fixed kinds leave of 100.
    pub fn equipment(&self) -> u32 {
        self.fixed_total().map_or(0, |total| 100u32.saturating_sub(total))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormula {
    pub base: u64,
    pub per_tier: u64,
    /// Inclusive upper bound of the random bonus.
    pub random_range: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotencyFormula {
    pub base: u32,
    pub per_tier: u32,
}

impl PotencyFormula {
    pub fn potency(&self, tier: u8) -> u32 {
        self.base + (tier.max(1) as u32 - 1) * self.per_tier
    }
}

/// Generation weight and per-level stat profile for one equipment slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotProfile {
    pub slot: EquipmentSlot,
    pub weight: u32,
    pub per_level: StatBlock,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    pub max_tier: u8,
    pub tier_up_chance: f64,
    pub kind_weights: RewardKindWeights,
    pub currency: CurrencyFormula,
    pub potion: PotencyFormula,
    /// Indexed by [`Rarity::index`].
    pub rarity_weights: [u32; 5],
    pub rarity_multipliers_percent: [u32; 5],
    pub slot_profiles: Vec<SlotProfile>,
    /// Target job of an advancement book, indexed by reward tier - 1.
    /// Tiers past the end map to the last entry.
    pub book_targets: Vec<Job>,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            max_tier: MAX_CONTAINER_TIER,
            tier_up_chance: CONTAINER_TIER_UP_CHANCE,
            kind_weights: RewardKindWeights::default(),
            currency: CurrencyFormula {
                base: CURRENCY_REWARD_BASE,
                per_tier: CURRENCY_REWARD_PER_TIER,
                random_range: CURRENCY_REWARD_RANGE,
            },
            potion: PotencyFormula {
                base: POTION_POTENCY_BASE,
                per_tier: POTION_POTENCY_PER_TIER,
            },
            rarity_weights: RARITY_WEIGHTS,
            rarity_multipliers_percent: RARITY_MULTIPLIERS_PERCENT,
            slot_profiles: default_slot_profiles(),
            book_targets: vec![
                Job::Squire,
                Job::Knight,
                Job::Paladin,
                Job::Crusader,
                Job::Templar,
                Job::Champion,
                Job::Champion,
                Job::Champion,
                Job::Champion,
                Job::Champion,
            ],
        }
    }
}

impl RewardConfig {
    pub fn clamp_tier(&self, tier: u32) -> u8 {
        tier.clamp(1, self.max_tier as u32) as u8
    }

    pub fn book_target(&self, tier: u8) -> Job {
        let index = (tier.max(1) as usize - 1).min(self.book_targets.len() - 1);
        self.book_targets[index]
    }

    pub fn rarity_multiplier_percent(&self, rarity: Rarity) -> u32 {
        self.rarity_multipliers_percent[rarity.index()]
    }

    pub fn slot_profile(&self, slot: EquipmentSlot) -> Option<&SlotProfile> {
        self.slot_profiles.iter().find(|p| p.slot == slot)
    }
}

fn default_slot_profiles() -> Vec<SlotProfile> {
    let profile = |slot, weight, per_level| SlotProfile {
        slot,
        weight,
        per_level,
    };
    vec![
        profile(
            EquipmentSlot::Weapon,
            1,
            StatBlock {
                attack: 5,
                critical_rate: 1,
                critical_damage: 5,
                ..StatBlock::ZERO
            },
        ),
        profile(
            EquipmentSlot::Armor,
            1,
            StatBlock {
                defense: 4,
                health: 20,
                ..StatBlock::ZERO
            },
        ),
        profile(
            EquipmentSlot::Shield,
            1,
            StatBlock {
                defense: 3,
                health: 10,
                ..StatBlock::ZERO
            },
        ),
        profile(
            EquipmentSlot::Helmet,
            1,
            StatBlock {
                defense: 2,
                health: 15,
                ..StatBlock::ZERO
            },
        ),
        profile(
            EquipmentSlot::Shoes,
            1,
            StatBlock {
                agility: 2,
                defense: 1,
                ..StatBlock::ZERO
            },
        ),
        profile(
            EquipmentSlot::Accessory,
            1,
            StatBlock {
                attack: 2,
                critical_rate: 1,
                ..StatBlock::ZERO
            },
        ),
        profile(
            EquipmentSlot::Ring,
            1,
            StatBlock {
                attack: 2,
                critical_damage: 5,
                ..StatBlock::ZERO
            },
        ),
        // Pets are not dropped by containers.
        profile(
            EquipmentSlot::Pet,
            0,
            StatBlock {
                attack: 1,
                agility: 1,
                health: 5,
                ..StatBlock::ZERO
            },
        ),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhancementConfig {
    pub max_stars: u8,
    /// Success percentage indexed by current star count.
    pub success_rates: Vec<u32>,
    pub cost_per_level: u64,
    pub bonus_per_star_percent: u32,
}

impl Default for EnhancementConfig {
    fn default() -> Self {
        Self {
            max_stars: MAX_STARS,
            success_rates: STAR_SUCCESS_RATES.to_vec(),
            cost_per_level: STAR_COST_PER_LEVEL,
            bonus_per_star_percent: STAR_BONUS_PERCENT,
        }
    }
}

impl EnhancementConfig {
    pub fn cost(&self, level: u8) -> u64 {
        level as u64 * self.cost_per_level
    }

    pub fn success_rate(&self, stars: u8) -> u32 {
        self.success_rates.get(stars as usize).copied().unwrap_or(0)
    }

    pub fn multiplier_percent(&self, stars: u8) -> u32 {
        100 + stars as u32 * self.bonus_per_star_percent
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleConfig {
    pub container_interval_ms: i64,
    pub max_offline_containers: u32,
    /// Passive container tier is `1 + (level - 1) / container_levels_per_tier`.
    pub container_levels_per_tier: u32,
    pub max_stamina: u32,
    pub stamina_interval_ms: i64,
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            container_interval_ms: CONTAINER_INTERVAL_MS,
            max_offline_containers: MAX_OFFLINE_CONTAINERS,
            container_levels_per_tier: CONTAINER_LEVELS_PER_TIER,
            max_stamina: MAX_STAMINA,
            stamina_interval_ms: STAMINA_INTERVAL_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    pub capacity: usize,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            capacity: INVENTORY_CAPACITY,
        }
    }
}

/// Linear opponent scaling per stage for the built-in stage table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    pub base: StatBlock,
    pub per_stage: StatBlock,
    pub exp_per_stage: u64,
    pub gold_per_stage: u64,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            base: StatBlock {
                health: STAGE_BASE_HEALTH,
                attack: STAGE_BASE_ATTACK,
                defense: STAGE_BASE_DEFENSE,
                agility: STAGE_BASE_AGILITY,
                critical_rate: STAGE_CRITICAL_RATE,
                critical_damage: STAGE_CRITICAL_DAMAGE,
            },
            per_stage: StatBlock {
                health: STAGE_HEALTH_STEP,
                attack: STAGE_ATTACK_STEP,
                defense: STAGE_DEFENSE_STEP,
                agility: STAGE_AGILITY_STEP,
                ..StatBlock::ZERO
            },
            exp_per_stage: STAGE_EXP_PER_STAGE,
            gold_per_stage: STAGE_GOLD_PER_STAGE,
        }
    }
}
