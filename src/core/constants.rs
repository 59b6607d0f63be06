// Tick and timing
pub const TICK_INTERVAL_MS: u64 = 100;
pub const READINESS_MAX: f64 = 100.0;
pub const READINESS_AGILITY_FACTOR: f64 = 0.8;
pub const ACTION_COOLDOWN_BASE_MS: u64 = 2000;
pub const ACTION_COOLDOWN_FLOOR_MS: u64 = 1000;
pub const ACTION_COOLDOWN_PER_AGILITY_MS: u64 = 10;
pub const ENCOUNTER_STAMINA_COST: u32 = 1;

// XP and leveling
pub const XP_PER_LEVEL: u64 = 100;
pub const JOB_ADVANCEMENT_INTERVAL: u32 = 4;
pub const LEVEL_UP_MAX_HEALTH: u32 = 20;
pub const LEVEL_UP_ATTACK: u32 = 3;
pub const LEVEL_UP_DEFENSE: u32 = 2;
pub const LEVEL_UP_AGILITY: u32 = 1;
pub const LEVEL_UP_CRITICAL_RATE: u32 = 1;
pub const LEVEL_UP_CRITICAL_DAMAGE: u32 = 5;

// Job advancement success percentage, indexed by the target job's tier (Squire first)
pub const JOB_ADVANCEMENT_RATES: [u32; 7] = [100, 80, 60, 40, 20, 20, 20];
pub const JOB_ADVANCEMENT_RATE_FLOOR: u32 = 20;

// Starting character
pub const STARTING_MAX_HEALTH: u32 = 100;
pub const STARTING_ATTACK: u32 = 10;
pub const STARTING_DEFENSE: u32 = 5;
pub const STARTING_AGILITY: u32 = 10;
pub const STARTING_CRITICAL_RATE: u32 = 5;
pub const STARTING_CRITICAL_DAMAGE: u32 = 150;
pub const STARTING_GOLD: u64 = 0;

// Reward containers
pub const MAX_CONTAINER_TIER: u8 = 10;
pub const CONTAINER_TIER_UP_CHANCE: f64 = 5.0;

// Reward kind weights (percent); equipment takes the remainder
pub const REWARD_WEIGHT_CURRENCY: u32 = 30;
pub const REWARD_WEIGHT_POTION: u32 = 25;
pub const REWARD_WEIGHT_PET_EGG: u32 = 5;
pub const REWARD_WEIGHT_JOB_BOOK: u32 = 5;

// Currency reward: base + tier * per_tier + uniform(0..=range)
pub const CURRENCY_REWARD_BASE: u64 = 100;
pub const CURRENCY_REWARD_PER_TIER: u64 = 50;
pub const CURRENCY_REWARD_RANGE: u32 = 50;

// Potion potency: base + (tier - 1) * per_tier
pub const POTION_POTENCY_BASE: u32 = 50;
pub const POTION_POTENCY_PER_TIER: u32 = 25;

// Rarity distribution (Common, Uncommon, Rare, Epic, Legendary)
pub const RARITY_WEIGHTS: [u32; 5] = [60, 23, 10, 5, 2];
// Rarity stat multipliers as percentages (1x, 1.5x, 2x, 3x, 5x)
pub const RARITY_MULTIPLIERS_PERCENT: [u32; 5] = [100, 150, 200, 300, 500];

// Equipment
pub const MAX_EQUIPMENT_LEVEL: u8 = 10;
pub const MAX_STARS: u8 = 5;
pub const STAR_SUCCESS_RATES: [u32; 5] = [100, 80, 60, 40, 20];
pub const STAR_COST_PER_LEVEL: u64 = 100;
pub const STAR_BONUS_PERCENT: u32 = 20;

// Idle accrual
pub const CONTAINER_INTERVAL_MS: i64 = 60 * 60 * 1000; // 1 hour
pub const MAX_OFFLINE_CONTAINERS: u32 = 12;
pub const CONTAINER_LEVELS_PER_TIER: u32 = 4;
pub const MAX_STAMINA: u32 = 30;
pub const STAMINA_INTERVAL_MS: i64 = 5 * 60 * 1000; // 5 minutes

// Inventory
pub const INVENTORY_CAPACITY: usize = 100;

// Opponent stage table
pub const STAGE_BASE_HEALTH: u32 = 60;
pub const STAGE_HEALTH_STEP: u32 = 25;
pub const STAGE_BASE_ATTACK: u32 = 8;
pub const STAGE_ATTACK_STEP: u32 = 4;
pub const STAGE_BASE_DEFENSE: u32 = 2;
pub const STAGE_DEFENSE_STEP: u32 = 2;
pub const STAGE_BASE_AGILITY: u32 = 8;
pub const STAGE_AGILITY_STEP: u32 = 1;
pub const STAGE_CRITICAL_RATE: u32 = 5;
pub const STAGE_CRITICAL_DAMAGE: u32 = 150;
pub const STAGE_EXP_PER_STAGE: u64 = 20;
pub const STAGE_GOLD_PER_STAGE: u64 = 10;

// Save files
pub const SAVE_VERSION_MAGIC: u64 = 0x4944_4C45_4845_0001; // "IDLEHE" + v1
