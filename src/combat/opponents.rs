//! Opponent sources. The rules treat opponents as plain input data.

use super::types::Opponent;
use crate::core::config::GameConfig;
use crate::items::StatBlock;

pub trait OpponentProvider {
    /// Opponent for a 1-based stage, or `None` if the stage does not exist.
    fn opponent(&self, stage: u32) -> Option<Opponent>;
}

const STAGE_PREFIXES: [&str; 8] = [
    "Meadow", "Thorn", "Cave", "Bog", "Ember", "Frost", "Storm", "Void",
];
const STAGE_ROOTS: [&str; 6] = ["Slime", "Goblin", "Wolf", "Golem", "Wraith", "Drake"];

/// Opponents that grow linearly with the stage number.
#[derive(Debug, Clone)]
pub struct StageTable {
    base: StatBlock,
    per_stage: StatBlock,
    exp_per_stage: u64,
    gold_per_stage: u64,
    max_level: u32,
}

impl StageTable {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            base: config.stages.base,
            per_stage: config.stages.per_stage,
            exp_per_stage: config.stages.exp_per_stage,
            gold_per_stage: config.stages.gold_per_stage,
            max_level: config.rewards.max_tier as u32,
        }
    }

    pub fn stage_name(stage: u32) -> String {
        let i = stage.saturating_sub(1) as usize;
        format!(
            "{} {}",
            STAGE_PREFIXES[i % STAGE_PREFIXES.len()],
            STAGE_ROOTS[(i / STAGE_PREFIXES.len()) % STAGE_ROOTS.len()]
        )
    }
}

impl OpponentProvider for StageTable {
    fn opponent(&self, stage: u32) -> Option<Opponent> {
        if stage == 0 {
            return None;
        }
        let steps = stage - 1;
        let grow = |base: u32, step: u32| base.saturating_add(step.saturating_mul(steps));
        let stats = StatBlock {
            health: grow(self.base.health, self.per_stage.health),
            attack: grow(self.base.attack, self.per_stage.attack),
            defense: grow(self.base.defense, self.per_stage.defense),
            agility: grow(self.base.agility, self.per_stage.agility),
            critical_rate: grow(self.base.critical_rate, self.per_stage.critical_rate),
            critical_damage: grow(self.base.critical_damage, self.per_stage.critical_damage),
        };
        Some(Opponent {
            name: Self::stage_name(stage),
            level: stage.min(self.max_level),
            stats,
            exp_yield: stage as u64 * self.exp_per_stage,
            gold_yield: stage as u64 * self.gold_per_stage,
        })
    }
}

/// A fixed roster, indexed from stage 1.
impl OpponentProvider for Vec<Opponent> {
    fn opponent(&self, stage: u32) -> Option<Opponent> {
        let index = stage.checked_sub(1)? as usize;
        self.get(index).cloned()
    }
}
