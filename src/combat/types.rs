use crate::character::Player;
use crate::items::StatBlock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two participants of an encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    pub fn other(&self) -> Side {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => f.write_str("player"),
            Side::Opponent => f.write_str("opponent"),
        }
    }
}

/// Opponent definition as supplied by an [`super::OpponentProvider`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opponent {
    pub name: String,
    /// Tier of the container dropped on defeat.
    pub level: u32,
    /// `stats.health` is the opponent's max health.
    pub stats: StatBlock,
    pub exp_yield: u64,
    pub gold_yield: u64,
}

impl Opponent {
    /// Arena snapshot of another player, at full health with their gear on.
    pub fn from_player(player: &Player, exp_yield: u64, gold_yield: u64) -> Self {
        Self {
            name: player.name.clone(),
            level: player.level,
            stats: player.effective_stats(),
            exp_yield,
            gold_yield,
        }
    }
}

/// Stats a side fights with, frozen at encounter start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    pub name: String,
    pub health: u32,
    pub max_health: u32,
    pub stats: StatBlock,
}

impl Combatant {
    pub fn from_player(player: &Player) -> Self {
        let stats = player.effective_stats();
        Self {
            name: player.name.clone(),
            health: player.health.min(stats.health),
            max_health: stats.health,
            stats,
        }
    }

    pub fn from_opponent(opponent: &Opponent) -> Self {
        Self {
            name: opponent.name.clone(),
            health: opponent.stats.health,
            max_health: opponent.stats.health,
            stats: opponent.stats,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Returns the health left.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        self.health = self.health.saturating_sub(amount);
        self.health
    }
}

/// Readiness accumulator and post-action cooldown for one side.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Gauge {
    /// 0 to `readiness_max`.
    pub readiness: f64,
    pub cooldown_ms: u64,
    /// Session time at which the cooldown last reached zero.
    pub cleared_at_ms: u64,
}

impl Gauge {
    pub fn is_ready(&self, readiness_max: f64) -> bool {
        self.readiness >= readiness_max && self.cooldown_ms == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatOutcome {
    Victory,
    Defeat,
    Fled,
}

/// Transient state of one encounter. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatSession {
    pub player: Combatant,
    pub opponent: Combatant,
    pub opponent_level: u32,
    pub exp_yield: u64,
    pub gold_yield: u64,
    pub player_gauge: Gauge,
    pub opponent_gauge: Gauge,
    pub elapsed_ms: u64,
    /// Side entitled to act next, if any side is ready.
    pub turn: Option<Side>,
    pub active: bool,
    pub outcome: Option<CombatOutcome>,
}

impl CombatSession {
    pub fn combatant(&self, side: Side) -> &Combatant {
        match side {
            Side::Player => &self.player,
            Side::Opponent => &self.opponent,
        }
    }

    pub fn combatant_mut(&mut self, side: Side) -> &mut Combatant {
        match side {
            Side::Player => &mut self.player,
            Side::Opponent => &mut self.opponent,
        }
    }

    pub fn gauge(&self, side: Side) -> &Gauge {
        match side {
            Side::Player => &self.player_gauge,
            Side::Opponent => &self.opponent_gauge,
        }
    }

    pub fn gauge_mut(&mut self, side: Side) -> &mut Gauge {
        match side {
            Side::Player => &mut self.player_gauge,
            Side::Opponent => &mut self.opponent_gauge,
        }
    }

    pub fn is_over(&self) -> bool {
        !self.active
    }
}

/// Outcome of one damage roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackResult {
    pub damage: u32,
    pub critical: bool,
}

/// Per-step deltas for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatEvent {
    /// A side's gauge filled and its cooldown is clear.
    Ready(Side),
    Attack {
        actor: Side,
        damage: u32,
        critical: bool,
        target_health: u32,
    },
    Healed {
        amount: u32,
        health: u32,
    },
    Defeated(Side),
    Fled,
}

/// What settling a finished encounter applied to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterSummary {
    pub outcome: CombatOutcome,
    pub health: u32,
    pub experience: Option<crate::progression::ExperienceOutcome>,
    pub container: Option<crate::rewards::RewardContainer>,
    pub gold: u64,
}
