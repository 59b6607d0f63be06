//! Active-time combat resolution.
//!
//! Each side fills a readiness gauge in proportion to agility and may act once
//! the gauge is full and its post-action cooldown has run out. `tick` is a pure
//! step over elapsed milliseconds, so large or irregular steps are fine.

use super::types::*;
use crate::character::Player;
use crate::core::config::{CombatConfig, GameConfig};
use crate::core::error::{GameError, Result};
use crate::core::rng::RandomSource;
use crate::items::{ItemId, StatBlock};
use crate::progression::grant_experience;
use crate::rewards::enqueue_container;
use tracing::{debug, info};

/// Opens a session against `opponent` from a snapshot of the player.
pub fn start_encounter(player: &Player, opponent: &Opponent) -> CombatSession {
    CombatSession {
        player: Combatant::from_player(player),
        opponent: Combatant::from_opponent(opponent),
        opponent_level: opponent.level,
        exp_yield: opponent.exp_yield,
        gold_yield: opponent.gold_yield,
        player_gauge: Gauge::default(),
        opponent_gauge: Gauge::default(),
        elapsed_ms: 0,
        turn: None,
        active: true,
        outcome: None,
    }
}

/// Checks an encounter could start with `stamina` available.
pub fn check_can_begin(player: &Player, stamina: u32, config: &CombatConfig) -> Result<()> {
    if !player.is_alive() {
        return Err(GameError::PlayerIncapacitated);
    }
    if stamina < config.stamina_cost {
        return Err(GameError::InsufficientStamina {
            required: config.stamina_cost,
            available: stamina,
        });
    }
    Ok(())
}

/// Checks the player can fight, pays the stamina cost and opens the session.
pub fn begin_encounter(
    player: &mut Player,
    opponent: &Opponent,
    config: &CombatConfig,
) -> Result<CombatSession> {
    check_can_begin(player, player.stamina, config)?;
    player.stamina -= config.stamina_cost;
    debug!(opponent = %opponent.name, level = opponent.level, "encounter started");
    Ok(start_encounter(player, opponent))
}

/// `max(1, attack - defense)`
pub fn base_damage(attack: u32, defense: u32) -> u32 {
    attack.saturating_sub(defense).max(1)
}

/// Rolls one attack.
///
/// # Arguments
/// * `attacker` - Stats of the acting side (attack, crit rate, crit damage)
/// * `defender` - Stats of the defending side (defense)
/// * `rng` - One percent draw is taken for the critical check
pub fn roll_attack(
    attacker: &StatBlock,
    defender: &StatBlock,
    rng: &mut impl RandomSource,
) -> AttackResult {
    let base = base_damage(attacker.attack, defender.defense);
    let critical = rng.roll_percent() < attacker.critical_rate as f64;
    let damage = if critical {
        // Never below the floor, even with a sub-100% crit multiplier
        ((base as u64 * attacker.critical_damage as u64 / 100) as u32).max(1)
    } else {
        base
    };
    AttackResult { damage, critical }
}

/// Side entitled to act now, if any. When both are ready, the one whose
/// cooldown cleared first goes; ties go to the player.
pub fn next_actor(session: &CombatSession, readiness_max: f64) -> Option<Side> {
    let player = &session.player_gauge;
    let opponent = &session.opponent_gauge;
    match (player.is_ready(readiness_max), opponent.is_ready(readiness_max)) {
        (false, false) => None,
        (true, false) => Some(Side::Player),
        (false, true) => Some(Side::Opponent),
        (true, true) => {
            if opponent.cleared_at_ms < player.cleared_at_ms {
                Some(Side::Opponent)
            } else {
                Some(Side::Player)
            }
        }
    }
}

/// Returns true when the gauge became ready during this step.
fn advance_gauge(
    gauge: &mut Gauge,
    agility: u32,
    dt_ms: u64,
    start_ms: u64,
    config: &CombatConfig,
) -> bool {
    let was_ready = gauge.is_ready(config.readiness_max);
    gauge.readiness =
        (gauge.readiness + config.readiness_gain(agility, dt_ms)).min(config.readiness_max);
    if gauge.cooldown_ms > 0 {
        if dt_ms >= gauge.cooldown_ms {
            gauge.cleared_at_ms = start_ms + gauge.cooldown_ms;
            gauge.cooldown_ms = 0;
        } else {
            gauge.cooldown_ms -= dt_ms;
        }
    }
    !was_ready && gauge.is_ready(config.readiness_max)
}

/// Advances both gauges and cooldowns by `dt_ms`.
pub fn tick(session: &mut CombatSession, dt_ms: u64, config: &CombatConfig) -> Vec<CombatEvent> {
    let mut events = Vec::new();
    if !session.active {
        return events;
    }
    let start = session.elapsed_ms;
    session.elapsed_ms += dt_ms;

    let player_agility = session.player.stats.agility;
    if advance_gauge(&mut session.player_gauge, player_agility, dt_ms, start, config) {
        events.push(CombatEvent::Ready(Side::Player));
    }
    let opponent_agility = session.opponent.stats.agility;
    if advance_gauge(&mut session.opponent_gauge, opponent_agility, dt_ms, start, config) {
        events.push(CombatEvent::Ready(Side::Opponent));
    }

    session.turn = next_actor(session, config.readiness_max);
    events
}

fn ensure_can_act(session: &CombatSession, side: Side, config: &CombatConfig) -> Result<()> {
    if !session.active {
        return Err(GameError::SessionInactive);
    }
    if !session.gauge(side).is_ready(config.readiness_max) {
        return Err(GameError::NotReady(side));
    }
    let holder = match session.turn {
        Some(held) if session.gauge(held).is_ready(config.readiness_max) => Some(held),
        _ => next_actor(session, config.readiness_max),
    };
    match holder {
        Some(expected) if expected != side => Err(GameError::OutOfTurn { expected }),
        _ => Ok(()),
    }
}

/// The player lets the current step pass without acting. A ready opponent
/// takes the turn; the player stays ready and may act on a later step.
pub fn yield_turn(session: &mut CombatSession, config: &CombatConfig) -> Option<Side> {
    if session.active
        && session.turn == Some(Side::Player)
        && session.opponent_gauge.is_ready(config.readiness_max)
    {
        session.turn = Some(Side::Opponent);
    }
    session.turn
}

/// Empties the actor's gauge and starts its cooldown.
fn spend_turn(session: &mut CombatSession, side: Side, config: &CombatConfig) {
    let cooldown = config.cooldown_for(session.combatant(side).stats.agility);
    let elapsed = session.elapsed_ms;
    let gauge = session.gauge_mut(side);
    gauge.readiness = 0.0;
    gauge.cooldown_ms = cooldown;
    if cooldown == 0 {
        gauge.cleared_at_ms = elapsed;
    }
    session.turn = next_actor(session, config.readiness_max);
}

fn end_session(session: &mut CombatSession, outcome: CombatOutcome) {
    session.active = false;
    session.turn = None;
    session.outcome = Some(outcome);
}

/// `side` attacks. Fails without changing the session if the session is over,
/// the side is not ready, or the other side holds the turn.
pub fn resolve_action(
    session: &mut CombatSession,
    side: Side,
    config: &CombatConfig,
    rng: &mut impl RandomSource,
) -> Result<Vec<CombatEvent>> {
    ensure_can_act(session, side, config)?;

    let target = side.other();
    let attack = roll_attack(
        &session.combatant(side).stats,
        &session.combatant(target).stats,
        rng,
    );
    let target_health = session.combatant_mut(target).take_damage(attack.damage);
    spend_turn(session, side, config);
    debug!(
        actor = %side,
        damage = attack.damage,
        critical = attack.critical,
        target_health,
        "attack"
    );

    let mut events = vec![CombatEvent::Attack {
        actor: side,
        damage: attack.damage,
        critical: attack.critical,
        target_health,
    }];
    if target_health == 0 {
        let outcome = match side {
            Side::Player => CombatOutcome::Victory,
            Side::Opponent => CombatOutcome::Defeat,
        };
        end_session(session, outcome);
        events.push(CombatEvent::Defeated(target));
    }
    Ok(events)
}

/// Drinks a potion instead of attacking. Costs the player's turn and one
/// potion from the inventory; `stack` picks the stack, otherwise the lowest
/// tier is used.
pub fn use_consumable(
    session: &mut CombatSession,
    player: &mut Player,
    stack: Option<ItemId>,
    config: &CombatConfig,
) -> Result<CombatEvent> {
    ensure_can_act(session, Side::Player, config)?;
    let (stack_id, potency) = player
        .inventory
        .select_potion(stack)
        .ok_or(GameError::NoConsumableAvailable)?;
    player.inventory.take_one(stack_id)?;

    let combatant = &mut session.player;
    let amount = potency.min(combatant.max_health.saturating_sub(combatant.health));
    combatant.health += amount;
    let health = combatant.health;
    spend_turn(session, Side::Player, config);
    debug!(stack = %stack_id, amount, health, "potion used in combat");
    Ok(CombatEvent::Healed { amount, health })
}

/// Leaves the encounter. Always succeeds on an active session.
pub fn flee(session: &mut CombatSession) -> Result<CombatEvent> {
    if !session.active {
        return Err(GameError::SessionInactive);
    }
    end_session(session, CombatOutcome::Fled);
    Ok(CombatEvent::Fled)
}

/// Applies a finished encounter to the player: health is written back, and a
/// victory grants experience, a container tagged with the opponent level, and
/// the gold yield.
pub fn settle_encounter(
    player: &mut Player,
    session: &CombatSession,
    config: &GameConfig,
) -> Result<EncounterSummary> {
    let outcome = match session.outcome {
        Some(outcome) if !session.active => outcome,
        _ => return Err(GameError::EncounterInProgress),
    };

    player.health = session.player.health.min(player.max_health());
    let mut summary = EncounterSummary {
        outcome,
        health: player.health,
        experience: None,
        container: None,
        gold: 0,
    };

    if outcome == CombatOutcome::Victory {
        summary.experience = Some(grant_experience(player, session.exp_yield, config));
        summary.container = Some(enqueue_container(
            player,
            session.opponent_level,
            &config.rewards,
        ));
        player.gold = player.gold.saturating_add(session.gold_yield);
        summary.gold = session.gold_yield;
        summary.health = player.health;
    }

    info!(
        outcome = ?outcome,
        health = player.health,
        gold = summary.gold,
        "encounter settled"
    );
    player.check_invariants(config);
    Ok(summary)
}
