//! Time-based accrual of stamina and reward containers.
//!
//! Both passes are pure functions of `now - last_timestamp` and can be run at
//! any moment: on load, on every tick, or from a periodic timer. A timestamp in
//! the future (clock skew) leaves the player untouched.

use super::types::*;
use crate::character::Player;
use crate::core::config::GameConfig;
use crate::rewards::enqueue_container;
use tracing::{debug, info};

/// Tier of containers earned passively at `level`.
pub fn passive_container_tier(level: u32, config: &GameConfig) -> u8 {
    let tier = 1 + level.saturating_sub(1) / config.idle.container_levels_per_tier;
    config.rewards.clamp_tier(tier)
}

/// Regenerates one stamina per elapsed interval, up to the player's max.
///
/// Partial intervals carry over. Once stamina is full the timestamp follows
/// `now`, so full stamina never banks regeneration time.
pub fn accrue_stamina(player: &mut Player, now_ms: i64, config: &GameConfig) -> StaminaReport {
    let elapsed_ms = now_ms - player.last_stamina_at;
    let mut report = StaminaReport {
        elapsed_ms,
        gained: 0,
        stamina: player.stamina,
    };
    if elapsed_ms < 0 {
        debug!(elapsed_ms, "stamina clock behind, skipping");
        return report;
    }
    if player.stamina >= player.max_stamina {
        player.last_stamina_at = now_ms;
        return report;
    }

    let interval = config.idle.stamina_interval_ms;
    let intervals = elapsed_ms / interval;
    let room = (player.max_stamina - player.stamina) as i64;
    let gained = intervals.min(room) as u32;
    player.stamina += gained;
    if player.stamina >= player.max_stamina {
        player.last_stamina_at = now_ms;
    } else {
        player.last_stamina_at += intervals * interval;
    }

    report.gained = gained;
    report.stamina = player.stamina;
    if gained > 0 {
        debug!(gained, stamina = player.stamina, "stamina regenerated");
    }
    report
}

/// Stamina `accrue_stamina` would leave at `now_ms`, without touching the player.
pub fn projected_stamina(player: &Player, now_ms: i64, config: &GameConfig) -> u32 {
    let elapsed_ms = now_ms - player.last_stamina_at;
    if elapsed_ms < 0 || player.stamina >= player.max_stamina {
        return player.stamina;
    }
    let intervals = elapsed_ms / config.idle.stamina_interval_ms;
    let room = (player.max_stamina - player.stamina) as i64;
    player.stamina + intervals.min(room) as u32
}

/// Grants one container per elapsed interval since the last accrual, capped
/// at `max_offline_containers`. Intervals past the cap are forfeited, and the
/// unfinished remainder of the current interval is kept.
pub fn accrue_passive_rewards(
    player: &mut Player,
    now_ms: i64,
    config: &GameConfig,
) -> AccrualReport {
    let elapsed_ms = now_ms - player.last_container_at;
    let tier = passive_container_tier(player.level, config);
    let mut report = AccrualReport {
        elapsed_ms,
        tier,
        ..AccrualReport::default()
    };
    if elapsed_ms < 0 {
        debug!(elapsed_ms, "container clock behind, skipping");
        return report;
    }

    let interval = config.idle.container_interval_ms;
    let intervals = (elapsed_ms / interval) as u64;
    let granted = intervals.min(config.idle.max_offline_containers as u64);
    for _ in 0..granted {
        report
            .containers
            .push(enqueue_container(player, tier as u32, &config.rewards));
    }
    player.last_container_at = now_ms - elapsed_ms % interval;

    report.intervals = intervals;
    report.forfeited = intervals - granted;
    if granted > 0 {
        info!(
            granted,
            forfeited = report.forfeited,
            tier,
            "passive containers accrued"
        );
    }
    report
}

/// Runs both accrual passes.
pub fn catch_up(player: &mut Player, now_ms: i64, config: &GameConfig) -> IdleReport {
    IdleReport {
        stamina: accrue_stamina(player, now_ms, config),
        rewards: accrue_passive_rewards(player, now_ms, config),
    }
}
