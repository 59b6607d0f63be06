//! Main simulation runner.
//!
//! Each run plays one seeded player through the real [`GameEngine`], so
//! simulated results follow the same rules as live play. Statistics are
//! tracked from the values the engine hands back.

use super::config::SimConfig;
use super::report::{RunStats, SimReport};
use crate::character::Player;
use crate::combat::{CombatOutcome, StageTable};
use crate::core::clock::{Clock, ManualClock};
use crate::core::config::GameConfig;
use crate::core::engine::GameEngine;
use crate::core::error::Result;
use crate::core::rng::{RandomSource, RngSource, SeededSource};
use crate::enhancement::eligible_materials;
use crate::items::{ItemId, ItemKind};
use crate::progression::pending_advancement;
use crate::rewards::Reward;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Combat step length.
const TICK_MS: u64 = 100;

/// Steps before a stalled encounter is abandoned.
const MAX_TICKS_PER_ENCOUNTER: u32 = 20_000;

/// Container intervals an incapacitated player waits out before giving up.
const MAX_REST_INTERVALS: u32 = 24;

type SimEngine<'a, R> = GameEngine<R, &'a ManualClock>;

/// Run the full simulation and return a report.
pub fn run_simulation(config: &SimConfig, game: &GameConfig) -> Result<SimReport> {
    game.validate()?;
    let mut all_runs = Vec::with_capacity(config.num_runs as usize);

    for run_idx in 0..config.num_runs {
        let rng: SeededSource = match config.seed {
            Some(seed) => SeededSource::from_seed_u64(seed.wrapping_add(run_idx as u64)),
            None => RngSource(ChaCha8Rng::from_entropy()),
        };

        let r = simulate_single_run(run_idx, config, game, rng)?;
        if config.verbosity >= 2 {
            println!(
                "Run {}/{} - Stage {}, Level {}, {}, Wins {}/{} ({:.0}%), Stars {}/{}",
                run_idx + 1,
                config.num_runs,
                r.final_stage,
                r.final_level,
                r.final_job,
                r.victories,
                r.encounters,
                r.win_rate() * 100.0,
                r.upgrade_successes,
                r.upgrade_attempts,
            );
        }
        all_runs.push(r);
    }

    Ok(SimReport::from_runs(all_runs))
}

/// Simulate one player from a fresh save through `max_encounters` fights.
fn simulate_single_run<R: RandomSource>(
    run_idx: u32,
    config: &SimConfig,
    game: &GameConfig,
    rng: R,
) -> Result<RunStats> {
    let clock = ManualClock::new(0);
    let player = Player::new(format!("Sim {}", run_idx + 1), game, clock.now_ms());
    let mut engine = GameEngine::new(player, game.clone(), rng, &clock)?;
    engine.set_auto_battle(true);
    let table = StageTable::new(game);

    let mut stats = RunStats::default();
    let mut stage: u32 = 1;
    let mut wins_on_stage: u32 = 0;

    for _ in 0..config.max_encounters {
        if !recover(&mut engine, &clock, &mut stats)? {
            stats.incapacitated = true;
            break;
        }
        wait_for_stamina(&mut engine, &clock);

        if pending_advancement(engine.player()).is_some() {
            stats.gated_encounters += 1;
        }
        engine.start_stage(&table, stage)?;
        stats.encounters += 1;

        match fight(&mut engine, &clock)? {
            CombatOutcome::Victory => {
                stats.victories += 1;
                wins_on_stage += 1;
                if wins_on_stage >= config.stage_advance_wins {
                    stage += 1;
                    wins_on_stage = 0;
                }
            }
            CombatOutcome::Defeat => {
                stats.defeats += 1;
                stage = stage.saturating_sub(1).max(1);
                wins_on_stage = 0;
            }
            CombatOutcome::Fled => stats.stalemates += 1,
        }
        stats.highest_stage = stats.highest_stage.max(stage);

        engine.accrue_passive_rewards();
        open_containers(&mut engine, &mut stats)?;
        upgrade_equipped(&mut engine, &mut stats)?;
        try_advancement(&mut engine, &mut stats)?;
    }

    let player = engine.player();
    stats.final_level = player.level;
    stats.final_job = player.job;
    stats.final_stage = stage;
    stats.highest_stage = stats.highest_stage.max(stage);
    stats.gold = player.gold;
    stats.equipped_stat_total = player.equipment.iter().map(|i| i.stats.total()).sum();
    stats.containers_left = player.containers.len() as u32;
    stats.simulated_ms = clock.now_ms();
    debug!(run = run_idx, level = stats.final_level, stage, "run finished");
    Ok(stats)
}

/// Ticks the running encounter until it settles. A fight that runs too long
/// is abandoned.
fn fight<R: RandomSource>(
    engine: &mut SimEngine<'_, R>,
    clock: &ManualClock,
) -> Result<CombatOutcome> {
    for _ in 0..MAX_TICKS_PER_ENCOUNTER {
        clock.advance(TICK_MS as i64);
        let tick = engine.tick_combat(TICK_MS)?;
        if let Some(summary) = tick.settled {
            return Ok(summary.outcome);
        }
    }
    Ok(engine.flee_encounter()?.outcome)
}

/// Idles until the next encounter is affordable.
fn wait_for_stamina<R: RandomSource>(engine: &mut SimEngine<'_, R>, clock: &ManualClock) {
    let cost = engine.config().combat.stamina_cost;
    let interval = engine.config().idle.stamina_interval_ms;
    for _ in 0..=cost {
        engine.accrue_stamina();
        if engine.player().stamina >= cost {
            return;
        }
        clock.advance(interval);
    }
}

/// Drinks potions until above half health. A player with no health and no
/// potions rests through container intervals, opening whatever arrives.
/// Returns false if the player is still incapacitated after resting.
fn recover<R: RandomSource>(
    engine: &mut SimEngine<'_, R>,
    clock: &ManualClock,
    stats: &mut RunStats,
) -> Result<bool> {
    let mut rests = 0;
    loop {
        let threshold = engine.player().max_health() / 2;
        while engine.player().health <= threshold
            && engine.player().inventory.select_potion(None).is_some()
        {
            engine.consume_potion(None)?;
            stats.potions_used += 1;
        }
        if engine.player().is_alive() {
            return Ok(true);
        }
        if rests >= MAX_REST_INTERVALS {
            return Ok(false);
        }
        clock.advance(engine.config().idle.container_interval_ms);
        engine.accrue_passive_rewards();
        open_containers(engine, stats)?;
        rests += 1;
        stats.rest_intervals += 1;
    }
}

/// Opens queued containers while the inventory has room, equipping any
/// instance that beats what the slot holds.
fn open_containers<R: RandomSource>(
    engine: &mut SimEngine<'_, R>,
    stats: &mut RunStats,
) -> Result<()> {
    while !engine.player().containers.is_empty() && !engine.player().inventory.is_full() {
        let opened = engine.open_reward_container(0)?;
        stats.record_container(&opened);
        if let Reward::Equipment(item) = &opened.reward {
            if equip_if_better(engine, item.id)? {
                stats.gear_equipped += 1;
            }
        }
    }
    Ok(())
}

fn equip_if_better<R: RandomSource>(engine: &mut SimEngine<'_, R>, id: ItemId) -> Result<bool> {
    let player = engine.player();
    let Some(item) = player.inventory.find_equipment(id) else {
        return Ok(false);
    };
    let better = match player.equipment.get(item.slot) {
        Some(current) => item.stats.total() > current.stats.total(),
        None => true,
    };
    if better {
        engine.equip(id)?;
    }
    Ok(better)
}

/// Feeds spare inventory instances into equipped items for as long as gold
/// and matching materials last.
fn upgrade_equipped<R: RandomSource>(
    engine: &mut SimEngine<'_, R>,
    stats: &mut RunStats,
) -> Result<()> {
    let max_stars = engine.config().enhancement.max_stars;
    let targets: Vec<ItemId> = engine
        .player()
        .equipment
        .iter()
        .filter(|i| i.stars < max_stars)
        .map(|i| i.id)
        .collect();

    for id in targets {
        loop {
            let player = engine.player();
            let Some(target) = player.equipment.find(id) else {
                break;
            };
            let cost = engine.config().enhancement.cost(target.level);
            if target.stars >= max_stars || player.gold < cost {
                break;
            }
            let spare: Vec<ItemId> = player.inventory.equipment().iter().map(|i| i.id).collect();
            let materials = eligible_materials(player, target, &spare);
            if materials.len() <= target.stars as usize {
                break;
            }
            let result = engine.upgrade_equipment_stars(id, &materials)?;
            stats.upgrade_attempts += 1;
            if result.success {
                stats.upgrade_successes += 1;
            }
        }
    }
    Ok(())
}

/// Attempts a pending job advancement when the matching book is held.
fn try_advancement<R: RandomSource>(
    engine: &mut SimEngine<'_, R>,
    stats: &mut RunStats,
) -> Result<()> {
    let Some(target) = pending_advancement(engine.player()) else {
        return Ok(());
    };
    let has_book = engine
        .player()
        .inventory
        .count_of(&ItemKind::JobBook { target })
        > 0;
    if has_book {
        let result = engine.attempt_job_advancement()?;
        stats.advancement_attempts += 1;
        if result.success {
            stats.advancement_successes += 1;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulation_runs() {
        let config = SimConfig {
            num_runs: 2,
            seed: Some(99_999),
            max_encounters: 40,
            verbosity: 0,
            ..Default::default()
        };
        let report = run_simulation(&config, &GameConfig::default()).unwrap();

        assert_eq!(report.num_runs, 2);
        assert!(report.avg_encounters > 0.0);
        assert!(report.avg_containers_opened > 0.0);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let config = SimConfig {
            num_runs: 3,
            seed: Some(42),
            max_encounters: 30,
            verbosity: 0,
            ..Default::default()
        };
        let game = GameConfig::default();
        let a = run_simulation(&config, &game).unwrap();
        let b = run_simulation(&config, &game).unwrap();
        assert_eq!(a.run_stats, b.run_stats);
    }

    #[test]
    fn test_stats_track_levels() {
        let config = SimConfig {
            num_runs: 1,
            seed: Some(777),
            max_encounters: 60,
            verbosity: 0,
            ..Default::default()
        };
        let game = GameConfig::default();
        let stats =
            simulate_single_run(0, &config, &game, SeededSource::from_seed_u64(777)).unwrap();

        assert!(stats.victories >= 3);
        assert!(stats.final_level > 1);
        assert!(stats.simulated_ms > 0);
    }

    #[test]
    fn test_invalid_game_config_is_rejected() {
        let mut game = GameConfig::default();
        game.inventory.capacity = 0;
        assert!(run_simulation(&SimConfig::quick(1), &game).is_err());
    }
}
