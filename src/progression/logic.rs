use super::types::*;
use crate::character::{Job, Player};
use crate::core::config::{GameConfig, ProgressionConfig};
use crate::core::error::{GameError, Result};
use crate::core::rng::RandomSource;
use crate::items::ItemKind;
use tracing::{debug, info};

/// Whether `level` blocks on a job advancement for this player. The final job
/// has nothing to advance to, so it never gates.
pub fn is_gate(player: &Player, level: u32, config: &ProgressionConfig) -> bool {
    config.is_gate_level(level) && player.job.next().is_some()
}

/// Job the player must advance into, if an advancement is pending.
pub fn pending_advancement(player: &Player) -> Option<Job> {
    if player.can_gain_experience {
        None
    } else {
        player.job.next()
    }
}

fn apply_level_grant(player: &mut Player, config: &ProgressionConfig) -> LevelUpEvent {
    let old_level = player.level;
    player.level += 1;
    player.base = player.base.plus(&config.level_up);
    player.heal_full();
    LevelUpEvent {
        old_level,
        new_level: player.level,
        grant: config.level_up,
        max_health: player.max_health(),
    }
}

/// Adds experience and resolves level-ups one at a time.
///
/// Does nothing while an advancement is pending. Reaching the threshold of a
/// gate level clamps experience at the threshold and closes the gate; a
/// level-up that lands on a gate level resets experience to zero.
pub fn grant_experience(
    player: &mut Player,
    amount: u64,
    config: &GameConfig,
) -> ExperienceOutcome {
    let mut outcome = ExperienceOutcome::default();
    if !player.can_gain_experience {
        debug!(amount, "experience ignored, advancement pending");
        return outcome;
    }

    let progression = &config.progression;
    player.experience = player.experience.saturating_add(amount);
    outcome.applied = amount;

    loop {
        let threshold = progression.threshold(player.level);
        if player.experience < threshold {
            break;
        }
        if is_gate(player, player.level, progression) {
            player.experience = threshold;
            player.can_gain_experience = false;
            outcome.advancement_pending = true;
            info!(level = player.level, job = %player.job, "job advancement required");
            break;
        }

        let event = apply_level_grant(player, progression);
        if is_gate(player, player.level, progression) {
            player.experience = 0;
        } else {
            player.experience -= threshold;
        }
        info!(
            from = event.old_level,
            to = event.new_level,
            "level up"
        );
        outcome.level_ups.push(event);
    }

    player.check_invariants(config);
    outcome
}

/// Spends one advancement book on an attempt to reach the next job.
///
/// The book is consumed whatever the outcome. Failure resets experience and
/// reopens experience gain without changing level or job.
pub fn attempt_job_advancement(
    player: &mut Player,
    config: &GameConfig,
    rng: &mut impl RandomSource,
) -> Result<AdvancementResult> {
    if player.can_gain_experience {
        return Err(GameError::AdvancementNotPending);
    }
    let target = player.job.next().ok_or(GameError::MaxJobReached)?;
    let book = player
        .inventory
        .find_stack_of(&ItemKind::JobBook { target })
        .map(|s| s.id)
        .ok_or(GameError::NoAdvancementItem { target })?;

    let success_rate = config.progression.advancement_rate(target);
    player.inventory.take_one(book)?;

    let previous_job = player.job;
    let success = rng.chance(success_rate as f64);
    let level_up = if success {
        let event = apply_level_grant(player, &config.progression);
        player.job = target;
        Some(event)
    } else {
        None
    };
    player.experience = 0;
    player.can_gain_experience = true;

    let result = AdvancementResult {
        success,
        previous_job,
        target_job: target,
        success_rate,
        level: player.level,
        level_up,
    };
    info!(
        success,
        from = %previous_job,
        to = %target,
        rate = success_rate,
        "job advancement attempt"
    );
    player.check_invariants(config);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::ScriptedSource;
    use crate::items::ItemId;

    fn setup() -> (Player, GameConfig) {
        let config = GameConfig::default();
        let player = Player::new("Hero".to_string(), &config, 0);
        (player, config)
    }

    fn give_book(player: &mut Player, target: Job) {
        let id = player.allocate_item_id();
        player
            .inventory
            .add_stack(ItemKind::JobBook { target }, 1, id)
            .unwrap();
    }

    #[test]
    fn test_grant_below_threshold() {
        let (mut player, config) = setup();
        let outcome = grant_experience(&mut player, 50, &config);
        assert_eq!(player.experience, 50);
        assert_eq!(player.level, 1);
        assert!(!outcome.leveled_up());
    }

    #[test]
    fn test_single_level_up_carries_overflow() {
        let (mut player, config) = setup();
        let attack = player.base.attack;
        let outcome = grant_experience(&mut player, 130, &config);
        assert_eq!(player.level, 2);
        assert_eq!(player.experience, 30);
        assert_eq!(outcome.level_ups.len(), 1);
        assert_eq!(player.base.attack, attack + 3);
        assert_eq!(player.health, player.max_health());
    }

    #[test]
    fn test_multi_level_up_one_event_per_threshold() {
        let (mut player, config) = setup();
        // 100 (L1) + 200 (L2) + 50 leftover
        let outcome = grant_experience(&mut player, 350, &config);
        assert_eq!(player.level, 3);
        assert_eq!(player.experience, 50);
        assert_eq!(outcome.level_ups.len(), 2);
        assert_eq!(outcome.level_ups[0].old_level, 1);
        assert_eq!(outcome.level_ups[1].new_level, 3);
    }

    #[test]
    fn test_landing_on_gate_level_resets_experience() {
        let (mut player, config) = setup();
        player.level = 3;
        let outcome = grant_experience(&mut player, 1_000, &config);
        assert_eq!(player.level, 4);
        assert_eq!(player.experience, 0);
        assert!(player.can_gain_experience);
        assert_eq!(outcome.level_ups.len(), 1);
        assert!(!outcome.advancement_pending);
    }

    #[test]
    fn test_gate_clamps_and_closes() {
        let (mut player, config) = setup();
        player.level = 4;
        player.experience = 399;
        let outcome = grant_experience(&mut player, 1, &config);
        assert_eq!(player.level, 4);
        assert_eq!(player.experience, 400);
        assert!(!player.can_gain_experience);
        assert!(outcome.advancement_pending);
        assert_eq!(pending_advancement(&player), Some(Job::Squire));

        let again = grant_experience(&mut player, 5_000, &config);
        assert_eq!(again.applied, 0);
        assert_eq!(player.experience, 400);
        assert_eq!(player.level, 4);
    }

    #[test]
    fn test_final_job_never_gates() {
        let (mut player, config) = setup();
        player.job = Job::Champion;
        player.level = 28;
        grant_experience(&mut player, 2_800, &config);
        assert_eq!(player.level, 29);
        assert!(player.can_gain_experience);
    }

    #[test]
    fn test_advancement_success() {
        let (mut player, config) = setup();
        player.level = 4;
        player.experience = 400;
        player.can_gain_experience = false;
        player.health = 1;
        give_book(&mut player, Job::Squire);

        let result =
            attempt_job_advancement(&mut player, &config, &mut ScriptedSource::always(0.0))
                .unwrap();
        assert!(result.success);
        assert_eq!(player.level, 5);
        assert_eq!(player.job, Job::Squire);
        assert_eq!(player.experience, 0);
        assert!(player.can_gain_experience);
        assert_eq!(player.health, player.max_health());
        assert!(player.inventory.is_empty());
        assert!(result.message().contains("Squire"));
    }

    #[test]
    fn test_advancement_failure_consumes_book() {
        let (mut player, config) = setup();
        player.job = Job::Squire;
        player.level = 8;
        player.experience = 800;
        player.can_gain_experience = false;
        give_book(&mut player, Job::Knight);

        // Knight is 80%: a roll of 90 fails
        let result =
            attempt_job_advancement(&mut player, &config, &mut ScriptedSource::always(0.9))
                .unwrap();
        assert!(!result.success);
        assert_eq!(result.success_rate, 80);
        assert_eq!(player.level, 8);
        assert_eq!(player.job, Job::Squire);
        assert_eq!(player.experience, 0);
        assert!(player.can_gain_experience);
        assert!(player.inventory.is_empty());
    }

    #[test]
    fn test_advancement_preconditions() {
        let (mut player, config) = setup();
        let mut rng = ScriptedSource::always(0.0);
        assert_eq!(
            attempt_job_advancement(&mut player, &config, &mut rng),
            Err(GameError::AdvancementNotPending)
        );

        player.level = 4;
        player.experience = 400;
        player.can_gain_experience = false;
        // Wrong book does not count
        give_book(&mut player, Job::Knight);
        let before = player.clone();
        assert_eq!(
            attempt_job_advancement(&mut player, &config, &mut rng),
            Err(GameError::NoAdvancementItem { target: Job::Squire })
        );
        assert_eq!(player, before);
        assert_eq!(rng.draws(), 0);
        assert_eq!(player.peek_item_id(), ItemId(2));
    }
}
