//! Integration test: experience -> level ladder -> job gate -> advancement.

use idle_hero::character::Job;
use idle_hero::items::ItemKind;
use idle_hero::progression::{attempt_job_advancement, grant_experience, pending_advancement};
use idle_hero::{GameConfig, GameError, Player, ScriptedSource};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn fresh() -> (Player, GameConfig) {
    let config = GameConfig::default();
    let player = Player::new("Gatekeeper".to_string(), &config, 0);
    (player, config)
}

fn give_book(player: &mut Player, target: Job) {
    let id = player.allocate_item_id();
    player
        .inventory
        .add_stack(ItemKind::JobBook { target }, 1, id)
        .unwrap();
}

// =========================================================================
// Level 4 gate, end to end
// =========================================================================

#[test]
fn test_level_four_gate_then_advancement() {
    let (mut player, config) = fresh();
    player.level = 4;
    player.experience = 399;

    let outcome = grant_experience(&mut player, 1, &config);
    assert!(outcome.advancement_pending);
    assert!(!outcome.leveled_up());
    assert_eq!(player.level, 4);
    assert_eq!(player.experience, 400);
    assert!(!player.can_gain_experience);
    assert_eq!(pending_advancement(&player), Some(Job::Squire));

    give_book(&mut player, Job::Squire);
    player.health = 1;
    let mut forced_success = ScriptedSource::always(0.0);
    let result = attempt_job_advancement(&mut player, &config, &mut forced_success).unwrap();

    assert!(result.success);
    assert_eq!(result.previous_job, Job::Novice);
    assert_eq!(result.target_job, Job::Squire);
    assert_eq!(player.level, 5);
    assert_eq!(player.experience, 0);
    assert!(player.can_gain_experience);
    assert_eq!(player.job, Job::Squire);
    assert_eq!(player.health, player.max_health());
    assert_eq!(player.inventory.count_of(&ItemKind::JobBook { target: Job::Squire }), 0);
}

#[test]
fn test_failed_advancement_reopens_experience() {
    let (mut player, config) = fresh();
    player.level = 8;
    player.job = Job::Squire;
    player.experience = 800;
    player.can_gain_experience = false;
    give_book(&mut player, Job::Knight);

    let mut forced_failure = ScriptedSource::always(0.999);
    let result = attempt_job_advancement(&mut player, &config, &mut forced_failure).unwrap();

    assert!(!result.success);
    assert_eq!(player.level, 8);
    assert_eq!(player.job, Job::Squire);
    assert_eq!(player.experience, 0);
    assert!(player.can_gain_experience);
    assert_eq!(player.inventory.count_of(&ItemKind::JobBook { target: Job::Knight }), 0);

    // Climbing back to the gate closes it again
    let outcome = grant_experience(&mut player, 10_000, &config);
    assert!(outcome.advancement_pending);
    assert_eq!(player.level, 8);
    assert_eq!(player.experience, 800);
}

#[test]
fn test_advancement_needs_matching_book() {
    let (mut player, config) = fresh();
    player.level = 4;
    player.experience = 400;
    player.can_gain_experience = false;
    give_book(&mut player, Job::Knight);
    let before = player.clone();

    let mut rng = ScriptedSource::always(0.0);
    assert_eq!(
        attempt_job_advancement(&mut player, &config, &mut rng),
        Err(GameError::NoAdvancementItem {
            target: Job::Squire
        })
    );
    assert_eq!(player, before);
}

// =========================================================================
// Ladder properties over random grants
// =========================================================================

#[test]
fn test_locked_player_never_changes() {
    let (mut player, config) = fresh();
    player.level = 12;
    player.job = Job::Knight;
    player.experience = 1_200;
    player.can_gain_experience = false;

    let mut rng = ChaCha8Rng::seed_from_u64(12);
    for _ in 0..500 {
        let amount: u64 = rng.gen_range(0..1_000_000);
        let outcome = grant_experience(&mut player, amount, &config);
        assert_eq!(outcome.applied, 0);
        assert_eq!(player.level, 12);
        assert_eq!(player.experience, 1_200);
    }
}

#[test]
fn test_one_event_per_threshold_crossed() {
    let config = GameConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    // Start below a gate so every crossing is a plain level-up
    let starts = [1u32, 2, 3, 5, 6, 7, 9, 10, 11];

    for _ in 0..500 {
        let mut player = Player::new("Climber".to_string(), &config, 0);
        let start = starts[rng.gen_range(0..starts.len())];
        player.level = start;
        player.experience = rng.gen_range(0..start as u64 * 100);
        let amount: u64 = rng.gen_range(0..5_000);

        let outcome = grant_experience(&mut player, amount, &config);

        for (i, event) in outcome.level_ups.iter().enumerate() {
            assert_eq!(event.old_level, start + i as u32);
            assert_eq!(event.new_level, start + i as u32 + 1);
        }
        assert_eq!(player.level, start + outcome.level_ups.len() as u32);
        if player.level % 4 == 0 && outcome.leveled_up() && !outcome.advancement_pending {
            assert_eq!(player.experience, 0);
        } else if !outcome.advancement_pending {
            assert!(player.experience < player.level as u64 * 100);
        } else {
            assert_eq!(player.experience, player.level as u64 * 100);
            assert_eq!(player.level % 4, 0);
        }
    }
}

#[test]
fn test_landing_on_gate_resets_exactly() {
    let (mut player, config) = fresh();
    // 100 + 200 + 300 crosses into level 4 with 400 to spare
    let outcome = grant_experience(&mut player, 1_000, &config);
    assert_eq!(outcome.level_ups.len(), 3);
    assert_eq!(player.level, 4);
    assert_eq!(player.experience, 0);
    assert!(player.can_gain_experience);
    assert!(!outcome.advancement_pending);
}

#[test]
fn test_level_up_grant_applies_fixed_stats() {
    let (mut player, config) = fresh();
    let before = player.base;
    let max_before = player.max_health();
    grant_experience(&mut player, 100, &config);
    assert_eq!(player.level, 2);
    assert_eq!(player.base.attack, before.attack + 3);
    assert_eq!(player.base.defense, before.defense + 2);
    assert_eq!(player.base.agility, before.agility + 1);
    assert_eq!(player.base.critical_rate, before.critical_rate + 1);
    assert_eq!(player.base.critical_damage, before.critical_damage + 5);
    assert_eq!(player.max_health(), max_before + 20);
    assert_eq!(player.health, player.max_health());
}

#[test]
fn test_champion_never_gates() {
    let (mut player, config) = fresh();
    player.job = Job::Champion;
    player.level = 28;
    player.experience = 0;
    let outcome = grant_experience(&mut player, 2_800, &config);
    assert!(!outcome.advancement_pending);
    assert_eq!(player.level, 29);
    assert!(player.can_gain_experience);
}
