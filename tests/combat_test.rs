//! Integration test: encounter lifecycle through the engine.
//!
//! Start -> ticks -> actions -> settlement, with the player driven by hand
//! or by auto battle.

use idle_hero::combat::{roll_attack, CombatEvent, CombatOutcome, Opponent, Side};
use idle_hero::items::{ItemKind, StatBlock};
use idle_hero::{
    GameConfig, GameEngine, GameError, ManualClock, Player, ScriptedSource, SeededSource,
};

fn opponent(health: u32, attack: u32, agility: u32) -> Opponent {
    Opponent {
        name: "Training Dummy".to_string(),
        level: 3,
        stats: StatBlock {
            health,
            attack,
            defense: 0,
            agility,
            critical_rate: 0,
            critical_damage: 150,
        },
        exp_yield: 50,
        gold_yield: 7,
    }
}

fn give_potions(player: &mut Player, quantity: u32) {
    let id = player.allocate_item_id();
    player
        .inventory
        .add_stack(ItemKind::Potion { tier: 1, potency: 50 }, quantity, id)
        .unwrap();
}

fn engine(player: Player, clock: &ManualClock) -> GameEngine<ScriptedSource, &ManualClock> {
    GameEngine::new(player, GameConfig::default(), ScriptedSource::always(0.99), clock).unwrap()
}

// =========================================================================
// Damage floor
// =========================================================================

#[test]
fn test_damage_floor_over_many_draws() {
    let attacker = StatBlock {
        attack: 50,
        critical_rate: 50,
        critical_damage: 300,
        ..StatBlock::ZERO
    };
    let defender = StatBlock {
        defense: 200,
        ..StatBlock::ZERO
    };

    let mut seeded = SeededSource::from_seed_u64(1_000);
    let mut crits = 0;
    for _ in 0..1_000 {
        let hit = roll_attack(&attacker, &defender, &mut seeded);
        assert_eq!(hit.damage, 1);
        crits += hit.critical as u32;
    }
    assert!(crits > 0 && crits < 1_000);

    let mut forced = ScriptedSource::new(vec![0.0, 0.99]);
    for i in 0..1_000 {
        let hit = roll_attack(&attacker, &defender, &mut forced);
        assert_eq!(hit.critical, i % 2 == 0);
        assert_eq!(hit.damage, 1);
    }
}

// =========================================================================
// Victory with auto battle
// =========================================================================

#[test]
fn test_auto_battle_victory_applies_rewards() {
    let config = GameConfig::default();
    let player = Player::new("Fighter".to_string(), &config, 0);
    let clock = ManualClock::new(0);
    let mut engine = engine(player, &clock);
    engine.set_auto_battle(true);

    engine.start_encounter(&opponent(1, 0, 1)).unwrap();
    let mut settled = None;
    for _ in 0..100 {
        let tick = engine.tick_combat(100).unwrap();
        if tick.settled.is_some() {
            assert!(tick.events.contains(&CombatEvent::Defeated(Side::Opponent)));
            settled = tick.settled;
            break;
        }
    }

    let summary = settled.expect("weak opponent should fall");
    assert_eq!(summary.outcome, CombatOutcome::Victory);
    assert_eq!(summary.gold, 7);
    assert_eq!(summary.container.map(|c| c.tier), Some(3));
    let player = engine.player();
    assert_eq!(player.experience, 50);
    assert_eq!(player.gold, 7);
    assert_eq!(player.containers.len(), 1);
    assert_eq!(player.stamina, player.max_stamina - 1);
}

// =========================================================================
// Manual turns
// =========================================================================

#[test]
fn test_potion_costs_the_turn_and_flee_keeps_health() {
    let config = GameConfig::default();
    let mut player = Player::new("Fighter".to_string(), &config, 0);
    player.health = 20;
    give_potions(&mut player, 2);
    let clock = ManualClock::new(0);
    let mut engine = engine(player, &clock);

    engine.start_encounter(&opponent(500, 0, 1)).unwrap();
    assert_eq!(
        engine.use_consumable(None),
        Err(GameError::NotReady(Side::Player))
    );

    // Agility 10 fills the gauge in 1250ms
    for _ in 0..13 {
        engine.tick_combat(100).unwrap();
    }
    let tick = engine.use_consumable(None).unwrap();
    assert_eq!(
        tick.events,
        vec![CombatEvent::Healed {
            amount: 50,
            health: 70
        }]
    );
    assert_eq!(
        engine.resolve_combat_action(),
        Err(GameError::NotReady(Side::Player))
    );

    let summary = engine.flee_encounter().unwrap();
    assert_eq!(summary.outcome, CombatOutcome::Fled);
    assert_eq!(summary.gold, 0);
    assert!(summary.experience.is_none());
    assert!(summary.container.is_none());

    let player = engine.player();
    assert_eq!(player.health, 70);
    assert_eq!(player.inventory.count_of(&ItemKind::Potion { tier: 1, potency: 50 }), 1);
    assert_eq!(player.experience, 0);
    assert!(player.containers.is_empty());
}

#[test]
fn test_no_potion_is_an_error() {
    let config = GameConfig::default();
    let player = Player::new("Fighter".to_string(), &config, 0);
    let clock = ManualClock::new(0);
    let mut engine = engine(player, &clock);
    engine.start_encounter(&opponent(500, 0, 1)).unwrap();
    for _ in 0..13 {
        engine.tick_combat(100).unwrap();
    }
    assert_eq!(
        engine.use_consumable(None),
        Err(GameError::NoConsumableAvailable)
    );
    // Still the player's turn
    assert!(engine.resolve_combat_action().is_ok());
}

// =========================================================================
// Defeat and recovery
// =========================================================================

#[test]
fn test_defeat_leaves_player_incapacitated_until_healed() {
    let config = GameConfig::default();
    let mut player = Player::new("Fighter".to_string(), &config, 0);
    give_potions(&mut player, 1);
    let clock = ManualClock::new(0);
    let mut engine = engine(player, &clock);

    let brute = opponent(1_000, 500, 100);
    engine.start_encounter(&brute).unwrap();
    let mut outcome = None;
    for _ in 0..100 {
        if let Some(summary) = engine.tick_combat(100).unwrap().settled {
            outcome = Some(summary.outcome);
            break;
        }
    }
    assert_eq!(outcome, Some(CombatOutcome::Defeat));
    assert_eq!(engine.player().health, 0);
    assert_eq!(engine.player().experience, 0);
    assert!(engine.player().containers.is_empty());

    assert!(matches!(
        engine.start_encounter(&brute),
        Err(GameError::PlayerIncapacitated)
    ));
    assert_eq!(engine.consume_potion(None), Ok(50));
    assert_eq!(engine.player().health, 50);
    assert!(engine.start_encounter(&brute).is_ok());
}

#[test]
fn test_out_of_stamina() {
    let config = GameConfig::default();
    let mut player = Player::new("Fighter".to_string(), &config, 0);
    player.stamina = 0;
    let clock = ManualClock::new(0);
    let mut engine = engine(player, &clock);

    assert!(matches!(
        engine.start_encounter(&opponent(1, 0, 1)),
        Err(GameError::InsufficientStamina { .. })
    ));
    clock.advance(config.idle.stamina_interval_ms);
    assert!(engine.start_encounter(&opponent(1, 0, 1)).is_ok());
    assert_eq!(engine.player().stamina, 0);
}

#[test]
fn test_arena_snapshot_fights_like_the_player() {
    let config = GameConfig::default();
    let rival = Player::new("Rival".to_string(), &config, 0);
    let snapshot = Opponent::from_player(&rival, 10, 0);
    assert_eq!(snapshot.stats, rival.effective_stats());

    let player = Player::new("Fighter".to_string(), &config, 0);
    let clock = ManualClock::new(0);
    let mut engine = engine(player, &clock);
    let session = engine.start_encounter(&snapshot).unwrap();
    assert_eq!(session.opponent.health, rival.max_health());
    assert_eq!(session.player.stats, session.opponent.stats);
}
