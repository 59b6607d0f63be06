//! Integration test: players and rule tables survive a trip through storage.

use idle_hero::character::{
    decode_player, encode_player, FileRepository, InMemoryRepository, PlayerRepository, SaveError,
};
use idle_hero::rewards::enqueue_container;
use idle_hero::{GameConfig, GameEngine, GameError, ManualClock, Player, SeededSource};
use std::fs;
use std::path::PathBuf;

fn temp_dir(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!("idle-hero-{}-{}", label, uuid::Uuid::new_v4()))
}

/// A player with a bit of everything: levels, gold, containers, gear.
fn seasoned_player(config: &GameConfig) -> Player {
    let mut player = Player::new("Veteran".to_string(), config, 10_000);
    player.level = 6;
    player.gold = 4_321;
    for tier in 1..=5 {
        enqueue_container(&mut player, tier, &config.rewards);
    }
    player
}

#[test]
fn test_engine_progress_survives_file_round_trip() {
    let config = GameConfig::default();
    let dir = temp_dir("engine");
    let mut repo = FileRepository::new(&dir).unwrap();

    let clock = ManualClock::new(10_000);
    let mut engine = GameEngine::new(
        seasoned_player(&config),
        config.clone(),
        SeededSource::from_seed_u64(9),
        &clock,
    )
    .unwrap();
    for _ in 0..3 {
        engine.open_reward_container(0).unwrap();
    }
    engine.save(&mut repo).unwrap();
    let id = engine.player().id;
    let expected = engine.into_player();

    let loaded = GameEngine::load(&repo, id, config, SeededSource::from_seed_u64(9), &clock)
        .unwrap();
    assert_eq!(loaded.player(), &expected);
    assert_eq!(loaded.player().containers.len(), 2);
    assert_eq!(loaded.player().peek_item_id(), expected.peek_item_id());

    fs::remove_dir_all(dir).ok();
}

#[test]
fn test_corrupted_file_is_rejected() {
    let config = GameConfig::default();
    let dir = temp_dir("corrupt");
    let mut repo = FileRepository::new(&dir).unwrap();
    let player = seasoned_player(&config);
    repo.save(&player).unwrap();

    let path = dir.join(format!("{}.sav", player.id));
    let mut bytes = fs::read(&path).unwrap();
    let middle = bytes.len() / 2;
    bytes[middle] ^= 0x5A;
    fs::write(&path, bytes).unwrap();

    assert!(matches!(repo.load(player.id), Err(SaveError::ChecksumMismatch)));
    fs::remove_dir_all(dir).ok();
}

#[test]
fn test_load_with_broken_rules_is_rejected() {
    let mut config = GameConfig::default();
    let player = seasoned_player(&config);
    let mut repo = InMemoryRepository::new();
    repo.save(&player).unwrap();

    config.inventory.capacity = 0;
    let clock = ManualClock::new(0);
    let result = GameEngine::load(&repo, player.id, config, SeededSource::from_seed_u64(1), &clock);
    assert!(matches!(
        result,
        Err(SaveError::Rules(GameError::InvalidConfig(_)))
    ));

    let missing = uuid::Uuid::new_v4();
    let result = GameEngine::load(
        &repo,
        missing,
        GameConfig::default(),
        SeededSource::from_seed_u64(1),
        &clock,
    );
    assert!(matches!(result, Err(SaveError::NotFound(id)) if id == missing));
}

#[test]
fn test_encoding_is_stable() {
    let config = GameConfig::default();
    let player = seasoned_player(&config);
    let bytes = encode_player(&player).unwrap();
    assert_eq!(encode_player(&player).unwrap(), bytes);
    assert_eq!(decode_player(&bytes).unwrap(), player);
}

#[test]
fn test_game_config_file_round_trip() {
    let mut config = GameConfig::default();
    config.idle.max_offline_containers = 24;
    config.rewards.tier_up_chance = 10.0;

    let path = temp_dir("config").join("rules.json");
    config.save(&path).unwrap();
    let loaded = GameConfig::load(&path).unwrap();
    assert_eq!(loaded, config);

    fs::write(&path, r#"{"progression":{"exp_per_level":0}}"#).unwrap();
    assert!(matches!(
        GameConfig::load(&path),
        Err(GameError::InvalidConfig(_))
    ));
    if let Some(parent) = path.parent() {
        fs::remove_dir_all(parent).ok();
    }
}
