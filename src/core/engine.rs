//! Engine facade over the rule modules.
//!
//! A [`GameEngine`] owns one player aggregate together with its random source,
//! clock and any running encounter. Every operation takes `&mut self`, so one
//! engine is a single writer for its player. Independent players get
//! independent engines and can run in parallel.

use super::clock::Clock;
use super::config::GameConfig;
use super::error::{GameError, Result};
use super::rng::RandomSource;
use crate::character::{self, Player, PlayerRepository, SaveError};
use crate::combat::{
    self, CombatEvent, CombatSession, EncounterSummary, Opponent, OpponentProvider, Side,
};
use crate::enhancement::{self, UpgradeResult};
use crate::idle::{self, AccrualReport, IdleReport, StaminaReport};
use crate::items::{EquipmentSlot, ItemId};
use crate::progression::{self, AdvancementResult, ExperienceOutcome};
use crate::rewards::{self, OpenedContainer, RewardContainer};
use tracing::{info, warn};

/// Everything one combat step produced. `settled` is set when the encounter
/// ended during this step and was applied to the player.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombatTick {
    pub events: Vec<CombatEvent>,
    pub settled: Option<EncounterSummary>,
}

pub struct GameEngine<R: RandomSource, C: Clock> {
    player: Player,
    config: GameConfig,
    rng: R,
    clock: C,
    session: Option<CombatSession>,
    auto_battle: bool,
}

fn rejected<T>(operation: &'static str, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        warn!(
            operation,
            severity = e.severity().as_str(),
            error = %e,
            "operation rejected"
        );
    }
    result
}

impl<R: RandomSource, C: Clock> GameEngine<R, C> {
    pub fn new(player: Player, config: GameConfig, rng: R, clock: C) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            player,
            config,
            rng,
            clock,
            session: None,
            auto_battle: false,
        })
    }

    /// Loads the player from `repo`.
    pub fn load(
        repo: &impl PlayerRepository,
        id: character::PlayerId,
        config: GameConfig,
        rng: R,
        clock: C,
    ) -> std::result::Result<Self, SaveError> {
        let player = repo.load(id)?;
        Ok(Self::new(player, config, rng, clock)?)
    }

    /// Writes the player to `repo`. Any running encounter is not persisted.
    pub fn save(&self, repo: &mut impl PlayerRepository) -> std::result::Result<(), SaveError> {
        repo.save(&self.player)
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn into_player(self) -> Player {
        self.player
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn session(&self) -> Option<&CombatSession> {
        self.session.as_ref()
    }

    pub fn auto_battle(&self) -> bool {
        self.auto_battle
    }

    /// With auto battle on, `tick_combat` also resolves the player's attacks.
    pub fn set_auto_battle(&mut self, enabled: bool) {
        self.auto_battle = enabled;
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    // ── Idle accrual ────────────────────────────────────────────────

    pub fn accrue_stamina(&mut self) -> StaminaReport {
        let now = self.clock.now_ms();
        idle::accrue_stamina(&mut self.player, now, &self.config)
    }

    pub fn accrue_passive_rewards(&mut self) -> AccrualReport {
        let now = self.clock.now_ms();
        idle::accrue_passive_rewards(&mut self.player, now, &self.config)
    }

    /// Runs both accrual passes against the current clock.
    pub fn catch_up(&mut self) -> IdleReport {
        let now = self.clock.now_ms();
        idle::catch_up(&mut self.player, now, &self.config)
    }

    // ── Combat ──────────────────────────────────────────────────────

    /// Starts an encounter against `opponent`. Stamina is accrued first, then
    /// the encounter cost is paid. A rejected start leaves the player as it was,
    /// accrual included.
    pub fn start_encounter(&mut self, opponent: &Opponent) -> Result<&CombatSession> {
        if self.session.is_some() {
            return rejected("start_encounter", Err(GameError::EncounterInProgress));
        }
        let now = self.clock.now_ms();
        let stamina = idle::projected_stamina(&self.player, now, &self.config);
        rejected(
            "start_encounter",
            combat::check_can_begin(&self.player, stamina, &self.config.combat),
        )?;
        idle::accrue_stamina(&mut self.player, now, &self.config);
        let session = rejected(
            "start_encounter",
            combat::begin_encounter(&mut self.player, opponent, &self.config.combat),
        )?;
        Ok(self.session.insert(session))
    }

    /// Starts an encounter against the opponent `provider` has for `stage`.
    pub fn start_stage(
        &mut self,
        provider: &impl OpponentProvider,
        stage: u32,
    ) -> Result<&CombatSession> {
        let Some(opponent) = provider.opponent(stage) else {
            return rejected("start_stage", Err(GameError::UnknownOpponent(stage)));
        };
        self.start_encounter(&opponent)
    }

    fn settle_if_over(&mut self, tick: &mut CombatTick) -> Result<()> {
        let over = self.session.as_ref().is_some_and(|s| s.is_over());
        if !over {
            return Ok(());
        }
        if let Some(session) = self.session.take() {
            tick.settled = Some(combat::settle_encounter(
                &mut self.player,
                &session,
                &self.config,
            )?);
        }
        Ok(())
    }

    /// Advances the encounter by `dt_ms` and lets every side whose turn it is
    /// act: the opponent always, the player only with auto battle on. A manual
    /// player who holds the turn without acting does not stop a ready
    /// opponent. A finished encounter is settled before returning.
    pub fn tick_combat(&mut self, dt_ms: u64) -> Result<CombatTick> {
        let Some(session) = self.session.as_mut() else {
            return rejected("tick_combat", Err(GameError::NoEncounter));
        };
        let mut tick = CombatTick {
            events: combat::tick(session, dt_ms, &self.config.combat),
            settled: None,
        };

        while let Some(mut side) = session.turn {
            if side == Side::Player && !self.auto_battle {
                match combat::yield_turn(session, &self.config.combat) {
                    Some(Side::Opponent) => side = Side::Opponent,
                    _ => break,
                }
            }
            let events = combat::resolve_action(session, side, &self.config.combat, &mut self.rng)?;
            tick.events.extend(events);
            if session.is_over() {
                break;
            }
        }

        self.settle_if_over(&mut tick)?;
        Ok(tick)
    }

    /// The player attacks.
    pub fn resolve_combat_action(&mut self) -> Result<CombatTick> {
        let Some(session) = self.session.as_mut() else {
            return rejected("resolve_combat_action", Err(GameError::NoEncounter));
        };
        let events = rejected(
            "resolve_combat_action",
            combat::resolve_action(session, Side::Player, &self.config.combat, &mut self.rng),
        )?;
        let mut tick = CombatTick {
            events,
            settled: None,
        };
        self.settle_if_over(&mut tick)?;
        Ok(tick)
    }

    /// The player drinks a potion on their turn instead of attacking.
    pub fn use_consumable(&mut self, stack: Option<ItemId>) -> Result<CombatTick> {
        let Some(session) = self.session.as_mut() else {
            return rejected("use_consumable", Err(GameError::NoEncounter));
        };
        let event = rejected(
            "use_consumable",
            combat::use_consumable(session, &mut self.player, stack, &self.config.combat),
        )?;
        Ok(CombatTick {
            events: vec![event],
            settled: None,
        })
    }

    /// Abandons the encounter. Health taken so far is kept; nothing is gained.
    pub fn flee_encounter(&mut self) -> Result<EncounterSummary> {
        let Some(mut session) = self.session.take() else {
            return rejected("flee_encounter", Err(GameError::NoEncounter));
        };
        combat::flee(&mut session)?;
        combat::settle_encounter(&mut self.player, &session, &self.config)
    }

    // ── Progression ─────────────────────────────────────────────────

    pub fn grant_experience(&mut self, amount: u64) -> ExperienceOutcome {
        progression::grant_experience(&mut self.player, amount, &self.config)
    }

    pub fn attempt_job_advancement(&mut self) -> Result<AdvancementResult> {
        rejected(
            "attempt_job_advancement",
            progression::attempt_job_advancement(&mut self.player, &self.config, &mut self.rng),
        )
    }

    // ── Rewards and equipment ───────────────────────────────────────

    pub fn enqueue_reward_container(&mut self, tier: u32) -> RewardContainer {
        rewards::enqueue_container(&mut self.player, tier, &self.config.rewards)
    }

    pub fn open_reward_container(&mut self, index: usize) -> Result<OpenedContainer> {
        let opened = rejected(
            "open_reward_container",
            rewards::open_container(&mut self.player, index, &self.config, &mut self.rng),
        )?;
        info!(reward = %opened.reward.describe(), tier = opened.reward_tier, "container opened");
        Ok(opened)
    }

    pub fn upgrade_equipment_stars(
        &mut self,
        equipment_id: ItemId,
        material_ids: &[ItemId],
    ) -> Result<UpgradeResult> {
        rejected(
            "upgrade_equipment_stars",
            enhancement::upgrade_stars(
                &mut self.player,
                equipment_id,
                material_ids,
                &self.config,
                &mut self.rng,
            ),
        )
    }

    pub fn equip(&mut self, item_id: ItemId) -> Result<Option<ItemId>> {
        if self.session.is_some() {
            return rejected("equip", Err(GameError::EncounterInProgress));
        }
        rejected("equip", character::equip(&mut self.player, item_id, &self.config))
    }

    pub fn unequip(&mut self, slot: EquipmentSlot) -> Result<ItemId> {
        if self.session.is_some() {
            return rejected("unequip", Err(GameError::EncounterInProgress));
        }
        rejected("unequip", character::unequip(&mut self.player, slot, &self.config))
    }

    /// Drinks a potion outside combat. Returns the amount healed.
    pub fn consume_potion(&mut self, stack: Option<ItemId>) -> Result<u32> {
        if self.session.is_some() {
            return rejected("consume_potion", Err(GameError::EncounterInProgress));
        }
        rejected("consume_potion", self.player.consume_potion(stack))
    }
}
