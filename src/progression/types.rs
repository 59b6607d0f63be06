use crate::character::Job;
use crate::items::StatBlock;
use serde::{Deserialize, Serialize};

/// One level gained. `grant.health` is the max-health increase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUpEvent {
    pub old_level: u32,
    pub new_level: u32,
    pub grant: StatBlock,
    pub max_health: u32,
}

/// What a call to `grant_experience` did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceOutcome {
    /// Experience actually banked. Zero while an advancement is pending.
    pub applied: u64,
    pub level_ups: Vec<LevelUpEvent>,
    /// The player hit a job gate during this call.
    pub advancement_pending: bool,
}

impl ExperienceOutcome {
    pub fn leveled_up(&self) -> bool {
        !self.level_ups.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancementResult {
    pub success: bool,
    pub previous_job: Job,
    pub target_job: Job,
    pub success_rate: u32,
    pub level: u32,
    pub level_up: Option<LevelUpEvent>,
}

impl AdvancementResult {
    pub fn message(&self) -> String {
        if self.success {
            format!(
                "Advanced from {} to {}! Now level {}.",
                self.previous_job, self.target_job, self.level
            )
        } else {
            format!(
                "Advancement to {} failed ({}% chance). Keep training and try again.",
                self.target_job, self.success_rate
            )
        }
    }
}
