use crate::rewards::RewardContainer;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaminaReport {
    pub elapsed_ms: i64,
    pub gained: u32,
    /// Stamina after the pass.
    pub stamina: u32,
}

/// Report of a passive container accrual pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccrualReport {
    pub elapsed_ms: i64,
    /// Whole intervals elapsed.
    pub intervals: u64,
    /// Intervals past the offline cap that granted nothing.
    pub forfeited: u64,
    pub tier: u8,
    pub containers: Vec<RewardContainer>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdleReport {
    pub stamina: StaminaReport,
    pub rewards: AccrualReport,
}
