use crate::character::Job;
use crate::items::{EquipmentInstance, ItemId};
use serde::{Deserialize, Serialize};

/// An unopened container waiting in the player's queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardContainer {
    pub id: ItemId,
    /// 1 to the configured max tier.
    pub tier: u8,
}

/// The five reward categories, in the order the kind table is walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RewardKind {
    Currency,
    Potion,
    PetEgg,
    JobBook,
    Equipment,
}

impl RewardKind {
    pub const ALL: [RewardKind; 5] = [
        RewardKind::Currency,
        RewardKind::Potion,
        RewardKind::PetEgg,
        RewardKind::JobBook,
        RewardKind::Equipment,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RewardKind::Currency => "Currency",
            RewardKind::Potion => "Potion",
            RewardKind::PetEgg => "Pet Egg",
            RewardKind::JobBook => "Job Book",
            RewardKind::Equipment => "Equipment",
        }
    }
}

/// A materialized reward. Stack variants carry the id of the stack the item
/// landed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reward {
    Currency { amount: u64 },
    Potion { stack: ItemId, tier: u8, potency: u32 },
    PetEgg { stack: ItemId, tier: u8 },
    JobBook { stack: ItemId, target: Job },
    Equipment(EquipmentInstance),
}

impl Reward {
    pub fn kind(&self) -> RewardKind {
        match self {
            Reward::Currency { .. } => RewardKind::Currency,
            Reward::Potion { .. } => RewardKind::Potion,
            Reward::PetEgg { .. } => RewardKind::PetEgg,
            Reward::JobBook { .. } => RewardKind::JobBook,
            Reward::Equipment(_) => RewardKind::Equipment,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Reward::Currency { amount } => format!("{} gold", amount),
            Reward::Potion { tier, potency, .. } => {
                format!("Potion T{} (+{} HP)", tier, potency)
            }
            Reward::PetEgg { tier, .. } => format!("Pet Egg T{}", tier),
            Reward::JobBook { target, .. } => format!("{} Manual", target),
            Reward::Equipment(item) => item.display_name(),
        }
    }
}

/// Result of opening one container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenedContainer {
    pub container: RewardContainer,
    /// Container tier after the tier-up roll.
    pub reward_tier: u8,
    pub reward: Reward,
}

impl OpenedContainer {
    pub fn tiered_up(&self) -> bool {
        self.reward_tier > self.container.tier
    }
}
