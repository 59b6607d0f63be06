use crate::items::ItemId;
use serde::{Deserialize, Serialize};

/// Outcome of a star upgrade attempt. Cost and materials are spent either way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeResult {
    pub item: ItemId,
    pub success: bool,
    /// Star count after the attempt.
    pub stars: u8,
    pub success_rate: u32,
    pub gold_spent: u64,
    pub materials_consumed: Vec<ItemId>,
    pub message: String,
}

/// Star suffix for display, e.g. "★★☆☆☆".
pub fn star_display(stars: u8, max_stars: u8) -> String {
    let filled = stars.min(max_stars) as usize;
    let empty = max_stars as usize - filled;
    format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
}
