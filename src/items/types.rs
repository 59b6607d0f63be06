use crate::character::Job;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an equipment instance or item stack, unique per player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EquipmentSlot {
    Helmet,
    Armor,
    Shoes,
    Weapon,
    Shield,
    Accessory,
    Ring,
    Pet,
}

impl EquipmentSlot {
    pub const ALL: [EquipmentSlot; 8] = [
        EquipmentSlot::Helmet,
        EquipmentSlot::Armor,
        EquipmentSlot::Shoes,
        EquipmentSlot::Weapon,
        EquipmentSlot::Shield,
        EquipmentSlot::Accessory,
        EquipmentSlot::Ring,
        EquipmentSlot::Pet,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EquipmentSlot::Helmet => "Helmet",
            EquipmentSlot::Armor => "Armor",
            EquipmentSlot::Shoes => "Shoes",
            EquipmentSlot::Weapon => "Weapon",
            EquipmentSlot::Shield => "Shield",
            EquipmentSlot::Accessory => "Accessory",
            EquipmentSlot::Ring => "Ring",
            EquipmentSlot::Pet => "Pet",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common = 0,
    Uncommon = 1,
    Rare = 2,
    Epic = 3,
    Legendary = 4,
}

impl Rarity {
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
    ];

    /// Returns the display name for this rarity tier.
    pub fn name(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Flat stat contribution. Also used for level-up grants, where `health`
/// is added to max health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatBlock {
    pub health: u32,
    pub attack: u32,
    pub defense: u32,
    pub agility: u32,
    pub critical_rate: u32,
    pub critical_damage: u32,
}

impl StatBlock {
    pub const ZERO: StatBlock = StatBlock {
        health: 0,
        attack: 0,
        defense: 0,
        agility: 0,
        critical_rate: 0,
        critical_damage: 0,
    };

    pub fn plus(&self, other: &StatBlock) -> StatBlock {
        StatBlock {
            health: self.health.saturating_add(other.health),
            attack: self.attack.saturating_add(other.attack),
            defense: self.defense.saturating_add(other.defense),
            agility: self.agility.saturating_add(other.agility),
            critical_rate: self.critical_rate.saturating_add(other.critical_rate),
            critical_damage: self.critical_damage.saturating_add(other.critical_damage),
        }
    }

    /// Every field multiplied by `percent / 100`, rounded down.
    pub fn scaled_percent(&self, percent: u32) -> StatBlock {
        let scale = |v: u32| ((v as u64 * percent as u64) / 100).min(u32::MAX as u64) as u32;
        StatBlock {
            health: scale(self.health),
            attack: scale(self.attack),
            defense: scale(self.defense),
            agility: scale(self.agility),
            critical_rate: scale(self.critical_rate),
            critical_damage: scale(self.critical_damage),
        }
    }

    /// Sum of all fields, used to compare gear roughly.
    pub fn total(&self) -> u64 {
        self.health as u64
            + self.attack as u64
            + self.defense as u64
            + self.agility as u64
            + self.critical_rate as u64
            + self.critical_damage as u64
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentInstance {
    pub id: ItemId,
    pub slot: EquipmentSlot,
    pub rarity: Rarity,
    /// 1-10
    pub level: u8,
    /// 0-5
    pub stars: u8,
    /// Fixed at creation.
    pub base: StatBlock,
    /// `base` scaled by the star bonus. Always recomputed from `base`.
    pub stats: StatBlock,
}

impl EquipmentInstance {
    pub fn new(
        id: ItemId,
        slot: EquipmentSlot,
        rarity: Rarity,
        level: u8,
        base: StatBlock,
    ) -> Self {
        Self {
            id,
            slot,
            rarity,
            level,
            stars: 0,
            base,
            stats: base,
        }
    }

    /// Recomputes derived stats from the stored base for the current stars.
    pub fn recompute_stats(&mut self, bonus_per_star_percent: u32) {
        self.stats = self
            .base
            .scaled_percent(100 + self.stars as u32 * bonus_per_star_percent);
    }

    /// Whether `other` can be sacrificed to upgrade this instance.
    pub fn accepts_material(&self, other: &EquipmentInstance) -> bool {
        self.id != other.id
            && self.slot == other.slot
            && self.rarity == other.rarity
            && self.level == other.level
    }

    pub fn display_name(&self) -> String {
        let stars = "*".repeat(self.stars as usize);
        format!(
            "{} {} Lv{}{}{}",
            self.rarity.name(),
            self.slot.name(),
            self.level,
            if stars.is_empty() { "" } else { " " },
            stars
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Potion { tier: u8, potency: u32 },
    /// Held only; eggs have no further mechanics.
    PetEgg { tier: u8 },
    JobBook { target: Job },
}

impl ItemKind {
    pub fn name(&self) -> String {
        match self {
            ItemKind::Potion { tier, potency } => format!("Potion T{} (+{} HP)", tier, potency),
            ItemKind::PetEgg { tier } => format!("Pet Egg T{}", tier),
            ItemKind::JobBook { target } => format!("{} Manual", target.name()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub id: ItemId,
    pub kind: ItemKind,
    /// Never zero while the stack is held.
    pub quantity: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_base() -> StatBlock {
        StatBlock {
            attack: 10,
            critical_rate: 3,
            critical_damage: 7,
            ..StatBlock::ZERO
        }
    }

    #[test]
    fn test_rarity_ordering() {
        assert!(Rarity::Common < Rarity::Uncommon);
        assert!(Rarity::Uncommon < Rarity::Rare);
        assert!(Rarity::Rare < Rarity::Epic);
        assert!(Rarity::Epic < Rarity::Legendary);
    }

    #[test]
    fn test_slot_indices_are_dense() {
        for (i, slot) in EquipmentSlot::ALL.iter().enumerate() {
            assert_eq!(slot.index(), i);
        }
    }

    #[test]
    fn test_stat_block_plus_and_scale() {
        let a = sample_base();
        let sum = a.plus(&a);
        assert_eq!(sum.attack, 20);
        assert_eq!(a.scaled_percent(150).attack, 15);
        assert_eq!(a.scaled_percent(150).critical_rate, 4); // floor(4.5)
        assert_eq!(a.total(), 20);
    }

    #[test]
    fn test_recompute_is_not_compounding() {
        let mut item = EquipmentInstance::new(
            ItemId(1),
            EquipmentSlot::Weapon,
            Rarity::Rare,
            3,
            sample_base(),
        );
        for stars in 1..=5 {
            item.stars = stars;
            item.recompute_stats(20);
        }
        // 10 * (1 + 5 * 0.2) = 20, regardless of how many recomputes ran
        assert_eq!(item.stats.attack, 20);
        assert_eq!(item.base.attack, 10);

        item.stars = 0;
        item.recompute_stats(20);
        assert_eq!(item.stats, item.base);
    }

    #[test]
    fn test_accepts_material_requires_exact_match() {
        let target = EquipmentInstance::new(
            ItemId(1),
            EquipmentSlot::Weapon,
            Rarity::Rare,
            3,
            sample_base(),
        );
        let mut other = target.clone();
        other.id = ItemId(2);
        assert!(target.accepts_material(&other));
        assert!(!target.accepts_material(&target));

        let mut wrong_level = other.clone();
        wrong_level.level = 4;
        assert!(!target.accepts_material(&wrong_level));

        let mut wrong_rarity = other.clone();
        wrong_rarity.rarity = Rarity::Epic;
        assert!(!target.accepts_material(&wrong_rarity));

        let mut wrong_slot = other;
        wrong_slot.slot = EquipmentSlot::Ring;
        assert!(!target.accepts_material(&wrong_slot));
    }

    #[test]
    fn test_display_names() {
        let mut item = EquipmentInstance::new(
            ItemId(1),
            EquipmentSlot::Shoes,
            Rarity::Epic,
            2,
            StatBlock::ZERO,
        );
        assert_eq!(item.display_name(), "Epic Shoes Lv2");
        item.stars = 2;
        assert_eq!(item.display_name(), "Epic Shoes Lv2 **");
        assert_eq!(ItemId(7).to_string(), "#7");
    }
}
