//! Simulation report generation.

use crate::character::Job;
use crate::items::Rarity;
use crate::rewards::{OpenedContainer, Reward, RewardKind};
use serde::Serialize;

/// Statistics gathered from one simulated player.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunStats {
    pub final_level: u32,
    pub final_job: Job,
    pub final_stage: u32,
    pub highest_stage: u32,

    pub encounters: u32,
    pub victories: u32,
    pub defeats: u32,
    /// Encounters abandoned after running too long.
    pub stalemates: u32,

    pub containers_opened: u32,
    /// Indexed like `RewardKind::ALL`.
    pub rewards_by_kind: [u32; 5],
    pub tier_ups: u32,
    pub legendary_drops: u32,
    pub gear_equipped: u32,

    pub upgrade_attempts: u32,
    pub upgrade_successes: u32,
    pub advancement_attempts: u32,
    pub advancement_successes: u32,
    /// Encounters fought while experience was blocked at a job gate.
    pub gated_encounters: u32,

    pub potions_used: u32,
    pub rest_intervals: u32,
    /// Ended the run with no health and no way to recover.
    pub incapacitated: bool,

    pub gold: u64,
    pub equipped_stat_total: u64,
    pub containers_left: u32,
    pub simulated_ms: i64,
}

impl RunStats {
    pub fn record_container(&mut self, opened: &OpenedContainer) {
        self.containers_opened += 1;
        let kind = opened.reward.kind();
        if let Some(index) = RewardKind::ALL.iter().position(|k| *k == kind) {
            self.rewards_by_kind[index] += 1;
        }
        if opened.tiered_up() {
            self.tier_ups += 1;
        }
        if let Reward::Equipment(item) = &opened.reward {
            if item.rarity == Rarity::Legendary {
                self.legendary_drops += 1;
            }
        }
    }

    pub fn win_rate(&self) -> f64 {
        if self.encounters == 0 {
            0.0
        } else {
            self.victories as f64 / self.encounters as f64
        }
    }
}

fn average<T>(runs: &[RunStats], value: impl Fn(&RunStats) -> T) -> f64
where
    T: Into<f64>,
{
    if runs.is_empty() {
        return 0.0;
    }
    runs.iter().map(|r| value(r).into()).sum::<f64>() / runs.len() as f64
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Aggregated results from multiple simulation runs.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub num_runs: u32,
    pub runs_incapacitated: u32,

    // Progression
    pub avg_final_level: f64,
    pub avg_final_stage: f64,
    pub avg_highest_stage: f64,
    pub avg_simulated_hours: f64,
    pub job_distribution: Vec<(Job, u32)>,

    // Combat
    pub avg_encounters: f64,
    pub win_rate: f64,
    pub avg_defeats: f64,
    pub avg_stalemates: f64,
    pub avg_gated_encounters: f64,

    // Rewards
    pub avg_containers_opened: f64,
    pub reward_share: Vec<(RewardKind, f64)>,
    pub tier_up_rate: f64,
    pub avg_legendary_drops: f64,
    pub avg_gear_equipped: f64,
    pub avg_containers_left: f64,

    // Enhancement and advancement
    pub upgrade_success_rate: f64,
    pub avg_upgrade_attempts: f64,
    pub advancement_success_rate: f64,
    pub avg_advancement_attempts: f64,

    pub avg_gold: f64,
    pub avg_equipped_stat_total: f64,
    pub avg_potions_used: f64,

    // Individual run stats for detailed analysis
    #[serde(skip)]
    pub run_stats: Vec<RunStats>,
}

impl SimReport {
    /// Create a new report from completed run stats.
    pub fn from_runs(runs: Vec<RunStats>) -> Self {
        let num_runs = runs.len() as u32;
        let runs_incapacitated = runs.iter().filter(|r| r.incapacitated).count() as u32;

        let mut job_distribution: Vec<(Job, u32)> = Job::ALL.iter().map(|j| (*j, 0)).collect();
        for run in &runs {
            job_distribution[run.final_job.tier()].1 += 1;
        }

        let sum = |value: fn(&RunStats) -> u32| runs.iter().map(|r| value(r) as u64).sum::<u64>();
        let containers = sum(|r| r.containers_opened);
        let reward_share = RewardKind::ALL
            .iter()
            .enumerate()
            .map(|(i, kind)| {
                let count: u64 = runs.iter().map(|r| r.rewards_by_kind[i] as u64).sum();
                (*kind, ratio(count, containers))
            })
            .collect();

        Self {
            num_runs,
            runs_incapacitated,
            avg_final_level: average(&runs, |r| r.final_level),
            avg_final_stage: average(&runs, |r| r.final_stage),
            avg_highest_stage: average(&runs, |r| r.highest_stage),
            avg_simulated_hours: average(&runs, |r| r.simulated_ms as f64 / 3_600_000.0),
            job_distribution,
            avg_encounters: average(&runs, |r| r.encounters),
            win_rate: ratio(sum(|r| r.victories), sum(|r| r.encounters)),
            avg_defeats: average(&runs, |r| r.defeats),
            avg_stalemates: average(&runs, |r| r.stalemates),
            avg_gated_encounters: average(&runs, |r| r.gated_encounters),
            avg_containers_opened: average(&runs, |r| r.containers_opened),
            reward_share,
            tier_up_rate: ratio(sum(|r| r.tier_ups), containers),
            avg_legendary_drops: average(&runs, |r| r.legendary_drops),
            avg_gear_equipped: average(&runs, |r| r.gear_equipped),
            avg_containers_left: average(&runs, |r| r.containers_left),
            upgrade_success_rate: ratio(sum(|r| r.upgrade_successes), sum(|r| r.upgrade_attempts)),
            avg_upgrade_attempts: average(&runs, |r| r.upgrade_attempts),
            advancement_success_rate: ratio(
                sum(|r| r.advancement_successes),
                sum(|r| r.advancement_attempts),
            ),
            avg_advancement_attempts: average(&runs, |r| r.advancement_attempts),
            avg_gold: average(&runs, |r| r.gold as f64),
            avg_equipped_stat_total: average(&runs, |r| r.equipped_stat_total as f64),
            avg_potions_used: average(&runs, |r| r.potions_used),
            run_stats: runs,
        }
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Runs: {} total, {} ended incapacitated\n\n",
            self.num_runs, self.runs_incapacitated
        ));

        report.push_str("── PROGRESSION ──────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Final Level:     {:.1}\n", self.avg_final_level));
        report.push_str(&format!("  Avg Final Stage:     {:.1}\n", self.avg_final_stage));
        report.push_str(&format!("  Avg Highest Stage:   {:.1}\n", self.avg_highest_stage));
        report.push_str(&format!(
            "  Avg Simulated Time:  {:.1}h\n\n",
            self.avg_simulated_hours
        ));

        report.push_str("── JOBS ─────────────────────────────────────────────────────────\n");
        for (job, count) in &self.job_distribution {
            let pct = ratio(*count as u64, self.num_runs as u64) * 100.0;
            let bar: String = "█".repeat((pct / 5.0) as usize);
            report.push_str(&format!("  {:<9} {:>5.1}% {}\n", job.name(), pct, bar));
        }
        report.push('\n');

        report.push_str("── COMBAT ───────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Encounters:      {:.0}\n", self.avg_encounters));
        report.push_str(&format!("  Win Rate:            {:.1}%\n", self.win_rate * 100.0));
        report.push_str(&format!("  Avg Defeats:         {:.1}\n", self.avg_defeats));
        report.push_str(&format!("  Avg Stalemates:      {:.2}\n", self.avg_stalemates));
        report.push_str(&format!(
            "  Avg Gated Fights:    {:.1}\n\n",
            self.avg_gated_encounters
        ));

        report.push_str("── REWARDS ──────────────────────────────────────────────────────\n");
        report.push_str(&format!(
            "  Avg Containers:      {:.1} opened, {:.1} left\n",
            self.avg_containers_opened, self.avg_containers_left
        ));
        for (kind, share) in &self.reward_share {
            report.push_str(&format!("  {:<12} {:>5.1}%\n", kind.name(), share * 100.0));
        }
        report.push_str(&format!("  Tier-up Rate:        {:.1}%\n", self.tier_up_rate * 100.0));
        report.push_str(&format!(
            "  Avg Legendary Drops: {:.2}\n",
            self.avg_legendary_drops
        ));
        report.push_str(&format!("  Avg Gear Equipped:   {:.1}\n\n", self.avg_gear_equipped));

        report.push_str("── ENHANCEMENT ──────────────────────────────────────────────────\n");
        report.push_str(&format!(
            "  Star Upgrades:       {:.1} tried, {:.1}% succeeded\n",
            self.avg_upgrade_attempts,
            self.upgrade_success_rate * 100.0
        ));
        report.push_str(&format!(
            "  Advancements:        {:.1} tried, {:.1}% succeeded\n",
            self.avg_advancement_attempts,
            self.advancement_success_rate * 100.0
        ));
        report.push_str(&format!("  Avg Gold Held:       {:.0}\n", self.avg_gold));
        report.push_str(&format!(
            "  Avg Equipped Stats:  {:.0}\n\n",
            self.avg_equipped_stat_total
        ));

        report.push_str("── BALANCE ASSESSMENT ───────────────────────────────────────────\n");
        let win_rating = if self.win_rate > 0.95 {
            "TOO EASY - Players rarely lose"
        } else if self.win_rate > 0.7 {
            "GOOD - Challenging but fair"
        } else if self.win_rate > 0.5 {
            "HARD - Frequent defeats"
        } else {
            "TOO HARD - Most fights are lost"
        };
        report.push_str(&format!("  Win Rating:      {}\n", win_rating));

        if self.runs_incapacitated > 0 {
            report.push_str(&format!(
                "  ⚠️  {} runs ran out of health with nothing to heal\n",
                self.runs_incapacitated
            ));
        }
        if self.avg_gated_encounters > self.avg_encounters / 2.0 && self.avg_encounters > 0.0 {
            report.push_str("  ⚠️  Most fights happen behind a job gate - books too rare?\n");
        }
        if self.avg_containers_left > 10.0 {
            report.push_str("  ⚠️  Containers pile up unopened - inventory too small?\n");
        }

        report.push_str("\n═══════════════════════════════════════════════════════════════\n");

        report
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
