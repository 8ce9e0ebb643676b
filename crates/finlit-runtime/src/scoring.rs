//! Derived gamification figures: literacy percentage, confidence score,
//! milestones and habit badges.
//!
//! None of these are stored except the unlock log kept by [`unlock_milestones`].

use chrono::{DateTime, Utc};
use finlit_core::{AchievedMilestone, AppState, LiteracyProgress};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tracing::info;

/// Points shown per achieved milestone on the rewards screen.
pub const POINTS_PER_MILESTONE: u64 = 100;

/// Percentage of observed topics marked completed; 0 when nothing was observed.
pub fn literacy_percent(progress: &LiteracyProgress) -> Decimal {
    if progress.is_empty() {
        return Decimal::ZERO;
    }
    let done = progress.values().filter(|p| p.completed).count();
    Decimal::from(done) * Decimal::ONE_HUNDRED / Decimal::from(progress.len())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Beginner,
    Learning,
    Confident,
    Expert,
}

impl ConfidenceLevel {
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s < 25 => ConfidenceLevel::Beginner,
            s if s < 50 => ConfidenceLevel::Learning,
            s if s < 75 => ConfidenceLevel::Confident,
            _ => ConfidenceLevel::Expert,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Confidence {
    /// 0..=100.
    pub score: u32,
    pub level: ConfidenceLevel,
    /// Literacy percentage rounded for display.
    pub literacy: u32,
    pub investments: usize,
    pub streak: u32,
}

/// `literacy * 0.4 + min(count * 10, 40) + min(streak * 4, 20)`, rounded half-up.
pub fn confidence_from(literacy_pct: Decimal, investment_count: usize, habit_streak: u32) -> Confidence {
    let literacy = literacy_pct * Decimal::new(4, 1);
    let investments = Decimal::from((investment_count as u64).saturating_mul(10).min(40));
    let streak = Decimal::from((u64::from(habit_streak) * 4).min(20));
    let score = round_half_up(literacy + investments + streak);
    Confidence {
        score,
        level: ConfidenceLevel::from_score(score),
        literacy: round_half_up(literacy_pct),
        investments: investment_count,
        streak: habit_streak,
    }
}

pub fn confidence(state: &AppState) -> Confidence {
    confidence_from(
        literacy_percent(&state.literacy_progress),
        state.investment_count(),
        state.habit_streak,
    )
}

fn round_half_up(d: Decimal) -> u32 {
    d.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(0)
}

/// The six reward milestones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum MilestoneId {
    FirstInvestment,
    Streak7,
    Invest5,
    Invest1000,
    Streak30,
    Invest10,
}

impl MilestoneId {
    pub const ALL: [MilestoneId; 6] = [
        MilestoneId::FirstInvestment,
        MilestoneId::Streak7,
        MilestoneId::Invest5,
        MilestoneId::Invest1000,
        MilestoneId::Streak30,
        MilestoneId::Invest10,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MilestoneId::FirstInvestment => "first-investment",
            MilestoneId::Streak7 => "streak-7",
            MilestoneId::Invest5 => "invest-5",
            MilestoneId::Invest1000 => "invest-1000",
            MilestoneId::Streak30 => "streak-30",
            MilestoneId::Invest10 => "invest-10",
        }
    }

    fn target(self) -> Decimal {
        match self {
            MilestoneId::FirstInvestment => Decimal::ONE,
            MilestoneId::Streak7 => Decimal::from(7),
            MilestoneId::Invest5 => Decimal::from(5),
            MilestoneId::Invest1000 => Decimal::ONE_THOUSAND,
            MilestoneId::Streak30 => Decimal::from(30),
            MilestoneId::Invest10 => Decimal::TEN,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MilestoneProgress {
    pub id: MilestoneId,
    pub achieved: bool,
    pub progress: Decimal,
    pub max_progress: Decimal,
}

/// Evaluate every milestone. `total_invested` is in rupees.
pub fn milestones(investment_count: usize, habit_streak: u32, total_invested: Decimal) -> Vec<MilestoneProgress> {
    let count = Decimal::from(investment_count);
    let streak = Decimal::from(habit_streak);
    MilestoneId::ALL
        .iter()
        .map(|&id| {
            let value = match id {
                MilestoneId::FirstInvestment | MilestoneId::Invest5 | MilestoneId::Invest10 => count,
                MilestoneId::Streak7 | MilestoneId::Streak30 => streak,
                MilestoneId::Invest1000 => total_invested,
            };
            let max = id.target();
            MilestoneProgress {
                id,
                achieved: value >= max,
                progress: value.min(max),
                max_progress: max,
            }
        })
        .collect()
}

pub fn milestones_for(state: &AppState) -> Vec<MilestoneProgress> {
    milestones(state.investment_count(), state.habit_streak, state.total_invested())
}

/// Rewards-screen total: 100 per achieved milestone.
///
/// Independent of `AppState::reward_points`, which accrues per investment.
pub fn milestone_points(list: &[MilestoneProgress]) -> u64 {
    list.iter().filter(|m| m.achieved).count() as u64 * POINTS_PER_MILESTONE
}

/// Append newly achieved milestones to the unlock log.
pub fn unlock_milestones(mut state: AppState, now: DateTime<Utc>) -> AppState {
    for m in milestones_for(&state) {
        let id = m.id.as_str();
        if m.achieved && !state.has_achieved(id) {
            info!(milestone = id, "milestone unlocked");
            state.milestones.push(AchievedMilestone {
                id: id.to_string(),
                date: now,
            });
        }
    }
    state
}

/// Badge on the habit tracker screen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HabitBadge {
    pub id: &'static str,
    pub achieved: bool,
}

pub fn habit_badges(investment_count: usize, habit_streak: u32) -> Vec<HabitBadge> {
    vec![
        HabitBadge { id: "first", achieved: investment_count >= 1 },
        HabitBadge { id: "five", achieved: investment_count >= 5 },
        HabitBadge { id: "ten", achieved: investment_count >= 10 },
        HabitBadge { id: "streak", achieved: habit_streak >= 30 },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use finlit_core::TopicProgress;
    use proptest::prelude::*;

    fn topic(completed: bool) -> TopicProgress {
        TopicProgress {
            completed,
            quiz_answered: None,
        }
    }

    #[test]
    fn literacy_counts_observed_keys() {
        let mut p = LiteracyProgress::new();
        assert_eq!(literacy_percent(&p), Decimal::ZERO);
        p.insert("a".into(), topic(true));
        p.insert("b".into(), topic(false));
        p.insert("c".into(), topic(false));
        p.insert("d".into(), topic(true));
        p.insert("extra".into(), topic(true));
        assert_eq!(literacy_percent(&p), Decimal::from(60));
    }

    #[test]
    fn confidence_caps_each_factor() {
        let c = confidence_from(Decimal::ONE_HUNDRED, 10, 10);
        assert_eq!(c.score, 100);
        assert_eq!(c.level, ConfidenceLevel::Expert);
    }

    #[test]
    fn confidence_levels_at_boundaries() {
        assert_eq!(ConfidenceLevel::from_score(24), ConfidenceLevel::Beginner);
        assert_eq!(ConfidenceLevel::from_score(25), ConfidenceLevel::Learning);
        assert_eq!(ConfidenceLevel::from_score(49), ConfidenceLevel::Learning);
        assert_eq!(ConfidenceLevel::from_score(50), ConfidenceLevel::Confident);
        assert_eq!(ConfidenceLevel::from_score(75), ConfidenceLevel::Expert);
    }

    #[test]
    fn confidence_rounds_half_up() {
        // 62.5% literacy -> 25.0, 1 investment -> 10, streak 0 -> 35
        assert_eq!(confidence_from(Decimal::new(625, 1), 1, 0).score, 35);
        // 1/3 literacy -> 13.333.. -> 13
        let third = Decimal::ONE_HUNDRED / Decimal::from(3);
        assert_eq!(confidence_from(third, 0, 0).score, 13);
        // 1.25% -> 0.5 rounds up to 1
        assert_eq!(confidence_from(Decimal::new(125, 2), 0, 0).score, 1);
    }

    #[test]
    fn invest_1000_boundary_is_inclusive() {
        let below = milestones(3, 0, Decimal::from(999));
        let at = milestones(3, 0, Decimal::from(1000));
        let find = |l: &[MilestoneProgress]| l.iter().find(|m| m.id == MilestoneId::Invest1000).cloned().unwrap();
        assert!(!find(&below).achieved);
        assert_eq!(find(&below).progress, Decimal::from(999));
        assert!(find(&at).achieved);
        assert_eq!(find(&at).max_progress, Decimal::ONE_THOUSAND);
    }

    #[test]
    fn milestone_points_are_separate_from_reward_points() {
        let l = milestones(5, 7, Decimal::from(200));
        // first-investment, streak-7, invest-5
        assert_eq!(milestone_points(&l), 300);
    }

    #[test]
    fn unlock_log_is_append_only() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let mut st = AppState::default();
        st.habit_streak = 7;
        let st = unlock_milestones(st, now);
        assert_eq!(st.milestones.len(), 1);
        assert_eq!(st.milestones[0].id, "streak-7");
        let st = unlock_milestones(st, now);
        assert_eq!(st.milestones.len(), 1);
    }

    #[test]
    fn habit_badge_thresholds() {
        let b = habit_badges(5, 30);
        assert!(b.iter().all(|x| x.id != "ten" || !x.achieved));
        assert_eq!(b.iter().filter(|x| x.achieved).count(), 3);
    }

    proptest! {
        #[test]
        fn milestones_are_monotonic(count in 0usize..20, streak in 0u32..40, total in 0i64..5000) {
            let a = milestones(count, streak, Decimal::from(total));
            let b = milestones(count + 1, streak + 1, Decimal::from(total + 1));
            for (x, y) in a.iter().zip(b.iter()) {
                prop_assert!(!x.achieved || y.achieved);
                prop_assert!(x.progress <= y.progress);
                prop_assert!(x.progress <= x.max_progress);
            }
        }

        #[test]
        fn confidence_stays_in_range(lit in 0i64..=100, count in 0usize..1000, streak in 0u32..10_000) {
            let c = confidence_from(Decimal::from(lit), count, streak);
            prop_assert!(c.score <= 100);
        }
    }
}
