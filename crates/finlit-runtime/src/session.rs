//! Single-writer session that owns the snapshot, the clock and the fund picker
//! and dispatches user actions through the transitions.

use crate::clock::{Clock, SystemClock};
use crate::picker::{FundPicker, SeededFundPicker};
use crate::scoring::{self, Confidence, HabitBadge, MilestoneProgress};
use crate::transitions::{self, InvestmentRequest};
use crate::EngineError;
use finlit_core::{
    AppState, EngineConfig, GoogleAccount, Language, PaymentMethod, Section, UserProfile,
};
use finlit_econ::{DashboardTotals, HistoryEntry, ProfileTotals};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

/// Everything the presentation layer can ask the engine to do.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Navigate { section: Section },
    ToggleLanguage,
    SetLanguage { language: Language },
    LoginGoogle(GoogleAccount),
    LoginPhone { name: String },
    Logout,
    CompleteOnboarding(UserProfile),
    ConnectBank { bank_name: String, account_last4: String },
    CreditWallet { amount: Decimal, method: PaymentMethod },
    RecordInvestment(InvestmentRequest),
    UpdateLiteracy {
        topic_id: String,
        completed: bool,
        #[serde(default)]
        quiz_answered: Option<bool>,
    },
}

pub struct Session<C = SystemClock, P = SeededFundPicker> {
    state: AppState,
    config: EngineConfig,
    clock: C,
    picker: P,
}

impl Session {
    /// Wall-clock session; fund names are seeded from `config.rng_seed`.
    pub fn new(config: EngineConfig) -> Self {
        let picker = SeededFundPicker::from_config(config.rng_seed);
        Session::with_parts(config, SystemClock, picker)
    }
}

impl<C: Clock, P: FundPicker> Session<C, P> {
    /// Start a session and stamp its first visit.
    pub fn with_parts(config: EngineConfig, clock: C, picker: P) -> Self {
        let state = transitions::mark_visit(AppState::new(&config), clock.now());
        Self {
            state,
            config,
            clock,
            picker,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Bring derived fields up to date with the clock and return the snapshot.
    pub fn observe(&mut self) -> &AppState {
        let now = self.clock.now();
        let state = std::mem::take(&mut self.state);
        self.state = transitions::refresh_streak(state, now);
        &self.state
    }

    /// Refresh the streak and apply one action. On error the snapshot is left
    /// as it was, streak included.
    pub fn dispatch(&mut self, action: Action) -> Result<&AppState, EngineError> {
        let now = self.clock.now();
        let current = transitions::refresh_streak(self.state.clone(), now);
        debug!(?action, "dispatch");
        let next = match action {
            Action::Navigate { section } => transitions::navigate(current, section),
            Action::ToggleLanguage => transitions::toggle_language(current),
            Action::SetLanguage { language } => transitions::set_language(current, language),
            Action::LoginGoogle(account) => transitions::login_google(current, account),
            Action::LoginPhone { name } => transitions::login_phone(current, &name)?,
            Action::Logout => transitions::logout(current),
            Action::CompleteOnboarding(profile) => transitions::complete_onboarding(current, profile)?,
            Action::ConnectBank {
                bank_name,
                account_last4,
            } => transitions::connect_bank(current, &bank_name, &account_last4),
            Action::CreditWallet { amount, method } => {
                transitions::credit_wallet(current, amount, method, now, self.config.min_top_up)?
            }
            Action::RecordInvestment(req) => {
                transitions::record_investment(current, req, now, &mut self.picker)?
            }
            Action::UpdateLiteracy {
                topic_id,
                completed,
                quiz_answered,
            } => transitions::update_literacy_progress(current, &topic_id, completed, quiz_answered),
        };
        self.state = next;
        Ok(&self.state)
    }

    pub fn confidence(&self) -> Confidence {
        scoring::confidence(&self.state)
    }

    pub fn milestones(&self) -> Vec<MilestoneProgress> {
        scoring::milestones_for(&self.state)
    }

    /// Rewards-screen total, 100 per achieved milestone.
    pub fn milestone_points(&self) -> u64 {
        scoring::milestone_points(&self.milestones())
    }

    pub fn habit_badges(&self) -> Vec<HabitBadge> {
        scoring::habit_badges(self.state.investment_count(), self.state.habit_streak)
    }

    pub fn literacy_percent(&self) -> Decimal {
        scoring::literacy_percent(&self.state.literacy_progress)
    }

    pub fn dashboard(&self) -> DashboardTotals {
        finlit_econ::dashboard_totals(&self.state.investments, self.state.last_visit)
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        finlit_econ::history(&self.state.investments, self.clock.now())
    }

    pub fn profile_totals(&self) -> ProfileTotals {
        finlit_econ::profile_totals(&self.state.investments, self.clock.now())
    }
}
