//! State transitions. Each takes the current snapshot by value and returns its
//! replacement, or an error with the input snapshot dropped unchanged.

use crate::picker::FundPicker;
use crate::scoring::unlock_milestones;
use crate::EngineError;
use chrono::{DateTime, Utc};
use finlit_advisor::recommend;
use finlit_core::{
    validate_amount, validate_name, validate_profile, AppState, BankDetails, Goal, GoogleAccount,
    Investment, InvestmentStatus, Language, PaymentMethod, ProductType, Section, StreakMark,
    TopicProgress, TransactionKind, UserProfile, WalletTransaction,
};
use finlit_econ::project;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info};

/// Mock IFSC attached to every linked bank account.
pub const MOCK_IFSC: &str = "SBIN0000001";

const BASE_POINTS: u64 = 10;
const FIRST_INVESTMENT_BONUS: u64 = 50;
const STREAK_BONUS: u64 = 20;
const STREAK_BONUS_THRESHOLD: u32 = 3;

/// Parameters of an investment confirmed by the user.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct InvestmentRequest {
    /// Principal in rupees.
    pub amount: Decimal,
    pub product: ProductType,
    #[serde(default = "default_duration")]
    pub duration_months: u32,
    #[serde(default)]
    pub goal: Option<Goal>,
    /// Chosen entity; a name is picked when absent or blank.
    #[serde(default)]
    pub fund_name: Option<String>,
}

fn default_duration() -> u32 {
    finlit_econ::QUOTE_MONTHS
}

pub fn navigate(mut state: AppState, section: Section) -> AppState {
    state.section = section;
    state
}

pub fn toggle_language(mut state: AppState) -> AppState {
    state.language = state.language.toggled();
    state
}

pub fn set_language(mut state: AppState, language: Language) -> AppState {
    state.language = language;
    state
}

/// Record the first visit of the session; later calls keep the original time.
pub fn mark_visit(mut state: AppState, now: DateTime<Utc>) -> AppState {
    if state.last_visit.is_none() {
        state.last_visit = Some(now);
    }
    state
}

pub fn login_google(mut state: AppState, account: GoogleAccount) -> AppState {
    state.login_name = Some(account.first_name().to_string());
    state.google_account = Some(account);
    state
}

pub fn login_phone(mut state: AppState, name: &str) -> Result<AppState, EngineError> {
    validate_name(name)?;
    state.login_name = Some(name.trim().to_string());
    Ok(state)
}

/// Drop identity and profile and return to the landing screen. Wallet,
/// investments and progress stay with the session.
pub fn logout(mut state: AppState) -> AppState {
    state.google_account = None;
    state.user_profile = None;
    state.login_name = None;
    state.section = Section::Landing;
    state
}

/// Store the profile and derive the product recommendation.
pub fn complete_onboarding(mut state: AppState, profile: UserProfile) -> Result<AppState, EngineError> {
    validate_profile(&profile)?;
    let rec = recommend(&profile);
    info!(product = ?rec.product, rate = %rec.rate, "onboarding completed");
    state.recommendation = Some(rec);
    state.user_profile = Some(profile);
    Ok(state)
}

/// Link a mock bank account. Nothing is verified.
pub fn connect_bank(mut state: AppState, bank_name: &str, account_last4: &str) -> AppState {
    let holder = state
        .user_profile
        .as_ref()
        .map_or_else(|| "User".to_string(), |p| p.name.clone());
    state.bank_details = Some(BankDetails {
        bank_name: bank_name.to_string(),
        account_number: account_last4.to_string(),
        ifsc: MOCK_IFSC.to_string(),
        account_holder: holder,
    });
    state
}

/// Points earned by an investment of `amount` given the state before it.
///
/// Saturates at `u64::MAX` for amounts whose bonus does not fit.
pub fn investment_points(amount: Decimal, first: bool, habit_streak: u32) -> u64 {
    let amount_bonus = (amount / Decimal::TEN)
        .floor()
        .max(Decimal::ZERO)
        .to_u64()
        .unwrap_or(u64::MAX);
    let first_bonus = if first { FIRST_INVESTMENT_BONUS } else { 0 };
    let streak_bonus = if habit_streak >= STREAK_BONUS_THRESHOLD {
        STREAK_BONUS
    } else {
        0
    };
    BASE_POINTS
        .saturating_add(amount_bonus)
        .saturating_add(first_bonus)
        .saturating_add(streak_bonus)
}

/// Millisecond timestamp of `now`, suffixed `-n` when a record in `state`
/// already uses it.
fn record_id(state: &AppState, now: DateTime<Utc>) -> String {
    let base = now.timestamp_millis().to_string();
    let taken = |id: &str| {
        state.investments.iter().any(|i| i.id == id)
            || state.wallet_transactions.iter().any(|t| t.id == id)
    };
    if !taken(&base) {
        return base;
    }
    let mut n = 1u32;
    loop {
        let id = format!("{base}-{n}");
        if !taken(&id) {
            return id;
        }
        n += 1;
    }
}

/// Move `amount` from the wallet into a new investment.
///
/// The streak is bootstrapped to 1 on the first investment and otherwise left
/// for [`refresh_streak`].
pub fn record_investment(
    mut state: AppState,
    req: InvestmentRequest,
    now: DateTime<Utc>,
    picker: &mut dyn FundPicker,
) -> Result<AppState, EngineError> {
    validate_amount(req.amount)?;
    if req.amount > state.wallet_balance {
        return Err(EngineError::InsufficientBalance {
            requested: req.amount,
            available: state.wallet_balance,
        });
    }
    let projection = project(req.amount, req.product.annual_rate(), req.duration_months)?;
    let fund_name = match req.fund_name {
        Some(name) if !name.trim().is_empty() => name,
        _ => picker.pick().to_string(),
    };
    let first = state.investments.is_empty();
    let points = investment_points(req.amount, first, state.habit_streak);
    let id = record_id(&state, now);

    state.wallet_transactions.insert(
        0,
        WalletTransaction {
            id: id.clone(),
            kind: TransactionKind::Debit,
            amount: req.amount,
            description: format!("Investment in {fund_name}"),
            date: now,
            method: Some(PaymentMethod::Wallet),
            reference_id: None,
        },
    );
    state.investments.push(Investment {
        id,
        amount: req.amount,
        product: req.product,
        date: now,
        projected_return: projection.returns,
        duration_months: req.duration_months,
        goal: req.goal,
        fund_name,
        status: InvestmentStatus::Active,
    });
    state.wallet_balance -= req.amount;
    state.last_investment_date = Some(now);
    if first {
        state.habit_streak = 1;
    }
    state.reward_points = state.reward_points.saturating_add(points);
    info!(
        amount = %req.amount,
        product = ?req.product,
        points,
        balance = %state.wallet_balance,
        "investment recorded"
    );
    Ok(unlock_milestones(state, now))
}

/// Reference id shown on a top-up receipt.
pub fn top_up_reference(now: DateTime<Utc>) -> String {
    let ms = now.timestamp_millis().to_string();
    let tail = &ms[ms.len().saturating_sub(10)..];
    format!("INV10{tail}")
}

/// Add money to the wallet. No upper bound.
pub fn credit_wallet(
    mut state: AppState,
    amount: Decimal,
    method: PaymentMethod,
    now: DateTime<Utc>,
    min_top_up: Decimal,
) -> Result<AppState, EngineError> {
    validate_amount(amount)?;
    if amount < min_top_up {
        return Err(EngineError::BelowMinimumTopUp {
            amount,
            minimum: min_top_up,
        });
    }
    let balance = state
        .wallet_balance
        .checked_add(amount)
        .ok_or(EngineError::Overflow)?;
    let id = record_id(&state, now);
    state.wallet_transactions.insert(
        0,
        WalletTransaction {
            id,
            kind: TransactionKind::Credit,
            amount,
            description: "Added Money".to_string(),
            date: now,
            method: Some(method),
            reference_id: Some(top_up_reference(now)),
        },
    );
    state.wallet_balance = balance;
    info!(amount = %amount, method = ?method, balance = %state.wallet_balance, "wallet credited");
    Ok(state)
}

/// Reconcile the habit streak with the calendar.
///
/// Compares the UTC calendar day of `now` with that of the last investment:
/// one day apart extends the streak, more resets it to 1, same day keeps it.
/// Each (last investment, day) pair is applied at most once, so repeated
/// observation within a day is a no-op.
pub fn refresh_streak(mut state: AppState, now: DateTime<Utc>) -> AppState {
    let Some(last) = state.last_investment_date else {
        return state;
    };
    let mark = StreakMark {
        last_investment: last,
        observed_on: now.date_naive(),
    };
    if state.streak_mark == Some(mark) {
        return state;
    }
    let diff_days = (mark.observed_on - last.date_naive()).num_days();
    let before = state.habit_streak;
    match diff_days {
        1 => state.habit_streak += 1,
        d if d > 1 => state.habit_streak = 1,
        _ => {}
    }
    state.streak_mark = Some(mark);
    if state.habit_streak != before {
        debug!(diff_days, before, after = state.habit_streak, "habit streak updated");
    }
    unlock_milestones(state, now)
}

/// Overwrite the progress entry for `topic_id`. Unknown ids are accepted.
pub fn update_literacy_progress(
    mut state: AppState,
    topic_id: &str,
    completed: bool,
    quiz_answered: Option<bool>,
) -> AppState {
    state.literacy_progress.insert(
        topic_id.to_string(),
        TopicProgress {
            completed,
            quiz_answered,
        },
    );
    state
}
