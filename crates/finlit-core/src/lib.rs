#![deny(warnings)]

//! Core session models and invariants for the investment-literacy simulator.
//!
//! This crate defines the serializable snapshot that every transition in the
//! runtime consumes and produces, plus validation helpers for the inputs that
//! must never reach a transition unchecked.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Minimum age accepted at onboarding.
pub const MIN_AGE: u32 = 18;

/// Fund names assigned to investments that were made without picking an entity.
pub const FUND_NAMES: [&str; 12] = [
    "National Growth & Stability Fund",
    "Bharat Public Savings Authority",
    "Indian Long-Term Capital Trust",
    "Central Secure Investment Board",
    "Unified Citizen Wealth Fund",
    "Public Infrastructure Growth Fund",
    "BlueHarbor Wealth Partners",
    "Navia Capital Management",
    "Aurora Yield Fund",
    "Vertex Secure Investments",
    "TrueNest Financial Services",
    "Pinnacle MicroCap Fund",
];

/// Topic ids shipped with the reference lesson content.
///
/// Progress percentages are computed from observed keys, never from this list.
pub const LITERACY_TOPICS: [&str; 4] = [
    "investing-vs-saving",
    "low-risk",
    "starting-small",
    "returns-over-time",
];

/// Screen the presentation layer is currently showing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Section {
    #[default]
    Landing,
    Features,
    Login,
    Literacy,
    Onboarding,
    BankConnection,
    Recommendation,
    AddMoney,
    Wallet,
    Invest,
    Dashboard,
    InvestmentHistory,
    Progress,
    Habit,
    Rewards,
    Profile,
    Terms,
    Faq,
    Chatbot,
}

/// Display language. Has no effect on any business rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
}

impl Language {
    /// The other language.
    pub fn toggled(self) -> Self {
        match self {
            Language::En => Language::Hi,
            Language::Hi => Language::En,
        }
    }
}

/// Life stage chosen during onboarding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Working,
    Senior,
}

/// Product preference chosen during onboarding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preference {
    Regular,
    Senior,
}

/// Investment product families offered by the simulator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProductType {
    /// Fixed deposit.
    #[serde(rename = "FD")]
    Fd,
    /// Liquid mutual fund.
    Liquid,
    /// Government-backed savings scheme.
    Govt,
}

impl ProductType {
    /// Annual simple-interest rate offered on the product, in percent.
    pub fn annual_rate(self) -> Decimal {
        match self {
            ProductType::Fd => Decimal::new(75, 1),
            ProductType::Liquid => Decimal::new(60, 1),
            ProductType::Govt => Decimal::new(65, 1),
        }
    }
}

/// Savings goal an investment can be tagged with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Goal {
    Emergency,
    ShortTerm,
    Learning,
    Retirement,
}

/// Lifecycle of an investment record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentStatus {
    #[default]
    Active,
    Completed,
    Pending,
}

/// Direction of a wallet movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Credit,
    Debit,
}

/// Instrument a wallet movement was made with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "UPI")]
    Upi,
    Card,
    Wallet,
}

/// Answers collected by the onboarding form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Display name (non-empty after trimming).
    pub name: String,
    /// Age in years (>= 18).
    pub age: u32,
    pub role: Role,
    /// Whether the user has invested before.
    pub invested_before: bool,
    /// Free-form challenge tags ticked by the user.
    #[serde(default)]
    pub challenges: BTreeSet<String>,
    /// Amount the user intends to start with, in rupees.
    pub starting_amount: Decimal,
    pub preference: Preference,
}

/// Mock bank account linked during onboarding. Never validated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankDetails {
    pub bank_name: String,
    pub account_number: String,
    pub ifsc: String,
    pub account_holder: String,
}

/// A single wallet ledger entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletTransaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Amount in rupees (> 0).
    pub amount: Decimal,
    pub description: String,
    pub date: DateTime<Utc>,
    pub method: Option<PaymentMethod>,
    pub reference_id: Option<String>,
}

/// A recorded investment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    pub id: String,
    /// Principal in rupees (> 0).
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub product: ProductType,
    pub date: DateTime<Utc>,
    /// Interest projected over the quoted horizon, in rupees.
    pub projected_return: Decimal,
    /// Tenure in months.
    #[serde(rename = "duration")]
    pub duration_months: u32,
    pub goal: Option<Goal>,
    pub fund_name: String,
    pub status: InvestmentStatus,
}

/// Product suggested after onboarding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub product: ProductType,
    /// Annual simple-interest rate in percent.
    pub rate: Decimal,
    pub reason: String,
}

/// Progress on one literacy topic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicProgress {
    pub completed: bool,
    pub quiz_answered: Option<bool>,
}

/// Topic id to progress, in key order.
pub type LiteracyProgress = BTreeMap<String, TopicProgress>;

/// A milestone the session has unlocked, with the time it was first seen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievedMilestone {
    pub id: String,
    pub date: DateTime<Utc>,
}

/// Mock identity returned by the account picker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoogleAccount {
    pub name: String,
    pub email: String,
    pub avatar: String,
}

impl GoogleAccount {
    /// First whitespace-separated word of the account name.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or("")
    }
}

/// Dependency key of the last streak reconciliation: which investment date
/// was compared against which calendar day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakMark {
    pub last_investment: DateTime<Utc>,
    pub observed_on: NaiveDate,
}

/// Tunables for a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Wallet balance a new session starts with, in rupees.
    pub starting_balance: Decimal,
    /// Smallest accepted wallet top-up, in rupees.
    pub min_top_up: Decimal,
    /// Seed for fund-name selection. `None` seeds from OS entropy.
    pub rng_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            starting_balance: Decimal::from(10_000),
            min_top_up: Decimal::from(10),
            rng_seed: None,
        }
    }
}

/// Canonical snapshot of one user session.
///
/// Transitions take a snapshot by value and hand back a replacement; nothing
/// outside the runtime mutates it in place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub section: Section,
    pub language: Language,
    pub user_profile: Option<UserProfile>,
    pub bank_details: Option<BankDetails>,
    /// Wallet balance in rupees.
    pub wallet_balance: Decimal,
    /// Newest first.
    pub wallet_transactions: Vec<WalletTransaction>,
    /// Oldest first.
    pub investments: Vec<Investment>,
    pub habit_streak: u32,
    pub last_investment_date: Option<DateTime<Utc>>,
    pub recommendation: Option<Recommendation>,
    pub literacy_progress: LiteracyProgress,
    pub last_visit: Option<DateTime<Utc>>,
    pub milestones: Vec<AchievedMilestone>,
    pub reward_points: u64,
    pub google_account: Option<GoogleAccount>,
    /// Name captured at login, pre-filled into onboarding.
    pub login_name: Option<String>,
    pub streak_mark: Option<StreakMark>,
}

impl AppState {
    /// Fresh session on the landing screen.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            section: Section::Landing,
            language: Language::En,
            user_profile: None,
            bank_details: None,
            wallet_balance: config.starting_balance,
            wallet_transactions: vec![],
            investments: vec![],
            habit_streak: 0,
            last_investment_date: None,
            recommendation: None,
            literacy_progress: LiteracyProgress::new(),
            last_visit: None,
            milestones: vec![],
            reward_points: 0,
            google_account: None,
            login_name: None,
            streak_mark: None,
        }
    }

    pub fn investment_count(&self) -> usize {
        self.investments.len()
    }

    /// Sum of all invested principal.
    pub fn total_invested(&self) -> Decimal {
        self.investments.iter().map(|i| i.amount).sum()
    }

    pub fn has_achieved(&self, milestone_id: &str) -> bool {
        self.milestones.iter().any(|m| m.id == milestone_id)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

/// Validation errors for session inputs.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("age {0} is below the minimum of 18")]
    Underage(u32),
    #[error("name must not be empty")]
    EmptyName,
    /// Amounts must be strictly positive.
    #[error("amount must be > 0, got {0}")]
    NonPositiveAmount(Decimal),
}

/// Validate a display name.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(())
}

/// Validate onboarding answers.
pub fn validate_profile(p: &UserProfile) -> Result<(), ValidationError> {
    validate_name(&p.name)?;
    if p.age < MIN_AGE {
        return Err(ValidationError::Underage(p.age));
    }
    if p.starting_amount < Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount(p.starting_amount));
    }
    Ok(())
}

/// Validate a money amount.
pub fn validate_amount(amount: Decimal) -> Result<(), ValidationError> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount(amount));
    }
    Ok(())
}
