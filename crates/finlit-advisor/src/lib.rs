#![deny(warnings)]

//! Advice rules: the post-onboarding product recommendation and the chat
//! helper's intent classifier.

use finlit_core::{Preference, ProductType, Recommendation, Role, UserProfile};
use serde::{Deserialize, Serialize};
use tracing::debug;

const REASON_SENIOR: &str = "Fixed Deposit with senior citizen benefits - safe and stable returns";
const REASON_EXPERIENCED: &str = "Liquid Fund - flexible, low-risk option for experienced investors";
const REASON_FIRST_TIME: &str = "Government-backed savings - perfect for first-time investors";

/// Map a profile to a product. First matching rule wins:
/// 1. senior role or senior preference -> FD at 7.5%
/// 2. invested before -> Liquid at 6.0%
/// 3. otherwise -> Govt at 6.5%
pub fn recommend(profile: &UserProfile) -> Recommendation {
    let rec = recommend_for(profile.role, profile.preference, profile.invested_before);
    debug!(role = ?profile.role, product = ?rec.product, rate = %rec.rate, "recommendation computed");
    rec
}

/// Rule table over the only three inputs it reads.
pub fn recommend_for(role: Role, preference: Preference, invested_before: bool) -> Recommendation {
    let (product, reason) = if role == Role::Senior || preference == Preference::Senior {
        (ProductType::Fd, REASON_SENIOR)
    } else if invested_before {
        (ProductType::Liquid, REASON_EXPERIENCED)
    } else {
        (ProductType::Govt, REASON_FIRST_TIME)
    };
    Recommendation {
        product,
        rate: product.annual_rate(),
        reason: reason.to_string(),
    }
}

/// What a chat message is asking about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    HowToStart,
    IsEnough,
    Returns,
    Safety,
    /// Nothing recognised; answered with the generic help text.
    Fallback,
}

/// Keyword sets in priority order. Matching is on whole tokens.
const KEYWORDS: [(Intent, &[&str]); 4] = [
    (Intent::HowToStart, &["start", "begin", "starting", "शुरू"]),
    (Intent::IsEnough, &["₹10", "enough", "पर्याप्त"]),
    (
        Intent::Returns,
        &["return", "returns", "calculate", "interest", "गणना"],
    ),
    (
        Intent::Safety,
        &["safe", "safety", "risk", "risky", "सुरक्षित"],
    ),
];

fn tokens(message: &str) -> impl Iterator<Item = String> + '_ {
    message
        .split(|c: char| c.is_whitespace() || c.is_ascii_punctuation() || c == '।')
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

/// Classify a free-form chat message.
pub fn classify(message: &str) -> Intent {
    let words: Vec<String> = tokens(message).collect();
    KEYWORDS
        .iter()
        .find(|(_, keys)| words.iter().any(|w| keys.contains(&w.as_str())))
        .map(|(intent, _)| *intent)
        .unwrap_or(Intent::Fallback)
}
