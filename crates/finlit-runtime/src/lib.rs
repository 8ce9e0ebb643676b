#![deny(warnings)]

//! Session engine for the investment-literacy simulator.
//!
//! A [`Session`] owns one [`AppState`](finlit_core::AppState) and applies
//! [`Action`]s through the pure functions in [`transitions`]. Time and fund-name
//! selection are injected so replays are deterministic.

pub mod clock;
pub mod picker;
pub mod scoring;
pub mod session;
pub mod transitions;

pub use clock::{Clock, FixedClock, SystemClock};
pub use picker::{FundPicker, SeededFundPicker};
pub use session::{Action, Session};
pub use transitions::InvestmentRequest;

use finlit_core::ValidationError;
use finlit_econ::EconError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Reasons a transition refuses to run.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Econ(#[from] EconError),
    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: Decimal, available: Decimal },
    #[error("top-up of {amount} is below the minimum of {minimum}")]
    BelowMinimumTopUp { amount: Decimal, minimum: Decimal },
    #[error("wallet balance would overflow")]
    Overflow,
}
