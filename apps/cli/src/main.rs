#![deny(warnings)]

//! Headless CLI that replays a scripted session and prints its KPIs.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use finlit_core::EngineConfig;
use finlit_runtime::{Action, FixedClock, SeededFundPicker, Session};
use serde::Deserialize;
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

const DEFAULT_SCENARIO: &str = include_str!("../scenarios/first_week.yaml");

#[derive(Debug, Deserialize)]
struct Scenario {
    #[serde(default)]
    config: EngineConfig,
    start: DateTime<Utc>,
    steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
struct Step {
    /// Days to advance the clock before the action.
    #[serde(default)]
    wait_days: i64,
    #[serde(rename = "do")]
    action: Action,
}

fn parse_args() -> (Option<String>, Option<u64>) {
    let mut scenario: Option<String> = None;
    let mut seed: Option<u64> = None;
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--scenario" => scenario = it.next(),
            "--seed" => seed = it.next().and_then(|s| s.parse().ok()),
            _ => {}
        }
    }
    (scenario, seed)
}

fn load_scenario(path: Option<&str>) -> Result<Scenario> {
    let text = match path {
        Some(p) => std::fs::read_to_string(p).with_context(|| format!("reading scenario {p}"))?,
        None => DEFAULT_SCENARIO.to_string(),
    };
    serde_yaml::from_str(&text).context("parsing scenario")
}

fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .init();

    let (scenario_path, seed) = parse_args();
    info!(scenario = ?scenario_path, ?seed, "starting CLI");

    let mut scenario = load_scenario(scenario_path.as_deref())?;
    if seed.is_some() {
        scenario.config.rng_seed = seed;
    }
    let picker = SeededFundPicker::from_config(scenario.config.rng_seed);
    let mut session = Session::with_parts(scenario.config, FixedClock::new(scenario.start), picker);

    let (mut applied, mut rejected) = (0usize, 0usize);
    for (i, step) in scenario.steps.into_iter().enumerate() {
        if step.wait_days > 0 {
            session.clock().advance(Duration::days(step.wait_days));
        }
        match session.dispatch(step.action) {
            Ok(_) => applied += 1,
            Err(e) => {
                rejected += 1;
                warn!(step = i, error = %e, "action rejected");
            }
        }
    }

    let st = session.observe().clone();
    let confidence = session.confidence();
    let dash = session.dashboard();
    let profile = session.profile_totals();

    println!(
        "Session OK | steps: {} applied, {} rejected | recommendation: {}",
        applied,
        rejected,
        st.recommendation
            .as_ref()
            .map(|r| format!("{:?} @ {}%", r.product, r.rate))
            .unwrap_or_else(|| "none".into())
    );
    println!(
        "KPI | balance: ₹{} | invested: ₹{} | projected: ₹{} | accrued: ₹{} | streak: {} | points: {} | milestone pts: {} | literacy: {}% | confidence: {} ({:?})",
        st.wallet_balance,
        dash.total_invested,
        dash.total_projected_return,
        finlit_econ::round_money(profile.total_returns),
        st.habit_streak,
        st.reward_points,
        session.milestone_points(),
        finlit_econ::round_money(session.literacy_percent()),
        confidence.score,
        confidence.level
    );

    Ok(())
}
