//! Turning what the player typed on the setup screen (or passed on the
//! command line) into a validated [`SessionConfig`].

use itertools::Itertools;

use crate::division::DivisionMode;
use crate::question::Operation;
use crate::session::{NumRange, SessionConfig, SessionLength};
use crate::util::parse_number;

/// Duration tokens meaning "no time limit".
pub const UNTIMED_TOKENS: [&str; 4] = ["inf", "infinite", "unlimited", "∞"];

/// Durations at or above this many seconds are treated as untimed.
pub const UNTIMED_SENTINEL_SECS: u64 = 99_999;

/// Largest operand bound, either sign, a range may use.
pub const MAX_OPERAND_MAGNITUDE: f64 = 100_000.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("select at least one operation")]
    NoOperationSelected,

    #[error(
        "the {axis} minimum must be smaller than the {axis} maximum, both within ±{bound}",
        bound = MAX_OPERAND_MAGNITUDE
    )]
    InvalidRange { axis: char },

    #[error("'{0}' is not a duration; use a whole number of seconds or 'inf'")]
    InvalidDuration(String),
}

/// Unvalidated setup values, kept as text where the player types them.
#[derive(Debug, Clone, PartialEq)]
pub struct RawInputs {
    pub operations: Vec<Operation>,
    pub x_min: String,
    pub x_max: String,
    pub y_min: String,
    pub y_max: String,
    pub allow_decimals: bool,
    pub target_score: Option<String>,
    pub duration: String,
    pub division_mode: DivisionMode,
}

impl Default for RawInputs {
    fn default() -> Self {
        Self {
            operations: vec![Operation::Add],
            x_min: "1".to_string(),
            x_max: "50".to_string(),
            y_min: "1".to_string(),
            y_max: "50".to_string(),
            allow_decimals: false,
            target_score: None,
            duration: "60".to_string(),
            division_mode: DivisionMode::Standard,
        }
    }
}

pub fn resolve(raw: &RawInputs) -> Result<SessionConfig, ConfigError> {
    let result = resolve_inner(raw);
    if let Err(err) = &result {
        tracing::warn!(%err, "rejected session configuration");
    }
    result
}

fn resolve_inner(raw: &RawInputs) -> Result<SessionConfig, ConfigError> {
    let operations: Vec<Operation> = raw.operations.iter().copied().unique().collect();
    if operations.is_empty() {
        return Err(ConfigError::NoOperationSelected);
    }

    let x_range = parse_range('x', &raw.x_min, &raw.x_max)?;
    let y_range = parse_range('y', &raw.y_min, &raw.y_max)?;

    Ok(SessionConfig {
        length: parse_duration(&raw.duration)?,
        target_score: parse_target(raw.target_score.as_deref()),
        operations,
        x_range,
        y_range,
        allow_decimals: raw.allow_decimals,
        division_mode: raw.division_mode,
    })
}

fn parse_range(axis: char, min: &str, max: &str) -> Result<NumRange, ConfigError> {
    match (parse_number(min), parse_number(max)) {
        (Some(min), Some(max)) if min < max && within_bounds(min) && within_bounds(max) => {
            Ok(NumRange::new(min, max))
        }
        _ => Err(ConfigError::InvalidRange { axis }),
    }
}

fn within_bounds(n: f64) -> bool {
    n.abs() <= MAX_OPERAND_MAGNITUDE
}

/// Missing, non-numeric or negative targets mean "no target".
fn parse_target(raw: Option<&str>) -> u32 {
    raw.and_then(|t| t.trim().parse::<u32>().ok()).unwrap_or(0)
}

pub fn parse_duration(token: &str) -> Result<SessionLength, ConfigError> {
    let token = token.trim();
    if UNTIMED_TOKENS
        .iter()
        .any(|t| t.eq_ignore_ascii_case(token))
    {
        return Ok(SessionLength::Untimed);
    }

    match token.parse::<u64>() {
        Ok(secs) if secs >= UNTIMED_SENTINEL_SECS => Ok(SessionLength::Untimed),
        Ok(secs) if secs > 0 => Ok(SessionLength::Timed(secs as u32)),
        _ => Err(ConfigError::InvalidDuration(token.to_string())),
    }
}
