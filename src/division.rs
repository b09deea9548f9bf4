//! Division questions.
//!
//! Division is the only operation whose operands are constrained by each
//! other. Exact integer division is served from an index of every valid
//! `(dividend, divisor)` pair built once per session; the other modes draw
//! freely and derive the fraction from the draws.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::question::{draw_operand, Operation, Precision, Question};
use crate::session::{NumRange, SessionConfig};
use crate::util::truncate2;

/// Redraws allowed when hunting for a non-exact quotient.
const BROKEN_DRAW_ATTEMPTS: usize = 64;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum DivisionMode {
    /// Whole-number quotients only.
    #[default]
    Standard,
    /// Smaller operand over the larger one.
    Inverse,
    /// Quotients that never come out even.
    #[value(name = "broken-int", alias = "broken")]
    BrokenInt,
}

impl DivisionMode {
    pub fn next(self) -> Self {
        match self {
            DivisionMode::Standard => DivisionMode::Inverse,
            DivisionMode::Inverse => DivisionMode::BrokenInt,
            DivisionMode::BrokenInt => DivisionMode::Standard,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            DivisionMode::Standard => DivisionMode::BrokenInt,
            DivisionMode::Inverse => DivisionMode::Standard,
            DivisionMode::BrokenInt => DivisionMode::Inverse,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DivisionPair {
    pub dividend: i64,
    pub divisor: i64,
}

impl DivisionPair {
    pub fn quotient(&self) -> i64 {
        self.dividend / self.divisor
    }
}

/// An arithmetic run of dividends sharing one divisor:
/// `first`, `first + step`, ... for `count` terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PairRun {
    divisor: i64,
    first: i64,
    step: i64,
    count: u64,
}

impl PairRun {
    fn pair(&self, offset: u64) -> DivisionPair {
        DivisionPair {
            dividend: self.first + self.step * offset as i64,
            divisor: self.divisor,
        }
    }
}

/// Every exact pair of a session, stored as one or two runs per divisor so
/// wide ranges cost memory in the number of divisors rather than pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DivisionPairs {
    runs: Vec<PairRun>,
    /// Pair count up to and including each run.
    ends: Vec<u64>,
}

impl DivisionPairs {
    fn push(&mut self, run: PairRun) {
        if run.count == 0 {
            return;
        }
        let total = self.len() + run.count;
        self.runs.push(run);
        self.ends.push(total);
    }

    pub fn len(&self) -> u64 {
        self.ends.last().copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn get(&self, index: u64) -> Option<DivisionPair> {
        let run_idx = self.ends.partition_point(|end| *end <= index);
        let run = self.runs.get(run_idx)?;
        let start = if run_idx == 0 { 0 } else { self.ends[run_idx - 1] };
        Some(run.pair(index - start))
    }

    /// Uniform pick over all pairs.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<DivisionPair> {
        if self.is_empty() {
            return None;
        }
        self.get(rng.gen_range(0..self.len()))
    }

    pub fn iter(&self) -> impl Iterator<Item = DivisionPair> + '_ {
        self.runs
            .iter()
            .flat_map(|run| (0..run.count).map(move |offset| run.pair(offset)))
    }
}

/// Every `(multiple, d)` with `d` a non-zero whole number in `y` and
/// `multiple` a multiple of `d` in `x`.
///
/// Pairs where the dividend equals the divisor are left out unless nothing
/// else exists, in which case they are the only pairs returned.
pub fn precompute_division_pairs(x: NumRange, y: NumRange) -> DivisionPairs {
    let mut pairs = DivisionPairs::default();
    let Some((d_lo, d_hi)) = y.integer_bounds() else {
        return pairs;
    };
    let Some((x_lo, x_hi)) = x.integer_bounds() else {
        return pairs;
    };

    for divisor in (d_lo..=d_hi).filter(|d| *d != 0) {
        let step = divisor.abs();
        // smallest multiple of the divisor not below x_lo
        let first = if x_lo.rem_euclid(step) == 0 {
            x_lo
        } else {
            (x_lo.div_euclid(step) + 1) * step
        };
        if first > x_hi {
            continue;
        }
        let count = ((x_hi - first) / step + 1) as u64;

        // the divisor is itself a multiple of the step, so it splits the run
        if (first..=x_hi).contains(&divisor) {
            let skip = ((divisor - first) / step) as u64;
            pairs.push(PairRun {
                divisor,
                first,
                step,
                count: skip,
            });
            pairs.push(PairRun {
                divisor,
                first: divisor + step,
                step,
                count: count - skip - 1,
            });
        } else {
            pairs.push(PairRun {
                divisor,
                first,
                step,
                count,
            });
        }
    }

    if pairs.is_empty() {
        for d in (d_lo..=d_hi).filter(|d| *d != 0 && (x_lo..=x_hi).contains(d)) {
            pairs.push(PairRun {
                divisor: d,
                first: d,
                step: 1,
                count: 1,
            });
        }
        tracing::debug!(count = pairs.len(), "only trivial division pairs available");
    }

    tracing::debug!(
        count = pairs.len(),
        runs = pairs.runs.len(),
        "precomputed division pairs"
    );
    pairs
}

/// How division questions are produced for a session, fixed at session start.
#[derive(Debug, Clone, PartialEq)]
pub enum DivisionStrategy {
    /// Uniform pick from precomputed exact pairs.
    Exact(DivisionPairs),
    /// `small / big` over integer draws.
    Inverse,
    /// `big / small` over integer draws, redrawn until the quotient is fractional.
    Broken,
    /// `x / y` over two-decimal draws.
    Decimal,
}

impl DivisionStrategy {
    /// Decimals win over the configured mode. Pairs are only built when the
    /// session actually asks division questions.
    pub fn for_config(config: &SessionConfig) -> Self {
        if config.allow_decimals {
            return DivisionStrategy::Decimal;
        }

        match config.division_mode {
            DivisionMode::Inverse => DivisionStrategy::Inverse,
            DivisionMode::BrokenInt => DivisionStrategy::Broken,
            DivisionMode::Standard => {
                if config.includes(Operation::Divide) {
                    DivisionStrategy::Exact(precompute_division_pairs(
                        config.x_range,
                        config.y_range,
                    ))
                } else {
                    DivisionStrategy::Exact(DivisionPairs::default())
                }
            }
        }
    }

    pub fn question<R: Rng + ?Sized>(&self, rng: &mut R, config: &SessionConfig) -> Question {
        match self {
            DivisionStrategy::Exact(pairs) => match pairs.choose(rng) {
                Some(pair) => Question::fraction(
                    pair.dividend as f64,
                    pair.divisor as f64,
                    pair.quotient() as f64,
                ),
                None => {
                    let n = draw_operand(rng, config.x_range, Precision::Integer)
                        .floor()
                        .max(1.0);
                    Question::fraction(n, n, 1.0)
                }
            },
            DivisionStrategy::Inverse => {
                let (small, big) = ordered_draws(rng, config);
                Question::fraction(small, big, truncate2(small / big))
            }
            DivisionStrategy::Broken => {
                let mut draw = ordered_draws(rng, config);
                for _ in 1..BROKEN_DRAW_ATTEMPTS {
                    let (small, big) = draw;
                    if (big / small).fract() != 0.0 {
                        break;
                    }
                    draw = ordered_draws(rng, config);
                }
                let (small, big) = draw;
                Question::fraction(big, small, truncate2(big / small))
            }
            DivisionStrategy::Decimal => {
                let x = draw_operand(rng, config.x_range, Precision::Hundredths);
                let y = draw_operand(rng, config.y_range, Precision::Hundredths);
                let denominator = if y == 0.0 { 1.0 } else { y };
                Question::fraction(x, denominator, truncate2(x / denominator))
            }
        }
    }
}

/// Draw whole-number x and y and return them as `(small, big)`, with zeros clamped to 1.
fn ordered_draws<R: Rng + ?Sized>(rng: &mut R, config: &SessionConfig) -> (f64, f64) {
    let x = draw_operand(rng, config.x_range, Precision::Integer);
    let y = draw_operand(rng, config.y_range, Precision::Integer);
    let clamp = |n: f64| if n == 0.0 { 1.0 } else { n };
    (clamp(x.min(y)), clamp(x.max(y)))
}
