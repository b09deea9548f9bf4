use std::time::Instant;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::session::{NumRange, SessionConfig};
use crate::util::{format_number, parse_number, round_to, truncate2};

/// Largest difference from the canonical answer still accepted as correct.
pub const ANSWER_TOLERANCE: f64 = 1e-5;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    #[value(alias = "+")]
    Add,
    #[value(alias = "sub", alias = "-")]
    Subtract,
    #[value(alias = "mul", alias = "*")]
    Multiply,
    #[value(alias = "div", alias = "/")]
    Divide,
}

impl Operation {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Multiply => "×",
            Operation::Divide => "÷",
        }
    }
}

/// Granularity of a random operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// Whole numbers, both range ends reachable.
    Integer,
    /// One decimal place, drawn from `[min, max)`.
    Tenths,
    /// Two decimal places, drawn from `[min, max)`.
    Hundredths,
}

impl Precision {
    pub fn for_operands(allow_decimals: bool) -> Self {
        if allow_decimals {
            Precision::Tenths
        } else {
            Precision::Integer
        }
    }
}

pub fn draw_operand<R: Rng + ?Sized>(rng: &mut R, range: NumRange, precision: Precision) -> f64 {
    match precision {
        Precision::Integer => match range.integer_bounds() {
            Some((lo, hi)) => rng.gen_range(lo..=hi) as f64,
            // no whole number fits, e.g. (1.2, 1.8)
            None => range.min.floor(),
        },
        Precision::Tenths => round_to(rng.gen_range(range.min..range.max), 1),
        Precision::Hundredths => round_to(rng.gen_range(range.min..range.max), 2),
    }
}

/// How a question is laid out on screen.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayForm {
    Expression(String),
    Fraction { numerator: f64, denominator: f64 },
}

#[derive(Debug, Clone)]
pub struct Question {
    pub operation: Operation,
    pub display: DisplayForm,
    pub answer: f64,
    pub created_at: Instant,
}

impl Question {
    pub fn new(operation: Operation, display: DisplayForm, answer: f64) -> Self {
        Self {
            operation,
            display,
            answer,
            created_at: Instant::now(),
        }
    }

    pub fn fraction(numerator: f64, denominator: f64, answer: f64) -> Self {
        Self::new(
            Operation::Divide,
            DisplayForm::Fraction {
                numerator,
                denominator,
            },
            answer,
        )
    }

    /// Single-line form used in history and reports.
    pub fn text(&self) -> String {
        match &self.display {
            DisplayForm::Expression(text) => text.clone(),
            DisplayForm::Fraction {
                numerator,
                denominator,
            } => format!(
                "{} / {}",
                format_number(*numerator),
                format_number(*denominator)
            ),
        }
    }

    pub fn answer_text(&self) -> String {
        format_number(self.answer)
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.created_at.elapsed().as_secs_f64()
    }

    /// Whether the typed text is the canonical answer. Anything that does not
    /// parse as a number is simply not a match.
    pub fn is_answered_by(&self, raw: &str) -> bool {
        parse_number(raw).is_some_and(|value| (value - self.answer).abs() < ANSWER_TOLERANCE)
    }
}

/// Build an addition, subtraction or multiplication question.
///
/// Subtraction is posed as `(x + y) - x` so the difference is always `y`,
/// which keeps it non-negative whenever the y range is.
pub fn arithmetic<R: Rng + ?Sized>(
    rng: &mut R,
    operation: Operation,
    config: &SessionConfig,
) -> Question {
    let precision = Precision::for_operands(config.allow_decimals);
    let x = draw_operand(rng, config.x_range, precision);
    let y = draw_operand(rng, config.y_range, precision);
    let (fx, fy) = (format_number(x), format_number(y));

    let (text, answer) = match operation {
        Operation::Add => (format!("{fx} + {fy}"), truncate2(x + y)),
        Operation::Subtract => {
            let total = truncate2(x + y);
            (format!("{} - {fx}", format_number(total)), y)
        }
        Operation::Multiply => (format!("{fx} × {fy}"), truncate2(x * y)),
        Operation::Divide => unreachable!("division questions come from DivisionStrategy"),
    };

    Question::new(operation, DisplayForm::Expression(text), answer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::division::DivisionMode;
    use crate::session::SessionLength;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config(allow_decimals: bool) -> SessionConfig {
        SessionConfig {
            length: SessionLength::Timed(60),
            target_score: 0,
            operations: vec![Operation::Add],
            x_range: NumRange::new(1.0, 5.0),
            y_range: NumRange::new(1.0, 5.0),
            allow_decimals,
            division_mode: DivisionMode::Standard,
        }
    }

    #[test]
    fn integer_draws_reach_both_ends() {
        let mut rng = StdRng::seed_from_u64(7);
        let range = NumRange::new(1.0, 3.0);
        let draws: Vec<f64> = (0..500)
            .map(|_| draw_operand(&mut rng, range, Precision::Integer))
            .collect();

        assert!(draws.contains(&1.0));
        assert!(draws.contains(&3.0));
        assert!(draws.iter().all(|d| d.fract() == 0.0 && range.contains(*d)));
    }

    #[test]
    fn decimal_draws_use_requested_precision() {
        let mut rng = StdRng::seed_from_u64(11);
        let range = NumRange::new(0.0, 10.0);
        for _ in 0..200 {
            let tenth = draw_operand(&mut rng, range, Precision::Tenths);
            assert_eq!(round_to(tenth, 1), tenth);
            assert!(tenth <= 10.0);

            let hundredth = draw_operand(&mut rng, range, Precision::Hundredths);
            assert_eq!(round_to(hundredth, 2), hundredth);
        }
    }

    #[test]
    fn integer_draw_without_whole_numbers_falls_back_to_floor() {
        let mut rng = StdRng::seed_from_u64(1);
        let draw = draw_operand(&mut rng, NumRange::new(1.2, 1.8), Precision::Integer);
        assert_eq!(draw, 1.0);
    }

    #[test]
    fn addition_answer_matches_display() {
        let mut rng = StdRng::seed_from_u64(3);
        let cfg = config(false);
        for _ in 0..50 {
            let q = arithmetic(&mut rng, Operation::Add, &cfg);
            let text = q.text();
            let parts: Vec<f64> = text
                .split(" + ")
                .map(|p| p.parse().unwrap())
                .collect();
            assert_eq!(parts.len(), 2);
            assert_eq!(q.answer, parts[0] + parts[1]);
        }
    }

    #[test]
    fn subtraction_is_posed_as_total_minus_x() {
        let mut rng = StdRng::seed_from_u64(5);
        let cfg = config(false);
        for _ in 0..50 {
            let q = arithmetic(&mut rng, Operation::Subtract, &cfg);
            let parts: Vec<f64> = q
                .text()
                .split(" - ")
                .map(|p| p.parse().unwrap())
                .collect();
            assert_eq!(parts[0] - parts[1], q.answer);
            assert!(cfg.y_range.contains(q.answer));
        }
    }

    #[test]
    fn multiplication_uses_times_sign() {
        let mut rng = StdRng::seed_from_u64(9);
        let q = arithmetic(&mut rng, Operation::Multiply, &config(false));
        assert!(q.text().contains(" × "));
        assert_eq!(q.operation, Operation::Multiply);
    }

    #[test]
    fn decimal_products_are_truncated() {
        let mut rng = StdRng::seed_from_u64(13);
        let cfg = config(true);
        for _ in 0..100 {
            let q = arithmetic(&mut rng, Operation::Multiply, &cfg);
            assert_eq!(truncate2(q.answer), q.answer);
        }
    }

    #[test]
    fn answers_within_tolerance_match() {
        let q = Question::new(Operation::Add, DisplayForm::Expression("1 + 1".into()), 2.0);
        assert!(q.is_answered_by("2"));
        assert!(q.is_answered_by("2.000009"));
        assert!(!q.is_answered_by("2.00001"));
        assert!(!q.is_answered_by("2.01"));
        assert!(!q.is_answered_by(""));
        assert!(!q.is_answered_by("two"));
    }

    #[test]
    fn comma_decimal_separator_matches() {
        let q = Question::new(Operation::Add, DisplayForm::Expression("1.2 + 1.3".into()), 2.5);
        assert!(q.is_answered_by("2,5"));
        assert!(q.is_answered_by("2.5"));
    }

    #[test]
    fn fraction_text_uses_slash() {
        let q = Question::fraction(12.0, 4.0, 3.0);
        assert_eq!(q.text(), "12 / 4");
        assert_eq!(q.answer_text(), "3");
        assert_eq!(q.operation, Operation::Divide);
    }

    #[test]
    fn operation_display_names() {
        assert_eq!(Operation::Add.to_string(), "Add");
        assert_eq!(Operation::Divide.symbol(), "÷");
    }
}
