use serde::{Deserialize, Serialize};

use crate::division::DivisionMode;
use crate::question::{Operation, Question};

/// Closed-open bounds for operand draws; integer draws include `max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumRange {
    pub min: f64,
    pub max: f64,
}

impl NumRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Smallest and largest whole numbers inside the range, if there are any.
    pub fn integer_bounds(&self) -> Option<(i64, i64)> {
        let lo = self.min.ceil() as i64;
        let hi = self.max.floor() as i64;
        (lo <= hi).then_some((lo, hi))
    }

    pub fn contains(&self, n: f64) -> bool {
        n >= self.min && n <= self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionLength {
    Timed(u32),
    Untimed,
}

/// Validated, immutable parameters of one play session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub length: SessionLength,
    pub target_score: u32,
    pub operations: Vec<Operation>,
    pub x_range: NumRange,
    pub y_range: NumRange,
    pub allow_decimals: bool,
    pub division_mode: DivisionMode,
}

impl SessionConfig {
    pub fn has_target(&self) -> bool {
        self.target_score > 0
    }

    pub fn includes(&self, op: Operation) -> bool {
        self.operations.contains(&op)
    }
}

/// One correctly answered question.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub question_text: String,
    pub answer: f64,
    pub elapsed_seconds: f64,
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub score: u32,
    pub history: Vec<HistoryEntry>,
    pub current_question: Option<Question>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_bounds_round_inwards() {
        assert_eq!(NumRange::new(1.0, 50.0).integer_bounds(), Some((1, 50)));
        assert_eq!(NumRange::new(1.5, 4.5).integer_bounds(), Some((2, 4)));
        assert_eq!(NumRange::new(-3.2, 0.0).integer_bounds(), Some((-3, 0)));
        assert_eq!(NumRange::new(1.2, 1.8).integer_bounds(), None);
    }

    #[test]
    fn contains_is_inclusive() {
        let range = NumRange::new(1.0, 5.0);
        assert!(range.contains(1.0));
        assert!(range.contains(5.0));
        assert!(!range.contains(5.01));
    }

    #[test]
    fn session_state_default_is_empty() {
        let state = SessionState::default();
        assert_eq!(state.score, 0);
        assert!(state.history.is_empty());
        assert!(state.current_question.is_none());
    }
}
