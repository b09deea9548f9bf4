use crate::session::HistoryEntry;
use crate::util::round_to;

/// Answers that took longer than this many seconds are listed as slow.
pub const SLOW_THRESHOLD_SECS: f64 = 5.0;

/// How the session went, as far as the slow-answer report is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    NothingAnswered,
    AllQuick,
    SlowItems,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub final_score: u32,
    /// Mean seconds per solved question, two decimal places.
    pub average_seconds: f64,
    pub slow_items: Vec<HistoryEntry>,
    pub verdict: Verdict,
}

impl SessionSummary {
    pub fn from_history(score: u32, history: &[HistoryEntry]) -> Self {
        let average_seconds = if score > 0 {
            let total: f64 = history.iter().map(|h| h.elapsed_seconds).sum();
            round_to(total / score as f64, 2)
        } else {
            0.0
        };

        let slow_items: Vec<HistoryEntry> = history
            .iter()
            .filter(|h| h.elapsed_seconds > SLOW_THRESHOLD_SECS)
            .cloned()
            .collect();

        let verdict = match (history.is_empty(), slow_items.is_empty()) {
            (true, _) => Verdict::NothingAnswered,
            (false, true) => Verdict::AllQuick,
            (false, false) => Verdict::SlowItems,
        };

        Self {
            final_score: score,
            average_seconds,
            slow_items,
            verdict,
        }
    }

    pub fn average_label(&self) -> String {
        format!("{:.2}s", self.average_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(text: &str, answer: f64, secs: f64) -> HistoryEntry {
        HistoryEntry {
            question_text: text.to_string(),
            answer,
            elapsed_seconds: secs,
        }
    }

    #[test]
    fn empty_history_is_nothing_answered() {
        let summary = SessionSummary::from_history(0, &[]);
        assert_eq!(summary.final_score, 0);
        assert_eq!(summary.average_seconds, 0.0);
        assert!(summary.slow_items.is_empty());
        assert_eq!(summary.verdict, Verdict::NothingAnswered);
        assert_eq!(summary.average_label(), "0.00s");
    }

    #[test]
    fn quick_answers_are_all_quick() {
        let history = vec![entry("1 + 1", 2.0, 1.0), entry("2 + 2", 4.0, 4.9)];
        let summary = SessionSummary::from_history(2, &history);
        assert!(summary.slow_items.is_empty());
        assert_eq!(summary.verdict, Verdict::AllQuick);
        assert_eq!(summary.average_seconds, 2.95);
    }

    #[test]
    fn slow_answers_are_listed_in_solve_order() {
        let history = vec![
            entry("9 × 7", 63.0, 6.2),
            entry("3 + 3", 6.0, 4.9),
            entry("12 / 4", 3.0, 8.0),
            entry("1 + 1", 2.0, 5.0),
        ];
        let summary = SessionSummary::from_history(4, &history);

        let texts: Vec<&str> = summary
            .slow_items
            .iter()
            .map(|h| h.question_text.as_str())
            .collect();
        assert_eq!(texts, vec!["9 × 7", "12 / 4"]);
        assert_eq!(summary.verdict, Verdict::SlowItems);
    }

    #[test]
    fn average_is_rounded_to_two_places() {
        let history = vec![
            entry("a", 1.0, 1.0),
            entry("b", 1.0, 1.0),
            entry("c", 1.0, 2.0),
        ];
        let summary = SessionSummary::from_history(3, &history);
        assert_eq!(summary.average_seconds, 1.33);
        assert_eq!(summary.average_label(), "1.33s");
    }
}
