use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::division::DivisionStrategy;
use crate::question::{self, DisplayForm, Operation, Question};
use crate::session::{HistoryEntry, SessionConfig, SessionLength, SessionState};
use crate::summary::SessionSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No session has been started yet.
    Idle,
    /// Questions are being asked and answers accepted.
    InSession,
    /// The session is over; only the summary is meaningful.
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeLeft {
    Seconds(u32),
    Unlimited,
}

impl TimeLeft {
    fn from_length(length: SessionLength) -> Self {
        match length {
            SessionLength::Timed(secs) => TimeLeft::Seconds(secs),
            SessionLength::Untimed => TimeLeft::Unlimited,
        }
    }
}

impl std::fmt::Display for TimeLeft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeLeft::Seconds(secs) => write!(f, "{secs}"),
            TimeLeft::Unlimited => write!(f, "∞"),
        }
    }
}

#[derive(Debug)]
struct ActiveSession {
    config: SessionConfig,
    division: DivisionStrategy,
    state: SessionState,
    time_left: TimeLeft,
}

/// Generates questions for a session and judges the answers typed against them.
///
/// The engine is reusable: `start` can be called again from any phase and
/// throws away everything from the previous session.
#[derive(Debug)]
pub struct QuestionEngine {
    rng: StdRng,
    phase: Phase,
    session: Option<ActiveSession>,
}

impl Default for QuestionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionEngine {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            phase: Phase::Idle,
            session: None,
        }
    }

    pub fn start(&mut self, config: SessionConfig) {
        tracing::info!(
            operations = ?config.operations,
            length = ?config.length,
            target = config.target_score,
            decimals = config.allow_decimals,
            division_mode = %config.division_mode,
            "session started"
        );

        let division = DivisionStrategy::for_config(&config);
        self.session = Some(ActiveSession {
            time_left: TimeLeft::from_length(config.length),
            config,
            division,
            state: SessionState::default(),
        });
        self.phase = Phase::InSession;
        self.next();
    }

    /// Replace the live question. Only does anything while in session.
    pub fn next(&mut self) -> Option<&Question> {
        if self.phase != Phase::InSession {
            return None;
        }
        let session = self.session.as_mut()?;

        let operation = session
            .config
            .operations
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(Operation::Add);

        let question = match operation {
            Operation::Divide => session.division.question(&mut self.rng, &session.config),
            op => question::arithmetic(&mut self.rng, op, &session.config),
        };
        tracing::debug!(question = %question.text(), answer = question.answer, "next question");

        session.state.current_question = Some(question);
        session.state.current_question.as_ref()
    }

    /// Check the text typed so far. A match is recorded with the time since
    /// the question appeared and moves the session on.
    pub fn evaluate(&mut self, input: &str) -> bool {
        let Some(question) = self.live_question() else {
            return false;
        };
        if !question.is_answered_by(input) {
            return false;
        }

        let elapsed = question.elapsed_secs();
        self.record_solved(elapsed);
        true
    }

    /// Credit the live question as solved after `elapsed_secs`.
    pub fn record_solved(&mut self, elapsed_secs: f64) {
        if self.phase != Phase::InSession {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(question) = session.state.current_question.as_ref() else {
            return;
        };

        tracing::debug!(
            question = %question.text(),
            elapsed_secs,
            "answered correctly"
        );
        session.state.history.push(HistoryEntry {
            question_text: question.text(),
            answer: question.answer,
            elapsed_seconds: elapsed_secs,
        });
        session.state.score += 1;

        let target = session.config.target_score;
        if target > 0 && session.state.score >= target {
            self.end("target reached");
        } else {
            self.next();
        }
    }

    /// End the session at the player's request. No-op outside a session.
    pub fn stop(&mut self) {
        if self.phase == Phase::InSession {
            self.end("stopped");
        }
    }

    pub fn time_expired(&mut self) {
        if self.phase == Phase::InSession {
            self.end("time expired");
        }
    }

    /// Advance the countdown by one second. Ticks outside a timed session are ignored.
    pub fn on_tick(&mut self) {
        if self.phase != Phase::InSession {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };

        if let TimeLeft::Seconds(secs) = session.time_left {
            let remaining = secs.saturating_sub(1);
            session.time_left = TimeLeft::Seconds(remaining);
            if remaining == 0 {
                self.time_expired();
            }
        }
    }

    fn end(&mut self, reason: &str) {
        self.phase = Phase::Ended;
        let score = self.current_score();
        tracing::info!(score, reason, "session ended");
    }

    pub fn summarize(&self) -> SessionSummary {
        match &self.session {
            Some(session) => {
                SessionSummary::from_history(session.state.score, &session.state.history)
            }
            None => SessionSummary::from_history(0, &[]),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> Option<&SessionConfig> {
        self.session.as_ref().map(|s| &s.config)
    }

    pub fn history(&self) -> &[HistoryEntry] {
        self.session
            .as_ref()
            .map(|s| s.state.history.as_slice())
            .unwrap_or_default()
    }

    pub fn current_score(&self) -> u32 {
        self.session.as_ref().map_or(0, |s| s.state.score)
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.session
            .as_ref()
            .and_then(|s| s.state.current_question.as_ref())
    }

    pub fn current_question_display(&self) -> Option<&DisplayForm> {
        self.current_question().map(|q| &q.display)
    }

    pub fn remaining_time(&self) -> Option<TimeLeft> {
        self.session.as_ref().map(|s| s.time_left)
    }

    /// Share of the target score reached so far; 0 when there is no target.
    pub fn progress_fraction(&self) -> f64 {
        match &self.session {
            Some(session) if session.config.target_score > 0 => {
                (session.state.score as f64 / session.config.target_score as f64).min(1.0)
            }
            _ => 0.0,
        }
    }

    fn live_question(&self) -> Option<&Question> {
        match self.phase {
            Phase::InSession => self.current_question(),
            Phase::Idle | Phase::Ended => None,
        }
    }
}
