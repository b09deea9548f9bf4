use std::sync::mpsc::{self, Sender};
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use mathdash::engine::{Phase, QuestionEngine, TimeLeft};
use mathdash::resolver::{resolve, ConfigError, RawInputs};
use mathdash::runtime::{FixedTicker, QuizEvent, Runner, TestEventSource};
use mathdash::summary::Verdict;

fn send_answer(tx: &Sender<QuizEvent>, engine: &QuestionEngine) {
    let answer = engine.current_question().unwrap().answer_text();
    for c in answer.chars() {
        tx.send(QuizEvent::Key(KeyEvent::new(
            KeyCode::Char(c),
            KeyModifiers::NONE,
        )))
        .unwrap();
    }
}

fn addition_inputs(target: &str, duration: &str) -> RawInputs {
    RawInputs {
        x_min: "1".into(),
        x_max: "5".into(),
        y_min: "1".into(),
        y_max: "5".into(),
        target_score: Some(target.into()),
        duration: duration.into(),
        ..RawInputs::default()
    }
}

// Headless integration using the internal runtime + engine without a TTY
// Verifies that typed answers drive a session to its target via Runner/TestEventSource.
#[test]
fn headless_session_reaches_target() {
    let config = resolve(&addition_inputs("3", "inf")).unwrap();
    let mut engine = QuestionEngine::with_seed(1);
    engine.start(config);

    let (tx, rx) = mpsc::channel();
    let es = TestEventSource::new(rx);
    let ticker = FixedTicker::new(Duration::from_millis(5));
    let mut runner = Runner::new(es, ticker);

    send_answer(&tx, &engine);
    let mut typed = String::new();

    for _ in 0..200u32 {
        match runner.step() {
            QuizEvent::Tick => engine.on_tick(),
            QuizEvent::Resize => {}
            QuizEvent::Key(key) => {
                if let KeyCode::Char(c) = key.code {
                    typed.push(c);
                    if engine.evaluate(&typed) {
                        typed.clear();
                        if engine.phase() != Phase::InSession {
                            break;
                        }
                        send_answer(&tx, &engine);
                    }
                }
            }
        }
    }

    assert_eq!(engine.phase(), Phase::Ended);
    let summary = engine.summarize();
    assert_eq!(summary.final_score, 3);
    assert_eq!(engine.history().len(), 3);
    assert_eq!(summary.verdict, Verdict::AllQuick);
    for entry in engine.history() {
        let parts: Vec<f64> = entry
            .question_text
            .split(" + ")
            .map(|n| n.parse().unwrap())
            .collect();
        assert_eq!(parts[0] + parts[1], entry.answer);
    }
}

#[test]
fn headless_timed_session_finishes_by_time() {
    let config = resolve(&addition_inputs("", "2")).unwrap();
    let mut engine = QuestionEngine::with_seed(2);
    engine.start(config);
    assert_eq!(engine.remaining_time(), Some(TimeLeft::Seconds(2)));

    let (_tx, rx) = mpsc::channel();
    let es = TestEventSource::new(rx);
    let ticker = FixedTicker::new(Duration::from_millis(5));
    let mut runner = Runner::new(es, ticker);

    let mut ticks = 0;
    for _ in 0..50u32 {
        if let QuizEvent::Tick = runner.step() {
            ticks += 1;
            engine.on_tick();
        }
        if engine.phase() == Phase::Ended {
            break;
        }
    }

    assert_eq!(ticks, 2);
    assert_eq!(engine.phase(), Phase::Ended);
    assert_eq!(engine.summarize().verdict, Verdict::NothingAnswered);
}

#[test]
fn wrong_answers_leave_the_question_in_place() {
    let config = resolve(&addition_inputs("1", "60")).unwrap();
    let mut engine = QuestionEngine::with_seed(3);
    engine.start(config);
    let before = engine.current_question().unwrap().text();

    assert!(!engine.evaluate("99"));
    assert!(!engine.evaluate("abc"));
    assert!(!engine.evaluate(""));
    assert_eq!(engine.current_question().unwrap().text(), before);
    assert_eq!(engine.current_score(), 0);
}

#[test]
fn slow_answers_are_reported() {
    let config = resolve(&addition_inputs("2", "inf")).unwrap();
    let mut engine = QuestionEngine::with_seed(4);
    engine.start(config);

    let slow = engine.current_question().unwrap().text();
    engine.record_solved(6.2);
    engine.record_solved(4.9);

    let summary = engine.summarize();
    assert_eq!(summary.final_score, 2);
    assert_eq!(summary.average_label(), "5.55s");
    assert_eq!(summary.verdict, Verdict::SlowItems);
    assert_eq!(summary.slow_items.len(), 1);
    assert_eq!(summary.slow_items[0].question_text, slow);
}

#[test]
fn invalid_settings_never_start_a_session() {
    let inputs = RawInputs {
        operations: vec![],
        ..RawInputs::default()
    };
    assert_eq!(resolve(&inputs), Err(ConfigError::NoOperationSelected));

    let inputs = RawInputs {
        x_min: "ten".into(),
        ..RawInputs::default()
    };
    assert_eq!(resolve(&inputs), Err(ConfigError::InvalidRange { axis: 'x' }));

    let engine = QuestionEngine::with_seed(5);
    assert_eq!(engine.phase(), Phase::Idle);
    assert!(engine.current_question().is_none());
}
