pub mod ui;

use mathdash::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore, Theme},
    division::DivisionMode,
    engine::{Phase, QuestionEngine},
    logging,
    question::Operation,
    resolver::RawInputs,
    runtime::{CrosstermEventSource, FixedTicker, QuizEvent, Runner},
    session::SessionConfig,
    setup::SetupForm,
};

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
};

use crate::ui::screen::View;

/// timed arithmetic drills in the terminal
#[derive(Parser, Debug, Clone, Default)]
#[clap(
    version,
    about,
    long_about = "Timed arithmetic drills in the terminal. Pick operations and operand ranges, answer as fast as you can, and see which problems slowed you down."
)]
pub struct Cli {
    /// operations to practice, comma separated (add, sub, mul, div)
    #[clap(short = 'o', long, value_enum, value_delimiter = ',')]
    ops: Vec<Operation>,

    /// lower bound of the first operand
    #[clap(long, allow_hyphen_values = true)]
    x_min: Option<String>,

    /// upper bound of the first operand
    #[clap(long, allow_hyphen_values = true)]
    x_max: Option<String>,

    /// lower bound of the second operand
    #[clap(long, allow_hyphen_values = true)]
    y_min: Option<String>,

    /// upper bound of the second operand
    #[clap(long, allow_hyphen_values = true)]
    y_max: Option<String>,

    /// draw operands with one decimal place
    #[clap(short = 'd', long)]
    decimals: bool,

    /// end the session after this many correct answers
    #[clap(short = 't', long)]
    target: Option<String>,

    /// session length in seconds, or "inf" for no time limit
    #[clap(short = 's', long)]
    time: Option<String>,

    /// how integer division problems are built
    #[clap(short = 'm', long, value_enum)]
    division_mode: Option<DivisionMode>,

    /// seed the question generator for repeatable sessions
    #[clap(long)]
    seed: Option<u64>,

    /// skip the setup screen and start straight away
    #[clap(long)]
    start: bool,

    /// write debug-level logs
    #[clap(long)]
    debug: bool,
}

impl Cli {
    /// Overlay the flags that were given on top of remembered setup values.
    fn apply_to(&self, mut raw: RawInputs) -> RawInputs {
        if !self.ops.is_empty() {
            raw.operations = self.ops.clone();
        }
        let overrides = [
            (&self.x_min, &mut raw.x_min),
            (&self.x_max, &mut raw.x_max),
            (&self.y_min, &mut raw.y_min),
            (&self.y_max, &mut raw.y_max),
        ];
        for (flag, field) in overrides {
            if let Some(value) = flag {
                *field = value.clone();
            }
        }
        if self.decimals {
            raw.allow_decimals = true;
        }
        if let Some(target) = &self.target {
            raw.target_score = Some(target.clone());
        }
        if let Some(time) = &self.time {
            raw.duration = time.clone();
        }
        if let Some(mode) = self.division_mode {
            raw.division_mode = mode;
        }
        raw
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Setup,
    Quiz,
}

#[derive(Debug)]
pub struct App {
    pub engine: QuestionEngine,
    pub setup: SetupForm,
    pub state: AppState,
    pub theme: Theme,
    pub answer: String,
    last_config: Option<SessionConfig>,
    store: FileConfigStore,
}

impl App {
    pub fn new(cli: &Cli, store: FileConfigStore) -> Self {
        let saved = store.load();
        let engine = match cli.seed {
            Some(seed) => QuestionEngine::with_seed(seed),
            None => QuestionEngine::new(),
        };

        Self {
            engine,
            setup: SetupForm::new(cli.apply_to(saved.raw_inputs())),
            state: AppState::Setup,
            theme: saved.theme,
            answer: String::new(),
            last_config: None,
            store,
        }
    }

    /// Which screen is showing, derived from where the app and engine are.
    pub fn view(&self) -> View {
        match (self.state, self.engine.phase()) {
            (AppState::Setup, _) => View::Setup,
            (AppState::Quiz, Phase::InSession) => View::Play,
            (AppState::Quiz, Phase::Idle | Phase::Ended) => View::Results,
        }
    }

    /// Validate the setup form and begin a session. Returns false, leaving the
    /// error on the form, when the settings are rejected.
    pub fn start_session(&mut self) -> bool {
        let Ok(config) = self.setup.submit() else {
            return false;
        };
        self.save_config();
        self.begin(config);
        true
    }

    /// Play again with the settings of the last session.
    pub fn replay(&mut self) -> bool {
        match self.last_config.clone() {
            Some(config) => {
                self.begin(config);
                true
            }
            None => false,
        }
    }

    fn begin(&mut self, config: SessionConfig) {
        self.engine.start(config.clone());
        self.last_config = Some(config);
        self.answer.clear();
        self.state = AppState::Quiz;
    }

    pub fn type_answer(&mut self, c: char) {
        self.answer.push(c);
        if self.engine.evaluate(&self.answer) {
            self.answer.clear();
        }
    }

    pub fn erase_answer(&mut self) {
        self.answer.pop();
        if self.engine.evaluate(&self.answer) {
            self.answer.clear();
        }
    }

    pub fn back_to_setup(&mut self) {
        self.answer.clear();
        self.state = AppState::Setup;
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        self.save_config();
    }

    fn save_config(&self) {
        let cfg = Config::from_inputs(self.theme, &self.setup.raw_inputs());
        if let Err(err) = self.store.save(&cfg) {
            tracing::warn!(path = %self.store.path().display(), %err, "could not save config");
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let _log_guard = match AppDirs::log_dir() {
        Some(dir) => logging::setup_logging(&dir, cli.debug).ok(),
        None => None,
    };

    let mut app = App::new(&cli, FileConfigStore::new());
    if cli.start && !app.start_session() {
        let mut cmd = Cli::command();
        let message = app.setup.error().unwrap_or("invalid settings").to_string();
        cmd.error(ErrorKind::ValueValidation, message).exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

#[derive(Debug, PartialEq, Eq)]
enum KeyOutcome {
    Continue,
    SessionStarted,
    Quit,
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        match runner.step() {
            QuizEvent::Tick => app.engine.on_tick(),
            QuizEvent::Resize => {}
            QuizEvent::Key(key) => match handle_key(app, key) {
                KeyOutcome::Continue => {}
                KeyOutcome::SessionStarted => runner.reset_clock(),
                KeyOutcome::Quit => break,
            },
        }
    }

    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) -> KeyOutcome {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => return KeyOutcome::Quit,
            KeyCode::Char('t') => {
                app.toggle_theme();
                return KeyOutcome::Continue;
            }
            _ => return KeyOutcome::Continue,
        }
    }

    match app.view() {
        View::Setup => match key.code {
            KeyCode::Esc => return KeyOutcome::Quit,
            KeyCode::Up | KeyCode::BackTab => app.setup.focus_prev(),
            KeyCode::Down | KeyCode::Tab => app.setup.focus_next(),
            KeyCode::Left => app.setup.toggle_back(),
            KeyCode::Right | KeyCode::Char(' ') => app.setup.toggle(),
            KeyCode::Backspace => app.setup.backspace(),
            KeyCode::Enter => {
                if app.start_session() {
                    return KeyOutcome::SessionStarted;
                }
            }
            KeyCode::Char(c) => app.setup.type_char(c),
            _ => {}
        },
        View::Play => match key.code {
            KeyCode::Esc => app.engine.stop(),
            KeyCode::Backspace => app.erase_answer(),
            KeyCode::Char(c) => app.type_answer(c),
            _ => {}
        },
        View::Results => match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return KeyOutcome::Quit,
            KeyCode::Char('r') => app.back_to_setup(),
            KeyCode::Char('n') => {
                if app.replay() {
                    return KeyOutcome::SessionStarted;
                }
            }
            _ => {}
        },
    }

    KeyOutcome::Continue
}
