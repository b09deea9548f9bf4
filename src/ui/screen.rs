use ratatui::{buffer::Buffer, layout::Rect};

use crate::{
    ui::{render_play, render_results, render_setup},
    App,
};

/// Which screen is showing. Derived from app and engine state, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Setup,
    Play,
    Results,
}

/// A UI Screen boundary: responsible for rendering one view of the app
pub trait Screen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

/// Setup screen - the settings form
pub struct SetupScreen;

impl Screen for SetupScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        render_setup(app, area, buf);
    }
}

/// Play screen - question, answer line, clock and score
pub struct PlayScreen;

impl Screen for PlayScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        render_play(app, area, buf);
    }
}

/// Results screen - the end of session summary
pub struct ResultsScreen;

impl Screen for ResultsScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        render_results(app, area, buf);
    }
}

/// Helper to construct the appropriate screen for the current view
pub fn current_screen(view: View) -> Box<dyn Screen> {
    match view {
        View::Setup => Box::new(SetupScreen),
        View::Play => Box::new(PlayScreen),
        View::Results => Box::new(ResultsScreen),
    }
}
