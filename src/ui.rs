pub mod screen;

use mathdash::{
    config::Theme,
    engine::TimeLeft,
    question::DisplayForm,
    setup::SetupField,
    summary::Verdict,
    util::format_number,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Gauge, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    ui::screen::{current_screen, Screen},
    App,
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

/// Colours for one theme.
#[derive(Debug, Clone, Copy)]
struct Palette {
    background: Color,
    text: Color,
    accent: Color,
    good: Color,
    bad: Color,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Palette {
                background: Color::White,
                text: Color::Black,
                accent: Color::Blue,
                good: Color::Green,
                bad: Color::Red,
            },
            Theme::Dark => Palette {
                background: Color::Black,
                text: Color::White,
                accent: Color::Cyan,
                good: Color::LightGreen,
                bad: Color::LightRed,
            },
        }
    }

    fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    fn bold(&self) -> Style {
        self.base().add_modifier(Modifier::BOLD)
    }

    fn dim(&self) -> Style {
        self.base().add_modifier(Modifier::DIM)
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let palette = Palette::for_theme(self.theme);
        Block::default().style(palette.base()).render(area, buf);
        current_screen(self.view()).render(self, area, buf);
    }
}

fn legend(text: &str, palette: Palette) -> Paragraph<'_> {
    Paragraph::new(Span::styled(text, palette.dim().add_modifier(Modifier::ITALIC)))
        .alignment(Alignment::Center)
}

pub(crate) fn render_setup(app: &App, area: Rect, buf: &mut Buffer) {
    let palette = Palette::for_theme(app.theme);
    let form = &app.setup;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(SetupField::ORDER.len() as u16),
            Constraint::Length(2),
            Constraint::Length(1),
        ])
        .split(area);

    Paragraph::new(Span::styled(
        "mathdash",
        palette.bold().fg(palette.accent),
    ))
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    let label_width = SetupField::ORDER
        .iter()
        .map(|f| f.label().width())
        .max()
        .unwrap_or(0);

    let lines = SetupField::ORDER
        .iter()
        .map(|field| {
            let focused = *field == form.focused();
            let marker = if focused { "> " } else { "  " };
            let label_style = if focused {
                palette.bold().fg(palette.accent)
            } else {
                palette.base()
            };
            let mut value_style = palette.bold();
            if focused && field.is_text() {
                value_style = value_style.add_modifier(Modifier::UNDERLINED);
            }
            Line::from(vec![
                Span::styled(marker, label_style),
                Span::styled(
                    format!("{:<width$}  ", field.label(), width = label_width),
                    label_style,
                ),
                Span::styled(form.value_label(*field), value_style),
            ])
        })
        .collect::<Vec<Line>>();

    Paragraph::new(lines).render(chunks[1], buf);

    if let Some(error) = form.error() {
        Paragraph::new(Span::styled(error, palette.bold().fg(palette.bad)))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(chunks[2], buf);
    }

    legend(
        "(↑/↓) move / (space) toggle / (enter) start / (ctrl+t) theme / (esc)ape",
        palette,
    )
    .render(chunks[3], buf);
}

/// The question lines, with fractions stacked over a rule.
fn question_lines(display: &DisplayForm, style: Style) -> Vec<Line<'static>> {
    match display {
        DisplayForm::Expression(text) => vec![Line::styled(text.clone(), style)],
        DisplayForm::Fraction {
            numerator,
            denominator,
        } => {
            let top = format_number(*numerator);
            let bottom = format_number(*denominator);
            let width = top.width().max(bottom.width());
            vec![
                Line::styled(top, style),
                Line::styled("─".repeat(width), style),
                Line::styled(bottom, style),
            ]
        }
    }
}

pub(crate) fn render_play(app: &App, area: Rect, buf: &mut Buffer) {
    let palette = Palette::for_theme(app.theme);
    let engine = &app.engine;

    let question = engine
        .current_question_display()
        .map(|d| question_lines(d, palette.bold()))
        .unwrap_or_default();
    let question_height = question.len() as u16;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(question_height),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let time = match engine.remaining_time() {
        Some(TimeLeft::Seconds(secs)) => format!("{secs}s"),
        Some(TimeLeft::Unlimited) | None => TimeLeft::Unlimited.to_string(),
    };
    let score = match engine.config() {
        Some(cfg) if cfg.has_target() => {
            format!("{} / {}", engine.current_score(), cfg.target_score)
        }
        _ => engine.current_score().to_string(),
    };

    Paragraph::new(Line::from(vec![
        Span::styled("time ", palette.dim()),
        Span::styled(time, palette.bold().fg(palette.accent)),
        Span::styled("   score ", palette.dim()),
        Span::styled(score, palette.bold().fg(palette.good)),
    ]))
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    if engine.config().is_some_and(|cfg| cfg.has_target()) {
        Gauge::default()
            .gauge_style(Style::default().fg(palette.good).bg(palette.background))
            .ratio(engine.progress_fraction().clamp(0.0, 1.0))
            .label("")
            .render(chunks[1], buf);
    }

    Paragraph::new(question)
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

    Paragraph::new(Line::from(vec![
        Span::styled("= ", palette.dim()),
        Span::styled(app.answer.clone(), palette.bold().fg(palette.accent)),
        Span::styled("_", palette.dim().add_modifier(Modifier::SLOW_BLINK)),
    ]))
    .alignment(Alignment::Center)
    .render(chunks[5], buf);

    legend("(esc) stop", palette).render(chunks[7], buf);
}

pub(crate) fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let palette = Palette::for_theme(app.theme);
    let summary = app.engine.summarize();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    let headline = vec![
        Line::from(vec![
            Span::styled("final score ", palette.dim()),
            Span::styled(
                summary.final_score.to_string(),
                palette.bold().fg(palette.good),
            ),
        ]),
        Line::from(vec![
            Span::styled("average ", palette.dim()),
            Span::styled(summary.average_label(), palette.bold().fg(palette.accent)),
            Span::styled(" per question", palette.dim()),
        ]),
    ];
    Paragraph::new(headline)
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    let report = match summary.verdict {
        Verdict::NothingAnswered => vec![Line::styled(
            "no problems solved",
            palette.bold().fg(palette.bad),
        )],
        Verdict::AllQuick => vec![Line::styled(
            "lightning fast, no slow answers",
            palette.bold().fg(palette.good),
        )],
        Verdict::SlowItems => {
            let mut lines = vec![Line::styled("slow answers", palette.bold())];
            lines.extend(summary.slow_items.iter().map(|item| {
                Line::from(vec![
                    Span::styled(
                        format!("{} = {}", item.question_text, format_number(item.answer)),
                        palette.base(),
                    ),
                    Span::styled(
                        format!("  ({:.2}s)", item.elapsed_seconds),
                        palette.base().fg(palette.bad),
                    ),
                ])
            }));
            lines
        }
    };
    Paragraph::new(report)
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    legend("(r) setup / (n)ew round / (esc)ape", palette).render(chunks[2], buf);
}
