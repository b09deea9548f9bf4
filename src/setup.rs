//! The setup screen's form: which field has focus, what the player typed,
//! and the last validation error.

use crate::question::Operation;
use crate::resolver::{self, ConfigError, RawInputs};
use crate::session::{SessionConfig, SessionLength};

/// Timer choices offered on the setup screen, shortest first.
pub const DURATION_PRESETS: [&str; 5] = ["30", "60", "120", "300", "inf"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupField {
    Op(Operation),
    XMin,
    XMax,
    YMin,
    YMax,
    Decimals,
    DivisionMode,
    Target,
    Duration,
}

impl SetupField {
    pub const ORDER: [SetupField; 12] = [
        SetupField::Op(Operation::Add),
        SetupField::Op(Operation::Subtract),
        SetupField::Op(Operation::Multiply),
        SetupField::Op(Operation::Divide),
        SetupField::XMin,
        SetupField::XMax,
        SetupField::YMin,
        SetupField::YMax,
        SetupField::Decimals,
        SetupField::DivisionMode,
        SetupField::Target,
        SetupField::Duration,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SetupField::Op(Operation::Add) => "Addition",
            SetupField::Op(Operation::Subtract) => "Subtraction",
            SetupField::Op(Operation::Multiply) => "Multiplication",
            SetupField::Op(Operation::Divide) => "Division",
            SetupField::XMin => "X min",
            SetupField::XMax => "X max",
            SetupField::YMin => "Y min",
            SetupField::YMax => "Y max",
            SetupField::Decimals => "Decimals",
            SetupField::DivisionMode => "Division mode",
            SetupField::Target => "Target score",
            SetupField::Duration => "Timer (s)",
        }
    }

    /// Fields edited by typing rather than toggling.
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            SetupField::XMin
                | SetupField::XMax
                | SetupField::YMin
                | SetupField::YMax
                | SetupField::Target
        )
    }
}

#[derive(Debug, Clone)]
pub struct SetupForm {
    inputs: RawInputs,
    target: String,
    focus: usize,
    error: Option<String>,
}

impl SetupForm {
    pub fn new(inputs: RawInputs) -> Self {
        let target = inputs.target_score.clone().unwrap_or_default();
        Self {
            inputs,
            target,
            focus: 0,
            error: None,
        }
    }

    pub fn focused(&self) -> SetupField {
        SetupField::ORDER[self.focus]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % SetupField::ORDER.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + SetupField::ORDER.len() - 1) % SetupField::ORDER.len();
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Flip a checkbox or advance a choice on the focused field.
    pub fn toggle(&mut self) {
        self.step_choice(true);
    }

    /// Move a choice field backwards; checkboxes just flip.
    pub fn toggle_back(&mut self) {
        self.step_choice(false);
    }

    fn step_choice(&mut self, forward: bool) {
        match self.focused() {
            SetupField::Op(op) => {
                if let Some(pos) = self.inputs.operations.iter().position(|o| *o == op) {
                    self.inputs.operations.remove(pos);
                } else {
                    self.inputs.operations.push(op);
                    self.inputs.operations.sort();
                }
            }
            SetupField::Decimals => self.inputs.allow_decimals = !self.inputs.allow_decimals,
            SetupField::DivisionMode => {
                self.inputs.division_mode = if forward {
                    self.inputs.division_mode.next()
                } else {
                    self.inputs.division_mode.prev()
                };
            }
            SetupField::Duration => {
                self.inputs.duration = cycle_preset(&self.inputs.duration, forward).to_string();
            }
            SetupField::XMin
            | SetupField::XMax
            | SetupField::YMin
            | SetupField::YMax
            | SetupField::Target => {}
        }
        self.error = None;
    }

    /// Append a character to the focused text field. Only characters that can
    /// appear in a number are taken.
    pub fn type_char(&mut self, c: char) {
        if !(c.is_ascii_digit() || matches!(c, '.' | ',' | '-')) {
            return;
        }
        if let Some(text) = self.text_mut() {
            text.push(c);
            self.error = None;
        }
    }

    pub fn backspace(&mut self) {
        if let Some(text) = self.text_mut() {
            text.pop();
            self.error = None;
        }
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.focused() {
            SetupField::XMin => Some(&mut self.inputs.x_min),
            SetupField::XMax => Some(&mut self.inputs.x_max),
            SetupField::YMin => Some(&mut self.inputs.y_min),
            SetupField::YMax => Some(&mut self.inputs.y_max),
            SetupField::Target => Some(&mut self.target),
            _ => None,
        }
    }

    pub fn is_checked(&self, field: SetupField) -> Option<bool> {
        match field {
            SetupField::Op(op) => Some(self.inputs.operations.contains(&op)),
            SetupField::Decimals => Some(self.inputs.allow_decimals),
            _ => None,
        }
    }

    /// Text shown next to a field's label.
    pub fn value_label(&self, field: SetupField) -> String {
        match field {
            SetupField::Op(_) | SetupField::Decimals => {
                let checked = self.is_checked(field).unwrap_or(false);
                let mark = if checked { "[x]" } else { "[ ]" };
                mark.to_string()
            }
            SetupField::XMin => self.inputs.x_min.clone(),
            SetupField::XMax => self.inputs.x_max.clone(),
            SetupField::YMin => self.inputs.y_min.clone(),
            SetupField::YMax => self.inputs.y_max.clone(),
            SetupField::DivisionMode => format!("< {} >", self.inputs.division_mode),
            SetupField::Target => {
                if self.target.is_empty() {
                    "none".to_string()
                } else {
                    self.target.clone()
                }
            }
            SetupField::Duration => match resolver::parse_duration(&self.inputs.duration) {
                Ok(SessionLength::Untimed) => "< ∞ >".to_string(),
                _ => format!("< {} >", self.inputs.duration),
            },
        }
    }

    pub fn raw_inputs(&self) -> RawInputs {
        RawInputs {
            target_score: Some(self.target.clone()).filter(|t| !t.trim().is_empty()),
            ..self.inputs.clone()
        }
    }

    /// Validate the form. On failure the error is kept for display and no
    /// session should be started.
    pub fn submit(&mut self) -> Result<SessionConfig, ConfigError> {
        let result = resolver::resolve(&self.raw_inputs());
        self.error = result.as_ref().err().map(|e| e.to_string());
        result
    }
}

fn cycle_preset(current: &str, forward: bool) -> &'static str {
    let len = DURATION_PRESETS.len();
    match DURATION_PRESETS.iter().position(|p| *p == current) {
        Some(i) if forward => DURATION_PRESETS[(i + 1) % len],
        Some(i) => DURATION_PRESETS[(i + len - 1) % len],
        // custom value from the command line: jump back onto the presets
        None => DURATION_PRESETS[1],
    }
}
