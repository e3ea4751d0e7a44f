use chrono::NaiveDateTime;
use rain_core::{Verdict, ViewRenderer, ViewState};

/// Prints each view state to the terminal.
#[derive(Debug, Default)]
pub struct TerminalRenderer;

impl ViewRenderer for TerminalRenderer {
    fn render(&self, state: &ViewState) {
        match state {
            ViewState::Input => {}
            ViewState::Loading => eprintln!("Checking the sky..."),
            ViewState::Answer(verdict) => println!("{}", format_answer(verdict)),
            ViewState::Error(err) => eprintln!("{err}\n{}", err.hint()),
        }
    }
}

pub fn format_answer(verdict: &Verdict) -> String {
    let mut out = format!("{}\n{}", verdict.answer(), verdict.label);

    if let Some(kind) = verdict.precipitation {
        out.push_str(&format!(" ({})", kind.description().to_lowercase()));
    }
    if let Some(at) = verdict.observed_at {
        out.push_str(&format!("\nas of {}", format_time(at)));
    }

    out
}

fn format_time(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}
