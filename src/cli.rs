//! Terminal front-end: renders the current step and turns typed lines into
//! intake actions.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::error::{IntakeError, Result};
use crate::intake::{
    ActionOutcome, DialogState, HoursChoice, IntakeAction, IntakeSession, LearningProfile,
    Modality, Provider, Role, SkillLevel, StepId, TimeframeChoice,
};

/// Parses a typed line into the action the current step offers.
pub struct InputParser;

impl InputParser {
    pub fn parse(step: StepId, line: &str) -> std::result::Result<IntakeAction, IntakeError> {
        let trimmed = line.trim();
        let lower = trimmed.to_lowercase();

        match step.descriptor().modality {
            Modality::FreeText { .. } => Ok(IntakeAction::SubmitText(line.to_string())),
            Modality::LevelChoice => match pick(&SkillLevel::ALL, trimmed) {
                Some(level) => Ok(IntakeAction::ChooseLevel(level)),
                None => trimmed.parse().map(IntakeAction::ChooseLevel),
            },
            Modality::ProviderSelect => match lower.as_str() {
                "" | "done" | "continue" => Ok(IntakeAction::ConfirmProviders),
                _ => match pick(&Provider::ALL, trimmed) {
                    Some(provider) => Ok(IntakeAction::ToggleProvider(provider)),
                    None => trimmed.parse().map(IntakeAction::ToggleProvider),
                },
            },
            Modality::HoursChoice => parse_number(trimmed, "hours_per_week")
                .and_then(HoursChoice::try_from)
                .map(IntakeAction::ChooseHours),
            Modality::TimeframeChoice => match lower.as_str() {
                "none" | "no" | "no deadline" => Ok(IntakeAction::ChooseTimeframe(None)),
                _ => parse_number(trimmed, "timeframe_weeks")
                    .and_then(TimeframeChoice::try_from)
                    .map(|t| IntakeAction::ChooseTimeframe(Some(t))),
            },
            Modality::Terminal => Ok(IntakeAction::Complete),
        }
    }
}

/// 1-based menu pick.
fn pick<T: Copy>(options: &[T], input: &str) -> Option<T> {
    let n: usize = input.parse().ok()?;
    options.get(n.checked_sub(1)?).copied()
}

/// Accepts "6", "6 hours", "8 weeks".
fn parse_number(input: &str, field: &'static str) -> std::result::Result<u32, IntakeError> {
    input
        .split_whitespace()
        .next()
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| IntakeError::UnknownOption {
            field,
            value: input.to_string(),
        })
}

/// Hint line listing what the current step accepts.
pub fn render_options(state: &DialogState) -> String {
    match state.step.descriptor().modality {
        Modality::FreeText { allow_empty, .. } => {
            if allow_empty {
                "(type your answer, or press Enter to skip)".to_string()
            } else {
                "(type your answer)".to_string()
            }
        }
        Modality::LevelChoice => numbered(SkillLevel::ALL.iter().map(|l| l.label().to_string())),
        Modality::ProviderSelect => {
            let items = Provider::ALL.iter().map(|p| {
                let mark = if state.profile.preferred_providers.iter().any(|s| s == p.label()) {
                    "x"
                } else {
                    " "
                };
                format!("[{mark}] {}", p.label())
            });
            format!("{} (Enter to continue)", numbered(items))
        }
        Modality::HoursChoice => {
            let hours: Vec<String> = HoursChoice::ALL
                .iter()
                .map(|h| format!("{} hrs/week", h.hours()))
                .collect();
            hours.join(" | ")
        }
        Modality::TimeframeChoice => {
            let mut weeks: Vec<String> = TimeframeChoice::ALL
                .iter()
                .map(|t| format!("{} weeks", t.weeks()))
                .collect();
            weeks.push("No deadline".to_string());
            weeks.join(" | ")
        }
        Modality::Terminal => format!(
            "{}\n(press Enter to generate my plan)",
            state.profile.summary()
        ),
    }
}

fn numbered(items: impl Iterator<Item = String>) -> String {
    items
        .enumerate()
        .map(|(i, item)| format!("{}) {}", i + 1, item))
        .collect::<Vec<_>>()
        .join("  ")
}

/// Drive a session from line input until handoff or end of input.
///
/// The conversation and hints go to `out`. Returns the handed-off profile,
/// or `None` if input ended first.
pub async fn run<R, W>(
    session: &IntakeSession,
    input: R,
    out: &mut W,
) -> Result<Option<LearningProfile>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    session.start().await;
    let mut shown = print_new(&session.state().await, 0, out);

    let mut lines = input.lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break, // EOF
            Err(e) => {
                tracing::error!("Error reading input: {}", e);
                break;
            }
        };
        let step = session.state().await.step;
        let action = match InputParser::parse(step, &line) {
            Ok(action) => action,
            Err(e) => {
                let _ = writeln!(out, "  {e}");
                continue;
            }
        };

        match session.apply(action).await {
            Ok(ActionOutcome::Completed(profile)) => return Ok(Some(profile)),
            Ok(_) => {}
            Err(crate::error::Error::Intake(e)) => {
                tracing::debug!("Intake action rejected: {}", e);
                if matches!(e, IntakeError::EmptyAnswerRejected { .. }) {
                    let _ = writeln!(out, "  Please type an answer.");
                } else {
                    let _ = writeln!(out, "  {e}");
                }
            }
            Err(e) => return Err(e),
        }
        shown = print_new(&session.state().await, shown, out);
    }

    Ok(None)
}

/// Print transcript entries past `shown` plus the option hint; returns the
/// new count.
fn print_new<W: Write>(state: &DialogState, shown: usize, out: &mut W) -> usize {
    let fresh = state.transcript.since(shown);
    let asked = fresh.iter().any(|m| m.role == Role::Assistant);
    for message in fresh.iter().filter(|m| m.role == Role::Assistant) {
        let _ = writeln!(out, "\n{}", message.content);
    }
    // Toggles append nothing but change the selection marks.
    if asked || state.step == StepId::Providers {
        let _ = writeln!(out, "{}", render_options(state));
    }
    let _ = out.flush();
    state.transcript.len()
}
