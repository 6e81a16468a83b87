//! Replay service — drive a session from a JSON-lines event script.
//!
//! Each non-blank line is one [`SessionEvent`]; lines starting with `#` are
//! comments. A rejected command (for example an out-of-range resize) is
//! reported and skipped, the way the UI would show a message and carry on.
//! A line that is not a valid event aborts the replay.

use std::fs::File;
use std::io::{self, BufRead, BufReader};

use canvas::engine::{Action, Session};
use canvas::input::SessionEvent;
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("failed to open event script {path}: {source}")]
    Open { path: String, source: io::Error },
    #[error("failed to read event script: {0}")]
    Read(#[from] io::Error),
    #[error("line {line}: invalid event: {source}")]
    Parse { line: usize, source: serde_json::Error },
}

/// Outcome of a replay run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplaySummary {
    /// Events applied successfully.
    pub applied: usize,
    /// Events the session refused, with their line numbers and reasons.
    pub rejected: Vec<(usize, String)>,
    /// Last ruler label reported by the session.
    pub ruler_label: Option<String>,
}

/// Open `input` as a line reader; `-` means stdin.
pub fn open_input(input: &str) -> Result<Box<dyn BufRead>, ReplayError> {
    if input == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(input).map_err(|source| ReplayError::Open { path: input.to_string(), source })?;
    Ok(Box::new(BufReader::new(file)))
}

/// Apply every event in `reader` to `session`.
pub fn replay<R: BufRead>(session: &mut Session, reader: R) -> Result<ReplaySummary, ReplayError> {
    let mut summary = ReplaySummary::default();

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line?;
        let Some(event) = parse_event_line(line_no, &line)? else {
            continue;
        };

        match session.apply(&event) {
            Ok(actions) => {
                summary.applied += 1;
                record_actions(&mut summary, &actions);
            }
            Err(error) => {
                warn!(line = line_no, error = %error, "event rejected");
                summary.rejected.push((line_no, error.to_string()));
            }
        }
    }

    Ok(summary)
}

fn parse_event_line(line_no: usize, line: &str) -> Result<Option<SessionEvent>, ReplayError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|source| ReplayError::Parse { line: line_no, source })
}

fn record_actions(summary: &mut ReplaySummary, actions: &[Action]) {
    for action in actions {
        debug!(?action, "session action");
        if let Action::RulerDistance(label) = action {
            summary.ruler_label = Some(label.clone());
        }
    }
}

#[cfg(test)]
#[path = "replay_test.rs"]
mod tests;
