//! Camera practice screen
//!
//! Features:
//! - Live preview with landmark overlay
//! - Train and recognize keys against the letter targets
//! - Delayed target advance after a correct sign
//!
//! The screen owns the wall clock: a correct recognition schedules the
//! advance two seconds out, and the session decides whether the token is
//! still good when the delay fires. Leaving the screen releases the camera.

use std::time::{Duration, Instant};

use crate::cli::{Display, InputHandler};
use crate::recognize::capture::TARGET_ADVANCE_DELAY_MS;
use crate::recognize::{CaptureOutcome, CaptureSession, TargetToken};

/// Preview refresh cadence.
const PREVIEW_INTERVAL_MS: u64 = 200;
const FEEDBACK_ROW: u16 = 21;
const DATASET_ROW: u16 = 22;
const HELP_ROW: u16 = 23;

fn outcome_feedback(outcome: &CaptureOutcome) -> (String, bool) {
    match outcome {
        CaptureOutcome::Trained { label, examples } => {
            (format!("📸 Saved example {} for {}", examples, label), true)
        }
        CaptureOutcome::Correct { label } => (format!("🎉 Yes! That's {}!", label), true),
        CaptureOutcome::Incorrect { detected } => {
            (format!("🤔 That looks like {}, keep trying", detected), false)
        }
        CaptureOutcome::NoHand => ("🖐️ I can't see a hand".to_string(), false),
        CaptureOutcome::EmptyClassifier => {
            ("📚 Train some examples first (press t)".to_string(), false)
        }
        CaptureOutcome::NotReady => ("📷 Camera or detector not attached".to_string(), false),
    }
}

/// Interactive practice against the letter targets.
pub fn run_practice(
    display: &Display,
    input: &InputHandler,
    session: &mut CaptureSession,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut deadline: Option<(Instant, TargetToken)> = None;
    let mut feedback: Option<(String, bool)> = None;
    let mut last_preview: Option<Instant> = None;

    display.clear()?;
    display.show_title("🎥 Practice Signs")?;
    display.show_help(
        HELP_ROW,
        "t train  |  r recognize  |  n next letter  |  x clear examples  |  Esc back",
    )?;
    if !session.has_camera() {
        feedback = Some(("📷 Camera unavailable, t and r are off".to_string(), false));
    } else if !session.has_detector() {
        feedback = Some((
            "🤖 Sign detector unavailable, t and r are off".to_string(),
            false,
        ));
    }

    loop {
        if let Some((when, token)) = deadline {
            if Instant::now() >= when {
                deadline = None;
                if session.advance_target(token) {
                    feedback = Some((
                        format!("➡️ Next letter: {}", session.current_target()),
                        true,
                    ));
                    last_preview = None;
                }
            }
        }

        let refresh_due = last_preview
            .map_or(true, |t| t.elapsed() >= Duration::from_millis(PREVIEW_INTERVAL_MS));
        if refresh_due {
            last_preview = Some(Instant::now());
            display.show_capture_status(
                session.current_target(),
                session.example_count(&session.current_target().to_string()),
            )?;
            if let Some((frame, hands)) = session.overlay_frame() {
                display.show_capture_view(&frame, &hands)?;
            }
            display.show_prediction(session.last_prediction())?;
            match &feedback {
                Some((text, good)) => display.show_feedback(FEEDBACK_ROW, text, *good)?,
                None => display.show_feedback(FEEDBACK_ROW, "", true)?,
            }
            let trained = session.trained_labels();
            let dataset_line = if trained.is_empty() {
                "🧠 No examples yet, press t to teach me".to_string()
            } else {
                format!(
                    "🧠 I know {} ({} examples)",
                    trained.join(" "),
                    session.total_examples()
                )
            };
            display.show_help(DATASET_ROW, &dataset_line)?;
        }

        if let Some(key) = input.read_key()? {
            if InputHandler::is_exit(&key) {
                break;
            }
            match InputHandler::key_to_char(&key) {
                Some('t') => {
                    let outcome = session.train_current()?;
                    feedback = Some(outcome_feedback(&outcome));
                }
                Some('r') => {
                    let outcome = session.recognize()?;
                    if matches!(outcome, CaptureOutcome::Correct { .. }) && deadline.is_none() {
                        if let Some(token) = session.pending_advance() {
                            deadline = Some((
                                Instant::now() + Duration::from_millis(TARGET_ADVANCE_DELAY_MS),
                                token,
                            ));
                        }
                    }
                    feedback = Some(outcome_feedback(&outcome));
                }
                Some('n') => {
                    session.skip_target();
                    deadline = None;
                    feedback = Some((format!("➡️ Now try: {}", session.current_target()), true));
                }
                Some('x') => {
                    session.clear_dataset()?;
                    deadline = None;
                    feedback = Some(("🧹 All examples cleared".to_string(), true));
                }
                _ => {}
            }
            last_preview = None;
        }
    }

    session.release();
    Ok(())
}
