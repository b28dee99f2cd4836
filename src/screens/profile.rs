//! Profile screen: name and session tallies
//!
//! Features:
//! - Editable learner name, saved to the local store
//! - Games, stars, and best score from this run

use crate::cli::{Display, InputHandler};
use crate::screens::AppStats;
use crate::storage::LocalStore;

const NAME_LIMIT: usize = 20;

/// Show and edit the profile. Enter saves the name; Esc leaves without
/// saving.
pub fn run_profile(
    display: &Display,
    input: &InputHandler,
    store: &LocalStore,
    stats: &AppStats,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut profile = store.load_profile().unwrap_or_default();
    let mut name = profile.name.clone();
    let mut feedback: Option<(String, bool)> = None;
    let mut dirty = true;

    display.clear()?;
    display.show_title("🧒 My Profile")?;
    display.show_help(12, "Type to edit your name  |  Enter save  |  Esc back")?;

    loop {
        if dirty {
            dirty = false;
            display.show_prompt(&format!("Name: {}_", name))?;
            display.show_lines(
                &[
                    format!("🎮 Games played today: {}", stats.games_played),
                    format!("⭐ Stars earned today: {}", stats.total_stars),
                    format!("🏆 Best score today: {}", stats.best_score),
                ],
                5,
            )?;
            match &feedback {
                Some((text, good)) => display.show_feedback(9, text, *good)?,
                None => display.show_feedback(9, "", true)?,
            }
        }

        if let Some(key) = input.read_key()? {
            if InputHandler::is_exit(&key) {
                return Ok(());
            }
            if InputHandler::is_enter(&key) {
                let trimmed = name.trim();
                if trimmed.is_empty() {
                    feedback = Some(("Please type a name first".to_string(), false));
                } else {
                    profile.name = trimmed.to_string();
                    store.save_profile(&profile)?;
                    feedback = Some((format!("💾 Saved, hi {}!", profile.name), true));
                }
                dirty = true;
                continue;
            }
            if InputHandler::is_backspace(&key) {
                name.pop();
                dirty = true;
                continue;
            }
            if let Some(c) = InputHandler::key_to_char(&key) {
                if name.chars().count() < NAME_LIMIT && (c.is_alphanumeric() || c == ' ') {
                    name.push(c);
                    dirty = true;
                }
            }
        }
    }
}
