//! Learn screen: alphabet cards and the word browser
//!
//! Features:
//! - Letter cards with their memory words
//! - Word vocabulary filtered by category
//! - Arrow-key browsing, Tab to switch sides

use crossterm::event::KeyCode;

use crate::cli::{Display, InputHandler};
use crate::content;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Tab {
    Letters,
    Words,
}

/// Slice a window of items around the selection so the strip fits one
/// terminal line. Returns the window and the selection's position in it.
fn strip_window(items: &[String], selected: usize, radius: usize) -> (Vec<String>, usize) {
    let len = items.len();
    let span = radius * 2 + 1;
    if len <= span {
        return (items.to_vec(), selected);
    }
    let start = selected.saturating_sub(radius).min(len - span);
    (items[start..start + span].to_vec(), selected - start)
}

/// Browse the alphabet and the word vocabulary.
pub fn run_learn(
    display: &Display,
    input: &InputHandler,
) -> Result<(), Box<dyn std::error::Error>> {
    let cards = content::letter_cards();
    let mut categories = vec!["All"];
    categories.extend(content::categories());

    let mut tab = Tab::Letters;
    let mut letter_index = 0usize;
    let mut category_index = 0usize;
    let mut word_index = 0usize;
    let mut dirty = true;

    display.clear()?;
    display.show_title("📖 Learn Signs")?;
    display.show_help(
        12,
        "← → browse  |  ↑ ↓ change category  |  Tab switch side  |  Esc back",
    )?;

    loop {
        if dirty {
            dirty = false;
            match tab {
                Tab::Letters => {
                    let card = &cards[letter_index];
                    display.show_prompt("The alphabet, one sign at a time")?;
                    display.show_card_detail(
                        &format!("{}  {}  is for {}", card.letter, card.emoji, card.word),
                        &format!("Letter {} of {}", letter_index + 1, cards.len()),
                    )?;
                    let strip: Vec<String> = cards.iter().map(|c| c.letter.to_string()).collect();
                    let (window, selected) = strip_window(&strip, letter_index, 4);
                    display.show_strip(&window, selected)?;
                    display.show_help(9, "")?;
                }
                Tab::Words => {
                    let category = categories[category_index];
                    let words = content::words_in_category(category);
                    word_index = word_index.min(words.len() - 1);
                    let word = words[word_index];
                    display.show_prompt(&format!(
                        "Everyday words  |  Category: {} ({} words)",
                        category,
                        words.len()
                    ))?;
                    display.show_card_detail(
                        &format!("{}  {}", word.emoji, word.word),
                        &format!("{}  [{:?}]", word.description, word.difficulty),
                    )?;
                    let strip: Vec<String> = words.iter().map(|w| w.word.to_string()).collect();
                    let (window, selected) = strip_window(&strip, word_index, 2);
                    display.show_strip(&window, selected)?;
                    display.show_help(9, &format!("📷 Sign photo: {}", word.image))?;
                }
            }
        }

        if let Some(key) = input.read_key()? {
            if InputHandler::is_exit(&key) {
                return Ok(());
            }
            match key.code {
                KeyCode::Tab => {
                    tab = match tab {
                        Tab::Letters => Tab::Words,
                        Tab::Words => Tab::Letters,
                    };
                    dirty = true;
                }
                KeyCode::Left | KeyCode::Right => {
                    let forward = key.code == KeyCode::Right;
                    match tab {
                        Tab::Letters => {
                            let step = if forward { 1 } else { cards.len() - 1 };
                            letter_index = (letter_index + step) % cards.len();
                        }
                        Tab::Words => {
                            let count =
                                content::words_in_category(categories[category_index]).len();
                            let step = if forward { 1 } else { count - 1 };
                            word_index = (word_index.min(count - 1) + step) % count;
                        }
                    }
                    dirty = true;
                }
                KeyCode::Up | KeyCode::Down if tab == Tab::Words => {
                    let step = if key.code == KeyCode::Down {
                        1
                    } else {
                        categories.len() - 1
                    };
                    category_index = (category_index + step) % categories.len();
                    word_index = 0;
                    dirty = true;
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<String> {
        (0..n).map(|i| i.to_string()).collect()
    }

    #[test]
    fn test_strip_window_fits_small_lists() {
        let (window, selected) = strip_window(&items(3), 1, 4);
        assert_eq!(window.len(), 3);
        assert_eq!(selected, 1);
    }

    #[test]
    fn test_strip_window_centers_selection() {
        let (window, selected) = strip_window(&items(26), 13, 4);
        assert_eq!(window.len(), 9);
        assert_eq!(window[selected], "13");
        assert_eq!(window[0], "9");
    }

    #[test]
    fn test_strip_window_clamps_at_edges() {
        let (window, selected) = strip_window(&items(26), 0, 4);
        assert_eq!(window[0], "0");
        assert_eq!(selected, 0);

        let (window, selected) = strip_window(&items(26), 25, 4);
        assert_eq!(window[8], "25");
        assert_eq!(selected, 8);
    }
}
