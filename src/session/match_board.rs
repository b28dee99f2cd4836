//! Match board: pair the sign image with its word
//!
//! Holds:
//! - Two independently shuffled columns dealt from the word list
//! - One selection slot per column
//! - Matched set plus a timed mismatch flash
//!
//! Selecting the second item of a pair resolves it immediately: both slots
//! clear, and a mismatch starts a flash that the driver expires by passing
//! the current clock to `expire_flashes`. The board keeps no clock of its
//! own.

use rand::seq::SliceRandom;
use rand::Rng;
use rustc_hash::FxHashSet;

use crate::content::{self, WordEntry};

/// Pairs dealt onto a board.
pub const PAIR_COUNT: usize = 5;
/// How long a mismatched pair stays highlighted.
pub const MISMATCH_FLASH_MS: u64 = 1000;

/// What a selection call did to the board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectResult {
    /// First pick of a pair recorded; waiting for the other column.
    Pending,
    /// Both picks named the same word.
    Matched { word: String },
    /// Picks disagreed; a flash is now running on both.
    Mismatched { image: String, word: String },
    /// Selection ignored: already matched, unknown word, or board complete.
    Ignored,
}

/// A mismatch highlight with its expiry deadline.
#[derive(Clone, Debug)]
struct Flash {
    image: String,
    word: String,
    deadline_ms: u64,
}

/// One game of image-to-word matching.
pub struct MatchBoard {
    image_column: Vec<&'static WordEntry>,
    word_column: Vec<&'static WordEntry>,
    selected_image: Option<String>,
    selected_word: Option<String>,
    matched: FxHashSet<String>,
    flashes: Vec<Flash>,
    attempts: u32,
    mismatches: u32,
}

impl MatchBoard {
    /// Deal a fresh board: sample the pairs, then shuffle each column on its
    /// own so rows do not line up.
    pub fn deal(rng: &mut impl Rng) -> Self {
        let pool: Vec<&'static WordEntry> = content::words().iter().collect();
        let picked: Vec<&'static WordEntry> =
            pool.choose_multiple(rng, PAIR_COUNT).copied().collect();

        let mut image_column = picked.clone();
        let mut word_column = picked;
        image_column.shuffle(rng);
        word_column.shuffle(rng);

        MatchBoard {
            image_column,
            word_column,
            selected_image: None,
            selected_word: None,
            matched: FxHashSet::default(),
            flashes: Vec::new(),
            attempts: 0,
            mismatches: 0,
        }
    }

    /// Pick from the image column.
    pub fn select_image(&mut self, word: &str, now_ms: u64) -> SelectResult {
        if !self.selectable(word, &self.image_column) {
            return SelectResult::Ignored;
        }
        self.selected_image = Some(word.to_string());
        self.resolve(now_ms)
    }

    /// Pick from the word column.
    pub fn select_word(&mut self, word: &str, now_ms: u64) -> SelectResult {
        if !self.selectable(word, &self.word_column) {
            return SelectResult::Ignored;
        }
        self.selected_word = Some(word.to_string());
        self.resolve(now_ms)
    }

    fn selectable(&self, word: &str, column: &[&'static WordEntry]) -> bool {
        if self.is_complete() || self.matched.contains(word) {
            return false;
        }
        column.iter().any(|entry| entry.word == word)
    }

    /// Resolve once both slots hold a pick. Resolution is synchronous, so an
    /// unresolved pair can never carry over into the next selection.
    fn resolve(&mut self, now_ms: u64) -> SelectResult {
        let (image, word) = match (&self.selected_image, &self.selected_word) {
            (Some(i), Some(w)) => (i.clone(), w.clone()),
            _ => return SelectResult::Pending,
        };
        self.selected_image = None;
        self.selected_word = None;
        self.attempts += 1;

        if image == word {
            self.matched.insert(word.clone());
            SelectResult::Matched { word }
        } else {
            self.mismatches += 1;
            self.flashes.push(Flash {
                image: image.clone(),
                word: word.clone(),
                deadline_ms: now_ms + MISMATCH_FLASH_MS,
            });
            SelectResult::Mismatched { image, word }
        }
    }

    /// Drop flashes whose deadline has passed. True when any were dropped.
    pub fn expire_flashes(&mut self, now_ms: u64) -> bool {
        let before = self.flashes.len();
        self.flashes.retain(|f| f.deadline_ms > now_ms);
        self.flashes.len() != before
    }

    /// True while a flash highlights this image-column entry.
    pub fn image_flashing(&self, word: &str) -> bool {
        self.flashes.iter().any(|f| f.image == word)
    }

    /// True while a flash highlights this word-column entry.
    pub fn word_flashing(&self, word: &str) -> bool {
        self.flashes.iter().any(|f| f.word == word)
    }

    pub fn is_matched(&self, word: &str) -> bool {
        self.matched.contains(word)
    }

    pub fn is_complete(&self) -> bool {
        self.matched.len() == self.image_column.len()
    }

    pub fn matched_count(&self) -> usize {
        self.matched.len()
    }

    pub fn pair_count(&self) -> usize {
        self.image_column.len()
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn mismatches(&self) -> u32 {
        self.mismatches
    }

    pub fn selected_image(&self) -> Option<&str> {
        self.selected_image.as_deref()
    }

    pub fn selected_word(&self) -> Option<&str> {
        self.selected_word.as_deref()
    }

    pub fn image_column(&self) -> &[&'static WordEntry] {
        &self.image_column
    }

    pub fn word_column(&self) -> &[&'static WordEntry] {
        &self.word_column
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn board() -> MatchBoard {
        MatchBoard::deal(&mut StdRng::seed_from_u64(11))
    }

    #[test]
    fn test_deal_columns_hold_same_words() {
        let board = board();
        assert_eq!(board.image_column().len(), PAIR_COUNT);
        assert_eq!(board.word_column().len(), PAIR_COUNT);

        let mut images: Vec<&str> = board.image_column().iter().map(|e| e.word).collect();
        let mut words: Vec<&str> = board.word_column().iter().map(|e| e.word).collect();
        images.sort_unstable();
        words.sort_unstable();
        assert_eq!(images, words);
        images.dedup();
        assert_eq!(images.len(), PAIR_COUNT);
    }

    #[test]
    fn test_match_clears_selections_and_marks_word() {
        let mut board = board();
        let word = board.image_column()[0].word.to_string();

        assert_eq!(board.select_image(&word, 0), SelectResult::Pending);
        assert_eq!(board.selected_image(), Some(word.as_str()));
        assert_eq!(
            board.select_word(&word, 0),
            SelectResult::Matched { word: word.clone() }
        );
        assert!(board.is_matched(&word));
        assert_eq!(board.selected_image(), None);
        assert_eq!(board.selected_word(), None);
        assert_eq!(board.attempts(), 1);
    }

    #[test]
    fn test_mismatch_flashes_then_expires() {
        let mut board = board();
        let image = board.image_column()[0].word.to_string();
        let word = board
            .word_column()
            .iter()
            .map(|e| e.word)
            .find(|&w| w != image)
            .unwrap()
            .to_string();

        board.select_image(&image, 100);
        let result = board.select_word(&word, 100);
        assert_eq!(
            result,
            SelectResult::Mismatched {
                image: image.clone(),
                word: word.clone()
            }
        );
        assert!(!board.is_matched(&image));
        assert!(!board.is_matched(&word));
        assert_eq!(board.selected_image(), None);
        assert_eq!(board.selected_word(), None);
        assert_eq!(board.mismatches(), 1);

        assert!(board.image_flashing(&image));
        assert!(board.word_flashing(&word));
        assert!(!board.expire_flashes(100 + MISMATCH_FLASH_MS - 1));
        assert!(board.image_flashing(&image));
        assert!(board.expire_flashes(100 + MISMATCH_FLASH_MS));
        assert!(!board.image_flashing(&image));
        assert!(!board.word_flashing(&word));
    }

    #[test]
    fn test_matched_entries_ignore_reselection() {
        let mut board = board();
        let word = board.image_column()[0].word.to_string();
        board.select_image(&word, 0);
        board.select_word(&word, 0);

        assert_eq!(board.select_image(&word, 0), SelectResult::Ignored);
        assert_eq!(board.select_word(&word, 0), SelectResult::Ignored);
        assert_eq!(board.attempts(), 1);
    }

    #[test]
    fn test_unknown_word_is_ignored() {
        let mut board = board();
        assert_eq!(board.select_image("no-such-word", 0), SelectResult::Ignored);
        assert_eq!(board.selected_image(), None);
    }

    #[test]
    fn test_completion_after_all_pairs() {
        let mut board = board();
        let words: Vec<String> = board
            .image_column()
            .iter()
            .map(|e| e.word.to_string())
            .collect();
        for word in &words {
            assert!(!board.is_complete());
            board.select_image(word, 0);
            board.select_word(word, 0);
        }
        assert!(board.is_complete());
        assert_eq!(board.matched_count(), PAIR_COUNT);

        // A finished board takes no more picks.
        assert_eq!(board.select_image(&words[0], 0), SelectResult::Ignored);
    }

    #[test]
    fn test_same_column_repick_replaces_selection() {
        let mut board = board();
        let first = board.image_column()[0].word.to_string();
        let second = board.image_column()[1].word.to_string();

        board.select_image(&first, 0);
        assert_eq!(board.select_image(&second, 0), SelectResult::Pending);
        assert_eq!(board.selected_image(), Some(second.as_str()));

        // The pair resolves against the replacement, not the first pick.
        let result = board.select_word(&second, 0);
        assert_eq!(result, SelectResult::Matched { word: second });
    }
}
