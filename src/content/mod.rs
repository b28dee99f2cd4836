//! Teaching content: the symbol universe shared by lessons and games
//!
//! # Components
//! - `words.rs`: Letter universe, word vocabulary, lesson cards

pub mod words;

pub use words::{
    categories, find_word, letter_cards, letters, words, words_in_category, LetterCard, WordEntry,
    PRACTICE_LETTERS,
};
