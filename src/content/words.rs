//! Sign vocabulary: letters and everyday words
//!
//! Holds:
//! - The A-Z letter universe used by the quiz games
//! - The word vocabulary (category, emoji, description, sign image)
//! - The practice cycle for the camera screen

/// Letters the camera screen cycles through by default.
pub const PRACTICE_LETTERS: [char; 5] = ['A', 'B', 'C', 'D', 'E'];

/// Word difficulty tier. The current vocabulary is all easy words; the
/// harder tiers are part of the card schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(dead_code)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// One teachable word with its sign assets.
#[derive(Clone, Debug)]
pub struct WordEntry {
    pub word: &'static str,
    pub category: &'static str,
    pub emoji: &'static str,
    pub description: &'static str,
    pub difficulty: Difficulty,
    pub image: &'static str,
}

/// One letter card for the lesson browser.
#[derive(Clone, Debug)]
pub struct LetterCard {
    pub letter: char,
    pub word: &'static str,
    pub emoji: &'static str,
}

/// The full letter universe, in alphabetical order.
pub fn letters() -> Vec<char> {
    ('A'..='Z').collect()
}

/// The full word vocabulary.
pub fn words() -> &'static [WordEntry] {
    &WORDS
}

/// Letter lesson cards, one per letter.
pub fn letter_cards() -> &'static [LetterCard] {
    &LETTER_CARDS
}

/// Distinct category names in first-seen order.
pub fn categories() -> Vec<&'static str> {
    let mut seen = Vec::new();
    for entry in WORDS.iter() {
        if !seen.contains(&entry.category) {
            seen.push(entry.category);
        }
    }
    seen
}

/// Words belonging to a category; "All" yields the whole vocabulary.
pub fn words_in_category(category: &str) -> Vec<&'static WordEntry> {
    WORDS
        .iter()
        .filter(|entry| category == "All" || entry.category == category)
        .collect()
}

/// Look up a word entry by its word text.
pub fn find_word(word: &str) -> Option<&'static WordEntry> {
    WORDS.iter().find(|entry| entry.word == word)
}

static WORDS: [WordEntry; 25] = [
    WordEntry { word: "all done", category: "Daily", emoji: "✅", description: "Finished doing something!", difficulty: Difficulty::Easy, image: "/assets/signs/word/alldone.jpg" },
    WordEntry { word: "don't", category: "Basic", emoji: "🚫", description: "Shows something is not allowed!", difficulty: Difficulty::Easy, image: "/assets/signs/word/dont.jpg" },
    WordEntry { word: "eat", category: "Daily", emoji: "🍽️", description: "Time to eat food!", difficulty: Difficulty::Easy, image: "/assets/signs/word/eat.jpg" },
    WordEntry { word: "friends", category: "People", emoji: "👫", description: "People you like to play with!", difficulty: Difficulty::Easy, image: "/assets/signs/word/friends.jpg" },
    WordEntry { word: "help", category: "Daily", emoji: "🆘", description: "Ask for assistance!", difficulty: Difficulty::Easy, image: "/assets/signs/word/help.jpg" },
    WordEntry { word: "hello", category: "Greetings", emoji: "👋", description: "A friendly way to say hi!", difficulty: Difficulty::Easy, image: "/assets/signs/word/hello.jpg" },
    WordEntry { word: "hungry", category: "Daily", emoji: "🍽️", description: "Feeling like you need food!", difficulty: Difficulty::Easy, image: "/assets/signs/word/hungry.jpg" },
    WordEntry { word: "like", category: "Feelings", emoji: "👍", description: "Shows you enjoy or approve!", difficulty: Difficulty::Easy, image: "/assets/signs/word/like.jpg" },
    WordEntry { word: "me", category: "Basic", emoji: "🙋", description: "Refers to yourself!", difficulty: Difficulty::Easy, image: "/assets/signs/word/me.jpg" },
    WordEntry { word: "more", category: "Daily", emoji: "➕", description: "Ask for extra!", difficulty: Difficulty::Easy, image: "/assets/signs/word/more.jpg" },
    WordEntry { word: "no", category: "Basic", emoji: "❌", description: "Disagree or say something is wrong!", difficulty: Difficulty::Easy, image: "/assets/signs/word/no.jpg" },
    WordEntry { word: "play", category: "Daily", emoji: "⚽", description: "Time to have fun!", difficulty: Difficulty::Easy, image: "/assets/signs/word/play.jpg" },
    WordEntry { word: "please", category: "Greetings", emoji: "🙏", description: "Polite way to ask for something!", difficulty: Difficulty::Easy, image: "/assets/signs/word/please.jpg" },
    WordEntry { word: "stop", category: "Daily", emoji: "✋", description: "Halt or pause!", difficulty: Difficulty::Easy, image: "/assets/signs/word/stop.jpg" },
    WordEntry { word: "thank you", category: "Greetings", emoji: "🙏", description: "Show gratitude!", difficulty: Difficulty::Easy, image: "/assets/signs/word/thankyou.jpg" },
    WordEntry { word: "toilet", category: "Daily", emoji: "🚻", description: "Where you go to wash or pee!", difficulty: Difficulty::Easy, image: "/assets/signs/word/toilet.jpg" },
    WordEntry { word: "want", category: "Daily", emoji: "🤲", description: "Ask for something you need!", difficulty: Difficulty::Easy, image: "/assets/signs/word/want.jpg" },
    WordEntry { word: "water", category: "Daily", emoji: "💧", description: "Drink to stay hydrated!", difficulty: Difficulty::Easy, image: "/assets/signs/word/water.jpg" },
    WordEntry { word: "what", category: "Questions", emoji: "❓", description: "Ask about something!", difficulty: Difficulty::Easy, image: "/assets/signs/word/what.jpg" },
    WordEntry { word: "when", category: "Questions", emoji: "⏰", description: "Ask about time!", difficulty: Difficulty::Easy, image: "/assets/signs/word/when.jpg" },
    WordEntry { word: "where", category: "Questions", emoji: "📍", description: "Ask about location!", difficulty: Difficulty::Easy, image: "/assets/signs/word/where.jpg" },
    WordEntry { word: "who", category: "Questions", emoji: "🧑", description: "Ask about a person!", difficulty: Difficulty::Easy, image: "/assets/signs/word/who.jpg" },
    WordEntry { word: "why", category: "Questions", emoji: "❔", description: "Ask for a reason!", difficulty: Difficulty::Easy, image: "/assets/signs/word/why.jpg" },
    WordEntry { word: "yes", category: "Basic", emoji: "✅", description: "Agree or say something is correct!", difficulty: Difficulty::Easy, image: "/assets/signs/word/yes.jpg" },
    WordEntry { word: "you", category: "Basic", emoji: "👉", description: "Refers to another person!", difficulty: Difficulty::Easy, image: "/assets/signs/word/you.jpg" },
];

static LETTER_CARDS: [LetterCard; 26] = [
    LetterCard { letter: 'A', word: "Apple", emoji: "🍎" },
    LetterCard { letter: 'B', word: "Ball", emoji: "⚽" },
    LetterCard { letter: 'C', word: "Cat", emoji: "🐱" },
    LetterCard { letter: 'D', word: "Dog", emoji: "🐶" },
    LetterCard { letter: 'E', word: "Elephant", emoji: "🐘" },
    LetterCard { letter: 'F', word: "Fish", emoji: "🐟" },
    LetterCard { letter: 'G', word: "Grapes", emoji: "🍇" },
    LetterCard { letter: 'H', word: "Hat", emoji: "🎩" },
    LetterCard { letter: 'I', word: "Ice cream", emoji: "🍦" },
    LetterCard { letter: 'J', word: "Juice", emoji: "🧃" },
    LetterCard { letter: 'K', word: "Kite", emoji: "🪁" },
    LetterCard { letter: 'L', word: "Lion", emoji: "🦁" },
    LetterCard { letter: 'M', word: "Moon", emoji: "🌙" },
    LetterCard { letter: 'N', word: "Nest", emoji: "🪺" },
    LetterCard { letter: 'O', word: "Orange", emoji: "🍊" },
    LetterCard { letter: 'P', word: "Penguin", emoji: "🐧" },
    LetterCard { letter: 'Q', word: "Queen", emoji: "👑" },
    LetterCard { letter: 'R', word: "Rainbow", emoji: "🌈" },
    LetterCard { letter: 'S', word: "Sun", emoji: "☀️" },
    LetterCard { letter: 'T', word: "Tree", emoji: "🌳" },
    LetterCard { letter: 'U', word: "Umbrella", emoji: "☂️" },
    LetterCard { letter: 'V', word: "Violin", emoji: "🎻" },
    LetterCard { letter: 'W', word: "Whale", emoji: "🐳" },
    LetterCard { letter: 'X', word: "Xylophone", emoji: "🎵" },
    LetterCard { letter: 'Y', word: "Yo-yo", emoji: "🪀" },
    LetterCard { letter: 'Z', word: "Zebra", emoji: "🦓" },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_universe_size() {
        let all = letters();
        assert_eq!(all.len(), 26);
        assert_eq!(all[0], 'A');
        assert_eq!(all[25], 'Z');
    }

    #[test]
    fn test_category_filter() {
        let all = words_in_category("All");
        assert_eq!(all.len(), words().len());

        let questions = words_in_category("Questions");
        assert!(!questions.is_empty());
        assert!(questions.iter().all(|w| w.category == "Questions"));
        assert!(questions.len() < all.len());
    }

    #[test]
    fn test_find_word() {
        assert!(find_word("hello").is_some());
        assert!(find_word("nonexistent").is_none());
    }

    #[test]
    fn test_practice_letters_are_in_universe() {
        let all = letters();
        assert!(PRACTICE_LETTERS.iter().all(|l| all.contains(l)));
    }
}
