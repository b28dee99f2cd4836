//! Game screens: the three quiz variants
//!
//! Features:
//! - Identify the Sign: ten rounds of pick-the-letter
//! - Beat the Timer: countdown play with streak bonuses
//! - Match the Signs: pair five sign cards with their words
//!
//! Each screen drives its state machine from a poll loop. Reveals are
//! scheduled on the wall clock here: a guess arms a token, and when the
//! delay elapses the token goes back to the engine, which decides whether
//! it is still valid.

use rand::rngs::StdRng;
use std::time::{Duration, Instant};

use crate::cli::{Display, InputHandler};
use crate::content;
use crate::session::match_board::PAIR_COUNT;
use crate::session::round::{RoundOutcome, DEFAULT_ROUNDS, DEFAULT_TIME_BUDGET};
use crate::session::{
    AdvanceToken, GuessOutcome, MatchBoard, RoundConfig, RoundSession, SelectResult, SessionStatus,
};

/// Reveal pause after an identify guess.
const IDENTIFY_REVEAL_MS: u64 = 1500;
/// Shorter reveal keeps the timer game moving.
const TIMER_REVEAL_MS: u64 = 1000;

/// How one finished game went.
#[derive(Clone, Copy, Debug)]
pub struct GameReport {
    pub score: u32,
    pub rounds_played: u32,
    pub stars: u32,
}

/// Star rating from the share of correct answers.
fn stars_for(score: u32, attempted: u32) -> u32 {
    if attempted == 0 {
        return 1;
    }
    let percent = score * 100 / attempted;
    if percent >= 90 {
        3
    } else if percent >= 60 {
        2
    } else {
        1
    }
}

/// Star rating for the match game: five tries is a perfect board.
fn match_stars(attempts: u32) -> u32 {
    if attempts <= PAIR_COUNT as u32 {
        3
    } else if attempts <= PAIR_COUNT as u32 + 2 {
        2
    } else {
        1
    }
}

/// Whether the closing summary may replace the board. A session that just
/// finished keeps its last reveal on screen until the hold passes.
fn summary_due(status: SessionStatus, finish_hold: Option<Instant>, now: Instant) -> bool {
    status == SessionStatus::Finished && finish_hold.map_or(true, |until| now >= until)
}

fn sign_card(letter: char) -> Option<&'static content::LetterCard> {
    content::letter_cards().iter().find(|c| c.letter == letter)
}

fn round_prompt(target: char) -> String {
    match sign_card(target) {
        Some(card) => format!("🤟 Which letter goes with this sign?   {}", card.emoji),
        None => "🤟 Which letter goes with this sign?".to_string(),
    }
}

fn guess_feedback(outcome: &GuessOutcome, target: char) -> (String, bool) {
    match outcome {
        GuessOutcome::Correct { bonus: true } => {
            ("⚡ +10 seconds! Incredible streak!".to_string(), true)
        }
        GuessOutcome::Correct { bonus: false } => match sign_card(target) {
            Some(card) => (format!("✅ Yes! {} goes with {}!", card.emoji, target), true),
            None => (format!("✅ Yes, it's {}!", target), true),
        },
        GuessOutcome::Incorrect => match sign_card(target) {
            Some(card) => (
                format!("❌ Not quite, it was {} ({})", target, card.word),
                false,
            ),
            None => (format!("❌ Not quite, it was {}", target), false),
        },
        GuessOutcome::Rejected => (String::new(), false),
    }
}

/// Final screen shared by all three games: stars, a closing line, and a
/// keypress to leave.
fn show_summary(
    display: &Display,
    input: &InputHandler,
    title: &str,
    line: &str,
    stars: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    display.clear()?;
    display.show_title(title)?;
    display.show_prompt(line)?;
    display.show_stars(stars)?;
    display.show_help(6, "Press any key to continue")?;
    loop {
        if input.read_key()?.is_some() {
            return Ok(());
        }
    }
}

/// Ten rounds of naming the letter behind a sign card. Returns None when
/// the player leaves before finishing.
pub fn run_identify(
    display: &Display,
    input: &InputHandler,
    rng: &mut StdRng,
) -> Result<Option<GameReport>, Box<dyn std::error::Error>> {
    let mut session = RoundSession::new(RoundConfig::rounds(
        content::letters(),
        DEFAULT_ROUNDS,
        IDENTIFY_REVEAL_MS,
    ));
    session.start(rng);

    let mut deadline: Option<(Instant, AdvanceToken)> = None;
    let mut finish_hold: Option<Instant> = None;
    let mut last_guess: Option<char> = None;
    let mut feedback: Option<(String, bool)> = None;
    let mut dirty = true;

    display.clear()?;
    display.show_title("🔍 Identify the Sign")?;
    display.show_help(12, "1-4 pick a letter  |  r restart  |  Esc back")?;

    loop {
        if let Some((when, token)) = deadline {
            if Instant::now() >= when {
                deadline = None;
                if session.advance(token, rng) {
                    last_guess = None;
                    feedback = None;
                    dirty = true;
                }
            }
        }

        if summary_due(session.status(), finish_hold, Instant::now()) {
            break;
        }

        if dirty {
            dirty = false;
            if let Some(round) = session.current_round() {
                let revealed = round.outcome != RoundOutcome::Pending;
                let round_no = if revealed {
                    session.rounds_played()
                } else {
                    session.rounds_played() + 1
                };
                display.show_prompt(&round_prompt(round.target))?;
                display.show_letter_choices(
                    &round.choices,
                    last_guess.filter(|_| revealed).map(|g| (g, round.target)),
                )?;
                display.show_round_progress(
                    round_no,
                    session.total_rounds().unwrap_or(DEFAULT_ROUNDS),
                    session.score(),
                    session.streak(),
                )?;
            }
            match &feedback {
                Some((text, good)) => display.show_feedback(8, text, *good)?,
                None => display.show_feedback(8, "", true)?,
            }
        }

        if let Some(key) = input.read_key()? {
            if InputHandler::is_exit(&key) {
                return Ok(None);
            }
            if InputHandler::key_to_char(&key) == Some('r') {
                session.restart(rng);
                deadline = None;
                finish_hold = None;
                last_guess = None;
                feedback = None;
                dirty = true;
                continue;
            }
            if let Some(i) = InputHandler::digit_choice(&key) {
                let picked = session
                    .current_round()
                    .and_then(|r| r.choices.get(i).copied().map(|c| (c, r.target)));
                if let Some((choice, target)) = picked {
                    match session.submit_guess(choice) {
                        GuessOutcome::Rejected => {}
                        outcome => {
                            last_guess = Some(choice);
                            feedback = Some(guess_feedback(&outcome, target));
                            if let Some(token) = session.pending_advance() {
                                deadline = Some((
                                    Instant::now()
                                        + Duration::from_millis(session.reveal_delay_ms()),
                                    token,
                                ));
                            } else if session.status() == SessionStatus::Finished {
                                // The last answer gets the same reveal dwell
                                // before the summary takes over.
                                finish_hold = Some(
                                    Instant::now()
                                        + Duration::from_millis(session.reveal_delay_ms()),
                                );
                            }
                            dirty = true;
                        }
                    }
                }
            }
        }
    }

    let report = GameReport {
        score: session.score(),
        rounds_played: session.rounds_played(),
        stars: stars_for(session.score(), session.rounds_played()),
    };
    show_summary(
        display,
        input,
        "🔍 Identify the Sign",
        &format!(
            "🎉 All done! You got {} of {}",
            report.score, report.rounds_played
        ),
        report.stars,
    )?;
    Ok(Some(report))
}

/// Countdown play: answer as many as possible before the clock hits zero.
/// Five in a row buys ten extra seconds.
pub fn run_timer(
    display: &Display,
    input: &InputHandler,
    rng: &mut StdRng,
) -> Result<Option<GameReport>, Box<dyn std::error::Error>> {
    let mut session = RoundSession::new(RoundConfig::time_boxed(
        content::letters(),
        DEFAULT_TIME_BUDGET,
        TIMER_REVEAL_MS,
    ));
    session.start(rng);

    let mut last_tick = Instant::now();
    let mut deadline: Option<(Instant, AdvanceToken)> = None;
    let mut last_guess: Option<char> = None;
    let mut feedback: Option<(String, bool)> = None;
    let mut dirty = true;

    display.clear()?;
    display.show_title("⏰ Beat the Timer")?;
    display.show_help(12, "1-4 pick a letter  |  r restart  |  Esc back")?;

    loop {
        while last_tick.elapsed() >= Duration::from_secs(1) {
            last_tick += Duration::from_secs(1);
            session.tick();
            dirty = true;
        }

        if let Some((when, token)) = deadline {
            if Instant::now() >= when {
                deadline = None;
                if session.advance(token, rng) {
                    last_guess = None;
                    feedback = None;
                    dirty = true;
                }
            }
        }

        if session.status() == SessionStatus::Finished {
            break;
        }

        if dirty {
            dirty = false;
            if let Some(round) = session.current_round() {
                let revealed = round.outcome != RoundOutcome::Pending;
                display.show_prompt(&round_prompt(round.target))?;
                display.show_letter_choices(
                    &round.choices,
                    last_guess.filter(|_| revealed).map(|g| (g, round.target)),
                )?;
            }
            display.show_timer_status(
                session.time_left().unwrap_or(0),
                session.score(),
                session.streak(),
            )?;
            match &feedback {
                Some((text, good)) => display.show_feedback(8, text, *good)?,
                None => display.show_feedback(8, "", true)?,
            }
        }

        if let Some(key) = input.read_key()? {
            if InputHandler::is_exit(&key) {
                return Ok(None);
            }
            if InputHandler::key_to_char(&key) == Some('r') {
                session.restart(rng);
                last_tick = Instant::now();
                deadline = None;
                last_guess = None;
                feedback = None;
                dirty = true;
                continue;
            }
            if let Some(i) = InputHandler::digit_choice(&key) {
                let picked = session
                    .current_round()
                    .and_then(|r| r.choices.get(i).copied().map(|c| (c, r.target)));
                if let Some((choice, target)) = picked {
                    match session.submit_guess(choice) {
                        GuessOutcome::Rejected => {}
                        outcome => {
                            last_guess = Some(choice);
                            feedback = Some(guess_feedback(&outcome, target));
                            if let Some(token) = session.pending_advance() {
                                deadline = Some((
                                    Instant::now()
                                        + Duration::from_millis(session.reveal_delay_ms()),
                                    token,
                                ));
                            }
                            dirty = true;
                        }
                    }
                }
            }
        }
    }

    let report = GameReport {
        score: session.score(),
        rounds_played: session.rounds_played(),
        stars: stars_for(session.score(), session.rounds_played()),
    };
    show_summary(
        display,
        input,
        "⏰ Beat the Timer",
        &format!("⏰ Time's up! You answered {} correctly", report.score),
        report.stars,
    )?;
    Ok(Some(report))
}

/// Pair each sign card with its word. Mismatches flash red for a second.
pub fn run_match(
    display: &Display,
    input: &InputHandler,
    rng: &mut StdRng,
) -> Result<Option<GameReport>, Box<dyn std::error::Error>> {
    let mut board = MatchBoard::deal(rng);
    let clock = Instant::now();
    let mut feedback: Option<(String, bool)> = None;
    let mut dirty = true;

    display.clear()?;
    display.show_title("🧩 Match the Signs")?;
    display.show_prompt("Match each sign to its word!")?;
    display.show_help(12, "1-5 pick a sign  |  a-e pick a word  |  r new board  |  Esc back")?;

    loop {
        let now_ms = clock.elapsed().as_millis() as u64;
        if board.expire_flashes(now_ms) {
            dirty = true;
        }

        if board.is_complete() {
            break;
        }

        if dirty {
            dirty = false;
            display.show_match_board(&board)?;
            display.show_match_progress(&board)?;
            match &feedback {
                Some((text, good)) => display.show_feedback(11, text, *good)?,
                None => display.show_feedback(11, "", true)?,
            }
        }

        if let Some(key) = input.read_key()? {
            if InputHandler::is_exit(&key) {
                return Ok(None);
            }
            if InputHandler::key_to_char(&key) == Some('r') {
                board = MatchBoard::deal(rng);
                feedback = None;
                dirty = true;
                continue;
            }

            let now_ms = clock.elapsed().as_millis() as u64;
            let picked: Option<(&'static str, bool)> =
                if let Some(i) = InputHandler::digit_choice(&key) {
                    board.image_column().get(i).map(|e| (e.word, true))
                } else if let Some(i) = InputHandler::letter_choice(&key) {
                    board.word_column().get(i).map(|e| (e.word, false))
                } else {
                    None
                };
            let result = picked.map(|(word, from_images)| {
                if from_images {
                    board.select_image(word, now_ms)
                } else {
                    board.select_word(word, now_ms)
                }
            });

            match result {
                Some(SelectResult::Matched { word }) => {
                    let emoji = content::find_word(&word).map_or("🎉", |e| e.emoji);
                    feedback = Some((format!("{} {} matched!", emoji, word), true));
                    dirty = true;
                }
                Some(SelectResult::Mismatched { .. }) => {
                    feedback = Some(("❌ Not a pair, try again".to_string(), false));
                    dirty = true;
                }
                Some(SelectResult::Pending) => {
                    feedback = None;
                    dirty = true;
                }
                Some(SelectResult::Ignored) | None => {}
            }
        }
    }

    let report = GameReport {
        score: board.matched_count() as u32,
        rounds_played: board.attempts(),
        stars: match_stars(board.attempts()),
    };
    show_summary(
        display,
        input,
        "🧩 Match the Signs",
        &format!("🎊 All pairs matched in {} tries!", report.rounds_played),
        report.stars,
    )?;
    Ok(Some(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stars_reward_accuracy() {
        assert_eq!(stars_for(10, 10), 3);
        assert_eq!(stars_for(9, 10), 3);
        assert_eq!(stars_for(7, 10), 2);
        assert_eq!(stars_for(3, 10), 1);
        assert_eq!(stars_for(0, 0), 1);
    }

    #[test]
    fn test_match_stars_reward_few_attempts() {
        assert_eq!(match_stars(5), 3);
        assert_eq!(match_stars(7), 2);
        assert_eq!(match_stars(12), 1);
    }

    #[test]
    fn test_every_letter_has_a_sign_card() {
        for letter in content::letters() {
            assert!(sign_card(letter).is_some(), "no card for {}", letter);
        }
    }

    #[test]
    fn test_summary_waits_for_final_reveal() {
        let now = Instant::now();
        let hold = Some(now + Duration::from_millis(IDENTIFY_REVEAL_MS));

        assert!(!summary_due(SessionStatus::InProgress, None, now));
        assert!(!summary_due(SessionStatus::Finished, hold, now));
        assert!(summary_due(
            SessionStatus::Finished,
            hold,
            now + Duration::from_millis(IDENTIFY_REVEAL_MS)
        ));
        assert!(summary_due(SessionStatus::Finished, None, now));
    }
}
