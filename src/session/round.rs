//! Round engine: guess-and-reveal quiz sessions
//!
//! Drives:
//! - Round-counted sessions (fixed number of rounds)
//! - Time-boxed sessions (countdown budget with a streak bonus)
//! - Target and distractor sampling with proper shuffling
//!
//! The engine is a plain state machine with no timers, rendering, or I/O.
//! Drivers own the clock: they schedule the reveal delay themselves and call
//! `advance` with the token they captured, and call `tick` once per elapsed
//! second in time-boxed play. Tokens outlived by a `restart` are rejected, so
//! a late reveal callback can never touch a fresh session.

use rand::seq::SliceRandom;
use rand::Rng;

/// Options shown per round, target included.
pub const CHOICE_COUNT: usize = 4;
/// Rounds in a default round-counted session.
pub const DEFAULT_ROUNDS: u32 = 10;
/// Seconds in a default time-boxed session.
pub const DEFAULT_TIME_BUDGET: u32 = 30;
/// Consecutive correct answers that trigger the time bonus.
pub const STREAK_BONUS_THRESHOLD: u32 = 5;
/// Seconds granted when the streak threshold is reached.
pub const STREAK_BONUS_SECONDS: u32 = 10;

/// How a session terminates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionMode {
    /// Finish after this many accepted guesses.
    Rounds(u32),
    /// Finish when this many seconds have ticked away.
    TimeBoxed(u32),
}

/// Session lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    NotStarted,
    InProgress,
    Finished,
}

/// Per-round evaluation state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundOutcome {
    Pending,
    Correct,
    Incorrect,
}

/// What a single `submit_guess` call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuessOutcome {
    /// Guess accepted and right; `bonus` is set when this guess completed a
    /// streak and granted extra time.
    Correct { bonus: bool },
    /// Guess accepted and wrong.
    Incorrect,
    /// Guess ignored: no live round, or feedback is already showing.
    Rejected,
}

/// Token captured when a delayed advance is scheduled. A `restart` bumps the
/// session generation, so tokens from the old life are rejected by `advance`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdvanceToken {
    generation: u64,
}

/// One question: the target plus its display choices.
#[derive(Clone, Debug)]
pub struct Round {
    pub target: char,
    pub choices: Vec<char>,
    pub outcome: RoundOutcome,
}

/// Session parameters. `symbols` must hold at least `choice_count` entries.
#[derive(Clone, Debug)]
pub struct RoundConfig {
    pub mode: SessionMode,
    pub symbols: Vec<char>,
    pub choice_count: usize,
    pub reveal_delay_ms: u64,
    /// Exclude the previous target from the next draw. Off reproduces a
    /// fully independent draw each round.
    pub avoid_repeats: bool,
}

impl RoundConfig {
    /// Round-counted config with the default choice count.
    pub fn rounds(symbols: Vec<char>, total: u32, reveal_delay_ms: u64) -> Self {
        RoundConfig {
            mode: SessionMode::Rounds(total),
            symbols,
            choice_count: CHOICE_COUNT,
            reveal_delay_ms,
            avoid_repeats: true,
        }
    }

    /// Time-boxed config with the default choice count.
    pub fn time_boxed(symbols: Vec<char>, seconds: u32, reveal_delay_ms: u64) -> Self {
        RoundConfig {
            mode: SessionMode::TimeBoxed(seconds),
            symbols,
            choice_count: CHOICE_COUNT,
            reveal_delay_ms,
            avoid_repeats: true,
        }
    }
}

/// Complete quiz session state.
#[derive(Clone, Debug)]
pub struct RoundSession {
    config: RoundConfig,
    status: SessionStatus,
    score: u32,
    streak: u32,
    rounds_played: u32,
    time_left: u32,
    bonuses: u32,
    current: Option<Round>,
    pending: Option<AdvanceToken>,
    generation: u64,
}

impl RoundSession {
    /// Create a session in `NotStarted`; call `start` to draw the first round.
    pub fn new(config: RoundConfig) -> Self {
        RoundSession {
            config,
            status: SessionStatus::NotStarted,
            score: 0,
            streak: 0,
            rounds_played: 0,
            time_left: 0,
            bonuses: 0,
            current: None,
            pending: None,
            generation: 0,
        }
    }

    /// Begin the session. Calling `start` while a session is already in
    /// progress is a deterministic no-op; use `restart` for a reset.
    pub fn start(&mut self, rng: &mut impl Rng) {
        if self.status == SessionStatus::InProgress {
            return;
        }
        self.reset_and_draw(rng);
    }

    /// Reset all counters and re-enter `InProgress` with a fresh draw. Bumps
    /// the generation so any outstanding advance token becomes stale.
    pub fn restart(&mut self, rng: &mut impl Rng) {
        self.reset_and_draw(rng);
    }

    fn reset_and_draw(&mut self, rng: &mut impl Rng) {
        self.generation += 1;
        self.status = SessionStatus::InProgress;
        self.score = 0;
        self.streak = 0;
        self.rounds_played = 0;
        self.bonuses = 0;
        self.time_left = match self.config.mode {
            SessionMode::TimeBoxed(seconds) => seconds,
            SessionMode::Rounds(_) => 0,
        };
        self.current = None;
        self.pending = None;
        self.next_round(rng, &[]);
    }

    /// Draw a fresh round: a uniform target from the universe minus
    /// `exclude`, distractors sampled without replacement from the non-target
    /// symbols, display order shuffled. No-op unless in progress.
    pub fn next_round(&mut self, rng: &mut impl Rng, exclude: &[char]) {
        if self.status != SessionStatus::InProgress {
            return;
        }

        let mut pool: Vec<char> = self
            .config
            .symbols
            .iter()
            .copied()
            .filter(|s| !exclude.contains(s))
            .collect();
        if pool.is_empty() {
            pool = self.config.symbols.clone();
        }

        let target = match pool.choose(rng) {
            Some(&t) => t,
            None => return,
        };

        let distractor_pool: Vec<char> = self
            .config
            .symbols
            .iter()
            .copied()
            .filter(|&s| s != target)
            .collect();

        let mut choices: Vec<char> = Vec::with_capacity(self.config.choice_count);
        choices.push(target);
        choices.extend(
            distractor_pool
                .choose_multiple(rng, self.config.choice_count - 1)
                .copied(),
        );
        choices.shuffle(rng);

        self.current = Some(Round {
            target,
            choices,
            outcome: RoundOutcome::Pending,
        });
    }

    /// Evaluate a guess against the live round. Guesses are rejected while
    /// feedback for the previous guess is still showing, and after the
    /// session finishes.
    pub fn submit_guess(&mut self, choice: char) -> GuessOutcome {
        if self.status != SessionStatus::InProgress {
            return GuessOutcome::Rejected;
        }
        let round = match self.current.as_mut() {
            Some(r) if r.outcome == RoundOutcome::Pending => r,
            _ => return GuessOutcome::Rejected,
        };

        let correct = choice == round.target;
        let mut bonus = false;
        if correct {
            round.outcome = RoundOutcome::Correct;
            self.score += 1;
            self.streak += 1;
            if matches!(self.config.mode, SessionMode::TimeBoxed(_))
                && self.streak == STREAK_BONUS_THRESHOLD
            {
                self.time_left += STREAK_BONUS_SECONDS;
                self.streak = 0;
                self.bonuses += 1;
                bonus = true;
            }
        } else {
            round.outcome = RoundOutcome::Incorrect;
            self.streak = 0;
        }
        self.rounds_played += 1;

        if let SessionMode::Rounds(total) = self.config.mode {
            if self.rounds_played >= total {
                self.status = SessionStatus::Finished;
                self.pending = None;
                return if correct {
                    GuessOutcome::Correct { bonus }
                } else {
                    GuessOutcome::Incorrect
                };
            }
        }

        self.pending = Some(AdvanceToken {
            generation: self.generation,
        });
        if correct {
            GuessOutcome::Correct { bonus }
        } else {
            GuessOutcome::Incorrect
        }
    }

    /// The token for the currently armed delayed advance, if any.
    pub fn pending_advance(&self) -> Option<AdvanceToken> {
        self.pending
    }

    /// Apply the delayed next-round step. Returns false and changes nothing
    /// when the token is stale or the session is no longer in progress.
    pub fn advance(&mut self, token: AdvanceToken, rng: &mut impl Rng) -> bool {
        if self.status != SessionStatus::InProgress {
            return false;
        }
        match self.pending {
            Some(armed) if armed == token => {}
            _ => return false,
        }
        self.pending = None;

        let exclude: Vec<char> = if self.config.avoid_repeats {
            self.current.iter().map(|r| r.target).collect()
        } else {
            Vec::new()
        };
        self.next_round(rng, &exclude);
        true
    }

    /// Count down one second of the time budget. Finishing at zero overrides
    /// any armed advance. No-op for round-counted sessions.
    pub fn tick(&mut self) -> SessionStatus {
        if self.status == SessionStatus::InProgress
            && matches!(self.config.mode, SessionMode::TimeBoxed(_))
        {
            self.time_left = self.time_left.saturating_sub(1);
            if self.time_left == 0 {
                self.status = SessionStatus::Finished;
                self.pending = None;
            }
        }
        self.status
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    /// Total rounds for round-counted sessions.
    pub fn total_rounds(&self) -> Option<u32> {
        match self.config.mode {
            SessionMode::Rounds(total) => Some(total),
            SessionMode::TimeBoxed(_) => None,
        }
    }

    /// Seconds remaining for time-boxed sessions.
    pub fn time_left(&self) -> Option<u32> {
        match self.config.mode {
            SessionMode::TimeBoxed(_) => Some(self.time_left),
            SessionMode::Rounds(_) => None,
        }
    }

    /// Streak bonuses granted so far.
    pub fn bonuses(&self) -> u32 {
        self.bonuses
    }

    pub fn current_round(&self) -> Option<&Round> {
        self.current.as_ref()
    }

    pub fn reveal_delay_ms(&self) -> u64 {
        self.config.reveal_delay_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn letters() -> Vec<char> {
        ('A'..='Z').collect()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn started(config: RoundConfig) -> (RoundSession, StdRng) {
        let mut r = rng();
        let mut session = RoundSession::new(config);
        session.start(&mut r);
        (session, r)
    }

    fn correct_choice(session: &RoundSession) -> char {
        session.current_round().unwrap().target
    }

    fn wrong_choice(session: &RoundSession) -> char {
        let round = session.current_round().unwrap();
        *round
            .choices
            .iter()
            .find(|&&c| c != round.target)
            .unwrap()
    }

    fn guess_and_advance(session: &mut RoundSession, r: &mut StdRng, choice: char) -> GuessOutcome {
        let outcome = session.submit_guess(choice);
        if let Some(token) = session.pending_advance() {
            session.advance(token, r);
        }
        outcome
    }

    #[test]
    fn test_choices_contain_target_once_without_duplicates() {
        let (mut session, mut r) = started(RoundConfig::rounds(letters(), 100, 0));
        for _ in 0..100 {
            let round = session.current_round().unwrap().clone();
            assert_eq!(round.choices.len(), CHOICE_COUNT);
            assert_eq!(
                round.choices.iter().filter(|&&c| c == round.target).count(),
                1
            );
            let mut sorted = round.choices.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted.len(), CHOICE_COUNT);
            guess_and_advance(&mut session, &mut r, round.target);
        }
    }

    #[test]
    fn test_round_counted_finishes_after_exact_rounds() {
        let (mut session, mut r) = started(RoundConfig::rounds(letters(), DEFAULT_ROUNDS, 0));
        for _ in 0..DEFAULT_ROUNDS {
            assert_eq!(session.status(), SessionStatus::InProgress);
            let target = correct_choice(&session);
            guess_and_advance(&mut session, &mut r, target);
        }
        assert_eq!(session.status(), SessionStatus::Finished);
        assert_eq!(session.score(), DEFAULT_ROUNDS);
        assert_eq!(session.rounds_played(), DEFAULT_ROUNDS);
        assert_eq!(session.submit_guess('A'), GuessOutcome::Rejected);
    }

    #[test]
    fn test_score_counts_correct_guesses_only() {
        // 10 rounds over 26 letters, the 3rd guess wrong, the rest right.
        let (mut session, mut r) = started(RoundConfig::rounds(letters(), 10, 0));
        for round_no in 1..=10 {
            let choice = if round_no == 3 {
                wrong_choice(&session)
            } else {
                correct_choice(&session)
            };
            guess_and_advance(&mut session, &mut r, choice);
        }
        assert_eq!(session.score(), 9);
        assert_eq!(session.status(), SessionStatus::Finished);
    }

    #[test]
    fn test_double_submission_is_rejected_during_reveal() {
        let (mut session, _r) = started(RoundConfig::rounds(letters(), 10, 1500));
        let target = correct_choice(&session);
        assert_eq!(
            session.submit_guess(target),
            GuessOutcome::Correct { bonus: false }
        );
        let score = session.score();
        let streak = session.streak();

        // Reveal lock is held until the driver advances.
        assert_eq!(session.submit_guess(target), GuessOutcome::Rejected);
        assert_eq!(session.submit_guess(wrong_choice(&session)), GuessOutcome::Rejected);
        assert_eq!(session.score(), score);
        assert_eq!(session.streak(), streak);
    }

    #[test]
    fn test_wrong_guess_resets_streak() {
        let (mut session, mut r) = started(RoundConfig::rounds(letters(), 10, 0));
        for _ in 0..2 {
            let target = correct_choice(&session);
            guess_and_advance(&mut session, &mut r, target);
        }
        assert_eq!(session.streak(), 2);
        let wrong = wrong_choice(&session);
        guess_and_advance(&mut session, &mut r, wrong);
        assert_eq!(session.streak(), 0);
    }

    #[test]
    fn test_streak_bonus_grants_time_and_resets() {
        // 30 second budget, 5 straight correct guesses, no ticks: budget 40,
        // streak back to 0 at the moment the 5th guess is accepted.
        let (mut session, mut r) =
            started(RoundConfig::time_boxed(letters(), DEFAULT_TIME_BUDGET, 0));
        for n in 1..=5 {
            let target = correct_choice(&session);
            let outcome = guess_and_advance(&mut session, &mut r, target);
            if n == 5 {
                assert_eq!(outcome, GuessOutcome::Correct { bonus: true });
            } else {
                assert_eq!(outcome, GuessOutcome::Correct { bonus: false });
            }
        }
        assert_eq!(session.time_left(), Some(DEFAULT_TIME_BUDGET + STREAK_BONUS_SECONDS));
        assert_eq!(session.streak(), 0);
        assert_eq!(session.bonuses(), 1);
    }

    #[test]
    fn test_streak_bonus_with_elapsed_ticks() {
        let (mut session, mut r) = started(RoundConfig::time_boxed(letters(), 30, 0));
        for n in 1..=5 {
            let target = correct_choice(&session);
            guess_and_advance(&mut session, &mut r, target);
            if n <= 2 {
                session.tick();
            }
        }
        // 30 + 10 bonus - 2 elapsed ticks.
        assert_eq!(session.time_left(), Some(38));
    }

    #[test]
    fn test_tick_finishes_at_zero_overriding_pending_round() {
        let (mut session, mut r) = started(RoundConfig::time_boxed(letters(), 2, 0));
        let target = correct_choice(&session);
        session.submit_guess(target);
        let token = session.pending_advance().unwrap();

        assert_eq!(session.tick(), SessionStatus::InProgress);
        assert_eq!(session.tick(), SessionStatus::Finished);
        assert!(!session.advance(token, &mut r));
        assert_eq!(session.tick(), SessionStatus::Finished);
    }

    #[test]
    fn test_restart_invalidates_stale_advance_token() {
        let (mut session, mut r) = started(RoundConfig::rounds(letters(), 10, 1500));
        let target = correct_choice(&session);
        session.submit_guess(target);
        let stale = session.pending_advance().unwrap();

        session.restart(&mut r);
        assert_eq!(session.score(), 0);
        assert_eq!(session.rounds_played(), 0);
        assert_eq!(session.status(), SessionStatus::InProgress);

        // The late reveal callback from the old life must not fire.
        assert!(!session.advance(stale, &mut r));
        assert_eq!(session.rounds_played(), 0);
        assert_eq!(session.current_round().unwrap().outcome, RoundOutcome::Pending);
    }

    #[test]
    fn test_start_twice_is_noop() {
        let (mut session, mut r) = started(RoundConfig::rounds(letters(), 10, 0));
        let target = correct_choice(&session);
        guess_and_advance(&mut session, &mut r, target);
        assert_eq!(session.score(), 1);

        session.start(&mut r);
        assert_eq!(session.score(), 1);
        assert_eq!(session.rounds_played(), 1);
    }

    #[test]
    fn test_avoid_repeats_excludes_previous_target() {
        let (mut session, mut r) = started(RoundConfig::rounds(letters(), 1000, 0));
        let mut previous = correct_choice(&session);
        for _ in 0..200 {
            guess_and_advance(&mut session, &mut r, previous);
            let next = correct_choice(&session);
            assert_ne!(next, previous);
            previous = next;
        }
    }

    #[test]
    fn test_independent_draw_allows_repeats() {
        let mut config = RoundConfig::rounds(vec!['A', 'B', 'C', 'D'], 1000, 0);
        config.avoid_repeats = false;
        let (mut session, mut r) = started(config);
        let mut repeated = false;
        let mut previous = correct_choice(&session);
        for _ in 0..200 {
            guess_and_advance(&mut session, &mut r, previous);
            let next = correct_choice(&session);
            if next == previous {
                repeated = true;
            }
            previous = next;
        }
        // With 4 symbols and 200 independent draws a repeat is certain in
        // practice; this guards against accidentally always excluding.
        assert!(repeated);
    }
}
