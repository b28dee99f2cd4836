//! Session Management: Quiz rounds and matching games
//!
//! # Components
//! - `round.rs`: RoundSession state machine for guess-and-reveal quizzes
//! - `match_board.rs`: MatchBoard for the image-to-word pairing game

pub mod match_board;
pub mod round;

pub use match_board::{MatchBoard, SelectResult};
pub use round::{AdvanceToken, GuessOutcome, RoundConfig, RoundSession, SessionStatus};

// These are only used internally or their fields are accessed directly
#[allow(unused_imports)]
pub use round::{Round, RoundOutcome, SessionMode};
