//! Screens Module: One interactive loop per app area
//!
//! # Components
//! - `games.rs`: Identify, Beat the Timer, and Match the Signs
//! - `capture.rs`: Camera practice with train and recognize
//! - `learn.rs`: Alphabet and word browser
//! - `profile.rs`: Name and session tallies

pub mod capture;
pub mod games;
pub mod learn;
pub mod profile;

pub use games::GameReport;

/// Tallies across one app run, fed by finished games.
#[derive(Clone, Copy, Debug, Default)]
pub struct AppStats {
    pub games_played: u32,
    pub total_stars: u32,
    pub best_score: u32,
}

impl AppStats {
    /// Fold a finished game into the tallies.
    pub fn record(&mut self, report: &GameReport) {
        self.games_played += 1;
        self.total_stars += report.stars;
        self.best_score = self.best_score.max(report.score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_tracks_best_score() {
        let mut stats = AppStats::default();
        stats.record(&GameReport {
            score: 7,
            rounds_played: 10,
            stars: 2,
        });
        stats.record(&GameReport {
            score: 4,
            rounds_played: 10,
            stars: 1,
        });
        assert_eq!(stats.games_played, 2);
        assert_eq!(stats.total_stars, 3);
        assert_eq!(stats.best_score, 7);
    }
}
