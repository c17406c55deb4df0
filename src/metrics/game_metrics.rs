use std::time::Duration;

use crate::game::GameOverReport;

/// Scoreboard of the current session, fed by the engine callbacks
pub struct GameMetrics {
    pub score: u32,
    /// Best score known, seeded with the stored high score
    pub high_score: u32,
    pub elapsed_time: Duration,
    pub games_played: u32,
    pub last_game: Option<GameOverReport>,
}

impl GameMetrics {
    pub fn new(stored_high_score: u32) -> Self {
        Self {
            score: 0,
            high_score: stored_high_score,
            elapsed_time: Duration::ZERO,
            games_played: 0,
            last_game: None,
        }
    }

    pub fn update(&mut self, elapsed: Duration) {
        self.elapsed_time = elapsed;
    }

    pub fn on_game_start(&mut self) {
        self.score = 0;
        self.elapsed_time = Duration::ZERO;
    }

    pub fn on_score_update(&mut self, score: u32) {
        self.score = score;
        self.high_score = self.high_score.max(score);
    }

    pub fn on_game_over(&mut self, report: GameOverReport) {
        self.games_played += 1;
        self.score = report.score;
        self.high_score = self.high_score.max(report.score);
        self.elapsed_time = Duration::from_secs(report.duration_secs);
        self.last_game = Some(report);
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{CollisionType, GameOutcome};

    fn report(score: u32, duration_secs: u64) -> GameOverReport {
        GameOverReport {
            score,
            duration_secs,
            outcome: GameOutcome::Collision(CollisionType::Wall),
        }
    }

    #[test]
    fn test_time_formatting() {
        let mut metrics = GameMetrics::default();
        metrics.elapsed_time = Duration::from_secs(125);
        assert_eq!(metrics.format_time(), "02:05");

        metrics.elapsed_time = Duration::from_secs(0);
        assert_eq!(metrics.format_time(), "00:00");

        metrics.elapsed_time = Duration::from_secs(3661);
        assert_eq!(metrics.format_time(), "61:01");
    }

    #[test]
    fn test_high_score_tracking() {
        let mut metrics = GameMetrics::new(20);

        metrics.on_game_over(report(10, 4));
        assert_eq!(metrics.high_score, 20);
        assert_eq!(metrics.games_played, 1);

        metrics.on_game_start();
        metrics.on_score_update(30);
        assert_eq!(metrics.high_score, 30); // Live score beats the stored best
        metrics.on_game_over(report(30, 9));
        assert_eq!(metrics.games_played, 2);
        assert_eq!(metrics.last_game, Some(report(30, 9)));
        assert_eq!(metrics.format_time(), "00:09");
    }

    #[test]
    fn test_game_start_resets_score_and_time() {
        let mut metrics = GameMetrics::default();
        metrics.on_score_update(50);
        metrics.update(Duration::from_secs(42));

        metrics.on_game_start();
        assert_eq!(metrics.score, 0);
        assert_eq!(metrics.elapsed_time, Duration::ZERO);
        assert_eq!(metrics.high_score, 50);
    }
}
