use std::time::{Duration, Instant};

/// Statistics for a whole terminal session, surviving game-over restarts
pub struct SessionStats {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub high_score: u32,
    pub best_length: usize,
    pub games_played: u32,
    pub levels_cleared: u32,
}

impl SessionStats {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            high_score: 0,
            best_length: 0,
            games_played: 0,
            levels_cleared: 0,
        }
    }

    /// Refresh the elapsed clock; called once per frame
    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    /// The clock restarts with each game, not each frame
    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
    }

    pub fn on_level_advance(&mut self) {
        self.levels_cleared += 1;
    }

    pub fn on_game_over(&mut self, final_score: u32, final_length: usize) {
        self.games_played += 1;
        if final_score > self.high_score {
            self.high_score = final_score;
        }
        if final_length > self.best_length {
            self.best_length = final_length;
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}
