use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::info;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior, interval};

use crate::game::{Game, GameConfig, GameRng, Level, Status};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::SessionStats;
use crate::render::Renderer;

/// Interactive play: owns the terminal, the fixed-timestep loop, and the
/// wiring from key presses to game transitions
///
/// The loop couples simulation and drawing, so exactly one tick runs
/// between consecutive frames while the game is running. Missed ticks are
/// skipped, never buffered; a long pause does not replay lost time.
pub struct PlayMode {
    game: Game,
    stats: SessionStats,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl PlayMode {
    pub fn new(config: &GameConfig, levels: Vec<Level>) -> Self {
        let rng = match config.seed {
            Some(seed) => GameRng::seeded(seed),
            None => GameRng::from_entropy(),
        };
        info!("session rng seed {}", rng.seed());

        Self {
            game: Game::new(config, levels, rng),
            stats: SessionStats::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut tick_timer = self.new_tick_timer();

        // First frame: the ready screen, before any tick has fired
        self.draw(terminal)?;

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        if self.handle_event(event, &mut tick_timer) {
                            self.draw(terminal)?;
                        }
                    }
                }

                // Game logic tick, immediately followed by its frame
                _ = tick_timer.tick() => {
                    if self.game.status() == Status::Running {
                        self.step(&mut tick_timer);
                        self.draw(terminal)?;
                    }
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Fixed-timestep timer for the current level's pace
    fn new_tick_timer(&self) -> Interval {
        let ticks_per_second = u64::from(self.game.level().speed.max(1));
        // interval() panics on a zero period
        let period = Duration::from_millis((1000 / ticks_per_second).max(1));
        let mut timer = interval(period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        timer
    }

    /// Run one tick and its bookkeeping
    fn step(&mut self, tick_timer: &mut Interval) {
        let summary = self.game.tick();

        if summary.advanced_level {
            self.stats.on_level_advance();
            // The new level may run at a different pace
            *tick_timer = self.new_tick_timer();
        }
        if summary.collision.is_some() {
            self.stats
                .on_game_over(self.game.score(), self.game.snake().len());
        }
    }

    /// Apply one input event; returns true when the screen needs a redraw
    fn handle_event(&mut self, event: Event, tick_timer: &mut Interval) -> bool {
        let Event::Key(key) = event else {
            return false;
        };
        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return false;
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::Steer(direction) => {
                self.game.queue_direction(direction);
                // Visible on the next tick's frame
                false
            }
            KeyAction::TogglePause => {
                self.toggle_space(tick_timer);
                true
            }
            KeyAction::Restart => {
                self.game.reset();
                self.stats.on_game_start();
                *tick_timer = self.new_tick_timer();
                true
            }
            KeyAction::Quit => {
                self.should_quit = true;
                false
            }
            KeyAction::None => false,
        }
    }

    /// Space drives the whole status machine: start when ready, pause when
    /// running, resume when paused, go again when over
    fn toggle_space(&mut self, tick_timer: &mut Interval) {
        match self.game.status() {
            Status::Ready => {
                self.game.start();
                self.stats.on_game_start();
                *tick_timer = self.new_tick_timer();
            }
            Status::Running => self.game.pause(),
            Status::Paused => self.game.resume(),
            Status::Over => {
                self.game.reset();
                self.game.start();
                self.stats.on_game_start();
                *tick_timer = self.new_tick_timer();
            }
        }
    }

    fn draw(&mut self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        self.stats.update();
        terminal
            .draw(|frame| {
                self.renderer.render(frame, &self.game, &self.stats);
            })
            .context("Failed to draw frame")?;
        Ok(())
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use crate::game::classic;

    fn play_mode() -> PlayMode {
        let mut config = GameConfig::small();
        config.seed = Some(7);
        let levels = classic(&config);
        PlayMode::new(&config, levels)
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_session_starts_ready() {
        let mode = play_mode();
        assert_eq!(mode.game.status(), Status::Ready);
        assert_eq!(mode.game.score(), 0);
        assert_eq!(mode.stats.games_played, 0);
    }

    #[tokio::test]
    async fn test_space_walks_the_status_machine() {
        let mut mode = play_mode();
        let mut timer = mode.new_tick_timer();

        mode.handle_event(key(KeyCode::Char(' ')), &mut timer);
        assert_eq!(mode.game.status(), Status::Running);

        mode.handle_event(key(KeyCode::Char(' ')), &mut timer);
        assert_eq!(mode.game.status(), Status::Paused);

        mode.handle_event(key(KeyCode::Char(' ')), &mut timer);
        assert_eq!(mode.game.status(), Status::Running);
    }

    #[tokio::test]
    async fn test_space_restarts_after_game_over() {
        let mut mode = play_mode();
        let mut timer = mode.new_tick_timer();

        mode.handle_event(key(KeyCode::Char(' ')), &mut timer);
        while mode.game.status() == Status::Running {
            mode.step(&mut timer);
        }
        assert_eq!(mode.game.status(), Status::Over);
        assert_eq!(mode.stats.games_played, 1);

        mode.handle_event(key(KeyCode::Char(' ')), &mut timer);
        assert_eq!(mode.game.status(), Status::Running);
        assert_eq!(mode.game.score(), 0);
    }

    #[tokio::test]
    async fn test_restart_key_resets_to_ready() {
        let mut mode = play_mode();
        let mut timer = mode.new_tick_timer();

        mode.handle_event(key(KeyCode::Char(' ')), &mut timer);
        mode.step(&mut timer);
        mode.handle_event(key(KeyCode::Char('r')), &mut timer);

        assert_eq!(mode.game.status(), Status::Ready);
        assert_eq!(mode.game.ticks(), 0);
    }

    #[tokio::test]
    async fn test_quit_key_sets_the_flag() {
        let mut mode = play_mode();
        let mut timer = mode.new_tick_timer();

        mode.handle_event(key(KeyCode::Char('q')), &mut timer);

        assert!(mode.should_quit);
    }

    #[tokio::test]
    async fn test_steering_reaches_the_snake() {
        let mut mode = play_mode();
        let mut timer = mode.new_tick_timer();

        mode.handle_event(key(KeyCode::Char(' ')), &mut timer);
        mode.handle_event(key(KeyCode::Up), &mut timer);
        let head = mode.game.snake().head();
        mode.step(&mut timer);

        assert_eq!(mode.game.snake().head().y, head.y - 1);
        assert_eq!(mode.game.snake().head().x, head.x);
    }
}
