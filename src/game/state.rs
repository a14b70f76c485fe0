use std::collections::HashSet;

use log::{debug, info};

use super::config::GameConfig;
use super::direction::Direction;
use super::grid::{Grid, Position};
use super::item::{Item, ItemKind, Spawn};
use super::level::{classic, Level};
use super::rng::GameRng;
use super::snake::{CollisionKind, MoveOutcome, Snake};

/// Where a play session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Built or reset, waiting to be started
    Ready,
    /// Ticks advance the simulation
    Running,
    /// Frozen mid-game, resumable
    Paused,
    /// The snake collided; only a reset leaves this state
    Over,
}

/// What one tick did, reported back to the loop driver
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// False when the tick was a no-op (the game was not running) or the
    /// step collided
    pub moved: bool,
    /// Set when this tick ended the game
    pub collision: Option<CollisionKind>,
    /// Item kinds consumed this tick, in resolution order
    pub consumed: Vec<ItemKind>,
    /// True when a level goal was met and the next level was loaded
    pub advanced_level: bool,
}

/// A complete play session: the status machine, the snake, the live items,
/// the score, and the level list
///
/// All mutation funnels through the transition methods and [`Game::tick`];
/// collaborators read state through the snapshot accessors. Transitions
/// attempted from the wrong status are silently ignored, because input
/// racing the loop is expected, not an error.
pub struct Game {
    status: Status,
    grid: Grid,
    snake: Snake,
    items: Vec<Item>,
    levels: Vec<Level>,
    level_index: usize,
    score: u32,
    ticks: u64,
    cause_of_death: Option<CollisionKind>,
    initial_length: usize,
    rng: GameRng,
}

impl Game {
    /// Create a session on the first of the given levels
    ///
    /// An empty level list falls back to a classic level built from the
    /// config.
    pub fn new(config: &GameConfig, levels: Vec<Level>, rng: GameRng) -> Self {
        let levels = if levels.is_empty() {
            classic(config)
        } else {
            levels
        };
        let grid = Grid::new(config.grid_width, config.grid_height);
        let mut game = Self {
            status: Status::Ready,
            grid,
            snake: Snake::new(grid.center(), Direction::Right, config.initial_snake_length),
            items: Vec::new(),
            levels,
            level_index: 0,
            score: 0,
            ticks: 0,
            cause_of_death: None,
            initial_length: config.initial_snake_length,
            rng,
        };
        game.load_items();
        game
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Ticks executed since the last reset
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// What ended the game, once status is [`Status::Over`]
    pub fn cause_of_death(&self) -> Option<CollisionKind> {
        self.cause_of_death
    }

    /// The level currently being played
    pub fn level(&self) -> &Level {
        &self.levels[self.level_index]
    }

    /// Levels completed so far this session
    pub fn levels_cleared(&self) -> usize {
        self.level_index
    }

    /// Ready -> Running
    pub fn start(&mut self) {
        if self.status == Status::Ready {
            self.status = Status::Running;
            info!("game started on level '{}'", self.level().name);
        }
    }

    /// Running -> Paused
    pub fn pause(&mut self) {
        if self.status == Status::Running {
            self.status = Status::Paused;
            debug!("game paused at tick {}", self.ticks);
        }
    }

    /// Paused -> Running
    pub fn resume(&mut self) {
        if self.status == Status::Paused {
            self.status = Status::Running;
        }
    }

    /// Rebuild the session at the current level, from any status
    ///
    /// A fresh snake (stale queued turns die with it), the level's item
    /// set, score and tick counter back to zero.
    pub fn reset(&mut self) {
        self.snake = Snake::new(self.grid.center(), Direction::Right, self.initial_length);
        self.score = 0;
        self.ticks = 0;
        self.cause_of_death = None;
        self.load_items();
        self.status = Status::Ready;
        info!("game reset on level '{}'", self.level().name);
    }

    /// Buffer a steering intent for upcoming ticks
    ///
    /// Ignored unless the game is running.
    pub fn queue_direction(&mut self, direction: Direction) {
        if self.status == Status::Running {
            self.snake.queue_direction(direction);
        }
    }

    /// Advance the simulation by exactly one step
    ///
    /// A no-op unless the game is running. Order within a tick: move the
    /// snake, detect collision, resolve every item under the new head,
    /// then check the level goal.
    pub fn tick(&mut self) -> TickSummary {
        if self.status != Status::Running {
            return TickSummary::default();
        }

        self.ticks += 1;
        let mut summary = TickSummary::default();
        let walls = self.level().walls;

        match self.snake.advance(&self.grid, walls) {
            MoveOutcome::Collided(kind) => {
                self.status = Status::Over;
                self.cause_of_death = Some(kind);
                summary.collision = Some(kind);
                info!(
                    "game over after {} ticks: {:?} collision, final score {}",
                    self.ticks, kind, self.score
                );
                return summary;
            }
            MoveOutcome::Moved => summary.moved = true,
        }
        debug_assert!(
            self.grid.contains(self.snake.head()),
            "head escaped the grid without a collision"
        );

        self.resolve_items(&mut summary);

        if self.level().is_complete(&self.snake) && self.level_index + 1 < self.levels.len() {
            // The snake and score carry over; only the board contents and
            // pace change. A completed final level just keeps running.
            self.level_index += 1;
            self.load_items();
            summary.advanced_level = true;
            info!(
                "level complete, advancing to '{}' (speed {})",
                self.level().name,
                self.level().speed
            );
        }

        summary
    }

    /// Apply and replace or remove every item sitting under the head
    ///
    /// The consumption set is fixed at entry: colocated items all resolve
    /// this tick, in collection order, even if an effect (reverse) moves
    /// the head away mid-loop.
    fn resolve_items(&mut self, summary: &mut TickSummary) {
        let head = self.snake.head();
        let mut index = 0;
        while index < self.items.len() {
            if self.items[index].position != head {
                index += 1;
                continue;
            }
            let item = self.items[index];
            item.kind.apply(&mut self.snake);
            self.score = apply_points(self.score, item.points);
            summary.consumed.push(item.kind);
            debug!(
                "consumed {:?} at ({}, {}), score now {}",
                item.kind, head.x, head.y, self.score
            );

            if item.respawn {
                match self.random_free_cell() {
                    Some(cell) => {
                        self.items[index] = item.relocated(cell);
                        index += 1;
                    }
                    // Board is full; drop the item rather than stack it
                    // onto an occupied cell
                    None => {
                        self.items.remove(index);
                    }
                }
            } else {
                self.items.remove(index);
            }
        }
    }

    /// Materialize the current level's item specs onto the board
    fn load_items(&mut self) {
        self.items.clear();
        let specs = self.levels[self.level_index].items.clone();
        for spec in specs {
            let position = match spec.spawn {
                Spawn::At(pos) if !self.snake.occupies(pos) => pos,
                // Fixed placements shadowed by the snake fall back to a
                // free cell, same as floating spawns
                Spawn::At(_) | Spawn::Anywhere => match self.random_free_cell() {
                    Some(cell) => cell,
                    None => continue,
                },
            };
            self.items.push(spec.materialize(position));
        }
    }

    /// Pick a uniformly random cell not covered by the snake or an item
    ///
    /// Returns None when the board has no free cell left.
    fn random_free_cell(&mut self) -> Option<Position> {
        let occupied: HashSet<Position> = self
            .snake
            .segments()
            .chain(self.items.iter().map(|item| item.position))
            .collect();
        let free: Vec<Position> = self
            .grid
            .cells()
            .filter(|cell| !occupied.contains(cell))
            .collect();
        if free.is_empty() {
            return None;
        }
        let index = self.rng.gen_range(0..free.len());
        Some(free[index])
    }
}

/// Add a signed point value to the score, bottoming out at zero
fn apply_points(score: u32, points: i32) -> u32 {
    if points >= 0 {
        score.saturating_add(points as u32)
    } else {
        score.saturating_sub(points.unsigned_abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::grid::WallMode;
    use crate::game::item::ItemSpec;
    use crate::game::level::LevelGoal;

    fn bare_level(walls: WallMode) -> Level {
        Level {
            name: "Test".to_string(),
            walls,
            speed: 10,
            items: Vec::new(),
            goal: LevelGoal::Endless,
        }
    }

    fn level_with(walls: WallMode, items: Vec<ItemSpec>, goal: LevelGoal) -> Level {
        Level {
            name: "Test".to_string(),
            walls,
            speed: 10,
            items,
            goal,
        }
    }

    fn game_with(levels: Vec<Level>) -> Game {
        Game::new(&GameConfig::small(), levels, GameRng::seeded(42))
    }

    fn one_shot(kind: ItemKind, x: i32, y: i32) -> ItemSpec {
        let mut spec = ItemSpec::new(kind, Spawn::At(Position::new(x, y)));
        spec.respawn = false;
        spec
    }

    #[test]
    fn test_new_game_is_ready() {
        let game = game_with(vec![]);
        assert_eq!(game.status(), Status::Ready);
        assert_eq!(game.score(), 0);
        assert_eq!(game.ticks(), 0);
        assert_eq!(game.snake().head(), Position::new(5, 5));
        assert_eq!(game.snake().len(), 3);
        assert_eq!(game.cause_of_death(), None);
    }

    #[test]
    fn test_classic_fallback_places_apple_off_snake() {
        let game = game_with(vec![]);
        assert_eq!(game.items().len(), 1);
        let item = game.items()[0];
        assert_eq!(item.kind, ItemKind::Apple);
        assert!(game.grid().contains(item.position));
        assert!(!game.snake().occupies(item.position));
    }

    #[test]
    fn test_transitions() {
        let mut game = game_with(vec![bare_level(WallMode::Solid)]);

        // Pause and resume mean nothing before the first start
        game.pause();
        assert_eq!(game.status(), Status::Ready);
        game.resume();
        assert_eq!(game.status(), Status::Ready);

        game.start();
        assert_eq!(game.status(), Status::Running);
        game.start();
        assert_eq!(game.status(), Status::Running);

        game.pause();
        assert_eq!(game.status(), Status::Paused);
        game.pause();
        assert_eq!(game.status(), Status::Paused);

        game.resume();
        assert_eq!(game.status(), Status::Running);

        game.reset();
        assert_eq!(game.status(), Status::Ready);
    }

    #[test]
    fn test_tick_is_a_noop_unless_running() {
        let mut game = game_with(vec![bare_level(WallMode::Solid)]);
        let head = game.snake().head();

        assert_eq!(game.tick(), TickSummary::default());
        assert_eq!(game.snake().head(), head);

        game.start();
        game.pause();
        assert_eq!(game.tick(), TickSummary::default());
        assert_eq!(game.snake().head(), head);
        assert_eq!(game.ticks(), 0);
    }

    #[test]
    fn test_queue_direction_ignored_unless_running() {
        let mut game = game_with(vec![bare_level(WallMode::Solid)]);
        game.queue_direction(Direction::Up);
        game.start();
        game.tick();
        // The pre-start intent was dropped, so the snake kept heading right
        assert_eq!(game.snake().head(), Position::new(6, 5));
    }

    #[test]
    fn test_running_into_the_wall_ends_the_game() {
        // 10x10 board, snake (5,5),(4,5),(3,5) heading right: the head
        // walks to the last column, then the step to x=10 is fatal
        let mut game = game_with(vec![bare_level(WallMode::Solid)]);
        game.start();

        let summary = game.tick();
        assert!(summary.moved);
        assert_eq!(
            game.snake().segments().collect::<Vec<_>>(),
            vec![
                Position::new(6, 5),
                Position::new(5, 5),
                Position::new(4, 5)
            ]
        );
        assert_eq!(game.status(), Status::Running);

        while game.snake().head() != Position::new(9, 5) {
            assert!(game.tick().moved);
        }
        assert_eq!(game.status(), Status::Running);

        let summary = game.tick();
        assert!(!summary.moved);
        assert_eq!(summary.collision, Some(CollisionKind::Wall));
        assert_eq!(game.status(), Status::Over);
        assert_eq!(game.cause_of_death(), Some(CollisionKind::Wall));
        assert_eq!(game.snake().head(), Position::new(9, 5));
    }

    #[test]
    fn test_wrap_mode_survives_the_edge() {
        let mut game = game_with(vec![bare_level(WallMode::Wrap)]);
        game.start();

        for _ in 0..4 {
            game.tick();
        }
        assert_eq!(game.snake().head(), Position::new(9, 5));

        let summary = game.tick();
        assert!(summary.moved);
        assert_eq!(game.snake().head(), Position::new(0, 5));
        assert_eq!(game.status(), Status::Running);
    }

    #[test]
    fn test_self_collision_ends_the_game() {
        let mut game = game_with(vec![level_with(
            WallMode::Solid,
            vec![one_shot(ItemKind::Apple, 6, 5), one_shot(ItemKind::Apple, 7, 5)],
            LevelGoal::Endless,
        )]);
        game.start();
        game.tick();
        game.tick();
        assert_eq!(game.snake().len(), 5);

        // U-turn back into the body
        game.queue_direction(Direction::Down);
        game.tick();
        game.queue_direction(Direction::Left);
        game.tick();
        game.queue_direction(Direction::Up);
        let summary = game.tick();

        assert_eq!(summary.collision, Some(CollisionKind::Body));
        assert_eq!(game.status(), Status::Over);
        assert_eq!(game.cause_of_death(), Some(CollisionKind::Body));
    }

    #[test]
    fn test_consuming_an_apple() {
        let mut game = game_with(vec![level_with(
            WallMode::Solid,
            vec![one_shot(ItemKind::Apple, 6, 5)],
            LevelGoal::Endless,
        )]);
        game.start();

        let summary = game.tick();
        assert_eq!(summary.consumed, vec![ItemKind::Apple]);
        assert_eq!(game.score(), 1);
        assert_eq!(game.snake().len(), 4);
        assert!(game.items().is_empty());

        // Length is stable again on the very next tick
        game.tick();
        assert_eq!(game.snake().len(), 4);
    }

    #[test]
    fn test_consuming_poison_shrinks() {
        let mut game = game_with(vec![level_with(
            WallMode::Solid,
            vec![one_shot(ItemKind::Poison, 6, 5)],
            LevelGoal::Endless,
        )]);
        game.start();

        let summary = game.tick();
        assert_eq!(summary.consumed, vec![ItemKind::Poison]);
        assert_eq!(game.snake().len(), 2);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_respawned_item_avoids_snake_and_items() {
        let spec = ItemSpec::apple(Spawn::At(Position::new(6, 5)));
        let mut game = game_with(vec![level_with(
            WallMode::Solid,
            vec![spec],
            LevelGoal::Endless,
        )]);
        game.start();

        game.tick();

        assert_eq!(game.items().len(), 1);
        let item = game.items()[0];
        assert!(game.grid().contains(item.position));
        assert!(!game.snake().occupies(item.position));
        assert_ne!(item.position, game.snake().head());
    }

    #[test]
    fn test_colocated_items_all_resolve_in_one_tick() {
        let mut grow = one_shot(ItemKind::Apple, 6, 5);
        grow.points = 2;
        let reverse = one_shot(ItemKind::Reverse, 6, 5);
        let mut game = game_with(vec![level_with(
            WallMode::Solid,
            vec![grow, reverse],
            LevelGoal::Endless,
        )]);
        game.start();

        let summary = game.tick();

        // Both resolve even though the reverse moves the head away
        assert_eq!(summary.consumed, vec![ItemKind::Apple, ItemKind::Reverse]);
        assert_eq!(game.score(), 2);
        assert!(game.items().is_empty());
        assert_eq!(game.status(), Status::Running);
    }

    #[test]
    fn test_negative_points_bottom_out_at_zero() {
        let mut poison = one_shot(ItemKind::Poison, 6, 5);
        poison.points = -5;
        let mut game = game_with(vec![level_with(
            WallMode::Solid,
            vec![poison],
            LevelGoal::Endless,
        )]);
        game.start();

        game.tick();

        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_level_advance_keeps_snake_and_score() {
        let first = level_with(
            WallMode::Solid,
            vec![one_shot(ItemKind::Apple, 6, 5)],
            LevelGoal::Length(4),
        );
        let mut second = level_with(
            WallMode::Wrap,
            vec![ItemSpec::apple(Spawn::At(Position::new(2, 2)))],
            LevelGoal::Endless,
        );
        second.name = "Second".to_string();
        second.speed = 14;
        let mut game = game_with(vec![first, second]);
        game.start();

        let summary = game.tick();

        assert!(summary.advanced_level);
        assert_eq!(game.level().name, "Second");
        assert_eq!(game.level().speed, 14);
        assert_eq!(game.levels_cleared(), 1);
        // Carried over from the first level
        assert_eq!(game.snake().len(), 4);
        assert_eq!(game.score(), 1);
        // The new level's items are on the board
        assert_eq!(game.items().len(), 1);
        assert_eq!(game.items()[0].position, Position::new(2, 2));
    }

    #[test]
    fn test_completed_final_level_keeps_running() {
        let only = level_with(
            WallMode::Solid,
            vec![one_shot(ItemKind::Apple, 6, 5)],
            LevelGoal::Length(4),
        );
        let mut game = game_with(vec![only]);
        game.start();

        let summary = game.tick();

        assert!(!summary.advanced_level);
        assert_eq!(game.status(), Status::Running);
        assert!(game.tick().moved);
    }

    #[test]
    fn test_reset_rebuilds_the_current_level() {
        let mut game = game_with(vec![bare_level(WallMode::Solid)]);
        game.start();
        while game.status() == Status::Running {
            game.tick();
        }
        assert_eq!(game.status(), Status::Over);

        game.reset();

        assert_eq!(game.status(), Status::Ready);
        assert_eq!(game.score(), 0);
        assert_eq!(game.ticks(), 0);
        assert_eq!(game.cause_of_death(), None);
        assert_eq!(game.snake().head(), Position::new(5, 5));
        assert_eq!(game.snake().len(), 3);
    }

    #[test]
    fn test_tick_after_game_over_is_a_noop() {
        let mut game = game_with(vec![bare_level(WallMode::Solid)]);
        game.start();
        while game.status() == Status::Running {
            game.tick();
        }

        let head = game.snake().head();
        assert_eq!(game.tick(), TickSummary::default());
        assert_eq!(game.snake().head(), head);
        assert_eq!(game.status(), Status::Over);
    }
}
