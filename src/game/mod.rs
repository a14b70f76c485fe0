//! Core game simulation for Snake
//!
//! Everything in this module is synchronous and free of I/O: one call to
//! [`Game::tick`] advances the world exactly one step and every consequence
//! comes back as a value. Rendering, key handling, and timing live outside,
//! in the collaborator modules.

pub mod config;
pub mod direction;
pub mod grid;
pub mod item;
pub mod level;
pub mod rng;
pub mod snake;
pub mod state;

// Re-export commonly used types
pub use config::GameConfig;
pub use direction::{Direction, DirectionQueue};
pub use grid::{Grid, Position, WallMode};
pub use item::{Item, ItemKind, ItemSpec, Spawn};
pub use level::{campaign, classic, Level, LevelGoal, CAMPAIGN_MIN_GRID};
pub use rng::GameRng;
pub use snake::{CollisionKind, MoveOutcome, Snake};
pub use state::{Game, Status, TickSummary};
