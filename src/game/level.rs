use super::config::GameConfig;
use super::grid::{Position, WallMode};
use super::item::{ItemSpec, Spawn};
use super::snake::Snake;

/// Completion rule evaluated after every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelGoal {
    /// Complete once the snake reaches this many cells
    Length(usize),
    /// Never completes; play continues until a collision
    Endless,
}

impl LevelGoal {
    /// Check the goal against the current snake
    pub fn is_met(self, snake: &Snake) -> bool {
        match self {
            LevelGoal::Length(target) => snake.len() >= target,
            LevelGoal::Endless => false,
        }
    }
}

/// One stage of play: topology, pace, the items on the board, and the goal
/// that unlocks the next stage
#[derive(Debug, Clone)]
pub struct Level {
    pub name: String,
    pub walls: WallMode,
    /// Simulation rate in ticks per second
    pub speed: u32,
    pub items: Vec<ItemSpec>,
    pub goal: LevelGoal,
}

impl Level {
    /// Check if the snake has met this level's goal
    pub fn is_complete(&self, snake: &Snake) -> bool {
        self.goal.is_met(snake)
    }
}

/// Smallest board the campaign layouts fit on
///
/// The widest fixed placement sits at column and row 13.
pub const CAMPAIGN_MIN_GRID: usize = 14;

/// The single endless level of a classic game: one respawning apple on a
/// board whose topology and pace come from the config
pub fn classic(config: &GameConfig) -> Vec<Level> {
    let walls = if config.walls {
        WallMode::Solid
    } else {
        WallMode::Wrap
    };
    vec![Level {
        name: "Classic".to_string(),
        walls,
        speed: config.speed,
        items: vec![ItemSpec::apple(Spawn::Anywhere)],
        goal: LevelGoal::Endless,
    }]
}

/// The six-stage campaign
///
/// Stages alternate between wrap-around and solid borders, add poison and
/// reverse items as they progress, and speed up for the last pair. Each
/// length goal carries over the snake from the stage before, so the bar
/// keeps rising; the final stage is endless.
pub fn campaign() -> Vec<Level> {
    fn at(x: i32, y: i32) -> Spawn {
        Spawn::At(Position::new(x, y))
    }

    let easy_items = vec![
        ItemSpec::apple(at(8, 8)),
        ItemSpec::apple(at(3, 5)),
        ItemSpec::poison(at(4, 4)),
        ItemSpec::reverse(at(13, 13)),
    ];
    let medium_items = vec![
        ItemSpec::apple(at(8, 8)),
        ItemSpec::apple(at(10, 2)),
        ItemSpec::apple(at(3, 5)),
        ItemSpec::poison(at(4, 4)),
        ItemSpec::poison(at(3, 8)),
        ItemSpec::reverse(at(13, 13)),
    ];
    let hard_items = vec![
        ItemSpec::apple(at(8, 8)),
        ItemSpec::apple(at(10, 2)),
        ItemSpec::apple(at(3, 5)),
        ItemSpec::poison(at(4, 4)),
        ItemSpec::poison(at(3, 8)),
        ItemSpec::reverse(at(6, 1)),
        ItemSpec::reverse(at(13, 13)),
    ];

    vec![
        Level {
            name: "Easy".to_string(),
            walls: WallMode::Wrap,
            speed: 8,
            items: easy_items.clone(),
            goal: LevelGoal::Length(6),
        },
        Level {
            name: "Easy, walled".to_string(),
            walls: WallMode::Solid,
            speed: 8,
            items: easy_items,
            goal: LevelGoal::Length(12),
        },
        Level {
            name: "Medium".to_string(),
            walls: WallMode::Wrap,
            speed: 8,
            items: medium_items.clone(),
            goal: LevelGoal::Length(18),
        },
        Level {
            name: "Medium, walled".to_string(),
            walls: WallMode::Solid,
            speed: 8,
            items: medium_items,
            goal: LevelGoal::Length(24),
        },
        Level {
            name: "Hard".to_string(),
            walls: WallMode::Wrap,
            speed: 12,
            items: hard_items.clone(),
            goal: LevelGoal::Length(30),
        },
        Level {
            name: "Hard, walled".to_string(),
            walls: WallMode::Solid,
            speed: 12,
            items: hard_items,
            goal: LevelGoal::Endless,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::direction::Direction;

    #[test]
    fn test_length_goal() {
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 3);
        assert!(!LevelGoal::Length(4).is_met(&snake));
        assert!(LevelGoal::Length(3).is_met(&snake));
        assert!(LevelGoal::Length(2).is_met(&snake));
    }

    #[test]
    fn test_endless_goal_never_met() {
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 100);
        assert!(!LevelGoal::Endless.is_met(&snake));
    }

    #[test]
    fn test_classic_respects_config() {
        let config = GameConfig {
            walls: false,
            speed: 15,
            ..Default::default()
        };

        let levels = classic(&config);

        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].walls, WallMode::Wrap);
        assert_eq!(levels[0].speed, 15);
        assert_eq!(levels[0].goal, LevelGoal::Endless);
        assert_eq!(levels[0].items.len(), 1);
        assert_eq!(levels[0].items[0].spawn, Spawn::Anywhere);
    }

    #[test]
    fn test_campaign_shape() {
        let levels = campaign();

        assert_eq!(levels.len(), 6);
        // Walls alternate, open stage first
        for pair in levels.chunks(2) {
            assert_eq!(pair[0].walls, WallMode::Wrap);
            assert_eq!(pair[1].walls, WallMode::Solid);
        }
        // Goals rise by six per stage until the endless finale
        let goals: Vec<LevelGoal> = levels.iter().map(|l| l.goal).collect();
        assert_eq!(
            goals,
            vec![
                LevelGoal::Length(6),
                LevelGoal::Length(12),
                LevelGoal::Length(18),
                LevelGoal::Length(24),
                LevelGoal::Length(30),
                LevelGoal::Endless,
            ]
        );
        // The last pair runs half again as fast
        assert!(levels[..4].iter().all(|l| l.speed == 8));
        assert!(levels[4..].iter().all(|l| l.speed == 12));
    }

    #[test]
    fn test_campaign_fits_minimum_grid() {
        for level in campaign() {
            for spec in &level.items {
                let Spawn::At(pos) = spec.spawn else {
                    panic!("campaign placements are fixed");
                };
                assert!(pos.x >= 0 && (pos.x as usize) < CAMPAIGN_MIN_GRID);
                assert!(pos.y >= 0 && (pos.y as usize) < CAMPAIGN_MIN_GRID);
            }
        }
    }
}
