use super::direction::Direction;

/// A cell on the game grid
///
/// Coordinates are signed so that a step off the board is representable;
/// whether that step wraps or kills is the caller's decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Create a new position
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Get the neighboring cell one step away in a direction
    ///
    /// The result may lie outside the grid; see [`Grid::contains`] and
    /// [`Grid::wrap`].
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Board dimensions and coordinate rules
///
/// Immutable once built; every coordinate question (in bounds? wrapped
/// where?) is answered here so the snake itself never needs to know how
/// big the world is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
}

impl Grid {
    /// Create a grid with the given dimensions
    pub fn new(width: usize, height: usize) -> Self {
        debug_assert!(width > 0 && height > 0, "grid needs at least one cell");
        Self { width, height }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Check if a position lies within the board
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width as i32 && pos.y >= 0 && pos.y < self.height as i32
    }

    /// Map any position back onto the board, modulo both axes
    ///
    /// `rem_euclid` keeps negative coordinates positive, so stepping left
    /// from column 0 lands on the last column rather than at -1.
    pub fn wrap(&self, pos: Position) -> Position {
        Position {
            x: pos.x.rem_euclid(self.width as i32),
            y: pos.y.rem_euclid(self.height as i32),
        }
    }

    /// The middle cell, rounded toward the origin on even dimensions
    pub fn center(&self) -> Position {
        Position::new(self.width as i32 / 2, self.height as i32 / 2)
    }

    /// Iterate over all cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Position> {
        let width = self.width as i32;
        let height = self.height as i32;
        (0..height).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }
}

/// Board topology: what happens when the snake crosses the border
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallMode {
    /// Crossing the border is a fatal collision
    Solid,
    /// The board is a torus; crossing re-enters from the opposite edge
    Wrap,
}
