use std::collections::VecDeque;

use super::direction::{Direction, DirectionQueue};
use super::grid::{Grid, Position, WallMode};

/// What the snake ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    /// The head crossed a solid border
    Wall,
    /// The head landed on the snake's own body
    Body,
}

/// Result of one movement step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The head advanced one cell
    Moved,
    /// The step was fatal; the body was left untouched
    Collided(CollisionKind),
}

/// The snake: an ordered body with the head at the front, a live heading,
/// and the queue of pending turns
///
/// The body is never empty. Movement, growth, and reversal all preserve
/// that invariant, so `head()` and `tail()` are total.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Position>,
    direction: Direction,
    queue: DirectionQueue,
}

impl Snake {
    /// Create a snake of `length` cells with its head at `head`, trailing
    /// away opposite to `direction`
    ///
    /// Length is floored at 1.
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.delta();
        let length = length.max(1);
        let mut body = VecDeque::with_capacity(length);
        for i in 0..length as i32 {
            body.push_back(Position::new(head.x - dx * i, head.y - dy * i));
        }
        Self {
            body,
            direction,
            queue: DirectionQueue::new(),
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        *self.body.front().expect("snake body is never empty")
    }

    /// Get the tail position
    pub fn tail(&self) -> Position {
        *self.body.back().expect("snake body is never empty")
    }

    /// Get the body length in cells
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the body is empty (never true in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Get the current heading
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Iterate over body cells from head to tail
    pub fn segments(&self) -> impl Iterator<Item = Position> + '_ {
        self.body.iter().copied()
    }

    /// Check if any body cell (head included) sits on a position
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Buffer a turn for upcoming ticks
    ///
    /// Validation lives in [`DirectionQueue`]: redundant or reversing
    /// intents are dropped.
    pub fn queue_direction(&mut self, intent: Direction) {
        self.queue.push(intent, self.direction);
    }

    /// Number of buffered turns
    pub fn pending_turns(&self) -> usize {
        self.queue.len()
    }

    /// Advance one cell, consuming at most one queued turn first
    ///
    /// In [`WallMode::Solid`] a step across the border reports
    /// `Collided(Wall)` without moving; in [`WallMode::Wrap`] the head
    /// re-enters from the opposite edge. A new head landing on any body
    /// cell other than the tail cell vacated by this same step reports
    /// `Collided(Body)`. On collision the body is left exactly as it was.
    pub fn advance(&mut self, grid: &Grid, walls: WallMode) -> MoveOutcome {
        if let Some(turn) = self.queue.pop() {
            // Re-validate against the live heading: the queue was filled
            // relative to whatever the heading was at enqueue time.
            if !turn.is_opposite(self.direction) {
                self.direction = turn;
            }
        }

        let mut next = self.head().step(self.direction);
        if !grid.contains(next) {
            match walls {
                WallMode::Solid => return MoveOutcome::Collided(CollisionKind::Wall),
                WallMode::Wrap => next = grid.wrap(next),
            }
        }

        // The tail cell is vacated by this very step, so moving into it is
        // legal; any other body cell is fatal.
        let without_tail = self.body.len() - 1;
        if self.body.iter().take(without_tail).any(|&cell| cell == next) {
            return MoveOutcome::Collided(CollisionKind::Body);
        }

        self.body.push_front(next);
        self.body.pop_back();
        MoveOutcome::Moved
    }

    /// Grow by one cell by duplicating the tail
    ///
    /// The duplicate separates on the next advance, so the visible length
    /// catches up one tick later.
    pub fn grow(&mut self) {
        self.body.push_back(self.tail());
    }

    /// Shrink by one cell from the tail, never below one
    pub fn shrink(&mut self) {
        if self.body.len() > 1 {
            self.body.pop_back();
        }
    }

    /// Reverse the body so the tail becomes the head
    ///
    /// The new heading points from the second cell toward the new head,
    /// away from the body. A one-cell snake (or a freshly grown stack of
    /// duplicate cells) has no geometry to read and simply flips to the
    /// opposite heading. Pending turns are cleared; they were relative to
    /// the old heading.
    pub fn reverse(&mut self) {
        self.queue.clear();
        if self.body.len() > 1 {
            let reversed: VecDeque<Position> = self.body.iter().rev().copied().collect();
            self.body = reversed;
        }
        let head = self.head();
        let second = self.body.iter().copied().find(|&cell| cell != head);
        self.direction = match second {
            Some(second) => heading_between(second, head),
            None => self.direction.opposite(),
        };
    }
}

/// Heading that points from `from` to its neighbor `to`
///
/// A gap wider than one cell means the pair straddles a wrapped edge, so
/// the true step points the other way.
fn heading_between(from: Position, to: Position) -> Direction {
    let mut dx = to.x - from.x;
    let mut dy = to.y - from.y;
    if dx.abs() > 1 {
        dx = -dx.signum();
    }
    if dy.abs() > 1 {
        dy = -dy.signum();
    }
    if dx > 0 {
        Direction::Right
    } else if dx < 0 {
        Direction::Left
    } else if dy > 0 {
        Direction::Down
    } else {
        Direction::Up
    }
}
