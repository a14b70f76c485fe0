use std::collections::VecDeque;

/// A heading on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Get the 180-degree reversal of this heading
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Check if turning from this heading to another is a 180-degree turn
    pub fn is_opposite(self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
                | (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
        )
    }

    /// Get the (dx, dy) unit step in screen coordinates (y grows downward)
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Bound on buffered intents; excess input is dropped rather than replayed
/// long after it was typed.
const MAX_PENDING: usize = 2;

/// Steering intents waiting for upcoming ticks
///
/// A small FIFO so that "up then left" rolled within a single tick turns
/// the snake twice over the next two ticks. Intents equal to the effective
/// heading are coalesced away, intents opposite to it are rejected (they
/// would fold the snake onto its own neck by the time they apply), and
/// depth is capped at [`MAX_PENDING`].
///
/// The effective heading is the newest queued intent, falling back to the
/// snake's live heading while the queue is empty.
#[derive(Debug, Clone, Default)]
pub struct DirectionQueue {
    pending: VecDeque<Direction>,
}

impl DirectionQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self {
            pending: VecDeque::with_capacity(MAX_PENDING),
        }
    }

    /// Buffer an intent, validating it against the effective heading
    ///
    /// `current` is the snake's live heading. Redundant, reversing, or
    /// overflowing intents are dropped silently; a key press is not an
    /// error.
    pub fn push(&mut self, intent: Direction, current: Direction) {
        let effective = self.pending.back().copied().unwrap_or(current);
        if intent == effective || intent.is_opposite(effective) {
            return;
        }
        if self.pending.len() >= MAX_PENDING {
            return;
        }
        self.pending.push_back(intent);
    }

    /// Remove and return the oldest intent, if any
    pub fn pop(&mut self) -> Option<Direction> {
        self.pending.pop_front()
    }

    /// Drop all pending intents
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
