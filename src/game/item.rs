use super::grid::Position;
use super::snake::Snake;

/// What eating an item does to the snake
///
/// A closed set: every effect is a plain method on [`Snake`], so new kinds
/// are added here and nowhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// Grows the snake by one cell
    Apple,
    /// Shrinks the snake by one cell, never below one
    Poison,
    /// Reverses the snake head-to-tail
    Reverse,
}

impl ItemKind {
    /// Apply this item's effect to the snake
    pub fn apply(self, snake: &mut Snake) {
        match self {
            ItemKind::Apple => snake.grow(),
            ItemKind::Poison => snake.shrink(),
            ItemKind::Reverse => snake.reverse(),
        }
    }

    /// Default score value for an item of this kind
    pub fn default_points(self) -> i32 {
        match self {
            ItemKind::Apple => 1,
            ItemKind::Poison | ItemKind::Reverse => 0,
        }
    }
}

/// Where a level item starts out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spawn {
    /// A fixed cell from the level design
    At(Position),
    /// Any free cell, chosen when the game starts or restarts
    Anywhere,
}

/// An item as a level defines it: what it is, where it begins, and how it
/// behaves once eaten
///
/// Specs are templates; the live board holds [`Item`] values materialized
/// from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSpec {
    pub kind: ItemKind,
    pub spawn: Spawn,
    /// Relocate to a fresh cell after being eaten instead of disappearing
    pub respawn: bool,
    /// Score delta on consumption; negative values drain the score, which
    /// bottoms out at zero
    pub points: i32,
}

impl ItemSpec {
    pub fn new(kind: ItemKind, spawn: Spawn) -> Self {
        Self {
            kind,
            spawn,
            respawn: true,
            points: kind.default_points(),
        }
    }

    pub fn apple(spawn: Spawn) -> Self {
        Self::new(ItemKind::Apple, spawn)
    }

    pub fn poison(spawn: Spawn) -> Self {
        Self::new(ItemKind::Poison, spawn)
    }

    pub fn reverse(spawn: Spawn) -> Self {
        Self::new(ItemKind::Reverse, spawn)
    }

    /// Pin this spec to a concrete board cell
    pub fn materialize(self, position: Position) -> Item {
        Item {
            position,
            kind: self.kind,
            respawn: self.respawn,
            points: self.points,
        }
    }
}

/// A consumable cell on the board
///
/// Items are plain values. Consumption never mutates one in place; a
/// respawning item is replaced wholesale by a fresh value at a new cell,
/// and a one-shot item is simply removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item {
    pub position: Position,
    pub kind: ItemKind,
    pub respawn: bool,
    pub points: i32,
}

impl Item {
    /// The same item at a different cell
    pub fn relocated(self, position: Position) -> Self {
        Self { position, ..self }
    }
}
