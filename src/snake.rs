use std::collections::VecDeque;

use crate::grid::Position;
use crate::input::{Direction, direction_change_is_valid};

/// Snake body and heading.
///
/// The body is ordered head first and never empty. A `None` heading is the
/// stationary `(0, 0)` delta the snake has before the first input of a level.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Position>,
    heading: Option<Direction>,
    previous_heading: Option<Direction>,
}

impl Snake {
    /// Creates a stationary one-cell snake at `start`.
    #[must_use]
    pub fn new(start: Position) -> Self {
        Self::from_segments(vec![start], None)
    }

    /// Creates a snake from explicit body segments (front is head).
    ///
    /// An empty list is replaced by a single segment at the origin.
    #[must_use]
    pub fn from_segments(segments: Vec<Position>, heading: Option<Direction>) -> Self {
        let mut body = VecDeque::from(segments);
        if body.is_empty() {
            body.push_back(Position::new(0, 0));
        }

        Self {
            body,
            heading,
            previous_heading: None,
        }
    }

    /// Two-segment stationary body used at the start of every new level.
    #[must_use]
    pub fn level_start(spawn: Position) -> Self {
        Self::from_segments(vec![spawn, spawn.offset(-1, 0)], None)
    }

    /// Lays `len` segments out behind `spawn`, away from `heading`.
    ///
    /// The line wraps around the board and moves over one row every
    /// `tile_count` segments, so no two segments share a tile for any length
    /// up to the board area.
    #[must_use]
    pub fn laid_out(
        spawn: Position,
        heading: Option<Direction>,
        len: usize,
        tile_count: usize,
    ) -> Self {
        let (back_x, back_y) = heading.map_or((-1, 0), |d| d.opposite().delta());
        let (side_x, side_y) = if back_y == 0 { (0, 1) } else { (1, 0) };
        let row_len = tile_count.max(1);

        let segments = (0..len.max(1))
            .map(|i| {
                let along = i32::try_from(i % row_len).unwrap_or(0);
                let row = i32::try_from(i / row_len).unwrap_or(0);
                let position = spawn
                    .offset(back_x * along, back_y * along)
                    .offset(side_x * row, side_y * row);
                if tile_count == 0 {
                    position
                } else {
                    position.wrapped(tile_count)
                }
            })
            .collect();

        Self::from_segments(segments, heading)
    }

    /// Turns onto `direction` when the move is legal. Returns whether the
    /// heading changed.
    pub fn steer(&mut self, direction: Direction) -> bool {
        if !direction_change_is_valid(self.heading, direction) {
            return false;
        }

        self.previous_heading = self.heading;
        self.heading = Some(direction);
        true
    }

    /// Stops the snake and forgets its previous heading.
    pub fn halt(&mut self) {
        self.heading = None;
        self.previous_heading = None;
    }

    /// Restores the heading held before the last turn. Only works once per
    /// turn; returns false when there is nothing to restore.
    pub fn revert_heading(&mut self) -> bool {
        match self.previous_heading.take() {
            Some(previous) => {
                self.heading = Some(previous);
                true
            }
            None => false,
        }
    }

    /// Forces a heading without the perpendicular rule.
    pub fn set_heading(&mut self, direction: Direction) {
        self.previous_heading = self.heading;
        self.heading = Some(direction);
    }

    #[must_use]
    pub fn heading(&self) -> Option<Direction> {
        self.heading
    }

    #[must_use]
    pub fn previous_heading(&self) -> Option<Direction> {
        self.previous_heading
    }

    /// Returns the current `(dx, dy)`, `(0, 0)` while stationary.
    #[must_use]
    pub fn delta(&self) -> (i32, i32) {
        self.heading.map_or((0, 0), Direction::delta)
    }

    /// Returns the unwrapped head position for the next movement tick.
    #[must_use]
    pub fn next_head_position(&self) -> Position {
        let (dx, dy) = self.delta();
        self.head().offset(dx, dy)
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        *self
            .body
            .front()
            .expect("snake body must always contain at least one segment")
    }

    /// Adds a new head segment.
    pub fn push_head(&mut self, position: Position) {
        self.body.push_front(position);
    }

    /// Drops the tail segment unless it is the only one.
    pub fn pop_tail(&mut self) {
        if self.body.len() > 1 {
            let _ = self.body.pop_back();
        }
    }

    /// Shortens the body to `len` segments, keeping at least the head.
    pub fn truncate(&mut self, len: usize) {
        self.body.truncate(len.max(1));
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Returns the index of the first non-head segment at `position`.
    #[must_use]
    pub fn body_hit_index(&self, position: Position) -> Option<usize> {
        self.body
            .iter()
            .skip(1)
            .position(|segment| *segment == position)
            .map(|index| index + 1)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false; kept for the `len` convention.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::input::Direction;

    use super::{Position, Snake};

    #[test]
    fn new_snake_is_stationary_single_segment() {
        let snake = Snake::new(Position::new(5, 5));

        assert_eq!(snake.len(), 1);
        assert_eq!(snake.heading(), None);
        assert_eq!(snake.delta(), (0, 0));
        assert_eq!(snake.next_head_position(), Position::new(5, 5));
    }

    #[test]
    fn steer_rejects_reverse_and_records_previous_heading() {
        let mut snake = Snake::new(Position::new(5, 5));

        assert!(snake.steer(Direction::Up));
        assert!(!snake.steer(Direction::Down));
        assert!(snake.steer(Direction::Left));

        assert_eq!(snake.heading(), Some(Direction::Left));
        assert_eq!(snake.previous_heading(), Some(Direction::Up));
    }

    #[test]
    fn revert_heading_works_once() {
        let mut snake = Snake::new(Position::new(5, 5));
        snake.steer(Direction::Up);
        snake.steer(Direction::Right);

        assert!(snake.revert_heading());
        assert_eq!(snake.heading(), Some(Direction::Up));
        assert!(!snake.revert_heading());
    }

    #[test]
    fn body_hit_index_ignores_head() {
        let snake = Snake::from_segments(
            vec![
                Position::new(2, 2),
                Position::new(1, 2),
                Position::new(1, 3),
            ],
            Some(Direction::Right),
        );

        assert_eq!(snake.body_hit_index(Position::new(2, 2)), None);
        assert_eq!(snake.body_hit_index(Position::new(1, 3)), Some(2));
    }

    #[test]
    fn pop_tail_never_removes_the_head() {
        let mut snake = Snake::new(Position::new(1, 1));
        snake.pop_tail();
        assert_eq!(snake.len(), 1);

        snake.push_head(Position::new(2, 1));
        snake.pop_tail();
        assert_eq!(snake.head(), Position::new(2, 1));
        assert_eq!(snake.len(), 1);
    }

    #[test]
    fn level_start_body_extends_left_of_spawn() {
        let snake = Snake::level_start(Position::new(10, 10));
        let segments: Vec<_> = snake.segments().copied().collect();

        assert_eq!(segments, vec![Position::new(10, 10), Position::new(9, 10)]);
        assert_eq!(snake.heading(), None);
    }

    #[test]
    fn laid_out_body_trails_away_from_heading() {
        let snake = Snake::laid_out(Position::new(5, 5), Some(Direction::Left), 3, 20);
        let segments: Vec<_> = snake.segments().copied().collect();

        assert_eq!(
            segments,
            vec![
                Position::new(5, 5),
                Position::new(6, 5),
                Position::new(7, 5)
            ]
        );
    }

    #[test]
    fn long_laid_out_body_never_repeats_a_tile() {
        let snake = Snake::laid_out(Position::new(3, 3), Some(Direction::Down), 40, 8);
        let unique: HashSet<_> = snake.segments().copied().collect();

        assert_eq!(snake.len(), 40);
        assert_eq!(unique.len(), 40);
        assert!(snake.segments().all(|p| p.is_within(8)));
    }
}
