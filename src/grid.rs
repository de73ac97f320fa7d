use crate::config::TOROIDAL_LEVEL;

/// Grid position in tile coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns true when the position lies on a `tile_count`-wide square board.
    #[must_use]
    pub fn is_within(self, tile_count: usize) -> bool {
        let limit = i32::try_from(tile_count).unwrap_or(i32::MAX);
        self.x >= 0 && self.y >= 0 && self.x < limit && self.y < limit
    }

    /// Returns this position wrapped onto the board on both axes.
    #[must_use]
    pub fn wrapped(self, tile_count: usize) -> Self {
        let limit = i32::try_from(tile_count).unwrap_or(i32::MAX);
        Self {
            x: wrap_axis(self.x, limit),
            y: wrap_axis(self.y, limit),
        }
    }

    /// Returns the position moved by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    fn index(self, tile_count: usize) -> Option<usize> {
        if !self.is_within(tile_count) {
            return None;
        }
        let x = usize::try_from(self.x).ok()?;
        let y = usize::try_from(self.y).ok()?;
        Some(y * tile_count + x)
    }
}

fn wrap_axis(value: i32, upper_bound: i32) -> i32 {
    if upper_bound <= 0 {
        return value;
    }
    value.rem_euclid(upper_bound)
}

/// Edge behaviour of the board.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Topology {
    /// Walled arena; leaving the board is a collision.
    Bounded,
    /// Open edges; leaving one side re-enters on the other.
    Toroidal,
}

impl Topology {
    #[must_use]
    pub fn for_level(level: u32) -> Self {
        if level >= TOROIDAL_LEVEL {
            Self::Toroidal
        } else {
            Self::Bounded
        }
    }
}

/// Static content of one maze cell.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Tile {
    Open,
    Wall,
}

/// Square wall layout addressed by `(x, y)`, stored row-major.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Maze {
    tile_count: usize,
    tiles: Vec<Tile>,
}

impl Maze {
    /// Creates a maze with no walls at all.
    #[must_use]
    pub fn open(tile_count: usize) -> Self {
        Self {
            tile_count,
            tiles: vec![Tile::Open; tile_count * tile_count],
        }
    }

    /// Creates a maze whose outer ring is wall.
    #[must_use]
    pub fn bordered(tile_count: usize) -> Self {
        let mut maze = Self::open(tile_count);
        let last = i32::try_from(tile_count).unwrap_or(i32::MAX) - 1;
        for i in 0..=last {
            maze.set_wall(Position::new(i, 0));
            maze.set_wall(Position::new(i, last));
            maze.set_wall(Position::new(0, i));
            maze.set_wall(Position::new(last, i));
        }
        maze
    }

    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.tile_count
    }

    /// Returns the tile at `position`, or `None` off the board.
    #[must_use]
    pub fn tile(&self, position: Position) -> Option<Tile> {
        position
            .index(self.tile_count)
            .and_then(|index| self.tiles.get(index).copied())
    }

    /// Wall lookup. Off-board positions count as wall on a bounded board and
    /// are wrapped on a toroidal one.
    #[must_use]
    pub fn is_wall(&self, position: Position, topology: Topology) -> bool {
        let position = match topology {
            Topology::Bounded => position,
            Topology::Toroidal => position.wrapped(self.tile_count),
        };
        self.tile(position).is_none_or(|tile| tile == Tile::Wall)
    }

    pub fn set_wall(&mut self, position: Position) {
        if let Some(index) = position.index(self.tile_count) {
            self.tiles[index] = Tile::Wall;
        }
    }

    /// Iterates over every open position in row-major order.
    pub fn open_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.positions()
            .filter(|position| self.tile(*position) == Some(Tile::Open))
    }

    /// Number of wall tiles away from the outer ring.
    #[must_use]
    pub fn interior_wall_count(&self) -> usize {
        let last = i32::try_from(self.tile_count).unwrap_or(i32::MAX) - 1;
        self.positions()
            .filter(|p| p.x > 0 && p.y > 0 && p.x < last && p.y < last)
            .filter(|p| self.tile(*p) == Some(Tile::Wall))
            .count()
    }

    fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        let limit = i32::try_from(self.tile_count).unwrap_or(i32::MAX);
        (0..limit).flat_map(move |y| (0..limit).map(move |x| Position::new(x, y)))
    }
}

/// Cell marker in the per-tick occupancy cache.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Occupancy {
    Open,
    Wall,
    Snake,
    Trail,
}

/// Occupancy cache derived from the maze, snake and trail.
///
/// It is refreshed at the start of every tick and never treated as the source
/// of truth; a cache whose shape no longer matches the maze is rebuilt.
#[derive(Debug, Clone, Default)]
pub struct SpatialGrid {
    tile_count: usize,
    cells: Vec<Occupancy>,
}

impl SpatialGrid {
    /// Rewrites every cell from the maze, then marks trail and snake.
    pub fn refresh<'a>(
        &mut self,
        maze: &Maze,
        snake: impl IntoIterator<Item = &'a Position>,
        trail: &[Position],
    ) {
        let tile_count = maze.tile_count();
        if self.tile_count != tile_count || self.cells.len() != tile_count * tile_count {
            log::debug!("rebuilding spatial grid for {tile_count}x{tile_count} board");
            self.tile_count = tile_count;
            self.cells = vec![Occupancy::Open; tile_count * tile_count];
        }

        for (cell, tile) in self.cells.iter_mut().zip(&maze.tiles) {
            *cell = match tile {
                Tile::Open => Occupancy::Open,
                Tile::Wall => Occupancy::Wall,
            };
        }

        for position in trail {
            self.mark(*position, Occupancy::Trail);
        }
        for position in snake {
            self.mark(*position, Occupancy::Snake);
        }
    }

    /// Returns the cached marker, or `None` off the board.
    #[must_use]
    pub fn get(&self, position: Position) -> Option<Occupancy> {
        position
            .index(self.tile_count)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Returns true for an on-board cell holding no wall, snake or trail.
    #[must_use]
    pub fn is_vacant(&self, position: Position) -> bool {
        self.get(position) == Some(Occupancy::Open)
    }

    fn mark(&mut self, position: Position, occupancy: Occupancy) {
        if let Some(cell) = position
            .index(self.tile_count)
            .and_then(|index| self.cells.get_mut(index))
        {
            *cell = occupancy;
        }
    }
}
