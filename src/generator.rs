//! Level content: wall layout, pellets and power-up items.
//!
//! Every function reads randomness from a [`RandomSource`] so a level can be
//! replayed from a fixed sequence. None of them check that the result is
//! solvable; a wall may seal pellets off from the snake.

use crate::config::MAX_PLACEMENT_ATTEMPTS;
use crate::grid::{Maze, Position, SpatialGrid, Topology};
use crate::item::{ItemKind, Items};
use crate::powerup::PowerUpKind;
use crate::random::{RandomSource, shuffle};
use crate::snake::Snake;

const MAX_WALL_LENGTH: usize = 5;

/// Number of interior walls attempted on `level`.
#[must_use]
pub fn internal_wall_count(level: u32) -> u32 {
    if level < 4 {
        return 0;
    }

    let mut count = (level - 3).min(10);
    if level >= 500 {
        count += ((level - 500) / 20).min(15);
    }
    if level >= 1500 {
        count += ((level - 1500) / 1000).min(15);
    }
    if level >= 5000 {
        count += ((level - 5000) / 1000).min(15);
    }
    count
}

/// Number of pellets placed on `level`, before capping at the open tiles.
#[must_use]
pub fn pellet_target(level: u32) -> usize {
    let level = f64::from(level.max(1));

    let mut target = 1.0 + (level.min(10.0) - 1.0);
    if level > 10.0 {
        target += ((level - 10.0).min(10.0) - 1.0) / 2.0;
    }
    if level > 20.0 {
        target += ((level - 20.0).min(480.0) - 1.0) / 10.0;
    }
    target.floor() as usize
}

/// Builds the wall layout for `level`.
///
/// Levels below the toroidal threshold get a solid outer ring. Interior walls
/// are straight runs of one to five tiles; a run that leaves the interior,
/// overlaps a wall or covers `spawn` is redrawn, and a wall that finds no
/// spot within the attempt budget is dropped.
pub fn generate_maze<R: RandomSource + ?Sized>(
    tile_count: usize,
    level: u32,
    spawn: Position,
    rng: &mut R,
) -> Maze {
    let mut maze = match Topology::for_level(level) {
        Topology::Bounded => Maze::bordered(tile_count),
        Topology::Toroidal => Maze::open(tile_count),
    };

    let span = tile_count.saturating_sub(2);
    if span == 0 {
        return maze;
    }
    let last_interior = i32::try_from(span).unwrap_or(i32::MAX);

    for wall in 0..internal_wall_count(level) {
        let mut placed = false;

        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let wall_x = i32::try_from(rng.index(span)).unwrap_or(0) + 1;
            let wall_y = i32::try_from(rng.index(span)).unwrap_or(0) + 1;
            let length = rng.index(MAX_WALL_LENGTH) + 1;
            let horizontal = rng.next_f64() > 0.5;

            let segments: Vec<Position> = (0..i32::try_from(length).unwrap_or(1))
                .map(|i| {
                    if horizontal {
                        Position::new(wall_x + i, wall_y)
                    } else {
                        Position::new(wall_x, wall_y + i)
                    }
                })
                .collect();

            let fits = segments.iter().all(|segment| {
                (1..=last_interior).contains(&segment.x)
                    && (1..=last_interior).contains(&segment.y)
                    && !maze.is_wall(*segment, Topology::Bounded)
                    && *segment != spawn
            });

            if fits {
                for segment in segments {
                    maze.set_wall(segment);
                }
                placed = true;
                break;
            }
        }

        if !placed {
            log::debug!("level {level}: gave up placing wall {wall}");
        }
    }

    maze
}

/// Places the pellets for `level` on open tiles the snake does not cover.
///
/// At least one pellet is placed whenever a free tile exists.
pub fn generate_pellets<R: RandomSource + ?Sized>(
    maze: &Maze,
    level: u32,
    snake: &Snake,
    rng: &mut R,
) -> Vec<Position> {
    let head = snake.head();
    let mut candidates: Vec<Position> = maze
        .open_positions()
        .filter(|position| *position != head)
        .collect();
    shuffle(&mut candidates, rng);
    candidates.retain(|position| !snake.occupies(*position));

    candidates.truncate(pellet_target(level).max(1));
    candidates
}

/// Level-start placement for one power-up kind.
///
/// Gated by the kind's level floor and its per-level chance. Mushrooms come
/// in batches of `floor(r * min(1 + level / 5, 4))`, the other kinds singly.
/// Tiles already holding the snake or any item are skipped.
pub fn generate_power_up_items<R: RandomSource + ?Sized>(
    kind: PowerUpKind,
    maze: &Maze,
    level: u32,
    snake: &Snake,
    items: &Items,
    rng: &mut R,
) -> Vec<Position> {
    if level < kind.min_level() || !rng.chance(kind.level_spawn_chance()) {
        return Vec::new();
    }

    let head = snake.head();
    let mut candidates: Vec<Position> = maze
        .open_positions()
        .filter(|position| *position != head)
        .collect();
    shuffle(&mut candidates, rng);

    let count = match kind {
        PowerUpKind::Mushroom => {
            let cap = (1.0 + f64::from(level) / 5.0).min(4.0);
            (rng.next_f64() * cap).floor() as usize
        }
        _ => 1,
    };

    candidates
        .into_iter()
        .filter(|position| !snake.occupies(*position) && !items.is_occupied(*position))
        .take(count)
        .collect()
}

/// Generates the full item set for a freshly built maze.
pub fn generate_items<R: RandomSource + ?Sized>(
    maze: &Maze,
    level: u32,
    snake: &Snake,
    rng: &mut R,
) -> Items {
    let mut items = Items {
        pellets: generate_pellets(maze, level, snake, rng),
        ..Items::default()
    };

    for kind in PowerUpKind::ALL {
        let placed = generate_power_up_items(kind, maze, level, snake, &items, rng);
        items.of_mut(ItemKind::from_power_up(kind)).extend(placed);
    }

    items
}

/// Rolls the per-tick chance for `kind` and, on a hit, probes random tiles
/// for one that is vacant in `spatial`, off the snake and free of items.
pub fn spawn_on_tick<R: RandomSource + ?Sized>(
    kind: PowerUpKind,
    level: u32,
    spatial: &SpatialGrid,
    snake: &Snake,
    items: &Items,
    tile_count: usize,
    rng: &mut R,
) -> Option<Position> {
    if level < kind.min_level() || !rng.chance(kind.tick_spawn_chance()) {
        return None;
    }

    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let position = Position::new(
            i32::try_from(rng.index(tile_count)).unwrap_or(0),
            i32::try_from(rng.index(tile_count)).unwrap_or(0),
        );
        if spatial.is_vacant(position) && !snake.occupies(position) && !items.is_occupied(position)
        {
            return Some(position);
        }
    }

    log::debug!("no free tile for a {} after {MAX_PLACEMENT_ATTEMPTS} probes", kind.label());
    None
}
