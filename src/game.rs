use std::time::Duration;

use crate::config::{
    DEFAULT_VIEWPORT_PX, FALLBACK_TILE_COUNT, GameConfig, MANUAL_RESUME_LEVEL, RAINBOW_HUE_STEP,
    SELF_GRAZE_GUARD, SPAWN_COORDINATE,
};
use crate::generator::{generate_items, generate_maze, spawn_on_tick};
use crate::grid::{Maze, Position, SpatialGrid, Topology};
use crate::input::Direction;
use crate::item::{ItemKind, Items};
use crate::powerup::{PowerUpKind, PowerUps};
use crate::random::RandomSource;
use crate::snake::Snake;
use crate::speed;

/// Current high-level gameplay state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    /// Waiting for a direction key.
    Idle,
    Running,
    /// Ticker restarted after a respawn; the next fire resumes play.
    Respawning,
    /// Lost on level 1. Only a reset leaves this state.
    GameOver,
}

impl GameStatus {
    #[must_use]
    pub fn is_running(self) -> bool {
        self == Self::Running
    }
}

/// What the snake ran into.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DeathReason {
    Boundary,
    Wall,
    SelfCollision,
    Trail,
}

impl DeathReason {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Boundary => "left the arena",
            Self::Wall => "hit a wall",
            Self::SelfCollision => "bit itself",
            Self::Trail => "crossed its trail",
        }
    }
}

/// Result of one tick, for the controller to act on.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TickOutcome {
    /// The game was not running; nothing changed.
    Skipped,
    /// The tick completed. `reschedule` is set when the tick interval changed.
    Advanced { reschedule: bool },
    /// A self-collision was absorbed without moving.
    Grazed,
    /// Collision; no movement was committed.
    Crashed(DeathReason),
    /// The last pellet was eaten.
    LevelComplete,
}

/// Result of [`GameState::game_over`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameOverOutcome {
    /// Dropped back to `level`. `resume` says whether the ticker restarts.
    Respawned { level: u32, resume: bool },
    /// Lost on level 1.
    Ended,
}

/// Complete mutable game state for one session.
#[derive(Debug, Clone)]
pub struct GameState {
    pub snake: Snake,
    pub maze: Maze,
    pub items: Items,
    /// Every head position left behind on this level, oldest first.
    pub trail: Vec<Position>,
    pub score: u32,
    pub level: u32,
    pub status: GameStatus,
    pub power_ups: PowerUps,
    /// Cosmetic hue in degrees, advanced every tick.
    pub rainbow_hue: f32,
    pub death_reason: Option<DeathReason>,
    grid_size_px: u32,
    viewport_px: u32,
    tile_count: usize,
    base_speed_ms: u64,
    spatial: SpatialGrid,
}

impl GameState {
    /// Creates a level-1 session from `config`, idle until the first input.
    pub fn new<R: RandomSource + ?Sized>(config: &GameConfig, rng: &mut R) -> Self {
        let mut state = Self {
            snake: Snake::new(Position::new(0, 0)),
            maze: Maze::open(0),
            items: Items::default(),
            trail: Vec::new(),
            score: 0,
            level: 1,
            status: GameStatus::Idle,
            power_ups: PowerUps::default(),
            rainbow_hue: 0.0,
            death_reason: None,
            grid_size_px: config.grid_size_px,
            viewport_px: config.viewport_px.unwrap_or(DEFAULT_VIEWPORT_PX),
            tile_count: FALLBACK_TILE_COUNT,
            base_speed_ms: config.base_speed_ms,
            spatial: SpatialGrid::default(),
        };
        state.reset(rng);
        state
    }

    /// Returns to level 1 with a one-segment snake and no score.
    pub fn reset<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        self.recompute_tile_count();
        self.level = 1;
        self.score = 0;
        self.snake = Snake::new(self.spawn_point());
        self.trail.clear();
        self.power_ups.clear();
        self.status = GameStatus::Idle;
        self.death_reason = None;
        self.regenerate_level(rng);
    }

    /// Advances simulation by one gameplay tick.
    pub fn tick<R: RandomSource + ?Sized>(&mut self, rng: &mut R, now_ms: f64) -> TickOutcome {
        if !self.status.is_running() {
            return TickOutcome::Skipped;
        }

        self.rainbow_hue = (self.rainbow_hue + RAINBOW_HUE_STEP) % 360.0;
        self.spatial
            .refresh(&self.maze, self.snake.segments(), &self.trail);

        if self.snake.heading().is_none() {
            return TickOutcome::Advanced {
                reschedule: self.advance_power_ups(now_ms),
            };
        }

        let shielded = self.power_ups.is_active(PowerUpKind::Mushroom);
        let topology = self.topology();

        let mut head = self.snake.next_head_position();
        if !head.is_within(self.tile_count) {
            if topology == Topology::Bounded && !shielded {
                return self.crash(DeathReason::Boundary);
            }
            head = head.wrapped(self.tile_count);
        }

        if !shielded {
            if self.maze.is_wall(head, topology) {
                return self.crash(DeathReason::Wall);
            }
            if let Some(index) = self.snake.body_hit_index(head) {
                if index < self.snake.len().saturating_sub(SELF_GRAZE_GUARD) {
                    self.graze(rng);
                    return TickOutcome::Grazed;
                }
                return self.crash(DeathReason::SelfCollision);
            }
            if self.trail.contains(&head) {
                return self.crash(DeathReason::Trail);
            }
        }

        self.trail.push(self.snake.head());
        self.snake.push_head(head);

        let mut grew = false;
        let mut reschedule = false;
        for kind in ItemKind::ALL {
            if !self.items.take(kind, head) {
                continue;
            }
            match kind.power_up() {
                None => {
                    self.score = self.score.saturating_add(self.power_ups.pellet_points());
                    reschedule = true;
                }
                Some(power_up) => {
                    self.power_ups.activate(power_up, now_ms);
                    reschedule |= power_up.affects_speed() || kind.grows_snake();
                }
            }
            grew |= kind.grows_snake();
        }

        reschedule |= self.advance_power_ups(now_ms);

        if !grew {
            self.snake.pop_tail();
        }

        if self.items.pellets.is_empty() {
            return TickOutcome::LevelComplete;
        }

        self.spawn_power_ups(rng);
        TickOutcome::Advanced { reschedule }
    }

    /// Moves on to the next level: a fresh board, a two-segment stationary
    /// snake and no trail. Running effects carry over.
    pub fn level_up<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        self.recompute_tile_count();
        self.level = self.level.saturating_add(1);
        self.snake = Snake::level_start(self.spawn_point());
        self.trail.clear();
        self.status = GameStatus::Idle;
        self.death_reason = None;
        self.regenerate_level(rng);
        log::info!("level {} (score {})", self.level, self.score);
    }

    /// Applies the collision penalty.
    ///
    /// Above level 1 the player drops a level with half the score and half
    /// the snake, on a fresh board with no effects. Below the manual-resume
    /// level the heading is kept and play resumes on the next tick; from
    /// there on the snake waits for input.
    pub fn game_over<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> GameOverOutcome {
        if self.level <= 1 {
            self.status = GameStatus::GameOver;
            log::info!("game over with score {}", self.score);
            return GameOverOutcome::Ended;
        }

        self.recompute_tile_count();
        self.level -= 1;
        self.score /= 2;

        let length = (self.snake.len() / 2).max(1);
        self.snake = Snake::laid_out(
            self.spawn_point(),
            self.snake.heading(),
            length,
            self.tile_count,
        );
        self.trail.clear();
        self.power_ups.clear();
        self.regenerate_level(rng);
        self.items.clear_power_ups();

        let resume = self.level < MANUAL_RESUME_LEVEL;
        if resume {
            self.status = GameStatus::Respawning;
        } else {
            self.snake.halt();
            self.status = GameStatus::Idle;
        }

        log::info!(
            "respawned on level {} with length {} and score {}",
            self.level,
            self.snake.len(),
            self.score
        );
        GameOverOutcome::Respawned {
            level: self.level,
            resume,
        }
    }

    /// Rebuilds maze, items and the occupancy cache for the current level
    /// and tile count.
    pub fn regenerate_level<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        self.maze = generate_maze(self.tile_count, self.level, self.spawn_point(), rng);
        self.items = generate_items(&self.maze, self.level, &self.snake, rng);
        self.spatial
            .refresh(&self.maze, self.snake.segments(), &self.trail);
    }

    /// Derives the board size from the viewport. Takes effect on the next
    /// regeneration.
    pub fn recompute_tile_count(&mut self) {
        let count = self.viewport_px.checked_div(self.grid_size_px).unwrap_or(0);
        self.tile_count = match usize::try_from(count) {
            Ok(0) | Err(_) => FALLBACK_TILE_COUNT,
            Ok(count) => count,
        };
    }

    /// Sets the viewport edge used by the next regeneration.
    pub fn set_viewport_px(&mut self, viewport_px: u32) {
        self.viewport_px = viewport_px;
    }

    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.tile_count
    }

    #[must_use]
    pub fn grid_size_px(&self) -> u32 {
        self.grid_size_px
    }

    /// Tile the snake starts from on every new board.
    #[must_use]
    pub fn spawn_point(&self) -> Position {
        let half = i32::try_from(self.tile_count / 2).unwrap_or(SPAWN_COORDINATE);
        let coordinate = SPAWN_COORDINATE.min(half);
        Position::new(coordinate, coordinate)
    }

    #[must_use]
    pub fn topology(&self) -> Topology {
        Topology::for_level(self.level)
    }

    /// Interval the ticker should run at right now.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        speed::tick_interval(
            self.base_speed_ms,
            self.snake.len(),
            self.level,
            self.power_ups.speed_multiplier(),
        )
    }

    fn crash(&mut self, reason: DeathReason) -> TickOutcome {
        self.death_reason = Some(reason);
        log::info!("level {}: snake {}", self.level, reason.label());
        TickOutcome::Crashed(reason)
    }

    fn graze<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        if self.snake.revert_heading() {
            return;
        }
        let direction = Direction::ALL[rng.index(Direction::ALL.len())];
        self.snake.set_heading(direction);
        self.snake.truncate(self.snake.len().saturating_sub(1));
    }

    fn advance_power_ups(&mut self, now_ms: f64) -> bool {
        self.power_ups
            .advance(now_ms)
            .into_iter()
            .any(PowerUpKind::affects_speed)
    }

    fn spawn_power_ups<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        for kind in PowerUpKind::ALL {
            if let Some(position) = spawn_on_tick(
                kind,
                self.level,
                &self.spatial,
                &self.snake,
                &self.items,
                self.tile_count,
                rng,
            ) {
                log::debug!("{} appeared at ({}, {})", kind.label(), position.x, position.y);
                self.items.of_mut(ItemKind::from_power_up(kind)).push(position);
            }
        }
    }
}
