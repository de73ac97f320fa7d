use std::collections::HashSet;

use proptest::prelude::*;

use maze_snake::config::GameConfig;
use maze_snake::game::{GameState, GameStatus, TickOutcome};
use maze_snake::generator::{generate_maze, generate_pellets};
use maze_snake::grid::{Maze, Position, Tile, Topology};
use maze_snake::input::Direction;
use maze_snake::item::Items;
use maze_snake::lifecycle::Game;
use maze_snake::powerup::{PowerUpKind, PowerUpTimer};
use maze_snake::random::ScriptedRandom;
use maze_snake::snake::Snake;
use maze_snake::timing::{ManualClock, ManualScheduler};

type TestGame = Game<ScriptedRandom, ManualClock, ManualScheduler>;

fn twenty_tile_config() -> GameConfig {
    GameConfig {
        viewport_px: Some(400),
        ..GameConfig::default()
    }
}

fn new_game() -> (TestGame, ManualClock) {
    let clock = ManualClock::new(0.0);
    let game = Game::new(
        &twenty_tile_config(),
        ScriptedRandom::constant(0.5),
        clock.clone(),
        ManualScheduler::new(),
    );
    (game, clock)
}

/// Level-1 board with only the border and one far pellet, snake heading
/// right from the spawn tile.
fn staged_game(extra: impl FnOnce(&mut Items)) -> (TestGame, ManualClock) {
    let (mut game, clock) = new_game();
    let state = game.state_mut();
    state.maze = Maze::bordered(20);
    state.items = Items {
        pellets: vec![Position::new(18, 18)],
        ..Items::default()
    };
    extra(&mut state.items);
    game.handle_direction_input(Direction::Right);
    (game, clock)
}

fn fire(game: &mut TestGame) -> Option<TickOutcome> {
    let (handle, _) = game.scheduler().armed()?;
    game.on_timer(handle)
}

#[test]
fn level_one_maze_is_an_empty_walled_box() {
    let mut rng = ScriptedRandom::constant(0.5);
    let maze = generate_maze(20, 1, Position::new(10, 10), &mut rng);

    for y in 0..20 {
        for x in 0..20 {
            let border = x == 0 || y == 0 || x == 19 || y == 19;
            let expected = if border { Tile::Wall } else { Tile::Open };
            assert_eq!(maze.tile(Position::new(x, y)), Some(expected), "({x}, {y})");
        }
    }
}

#[test]
fn level_four_maze_gets_an_interior_wall() {
    let mut rng = ScriptedRandom::new([0.2, 0.2, 0.5, 0.7]);
    let maze = generate_maze(20, 4, Position::new(10, 10), &mut rng);

    assert_eq!(maze.interior_wall_count(), 3);
    assert!(maze.is_wall(Position::new(4, 4), Topology::Bounded));
    assert!(maze.is_wall(Position::new(6, 4), Topology::Bounded));
}

#[test]
fn pellet_counts_follow_the_level_formula() {
    let maze = Maze::bordered(20);
    let head = Position::new(10, 10);
    let snake = Snake::new(head);

    let level_one = generate_pellets(&maze, 1, &snake, &mut ScriptedRandom::constant(0.3));
    let level_five = generate_pellets(&maze, 5, &snake, &mut ScriptedRandom::constant(0.3));

    assert_eq!(level_one.len(), 1);
    assert_eq!(level_five.len(), 5);
    assert!(!level_five.contains(&head));
}

#[test]
fn reset_returns_to_a_fresh_idle_level_one() {
    let (mut game, _) = staged_game(|items| items.pellets.push(Position::new(11, 10)));
    fire(&mut game);
    game.state_mut().level = 7;

    game.reset();

    let state = game.state();
    assert_eq!(state.snake.len(), 1);
    assert_eq!(state.score, 0);
    assert_eq!(state.level, 1);
    assert!(!state.status.is_running());
    assert!(state.trail.is_empty());
    assert_eq!(game.scheduler().armed(), None);
}

#[test]
fn pellet_pickup_scores_grows_and_removes_the_pellet() {
    let (mut game, _) = staged_game(|items| items.pellets.push(Position::new(11, 10)));

    fire(&mut game);

    let state = game.state();
    assert_eq!(state.score, 10);
    assert_eq!(state.snake.len(), 2);
    assert!(!state.items.pellets.contains(&Position::new(11, 10)));
}

#[test]
fn pellet_pickup_under_star_scores_double() {
    let (mut game, _) = staged_game(|items| {
        items.stars.push(Position::new(11, 10));
        items.pellets.push(Position::new(12, 10));
    });

    fire(&mut game);
    fire(&mut game);

    assert_eq!(game.state().score, 20);
    assert_eq!(game.state().snake.len(), 2);
}

#[test]
fn wall_crash_above_level_one_drops_a_level() {
    let (mut game, _) = new_game();
    {
        let state = game.state_mut();
        state.level = 4;
        state.score = 91;
        state.maze = Maze::bordered(20);
        state.maze.set_wall(Position::new(11, 10));
        state.items = Items {
            pellets: vec![Position::new(18, 18)],
            ..Items::default()
        };
        state.snake = Snake::laid_out(Position::new(10, 10), None, 5, 20);
    }
    game.handle_direction_input(Direction::Right);

    fire(&mut game);

    let state = game.state();
    assert!(!state.status.is_running());
    assert_eq!(state.status, GameStatus::Respawning);
    assert_eq!(state.score, 45);
    assert_eq!(state.level, 3);
    assert_eq!(state.snake.len(), 2);
}

#[test]
fn mushroom_pickup_grows_even_alongside_a_pellet() {
    let (mut game, _) = staged_game(|items| {
        items.mushrooms.push(Position::new(11, 10));
        items.pellets.push(Position::new(11, 10));
    });

    fire(&mut game);

    let state = game.state();
    let timer = state.power_ups.timer(PowerUpKind::Mushroom);
    assert!(timer.active);
    assert_eq!(timer.timer_ms, 8000.0);
    assert_eq!(state.snake.len(), 2);
    assert_eq!(state.score, 10);
}

#[test]
fn countdown_expires_on_the_wall_clock() {
    let mut timer = PowerUpTimer::default();
    timer.activate(8000.0, 0.0);

    timer.advance(2000.0);
    timer.advance(4000.0);
    assert_eq!(timer.timer_ms, 4000.0);
    assert!(timer.active);

    timer.advance(9000.0);
    assert!(!timer.active);
    assert_eq!(timer.timer_ms, 0.0);
}

#[test]
fn toroidal_levels_wrap_every_edge() {
    let starts = [
        (Position::new(19, 7), Direction::Right, Position::new(0, 7)),
        (Position::new(0, 7), Direction::Left, Position::new(19, 7)),
        (Position::new(7, 0), Direction::Up, Position::new(7, 19)),
        (Position::new(7, 19), Direction::Down, Position::new(7, 0)),
    ];

    for (start, heading, expected) in starts {
        let mut rng = ScriptedRandom::constant(0.5);
        let mut state = GameState::new(&twenty_tile_config(), &mut rng);
        state.level = 1000;
        state.maze = Maze::open(20);
        state.items = Items {
            pellets: vec![Position::new(12, 12)],
            ..Items::default()
        };
        state.snake = Snake::from_segments(vec![start], Some(heading));
        state.status = GameStatus::Running;

        let outcome = state.tick(&mut rng, 0.0);

        assert_eq!(outcome, TickOutcome::Advanced { reschedule: false });
        assert_eq!(state.snake.head(), expected);
    }
}

proptest! {
    #[test]
    fn respawn_bodies_never_overlap(
        len in 1usize..400,
        heading in prop::option::of(prop::sample::select(Direction::ALL.to_vec())),
    ) {
        let snake = Snake::laid_out(Position::new(10, 10), heading, len, 20);
        let unique: HashSet<Position> = snake.segments().copied().collect();

        prop_assert_eq!(snake.len(), len);
        prop_assert_eq!(unique.len(), len);
        prop_assert!(snake.segments().all(|segment| segment.is_within(20)));
    }

    #[test]
    fn generated_walls_stay_inside_and_off_spawn(level in 4u32..2000, seed in any::<u64>()) {
        use rand::SeedableRng;

        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let spawn = Position::new(10, 10);
        let maze = generate_maze(20, level, spawn, &mut rng);

        prop_assert!(!maze.is_wall(spawn, Topology::Bounded));
        if Topology::for_level(level) == Topology::Toroidal {
            prop_assert_eq!(maze.tile(Position::new(0, 0)), Some(Tile::Open));
        }
    }
}
