use std::time::Duration;

use maze_snake::config::GameConfig;
use maze_snake::game::{DeathReason, GameStatus, TickOutcome};
use maze_snake::grid::Position;
use maze_snake::input::Direction;
use maze_snake::item::Items;
use maze_snake::lifecycle::Game;
use maze_snake::random::ScriptedRandom;
use maze_snake::timing::{ManualClock, ManualScheduler};

type TestGame = Game<ScriptedRandom, ManualClock, ManualScheduler>;

fn fire(game: &mut TestGame) -> Option<TickOutcome> {
    let (handle, _) = game.scheduler().armed()?;
    game.on_timer(handle)
}

#[test]
fn stepwise_pellet_collection_and_trail_collision() {
    let clock = ManualClock::new(0.0);
    let config = GameConfig {
        viewport_px: Some(400),
        ..GameConfig::default()
    };
    let mut game = Game::new(
        &config,
        ScriptedRandom::constant(0.5),
        clock.clone(),
        ManualScheduler::new(),
    );
    game.state_mut().items = Items {
        pellets: vec![Position::new(11, 10), Position::new(18, 18)],
        ..Items::default()
    };

    assert!(game.handle_direction_input(Direction::Right));
    assert_eq!(
        game.scheduler().armed().map(|(_, interval)| interval),
        Some(Duration::from_millis(102))
    );

    clock.advance(102.0);
    assert_eq!(
        fire(&mut game),
        Some(TickOutcome::Advanced { reschedule: true })
    );
    assert_eq!(game.state().score, 10);
    assert_eq!(game.state().snake.len(), 2);
    assert_eq!(
        game.scheduler().armed().map(|(_, interval)| interval),
        Some(Duration::from_millis(104))
    );

    let turns = [Direction::Up, Direction::Up, Direction::Left, Direction::Down];
    let heads = [
        Position::new(11, 9),
        Position::new(11, 8),
        Position::new(10, 8),
        Position::new(10, 9),
    ];
    for (turn, expected_head) in turns.into_iter().zip(heads) {
        game.handle_direction_input(turn);
        clock.advance(104.0);
        assert_eq!(
            fire(&mut game),
            Some(TickOutcome::Advanced { reschedule: false })
        );
        assert_eq!(game.state().snake.head(), expected_head);
        assert_eq!(game.state().status, GameStatus::Running);
    }
    assert_eq!(game.state().trail.len(), 5);

    // (11, 9) was visited two moves ago.
    game.handle_direction_input(Direction::Right);
    clock.advance(104.0);
    assert_eq!(
        fire(&mut game),
        Some(TickOutcome::Crashed(DeathReason::Trail))
    );
    assert_eq!(game.state().status, GameStatus::GameOver);
    assert_eq!(game.state().score, 10);
    assert_eq!(game.scheduler().armed(), None);
}
