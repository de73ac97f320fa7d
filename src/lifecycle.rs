//! Session controller: owns the state, the random source, the clock and the
//! tick schedule, and turns tick outcomes into level transitions.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{GameConfig, PASSWORD_SCAN_LIMIT};
use crate::game::{GameOverOutcome, GameState, GameStatus, TickOutcome};
use crate::input::Direction;
use crate::password::PasswordEntry;
use crate::random::RandomSource;
use crate::timing::{Clock, IntervalScheduler, MonotonicClock, Scheduler, TimerHandle};

/// One game session.
///
/// At most one tick schedule is armed at a time. Every change of interval
/// cancels the old schedule before arming the new one, and a fire from any
/// handle other than the armed one is dropped.
#[derive(Debug)]
pub struct Game<R = StdRng, C = MonotonicClock, S = IntervalScheduler> {
    state: GameState,
    rng: R,
    clock: C,
    scheduler: S,
    ticker: Option<TimerHandle>,
    password: PasswordEntry,
}

impl Game {
    /// Session on the wall clock with a polled scheduler. Seeds from
    /// `config.seed`, or from entropy when unset.
    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(config, rng, MonotonicClock::new(), IntervalScheduler::new())
    }
}

impl<R: RandomSource, C: Clock, S: Scheduler> Game<R, C, S> {
    /// Builds a level-1 session, idle until the first direction input.
    pub fn new(config: &GameConfig, mut rng: R, clock: C, scheduler: S) -> Self {
        let state = GameState::new(config, &mut rng);
        Self {
            state,
            rng,
            clock,
            scheduler,
            ticker: None,
            password: PasswordEntry::default(),
        }
    }

    /// Cancels the ticker and starts over on level 1.
    pub fn reset(&mut self) {
        self.disarm();
        self.state.reset(&mut self.rng);
        self.password.reset();
        log::info!("new game");
    }

    /// Starts the tick loop. Does nothing while running or after a final
    /// game over.
    pub fn start(&mut self) {
        match self.state.status {
            GameStatus::Running | GameStatus::GameOver => return,
            GameStatus::Idle | GameStatus::Respawning => {}
        }

        self.state.status = GameStatus::Running;
        if self.ticker.is_none() {
            self.rearm();
        }
    }

    /// Starts the game if needed, then turns the snake when the turn is
    /// legal. Returns whether the heading changed.
    pub fn handle_direction_input(&mut self, direction: Direction) -> bool {
        if self.state.status == GameStatus::GameOver {
            return false;
        }

        self.start();
        self.state.snake.steer(direction)
    }

    /// Stops the ticker and moves to the next level, which waits for input.
    pub fn level_up(&mut self) {
        self.disarm();
        self.state.level_up(&mut self.rng);
    }

    /// Runs one tick now and handles whatever it produced.
    pub fn tick(&mut self) -> TickOutcome {
        let now_ms = self.clock.now_ms();
        let outcome = self.state.tick(&mut self.rng, now_ms);

        match outcome {
            TickOutcome::Advanced { reschedule: true } => self.rearm(),
            TickOutcome::Crashed(_) => self.game_over(),
            TickOutcome::LevelComplete => self.level_up(),
            TickOutcome::Skipped
            | TickOutcome::Advanced { reschedule: false }
            | TickOutcome::Grazed => {}
        }

        outcome
    }

    /// Entry point for a scheduler fire. Stale handles are ignored; the
    /// first fire after a respawn resumes play.
    pub fn on_timer(&mut self, handle: TimerHandle) -> Option<TickOutcome> {
        if self.ticker != Some(handle) {
            log::debug!("ignoring stale timer {}", handle.id());
            return None;
        }

        if self.state.status == GameStatus::Respawning {
            self.state.status = GameStatus::Running;
        }
        Some(self.tick())
    }

    /// Jumps to `target`, idle on a fresh board. Score and snake length
    /// follow the usual level-up rules.
    pub fn skip_to_level(&mut self, target: u32) {
        self.disarm();
        self.state.level = target.max(1) - 1;
        self.state.level_up(&mut self.rng);
        log::info!("skipped to level {}", self.state.level);
    }

    /// Feeds one typed key to the password buffer. When the recent keys spell
    /// the code of a multiple-of-ten level, jumps there and returns it.
    pub fn enter_password_key(&mut self, key: char) -> Option<u32> {
        self.password.add_key(key);
        let level = self.password.matching_level(PASSWORD_SCAN_LIMIT)?;
        self.password.reset();
        self.skip_to_level(level);
        Some(level)
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable access for hosts and tests that stage a board directly.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Handle of the armed tick schedule.
    #[must_use]
    pub fn ticker(&self) -> Option<TimerHandle> {
        self.ticker
    }

    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    #[must_use]
    pub fn password_entry(&self) -> &PasswordEntry {
        &self.password
    }

    fn game_over(&mut self) {
        self.disarm();
        let outcome = self.state.game_over(&mut self.rng);
        if let GameOverOutcome::Respawned { resume: true, .. } = outcome {
            self.rearm();
        }
    }

    fn rearm(&mut self) {
        self.disarm();
        let interval = self.state.tick_interval();
        log::debug!("tick interval {} ms", interval.as_secs_f64() * 1000.0);
        self.ticker = Some(self.scheduler.schedule(interval));
    }

    fn disarm(&mut self) {
        if let Some(handle) = self.ticker.take() {
            self.scheduler.cancel(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::config::GameConfig;
    use crate::game::{DeathReason, GameStatus, TickOutcome};
    use crate::grid::{Maze, Position};
    use crate::input::Direction;
    use crate::item::Items;
    use crate::password::generate_password;
    use crate::random::ScriptedRandom;
    use crate::snake::Snake;
    use crate::timing::{ManualClock, ManualScheduler, SchedulerEvent};

    use super::Game;

    type TestGame = Game<ScriptedRandom, ManualClock, ManualScheduler>;

    fn test_game() -> (TestGame, ManualClock) {
        let clock = ManualClock::new(0.0);
        let config = GameConfig {
            viewport_px: Some(400),
            ..GameConfig::default()
        };
        let game = Game::new(
            &config,
            ScriptedRandom::constant(0.5),
            clock.clone(),
            ManualScheduler::new(),
        );
        (game, clock)
    }

    fn stage_open_board(game: &mut TestGame) {
        let state = game.state_mut();
        state.maze = Maze::bordered(20);
        state.items = Items {
            pellets: vec![Position::new(18, 18)],
            ..Items::default()
        };
    }

    fn fire(game: &mut TestGame) -> Option<TickOutcome> {
        let (handle, _) = game.scheduler().armed()?;
        game.on_timer(handle)
    }

    #[test]
    fn first_direction_starts_the_ticker() {
        let (mut game, _) = test_game();
        assert_eq!(game.scheduler().armed(), None);

        assert!(game.handle_direction_input(Direction::Right));

        assert_eq!(game.state().status, GameStatus::Running);
        assert_eq!(
            game.scheduler().armed().map(|(_, interval)| interval),
            Some(Duration::from_millis(102))
        );
    }

    #[test]
    fn start_twice_arms_once() {
        let (mut game, _) = test_game();

        game.start();
        game.start();

        assert_eq!(game.scheduler().live_count(), 1);
    }

    #[test]
    fn stale_handle_does_not_tick() {
        let (mut game, _) = test_game();
        stage_open_board(&mut game);
        game.handle_direction_input(Direction::Right);
        let (old, _) = game.scheduler().armed().expect("armed");

        game.state_mut().items.pellets.push(Position::new(11, 10));
        assert!(fire(&mut game).is_some());
        assert_ne!(game.ticker(), Some(old));

        assert_eq!(game.on_timer(old), None);
        assert_eq!(game.state().snake.head(), Position::new(11, 10));
    }

    #[test]
    fn pellet_pickup_rearms_at_the_longer_interval() {
        let (mut game, _) = test_game();
        stage_open_board(&mut game);
        game.state_mut().items.pellets.push(Position::new(11, 10));
        game.handle_direction_input(Direction::Right);
        game.scheduler_mut().clear_events();
        let (first, _) = game.scheduler().armed().expect("armed");

        fire(&mut game);

        let (second, interval) = game.scheduler().armed().expect("re-armed");
        assert_eq!(interval, Duration::from_millis(104));
        assert_eq!(
            game.scheduler().events(),
            &[
                SchedulerEvent::Cancelled(first),
                SchedulerEvent::Armed(second, Duration::from_millis(104)),
            ]
        );
    }

    #[test]
    fn crash_above_level_one_respawns_and_resumes_next_fire() {
        let (mut game, _) = test_game();
        stage_open_board(&mut game);
        game.state_mut().level = 2;
        game.state_mut().score = 50;
        game.state_mut().maze.set_wall(Position::new(11, 10));
        game.handle_direction_input(Direction::Right);

        assert_eq!(
            fire(&mut game),
            Some(TickOutcome::Crashed(DeathReason::Wall))
        );
        assert_eq!(game.state().status, GameStatus::Respawning);
        assert!(!game.state().status.is_running());
        assert_eq!(game.state().level, 1);
        assert_eq!(game.state().score, 25);
        assert_eq!(game.scheduler().live_count(), 1);

        fire(&mut game);
        assert_eq!(game.state().status, GameStatus::Running);
    }

    #[test]
    fn respawn_rearms_at_the_interval_of_the_halved_snake() {
        let (mut game, _) = test_game();
        stage_open_board(&mut game);
        {
            let state = game.state_mut();
            state.level = 3;
            state.snake = Snake::laid_out(Position::new(10, 10), Some(Direction::Right), 8, 20);
            state.maze.set_wall(Position::new(11, 10));
        }
        game.handle_direction_input(Direction::Right);
        assert_eq!(
            game.scheduler().armed().map(|(_, interval)| interval),
            Some(Duration::from_millis(116))
        );

        fire(&mut game);

        assert_eq!(game.state().snake.len(), 4);
        assert_eq!(game.state().status, GameStatus::Respawning);
        assert_eq!(
            game.scheduler().armed().map(|(_, interval)| interval),
            Some(Duration::from_millis(108))
        );
        assert_eq!(game.state().tick_interval(), Duration::from_millis(108));
    }

    #[test]
    fn mushroom_growth_rearms_at_the_interval_the_hud_shows() {
        let (mut game, _) = test_game();
        stage_open_board(&mut game);
        game.state_mut().items.mushrooms.push(Position::new(11, 10));
        game.handle_direction_input(Direction::Right);

        fire(&mut game);

        assert_eq!(game.state().snake.len(), 2);
        assert_eq!(
            game.scheduler().armed().map(|(_, interval)| interval),
            Some(game.state().tick_interval())
        );
        assert_eq!(game.state().tick_interval(), Duration::from_millis(104));
    }

    #[test]
    fn crash_on_level_one_stops_everything() {
        let (mut game, _) = test_game();
        stage_open_board(&mut game);
        game.state_mut().maze.set_wall(Position::new(11, 10));
        game.handle_direction_input(Direction::Right);

        fire(&mut game);

        assert_eq!(game.state().status, GameStatus::GameOver);
        assert_eq!(game.scheduler().live_count(), 0);
        assert!(!game.handle_direction_input(Direction::Up));
        assert_eq!(game.scheduler().live_count(), 0);

        game.reset();
        assert_eq!(game.state().status, GameStatus::Idle);
        assert_eq!(game.state().level, 1);
    }

    #[test]
    fn clearing_the_board_levels_up_and_waits() {
        let (mut game, _) = test_game();
        stage_open_board(&mut game);
        game.state_mut().items.pellets = vec![Position::new(11, 10)];
        game.handle_direction_input(Direction::Right);

        assert_eq!(fire(&mut game), Some(TickOutcome::LevelComplete));

        assert_eq!(game.state().level, 2);
        assert_eq!(game.state().status, GameStatus::Idle);
        assert_eq!(game.state().snake.len(), 2);
        assert_eq!(game.scheduler().live_count(), 0);
    }

    #[test]
    fn power_up_timers_follow_the_clock() {
        let (mut game, clock) = test_game();
        stage_open_board(&mut game);
        game.state_mut().items.stars.push(Position::new(11, 10));
        game.handle_direction_input(Direction::Right);

        clock.set(1000.0);
        fire(&mut game);
        clock.set(4000.0);
        fire(&mut game);

        let star = game
            .state()
            .power_ups
            .timer(crate::powerup::PowerUpKind::Star);
        assert!(star.active);
        assert_eq!(star.timer_ms, 7000.0);
    }

    #[test]
    fn typed_code_skips_to_its_level() {
        let (mut game, _) = test_game();
        game.handle_direction_input(Direction::Right);

        let mut reached = None;
        for key in generate_password(20).to_lowercase().chars() {
            reached = game.enter_password_key(key);
        }

        assert_eq!(reached, Some(20));
        assert_eq!(game.state().level, 20);
        assert_eq!(game.state().status, GameStatus::Idle);
        assert_eq!(game.scheduler().live_count(), 0);
        assert!(game.password_entry().keys().is_empty());
    }
}
