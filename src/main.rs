use std::fs::File;
use std::io;
use std::panic;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Parser;
use maze_snake::config::GameConfig;
use maze_snake::game::GameStatus;
use maze_snake::input::GameInput;
use maze_snake::lifecycle::Game;
use maze_snake::renderer;
use maze_snake::terminal_runtime::{self, TerminalSession};

/// Longest wait for input between two frames.
const FRAME_BUDGET: Duration = Duration::from_millis(16);

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Config file to load instead of the per-user default.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for maze and item generation.
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file. `RUST_LOG` sets the filter.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    if let Some(path) = cli.log_file.as_deref() {
        init_logging(path)?;
    }

    let mut config = GameConfig::load(cli.config.as_deref()).map_err(io::Error::other)?;
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    install_panic_hook();
    run(config)
}

fn run(mut config: GameConfig) -> io::Result<()> {
    let mut session = TerminalSession::enter()?;

    let configured_px = config.viewport_px;
    let size = session.terminal_mut().size()?;
    let mut board_tiles = renderer::board_tiles_for(size.width, size.height);
    let viewport_px = fit_viewport_px(configured_px, board_tiles, config.grid_size_px);
    config.viewport_px = Some(viewport_px);
    log::info!(
        "starting on a {}x{} terminal with a {viewport_px}px viewport",
        size.width,
        size.height
    );

    let mut game = Game::from_config(&config);

    loop {
        let size = session.terminal_mut().size()?;
        let tiles = renderer::board_tiles_for(size.width, size.height);
        if tiles != board_tiles {
            board_tiles = tiles;
            let viewport_px = fit_viewport_px(configured_px, tiles, game.state().grid_size_px());
            game.state_mut().set_viewport_px(viewport_px);
            log::info!("resized; next board uses a {viewport_px}px viewport");
        }

        session
            .terminal_mut()
            .draw(|frame| renderer::render(frame, game.state()))?;

        let timeout = game
            .scheduler()
            .time_until_due(Instant::now())
            .map_or(FRAME_BUDGET, |due| due.min(FRAME_BUDGET));

        if let Some(input) = terminal_runtime::poll_input(timeout)? {
            match input {
                GameInput::Quit => break,
                GameInput::Direction(direction) => {
                    game.handle_direction_input(direction);
                }
                GameInput::Code(key) => {
                    if let Some(level) = game.enter_password_key(key) {
                        log::info!("code accepted for level {level}");
                    }
                }
                GameInput::Restart => {
                    if game.state().status == GameStatus::GameOver {
                        game.reset();
                    }
                }
            }
        }

        if let Some(handle) = game.scheduler_mut().poll_due(Instant::now()) {
            game.on_timer(handle);
        }
    }

    log::info!(
        "quit on level {} with score {}",
        game.state().level,
        game.state().score
    );
    Ok(())
}

/// Configured viewport capped to what the terminal can show.
fn fit_viewport_px(configured_px: Option<u32>, board_tiles: u16, grid_size_px: u32) -> u32 {
    let fit_px = u32::from(board_tiles) * grid_size_px;
    configured_px.map_or(fit_px, |px| px.min(fit_px))
}

fn init_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let _ = terminal_runtime::restore_terminal();
        default_hook(panic_info);
    }));
}
