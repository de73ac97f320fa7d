//! Maze snake: a grid snake game with generated mazes, timed power-ups, a
//! trail hazard and level codes.
//!
//! The simulation core (`game`, `lifecycle` and the modules they build on)
//! is free of I/O. Randomness, time and tick scheduling come in through the
//! traits in [`random`] and [`timing`]. The terminal front end lives in
//! `renderer`, `terminal_runtime` and `ui`.

pub mod config;
pub mod game;
pub mod generator;
pub mod grid;
pub mod input;
pub mod item;
pub mod lifecycle;
pub mod password;
pub mod powerup;
pub mod random;
pub mod renderer;
pub mod snake;
pub mod speed;
pub mod terminal_runtime;
pub mod timing;
pub mod ui;
