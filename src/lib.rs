//! Maze-chase simulation core.

pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod game;
pub mod input;
pub mod logging;
pub mod map;
pub mod session;
pub mod systems;
