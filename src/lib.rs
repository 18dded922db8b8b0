//! **mazegame** is a terminal maze game: maze generation, movement rules, win detection and a
//! level progression driving them.

pub mod cells;
pub mod errors;
pub mod game;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod pathing;
pub mod player;
pub mod units;
pub mod utils;
