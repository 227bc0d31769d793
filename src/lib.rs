//! Conway's Game of Life
//!
//! This library provides a bounded 2D cell grid with geometric operations
//! (crop, merge, rotate), a double-buffered world advancing the grid by the
//! automaton's rules, and ascii/binary file codecs plus a small zoo of
//! well-known patterns.

pub mod error;
pub mod grid;
pub mod world;
pub mod zoo;

pub use error::{Error, Result};
pub use grid::{Cell, Grid};
pub use world::World;
pub use zoo::{
    glider, light_weight_spaceship, load_ascii, load_binary, r_pentomino, save_ascii, save_binary,
};
