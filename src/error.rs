//! Error types for grid, world, and file format operations

use thiserror::Error;

/// Errors produced by grid operations and the ascii/binary codecs
#[derive(Debug, Error)]
pub enum Error {
    /// A file could not be opened, read, or written
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed ascii or binary grid content
    #[error("malformed grid data: {0}")]
    Format(String),

    /// Coordinate access outside the grid bounds
    #[error("coordinate ({x}, {y}) out of range for {width}x{height} grid")]
    OutOfRange {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    /// An argument that no grid operation can honour, such as inverted crop bounds
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, Error>;
