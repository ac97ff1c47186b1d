//! # World Module
//!
//! The CPU-resident cell world. This is the authoritative copy of every cell
//! state; the graphics side only ever sees snapshots of it.
//!
//! ## Key Components
//!
//! - [`Cell`] - A single material state (stone, dirt, air)
//! - [`Grid`] - Fixed-size row-major array of cells with bounds-checked edits
//!
//! ## Coordinates
//!
//! Index `i` maps to `(i % width, i / width)`. Row 0 is the top of the world,
//! matching window pixel coordinates, so the "bottom" bands live at the end of
//! the array.

pub mod cell;
pub mod grid;

pub use cell::Cell;
pub use grid::Grid;
pub use crate::error::WorldError;
