//! Per-frame device passes
//!
//! Each stage produces exactly one resource consumed by the next:
//!
//! - [`upload`] - grid snapshot -> staging region -> cell buffer
//! - [`compute`] - cell buffer -> color image
//! - [`composite`] - color image -> presentation target
//!
//! Stages hold no handles of their own. Everything they touch is borrowed
//! from [`crate::gfx::resources::DeviceResources`] for the duration of one
//! pass.

pub mod composite;
pub mod compute;
pub mod upload;

pub use compute::{Palette, PaletteUniform};
