//! # User Interface Module
//!
//! Dear ImGui debug overlay. The [`UiManager`] builds the UI each tick and
//! implements [`Overlay`](crate::gfx::rendering::Overlay), so its draw commands
//! land in the frame's render scope after the background quad.
//!
//! ## Input Handling
//!
//! While the UI wants the mouse, pointer presses do not paint the world.

pub mod manager;
pub mod panel;

pub use manager::UiManager;
pub use panel::{debug_panel, PanelState};
