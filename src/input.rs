//! Pointer input sampling
//!
//! Collects the latest cursor position and primary button state from winit
//! window events, and maps the window-space sample onto grid coordinates once
//! per frame tick.

use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, MouseButton, WindowEvent};

/// Latest pointer sample
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PointerState {
    pub position: Option<PhysicalPosition<f64>>,
    pub pressed: bool,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds a window event into the sample. Returns true if the event was a
    /// pointer event.
    pub fn handle_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.position = Some(*position);
                true
            }
            WindowEvent::CursorLeft { .. } => {
                self.position = None;
                true
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.pressed = *state == ElementState::Pressed;
                true
            }
            WindowEvent::Focused(false) => {
                self.pressed = false;
                false
            }
            _ => false,
        }
    }

    /// Grid cell under the pointer while the primary button is held.
    pub fn paint_target(
        &self,
        window_size: PhysicalSize<u32>,
        grid_size: (u32, u32),
    ) -> Option<(u32, u32)> {
        if !self.pressed {
            return None;
        }
        window_to_grid(self.position?, window_size, grid_size)
    }
}

/// Maps a window pixel onto the grid cell displayed under it.
///
/// The composite quad stretches the grid over the whole surface, so the
/// mapping is a per-axis scale. Samples left of or above the window are
/// rejected here; samples past the right or bottom edge map to coordinates
/// `>= width`/`>= height` and are rejected by [`crate::world::Grid::write`].
///
/// # Arguments
/// * `position` - Pointer position in physical window pixels
/// * `window_size` - Current drawable size in physical pixels
/// * `grid_size` - `(width, height)` of the grid in cells
pub fn window_to_grid(
    position: PhysicalPosition<f64>,
    window_size: PhysicalSize<u32>,
    grid_size: (u32, u32),
) -> Option<(u32, u32)> {
    if window_size.width == 0 || window_size.height == 0 {
        return None;
    }
    if !(position.x >= 0.0 && position.y >= 0.0) {
        return None;
    }

    let (grid_width, grid_height) = grid_size;
    let x = (position.x * grid_width as f64 / window_size.width as f64).floor();
    let y = (position.y * grid_height as f64 / window_size.height as f64).floor();

    // Saturating casts; anything this large is out of bounds anyway.
    Some((x.min(u32::MAX as f64) as u32, y.min(u32::MAX as f64) as u32))
}
