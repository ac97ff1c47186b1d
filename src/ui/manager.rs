//! ImGui overlay manager
//!
//! Handles ImGui integration with wgpu and winit: frame timing, input
//! capture, and appending the UI's draw commands to the frame's render scope.

use imgui::{Context, FontConfig, FontSource, MouseCursor};
use imgui_wgpu::{Renderer, RendererConfig};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use std::time::Instant;
use wgpu::{Device, Queue, RenderPass, TextureFormat};
use winit::{
    event::{Event, WindowEvent},
    window::Window,
};

use crate::gfx::rendering::Overlay;

/// ImGui UI manager
///
/// Owns the ImGui context, platform integration and renderer. A frame is
/// built with [`UiManager::update_logic`] and drawn when the frame pipeline
/// calls [`Overlay::record`]; recording without a built frame draws nothing.
pub struct UiManager {
    pub context: Context,
    platform: WinitPlatform,
    renderer: Renderer,
    last_frame: Instant,
    last_cursor: Option<MouseCursor>,
    frame_ready: bool,
}

impl UiManager {
    /// Creates a new UI manager
    ///
    /// # Arguments
    /// * `device` - WGPU device for creating renderer resources
    /// * `queue` - WGPU queue for renderer operations
    /// * `output_color_format` - Format of the render scope the UI draws into
    /// * `window` - Window for platform integration
    pub fn new(
        device: &Device,
        queue: &Queue,
        output_color_format: TextureFormat,
        window: &Window,
    ) -> Self {
        let mut context = Context::create();
        context.set_ini_filename(None);

        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(context.io_mut(), window, HiDpiMode::Locked(1.0));

        let font_size = 18.0;
        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: font_size,
                ..Default::default()
            }),
        }]);

        let renderer_config = RendererConfig {
            texture_format: output_color_format,
            ..Default::default()
        };
        let renderer = Renderer::new(&mut context, device, queue, renderer_config);

        Self {
            context,
            platform,
            renderer,
            last_frame: Instant::now(),
            last_cursor: None,
            frame_ready: false,
        }
    }

    /// Updates ImGui's display size to match the surface
    pub fn update_display_size(&mut self, width: u32, height: u32) {
        self.context.io_mut().display_size = [width as f32, height as f32];
    }

    /// Whether the UI currently wants pointer input for itself
    pub fn wants_mouse(&self) -> bool {
        self.context.io().want_capture_mouse
    }

    /// Feeds a window event to ImGui and returns whether the UI captured it
    pub fn handle_input<T>(&mut self, window: &Window, event: &Event<T>) -> bool {
        match event {
            Event::WindowEvent {
                event: window_event,
                ..
            } => match window_event {
                WindowEvent::CursorMoved { .. }
                | WindowEvent::MouseInput { .. }
                | WindowEvent::MouseWheel { .. }
                | WindowEvent::KeyboardInput { .. }
                | WindowEvent::ModifiersChanged(_)
                | WindowEvent::Focused(_) => {
                    self.platform
                        .handle_event(self.context.io_mut(), window, event);

                    let io = self.context.io();
                    io.want_capture_mouse || io.want_capture_keyboard
                }
                _ => false,
            },
            _ => false,
        }
    }

    /// Builds this tick's UI and returns whether it wants input capture
    ///
    /// If the platform cannot prepare a frame the UI is skipped for this tick
    /// and nothing is drawn.
    pub fn update_logic<F>(&mut self, window: &Window, run_ui: F) -> bool
    where
        F: FnOnce(&imgui::Ui),
    {
        let now = Instant::now();
        self.context
            .io_mut()
            .update_delta_time(now - self.last_frame);
        self.last_frame = now;

        if let Err(err) = self.platform.prepare_frame(self.context.io_mut(), window) {
            log::warn!("skipping UI frame: {}", err);
            return false;
        }

        let ui = start_frame(&mut self.context, &mut self.frame_ready);
        run_ui(ui);

        if self.last_cursor != ui.mouse_cursor() {
            self.last_cursor = ui.mouse_cursor();
            self.platform.prepare_render(ui, window);
        }

        let io = self.context.io();
        io.want_capture_mouse || io.want_capture_keyboard
    }
}

/// Starts an ImGui frame and marks it open.
///
/// A frame built on a tick whose render was skipped is still open; ImGui
/// aborts if a new one starts before it is rendered, so it is closed and
/// its draw data dropped first.
fn start_frame<'ctx>(context: &'ctx mut Context, frame_open: &mut bool) -> &'ctx mut imgui::Ui {
    if std::mem::replace(frame_open, true) {
        context.render();
        log::trace!("dropped undrawn UI frame");
    }
    context.frame()
}

impl Overlay for UiManager {
    fn record<'pass>(&'pass mut self, device: &Device, queue: &Queue, pass: &mut RenderPass<'pass>) {
        if !std::mem::take(&mut self.frame_ready) {
            return;
        }

        let draw_data = self.context.render();
        if draw_data.display_size[0] <= 0.0 || draw_data.display_size[1] <= 0.0 {
            return;
        }

        if let Err(err) = self.renderer.render(draw_data, queue, device, pass) {
            log::warn!("failed to record UI draw commands: {:?}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headless_context() -> Context {
        let mut context = Context::create();
        context.set_ini_filename(None);
        context.io_mut().display_size = [640.0, 480.0];
        context.io_mut().delta_time = 1.0 / 60.0;
        context.fonts().build_rgba32_texture();
        context
    }

    #[test]
    fn test_skipped_render_does_not_block_next_frame() {
        let mut context = headless_context();
        let mut frame_open = false;

        start_frame(&mut context, &mut frame_open).text("skipped");
        assert!(frame_open);

        // the surface was not acquired, so nothing rendered this frame
        let ui = start_frame(&mut context, &mut frame_open);
        ui.text("next");
        assert!(frame_open);

        let draw_data = context.render();
        assert_eq!(draw_data.display_size, [640.0, 480.0]);
    }

    #[test]
    fn test_first_frame_starts_without_render() {
        let mut context = headless_context();
        let mut frame_open = false;

        start_frame(&mut context, &mut frame_open);
        assert!(frame_open);
        context.render();
    }
}
