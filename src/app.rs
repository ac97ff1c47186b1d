use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes},
};

use crate::config::AppConfig;
use crate::error::{AppError, StartupError};
use crate::gfx::rendering::{Overlay, RenderEngine};
use crate::input::PointerState;
use crate::performance::PerformanceMonitor;
use crate::ui::{debug_panel, PanelState, UiManager};
use crate::world::Grid;

/// Interactive cell world: one window, one grid, one frame per tick
pub struct PixelSandApp {
    event_loop: EventLoop<()>,
    app_state: AppState,
}

struct AppState {
    config: AppConfig,
    grid: Grid,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    pointer: PointerState,
    monitor: PerformanceMonitor,
    panel: PanelState,
    /// First fatal error; stops the loop and is returned from `run`
    error: Option<AppError>,
}

impl PixelSandApp {
    /// Creates the application and its grid in the initial band layout
    ///
    /// # Errors
    /// Invalid configuration, or no event loop could be created.
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        config.validate()?;
        let event_loop = EventLoop::new()?;

        let grid = Grid::new(config.grid_width, config.grid_height);
        let panel = PanelState::new(
            config.brush,
            Default::default(),
            (config.grid_width, config.grid_height),
            config.vsync,
        );

        Ok(Self {
            event_loop,
            app_state: AppState {
                config,
                grid,
                window: None,
                render_engine: None,
                ui_manager: None,
                pointer: PointerState::new(),
                monitor: PerformanceMonitor::new(),
                panel,
                error: None,
            },
        })
    }

    /// Runs the event loop until the window closes or a fatal error occurs
    pub fn run(mut self) -> Result<(), AppError> {
        self.event_loop.set_control_flow(ControlFlow::Poll);
        self.event_loop.run_app(&mut self.app_state)?;

        match self.app_state.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        log::error!("{}", err);
        if self.error.is_none() {
            self.error = Some(err);
        }
        event_loop.exit();
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<(), StartupError> {
        let attributes = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ));
        let window = Arc::new(event_loop.create_window(attributes)?);

        let renderer = pollster::block_on(RenderEngine::new(window.clone(), &self.config))?;

        let mut ui_manager = UiManager::new(
            renderer.device(),
            renderer.queue(),
            renderer.surface_format(),
            &window,
        );
        let (width, height) = renderer.surface_size();
        ui_manager.update_display_size(width, height);

        self.panel.palette = *renderer.palette();
        self.panel.grid_size = renderer.grid_size();
        self.ui_manager = Some(ui_manager);
        self.render_engine = Some(renderer);
        self.window = Some(window);
        log::info!(
            "started {}x{} world",
            self.config.grid_width,
            self.config.grid_height
        );
        Ok(())
    }

    /// One frame tick: paint, build the UI, apply its edits, render
    fn tick(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = self.window.clone() else {
            return;
        };
        self.monitor.begin_frame();

        let ui_wants_mouse = self
            .ui_manager
            .as_ref()
            .is_some_and(|ui_manager| ui_manager.wants_mouse());
        if !ui_wants_mouse {
            let grid_size = (self.grid.width(), self.grid.height());
            if let Some((x, y)) = self.pointer.paint_target(window.inner_size(), grid_size) {
                match self.grid.write(x, y, self.panel.brush) {
                    Ok(()) => log::trace!("painted {:?} at ({}, {})", self.panel.brush, x, y),
                    Err(err) => log::debug!("ignored pointer write: {}", err),
                }
            }
        }

        if let Some(ui_manager) = self.ui_manager.as_mut() {
            let monitor = &self.monitor;
            let panel = &mut self.panel;
            ui_manager.update_logic(&window, |ui| debug_panel(ui, monitor, panel));
        }
        if std::mem::take(&mut self.panel.reset_requested) {
            self.grid.reset();
            log::info!("world reset");
        }

        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };
        if render_engine.palette() != &self.panel.palette {
            render_engine.set_palette(self.panel.palette);
        }
        if render_engine.vsync() != self.panel.vsync {
            render_engine.set_vsync(self.panel.vsync);
        }

        let overlay = self
            .ui_manager
            .as_mut()
            .map(|ui_manager| ui_manager as &mut dyn Overlay);
        match render_engine.render_frame(&self.grid, overlay) {
            Ok(()) => self.monitor.end_frame(),
            Err(err) if err.is_recoverable() => {
                log::warn!("skipping frame: {}", err);
                self.monitor.skip_frame();
            }
            Err(err) => self.fail(event_loop, err.into()),
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.error.is_some() {
            return;
        }

        if let Err(err) = self.start(event_loop) {
            self.fail(event_loop, err.into());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };

        // Button releases must reach the pointer even when the UI captures them
        let pointer_event = self.pointer.handle_event(&event);

        if let Some(ui_manager) = self.ui_manager.as_mut() {
            let ui_event: winit::event::Event<()> = winit::event::Event::WindowEvent {
                window_id,
                event: event.clone(),
            };
            if ui_manager.handle_input(&window, &ui_event) && pointer_event {
                window.request_redraw();
                return;
            }
        }

        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                event_loop.exit();
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    ui_manager.update_display_size(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.tick(event_loop);
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.ui_manager = None;
        if let Some(render_engine) = self.render_engine.take() {
            render_engine.teardown();
        }
        self.window = None;
    }
}
