//! Debug panel
//!
//! Frame statistics, brush selection, palette editing and world reset.

use crate::gfx::stages::Palette;
use crate::performance::PerformanceMonitor;
use crate::world::Cell;

/// Values the panel edits; the application applies them after the UI runs
#[derive(Debug, Clone)]
pub struct PanelState {
    pub brush: Cell,
    pub palette: Palette,
    pub grid_size: (u32, u32),
    pub vsync: bool,
    /// Set for one tick when "Reset world" is clicked
    pub reset_requested: bool,
}

impl PanelState {
    pub fn new(brush: Cell, palette: Palette, grid_size: (u32, u32), vsync: bool) -> Self {
        Self {
            brush,
            palette,
            grid_size,
            vsync,
            reset_requested: false,
        }
    }
}

/// Draws the debug panel
///
/// # Arguments
/// * `ui` - ImGui UI context
/// * `monitor` - Frame timing to display
/// * `state` - Brush, palette, vsync and reset request edited in place
pub fn debug_panel(ui: &imgui::Ui, monitor: &PerformanceMonitor, state: &mut PanelState) {
    let display_size = ui.io().display_size;
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return;
    }

    ui.window("PixelSand")
        .size([320.0, 0.0], imgui::Condition::FirstUseEver)
        .position([10.0, 10.0], imgui::Condition::FirstUseEver)
        .collapsible(true)
        .build(|| {
            render_frame_stats(ui, monitor, state.grid_size);
            ui.checkbox("VSync", &mut state.vsync);
            ui.separator();
            render_brush_selector(ui, &mut state.brush);
            if ui.button("Reset world") {
                state.reset_requested = true;
            }
            if ui.collapsing_header("Palette", imgui::TreeNodeFlags::empty()) {
                render_palette_editor(ui, &mut state.palette);
            }
        });
}

fn render_frame_stats(ui: &imgui::Ui, monitor: &PerformanceMonitor, grid_size: (u32, u32)) {
    let metrics = monitor.metrics();
    ui.text(format!(
        "Average {:.3} ms/frame ({:.1} FPS)",
        metrics.frame_time_ms, metrics.fps
    ));
    ui.text(format!(
        "  Min {:.2} ms  Max {:.2} ms",
        metrics.min_frame_time_ms, metrics.max_frame_time_ms
    ));
    ui.text(format!("Grid: {} x {}", grid_size.0, grid_size.1));
    ui.text(format!(
        "Frames: {} rendered, {} skipped",
        metrics.frames_rendered, metrics.frames_skipped
    ));

    let history = monitor.frame_time_history();
    if !history.is_empty() {
        ui.plot_lines("##frame_times", &history)
            .graph_size([290.0, 50.0])
            .scale_min(0.0)
            .scale_max(50.0)
            .build();
    }
}

fn render_brush_selector(ui: &imgui::Ui, brush: &mut Cell) {
    let names: Vec<&str> = Cell::ALL.iter().map(|cell| cell.name()).collect();
    let mut selected = brush.index();
    if ui.combo_simple_string("Brush", &mut selected, &names) {
        if let Some(cell) = Cell::from_index(selected) {
            *brush = cell;
        }
    }
}

fn render_palette_editor(ui: &imgui::Ui, palette: &mut Palette) {
    for cell in Cell::ALL {
        let mut color = palette.color_of(cell).map(|c| c as f32 / 255.0);
        if ui.color_edit4(cell.name(), &mut color) {
            palette.set_color(cell, color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8));
        }
    }
}
