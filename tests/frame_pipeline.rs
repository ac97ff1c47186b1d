//! Device-side checks of the frame pipeline.
//!
//! Every test opens a headless device and returns early when the machine has
//! no usable adapter.

use pixelsand::gfx::context::GpuContext;
use pixelsand::gfx::readback::{read_buffer, read_texture_rgba8};
use pixelsand::gfx::rendering::FramePipeline;
use pixelsand::gfx::stages::Palette;
use pixelsand::input::window_to_grid;
use pixelsand::world::{Cell, Grid};
use pixelsand::StartupError;
use rand::Rng;
use winit::dpi::{PhysicalPosition, PhysicalSize};

const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

fn context() -> Option<GpuContext> {
    match GpuContext::headless() {
        Ok(ctx) => Some(ctx),
        Err(err) => {
            eprintln!("skipping device test: {}", err);
            None
        }
    }
}

fn create_target(device: &wgpu::Device, width: u32, height: u32) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Test Target"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: TARGET_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

/// Renders `grid` once and returns the downloaded color image
fn render_color_image(ctx: &GpuContext, pipeline: &FramePipeline, grid: &Grid) -> Vec<u8> {
    let (_target, view) = create_target(&ctx.device, grid.width(), grid.height());
    pipeline
        .submit(&ctx.device, &ctx.queue, grid, &view, None)
        .unwrap();
    read_texture_rgba8(
        &ctx.device,
        &ctx.queue,
        &pipeline.resources().color_image().texture,
    )
    .unwrap()
}

fn assert_pixels_close(actual: &[u8], expected: &[u8]) {
    assert_eq!(actual.len(), expected.len());
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert!(
            a.abs_diff(*e) <= 1,
            "pixel {} channel {}: got {}, expected {}",
            i / 4,
            i % 4,
            a,
            e
        );
    }
}

fn random_edits(grid: &mut Grid, count: usize) {
    let mut rng = rand::rng();
    for _ in 0..count {
        let x = rng.random_range(0..grid.width());
        let y = rng.random_range(0..grid.height());
        let cell = Cell::ALL[rng.random_range(0..Cell::COUNT)];
        grid.write(x, y, cell).unwrap();
    }
}

#[test]
fn test_cell_buffer_matches_grid_after_upload() {
    let Some(ctx) = context() else { return };
    let pipeline = FramePipeline::new(&ctx.device, TARGET_FORMAT, 16, 16).unwrap();
    let mut grid = Grid::new(16, 16);
    random_edits(&mut grid, 40);

    let (_target, view) = create_target(&ctx.device, 16, 16);
    pipeline
        .submit(&ctx.device, &ctx.queue, &grid, &view, None)
        .unwrap();

    let bytes = read_buffer(&ctx.device, &ctx.queue, pipeline.resources().cell_buffer()).unwrap();
    assert_eq!(bytes.as_slice(), grid.as_bytes());
}

#[test]
fn test_cell_buffer_matches_grid_unaligned() {
    let Some(ctx) = context() else { return };
    let pipeline = FramePipeline::new(&ctx.device, TARGET_FORMAT, 21, 13).unwrap();
    let mut grid = Grid::new(21, 13);
    random_edits(&mut grid, 40);
    grid.write(20, 12, Cell::Stone).unwrap();
    grid.write(20, 0, Cell::Dirt).unwrap();

    let (_target, view) = create_target(&ctx.device, 21, 13);
    pipeline
        .submit(&ctx.device, &ctx.queue, &grid, &view, None)
        .unwrap();

    let bytes = read_buffer(&ctx.device, &ctx.queue, pipeline.resources().cell_buffer()).unwrap();
    assert_eq!(bytes.len(), 21 * 13 * 4);
    assert_eq!(bytes.as_slice(), grid.as_bytes());
}

#[test]
fn test_color_image_matches_cpu_reference_aligned() {
    let Some(ctx) = context() else { return };
    let pipeline = FramePipeline::new(&ctx.device, TARGET_FORMAT, 16, 16).unwrap();
    let mut grid = Grid::new(16, 16);
    random_edits(&mut grid, 30);

    let image = render_color_image(&ctx, &pipeline, &grid);
    assert_pixels_close(&image, &Palette::default().shade(grid.snapshot()));
}

#[test]
fn test_color_image_matches_cpu_reference_unaligned() {
    let Some(ctx) = context() else { return };
    let pipeline = FramePipeline::new(&ctx.device, TARGET_FORMAT, 21, 13).unwrap();
    let mut grid = Grid::new(21, 13);
    grid.write(20, 12, Cell::Air).unwrap();
    grid.write(20, 0, Cell::Stone).unwrap();
    grid.write(0, 12, Cell::Dirt).unwrap();

    let image = render_color_image(&ctx, &pipeline, &grid);
    assert_pixels_close(&image, &Palette::default().shade(grid.snapshot()));
}

#[test]
fn test_single_write_changes_single_pixel() {
    let Some(ctx) = context() else { return };
    let pipeline = FramePipeline::new(&ctx.device, TARGET_FORMAT, 16, 16).unwrap();
    let mut grid = Grid::new(16, 16);

    let before = render_color_image(&ctx, &pipeline, &grid);
    grid.write(5, 3, Cell::Stone).unwrap();
    let after = render_color_image(&ctx, &pipeline, &grid);

    let changed: Vec<usize> = before
        .chunks(4)
        .zip(after.chunks(4))
        .enumerate()
        .filter(|(_, (a, b))| a != b)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(changed, vec![3 * 16 + 5]);
}

#[test]
fn test_unchanged_grid_renders_identically() {
    let Some(ctx) = context() else { return };
    let pipeline = FramePipeline::new(&ctx.device, TARGET_FORMAT, 24, 10).unwrap();
    let mut grid = Grid::new(24, 10);
    random_edits(&mut grid, 20);

    let first = render_color_image(&ctx, &pipeline, &grid);
    let second = render_color_image(&ctx, &pipeline, &grid);
    assert_eq!(first, second);
}

#[test]
fn test_composite_shows_image_over_black() {
    let Some(ctx) = context() else { return };
    let pipeline = FramePipeline::new(&ctx.device, TARGET_FORMAT, 16, 16).unwrap();
    let grid = Grid::new(16, 16);

    let (target, view) = create_target(&ctx.device, 16, 16);
    pipeline
        .submit(&ctx.device, &ctx.queue, &grid, &view, None)
        .unwrap();
    let pixels = read_texture_rgba8(&ctx.device, &ctx.queue, &target).unwrap();

    let palette = Palette::default();
    let pixel = |x: usize, y: usize| &pixels[(y * 16 + x) * 4..][..4];
    // Air is transparent, so the opaque clear color shows through
    assert_pixels_close(pixel(4, 0), &[0, 0, 0, 255]);
    assert_pixels_close(pixel(7, 9), &palette.color_of(Cell::Dirt));
    assert_pixels_close(pixel(15, 15), &palette.color_of(Cell::Stone));
}

#[test]
fn test_pointer_write_reaches_color_image_full_size() {
    let Some(ctx) = context() else { return };
    let pipeline = FramePipeline::new(&ctx.device, TARGET_FORMAT, 1920, 1080).unwrap();
    let mut grid = Grid::new(1920, 1080);

    let (x, y) = window_to_grid(
        PhysicalPosition::new(960.0, 950.0),
        PhysicalSize::new(1920, 1080),
        (1920, 1080),
    )
    .unwrap();
    assert_eq!((x, y), (960, 950));
    grid.write(x, y, Cell::Dirt).unwrap();

    let image = render_color_image(&ctx, &pipeline, &grid);
    let palette = Palette::default();
    let offset = (950 * 1920 + 960) * 4;
    assert_pixels_close(&image[offset..offset + 4], &palette.color_of(Cell::Dirt));
    assert_pixels_close(&image[offset + 4..offset + 8], &palette.color_of(Cell::Stone));
    assert_pixels_close(&image[..4], &palette.color_of(Cell::Air));
}

#[test]
fn test_palette_change_recolors_next_frame() {
    let Some(ctx) = context() else { return };
    let mut pipeline = FramePipeline::new(&ctx.device, TARGET_FORMAT, 8, 8).unwrap();
    let grid = Grid::new(8, 8);

    let mut palette = Palette::default();
    palette.set_color(Cell::Air, [10, 20, 30, 255]);
    pipeline.set_palette(&ctx.queue, palette);

    let image = render_color_image(&ctx, &pipeline, &grid);
    assert_pixels_close(&image, &palette.shade(grid.snapshot()));
}

#[test]
fn test_device_texture_limit_follows_adapter() {
    let Some(ctx) = context() else { return };
    assert_eq!(
        ctx.device.limits().max_texture_dimension_2d,
        ctx.adapter.limits().max_texture_dimension_2d
    );
}

#[test]
fn test_oversized_grid_is_rejected() {
    let Some(ctx) = context() else { return };
    let limit = ctx.device.limits().max_texture_dimension_2d;

    let result = FramePipeline::new(&ctx.device, TARGET_FORMAT, limit + 1, 4);
    assert!(matches!(result, Err(StartupError::GridTooLarge { .. })));
}

#[test]
fn test_teardown_releases_resources() {
    let Some(ctx) = context() else { return };
    let pipeline = FramePipeline::new(&ctx.device, TARGET_FORMAT, 16, 16).unwrap();
    let grid = Grid::new(16, 16);
    let (_target, view) = create_target(&ctx.device, 16, 16);
    pipeline
        .submit(&ctx.device, &ctx.queue, &grid, &view, None)
        .unwrap();

    ctx.device.poll(wgpu::PollType::Wait).unwrap();
    pipeline.teardown();
}
