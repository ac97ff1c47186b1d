//! Device to host downloads
//!
//! Blocking helpers that copy a buffer or an RGBA8 texture into a mappable
//! buffer and return tightly packed bytes. Used to inspect what the frame
//! pipeline actually wrote.

use anyhow::{anyhow, bail, ensure, Result};
use futures::channel::oneshot;

/// Round up to the device's row copy alignment (256 bytes)
fn align_bytes_per_row(value: u32) -> u32 {
    value.div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT) * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT
}

/// Submits `encoder`, then maps `staging` for reading and waits for it.
fn submit_and_map(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    encoder: wgpu::CommandEncoder,
    staging: &wgpu::Buffer,
) -> Result<()> {
    queue.submit(std::iter::once(encoder.finish()));

    let (sender, receiver) = oneshot::channel();
    staging
        .slice(..)
        .map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
    device
        .poll(wgpu::PollType::Wait)
        .map_err(|err| anyhow!("device poll failed: {}", err))?;

    pollster::block_on(receiver).map_err(|_| anyhow!("map_async callback channel dropped"))??;
    Ok(())
}

/// Downloads the whole contents of `src`, which must have `COPY_SRC` usage.
pub fn read_buffer(device: &wgpu::Device, queue: &wgpu::Queue, src: &wgpu::Buffer) -> Result<Vec<u8>> {
    ensure!(
        src.usage().contains(wgpu::BufferUsages::COPY_SRC),
        "buffer is not readable: usage {:?}",
        src.usage()
    );

    let staging = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Readback Buffer"),
        size: src.size(),
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("Buffer Readback Encoder"),
    });
    encoder.copy_buffer_to_buffer(src, 0, &staging, 0, src.size());
    submit_and_map(device, queue, encoder, &staging)?;

    let bytes = staging.slice(..).get_mapped_range().to_vec();
    staging.unmap();
    Ok(bytes)
}

/// Downloads mip 0 of an RGBA8 texture as tightly packed rows.
pub fn read_texture_rgba8(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    src: &wgpu::Texture,
) -> Result<Vec<u8>> {
    let (width, height) = (src.width(), src.height());
    ensure!(width > 0 && height > 0, "readback size must be positive");
    match src.format() {
        wgpu::TextureFormat::Rgba8Unorm
        | wgpu::TextureFormat::Rgba8UnormSrgb
        | wgpu::TextureFormat::Bgra8Unorm
        | wgpu::TextureFormat::Bgra8UnormSrgb => {}
        other => bail!("read_texture_rgba8 only supports 8-bit RGBA formats, got {:?}", other),
    }

    let tight_bpr = width * 4;
    let padded_bpr = align_bytes_per_row(tight_bpr);

    let staging = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Texture Readback Buffer"),
        size: padded_bpr as u64 * height as u64,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("Texture Readback Encoder"),
    });
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture: src,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &staging,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(padded_bpr),
                rows_per_image: Some(height),
            },
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
    submit_and_map(device, queue, encoder, &staging)?;

    let data = staging.slice(..).get_mapped_range();
    let mut tight = Vec::with_capacity((tight_bpr * height) as usize);
    for row in data.chunks(padded_bpr as usize) {
        tight.extend_from_slice(&row[..tight_bpr as usize]);
    }
    drop(data);
    staging.unmap();

    Ok(tight)
}
