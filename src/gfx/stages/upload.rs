//! Upload stage: grid snapshot to cell buffer

use futures::channel::oneshot;

use crate::error::{FrameError, FrameResult};
use crate::world::Cell;

/// Copies a full grid snapshot into the staging region.
///
/// Maps the whole staging buffer for writing, copies, and unmaps. Blocks
/// until the device releases the region from the previous frame's copy.
///
/// # Errors
/// [`FrameError::SnapshotSize`] if the snapshot does not exactly fill the
/// staging region; mapping failures are returned as-is.
pub fn stage(device: &wgpu::Device, staging: &wgpu::Buffer, snapshot: &[Cell]) -> FrameResult<()> {
    let bytes: &[u8] = bytemuck::cast_slice(snapshot);
    if bytes.len() as u64 != staging.size() {
        return Err(FrameError::SnapshotSize {
            expected: staging.size(),
            actual: bytes.len() as u64,
        });
    }

    let slice = staging.slice(..);
    let (sender, receiver) = oneshot::channel();
    slice.map_async(wgpu::MapMode::Write, move |result| {
        let _ = sender.send(result);
    });
    device
        .poll(wgpu::PollType::Wait)
        .map_err(|err| FrameError::Submission(format!("device poll failed: {}", err)))?;
    pollster::block_on(receiver).map_err(|_| FrameError::StagingAbandoned)??;

    slice.get_mapped_range_mut().copy_from_slice(bytes);
    staging.unmap();

    log::trace!("staged {} bytes", bytes.len());
    Ok(())
}

/// Records the staging region to cell buffer copy.
///
/// Always copies the whole region; there is no dirty tracking.
pub fn commit(encoder: &mut wgpu::CommandEncoder, staging: &wgpu::Buffer, cell_buffer: &wgpu::Buffer) {
    encoder.copy_buffer_to_buffer(staging, 0, cell_buffer, 0, staging.size());
}
