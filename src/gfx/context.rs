//! Device acquisition
//!
//! Opens an adapter, device and queue either for a window surface or without
//! one (offscreen rendering and tests).

use std::sync::Arc;

use crate::error::{StartupError, StartupResult};

/// Shared handles to the graphics device
pub struct GpuContext {
    pub adapter: wgpu::Adapter,
    pub device: Arc<wgpu::Device>,
    pub queue: Arc<wgpu::Queue>,
}

impl GpuContext {
    /// Instance over every backend the platform offers
    pub fn create_instance() -> wgpu::Instance {
        wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        })
    }

    /// Requests an adapter (compatible with `compatible_surface` if given)
    /// and opens a device on it.
    pub async fn new(
        instance: &wgpu::Instance,
        compatible_surface: Option<&wgpu::Surface<'_>>,
    ) -> StartupResult<Self> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface,
                force_fallback_adapter: false,
            })
            .await?;

        let info = adapter.get_info();
        log::info!("using adapter '{}' ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("PixelSand Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: adapter.limits().max_texture_dimension_2d,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        Ok(Self {
            adapter,
            device: Arc::new(device),
            queue: Arc::new(queue),
        })
    }

    /// Opens a device without a presentation surface
    pub fn headless() -> StartupResult<Self> {
        let instance = Self::create_instance();
        pollster::block_on(Self::new(&instance, None))
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }
}

/// Runs a resource creation step inside a validation error scope.
///
/// wgpu reports invalid descriptors asynchronously; the scope turns them into
/// an explicit [`StartupError::Creation`] for `step` instead of a panic in the
/// uncaptured error handler.
pub fn checked<T>(
    device: &wgpu::Device,
    step: &'static str,
    create: impl FnOnce() -> T,
) -> StartupResult<T> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = create();
    match pollster::block_on(device.pop_error_scope()) {
        Some(error) => Err(StartupError::Creation {
            step,
            message: error.to_string(),
        }),
        None => Ok(value),
    }
}
