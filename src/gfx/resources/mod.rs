//! GPU resources
//!
//! The color image, the composite quad and the resource set tying them to
//! the cell buffers.

pub mod color_image;
pub mod device_resources;
pub mod quad;
pub mod texture_resource;

pub use color_image::{create_color_image, COLOR_IMAGE_FORMAT};
pub use device_resources::DeviceResources;
pub use texture_resource::TextureResource;
