use image::{Rgba, RgbaImage};

use carelab_catalog::layout::LayoutNode;
use carelab_common::config::RenderDefaults;
use carelab_common::error::{CarelabError, CarelabResult};

/// Options for a single capture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureOptions {
    /// Output pixels per layout pixel.
    pub scale: f32,

    /// Allow cross-origin assets referenced by the node. Backends that
    /// never fetch remote content ignore it.
    pub use_cors: bool,

    /// Fill behind everything the node draws.
    pub background: Rgba<u8>,
}

impl CaptureOptions {
    /// Options at `scale` with cross-origin assets allowed on white.
    pub fn new(scale: f32) -> Self {
        Self {
            scale,
            use_cors: true,
            background: Rgba([255, 255, 255, 255]),
        }
    }

    pub fn validate(&self) -> CarelabResult<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(CarelabError::capture(format!(
                "Invalid capture scale {}",
                self.scale
            )));
        }
        Ok(())
    }

    /// Pixel size of a capture of a `width`×`height` node.
    pub fn output_size(&self, width: u32, height: u32) -> (u32, u32) {
        (
            ((width as f32 * self.scale).round() as u32).max(1),
            ((height as f32 * self.scale).round() as u32).max(1),
        )
    }
}

/// Abstract "render a layout node to a raster image" capability.
///
/// Implementations must be deterministic for identical nodes and options.
/// The export pipelines call this strictly one node at a time.
#[async_trait::async_trait]
pub trait CaptureAdapter: Send + Sync {
    /// Render `node` and suspend until the raster is ready.
    async fn capture(
        &self,
        node: &LayoutNode,
        options: &CaptureOptions,
    ) -> CarelabResult<RgbaImage>;

    /// Backend name.
    fn name(&self) -> &str;
}

pub mod raster;

pub use raster::RasterCapture;

/// Build the default capture backend from render settings.
pub fn get_backend(render: &RenderDefaults) -> CarelabResult<Box<dyn CaptureAdapter>> {
    Ok(Box::new(RasterCapture::from_config(render)?))
}
