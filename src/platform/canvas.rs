//! Drawable surface primitives

use image::DynamicImage;
use std::sync::Arc;

/// A drawable surface looked up by id in the host document
pub trait Canvas: Send + Sync {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Resize the backing store. Like an HTML canvas, this clears it.
    fn set_size(&self, width: u32, height: u32);

    /// 2D drawing context, if the surface supports one
    fn context_2d(&self) -> Option<Arc<dyn RenderingContext2d>>;
}

/// 2D drawing context of a `Canvas`; draws land on that canvas's backing store
pub trait RenderingContext2d: Send + Sync {
    /// Draw `image` scaled into the destination rectangle
    fn draw_image(&self, image: &DynamicImage, dx: i64, dy: i64, dw: u32, dh: u32);
}
