//! Stroke rasterizer: turns `StrokeCommand`s into a grayscale raster and PNG bytes

use image::{GrayImage, ImageFormat, Luma};
use sha2::{Digest, Sha256};
use std::io::Cursor;
use tiny_skia::{Color, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use crate::rendering::paint::{edge_scene, StrokeCommand};
use crate::rendering::EncodedImage;
use crate::sampling::FrameSampler;
use crate::{Dimensions, Error, Result, SceneConfig};

/// Stroke commands white on a black pixmap with strokes `line_width` wide.
///
/// Anti-aliasing is off so every pixel is either background or ink.
pub fn rasterize(commands: &[StrokeCommand], canvas: Dimensions, line_width: u32) -> Result<GrayImage> {
    let mut pixmap = Pixmap::new(canvas.width, canvas.height)
        .ok_or_else(|| Error::EncodeError(format!("cannot allocate a {} pixmap", canvas)))?;
    pixmap.fill(Color::BLACK);

    let mut pb = PathBuilder::new();
    for cmd in commands {
        match *cmd {
            StrokeCommand::Circle { cx, cy, radius } => pb.push_circle(cx, cy, radius),
            StrokeCommand::Line { x0, y0, x1, y1 } => {
                pb.move_to(x0, y0);
                pb.line_to(x1, y1);
            }
            StrokeCommand::Rect { x, y, width, height } => {
                if let Some(rect) = Rect::from_xywh(x, y, width, height) {
                    pb.push_rect(rect);
                }
            }
        }
    }

    // an empty scene has no path to stroke
    if let Some(path) = pb.finish() {
        let mut paint = Paint::default();
        paint.set_color_rgba8(255, 255, 255, 255);
        paint.anti_alias = false;

        let stroke = Stroke {
            width: line_width.max(1) as f32,
            ..Default::default()
        };
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    let mut img = GrayImage::new(canvas.width, canvas.height);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        if let Some(src) = pixmap.pixel(x, y) {
            *pixel = Luma([src.red()]);
        }
    }
    Ok(img)
}

/// Encode a raster as PNG bytes
pub fn encode_png(img: &GrayImage) -> Result<Vec<u8>> {
    let mut png_data = Vec::new();
    img.write_to(&mut Cursor::new(&mut png_data), ImageFormat::Png)
        .map_err(|e| Error::EncodeError(e.to_string()))?;
    Ok(png_data)
}

/// Draw one edge frame with `sampler` and return it PNG-encoded.
pub fn synthesize_edge_image(
    sampler: &mut FrameSampler,
    canvas: Dimensions,
    scene: &SceneConfig,
) -> Result<EncodedImage> {
    let commands = edge_scene(sampler, canvas, scene);
    let img = rasterize(&commands, canvas, scene.line_width)?;
    let png_data = encode_png(&img)?;
    Ok(EncodedImage::new(canvas.width, canvas.height, png_data))
}

/// Deterministic edge frame keyed by arbitrary seed bytes (used for goldens)
pub fn rasterize_with_seed(width: u32, height: u32, seed: &[u8]) -> Result<EncodedImage> {
    let digest = Sha256::digest(seed);
    let mut key = [0u8; 8];
    key.copy_from_slice(&digest[..8]);
    let mut sampler = FrameSampler::from_seed(u64::from_le_bytes(key));
    synthesize_edge_image(&mut sampler, Dimensions::new(width, height), &SceneConfig::default())
}
