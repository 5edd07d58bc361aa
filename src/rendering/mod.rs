//! Rendering: scene sampling, rasterization and the frame payload codec

pub mod decode;
pub mod paint;
pub mod raster;

pub use decode::{DataUriDecoder, ImageDecoder};
pub use raster::{rasterize_with_seed, synthesize_edge_image};

use base64::Engine as _;
use sha2::{Digest, Sha256};

/// Prefix of every payload the viewer produces
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// A synthesized raster and its PNG encoding
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
}

impl EncodedImage {
    pub fn new(width: u32, height: u32, png_data: Vec<u8>) -> Self {
        Self { width, height, png_data }
    }

    /// Embed the PNG bytes in a `data:` URI
    pub fn to_data_uri(&self) -> String {
        let mut uri = String::with_capacity(PNG_DATA_URI_PREFIX.len() + self.png_data.len() * 4 / 3 + 4);
        uri.push_str(PNG_DATA_URI_PREFIX);
        base64::engine::general_purpose::STANDARD.encode_string(&self.png_data, &mut uri);
        uri
    }

    /// Hex SHA-256 of the PNG bytes
    pub fn fingerprint(&self) -> String {
        hex::encode(Sha256::digest(&self.png_data))
    }
}
