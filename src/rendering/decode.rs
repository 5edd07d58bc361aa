//! Payload decoding for the render step

use base64::Engine as _;
use image::{DynamicImage, ImageFormat};

use crate::rendering::PNG_DATA_URI_PREFIX;
use crate::{Error, Result};

/// Turns a frame payload back into pixels.
///
/// The viewer only needs the default `DataUriDecoder`; the trait exists so
/// hosts with their own codecs (or tests that need a failing decode) can
/// plug in.
pub trait ImageDecoder: Send + Sync {
    fn decode(&self, payload: &str) -> Result<DynamicImage>;
}

/// Decodes `data:image/png;base64,...` payloads
#[derive(Debug, Clone, Copy, Default)]
pub struct DataUriDecoder;

impl DataUriDecoder {
    pub fn new() -> Self {
        DataUriDecoder
    }
}

impl ImageDecoder for DataUriDecoder {
    fn decode(&self, payload: &str) -> Result<DynamicImage> {
        let encoded = payload
            .strip_prefix(PNG_DATA_URI_PREFIX)
            .ok_or_else(|| Error::DecodeFailure("payload is not a base64 PNG data URI".into()))?;
        let bytes = base64::engine::general_purpose::STANDARD.decode(encoded)?;
        let img = image::load_from_memory_with_format(&bytes, ImageFormat::Png)?;
        Ok(img)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::EncodedImage;
    use crate::rendering::raster::rasterize_with_seed;
    use image::GenericImageView;

    #[test]
    fn decodes_own_payload() {
        let encoded = rasterize_with_seed(64, 32, b"decode").unwrap();
        let img = DataUriDecoder::new().decode(&encoded.to_data_uri()).unwrap();
        assert_eq!(img.dimensions(), (64, 32));
    }

    #[test]
    fn rejects_foreign_payloads() {
        let d = DataUriDecoder::new();
        assert!(matches!(d.decode("data:image/jpeg;base64,AAAA"), Err(Error::DecodeFailure(_))));
        assert!(matches!(d.decode("data:image/png;base64,!!!"), Err(Error::DecodeFailure(_))));

        let not_png = EncodedImage::new(1, 1, b"definitely not a png".to_vec());
        assert!(matches!(d.decode(&not_png.to_data_uri()), Err(Error::DecodeFailure(_))));
    }
}
