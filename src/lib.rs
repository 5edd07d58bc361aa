//! Edgeview Frame Viewer
//!
//! A headless viewer that paints synthetic "edge-detection" frames onto a
//! host-provided display surface and keeps rolling statistics (FPS,
//! resolution, processing time, frame count) in host-provided text fields.
//!
//! # Features
//!
//! - **Synthetic frames**: circles, segments and rectangles stroked white on
//!   black, encoded as a PNG data URI
//! - **Running statistics**: O(1) running averages, no frame history kept
//! - **Injected host**: the surface and fields come from a `HostDocument`, so
//!   an in-memory host can stand in for a real display
//! - **Cancellable ticker**: the periodic cycle can be stopped by its owner
//!
//! # Example
//!
//! ```no_run
//! use edgeview::platform::memory::MemoryDocument;
//! use edgeview::{FrameViewer, ViewerConfig};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let config = ViewerConfig {
//!     seed: Some(7),
//!     ..Default::default()
//! };
//! let document = MemoryDocument::with_viewer_elements(&config.surface_id);
//! let mut viewer = FrameViewer::new(&document, config);
//! println!("frames so far: {}", viewer.stats().total_frames);
//! viewer.stop().await;
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub mod error;
pub use error::{Error, Result};

pub mod frame;
pub use frame::{Frame, FrameStats};

pub mod sampling;
pub use sampling::FrameSampler;

// Scene description, rasterizer and payload codec
pub mod rendering;

// Host surface abstraction (document, canvas, text fields) plus an in-memory host
pub mod platform;

mod ticker;

pub mod viewer;
pub use viewer::{FrameViewer, ViewerState};

pub mod bootstrap;
pub use bootstrap::bootstrap_viewer;

/// Configuration for a frame viewer
///
/// The defaults give 1920x1080 nominal frames,
/// 640x480 synthesized rasters, a 2 second tick and the usual sample ranges.
/// Every field may be omitted when loading from JSON.
///
/// # Examples
///
/// ```
/// let cfg = edgeview::ViewerConfig::default();
/// assert_eq!(cfg.frame_size.to_string(), "1920x1080");
/// assert_eq!(cfg.tick_interval_ms, 2000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Identifier of the display surface in the host document
    pub surface_id: String,
    /// Nominal frame dimensions reported in metadata and stats
    pub frame_size: Dimensions,
    /// Dimensions of the synthesized raster
    pub target_size: Dimensions,
    /// Period of the synthesis-and-render cycle in milliseconds
    pub tick_interval_ms: u64,
    /// Inclusive range for sampled frame rates
    pub fps_range: SampleRange,
    /// Inclusive range for sampled processing times (ms)
    pub processing_time_range: SampleRange,
    /// Shape counts and extents for synthesized frames
    pub scene: SceneConfig,
    /// Sampling seed; `None` seeds from OS entropy
    pub seed: Option<u64>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            surface_id: "frameCanvas".to_string(),
            frame_size: Dimensions::new(1920, 1080),
            target_size: Dimensions::new(640, 480),
            tick_interval_ms: 2000,
            fps_range: SampleRange::new(15, 22),
            processing_time_range: SampleRange::new(40, 60),
            scene: SceneConfig::default(),
            seed: None,
        }
    }
}

impl ViewerConfig {
    /// Parse a configuration from JSON; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ViewerConfig =
            serde_json::from_str(json).map_err(|e| Error::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the viewer cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.surface_id.trim().is_empty() {
            return Err(Error::ConfigError("surface_id must not be empty".into()));
        }
        if self.frame_size.is_empty() {
            return Err(Error::ConfigError(format!("frame_size {} has a zero side", self.frame_size)));
        }
        if self.target_size.is_empty() {
            return Err(Error::ConfigError(format!("target_size {} has a zero side", self.target_size)));
        }
        if self.tick_interval_ms == 0 {
            return Err(Error::ConfigError("tick_interval_ms must be positive".into()));
        }
        self.fps_range.validate("fps_range")?;
        self.processing_time_range.validate("processing_time_range")?;
        self.scene.radius.validate("scene.radius")?;
        self.scene.rect_extent.validate("scene.rect_extent")?;
        if self.scene.line_width == 0 {
            return Err(Error::ConfigError("scene.line_width must be positive".into()));
        }
        Ok(())
    }

    /// Tick period as a `Duration`
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Width and height in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Half of each side, as used for the on-screen surface
    pub fn halved(&self) -> Self {
        Self::new(self.width / 2, self.height / 2)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Inclusive integer range used for uniform sampling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRange {
    pub min: u32,
    pub max: u32,
}

impl SampleRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    fn validate(&self, name: &str) -> Result<()> {
        if self.min > self.max {
            return Err(Error::ConfigError(format!(
                "{} is empty ({} > {})",
                name, self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Shape counts and extents for a synthesized edge frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub circles: usize,
    pub lines: usize,
    pub rectangles: usize,
    /// Circle radius range
    pub radius: SampleRange,
    /// Rectangle width/height range
    pub rect_extent: SampleRange,
    /// Stroke width in pixels
    pub line_width: u32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            circles: 15,
            lines: 25,
            rectangles: 10,
            radius: SampleRange::new(20, 70),
            rect_extent: SampleRange::new(30, 130),
            line_width: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ViewerConfig::default();
        assert_eq!(config.frame_size, Dimensions::new(1920, 1080));
        assert_eq!(config.target_size, Dimensions::new(640, 480));
        assert_eq!(config.surface_id, "frameCanvas");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_dimensions() {
        let d = Dimensions::new(1920, 1080);
        assert_eq!(d.to_string(), "1920x1080");
        assert_eq!(d.halved(), Dimensions::new(960, 540));
        assert!(Dimensions::new(0, 10).is_empty());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = ViewerConfig::from_json_str(r#"{"tick_interval_ms": 500, "seed": 3}"#).unwrap();
        assert_eq!(cfg.tick_interval_ms, 500);
        assert_eq!(cfg.seed, Some(3));
        assert_eq!(cfg.fps_range, SampleRange::new(15, 22));
        assert_eq!(cfg.scene.circles, 15);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let cfg = ViewerConfig { tick_interval_ms: 0, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(Error::ConfigError(_))));

        let cfg = ViewerConfig { fps_range: SampleRange::new(30, 10), ..Default::default() };
        assert!(matches!(cfg.validate(), Err(Error::ConfigError(_))));

        let cfg = ViewerConfig { target_size: Dimensions::new(640, 0), ..Default::default() };
        assert!(matches!(cfg.validate(), Err(Error::ConfigError(_))));

        assert!(ViewerConfig::from_json_str("{not json").is_err());
    }
}
