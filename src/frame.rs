//! Frame metadata and the rolling statistics derived from it

use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::Dimensions;

/// One synthesized frame: metadata plus an encoded image payload
///
/// Frames are transient. The viewer builds one per tick, folds it into
/// `FrameStats`, hands it to the render step and drops it.
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    /// Nominal frame width
    pub width: u32,
    /// Nominal frame height
    pub height: u32,
    /// Sampled frame rate
    pub fps: u32,
    /// Creation time in milliseconds since the Unix epoch
    pub timestamp: u64,
    /// `data:image/png;base64,...` payload at the target resolution
    #[serde(skip_serializing)]
    pub image_data: String,
    /// Sampled processing time in milliseconds, if any
    pub processing_time: Option<u32>,
}

impl Frame {
    pub fn size(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    pub fn resolution(&self) -> String {
        self.size().to_string()
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Rolling statistics kept by the viewer
///
/// No per-frame history is retained. Each average is recomputed from its
/// previous value and the newest sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameStats {
    pub total_frames: u64,
    pub avg_fps: u32,
    pub avg_processing_time: u32,
    pub resolution: String,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self {
            total_frames: 0,
            avg_fps: 0,
            avg_processing_time: 0,
            resolution: "0x0".to_string(),
        }
    }
}

impl FrameStats {
    /// Fold one frame into the statistics.
    pub fn record(&mut self, frame: &Frame) {
        self.total_frames += 1;
        self.avg_fps = running_average(self.avg_fps, frame.fps);
        self.resolution = frame.resolution();

        if let Some(processing_time) = frame.processing_time {
            self.avg_processing_time = running_average(self.avg_processing_time, processing_time);
        }
    }

    /// `"Active"` once any frame has been recorded
    pub fn status(&self) -> &'static str {
        if self.total_frames > 0 {
            "Active"
        } else {
            "Inactive"
        }
    }
}

/// `round((previous + sample) / 2)` with halves rounded up
pub fn running_average(previous: u32, sample: u32) -> u32 {
    ((previous as u64 + sample as u64 + 1) / 2) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(fps: u32, processing_time: Option<u32>) -> Frame {
        Frame {
            width: 1920,
            height: 1080,
            fps,
            timestamp: 0,
            image_data: String::new(),
            processing_time,
        }
    }

    #[test]
    fn running_average_rounds_half_up() {
        assert_eq!(running_average(0, 15), 8);
        assert_eq!(running_average(8, 22), 15);
        assert_eq!(running_average(20, 20), 20);
        assert_eq!(running_average(u32::MAX, u32::MAX), u32::MAX);
    }

    #[test]
    fn record_updates_every_field() {
        let mut stats = FrameStats::default();
        assert_eq!(stats.status(), "Inactive");
        assert_eq!(stats.resolution, "0x0");

        stats.record(&frame(20, Some(50)));
        assert_eq!(stats.total_frames, 1);
        assert_eq!(stats.avg_fps, 10);
        assert_eq!(stats.avg_processing_time, 25);
        assert_eq!(stats.resolution, "1920x1080");
        assert_eq!(stats.status(), "Active");

        stats.record(&frame(20, Some(50)));
        assert_eq!(stats.avg_fps, 15);
        assert_eq!(stats.avg_processing_time, 38);
    }

    #[test]
    fn missing_processing_time_leaves_average_alone() {
        let mut stats = FrameStats::default();
        stats.record(&frame(16, Some(40)));
        stats.record(&frame(16, None));
        assert_eq!(stats.total_frames, 2);
        assert_eq!(stats.avg_processing_time, 20);
    }

    #[test]
    fn averages_never_exceed_largest_sample() {
        let mut stats = FrameStats::default();
        for i in 0..200u32 {
            stats.record(&frame(15 + i % 8, Some(40 + i % 21)));
            assert!(stats.avg_fps <= 22);
            assert!(stats.avg_processing_time <= 60);
        }
        assert_eq!(stats.total_frames, 200);
    }
}
