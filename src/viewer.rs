//! The frame viewer: periodic synthesis, rolling statistics and rendering
//!
//! A `FrameViewer` looks its surface and fields up once, runs one
//! synthesis-and-render cycle immediately, then repeats it on a ticker.
//! Acquisition problems never surface as errors to the caller: they are
//! logged and the viewer stays `Inert`.

use image::DynamicImage;
use log::{debug, error, info};
use std::sync::{Arc, Mutex};
use tokio::runtime::Handle;
use tokio::task::{self, JoinHandle};

use crate::frame::{now_millis, Frame, FrameStats};
use crate::platform::{Canvas, HostDocument, RenderingContext2d, TextField};
use crate::rendering::{synthesize_edge_image, DataUriDecoder, ImageDecoder};
use crate::sampling::FrameSampler;
use crate::ticker::Ticker;
use crate::{Error, Result, ViewerConfig};

pub const FPS_FIELD: &str = "fps";
pub const RESOLUTION_FIELD: &str = "resolution";
pub const STATUS_FIELD: &str = "status";
pub const PROCESSING_TIME_FIELD: &str = "processingTime";
pub const FRAME_COUNT_FIELD: &str = "frameCount";

/// Lifecycle of a viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerState {
    /// Construction failed; nothing runs
    Inert,
    /// Ticker armed
    Running,
    /// Ticker stopped by the owner
    Stopped,
}

/// Handles looked up from the host document at construction
struct Outputs {
    canvas: Arc<dyn Canvas>,
    ctx: Arc<dyn RenderingContext2d>,
    fps: Arc<dyn TextField>,
    resolution: Arc<dyn TextField>,
    status: Arc<dyn TextField>,
    processing_time: Option<Arc<dyn TextField>>,
    frame_count: Option<Arc<dyn TextField>>,
}

impl Outputs {
    fn acquire(document: &dyn HostDocument, surface_id: &str) -> Result<Self> {
        let canvas = document
            .canvas(surface_id)
            .ok_or_else(|| Error::AcquisitionFailure(format!("canvas '{}' not found", surface_id)))?;
        let ctx = canvas
            .context_2d()
            .ok_or_else(|| Error::AcquisitionFailure(format!("canvas '{}' has no 2d context", surface_id)))?;

        let required = |id: &str| {
            document
                .text_field(id)
                .ok_or_else(|| Error::AcquisitionFailure(format!("output field '{}' not found", id)))
        };

        Ok(Outputs {
            canvas,
            ctx,
            fps: required(FPS_FIELD)?,
            resolution: required(RESOLUTION_FIELD)?,
            status: required(STATUS_FIELD)?,
            processing_time: document.text_field(PROCESSING_TIME_FIELD),
            frame_count: document.text_field(FRAME_COUNT_FIELD),
        })
    }
}

/// State shared between the owner handle, the ticker and render tasks
struct ViewerCore {
    config: ViewerConfig,
    outputs: Outputs,
    decoder: Arc<dyn ImageDecoder>,
    runtime: Handle,
    stats: Mutex<FrameStats>,
    sampler: Mutex<FrameSampler>,
    renders: Mutex<Vec<JoinHandle<()>>>,
}

impl ViewerCore {
    /// One synthesis cycle: sample, record stats, start the render, refresh stats.
    fn load_frame(self: &Arc<Self>) -> Result<()> {
        let frame = self.synthesize_frame()?;
        self.stats.lock().unwrap().record(&frame);

        let render = self.display_frame(frame);
        {
            let mut renders = self.renders.lock().unwrap();
            renders.retain(|h| !h.is_finished());
            renders.push(render);
        }

        self.update_stats();
        Ok(())
    }

    fn synthesize_frame(&self) -> Result<Frame> {
        let mut sampler = self.sampler.lock().unwrap();
        let fps = sampler.sample(self.config.fps_range);
        let processing_time = sampler.sample(self.config.processing_time_range);
        let timestamp = now_millis();
        let image = synthesize_edge_image(&mut sampler, self.config.target_size, &self.config.scene)?;
        debug!("Synthesized {}x{} frame image {}", image.width, image.height, image.fingerprint());

        Ok(Frame {
            width: self.config.frame_size.width,
            height: self.config.frame_size.height,
            fps,
            timestamp,
            image_data: image.to_data_uri(),
            processing_time: Some(processing_time),
        })
    }

    /// Decode on the blocking pool and paint when it succeeds.
    fn display_frame(self: &Arc<Self>, mut frame: Frame) -> JoinHandle<()> {
        let core = Arc::clone(self);
        self.runtime.spawn(async move {
            let decoder = Arc::clone(&core.decoder);
            let payload = std::mem::take(&mut frame.image_data);
            match task::spawn_blocking(move || decoder.decode(&payload)).await {
                Ok(Ok(img)) => core.paint(&frame, &img),
                Ok(Err(e)) => error!("Failed to load frame image: {}", e),
                Err(e) => error!("Frame decode task failed: {}", e),
            }
        })
    }

    fn paint(&self, frame: &Frame, img: &DynamicImage) {
        let out = &self.outputs;
        let size = frame.size().halved();
        out.canvas.set_size(size.width, size.height);
        out.ctx.draw_image(img, 0, 0, out.canvas.width(), out.canvas.height());

        out.fps.set_text_content(&frame.fps.to_string());
        out.resolution.set_text_content(&frame.resolution());
        if let (Some(field), Some(ms)) = (&out.processing_time, frame.processing_time) {
            field.set_text_content(&format!("{}ms", ms));
        }

        info!("Frame displayed: {} @ {} FPS", frame.resolution(), frame.fps);
    }

    fn update_stats(&self) {
        let stats = self.stats.lock().unwrap().clone();
        if let Some(field) = &self.outputs.frame_count {
            field.set_text_content(&stats.total_frames.to_string());
        }
        self.outputs.status.set_text_content(stats.status());
        debug!("Stats updated: {:?}", stats);
    }
}

/// Periodic synthetic frame viewer bound to a host document
pub struct FrameViewer {
    core: Option<Arc<ViewerCore>>,
    ticker: Option<Ticker>,
}

impl FrameViewer {
    /// Build a viewer that decodes payloads with `DataUriDecoder`.
    ///
    /// Must be called from within a tokio runtime; otherwise the viewer is
    /// `Inert`. See `with_decoder`.
    pub fn new(document: &dyn HostDocument, config: ViewerConfig) -> Self {
        Self::with_decoder(document, config, Arc::new(DataUriDecoder::new()))
    }

    /// Build a viewer with a custom payload decoder.
    ///
    /// On success the first frame has been synthesized and its stats written
    /// before this returns, and the ticker is armed. On any acquisition or
    /// configuration failure the error is logged and an `Inert` viewer is
    /// returned.
    pub fn with_decoder(document: &dyn HostDocument, config: ViewerConfig, decoder: Arc<dyn ImageDecoder>) -> Self {
        match Self::acquire(document, config, decoder) {
            Ok(core) => Self::initialize(core),
            Err(e) => {
                error!("Frame viewer not started: {}", e);
                FrameViewer { core: None, ticker: None }
            }
        }
    }

    fn acquire(document: &dyn HostDocument, config: ViewerConfig, decoder: Arc<dyn ImageDecoder>) -> Result<Arc<ViewerCore>> {
        config.validate()?;
        let outputs = Outputs::acquire(document, &config.surface_id)?;
        let runtime = Handle::try_current()
            .map_err(|e| Error::AcquisitionFailure(format!("no tokio runtime: {}", e)))?;
        let sampler = FrameSampler::new(config.seed);

        Ok(Arc::new(ViewerCore {
            config,
            outputs,
            decoder,
            runtime,
            stats: Mutex::new(FrameStats::default()),
            sampler: Mutex::new(sampler),
            renders: Mutex::new(Vec::new()),
        }))
    }

    fn initialize(core: Arc<ViewerCore>) -> Self {
        info!("Frame viewer initialized on '{}'", core.config.surface_id);
        if let Err(e) = core.load_frame() {
            error!("Initial frame skipped: {}", e);
        }
        core.update_stats();

        let tick_core = Arc::clone(&core);
        let ticker = Ticker::spawn(&core.runtime, core.config.tick_interval(), move || {
            if let Err(e) = tick_core.load_frame() {
                error!("Frame skipped: {}", e);
            }
        });

        FrameViewer {
            core: Some(core),
            ticker: Some(ticker),
        }
    }

    pub fn state(&self) -> ViewerState {
        match (&self.core, &self.ticker) {
            (None, _) => ViewerState::Inert,
            (Some(_), Some(_)) => ViewerState::Running,
            (Some(_), None) => ViewerState::Stopped,
        }
    }

    /// Snapshot of the current statistics (all zero for an inert viewer)
    pub fn stats(&self) -> FrameStats {
        match &self.core {
            Some(core) => core.stats.lock().unwrap().clone(),
            None => FrameStats::default(),
        }
    }

    /// Run one synthesis cycle now, outside the ticker schedule.
    pub fn tick(&self) -> Result<()> {
        let core = self
            .core
            .as_ref()
            .ok_or_else(|| Error::Other("viewer is inert".into()))?;
        core.load_frame()
    }

    /// Wait for every render started so far to finish (or fail).
    pub async fn wait_for_renders(&self) {
        let Some(core) = &self.core else {
            return;
        };
        let pending = std::mem::take(&mut *core.renders.lock().unwrap());
        for render in pending {
            if let Err(e) = render.await {
                error!("Render task failed: {}", e);
            }
        }
    }

    /// Stop the ticker, then let in-flight renders finish.
    ///
    /// The viewer moves to `Stopped`; its stats stay readable. Stopping an
    /// inert or already stopped viewer does nothing.
    pub async fn stop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.stop().await;
            info!("Frame viewer stopped");
        }
        self.wait_for_renders().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::memory::MemoryDocument;

    fn seeded() -> ViewerConfig {
        ViewerConfig {
            seed: Some(5),
            tick_interval_ms: 60_000,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn first_cycle_runs_during_construction() {
        let doc = MemoryDocument::with_viewer_elements("frameCanvas");
        let mut viewer = FrameViewer::new(&doc, seeded());
        assert_eq!(viewer.state(), ViewerState::Running);
        assert_eq!(viewer.stats().total_frames, 1);
        assert_eq!(doc.text(STATUS_FIELD).as_deref(), Some("Active"));
        assert_eq!(doc.text(FRAME_COUNT_FIELD).as_deref(), Some("1"));
        viewer.stop().await;
    }

    #[tokio::test]
    async fn manual_ticks_accumulate() {
        let doc = MemoryDocument::with_viewer_elements("frameCanvas");
        let mut viewer = FrameViewer::new(&doc, seeded());
        for _ in 0..4 {
            viewer.tick().unwrap();
        }
        viewer.wait_for_renders().await;
        let stats = viewer.stats();
        assert_eq!(stats.total_frames, 5);
        assert!(stats.avg_fps <= 22);
        assert!(stats.avg_processing_time <= 60);
        assert_eq!(stats.resolution, "1920x1080");
        viewer.stop().await;
    }

    #[tokio::test]
    async fn stopped_viewer_keeps_its_stats() {
        let doc = MemoryDocument::with_viewer_elements("frameCanvas");
        let mut viewer = FrameViewer::new(&doc, seeded());
        viewer.tick().unwrap();
        let before = viewer.stats();

        viewer.stop().await;
        assert_eq!(viewer.state(), ViewerState::Stopped);
        assert_eq!(viewer.stats(), before);
        assert_eq!(viewer.stats().total_frames, 2);

        // a second stop is a no-op
        viewer.stop().await;
        assert_eq!(viewer.state(), ViewerState::Stopped);
    }

    #[tokio::test]
    async fn required_field_missing_is_inert() {
        let doc = MemoryDocument::with_viewer_elements("frameCanvas").without_element(STATUS_FIELD);
        let viewer = FrameViewer::new(&doc, seeded());
        assert_eq!(viewer.state(), ViewerState::Inert);
        assert!(viewer.tick().is_err());
        assert_eq!(viewer.stats(), FrameStats::default());
    }

    #[test]
    fn no_runtime_is_inert() {
        let doc = MemoryDocument::with_viewer_elements("frameCanvas");
        let viewer = FrameViewer::new(&doc, seeded());
        assert_eq!(viewer.state(), ViewerState::Inert);
        assert_eq!(doc.text(STATUS_FIELD).as_deref(), Some(""));
    }
}
