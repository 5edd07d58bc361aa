//! In-memory host document
//!
//! Elements keep their state behind `std::sync::Mutex` so tests can inspect
//! what the viewer wrote: canvas pixels, draw counts and field text.

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

use super::{Canvas, HostDocument, ReadyState, RenderingContext2d, TextField};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

#[derive(Debug)]
struct Surface {
    pixels: RgbaImage,
    draws: u64,
}

/// Canvas backed by an RGBA buffer
pub struct MemoryCanvas {
    surface: Arc<Mutex<Surface>>,
    has_context: bool,
}

impl MemoryCanvas {
    /// 300x150, the HTML canvas default
    pub fn new() -> Self {
        Self::with_size(300, 150)
    }

    pub fn with_size(width: u32, height: u32) -> Self {
        MemoryCanvas {
            surface: Arc::new(Mutex::new(Surface {
                pixels: RgbaImage::from_pixel(width, height, TRANSPARENT),
                draws: 0,
            })),
            has_context: true,
        }
    }

    /// A canvas whose `context_2d` always returns `None`
    pub fn without_context() -> Self {
        MemoryCanvas {
            has_context: false,
            ..Self::new()
        }
    }

    /// Copy of the current pixels
    pub fn snapshot(&self) -> RgbaImage {
        self.surface.lock().unwrap().pixels.clone()
    }

    /// Number of completed `draw_image` calls
    pub fn draw_count(&self) -> u64 {
        self.surface.lock().unwrap().draws
    }
}

impl Default for MemoryCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas for MemoryCanvas {
    fn width(&self) -> u32 {
        self.surface.lock().unwrap().pixels.width()
    }

    fn height(&self) -> u32 {
        self.surface.lock().unwrap().pixels.height()
    }

    fn set_size(&self, width: u32, height: u32) {
        let mut s = self.surface.lock().unwrap();
        s.pixels = RgbaImage::from_pixel(width, height, TRANSPARENT);
    }

    fn context_2d(&self) -> Option<Arc<dyn RenderingContext2d>> {
        if !self.has_context {
            return None;
        }
        Some(Arc::new(MemoryContext2d {
            surface: self.surface.clone(),
        }))
    }
}

struct MemoryContext2d {
    surface: Arc<Mutex<Surface>>,
}

impl RenderingContext2d for MemoryContext2d {
    fn draw_image(&self, image: &DynamicImage, dx: i64, dy: i64, dw: u32, dh: u32) {
        if dw == 0 || dh == 0 {
            return;
        }
        let scaled = imageops::resize(&image.to_rgba8(), dw, dh, FilterType::Nearest);
        let mut s = self.surface.lock().unwrap();
        imageops::overlay(&mut s.pixels, &scaled, dx, dy);
        s.draws += 1;
    }
}

/// Text element holding a string
#[derive(Default)]
pub struct MemoryTextField {
    text: Mutex<String>,
}

impl MemoryTextField {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TextField for MemoryTextField {
    fn set_text_content(&self, text: &str) {
        let mut t = self.text.lock().unwrap();
        t.clear();
        t.push_str(text);
    }

    fn text_content(&self) -> String {
        self.text.lock().unwrap().clone()
    }
}

/// Document built from explicitly added elements
pub struct MemoryDocument {
    canvases: HashMap<String, Arc<MemoryCanvas>>,
    fields: HashMap<String, Arc<MemoryTextField>>,
    ready: watch::Sender<ReadyState>,
}

impl MemoryDocument {
    /// Empty document that has finished loading
    pub fn new() -> Self {
        let (ready, _) = watch::channel(ReadyState::Complete);
        MemoryDocument {
            canvases: HashMap::new(),
            fields: HashMap::new(),
            ready,
        }
    }

    /// Surface `surface_id` plus every field the viewer knows about
    pub fn with_viewer_elements(surface_id: &str) -> Self {
        ["fps", "resolution", "status", "processingTime", "frameCount"]
            .into_iter()
            .fold(Self::new().with_canvas(surface_id), |doc, id| doc.with_text_field(id))
    }

    pub fn with_canvas(mut self, id: &str) -> Self {
        self.canvases.insert(id.to_string(), Arc::new(MemoryCanvas::new()));
        self
    }

    pub fn with_contextless_canvas(mut self, id: &str) -> Self {
        self.canvases.insert(id.to_string(), Arc::new(MemoryCanvas::without_context()));
        self
    }

    pub fn with_text_field(mut self, id: &str) -> Self {
        self.fields.insert(id.to_string(), Arc::new(MemoryTextField::new()));
        self
    }

    pub fn without_element(mut self, id: &str) -> Self {
        self.canvases.remove(id);
        self.fields.remove(id);
        self
    }

    /// Start in `Loading`; call `set_ready_state` to finish
    pub fn loading(self) -> Self {
        self.ready.send_replace(ReadyState::Loading);
        self
    }

    pub fn set_ready_state(&self, state: ReadyState) {
        self.ready.send_replace(state);
    }

    /// Concrete canvas handle, for inspection
    pub fn memory_canvas(&self, id: &str) -> Option<Arc<MemoryCanvas>> {
        self.canvases.get(id).cloned()
    }

    /// Current text of a field, `None` if the field does not exist
    pub fn text(&self, id: &str) -> Option<String> {
        self.fields.get(id).map(|f| f.text_content())
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl HostDocument for MemoryDocument {
    fn canvas(&self, id: &str) -> Option<Arc<dyn Canvas>> {
        self.canvases.get(id).map(|c| c.clone() as Arc<dyn Canvas>)
    }

    fn text_field(&self, id: &str) -> Option<Arc<dyn TextField>> {
        self.fields.get(id).map(|f| f.clone() as Arc<dyn TextField>)
    }

    fn ready_state(&self) -> watch::Receiver<ReadyState> {
        self.ready.subscribe()
    }
}
