//! Host surface abstraction: document, display surface and text fields
//!
//! The viewer never talks to a concrete display. It looks elements up by id
//! through `HostDocument` once at construction and keeps the handles. The
//! `memory` module provides an in-process host used by tests and the CLI.

pub mod canvas;
pub mod field;
pub mod memory;

pub use canvas::{Canvas, RenderingContext2d};
pub use field::TextField;
pub use memory::{MemoryCanvas, MemoryDocument, MemoryTextField};

use std::sync::Arc;
use tokio::sync::watch;

/// Loading progress of a host document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

impl ReadyState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ReadyState::Loading)
    }
}

/// A document that owns named display elements
pub trait HostDocument: Send + Sync {
    /// Look up a drawable surface by id
    fn canvas(&self, id: &str) -> Option<Arc<dyn Canvas>>;

    /// Look up a text-bearing element by id
    fn text_field(&self, id: &str) -> Option<Arc<dyn TextField>>;

    /// Subscribe to the document's ready state
    fn ready_state(&self) -> watch::Receiver<ReadyState>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_has_no_elements() {
        let doc = MemoryDocument::new();
        assert!(doc.canvas("frameCanvas").is_none());
        assert!(doc.text_field("fps").is_none());
        assert_eq!(*doc.ready_state().borrow(), ReadyState::Complete);
    }

    #[test]
    fn viewer_elements_are_all_present() {
        let doc = MemoryDocument::with_viewer_elements("frameCanvas");
        let canvas = doc.canvas("frameCanvas").expect("canvas");
        assert!(canvas.context_2d().is_some());
        for id in ["fps", "resolution", "status", "processingTime", "frameCount"] {
            assert!(doc.text_field(id).is_some(), "missing {}", id);
        }
    }
}
