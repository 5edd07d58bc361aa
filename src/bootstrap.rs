//! Readiness-gated viewer instantiation

use log::{debug, info, warn};

use crate::platform::HostDocument;
use crate::{FrameViewer, ViewerConfig};

/// Create the document's viewer once it has finished loading.
///
/// Resolves immediately when the document is already past `Loading`.
/// Returns `None` if the document goes away while still loading.
pub async fn bootstrap_viewer(document: &dyn HostDocument, config: ViewerConfig) -> Option<FrameViewer> {
    let mut ready = document.ready_state();

    loop {
        let loading = ready.borrow_and_update().is_loading();
        if !loading {
            break;
        }
        debug!("Document still loading; deferring viewer bootstrap");
        if ready.changed().await.is_err() {
            warn!("Document closed before it finished loading; viewer not created");
            return None;
        }
    }

    info!("Bootstrapping frame viewer");
    Some(FrameViewer::new(document, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::memory::MemoryDocument;
    use crate::platform::ReadyState;
    use crate::ViewerState;
    use std::sync::Arc;
    use std::time::Duration;

    fn config() -> ViewerConfig {
        ViewerConfig {
            seed: Some(1),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn ready_document_bootstraps_immediately() {
        let doc = MemoryDocument::with_viewer_elements("frameCanvas");
        let mut viewer = bootstrap_viewer(&doc, config()).await.expect("viewer");
        assert_eq!(viewer.state(), ViewerState::Running);
        viewer.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn loading_document_defers_until_ready() {
        let doc = Arc::new(MemoryDocument::with_viewer_elements("frameCanvas").loading());
        let task = tokio::spawn({
            let doc = doc.clone();
            async move { bootstrap_viewer(doc.as_ref(), config()).await }
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!task.is_finished());
        assert_eq!(doc.text("status").as_deref(), Some(""));

        doc.set_ready_state(ReadyState::Interactive);
        let mut viewer = task.await.unwrap().expect("viewer");
        assert_eq!(doc.text("status").as_deref(), Some("Active"));
        viewer.stop().await;
    }
}
