use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::future::{AbortHandle, Aborted, BoxFuture};
use futures::FutureExt as _;
use parking_lot::Mutex;
use tiny_skia::Pixmap;

use crate::document::Document;
use crate::element::ElementId;

/// Decoded rasters by element id, as read by the paint pass.
pub type ResolvedImages = HashMap<ElementId, Arc<Pixmap>>;

/// How a [`DecodeTask`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// The raster is in the cache.
    Ready(ElementId),
    /// The request was superseded or its element removed; the result was dropped.
    Stale(ElementId),
    /// Aborted before it ran.
    Cancelled(ElementId),
    /// The source could not be decoded.
    Failed(ElementId),
}

struct Pending {
    generation: u64,
    abort: AbortHandle,
}

#[derive(Default)]
struct CacheState {
    resolved: ResolvedImages,
    pending: HashMap<ElementId, Pending>,
    failed: HashSet<ElementId>,
    next_generation: u64,
    dirty: bool,
}

type RepaintHook = Arc<dyn Fn() + Send + Sync>;

/// Asynchronous cache of decoded image rasters, keyed by element id.
///
/// A raster is requested once per id; a later change of the element's `src`
/// keeps the cached raster. Requests are tagged with a generation, and
/// completions that no longer match the pending request (the element was
/// removed in the meantime) are discarded.
#[derive(Clone, Default)]
pub struct ImageCache {
    state: Arc<Mutex<CacheState>>,
    repaint: Option<RepaintHook>,
}

impl std::fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ImageCache")
            .field("resolved", &state.resolved.len())
            .field("pending", &state.pending.len())
            .field("failed", &state.failed.len())
            .finish()
    }
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called after every successful decode, from whichever thread ran it.
    pub fn set_repaint_callback(&mut self, repaint: impl Fn() + Send + Sync + 'static) {
        self.repaint = Some(Arc::new(repaint));
    }

    /// Bring the cache in line with the images of `doc`.
    ///
    /// Returns one task per image element that has neither a raster, a
    /// pending request nor a past failure. Pending requests for elements no
    /// longer in `doc` are aborted.
    pub fn sync(&self, doc: &Document) -> Vec<DecodeTask> {
        let mut state = self.state.lock();

        let live: HashSet<ElementId> = doc
            .elements()
            .iter()
            .filter(|element| element.image_src().is_some())
            .map(|element| element.id)
            .collect();
        state.pending.retain(|id, pending| {
            let keep = live.contains(id);
            if !keep {
                log::debug!("Cancelling decode of removed image {}", id);
                pending.abort.abort();
            }
            keep
        });

        let mut tasks = Vec::new();
        for element in doc.elements() {
            let Some(src) = element.image_src() else {
                continue;
            };
            let id = element.id;
            if state.resolved.contains_key(&id)
                || state.pending.contains_key(&id)
                || state.failed.contains(&id)
            {
                continue;
            }

            let generation = state.next_generation;
            state.next_generation += 1;
            let (task, abort) = self.decode_task(id, generation, src.to_owned());
            state.pending.insert(id, Pending { generation, abort });
            tasks.push(task);
        }
        tasks
    }

    fn decode_task(&self, id: ElementId, generation: u64, src: String) -> (DecodeTask, AbortHandle) {
        let (decode, abort) = futures::future::abortable(async move { crate::image::decode_source(&src) });
        let state = Arc::clone(&self.state);
        let repaint = self.repaint.clone();

        let future = async move {
            let result = decode.await;
            let mut state = state.lock();
            let current = state.pending.get(&id).map(|pending| pending.generation);

            let decoded = match result {
                Err(Aborted) => return DecodeOutcome::Cancelled(id),
                Ok(_) if current != Some(generation) => {
                    log::debug!("Dropping stale decode of image {}", id);
                    return DecodeOutcome::Stale(id);
                }
                Ok(decoded) => decoded,
            };
            state.pending.remove(&id);

            match decoded {
                Ok(pixmap) => {
                    log::debug!("Decoded image {} ({}x{})", id, pixmap.width(), pixmap.height());
                    state.resolved.insert(id, Arc::new(pixmap));
                    state.dirty = true;
                    drop(state);
                    if let Some(repaint) = repaint {
                        repaint();
                    }
                    DecodeOutcome::Ready(id)
                }
                Err(err) => {
                    log::warn!("Failed to decode image {}: {}", id, err);
                    state.failed.insert(id);
                    DecodeOutcome::Failed(id)
                }
            }
        }
        .boxed();

        (DecodeTask { id, future }, abort)
    }

    /// Copy of the resolved map for one paint pass.
    pub fn snapshot(&self) -> ResolvedImages {
        self.state.lock().resolved.clone()
    }

    /// True once per batch of newly decoded rasters.
    pub fn take_dirty(&self) -> bool {
        std::mem::take(&mut self.state.lock().dirty)
    }

    pub fn is_resolved(&self, id: ElementId) -> bool {
        self.state.lock().resolved.contains_key(&id)
    }

    pub fn is_pending(&self, id: ElementId) -> bool {
        self.state.lock().pending.contains_key(&id)
    }

    pub fn pending_count(&self) -> usize {
        self.state.lock().pending.len()
    }
}

/// One image decode. Poll it on any executor; it updates the cache itself.
pub struct DecodeTask {
    id: ElementId,
    future: BoxFuture<'static, DecodeOutcome>,
}

impl DecodeTask {
    pub fn id(&self) -> ElementId {
        self.id
    }
}

impl Future for DecodeTask {
    type Output = DecodeOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.future.as_mut().poll(cx)
    }
}

impl std::fmt::Debug for DecodeTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodeTask").field("id", &self.id).finish_non_exhaustive()
    }
}
