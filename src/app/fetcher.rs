//! Background fetch dispatch.
//!
//! Search pages and thumbnails are fetched on short-lived worker threads;
//! completions come back over an mpsc channel that the event loop drains.
//! All state mutation stays on the event-loop thread; workers only ever
//! report outcomes.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use crate::remote::{RemoteError, SearchBackend};
use crate::search::{FetchRequest, PageResult};

/// A completed background fetch.
#[derive(Debug)]
pub enum Arrival {
    /// A search page fetch finished.
    Page {
        /// Session generation the fetch was issued for.
        generation: u64,
        page: u64,
        outcome: Result<PageResult, RemoteError>,
    },
    /// A thumbnail download finished.
    Thumbnail {
        url: String,
        outcome: Result<Vec<u8>, RemoteError>,
    },
}

/// Dispatches fetches to worker threads and collects their completions.
pub struct Fetcher {
    backend: Arc<dyn SearchBackend>,
    tx: Sender<Arrival>,
    rx: Receiver<Arrival>,
}

impl Fetcher {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { backend, tx, rx }
    }

    /// Run a search fetch on a worker thread.
    pub fn dispatch(&self, request: FetchRequest) {
        crate::perf::log_event(
            "fetch.dispatch",
            format!(
                "query={} page={} generation={}",
                request.query, request.page, request.generation
            ),
        );
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let outcome = backend.search(&request.query, request.page);
            // Receiver may be gone during shutdown.
            let _ = tx.send(Arrival::Page {
                generation: request.generation,
                page: request.page,
                outcome,
            });
        });
    }

    /// Run a thumbnail download on a worker thread.
    pub fn dispatch_thumbnail(&self, url: String) {
        crate::perf::log_event("thumb.dispatch", &url);
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let outcome = backend.fetch_thumbnail(&url);
            let _ = tx.send(Arrival::Thumbnail { url, outcome });
        });
    }

    /// Take the next completion if one is ready.
    pub fn try_recv(&self) -> Option<Arrival> {
        self.rx.try_recv().ok()
    }

    /// Block up to `timeout` for the next completion.
    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<Arrival> {
        self.rx.recv_timeout(timeout).ok()
    }
}
