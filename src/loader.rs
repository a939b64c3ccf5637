//! Fetch coordination: one network fetch per URL, fan-out to every waiter.
//!
//! [`IconLoader`] owns the [`SvgCache`] and a registry of callbacks waiting
//! on in-flight fetches. However many instances request the same URL before
//! its fetch resolves, exactly one fetch runs; when it completes, every
//! queued callback is invoked in registration order with the same shared
//! content.
//!
//! # Execution model
//!
//! The loader is single-owner: cache and registry mutation and all callback
//! invocation happen on the thread that owns the loader. A worker thread is
//! spawned per distinct in-flight URL; it only runs the fetcher and sends
//! one completion message back. Completions are applied when the owner
//! pumps the loader via [`poll`](IconLoader::poll) or
//! [`wait_idle`](IconLoader::wait_idle). `request` never blocks.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::cache::SvgCache;
use crate::fetch::{FetchError, SvgFetcher};
use crate::resolver::AssetUrl;

/// Outcome delivered to callbacks registered with [`IconLoader::request`].
#[derive(Debug, Clone)]
pub enum LoadUpdate {
    /// The asset was fetched (or already cached); here is its content.
    Ready(Arc<str>),

    /// The fetch for the asset failed. Nothing was cached; a later
    /// request for the same URL starts over from a fresh miss.
    Failed(FetchError),
}

impl LoadUpdate {
    /// The content, if this update carries any.
    pub fn content(&self) -> Option<&Arc<str>> {
        match self {
            Self::Ready(content) => Some(content),
            Self::Failed(_) => None,
        }
    }
}

/// Callback invoked once the requested asset resolves.
pub type LoadCallback = Box<dyn FnOnce(&LoadUpdate)>;

/// Completion message sent from a fetch worker back to the owner.
struct FetchDone {
    url: AssetUrl,
    result: Result<String, FetchError>,
}

/// Shared asset loader: cache, in-flight tracking, and callback fan-out.
///
/// Construct one per application root and pass it by reference to every
/// [`Icon`](crate::Icon). The loader is deliberately neither `Send` nor
/// `Sync`: all of its state belongs to the owning thread.
pub struct IconLoader {
    fetcher: Arc<dyn SvgFetcher>,
    cache: RefCell<SvgCache>,
    pending: RefCell<HashMap<AssetUrl, Vec<LoadCallback>>>,
    done_tx: Sender<FetchDone>,
    done_rx: Receiver<FetchDone>,
    in_flight: Cell<usize>,
}

impl IconLoader {
    /// Creates a loader that retrieves assets through the given fetcher.
    pub fn new(fetcher: Arc<dyn SvgFetcher>) -> Self {
        let (done_tx, done_rx) = unbounded();
        Self {
            fetcher,
            cache: RefCell::new(SvgCache::new()),
            pending: RefCell::new(HashMap::new()),
            done_tx,
            done_rx,
            in_flight: Cell::new(0),
        }
    }

    /// Creates a loader backed by [`HttpFetcher`](crate::HttpFetcher).
    #[cfg(feature = "http")]
    pub fn over_http() -> Self {
        Self::new(Arc::new(crate::fetch::HttpFetcher::new()))
    }

    /// Looks up already-fetched content for a URL.
    pub fn cached(&self, url: &AssetUrl) -> Option<Arc<str>> {
        self.cache.borrow().get(url)
    }

    /// Registers interest in an asset.
    ///
    /// On a cache hit the callback is invoked synchronously with the
    /// cached content and no fetch happens. On a miss the callback is
    /// queued; if it is the first interest in this URL, one fetch is
    /// started. Callbacks queued for one URL fire in registration order
    /// when the owner next pumps the loader.
    pub fn request(&self, url: &AssetUrl, on_update: LoadCallback) {
        if let Some(content) = self.cached(url) {
            on_update(&LoadUpdate::Ready(content));
            return;
        }

        let first_interest = match self.pending.borrow_mut().entry(url.clone()) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().push(on_update);
                false
            }
            Entry::Vacant(entry) => {
                entry.insert(vec![on_update]);
                true
            }
        };

        if first_interest {
            self.spawn_fetch(url.clone());
        }
    }

    /// Applies any completions that have arrived, without blocking.
    ///
    /// Returns the number of fetches resolved (successfully or not).
    /// Call this from the owner's event loop.
    pub fn poll(&self) -> usize {
        let mut resolved = 0;
        while let Ok(done) = self.done_rx.try_recv() {
            self.deliver(done);
            resolved += 1;
        }
        resolved
    }

    /// Blocks until every in-flight fetch has resolved and its callbacks
    /// have run.
    pub fn wait_idle(&self) {
        while self.in_flight.get() > 0 {
            match self.done_rx.recv() {
                Ok(done) => self.deliver(done),
                Err(_) => break,
            }
        }
    }

    /// True when no fetch is outstanding.
    pub fn is_idle(&self) -> bool {
        self.in_flight.get() == 0
    }

    /// Number of fetches currently outstanding.
    pub fn in_flight(&self) -> usize {
        self.in_flight.get()
    }

    fn spawn_fetch(&self, url: AssetUrl) {
        log::debug!("requesting {url}");
        self.in_flight.set(self.in_flight.get() + 1);

        let fetcher = Arc::clone(&self.fetcher);
        let done_tx = self.done_tx.clone();
        thread::spawn(move || {
            let result = fetcher.fetch(url.as_str());
            // The owner may have been dropped; nothing to deliver to then.
            let _ = done_tx.send(FetchDone { url, result });
        });
    }

    /// Applies one completion: cache write, registry removal, fan-out.
    ///
    /// All borrows are released before callbacks run, so a callback may
    /// re-enter `request` (and will see the fresh cache entry).
    fn deliver(&self, done: FetchDone) {
        self.in_flight.set(self.in_flight.get() - 1);

        let callbacks = self
            .pending
            .borrow_mut()
            .remove(&done.url)
            .unwrap_or_default();

        let update = match done.result {
            Ok(content) => {
                let content: Arc<str> = Arc::from(content);
                self.cache
                    .borrow_mut()
                    .put(done.url.clone(), Arc::clone(&content));
                LoadUpdate::Ready(content)
            }
            Err(err) => {
                log::error!("icon could not be loaded: {}: {err}", done.url);
                LoadUpdate::Failed(err)
            }
        };

        for callback in callbacks {
            callback(&update);
        }
    }
}
