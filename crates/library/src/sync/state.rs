use crate::Client;
use crate::error::{Error, ErrorKind, Result};
use crate::sync::SyncEvent;
use crate::sync::catalog::{self, CatalogEntry};
use guya_graph::models::Book;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Where a [`Synchronizer`] is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    /// Waiting for the catalog.
    Listing,
    /// Catalog parsed; about to sort entries into cache hits and fetches.
    Resolving,
    /// Fetching queued books one at a time.
    Fetching { remaining: usize },
    Done,
    Failed,
}

/// Drives one catalog synchronization, one [`step`](Self::step) at a time.
///
/// ```text
/// Idle ─▶ Listing ─▶ Resolving ─▶ Fetching{n} ─▶ … ─▶ Fetching{0} ─▶ Done
///            │           │             │
///            └───────────┴─────────────┴──▶ Failed
/// ```
///
/// Books whose catalog hash is already cached are reused as-is. Every other
/// book has its stale cache entries evicted and is queued; queued books are
/// fetched serially, in catalog order, and each one is cached under its new
/// hash as soon as it has been built. The first failure (or cancellation)
/// abandons the whole run: the queue and the books collected so far are
/// discarded, but cache entries committed earlier in the run stay put.
pub struct Synchronizer {
    client: Client,
    cancel: CancellationToken,
    state: SyncState,
    entries: Vec<CatalogEntry>,
    queue: VecDeque<CatalogEntry>,
    books: Vec<Arc<Book>>,
}

impl Synchronizer {
    pub fn new(client: Client, cancel: CancellationToken) -> Self {
        Self {
            client,
            cancel,
            state: SyncState::Idle,
            entries: Vec::new(),
            queue: VecDeque::new(),
            books: Vec::new(),
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Advance by one transition.
    ///
    /// Returns the event describing the transition, `Ok(None)` once the run
    /// has finished (either way), or the error that just moved it to
    /// [`SyncState::Failed`].
    pub async fn step(&mut self) -> Result<Option<SyncEvent>> {
        if matches!(self.state, SyncState::Done | SyncState::Failed) {
            return Ok(None);
        }
        if self.cancel.is_cancelled() {
            return Err(self.fail(exn::Exn::from(ErrorKind::Cancelled)));
        }
        let result = match self.state {
            SyncState::Idle => {
                self.state = SyncState::Listing;
                Ok(SyncEvent::Started)
            },
            SyncState::Listing => self.list().await,
            SyncState::Resolving => self.resolve(),
            SyncState::Fetching { .. } => self.fetch_next().await,
            SyncState::Done | SyncState::Failed => return Ok(None),
        };
        result.map(Some).map_err(|err| self.fail(err))
    }

    #[instrument(skip_all)]
    async fn list(&mut self) -> Result<SyncEvent> {
        let url = self.client.endpoints().catalog();
        let data = self.cancellable(self.client.transport().fetch_json(&url)).await?.map_err(ErrorKind::transport)?;
        self.entries = catalog::parse(&data)?;
        self.state = SyncState::Resolving;
        // Infallible: a usize (either 32- or 64-bit) will always fit in a u64.
        Ok(SyncEvent::Listed(u64::try_from(self.entries.len()).unwrap_or(0)))
    }

    #[instrument(skip_all)]
    fn resolve(&mut self) -> Result<SyncEvent> {
        let cache = self.client.cache();
        let mut cached = 0;
        for entry in std::mem::take(&mut self.entries) {
            if let Some(book) = cache.get(&entry.hash) {
                debug!(identifier = %entry.identifier, hash = %entry.hash, "cache hit");
                self.books.push(book);
                cached += 1;
                continue;
            }
            // Checked before anything is evicted, so a bad identifier leaves
            // the cache alone.
            crate::endpoints::validate_slug(&entry.identifier)?;
            while let Some(stale) = cache.remove_identifier(&entry.identifier) {
                debug!(identifier = stale.identifier(), "evicted stale version");
            }
            self.queue.push_back(entry);
        }
        let queued = self.queue.len();
        info!(cached, queued, "resolved catalog against cache");
        self.state = SyncState::Fetching { remaining: queued };
        Ok(SyncEvent::Resolved { cached, queued })
    }

    async fn fetch_next(&mut self) -> Result<SyncEvent> {
        let Some(entry) = self.queue.pop_front() else {
            self.state = SyncState::Done;
            return Ok(SyncEvent::Complete(std::mem::take(&mut self.books)));
        };
        let book = self.cancellable(self.client.fetch_book(&entry.identifier)).await??;
        info!(identifier = %entry.identifier, hash = %entry.hash, "fetched book");
        self.client.cache().put(entry.hash, Arc::clone(&book));
        self.books.push(Arc::clone(&book));
        self.state = SyncState::Fetching { remaining: self.queue.len() };
        Ok(SyncEvent::Fetched(book))
    }

    /// Race `future` against cancellation. Cancellation wins ties.
    async fn cancellable<T>(&self, future: impl Future<Output = T>) -> Result<T> {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(exn::Exn::from(ErrorKind::Cancelled)),
            output = future => Ok(output),
        }
    }

    fn fail(&mut self, err: Error) -> Error {
        let kind: &ErrorKind = &err;
        warn!(error = %kind, "synchronization failed");
        self.entries.clear();
        self.queue.clear();
        self.books.clear();
        self.state = SyncState::Failed;
        err
    }
}
