//! Catalog synchronization.
//!
//! One run lists the catalog, reuses every book whose content hash is already
//! cached, and fetches the rest. [`Synchronizer`] is the state machine;
//! [`synchronize`] drives it to completion as a stream of [`SyncEvent`]s.

mod catalog;
mod state;

pub use self::catalog::CatalogEntry;
pub use self::state::{SyncState, Synchronizer};

use crate::error::Result;
use async_stream::stream;
use futures::Stream;
use guya_graph::models::Book;
use std::sync::Arc;

/// Progress events emitted by [`synchronize`].
///
/// Events follow a strict ordering:
/// 1. [`Started`](Self::Started), exactly once.
/// 2. [`Listed`](Self::Listed), exactly once, with the number of distinct
///    books in the catalog.
/// 3. [`Resolved`](Self::Resolved), exactly once.
/// 4. [`Fetched`](Self::Fetched), once per queued book, in catalog order.
/// 5. [`Complete`](Self::Complete), exactly once, with every book.
///
/// An error terminates the stream early, in which case
/// [`Complete`](Self::Complete) is never emitted.
#[derive(Debug)]
pub enum SyncEvent {
    Started,
    Listed(u64),
    /// The catalog has been split into cache hits and books to fetch.
    Resolved { cached: usize, queued: usize },
    /// A queued book has been fetched, built and cached.
    Fetched(Arc<Book>),
    /// Cached books first, then fetched books, each in catalog order.
    Complete(Vec<Arc<Book>>),
}

/// Streams [`SyncEvent`]s until `synchronizer` is done or has failed.
pub fn synchronize(mut synchronizer: Synchronizer) -> impl Stream<Item = Result<SyncEvent>> + Send + 'static {
    // `rustfmt` does not format macros that use braces. Wrap in parentheses!
    stream!({
        while let Some(event) = synchronizer.step().await.transpose() {
            yield event;
        }
    })
}
