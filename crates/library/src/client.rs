use crate::endpoints::Endpoints;
use crate::error::{ErrorKind, Result};
use crate::links::Links;
use crate::request::Request;
use crate::sync::{self, SyncEvent, Synchronizer};
use exn::ResultExt;
use futures::{Stream, TryStreamExt};
use guya_cache::VersionCache;
use guya_config::Config;
use guya_graph::GroupRegistry;
use guya_graph::models::{Book, Group};
use guya_transport::{HttpTransport, TransportHandle};
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

/// Everything needed to talk to one API: a transport, where the API and its
/// media live, the group registry and the version cache.
///
/// Cloning is cheap and clones share the registry and cache.
#[derive(Clone)]
pub struct Client {
    transport: TransportHandle,
    registry: Arc<GroupRegistry>,
    cache: Arc<VersionCache>,
    endpoints: Endpoints,
    links: Links,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("transport", &self.transport.name())
            .field("endpoints", &self.endpoints)
            .field("links", &self.links)
            .field("cached", &self.cache.len())
            .finish()
    }
}

impl Client {
    /// An HTTP client for `config`, using the process-wide group registry and
    /// a fresh cache.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate().or_raise(|| ErrorKind::Config)?;
        let transport = HttpTransport::new(config.http.timeout(), &config.http.user_agent).or_raise(|| ErrorKind::Config)?;
        Ok(Self::with_transport(Arc::new(transport), config))
    }

    pub fn with_transport(transport: TransportHandle, config: &Config) -> Self {
        Self {
            transport,
            registry: GroupRegistry::global(),
            cache: Arc::new(VersionCache::default()),
            endpoints: Endpoints::new(config.api.base_url.as_str()),
            links: Links::new(config.media.base_url.as_str()),
        }
    }

    pub fn with_registry(mut self, registry: Arc<GroupRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Share a cache between clients (or keep one across client rebuilds).
    pub fn with_cache(mut self, cache: Arc<VersionCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn transport(&self) -> &TransportHandle {
        &self.transport
    }

    pub fn registry(&self) -> &Arc<GroupRegistry> {
        &self.registry
    }

    pub fn cache(&self) -> &Arc<VersionCache> {
        &self.cache
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn links(&self) -> &Links {
        &self.links
    }

    /// Fetch and build one book. The identifier is validated before anything
    /// touches the network. The cache is neither consulted nor updated.
    #[instrument(skip(self))]
    pub async fn fetch_book(&self, slug: &str) -> Result<Arc<Book>> {
        let url = self.endpoints.series(slug)?;
        let data = self.transport.fetch_json(&url).await.map_err(ErrorKind::transport)?;
        let book = guya_graph::build(&self.registry, &data).map_err(ErrorKind::graph)?;
        debug!(title = book.title(), volumes = book.volumes().len(), "fetched book");
        Ok(book)
    }

    /// Fetch every known group, register them all and return them sorted by
    /// name.
    #[instrument(skip(self))]
    pub async fn fetch_all_groups(&self) -> Result<Vec<Arc<Group>>> {
        let data = self.transport.fetch_json(&self.endpoints.groups()).await.map_err(ErrorKind::transport)?;
        guya_graph::preload_groups(&self.registry, &data).map_err(ErrorKind::graph)?;
        let mut groups: Vec<_> = data.keys().filter_map(|identifier| self.registry.get(identifier)).collect();
        groups.sort_by(|a, b| Group::by_name(a, b));
        Ok(groups)
    }

    /// A group seen in any payload so far.
    pub fn lookup_group(&self, identifier: &str) -> Option<Arc<Group>> {
        self.registry.get(identifier)
    }

    pub fn synchronizer(&self, cancel: CancellationToken) -> Synchronizer {
        Synchronizer::new(self.clone(), cancel)
    }

    /// Synchronize the whole catalog, reporting progress as it goes.
    pub fn synchronize(&self) -> impl Stream<Item = Result<SyncEvent>> + Send + 'static {
        self.synchronize_with(CancellationToken::new())
    }

    pub fn synchronize_with(&self, cancel: CancellationToken) -> impl Stream<Item = Result<SyncEvent>> + Send + 'static {
        sync::synchronize(self.synchronizer(cancel))
    }

    /// Every book in the catalog, reusing cached versions where the content
    /// hash still matches. Fails as a whole if any book fails.
    pub async fn fetch_all_books(&self) -> Result<Vec<Arc<Book>>> {
        complete(self.synchronize()).await
    }

    /// A suspended [`Request`] for [`fetch_all_books`](Self::fetch_all_books).
    pub fn request_all_books(
        &self,
        completion: impl FnOnce(Result<Vec<Arc<Book>>>) + Send + 'static,
    ) -> Request<Vec<Arc<Book>>> {
        let cancel = CancellationToken::new();
        Request::new(complete(self.synchronize_with(cancel.clone())), cancel, completion)
    }

    /// A suspended [`Request`] for [`fetch_book`](Self::fetch_book).
    ///
    /// An invalid identifier fails here, so no request is ever created for
    /// it.
    pub fn request_book(
        &self,
        slug: &str,
        completion: impl FnOnce(Result<Arc<Book>>) + Send + 'static,
    ) -> Result<Request<Arc<Book>>> {
        crate::endpoints::validate_slug(slug)?;
        let client = self.clone();
        let slug = slug.to_string();
        Ok(Request::new(async move { client.fetch_book(&slug).await }, CancellationToken::new(), completion))
    }
}

/// Drain a synchronization stream down to its final book list.
async fn complete(events: impl Stream<Item = Result<SyncEvent>>) -> Result<Vec<Arc<Book>>> {
    let mut events = Box::pin(events);
    while let Some(event) = events.try_next().await? {
        if let SyncEvent::Complete(books) = event {
            return Ok(books);
        }
    }
    // Only a stream that was stopped from outside ends without completing.
    exn::bail!(ErrorKind::Cancelled)
}
