//! Client for the guya.moe reader API.
//!
//! - [`Client`] fetches single books, the group list, or the whole catalog.
//! - [`sync`] keeps a [`VersionCache`](guya_cache::VersionCache) in step with
//!   the catalog, fetching only books whose content hash changed.
//! - [`Request`] wraps any of those as a suspended, cancellable operation that
//!   reports through a completion callback.
//! - [`Links`] turns covers and pages into media URLs.

mod client;
mod consts;
pub mod endpoints;
pub mod error;
pub mod links;
pub mod request;
pub mod sync;

#[cfg(test)]
mod fixtures;

pub use crate::client::Client;
pub use crate::endpoints::{Endpoints, validate_slug};
pub use crate::links::Links;
pub use crate::request::Request;
pub use crate::sync::{SyncEvent, SyncState, Synchronizer, synchronize};

pub use guya_transport::JsonObject;
