//! The catalog lists every book the server knows about, keyed by title:
//!
//! ```json
//! {
//!     "Kaguya-sama: Love is War": {
//!         "slug": "Kaguya-Wants-To-Be-Confessed-To",
//!         "series_data_hash": "c3a9e1...",
//!         "...": "..."
//!     }
//! }
//! ```
//!
//! Only the identifier and the content hash matter here; everything else is
//! fetched per book.

use crate::JsonObject;
use crate::error::{ErrorKind, Result};
use exn::OptionExt;
use guya_cache::ContentHash;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{instrument, warn};

/// One book's identity and current version, as advertised by the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub identifier: String,
    pub hash: ContentHash,
}

/// Parse the catalog into one entry per distinct identifier.
///
/// Entries keep the catalog's (title) order. When two titles share an
/// identifier the later hash wins, keeping the earlier position. Any entry
/// without a usable `slug` or `series_data_hash` fails the whole catalog.
#[instrument(level = "debug", skip_all, fields(titles = data.len()))]
pub(crate) fn parse(data: &JsonObject) -> Result<Vec<CatalogEntry>> {
    let mut entries: Vec<CatalogEntry> = Vec::with_capacity(data.len());
    let mut positions: HashMap<String, usize> = HashMap::with_capacity(data.len());
    for (title, details) in data {
        let details = details
            .as_object()
            .ok_or_raise(|| ErrorKind::DataMalformed(format!("catalog entry {title:?} is not an object")))?;
        let identifier = details
            .get("slug")
            .and_then(Value::as_str)
            .ok_or_raise(|| ErrorKind::DataMalformed(format!("catalog entry {title:?} has no slug")))?;
        let hash = details
            .get("series_data_hash")
            .and_then(ContentHash::from_json)
            .ok_or_raise(|| ErrorKind::DataMalformed(format!("catalog entry {title:?} has no series_data_hash")))?;

        if let Some(&position) = positions.get(identifier) {
            warn!(identifier, title, "duplicate identifier in catalog, keeping the later version");
            entries[position].hash = hash;
            continue;
        }
        positions.insert(identifier.to_string(), entries.len());
        entries.push(CatalogEntry { identifier: identifier.to_string(), hash });
    }
    Ok(entries)
}
