//! Shared test payloads.

use crate::Client;
use guya_cache::VersionCache;
use guya_config::Config;
use guya_graph::GroupRegistry;
use guya_graph::models::Book;
use guya_transport::TransportHandle;
use guya_transport::backend::MockTransport;
use serde_json::{Value, json};
use std::sync::Arc;

pub(crate) const API: &str = "https://guya.test/api";
pub(crate) const MEDIA: &str = "https://guya.test";

/// A client over `transport` with its own registry and cache, so tests never
/// share state through the process-wide registry.
pub(crate) fn client(transport: &Arc<MockTransport>) -> Client {
    let mut config = Config::default();
    config.api.base_url = API.to_string();
    config.media.base_url = MEDIA.to_string();
    let handle: TransportHandle = Arc::clone(transport) as TransportHandle;
    Client::with_transport(handle, &config)
        .with_registry(Arc::new(GroupRegistry::default()))
        .with_cache(Arc::new(VersionCache::default()))
}

pub(crate) fn catalog(entries: &[(&str, &str, &str)]) -> Value {
    let mut catalog = serde_json::Map::new();
    for (title, slug, hash) in entries {
        catalog.insert(title.to_string(), json!({ "slug": slug, "series_data_hash": hash, "cover": "/ignored.jpg" }));
    }
    Value::Object(catalog)
}

pub(crate) fn book_json(slug: &str, title: &str) -> Value {
    json!({
        "slug": slug,
        "title": title,
        "author": "Aka Akasaka",
        "artist": "Mengo Yokoyari",
        "description": "A story.",
        "cover": format!("/media/manga/{slug}/volume_covers/1/cover.jpg"),
        "groups": { "1": "Group One", "2": "Another Group" },
        "chapters": {
            "1": {
                "volume": "1",
                "title": "Beginnings",
                "folder": "0001_abc",
                "groups": { "1": ["01.png", "02.png"], "2": ["01.jpg"] }
            },
            "2": {
                "volume": 1,
                "title": "Continuations",
                "folder": "0002_def",
                "groups": { "1": ["01.png"] }
            }
        }
    })
}

pub(crate) fn book(registry: &GroupRegistry, slug: &str, title: &str) -> Arc<Book> {
    match book_json(slug, title) {
        Value::Object(data) => guya_graph::build(registry, &data).unwrap(),
        _ => unreachable!(),
    }
}
