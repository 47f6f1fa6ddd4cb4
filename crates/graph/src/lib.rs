//! Object graph for books served by the remote API.
//!
//! - [`models`] describes the graph: `Book → Volume → Chapter → Release → Page`,
//!   plus the interned [`Group`](models::Group)s that releases point at.
//! - [`GroupRegistry`] interns groups for the whole process.
//! - [`build`] turns the JSON payload of one book into a fully linked,
//!   sorted [`Book`](models::Book), or fails without producing anything.
//!
//! Enable the `serde` feature to serialize a graph (parent links are
//! skipped), e.g. for debugging dumps.

mod build;
pub mod error;
pub mod models;
mod registry;
mod staging;

pub use crate::build::preload_groups;
pub use crate::registry::GroupRegistry;

use crate::error::Result;
use crate::models::Book;
use std::sync::Arc;

/// A decoded JSON object, as handed over by the transport.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// Easy, top-level entrypoint for building a [`Book`] from its JSON payload.
///
/// Groups listed in the payload are registered in `registry` before any
/// release is resolved. A missing or mis-typed field, a non-numeric chapter
/// key or a release naming an unknown group fails the whole book.
pub fn build(registry: &GroupRegistry, data: &JsonObject) -> Result<Arc<Book>> {
    crate::build::build_book(registry, data)
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialize_skips_parent_links() {
        let registry = GroupRegistry::default();
        let data = json!({
            "slug": "oshi-no-ko", "title": "Oshi no Ko", "author": "Aka Akasaka", "artist": "Mengo Yokoyari",
            "description": "", "cover": "/cover.png",
            "groups": { "1": "Group" },
            "chapters": { "1": { "volume": 1, "title": "Mother and Children", "folder": "f", "groups": { "1": ["1.png"] } } }
        });
        let book = build(&registry, data.as_object().unwrap()).unwrap();
        let value = serde_json::to_value(&*book).unwrap();
        assert_eq!(value["identifier"], "oshi-no-ko");
        let page = &value["volumes"][0]["chapters"][0]["releases"][0]["pages"][0];
        assert_eq!(page, &json!({ "number": 1, "file": "1.png" }));
        assert_eq!(value["volumes"][0]["chapters"][0]["releases"][0]["group"]["name"], "Group");
        assert_eq!(value["volumes"][0]["chapters"][0]["number"], 1.0);
    }
}
