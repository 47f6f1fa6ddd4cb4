//! Turns the raw JSON payload of a single book into a linked object graph.
//!
//! The payload looks like this (trimmed):
//!
//! ```json
//! {
//!     "slug": "Kaguya-Wants-To-Be-Confessed-To",
//!     "title": "Kaguya-sama: Love is War",
//!     "author": "Aka Akasaka",
//!     "artist": "Aka Akasaka",
//!     "description": "...",
//!     "cover": "/media/manga/Kaguya-Wants-To-Be-Confessed-To/volume_covers/1/cover.jpg",
//!     "groups": { "2": "Jaimini's~Box~", "3": "Psylocke Scans" },
//!     "chapters": {
//!         "1": {
//!             "volume": "1",
//!             "title": "I Will Make You Invite Me to a Movie",
//!             "folder": "0001_7grvm3j1",
//!             "groups": { "2": ["01.png", "02.png"], "3": ["01.jpg"] }
//!         },
//!         "10.5": { "...": "..." }
//!     }
//! }
//! ```
//!
//! Construction is bottom-up: pages, then releases, chapters, volumes and
//! finally the book. Every constructor sorts its children and claims them as
//! its own before returning, so ordering and back-references are a
//! post-condition of construction.

use crate::error::{ErrorKind, Result};
use crate::models::{Book, Chapter, ChapterNumber, Page, Release, Volume};
use crate::registry::GroupRegistry;
use crate::staging::{BookStaging, ChapterStaging};
use crate::JsonObject;
use exn::{OptionExt, ResultExt};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Build a [`Book`] from its JSON payload.
///
/// Groups listed in the payload are registered in `registry` first (this is
/// the only side effect that outlives a failed build). Any missing or
/// mis-typed field, or a release naming an unknown group, aborts the whole
/// book.
#[instrument(skip_all, fields(slug))]
pub fn build_book(registry: &GroupRegistry, data: &JsonObject) -> Result<Arc<Book>> {
    let mut staging = BookStaging {
        identifier: string(data, "slug")?,
        title: string(data, "title")?,
        author: string(data, "author")?,
        artist: string(data, "artist")?,
        summary: string(data, "description")?,
        cover: string(data, "cover")?,
        volumes: None,
    };
    if let Some(slug) = &staging.identifier {
        tracing::Span::current().record("slug", slug.as_str());
    }

    // Releases only reference groups by identifier, so every group has to be
    // known before the first chapter is looked at.
    let groups = object(data, "groups")?.ok_or_raise(|| ErrorKind::MissingField("groups"))?;
    preload_groups(registry, groups)?;

    if let Some(chapters) = object(data, "chapters")? {
        staging.volumes = Some(volumes(registry, chapters)?);
    }
    staging.finish()
}

/// Register every `identifier → name` pair in `groups`.
pub fn preload_groups(registry: &GroupRegistry, groups: &JsonObject) -> Result<()> {
    for (identifier, name) in groups {
        let name = name
            .as_str()
            .ok_or_raise(|| ErrorKind::InvalidField { field: "groups", value: format!("{identifier}: {name}") })?;
        debug!(identifier, name, "preloading group");
        registry.create_or_get(identifier, name);
    }
    Ok(())
}

/// Groups chapters by their volume number, one [`Volume`] per distinct number.
fn volumes(registry: &GroupRegistry, chapters: &JsonObject) -> Result<Vec<Arc<Volume>>> {
    let mut by_volume = BTreeMap::<i32, Vec<_>>::new();
    for (key, value) in chapters {
        let (volume, chapter) = chapter(registry, key, value)?;
        by_volume.entry(volume).or_default().push(chapter);
    }
    Ok(by_volume.into_iter().map(|(number, chapters)| Volume::new(number, chapters)).collect())
}

#[instrument(level = "trace", skip(registry, value))]
fn chapter(registry: &GroupRegistry, key: &str, value: &Value) -> Result<(i32, Arc<Chapter>)> {
    let data = value
        .as_object()
        .ok_or_raise(|| ErrorKind::InvalidField { field: "chapters", value: value.to_string() })?;
    let mut staging = ChapterStaging {
        number: Some(key.parse::<ChapterNumber>()?),
        volume: volume_number(data)?,
        title: string(data, "title")?,
        folder: string(data, "folder")?,
        releases: None,
    };
    if let Some(groups) = object(data, "groups")? {
        staging.releases = Some(releases(registry, groups)?);
    }
    staging.finish()
}

/// One release per `group identifier → [page file, ...]` entry.
fn releases(registry: &GroupRegistry, groups: &JsonObject) -> Result<Vec<Arc<Release>>> {
    let mut releases = Vec::with_capacity(groups.len());
    for (identifier, files) in groups {
        let group = registry.get(identifier).ok_or_raise(|| ErrorKind::UnregisteredGroup(identifier.clone()))?;
        let files = files
            .as_array()
            .ok_or_raise(|| ErrorKind::InvalidField { field: "groups", value: files.to_string() })?;
        releases.push(Release::new(group, pages(files)?));
    }
    Ok(releases)
}

/// Page numbers follow the order of the file list, starting at 1.
fn pages(files: &[Value]) -> Result<Vec<Arc<Page>>> {
    files
        .iter()
        .enumerate()
        .map(|(index, file)| {
            let file =
                file.as_str().ok_or_raise(|| ErrorKind::InvalidField { field: "pages", value: file.to_string() })?;
            let number = u32::try_from(index + 1)
                .or_raise(|| ErrorKind::InvalidField { field: "pages", value: index.to_string() })?;
            Ok(Page::new(number, file))
        })
        .collect()
}

/// The public API sends volume numbers as strings; accept integers too.
fn volume_number(data: &JsonObject) -> Result<Option<i32>> {
    let invalid = |value: &Value| ErrorKind::InvalidField { field: "volume", value: value.to_string() };
    match data.get("volume") {
        None | Some(Value::Null) => Ok(None),
        Some(value @ Value::Number(number)) => {
            let number = number.as_i64().ok_or_raise(|| invalid(value))?;
            Ok(Some(i32::try_from(number).or_raise(|| invalid(value))?))
        },
        Some(value @ Value::String(number)) => Ok(Some(number.trim().parse::<i32>().or_raise(|| invalid(value))?)),
        Some(value) => exn::bail!(invalid(value)),
    }
}

/// Absent (or `null`) is `None`; present with any other type is an error.
fn string(data: &JsonObject, field: &'static str) -> Result<Option<String>> {
    match data.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(value) => exn::bail!(ErrorKind::InvalidField { field, value: value.to_string() }),
    }
}

fn object<'a>(data: &'a JsonObject, field: &'static str) -> Result<Option<&'a JsonObject>> {
    match data.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(value)) => Ok(Some(value)),
        Some(value) => exn::bail!(ErrorKind::InvalidField { field, value: value.to_string() }),
    }
}
