//! Mutable staging buffers for values assembled from several JSON fragments.
//!
//! Fields are collected as `Option`s while the payload is walked, then
//! validated and frozen in a single `finish()`. The buffers never leave this
//! crate.

use crate::error::{ErrorKind, Result};
use crate::models::{Book, Chapter, ChapterNumber, Release, Volume};
use exn::OptionExt;
use std::sync::Arc;

fn required<T>(value: Option<T>, field: &'static str) -> Result<T> {
    value.ok_or_raise(|| ErrorKind::MissingField(field))
}

#[derive(Default)]
pub(crate) struct BookStaging {
    pub identifier: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub artist: Option<String>,
    pub summary: Option<String>,
    pub cover: Option<String>,
    pub volumes: Option<Vec<Arc<Volume>>>,
}

impl BookStaging {
    /// Field names in errors are the ones used by the remote payload.
    pub fn finish(self) -> Result<Arc<Book>> {
        Ok(Book::new(
            required(self.identifier, "slug")?,
            required(self.title, "title")?,
            required(self.author, "author")?,
            required(self.artist, "artist")?,
            required(self.summary, "description")?,
            required(self.cover, "cover")?,
            required(self.volumes, "chapters")?,
        ))
    }
}

#[derive(Default)]
pub(crate) struct ChapterStaging {
    pub number: Option<ChapterNumber>,
    pub volume: Option<i32>,
    pub title: Option<String>,
    pub folder: Option<String>,
    pub releases: Option<Vec<Arc<Release>>>,
}

impl ChapterStaging {
    /// Returns the volume number the chapter belongs to alongside the chapter.
    pub fn finish(self) -> Result<(i32, Arc<Chapter>)> {
        let number = required(self.number, "chapter number")?;
        let volume = required(self.volume, "volume")?;
        let title = required(self.title, "title")?;
        let folder = required(self.folder, "folder")?;
        let releases = required(self.releases, "groups")?;
        Ok((volume, Chapter::new(number, title, folder, releases)))
    }
}
