use super::{Chapter, Volume};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

/// A series (manga) and everything published for it.
///
/// A `Book` is either fully valid or it doesn't exist: the builder only hands
/// one out once every required field is present and every child has been
/// attached. It is the root of its graph and has no parent.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Book {
    identifier: String,
    title: String,
    author: String,
    artist: String,
    summary: String,
    cover: String,
    volumes: Vec<Arc<Volume>>,
}

impl Book {
    pub(crate) fn new(
        identifier: String,
        title: String,
        author: String,
        artist: String,
        summary: String,
        cover: String,
        mut volumes: Vec<Arc<Volume>>,
    ) -> Arc<Self> {
        volumes.sort_by(|a, b| Volume::by_number(a, b));
        let book = Arc::new(Self { identifier, title, author, artist, summary, cover, volumes });
        for volume in &book.volumes {
            volume.assign_parent(&book);
        }
        book
    }

    /// The slug used by the remote API to identify this book.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    /// Description of the book.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Cover image path, relative to the media host.
    pub fn cover(&self) -> &str {
        &self.cover
    }

    /// Volumes in ascending volume number order.
    pub fn volumes(&self) -> &[Arc<Volume>] {
        &self.volumes
    }

    /// All chapters of all volumes, in volume order then chapter order.
    pub fn chapters(&self) -> impl Iterator<Item = &Arc<Chapter>> {
        self.volumes.iter().flat_map(|volume| volume.chapters())
    }
}

impl PartialEq for Book {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}
impl Eq for Book {}

impl Debug for Book {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Book")
            .field("identifier", &self.identifier)
            .field("title", &self.title)
            .field("author", &self.author)
            .field("artist", &self.artist)
            .field("summary", &self.summary)
            .field("cover", &self.cover)
            .field("volumes", &self.volumes)
            .finish()
    }
}
