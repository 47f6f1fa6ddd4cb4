use super::{Book, Chapter};
use std::cmp::Ordering;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::{Arc, OnceLock, Weak};

/// A volume of a [`Book`].
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Volume {
    #[cfg_attr(feature = "serde", serde(skip))]
    book: OnceLock<Weak<Book>>,
    number: i32,
    chapters: Vec<Arc<Chapter>>,
}

impl Volume {
    pub(crate) fn new(number: i32, mut chapters: Vec<Arc<Chapter>>) -> Arc<Self> {
        chapters.sort_by(|a, b| Chapter::by_number(a, b));
        let volume = Arc::new(Self { book: OnceLock::new(), number, chapters });
        for chapter in &volume.chapters {
            chapter.assign_parent(&volume);
        }
        volume
    }

    pub fn number(&self) -> i32 {
        self.number
    }

    /// Chapters in ascending (numeric) chapter order.
    pub fn chapters(&self) -> &[Arc<Chapter>] {
        &self.chapters
    }

    pub fn book(&self) -> Option<Arc<Book>> {
        self.book.get().and_then(Weak::upgrade)
    }

    pub(crate) fn assign_parent(&self, parent: &Arc<Book>) {
        _ = self.book.set(Arc::downgrade(parent));
    }

    pub fn by_number(a: &Self, b: &Self) -> Ordering {
        a.number.cmp(&b.number)
    }
}

impl PartialEq for Volume {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}
impl Eq for Volume {}

impl Debug for Volume {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Volume").field("number", &self.number).field("chapters", &self.chapters).finish()
    }
}
