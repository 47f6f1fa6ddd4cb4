use super::Release;
use std::cmp::Ordering;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::{Arc, OnceLock, Weak};

/// A single page image within a [`Release`].
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Page {
    #[cfg_attr(feature = "serde", serde(skip))]
    release: OnceLock<Weak<Release>>,
    number: u32,
    file: String,
}

impl Page {
    pub(crate) fn new(number: u32, file: impl Into<String>) -> Arc<Self> {
        Arc::new(Self { release: OnceLock::new(), number, file: file.into() })
    }

    /// Page number, starting from 1.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Image file name (relative to the release's folder).
    pub fn file(&self) -> &str {
        &self.file
    }

    /// The release this page belongs to, if it is still alive.
    pub fn release(&self) -> Option<Arc<Release>> {
        self.release.get().and_then(Weak::upgrade)
    }

    /// First writer wins; later assignments are ignored.
    pub(crate) fn assign_parent(&self, parent: &Arc<Release>) {
        _ = self.release.set(Arc::downgrade(parent));
    }

    pub fn by_number(a: &Self, b: &Self) -> Ordering {
        a.number.cmp(&b.number)
    }
}

impl PartialEq for Page {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}
impl Eq for Page {}

impl Debug for Page {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Page").field("number", &self.number).field("file", &self.file).finish()
    }
}
