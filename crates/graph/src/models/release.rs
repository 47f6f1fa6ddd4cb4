use super::{Chapter, Group, Page};
use std::cmp::Ordering;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::{Arc, OnceLock, Weak};

/// One group's release of a chapter.
///
/// A chapter can have several releases, such as one translated JP → EN and
/// another JP → KR → EN, each by a different group.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Release {
    #[cfg_attr(feature = "serde", serde(skip))]
    chapter: OnceLock<Weak<Chapter>>,
    group: Arc<Group>,
    pages: Vec<Arc<Page>>,
}

impl Release {
    /// Sorts `pages` by number and claims each of them as this release's child.
    pub(crate) fn new(group: Arc<Group>, mut pages: Vec<Arc<Page>>) -> Arc<Self> {
        pages.sort_by(|a, b| Page::by_number(a, b));
        let release = Arc::new(Self { chapter: OnceLock::new(), group, pages });
        for page in &release.pages {
            page.assign_parent(&release);
        }
        release
    }

    /// The (interned) group that produced this release.
    pub fn group(&self) -> &Arc<Group> {
        &self.group
    }

    /// Pages in ascending page number order.
    pub fn pages(&self) -> &[Arc<Page>] {
        &self.pages
    }

    pub fn chapter(&self) -> Option<Arc<Chapter>> {
        self.chapter.get().and_then(Weak::upgrade)
    }

    pub(crate) fn assign_parent(&self, parent: &Arc<Chapter>) {
        _ = self.chapter.set(Arc::downgrade(parent));
    }

    /// Ordered by the name of the releasing group.
    pub fn by_group(a: &Self, b: &Self) -> Ordering {
        Group::by_name(&a.group, &b.group)
    }
}

impl PartialEq for Release {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}
impl Eq for Release {}

impl Debug for Release {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Release").field("group", &self.group).field("pages", &self.pages).finish()
    }
}
