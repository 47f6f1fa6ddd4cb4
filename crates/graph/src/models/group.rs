use std::cmp::Ordering;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// A scanlation group responsible for one or more releases.
///
/// Groups are shared across the entire platform, so they are only ever
/// created through a [`GroupRegistry`](crate::GroupRegistry) which hands out
/// the same instance for every lookup of the same identifier.
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Group {
    identifier: String,
    name: String,
}

impl Group {
    pub(crate) fn new(identifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self { identifier: identifier.into(), name: name.into() }
    }

    /// Identifier used by the remote API.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display ordering: by name.
    pub fn by_name(a: &Self, b: &Self) -> Ordering {
        a.name.cmp(&b.name)
    }
}

impl PartialEq for Group {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}
impl Eq for Group {}

impl Display for Group {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} ({})", self.name, self.identifier)
    }
}
