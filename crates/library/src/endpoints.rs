use crate::consts::{CATALOG_ENDPOINT, GROUPS_ENDPOINT, SERIES_ENDPOINT};
use crate::error::{ErrorKind, Result};

/// API addresses, derived from one base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self { base: base.trim_end_matches('/').to_string() }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// The catalog: every book's identifier and content hash, keyed by title.
    pub fn catalog(&self) -> String {
        format!("{}/{CATALOG_ENDPOINT}", self.base)
    }

    /// The full payload of one book.
    ///
    /// Fails with [`ErrorKind::AddressMalformed`] for anything that is not a
    /// valid book identifier, so nothing unexpected is ever spliced into the
    /// path.
    pub fn series(&self, slug: &str) -> Result<String> {
        validate_slug(slug)?;
        Ok(format!("{}/{SERIES_ENDPOINT}/{slug}/", self.base))
    }

    /// Every group that has ever released anything, as `identifier → name`.
    pub fn groups(&self) -> String {
        format!("{}/{GROUPS_ENDPOINT}", self.base)
    }
}

/// Book identifiers are non-empty runs of word characters and hyphens.
pub fn validate_slug(slug: &str) -> Result<()> {
    if !crate::consts::SLUG_REGEX.is_match(slug) {
        exn::bail!(ErrorKind::AddressMalformed(slug.to_string()));
    }
    Ok(())
}
