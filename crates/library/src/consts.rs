use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// Book identifiers ("slugs") are URL-safe tokens: word characters and hyphens.
regex!(SLUG_REGEX, r"^[\w-]+$");

pub(crate) const CATALOG_ENDPOINT: &str = "get_all_series/";
pub(crate) const SERIES_ENDPOINT: &str = "series";
pub(crate) const GROUPS_ENDPOINT: &str = "get_all_groups/";
