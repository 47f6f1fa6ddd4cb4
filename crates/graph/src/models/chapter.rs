use super::{Group, Release, Volume};
use crate::error::{Error, ErrorKind};
use exn::ResultExt;
use std::cmp::Ordering;
use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use std::sync::{Arc, OnceLock, Weak};

/// A chapter number. Side chapters use fractional numbers (`"10.5"`), so
/// this is a decimal that orders numerically rather than lexicographically.
#[derive(Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ChapterNumber(f64);

impl ChapterNumber {
    pub fn value(self) -> f64 {
        self.0
    }
}
impl FromStr for ChapterNumber {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ErrorKind::InvalidField { field: "chapter number", value: s.to_string() };
        let number: f64 = s.trim().parse::<f64>().or_raise(invalid)?;
        // `f64::from_str` happily accepts "NaN" and "inf".
        if !number.is_finite() {
            exn::bail!(invalid());
        }
        Ok(Self(number))
    }
}
impl PartialEq for ChapterNumber {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for ChapterNumber {}
impl PartialOrd for ChapterNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for ChapterNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}
impl Display for ChapterNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        // f64's Display already prints `10` for 10.0 and `10.5` for 10.5.
        write!(f, "{}", self.0)
    }
}
impl Debug for ChapterNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(self, f)
    }
}

/// A chapter within a [`Volume`], with one release per group that worked on it.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Chapter {
    #[cfg_attr(feature = "serde", serde(skip))]
    volume: OnceLock<Weak<Volume>>,
    number: ChapterNumber,
    title: String,
    folder: String,
    releases: Vec<Arc<Release>>,
}

impl Chapter {
    pub(crate) fn new(
        number: ChapterNumber,
        title: impl Into<String>,
        folder: impl Into<String>,
        mut releases: Vec<Arc<Release>>,
    ) -> Arc<Self> {
        releases.sort_by(|a, b| Release::by_group(a, b));
        let chapter =
            Arc::new(Self { volume: OnceLock::new(), number, title: title.into(), folder: folder.into(), releases });
        for release in &chapter.releases {
            release.assign_parent(&chapter);
        }
        chapter
    }

    pub fn number(&self) -> ChapterNumber {
        self.number
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Remote folder holding the page images of every release.
    pub fn folder(&self) -> &str {
        &self.folder
    }

    /// Releases ordered by group name.
    pub fn releases(&self) -> &[Arc<Release>] {
        &self.releases
    }

    /// Every group that has a release for this chapter, in release order.
    pub fn groups(&self) -> impl Iterator<Item = &Arc<Group>> {
        self.releases.iter().map(|release| release.group())
    }

    pub fn volume(&self) -> Option<Arc<Volume>> {
        self.volume.get().and_then(Weak::upgrade)
    }

    pub(crate) fn assign_parent(&self, parent: &Arc<Volume>) {
        _ = self.volume.set(Arc::downgrade(parent));
    }

    pub fn by_number(a: &Self, b: &Self) -> Ordering {
        a.number.cmp(&b.number)
    }
}

impl PartialEq for Chapter {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}
impl Eq for Chapter {}

impl Debug for Chapter {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Chapter")
            .field("number", &self.number)
            .field("title", &self.title)
            .field("folder", &self.folder)
            .field("releases", &self.releases)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", 1.0)]
    #[case("10.5", 10.5)]
    #[case(" 3 ", 3.0)]
    #[case("0", 0.0)]
    fn test_chapter_number_from_str(#[case] input: &str, #[case] expected: f64) {
        assert_eq!(input.parse::<ChapterNumber>().unwrap().value(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("ten")]
    #[case("10,5")]
    #[case("NaN")]
    #[case("inf")]
    #[case("-infinity")]
    fn test_chapter_number_from_str_invalid(#[case] input: &str) {
        let err = input.parse::<ChapterNumber>().unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidField { field: "chapter number", .. }));
    }

    #[test]
    fn test_chapter_number_orders_numerically() {
        let mut numbers: Vec<ChapterNumber> = ["10", "9", "9.5"].iter().map(|n| n.parse().unwrap()).collect();
        numbers.sort();
        let rendered: Vec<String> = numbers.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["9", "9.5", "10"]);
    }
}
