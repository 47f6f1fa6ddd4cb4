//! Media links for covers and pages.
//!
//! Page files live under
//! `{media}/media/manga/{book}/chapters/{folder}/{group}/{file}`, so building
//! one walks the page's back-references all the way up to its book. A page
//! whose ancestors have been dropped has no address.

use guya_graph::models::{Book, Page};
use guya_transport::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Links {
    media: String,
}

impl Links {
    pub fn new(media: impl Into<String>) -> Self {
        let media = media.into();
        Self { media: media.trim_end_matches('/').to_string() }
    }

    /// The cover path in a payload is already absolute on the media host.
    pub fn cover_url(&self, book: &Book) -> Option<Url> {
        Url::parse(&format!("{}{}", self.media, book.cover())).ok()
    }

    pub fn page_url(&self, page: &Page) -> Option<Url> {
        let release = page.release()?;
        let chapter = release.chapter()?;
        let book = chapter.volume()?.book()?;
        let address = format!(
            "{}/media/manga/{}/chapters/{}/{}/{}",
            self.media,
            book.identifier(),
            chapter.folder(),
            release.group().identifier(),
            page.file(),
        );
        Url::parse(&address).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use guya_graph::GroupRegistry;

    #[test]
    fn test_cover_url() {
        let registry = GroupRegistry::default();
        let book = fixtures::book(&registry, "oshi-no-ko", "Oshi no Ko");
        let links = Links::new("https://media.test/");
        let url = links.cover_url(&book).unwrap();
        assert_eq!(url.as_str(), "https://media.test/media/manga/oshi-no-ko/volume_covers/1/cover.jpg");
    }

    #[test]
    fn test_page_url() {
        let registry = GroupRegistry::default();
        let book = fixtures::book(&registry, "oshi-no-ko", "Oshi no Ko");
        let links = Links::new("https://media.test");
        let chapter = book.chapters().next().unwrap();
        let release = chapter.releases().iter().find(|release| release.group().identifier() == "1").unwrap();
        let page = &release.pages()[1];
        let url = links.page_url(page).unwrap();
        assert_eq!(url.as_str(), "https://media.test/media/manga/oshi-no-ko/chapters/0001_abc/1/02.png");
    }

    #[test]
    fn test_page_url_detached() {
        let registry = GroupRegistry::default();
        let book = fixtures::book(&registry, "oshi-no-ko", "Oshi no Ko");
        let page = std::sync::Arc::clone(&book.chapters().next().unwrap().releases()[0].pages()[0]);
        drop(book);
        assert_eq!(Links::new("https://media.test").page_url(&page), None);
    }
}
