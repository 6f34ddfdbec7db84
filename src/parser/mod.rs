pub mod movie;
pub mod person;
pub mod profile;

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::error::ScrapeError;
use self::movie::Movie;

static LISTER_ITEM_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.lister-item").expect("invalid selector: lister item"));

/// Parse a saved listing document into movies in document (rank) order.
/// A malformed entry aborts the whole extraction.
pub fn parse_listing(html: &str, base_url: &str) -> Result<Vec<Movie>, ScrapeError> {
    let document = Html::parse_document(html);
    document
        .select(&LISTER_ITEM_SEL)
        .map(|item| Movie::extract(item, base_url))
        .collect()
}

pub(crate) fn elem_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}

pub(crate) fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> Vec<Movie> {
        let html = std::fs::read_to_string("tests/fixtures/top_movies.html").unwrap();
        parse_listing(&html, "http://www.imdb.com").unwrap()
    }

    #[test]
    fn listing_preserves_document_order() {
        let movies = listing();
        let titles: Vec<&str> = movies.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Logan", "Moana", "Arrival"]);
    }

    #[test]
    fn listing_parses_every_entry() {
        let movies = listing();
        assert_eq!(movies.len(), 3);
        for movie in &movies {
            assert!(!movie.genre.is_empty());
            assert!(movie.rating.is_some());
            assert!(!movie.directors.is_empty());
        }
    }

    #[test]
    fn listing_splits_multiple_directors() {
        let movies = listing();
        let moana = &movies[1];
        let directors: Vec<&str> = moana.directors.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(directors, vec!["Ron Clements", "John Musker"]);
        assert_eq!(moana.stars.len(), 2);
    }

    #[test]
    fn document_without_entries_is_empty() {
        let movies =
            parse_listing("<html><body><p>Nothing here</p></body></html>", "http://www.imdb.com")
                .unwrap();
        assert!(movies.is_empty());
    }
}
