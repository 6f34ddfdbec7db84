use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::{elem_text, normalize_whitespace};

static JOB_CATEGORY_SEL: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("#name-job-categories span.itemprop").expect("invalid selector: job categories")
});
static BIO_SEL: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div.name-trivia-bio-text div.inline").expect("invalid selector: bio")
});

/// The fields of a profile page the gender classifier cares about.
///
/// Job titles are normalized to lowercase trimmed text. A page without a
/// job-title list or bio block yields empty/None rather than an error, so
/// classification can fall through to Unknown.
#[derive(Debug, Clone)]
pub struct PersonProfile {
    pub job_titles: Vec<String>,
    pub bio: Option<String>,
}

impl PersonProfile {
    pub fn from_document(document: &Html) -> Self {
        let job_titles = document
            .select(&JOB_CATEGORY_SEL)
            .map(|e| elem_text(e).trim().to_lowercase())
            .collect();
        let bio = document
            .select(&BIO_SEL)
            .next()
            .map(|e| normalize_whitespace(&elem_text(e)))
            .filter(|text| !text.is_empty());
        Self { job_titles, bio }
    }
}

// ── Tests ──
