use std::sync::LazyLock;

use scraper::{ElementRef, Selector};

use super::elem_text;
use super::person::Person;
use crate::error::ScrapeError;

static TITLE_LINK_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h3 a").expect("invalid selector: title link"));
static GENRE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.genre").expect("invalid selector: genre"));
static RATING_SEL: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div.ratings-imdb-rating strong").expect("invalid selector: rating")
});
static PARA_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p").expect("invalid selector: paragraph"));

/// One listing entry.
#[derive(Debug)]
pub struct Movie {
    pub title: String,
    pub url: String,
    pub genre: String,
    pub rating: Option<f64>,
    pub directors: Vec<Person>,
    pub stars: Vec<Person>,
}

impl Movie {
    /// Extract one `div.lister-item` block.
    ///
    /// Directors and stars come from the entry's third paragraph: its span/a
    /// children are split at the first span separator, which is discarded.
    /// An entry with no separator puts everyone in `directors` and leaves
    /// `stars` empty, a quirk of the listing format that is kept as-is.
    pub fn extract(item: ElementRef, base_url: &str) -> Result<Self, ScrapeError> {
        let title_link = item
            .select(&TITLE_LINK_SEL)
            .next()
            .ok_or(ScrapeError::MissingStructure("title link"))?;
        let title = elem_text(title_link).trim().to_string();
        let href = title_link
            .value()
            .attr("href")
            .ok_or(ScrapeError::MissingStructure("title link"))?;
        let url = format!("{}{}", base_url, href);

        let genre = item
            .select(&GENRE_SEL)
            .next()
            .map(|e| elem_text(e).trim().to_string())
            .ok_or(ScrapeError::MissingStructure("genre"))?;

        // Rating is the one labeled block whose absence is tolerated.
        let rating = item
            .select(&RATING_SEL)
            .next()
            .and_then(|e| elem_text(e).trim().parse::<f64>().ok());

        let people_para = item
            .select(&PARA_SEL)
            .nth(2)
            .ok_or(ScrapeError::MissingStructure("people paragraph"))?;
        let people_tags: Vec<ElementRef> = people_para
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|e| matches!(e.value().name(), "a" | "span"))
            .collect();

        let separator = people_tags.iter().position(|e| e.value().name() == "span");
        let (director_tags, star_tags) = match separator {
            Some(i) => (&people_tags[..i], &people_tags[i + 1..]),
            None => (&people_tags[..], &people_tags[..0]),
        };

        let directors = director_tags
            .iter()
            .map(|tag| Person::from_link(*tag, base_url))
            .collect::<Result<Vec<_>, _>>()?;
        let stars = star_tags
            .iter()
            .map(|tag| Person::from_link(*tag, base_url))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            title,
            url,
            genre,
            rating,
            directors,
            stars,
        })
    }

    /// Directors then stars, in listing order.
    pub fn people(&self) -> impl Iterator<Item = &Person> {
        self.directors.iter().chain(self.stars.iter())
    }
}

// ── Tests ──
