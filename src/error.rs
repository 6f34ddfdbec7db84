#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("Malformed person link: {0}")]
    MalformedLink(String),
    #[error("Missing {0} in listing entry")]
    MissingStructure(&'static str),
    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),
}
