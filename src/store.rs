use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use reqwest::blocking::Client;
use scraper::Html;
use tracing::{info, warn};

use crate::error::ScrapeError;
use crate::parser::person::Person;

/// Fetch-if-absent store for person profile pages.
///
/// One file per identity under `cache_dir`, body persisted verbatim on the
/// first fetch and never refreshed or validated afterwards; a cached but
/// corrupt file is never repaired.
pub struct ProfileStore {
    cache_dir: PathBuf,
    client: Client,
}

impl ProfileStore {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Result<Self, ScrapeError> {
        let cache_dir = cache_dir.into();
        fs::create_dir_all(&cache_dir)?;
        Ok(Self {
            cache_dir,
            client: Client::new(),
        })
    }

    pub fn cache_path(&self, person: &Person) -> PathBuf {
        self.cache_dir.join(format!("{}.html", person.identity))
    }

    pub fn is_cached(&self, person: &Person) -> bool {
        self.cache_path(person).exists()
    }

    /// Download the profile page unless a cache entry already exists.
    /// Existence alone gates the fetch; repeated calls are no-ops.
    pub fn ensure_cached(&self, person: &Person) -> Result<(), ScrapeError> {
        let path = self.cache_path(person);
        if path.exists() {
            return Ok(());
        }
        let body = self.fetch(&person.url)?;
        fs::write(&path, body)?;
        Ok(())
    }

    /// Parse the cached profile document, fetching it first if absent.
    pub fn load(&self, person: &Person) -> Result<Html, ScrapeError> {
        self.ensure_cached(person)?;
        let raw = fs::read_to_string(self.cache_path(person))?;
        Ok(Html::parse_document(&raw))
    }

    /// Single-attempt GET. No retry, no backoff; non-2xx is a failure.
    fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        info!("Fetching {}", url);
        let wrap = |source| ScrapeError::Fetch {
            url: url.to_string(),
            source,
        };
        let response = self.client.get(url).send().map_err(wrap)?;
        let response = response.error_for_status().map_err(wrap)?;
        response.text().map_err(wrap)
    }
}

/// Cache stats returned after a warm-up pass.
pub struct CacheStats {
    pub total: usize,
    pub fetched: usize,
    pub cached: usize,
    pub errors: usize,
}

enum FetchOutcome {
    Fetched,
    AlreadyCached,
    Failed,
}

/// Warm the cache for every distinct person, isolating per-person failures.
///
/// Duplicate identities are collapsed before the fan-out so no two writers
/// ever race one cache file; a failed fetch is logged and counted, never
/// fatal.
pub fn warm_cache(store: &ProfileStore, persons: &[&Person], limit: Option<usize>) -> CacheStats {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut unique: Vec<&Person> = persons
        .iter()
        .copied()
        .filter(|p| seen.insert(p.identity.as_str()))
        .collect();
    if let Some(limit) = limit {
        unique.truncate(limit);
    }

    let pb = ProgressBar::new(unique.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")
            .expect("invalid progress template")
            .progress_chars("=> "),
    );

    let outcomes = fetch_all(store, &unique, &pb);
    pb.finish_and_clear();

    let mut stats = CacheStats {
        total: unique.len(),
        fetched: 0,
        cached: 0,
        errors: 0,
    };
    for outcome in &outcomes {
        match outcome {
            FetchOutcome::Fetched => stats.fetched += 1,
            FetchOutcome::AlreadyCached => stats.cached += 1,
            FetchOutcome::Failed => stats.errors += 1,
        }
    }
    info!(
        "Cache warm-up: {} fetched, {} already cached, {} errors",
        stats.fetched, stats.cached, stats.errors
    );
    stats
}

#[cfg(feature = "rayon")]
fn fetch_all(store: &ProfileStore, persons: &[&Person], pb: &ProgressBar) -> Vec<FetchOutcome> {
    persons
        .par_iter()
        .map(|person| fetch_one(store, person, pb))
        .collect()
}

#[cfg(not(feature = "rayon"))]
fn fetch_all(store: &ProfileStore, persons: &[&Person], pb: &ProgressBar) -> Vec<FetchOutcome> {
    persons
        .iter()
        .map(|person| fetch_one(store, person, pb))
        .collect()
}

fn fetch_one(store: &ProfileStore, person: &Person, pb: &ProgressBar) -> FetchOutcome {
    let outcome = if store.is_cached(person) {
        FetchOutcome::AlreadyCached
    } else {
        match store.ensure_cached(person) {
            Ok(()) => FetchOutcome::Fetched,
            Err(e) => {
                warn!("Prefetch failed for {}: {}", person.identity, e);
                FetchOutcome::Failed
            }
        }
    };
    pb.inc(1);
    outcome
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gender::Gender;

    // Unroutable host: any attempted fetch fails fast instead of hitting
    // the network, so tests can prove whether a fetch happened at all.
    const DEAD_BASE: &str = "http://127.0.0.1:9";

    const ACTRESS_PROFILE: &str = r##"<html><body>
      <div id="name-job-categories">
        <a href="#actress"><span class="itemprop">Actress</span></a>
      </div>
      <div class="name-trivia-bio-text"><div class="inline">She acts.</div></div>
    </body></html>"##;

    fn test_store(tag: &str) -> ProfileStore {
        let dir = std::env::temp_dir().join(format!(
            "topmovies_store_{}_{}",
            tag,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        ProfileStore::new(dir).unwrap()
    }

    fn person(id: &str) -> Person {
        Person::new("Test Person", format!("{}/name/{}/", DEAD_BASE, id)).unwrap()
    }

    fn seed(store: &ProfileStore, person: &Person, body: &str) {
        fs::write(store.cache_path(person), body).unwrap();
    }

    #[test]
    fn cache_file_is_named_by_identity() {
        let store = test_store("naming");
        let p = person("nm0000001");
        assert!(store.cache_path(&p).ends_with("nm0000001.html"));
    }

    #[test]
    fn ensure_cached_skips_fetch_when_seeded() {
        let store = test_store("seeded");
        let p = person("nm0000002");
        seed(&store, &p, "<html></html>");
        // The URL is unroutable, so success proves no fetch happened.
        store.ensure_cached(&p).unwrap();
        assert_eq!(
            fs::read_to_string(store.cache_path(&p)).unwrap(),
            "<html></html>"
        );
    }

    #[test]
    fn ensure_cached_propagates_fetch_error() {
        let store = test_store("fetch_err");
        let p = person("nm0000003");
        let err = store.ensure_cached(&p).unwrap_err();
        assert!(matches!(err, ScrapeError::Fetch { .. }));
        assert!(!store.is_cached(&p));
    }

    #[test]
    fn load_parses_seeded_document() {
        let store = test_store("load");
        let p = person("nm0000004");
        seed(&store, &p, ACTRESS_PROFILE);
        let profile = p.profile(&store).unwrap();
        assert_eq!(profile.job_titles, vec!["actress"]);
        assert_eq!(profile.bio.as_deref(), Some("She acts."));
    }

    #[test]
    fn gender_is_memoized_and_never_refetched() {
        let store = test_store("memo");
        let p = person("nm0000005");
        seed(&store, &p, ACTRESS_PROFILE);
        assert_eq!(p.gender(&store), Gender::Female);
        // Remove the cache entry: a second call must not go back to the
        // store (the unroutable URL would otherwise turn this Unknown).
        fs::remove_file(store.cache_path(&p)).unwrap();
        assert_eq!(p.gender(&store), Gender::Female);
    }

    #[test]
    fn fetch_failure_degrades_to_unknown() {
        let store = test_store("degrade");
        let p = person("nm0000006");
        assert_eq!(p.gender(&store), Gender::Unknown);
    }

    #[test]
    fn warm_cache_dedups_and_counts() {
        let store = test_store("warm");
        let a = person("nm0000007");
        let b = person("nm0000007"); // same identity, second instance
        let c = person("nm0000008");
        seed(&store, &a, "<html></html>");
        let stats = warm_cache(&store, &[&a, &b, &c], None);
        assert_eq!(stats.total, 2); // b collapsed into a
        assert_eq!(stats.cached, 1);
        assert_eq!(stats.fetched, 0);
        assert_eq!(stats.errors, 1); // c is unroutable
    }

    #[test]
    fn warm_cache_honors_limit() {
        let store = test_store("limit");
        let a = person("nm0000020");
        let b = person("nm0000021");
        seed(&store, &a, "<html></html>");
        let stats = warm_cache(&store, &[&a, &b], Some(1));
        assert_eq!(stats.total, 1);
        assert_eq!(stats.cached, 1);
        assert_eq!(stats.errors, 0);
    }
}
