use std::sync::OnceLock;

use scraper::ElementRef;
use tracing::warn;

use super::profile::PersonProfile;
use crate::error::ScrapeError;
use crate::gender::{self, Gender};
use crate::store::ProfileStore;

/// A cast or crew member referenced from a listing entry.
///
/// `identity` is the sole stable key (the `/name/<id>` path segment); `name`
/// is display-only and not guaranteed unique. Profile parse and gender
/// classification are computed at most once per instance and memoized;
/// two instances with equal identity do not share either cache.
#[derive(Debug)]
pub struct Person {
    pub name: String,
    pub url: String,
    pub identity: String,
    profile: OnceLock<PersonProfile>,
    gender: OnceLock<Gender>,
}

impl Person {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Result<Self, ScrapeError> {
        let url = url.into();
        let identity = identity_from_url(&url)?;
        Ok(Self {
            name: name.into(),
            url,
            identity,
            profile: OnceLock::new(),
            gender: OnceLock::new(),
        })
    }

    /// Build a Person from an `<a href="/name/...">` element.
    /// The href is appended to `base_url` verbatim, query string included.
    pub fn from_link(link: ElementRef, base_url: &str) -> Result<Self, ScrapeError> {
        let href = link
            .value()
            .attr("href")
            .ok_or_else(|| ScrapeError::MalformedLink(super::elem_text(link)))?;
        let name = super::elem_text(link).trim().to_string();
        Self::new(name, format!("{}{}", base_url, href))
    }

    /// Parsed profile fields, fetching and caching the document on first use.
    pub fn profile(&self, store: &ProfileStore) -> Result<&PersonProfile, ScrapeError> {
        if let Some(profile) = self.profile.get() {
            return Ok(profile);
        }
        let document = store.load(self)?;
        let parsed = PersonProfile::from_document(&document);
        Ok(self.profile.get_or_init(|| parsed))
    }

    /// Classified gender, computed at most once per instance.
    ///
    /// A failed profile fetch degrades this person to Unknown instead of
    /// aborting the caller; the Unknown is memoized like any other result
    /// (single attempt, no retry).
    pub fn gender(&self, store: &ProfileStore) -> Gender {
        if let Some(gender) = self.gender.get() {
            return *gender;
        }
        let gender = match self.profile(store) {
            Ok(profile) => gender::classify(profile),
            Err(e) => {
                warn!("Could not classify {}: {}", self.identity, e);
                Gender::Unknown
            }
        };
        *self.gender.get_or_init(|| gender)
    }
}

/// Extract the stable identity from a profile URL or bare href.
/// The path must have exactly the two-segment `/name/<id>` shape.
pub fn identity_from_url(url: &str) -> Result<String, ScrapeError> {
    let path = match url.find("://") {
        Some(scheme_end) => {
            let rest = &url[scheme_end + 3..];
            match rest.find('/') {
                Some(host_end) => &rest[host_end..],
                None => "",
            }
        }
        None => url,
    };
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let mut segments = path.trim_matches('/').split('/');
    match (segments.next(), segments.next(), segments.next()) {
        (Some("name"), Some(id), None) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(ScrapeError::MalformedLink(url.to_string())),
    }
}

// ── Tests ──
