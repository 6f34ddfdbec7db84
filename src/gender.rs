use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::parser::profile::PersonProfile;

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("invalid regex: word"));

const FEMALE_TOKENS: &[&str] = &["she", "her", "actress"];
const MALE_TOKENS: &[&str] = &["he", "his", "him", "actor"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
    Unknown,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Gender::Female => "female",
            Gender::Male => "male",
            Gender::Unknown => "unknown",
        })
    }
}

/// One classification rule: Some(gender) on a match, None to fall through.
type Rule = fn(&PersonProfile) -> Option<Gender>;

/// Rules in priority order; the first match wins.
const RULES: &[Rule] = &[job_title_rule, bio_pronoun_rule];

/// Heuristic classification over a parsed profile. Not a ground-truth
/// source: a profile matching no rule comes back Unknown.
pub fn classify(profile: &PersonProfile) -> Gender {
    RULES
        .iter()
        .find_map(|rule| rule(profile))
        .unwrap_or(Gender::Unknown)
}

fn job_title_rule(profile: &PersonProfile) -> Option<Gender> {
    if profile.job_titles.iter().any(|t| t == "actress") {
        Some(Gender::Female)
    } else if profile.job_titles.iter().any(|t| t == "actor") {
        Some(Gender::Male)
    } else {
        None
    }
}

/// Scan bio word tokens left to right; the first gendered token decides,
/// with the female set checked before the male set at each position.
fn bio_pronoun_rule(profile: &PersonProfile) -> Option<Gender> {
    let bio = profile.bio.as_deref()?.to_lowercase();
    for token in WORD_RE.find_iter(&bio) {
        let token = token.as_str();
        if FEMALE_TOKENS.contains(&token) {
            return Some(Gender::Female);
        }
        if MALE_TOKENS.contains(&token) {
            return Some(Gender::Male);
        }
    }
    None
}

// ── Tests ──
