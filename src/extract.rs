//! The extract module holds the text-extraction heuristics: ordered
//! pattern rules for the timing/panchang fields, the two-pass festival
//! harvester and the observance classifier.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::{
    FESTIVAL_KEYWORDS, FESTIVAL_LABEL, KARANA_PATTERNS, LABEL_REJECT_WORDS, MAX_LABEL_WORDS,
    MOONRISE_PATTERNS, MOONSET_PATTERNS, NAKSHATRA_PATTERNS, OBSERVANCE_KEYWORDS,
    SUNRISE_PATTERNS, SUNSET_PATTERNS, TITHI_PATTERNS, TITLE_WORD, YOGA_PATTERNS,
};
use crate::text::normalize;

static FESTIVAL_LABEL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(FESTIVAL_LABEL).expect("Failed to compile FESTIVAL_LABEL regex"));

static KEYWORD_PHRASE_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    FESTIVAL_KEYWORDS
        .iter()
        .map(|keyword| {
            let source = format!(
                r"\b({TITLE_WORD}(?:\s+{TITLE_WORD}){{0,4}}\s+{})\b",
                regex::escape(keyword)
            );
            Regex::new(&source).expect("Failed to compile festival keyword regex")
        })
        .collect()
});

/// Ordered extraction rules for the eight per-day fields.
///
/// Each field carries its own priority-ordered pattern list: more specific
/// patterns can be listed before looser fallbacks. The `Default` value is
/// the stock rule set; callers may build their own to extend or replace
/// patterns without touching the extraction engine.
#[derive(Debug, Clone)]
pub struct Patterns {
    pub sunrise: Vec<Regex>,
    pub sunset: Vec<Regex>,
    pub moonrise: Vec<Regex>,
    pub moonset: Vec<Regex>,
    pub tithi: Vec<Regex>,
    pub nakshatra: Vec<Regex>,
    pub yoga: Vec<Regex>,
    pub karana: Vec<Regex>,
}

impl Default for Patterns {
    fn default() -> Self {
        Self {
            sunrise: compile_all(SUNRISE_PATTERNS),
            sunset: compile_all(SUNSET_PATTERNS),
            moonrise: compile_all(MOONRISE_PATTERNS),
            moonset: compile_all(MOONSET_PATTERNS),
            tithi: compile_all(TITHI_PATTERNS),
            nakshatra: compile_all(NAKSHATRA_PATTERNS),
            yoga: compile_all(YOGA_PATTERNS),
            karana: compile_all(KARANA_PATTERNS),
        }
    }
}

fn compile_all(sources: &[&str]) -> Vec<Regex> {
    sources
        .iter()
        .map(|source| Regex::new(source).expect("Failed to compile extraction pattern"))
        .collect()
}

/// Tries each pattern in order against the text and returns the first
/// capturing-group match, normalized, or `None` when nothing matches.
pub fn pick_first(patterns: &[Regex], text: &str) -> Option<String> {
    patterns.iter().find_map(|pattern| {
        pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|group| normalize(group.as_str()))
    })
}

/// Scans normalized page text for festival-name candidates.
///
/// Two independent passes feed one set: phrases following a literal
/// "Festival" label, and title-case phrases ending in a known festival
/// keyword. Candidates from the label pass are rejected when they run
/// past eight words or contain timing/boilerplate words. The union is
/// returned deduplicated and alphabetically sorted.
pub fn harvest_festivals(text: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();

    for caps in FESTIVAL_LABEL_REGEX.captures_iter(text) {
        if let Some(group) = caps.get(1) {
            let candidate = normalize(group.as_str());
            let lowered = candidate.to_lowercase();
            if candidate.split_whitespace().count() <= MAX_LABEL_WORDS
                && !LABEL_REJECT_WORDS.iter().any(|word| lowered.contains(word))
            {
                names.insert(candidate);
            }
        }
    }

    for pattern in KEYWORD_PHRASE_REGEXES.iter() {
        for caps in pattern.captures_iter(text) {
            if let Some(group) = caps.get(1) {
                names.insert(normalize(group.as_str()));
            }
        }
    }

    names
}

/// Returns true when the festival name reads as a religious observance,
/// decided by case-insensitive substring membership against a fixed
/// keyword list.
pub fn is_observance(name: &str) -> bool {
    let key = name.to_lowercase();
    OBSERVANCE_KEYWORDS.iter().any(|keyword| key.contains(keyword))
}
