//! Rule-based claim extraction
//!
//! Splits text into sentence-like units and keeps those carrying a checkable
//! factual signal. Dates, locations, numbers and entities are extracted from
//! the whole text independently of the claims.

use regex::Regex;

use crate::model::{ExtractedData, ExtractionResult};

/// Units with fewer whitespace-separated tokens cannot carry a checkable claim
const MIN_CLAIM_TOKENS: usize = 4;

/// Capitalized words that are not proper nouns
const ENTITY_STOPLIST: &[&str] = &[
    "The", "This", "That", "These", "Those", "When", "Where", "What", "Who", "Why", "How", "And",
    "But", "For", "With", "From", "They", "There", "Their",
];

const MONTHS: &str =
    "January|February|March|April|May|June|July|August|September|October|November|December";

/// Extracts candidate claims and structured data from text
pub struct ClaimExtractor {
    /// Terminal punctuation followed by whitespace or end of text
    sentence_end: Regex,
    claim_signals: Vec<(&'static str, Regex)>,
    date_patterns: Vec<Regex>,
    location: Regex,
    number_patterns: Vec<Regex>,
    proper_noun: Regex,
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("claim extraction pattern must compile")
}

impl ClaimExtractor {
    pub fn new() -> Self {
        Self {
            sentence_end: compile(r"[.!?]+(\s+|$)"),
            claim_signals: vec![
                (
                    "temporal",
                    compile(
                        r"(?i)\b(?:yesterday|today|tomorrow)\b|\b(?:on|in)\s+(?:\d{4}|[a-z]+\s+\d{1,2})\b",
                    ),
                ),
                (
                    "quantity",
                    compile(r"(?i)\d+(?:\.\d+)?%|\b\d+\s+(?:million|billion|thousand)\b"),
                ),
                (
                    "attribution",
                    compile(r"(?i)\b(?:according to|reported by|announced|confirmed)\b\s+\w"),
                ),
                ("location", compile(r"\bin\s+[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*")),
                (
                    "event",
                    compile(
                        r"(?i)\b(?:collapsed|launched|died|arrested|discovered|invented|won|lost)\b",
                    ),
                ),
            ],
            date_patterns: vec![
                compile(r"\b\d{1,2}/\d{1,2}/\d{2,4}\b"),
                compile(r"\b\d{4}-\d{2}-\d{2}\b"),
                compile(&format!(r"(?i)\b(?:{})\s+\d{{1,2}},?\s+\d{{4}}\b", MONTHS)),
                compile(r"(?i)\b(?:yesterday|today|tomorrow)\b"),
            ],
            location: compile(r"\bin\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)"),
            number_patterns: vec![
                compile(r"\d+(?:\.\d+)?%"),
                compile(r"(?i)\$\d+(?:\.\d+)?(?:\s*(?:million|billion|thousand)\b)?"),
                compile(r"(?i)\b\d+\s+(?:million|billion|thousand)\b"),
            ],
            proper_noun: compile(r"^[A-Z][a-z]+"),
        }
    }

    /// Extract claims and structured data. Never fails; empty text yields empty sets.
    pub fn extract(&self, text: &str) -> ExtractionResult {
        let mut claims = Vec::new();

        for unit in self.split_sentences(text) {
            if unit.split_whitespace().count() < MIN_CLAIM_TOKENS {
                continue;
            }

            let signals: Vec<&str> = self
                .claim_signals
                .iter()
                .filter(|(_, pattern)| pattern.is_match(unit))
                .map(|(name, _)| *name)
                .collect();

            if signals.is_empty() {
                continue;
            }

            tracing::trace!(claim = %unit, signals = ?signals, "Claim signal matched");
            push_unique(&mut claims, unit);
        }

        let extracted_data = ExtractedData {
            dates: self.extract_dates(text),
            locations: self.extract_locations(text),
            numbers: self.extract_numbers(text),
            entities: self.extract_entities(text),
        };

        tracing::debug!(
            claim_count = claims.len(),
            dates = extracted_data.dates.len(),
            locations = extracted_data.locations.len(),
            numbers = extracted_data.numbers.len(),
            entities = extracted_data.entities.len(),
            "Claim extraction complete"
        );

        ExtractionResult {
            claims,
            extracted_data,
        }
    }

    /// Split after terminal punctuation that ends a word, so decimals such as
    /// "$4.5" stay inside their sentence. Trailing text without punctuation is
    /// its own unit.
    fn split_sentences<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut units = Vec::new();
        let mut last_end = 0;

        for caps in self.sentence_end.captures_iter(text) {
            let Some(gap) = caps.get(1) else { continue };
            units.push(text[last_end..gap.start()].trim());
            last_end = gap.end();
        }

        let rest = text[last_end..].trim();
        if !rest.is_empty() {
            units.push(rest);
        }

        units.retain(|u| !u.is_empty());
        units
    }

    fn extract_dates(&self, text: &str) -> Vec<String> {
        collect_matches(&self.date_patterns, text)
    }

    fn extract_locations(&self, text: &str) -> Vec<String> {
        let mut locations = Vec::new();
        for caps in self.location.captures_iter(text) {
            if let Some(place) = caps.get(1) {
                push_unique(&mut locations, place.as_str());
            }
        }
        locations
    }

    fn extract_numbers(&self, text: &str) -> Vec<String> {
        collect_matches(&self.number_patterns, text)
    }

    /// Proper-noun heuristic: capitalized words that do not start a sentence
    fn extract_entities(&self, text: &str) -> Vec<String> {
        let mut entities = Vec::new();
        let mut sentence_start = true;

        for word in text.split_whitespace() {
            let cleaned: String = word
                .chars()
                .filter(|c| c.is_alphanumeric() || *c == '_')
                .collect();

            if !sentence_start
                && cleaned.chars().count() > 2
                && self.proper_noun.is_match(&cleaned)
                && !ENTITY_STOPLIST.contains(&cleaned.as_str())
            {
                push_unique(&mut entities, &cleaned);
            }

            sentence_start = word
                .trim_end_matches(['"', '\'', ')', ']'])
                .ends_with(['.', '!', '?']);
        }

        entities
    }
}

impl Default for ClaimExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn push_unique(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|v| v == value) {
        values.push(value.to_string());
    }
}

/// All matches of each pattern in pattern order, deduplicated
fn collect_matches(patterns: &[Regex], text: &str) -> Vec<String> {
    let mut values = Vec::new();
    for pattern in patterns {
        for m in pattern.find_iter(text) {
            push_unique(&mut values, m.as_str());
        }
    }
    values
}
