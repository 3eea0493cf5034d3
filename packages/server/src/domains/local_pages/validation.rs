//! Static quality and safety rules for generated content.
//!
//! `prohibited_claims` only pattern-matches a handful of phrases. It is a
//! last-line check, not proof that the content is free of invented facts;
//! that guarantee rests on the generation prompt and on human review before
//! publishing.

use lazy_static::lazy_static;
use regex::Regex;

use super::types::{LocalPageContent, SafetyFlag};

pub const MIN_WORD_COUNT: usize = 750;
pub const MIN_LOCATION_MENTIONS: usize = 6;
pub const MIN_LOCAL_PARAGRAPHS: usize = 2;
pub const MIN_FILLED_SECTIONS: usize = 4;
pub const MIN_FAQ_ENTRIES: usize = 5;

lazy_static! {
    static ref PROHIBITED_PATTERNS: Vec<Regex> = [
        r"(?i)\bguarantee\b",
        r"(?i)\bpromise\b.*\bresult\b",
        r"(?i)\blaw firm\b",
        r"(?i)\battorney\b",
        r"(?i)\bwe will win\b",
        r"(?i)\b100% success\b",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect();
}

/// Evaluates every rule independently and returns the triggered flags in a
/// fixed order. `high_similarity` is decided later by the pipeline.
pub fn validate_content(content: &LocalPageContent, location_label: &str, state: &str) -> Vec<SafetyFlag> {
    let mut flags = Vec::new();
    let sections = content.required_sections();
    let main_text = sections.join(" ");

    if word_count(&main_text) < MIN_WORD_COUNT {
        flags.push(SafetyFlag::LowWordCount);
    }

    let lowered = main_text.to_lowercase();
    let label = location_label.trim().to_lowercase();
    let state = state.trim().to_lowercase();
    if count_occurrences(&lowered, &label) + count_occurrences(&lowered, &state) < MIN_LOCATION_MENTIONS {
        flags.push(SafetyFlag::LowCityMentions);
    }

    let local_paragraphs = sections
        .iter()
        .copied()
        .flat_map(paragraphs)
        .filter(|p| {
            let p = p.to_lowercase();
            mentions(&p, &label) || mentions(&p, &state)
        })
        .count();
    if local_paragraphs < MIN_LOCAL_PARAGRAPHS {
        flags.push(SafetyFlag::LowLocalContext);
    }

    let filled = sections.iter().filter(|s| !s.trim().is_empty()).count();
    if filled < MIN_FILLED_SECTIONS {
        flags.push(SafetyFlag::InsufficientSections);
    }

    if content.location_faq.len() < MIN_FAQ_ENTRIES {
        flags.push(SafetyFlag::InsufficientFaq);
    }

    if contains_prohibited_claim(content) {
        flags.push(SafetyFlag::ProhibitedClaims);
    }

    flags
}

/// Splits a section into blank-line-delimited, trimmed, non-empty paragraphs.
pub fn paragraphs(text: &str) -> impl Iterator<Item = &str> {
    text.split("\n\n").map(str::trim).filter(|p| !p.is_empty())
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        0
    } else {
        haystack.matches(needle).count()
    }
}

fn mentions(haystack: &str, needle: &str) -> bool {
    !needle.is_empty() && haystack.contains(needle)
}

fn contains_prohibited_claim(content: &LocalPageContent) -> bool {
    let faq_text = content
        .location_faq
        .iter()
        .map(|f| format!("{} {}", f.question, f.answer));

    [
        content.title.as_str(),
        content.meta_description.as_str(),
        content.h1.as_str(),
        content.local_stats_or_regulation_notes.as_str(),
    ]
    .into_iter()
    .chain(content.required_sections())
    .map(str::to_string)
    .chain(faq_text)
    .any(|text| PROHIBITED_PATTERNS.iter().any(|re| re.is_match(&text)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::local_pages::types::FaqEntry;

    fn faqs(n: usize) -> Vec<FaqEntry> {
        (0..n)
            .map(|i| FaqEntry {
                question: format!("Question {}?", i),
                answer: "Answer.".to_string(),
            })
            .collect()
    }

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    /// Passes every rule: 5 sections, Fresno/CA mentioned in several paragraphs.
    fn passing_content() -> LocalPageContent {
        LocalPageContent {
            title: "Shield Hood Services in Fresno, CA".into(),
            h1: "Hood Cleaning in Fresno, CA".into(),
            short_intro: "Kitchens in Fresno, CA stay busy.".into(),
            long_intro: "Scheduling in Fresno is tight.\n\nCA operators plan ahead.".into(),
            main_body: format!("{}\n\nFresno inspections vary.", words(760)),
            what_typically_happens_next: "We walk the kitchen in Fresno first.".into(),
            services_intro: "Services across CA.".into(),
            location_faq: faqs(5),
            ..Default::default()
        }
    }

    #[test]
    fn test_passing_content_has_no_flags() {
        assert!(validate_content(&passing_content(), "Fresno", "CA").is_empty());
    }

    #[test]
    fn test_validation_is_deterministic() {
        let content = LocalPageContent {
            main_body: "Too short.".into(),
            ..Default::default()
        };
        let first = validate_content(&content, "Fresno", "CA");
        assert_eq!(first, validate_content(&content, "Fresno", "CA"));
        assert!(!first.is_empty());
    }

    #[test]
    fn test_word_count_boundary() {
        // Other sections contribute a known number of words; pad main body to the boundary.
        let mut content = passing_content();
        content.main_body = String::new();
        let others = word_count(&content.required_sections().join(" "));

        content.main_body = words(MIN_WORD_COUNT - 1 - others);
        assert!(validate_content(&content, "Fresno", "CA").contains(&SafetyFlag::LowWordCount));

        content.main_body = words(MIN_WORD_COUNT - others);
        assert!(!validate_content(&content, "Fresno", "CA").contains(&SafetyFlag::LowWordCount));
    }

    #[test]
    fn test_faq_boundary() {
        let mut content = passing_content();
        content.location_faq = faqs(4);
        assert!(validate_content(&content, "Fresno", "CA").contains(&SafetyFlag::InsufficientFaq));

        content.location_faq = faqs(5);
        assert!(!validate_content(&content, "Fresno", "CA").contains(&SafetyFlag::InsufficientFaq));
    }

    #[test]
    fn test_location_mentions_count_city_and_state_combined() {
        let mut content = passing_content();
        content.short_intro = "Fresno fresno CA".into();
        content.long_intro = "ca FRESNO".into();
        content.main_body = words(760);
        content.what_typically_happens_next = "Next.".into();
        content.services_intro = "Services.".into();
        // 3 city + 2 state mentions
        let flags = validate_content(&content, "Fresno", "CA");
        assert!(flags.contains(&SafetyFlag::LowCityMentions));

        content.services_intro = "Services in CA.".into();
        let flags = validate_content(&content, "Fresno", "CA");
        assert!(!flags.contains(&SafetyFlag::LowCityMentions));
    }

    #[test]
    fn test_low_local_context_counts_paragraphs() {
        let mut content = passing_content();
        content.short_intro = "Fresno Fresno Fresno Fresno Fresno Fresno".into();
        content.long_intro = "Scheduling is tight.".into();
        content.main_body = words(760);
        content.what_typically_happens_next = "Next.".into();
        content.services_intro = "Services.".into();

        let flags = validate_content(&content, "Fresno", "CA");
        assert!(flags.contains(&SafetyFlag::LowLocalContext));
        assert!(!flags.contains(&SafetyFlag::LowCityMentions));
    }

    #[test]
    fn test_insufficient_sections() {
        let mut content = passing_content();
        content.what_typically_happens_next = String::new();
        assert!(!validate_content(&content, "Fresno", "CA").contains(&SafetyFlag::InsufficientSections));

        content.services_intro = "   ".into();
        assert!(validate_content(&content, "Fresno", "CA").contains(&SafetyFlag::InsufficientSections));
    }

    #[test]
    fn test_prohibited_claims_in_body_and_faq() {
        let mut content = passing_content();
        content.main_body.push_str("\n\nWe guarantee you will pass.");
        assert_eq!(validate_content(&content, "Fresno", "CA"), vec![SafetyFlag::ProhibitedClaims]);

        let mut content = passing_content();
        content.location_faq[0].answer = "Talk to an Attorney first.".into();
        assert_eq!(validate_content(&content, "Fresno", "CA"), vec![SafetyFlag::ProhibitedClaims]);

        let mut content = passing_content();
        content.main_body.push_str("\n\nOur 100% success rate speaks for itself.");
        assert!(validate_content(&content, "Fresno", "CA").contains(&SafetyFlag::ProhibitedClaims));
    }

    #[test]
    fn test_guaranteed_alone_is_not_prohibited() {
        let mut content = passing_content();
        content.main_body.push_str("\n\nInspection outcomes are never guaranteed.");
        assert!(validate_content(&content, "Fresno", "CA").is_empty());
    }
}
