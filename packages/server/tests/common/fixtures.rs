//! Content and page builders shared by integration tests.

use site_core::domains::local_pages::render::render_local_page_html;
use site_core::domains::local_pages::{
    FaqEntry, GenerateDraftRequest, InternalLink, LocalPageContent, NewLocalPage, SafetyFlag,
};
use uuid::Uuid;

/// `count` words that no other seed produces.
pub fn filler(seed: &str, count: usize) -> String {
    (0..count)
        .map(|i| format!("{}w{}", seed, i))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Content that passes every validator rule for `place`/`state`.
pub fn passing_content(place: &str, state: &str, seed: &str) -> LocalPageContent {
    LocalPageContent {
        title: format!("Shield Hood Services in {}, {} | Hood Cleaning & Fire Safety Experts", place, state),
        meta_description: format!("Hood and exhaust cleaning for {} kitchens with NFPA 96 documentation.", place),
        h1: format!("Shield Hood Services: Hood Cleaning in {}, {}", place, state),
        short_intro: format!("Restaurants in {}, {} schedule hood cleaning around busy service hours.", place, state),
        long_intro: format!(
            "Kitchens across {} plan cleanings before inspections.\n\nOperators in {} keep service records ready.",
            place, state
        ),
        main_body: format!(
            "{}\n\nIn {} crews work overnight. {}",
            filler(seed, 400),
            place,
            filler(&format!("{}b", seed), 400)
        ),
        what_typically_happens_next: format!(
            "After the first call we walk the {} kitchen.\n\nThen we schedule the visit.",
            place
        ),
        services_intro: format!("Our services in {} cover hoods, ducts and fans.", place),
        neighborhoods_or_areas: String::new(),
        local_stats_or_regulation_notes: "NFPA 96 sets cleaning expectations; the local AHJ enforces them.".to_string(),
        local_testimonials: vec![],
        location_faq: (1..=5)
            .map(|i| FaqEntry {
                question: format!("Question {} about hood cleaning in {}?", i, place),
                answer: format!("Answer {}.", i),
            })
            .collect(),
    }
}

/// Passes every rule except the minimum word count.
pub fn thin_content(place: &str, state: &str) -> LocalPageContent {
    LocalPageContent {
        main_body: format!("In {} crews work overnight.", place),
        ..passing_content(place, state, "thin")
    }
}

/// Passes every structural rule but contains a prohibited claim.
pub fn prohibited_content(place: &str, state: &str, seed: &str) -> LocalPageContent {
    let mut content = passing_content(place, state, seed);
    content.services_intro = format!("We guarantee every kitchen in {} passes inspection.", place);
    content
}

pub fn city_request(city: &str) -> GenerateDraftRequest {
    GenerateDraftRequest {
        primary_keyword: String::new(),
        primary_keyword_slug: "hood-cleaning".to_string(),
        city: Some(city.to_string()),
        state: "CA".to_string(),
        intent: "information".to_string(),
        ..Default::default()
    }
}

pub fn zip_request(zip: &str) -> GenerateDraftRequest {
    GenerateDraftRequest {
        primary_keyword_slug: "hood-cleaning".to_string(),
        zip: Some(zip.to_string()),
        state: "CA".to_string(),
        intent: "information".to_string(),
        ..Default::default()
    }
}

/// A ready-to-insert page row; `slug` should be unique per test.
pub fn new_page(slug: &str, city: &str, seed: &str, flags: Vec<SafetyFlag>, uniqueness_score: f64) -> NewLocalPage {
    page_with_content(slug, city, passing_content(city, "CA", seed), flags, uniqueness_score)
}

/// Like [`new_page`] but with caller-supplied content, rendered the way drafts are.
pub fn page_with_content(
    slug: &str,
    city: &str,
    content: LocalPageContent,
    flags: Vec<SafetyFlag>,
    uniqueness_score: f64,
) -> NewLocalPage {
    NewLocalPage {
        primary_keyword: "Hood Cleaning".to_string(),
        primary_keyword_slug: "hood-cleaning".to_string(),
        city: Some(city.to_string()),
        zip: None,
        county: None,
        state: "CA".to_string(),
        intent: "information".to_string(),
        slug: slug.to_string(),
        rendered_html: render_local_page_html(&content, city, "CA"),
        content,
        internal_links: InternalLink::defaults_for("hood-cleaning"),
        uniqueness_score,
        safety_flags: flags,
    }
}

/// Passing content whose main body has a quoted word every four words and
/// an ampersand every four words.
pub fn punctuated_content(place: &str, state: &str, seed: &str) -> LocalPageContent {
    let mut content = passing_content(place, state, seed);
    content.main_body = content
        .main_body
        .split(' ')
        .enumerate()
        .map(|(i, word)| match i % 4 {
            0 => format!("\"{}\"", word),
            2 => format!("{} &", word),
            _ => word.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ");
    content
}

pub fn unique_slug(prefix: &str) -> String {
    format!("/{}/{}", prefix, Uuid::new_v4().simple())
}
