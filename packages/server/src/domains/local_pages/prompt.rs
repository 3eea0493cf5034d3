//! Prompt text for local page generation.

use super::retry::GenerationMode;

/// Stored on every generation log row; bump when the prompt changes meaningfully.
pub const PROMPT_VERSION: &str = "local_pages_hood_cleaning_v1";

const SYSTEM_PROMPT: &str = r#"You are an experienced local SEO copywriter writing a location page for {Business}, a commercial kitchen hood cleaning company, for {City}, {State}.

## Experience and tone
- Write as someone who has seen how hood cleaning actually goes for restaurant operators: scheduling conflicts, inspection anxiety, downtime worries, confusion about compliance.
- Stay calm and respectful. No fear-based messaging, no pressure, no sales hype.
- Readers should come away understanding what the situation usually looks like, what typically happens next, what options exist, and which mistakes people commonly make.

## Specificity
- Describe how hood cleaning realistically unfolds in {City}, {State}: local business rhythms, seasonal demand, regional compliance expectations.
- The page must not be reusable for another city without noticeable edits.
- Mention the city and state naturally throughout, at least 6 times, without keyword stuffing.

## Truthfulness (critical)
- Do NOT invent facts: landmarks, awards, partnerships, regulations, inspection frequencies, statistics, crew sizes, years in business, success rates.
- Only mention neighborhoods, areas or landmarks that are provided in the request.
- Do NOT fabricate testimonials. Unless real quotes are provided, return an empty array for localTestimonials.
- No legal advice, no guarantees, no promised outcomes.
- Phrases like "Many restaurants in {City} find that..." are fine; invented numbers are not.

## Structure
Return a single JSON object, no markdown, with these fields:
- title: "{Business} in {City}, {State} | Hood Cleaning & Fire Safety Experts"
- metaDescription: roughly 150-160 characters mentioning {Business}, {City}, {State}, hood/exhaust cleaning, NFPA 96, documentation, and a call to action.
- h1: includes the business name and {City}, {State}.
- shortIntro: 2-3 sentences specific to {City}, {State}.
- longIntro: 2 short paragraphs separated by a blank line about local scheduling, logistics and compliance.
- mainBody: 800-1200 words in short paragraphs separated by blank lines, covering the stages of understanding, options, and common mistakes for hood cleaning, kitchen exhaust cleaning, fire safety compliance, inspections, documentation and service planning in {City}, {State}.
- whatTypicallyHappensNext: MANDATORY. 2-3 paragraphs walking through the process from first contact to completed service.
- servicesIntro: 1 short paragraph introducing services in {City}.
- neighborhoodsOrAreas: comma-separated list of provided areas, or an empty string.
- localStatsOrRegulationNotes: a short paragraph on NFPA 96 and local AHJ expectations without claiming a specific inspection cadence.
- localTestimonials: [] unless quotes were provided.
- locationFAQ: at least 5 and at most 8 objects {"question", "answer"} addressing real concerns of restaurants and facilities in {City}, {State}.

Write for people first. Do not mention other cities or service areas unless they are provided."#;

const STRICT_REQUIREMENTS: &str = r#"
STRICT OUTPUT REQUIREMENTS:
- mainBody must be 1000-1200 words.
- Mention the city/state at least 8 times across the sections.
- Provide at least 6 FAQ entries.
- Every section must have 2 or more paragraphs separated by blank lines.
"#;

/// Location parameters for one generation call.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationInput<'a> {
    pub city: &'a str,
    pub state: &'a str,
    pub county: Option<&'a str>,
    pub zip: Option<&'a str>,
    /// Hand-curated notes (e.g. neighborhoods) from the city context table.
    pub local_context_notes: Option<&'a str>,
}

impl LocationInput<'_> {
    /// How the location is named inside the prompt templates.
    pub fn place_name(&self) -> &str {
        if self.city.trim().is_empty() {
            self.zip.unwrap_or_default()
        } else {
            self.city
        }
    }
}

pub fn system_prompt(business_name: &str, location: &LocationInput<'_>) -> String {
    SYSTEM_PROMPT
        .replace("{Business}", business_name)
        .replace("{City}", location.place_name())
        .replace("{State}", location.state)
}

pub fn user_prompt(business_name: &str, location: &LocationInput<'_>, mode: GenerationMode) -> String {
    let location_text = match location.zip {
        Some(zip) => format!("ZIP code {}", zip),
        None => format!("{}, {}", location.city, location.state),
    };
    let county_text = location
        .county
        .map(|county| format!(", {} County", county))
        .unwrap_or_default();

    let mut prompt = format!(
        "Generate a local SEO page for {} in {}{}.\n",
        business_name, location_text, county_text
    );

    if let Some(notes) = location.local_context_notes.filter(|n| !n.trim().is_empty()) {
        prompt.push_str(&format!("\nNeighborhoods/areas and local notes to use: {}\n", notes.trim()));
    }

    if mode == GenerationMode::Strict {
        prompt.push_str(STRICT_REQUIREMENTS);
    }

    prompt.push_str("\nReturn a strictly valid JSON object with the fields described in the system prompt.\n");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresno() -> LocationInput<'static> {
        LocationInput {
            city: "Fresno",
            state: "CA",
            county: Some("Fresno"),
            ..Default::default()
        }
    }

    #[test]
    fn test_system_prompt_substitutes_placeholders() {
        let prompt = system_prompt("Shield Hood Services", &fresno());
        assert!(prompt.contains("Shield Hood Services in Fresno, CA | Hood Cleaning"));
        assert!(!prompt.contains("{City}"));
        assert!(!prompt.contains("{State}"));
        assert!(!prompt.contains("{Business}"));
    }

    #[test]
    fn test_zip_location_named_by_zip() {
        let location = LocationInput {
            state: "CA",
            zip: Some("93721"),
            ..Default::default()
        };
        assert!(system_prompt("Acme", &location).contains("for 93721, CA"));
        assert!(user_prompt("Acme", &location, GenerationMode::Normal).contains("ZIP code 93721"));
    }

    #[test]
    fn test_user_prompt_includes_county_and_notes() {
        let mut location = fresno();
        location.local_context_notes = Some("Tower District, Fig Garden");
        let prompt = user_prompt("Acme", &location, GenerationMode::Normal);

        assert!(prompt.contains("Acme in Fresno, CA, Fresno County."));
        assert!(prompt.contains("Tower District, Fig Garden"));
        assert!(!prompt.contains("STRICT OUTPUT REQUIREMENTS"));
    }

    #[test]
    fn test_strict_mode_adds_requirements() {
        let prompt = user_prompt("Acme", &fresno(), GenerationMode::Strict);
        assert!(prompt.contains("STRICT OUTPUT REQUIREMENTS"));
        assert!(prompt.contains("1000-1200 words"));
    }
}
