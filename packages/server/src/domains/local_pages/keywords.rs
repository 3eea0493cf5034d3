//! Primary service keywords that namespace generated pages.
//!
//! The catalog is built once at startup and shared read-only; tests can
//! construct smaller catalogs with [`KeywordCatalog::new`].

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryKeyword {
    pub slug: String,
    pub label: String,
    pub intents: Vec<String>,
}

impl PrimaryKeyword {
    pub fn new(slug: &str, label: &str, intents: &[&str]) -> Self {
        Self {
            slug: slug.to_string(),
            label: label.to_string(),
            intents: intents.iter().map(|i| i.to_string()).collect(),
        }
    }
}

/// Intent values the admin UI offers, as `(value, label)`.
pub const INTENT_OPTIONS: &[(&str, &str)] = &[
    ("service-request", "Service Request"),
    ("information", "Information Seeking"),
    ("compliance", "Compliance Questions"),
    ("urgent-service", "Urgent Service"),
];

/// Intent used when a bulk row leaves the column empty.
pub const DEFAULT_INTENT: &str = "information";

#[derive(Debug, Clone)]
pub struct KeywordCatalog {
    keywords: Vec<PrimaryKeyword>,
}

impl KeywordCatalog {
    pub fn new(keywords: Vec<PrimaryKeyword>) -> Self {
        Self { keywords }
    }

    pub fn get(&self, slug: &str) -> Option<&PrimaryKeyword> {
        self.keywords.iter().find(|kw| kw.slug == slug)
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.get(slug).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PrimaryKeyword> {
        self.keywords.iter()
    }

    /// Human label for a slug, or a title-cased version of the slug itself.
    pub fn label_for(&self, slug: &str) -> String {
        match self.get(slug) {
            Some(kw) => kw.label.clone(),
            None => title_case_slug(slug),
        }
    }
}

impl Default for KeywordCatalog {
    fn default() -> Self {
        Self::new(vec![
            PrimaryKeyword::new(
                "hood-cleaning",
                "Hood Cleaning",
                &["service-request", "information", "compliance"],
            ),
            PrimaryKeyword::new(
                "kitchen-exhaust-cleaning",
                "Kitchen Exhaust Cleaning",
                &["service-request", "information", "compliance"],
            ),
            PrimaryKeyword::new(
                "commercial-hood-cleaning",
                "Commercial Hood Cleaning",
                &["service-request", "information"],
            ),
            PrimaryKeyword::new(
                "restaurant-hood-cleaning",
                "Restaurant Hood Cleaning",
                &["service-request", "information"],
            ),
        ])
    }
}

fn title_case_slug(slug: &str) -> String {
    slug.split('-')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
