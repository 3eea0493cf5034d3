//! URL slug synthesis for generated pages.

/// Builds the page path when the caller did not supply one.
///
/// Zip requests map to `/{keyword}-{zip}`; city requests map to
/// `/{keyword}/{city-lowercased-hyphenated}-{state-lowercased}`.
pub fn synthesize_slug(keyword_slug: &str, city: Option<&str>, zip: Option<&str>, state: &str) -> Option<String> {
    if let Some(zip) = zip {
        return Some(format!("/{}-{}", keyword_slug, zip));
    }

    city.map(|city| {
        format!(
            "/{}/{}-{}",
            keyword_slug,
            hyphenate(city),
            state.trim().to_lowercase()
        )
    })
}

fn hyphenate(value: &str) -> String {
    value
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_slug() {
        assert_eq!(
            synthesize_slug("hood-cleaning", Some("Los Angeles"), None, "CA").as_deref(),
            Some("/hood-cleaning/los-angeles-ca")
        );
    }

    #[test]
    fn test_zip_slug_takes_precedence() {
        assert_eq!(
            synthesize_slug("hood-cleaning", Some("Fresno"), Some("93721"), "CA").as_deref(),
            Some("/hood-cleaning-93721")
        );
    }

    #[test]
    fn test_collapses_repeated_whitespace() {
        assert_eq!(
            synthesize_slug("kitchen-exhaust-cleaning", Some("San  Luis   Obispo"), None, "ca").as_deref(),
            Some("/kitchen-exhaust-cleaning/san-luis-obispo-ca")
        );
    }

    #[test]
    fn test_no_location_yields_none() {
        assert_eq!(synthesize_slug("hood-cleaning", None, None, "CA"), None);
    }
}
