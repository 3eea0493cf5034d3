//! Fixed-structure HTML fragment for a local page.

use std::fmt::Write;

use super::types::LocalPageContent;
use super::validation::paragraphs;

/// Renders `content` in a fixed section order; empty sections are omitted.
///
/// Text is HTML-escaped; the fragment is injected into page templates
/// verbatim. Uniqueness checks read it back through [`html_to_text`].
pub fn render_local_page_html(content: &LocalPageContent, location_label: &str, state: &str) -> String {
    let mut html = String::new();

    let _ = write!(html, "<h1>{}</h1>\n\n", escape(&content.h1));

    push_block(&mut html, "div", "intro-short", None, &content.short_intro);
    push_block(&mut html, "div", "intro-long", None, &content.long_intro);
    push_block(&mut html, "div", "main-body", None, &content.main_body);
    push_block(
        &mut html,
        "section",
        "what-happens-next",
        Some("What Typically Happens Next"),
        &content.what_typically_happens_next,
    );
    push_block(&mut html, "section", "services-intro", None, &content.services_intro);
    push_block(
        &mut html,
        "section",
        "local-stats",
        None,
        &content.local_stats_or_regulation_notes,
    );

    let areas: Vec<&str> = content
        .neighborhoods_or_areas
        .split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .collect();
    if !areas.is_empty() {
        let _ = write!(
            html,
            "<section class=\"neighborhoods\">\n<h2>Areas We Serve in {}, {}</h2>\n<ul>\n",
            escape(location_label),
            escape(state)
        );
        for area in areas {
            let _ = writeln!(html, "<li>{}</li>", escape(area));
        }
        html.push_str("</ul>\n</section>\n\n");
    }

    html
}

fn push_block(html: &mut String, tag: &str, class: &str, heading: Option<&str>, text: &str) {
    if text.trim().is_empty() {
        return;
    }

    let _ = writeln!(html, "<{} class=\"{}\">", tag, class);
    if let Some(heading) = heading {
        let _ = writeln!(html, "<h2>{}</h2>", heading);
    }
    let body = paragraphs(text)
        .map(|p| format!("<p>{}</p>", escape(p)))
        .collect::<Vec<_>>()
        .join("\n");
    let _ = write!(html, "{}\n</{}>\n\n", body, tag);
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Plain text of a rendered fragment: tags become whitespace and the
/// entities produced by the renderer are decoded.
pub fn html_to_text(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => {
                in_tag = true;
                text.push(' ');
            }
            '>' if in_tag => in_tag = false,
            _ if in_tag => {}
            _ => text.push(c),
        }
    }

    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::local_pages::similarity::calculate_uniqueness_score;

    fn content() -> LocalPageContent {
        LocalPageContent {
            h1: "Hood Cleaning in Fresno, CA".into(),
            short_intro: "Short.".into(),
            long_intro: "Long one.\n\nLong two.".into(),
            main_body: "Para one.\n\nPara two.".into(),
            what_typically_happens_next: "We call.".into(),
            services_intro: "We clean.".into(),
            local_stats_or_regulation_notes: "NFPA 96 applies.".into(),
            neighborhoods_or_areas: "Tower District, , Fig Garden ".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_main_body_paragraphs_in_order() {
        let only_body = LocalPageContent {
            h1: "H".into(),
            main_body: "  Para one.  \n\n\n\nPara two.".into(),
            ..Default::default()
        };
        let html = render_local_page_html(&only_body, "Fresno", "CA");

        assert_eq!(html.matches("<p>").count(), 2);
        let first = html.find("<p>Para one.</p>").unwrap();
        let second = html.find("<p>Para two.</p>").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_fixed_section_order() {
        let html = render_local_page_html(&content(), "Fresno", "CA");
        let order = [
            "<h1>",
            "intro-short",
            "intro-long",
            "main-body",
            "<h2>What Typically Happens Next</h2>",
            "services-intro",
            "local-stats",
            "<h2>Areas We Serve in Fresno, CA</h2>",
        ];
        let positions: Vec<usize> = order.iter().map(|marker| html.find(marker).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_neighborhood_list_skips_blank_items() {
        let html = render_local_page_html(&content(), "Fresno", "CA");
        assert!(html.contains("<li>Tower District</li>\n<li>Fig Garden</li>\n"));
        assert_eq!(html.matches("<li>").count(), 2);
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let sparse = LocalPageContent {
            h1: "H".into(),
            main_body: "Body.".into(),
            neighborhoods_or_areas: " , ".into(),
            ..Default::default()
        };
        let html = render_local_page_html(&sparse, "93721", "CA");

        assert!(!html.contains("intro-short"));
        assert!(!html.contains("what-happens-next"));
        assert!(!html.contains("neighborhoods"));
        assert!(html.contains("<div class=\"main-body\">\n<p>Body.</p>\n</div>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let risky = LocalPageContent {
            h1: "Fish & Chips <Fresno>".into(),
            main_body: "<script>alert(1)</script>".into(),
            ..Default::default()
        };
        let html = render_local_page_html(&risky, "Fresno", "CA");

        assert!(html.contains("<h1>Fish &amp; Chips &lt;Fresno&gt;</h1>"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_html_to_text_reverses_escaping() {
        let risky = LocalPageContent {
            h1: "Fish & Chips <Fresno>".into(),
            main_body: "Say \"hood & duct\" twice.\n\nDone.".into(),
            ..Default::default()
        };
        let text = html_to_text(&render_local_page_html(&risky, "Fresno", "CA"));

        assert!(text.contains("Fish & Chips <Fresno>"));
        assert!(text.contains("Say \"hood & duct\" twice."));
        assert!(!text.contains("amp"));
        assert!(!text.contains("main-body"));
    }

    #[test]
    fn test_rendered_copy_scores_as_duplicate() {
        let words: Vec<String> = (0..300)
            .map(|i| match i % 4 {
                0 => format!("\"w{}\"", i),
                2 => format!("w{} &", i),
                _ => format!("w{}", i),
            })
            .collect();
        let copy = LocalPageContent {
            h1: "H".into(),
            main_body: words.join(" "),
            ..Default::default()
        };
        let corpus = [html_to_text(&render_local_page_html(&copy, "Fresno", "CA"))];

        let score = calculate_uniqueness_score(&copy.similarity_text(), &corpus);
        assert!(score < 0.05, "score was {}", score);
    }
}
