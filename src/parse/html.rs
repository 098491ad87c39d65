//! DOM extraction.
//!
//! `PageDocument::parse` walks the rendered HTML once and keeps only the facts the
//! rules look at. The result is plain owned data (unlike `scraper::Html`, it is
//! `Send`), so it can be built once per evaluation and shared by every rule.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::model::PageLink;
use crate::utils::parse_selector_with_fallback;
use crate::utils::sanitize::normalize_whitespace;

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("title", "title extraction"));
static META_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("meta[name]", "meta extraction"));
static HEADING_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_with_fallback("h1, h2, h3, h4, h5, h6", "heading extraction")
});
static CANONICAL_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_with_fallback("link[rel~='canonical'][href]", "canonical extraction")
});
static JSON_LD_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_with_fallback("script[type='application/ld+json']", "JSON-LD extraction")
});
static HREFLANG_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_with_fallback("link[rel~='alternate'][hreflang]", "hreflang extraction")
});
static HTML_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("html", "language extraction"));
static BODY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("body", "body text extraction"));
static IMAGE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("img", "image extraction"));
static SUBRESOURCE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_with_fallback("img[src], script[src], link[href]", "mixed content extraction")
});
static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("a[href]", "link extraction"));

/// One `<link rel="alternate" hreflang>` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HreflangTag {
    pub lang: String,
    pub href: String,
}

/// One `<img>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTag {
    pub src: String,
    /// `None` when the attribute is missing entirely
    pub alt: Option<String>,
}

/// A sub-resource requested over plain http.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsecureElement {
    pub tag: String,
    pub url: String,
}

/// Facts extracted from a rendered page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageDocument {
    /// First non-empty `<title>` text
    pub title: Option<String>,
    /// `<meta name=... content=...>` keyed by lowercase name; first occurrence wins
    pub meta: BTreeMap<String, String>,
    /// Heading texts per level; index 0 is `h1`
    pub headings: [Vec<String>; 6],
    pub canonical: Option<String>,
    /// Raw text of every JSON-LD script, in document order
    pub json_ld: Vec<String>,
    pub hreflangs: Vec<HreflangTag>,
    /// `<html lang>` value
    pub lang: Option<String>,
    pub images: Vec<ImageTag>,
    /// Words of visible body text (script/style/noscript excluded)
    pub word_count: usize,
    /// `img`/`script`/`link` elements whose URL uses `http://`
    pub insecure_elements: Vec<InsecureElement>,
}

impl PageDocument {
    /// Parses HTML and extracts every fact the rules consume.
    pub fn parse(html: &str) -> Self {
        let document = Html::parse_document(html);

        let title = document
            .select(&TITLE_SELECTOR)
            .map(|el| normalize_whitespace(&el.text().collect::<String>()))
            .find(|t| !t.is_empty());

        let mut meta = BTreeMap::new();
        for element in document.select(&META_SELECTOR) {
            let (Some(name), Some(content)) =
                (element.value().attr("name"), element.value().attr("content"))
            else {
                continue;
            };
            meta.entry(name.trim().to_ascii_lowercase())
                .or_insert_with(|| content.trim().to_string());
        }

        let mut headings: [Vec<String>; 6] = Default::default();
        for element in document.select(&HEADING_SELECTOR) {
            if let Some(level) = heading_level(element.value().name()) {
                headings[level - 1].push(normalize_whitespace(&element.text().collect::<String>()));
            }
        }

        let canonical = document
            .select(&CANONICAL_SELECTOR)
            .filter_map(|el| el.value().attr("href"))
            .map(str::trim)
            .find(|href| !href.is_empty())
            .map(str::to_string);

        let json_ld = document
            .select(&JSON_LD_SELECTOR)
            .map(|el| el.text().collect::<String>())
            .collect();

        let hreflangs = document
            .select(&HREFLANG_SELECTOR)
            .filter_map(|el| {
                let lang = el.value().attr("hreflang")?.trim();
                Some(HreflangTag {
                    lang: lang.to_string(),
                    href: el.value().attr("href").unwrap_or_default().trim().to_string(),
                })
            })
            .collect();

        let lang = document
            .select(&HTML_SELECTOR)
            .next()
            .and_then(|el| el.value().attr("lang"))
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string);

        let images = document
            .select(&IMAGE_SELECTOR)
            .map(|el| ImageTag {
                src: el.value().attr("src").unwrap_or_default().to_string(),
                alt: el.value().attr("alt").map(str::to_string),
            })
            .collect();

        let word_count = document
            .select(&BODY_SELECTOR)
            .next()
            .map(visible_word_count)
            .unwrap_or(0);

        let insecure_elements = document
            .select(&SUBRESOURCE_SELECTOR)
            .filter_map(|el| {
                let tag = el.value().name();
                let attr = if tag == "link" { "href" } else { "src" };
                let url = el.value().attr(attr)?.trim();
                url.get(..7)
                    .filter(|scheme| scheme.eq_ignore_ascii_case("http://"))
                    .map(|_| InsecureElement {
                        tag: tag.to_string(),
                        url: url.to_string(),
                    })
            })
            .collect();

        Self {
            title,
            meta,
            headings,
            canonical,
            json_ld,
            hreflangs,
            lang,
            images,
            word_count,
            insecure_elements,
        }
    }

    /// Content of `<meta name="...">`, matched case-insensitively.
    pub fn meta_content(&self, name: &str) -> Option<&str> {
        self.meta.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Heading texts for `level` (1-6).
    pub fn headings(&self, level: usize) -> &[String] {
        match level {
            1..=6 => &self.headings[level - 1],
            _ => &[],
        }
    }
}

fn heading_level(name: &str) -> Option<usize> {
    match name {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

fn visible_word_count(body: ElementRef<'_>) -> usize {
    body.descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node
                .parent()
                .and_then(|parent| parent.value().as_element())
                .is_some_and(|el| matches!(el.name(), "script" | "style" | "noscript" | "template"));
            (!hidden).then(|| text.split_whitespace().count())
        })
        .sum()
}

/// Extracts outbound `<a href>` links, resolved against `base`.
///
/// Only http(s) targets are kept; fragments, `mailto:`, `tel:` and `javascript:`
/// links are dropped. Duplicate targets are kept once, in first-seen order.
pub fn extract_links(html: &str, base: &Url) -> Vec<PageLink> {
    let document = Html::parse_document(html);
    let mut seen = std::collections::HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&ANCHOR_SELECTOR) {
        let Some(raw) = element.value().attr("href") else {
            continue;
        };
        let raw = raw.trim();
        if raw.is_empty() || raw.starts_with('#') {
            continue;
        }
        let Ok(mut resolved) = base.join(raw) else {
            continue;
        };
        if !matches!(resolved.scheme(), "http" | "https") {
            continue;
        }
        resolved.set_fragment(None);
        let href = resolved.to_string();
        if !seen.insert(href.clone()) {
            continue;
        }
        links.push(PageLink {
            href,
            text: normalize_whitespace(&element.text().collect::<String>()),
            rel: element.value().attr("rel").map(str::to_string),
            target: element.value().attr("target").map(str::to_string),
        });
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r##"<!DOCTYPE html>
<html lang="en-GB">
<head>
  <title>  Example   Domain  </title>
  <meta name="Description" content=" A short description. ">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <meta name="robots" content="noindex, nofollow">
  <link rel="canonical" href="https://example.com/">
  <link rel="alternate" hreflang="en" href="https://example.com/en">
  <link rel="alternate" hreflang="de" href="https://example.com/de">
  <link rel="stylesheet" href="http://cdn.example.com/site.css">
  <script type="application/ld+json">{"@type": "Organization"}</script>
  <script src="https://cdn.example.com/app.js"></script>
</head>
<body>
  <h1>Welcome</h1>
  <h2>Intro</h2><h2>Details</h2>
  <p>One two three four five.</p>
  <script>var ignored = "these words are not visible";</script>
  <img src="/a.png" alt="A">
  <img src="http://cdn.example.com/b.png">
  <a href="/about" rel="nofollow">About  us</a>
  <a href="https://other.example.org/x#frag" target="_blank">Other</a>
  <a href="/about">Duplicate</a>
  <a href="mailto:hi@example.com">Mail</a>
  <a href="#top">Top</a>
</body>
</html>"##;

    #[test]
    fn test_parse_head_facts() {
        let doc = PageDocument::parse(PAGE);
        assert_eq!(doc.title.as_deref(), Some("Example Domain"));
        assert_eq!(doc.meta_content("description"), Some("A short description."));
        assert_eq!(
            doc.meta_content("VIEWPORT"),
            Some("width=device-width, initial-scale=1")
        );
        assert_eq!(doc.canonical.as_deref(), Some("https://example.com/"));
        assert_eq!(doc.lang.as_deref(), Some("en-GB"));
        assert_eq!(doc.hreflangs.len(), 2);
        assert_eq!(doc.json_ld, vec![r#"{"@type": "Organization"}"#.to_string()]);
    }

    #[test]
    fn test_parse_body_facts() {
        let doc = PageDocument::parse(PAGE);
        assert_eq!(doc.headings(1), ["Welcome".to_string()]);
        assert_eq!(doc.headings(2).len(), 2);
        assert!(doc.headings(3).is_empty());
        assert!(doc.headings(7).is_empty());
        assert_eq!(doc.images.len(), 2);
        assert_eq!(doc.images[1].alt, None);
        // Headings, paragraph and anchors count; the inline script does not
        assert!(doc.word_count >= 9, "word count was {}", doc.word_count);
        assert!(doc.word_count < 20, "word count was {}", doc.word_count);
    }

    #[test]
    fn test_insecure_elements_detected() {
        let doc = PageDocument::parse(PAGE);
        let urls: Vec<_> = doc.insecure_elements.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(
            urls,
            ["http://cdn.example.com/site.css", "http://cdn.example.com/b.png"]
        );
    }

    #[test]
    fn test_empty_document() {
        let doc = PageDocument::parse("");
        assert_eq!(doc.title, None);
        assert!(doc.meta.is_empty());
        assert_eq!(doc.word_count, 0);
    }

    #[test]
    fn test_extract_links_resolves_and_filters() {
        let base = Url::parse("https://example.com/index.html").unwrap();
        let links = extract_links(PAGE, &base);
        let hrefs: Vec<_> = links.iter().map(|l| l.href.as_str()).collect();
        assert_eq!(hrefs, ["https://example.com/about", "https://other.example.org/x"]);
        assert_eq!(links[0].text, "About us");
        assert_eq!(links[0].rel.as_deref(), Some("nofollow"));
        assert_eq!(links[1].target.as_deref(), Some("_blank"));
    }
}
