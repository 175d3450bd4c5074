//! Scraped page representation.
//!
//! A `PageContent` is built once per fetch attempt and is immutable
//! afterwards. A failed fetch still produces a `PageContent`, with the
//! failure recorded on `error` and everything else empty; callers check
//! `is_valid()` instead of handling a `Result`.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

/// Title used when a page has no `<title>` element.
pub const TITLE_PLACEHOLDER: &str = "No title found";

/// Elements whose subtrees are noise for a language model.
const STRIPPED_TAGS: [&str; 6] = ["script", "style", "img", "input", "nav", "footer"];

/// The content of one scraped webpage.
#[derive(Debug, Clone)]
pub struct PageContent {
    /// URL the page was fetched from
    pub url: String,

    /// Trimmed `<title>` text, or [`TITLE_PLACEHOLDER`]
    pub title: String,

    /// Visible body text, one text node per line
    pub body_text: String,

    /// Every hyperlink target in document order, resolved to absolute
    /// URLs; duplicates kept
    pub links: Vec<String>,

    /// Failure reason; set iff the fetch did not produce content
    pub error: Option<String>,
}

impl PageContent {
    /// Parse fetched HTML into page content.
    pub fn from_html(url: &str, html: &str) -> Self {
        let doc = Html::parse_document(html);

        let title_selector = Selector::parse("title").unwrap();
        let title = doc
            .select(&title_selector)
            .next()
            .map(|t| t.text().collect::<String>().trim().to_string())
            .unwrap_or_else(|| TITLE_PLACEHOLDER.to_string());

        let body_selector = Selector::parse("body").unwrap();
        let body_text = doc
            .select(&body_selector)
            .next()
            .map(|body| {
                let mut parts = Vec::new();
                collect_visible_text(body, &mut parts);
                parts.join("\n").trim().to_string()
            })
            .unwrap_or_default();

        let base = Url::parse(url).ok();
        let link_selector = Selector::parse("a[href]").unwrap();
        let links: Vec<String> = doc
            .select(&link_selector)
            .filter_map(|a| a.value().attr("href"))
            .filter(|href| !href.is_empty())
            .filter_map(|href| normalize_link(base.as_ref(), href))
            .collect();

        debug!(url = %url, links = links.len(), body_chars = body_text.chars().count(), "parsed page");

        Self {
            url: url.to_string(),
            title,
            body_text,
            links,
            error: None,
        }
    }

    /// Record a failed fetch attempt.
    pub fn failed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: String::new(),
            body_text: String::new(),
            links: Vec::new(),
            error: Some(reason.into()),
        }
    }

    /// A page is valid iff no error was recorded.
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    /// Render the page for inclusion in the corpus.
    pub fn get_contents(&self) -> String {
        match &self.error {
            Some(reason) => format!("Error accessing {}: {}", self.url, reason),
            None => format!(
                "Webpage Title:\n{}\nWebpage Contents:\n{}\n\n",
                self.title, self.body_text
            ),
        }
    }
}

/// Collect visible text nodes below `element`, skipping stripped subtrees.
fn collect_visible_text(element: ElementRef<'_>, out: &mut Vec<String>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                out.push(trimmed.to_string());
            }
        } else if let Some(child_element) = ElementRef::wrap(child) {
            if !STRIPPED_TAGS.contains(&child_element.value().name()) {
                collect_visible_text(child_element, out);
            }
        }
    }
}

/// Resolve a hyperlink target against the page URL.
///
/// Already-absolute http(s) targets pass through unchanged, so
/// resolution is idempotent. Targets that cannot be resolved (no valid
/// base) are dropped.
fn normalize_link(base: Option<&Url>, href: &str) -> Option<String> {
    if href.starts_with("http") {
        return Some(href.to_string());
    }
    base?.join(href).ok().map(|resolved| resolved.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_URL: &str = "https://example.com/page";

    #[test]
    fn test_title_trimmed() {
        let page = PageContent::from_html(PAGE_URL, "<html><head><title>  Acme Corp \n</title></head><body></body></html>");
        assert_eq!(page.title, "Acme Corp");
    }

    #[test]
    fn test_title_placeholder_when_absent() {
        let page = PageContent::from_html(PAGE_URL, "<html><body><p>hi</p></body></html>");
        assert_eq!(page.title, TITLE_PLACEHOLDER);
    }

    #[test]
    fn test_body_text_joined_by_newlines() {
        let page = PageContent::from_html(
            PAGE_URL,
            "<html><body><h1>Welcome</h1><p>We make widgets.</p></body></html>",
        );
        assert_eq!(page.body_text, "Welcome\nWe make widgets.");
    }

    #[test]
    fn test_stripped_subtrees_do_not_contribute() {
        let plain = PageContent::from_html(
            PAGE_URL,
            "<html><body><p>Visible</p></body></html>",
        );
        let noisy = PageContent::from_html(
            PAGE_URL,
            "<html><body>\
             <script>var x = 1;</script>\
             <style>p { color: red }</style>\
             <nav>Home | About</nav>\
             <p>Visible</p>\
             <footer>© Acme</footer>\
             </body></html>",
        );
        assert_eq!(plain.body_text, noisy.body_text);
    }

    #[test]
    fn test_nested_stripped_subtree() {
        let page = PageContent::from_html(
            PAGE_URL,
            "<html><body><div><nav><ul><li>Menu item</li></ul></nav><p>Real content</p></div></body></html>",
        );
        assert_eq!(page.body_text, "Real content");
    }

    #[test]
    fn test_relative_links_resolved() {
        let page = PageContent::from_html(
            PAGE_URL,
            r#"<html><body><a href="/about">About</a><a href="careers">Careers</a></body></html>"#,
        );
        assert_eq!(
            page.links,
            vec![
                "https://example.com/about".to_string(),
                "https://example.com/careers".to_string(),
            ]
        );
    }

    #[test]
    fn test_absolute_links_pass_through_unchanged() {
        let page = PageContent::from_html(
            PAGE_URL,
            r#"<html><body><a href="https://other.com/x?q=1">X</a></body></html>"#,
        );
        assert_eq!(page.links, vec!["https://other.com/x?q=1".to_string()]);
    }

    #[test]
    fn test_link_order_preserved_and_duplicates_kept() {
        let page = PageContent::from_html(
            PAGE_URL,
            r#"<html><body>
               <a href="/b">b</a>
               <a href="/a">a</a>
               <a href="/b">b again</a>
               </body></html>"#,
        );
        assert_eq!(
            page.links,
            vec![
                "https://example.com/b".to_string(),
                "https://example.com/a".to_string(),
                "https://example.com/b".to_string(),
            ]
        );
    }

    #[test]
    fn test_links_found_outside_body() {
        let page = PageContent::from_html(
            PAGE_URL,
            r#"<html><body><nav><a href="/hidden">Hidden</a></nav></body></html>"#,
        );
        // nav is stripped from body text but its links are still collected
        assert_eq!(page.links, vec!["https://example.com/hidden".to_string()]);
        assert_eq!(page.body_text, "");
    }

    #[test]
    fn test_failed_page_invariant() {
        let page = PageContent::failed(PAGE_URL, "HTTP 404 Not Found");

        assert!(!page.is_valid());
        assert!(page.title.is_empty());
        assert!(page.body_text.is_empty());
        assert!(page.links.is_empty());
    }

    #[test]
    fn test_get_contents_valid() {
        let page = PageContent::from_html(
            PAGE_URL,
            "<html><head><title>Acme</title></head><body><p>Widgets</p></body></html>",
        );
        assert_eq!(
            page.get_contents(),
            "Webpage Title:\nAcme\nWebpage Contents:\nWidgets\n\n"
        );
    }

    #[test]
    fn test_get_contents_error() {
        let page = PageContent::failed(PAGE_URL, "connection refused");
        assert_eq!(
            page.get_contents(),
            format!("Error accessing {}: connection refused", PAGE_URL)
        );
    }
}
