//! HTML link extraction
//!
//! This module turns a fetched page body into the child page paths the
//! crawler should consider next. Only `<a href>` links are followed, and only
//! those that stay under the crawl root.

use crate::crawler::frontier::{Frontier, PagePath};
use crate::url::decompose;
use scraper::{Html, Selector};
use std::collections::HashSet;

/// Reference schemes that never lead to a crawlable page
const SKIPPED_SCHEMES: [&str; 4] = ["javascript:", "mailto:", "tel:", "data:"];

/// Extracts same-site child paths from an HTML body
///
/// # Link Rules
///
/// - Everything from `#` on is dropped, then whitespace is trimmed
/// - `javascript:`, `mailto:`, `tel:` and `data:` references are skipped
/// - The href is decomposed with page-only references allowed; a bare
///   `name.ext` resolves against the directory of `from`
/// - Links with neither a path nor a page are skipped
/// - Links outside the frontier's root domain or path are skipped
///
/// # Arguments
///
/// * `body` - The HTML content to parse
/// * `from` - The page the body was fetched from
/// * `frontier` - The frontier holding the crawl root
///
/// # Returns
///
/// Child paths at depth `from.depth + 1`, in document order, each key once
pub fn extract_child_paths(body: &str, from: &PagePath, frontier: &Frontier) -> Vec<PagePath> {
    let document = Html::parse_document(body);
    let mut children = Vec::new();
    let mut keys = HashSet::new();

    let Ok(selector) = Selector::parse("a[href]") else {
        return children;
    };

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let Some(child) = resolve_link(href, from, frontier) else {
            continue;
        };

        if keys.insert(child.key()) {
            children.push(child);
        }
    }

    tracing::trace!(
        "Extracted {} child paths from {}",
        children.len(),
        from.key()
    );
    children
}

/// Resolves one href into a child path, or `None` if it should not be followed
fn resolve_link(href: &str, from: &PagePath, frontier: &Frontier) -> Option<PagePath> {
    let href = match href.find('#') {
        Some(fragment) => &href[..fragment],
        None => href,
    };
    let href = href.trim();

    if href.is_empty() || has_skipped_scheme(href) {
        return None;
    }

    let mut target = decompose(href, true);
    if target.path.is_empty() && target.page.is_empty() {
        return None;
    }

    // A page-only reference is relative to the current page's directory
    if target.domain.is_empty() && target.path.is_empty() {
        target.path = from.path.clone();
    }

    let key = target.page_key();
    if !frontier.is_same_site_descendant(&target.domain, &key) {
        return None;
    }

    Some(PagePath::new(target.path, target.page, from.depth + 1))
}

fn has_skipped_scheme(href: &str) -> bool {
    let href = href.as_bytes();
    SKIPPED_SCHEMES.iter().any(|scheme| {
        href.len() >= scheme.len() && href[..scheme.len()].eq_ignore_ascii_case(scheme.as_bytes())
    })
}
