/// A URL split into the pieces the crawler cares about
///
/// `domain` keeps the scheme (`https://example.org`, optionally with a port).
/// An empty `domain` means the reference is relative to the current site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DeconstructedUrl {
    /// Scheme and host, e.g. `https://gcc.gnu.org`
    pub domain: String,

    /// Directory portion, e.g. `/install` or `/onlinedocs/gcc/`
    pub path: String,

    /// Final segment when it looks like a page, e.g. `index.html`
    pub page: String,
}

impl DeconstructedUrl {
    /// Returns true if no component was recognized
    pub fn is_empty(&self) -> bool {
        self.domain.is_empty() && self.path.is_empty() && self.page.is_empty()
    }

    /// Returns the normalized `path` + `page` key for this URL
    pub fn page_key(&self) -> String {
        make_page_path(&self.path, &self.page)
    }
}

/// Splits a URL string into domain, directory path and page
///
/// # Recognized Forms
///
/// - Domain: `http://` or `https://` (any case), then a host made of
///   `[A-Za-z0-9-]` labels containing at least one dot, then an optional
///   `:port`
/// - Page: `(/segment)*/` followed by an optional `./` and `name.ext`
/// - Directory: one or more `/segment` with an optional trailing `/`
///
/// Segments are made of `[A-Za-z0-9_:-]`. Matching is prefix-based: a query
/// string, fragment or anything else after the recognized part is ignored.
///
/// # Arguments
///
/// * `url` - The URL or link reference to split
/// * `allow_path_only` - Accept references without a domain. When nothing
///   else matches, a bare `name.ext` or `./name.ext` becomes the page.
///
/// # Returns
///
/// The decomposed URL. Unusable input yields an all-empty result.
///
/// # Examples
///
/// ```
/// use sitewalk::url::decompose;
///
/// let url = decompose("https://gcc.gnu.org/install/index.html", false);
/// assert_eq!(url.domain, "https://gcc.gnu.org");
/// assert_eq!(url.path, "/install");
/// assert_eq!(url.page, "index.html");
///
/// assert!(decompose("not-a-url", false).is_empty());
/// ```
pub fn decompose(url: &str, allow_path_only: bool) -> DeconstructedUrl {
    let (domain, rest) = split_domain(url);
    if domain.is_empty() && !allow_path_only {
        return DeconstructedUrl::default();
    }

    let (path, page) = split_path(rest);
    let mut decomposed = DeconstructedUrl {
        domain: domain.to_string(),
        path: path.to_string(),
        page: page.to_string(),
    };

    if allow_path_only && decomposed.is_empty() {
        if let Some(page) = page_prefix(url) {
            decomposed.page = page.to_string();
        }
    }

    decomposed
}

/// Joins a directory path and a page into one normalized key
///
/// A `/` separator is inserted only when there is a page and the path does
/// not already end in `/`. Page-only keys therefore start with `/`, so
/// `domain + key` is always a well-formed URL.
///
/// # Examples
///
/// ```
/// use sitewalk::url::make_page_path;
///
/// assert_eq!(make_page_path("/install", "index.html"), "/install/index.html");
/// assert_eq!(make_page_path("/install/", "index.html"), "/install/index.html");
/// assert_eq!(make_page_path("/install", ""), "/install");
/// assert_eq!(make_page_path("", "index.html"), "/index.html");
/// ```
pub fn make_page_path(path: &str, page: &str) -> String {
    let needs_separator = !page.is_empty() && !path.ends_with('/');
    let mut key = String::with_capacity(path.len() + page.len() + 1);
    key.push_str(path);
    if needs_separator {
        key.push('/');
    }
    key.push_str(page);
    key
}

fn is_host_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'-'
}

fn is_segment_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, b'_' | b':' | b'-')
}

/// Length of the leading run of bytes accepted by `pred`
fn span(bytes: &[u8], pred: impl Fn(u8) -> bool) -> usize {
    bytes.iter().take_while(|&&c| pred(c)).count()
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len() && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// Splits off `scheme://host[:port]`, returning ("", url) when absent
fn split_domain(url: &str) -> (&str, &str) {
    let scheme_len = if starts_with_ignore_case(url, "https://") {
        "https://".len()
    } else if starts_with_ignore_case(url, "http://") {
        "http://".len()
    } else {
        return ("", url);
    };

    let bytes = url.as_bytes();
    let first_label = span(&bytes[scheme_len..], is_host_char);
    if first_label == 0 {
        return ("", url);
    }

    let mut pos = scheme_len + first_label;
    let mut dotted_labels = 0;
    while bytes.get(pos) == Some(&b'.') {
        let label = span(&bytes[pos + 1..], is_host_char);
        if label == 0 {
            break;
        }
        pos += 1 + label;
        dotted_labels += 1;
    }
    if dotted_labels == 0 {
        return ("", url);
    }

    if bytes.get(pos) == Some(&b':') {
        let digits = span(&bytes[pos + 1..], |c| c.is_ascii_digit());
        if digits > 0 {
            pos += 1 + digits;
        }
    }

    url.split_at(pos)
}

/// Splits the part after the domain into (path, page)
fn split_path(rest: &str) -> (&str, &str) {
    let bytes = rest.as_bytes();

    // End offsets of each `/segment`
    let mut ends = Vec::new();
    let mut pos = 0;
    while bytes.get(pos) == Some(&b'/') {
        let len = span(&bytes[pos + 1..], is_segment_char);
        if len == 0 {
            break;
        }
        pos += 1 + len;
        ends.push(pos);
    }

    // `/dir/./page.ext` or `/dir/page.ext` following every directory segment
    if let Some(page) = rest[pos..].strip_prefix('/').and_then(page_prefix) {
        return (&rest[..pos], page);
    }

    // The last segment is itself the stem of `page.ext`
    if let Some(&last_end) = ends.last() {
        let start = if ends.len() >= 2 { ends[ends.len() - 2] } else { 0 };
        if bytes.get(last_end) == Some(&b'.') {
            let ext = span(&bytes[last_end + 1..], |c| c.is_ascii_alphanumeric());
            if ext > 0 {
                return (&rest[..start], &rest[start + 1..last_end + 1 + ext]);
            }
        }
    }

    if ends.is_empty() {
        return ("", "");
    }

    let end = if bytes.get(pos) == Some(&b'/') { pos + 1 } else { pos };
    (&rest[..end], "")
}

/// Matches `(./)?name.ext` at the start of `s`
fn page_prefix(s: &str) -> Option<&str> {
    let s = s.strip_prefix("./").unwrap_or(s);
    let bytes = s.as_bytes();
    let stem = span(bytes, is_segment_char);
    if stem == 0 || bytes.get(stem) != Some(&b'.') {
        return None;
    }
    let ext = span(&bytes[stem + 1..], |c| c.is_ascii_alphanumeric());
    if ext == 0 {
        return None;
    }
    Some(&s[..stem + 1 + ext])
}
