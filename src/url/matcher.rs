/// Checks whether a page key lies at or below a root path
///
/// The root must be a prefix of the candidate that ends on a path boundary:
/// either the root itself ends with `/`, the candidate continues with `/`
/// right after the prefix, or the two are equal. An empty root accepts
/// everything.
///
/// # Arguments
///
/// * `root_path` - The crawl root's directory path
/// * `candidate` - A normalized page key (`path` + `page`)
///
/// # Examples
///
/// ```
/// use sitewalk::url::is_path_descendant;
///
/// assert!(is_path_descendant("/install", "/install"));
/// assert!(is_path_descendant("/install", "/install/index.html"));
/// assert!(!is_path_descendant("/install", "/installer"));
/// assert!(is_path_descendant("", "/anything"));
/// ```
pub fn is_path_descendant(root_path: &str, candidate: &str) -> bool {
    if root_path.is_empty() {
        return true;
    }

    if !candidate.starts_with(root_path) {
        return false;
    }

    root_path.ends_with('/')
        || candidate.len() == root_path.len()
        || candidate.as_bytes()[root_path.len()] == b'/'
}
