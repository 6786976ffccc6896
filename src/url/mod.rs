//! URL handling module for Sitewalk
//!
//! This module splits URLs and link references into domain, directory path
//! and page, and decides whether a path lies below the crawl root.

mod decompose;
mod matcher;

// Re-export main functions
pub use decompose::{decompose, make_page_path, DeconstructedUrl};
pub use matcher::is_path_descendant;
