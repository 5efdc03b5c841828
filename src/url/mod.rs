//! URL handling module for substack-dl
//!
//! This module provides source-root and post-URL normalization, same-site
//! checks, archive page addressing, and slug generation for filenames.

mod normalize;
mod slug;

// Re-export main functions
pub use normalize::{
    archive_page_url, is_same_site, normalize_post_url, normalize_source_root, url_slug,
};
pub use slug::slugify;

/// Path marker every post URL carries
pub const POST_PATH_MARKER: &str = "/p/";
