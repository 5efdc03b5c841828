//! Asset localization module
//!
//! Downloads the images referenced by an article fragment into
//! `{output_dir}/{assets_dir_name}/{post_slug}/` and rewrites each `src`
//! attribute to the matching relative path, so rendered posts work offline.

mod localizer;
mod naming;

pub use localizer::{localize_images, LocalizeReport};
pub use naming::{base_filename, image_extension, unique_filename, DEFAULT_IMAGE_EXTENSION};
