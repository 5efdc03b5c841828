//! Storage module for the incremental download log
//!
//! Each source keeps a `.download_log.json` file in its output directory
//! listing the post URLs that were rendered in every requested format. The
//! orchestrator consults it before fetching and rewrites it after each
//! successful post.

mod download_log;

pub use download_log::{DownloadLog, DOWNLOAD_LOG_FILE};
