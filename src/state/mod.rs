//! State module for tracking archive progress
//!
//! # Components
//!
//! - `PostOutcome`: What happened to one discovered post (downloaded, skipped, failed)
//! - `SourceStage`: Where a single source is in its Init → Discover → Process → Summarize cycle

mod post_state;
mod source_state;

// Re-export main types
pub use post_state::PostOutcome;
pub use source_state::SourceStage;
