//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: the externally observable state machine of a run
//! - `CrawlState`: the mutable state owned by the crawl loop

mod crawl_phase;
mod crawl_state;

// Re-export main types
pub use crawl_phase::{CompletionReason, CrawlPhase};
pub use crawl_state::CrawlState;
