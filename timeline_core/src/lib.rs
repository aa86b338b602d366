//! # Timeline Core
//!
//! Builds a per-section timeline of character interaction matrices from a
//! book's text, ready for visualization.
//!
//! ## Core Components
//!
//! - **partition**: Splits raw text into ordered, cleaned sections
//! - **analysis**: The section analyzer seam and a roster-based analyzer
//! - **timeline**: The timeline aggregate and its whole-timeline transforms
//!   (threshold, prune, normalize, reconcile, sort)
//! - **pipeline**: Runs the stages in order for one book
//! - **export**: The JSON artifact written at the end of a run
//!
//! ## Design Philosophy
//!
//! - **One Aggregate**: Matrices, character lists and metadata change together or not at all
//! - **Fail Fast**: Any stage error aborts the run and nothing is written
//! - **Deterministic**: The same book and configuration always produce the same file

pub mod analysis;
pub mod error;
pub mod export;
pub mod partition;
pub mod pipeline;
pub mod timeline;

pub use analysis::*;
pub use error::TimelineError;
pub use export::*;
pub use partition::*;
pub use pipeline::*;
pub use timeline::*;
