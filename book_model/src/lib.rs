//! # Book Model
//!
//! The data model shared by every stage of the interaction timeline pipeline.
//! This crate holds plain data and the bookkeeping rules that keep it
//! consistent; it does not read books or build matrices.
//!
//! ## Core Components
//!
//! - **characters**: Character roster and the alias -> canonical name lookup
//! - **metadata**: First-interaction records and their prune/rename/merge rules
//! - **config**: Run configuration and its validation
//! - **run**: Per-run identifiers

pub mod characters;
pub mod config;
pub mod error;
pub mod metadata;
pub mod run;

pub use characters::*;
pub use config::*;
pub use error::*;
pub use metadata::*;
pub use run::*;
