//! # Doppel
//!
//! A text-reuse and plagiarism detection library for Rust.
//!
//! ## Features
//!
//! - Pure Rust implementation
//! - Sentence-level seeding over tf-isf vectors (cosine + Dice)
//! - Recursive cluster extension with shrinking adjacency gaps
//! - Overlap resolution on a cluster graph with a quality/size rating
//! - Verbatim sub-match carving via dynamic programming
//! - Parallel matching across document pairs
//!
//! Doppel consumes documents that an external preprocessing step has
//! already split into sentences with bags-of-words; it performs no I/O,
//! no tokenization and no report formatting.
// Core modules
pub mod config;
mod error;
pub mod extension;
pub mod filtering;
pub mod matcher;
pub mod model;
pub mod seeding;
pub mod similarity;
pub mod verbatim;

#[cfg(test)]
pub(crate) mod testutil;

// Re-exports for the public API
pub use config::{MatcherConfig, MatcherConfigBuilder};
pub use error::{DoppelError, Result};
pub use matcher::DocumentMatcher;
pub use model::cluster::{Cluster, RatedCluster};
pub use model::document::{BagOfWords, Document, Fragment, Sentence, TermVector, Word};
pub use model::matches::{DocumentPairMatches, Match, MatchType};
pub use model::seed::Seed;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
