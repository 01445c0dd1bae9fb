//! Core data model: documents and their parts, seeds, clusters and matches.
//!
//! Documents are populated by an external preprocessing collaborator and
//! sealed with [`Document::finalize`](document::Document::finalize); the
//! detection pipeline treats them as read-only from then on. Seeds,
//! clusters and matches are immutable values derived per document pair.

pub mod cluster;
pub mod document;
pub mod matches;
pub mod seed;

pub use cluster::{Cluster, RatedCluster};
pub use document::{BagOfWords, Document, Fragment, Sentence, TermVector, Word};
pub use matches::{DocumentPairMatches, Match, MatchType};
pub use seed::Seed;
