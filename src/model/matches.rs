//! Matches and their per-pair aggregation.

use std::hash::{Hash, Hasher};

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{DoppelError, Result};
use crate::model::document::{Document, Fragment};

/// Classification of a detected match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// An exact (case-insensitive) word-run match.
    Verbatim,
    /// A whole-cluster match covering paraphrased or reworded copying.
    Intelligent,
    /// A cluster classified as summarization by the asymmetric
    /// matched-length ratio between the two documents.
    Summary,
}

impl MatchType {
    pub const ALL: [MatchType; 3] = [
        MatchType::Verbatim,
        MatchType::Intelligent,
        MatchType::Summary,
    ];
}

/// An unordered pair of fragments from two distinct documents, tagged with
/// the kind of reuse it represents.
///
/// Value equality and hashing consider the fragment pair only, independent
/// of construction order; the fragments are normalized at construction.
#[derive(Debug, Clone, Copy)]
pub struct Match<'a> {
    kind: MatchType,
    a: Fragment<'a>,
    b: Fragment<'a>,
}

impl<'a> Match<'a> {
    /// Pair two fragments. Fails with [`DoppelError::SameDocument`] when
    /// both fragments belong to the same document; that indicates an
    /// upstream seeding or clustering bug and must fail fast.
    pub fn new(kind: MatchType, first: Fragment<'a>, second: Fragment<'a>) -> Result<Self> {
        if first.document() == second.document() {
            return Err(DoppelError::SameDocument(
                first.document().name().to_string(),
            ));
        }
        let (a, b) = if fragment_key(&second) < fragment_key(&first) {
            (second, first)
        } else {
            (first, second)
        };
        Ok(Self { kind, a, b })
    }

    pub fn kind(&self) -> MatchType {
        self.kind
    }

    /// The two fragments, in normalized order.
    pub fn fragments(&self) -> (&Fragment<'a>, &Fragment<'a>) {
        (&self.a, &self.b)
    }

    /// The fragment of this match that lies in `doc`, if any.
    pub fn fragment_in(&self, doc: &Document) -> Option<&Fragment<'a>> {
        if self.a.document() == doc {
            Some(&self.a)
        } else if self.b.document() == doc {
            Some(&self.b)
        } else {
            None
        }
    }
}

fn fragment_key<'f, 'a>(fragment: &'f Fragment<'a>) -> (&'f str, usize, usize) {
    (
        fragment.document().name(),
        fragment.start(),
        fragment.end(),
    )
}

impl PartialEq for Match<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.a == other.a && self.b == other.b
    }
}

impl Eq for Match<'_> {}

impl Hash for Match<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.a.hash(state);
        self.b.hash(state);
    }
}

/// All matches detected for one unordered document pair, grouped by type.
/// Duplicate matches (by value equality) are suppressed.
#[derive(Debug, Clone)]
pub struct DocumentPairMatches<'a> {
    doc1: &'a Document,
    doc2: &'a Document,
    matches: AHashMap<MatchType, Vec<Match<'a>>>,
}

impl<'a> DocumentPairMatches<'a> {
    pub fn new(doc1: &'a Document, doc2: &'a Document) -> Self {
        Self {
            doc1,
            doc2,
            matches: AHashMap::new(),
        }
    }

    /// The fixed document pair, in construction order.
    pub fn documents(&self) -> (&'a Document, &'a Document) {
        (self.doc1, self.doc2)
    }

    /// Add a match. Fails with [`DoppelError::DifferentDocumentPair`] when
    /// the match references a document outside this pair; duplicate
    /// matches are dropped silently.
    pub fn add(&mut self, m: Match<'a>) -> Result<()> {
        let (a, b) = m.fragments();
        let pair_holds = (a.document() == self.doc1 && b.document() == self.doc2)
            || (a.document() == self.doc2 && b.document() == self.doc1);
        if !pair_holds {
            return Err(DoppelError::DifferentDocumentPair {
                pair_doc1: self.doc1.name().to_string(),
                pair_doc2: self.doc2.name().to_string(),
                match_doc1: a.document().name().to_string(),
                match_doc2: b.document().name().to_string(),
            });
        }
        let bucket = self.matches.entry(m.kind()).or_default();
        if !bucket.contains(&m) {
            bucket.push(m);
        }
        Ok(())
    }

    /// Matches of one type, in insertion order.
    pub fn matches(&self, kind: MatchType) -> &[Match<'a>] {
        self.matches.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All matches across types.
    pub fn iter(&self) -> impl Iterator<Item = &Match<'a>> {
        MatchType::ALL
            .iter()
            .flat_map(|kind| self.matches(*kind).iter())
    }

    pub fn len(&self) -> usize {
        self.matches.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
