//! Clusters: maximal runs of adjacent seeds forming candidate regions.

use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use crate::model::document::{Document, Fragment, Sentence, TermVector};
use crate::model::seed::Seed;
use crate::similarity;

/// An immutable set of seeds spanning one contiguous sentence range in each
/// of the two documents.
///
/// All remaining fields are derived eagerly at construction: the inclusive
/// sentence ranges (`[min seed idx, max seed idx]` per side, re-read from
/// the live document ordering), the summed tf-isf vector of each side's
/// non-common range sentences, and the overall cosine similarity between
/// the two side vectors. Equality and hashing are determined by the seed
/// set alone. Clusters are replaced, never mutated.
#[derive(Debug, Clone)]
pub struct Cluster<'a> {
    susp_doc: &'a Document,
    src_doc: &'a Document,
    seeds: BTreeSet<Seed>,
    susp_range: (usize, usize),
    src_range: (usize, usize),
    susp_vector: TermVector,
    src_vector: TermVector,
    cos: f64,
}

impl<'a> Cluster<'a> {
    /// Build a cluster from a non-empty seed set.
    pub fn from_seeds(
        susp_doc: &'a Document,
        src_doc: &'a Document,
        seeds: BTreeSet<Seed>,
    ) -> Self {
        debug_assert!(!seeds.is_empty(), "a cluster requires at least one seed");

        let susp_lo = seeds.iter().map(|s| s.susp).min().unwrap_or(0);
        let susp_hi = seeds.iter().map(|s| s.susp).max().unwrap_or(0);
        let src_lo = seeds.iter().map(|s| s.src).min().unwrap_or(0);
        let src_hi = seeds.iter().map(|s| s.src).max().unwrap_or(0);

        let susp_vector = sum_vectors(range_sentences(susp_doc, (susp_lo, susp_hi)));
        let src_vector = sum_vectors(range_sentences(src_doc, (src_lo, src_hi)));
        let cos = similarity::cosine(&susp_vector, &src_vector);

        Self {
            susp_doc,
            src_doc,
            seeds,
            susp_range: (susp_lo, susp_hi),
            src_range: (src_lo, src_hi),
            susp_vector,
            src_vector,
            cos,
        }
    }

    pub fn susp_doc(&self) -> &'a Document {
        self.susp_doc
    }

    pub fn src_doc(&self) -> &'a Document {
        self.src_doc
    }

    pub fn seeds(&self) -> &BTreeSet<Seed> {
        &self.seeds
    }

    /// Inclusive sentence index range covered in the suspicious document.
    pub fn susp_range(&self) -> (usize, usize) {
        self.susp_range
    }

    /// Inclusive sentence index range covered in the source document.
    pub fn src_range(&self) -> (usize, usize) {
        self.src_range
    }

    /// Summed tf-isf vector of the suspicious side's range sentences.
    pub fn susp_vector(&self) -> &TermVector {
        &self.susp_vector
    }

    /// Summed tf-isf vector of the source side's range sentences.
    pub fn src_vector(&self) -> &TermVector {
        &self.src_vector
    }

    /// Overall cosine similarity between the two side vectors.
    pub fn similarity(&self) -> f64 {
        self.cos
    }

    /// Non-common sentences of the suspicious side's range, in order.
    pub fn susp_sentences(&self) -> impl Iterator<Item = &'a Sentence> {
        range_sentences(self.susp_doc, self.susp_range)
    }

    /// Non-common sentences of the source side's range, in order.
    pub fn src_sentences(&self) -> impl Iterator<Item = &'a Sentence> {
        range_sentences(self.src_doc, self.src_range)
    }

    /// Character length of the suspicious side, common sentences excluded.
    pub fn susp_char_len(&self) -> usize {
        self.susp_sentences().map(|s| s.len()).sum()
    }

    /// Character length of the source side, common sentences excluded.
    pub fn src_char_len(&self) -> usize {
        self.src_sentences().map(|s| s.len()).sum()
    }

    /// The full suspicious-side span as a fragment.
    pub fn susp_fragment(&self) -> Fragment<'a> {
        range_fragment(self.susp_doc, self.susp_range)
    }

    /// The full source-side span as a fragment.
    pub fn src_fragment(&self) -> Fragment<'a> {
        range_fragment(self.src_doc, self.src_range)
    }

    /// Two distinct clusters overlap iff they share at least one sentence
    /// in the suspicious range AND at least one in the source range. The
    /// same fragment may legitimately appear in several clusters against
    /// different counterparts, so one-sided overlap does not count.
    pub fn overlaps_with(&self, other: &Cluster<'a>) -> bool {
        ranges_intersect(self.susp_range, other.susp_range)
            && ranges_intersect(self.src_range, other.src_range)
    }
}

impl PartialEq for Cluster<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.seeds == other.seeds
    }
}

impl Eq for Cluster<'_> {}

impl Hash for Cluster<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.seeds.hash(state);
    }
}

fn ranges_intersect(a: (usize, usize), b: (usize, usize)) -> bool {
    a.0 <= b.1 && b.0 <= a.1
}

fn range_sentences(doc: &Document, range: (usize, usize)) -> impl Iterator<Item = &Sentence> {
    doc.sentences()[range.0..=range.1]
        .iter()
        .filter(|s| !s.common)
}

fn range_fragment<'a>(doc: &'a Document, range: (usize, usize)) -> Fragment<'a> {
    let sentences = doc.sentences();
    Fragment::new(doc, sentences[range.0].start, sentences[range.1].end)
}

fn sum_vectors<'s>(sentences: impl Iterator<Item = &'s Sentence>) -> TermVector {
    let mut sum = TermVector::default();
    for sentence in sentences {
        for (term, weight) in sentence.tf_isf() {
            *sum.entry(term.clone()).or_insert(0.0) += weight;
        }
    }
    sum
}

/// A cluster with the quality and size it was rated at during overlap
/// resolution. Transient: ratings are only comparable within one
/// resolution round.
#[derive(Debug, Clone, Copy)]
pub struct RatedCluster<'c, 'a> {
    cluster: &'c Cluster<'a>,
    quality: f64,
    size: usize,
}

impl<'c, 'a> RatedCluster<'c, 'a> {
    pub fn new(cluster: &'c Cluster<'a>, quality: f64, size: usize) -> Self {
        Self {
            cluster,
            quality,
            size,
        }
    }

    pub fn cluster(&self) -> &'c Cluster<'a> {
        self.cluster
    }

    pub fn quality(&self) -> f64 {
        self.quality
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Total order over ratings: higher quality wins, but when both
    /// qualities are at least 0.99 (near-duplicate regime) or exactly
    /// equal, the larger cluster wins. The 0.99 threshold is intentional
    /// and load-bearing.
    pub fn beats(&self, other: &RatedCluster<'_, 'a>) -> bool {
        if (self.quality >= 0.99 && other.quality >= 0.99) || self.quality == other.quality {
            self.size > other.size
        } else {
            self.quality > other.quality
        }
    }
}
