//! The document matcher: per-pair pipeline and cross-pair orchestration.

use log::{debug, error};
use rayon::prelude::*;

use crate::config::MatcherConfig;
use crate::error::Result;
use crate::extension;
use crate::filtering;
use crate::model::cluster::Cluster;
use crate::model::document::Document;
use crate::model::matches::{DocumentPairMatches, Match, MatchType};
use crate::seeding;
use crate::verbatim;

/// Detects plagiarized passages between pairs of preprocessed documents.
///
/// The matcher is a thin facade over [`MatcherConfig`]: it owns no state
/// beyond the thresholds, so one instance can serve any number of pairs,
/// concurrently.
#[derive(Debug, Clone, Default)]
pub struct DocumentMatcher {
    config: MatcherConfig,
}

impl DocumentMatcher {
    /// Create a matcher with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MatcherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Run the full detection pipeline for one document pair.
    ///
    /// Seeds are clustered twice over: once at the default adjacency gap
    /// for intelligent matches (each surviving cluster becomes one
    /// INTELLIGENT match and is mined for VERBATIM sub-matches; the two
    /// kinds coexist), and once at the summary gap. Summary clusters are
    /// reported as SUMMARY matches only when one side's total matched
    /// character length reaches `summary_len_ratio` times the other's.
    ///
    /// The returned collection may be empty; errors indicate invariant
    /// violations, not expected data conditions.
    pub fn find_matches<'a>(
        &self,
        susp: &'a Document,
        src: &'a Document,
    ) -> Result<DocumentPairMatches<'a>> {
        let mut pair = DocumentPairMatches::new(susp, src);
        let seeds = seeding::find_seeds(susp, src, &self.config);

        let clusters = filtering::filter_clusters(
            extension::extend(susp, src, &seeds, self.config.adjacent_sents_gap, &self.config),
            &self.config,
        );
        if !clusters.is_empty() {
            for m in verbatim::find_verbatim_matches(&clusters, &self.config)? {
                pair.add(m)?;
            }
            for cluster in &clusters {
                pair.add(Match::new(
                    MatchType::Intelligent,
                    cluster.susp_fragment(),
                    cluster.src_fragment(),
                )?)?;
            }
        }

        let summary_clusters = filtering::filter_clusters(
            extension::extend(
                susp,
                src,
                &seeds,
                self.config.adjacent_sents_gap_summary,
                &self.config,
            ),
            &self.config,
        );
        if self.is_summary(&summary_clusters) {
            for cluster in &summary_clusters {
                pair.add(Match::new(
                    MatchType::Summary,
                    cluster.susp_fragment(),
                    cluster.src_fragment(),
                )?)?;
            }
        }

        debug!(
            "'{}' x '{}': {} verbatim, {} intelligent, {} summary",
            susp.name(),
            src.name(),
            pair.matches(MatchType::Verbatim).len(),
            pair.matches(MatchType::Intelligent).len(),
            pair.matches(MatchType::Summary).len()
        );
        Ok(pair)
    }

    /// One side condensing the other is evidenced by a strongly asymmetric
    /// total matched length.
    fn is_summary(&self, clusters: &[Cluster<'_>]) -> bool {
        if clusters.is_empty() {
            return false;
        }
        let susp_len: usize = clusters.iter().map(Cluster::susp_char_len).sum();
        let src_len: usize = clusters.iter().map(Cluster::src_char_len).sum();
        susp_len as f64 >= self.config.summary_len_ratio * src_len as f64
            || src_len as f64 >= self.config.summary_len_ratio * susp_len as f64
    }

    /// Run the pipeline over many pairs in parallel.
    ///
    /// Pairs are independent pure computations over read-only documents, so
    /// they parallelize without locks; per-worker results are merged at the
    /// end. Pairs with no matches are dropped. A pair that fails is logged
    /// and skipped without affecting its siblings.
    pub fn find_all_matches<'a>(
        &self,
        pairs: &[(&'a Document, &'a Document)],
    ) -> Vec<DocumentPairMatches<'a>> {
        pairs
            .par_iter()
            .filter_map(|&(susp, src)| match self.find_matches(susp, src) {
                Ok(pair) if pair.is_empty() => None,
                Ok(pair) => Some(pair),
                Err(err) => {
                    error!("matching '{}' x '{}' failed: {}", susp.name(), src.name(), err);
                    None
                }
            })
            .collect()
    }
}
