//! Matcher configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the detection pipeline.
///
/// All thresholds are tunable; the defaults are the values the pipeline was
/// calibrated with and work well for sentence-level plagiarism detection on
/// natural-language prose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Minimum cosine similarity (over tf-isf vectors) for a sentence pair
    /// to become a seed. Strict: a seed requires `cosine > min_cos_sim`.
    #[serde(default = "default_min_cos_sim")]
    pub min_cos_sim: f64,

    /// Minimum Dice coefficient (over bag-of-words key sets) for a sentence
    /// pair to become a seed. Strict: a seed requires `dice > min_dice_sim`.
    #[serde(default = "default_min_dice_sim")]
    pub min_dice_sim: f64,

    /// Minimum overall cosine similarity a cluster must exceed to survive
    /// validation during extension.
    #[serde(default = "default_min_cluster_cos_sim")]
    pub min_cluster_cos_sim: f64,

    /// Maximum number of sentences allowed between two seeds that still end
    /// up in the same cluster.
    #[serde(default = "default_adjacent_sents_gap")]
    pub adjacent_sents_gap: usize,

    /// Adjacency gap for the summary-specific extension pass. Larger than
    /// [`adjacent_sents_gap`](Self::adjacent_sents_gap) so that condensed
    /// rewrites of long passages still cluster together.
    #[serde(default = "default_adjacent_sents_gap_summary")]
    pub adjacent_sents_gap_summary: usize,

    /// Smallest gap the recursive re-clustering may shrink to. A cluster
    /// that fails validation at this gap is dropped.
    #[serde(default = "default_min_adjacent_sents_gap")]
    pub min_adjacent_sents_gap: usize,

    /// Minimum character length (per document side, common sentences
    /// excluded) a cluster must reach to survive filtering.
    #[serde(default = "default_min_cluster_char_len")]
    pub min_cluster_char_len: usize,

    /// Minimum character length of a verbatim word run before it is emitted
    /// as a candidate match.
    #[serde(default = "default_min_verbatim_match_char_len")]
    pub min_verbatim_match_char_len: usize,

    /// Ratio between the two sides' total matched character lengths above
    /// which a pair's summary clusters are reported as SUMMARY matches.
    #[serde(default = "default_summary_len_ratio")]
    pub summary_len_ratio: f64,
}

fn default_min_cos_sim() -> f64 {
    0.30
}

fn default_min_dice_sim() -> f64 {
    0.33
}

fn default_min_cluster_cos_sim() -> f64 {
    0.34
}

fn default_adjacent_sents_gap() -> usize {
    4
}

fn default_adjacent_sents_gap_summary() -> usize {
    24
}

fn default_min_adjacent_sents_gap() -> usize {
    0
}

fn default_min_cluster_char_len() -> usize {
    150
}

fn default_min_verbatim_match_char_len() -> usize {
    256
}

fn default_summary_len_ratio() -> f64 {
    3.0
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            min_cos_sim: default_min_cos_sim(),
            min_dice_sim: default_min_dice_sim(),
            min_cluster_cos_sim: default_min_cluster_cos_sim(),
            adjacent_sents_gap: default_adjacent_sents_gap(),
            adjacent_sents_gap_summary: default_adjacent_sents_gap_summary(),
            min_adjacent_sents_gap: default_min_adjacent_sents_gap(),
            min_cluster_char_len: default_min_cluster_char_len(),
            min_verbatim_match_char_len: default_min_verbatim_match_char_len(),
            summary_len_ratio: default_summary_len_ratio(),
        }
    }
}

impl MatcherConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> MatcherConfigBuilder {
        MatcherConfigBuilder::default()
    }
}

/// Builder for [`MatcherConfig`].
#[derive(Debug, Default)]
pub struct MatcherConfigBuilder {
    config: MatcherConfig,
}

impl MatcherConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_cos_sim(mut self, value: f64) -> Self {
        self.config.min_cos_sim = value;
        self
    }

    pub fn min_dice_sim(mut self, value: f64) -> Self {
        self.config.min_dice_sim = value;
        self
    }

    pub fn min_cluster_cos_sim(mut self, value: f64) -> Self {
        self.config.min_cluster_cos_sim = value;
        self
    }

    pub fn adjacent_sents_gap(mut self, value: usize) -> Self {
        self.config.adjacent_sents_gap = value;
        self
    }

    pub fn adjacent_sents_gap_summary(mut self, value: usize) -> Self {
        self.config.adjacent_sents_gap_summary = value;
        self
    }

    pub fn min_adjacent_sents_gap(mut self, value: usize) -> Self {
        self.config.min_adjacent_sents_gap = value;
        self
    }

    pub fn min_cluster_char_len(mut self, value: usize) -> Self {
        self.config.min_cluster_char_len = value;
        self
    }

    pub fn min_verbatim_match_char_len(mut self, value: usize) -> Self {
        self.config.min_verbatim_match_char_len = value;
        self
    }

    pub fn summary_len_ratio(mut self, value: f64) -> Self {
        self.config.summary_len_ratio = value;
        self
    }

    pub fn build(self) -> MatcherConfig {
        self.config
    }
}
