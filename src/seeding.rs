//! Seed generation: pairwise sentence similarity across two documents.

use log::debug;

use crate::config::MatcherConfig;
use crate::model::document::Document;
use crate::model::seed::Seed;
use crate::similarity;

/// Compare every non-common sentence of `susp` against every non-common
/// sentence of `src` and emit a seed for each pair whose cosine similarity
/// (tf-isf vectors) and Dice coefficient (bag-of-words key sets) both
/// strictly exceed their thresholds.
///
/// The result has set semantics: one seed per sentence pair, no ordering
/// guarantee. O(n·m) in the sentence counts; this is the dominant cost for
/// very large documents.
pub fn find_seeds(susp: &Document, src: &Document, config: &MatcherConfig) -> Vec<Seed> {
    let mut seeds = Vec::new();

    for susp_sent in susp.sentences().iter().filter(|s| !s.common) {
        for src_sent in src.sentences().iter().filter(|s| !s.common) {
            let cos = similarity::cosine(susp_sent.tf_isf(), src_sent.tf_isf());
            if cos <= config.min_cos_sim {
                continue;
            }
            let dice = similarity::dice(susp_sent.bow(), src_sent.bow());
            if dice <= config.min_dice_sim {
                continue;
            }
            seeds.push(Seed::new(susp_sent.idx(), src_sent.idx(), cos, dice));
        }
    }

    debug!(
        "seeding '{}' x '{}': {} seeds from {}x{} sentences",
        susp.name(),
        src.name(),
        seeds.len(),
        susp.sentences().len(),
        src.sentences().len()
    );
    seeds
}
