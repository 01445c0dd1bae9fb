//! Cluster extension: growing seeds into contiguous matched regions.

use std::collections::BTreeSet;

use log::trace;

use crate::config::MatcherConfig;
use crate::model::cluster::Cluster;
use crate::model::document::Document;
use crate::model::seed::Seed;

#[derive(Debug, Clone, Copy)]
enum Side {
    Susp,
    Src,
}

impl Side {
    fn idx(self, seed: &Seed) -> usize {
        match self {
            Side::Susp => seed.susp,
            Side::Src => seed.src,
        }
    }

    fn sentence_start(self, seed: &Seed, susp: &Document, src: &Document) -> usize {
        match self {
            Side::Susp => susp.sentences()[seed.susp].start,
            Side::Src => src.sentences()[seed.src].start,
        }
    }
}

/// Group seeds into clusters by sentence adjacency in both documents.
///
/// Seeds are first joined into runs by suspicious-side adjacency within
/// `gap`, then each run is re-joined by source-side adjacency (which may
/// split it). Each resulting cluster is validated against
/// `min_cluster_cos_sim`: a cluster that falls short is re-extended
/// recursively with `gap - 1` (letting it split into tighter sub-clusters)
/// until the minimum gap is reached, at which point it is dropped.
///
/// Pure in its inputs: the same seed set yields the same clusters in any
/// presentation order, and a cluster that already validates is returned
/// unchanged.
pub fn extend<'a>(
    susp: &'a Document,
    src: &'a Document,
    seeds: &[Seed],
    gap: usize,
    config: &MatcherConfig,
) -> Vec<Cluster<'a>> {
    let mut clusters = Vec::new();
    for run in join(susp, src, seeds, gap, Side::Susp) {
        for group in join(susp, src, &run, gap, Side::Src) {
            let cluster = Cluster::from_seeds(susp, src, group.into_iter().collect::<BTreeSet<_>>());
            validate(susp, src, cluster, gap, config, &mut clusters);
        }
    }
    clusters
}

/// Greedy single-side partition of seeds into adjacency runs.
///
/// Seeds are consumed sorted by the side's sentence start offset; a seed
/// extends the current run iff it is adjacent (within `gap`) to the *last
/// seed added to the run*, never to the run head. Order of consumption
/// affects run boundaries, so the sort is part of the contract.
fn join(
    susp: &Document,
    src: &Document,
    seeds: &[Seed],
    gap: usize,
    side: Side,
) -> Vec<Vec<Seed>> {
    let mut sorted: Vec<Seed> = seeds.to_vec();
    sorted.sort_by_key(|seed| {
        (
            side.sentence_start(seed, susp, src),
            seed.susp,
            seed.src,
        )
    });

    let mut runs: Vec<Vec<Seed>> = Vec::new();
    let mut current: Vec<Seed> = Vec::new();
    for seed in sorted {
        match current.last() {
            Some(tail) if side.idx(&seed) - side.idx(tail) > gap + 1 => {
                runs.push(std::mem::take(&mut current));
                current.push(seed);
            }
            _ => current.push(seed),
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

fn validate<'a>(
    susp: &'a Document,
    src: &'a Document,
    cluster: Cluster<'a>,
    gap: usize,
    config: &MatcherConfig,
    out: &mut Vec<Cluster<'a>>,
) {
    if cluster.similarity() > config.min_cluster_cos_sim {
        out.push(cluster);
    } else if gap > config.min_adjacent_sents_gap {
        trace!(
            "cluster {:?}/{:?} below similarity threshold ({:.3}), re-extending at gap {}",
            cluster.susp_range(),
            cluster.src_range(),
            cluster.similarity(),
            gap - 1
        );
        let seeds: Vec<Seed> = cluster.seeds().iter().copied().collect();
        out.extend(extend(susp, src, &seeds, gap - 1, config));
    } else {
        trace!(
            "dropping cluster {:?}/{:?} at minimum gap (similarity {:.3})",
            cluster.susp_range(),
            cluster.src_range(),
            cluster.similarity()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeding::find_seeds;
    use crate::testutil::document;

    fn config() -> MatcherConfig {
        MatcherConfig::default()
    }

    /// A suspicious document whose sentences 0, 3, 6 and 9 repeat the same
    /// source sentence, with unrelated filler in between.
    fn chained_pair() -> (Document, Document) {
        let susp = document(
            "susp",
            &[
                "the tall ship crossed the narrow strait at dawn.",
                "apples ripen early in warm coastal orchards.",
                "seven bells rang across the empty harbour square.",
                "the tall ship crossed the narrow strait at dawn.",
                "glassblowers shape molten rods over open flame.",
                "migrating cranes rest beside shallow reed ponds.",
                "the tall ship crossed the narrow strait at dawn.",
                "old printing presses clatter in the basement archive.",
                "mountain trails close after the first heavy snowfall.",
                "the tall ship crossed the narrow strait at dawn.",
            ],
        );
        let src = document(
            "src",
            &[
                "the tall ship crossed the narrow strait at dawn.",
                "unrelated source material fills this line.",
                "more padding text keeps the vocabulary apart.",
            ],
        );
        (susp, src)
    }

    #[test]
    fn test_adjacent_seeds_form_one_cluster() {
        let susp = document(
            "susp",
            &[
                "the quick brown fox jumps over the lazy dog.",
                "pack my box with five dozen liquor jugs.",
                "filler sentence with distinct vocabulary here.",
            ],
        );
        let src = document(
            "src",
            &[
                "the quick brown fox jumps over the lazy dog.",
                "pack my box with five dozen liquor jugs.",
                "another unrelated closing line entirely.",
            ],
        );
        let seeds = find_seeds(&susp, &src, &config());
        assert_eq!(seeds.len(), 2);
        let clusters = extend(&susp, &src, &seeds, 4, &config());
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].susp_range(), (0, 1));
        assert_eq!(clusters[0].src_range(), (0, 1));
        assert_eq!(clusters[0].seeds().len(), 2);
    }

    #[test]
    fn test_join_chains_on_run_tail_not_head() {
        // Seeds sit at susp sentences 0, 3, 6, 9. Consecutive seeds are
        // within gap 2 of each other, so tail-chaining joins all four even
        // though sentence 9 is nowhere near sentence 0.
        let (susp, src) = chained_pair();
        let seeds = find_seeds(&susp, &src, &config());
        assert_eq!(seeds.len(), 4);
        let clusters = extend(&susp, &src, &seeds, 2, &config());
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].susp_range(), (0, 9));
    }

    #[test]
    fn test_join_splits_beyond_gap() {
        // At gap 1 the two-sentence spacing breaks every link.
        let (susp, src) = chained_pair();
        let seeds = find_seeds(&susp, &src, &config());
        let clusters = extend(&susp, &src, &seeds, 1, &config());
        assert_eq!(clusters.len(), 4);
        for cluster in &clusters {
            assert_eq!(cluster.seeds().len(), 1);
        }
    }

    #[test]
    fn test_second_pass_splits_on_src_side() {
        // Both seeds are adjacent in the suspicious document but far apart
        // in the source document, so the src-side pass must split them.
        let susp = document(
            "susp",
            &[
                "the quick brown fox jumps over the lazy dog.",
                "pack my box with five dozen liquor jugs.",
            ],
        );
        let src = document(
            "src",
            &[
                "the quick brown fox jumps over the lazy dog.",
                "padding one keeps sentences apart nicely.",
                "padding two keeps sentences apart nicely more.",
                "padding three keeps sentences apart nicely again.",
                "padding four keeps sentences apart nicely still.",
                "padding five keeps sentences apart nicely yet.",
                "padding six keeps sentences apart nicely once.",
                "pack my box with five dozen liquor jugs.",
            ],
        );
        let seeds = find_seeds(&susp, &src, &config());
        assert_eq!(seeds.len(), 2);
        let clusters = extend(&susp, &src, &seeds, 4, &config());
        assert_eq!(clusters.len(), 2);
        for cluster in &clusters {
            assert_eq!(cluster.seeds().len(), 1);
        }
    }

    #[test]
    fn test_extension_is_order_independent() {
        let (susp, src) = chained_pair();
        let mut seeds = find_seeds(&susp, &src, &config());
        let forward = extend(&susp, &src, &seeds, 2, &config());
        seeds.reverse();
        let backward = extend(&susp, &src, &seeds, 2, &config());
        assert_eq!(forward.len(), backward.len());
        for cluster in &forward {
            assert!(backward.contains(cluster));
        }
    }

    #[test]
    fn test_validation_keeps_valid_cluster_unchanged() {
        let susp = document(
            "susp",
            &[
                "the quick brown fox jumps over the lazy dog.",
                "pack my box with five dozen liquor jugs.",
                "filler sentence with distinct vocabulary here.",
            ],
        );
        let src = document(
            "src",
            &[
                "the quick brown fox jumps over the lazy dog.",
                "pack my box with five dozen liquor jugs.",
                "another unrelated closing line entirely.",
            ],
        );
        let seeds = find_seeds(&susp, &src, &config());
        let once = extend(&susp, &src, &seeds, 4, &config());
        assert_eq!(once.len(), 1);
        assert!(once[0].similarity() > config().min_cluster_cos_sim);
        // re-extending the cluster's own seeds reproduces it exactly
        let seeds_again: Vec<Seed> = once[0].seeds().iter().copied().collect();
        let again = extend(&susp, &src, &seeds_again, 4, &config());
        assert_eq!(once, again);
    }

    #[test]
    fn test_low_similarity_cluster_recurses_and_splits() {
        // Two matching sentences bracket three long, heavyweight junk
        // sentences. At gap 4 they join into one cluster whose aggregate
        // similarity is dragged below the threshold; the recursive
        // re-extension at shrinking gaps ends with two singleton clusters.
        let susp = document(
            "susp",
            &[
                "winter storms flood the old stone pier.",
                "quarry dust settles across abandoned rail sidings while distant furnaces glow \
                 amber behind rusted water towers and broken loading cranes sway slowly past \
                 silent gravel yards.",
                "copper kettles whistle beside enamel stoves as grandmothers fold linen sheets \
                 under flickering kerosene lamps near sagging pantry shelves stacked deep \
                 behind peeling cellar doors.",
                "violet fireworks scatter embers over carnival tents where accordion players \
                 wander between sugared almond stalls and painted carousel horses spin amid \
                 flooded ticket booths.",
                "autumn fog settles over the quiet valley town.",
            ],
        );
        let src = document(
            "src",
            &[
                "winter storms flood the old stone pier.",
                "a first stretch of unrelated source prose sits here.",
                "a second stretch of different source prose follows.",
                "a third stretch of further source prose continues.",
                "autumn fog settles over the quiet valley town.",
            ],
        );
        let seeds = find_seeds(&susp, &src, &config());
        assert_eq!(seeds.len(), 2);
        let joined = Cluster::from_seeds(&susp, &src, seeds.iter().copied().collect());
        assert!(joined.similarity() <= config().min_cluster_cos_sim);

        let clusters = extend(&susp, &src, &seeds, 4, &config());
        assert_eq!(clusters.len(), 2);
        for cluster in &clusters {
            assert_eq!(cluster.seeds().len(), 1);
            assert!(cluster.similarity() > config().min_cluster_cos_sim);
        }
    }
}
