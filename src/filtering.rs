//! Cluster filtering: overlap-graph resolution and the size filter.

use ahash::AHashMap;
use log::{debug, trace};
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableUnGraph;

use crate::config::MatcherConfig;
use crate::model::cluster::{Cluster, RatedCluster};
use crate::model::document::{Sentence, TermVector};
use crate::similarity;

/// Resolve overlapping clusters and drop undersized ones.
///
/// Two distinct clusters overlap iff they share at least one sentence in
/// the suspicious document AND at least one in the source document. An
/// undirected overlap graph is resolved iteratively: the next cluster to
/// resolve is the first articulation point of the graph, or the node of
/// maximum degree when the graph is biconnected. The chosen cluster is
/// rated against each of its current neighbors; if it wins overall, all
/// its neighbors are removed, otherwise only the chosen cluster is removed
/// and the winning neighbor stays for later re-evaluation. This exact
/// order, including the partial evaluation it implies, is deliberate.
///
/// Survivors shorter than `min_cluster_char_len` characters (common
/// sentences excluded) in either document are discarded.
pub fn filter_clusters<'a>(
    clusters: Vec<Cluster<'a>>,
    config: &MatcherConfig,
) -> Vec<Cluster<'a>> {
    let mut clusters = clusters;
    clusters.sort_by(|a, b| a.seeds().cmp(b.seeds()));

    let mut graph: StableUnGraph<usize, ()> =
        StableUnGraph::with_capacity(clusters.len(), clusters.len());
    let nodes: Vec<NodeIndex> = (0..clusters.len()).map(|i| graph.add_node(i)).collect();
    for (i, a) in clusters.iter().enumerate() {
        for (j, b) in clusters.iter().enumerate().skip(i + 1) {
            if a.overlaps_with(b) {
                graph.add_edge(nodes[i], nodes[j], ());
            }
        }
    }

    let overlap_count = graph.edge_count();
    while graph.edge_count() > 0 {
        let node = match articulation_point(&graph) {
            Some(node) => node,
            None => max_degree_node(&graph),
        };
        let neighbors: Vec<NodeIndex> = graph.neighbors(node).collect();
        let chosen = &clusters[graph[node]];

        let mut best: Option<RatedCluster<'_, 'a>> = None;
        for &neighbor in &neighbors {
            let rated = best_with_respect_to(chosen, &clusters[graph[neighbor]]);
            if best.as_ref().is_none_or(|current| rated.beats(current)) {
                best = Some(rated);
            }
        }

        let chosen_wins = best
            .map(|rated| std::ptr::eq(rated.cluster(), chosen))
            .unwrap_or(true);
        if chosen_wins {
            trace!(
                "cluster {:?}/{:?} wins over {} neighbors",
                chosen.susp_range(),
                chosen.src_range(),
                neighbors.len()
            );
            for neighbor in neighbors {
                graph.remove_node(neighbor);
            }
        } else {
            trace!(
                "cluster {:?}/{:?} loses to a neighbor, removed",
                chosen.susp_range(),
                chosen.src_range()
            );
            graph.remove_node(node);
        }
    }

    let survivors: Vec<Cluster<'a>> = graph
        .node_indices()
        .map(|node| clusters[graph[node]].clone())
        .filter(|cluster| {
            cluster.susp_char_len() >= config.min_cluster_char_len
                && cluster.src_char_len() >= config.min_cluster_char_len
        })
        .collect();

    debug!(
        "filtering: {} clusters, {} overlaps resolved, {} survivors",
        clusters.len(),
        overlap_count,
        survivors.len()
    );
    survivors
}

/// Pick the better of the two clusters' ratings, each judged in the
/// context of the other's overlap. Ties keep the first argument.
fn best_with_respect_to<'c, 'a>(
    a: &'c Cluster<'a>,
    b: &'c Cluster<'a>,
) -> RatedCluster<'c, 'a> {
    let rated_a = rate(a, b);
    let rated_b = rate(b, a);
    if rated_b.beats(&rated_a) {
        rated_b
    } else {
        rated_a
    }
}

/// Rate `x` against overlapping cluster `y`: evaluate both directional
/// variants (suspicious side as "suspicious", then source side) and keep
/// the higher-quality one.
fn rate<'c, 'a>(x: &'c Cluster<'a>, y: &Cluster<'a>) -> RatedCluster<'c, 'a> {
    let susp_variant = directional_quality(
        x.susp_sentences().collect(),
        y.susp_range(),
        &x.src_sentences().map(Sentence::tf_isf).collect::<Vec<_>>(),
    );
    let src_variant = directional_quality(
        x.src_sentences().collect(),
        y.src_range(),
        &x.susp_sentences().map(Sentence::tf_isf).collect::<Vec<_>>(),
    );
    let (quality, size) = if src_variant.0 > susp_variant.0 {
        src_variant
    } else {
        susp_variant
    };
    RatedCluster::new(x, quality, size)
}

/// Quality of one directional variant. `suspicious` is the evaluated
/// side's sentences, split into the subset overlapping `other_range` (O)
/// and the remainder (N); `counterpart` is the opposite side's sentence
/// vectors. Quality is `sim(O) + (1 - sim(O)) * sim(N)` where `sim` is
/// the mean best cosine of a sentence against the counterpart side.
fn directional_quality(
    suspicious: Vec<&Sentence>,
    other_range: (usize, usize),
    counterpart: &[&TermVector],
) -> (f64, usize) {
    let (overlapping, remainder): (Vec<&Sentence>, Vec<&Sentence>) = suspicious
        .into_iter()
        .partition(|s| s.idx() >= other_range.0 && s.idx() <= other_range.1);
    let size = overlapping.len() + remainder.len();
    let sim_o = mean_best_cosine(&overlapping, counterpart);
    let sim_n = mean_best_cosine(&remainder, counterpart);
    (sim_o + (1.0 - sim_o) * sim_n, size)
}

fn mean_best_cosine(sentences: &[&Sentence], counterpart: &[&TermVector]) -> f64 {
    if sentences.is_empty() {
        return 0.0;
    }
    let total: f64 = sentences
        .iter()
        .map(|sentence| {
            counterpart
                .iter()
                .map(|vector| similarity::cosine(sentence.tf_isf(), vector))
                .fold(0.0, f64::max)
        })
        .sum();
    total / sentences.len() as f64
}

/// First articulation point of the graph, by discovery order of a DFS
/// over the nodes in index order. `None` when every component is
/// biconnected (or trivial).
fn articulation_point(graph: &StableUnGraph<usize, ()>) -> Option<NodeIndex> {
    let mut state = Tarjan {
        graph,
        disc: AHashMap::new(),
        low: AHashMap::new(),
        time: 0,
        cuts: Vec::new(),
    };
    for root in graph.node_indices() {
        if !state.disc.contains_key(&root) {
            state.visit(root, None);
        }
    }
    state
        .cuts
        .into_iter()
        .min_by_key(|&(discovered, _)| discovered)
        .map(|(_, node)| node)
}

struct Tarjan<'g> {
    graph: &'g StableUnGraph<usize, ()>,
    disc: AHashMap<NodeIndex, usize>,
    low: AHashMap<NodeIndex, usize>,
    time: usize,
    cuts: Vec<(usize, NodeIndex)>,
}

impl Tarjan<'_> {
    fn visit(&mut self, node: NodeIndex, parent: Option<NodeIndex>) {
        let discovered = self.time;
        self.time += 1;
        self.disc.insert(node, discovered);
        self.low.insert(node, discovered);

        let mut children = 0;
        let mut is_cut = false;
        let graph = self.graph;
        for neighbor in graph.neighbors(node) {
            if let Some(&neighbor_disc) = self.disc.get(&neighbor) {
                if Some(neighbor) != parent && neighbor_disc < self.low[&node] {
                    self.low.insert(node, neighbor_disc);
                }
            } else {
                children += 1;
                self.visit(neighbor, Some(node));
                let neighbor_low = self.low[&neighbor];
                if neighbor_low < self.low[&node] {
                    self.low.insert(node, neighbor_low);
                }
                if parent.is_some() && neighbor_low >= discovered {
                    is_cut = true;
                }
            }
        }
        if parent.is_none() && children > 1 {
            is_cut = true;
        }
        if is_cut {
            self.cuts.push((discovered, node));
        }
    }
}

/// Node of maximum degree, first in index order on ties.
fn max_degree_node(graph: &StableUnGraph<usize, ()>) -> NodeIndex {
    let mut best = None;
    let mut best_degree = 0;
    for node in graph.node_indices() {
        let degree = graph.neighbors(node).count();
        if best.is_none() || degree > best_degree {
            best = Some(node);
            best_degree = degree;
        }
    }
    // the caller only asks while edges remain, so a node exists
    best.unwrap_or_else(|| NodeIndex::new(0))
}
