//! Verbatim sub-match extraction: common word runs within a cluster.

use log::debug;

use crate::config::MatcherConfig;
use crate::error::Result;
use crate::model::cluster::Cluster;
use crate::model::document::{Document, Fragment, Sentence};
use crate::model::matches::{Match, MatchType};

/// Extract exact (case-insensitive) word-run matches from each cluster.
///
/// A word-level longest-common-substring dynamic program runs over the
/// ordered words of the two sides' non-common range sentences. A diagonal
/// run accumulates matched character length; every time the accumulated
/// length reaches `min_verbatim_match_char_len` a candidate covering the
/// matched word span in both documents is emitted. A candidate whose span
/// is followed by the same punctuation character in both documents is
/// widened by that character. Per cluster, candidates are then kept
/// greedily by descending total length, skipping any that overlap an
/// already kept one, so several disjoint sub-matches may survive.
pub fn find_verbatim_matches<'a>(
    clusters: &[Cluster<'a>],
    config: &MatcherConfig,
) -> Result<Vec<Match<'a>>> {
    let mut matches = Vec::new();
    for cluster in clusters {
        let kept = cluster_matches(cluster, config)?;
        matches.extend(kept);
    }
    debug!("verbatim: {} matches from {} clusters", matches.len(), clusters.len());
    Ok(matches)
}

struct SideWords<'a> {
    doc: &'a Document,
    /// (start, end, lowercased text) per word, in document order.
    words: Vec<(usize, usize, String)>,
}

impl<'a> SideWords<'a> {
    fn collect(doc: &'a Document, sentences: impl Iterator<Item = &'a Sentence>) -> Self {
        let words = sentences
            .flat_map(|sentence| sentence.words())
            .map(|word| {
                (
                    word.start,
                    word.end,
                    doc.text()[word.start..word.end].to_lowercase(),
                )
            })
            .collect();
        Self { doc, words }
    }
}

fn cluster_matches<'a>(
    cluster: &Cluster<'a>,
    config: &MatcherConfig,
) -> Result<Vec<Match<'a>>> {
    let susp = SideWords::collect(cluster.susp_doc(), cluster.susp_sentences());
    let src = SideWords::collect(cluster.src_doc(), cluster.src_sentences());

    let mut candidates: Vec<(Fragment<'a>, Fragment<'a>)> = Vec::new();
    // rolling rows of (run word count, run character count)
    let mut prev: Vec<(usize, usize)> = vec![(0, 0); src.words.len() + 1];
    for i in 1..=susp.words.len() {
        let mut row: Vec<(usize, usize)> = vec![(0, 0); src.words.len() + 1];
        let susp_word = &susp.words[i - 1];
        for j in 1..=src.words.len() {
            let src_word = &src.words[j - 1];
            if susp_word.2 == src_word.2 {
                let (run_words, run_chars) = prev[j - 1];
                let run_words = run_words + 1;
                let run_chars = run_chars + (susp_word.1 - susp_word.0);
                row[j] = (run_words, run_chars);
                if run_chars >= config.min_verbatim_match_char_len {
                    candidates.push(candidate(&susp, &src, i, j, run_words));
                }
            }
        }
        prev = row;
    }

    // longest first; ties broken by span position for determinism
    candidates.sort_by_key(|(a, b)| {
        (
            std::cmp::Reverse(a.len() + b.len()),
            a.start(),
            b.start(),
        )
    });

    let mut kept: Vec<(Fragment<'a>, Fragment<'a>)> = Vec::new();
    for (susp_frag, src_frag) in candidates {
        let collides = kept.iter().any(|(a, b)| {
            susp_frag.overlaps_with(a)
                || susp_frag.overlaps_with(b)
                || src_frag.overlaps_with(a)
                || src_frag.overlaps_with(b)
        });
        if !collides {
            kept.push((susp_frag, src_frag));
        }
    }

    kept.into_iter()
        .map(|(a, b)| Match::new(MatchType::Verbatim, a, b))
        .collect()
}

/// Build the candidate fragments for a run ending at word `i`/`j`
/// (1-based), including the trailing-punctuation widening.
fn candidate<'a>(
    susp: &SideWords<'a>,
    src: &SideWords<'a>,
    i: usize,
    j: usize,
    run_words: usize,
) -> (Fragment<'a>, Fragment<'a>) {
    let susp_start = susp.words[i - run_words].0;
    let mut susp_end = susp.words[i - 1].1;
    let src_start = src.words[j - run_words].0;
    let mut src_end = src.words[j - 1].1;

    if let (Some(after_susp), Some(after_src)) = (
        susp.doc.text()[susp_end..].chars().next(),
        src.doc.text()[src_end..].chars().next(),
    ) {
        if after_susp == after_src && !after_susp.is_whitespace() && !after_susp.is_alphanumeric()
        {
            susp_end += after_susp.len_utf8();
            src_end += after_src.len_utf8();
        }
    }

    (
        Fragment::new(susp.doc, susp_start, susp_end),
        Fragment::new(src.doc, src_start, src_end),
    )
}
