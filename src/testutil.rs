//! Shared fixtures for unit tests: a minimal stand-in for the external
//! preprocessing collaborator.

use crate::model::document::{Document, Sentence, Word};

/// Build a finalized document from raw sentence strings, joined by single
/// spaces. Words are maximal alphanumeric runs; lemmas are lowercased
/// word texts.
pub(crate) fn document(name: &str, sentences: &[&str]) -> Document {
    document_with_common(name, sentences, &[])
}

/// Like [`document`], with the sentences at `common` positions flagged as
/// boilerplate.
pub(crate) fn document_with_common(
    name: &str,
    sentences: &[&str],
    common: &[usize],
) -> Document {
    let text = sentences.join(" ");
    let mut doc = Document::new(name, text);
    let mut offset = 0;
    for (position, raw) in sentences.iter().enumerate() {
        let start = offset;
        let end = offset + raw.len();
        let mut sentence = Sentence::new(start, end);
        sentence.common = common.contains(&position);
        for (word_start, word_end) in alphanumeric_runs(raw) {
            sentence.push_word(Word::new(start + word_start, start + word_end));
            sentence.record_lemma(raw[word_start..word_end].to_lowercase());
        }
        doc.push_sentence(sentence);
        offset = end + 1;
    }
    doc.finalize();
    doc
}

fn alphanumeric_runs(raw: &str) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut run_start = None;
    for (pos, ch) in raw.char_indices() {
        if ch.is_alphanumeric() {
            run_start.get_or_insert(pos);
        } else if let Some(start) = run_start.take() {
            runs.push((start, pos));
        }
    }
    if let Some(start) = run_start {
        runs.push((start, raw.len()));
    }
    runs
}
