//! Shared fixtures: a minimal stand-in for the preprocessing collaborator.

use doppel::{Document, Sentence, Word};

/// Build a finalized document from raw sentence strings joined by single
/// spaces. Words are maximal alphanumeric runs, lemmas their lowercased
/// text.
pub fn document(name: &str, sentences: &[&str]) -> Document {
    let text = sentences.join(" ");
    let mut doc = Document::new(name, text);
    let mut offset = 0;
    for raw in sentences {
        let start = offset;
        let end = offset + raw.len();
        let mut sentence = Sentence::new(start, end);
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
