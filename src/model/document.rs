//! Documents, sentences, words and character fragments.

use ahash::AHashMap;

/// Sparse tf-isf weighted term vector of a sentence.
pub type TermVector = AHashMap<String, f64>;

/// Bag-of-words of a sentence: lemma to occurrence count.
pub type BagOfWords = AHashMap<String, usize>;

/// A preprocessed input document.
///
/// The preprocessing collaborator creates the document, adds sentences
/// (spans, words, bags-of-words, common flags) and then calls
/// [`finalize`](Self::finalize) to derive sentence indices, the document
/// vocabulary and the per-sentence tf-isf vectors. The matching core never
/// mutates a document.
///
/// Document identity is the `(name, text)` value pair.
#[derive(Debug, Clone)]
pub struct Document {
    name: String,
    text: String,
    vocabulary: AHashMap<String, usize>,
    sentences: Vec<Sentence>,
}

impl Document {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            vocabulary: AHashMap::new(),
            sentences: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Lemma to sentence-frequency counts, derived by
    /// [`finalize`](Self::finalize).
    pub fn vocabulary(&self) -> &AHashMap<String, usize> {
        &self.vocabulary
    }

    /// All live sentences, sorted by start offset.
    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn push_sentence(&mut self, sentence: Sentence) {
        self.sentences.push(sentence);
    }

    /// Remove a sentence by its current position. The document must be
    /// finalized again before it re-enters the pipeline.
    pub fn remove_sentence(&mut self, position: usize) -> Sentence {
        self.sentences.remove(position)
    }

    /// Derive everything the pipeline reads: sorts sentences by start
    /// offset, assigns sequential indices, accumulates the vocabulary
    /// (per lemma, the number of sentences whose bag contains it) and
    /// computes each sentence's tf-isf vector as
    /// `tf * ln(sentence_count / sentence_frequency)`.
    ///
    /// Idempotent; may be re-run after sentences are added or removed.
    pub fn finalize(&mut self) {
        self.sentences.sort_by_key(|s| s.start);

        self.vocabulary.clear();
        for sentence in &self.sentences {
            for lemma in sentence.bow.keys() {
                *self.vocabulary.entry(lemma.clone()).or_insert(0) += 1;
            }
        }

        let count = self.sentences.len() as f64;
        let vocabulary = &self.vocabulary;
        for (idx, sentence) in self.sentences.iter_mut().enumerate() {
            sentence.idx = idx;
            sentence.tf_isf = sentence
                .bow
                .iter()
                .map(|(lemma, &tf)| {
                    let sf = vocabulary[lemma] as f64;
                    (lemma.clone(), tf as f64 * (count / sf).ln())
                })
                .collect();
        }
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other) || (self.name == other.name && self.text == other.text)
    }
}

impl Eq for Document {}

/// A character span `[start, end)` within one document's text.
#[derive(Debug, Clone, Copy)]
pub struct Fragment<'a> {
    doc: &'a Document,
    start: usize,
    end: usize,
}

impl<'a> Fragment<'a> {
    pub fn new(doc: &'a Document, start: usize, end: usize) -> Self {
        Self { doc, start, end }
    }

    pub fn document(&self) -> &'a Document {
        self.doc
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn text(&self) -> &'a str {
        &self.doc.text[self.start..self.end]
    }

    /// True iff both fragments belong to the same document and their
    /// character ranges intersect.
    pub fn overlaps_with(&self, other: &Fragment<'_>) -> bool {
        self.doc == other.doc && self.start < other.end && other.start < self.end
    }
}

impl PartialEq for Fragment<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end && self.doc == other.doc
    }
}

impl Eq for Fragment<'_> {}

impl std::hash::Hash for Fragment<'_> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.doc.name.hash(state);
        self.start.hash(state);
        self.end.hash(state);
    }
}

/// A preprocessed sentence: a fragment of its document plus the word list,
/// bag-of-words and derived tf-isf vector the pipeline works with.
///
/// `idx` is the sentence's position among the document's live sentences and
/// is recomputed by [`Document::finalize`], not a stable identifier.
#[derive(Debug, Clone)]
pub struct Sentence {
    pub start: usize,
    pub end: usize,
    /// Marks boilerplate/shared-reference text; common sentences are
    /// excluded from seeding and from cluster lengths.
    pub common: bool,
    words: Vec<Word>,
    bow: BagOfWords,
    tf_isf: TermVector,
    idx: usize,
}

impl Sentence {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            common: false,
            words: Vec::new(),
            bow: BagOfWords::default(),
            tf_isf: TermVector::default(),
            idx: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Position among the document's live sentences. Valid only after
    /// [`Document::finalize`].
    pub fn idx(&self) -> usize {
        self.idx
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn push_word(&mut self, word: Word) {
        self.words.push(word);
    }

    pub fn bow(&self) -> &BagOfWords {
        &self.bow
    }

    /// Count one occurrence of `lemma` in this sentence's bag-of-words.
    pub fn record_lemma(&mut self, lemma: impl Into<String>) {
        *self.bow.entry(lemma.into()).or_insert(0) += 1;
    }

    /// The tf-isf weighted term vector, derived by [`Document::finalize`].
    pub fn tf_isf(&self) -> &TermVector {
        &self.tf_isf
    }

    /// Two sentences are adjacent within `gap` iff at most `gap` sentences
    /// lie between them.
    pub fn adjacent_within(&self, other: &Sentence, gap: usize) -> bool {
        self.idx.abs_diff(other.idx) <= gap + 1
    }

    pub fn fragment<'a>(&self, doc: &'a Document) -> Fragment<'a> {
        Fragment::new(doc, self.start, self.end)
    }
}

/// A word within a sentence. The owning sentence is the containing
/// [`Sentence::words`] list; words carry no owned back-reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Word {
    pub start: usize,
    pub end: usize,
}

impl Word {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn fragment<'a>(&self, doc: &'a Document) -> Fragment<'a> {
        Fragment::new(doc, self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::document;

    #[test]
    fn test_finalize_assigns_sequential_indices() {
        let doc = document("a", &["one two three.", "four five six.", "seven eight."]);
        let indices: Vec<usize> = doc.sentences().iter().map(|s| s.idx()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_finalize_sorts_sentences_by_start() {
        let mut doc = Document::new("a", "first sentence. second sentence.");
        let mut late = Sentence::new(16, 32);
        late.record_lemma("second");
        let mut early = Sentence::new(0, 15);
        early.record_lemma("first");
        doc.push_sentence(late);
        doc.push_sentence(early);
        doc.finalize();
        assert_eq!(doc.sentences()[0].start, 0);
        assert_eq!(doc.sentences()[0].idx(), 0);
        assert_eq!(doc.sentences()[1].idx(), 1);
    }

    #[test]
    fn test_vocabulary_counts_sentence_frequency() {
        let doc = document("a", &["alpha beta.", "alpha gamma.", "delta delta."]);
        assert_eq!(doc.vocabulary()["alpha"], 2);
        assert_eq!(doc.vocabulary()["beta"], 1);
        // two occurrences in one sentence still count once
        assert_eq!(doc.vocabulary()["delta"], 1);
    }

    #[test]
    fn test_tf_isf_zero_for_ubiquitous_lemma() {
        let doc = document("a", &["the alpha.", "the beta.", "the gamma."]);
        for sentence in doc.sentences() {
            assert_eq!(sentence.tf_isf()["the"], 0.0);
            // lemmas unique to one sentence carry weight ln(3)
            let unique = sentence
                .tf_isf()
                .iter()
                .find(|(lemma, _)| *lemma != "the")
                .map(|(_, w)| *w)
                .unwrap();
            assert!((unique - 3.0_f64.ln()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_finalize_is_idempotent() {
        let mut doc = document("a", &["one two.", "three four."]);
        let before: Vec<TermVector> = doc.sentences().iter().map(|s| s.tf_isf().clone()).collect();
        doc.finalize();
        let after: Vec<TermVector> = doc.sentences().iter().map(|s| s.tf_isf().clone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_fragment_overlap_same_document() {
        let doc = document("a", &["one two three."]);
        let f1 = Fragment::new(&doc, 0, 7);
        let f2 = Fragment::new(&doc, 4, 10);
        let f3 = Fragment::new(&doc, 7, 10);
        assert!(f1.overlaps_with(&f2));
        assert!(f2.overlaps_with(&f1));
        assert!(!f1.overlaps_with(&f3));
    }

    #[test]
    fn test_fragment_overlap_distinct_documents() {
        let doc1 = document("a", &["one two three."]);
        let doc2 = document("b", &["one two three."]);
        let f1 = Fragment::new(&doc1, 0, 7);
        let f2 = Fragment::new(&doc2, 0, 7);
        assert!(!f1.overlaps_with(&f2));
    }

    #[test]
    fn test_fragment_text_slice() {
        let doc = document("a", &["one two three."]);
        let fragment = Fragment::new(&doc, 4, 7);
        assert_eq!(fragment.text(), "two");
    }

    #[test]
    fn test_sentence_adjacency() {
        let doc = document("a", &["a one.", "b two.", "c three.", "d four."]);
        let sents = doc.sentences();
        assert!(sents[0].adjacent_within(&sents[1], 0));
        assert!(!sents[0].adjacent_within(&sents[2], 0));
        assert!(sents[0].adjacent_within(&sents[2], 1));
        assert!(sents[3].adjacent_within(&sents[0], 2));
    }
}
