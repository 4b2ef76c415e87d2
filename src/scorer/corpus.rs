use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::{IndexMap, IndexSet};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::scorer::smoothed_idf;

/// Document-frequency statistics of a corpus
///
/// Holds no document text, only:
/// - the number of documents
/// - the number of documents each token appears in
///
/// A document counts at most once per token, however often the token repeats.
///
/// Every instance carries an id that is unique within the process, including
/// clones and deserialized copies, so an [`IdfTable`](crate::IdfTable) can tell
/// whether it was computed from this very instance.
#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentFrequency {
    /// process-unique instance id
    #[serde(skip, default = "next_instance_id")]
    instance_id: u64,
    /// documents added
    add_num: u64,
    /// documents removed
    sub_num: u64,
    /// documents containing each token
    #[serde(with = "indexmap::map::serde_seq")]
    term_counts: IndexMap<Box<str>, u64>,
}

/// ids start at 1, 0 never names an instance
static INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

fn next_instance_id() -> u64 {
    INSTANCE_ID.fetch_add(1, Ordering::Relaxed)
}

impl Default for DocumentFrequency {
    fn default() -> Self {
        Self {
            instance_id: next_instance_id(),
            add_num: 0,
            sub_num: 0,
            term_counts: IndexMap::new(),
        }
    }
}

impl Clone for DocumentFrequency {
    fn clone(&self) -> Self {
        Self {
            instance_id: next_instance_id(),
            add_num: self.add_num,
            sub_num: self.sub_num,
            term_counts: self.term_counts.clone(),
        }
    }
}

impl DocumentFrequency {
    /// Create an empty instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the statistics of a whole corpus
    /// Documents are scanned in parallel, then the partial counts are merged
    pub fn from_corpus<D, T>(corpus: &[D]) -> Self
    where
        D: AsRef<[T]> + Sync,
        T: AsRef<str> + Sync,
    {
        let df = corpus
            .par_iter()
            .fold(Self::new, |mut acc, doc| {
                acc.add_doc(doc.as_ref());
                acc
            })
            .reduce(Self::new, |mut acc, other| {
                acc.merge(&other);
                acc
            });
        debug!(
            doc_num = df.doc_num(),
            vocab_size = df.vocab_size(),
            "document frequency built"
        );
        df
    }

    /// Add a document
    pub fn add_doc<T>(&mut self, document: &[T])
    where
        T: AsRef<str>,
    {
        self.add_num += 1;
        let distinct: IndexSet<&str> = document.iter().map(|t| t.as_ref()).collect();
        for token in distinct {
            *self.term_counts.entry(token.into()).or_insert(0) += 1;
        }
    }

    /// Remove a document previously added with `add_doc`
    /// Tokens that no longer appear in any document are dropped
    ///
    /// `document` must have been added before. Removing from empty statistics
    /// changes nothing and returns false.
    pub fn sub_doc<T>(&mut self, document: &[T]) -> bool
    where
        T: AsRef<str>,
    {
        if self.doc_num() == 0 {
            return false;
        }
        self.sub_num += 1;
        let distinct: IndexSet<&str> = document.iter().map(|t| t.as_ref()).collect();
        for token in distinct {
            if let Some(count) = self.term_counts.get_mut(token) {
                if *count > 1 {
                    *count -= 1;
                } else {
                    self.term_counts.swap_remove(token);
                }
            }
        }
        true
    }

    /// self += other
    pub fn merge(&mut self, other: &DocumentFrequency) {
        for (term, &count) in other.term_counts.iter() {
            *self.term_counts.entry(term.clone()).or_insert(0) += count;
        }
        self.add_num += other.add_num;
        self.sub_num += other.sub_num;
    }

    /// Number of documents currently in the corpus
    pub fn doc_num(&self) -> u64 {
        self.add_num.saturating_sub(self.sub_num)
    }

    /// Generation number
    /// increases on every add or sub, for update notify
    pub fn gen_num(&self) -> u64 {
        self.add_num + self.sub_num
    }

    /// Process-unique id of this instance
    pub fn instance_id(&self) -> u64 {
        self.instance_id
    }

    /// Number of documents containing `token`
    pub fn doc_freq(&self, token: &str) -> u64 {
        self.term_counts.get(token).copied().unwrap_or(0)
    }

    /// Number of distinct tokens
    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.term_counts.len()
    }

    /// Distinct tokens with their document frequency
    pub fn terms(&self) -> impl Iterator<Item = (&str, u64)> {
        self.term_counts.iter().map(|(t, &c)| (t.as_ref(), c))
    }

    pub(crate) fn par_terms(&self) -> impl ParallelIterator<Item = (&str, u64)> {
        self.term_counts.par_iter().map(|(t, &c)| (t.as_ref(), c))
    }

    /// Smoothed IDF of `token` from these statistics
    pub fn idf(&self, token: &str) -> f64 {
        smoothed_idf(self.doc_num(), self.doc_freq(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::inverse_document_frequency;

    fn corpus() -> Vec<Vec<&'static str>> {
        vec![
            vec!["cat", "dog", "cat"],
            vec!["dog", "bird"],
            vec!["cat"],
            vec![],
        ]
    }

    #[test]
    fn add_doc_counts_each_document_once() {
        let mut df = DocumentFrequency::new();
        df.add_doc(&["cat", "cat", "cat"]);
        df.add_doc(&["cat", "dog"]);
        assert_eq!(df.doc_num(), 2);
        assert_eq!(df.doc_freq("cat"), 2);
        assert_eq!(df.doc_freq("dog"), 1);
        assert_eq!(df.doc_freq("bird"), 0);
        assert_eq!(df.vocab_size(), 2);
    }

    #[test]
    fn sub_doc_restores_previous_state() {
        let mut df = DocumentFrequency::new();
        df.add_doc(&["cat", "dog"]);
        let snapshot = df.clone();
        df.add_doc(&["dog", "bird", "bird"]);
        assert!(df.sub_doc(&["dog", "bird", "bird"]));
        assert_eq!(df.doc_num(), snapshot.doc_num());
        assert_eq!(df.doc_freq("dog"), 1);
        assert_eq!(df.doc_freq("bird"), 0);
        assert_eq!(df.vocab_size(), 2);
        // generation still moves forward
        assert_eq!(df.gen_num(), snapshot.gen_num() + 2);
    }

    #[test]
    fn sub_doc_on_empty_statistics_is_ignored() {
        let mut df = DocumentFrequency::new();
        assert!(!df.sub_doc(&["ghost"]));
        assert_eq!(df.gen_num(), 0);

        df.add_doc(&["cat"]);
        assert_eq!(df.doc_num(), 1);
        assert_eq!(df.doc_freq("cat"), 1);
        assert_eq!(df.idf("cat"), 1.0);
    }

    #[test]
    fn clones_and_rebuilds_get_their_own_id() {
        let a = DocumentFrequency::from_corpus(&corpus());
        let b = DocumentFrequency::from_corpus(&corpus());
        assert_ne!(a.instance_id(), b.instance_id());
        assert_ne!(a.instance_id(), a.clone().instance_id());
    }

    #[test]
    fn parallel_build_matches_sequential() {
        let corpus = corpus();
        let parallel = DocumentFrequency::from_corpus(&corpus);
        let mut sequential = DocumentFrequency::new();
        for doc in &corpus {
            sequential.add_doc(doc);
        }
        assert_eq!(parallel.doc_num(), sequential.doc_num());
        assert_eq!(parallel.vocab_size(), sequential.vocab_size());
        for (term, count) in sequential.terms() {
            assert_eq!(parallel.doc_freq(term), count, "mismatch for {term}");
        }
    }

    #[test]
    fn idf_agrees_with_on_the_fly_computation() {
        let corpus = corpus();
        let df = DocumentFrequency::from_corpus(&corpus);
        for token in ["cat", "dog", "bird", "fish"] {
            assert_eq!(df.idf(token), inverse_document_frequency(token, &corpus));
        }
    }

    #[test]
    fn merge_adds_counts() {
        let mut a = DocumentFrequency::new();
        a.add_doc(&["x", "y"]);
        let mut b = DocumentFrequency::new();
        b.add_doc(&["y"]);
        b.add_doc(&["z"]);
        a.merge(&b);
        assert_eq!(a.doc_num(), 3);
        assert_eq!(a.doc_freq("y"), 2);
        assert_eq!(a.doc_freq("z"), 1);
    }
}
