use std::fmt::Debug;

use indexmap::IndexSet;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::scorer::{store::IdfStore, term_frequency_count, term_frequency_ratio};

/// Weights and limits of the query ranker
///
/// Every field has a default, so a partial config deserializes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankConfig {
    /// weight of `count * idf`
    pub count_weight: f64,
    /// weight of `idf * tf ratio`
    pub ratio_weight: f64,
    /// factor used for a term that scored exactly zero
    pub zero_score_floor: f64,
    /// lower bound of the factor used for a non-zero term score
    pub min_score_floor: f64,
    /// maximum number of hits kept
    pub top_k: usize,
    /// stored IDF a query term needs to count as effective
    pub effective_idf_threshold: f64,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            count_weight: 0.9,
            ratio_weight: 0.1,
            zero_score_floor: 0.05,
            min_score_floor: 0.5,
            top_k: 20,
            effective_idf_threshold: 5.0,
        }
    }
}

impl RankConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.count_weight >= 0.0 && self.ratio_weight >= 0.0) {
            return Err(Error::InvalidConfig("weights must be non-negative"));
        }
        if !(self.zero_score_floor > 0.0 && self.min_score_floor > 0.0) {
            return Err(Error::InvalidConfig("score floors must be positive"));
        }
        if self.top_k == 0 {
            return Err(Error::InvalidConfig("top_k must be at least 1"));
        }
        Ok(())
    }
}

/// One ranked document
#[derive(Debug, Clone, PartialEq)]
pub struct HitEntry<K> {
    pub key: K,
    pub score: f64,
    /// token count of the document
    pub doc_len: u64,
}

/// Structure to store ranking results
pub struct Hits<K> {
    pub list: Vec<HitEntry<K>>,
}

impl<K> Hits<K> {
    /// Create a new Hits instance
    pub fn new(list: Vec<HitEntry<K>>) -> Self {
        Hits { list }
    }

    /// Sort results by descending score
    pub fn sort_by_score(&mut self) -> &mut Self {
        // Remove NaN scores
        self.list.retain(|h| !h.score.is_nan());
        self.list.sort_by(|a, b| b.score.total_cmp(&a.score));
        self
    }

    /// Sort results by ascending score
    pub fn sort_by_score_rev(&mut self) -> &mut Self {
        // Remove NaN scores
        self.list.retain(|h| !h.score.is_nan());
        self.list.sort_by(|a, b| a.score.total_cmp(&b.score));
        self
    }

    /// Keep the first `len` hits
    pub fn truncate(&mut self, len: usize) -> &mut Self {
        self.list.truncate(len);
        self
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.list.iter().map(|h| &h.key)
    }
}

impl<K> Debug for Hits<K>
where
    K: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            // each hit on a new line
            writeln!(f, "Hits [")?;
            for hit in &self.list {
                writeln!(f, "    {:?}: {:.6} (len: {})", hit.key, hit.score, hit.doc_len)?;
            }
            write!(f, "]")
        } else {
            f.debug_list().entries(&self.list).finish()
        }
    }
}

/// Score of one query term in one document
///
/// `count_weight * count * idf + ratio_weight * idf * ratio`
#[inline]
pub fn term_score(count: u64, ratio: f64, idf: f64, config: &RankConfig) -> f64 {
    config.count_weight * count as f64 * idf + config.ratio_weight * idf * ratio
}

/// Combine per-term scores into a document score
///
/// Product over terms. A zero score contributes `zero_score_floor`, any other
/// score at least `min_score_floor`, so a single missing term lowers the rank
/// without zeroing it.
pub fn combine_scores<I>(scores: I, config: &RankConfig) -> f64
where
    I: IntoIterator<Item = f64>,
{
    scores.into_iter().fold(1.0, |acc, score| {
        let factor = if score == 0.0 {
            config.zero_score_floor
        } else {
            score.max(config.min_score_floor)
        };
        acc * factor
    })
}

/// Query tokens whose stored IDF is above `effective_idf_threshold`
/// Tokens unknown to the store count as IDF 0
pub fn effective_terms<'q, Q, S>(query: &'q [Q], store: &S, config: &RankConfig) -> Vec<&'q str>
where
    Q: AsRef<str>,
    S: IdfStore,
{
    query
        .iter()
        .map(|q| q.as_ref())
        .filter(|term| store.idf(term).unwrap_or(0.0) > config.effective_idf_threshold)
        .collect()
}

/// Rank keyed documents against a query
///
/// IDF values come from `store` only; terms it does not know score 0.
/// Repeated query terms are scored once.
/// Empty documents are ranked with a TF ratio of 0.
///
/// # Errors
/// `Error::InvalidConfig` if `config` does not validate.
pub fn rank<K, D, T, Q, S>(
    query: &[Q],
    documents: &[(K, D)],
    store: &S,
    config: &RankConfig,
) -> Result<Hits<K>>
where
    K: Clone + Send + Sync,
    D: AsRef<[T]> + Sync,
    T: AsRef<str> + Sync,
    Q: AsRef<str>,
    S: IdfStore,
{
    config.validate()?;

    let terms: IndexSet<&str> = query.iter().map(|q| q.as_ref()).collect();
    let term_idf: Vec<(&str, f64)> = terms
        .into_iter()
        .map(|term| (term, store.idf(term).unwrap_or(0.0)))
        .collect();

    let empty_docs = documents
        .iter()
        .filter(|(_, doc)| doc.as_ref().is_empty())
        .count();
    if empty_docs > 0 {
        warn!(empty_docs, "ranking empty documents with a tf ratio of 0");
    }

    let list: Vec<HitEntry<K>> = documents
        .par_iter()
        .map(|(key, doc)| {
            let doc = doc.as_ref();
            let scores = term_idf.iter().map(|&(term, idf)| {
                let count = term_frequency_count(term, doc);
                let ratio = term_frequency_ratio(term, doc).unwrap_or(0.0);
                term_score(count, ratio, idf, config)
            });
            HitEntry {
                key: key.clone(),
                score: combine_scores(scores, config),
                doc_len: doc.len() as u64,
            }
        })
        .collect();

    let mut hits = Hits::new(list);
    hits.sort_by_score().truncate(config.top_k);
    debug!(
        terms = term_idf.len(),
        candidates = documents.len(),
        hits = hits.len(),
        "ranking finished"
    );
    Ok(hits)
}
