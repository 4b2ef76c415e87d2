use std::collections::HashMap;
use std::hash::BuildHasher;

use indexmap::IndexMap;
use num::Float;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::scorer::{
    corpus::DocumentFrequency, inverse_document_frequency, smoothed_idf, term_frequency_ratio,
};

/// Lookup of precomputed IDF values
///
/// Given a token, returns its last computed IDF, or `None` if the store never
/// saw it. Implementors decide where the values live and how often they are
/// refreshed. Usable as `Box<dyn IdfStore>`.
pub trait IdfStore {
    fn idf(&self, token: &str) -> Option<f64>;

    /// Stored IDF, or the on-the-fly value over `corpus` when absent
    fn idf_or_compute<D, T>(&self, token: &str, corpus: &[D]) -> f64
    where
        Self: Sized,
        D: AsRef<[T]>,
        T: AsRef<str>,
    {
        self.idf(token)
            .unwrap_or_else(|| inverse_document_frequency(token, corpus))
    }

    /// TF-IDF using the stored IDF
    /// Falls back to `corpus` only for tokens the store does not know
    ///
    /// # Errors
    /// `Error::EmptyDocument` if `document` has no tokens.
    fn tfidf_score_with_store<D, T, U>(
        &self,
        token: &str,
        document: &[U],
        corpus: &[D],
    ) -> Result<f64>
    where
        Self: Sized,
        D: AsRef<[T]>,
        T: AsRef<str>,
        U: AsRef<str>,
    {
        let tf = term_frequency_ratio(token, document)?;
        Ok(tf * self.idf_or_compute(token, corpus))
    }
}

impl<S> IdfStore for Box<S>
where
    S: IdfStore + ?Sized,
{
    fn idf(&self, token: &str) -> Option<f64> {
        (**self).idf(token)
    }
}

impl<S> IdfStore for HashMap<String, f64, S>
where
    S: BuildHasher,
{
    fn idf(&self, token: &str) -> Option<f64> {
        self.get(token).copied()
    }
}

impl<S> IdfStore for IndexMap<String, f64, S>
where
    S: BuildHasher,
{
    fn idf(&self, token: &str) -> Option<f64> {
        self.get(token).copied()
    }
}

/// Precomputed IDF table
///
/// One smoothed IDF per distinct token of a corpus, computed in a single
/// batch pass from [`DocumentFrequency`].
///
/// `N` is the stored value type (`f64` or `f32`).
/// Lookups always return `f64`.
///
/// # Serialization
/// Supported. The table carries its own document count and the generation of
/// the statistics it was built from. The source instance is not kept, so the
/// first `refresh_if_changed` after deserialization always recomputes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(serialize = "N: Serialize", deserialize = "N: Deserialize<'de>"))]
pub struct IdfTable<N = f64>
where
    N: Float,
{
    /// IDF per token
    #[serde(with = "indexmap::map::serde_seq")]
    idf: IndexMap<Box<str>, N>,
    /// document count at the time of computation
    doc_num: u64,
    /// generation of the source statistics
    latest_gen: u64,
    /// instance id of the source statistics, 0 if unknown
    #[serde(skip)]
    source_id: u64,
}

impl<N> IdfTable<N>
where
    N: Float + Send + Sync,
{
    /// Compute the table from corpus statistics
    pub fn from_frequency(df: &DocumentFrequency) -> Self {
        let doc_num = df.doc_num();
        let idf: IndexMap<Box<str>, N> = df
            .par_terms()
            .map(|(term, doc_freq)| {
                let value = num::cast(smoothed_idf(doc_num, doc_freq)).unwrap_or_else(N::nan);
                (Box::from(term), value)
            })
            .collect();
        debug!(doc_num, tokens = idf.len(), "idf table computed");
        Self {
            idf,
            doc_num,
            latest_gen: df.gen_num(),
            source_id: df.instance_id(),
        }
    }

    /// Scan `corpus` and compute the table in one call
    pub fn build<D, T>(corpus: &[D]) -> Self
    where
        D: AsRef<[T]> + Sync,
        T: AsRef<str> + Sync,
    {
        Self::from_frequency(&DocumentFrequency::from_corpus(corpus))
    }

    /// Recompute every value from `df`
    pub fn refresh(&mut self, df: &DocumentFrequency) {
        *self = Self::from_frequency(df);
    }

    /// Recompute from `df` unless it is the same instance the table was last
    /// computed from and has not changed since
    /// Returns whether the table was recomputed
    pub fn refresh_if_changed(&mut self, df: &DocumentFrequency) -> bool {
        if df.instance_id() == self.source_id && df.gen_num() == self.latest_gen {
            debug!(latest_gen = self.latest_gen, "idf table up to date");
            return false;
        }
        self.refresh(df);
        true
    }
}

impl<N> IdfTable<N>
where
    N: Float,
{
    /// Stored value for `token`
    pub fn get(&self, token: &str) -> Option<N> {
        self.idf.get(token).copied()
    }

    /// Number of stored tokens
    pub fn len(&self) -> usize {
        self.idf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idf.is_empty()
    }

    /// Document count the table was computed with
    pub fn doc_num(&self) -> u64 {
        self.doc_num
    }

    /// Tokens with their stored IDF
    pub fn iter(&self) -> impl Iterator<Item = (&str, N)> {
        self.idf.iter().map(|(t, &v)| (t.as_ref(), v))
    }
}

impl<N> IdfStore for IdfTable<N>
where
    N: Float,
{
    fn idf(&self, token: &str) -> Option<f64> {
        self.get(token).and_then(|v| v.to_f64())
    }
}
