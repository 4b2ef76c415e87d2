pub mod corpus;
pub mod store;
pub mod rank;

use crate::error::{Error, Result};

/// Raw number of occurrences of `token` in `document`
///
/// Defined for empty documents (returns 0).
#[inline]
pub fn term_frequency_count<T>(token: &str, document: &[T]) -> u64
where
    T: AsRef<str>,
{
    document.iter().filter(|t| t.as_ref() == token).count() as u64
}

/// Whether `token` occurs at least once in `document`
///
/// Defined for empty documents (returns false).
#[inline]
pub fn term_frequency_presence<T>(token: &str, document: &[T]) -> bool
where
    T: AsRef<str>,
{
    document.iter().any(|t| t.as_ref() == token)
}

/// Occurrences of `token` divided by the token count of `document`
///
/// # Returns
/// * `f64` - TF value (0.0~1.0)
///
/// # Errors
/// `Error::EmptyDocument` if `document` has no tokens.
#[inline]
pub fn term_frequency_ratio<T>(token: &str, document: &[T]) -> Result<f64>
where
    T: AsRef<str>,
{
    if document.is_empty() {
        return Err(Error::EmptyDocument);
    }
    Ok(term_frequency_count(token, document) as f64 / document.len() as f64)
}

/// Smoothed IDF from raw counts
///
/// `log10((doc_num + 1) / (doc_freq + 1)) + 1`
///
/// Both counts are shifted by one so an empty corpus or an unseen token never
/// divides by zero, and the trailing +1 keeps the result at or above 1.0 when
/// `doc_freq <= doc_num`.
#[inline]
pub fn smoothed_idf(doc_num: u64, doc_freq: u64) -> f64 {
    let n = doc_num as f64 + 1.0;
    let d = doc_freq as f64 + 1.0;
    (n / d).log10() + 1.0
}

/// Inverse document frequency of `token` across `corpus`
///
/// Each document counts at most once, however often the token repeats in it.
/// Always finite, also for an empty corpus.
pub fn inverse_document_frequency<D, T>(token: &str, corpus: &[D]) -> f64
where
    D: AsRef<[T]>,
    T: AsRef<str>,
{
    let doc_freq = corpus
        .iter()
        .filter(|doc| term_frequency_presence(token, doc.as_ref()))
        .count() as u64;
    smoothed_idf(corpus.len() as u64, doc_freq)
}

/// TF-IDF of `token` in `document` relative to `corpus`
///
/// Recomputes both factors on every call.
/// For repeated queries against the same corpus use an
/// [`IdfStore`](store::IdfStore) instead.
///
/// # Errors
/// `Error::EmptyDocument` if `document` has no tokens.
pub fn tfidf_score<D, T, U>(token: &str, document: &[U], corpus: &[D]) -> Result<f64>
where
    D: AsRef<[T]>,
    T: AsRef<str>,
    U: AsRef<str>,
{
    let tf = term_frequency_ratio(token, document)?;
    Ok(tf * inverse_document_frequency(token, corpus))
}
