/// This crate provides smoothed TF, IDF and TF-IDF scoring over token sequences.
pub mod error;
pub mod scorer;

/// Error and Result types
/// The only failure of the scoring functions is an empty document passed to a
/// term-frequency ratio; the ranker additionally rejects invalid configs.
pub use error::{Error, Result};

/// Scoring functions
/// Stateless and reentrant. Documents are token slices (`&[T]` with
/// `T: AsRef<str>`), corpora are slices of documents.
///
/// - `term_frequency_ratio`: occurrences / document length (fails on empty documents)
/// - `term_frequency_presence`: whether the token occurs at all
/// - `term_frequency_count`: raw occurrence count
/// - `inverse_document_frequency`: `log10((N + 1) / (D + 1)) + 1`
/// - `tfidf_score`: ratio * idf, recomputed on every call
pub use scorer::{
    inverse_document_frequency, smoothed_idf, term_frequency_count, term_frequency_presence,
    term_frequency_ratio, tfidf_score,
};

/// Document-frequency statistics
/// Counts documents and, per token, the documents containing it.
/// Input of the batch IDF computation.
pub use scorer::corpus::DocumentFrequency;

/// IDF lookup
/// `IdfStore` is the lookup contract: a token maps to its last computed IDF.
/// `IdfTable` implements it with values computed in one batch pass, so the
/// per-query TF-IDF path becomes a TF computation plus a lookup.
///
/// # Serialization
/// `IdfTable` is serializable with any serde format.
pub use scorer::store::{IdfStore, IdfTable};

/// Query ranking
/// Ranks keyed documents for a multi-token query with stored IDF values.
pub use scorer::rank::{effective_terms, rank, HitEntry, Hits, RankConfig};
