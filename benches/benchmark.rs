use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tf_idf_scorer::{inverse_document_frequency, tfidf_score, IdfStore, IdfTable};

/// deterministic synthetic corpus
fn make_corpus(docs: usize, doc_len: usize, vocab: u32) -> Vec<Vec<String>> {
    let mut state = 0x1234_5678u32;
    (0..docs)
        .map(|_| {
            (0..doc_len)
                .map(|_| {
                    state ^= state << 13;
                    state ^= state >> 17;
                    state ^= state << 5;
                    format!("t{}", state % vocab)
                })
                .collect()
        })
        .collect()
}

fn scoring_benchmark(c: &mut Criterion) {
    let corpus = make_corpus(2_000, 200, 5_000);
    let doc = &corpus[0];
    let table: IdfTable = IdfTable::build(&corpus);

    c.bench_function("build_idf_table", |b| {
        b.iter(|| IdfTable::<f64>::build(black_box(&corpus)))
    });

    c.bench_function("tfidf_on_the_fly", |b| {
        b.iter(|| tfidf_score(black_box("t42"), doc, &corpus))
    });

    c.bench_function("tfidf_with_table", |b| {
        b.iter(|| table.tfidf_score_with_store(black_box("t42"), doc, &corpus))
    });

    c.bench_function("idf_on_the_fly", |b| {
        b.iter(|| inverse_document_frequency(black_box("t42"), &corpus))
    });
}

criterion_group!(benches, scoring_benchmark);
criterion_main!(benches);
