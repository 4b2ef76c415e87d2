use tf_idf_scorer::{
    inverse_document_frequency, rank, tfidf_score, DocumentFrequency, IdfStore, IdfTable,
    RankConfig,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let docs = vec![
        ("doc1", vec!["rust", "fast", "parallel", "rust"]),
        ("doc2", vec!["rust", "flexible", "safe"]),
        ("doc3", vec!["python", "flexible"]),
    ];
    let corpus: Vec<&[&str]> = docs.iter().map(|(_, d)| d.as_slice()).collect();

    // on the fly
    println!("idf(rust) = {:.4}", inverse_document_frequency("rust", &corpus));
    println!("tfidf(rust, doc1) = {:.4}", tfidf_score("rust", &docs[0].1, &corpus)?);

    // batch
    let mut df = DocumentFrequency::from_corpus(&corpus);
    let mut table: IdfTable = IdfTable::from_frequency(&df);
    println!("stored idf(safe) = {:?}", table.idf("safe"));

    df.add_doc(&["safe", "systems"]);
    table.refresh(&df);
    println!("stored idf(safe) after refresh = {:?}", table.idf("safe"));

    let config = RankConfig {
        top_k: 2,
        ..RankConfig::default()
    };
    let hits = rank(&["rust", "safe"], &docs, &table, &config)?;
    println!("{:#?}", hits);
    Ok(())
}
