use std::path::PathBuf;

use assessrec::{build_recommender, AppConfig, IndexKind};

fn config(kind: IndexKind) -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.catalog.path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/catalog.csv");
    cfg.index.kind = kind;
    cfg
}

const QUERIES: &[&str] = &[
    "Java developer with strong coding skills",
    "Customer support agent with good spoken English",
    "Graduate analyst, numerical reasoning and problem solving",
    "HR business partner",
    "",
];

#[tokio::test]
async fn independent_builds_give_identical_results() {
    let a = build_recommender(&config(IndexKind::Flat)).await.expect("first build");
    let b = build_recommender(&config(IndexKind::Flat)).await.expect("second build");

    for query in QUERIES {
        for diversify in [true, false] {
            let left = a.recommend(query, 10, diversify).await.expect("a");
            let right = b.recommend(query, 10, diversify).await.expect("b");
            assert_eq!(left, right, "query {query:?} diversify={diversify}");
        }
    }
}

#[tokio::test]
async fn repeated_calls_are_idempotent() {
    let engine = build_recommender(&config(IndexKind::Flat)).await.expect("build");
    let first = engine.recommend(QUERIES[1], 7, true).await.expect("first");
    for _ in 0..5 {
        assert_eq!(engine.recommend(QUERIES[1], 7, true).await.expect("again"), first);
    }
}

#[tokio::test]
async fn small_catalog_hnsw_matches_flat() {
    // below min_vectors_for_ann the graph index answers with an exact scan
    let flat = build_recommender(&config(IndexKind::Flat)).await.expect("flat");
    let hnsw = build_recommender(&config(IndexKind::Hnsw)).await.expect("hnsw");
    assert_eq!(hnsw.index_kind(), "hnsw-exact");

    for query in &QUERIES[..4] {
        let a = flat.recommend(query, 10, true).await.expect("flat");
        let b = hnsw.recommend(query, 10, true).await.expect("hnsw");
        let a: Vec<&str> = a.iter().map(|r| r.url.as_str()).collect();
        let b: Vec<&str> = b.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(a, b, "query {query:?}");
    }
}
