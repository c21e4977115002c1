use std::collections::HashSet;
use std::path::PathBuf;

use assessrec::{
    build_recommender, prepare_query, AppConfig, Category, RecommendConfig, RecommendError,
    Recommender,
};
use matcher::SelectionPhase;

fn fixture_config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.catalog.path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/catalog.csv");
    // pull the whole fixture catalog into every pool
    cfg.recommender = RecommendConfig {
        min_candidates: 40,
        ..RecommendConfig::default()
    };
    cfg
}

async fn engine() -> Recommender {
    build_recommender(&fixture_config())
        .await
        .expect("fixture recommender builds")
}

fn count(items: &[assessrec::Recommendation], category: Category, phase: SelectionPhase) -> usize {
    items
        .iter()
        .filter(|r| r.category == category && r.phase == phase)
        .count()
}

#[tokio::test]
async fn fixture_catalog_is_cleaned() {
    let engine = engine().await;
    assert_eq!(engine.catalog().len(), 35);
    let names: HashSet<&str> = engine.catalog().iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names.len(), 35);
}

#[tokio::test]
async fn technical_query_fills_coding_and_knowledge_quotas() {
    let engine = engine().await;
    let outcome = engine
        .recommend_detailed("Java developer with strong coding skills", 10, true)
        .await
        .expect("recommend succeeds");

    let plan = outcome.plan.expect("diversified");
    assert!(plan.signals.technical);
    assert!(!plan.signals.behavioral && !plan.signals.cognitive);
    assert!(!plan.signals.language && !plan.signals.domain);
    assert_eq!(plan.quotas.len(), 2);

    let items = outcome.items;
    assert_eq!(items.len(), 10);
    assert_eq!(count(&items, Category::Coding, SelectionPhase::Quota), 4);
    assert_eq!(count(&items, Category::KnowledgeSkills, SelectionPhase::Quota), 2);
    assert!(items[..6].iter().all(|r| r.phase == SelectionPhase::Quota));
    assert!(items[6..].iter().all(|r| r.phase == SelectionPhase::Fill));
}

#[tokio::test]
async fn behavioral_and_language_query_mixes_categories() {
    let engine = engine().await;
    let items = engine
        .recommend(
            "Team lead who communicates with stakeholders and writes clear English reports",
            10,
            true,
        )
        .await
        .expect("recommend succeeds");

    assert_eq!(count(&items, Category::PersonalityBehavior, SelectionPhase::Quota), 3);
    assert_eq!(count(&items, Category::Language, SelectionPhase::Quota), 2);
}

#[tokio::test]
async fn empty_query_uses_fallback_mix() {
    let engine = engine().await;
    let outcome = engine
        .recommend_detailed("", 10, true)
        .await
        .expect("engine accepts empty query");
    let plan = outcome.plan.expect("diversified");
    assert_eq!(plan.query.as_str(), "");
    assert!(!plan.signals.any());

    let items = outcome.items;
    assert_eq!(count(&items, Category::Coding, SelectionPhase::Quota), 3);
    assert_eq!(count(&items, Category::PersonalityBehavior, SelectionPhase::Quota), 3);
    assert_eq!(count(&items, Category::CognitiveAbility, SelectionPhase::Quota), 2);
    assert_eq!(count(&items, Category::KnowledgeSkills, SelectionPhase::Quota), 2);
}

#[tokio::test]
async fn relevance_only_is_sorted_pool_head() {
    let engine = engine().await;
    let plain = engine
        .recommend("Python and SQL data engineer", 5, false)
        .await
        .expect("recommend succeeds");
    assert_eq!(plain.len(), 5);
    assert!(plain.windows(2).all(|w| w[0].score >= w[1].score));

    let wide = engine
        .recommend("Python and SQL data engineer", 10, false)
        .await
        .expect("recommend succeeds");
    assert_eq!(&wide[..5], &plain[..]);
}

#[tokio::test]
async fn results_are_distinct_and_sized() {
    let engine = engine().await;
    for k in [1usize, 3, 10] {
        let items = engine
            .recommend("sales manager with finance background", k, true)
            .await
            .expect("recommend succeeds");
        assert_eq!(items.len(), k);
        let urls: HashSet<&str> = items.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls.len(), k);
    }

    let all = engine
        .recommend("anything at all", 100, true)
        .await
        .expect("k above catalog size");
    assert_eq!(all.len(), 35);
}

#[test]
fn front_ends_reject_blank_queries() {
    assert!(matches!(
        prepare_query(Some("  \n\t ")),
        Err(RecommendError::Input(_))
    ));
    assert!(matches!(prepare_query(None), Err(RecommendError::Input(_))));
    assert_eq!(
        prepare_query(Some("  Java   developer ")).unwrap().as_str(),
        "Java developer"
    );
}
