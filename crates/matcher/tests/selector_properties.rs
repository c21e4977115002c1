use std::collections::{BTreeMap, HashSet};

use ingest::{CatalogId, CatalogItem, Category};
use matcher::diversify::{select, top_k};
use matcher::{QuotaMap, ScoredCandidate, SelectionPhase};
use proptest::prelude::*;

fn category_strategy() -> impl Strategy<Value = Category> {
    prop::sample::select(Category::ALL.to_vec())
}

fn items_strategy() -> impl Strategy<Value = Vec<CatalogItem>> {
    prop::collection::vec(category_strategy(), 0..40).prop_map(|categories| {
        categories
            .into_iter()
            .enumerate()
            .map(|(i, category)| CatalogItem {
                id: CatalogId(i),
                name: format!("item-{i}"),
                url: format!("https://catalog.test/{i}"),
                category,
                description: String::new(),
            })
            .collect()
    })
}

fn quota_strategy() -> impl Strategy<Value = QuotaMap> {
    prop::collection::btree_map(category_strategy(), 0usize..6, 0..5)
}

/// Pool sorted by descending score, as the retriever produces it.
fn pool(items: &[CatalogItem]) -> Vec<ScoredCandidate<'_>> {
    let n = items.len().max(1) as f32;
    items
        .iter()
        .enumerate()
        .map(|(rank, item)| ScoredCandidate {
            item,
            score: 1.0 - rank as f32 / n,
        })
        .collect()
}

proptest! {
    #[test]
    fn output_is_min_of_k_and_pool(items in items_strategy(), quotas in quota_strategy(), k in 0usize..20) {
        let candidates = pool(&items);
        let picked = select(&candidates, &quotas, k);
        prop_assert_eq!(picked.len(), k.min(items.len()));

        let ids: HashSet<CatalogId> = picked.iter().map(|s| s.candidate.item.id).collect();
        prop_assert_eq!(ids.len(), picked.len());
    }

    #[test]
    fn quota_entries_respect_targets_and_lead(items in items_strategy(), quotas in quota_strategy(), k in 0usize..20) {
        let candidates = pool(&items);
        let picked = select(&candidates, &quotas, k);

        let mut counts: BTreeMap<Category, usize> = BTreeMap::new();
        for s in picked.iter().filter(|s| s.phase == SelectionPhase::Quota) {
            *counts.entry(s.candidate.item.category).or_default() += 1;
        }
        for (category, count) in counts {
            prop_assert!(count <= quotas.get(&category).copied().unwrap_or(0));
        }

        let first_fill = picked.iter().position(|s| s.phase == SelectionPhase::Fill);
        if let Some(first_fill) = first_fill {
            prop_assert!(picked[first_fill..].iter().all(|s| s.phase == SelectionPhase::Fill));
        }
    }

    #[test]
    fn quota_entries_reach_min_of_target_and_eligible(
        items in items_strategy(),
        quotas in quota_strategy(),
        slack in 0usize..6,
    ) {
        let candidates = pool(&items);
        let reachable = |category: &Category, target: usize| {
            target.min(items.iter().filter(|item| item.category == *category).count())
        };
        let k = quotas.iter().map(|(c, &t)| reachable(c, t)).sum::<usize>() + slack;
        let picked = select(&candidates, &quotas, k);

        for (category, &target) in &quotas {
            let count = picked
                .iter()
                .filter(|s| s.phase == SelectionPhase::Quota && s.candidate.item.category == *category)
                .count();
            prop_assert_eq!(count, reachable(category, target));
        }
    }

    #[test]
    fn each_phase_keeps_pool_order(items in items_strategy(), quotas in quota_strategy(), k in 0usize..20) {
        let candidates = pool(&items);
        let picked = select(&candidates, &quotas, k);
        for phase in [SelectionPhase::Quota, SelectionPhase::Fill] {
            let scores: Vec<f32> = picked
                .iter()
                .filter(|s| s.phase == phase)
                .map(|s| s.candidate.score)
                .collect();
            prop_assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        }
    }

    #[test]
    fn empty_quotas_degrade_to_top_k(items in items_strategy(), k in 0usize..20) {
        let candidates = pool(&items);
        let picked: Vec<CatalogId> = select(&candidates, &QuotaMap::new(), k)
            .iter()
            .map(|s| s.candidate.item.id)
            .collect();
        let head: Vec<CatalogId> = top_k(&candidates, k)
            .iter()
            .map(|s| s.candidate.item.id)
            .collect();
        prop_assert_eq!(picked, head);
    }
}
