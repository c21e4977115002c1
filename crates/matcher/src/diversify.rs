//! Quota-aware selection over a relevance-ordered candidate pool.
//!
//! [`select`] runs two passes over the pool:
//!
//! 1. **Quota pass**: walk the pool in order and accept a candidate when its
//!    category has a target and fewer than that many of its category are
//!    already accepted. Stops as soon as `k` are accepted.
//! 2. **Fill pass**: walk the pool again from the top and append anything not
//!    yet accepted until `k` are accepted or the pool runs out.
//!
//! Fill entries are appended after quota entries, so the output is not
//! globally sorted by score. No catalog item is selected twice.
use std::collections::{BTreeMap, HashSet};

use ingest::{CatalogId, Category};

use crate::quota::QuotaMap;
use crate::types::{ScoredCandidate, Selection, SelectionPhase};

/// Picks up to `k` candidates from `pool` honouring `quotas`.
pub fn select<'a>(
    pool: &[ScoredCandidate<'a>],
    quotas: &QuotaMap,
    k: usize,
) -> Vec<Selection<'a>> {
    let mut picked = Vec::with_capacity(k.min(pool.len()));
    if k == 0 {
        return picked;
    }
    let mut taken: HashSet<CatalogId> = HashSet::with_capacity(pool.len());
    let mut counts: BTreeMap<Category, usize> = BTreeMap::new();

    for candidate in pool {
        let category = candidate.item.category;
        let Some(&target) = quotas.get(&category) else {
            continue;
        };
        let count = counts.entry(category).or_insert(0);
        if *count >= target || taken.contains(&candidate.item.id) {
            continue;
        }
        taken.insert(candidate.item.id);
        *count += 1;
        picked.push(Selection {
            candidate: *candidate,
            phase: SelectionPhase::Quota,
        });
        if picked.len() == k {
            return picked;
        }
    }

    for candidate in pool {
        if picked.len() == k {
            break;
        }
        if taken.insert(candidate.item.id) {
            picked.push(Selection {
                candidate: *candidate,
                phase: SelectionPhase::Fill,
            });
        }
    }
    picked
}

/// The first `k` distinct candidates of `pool`, in pool order.
pub fn top_k<'a>(pool: &[ScoredCandidate<'a>], k: usize) -> Vec<Selection<'a>> {
    let mut taken: HashSet<CatalogId> = HashSet::with_capacity(k);
    pool.iter()
        .filter(|candidate| taken.insert(candidate.item.id))
        .take(k)
        .map(|candidate| Selection {
            candidate: *candidate,
            phase: SelectionPhase::Relevance,
        })
        .collect()
}
