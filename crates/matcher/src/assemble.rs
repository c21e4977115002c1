use crate::types::{Recommendation, Selection};

/// Maps selections to output records, keeping selector order and
/// truncating to `k`.
pub fn assemble(selections: &[Selection<'_>], k: usize) -> Vec<Recommendation> {
    selections
        .iter()
        .take(k)
        .map(|selection| {
            let item = selection.candidate.item;
            Recommendation {
                id: item.id,
                name: item.name.clone(),
                url: item.url.clone(),
                category: item.category,
                score: selection.candidate.score,
                phase: selection.phase,
            }
        })
        .collect()
}
