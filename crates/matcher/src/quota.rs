//! Turns intent signals into per-category targets.
//!
//! Planning is a fixed list of [`QuotaRule`]s applied in order. A rule fires
//! when its intent is set; it either overwrites the category target or, for
//! `only_if_unset` rules, leaves an existing target alone. When no rule
//! fires the planner returns its fallback map.
use std::collections::BTreeMap;

use ingest::Category;

use crate::intent::{Intent, IntentSignals};

/// Category → number of items the selector should try to take from it.
/// Categories absent from the map get no quota.
pub type QuotaMap = BTreeMap<Category, usize>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaRule {
    pub intent: Intent,
    pub category: Category,
    pub target: usize,
    /// Keep a target that an earlier rule already set.
    pub only_if_unset: bool,
}

impl QuotaRule {
    pub const fn set(intent: Intent, category: Category, target: usize) -> Self {
        Self {
            intent,
            category,
            target,
            only_if_unset: false,
        }
    }

    pub const fn set_if_unset(intent: Intent, category: Category, target: usize) -> Self {
        Self {
            intent,
            category,
            target,
            only_if_unset: true,
        }
    }
}

const DEFAULT_RULES: [QuotaRule; 6] = [
    QuotaRule::set(Intent::Technical, Category::Coding, 4),
    QuotaRule::set_if_unset(Intent::Technical, Category::KnowledgeSkills, 2),
    QuotaRule::set(Intent::Behavioral, Category::PersonalityBehavior, 3),
    QuotaRule::set(Intent::Cognitive, Category::CognitiveAbility, 3),
    QuotaRule::set(Intent::Language, Category::Language, 2),
    QuotaRule::set(Intent::Domain, Category::DomainSpecific, 2),
];

const DEFAULT_FALLBACK: [(Category, usize); 4] = [
    (Category::Coding, 3),
    (Category::PersonalityBehavior, 3),
    (Category::CognitiveAbility, 2),
    (Category::KnowledgeSkills, 2),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaPlanner {
    rules: Vec<QuotaRule>,
    fallback: QuotaMap,
}

impl Default for QuotaPlanner {
    fn default() -> Self {
        Self::new(DEFAULT_RULES.to_vec(), DEFAULT_FALLBACK.into_iter().collect())
    }
}

impl QuotaPlanner {
    pub fn new(rules: Vec<QuotaRule>, fallback: QuotaMap) -> Self {
        Self { rules, fallback }
    }

    pub fn with_fallback(mut self, fallback: QuotaMap) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn rules(&self) -> &[QuotaRule] {
        &self.rules
    }

    pub fn fallback(&self) -> &QuotaMap {
        &self.fallback
    }

    /// Builds the quota map for `signals`.
    pub fn plan(&self, signals: &IntentSignals) -> QuotaMap {
        let mut quotas = QuotaMap::new();
        for rule in self.rules.iter().filter(|r| signals.get(r.intent)) {
            if rule.only_if_unset {
                quotas.entry(rule.category).or_insert(rule.target);
            } else {
                quotas.insert(rule.category, rule.target);
            }
        }
        if quotas.is_empty() {
            return self.fallback.clone();
        }
        quotas
    }
}
