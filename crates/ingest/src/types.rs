//! Core catalog data types.
//!
//! A catalog is a list of [`CatalogItem`]s. Each item is identified by its
//! [`CatalogId`], the row position it received after cleaning. Vector
//! indexes store the same position, so an index hit maps straight back to
//! the item.
use std::fmt;

use serde::{Deserialize, Serialize};

/// Assessment category.
///
/// The set is closed: labels that do not match one of the named variants
/// parse to [`Category::Other`]. The serialized form is the human label
/// (`"Knowledge & Skills"`, `"Domain-Specific"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Coding,
    KnowledgeSkills,
    PersonalityBehavior,
    CognitiveAbility,
    Language,
    DomainSpecific,
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Coding,
        Category::KnowledgeSkills,
        Category::PersonalityBehavior,
        Category::CognitiveAbility,
        Category::Language,
        Category::DomainSpecific,
        Category::Other,
    ];

    /// The canonical display label.
    pub fn label(self) -> &'static str {
        match self {
            Category::Coding => "Coding",
            Category::KnowledgeSkills => "Knowledge & Skills",
            Category::PersonalityBehavior => "Personality & Behavior",
            Category::CognitiveAbility => "Cognitive Ability",
            Category::Language => "Language",
            Category::DomainSpecific => "Domain-Specific",
            Category::Other => "Other",
        }
    }

    /// Parses a catalog label.
    ///
    /// Matching ignores case and whitespace, so `"knowledge&skills"` and
    /// `" Knowledge  & Skills "` both map to [`Category::KnowledgeSkills`].
    /// The British spelling "Behaviour" is accepted. Anything else is
    /// [`Category::Other`].
    pub fn from_label(label: &str) -> Category {
        let key: String = label
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "coding" => Category::Coding,
            "knowledge&skills" | "knowledgeandskills" => Category::KnowledgeSkills,
            "personality&behavior"
            | "personality&behaviour"
            | "personalityandbehavior"
            | "personalityandbehaviour" => Category::PersonalityBehavior,
            "cognitiveability" => Category::CognitiveAbility,
            "language" => Category::Language,
            "domain-specific" | "domainspecific" => Category::DomainSpecific,
            _ => Category::Other,
        }
    }

    /// Guesses a category from free text (name plus description) for rows
    /// that arrive without one. The first category with a matching keyword
    /// wins; no match yields [`Category::Other`].
    pub fn infer_from_text(text: &str) -> Category {
        const RULES: [(Category, &[&str]); 6] = [
            (
                Category::Coding,
                &["coding", "developer", "programming", "java", "python", "sql"],
            ),
            (
                Category::KnowledgeSkills,
                &["skills", "knowledge", "competency", "expertise"],
            ),
            (
                Category::PersonalityBehavior,
                &[
                    "personality",
                    "behavior",
                    "collaboration",
                    "team",
                    "communication",
                    "leadership",
                ],
            ),
            (
                Category::CognitiveAbility,
                &["reasoning", "analytical", "problem solving", "aptitude", "logic"],
            ),
            (
                Category::Language,
                &["english", "verbal", "writing", "language"],
            ),
            (
                Category::DomainSpecific,
                &["finance", "sales", "marketing", "hr", "support"],
            ),
        ];

        let lowered = text.to_lowercase();
        RULES
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|kw| lowered.contains(kw)))
            .map(|(category, _)| *category)
            .unwrap_or(Category::Other)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for Category {
    fn from(label: String) -> Self {
        Category::from_label(&label)
    }
}

impl From<&str> for Category {
    fn from(label: &str) -> Self {
        Category::from_label(label)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.label().to_string()
    }
}

/// Stable identity of a catalog item: its row position in the cleaned
/// catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogId(pub usize);

impl CatalogId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for CatalogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One assessment in the catalog. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: CatalogId,
    pub name: String,
    pub url: String,
    pub category: Category,
    pub description: String,
}

impl CatalogItem {
    /// Text fed to the embedder when indexing: name, category label and
    /// description separated by single spaces.
    pub fn embedding_text(&self) -> String {
        let mut text = String::with_capacity(
            self.name.len() + self.description.len() + self.category.label().len() + 2,
        );
        text.push_str(&self.name);
        text.push(' ');
        text.push_str(self.category.label());
        if !self.description.is_empty() {
            text.push(' ');
            text.push_str(&self.description);
        }
        text
    }
}

/// A catalog row as read from CSV, before cleaning. Every column is optional
/// here; cleaning decides which rows survive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCatalogRecord {
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "URL", default)]
    pub url: Option<String>,
    #[serde(rename = "Category", default)]
    pub category: Option<String>,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
}

impl RawCatalogRecord {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            url: Some(url.into()),
            category: Some(category.into()),
            description: Some(description.into()),
        }
    }
}
