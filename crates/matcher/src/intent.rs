//! Query intent detection.
//!
//! The engine only needs five yes/no signals. The default
//! [`KeywordIntentClassifier`] lower-cases the query and checks each intent's
//! keyword list for a plain substring hit, so `"collaborat"` matches both
//! "collaborate" and "collaboration". Short keywords match inside longer
//! words too ("hr" fires on "three"); that behaviour is kept on purpose so
//! results stay comparable with the tuned keyword lists.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One of the intents a query can express.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Technical,
    Behavioral,
    Cognitive,
    Language,
    Domain,
}

impl Intent {
    pub const ALL: [Intent; 5] = [
        Intent::Technical,
        Intent::Behavioral,
        Intent::Cognitive,
        Intent::Language,
        Intent::Domain,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Intent::Technical => "technical",
            Intent::Behavioral => "behavioral",
            Intent::Cognitive => "cognitive",
            Intent::Language => "language",
            Intent::Domain => "domain",
        }
    }
}

/// Five independent intent flags. Any combination may be set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntentSignals {
    pub technical: bool,
    pub behavioral: bool,
    pub cognitive: bool,
    pub language: bool,
    pub domain: bool,
}

impl IntentSignals {
    pub fn get(&self, intent: Intent) -> bool {
        match intent {
            Intent::Technical => self.technical,
            Intent::Behavioral => self.behavioral,
            Intent::Cognitive => self.cognitive,
            Intent::Language => self.language,
            Intent::Domain => self.domain,
        }
    }

    pub fn set(&mut self, intent: Intent, value: bool) {
        let flag = match intent {
            Intent::Technical => &mut self.technical,
            Intent::Behavioral => &mut self.behavioral,
            Intent::Cognitive => &mut self.cognitive,
            Intent::Language => &mut self.language,
            Intent::Domain => &mut self.domain,
        };
        *flag = value;
    }

    pub fn any(&self) -> bool {
        Intent::ALL.iter().any(|intent| self.get(*intent))
    }

    /// Set intents in declaration order.
    pub fn active(&self) -> impl Iterator<Item = Intent> + '_ {
        Intent::ALL.into_iter().filter(|intent| self.get(*intent))
    }
}

/// Maps query text to [`IntentSignals`]. Never fails.
pub trait IntentClassifier: Send + Sync {
    fn classify(&self, text: &str) -> IntentSignals;
}

/// Substring keyword classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordIntentClassifier {
    keywords: BTreeMap<Intent, Vec<String>>,
}

impl Default for KeywordIntentClassifier {
    fn default() -> Self {
        let defaults: [(Intent, &[&str]); 5] = [
            (
                Intent::Technical,
                &[
                    "developer", "engineer", "coding", "java", "python", "sql", "data", "cloud",
                ],
            ),
            (
                Intent::Behavioral,
                &[
                    "collaborat",
                    "team",
                    "communication",
                    "stakeholder",
                    "leadership",
                    "culture",
                ],
            ),
            (
                Intent::Cognitive,
                &["reasoning", "analytical", "problem solving", "aptitude"],
            ),
            (Intent::Language, &["english", "verbal", "writing"]),
            (
                Intent::Domain,
                &["finance", "sales", "marketing", "hr", "support"],
            ),
        ];
        defaults
            .into_iter()
            .fold(Self::empty(), |classifier, (intent, words)| {
                classifier.with_keywords(intent, words.iter().copied())
            })
    }
}

impl KeywordIntentClassifier {
    /// A classifier with no keywords; every query classifies as all-false.
    pub fn empty() -> Self {
        Self {
            keywords: BTreeMap::new(),
        }
    }

    /// Replaces the keyword list for `intent`. Keywords are lower-cased and
    /// blank entries dropped.
    pub fn with_keywords<I, S>(mut self, intent: Intent, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<String> = keywords
            .into_iter()
            .map(|kw| kw.as_ref().trim().to_lowercase())
            .filter(|kw| !kw.is_empty())
            .collect();
        self.keywords.insert(intent, words);
        self
    }

    pub fn keywords(&self, intent: Intent) -> &[String] {
        self.keywords.get(&intent).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl IntentClassifier for KeywordIntentClassifier {
    fn classify(&self, text: &str) -> IntentSignals {
        let lowered = text.to_lowercase();
        let mut signals = IntentSignals::default();
        for (intent, words) in &self.keywords {
            if words.iter().any(|kw| lowered.contains(kw.as_str())) {
                signals.set(*intent, true);
            }
        }
        signals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> IntentSignals {
        KeywordIntentClassifier::default().classify(text)
    }

    #[test]
    fn technical_only_query() {
        let s = classify("Java developer with strong coding skills");
        assert!(s.technical);
        assert!(!s.behavioral && !s.cognitive && !s.language && !s.domain);
    }

    #[test]
    fn signals_are_independent() {
        let s = classify("Python engineer who collaborates with stakeholders and writes well in English");
        assert!(s.technical);
        assert!(s.behavioral);
        assert!(s.language);
        assert!(!s.cognitive);
        assert_eq!(
            s.active().collect::<Vec<_>>(),
            vec![Intent::Technical, Intent::Behavioral, Intent::Language]
        );
    }

    #[test]
    fn matching_ignores_case() {
        assert!(classify("ANALYTICAL thinker").cognitive);
        assert!(classify("Problem Solving ability").cognitive);
    }

    #[test]
    fn substring_matches_inside_words() {
        assert!(classify("Collaboration matters").behavioral);
        assert!(classify("three openings").domain);
        assert!(classify("database admin").technical);
    }

    #[test]
    fn empty_text_has_no_signals() {
        let s = classify("");
        assert_eq!(s, IntentSignals::default());
        assert!(!s.any());
    }

    #[test]
    fn keyword_override_replaces_list() {
        let classifier = KeywordIntentClassifier::default()
            .with_keywords(Intent::Language, ["spanish", "  ", "French"]);
        assert_eq!(classifier.keywords(Intent::Language), ["spanish", "french"]);
        assert!(classifier.classify("Fluent French").language);
        assert!(!classifier.classify("English writing").language);
    }

    #[test]
    fn empty_classifier_never_fires() {
        let classifier = KeywordIntentClassifier::empty();
        assert!(!classifier.classify("java sql team english sales").any());
    }

    #[test]
    fn set_and_get_round_trip() {
        let mut s = IntentSignals::default();
        for intent in Intent::ALL {
            s.set(intent, true);
            assert!(s.get(intent));
        }
        assert!(s.any());
    }
}
