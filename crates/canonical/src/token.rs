use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

/// Splits text into lower-cased word terms.
///
/// Text is NFKC-normalized first so compatibility forms (full-width letters,
/// ligatures) map to the same term. Word boundaries follow UAX #29, which
/// drops punctuation-only segments.
pub fn terms(text: &str) -> Vec<String> {
    let folded: String = text.nfkc().collect::<String>().to_lowercase();
    folded.unicode_words().map(str::to_string).collect()
}
