/// Morphological variants of a lowercase keyword phrase: a plural/singular
/// toggle, plus hyphen/space/concatenated forms when the phrase has a hyphen
/// or a space. Empty variants are dropped.
pub fn variations(phrase: &str) -> Vec<String> {
    let mut out = Vec::new();

    match phrase.strip_suffix('s') {
        Some(singular) => out.push(singular.to_string()),
        None => out.push(format!("{}s", phrase)),
    }

    if phrase.contains('-') {
        out.push(phrase.replace('-', " "));
        out.push(phrase.replace('-', ""));
    }
    if phrase.contains(' ') {
        out.push(phrase.replace(' ', "-"));
        out.push(phrase.replace(' ', ""));
    }

    out.retain(|v| !v.is_empty() && v != phrase);
    out.dedup();
    out
}

/// A keyword prepared for matching: lowercased once, variants precomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
    pub phrase: String,
    variants: Vec<String>,
}

impl Keyword {
    pub fn new(phrase: &str) -> Self {
        let phrase = phrase.trim().to_lowercase();
        let variants = variations(&phrase);
        Self { phrase, variants }
    }

    /// Plain substring test against already-lowercased text.
    pub fn appears_in(&self, text: &str) -> bool {
        text.contains(self.phrase.as_str())
    }

    /// Substring test that also accepts any precomputed variant.
    pub fn fuzzy_appears_in(&self, text: &str) -> bool {
        self.appears_in(text) || self.variants.iter().any(|v| text.contains(v.as_str()))
    }
}

/// Fixed-variant keyword matcher.
///
/// The similarity threshold is carried from configuration but matching never
/// consults it: a keyword matches when it, or one of its fixed variants, is a
/// substring of the text.
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    threshold: f64,
}

impl FuzzyMatcher {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn matches(&self, text: &str, keyword: &Keyword) -> bool {
        keyword.fuzzy_appears_in(text)
    }

    /// First keyword of `keywords` that matches `text`, in list order.
    pub fn first_match<'k>(&self, text: &str, keywords: &'k [Keyword]) -> Option<&'k Keyword> {
        keywords.iter().find(|k| self.matches(text, k))
    }

    /// Every keyword of `keywords` that matches `text`, in list order.
    pub fn all_matches<'k>(&self, text: &str, keywords: &'k [Keyword]) -> Vec<&'k Keyword> {
        keywords.iter().filter(|k| self.matches(text, k)).collect()
    }
}
