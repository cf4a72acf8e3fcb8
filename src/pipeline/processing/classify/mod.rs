use tracing::trace;

use crate::config::{ClassifierConfig, KeywordRule};
use crate::domain::{Category, ClassificationResult, Confidence, ContactRow};

pub mod matcher;
pub mod website;

pub use matcher::{FuzzyMatcher, Keyword};
pub use website::extract_domain;

/// Score added for a matched HVAC phrase that names HVAC outright
const HVAC_MARKER_WEIGHT: f64 = 5.0;
/// Score added for a long, specific matched phrase
const LONG_PHRASE_WEIGHT: f64 = 3.0;
/// Score added for any other matched phrase
const SHORT_PHRASE_WEIGHT: f64 = 1.0;
/// Phrases longer than this many characters count as specific
const LONG_PHRASE_CHARS: usize = 15;

/// Trait for assigning a trade category to a contact row
pub trait Classifier {
    fn classify(&self, row: &ContactRow) -> ClassificationResult;
}

/// Non-target trade family, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeFamily {
    Plumbing,
    Electrical,
    OtherTrades,
}

impl TradeFamily {
    pub fn label(&self) -> &'static str {
        match self {
            TradeFamily::Plumbing => "plumbing",
            TradeFamily::Electrical => "electrical",
            TradeFamily::OtherTrades => "other trades",
        }
    }
}

/// Weighted keyword classifier. Stages run in a fixed order and the first one
/// that reaches a verdict wins:
///
/// 1. no-description branch (name and domain only)
/// 2. exclusion of non-HVAC trades
/// 3. HVAC keyword scoring
/// 4. weak-signal fallback
/// 5. default `Other`
pub struct RuleBasedClassifier {
    matcher: FuzzyMatcher,
    min_description_length: usize,
    no_description_threshold: f64,
    high_confidence_score: f64,
    medium_confidence_score: f64,
    generic_keyword_weight: f64,
    generic_fallback_min: f64,
    reason_keyword_limit: usize,
    no_description_rules: Vec<(Keyword, f64)>,
    exclusions: Vec<(TradeFamily, Vec<Keyword>)>,
    hvac_keywords: Vec<Keyword>,
    generic_keywords: Vec<Keyword>,
    tld_suffixes: Vec<String>,
}

fn keywords(phrases: &[String]) -> Vec<Keyword> {
    phrases.iter().map(|p| Keyword::new(p)).collect()
}

fn weighted(rules: &[KeywordRule]) -> Vec<(Keyword, f64)> {
    rules
        .iter()
        .map(|r| (Keyword::new(&r.phrase), r.weight))
        .collect()
}

/// Per-match HVAC score: outright HVAC mentions beat long phrases beat the rest.
pub fn hvac_phrase_weight(phrase: &str) -> f64 {
    if phrase.contains("hvac") {
        HVAC_MARKER_WEIGHT
    } else if phrase.chars().count() > LONG_PHRASE_CHARS {
        LONG_PHRASE_WEIGHT
    } else {
        SHORT_PHRASE_WEIGHT
    }
}

impl RuleBasedClassifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            matcher: FuzzyMatcher::new(config.fuzzy_threshold),
            min_description_length: config.min_description_length,
            no_description_threshold: config.no_description_threshold,
            high_confidence_score: config.high_confidence_score,
            medium_confidence_score: config.medium_confidence_score,
            generic_keyword_weight: config.generic_keyword_weight,
            generic_fallback_min: config.generic_fallback_min,
            reason_keyword_limit: config.reason_keyword_limit,
            no_description_rules: weighted(&config.no_description_rules),
            exclusions: vec![
                (TradeFamily::Plumbing, keywords(&config.exclusions.plumbing)),
                (TradeFamily::Electrical, keywords(&config.exclusions.electrical)),
                (TradeFamily::OtherTrades, keywords(&config.exclusions.other_trades)),
            ],
            hvac_keywords: keywords(&config.hvac_keywords),
            generic_keywords: keywords(&config.generic_keywords),
            tld_suffixes: config.tld_suffixes.clone(),
        }
    }

    pub fn matcher(&self) -> &FuzzyMatcher {
        &self.matcher
    }

    /// Classify from the three evidence strings directly.
    pub fn classify_text(
        &self,
        name: &str,
        description: &str,
        website: &str,
        source_row: usize,
    ) -> ClassificationResult {
        let verdict = |category, confidence, score, reason: String| ClassificationResult {
            category,
            reason,
            confidence,
            score,
            source_row,
        };

        let name = name.trim().to_lowercase();
        let description = description.trim().to_lowercase();
        let domain = extract_domain(website, &self.tld_suffixes);

        // Stage 1: too little description to read, judge by name and domain
        if description.chars().count() < self.min_description_length {
            let score = self.no_description_score(&name, &domain);
            trace!(row = source_row, score, "No-description branch");
            return if score >= self.no_description_threshold {
                verdict(Category::Hvac, Confidence::Low, score, "name suggests HVAC".to_string())
            } else {
                verdict(
                    Category::NoDescription,
                    Confidence::NotApplicable,
                    score,
                    "no description".to_string(),
                )
            };
        }

        let text = format!("{} {} {}", name, description, domain);

        // Stage 2: any non-HVAC trade wins over every HVAC signal
        if let Some((family, keyword)) = self.exclusion_match(&text) {
            trace!(row = source_row, family = family.label(), "Excluded");
            return verdict(
                Category::Other,
                Confidence::High,
                0.0,
                format!("excluded: {} ({})", family.label(), keyword.phrase),
            );
        }

        // Stage 3: HVAC keyword scoring
        let matched = self.matcher.all_matches(&text, &self.hvac_keywords);
        let score: f64 = matched.iter().map(|k| hvac_phrase_weight(&k.phrase)).sum();
        let listed = matched
            .iter()
            .take(self.reason_keyword_limit)
            .map(|k| k.phrase.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        if score >= self.high_confidence_score {
            return verdict(Category::Hvac, Confidence::High, score, format!("HVAC keywords: {}", listed));
        }
        if score >= self.medium_confidence_score {
            return verdict(Category::Hvac, Confidence::Medium, score, format!("HVAC keywords: {}", listed));
        }

        // Stage 4: a lone weak HVAC match backed by generic trade vocabulary
        let generic = self.generic_score(&text);
        if generic >= self.generic_fallback_min && !matched.is_empty() {
            return verdict(
                Category::Hvac,
                Confidence::Low,
                score,
                format!("weak HVAC signal: {} with generic terms", listed),
            );
        }

        // Stage 5
        let reason = if matched.is_empty() {
            "no HVAC keywords found".to_string()
        } else {
            format!("insufficient HVAC evidence: {}", listed)
        };
        verdict(Category::Other, Confidence::High, score, reason)
    }

    /// Sum of no-description rule weights whose phrase appears in the name or
    /// the domain. Plain substring, no variants.
    pub fn no_description_score(&self, name: &str, domain: &str) -> f64 {
        self.no_description_rules
            .iter()
            .filter(|(k, _)| k.appears_in(name) || (!domain.is_empty() && k.appears_in(domain)))
            .map(|(_, weight)| weight)
            .sum()
    }

    /// First exclusion keyword that matches, checking families in precedence order.
    pub fn exclusion_match(&self, text: &str) -> Option<(TradeFamily, &Keyword)> {
        self.exclusions.iter().find_map(|(family, list)| {
            self.matcher
                .first_match(text, list)
                .map(|keyword| (*family, keyword))
        })
    }

    /// Generic keyword weight present in `text`. Plain substring, no variants.
    pub fn generic_score(&self, text: &str) -> f64 {
        let count = self
            .generic_keywords
            .iter()
            .filter(|k| k.appears_in(text))
            .count();
        count as f64 * self.generic_keyword_weight
    }
}

impl Classifier for RuleBasedClassifier {
    fn classify(&self, row: &ContactRow) -> ClassificationResult {
        self.classify_text(&row.organization, &row.description, &row.website, row.source_row)
    }
}
