use super::{AssistError, AssistResult, Suggester, Suggestion};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

/// Default maximum number of suggestions returned.
const DEFAULT_LIMIT: usize = 5;

/// Suggests labels by matching input words against a keyword table
///
/// Each keyword maps to weighted labels. The input is lower-cased and split
/// on anything that is not alphanumeric; a label's score is the highest
/// weight any matched keyword gives it. Output is sorted by score, then by
/// label, and truncated to the limit.
#[derive(Debug, Clone)]
pub struct KeywordSuggester {
    table: HashMap<String, Vec<(String, f32)>>,
    limit: usize,
}

impl KeywordSuggester {
    /// Creates a suggester with an empty table
    pub fn new() -> Self {
        Self {
            table: HashMap::new(),
            limit: DEFAULT_LIMIT,
        }
    }

    /// Adds labels for a keyword
    pub fn with_keyword(mut self, keyword: &str, labels: &[(&str, f32)]) -> Self {
        self.table
            .entry(keyword.to_lowercase())
            .or_default()
            .extend(labels.iter().map(|(label, weight)| (label.to_string(), *weight)));
        self
    }

    /// Sets the maximum number of suggestions
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    fn rank(&self, input: &str) -> Vec<Suggestion> {
        let mut scores: HashMap<&str, f32> = HashMap::new();
        let lowered = input.to_lowercase();
        let words = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty());

        for word in words {
            for (label, weight) in self.table.get(word).into_iter().flatten() {
                let score = scores.entry(label.as_str()).or_insert(0.0);
                *score = score.max(*weight);
            }
        }

        let mut ranked: Vec<Suggestion> = scores
            .into_iter()
            .map(|(label, score)| Suggestion::new(label, score))
            .collect();
        ranked.sort_by(|a, b| {
            b.confidence
                .total_cmp(&a.confidence)
                .then_with(|| a.label.cmp(&b.label))
        });
        ranked.truncate(self.limit);
        ranked
    }
}

impl Default for KeywordSuggester {
    /// Production vocabulary for photo, video and review work
    fn default() -> Self {
        Self::new()
            .with_keyword("portrait", &[("people", 0.9), ("portrait", 0.95), ("studio", 0.6)])
            .with_keyword("product", &[("product", 0.95), ("ecommerce", 0.7), ("packshot", 0.6)])
            .with_keyword("studio", &[("studio", 0.9), ("controlled-light", 0.5)])
            .with_keyword("outdoor", &[("outdoor", 0.9), ("natural-light", 0.7)])
            .with_keyword("shoot", &[("photography", 0.6)])
            .with_keyword("footage", &[("video", 0.9), ("raw", 0.5)])
            .with_keyword("interview", &[("video", 0.8), ("people", 0.7), ("audio", 0.6)])
            .with_keyword("grade", &[("colour", 0.8), ("post-production", 0.7)])
            .with_keyword("retouch", &[("post-production", 0.85), ("retouching", 0.9)])
            .with_keyword("review", &[("feedback", 0.7), ("approval", 0.6)])
            .with_keyword("logo", &[("branding", 0.9), ("graphic", 0.6)])
    }
}

#[async_trait]
impl Suggester for KeywordSuggester {
    async fn suggest(&self, input: &str) -> AssistResult<Vec<Suggestion>> {
        if input.trim().is_empty() {
            return Err(AssistError::EmptyInput);
        }
        let ranked = self.rank(input);
        debug!(matches = ranked.len(), "keyword suggestions ranked");
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_input_is_rejected() {
        let suggester = KeywordSuggester::default();
        assert_eq!(
            suggester.suggest("   ").await.unwrap_err(),
            AssistError::EmptyInput
        );
    }

    #[tokio::test]
    async fn test_ranking_and_dedup() {
        let suggester = KeywordSuggester::new()
            .with_keyword("portrait", &[("people", 0.9), ("studio", 0.4)])
            .with_keyword("studio", &[("studio", 0.8)]);

        let labels: Vec<String> = suggester
            .suggest("Studio portrait, studio B")
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.label)
            .collect();
        assert_eq!(labels, vec!["people".to_string(), "studio".to_string()]);
    }

    #[tokio::test]
    async fn test_limit_truncates() {
        let suggester = KeywordSuggester::default().with_limit(2);
        let suggestions = suggester
            .suggest("portrait interview footage")
            .await
            .unwrap();
        assert_eq!(suggestions.len(), 2);
        assert!(suggestions[0].confidence >= suggestions[1].confidence);
    }

    #[tokio::test]
    async fn test_no_match_is_empty_not_error() {
        let suggester = KeywordSuggester::default();
        assert!(suggester.suggest("lunch order").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_usable_as_trait_object() {
        let suggester: Box<dyn Suggester> = Box::new(KeywordSuggester::default());
        assert!(!suggester.suggest("logo").await.unwrap().is_empty());
    }

    #[test]
    fn test_confidence_is_clamped() {
        assert_eq!(Suggestion::new("x", 1.7).confidence, 1.0);
        assert_eq!(Suggestion::new("x", -0.2).confidence, 0.0);
    }
}
