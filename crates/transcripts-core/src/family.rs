//! Model family assignment
//!
//! Families are resolved by an ordered rule list: the first rule whose
//! pattern matches the model identifier (case-insensitively) wins. A
//! catch-all "Other" rule always closes the list, so every model lands in
//! exactly one family.

use indexmap::IndexMap;
use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::config::FamilyRuleConfig;
use crate::error::{ArchiveError, Result};

/// Label of the catch-all family
pub const OTHER: &str = "Other";

/// Built-in rules in evaluation order, as `(label, pattern)`
pub const DEFAULT_RULES: &[(&str, &str)] = &[
    ("Claude", "claude"),
    ("GPT", "gpt"),
    ("Gemini", "gemini"),
    ("DeepSeek", "deepseek"),
    ("Llama", "llama"),
    ("Qwen", "qwen"),
    ("Command", "command"),
    ("GLM", "glm"),
    ("Grok", "grok"),
    ("Mistral", "mistral"),
    ("Phi", "phi"),
    ("Hermes", "hermes"),
    ("Cogito", "cogito"),
    ("MiniMax", "minimax"),
    ("ERNIE", "ernie"),
    ("Kimi", "kimi"),
    ("Ring", "ring"),
];

/// Models grouped under one family
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelFamily {
    pub models: Vec<String>,
    /// Sum of the member models' conversation counts
    pub count: u64,
}

#[derive(Debug, Clone)]
struct FamilyRule {
    label: String,
    pattern: Regex,
}

/// Ordered first-match-wins family rules
#[derive(Debug, Clone)]
pub struct FamilyRules {
    rules: Vec<FamilyRule>,
}

impl FamilyRules {
    /// Build rules from `(label, pattern)` pairs. A catch-all "Other" rule
    /// is always appended last.
    pub fn new<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<Self> {
        let mut rules = Vec::new();
        for (label, pattern) in pairs {
            let regex = RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|e| {
                    ArchiveError::invalid_value(
                        "family pattern",
                        format!("{} ({}): {}", pattern, label, e),
                    )
                })?;
            rules.push(FamilyRule {
                label: label.to_string(),
                pattern: regex,
            });
        }

        rules.push(FamilyRule {
            label: OTHER.to_string(),
            pattern: Regex::new("").map_err(|e| ArchiveError::Other(e.to_string()))?,
        });

        Ok(FamilyRules { rules })
    }

    /// The built-in rule list
    pub fn builtin() -> Result<Self> {
        Self::new(DEFAULT_RULES.iter().copied())
    }

    /// Rules from configuration, or the built-in list when none are configured
    pub fn from_config(config: &[FamilyRuleConfig]) -> Result<Self> {
        if config.is_empty() {
            return Self::builtin();
        }
        Self::new(
            config
                .iter()
                .map(|r| (r.label.as_str(), r.pattern.as_str())),
        )
    }

    /// Family label for a model identifier
    pub fn resolve(&self, model: &str) -> &str {
        self.rules
            .iter()
            .find(|rule| rule.pattern.is_match(model))
            .map(|rule| rule.label.as_str())
            .unwrap_or(OTHER)
    }

    /// Group `(model, count)` pairs into families.
    ///
    /// Families come out in rule order; empty families are omitted.
    pub fn categorize<'a>(
        &self,
        models: impl IntoIterator<Item = (&'a str, u64)>,
    ) -> IndexMap<String, ModelFamily> {
        let mut buckets: Vec<ModelFamily> = self
            .rules
            .iter()
            .map(|_| ModelFamily {
                models: Vec::new(),
                count: 0,
            })
            .collect();

        for (model, count) in models {
            let slot = self
                .rules
                .iter()
                .position(|rule| rule.pattern.is_match(model));
            match slot {
                Some(slot) => {
                    buckets[slot].models.push(model.to_string());
                    buckets[slot].count += count;
                }
                None => tracing::warn!(model, "no family rule matched"),
            }
        }

        self.rules
            .iter()
            .zip(buckets)
            .filter(|(_, family)| !family.models.is_empty())
            .fold(IndexMap::new(), |mut families, (rule, family)| {
                // Repeated labels (including an explicit "Other") merge
                let entry = families
                    .entry(rule.label.clone())
                    .or_insert_with(|| ModelFamily {
                        models: Vec::new(),
                        count: 0,
                    });
                entry.models.extend(family.models);
                entry.count += family.count;
                families
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin() -> FamilyRules {
        FamilyRules::builtin().unwrap()
    }

    #[test]
    fn test_case_insensitive_match() {
        let rules = builtin();
        assert_eq!(rules.resolve("anthropic/Claude-3.7"), "Claude");
        assert_eq!(rules.resolve("openai/GPT-4o"), "GPT");
        assert_eq!(rules.resolve("z-ai/GLM-4.5"), "GLM");
    }

    #[test]
    fn test_llama_precedes_hermes() {
        assert_eq!(builtin().resolve("nous-hermes-llama-3"), "Llama");
        assert_eq!(builtin().resolve("nousresearch/hermes-4-405b"), "Hermes");
    }

    #[test]
    fn test_unmatched_model_is_other() {
        assert_eq!(builtin().resolve("acme/frobnicator"), OTHER);
    }

    #[test]
    fn test_categorize_totality_and_counts() {
        let rules = builtin();
        let models = [
            ("anthropic/claude-3.7", 4),
            ("anthropic/claude-opus-4", 2),
            ("openai/gpt-4", 3),
            ("acme/frobnicator", 1),
            ("nous-hermes-llama-3", 5),
        ];
        let families = rules.categorize(models.iter().map(|(m, c)| (*m, *c)));

        let labels: Vec<_> = families.keys().cloned().collect();
        assert_eq!(labels, vec!["Claude", "GPT", "Llama", "Other"]);
        assert_eq!(families["Claude"].count, 6);
        assert_eq!(
            families["Claude"].models,
            vec!["anthropic/claude-3.7", "anthropic/claude-opus-4"]
        );

        let total: u64 = families.values().map(|f| f.count).sum();
        assert_eq!(total, 15);
        let placed: usize = families.values().map(|f| f.models.len()).sum();
        assert_eq!(placed, models.len());
    }

    #[test]
    fn test_empty_input_has_no_families() {
        assert!(builtin().categorize(std::iter::empty()).is_empty());
    }

    #[test]
    fn test_configured_order_is_respected() {
        let config = vec![
            FamilyRuleConfig {
                label: "Hermes".into(),
                pattern: "hermes".into(),
            },
            FamilyRuleConfig {
                label: "Llama".into(),
                pattern: "llama".into(),
            },
        ];
        let rules = FamilyRules::from_config(&config).unwrap();
        assert_eq!(rules.resolve("nous-hermes-llama-3"), "Hermes");
        assert_eq!(rules.resolve("anthropic/claude-3.7"), OTHER);
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let err = FamilyRules::new([("Broken", "(unclosed")]).unwrap_err();
        assert_eq!(err.error_type(), "invalid_value");
    }
}
