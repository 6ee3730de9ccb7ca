//! Plain-English explanations of a condition list.

use crate::condition::Condition;
use crate::vocabulary::Vocabulary;
use tracing::trace;

/// Returned when no condition has a value yet
pub const EXPLANATION_PLACEHOLDER: &str = "Start building your filter by selecting criteria above";

#[derive(Debug, Clone, Copy)]
pub struct Explainer<'v> {
    vocabulary: &'v Vocabulary,
}

impl Explainer<'static> {
    pub fn new() -> Self {
        Self::with_vocabulary(Vocabulary::shared())
    }
}

impl Default for Explainer<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'v> Explainer<'v> {
    pub fn with_vocabulary(vocabulary: &'v Vocabulary) -> Self {
        Self { vocabulary }
    }

    /// Describe one condition.
    ///
    /// An unset condition reads as an unfinished prompt: `Looking for issues where status exactly
    /// matches...`. List values are split on commas, trimmed and joined with " or ".
    pub fn explain(&self, condition: &Condition) -> String {
        let verb = self.vocabulary.describe(condition.operator);

        if !condition.is_set() {
            return format!("Looking for issues where {} {}...", condition.field, verb);
        }

        let value = if condition.operator.is_list() {
            condition
                .value
                .split(',')
                .map(str::trim)
                .collect::<Vec<_>>()
                .join(" or ")
        } else {
            condition.value.clone()
        };

        if self.vocabulary.is_date(condition.field) {
            format!("{} date {} {}", condition.field, verb, value)
        } else {
            format!("{} {} {}", condition.field, verb, value)
        }
    }

    /// Describe the whole list as one sentence.
    ///
    /// Unset conditions are dropped first, so unlike the compiled query the first surviving
    /// condition always opens the sentence.
    pub fn combined(&self, conditions: &[Condition]) -> String {
        if !conditions.iter().any(Condition::is_set) {
            return EXPLANATION_PLACEHOLDER.to_string();
        }

        let sentence = conditions
            .iter()
            .filter(|c| c.is_set())
            .enumerate()
            .map(|(index, condition)| {
                let explanation = self.explain(condition);
                if index == 0 {
                    format!("Find issues where {}", explanation)
                } else {
                    format!("{} {}", condition.conjunction.as_prose(), explanation)
                }
            })
            .collect::<Vec<_>>()
            .join(" ");

        trace!(conditions = conditions.len(), "built explanation");
        sentence
    }
}
