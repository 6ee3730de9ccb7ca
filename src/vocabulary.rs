//! Lookup tables shared by the query compiler and the explainer.

use crate::condition::{Field, Operator};
use crate::config::ConfigError;
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, BTreeSet};

static STANDARD: Lazy<Vocabulary> = Lazy::new(Vocabulary::standard);

/// Operator phrasing plus the field sets that change how values are rendered.
///
/// A `Vocabulary` always carries a description for every operator; the only ways to obtain one are
/// [`Vocabulary::standard`] and the validating [`Vocabulary::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    descriptions: BTreeMap<Operator, String>,
    /// Fields whose values are wrapped in double quotes
    quoted_fields: BTreeSet<Field>,
    /// Fields phrased as "<field> date ..." in explanations
    date_fields: BTreeSet<Field>,
}

impl Vocabulary {
    pub fn new(
        descriptions: BTreeMap<Operator, String>,
        quoted_fields: BTreeSet<Field>,
        date_fields: BTreeSet<Field>,
    ) -> Result<Self, ConfigError> {
        let missing: Vec<&str> = Operator::ALL
            .iter()
            .filter(|op| descriptions.get(op).map_or(true, |d| d.trim().is_empty()))
            .map(|op| op.symbol())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingDescriptions(missing.join(", ")));
        }

        Ok(Self {
            descriptions,
            quoted_fields,
            date_fields,
        })
    }

    /// The built-in tables.
    pub fn standard() -> Self {
        let descriptions = Operator::ALL
            .iter()
            .map(|op| (*op, standard_description(*op).to_string()))
            .collect();

        let quoted_fields = [
            Field::Project,
            Field::IssueType,
            Field::Status,
            Field::Priority,
            Field::Assignee,
            Field::Reporter,
            Field::Labels,
            Field::Component,
            Field::FixVersion,
        ]
        .into_iter()
        .collect();

        let date_fields = [Field::Created, Field::Updated, Field::DueDate]
            .into_iter()
            .collect();

        Self {
            descriptions,
            quoted_fields,
            date_fields,
        }
    }

    /// Shared instance of [`Vocabulary::standard`].
    pub fn shared() -> &'static Vocabulary {
        &STANDARD
    }

    /// English verb phrase for an operator, e.g. "is on or after" for `>=`.
    pub fn describe(&self, op: Operator) -> &str {
        self.descriptions
            .get(&op)
            .map(String::as_str)
            .unwrap_or_else(|| op.symbol())
    }

    pub fn is_quoted(&self, field: Field) -> bool {
        self.quoted_fields.contains(&field)
    }

    pub fn is_date(&self, field: Field) -> bool {
        self.date_fields.contains(&field)
    }

    pub fn descriptions(&self) -> &BTreeMap<Operator, String> {
        &self.descriptions
    }

    pub fn quoted_fields(&self) -> &BTreeSet<Field> {
        &self.quoted_fields
    }

    pub fn date_fields(&self) -> &BTreeSet<Field> {
        &self.date_fields
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_description(op: Operator) -> &'static str {
    match op {
        Operator::Eq => "exactly matches",
        Operator::NotEq => "does not match",
        Operator::Gt => "is after",
        Operator::Gte => "is on or after",
        Operator::Lt => "is before",
        Operator::Lte => "is on or before",
        Operator::In => "is any of",
        Operator::NotIn => "is not any of",
        Operator::Contains => "contains",
        Operator::NotContains => "does not contain",
        Operator::Is => "is",
        Operator::IsNot => "is not",
    }
}
