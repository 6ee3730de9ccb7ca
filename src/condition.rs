//! Condition records and the fixed enumerations they are built from.

use crate::error::JqlError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Common JQL functions offered as values.
pub const JQL_FUNCTIONS: [&str; 7] = [
    "currentUser()",
    "startOfDay()",
    "endOfDay()",
    "startOfWeek()",
    "endOfWeek()",
    "startOfMonth()",
    "endOfMonth()",
];

/// A single filter criterion, as held by the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Identity used only to key list edits
    #[serde(default)]
    pub id: u64,
    pub field: Field,
    pub operator: Operator,
    /// Empty means unset
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub conjunction: Conjunction,
}

impl Condition {
    pub fn new(field: Field, operator: Operator, value: impl Into<String>) -> Self {
        Self {
            id: 0,
            field,
            operator,
            value: value.into(),
            conjunction: Conjunction::And,
        }
    }

    /// The condition a freshly added form row starts with.
    pub fn with_id(id: u64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn joined_by(mut self, conjunction: Conjunction) -> Self {
        self.conjunction = conjunction;
        self
    }

    pub fn is_set(&self) -> bool {
        !self.value.is_empty()
    }
}

impl Default for Condition {
    fn default() -> Self {
        Self::new(Field::Project, Operator::Eq, "")
    }
}

/// Attributes a condition can be filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Project,
    #[serde(rename = "issuetype")]
    IssueType,
    Status,
    Priority,
    Assignee,
    Reporter,
    Created,
    Updated,
    Labels,
    Component,
    FixVersion,
    #[serde(rename = "duedate")]
    DueDate,
}

impl Field {
    pub const ALL: [Field; 12] = [
        Field::Project,
        Field::IssueType,
        Field::Status,
        Field::Priority,
        Field::Assignee,
        Field::Reporter,
        Field::Created,
        Field::Updated,
        Field::Labels,
        Field::Component,
        Field::FixVersion,
        Field::DueDate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Project => "project",
            Field::IssueType => "issuetype",
            Field::Status => "status",
            Field::Priority => "priority",
            Field::Assignee => "assignee",
            Field::Reporter => "reporter",
            Field::Created => "created",
            Field::Updated => "updated",
            Field::Labels => "labels",
            Field::Component => "component",
            Field::FixVersion => "fixVersion",
            Field::DueDate => "duedate",
        }
    }

    /// A sample value hinting at the expected input format.
    pub fn example(&self) -> Option<&'static str> {
        match self {
            Field::Project => Some("PROJ"),
            Field::IssueType => Some("Bug"),
            Field::Status => Some("In Progress"),
            Field::Priority => Some("High"),
            Field::Assignee => Some("currentUser()"),
            Field::Created => Some("startOfDay(-7d)"),
            Field::Labels => Some("frontend"),
            Field::Component => Some("API"),
            Field::FixVersion => Some("2.0"),
            Field::Reporter | Field::Updated | Field::DueDate => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = JqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .iter()
            .copied()
            .find(|field| field.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| JqlError::UnknownField(s.to_string()))
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    NotEq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "NOT IN")]
    NotIn,
    #[serde(rename = "~")]
    Contains,
    #[serde(rename = "!~")]
    NotContains,
    #[serde(rename = "IS")]
    Is,
    #[serde(rename = "IS NOT")]
    IsNot,
}

impl Operator {
    /// In order of common usage.
    pub const ALL: [Operator; 12] = [
        Operator::Eq,
        Operator::NotEq,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::In,
        Operator::NotIn,
        Operator::Contains,
        Operator::NotContains,
        Operator::Is,
        Operator::IsNot,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "!=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Contains => "~",
            Operator::NotContains => "!~",
            Operator::Is => "IS",
            Operator::IsNot => "IS NOT",
        }
    }

    /// `IN` and `NOT IN` take a parenthesized list instead of a single value.
    pub fn is_list(&self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = JqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "not  in" and "NOT IN" are the same operator
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");
        Operator::ALL
            .iter()
            .copied()
            .find(|op| op.symbol().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| JqlError::UnknownOperator(s.to_string()))
    }
}

/// Logical connector joining a condition to the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Conjunction {
    #[default]
    And,
    Or,
}

impl Conjunction {
    pub const ALL: [Conjunction; 2] = [Conjunction::And, Conjunction::Or];

    pub fn as_str(&self) -> &'static str {
        match self {
            Conjunction::And => "AND",
            Conjunction::Or => "OR",
        }
    }

    /// Lower-cased form used in prose.
    pub fn as_prose(&self) -> &'static str {
        match self {
            Conjunction::And => "and",
            Conjunction::Or => "or",
        }
    }
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Conjunction {
    type Err = JqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Conjunction::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| JqlError::UnknownConjunction(s.to_string()))
    }
}
