//! The editable list of conditions behind the form.

use crate::condition::{Condition, Conjunction, Field, Operator};
use crate::error::JqlError;
use crate::explainer::Explainer;
use crate::jql_compiler::JqlCompiler;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// A single-attribute edit of one condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionEdit {
    Field(Field),
    Operator(Operator),
    Value(String),
    Conjunction(Conjunction),
}

/// Ordered, never-empty list of conditions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Condition>", into = "Vec<Condition>")]
pub struct ConditionSet {
    conditions: Vec<Condition>,
}

impl ConditionSet {
    /// Start with one default condition.
    pub fn new() -> Self {
        Self {
            conditions: vec![Condition::with_id(1)],
        }
    }

    /// Wrap an existing list. Conditions without an id (id 0) get the next free one.
    ///
    /// Ids must be unique, since edits and removals address a single condition by id.
    pub fn from_conditions(mut conditions: Vec<Condition>) -> Result<Self, JqlError> {
        if conditions.is_empty() {
            return Err(JqlError::EmptyConditionList);
        }

        let mut seen = BTreeSet::new();
        for id in conditions.iter().map(|c| c.id).filter(|id| *id != 0) {
            if !seen.insert(id) {
                return Err(JqlError::DuplicateId(id));
            }
        }

        let mut next_id = conditions.iter().map(|c| c.id).max().unwrap_or(0);
        for condition in conditions.iter_mut().filter(|c| c.id == 0) {
            next_id = next_id.checked_add(1).ok_or(JqlError::IdsExhausted)?;
            condition.id = next_id;
        }

        Ok(Self { conditions })
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Never true for a constructed set.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&Condition> {
        self.conditions.iter().find(|c| c.id == id)
    }

    /// Append a default condition and return its id.
    pub fn add(&mut self) -> Result<u64, JqlError> {
        let id = self
            .conditions
            .iter()
            .map(|c| c.id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or(JqlError::IdsExhausted)?;
        self.conditions.push(Condition::with_id(id));
        debug!(id, total = self.conditions.len(), "added condition");
        Ok(id)
    }

    pub fn update(&mut self, id: u64, edit: ConditionEdit) -> Result<(), JqlError> {
        let condition = self
            .conditions
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(JqlError::ConditionNotFound(id))?;

        debug!(id, ?edit, "updating condition");
        match edit {
            ConditionEdit::Field(field) => condition.field = field,
            ConditionEdit::Operator(operator) => condition.operator = operator,
            ConditionEdit::Value(value) => condition.value = value,
            ConditionEdit::Conjunction(conjunction) => condition.conjunction = conjunction,
        }
        Ok(())
    }

    pub fn remove(&mut self, id: u64) -> Result<Condition, JqlError> {
        let index = self
            .conditions
            .iter()
            .position(|c| c.id == id)
            .ok_or(JqlError::ConditionNotFound(id))?;
        if self.conditions.len() == 1 {
            return Err(JqlError::LastCondition);
        }

        debug!(id, remaining = self.conditions.len() - 1, "removing condition");
        Ok(self.conditions.remove(index))
    }

    pub fn query(&self, compiler: &JqlCompiler<'_>) -> String {
        compiler.compile(&self.conditions)
    }

    pub fn explanation(&self, explainer: &Explainer<'_>) -> String {
        explainer.combined(&self.conditions)
    }
}

impl Default for ConditionSet {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<Vec<Condition>> for ConditionSet {
    type Error = JqlError;

    fn try_from(conditions: Vec<Condition>) -> Result<Self, Self::Error> {
        Self::from_conditions(conditions)
    }
}

impl From<ConditionSet> for Vec<Condition> {
    fn from(set: ConditionSet) -> Self {
        set.conditions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_set_has_one_default_condition() {
        let set = ConditionSet::new();
        assert_eq!(set.len(), 1);
        assert_eq!(set.conditions()[0], Condition::with_id(1));
    }

    #[test]
    fn test_add_uses_max_id_plus_one() {
        let mut set = ConditionSet::new();
        assert_eq!(set.add().unwrap(), 2);
        assert_eq!(set.add().unwrap(), 3);
        set.remove(2).unwrap();
        assert_eq!(set.add().unwrap(), 4);
        set.remove(4).unwrap();
        set.remove(3).unwrap();
        assert_eq!(set.add().unwrap(), 2);
    }

    #[test]
    fn test_update_replaces_one_attribute() {
        let mut set = ConditionSet::new();
        let id = set.add().unwrap();
        set.update(id, ConditionEdit::Field(Field::Status)).unwrap();
        set.update(id, ConditionEdit::Value("Open".to_string())).unwrap();
        set.update(id, ConditionEdit::Conjunction(Conjunction::Or)).unwrap();

        let condition = set.get(id).unwrap();
        assert_eq!(condition.field, Field::Status);
        assert_eq!(condition.operator, Operator::Eq);
        assert_eq!(condition.value, "Open");
        assert_eq!(condition.conjunction, Conjunction::Or);
        assert_eq!(set.get(1), Some(&Condition::with_id(1)));
    }

    #[test]
    fn test_update_unknown_id() {
        let mut set = ConditionSet::new();
        assert_eq!(
            set.update(9, ConditionEdit::Operator(Operator::Gt)),
            Err(JqlError::ConditionNotFound(9))
        );
    }

    #[test]
    fn test_cannot_remove_last_condition() {
        let mut set = ConditionSet::new();
        assert_eq!(set.remove(1), Err(JqlError::LastCondition));
        assert_eq!(set.remove(5), Err(JqlError::ConditionNotFound(5)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_query_and_explanation_follow_edits() {
        let compiler = JqlCompiler::new();
        let explainer = Explainer::new();
        let mut set = ConditionSet::new();
        assert_eq!(set.query(&compiler), "");

        set.update(1, ConditionEdit::Value("PROJ".to_string())).unwrap();
        let id = set.add().unwrap();
        set.update(id, ConditionEdit::Field(Field::Status)).unwrap();
        set.update(id, ConditionEdit::Value("Open".to_string())).unwrap();

        assert_eq!(set.query(&compiler), r#"project = "PROJ" AND status = "Open""#);
        assert_eq!(
            set.explanation(&explainer),
            "Find issues where project exactly matches PROJ and status exactly matches Open"
        );
    }

    #[test]
    fn test_from_conditions_assigns_missing_ids() {
        let set = ConditionSet::from_conditions(vec![
            Condition::new(Field::Status, Operator::Eq, "Open"),
            Condition::with_id(5),
            Condition::new(Field::Labels, Operator::Contains, "ui"),
        ])
        .unwrap();
        let ids: Vec<u64> = set.conditions().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![6, 5, 7]);
    }

    #[test]
    fn test_empty_list_is_rejected() {
        assert_eq!(
            ConditionSet::from_conditions(Vec::new()),
            Err(JqlError::EmptyConditionList)
        );
        assert!(serde_json::from_str::<ConditionSet>("[]").is_err());
    }

    #[test]
    fn test_max_id_without_successor() {
        let json = r#"[
            {"id": 18446744073709551615, "field": "status", "operator": "=", "value": "Open"},
            {"field": "labels", "operator": "~", "value": "ui"}
        ]"#;
        assert!(serde_json::from_str::<ConditionSet>(json).is_err());
        assert_eq!(
            ConditionSet::from_conditions(vec![
                Condition::with_id(u64::MAX),
                Condition::default(),
            ]),
            Err(JqlError::IdsExhausted)
        );

        let mut set = ConditionSet::from_conditions(vec![Condition::with_id(u64::MAX)]).unwrap();
        assert_eq!(set.add(), Err(JqlError::IdsExhausted));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        assert_eq!(
            ConditionSet::from_conditions(vec![
                Condition::with_id(2),
                Condition::new(Field::Status, Operator::Eq, "Open"),
                Condition::with_id(2),
            ]),
            Err(JqlError::DuplicateId(2))
        );
        let json = r#"[{"id": 4, "field": "project", "operator": "="}, {"id": 4, "field": "status", "operator": "="}]"#;
        assert!(serde_json::from_str::<ConditionSet>(json).is_err());
    }

    #[test]
    fn test_json_is_a_plain_array() {
        let set = ConditionSet::new();
        let json = serde_json::to_string(&set).unwrap();
        assert!(json.starts_with('['));
        let back: ConditionSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
