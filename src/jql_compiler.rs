//! JQL compiler that turns condition records into query text.

use crate::condition::Condition;
use crate::vocabulary::Vocabulary;
use tracing::trace;

/// Shown by the form in place of an empty query
pub const QUERY_PLACEHOLDER: &str = "Build your query by adding conditions above";

/// Compiles conditions into JQL using a fixed vocabulary.
#[derive(Debug, Clone, Copy)]
pub struct JqlCompiler<'v> {
    vocabulary: &'v Vocabulary,
}

impl JqlCompiler<'static> {
    pub fn new() -> Self {
        Self::with_vocabulary(Vocabulary::shared())
    }
}

impl Default for JqlCompiler<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'v> JqlCompiler<'v> {
    pub fn with_vocabulary(vocabulary: &'v Vocabulary) -> Self {
        Self { vocabulary }
    }

    /// Format a single condition as a clause, or an empty string if its value is unset.
    ///
    /// List operators get the raw value inside parentheses. Values for quoted fields are wrapped in
    /// double quotes unless they contain `(`, which marks a function call such as `currentUser()`.
    /// Embedded quotes are not escaped.
    pub fn format_condition(&self, condition: &Condition) -> String {
        if !condition.is_set() {
            return String::new();
        }

        let Condition {
            field,
            operator,
            value,
            ..
        } = condition;

        if operator.is_list() {
            return format!("{} {} ({})", field, operator, value);
        }

        if self.vocabulary.is_quoted(*field) && !value.contains('(') {
            return format!("{} {} \"{}\"", field, operator, value);
        }

        format!("{} {} {}", field, operator, value)
    }

    /// Compile the full query.
    ///
    /// Only the condition at index 0 drops its connector. When that condition is unset, the first
    /// clause in the output keeps its own conjunction, e.g. `AND status = "Open"`.
    pub fn compile(&self, conditions: &[Condition]) -> String {
        let query = conditions
            .iter()
            .enumerate()
            .filter_map(|(index, condition)| {
                let clause = self.format_condition(condition);
                if clause.is_empty() {
                    None
                } else if index == 0 {
                    Some(clause)
                } else {
                    Some(format!("{} {}", condition.conjunction, clause))
                }
            })
            .collect::<Vec<_>>()
            .join(" ");

        trace!(conditions = conditions.len(), %query, "compiled query");
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{Conjunction, Field, Operator};
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn cond(field: Field, operator: Operator, value: &str) -> Condition {
        Condition::new(field, operator, value)
    }

    #[test]
    fn test_unset_condition_formats_empty() {
        let compiler = JqlCompiler::new();
        assert_eq!(compiler.format_condition(&cond(Field::Status, Operator::Eq, "")), "");
    }

    #[test]
    fn test_quoted_field() {
        let compiler = JqlCompiler::new();
        assert_eq!(
            compiler.format_condition(&cond(Field::Status, Operator::Eq, "Done")),
            r#"status = "Done""#
        );
        assert_eq!(
            compiler.format_condition(&cond(Field::FixVersion, Operator::NotEq, "2.0")),
            r#"fixVersion != "2.0""#
        );
    }

    #[test]
    fn test_function_value_is_not_quoted() {
        let compiler = JqlCompiler::new();
        assert_eq!(
            compiler.format_condition(&cond(Field::Assignee, Operator::Eq, "currentUser()")),
            "assignee = currentUser()"
        );
    }

    #[test]
    fn test_date_field_is_not_quoted() {
        let compiler = JqlCompiler::new();
        assert_eq!(
            compiler.format_condition(&cond(Field::Created, Operator::Gte, "startOfDay(-7d)")),
            "created >= startOfDay(-7d)"
        );
        assert_eq!(
            compiler.format_condition(&cond(Field::DueDate, Operator::Lt, "2024-01-01")),
            "duedate < 2024-01-01"
        );
    }

    #[test]
    fn test_list_operators_insert_value_verbatim() {
        let compiler = JqlCompiler::new();
        assert_eq!(
            compiler.format_condition(&cond(Field::Priority, Operator::In, "High, Medium")),
            "priority IN (High, Medium)"
        );
        assert_eq!(
            compiler.format_condition(&cond(Field::Status, Operator::NotIn, r#""Done","Closed""#)),
            r#"status NOT IN ("Done","Closed")"#
        );
    }

    #[test]
    fn test_embedded_quote_is_not_escaped() {
        let compiler = JqlCompiler::new();
        assert_eq!(
            compiler.format_condition(&cond(Field::Labels, Operator::Contains, r#"say "hi""#)),
            r#"labels ~ "say "hi"""#
        );
    }

    #[test]
    fn test_multi_word_operators() {
        let compiler = JqlCompiler::new();
        assert_eq!(
            compiler.format_condition(&cond(Field::Updated, Operator::IsNot, "EMPTY")),
            "updated IS NOT EMPTY"
        );
    }

    #[test]
    fn test_empty_inputs_compile_to_empty_query() {
        let compiler = JqlCompiler::new();
        assert_eq!(compiler.compile(&[]), "");
        assert_eq!(
            compiler.compile(&[Condition::with_id(1), Condition::with_id(2)]),
            ""
        );
    }

    #[test]
    fn test_two_conditions() {
        let compiler = JqlCompiler::new();
        let conditions = vec![
            cond(Field::Project, Operator::Eq, "PROJ"),
            cond(Field::Status, Operator::Eq, "Open"),
        ];
        assert_eq!(
            compiler.compile(&conditions),
            r#"project = "PROJ" AND status = "Open""#
        );
    }

    #[test]
    fn test_first_conjunction_is_ignored() {
        let compiler = JqlCompiler::new();
        let conditions = vec![
            cond(Field::Project, Operator::Eq, "PROJ").joined_by(Conjunction::Or),
            cond(Field::Priority, Operator::In, "High, Highest").joined_by(Conjunction::Or),
            cond(Field::Created, Operator::Gt, "-7d"),
        ];
        assert_eq!(
            compiler.compile(&conditions),
            r#"project = "PROJ" OR priority IN (High, Highest) AND created > -7d"#
        );
    }

    #[test]
    fn test_unset_first_condition_keeps_next_connector() {
        let compiler = JqlCompiler::new();
        let conditions = vec![
            Condition::with_id(1),
            cond(Field::Status, Operator::Eq, "Open").joined_by(Conjunction::Or),
        ];
        assert_eq!(compiler.compile(&conditions), r#"OR status = "Open""#);
    }

    #[test]
    fn test_unset_middle_condition_is_skipped() {
        let compiler = JqlCompiler::new();
        let conditions = vec![
            cond(Field::Project, Operator::Eq, "PROJ"),
            Condition::with_id(2).joined_by(Conjunction::Or),
            cond(Field::Status, Operator::Eq, "Open"),
        ];
        assert_eq!(
            compiler.compile(&conditions),
            r#"project = "PROJ" AND status = "Open""#
        );
    }

    #[test]
    fn test_custom_quoted_fields() {
        let standard = Vocabulary::standard();
        let vocab = Vocabulary::new(
            standard.descriptions().clone(),
            BTreeSet::from([Field::Created]),
            BTreeSet::new(),
        )
        .unwrap();
        let compiler = JqlCompiler::with_vocabulary(&vocab);

        assert_eq!(
            compiler.format_condition(&cond(Field::Created, Operator::Eq, "2024-01-01")),
            r#"created = "2024-01-01""#
        );
        assert_eq!(
            compiler.format_condition(&cond(Field::Status, Operator::Eq, "Open")),
            "status = Open"
        );
    }

    fn any_condition() -> impl Strategy<Value = Condition> {
        (
            proptest::sample::select(Field::ALL.to_vec()),
            proptest::sample::select(Operator::ALL.to_vec()),
            "[a-zA-Z0-9 ,()\"-]{0,12}",
            proptest::sample::select(Conjunction::ALL.to_vec()),
        )
            .prop_map(|(field, operator, value, conjunction)| {
                Condition::new(field, operator, value).joined_by(conjunction)
            })
    }

    proptest! {
        #[test]
        fn prop_unset_conditions_format_empty(
            field in proptest::sample::select(Field::ALL.to_vec()),
            operator in proptest::sample::select(Operator::ALL.to_vec()),
        ) {
            let compiler = JqlCompiler::new();
            prop_assert_eq!(compiler.format_condition(&Condition::new(field, operator, "")), "");
        }

        #[test]
        fn prop_list_operators_are_verbatim(value in "[^\\s].{0,20}", negate in any::<bool>()) {
            let operator = if negate { Operator::NotIn } else { Operator::In };
            let compiler = JqlCompiler::new();
            let clause = compiler.format_condition(&Condition::new(Field::Labels, operator, value.clone()));
            prop_assert_eq!(clause, format!("labels {} ({})", operator, value));
        }

        #[test]
        fn prop_compile_is_deterministic(conditions in proptest::collection::vec(any_condition(), 0..6)) {
            let compiler = JqlCompiler::new();
            prop_assert_eq!(compiler.compile(&conditions), compiler.compile(&conditions));
        }

        #[test]
        fn prop_all_unset_compiles_empty(count in 0usize..6) {
            let conditions: Vec<_> = (1..=count as u64).map(Condition::with_id).collect();
            prop_assert_eq!(JqlCompiler::new().compile(&conditions), "");
        }
    }
}
