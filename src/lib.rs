//! Build JQL filter queries from form-style condition records and explain them in plain English.
//!
//! ```
//! use jql_builder::{combined_explanation, generate_jql_query, Condition, Field, Operator};
//!
//! let conditions = vec![
//!     Condition::new(Field::Project, Operator::Eq, "PROJ"),
//!     Condition::new(Field::Status, Operator::Eq, "Open"),
//! ];
//! assert_eq!(generate_jql_query(&conditions), r#"project = "PROJ" AND status = "Open""#);
//! assert_eq!(
//!     combined_explanation(&conditions),
//!     "Find issues where project exactly matches PROJ and status exactly matches Open"
//! );
//! ```

pub mod builder;
pub mod command;
pub mod condition;
pub mod config;
pub mod error;
pub mod explainer;
pub mod jql_compiler;
pub mod lexer;
pub mod session;
pub mod token;
pub mod vocabulary;

pub use builder::{ConditionEdit, ConditionSet};
pub use condition::{Condition, Conjunction, Field, Operator};
pub use error::JqlError;
pub use explainer::{Explainer, EXPLANATION_PLACEHOLDER};
pub use jql_compiler::{JqlCompiler, QUERY_PLACEHOLDER};
pub use vocabulary::Vocabulary;

/// Format one condition with the standard vocabulary. See [`JqlCompiler::format_condition`].
pub fn format_condition(condition: &Condition) -> String {
    JqlCompiler::new().format_condition(condition)
}

/// Compile a condition list with the standard vocabulary. See [`JqlCompiler::compile`].
pub fn generate_jql_query(conditions: &[Condition]) -> String {
    JqlCompiler::new().compile(conditions)
}

/// Explain one condition with the standard vocabulary. See [`Explainer::explain`].
pub fn generate_explanation(condition: &Condition) -> String {
    Explainer::new().explain(condition)
}

/// Explain a condition list with the standard vocabulary. See [`Explainer::combined`].
pub fn combined_explanation(conditions: &[Condition]) -> String {
    Explainer::new().combined(conditions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_functions() {
        let priority = Condition::new(Field::Priority, Operator::In, "High, Medium");
        assert_eq!(format_condition(&priority), "priority IN (High, Medium)");
        assert_eq!(generate_explanation(&priority), "priority is any of High or Medium");

        let conditions = vec![
            Condition::new(Field::Assignee, Operator::Eq, "currentUser()"),
            priority.joined_by(Conjunction::Or),
        ];
        assert_eq!(
            generate_jql_query(&conditions),
            "assignee = currentUser() OR priority IN (High, Medium)"
        );
        assert_eq!(
            combined_explanation(&conditions),
            "Find issues where assignee exactly matches currentUser() or priority is any of High or Medium"
        );
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let conditions = vec![
            Condition::default(),
            Condition::new(Field::Created, Operator::Gte, "startOfDay(-7d)"),
        ];
        assert_eq!(generate_jql_query(&conditions), generate_jql_query(&conditions));
        assert_eq!(combined_explanation(&conditions), combined_explanation(&conditions));
        assert_eq!(
            generate_explanation(&conditions[0]),
            generate_explanation(&conditions[0])
        );
        assert_eq!(format_condition(&conditions[1]), format_condition(&conditions[1]));
    }
}
