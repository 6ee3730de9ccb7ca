//! Interactive session: a line editor driving a [`ConditionSet`].

use crate::builder::ConditionSet;
use crate::command::{parse_command, Command, ParseError};
use crate::condition::{Condition, Field, Operator, JQL_FUNCTIONS};
use crate::explainer::Explainer;
use crate::jql_compiler::{JqlCompiler, QUERY_PLACEHOLDER};
use crate::vocabulary::Vocabulary;
use anyhow::{Context, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use serde::Serialize;
use tracing::{debug, info};

const PROMPT: &str = "jql> ";

const HELP: &str = "\
Commands:
  add                         add a condition
  remove <id>                 remove a condition (one always remains)
  set <id> field <name>       change the field
  set <id> op <operator>      change the operator, e.g. >=, NOT IN
  set <id> value <text>       change the value (rest of line, \"\" clears)
  set <id> conj AND|OR        change the conjunction
  explain <id>                explain one condition
  show                        list conditions with query and explanation
  json                        print the conditions as JSON
  reset                       start over with one empty condition
  fields | operators | functions
  help | quit";

/// Query text and explanation for one snapshot of the condition list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rendered {
    pub query: String,
    pub explanation: String,
}

impl Rendered {
    pub fn new(conditions: &[Condition], vocabulary: &Vocabulary) -> Self {
        Self {
            query: JqlCompiler::with_vocabulary(vocabulary).compile(conditions),
            explanation: Explainer::with_vocabulary(vocabulary).combined(conditions),
        }
    }
}

impl std::fmt::Display for Rendered {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let query = if self.query.is_empty() {
            QUERY_PLACEHOLDER
        } else {
            self.query.as_str()
        };
        writeln!(f, "Query:       {}", query)?;
        write!(f, "Explanation: {}", self.explanation)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue(String),
    Quit,
}

pub struct Session<'v> {
    vocabulary: &'v Vocabulary,
    conditions: ConditionSet,
}

impl<'v> Session<'v> {
    pub fn new(vocabulary: &'v Vocabulary) -> Self {
        Self {
            vocabulary,
            conditions: ConditionSet::new(),
        }
    }

    pub fn conditions(&self) -> &ConditionSet {
        &self.conditions
    }

    pub fn rendered(&self) -> Rendered {
        Rendered::new(self.conditions.conditions(), self.vocabulary)
    }

    /// Parse and run one input line.
    pub fn handle_line(&mut self, line: &str) -> Outcome {
        match parse_command(line) {
            Ok(Some(command)) => self.execute(command),
            Ok(None) => Outcome::Continue(String::new()),
            Err(err) => Outcome::Continue(describe_parse_error(line, &err)),
        }
    }

    pub fn execute(&mut self, command: Command) -> Outcome {
        debug!(?command, "executing command");
        let output = match command {
            Command::Quit => return Outcome::Quit,
            Command::Add => match self.conditions.add() {
                Ok(id) => format!("Added condition #{}\n{}", id, self.rendered()),
                Err(err) => format!("error: {}", err),
            },
            Command::Remove(id) => match self.conditions.remove(id) {
                Ok(_) => format!("Removed condition #{}\n{}", id, self.rendered()),
                Err(err) => format!("error: {}", err),
            },
            Command::Set { id, edit } => match self.conditions.update(id, edit) {
                Ok(()) => self.rendered().to_string(),
                Err(err) => format!("error: {}", err),
            },
            Command::Explain(id) => match self.conditions.get(id) {
                Some(condition) => Explainer::with_vocabulary(self.vocabulary).explain(condition),
                None => format!("error: Condition not found: {}", id),
            },
            Command::Show => self.show(),
            Command::Json => serde_json::to_string_pretty(&self.conditions)
                .unwrap_or_else(|err| format!("error: {}", err)),
            Command::Reset => {
                self.conditions = ConditionSet::new();
                self.rendered().to_string()
            }
            Command::Fields => list_fields(),
            Command::Operators => self.list_operators(),
            Command::Functions => JQL_FUNCTIONS.join("\n"),
            Command::Help => HELP.to_string(),
        };
        Outcome::Continue(output)
    }

    fn show(&self) -> String {
        let compiler = JqlCompiler::with_vocabulary(self.vocabulary);
        let mut lines: Vec<String> = self
            .conditions
            .conditions()
            .iter()
            .enumerate()
            .map(|(index, condition)| {
                let connector = if index == 0 { "   " } else { condition.conjunction.as_str() };
                let clause = compiler.format_condition(condition);
                let clause = if clause.is_empty() {
                    format!("{} {} (unset)", condition.field, condition.operator)
                } else {
                    clause
                };
                format!("#{:<3} {:<3} {}", condition.id, connector, clause)
            })
            .collect();
        lines.push(self.rendered().to_string());
        lines.join("\n")
    }

    fn list_operators(&self) -> String {
        Operator::ALL
            .iter()
            .map(|op| format!("{:<7} {}", op.symbol(), self.vocabulary.describe(*op)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn list_fields() -> String {
    Field::ALL
        .iter()
        .map(|field| match field.example() {
            Some(example) => format!("{:<11} e.g. {}", field.as_str(), example),
            None => field.as_str().to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Error message with a caret under the offending span.
fn describe_parse_error(line: &str, err: &ParseError) -> String {
    match err.span {
        Some(span) => {
            let offset = line[..span.start].chars().count();
            let width = line[span.start..span.end].chars().count().max(1);
            format!(
                "{}\n{}{}\nerror: {}",
                line,
                " ".repeat(offset),
                "^".repeat(width),
                err.message
            )
        }
        None => format!("error: {}", err.message),
    }
}

/// Run the interactive loop until `quit`, Ctrl-C or Ctrl-D.
pub fn run(vocabulary: &Vocabulary) -> Result<()> {
    let mut editor = DefaultEditor::new().context("failed to start line editor")?;
    let mut session = Session::new(vocabulary);

    println!("--- JQL Query Builder ---");
    println!("Type `help` for commands.\n");
    println!("{}", session.rendered());
    info!("session started");

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    if let Err(err) = editor.add_history_entry(line.as_str()) {
                        debug!(error = %err, "failed to record history");
                    }
                }
                match session.handle_line(&line) {
                    Outcome::Continue(output) if output.is_empty() => {}
                    Outcome::Continue(output) => println!("{}", output),
                    Outcome::Quit => break,
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err).context("failed to read input"),
        }
    }

    info!(conditions = session.conditions().len(), "session ended");
    Ok(())
}
