//! 会话命令的语法分析器
//!
//! ## 命令语法
//!
//! ```text
//! add                          添加一个默认条件
//! remove <id>                  删除条件（至少保留一个）
//! set <id> field <name>        修改字段
//! set <id> op <operator>       修改运算符，例如 `>=`、`NOT IN`、`is not`
//! set <id> value <text>        修改值，取行内剩余的原始文本；首尾的双引号会被去掉（内部还有引号时保留），`""` 清空
//! set <id> conj AND|OR         修改连接词
//! explain <id>                 单个条件的说明
//! show | json | reset          当前查询 / JSON / 重置
//! fields | operators | functions
//! help | quit | exit
//! ```
//!
//! 值与运算符直接从原始输入中截取，因此 `startOfDay(-7d)` 或 `High, Medium` 这类包含
//! 非法 token 的文本也能原样保留。

use crate::builder::ConditionEdit;
use crate::error::JqlError;
use crate::lexer::Lexer;
use crate::token::{Span, Token, TokenKind};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add,
    Remove(u64),
    Set { id: u64, edit: ConditionEdit },
    Explain(u64),
    Show,
    Json,
    Reset,
    Fields,
    Operators,
    Functions,
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub span: Option<Span>,
}

impl ParseError {
    fn new(message: String, span: Option<Span>) -> Self {
        Self { message, span }
    }

    fn at_position(message: String, span: Span) -> Self {
        Self { message, span: Some(span) }
    }
}

/// 解析一行输入；空行返回 `Ok(None)`
pub fn parse_command(line: &str) -> Result<Option<Command>, ParseError> {
    let tokens: Vec<_> = Lexer::new(line).collect();
    if tokens.is_empty() {
        return Ok(None);
    }
    Parser::new(line, &tokens).parse().map(Some)
}

pub struct Parser<'a> {
    source: &'a str,
    tokens: &'a [Token<'a>],
    position: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, tokens: &'a [Token<'a>]) -> Self {
        Self {
            source,
            tokens,
            position: 0,
        }
    }

    /// 返回当前 token，不推进位置
    fn peek(&self) -> Option<&'a Token<'a>> {
        self.tokens.get(self.position)
    }

    /// 返回当前 token 并推进位置
    fn advance(&mut self) -> Option<&'a Token<'a>> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }

    /// 期望一个单词并推进，否则返回错误
    fn expect_word(&mut self, what: &str) -> Result<(&'a str, Span), ParseError> {
        match self.advance() {
            Some(Token { kind: TokenKind::Word(word), span }) => Ok((*word, *span)),
            Some(token) => Err(ParseError::at_position(
                format!("Expected {}, found {:?}", what, token.kind),
                token.span,
            )),
            None => Err(ParseError::new(
                format!("Expected {}, but reached end of input", what),
                None,
            )),
        }
    }

    /// 期望一个条件编号并推进
    fn expect_id(&mut self) -> Result<u64, ParseError> {
        match self.advance() {
            Some(Token { kind: TokenKind::Number(id), .. }) => Ok(*id),
            Some(token) => Err(ParseError::at_position(
                format!("Expected condition id, found {:?}", token.kind),
                token.span,
            )),
            None => Err(ParseError::new(
                "Expected condition id, but reached end of input".to_string(),
                None,
            )),
        }
    }

    /// 命令必须在此结束
    fn expect_end(&self) -> Result<(), ParseError> {
        match self.peek() {
            Some(token) => Err(ParseError::at_position(
                format!("Unexpected token: {:?}", token.kind),
                token.span,
            )),
            None => Ok(()),
        }
    }

    /// 从给定字节位置截取到行尾的原始文本，并消费剩余 token
    fn rest_of_line(&mut self, from: usize) -> (&'a str, Span) {
        self.position = self.tokens.len();
        let raw = &self.source[from..];
        let trimmed = raw.trim();
        let start = from + (raw.len() - raw.trim_start().len());
        (trimmed, Span::new(start, start + trimmed.len()))
    }

    pub fn parse(&mut self) -> Result<Command, ParseError> {
        let (keyword, span) = self.expect_word("command")?;

        let command = match keyword.to_ascii_lowercase().as_str() {
            "add" => Command::Add,
            "remove" | "rm" => Command::Remove(self.expect_id()?),
            "set" => self.parse_set()?,
            "explain" => Command::Explain(self.expect_id()?),
            "show" => Command::Show,
            "json" => Command::Json,
            "reset" => Command::Reset,
            "fields" => Command::Fields,
            "operators" | "ops" => Command::Operators,
            "functions" => Command::Functions,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => {
                return Err(ParseError::at_position(
                    format!("Unknown command: {}", keyword),
                    span,
                ))
            }
        };

        self.expect_end()?;
        Ok(command)
    }

    fn parse_set(&mut self) -> Result<Command, ParseError> {
        let id = self.expect_id()?;
        let (attribute, attribute_span) = self.expect_word("field, op, value or conj")?;

        let edit = match attribute.to_ascii_lowercase().as_str() {
            "field" => {
                let (name, span) = self.expect_word("field name")?;
                ConditionEdit::Field(name.parse().map_err(|e: JqlError| {
                    ParseError::at_position(e.to_string(), span)
                })?)
            }
            "op" | "operator" => {
                let (text, span) = self.rest_of_line(attribute_span.end);
                if text.is_empty() {
                    return Err(ParseError::new(
                        "Expected operator, but reached end of input".to_string(),
                        None,
                    ));
                }
                ConditionEdit::Operator(text.parse().map_err(|e: JqlError| {
                    ParseError::at_position(e.to_string(), span)
                })?)
            }
            "value" => {
                let (text, _) = self.rest_of_line(attribute_span.end);
                ConditionEdit::Value(strip_quotes(text).to_string())
            }
            "conj" | "conjunction" => {
                let (word, span) = self.expect_word("AND or OR")?;
                ConditionEdit::Conjunction(word.parse().map_err(|e: JqlError| {
                    ParseError::at_position(e.to_string(), span)
                })?)
            }
            _ => {
                return Err(ParseError::at_position(
                    format!("Unknown attribute: {}", attribute),
                    attribute_span,
                ))
            }
        };

        Ok(Command::Set { id, edit })
    }
}

/// `"In Progress"` -> `In Progress`; `"Done","Closed"` and anything not wrapped in quotes is kept as is
fn strip_quotes(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .filter(|inner| !inner.contains('"'))
        .unwrap_or(text)
}
