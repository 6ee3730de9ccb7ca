//! 会话命令的词法分析器

use crate::token::{Span, Token, TokenKind};

pub struct Lexer<'a> {
    input: &'a str,
    /// 输入字符串中的当前位置（字节索引）
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer { input, position: 0 }
    }

    /// 返回当前位置的字符，不推进位置
    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    /// 推进位置一个字符并返回该字符
    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if let Some(c) = c {
            self.position += c.len_utf8();
        }
        c
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn token(&self, kind: TokenKind<'a>, start: usize) -> Token<'a> {
        Token { kind, span: Span::new(start, self.position) }
    }

    /// 若下一个字符是 `=` 则消费它并返回 `with_eq`，否则返回 `bare`
    fn either_eq(&mut self, start: usize, with_eq: TokenKind<'a>, bare: TokenKind<'a>) -> Token<'a> {
        if self.peek() == Some('=') {
            self.bump();
            self.token(with_eq, start)
        } else {
            self.token(bare, start)
        }
    }

    /// 读取数字字面量，溢出时返回 Illegal
    fn read_number(&mut self, start: usize) -> Token<'a> {
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.bump();
            } else {
                break;
            }
        }
        let kind = self.input[start..self.position]
            .parse::<u64>()
            .map(TokenKind::Number)
            .unwrap_or(TokenKind::Illegal);
        self.token(kind, start)
    }

    /// 读取双引号包围的字符串字面量
    /// 注意：开始的引号已经被调用者消费；未闭合的字符串一直读到行尾
    fn read_string(&mut self, start: usize) -> Token<'a> {
        let content_start = self.position;
        while let Some(c) = self.peek() {
            if c == '"' {
                break;
            }
            self.bump();
        }
        let content_end = self.position;
        self.bump(); // 消费结束引号

        self.token(TokenKind::String(&self.input[content_start..content_end]), start)
    }

    /// 读取单词，单词可以包含字母、数字、连字符和下划线
    fn read_word(&mut self, start: usize) -> Token<'a> {
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                self.bump();
            } else {
                break;
            }
        }
        self.token(TokenKind::Word(&self.input[start..self.position]), start)
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_whitespace();
        let start = self.position;

        let c = self.bump()?;

        let token = match c {
            '=' => self.token(TokenKind::Eq, start),
            '~' => self.token(TokenKind::Tilde, start),
            '<' => self.either_eq(start, TokenKind::Lte, TokenKind::Lt),
            '>' => self.either_eq(start, TokenKind::Gte, TokenKind::Gt),
            '!' => match self.peek() {
                Some('=') => {
                    self.bump();
                    self.token(TokenKind::NotEq, start)
                }
                Some('~') => {
                    self.bump();
                    self.token(TokenKind::NotTilde, start)
                }
                _ => self.token(TokenKind::Illegal, start),
            },
            '"' => self.read_string(start),
            c if c.is_ascii_digit() => self.read_number(start),
            c if c.is_alphabetic() => self.read_word(start),
            _ => self.token(TokenKind::Illegal, start),
        };
        Some(token)
    }
}
