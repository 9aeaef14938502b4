use serde_json::Value;
use thiserror::Error;

use crate::ast::{Token, TokenKind};

/// Error raised when the input contains a character sequence that does not
/// form a valid token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Bad jmespath expression: unknown token \"{lexeme}\" at column {column} in expression: {expression}"
)]
pub struct LexError {
    pub column: usize,
    pub lexeme: String,
    pub expression: String,
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// The expression being tokenized.
    pub fn source(&self) -> String {
        self.input.iter().collect()
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(' ' | '\t' | '\n' | '\r') = self.current_char() {
            self.advance();
        }
    }

    fn error(&self, column: usize, lexeme: impl Into<String>) -> LexError {
        LexError {
            column,
            lexeme: lexeme.into(),
            expression: self.source(),
        }
    }

    fn single(&mut self, kind: TokenKind, lexeme: &str) -> Token {
        let start = self.position;
        self.advance();
        Token::new(kind, lexeme, start)
    }

    /// Emit `double` when the next character is `second`, otherwise `single`.
    fn one_or_two(
        &mut self,
        second: char,
        double: (TokenKind, &str),
        single: (TokenKind, &str),
    ) -> Token {
        let start = self.position;
        self.advance();
        if self.current_char() == Some(second) {
            self.advance();
            Token::new(double.0, double.1, start)
        } else {
            Token::new(single.0, single.1, start)
        }
    }

    /// Read up to an unescaped `delimiter`, keeping escape sequences intact.
    ///
    /// The cursor must be on the opening delimiter. On success the closing
    /// delimiter is consumed.
    fn read_delimited(&mut self, delimiter: char) -> Result<String, LexError> {
        let start = self.position;
        self.advance();
        let mut result = String::new();

        loop {
            match self.current_char() {
                Some(ch) if ch == delimiter => break,
                Some('\\') => {
                    result.push('\\');
                    self.advance();
                    match self.current_char() {
                        Some(ch) => {
                            result.push(ch);
                            self.advance();
                        }
                        None => break,
                    }
                }
                Some(ch) => {
                    result.push(ch);
                    self.advance();
                }
                None => break,
            }
        }

        if self.current_char() != Some(delimiter) {
            let rest: String = self.input[start..].iter().collect();
            return Err(self.error(start, rest));
        }
        self.advance();
        Ok(result)
    }

    fn read_identifier(&mut self) -> Token {
        let start = self.position;
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        Token::new(TokenKind::UnquotedIdentifier, result, start)
    }

    fn read_number(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        let mut number = String::new();
        if self.current_char() == Some('-') {
            number.push('-');
            self.advance();
        }
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let parsed = number
            .parse::<i64>()
            .map_err(|_| self.error(start, number.as_str()))?;
        Ok(Token::new(TokenKind::Number, number, start).with_value(Value::from(parsed)))
    }

    fn read_quoted_identifier(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        let lexeme = format!("\"{}\"", self.read_delimited('"')?);
        match serde_json::from_str::<String>(&lexeme) {
            Ok(name) => Ok(Token::new(TokenKind::QuotedIdentifier, name, start)),
            Err(_) => Err(self.error(start, lexeme)),
        }
    }

    fn read_raw_string(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        let text = self.read_delimited('\'')?.replace("\\'", "'");
        Ok(Token::new(TokenKind::RawString, text.as_str(), start).with_value(Value::String(text)))
    }

    fn read_literal(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        let text = self.read_delimited('`')?.replace("\\`", "`");
        let value: Value = serde_json::from_str(&text).map_err(|_| self.error(start, text.as_str()))?;
        let lexeme = match &value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        Ok(Token::new(TokenKind::Literal, lexeme, start).with_value(value))
    }

    fn read_bracket(&mut self) -> Token {
        let start = self.position;
        self.advance();
        match self.current_char() {
            Some(']') => {
                self.advance();
                Token::new(TokenKind::Flatten, "[]", start)
            }
            Some('?') => {
                self.advance();
                Token::new(TokenKind::Filter, "[?", start)
            }
            _ => Token::new(TokenKind::LBracket, "[", start),
        }
    }

    /// Produce the next token. Once the input is exhausted every call
    /// returns an `eof` token positioned at the end of the expression.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();

        let token = match self.current_char() {
            None => Token::new(TokenKind::Eof, "", self.input.len()),
            Some('.') => self.single(TokenKind::Dot, "."),
            Some('*') => self.single(TokenKind::Star, "*"),
            Some(']') => self.single(TokenKind::RBracket, "]"),
            Some(',') => self.single(TokenKind::Comma, ","),
            Some(':') => self.single(TokenKind::Colon, ":"),
            Some('@') => self.single(TokenKind::Current, "@"),
            Some('(') => self.single(TokenKind::LParen, "("),
            Some(')') => self.single(TokenKind::RParen, ")"),
            Some('{') => self.single(TokenKind::LBrace, "{"),
            Some('}') => self.single(TokenKind::RBrace, "}"),
            Some('[') => self.read_bracket(),
            Some('|') => self.one_or_two('|', (TokenKind::Or, "||"), (TokenKind::Pipe, "|")),
            Some('&') => self.one_or_two('&', (TokenKind::And, "&&"), (TokenKind::Expref, "&")),
            Some('<') => self.one_or_two('=', (TokenKind::Lte, "<="), (TokenKind::Lt, "<")),
            Some('>') => self.one_or_two('=', (TokenKind::Gte, ">="), (TokenKind::Gt, ">")),
            Some('!') => self.one_or_two('=', (TokenKind::Ne, "!="), (TokenKind::Not, "!")),
            Some('=') => {
                if self.peek_char(1) == Some('=') {
                    // `==` is reported at its second character.
                    let column = self.position + 1;
                    self.advance();
                    self.advance();
                    Token::new(TokenKind::Eq, "==", column)
                } else {
                    return Err(self.error(self.position, "="));
                }
            }
            Some('"') => self.read_quoted_identifier()?,
            Some('\'') => self.read_raw_string()?,
            Some('`') => self.read_literal()?,
            Some('-') => {
                if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) {
                    self.read_number()?
                } else {
                    return Err(self.error(self.position, "-"));
                }
            }
            Some(ch) if ch.is_ascii_digit() => self.read_number()?,
            Some(ch) if ch.is_ascii_alphabetic() || ch == '_' => self.read_identifier(),
            Some(ch) => return Err(self.error(self.position, ch)),
        };

        Ok(token)
    }

    /// Tokenize the whole input. The returned stream always ends with `eof`.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.is(TokenKind::Eof);
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }
}

/// Tokenize `expression` into a token stream terminated by `eof`.
pub fn tokenize(expression: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(expression).tokenize()
}
