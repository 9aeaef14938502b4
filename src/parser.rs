use crate::{
    ast::{Ast, Comparator, PROJECTION_STOP, Token, TokenKind},
    lexer::{LexError, Lexer},
};
use thiserror::Error;

/// Error raised when a token stream does not form a valid expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Invalid jmespath expression: parse error at column {column}, {} in expression: {expression}",
    describe(.kind, .lexeme, .reason)
)]
pub struct ParseError {
    pub column: usize,
    pub lexeme: String,
    pub kind: TokenKind,
    pub reason: Option<String>,
    pub expression: String,
}

fn describe(kind: &TokenKind, lexeme: &str, reason: &Option<String>) -> String {
    match reason {
        Some(reason) => reason.clone(),
        None if *kind == TokenKind::Eof => "found unexpected end of expression (EOF)".to_string(),
        None => format!("found unexpected token \"{}\" ({})", lexeme, kind),
    }
}

/// Top-down operator precedence parser over a fully lexed token stream.
pub struct Parser {
    expression: String,
    tokens: Vec<Token>,
    index: usize,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, LexError> {
        let tokens = lexer.tokenize()?;
        let expression = lexer.source();
        Ok(Parser {
            expression,
            tokens,
            index: 0,
        })
    }

    /// Number of tokens, including the trailing `eof`.
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Parse the complete token stream into an expression tree.
    pub fn parse(&mut self) -> Result<Ast, ParseError> {
        let ast = self.parse_expression(0)?;
        if !self.check(TokenKind::Eof) {
            return Err(self.error_at(self.index));
        }
        Ok(ast)
    }

    fn token(&self, index: usize) -> &Token {
        // The stream always ends with eof, so clamp out of range lookups to it.
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[index.min(last)]
    }

    fn current_kind(&self) -> TokenKind {
        self.token(self.index).kind
    }

    fn peek_kind(&self, offset: usize) -> TokenKind {
        self.token(self.index + offset).kind
    }

    fn advance(&mut self) -> Token {
        let token = self.token(self.index).clone();
        if self.index < self.tokens.len() {
            self.index += 1;
        }
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        if !self.check(kind) {
            return Err(self.error_at(self.index));
        }
        self.advance();
        Ok(())
    }

    fn error_at(&self, index: usize) -> ParseError {
        let token = self.token(index);
        ParseError {
            column: token.column,
            lexeme: token.lexeme.clone(),
            kind: token.kind,
            reason: None,
            expression: self.expression.clone(),
        }
    }

    fn parse_expression(&mut self, binding_power: u8) -> Result<Ast, ParseError> {
        let token = self.advance();
        let mut left = self.nud(token)?;
        loop {
            let kind = self.current_kind();
            if binding_power >= kind.binding_power() {
                break;
            }
            self.advance();
            left = self.led(kind, left)?;
        }
        Ok(left)
    }

    /// Prefix position handlers.
    fn nud(&mut self, token: Token) -> Result<Ast, ParseError> {
        match token.kind {
            TokenKind::Literal | TokenKind::RawString => {
                Ok(Ast::Literal(token.value.unwrap_or_default()))
            }
            TokenKind::UnquotedIdentifier => Ok(Ast::Field(token.lexeme)),
            TokenKind::QuotedIdentifier => {
                if self.check(TokenKind::LParen) {
                    return Err(ParseError {
                        column: token.column,
                        lexeme: token.lexeme,
                        kind: token.kind,
                        reason: Some("quoted identifiers cannot be used as a function name".into()),
                        expression: self.expression.clone(),
                    });
                }
                Ok(Ast::Field(token.lexeme))
            }
            TokenKind::Star => {
                let right = if self.check(TokenKind::RBracket) {
                    Ast::Identity
                } else {
                    self.parse_projection_rhs(TokenKind::Star.binding_power())?
                };
                Ok(Ast::ValueProjection(Box::new(right)))
            }
            TokenKind::Filter => self.parse_filter(Ast::Identity),
            TokenKind::LBrace => self.parse_multi_select_hash(),
            TokenKind::LParen => {
                let expr = self.parse_expression(0)?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::Flatten => {
                let right = self.parse_projection_rhs(TokenKind::Flatten.binding_power())?;
                Ok(Ast::FlattenProjection(Box::new(right)))
            }
            TokenKind::Not => {
                let expr = self.parse_expression(TokenKind::Not.binding_power())?;
                Ok(Ast::Not(Box::new(expr)))
            }
            TokenKind::LBracket => match self.current_kind() {
                TokenKind::Number | TokenKind::Colon => {
                    let index = self.parse_index_expression()?;
                    self.project_if_slice(Ast::Identity, index)
                }
                TokenKind::Star if self.peek_kind(1) == TokenKind::RBracket => {
                    self.advance();
                    self.advance();
                    let right = self.parse_projection_rhs(TokenKind::Star.binding_power())?;
                    Ok(Ast::IndexProjection(Box::new(right)))
                }
                _ => self.parse_multi_select_list(),
            },
            TokenKind::Current => Ok(Ast::CurrentNode),
            TokenKind::Expref => {
                let expr = self.parse_expression(TokenKind::Expref.binding_power())?;
                Ok(Ast::ExpressionRef(Box::new(expr)))
            }
            _ => Err(self.error_at(self.index.saturating_sub(1))),
        }
    }

    /// Infix position handlers. The operator token has already been consumed.
    fn led(&mut self, kind: TokenKind, left: Ast) -> Result<Ast, ParseError> {
        match kind {
            TokenKind::Dot => {
                if self.check(TokenKind::Star) {
                    self.advance();
                    let right = self.parse_projection_rhs(TokenKind::Dot.binding_power())?;
                    Ok(Ast::subexpression(left, Ast::ValueProjection(Box::new(right))))
                } else {
                    let right = self.parse_dot_rhs(TokenKind::Dot.binding_power())?;
                    Ok(Ast::subexpression(left, right))
                }
            }
            TokenKind::Pipe => {
                let right = self.parse_expression(kind.binding_power())?;
                Ok(Ast::Pipe {
                    left: Box::new(left),
                    right: Box::new(right),
                })
            }
            TokenKind::Or => {
                let right = self.parse_expression(kind.binding_power())?;
                Ok(Ast::Or {
                    left: Box::new(left),
                    right: Box::new(right),
                })
            }
            TokenKind::And => {
                let right = self.parse_expression(kind.binding_power())?;
                Ok(Ast::And {
                    left: Box::new(left),
                    right: Box::new(right),
                })
            }
            TokenKind::LParen => self.parse_function_call(left),
            TokenKind::Filter => self.parse_filter(left),
            TokenKind::Flatten => {
                let right = self.parse_projection_rhs(kind.binding_power())?;
                Ok(Ast::subexpression(left, Ast::FlattenProjection(Box::new(right))))
            }
            TokenKind::LBracket => {
                if matches!(self.current_kind(), TokenKind::Number | TokenKind::Colon) {
                    let index = self.parse_index_expression()?;
                    self.project_if_slice(left, index)
                } else {
                    self.expect(TokenKind::Star)?;
                    self.expect(TokenKind::RBracket)?;
                    let right = self.parse_projection_rhs(TokenKind::Star.binding_power())?;
                    Ok(Ast::subexpression(left, Ast::IndexProjection(Box::new(right))))
                }
            }
            _ => match Comparator::from_token(kind) {
                Some(op) => {
                    let right = self.parse_expression(kind.binding_power())?;
                    Ok(Ast::Comparison {
                        op,
                        left: Box::new(left),
                        right: Box::new(right),
                    })
                }
                None => Err(self.error_at(self.index)),
            },
        }
    }

    fn parse_function_call(&mut self, left: Ast) -> Result<Ast, ParseError> {
        let name = match left {
            Ast::Field(name) => name,
            // Point at the token before the opening parenthesis.
            _ => return Err(self.error_at(self.index.saturating_sub(2))),
        };

        let mut args = Vec::new();
        while !self.check(TokenKind::RParen) {
            let arg = self.parse_expression(0)?;
            if self.check(TokenKind::Comma) {
                self.expect(TokenKind::Comma)?;
            }
            args.push(arg);
        }
        self.expect(TokenKind::RParen)?;

        Ok(Ast::Function { name, args })
    }

    fn parse_filter(&mut self, left: Ast) -> Result<Ast, ParseError> {
        let predicate = self.parse_expression(0)?;
        self.expect(TokenKind::RBracket)?;
        let child = if self.check(TokenKind::Flatten) {
            Ast::Identity
        } else {
            self.parse_projection_rhs(TokenKind::Filter.binding_power())?
        };
        Ok(Ast::subexpression(
            left,
            Ast::FilterProjection {
                predicate: Box::new(predicate),
                child: Box::new(child),
            },
        ))
    }

    /// Parse `n]` or a slice `start:stop:step]` after an opening bracket.
    fn parse_index_expression(&mut self) -> Result<Ast, ParseError> {
        if self.check(TokenKind::Colon) || self.peek_kind(1) == TokenKind::Colon {
            return self.parse_slice();
        }
        let index = self.parse_number()?;
        self.expect(TokenKind::RBracket)?;
        Ok(Ast::Index(index))
    }

    fn parse_number(&mut self) -> Result<i64, ParseError> {
        let position = self.index;
        let token = self.advance();
        match (token.kind, token.value.as_ref().and_then(|v| v.as_i64())) {
            (TokenKind::Number, Some(n)) => Ok(n),
            _ => Err(self.error_at(position)),
        }
    }

    fn parse_slice(&mut self) -> Result<Ast, ParseError> {
        let mut parts: [Option<i64>; 3] = [None, None, None];
        let mut part = 0;
        while !self.check(TokenKind::RBracket) && part < 3 {
            match self.current_kind() {
                TokenKind::Colon => {
                    part += 1;
                    if part == 3 {
                        return Err(self.error_at(self.index));
                    }
                    self.advance();
                }
                TokenKind::Number => parts[part] = Some(self.parse_number()?),
                _ => return Err(self.error_at(self.index)),
            }
        }
        self.expect(TokenKind::RBracket)?;

        let [start, stop, step] = parts;
        Ok(Ast::Slice { start, stop, step })
    }

    /// A slice starts a projection, a plain index just extends the chain.
    fn project_if_slice(&mut self, left: Ast, index: Ast) -> Result<Ast, ParseError> {
        let is_slice = matches!(index, Ast::Slice { .. });
        let indexed = Ast::subexpression(left, index);
        if !is_slice {
            return Ok(indexed);
        }
        let right = self.parse_projection_rhs(TokenKind::Star.binding_power())?;
        Ok(Ast::subexpression(
            indexed,
            Ast::IndexProjection(Box::new(right)),
        ))
    }

    fn parse_projection_rhs(&mut self, binding_power: u8) -> Result<Ast, ParseError> {
        let kind = self.current_kind();
        if kind.binding_power() < PROJECTION_STOP {
            return Ok(Ast::Identity);
        }
        match kind {
            TokenKind::LBracket | TokenKind::Filter => self.parse_expression(binding_power),
            TokenKind::Dot => {
                self.advance();
                self.parse_dot_rhs(binding_power)
            }
            _ => Err(self.error_at(self.index)),
        }
    }

    fn parse_dot_rhs(&mut self, binding_power: u8) -> Result<Ast, ParseError> {
        match self.current_kind() {
            TokenKind::UnquotedIdentifier | TokenKind::QuotedIdentifier | TokenKind::Star => {
                self.parse_expression(binding_power)
            }
            TokenKind::LBracket => {
                self.advance();
                self.parse_multi_select_list()
            }
            TokenKind::LBrace => {
                self.advance();
                self.parse_multi_select_hash()
            }
            _ => Err(self.error_at(self.index)),
        }
    }

    fn parse_multi_select_list(&mut self) -> Result<Ast, ParseError> {
        let mut elements = Vec::new();
        loop {
            elements.push(self.parse_expression(0)?);
            if self.check(TokenKind::RBracket) {
                break;
            }
            self.expect(TokenKind::Comma)?;
        }
        self.expect(TokenKind::RBracket)?;
        Ok(Ast::MultiSelectList(elements))
    }

    fn parse_multi_select_hash(&mut self) -> Result<Ast, ParseError> {
        let mut entries = Vec::new();
        loop {
            if !matches!(
                self.current_kind(),
                TokenKind::UnquotedIdentifier | TokenKind::QuotedIdentifier
            ) {
                return Err(self.error_at(self.index));
            }
            let key = self.advance().lexeme;
            self.expect(TokenKind::Colon)?;
            let value = self.parse_expression(0)?;
            entries.push((key, value));

            if self.check(TokenKind::Comma) {
                self.advance();
            } else if self.check(TokenKind::RBrace) {
                self.advance();
                break;
            }
        }
        Ok(Ast::MultiSelectHash(entries))
    }
}

/// Parse `expression` into an expression tree.
pub fn parse(expression: &str) -> Result<Ast, crate::JmesPathError> {
    let mut parser = Parser::new(Lexer::new(expression))?;
    Ok(parser.parse()?)
}
