use serde_json::Value;

/// Kind of a lexical token.
///
/// The lowercase names returned by [`TokenKind::name`] are part of the
/// public error contract: they appear verbatim in parse error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Sub-expression separator
    ///
    /// # Examples
    /// ```text
    /// foo.bar
    /// ```
    Dot,

    /// Wildcard, either a value projection (`*`) or part of `[*]`
    Star,

    /// Flatten operator (`[]`)
    Flatten,

    /// Start of a filter expression (`[?`)
    ///
    /// # Examples
    /// ```text
    /// people[?age > `20`]
    /// ```
    Filter,

    /// Left bracket
    LBracket,

    /// Right bracket
    RBracket,

    /// Left brace, opens a multi-select hash
    LBrace,

    /// Right brace
    RBrace,

    /// Left parenthesis for grouping or function calls
    LParen,

    /// Right parenthesis
    RParen,

    /// Colon, used by slices and multi-select hashes
    Colon,

    /// Comma for separating arguments or multi-select elements
    Comma,

    /// Logical OR (`||`)
    Or,

    /// Logical AND (`&&`)
    And,

    /// Logical NOT (`!`)
    Not,

    /// Pipe (`|`)
    Pipe,

    /// Equality (`==`)
    Eq,

    /// Inequality (`!=`)
    Ne,

    /// Less than
    Lt,

    /// Less than or equal
    Lte,

    /// Greater than
    Gt,

    /// Greater than or equal
    Gte,

    /// Signed decimal integer
    ///
    /// # Examples
    /// ```text
    /// 0
    /// -1
    /// ```
    Number,

    /// Identifier matching `[A-Za-z_][A-Za-z0-9_]*`
    UnquotedIdentifier,

    /// Identifier enclosed in double quotes
    ///
    /// # Examples
    /// ```text
    /// "with space"
    /// "✓"
    /// ```
    QuotedIdentifier,

    /// JSON literal enclosed in backticks
    ///
    /// # Examples
    /// ```text
    /// `{"a": 1}`
    /// `"text"`
    /// ```
    Literal,

    /// Raw string enclosed in single quotes
    ///
    /// Evaluates to a string literal. Reported as `literal` in errors.
    RawString,

    /// Current node (`@`)
    Current,

    /// Expression reference (`&`)
    Expref,

    /// End of input
    Eof,
}

impl TokenKind {
    /// Name used in error messages.
    pub fn name(self) -> &'static str {
        use TokenKind::*;
        match self {
            Dot => "dot",
            Star => "star",
            Flatten => "flatten",
            Filter => "filter",
            LBracket => "lbracket",
            RBracket => "rbracket",
            LBrace => "lbrace",
            RBrace => "rbrace",
            LParen => "lparen",
            RParen => "rparen",
            Colon => "colon",
            Comma => "comma",
            Or => "or",
            And => "and",
            Not => "not",
            Pipe => "pipe",
            Eq => "eq",
            Ne => "ne",
            Lt => "lt",
            Lte => "lte",
            Gt => "gt",
            Gte => "gte",
            Number => "number",
            UnquotedIdentifier => "unquoted_identifier",
            QuotedIdentifier => "quoted_identifier",
            Literal | RawString => "literal",
            Current => "current",
            Expref => "expref",
            Eof => "eof",
        }
    }

    /// Left binding power used by the Pratt parser.
    ///
    /// Tokens with a power below [`PROJECTION_STOP`] terminate the right
    /// hand side of a projection.
    pub fn binding_power(self) -> u8 {
        use TokenKind::*;
        match self {
            Eof | UnquotedIdentifier | QuotedIdentifier | Literal | RawString | RBracket
            | RParen | Comma | RBrace | Number | Current | Expref | Colon => 0,
            Pipe => 1,
            Or => 2,
            And => 3,
            Eq | Ne | Lt | Lte | Gt | Gte => 5,
            Flatten => 9,
            Star => 20,
            Filter => 21,
            Dot => 40,
            Not => 45,
            LBrace => 50,
            LBracket => 55,
            LParen => 60,
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Binding power below which a token stops a projection.
pub const PROJECTION_STOP: u8 = 10;

/// A lexical token with its source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,

    /// Text shown in diagnostics.
    ///
    /// For identifiers this is the decoded name, for literals the decoded
    /// string (or the compact JSON of non-string literals).
    pub lexeme: String,

    /// 0-based character offset of the first character of the token.
    pub column: usize,

    /// Decoded value for `literal`, `raw_string` and `number` tokens.
    pub value: Option<Value>,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, column: usize) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            column,
            value: None,
        }
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}
