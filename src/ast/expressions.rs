use serde_json::Value;

use crate::ast::Comparator;

/// Abstract Syntax Tree node representing a parsed expression.
///
/// Projection nodes carry only the expression applied to each element;
/// the projected base is the value the node is evaluated against, which
/// is usually produced by the left side of an enclosing [`Ast::Subexpression`].
#[derive(Debug, Clone, PartialEq)]
pub enum Ast {
    /// The value currently being evaluated, produced implicitly by the
    /// parser (e.g. the base of a leading `[*]`).
    Identity,

    /// Explicit current node (`@`)
    CurrentNode,

    /// Object field access
    ///
    /// # Example
    /// ```text
    /// foo
    /// "with space"
    /// ```
    Field(String),

    /// Array element access, negative values count from the end
    ///
    /// # Example
    /// ```text
    /// [0]
    /// [-1]
    /// ```
    Index(i64),

    /// Python-style array slice
    ///
    /// # Example
    /// ```text
    /// [1:10:2]
    /// [::-1]
    /// ```
    Slice {
        start: Option<i64>,
        stop: Option<i64>,
        step: Option<i64>,
    },

    /// Evaluate `left`, then evaluate `right` against the result
    ///
    /// # Example
    /// ```text
    /// foo.bar
    /// foo[0]
    /// ```
    Subexpression { left: Box<Ast>, right: Box<Ast> },

    /// Flatten one level of nesting, then project `child` over the result
    ///
    /// # Example
    /// ```text
    /// foo[].bar
    /// ```
    FlattenProjection(Box<Ast>),

    /// Project `child` over each element of an array
    ///
    /// # Example
    /// ```text
    /// foo[*].bar
    /// foo[1:].bar
    /// ```
    IndexProjection(Box<Ast>),

    /// Project `child` over each value of an object
    ///
    /// # Example
    /// ```text
    /// foo.*.bar
    /// ```
    ValueProjection(Box<Ast>),

    /// Keep the elements for which `predicate` is truthy, then project `child`
    ///
    /// # Example
    /// ```text
    /// people[?age > `20`].name
    /// ```
    FilterProjection { predicate: Box<Ast>, child: Box<Ast> },

    /// Evaluate `right` against the complete result of `left`
    ///
    /// Unlike a sub-expression, a pipe stops any projection on its left.
    Pipe { left: Box<Ast>, right: Box<Ast> },

    /// `left || right`
    Or { left: Box<Ast>, right: Box<Ast> },

    /// `left && right`
    And { left: Box<Ast>, right: Box<Ast> },

    /// `!expr`
    Not(Box<Ast>),

    /// Comparison between two expressions
    Comparison {
        op: Comparator,
        left: Box<Ast>,
        right: Box<Ast>,
    },

    /// JSON literal or raw string
    Literal(Value),

    /// Multi-select list
    ///
    /// # Example
    /// ```text
    /// [foo, bar[0]]
    /// ```
    MultiSelectList(Vec<Ast>),

    /// Multi-select hash, entries keep their declared order
    ///
    /// # Example
    /// ```text
    /// {name: name, first: tags[0]}
    /// ```
    MultiSelectHash(Vec<(String, Ast)>),

    /// Function call
    ///
    /// # Example
    /// ```text
    /// length(people)
    /// sort_by(people, &age)
    /// ```
    Function { name: String, args: Vec<Ast> },

    /// Unevaluated expression passed to a function (`&expr`)
    ExpressionRef(Box<Ast>),
}

impl Ast {
    /// Chain `right` after `left`. An implicit identity on the left is dropped.
    pub fn subexpression(left: Ast, right: Ast) -> Ast {
        match left {
            Ast::Identity => right,
            left => Ast::Subexpression {
                left: Box::new(left),
                right: Box::new(right),
            },
        }
    }
}
