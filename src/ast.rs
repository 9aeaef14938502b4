//! # JMESPath - Abstract Syntax Tree
//!
//! This module defines the tokens and the Abstract Syntax Tree (AST) for
//! JMESPath expressions, a query language for extracting and reshaping
//! data from JSON documents.
//!
//! ## Architecture Overview
//!
//! The AST module is organized into focused submodules:
//!
//! - **[tokens]** - Lexical tokens produced by the lexer, with binding powers
//! - **[expressions]** - Expression nodes (field access, projections, functions)
//! - **[operators]** - Comparison operators
//!
//! ## Quick Start
//!
//! ```text
//! people[?age > `20`].name | sort(@)
//! ```
//!
//! This expression keeps the people older than 20, takes their names
//! and sorts the resulting list.
//!
//! ## Core Concepts
//!
//! ### Projections
//!
//! A projection applies the expression on its right to every element of
//! the value on its left and collects the non-null results:
//!
//! ```text
//! foo[*].bar     // list projection
//! foo.*.bar      // object value projection
//! foo[].bar      // flatten projection
//! foo[?a].bar    // filter projection
//! foo[1:].bar    // slice projection
//! ```
//!
//! The right hand side of a projection extends until a token with a binding
//! power below [`tokens::PROJECTION_STOP`] is reached. A pipe (`|`) always
//! ends the projection:
//!
//! ```text
//! foo[*].bar | [0]   // first bar, not the first element of every bar
//! ```
//!
//! ### Literals
//!
//! JSON literals are written between backticks, raw strings between single
//! quotes:
//!
//! ```text
//! `{"a": [1, 2]}`
//! 'plain text'
//! ```
//!
//! ### Expression References
//!
//! `&expr` passes an unevaluated expression to a function, which evaluates
//! it once per element:
//!
//! ```text
//! sort_by(people, &age)
//! ```
pub mod expressions;
pub mod operators;
pub mod tokens;

pub use expressions::Ast;
pub use operators::Comparator;
pub use tokens::{PROJECTION_STOP, Token, TokenKind};
