//! # p5x Expressions - Abstract Syntax Tree
//!
//! This module defines the parsed form of p5x expressions, a path-like query
//! language for node trees.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[iterators]** - Single pipeline stages (children, named, valued, ...)
//! - **[logical]** - Logical operators and the pipelines they own
//! - **[group]** - Iterator groups, the unit of evaluation and caching
//! - **[match_type]** - What an expression returns (`?node`, `?value`, ...)
//!
//! ## Quick Start
//!
//! ```text
//! /*/_data/*?value
//! ```
//!
//! Starting at the seed node: take all children, keep those named `_data`,
//! take their children and return the values.
//!
//! ## Core Concepts
//!
//! ### Pipelines
//!
//! Each `/` introduces the next iterator. Every iterator consumes the nodes
//! of the one before it, lazily.
//!
//! ### Logicals
//!
//! `|` `&` `^` and `!` start a new pipeline at the group root and combine its
//! result with everything to the left:
//!
//! ```text
//! /*/_a|/*/_b          union
//! /*/=foo&/*/_a        intersection
//! /*/_a^/*/=foo        symmetric difference
//! /*!/*/_a             difference
//! ```
//!
//! ### Groups
//!
//! Parentheses open a nested group whose pipelines all start at the nodes
//! reaching the `(`:
//!
//! ```text
//! /*/_data/*(/_a|/_b)?name
//! ```
//!
//! ### Types
//!
//! A trailing `?type` selects what a match yields: `node`, `name`, `value`,
//! `count` or `path`. An optional `.cast` converts the result, e.g.
//! `?value.int`.
pub mod group;
pub mod iterators;
pub mod logical;
pub mod match_type;
pub mod tokens;

pub use group::IteratorGroup;
pub use iterators::{NodeIterator, RegexIterator};
pub use logical::{Logical, LogicalKind};
pub use match_type::MatchType;
pub use tokens::Token;
