//! Syntax tree construction and rewriting.

pub mod builder;
pub mod grouping;
pub mod inline;
pub mod operators;
pub mod tree;

pub use builder::parse;
pub use grouping::{GROUPING_PAIRS, group, group_regions};
pub use inline::inline_aliases;
pub use operators::is_builtin_operator;
pub use tree::{Block, BlockKind, Leaf, Node, NodeData, NodeId, SyntaxTree};
