//! prettyps - PostScript source-code formatter.
//!
//! Tokenizes PostScript source with exact line/column tracking, builds a
//! syntax tree over balanced delimiters and the `load`/`bind`/`def`
//! definition idioms, groups matched marker pairs into regions, optionally
//! inlines operator aliases, optionally injects trace-logging calls, and
//! pretty-prints the result with deterministic line wrapping.
//!
//! This is a static reformatter, not an interpreter: operators are never
//! evaluated, only recognized syntactically.

pub mod codec;
pub mod error;
pub mod formatter;
pub mod printer;
pub mod reader;
pub mod syntax;
pub mod tracer;

pub use error::{FormatterError, Result};
pub use formatter::{CancelToken, DEFAULT_MAX_LINE_LENGTH, FormatOptions, PostScriptFormatter};
pub use printer::Printer;
pub use reader::{PostScriptReader, Token, TokenKind};
pub use syntax::{BlockKind, NodeId, SyntaxTree};
pub use tracer::{
    DirectoryResourceProvider, MemoryResourceProvider, ResourceProvider, TRACE_PROLOGUE_RESOURCE,
    Tracer,
};
