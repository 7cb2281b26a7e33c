//! psdump - Dump PostScript lexical and syntactic structure as XML.
//!
//! A command line tool for inspecting what the formatter sees: the token
//! stream with positions and leading whitespace, or the analyzed syntax
//! tree with regions, operators and the definition tables.

use clap::{ArgAction, Parser};
use prettyps_core::codec::radix;
use prettyps_core::error::Result;
use prettyps_core::reader::{PostScriptReader, Token};
use prettyps_core::syntax::tree::{BlockKind, NodeData, NodeId, SyntaxTree};
use prettyps_core::syntax::{self, grouping};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

/// A command line tool for dumping PostScript structure as XML.
#[derive(Parser, Debug)]
#[command(name = "psdump")]
#[command(author, version, about, long_about = None)]
#[command(disable_version_flag = true)]
struct Args {
    /// One or more paths to PostScript files
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Print version information
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: (),

    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,

    /// Dump the analyzed and grouped syntax tree instead of the raw tokens
    #[arg(short = 'T', long = "tree", action = ArgAction::SetTrue)]
    tree: bool,

    /// Annotate integer tokens with their value re-encoded in this base
    #[arg(short = 'r', long = "radix")]
    radix: Option<i64>,
}

/// Escape special characters for XML output.
fn escape(s: &str) -> String {
    let mut result = String::new();
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            '\x00'..='\x1f' => result.push_str(&format!("&#{};", c as u32)),
            _ => result.push(c),
        }
    }
    result
}

/// Re-encodes an integer token's value in the requested base, with binary
/// digits grouped for readability.
fn radix_annotation(token: &Token, base: i64) -> Option<String> {
    let value = token.integer_value()?;
    let encoded = radix::encode(value, base, false).ok()?;
    Some(if base == 2 {
        radix::group_digits(&encoded, 4, ' ')
    } else {
        encoded
    })
}

fn dump_tokens<W: Write>(out: &mut W, tokens: &[Token], base: Option<i64>) -> Result<()> {
    writeln!(out, "<tokens>")?;
    for token in tokens {
        write!(
            out,
            r#"  <token kind="{}" line="{}" column="{}""#,
            token.kind.as_str(),
            token.line,
            token.column
        )?;
        if let Some(annotation) = base.and_then(|b| radix_annotation(token, b)) {
            write!(out, r#" radix="{}""#, escape(&annotation))?;
        }
        writeln!(out, ">{}</token>", escape(&token.text))?;
    }
    writeln!(out, "</tokens>")?;
    Ok(())
}

fn dump_tree<W: Write>(out: &mut W, tree: &SyntaxTree) -> Result<()> {
    dump_node(out, tree, tree.root(), 0)?;
    dump_tables(out, tree)?;
    Ok(())
}

fn dump_node<W: Write>(out: &mut W, tree: &SyntaxTree, id: NodeId, depth: usize) -> Result<()> {
    let pad = "  ".repeat(depth);
    match &tree.node(id).data {
        NodeData::Leaf(leaf) => {
            writeln!(
                out,
                r#"{pad}<leaf kind="{}" line="{}" column="{}">{}</leaf>"#,
                leaf.token.kind.as_str(),
                leaf.token.line,
                leaf.token.column,
                escape(&leaf.text)
            )?;
        }
        NodeData::Block(block) => {
            let (element, attrs) = match &block.kind {
                BlockKind::Script => ("script", String::new()),
                BlockKind::Procedure => ("procedure", String::new()),
                BlockKind::Region => {
                    let start = block.start.and_then(|m| tree.leaf_text(m)).unwrap_or("");
                    let end = block.end.and_then(|m| tree.leaf_text(m)).unwrap_or("");
                    (
                        "region",
                        format!(r#" start="{}" end="{}""#, escape(start), escape(end)),
                    )
                }
                BlockKind::Operator(name) => ("operator", format!(r#" name="{}""#, escape(name))),
            };
            writeln!(out, "{pad}<{element}{attrs}>")?;
            for &child in &block.children {
                dump_node(out, tree, child, depth + 1)?;
            }
            writeln!(out, "{pad}</{element}>")?;
        }
    }
    Ok(())
}

fn dump_tables<W: Write>(out: &mut W, tree: &SyntaxTree) -> Result<()> {
    writeln!(out, r#"<definitions size="{}">"#, tree.definitions().len())?;
    for (key, nodes) in tree.definitions() {
        writeln!(
            out,
            r#"  <definition key="{}" count="{}" />"#,
            escape(key),
            nodes.len()
        )?;
    }
    writeln!(out, "</definitions>")?;

    writeln!(out, r#"<aliases size="{}">"#, tree.aliases().len())?;
    for (key, names) in tree.aliases() {
        writeln!(
            out,
            r#"  <alias key="{}" names="{}" />"#,
            escape(key),
            escape(&names.join(","))
        )?;
    }
    writeln!(out, "</aliases>")?;
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let mut out: Box<dyn Write> = if args.outfile == "-" {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        Box::new(BufWriter::new(fs::File::create(&args.outfile)?))
    };

    for path in &args.files {
        let source = fs::read_to_string(path)?;
        let tokens = PostScriptReader::new(&source).read_to_end()?;
        if args.tree {
            let mut tree = syntax::parse(tokens)?;
            grouping::group_regions(&mut tree);
            dump_tree(&mut out, &tree)?;
        } else {
            dump_tokens(&mut out, &tokens, args.radix)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("{e}");
        process::exit(1);
    }
}
