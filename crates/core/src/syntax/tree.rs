//! Node arena for PostScript syntax trees.
//!
//! Nodes are addressed by stable [`NodeId`]s into a flat arena, so in-place
//! rewrites (folding a sibling span into one wrapping node, deleting a
//! definition) never invalidate surrounding handles. Parent links are plain
//! ids, rebound whenever a node is attached somewhere else.

use indexmap::IndexMap;
use itertools::Itertools;
use rustc_hash::FxHashMap;

use crate::error::{FormatterError, Result};
use crate::reader::Token;

/// Stable handle to a node in a [`SyntaxTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub const fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Block flavor of a non-leaf node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    /// The tree root; owns the definition and alias tables.
    Script,
    /// `{ ... }` code block. The end marker is absent when the input
    /// truncates before the closing brace.
    Procedure,
    /// Matched literal-marker pair folded by region grouping.
    Region,
    /// Folded definition idiom (`load`, `bind` or `def`); carries the
    /// canonical operator name. The triggering keyword is the end marker.
    Operator(String),
}

/// Leaf payload: the source token plus its display text. Display text
/// starts out as the token text and may be rewritten by alias inlining;
/// the token (and its position) never changes.
#[derive(Debug, Clone)]
pub struct Leaf {
    pub token: Token,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct Block {
    pub kind: BlockKind,
    pub start: Option<NodeId>,
    pub end: Option<NodeId>,
    pub children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub enum NodeData {
    Leaf(Leaf),
    Block(Block),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) parent: Option<NodeId>,
    pub data: NodeData,
}

/// Arena-backed syntax tree. The root is always a [`BlockKind::Script`]
/// block; its definition and alias tables live on the tree value itself.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
    root: NodeId,
    defines: IndexMap<String, Vec<NodeId>>,
    aliases: FxHashMap<String, Vec<String>>,
}

impl SyntaxTree {
    pub fn new() -> Self {
        let root_block = Block {
            kind: BlockKind::Script,
            start: None,
            end: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![Node {
                parent: None,
                data: NodeData::Block(root_block),
            }],
            root: NodeId::new(0),
            defines: IndexMap::new(),
            aliases: FxHashMap::default(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn leaf(&self, id: NodeId) -> Option<&Leaf> {
        match &self.nodes[id.index()].data {
            NodeData::Leaf(leaf) => Some(leaf),
            NodeData::Block(_) => None,
        }
    }

    pub fn block(&self, id: NodeId) -> Option<&Block> {
        match &self.nodes[id.index()].data {
            NodeData::Block(block) => Some(block),
            NodeData::Leaf(_) => None,
        }
    }

    pub fn is_block(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.index()].data, NodeData::Block(_))
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match &self.nodes[id.index()].data {
            NodeData::Block(block) => &block.children,
            NodeData::Leaf(_) => &[],
        }
    }

    /// Display text of a leaf node.
    pub fn leaf_text(&self, id: NodeId) -> Option<&str> {
        self.leaf(id).map(|leaf| leaf.text.as_str())
    }

    pub fn is_leaf_with_text(&self, id: NodeId, text: &str) -> bool {
        self.leaf_text(id) == Some(text)
    }

    /// Whether the node is a leaf whose token executes when encountered.
    pub fn is_executable_name_leaf(&self, id: NodeId) -> bool {
        self.leaf(id)
            .is_some_and(|leaf| leaf.token.kind.is_executable_name())
    }

    pub fn alloc_leaf(&mut self, token: Token) -> NodeId {
        let text = token.text.clone();
        self.alloc(NodeData::Leaf(Leaf { token, text }))
    }

    pub fn alloc_block(&mut self, kind: BlockKind) -> NodeId {
        self.alloc(NodeData::Block(Block {
            kind,
            start: None,
            end: None,
            children: Vec::new(),
        }))
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node { parent: None, data });
        id
    }

    pub(crate) fn set_leaf_text(&mut self, id: NodeId, text: String) {
        if let NodeData::Leaf(leaf) = &mut self.nodes[id.index()].data {
            leaf.text = text;
        }
    }

    pub(crate) fn set_start_marker(&mut self, block: NodeId, marker: NodeId) {
        self.nodes[marker.index()].parent = Some(block);
        self.block_mut(block).start = Some(marker);
    }

    pub(crate) fn set_end_marker(&mut self, block: NodeId, marker: NodeId) {
        self.nodes[marker.index()].parent = Some(block);
        self.block_mut(block).end = Some(marker);
    }

    pub fn push_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.index()].parent = Some(parent);
        self.block_mut(parent).children.push(child);
    }

    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.nodes[child.index()].parent = Some(parent);
        self.block_mut(parent).children.insert(index, child);
    }

    /// Removes `child` from its parent's child list.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        let index = self
            .block(parent)
            .and_then(|block| block.children.iter().position(|&c| c == child));
        if let Some(index) = index {
            self.block_mut(parent).children.remove(index);
            self.nodes[child.index()].parent = None;
        }
    }

    /// Splices the child range `[first, first + count)` out of `parent`,
    /// returning the removed ids with their parent links cleared.
    pub(crate) fn splice_out(&mut self, parent: NodeId, first: usize, count: usize) -> Vec<NodeId> {
        let removed: Vec<NodeId> = self
            .block_mut(parent)
            .children
            .splice(first..first + count, std::iter::empty())
            .collect();
        for &id in &removed {
            self.nodes[id.index()].parent = None;
        }
        removed
    }

    /// Folds `children[start_index ..= end_index]` of `parent` into a new
    /// Region whose markers are the span's first and last node.
    pub(crate) fn fold_region(
        &mut self,
        parent: NodeId,
        start_index: usize,
        end_index: usize,
    ) -> NodeId {
        let mut span = self.splice_out(parent, start_index, end_index - start_index + 1);
        let end_marker = span.pop().expect("region span has an end marker");
        let start_marker = span.remove(0);

        let region = self.alloc_block(BlockKind::Region);
        self.set_start_marker(region, start_marker);
        self.set_end_marker(region, end_marker);
        for child in span {
            self.push_child(region, child);
        }
        self.insert_child(parent, start_index, region);
        region
    }

    /// Folds `children[first ..= first + count - 1]` of `parent` into an
    /// Operator node; the span's last node becomes the keyword (end marker),
    /// the rest become operands.
    pub(crate) fn fold_operator(
        &mut self,
        parent: NodeId,
        first: usize,
        count: usize,
        canonical: &str,
    ) -> NodeId {
        let mut span = self.splice_out(parent, first, count);
        let keyword = span.pop().expect("operator span has a keyword");

        let operator = self.alloc_block(BlockKind::Operator(canonical.to_string()));
        self.set_end_marker(operator, keyword);
        for operand in span {
            self.push_child(operator, operand);
        }
        self.insert_child(parent, first, operator);
        operator
    }

    /// Flattened display text: leaf text, or marker/children texts joined
    /// with single spaces.
    pub fn text_of(&self, id: NodeId) -> String {
        match &self.nodes[id.index()].data {
            NodeData::Leaf(leaf) => leaf.text.clone(),
            NodeData::Block(block) => {
                let mut parts = Vec::new();
                if let Some(start) = block.start {
                    parts.push(self.text_of(start));
                }
                for &child in &block.children {
                    parts.push(self.text_of(child));
                }
                if let Some(end) = block.end {
                    parts.push(self.text_of(end));
                }
                parts.iter().join(" ")
            }
        }
    }

    /// Whether any descendant block is a Procedure or Region.
    pub fn contains_nested_block(&self, id: NodeId) -> bool {
        let Some(block) = self.block(id) else {
            return false;
        };
        block.children.iter().any(|&child| {
            self.block(child).is_some_and(|b| {
                matches!(b.kind, BlockKind::Procedure | BlockKind::Region)
                    || self.contains_nested_block(child)
            })
        })
    }

    /// Reconstructs the token sequence of `id` in source order, with each
    /// leaf's display text substituted into its token.
    pub fn tokens_of(&self, id: NodeId) -> Vec<Token> {
        let mut out = Vec::new();
        self.collect_tokens(id, &mut out);
        out
    }

    fn collect_tokens(&self, id: NodeId, out: &mut Vec<Token>) {
        match &self.nodes[id.index()].data {
            NodeData::Leaf(leaf) => {
                let mut token = leaf.token.clone();
                token.text = leaf.text.clone();
                out.push(token);
            }
            NodeData::Block(block) => {
                if let Some(start) = block.start {
                    self.collect_tokens(start, out);
                }
                for &child in &block.children {
                    self.collect_tokens(child, out);
                }
                if let Some(end) = block.end {
                    self.collect_tokens(end, out);
                }
            }
        }
    }

    /// Deep-copies `node` (and its subtree) from `other` into this arena.
    /// The copy is unattached; the caller inserts it where needed.
    pub fn adopt(&mut self, other: &SyntaxTree, node: NodeId) -> NodeId {
        match &other.nodes[node.index()].data {
            NodeData::Leaf(leaf) => {
                let id = self.alloc_leaf(leaf.token.clone());
                self.set_leaf_text(id, leaf.text.clone());
                id
            }
            NodeData::Block(block) => {
                let kind = block.kind.clone();
                let (start, end, children) = (block.start, block.end, block.children.clone());
                let id = self.alloc_block(kind);
                if let Some(marker) = start {
                    let copied = self.adopt(other, marker);
                    self.set_start_marker(id, copied);
                }
                for child in children {
                    let copied = self.adopt(other, child);
                    self.push_child(id, copied);
                }
                if let Some(marker) = end {
                    let copied = self.adopt(other, marker);
                    self.set_end_marker(id, copied);
                }
                id
            }
        }
    }

    // ------------------------------------------------------------------
    // Script tables
    // ------------------------------------------------------------------

    /// Definition table: stripped key name → Operator(def) nodes, in
    /// first-definition order.
    pub fn definitions(&self) -> &IndexMap<String, Vec<NodeId>> {
        &self.defines
    }

    /// Alias table: key name → recorded canonical operator names.
    pub fn aliases(&self) -> &FxHashMap<String, Vec<String>> {
        &self.aliases
    }

    /// Extracts the stripped key name from an Operator(def) node.
    pub fn definition_key(&self, op: NodeId) -> Result<String> {
        let block = self.block(op).ok_or_else(|| {
            FormatterError::AnalysisInconsistency("definition key requested from a leaf".into())
        })?;
        if !matches!(&block.kind, BlockKind::Operator(name) if name == "def") {
            return Err(FormatterError::AnalysisInconsistency(
                "definition key requested from a non-def operator".into(),
            ));
        }
        let key = block
            .children
            .first()
            .and_then(|&id| self.leaf_text(id))
            .ok_or_else(|| {
                FormatterError::AnalysisInconsistency("def operator has no key operand".into())
            })?;
        Ok(key.strip_prefix('/').unwrap_or(key).to_string())
    }

    pub(crate) fn register_definition(&mut self, op: NodeId) -> Result<()> {
        let key = self.definition_key(op)?;
        let entries = self.defines.entry(key).or_default();
        if !entries.contains(&op) {
            entries.push(op);
        }
        Ok(())
    }

    pub(crate) fn register_alias(&mut self, op: NodeId, canonical: &str) -> Result<()> {
        let key = self.definition_key(op)?;
        self.aliases.entry(key).or_default().push(canonical.to_string());
        Ok(())
    }

    /// Resolves `name` through the alias table; succeeds only while the
    /// recorded candidates agree on exactly one canonical name.
    pub fn resolve_alias(&self, name: &str) -> Option<&str> {
        let entries = self.aliases.get(name)?;
        let first = entries.first()?;
        entries.iter().all(|e| e == first).then_some(first.as_str())
    }

    /// Parse-completion prune: drops alias entries whose recorded-candidate
    /// count does not match their definition count.
    pub(crate) fn prune_aliases(&mut self) {
        let defines = &self.defines;
        self.aliases
            .retain(|key, names| defines.get(key).is_some_and(|defs| defs.len() == names.len()));
    }

    /// Removes every alias entry with exactly one recorded candidate,
    /// along with its definitions, returning the now-dead Operator(def)
    /// node ids.
    pub(crate) fn take_single_candidate_aliases(&mut self) -> Vec<NodeId> {
        let keys: Vec<String> = self
            .aliases
            .iter()
            .filter(|(_, names)| names.len() == 1)
            .map(|(key, _)| key.clone())
            .collect();

        let mut dead = Vec::new();
        for key in keys {
            self.aliases.remove(&key);
            if let Some(defs) = self.defines.shift_remove(&key) {
                dead.extend(defs);
            }
        }
        dead
    }

    fn block_mut(&mut self, id: NodeId) -> &mut Block {
        match &mut self.nodes[id.index()].data {
            NodeData::Block(block) => block,
            NodeData::Leaf(_) => panic!("node {} is not a block", id.index()),
        }
    }
}

impl Default for SyntaxTree {
    fn default() -> Self {
        Self::new()
    }
}
