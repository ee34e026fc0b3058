//! Segment tree storage.
//!
//! The tree is an arena: nodes live in one `Vec` owned by [`Tree`] and refer
//! to their children by index. Nothing points back to a parent, and nodes are
//! never removed, so an index stays valid for the life of the tree.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::RouteError;
use crate::method_router::MethodRouter;
use crate::segment::{Pattern, Segment};

/// Index of a node in the arena.
pub type NodeId = usize;

/// What a node matches at its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The tree root; matches nothing itself.
    Root,
    /// A case-folded literal segment.
    Literal(String),
    /// A named parameter segment.
    Param(String),
    /// A trailing catch-all.
    Wildcard,
}

/// Route data stored on nodes where a pattern terminates.
#[derive(Debug, Clone)]
pub struct Leaf<H> {
    /// The first pattern registered for this node, as written.
    pub pattern: Arc<str>,
    /// Parameter names by segment position, `""` for literals.
    pub variable_names: Vec<String>,
    /// Specificity score.
    pub score: usize,
    /// Whether the pattern ends in `*`.
    pub has_wildcard: bool,
    /// Handler chains per method.
    pub methods: MethodRouter<H>,
}

impl<H> Leaf<H> {
    fn new(pattern: &Pattern) -> Self {
        Self {
            pattern: Arc::from(pattern.raw()),
            variable_names: pattern.variable_names(),
            score: pattern.score(),
            has_wildcard: pattern.has_wildcard(),
            methods: MethodRouter::new(),
        }
    }
}

/// A node in the segment tree.
#[derive(Debug, Clone)]
pub struct Node<H> {
    /// The segment this node represents.
    pub kind: NodeKind,
    /// Literal children keyed by case-folded text.
    pub literal_children: HashMap<String, NodeId>,
    /// Parameter children keyed by name, in registration order.
    pub param_children: IndexMap<String, NodeId>,
    /// The catch-all child, if a pattern ends in `*` here.
    pub wildcard_child: Option<NodeId>,
    /// Present if some pattern terminates at this node.
    pub leaf: Option<Leaf<H>>,
}

impl<H> Node<H> {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            literal_children: HashMap::new(),
            param_children: IndexMap::new(),
            wildcard_child: None,
            leaf: None,
        }
    }

    fn label(&self) -> String {
        match &self.kind {
            NodeKind::Root => "root".to_string(),
            NodeKind::Literal(text) => text.clone(),
            NodeKind::Param(name) => format!(":{name}"),
            NodeKind::Wildcard => "*".to_string(),
        }
    }
}

/// The arena holding every node.
#[derive(Debug, Clone)]
pub struct Tree<H> {
    nodes: Vec<Node<H>>,
}

impl<H> Default for Tree<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Tree<H> {
    /// Index of the root node.
    pub const ROOT: NodeId = 0;

    /// Creates a tree holding only the root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Root)],
        }
    }

    /// Number of nodes, root included.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[cfg(test)]
    pub fn node(&self, id: NodeId) -> &Node<H> {
        &self.nodes[id]
    }

    /// Returns the leaf data of a node, if any.
    #[must_use]
    pub fn leaf(&self, id: NodeId) -> Option<&Leaf<H>> {
        self.nodes[id].leaf.as_ref()
    }

    /// Returns the leaf data of a node for updating.
    pub(crate) fn leaf_mut(&mut self, id: NodeId) -> Option<&mut Leaf<H>> {
        self.nodes[id].leaf.as_mut()
    }

    /// Walks the pattern from the root, creating nodes as needed, and
    /// returns the node where it terminates, with its leaf initialized.
    ///
    /// With `strict` set, a parameter spelled differently from one already
    /// registered at the same position is rejected before anything below
    /// it is created.
    pub(crate) fn insert(
        &mut self,
        pattern: &Pattern,
        strict: bool,
    ) -> Result<NodeId, RouteError> {
        if strict {
            self.check_param_names(pattern)?;
        }

        let mut current = Self::ROOT;
        for segment in pattern.segments() {
            current = match segment {
                Segment::Literal(text) => self.literal_child(current, text),
                Segment::Param(name) => self.param_child(current, name),
            };
        }
        if pattern.has_wildcard() {
            current = self.wildcard_child(current);
        }

        self.nodes[current]
            .leaf
            .get_or_insert_with(|| Leaf::new(pattern));
        Ok(current)
    }

    /// Collects every leaf structurally consistent with `parts`.
    ///
    /// `parts` must already be case-folded. Every branch is explored: the
    /// literal child, each parameter child, and the wildcard child, which
    /// is taken as a candidate without descending since it consumes the
    /// rest of the path. When the path runs out at a node, the node itself
    /// and its wildcard child (matching an empty suffix) are candidates.
    pub(crate) fn collect(&self, id: NodeId, parts: &[&str], out: &mut Vec<NodeId>) {
        let node = &self.nodes[id];
        let Some((head, rest)) = parts.split_first() else {
            if node.leaf.is_some() {
                out.push(id);
            }
            if let Some(wildcard) = node.wildcard_child {
                out.push(wildcard);
            }
            return;
        };

        if let Some(&child) = node.literal_children.get(*head) {
            self.collect(child, rest, out);
        }
        for &child in node.param_children.values() {
            self.collect(child, rest, out);
        }
        if let Some(wildcard) = node.wildcard_child {
            out.push(wildcard);
        }
    }

    /// Renders the tree, one node per line with its score, leaf flag and
    /// registered methods.
    #[must_use]
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_node(Self::ROOT, 0, &mut out);
        out
    }

    fn dump_node(&self, id: NodeId, depth: usize, out: &mut String) {
        let node = &self.nodes[id];
        let score = node.leaf.as_ref().map_or(0, |leaf| leaf.score);
        let _ = write!(
            out,
            "{}{} [{}] -- {}",
            "    ".repeat(depth),
            node.label(),
            score,
            node.leaf.is_some()
        );
        if let Some(leaf) = &node.leaf {
            for method in leaf.methods.allowed_methods() {
                let _ = write!(out, " {method}");
            }
        }
        out.push('\n');

        let mut literals: Vec<_> = node.literal_children.iter().collect();
        literals.sort_by(|a, b| a.0.cmp(b.0));
        for (_, &child) in literals {
            self.dump_node(child, depth + 1, out);
        }
        for &child in node.param_children.values() {
            self.dump_node(child, depth + 1, out);
        }
        if let Some(wildcard) = node.wildcard_child {
            self.dump_node(wildcard, depth + 1, out);
        }
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(Node::new(kind));
        self.nodes.len() - 1
    }

    fn literal_child(&mut self, parent: NodeId, text: &str) -> NodeId {
        if let Some(&id) = self.nodes[parent].literal_children.get(text) {
            return id;
        }
        let id = self.push(NodeKind::Literal(text.to_string()));
        self.nodes[parent]
            .literal_children
            .insert(text.to_string(), id);
        id
    }

    fn param_child(&mut self, parent: NodeId, name: &str) -> NodeId {
        if let Some(&id) = self.nodes[parent].param_children.get(name) {
            return id;
        }
        let id = self.push(NodeKind::Param(name.to_string()));
        self.nodes[parent]
            .param_children
            .insert(name.to_string(), id);
        id
    }

    fn wildcard_child(&mut self, parent: NodeId) -> NodeId {
        if let Some(id) = self.nodes[parent].wildcard_child {
            return id;
        }
        let id = self.push(NodeKind::Wildcard);
        self.nodes[parent].wildcard_child = Some(id);
        id
    }

    /// Read-only walk rejecting a second parameter spelling at any position.
    fn check_param_names(&self, pattern: &Pattern) -> Result<(), RouteError> {
        let mut current = Some(Self::ROOT);
        for segment in pattern.segments() {
            let Some(id) = current else {
                return Ok(());
            };
            let node = &self.nodes[id];
            current = match segment {
                Segment::Literal(text) => node.literal_children.get(text.as_str()).copied(),
                Segment::Param(name) => match node.param_children.first() {
                    Some((existing, _)) if existing != name => {
                        return Err(RouteError::ParamConflict {
                            pattern: pattern.raw().to_string(),
                            name: name.clone(),
                            existing: existing.clone(),
                        })
                    }
                    Some((_, &child)) => Some(child),
                    None => None,
                },
            };
        }
        Ok(())
    }
}
