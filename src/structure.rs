//! Hierarchy reconstruction from detected markers.
//!
//! The tree is an arena: nodes live in a flat `Vec` in document order and
//! refer to each other by [`NodeId`]. The synthetic level-0 root is
//! implicit; top-level nodes have `parent == None` and are listed in
//! [`StructureTree::roots`].

use std::fmt;

use serde::Serialize;

use crate::block::ParsedBlock;

/// Index of a node in its [`StructureTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

/// A numbered block placed in the hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    pub id: NodeId,
    pub block: ParsedBlock,
    /// `None` when attached to the synthetic root.
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// The marker this node should carry, without separator.
    pub expected_marker: Option<String>,
    /// Expected marker plus the block's actual separator.
    pub expected_prefix: Option<String>,
    pub has_issue: bool,
}

impl TreeNode {
    pub fn level(&self) -> u8 {
        self.block.level
    }

    pub fn index(&self) -> usize {
        self.block.index
    }
}

/// Hierarchy of numbered blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StructureTree {
    nodes: Vec<TreeNode>,
    roots: Vec<NodeId>,
}

impl StructureTree {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Children of the synthetic root.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut TreeNode {
        &mut self.nodes[id.0]
    }

    /// All nodes in document order.
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn parent(&self, id: NodeId) -> Option<&TreeNode> {
        self.node(id).parent.map(|p| self.node(p))
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &TreeNode> {
        self.node(id).children.iter().map(move |&c| self.node(c))
    }

    /// Find the node built from the block at `index`.
    pub fn find_by_index(&self, index: usize) -> Option<&TreeNode> {
        self.nodes.iter().find(|n| n.block.index == index)
    }

    /// Number of ancestors between `id` and the synthetic root.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.node(id).parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.node(parent).parent;
        }
        depth
    }

    /// Depth-first pre-order walk from the root.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.node(id).children.iter().rev().copied());
        }
        order
    }

    /// Nodes flagged by the last calculation, in document order.
    pub fn issues(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter().filter(|n| n.has_issue)
    }
}

/// Indented outline, one node per line, issues annotated.
impl fmt::Display for StructureTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.preorder().into_iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let node = self.node(id);
            let indent = "  ".repeat(self.depth(id));
            write!(f, "{}{}", indent, node.block.raw_text.trim())?;
            if node.has_issue {
                if let Some(expected) = &node.expected_marker {
                    write!(f, "  [expected {}]", expected)?;
                }
            }
        }
        Ok(())
    }
}

/// Builds a [`StructureTree`] with an explicit stack of open ancestors.
#[derive(Debug, Default)]
pub struct StructureTreeBuilder;

impl StructureTreeBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Place every numbered block under the nearest preceding node with a
    /// strictly lower level. Unnumbered blocks are skipped.
    ///
    /// Same-level markers become siblings; level jumps (1 followed by 3)
    /// become plain parent/child relations.
    pub fn build(&self, blocks: &[ParsedBlock]) -> StructureTree {
        let mut tree = StructureTree::empty();
        // the empty stack stands for the level-0 root
        let mut open: Vec<NodeId> = Vec::new();

        for block in blocks.iter().filter(|b| b.is_numbered()) {
            let level = block.level;
            while let Some(&top) = open.last() {
                if tree.node(top).level() >= level {
                    open.pop();
                } else {
                    break;
                }
            }

            let id = NodeId(tree.nodes.len());
            let parent = open.last().copied();
            tree.nodes.push(TreeNode {
                id,
                block: block.clone(),
                parent,
                children: Vec::new(),
                expected_marker: None,
                expected_prefix: None,
                has_issue: false,
            });

            match parent {
                Some(parent) => tree.node_mut(parent).children.push(id),
                None => tree.roots.push(id),
            }
            open.push(id);
        }

        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Block;
    use crate::detector::PatternDetector;

    fn build(texts: &[&str]) -> StructureTree {
        let parsed = PatternDetector::shared().parse_all(&Block::from_texts(texts));
        StructureTreeBuilder::new().build(&parsed)
    }

    #[test]
    fn same_level_markers_are_siblings() {
        let tree = build(&["1. A", "2. B", "3. C"]);
        assert_eq!(tree.roots().len(), 3);
        assert!(tree.nodes().iter().all(|n| n.parent.is_none()));
    }

    #[test]
    fn nested_decimals() {
        let tree = build(&["1. A", "1.1 B", "1.1.1 C", "1.2 D", "2. E"]);
        assert_eq!(tree.roots().len(), 2);
        let first = tree.roots()[0];
        let children: Vec<usize> = tree.children(first).map(|n| n.index()).collect();
        assert_eq!(children, vec![1, 3]);
        assert_eq!(tree.find_by_index(2).unwrap().parent, Some(NodeId(1)));
    }

    #[test]
    fn level_jump_attaches_to_nearest_shallower() {
        let tree = build(&["ARTICLE I Definitions", "(a) Term"]);
        let para = tree.find_by_index(1).unwrap();
        assert_eq!(para.level(), 3);
        assert_eq!(tree.parent(para.id).unwrap().index(), 0);
    }

    #[test]
    fn unnumbered_blocks_do_not_break_order() {
        let tree = build(&["1. A", "plain text", "1.1 B", "more text", "2. C"]);
        assert_eq!(tree.len(), 3);
        let nested = tree.find_by_index(2).unwrap();
        assert_eq!(tree.parent(nested.id).unwrap().index(), 0);
        assert!(tree.find_by_index(1).is_none());
    }

    #[test]
    fn preorder_matches_document_order() {
        let tree = build(&["ARTICLE I X", "1.1 A", "(a) B", "(i) C", "(b) D", "1.2 E", "ARTICLE II Y"]);
        let order: Vec<usize> = tree.preorder().into_iter().map(|id| tree.node(id).index()).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(tree.depth(tree.find_by_index(3).unwrap().id), 3);
    }

    #[test]
    fn outline_display() {
        let tree = build(&["ARTICLE I Definitions", "1.1 Scope", "(a) First", "(b) Second", "1.2 Term"]);
        insta::assert_snapshot!(tree.to_string(), @r###"
        ARTICLE I Definitions
          1.1 Scope
            (a) First
            (b) Second
          1.2 Term
        "###);
    }
}
