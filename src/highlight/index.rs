//! Flat-offset index over a text container
//!
//! Every leaf is annotated with its start offset in the flattened container
//! text and its length. Trees are built per render or capture and never
//! mutated; a container change means building a new tree.

use crate::dom::{NodeId, TextContainer};

/// A text-bearing leaf and its place in the flattened text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    pub node: NodeId,
    pub start: usize,
    pub len: usize,
    pub text: String,
}

/// A structural node; `len` is the sum of its descendants' lengths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Internal {
    pub node: NodeId,
    pub start: usize,
    pub len: usize,
    pub children: Vec<IndexNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexNode {
    Leaf(Leaf),
    Internal(Internal),
}

impl IndexNode {
    #[inline]
    pub fn node(&self) -> NodeId {
        match self {
            IndexNode::Leaf(leaf) => leaf.node,
            IndexNode::Internal(internal) => internal.node,
        }
    }

    #[inline]
    pub fn start(&self) -> usize {
        match self {
            IndexNode::Leaf(leaf) => leaf.start,
            IndexNode::Internal(internal) => internal.start,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        match self {
            IndexNode::Leaf(leaf) => leaf.len,
            IndexNode::Internal(internal) => internal.len,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One past the last offset covered by this node
    #[inline]
    pub fn end(&self) -> usize {
        self.start() + self.len()
    }

    /// Leaves in document order
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves { stack: vec![self] }
    }

    /// Concatenated text of all leaves
    pub fn text(&self) -> String {
        self.leaves().map(|leaf| leaf.text.as_str()).collect()
    }

    /// First node (pre-order) whose container node is `node`
    pub fn find_by_node(&self, node: NodeId) -> Option<&IndexNode> {
        let mut stack = vec![self];
        while let Some(current) = stack.pop() {
            if current.node() == node {
                return Some(current);
            }
            if let IndexNode::Internal(internal) = current {
                stack.extend(internal.children.iter().rev());
            }
        }
        None
    }

    /// Leaves from the first one on `start_node` through the first later one
    /// on `end_node`, inclusive.
    ///
    /// Empty if `start_node` names no leaf; runs to the last leaf if
    /// `end_node` is never reached.
    pub fn leaf_range(&self, start_node: NodeId, end_node: NodeId) -> Vec<&Leaf> {
        let mut leaves = self.leaves().skip_while(|leaf| leaf.node != start_node);
        let mut range = Vec::new();
        if let Some(first) = leaves.next() {
            range.push(first);
            if first.node != end_node {
                for leaf in leaves {
                    range.push(leaf);
                    if leaf.node == end_node {
                        break;
                    }
                }
            }
        }
        range
    }
}

/// Pre-order leaf iterator
pub struct Leaves<'a> {
    stack: Vec<&'a IndexNode>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a Leaf;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            match node {
                IndexNode::Leaf(leaf) => return Some(leaf),
                IndexNode::Internal(internal) => self.stack.extend(internal.children.iter().rev()),
            }
        }
        None
    }
}

fn make_leaf<C: TextContainer + ?Sized>(container: &C, node: NodeId, start: usize) -> IndexNode {
    let text = container.leaf_text(node).to_string();
    IndexNode::Leaf(Leaf {
        node,
        start,
        len: text.chars().count(),
        text,
    })
}

/// Build the index tree rooted at `root`, starting at flat offset `start`.
///
/// A node with no children is a leaf (possibly zero-length). Uses an
/// explicit stack so deep containers cannot overflow the scheduler stack.
pub fn build_index<C: TextContainer + ?Sized>(container: &C, root: NodeId, start: usize) -> IndexNode {
    struct Frame {
        node: NodeId,
        start: usize,
        len: usize,
        pending: std::vec::IntoIter<NodeId>,
        children: Vec<IndexNode>,
    }

    let root_children = container.children_vec(root);
    if root_children.is_empty() {
        return make_leaf(container, root, start);
    }

    let mut stack = vec![Frame {
        node: root,
        start,
        len: 0,
        pending: root_children.into_iter(),
        children: Vec::new(),
    }];

    while let Some(frame) = stack.last_mut() {
        if let Some(child) = frame.pending.next() {
            let child_start = frame.start + frame.len;
            let grandchildren = container.children_vec(child);
            if grandchildren.is_empty() {
                let leaf = make_leaf(container, child, child_start);
                frame.len += leaf.len();
                frame.children.push(leaf);
            } else {
                stack.push(Frame {
                    node: child,
                    start: child_start,
                    len: 0,
                    pending: grandchildren.into_iter(),
                    children: Vec::new(),
                });
            }
            continue;
        }

        let Some(done) = stack.pop() else { break };
        let built = IndexNode::Internal(Internal {
            node: done.node,
            start: done.start,
            len: done.len,
            children: done.children,
        });
        match stack.last_mut() {
            Some(parent) => {
                parent.len += built.len();
                parent.children.push(built);
            }
            None => return built,
        }
    }

    // Unreachable: the root frame always returns above
    IndexNode::Internal(Internal {
        node: root,
        start,
        len: 0,
        children: Vec::new(),
    })
}
