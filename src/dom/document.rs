//! Container Document - Arena-based DOM representation
//!
//! Node storage with:
//! - Arena allocation for nodes
//! - NodeId indices for traversal
//! - In-place leaf replacement for rendered highlight markup
//!
//! Detached nodes stay in the arena; ids are never reused, so a node id a host
//! holds either names a live node or a detached one, never a different node.

use super::node::{Node, NodeAttribute, NodeId, NodeKind};
use super::serialize::serialize_children;
use super::TextContainer;
use crate::config::HighlightOptions;
use crate::error::{HighlightError, Result};
use crate::highlight::render::MarkupToken;
use crate::reader::events::MarkupEvent;
use crate::reader::slice::SliceReader;

/// Id of the document node in every container
pub const DOCUMENT_ID: NodeId = 0;

/// A text container stored in arena format
#[derive(Debug, Clone)]
pub struct Container {
    /// Arena of nodes; index 0 is the document node
    nodes: Vec<Node>,
}

impl Container {
    /// Create an empty container holding only the document node
    pub fn new() -> Self {
        let mut nodes = Vec::with_capacity(256);
        nodes.push(Node::document());
        Container { nodes }
    }

    /// Parse container markup (lenient mode).
    ///
    /// # Errors
    ///
    /// Returns [`HighlightError::InvalidUtf8`] if the input is not UTF-8.
    /// Malformed markup never fails: stray end tags are dropped and open
    /// elements are closed at end of input.
    pub fn parse(input: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(input).map_err(|e| HighlightError::InvalidUtf8(e.valid_up_to()))?;
        Ok(Self::parse_str(text))
    }

    /// Parse container markup from a string
    pub fn parse_str(input: &str) -> Self {
        let mut doc = Container::new();
        doc.build_from_events(SliceReader::new(input));
        doc
    }

    /// Build the arena from markup events
    fn build_from_events(&mut self, reader: SliceReader<'_>) {
        let mut stack: Vec<NodeId> = vec![DOCUMENT_ID];

        for event in reader {
            let parent_id = *stack.last().unwrap_or(&DOCUMENT_ID);
            match event {
                MarkupEvent::StartElement(elem) => {
                    let node = Node::element(elem.name, Self::owned_attributes(&elem.attributes));
                    let id = self.append_child(parent_id, node);
                    stack.push(id);
                }
                MarkupEvent::EmptyElement(elem) => {
                    let mut node = Node::element(elem.name, Self::owned_attributes(&elem.attributes));
                    node.self_closing = true;
                    self.append_child(parent_id, node);
                }
                MarkupEvent::EndElement(name) => {
                    // Close the nearest open element with this name; stray end tags are dropped
                    if let Some(depth) = stack.iter().rposition(|&id| id != DOCUMENT_ID && self.nodes[id as usize].name == name) {
                        stack.truncate(depth);
                    }
                }
                MarkupEvent::Text(content) => {
                    self.append_text(parent_id, &content);
                }
                MarkupEvent::CData(content) => {
                    self.append_child(parent_id, Node::with_data(NodeKind::CData, content));
                }
                MarkupEvent::Comment(content) => {
                    self.append_child(parent_id, Node::with_data(NodeKind::Comment, content));
                }
                MarkupEvent::ProcessingInstruction { target, data } => {
                    self.append_child(parent_id, Node::processing_instruction(target, data));
                }
                MarkupEvent::DocType(content) => {
                    self.append_child(parent_id, Node::with_data(NodeKind::DocType, content));
                }
            }
        }
    }

    fn owned_attributes(attrs: &[crate::core::attributes::Attribute<'_>]) -> Vec<NodeAttribute> {
        attrs
            .iter()
            .map(|a| NodeAttribute::new(a.name, a.value.as_ref()))
            .collect()
    }

    /// Get a node by ID
    #[inline]
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id as usize)
    }

    /// Get total number of nodes (detached ones included)
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Iterate over children of a node
    pub fn children(&self, id: NodeId) -> ChildIter<'_> {
        let first = self.get_node(id).and_then(|n| n.first_child);
        ChildIter { doc: self, next: first }
    }

    /// Iterate over all descendants of a node in document order
    pub fn descendants(&self, id: NodeId) -> DescendantIter<'_> {
        let mut stack = Vec::new();
        if let Some(node) = self.get_node(id) {
            let mut child_id = node.last_child;
            while let Some(cid) = child_id {
                stack.push(cid);
                child_id = self.get_node(cid).and_then(|n| n.prev_sibling);
            }
        }
        DescendantIter { doc: self, stack }
    }

    /// Push a detached node into the arena
    fn push_node(&mut self, node: Node) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(node);
        id
    }

    /// Append a node as the last child of `parent_id`
    pub fn append_child(&mut self, parent_id: NodeId, mut node: Node) -> NodeId {
        node.parent = Some(parent_id);
        node.prev_sibling = self.nodes[parent_id as usize].last_child;
        node.next_sibling = None;
        let id = self.push_node(node);
        self.link_child(parent_id, id);
        id
    }

    fn link_child(&mut self, parent_id: NodeId, child_id: NodeId) {
        let parent = &mut self.nodes[parent_id as usize];
        let prev_last = parent.last_child;
        parent.last_child = Some(child_id);
        if parent.first_child.is_none() {
            parent.first_child = Some(child_id);
        }
        if let Some(prev_id) = prev_last {
            self.nodes[prev_id as usize].next_sibling = Some(child_id);
        }
    }

    /// Append text under `parent_id`, merging into a trailing text node
    fn append_text(&mut self, parent_id: NodeId, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(last_id) = self.nodes[parent_id as usize].last_child {
            let last = &mut self.nodes[last_id as usize];
            if last.kind == NodeKind::Text {
                last.data.push_str(text);
                return;
            }
        }
        self.append_child(parent_id, Node::text(text));
    }

    /// Put detached `new_id` in `old_id`'s place and detach `old_id`.
    ///
    /// Returns false if `old_id` has no parent.
    pub fn replace_node(&mut self, old_id: NodeId, new_id: NodeId) -> bool {
        let (parent, prev, next) = match self.get_node(old_id) {
            Some(old) => match old.parent {
                Some(parent) => (parent, old.prev_sibling, old.next_sibling),
                None => return false,
            },
            None => return false,
        };

        {
            let new = &mut self.nodes[new_id as usize];
            new.parent = Some(parent);
            new.prev_sibling = prev;
            new.next_sibling = next;
        }
        match prev {
            Some(prev_id) => self.nodes[prev_id as usize].next_sibling = Some(new_id),
            None => self.nodes[parent as usize].first_child = Some(new_id),
        }
        match next {
            Some(next_id) => self.nodes[next_id as usize].prev_sibling = Some(new_id),
            None => self.nodes[parent as usize].last_child = Some(new_id),
        }

        let old = &mut self.nodes[old_id as usize];
        old.parent = None;
        old.prev_sibling = None;
        old.next_sibling = None;
        true
    }

    /// Concatenated text of all leaves under `id`
    pub fn text_content_of(&self, id: NodeId) -> String {
        let mut result = String::new();
        if let Some(node) = self.get_node(id) {
            if node.is_leaf() {
                result.push_str(node.leaf_text());
            }
        }
        for desc_id in self.descendants(id) {
            if let Some(node) = self.get_node(desc_id) {
                if node.is_leaf() {
                    result.push_str(node.leaf_text());
                }
            }
        }
        result
    }

    /// Elements carrying `class_name` in their class attribute
    pub fn find_by_class(&self, class_name: &str) -> Vec<NodeId> {
        self.descendants(DOCUMENT_ID)
            .filter(|&id| {
                self.get_node(id).is_some_and(|n| {
                    n.is_element()
                        && n.attribute("class")
                            .is_some_and(|c| c.split_ascii_whitespace().any(|c| c == class_name))
                })
            })
            .collect()
    }

    /// Serialize the container back to markup
    pub fn to_markup(&self) -> String {
        serialize_children(self, DOCUMENT_ID)
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl TextContainer for Container {
    fn root_id(&self) -> NodeId {
        DOCUMENT_ID
    }

    fn children_vec(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id).collect()
    }

    fn leaf_text(&self, id: NodeId) -> &str {
        self.get_node(id).map(|n| n.leaf_text()).unwrap_or("")
    }

    fn text_content(&self) -> String {
        self.text_content_of(DOCUMENT_ID)
    }

    fn replace_with_fragment(
        &mut self,
        id: NodeId,
        fragment: &[MarkupToken],
        options: &HighlightOptions,
    ) -> Option<NodeId> {
        self.get_node(id)?.parent?;

        let wrapper = self.push_node(Node::element(options.tag_name.as_str(), Vec::new()));
        let mut stack = vec![wrapper];

        for token in fragment {
            let top = *stack.last().unwrap_or(&wrapper);
            match token {
                MarkupToken::Open => {
                    let marker = Node::element(
                        options.tag_name.as_str(),
                        vec![NodeAttribute::new("class", options.class_name.as_str())],
                    );
                    let marker_id = self.append_child(top, marker);
                    stack.push(marker_id);
                }
                MarkupToken::Close => {
                    // The wrapper itself is never closed by a marker
                    if stack.len() > 1 {
                        stack.pop();
                    }
                }
                MarkupToken::Text(text) => self.append_text(top, text),
            }
        }

        self.replace_node(id, wrapper).then_some(wrapper)
    }
}

/// Iterator over child nodes
pub struct ChildIter<'a> {
    doc: &'a Container,
    next: Option<NodeId>,
}

impl<'a> Iterator for ChildIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.get_node(current).and_then(|n| n.next_sibling);
        Some(current)
    }
}

/// Iterator over descendant nodes (pre-order, depth-first)
pub struct DescendantIter<'a> {
    doc: &'a Container,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for DescendantIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        if let Some(node) = self.doc.get_node(current) {
            let mut child_id = node.last_child;
            while let Some(id) = child_id {
                self.stack.push(id);
                child_id = self.doc.get_node(id).and_then(|n| n.prev_sibling);
            }
        }
        Some(current)
    }
}
