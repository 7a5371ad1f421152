//! Container node representation
//!
//! Uses NodeId (u32) for compact, cache-friendly node references. Node ids
//! double as the element references a host selection points at.

/// Compact node identifier (index into arena)
pub type NodeId = u32;

/// Type of container node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Document root
    Document,
    /// Element node
    Element,
    /// Text content
    Text,
    /// CDATA section
    CData,
    /// Comment
    Comment,
    /// Processing instruction
    ProcessingInstruction,
    /// DOCTYPE declaration
    DocType,
}

/// A name/value attribute pair on an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeAttribute {
    pub name: String,
    pub value: String,
}

impl NodeAttribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        NodeAttribute {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A node in the arena
#[derive(Debug, Clone)]
pub struct Node {
    /// Type of this node
    pub kind: NodeKind,
    /// Parent node (None for the document root and detached nodes)
    pub parent: Option<NodeId>,
    /// First child node
    pub first_child: Option<NodeId>,
    /// Last child node
    pub last_child: Option<NodeId>,
    /// Previous sibling
    pub prev_sibling: Option<NodeId>,
    /// Next sibling
    pub next_sibling: Option<NodeId>,
    /// Element name or PI target
    pub name: String,
    /// Text, CDATA, comment, PI or DOCTYPE body
    pub data: String,
    /// Element attributes
    pub attributes: Vec<NodeAttribute>,
    /// Element was written as `<name/>` and serializes back that way
    pub self_closing: bool,
}

impl Node {
    fn with_kind(kind: NodeKind) -> Self {
        Node {
            kind,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            name: String::new(),
            data: String::new(),
            attributes: Vec::new(),
            self_closing: false,
        }
    }

    /// Create a new document root node
    pub fn document() -> Self {
        Node::with_kind(NodeKind::Document)
    }

    /// Create a new element node
    pub fn element(name: impl Into<String>, attributes: Vec<NodeAttribute>) -> Self {
        Node {
            name: name.into(),
            attributes,
            ..Node::with_kind(NodeKind::Element)
        }
    }

    /// Create a new text node
    pub fn text(data: impl Into<String>) -> Self {
        Node {
            data: data.into(),
            ..Node::with_kind(NodeKind::Text)
        }
    }

    /// Create a node carrying only a body (CDATA, comment, DOCTYPE)
    pub fn with_data(kind: NodeKind, data: impl Into<String>) -> Self {
        Node {
            data: data.into(),
            ..Node::with_kind(kind)
        }
    }

    /// Create a processing instruction node
    pub fn processing_instruction(target: impl Into<String>, data: impl Into<String>) -> Self {
        Node {
            name: target.into(),
            data: data.into(),
            ..Node::with_kind(NodeKind::ProcessingInstruction)
        }
    }

    /// Check if this is an element node
    #[inline]
    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    /// Check if this node contributes its body to the container text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text | NodeKind::CData)
    }

    /// Check if this node has no structural children
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.first_child.is_none()
    }

    /// Text this node contributes when it is a leaf
    pub fn leaf_text(&self) -> &str {
        if self.is_text() {
            &self.data
        } else {
            ""
        }
    }

    /// Get attribute value by name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_creation() {
        let doc = Node::document();
        assert_eq!(doc.kind, NodeKind::Document);
        assert!(doc.parent.is_none());
        assert!(doc.is_leaf());
    }

    #[test]
    fn test_leaf_text_only_for_text_kinds() {
        assert_eq!(Node::text("abc").leaf_text(), "abc");
        assert_eq!(Node::with_data(NodeKind::CData, "x<y").leaf_text(), "x<y");
        assert_eq!(Node::with_data(NodeKind::Comment, "note").leaf_text(), "");
        assert_eq!(Node::element("br", vec![]).leaf_text(), "");
    }

    #[test]
    fn test_attribute_lookup() {
        let elem = Node::element("span", vec![NodeAttribute::new("class", "is-highlighted")]);
        assert!(elem.is_element());
        assert_eq!(elem.attribute("class"), Some("is-highlighted"));
        assert_eq!(elem.attribute("id"), None);
    }
}
