//! DOM Module - Arena-based text container
//!
//! Implements the container highlights are rendered onto:
//! - Arena allocation for nodes
//! - NodeId (u32) indices for traversal and as element references
//! - Lenient construction from markup events
//! - Serialization back to markup

pub mod document;
pub mod node;
pub mod serialize;

pub use document::Container;
pub use node::{Node, NodeAttribute, NodeId, NodeKind};

use crate::config::HighlightOptions;
use crate::highlight::render::MarkupToken;

/// Host-side handle on a text container.
///
/// This is everything the highlight engine needs from a container: walk its
/// structure, read leaf text, and swap a leaf for rendered markup.
pub trait TextContainer {
    /// Node the index tree is rooted at
    fn root_id(&self) -> NodeId;

    /// Children of a node in document order
    fn children_vec(&self, id: NodeId) -> Vec<NodeId>;

    /// Text of a leaf node ("" for leaves that carry no text)
    fn leaf_text(&self, id: NodeId) -> &str;

    /// Concatenated text of every leaf in document order
    fn text_content(&self) -> String;

    /// Replace a leaf in its parent's place with the markup built from
    /// `fragment`. Returns the id of the new wrapper node, or None if the
    /// leaf is not attached.
    fn replace_with_fragment(
        &mut self,
        id: NodeId,
        fragment: &[MarkupToken],
        options: &HighlightOptions,
    ) -> Option<NodeId>;
}
