//! Container serialization back to markup

use super::document::Container;
use super::node::{NodeId, NodeKind};
use crate::core::entities::{encode_attribute, encode_text};

/// Serialize the children of `id` (not the node itself) to markup
pub fn serialize_children(doc: &Container, id: NodeId) -> String {
    let mut buf = String::with_capacity(1024);
    for child in doc.children(id) {
        serialize_node_to_buf(doc, child, &mut buf);
    }
    buf
}

/// Serialize a single node and its subtree to markup
pub fn serialize_node(doc: &Container, id: NodeId) -> String {
    let mut buf = String::with_capacity(256);
    serialize_node_to_buf(doc, id, &mut buf);
    buf
}

/// Iterative approach with explicit stack to avoid stack overflow on deep markup
fn serialize_node_to_buf(doc: &Container, node_id: NodeId, buf: &mut String) {
    enum StackEntry {
        Enter(NodeId),
        Close(NodeId),
    }

    let mut stack: Vec<StackEntry> = Vec::with_capacity(64);
    stack.push(StackEntry::Enter(node_id));

    while let Some(entry) = stack.pop() {
        match entry {
            StackEntry::Close(id) => {
                if let Some(node) = doc.get_node(id) {
                    buf.push_str("</");
                    buf.push_str(&node.name);
                    buf.push('>');
                }
            }
            StackEntry::Enter(current_id) => {
                let node = match doc.get_node(current_id) {
                    Some(n) => n,
                    None => continue,
                };

                match node.kind {
                    NodeKind::Element => {
                        buf.push('<');
                        buf.push_str(&node.name);
                        for attr in &node.attributes {
                            buf.push(' ');
                            buf.push_str(&attr.name);
                            buf.push_str("=\"");
                            buf.push_str(&encode_attribute(&attr.value));
                            buf.push('"');
                        }

                        if node.first_child.is_none() && node.self_closing {
                            buf.push_str("/>");
                            continue;
                        }
                        buf.push('>');
                        stack.push(StackEntry::Close(current_id));

                        // Children in reverse so they pop in document order
                        let mut child_id = node.last_child;
                        while let Some(cid) = child_id {
                            stack.push(StackEntry::Enter(cid));
                            child_id = doc.get_node(cid).and_then(|n| n.prev_sibling);
                        }
                    }
                    NodeKind::Text => buf.push_str(&encode_text(&node.data)),
                    NodeKind::CData => {
                        buf.push_str("<![CDATA[");
                        buf.push_str(&node.data);
                        buf.push_str("]]>");
                    }
                    NodeKind::Comment => {
                        buf.push_str("<!--");
                        buf.push_str(&node.data);
                        buf.push_str("-->");
                    }
                    NodeKind::ProcessingInstruction => {
                        buf.push_str("<?");
                        buf.push_str(&node.name);
                        if !node.data.is_empty() {
                            buf.push(' ');
                            buf.push_str(&node.data);
                        }
                        buf.push_str("?>");
                    }
                    NodeKind::DocType => {
                        buf.push_str("<!DOCTYPE");
                        buf.push_str(&node.data);
                        buf.push('>');
                    }
                    NodeKind::Document => {
                        let mut child_id = node.last_child;
                        while let Some(cid) = child_id {
                            stack.push(StackEntry::Enter(cid));
                            child_id = doc.get_node(cid).and_then(|n| n.prev_sibling);
                        }
                    }
                }
            }
        }
    }
}
