use std::sync::LazyLock;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use regex::Regex;

use crate::error::CoreError;
use crate::geometry::rect::Rect;

static PACKED_BOUNDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(-?\d+),(-?\d+)\]\[(-?\d+),(-?\d+)\]").expect("bounds pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// A node of the hierarchical source document.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceNode {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    /// `None` when the node's attributes carry no recognizable bounds; such
    /// nodes never take part in matching.
    pub bounds: Option<Rect>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub depth: usize,
}

impl SourceNode {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Arena of source nodes in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceTree {
    nodes: Vec<SourceNode>,
}

impl SourceTree {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn get(&self, id: NodeId) -> Option<&SourceNode> {
        self.nodes.get(id.0)
    }

    /// Nodes in document (pre-)order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SourceNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.iter()
            .filter(|(_, n)| n.parent.is_none())
            .map(|(id, _)| id)
    }

    /// Parent chain of `id`, nearest first, ending at the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = self.get(id).and_then(|n| n.parent);
        while let Some(parent) = current {
            chain.push(parent);
            current = self.get(parent).and_then(|n| n.parent);
        }
        chain
    }

    fn push(&mut self, node: SourceNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        if let Some(parent) = node.parent {
            self.nodes[parent.0].children.push(id);
        }
        self.nodes.push(node);
        id
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse source tree text. Blank input yields an empty tree.
pub fn parse_source_tree(text: &str) -> Result<SourceTree, CoreError> {
    let mut tree = SourceTree::empty();
    if text.trim().is_empty() {
        return Ok(tree);
    }

    let mut reader = Reader::from_str(text);
    let mut open: Vec<NodeId> = Vec::new();
    let mut roots = 0usize;

    loop {
        let position = reader.buffer_position() as u64;
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                if open.is_empty() {
                    count_root(&mut roots, position)?;
                }
                let node = build_node(e, open.last().copied(), open.len())
                    .map_err(|message| CoreError::MalformedSource { position, message })?;
                open.push(tree.push(node));
            }
            Ok(Event::Empty(ref e)) => {
                if open.is_empty() {
                    count_root(&mut roots, position)?;
                }
                let node = build_node(e, open.last().copied(), open.len())
                    .map_err(|message| CoreError::MalformedSource { position, message })?;
                tree.push(node);
            }
            Ok(Event::End(_)) => {
                if open.pop().is_none() {
                    return Err(CoreError::MalformedSource {
                        position,
                        message: "closing tag without an open element".to_string(),
                    });
                }
            }
            Ok(Event::Text(ref t)) if open.is_empty() && !is_blank(t) => {
                return Err(CoreError::MalformedSource {
                    position,
                    message: "text outside the root element".to_string(),
                });
            }
            Ok(Event::CData(_)) if open.is_empty() => {
                return Err(CoreError::MalformedSource {
                    position,
                    message: "CDATA outside the root element".to_string(),
                });
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(CoreError::MalformedSource {
                    position: reader.buffer_position() as u64,
                    message: e.to_string(),
                });
            }
            _ => {}
        }
    }

    if !open.is_empty() {
        return Err(CoreError::MalformedSource {
            position: reader.buffer_position() as u64,
            message: format!("{} element(s) left unclosed", open.len()),
        });
    }
    if roots == 0 {
        return Err(CoreError::MalformedSource {
            position: 0,
            message: "no root element".to_string(),
        });
    }

    Ok(tree)
}

/// A document has exactly one top-level element.
fn count_root(roots: &mut usize, position: u64) -> Result<(), CoreError> {
    *roots += 1;
    if *roots > 1 {
        return Err(CoreError::MalformedSource {
            position,
            message: "more than one root element".to_string(),
        });
    }
    Ok(())
}

fn is_blank(text: &[u8]) -> bool {
    text.iter().all(|b| b.is_ascii_whitespace())
}

fn build_node(start: &BytesStart, parent: Option<NodeId>, depth: usize) -> Result<SourceNode, String> {
    let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();

    for attr in start.attributes() {
        let attr = attr.map_err(|e| format!("attribute error in <{}>: {}", tag, e))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = match attr.unescape_value() {
            Ok(v) => v.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        };
        attributes.push((key, value));
    }

    let bounds = parse_bounds(&attributes);

    Ok(SourceNode {
        tag,
        attributes,
        bounds,
        parent,
        children: Vec::new(),
        depth,
    })
}

/// Recognize either a packed `bounds="[x1,y1][x2,y2]"` attribute or the four
/// discrete `x`, `y`, `width`, `height` attributes.
pub fn parse_bounds(attributes: &[(String, String)]) -> Option<Rect> {
    let get = |name: &str| {
        attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    };

    if let Some(packed) = get("bounds") {
        if let Some(rect) = parse_packed_bounds(packed) {
            return Some(rect);
        }
    }

    let num = |name: &str| get(name).and_then(|v| v.trim().parse::<f64>().ok());
    match (num("x"), num("y"), num("width"), num("height")) {
        (Some(x), Some(y), Some(w), Some(h)) => Some(Rect::new(x, y, w, h)),
        _ => None,
    }
}

pub fn parse_packed_bounds(packed: &str) -> Option<Rect> {
    let caps = PACKED_BOUNDS.captures(packed)?;
    let n = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<f64>().ok());
    Some(Rect::from_corners(n(1)?, n(2)?, n(3)?, n(4)?))
}
