use crate::error::EngineError;
use crate::model::schema::{ContentModel, NodeSpec, NodeType};

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A run of characters; every character is one position.
    Text(String),
    Element(Element),
}

/// A typed node with children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub node_type: NodeType,
    pub spec: NodeSpec,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(node_type: NodeType, spec: NodeSpec, mut children: Vec<Node>) -> Self {
        normalize(&mut children);
        Self {
            node_type,
            spec,
            children,
        }
    }

    /// Sum of the children's sizes.
    pub fn content_size(&self) -> usize {
        self.children.iter().map(Node::node_size).sum()
    }

    /// Size including the open and close tokens (1 for leaves).
    pub fn node_size(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.content_size() + 2
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.spec.content == ContentModel::Empty
    }

    /// True when positions directly inside this node are caret positions.
    pub fn inline_content(&self) -> bool {
        self.spec.content == ContentModel::Inline
    }
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn node_size(&self) -> usize {
        match self {
            Node::Text(text) => text.chars().count(),
            Node::Element(el) => el.node_size(),
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }
}

/// A document snapshot: a root element addressed by a flat position space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Largest addressable position.
    pub fn content_size(&self) -> usize {
        self.root.content_size()
    }

    /// Character occupying `[pos, pos + 1)`, if that step is a character.
    pub fn char_at(&self, pos: usize) -> Option<char> {
        char_at_in(&self.root, pos)
    }

    /// Characters whose positions fall in `[from, to)`, in document order.
    pub fn text_between(&self, from: usize, to: usize) -> String {
        let mut out = String::new();
        collect_text(&self.root, 0, from, to, &mut out);
        out
    }

    /// Inserts `text` at `at`, which must lie in inline content.
    pub fn insert_text(&mut self, at: usize, text: &str) -> Result<(), EngineError> {
        if text.is_empty() {
            return Ok(());
        }
        let size = self.content_size();
        if at > size {
            return Err(EngineError::OutOfRange { pos: at, size });
        }
        insert_into(&mut self.root, at, at, text)
    }

    /// Deletes `[from, to)` and returns how much the document shrank.
    ///
    /// Elements straddling either end keep their open and close tokens.
    pub fn delete_range(&mut self, from: usize, to: usize) -> usize {
        let before = self.content_size();
        let to = to.min(before);
        let from = from.min(to);
        if from < to {
            delete_in(&mut self.root.children, from, to);
        }
        before - self.content_size()
    }
}

fn char_at_in(el: &Element, rel: usize) -> Option<char> {
    let mut offset = 0;
    for child in &el.children {
        let size = child.node_size();
        if rel < offset + size {
            return match child {
                Node::Text(text) => text.chars().nth(rel - offset),
                Node::Element(inner) if !inner.is_leaf() && rel > offset => {
                    char_at_in(inner, rel - offset - 1)
                }
                Node::Element(_) => None,
            };
        }
        offset += size;
    }
    None
}

fn collect_text(el: &Element, start: usize, from: usize, to: usize, out: &mut String) {
    let mut pos = start;
    for child in &el.children {
        match child {
            Node::Text(text) => {
                for ch in text.chars() {
                    if pos >= from && pos < to {
                        out.push(ch);
                    }
                    pos += 1;
                }
            }
            Node::Element(inner) => {
                if !inner.is_leaf() {
                    collect_text(inner, pos + 1, from, to, out);
                }
                pos += inner.node_size();
            }
        }
    }
}

fn insert_into(el: &mut Element, rel: usize, abs: usize, text: &str) -> Result<(), EngineError> {
    let mut offset = 0;
    let mut boundary = None;
    for (index, child) in el.children.iter_mut().enumerate() {
        if rel == offset {
            boundary = Some(index);
            break;
        }
        let size = child.node_size();
        if rel < offset + size {
            let inner = rel - offset;
            return match child {
                Node::Text(existing) => {
                    let byte = byte_index(existing, inner);
                    existing.insert_str(byte, text);
                    Ok(())
                }
                Node::Element(child_el) => insert_into(child_el, inner - 1, abs, text),
            };
        }
        offset += size;
    }

    let index = match boundary {
        Some(index) => index,
        None if rel == offset => el.children.len(),
        None => {
            return Err(EngineError::OutOfRange {
                pos: abs,
                size: offset,
            });
        }
    };
    if !el.inline_content() {
        return Err(EngineError::InvalidInsertPosition {
            pos: abs,
            parent: el.node_type.clone(),
        });
    }
    el.children.insert(index, Node::text(text));
    normalize(&mut el.children);
    Ok(())
}

fn delete_in(children: &mut Vec<Node>, from: usize, to: usize) {
    let mut kept = Vec::with_capacity(children.len());
    let mut offset = 0;
    for child in children.drain(..) {
        let start = offset;
        let end = offset + child.node_size();
        offset = end;

        if end <= from || start >= to {
            kept.push(child);
            continue;
        }
        if from <= start && end <= to {
            continue;
        }
        match child {
            Node::Text(text) => {
                let trimmed: String = text
                    .chars()
                    .enumerate()
                    .filter(|(i, _)| {
                        let pos = start + i;
                        pos < from || pos >= to
                    })
                    .map(|(_, ch)| ch)
                    .collect();
                kept.push(Node::Text(trimmed));
            }
            Node::Element(mut el) => {
                let content_start = start + 1;
                let content_end = end - 1;
                let inner_from = from.clamp(content_start, content_end) - content_start;
                let inner_to = to.clamp(content_start, content_end) - content_start;
                if inner_from < inner_to {
                    delete_in(&mut el.children, inner_from, inner_to);
                }
                kept.push(Node::Element(el));
            }
        }
    }
    normalize(&mut kept);
    *children = kept;
}

/// Merges adjacent text nodes and drops empty ones.
fn normalize(children: &mut Vec<Node>) {
    let mut out: Vec<Node> = Vec::with_capacity(children.len());
    for child in children.drain(..) {
        match (out.last_mut(), child) {
            (_, Node::Text(text)) if text.is_empty() => {}
            (Some(Node::Text(prev)), Node::Text(text)) => prev.push_str(&text),
            (_, child) => out.push(child),
        }
    }
    *children = out;
}

fn byte_index(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}
