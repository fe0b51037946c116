//! Compact textual form of documents, used by tests and replay scripts.
//!
//! `<p>A<chip>xy</chip>B</p>` builds a paragraph holding a `chip` unit; the
//! `doc` root is implicit. `<br/>` is a leaf. `|` marks a caret, `[` and `]`
//! mark the anchor and head of a selection, and `\` escapes the next
//! character.

use crate::error::EngineError;
use crate::model::node::{Document, Element, Node};
use crate::model::schema::{ContentModel, NodeSpec, NodeType, Schema};
use crate::model::selection::Selection;

/// A document parsed from markup, with the selection it marked (if any).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    pub doc: Document,
    pub selection: Option<Selection>,
}

/// A cursor over markup source with character-level stepping.
#[derive(Clone)]
struct Cursor<'a> {
    s: &'a str,
    i: usize,
}

impl<'a> Cursor<'a> {
    fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.s[self.i..].chars().next()
    }

    fn starts_with(&self, pat: &str) -> bool {
        self.s[self.i..].starts_with(pat)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.i += ch.len_utf8();
        Some(ch)
    }

    fn bump_n(&mut self, n: usize) {
        self.i += n;
    }

    fn take_name(&mut self) -> &'a str {
        let start = self.i;
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' || ch == '-' {
                self.bump();
            } else {
                break;
            }
        }
        &self.s[start..self.i]
    }
}

struct Frame {
    node_type: NodeType,
    spec: NodeSpec,
    children: Vec<Node>,
    text: String,
}

impl Frame {
    fn new(node_type: NodeType, spec: NodeSpec) -> Self {
        Self {
            node_type,
            spec,
            children: Vec::new(),
            text: String::new(),
        }
    }

    fn flush(&mut self) {
        if !self.text.is_empty() {
            self.children.push(Node::Text(std::mem::take(&mut self.text)));
        }
    }

    fn finish(mut self) -> Element {
        self.flush();
        Element::new(self.node_type, self.spec, self.children)
    }

    fn accepts(&self, spec: &NodeSpec) -> bool {
        match self.spec.content {
            ContentModel::Block => !spec.inline,
            ContentModel::Inline => spec.inline,
            ContentModel::Empty => false,
        }
    }
}

/// Parses markup against `schema`.
pub fn parse(schema: &Schema, markup: &str) -> Result<Parsed, EngineError> {
    let root_type = schema.root_type();
    let root_spec = schema
        .spec(&root_type)
        .ok_or_else(|| EngineError::UnknownNodeType {
            name: root_type.name().to_string(),
        })?;

    let mut cur = Cursor::new(markup);
    let mut stack = vec![Frame::new(root_type, root_spec)];
    let mut pos = 0usize;
    let mut anchor = None;
    let mut head = None;

    while let Some(ch) = cur.peek() {
        let offset = cur.i;
        match ch {
            '<' if cur.starts_with("</") => {
                cur.bump_n(2);
                let name = cur.take_name();
                if cur.bump() != Some('>') {
                    return Err(EngineError::markup(offset, "unterminated closing tag"));
                }
                if stack.len() < 2 {
                    return Err(EngineError::markup(offset, format!("unexpected `</{name}>`")));
                }
                let Some(frame) = stack.pop() else {
                    return Err(EngineError::markup(offset, "unbalanced tags"));
                };
                if frame.node_type.name() != name {
                    return Err(EngineError::markup(
                        offset,
                        format!("expected `</{}>`, found `</{name}>`", frame.node_type),
                    ));
                }
                let el = frame.finish();
                pos += 1;
                if let Some(parent) = stack.last_mut() {
                    parent.flush();
                    parent.children.push(Node::Element(el));
                }
            }
            '<' => {
                cur.bump();
                let name = cur.take_name();
                let node_type = schema.node_type(name).map_err(|_| {
                    EngineError::markup(offset, format!("unknown tag `{name}`"))
                })?;
                let Some(spec) = schema.spec(&node_type) else {
                    return Err(EngineError::markup(offset, format!("unknown tag `{name}`")));
                };
                let Some(parent) = stack.last_mut() else {
                    return Err(EngineError::markup(offset, "unbalanced tags"));
                };
                if !parent.accepts(&spec) {
                    return Err(EngineError::markup(
                        offset,
                        format!("`{}` cannot contain `{name}`", parent.node_type),
                    ));
                }
                parent.flush();
                if cur.starts_with("/>") {
                    cur.bump_n(2);
                    let el = Element::new(node_type, spec, Vec::new());
                    pos += el.node_size();
                    parent.children.push(Node::Element(el));
                } else if cur.bump() == Some('>') {
                    if spec.content == ContentModel::Empty {
                        return Err(EngineError::markup(
                            offset,
                            format!("leaf `{name}` must be written `<{name}/>`"),
                        ));
                    }
                    pos += 1;
                    stack.push(Frame::new(node_type, spec));
                } else {
                    return Err(EngineError::markup(offset, "unterminated tag"));
                }
            }
            '|' => {
                cur.bump();
                if anchor.is_some() || head.is_some() {
                    return Err(EngineError::markup(offset, "selection marked twice"));
                }
                anchor = Some(pos);
                head = Some(pos);
            }
            '[' => {
                cur.bump();
                anchor = Some(pos);
            }
            ']' => {
                cur.bump();
                head = Some(pos);
            }
            _ => {
                cur.bump();
                let ch = if ch == '\\' {
                    cur.bump()
                        .ok_or_else(|| EngineError::markup(offset, "dangling escape"))?
                } else {
                    ch
                };
                let Some(frame) = stack.last_mut() else {
                    return Err(EngineError::markup(offset, "unbalanced tags"));
                };
                if frame.spec.content != ContentModel::Inline {
                    return Err(EngineError::markup(
                        offset,
                        format!("text is not allowed in `{}`", frame.node_type),
                    ));
                }
                frame.text.push(ch);
                pos += 1;
            }
        }
    }

    if stack.len() != 1 {
        return Err(EngineError::markup(markup.len(), "unclosed tag"));
    }
    let Some(root) = stack.pop() else {
        return Err(EngineError::markup(markup.len(), "unbalanced tags"));
    };

    let selection = match (anchor, head) {
        (Some(anchor), Some(head)) => Some(Selection::new(anchor, head)),
        (None, None) => None,
        _ => {
            return Err(EngineError::markup(
                markup.len(),
                "selection needs both `[` and `]`",
            ));
        }
    };

    Ok(Parsed {
        doc: Document::new(root.finish()),
        selection,
    })
}

/// Renders `doc` back to markup, marking `selection` if given.
pub fn render(doc: &Document, selection: Option<Selection>) -> String {
    let mut out = String::new();
    let mut pos = 0;
    mark(&mut out, pos, selection);
    render_children(doc.root(), &mut pos, selection, &mut out);
    out
}

fn render_children(el: &Element, pos: &mut usize, selection: Option<Selection>, out: &mut String) {
    for child in &el.children {
        match child {
            Node::Text(text) => {
                for ch in text.chars() {
                    if matches!(ch, '<' | '|' | '[' | ']' | '\\') {
                        out.push('\\');
                    }
                    out.push(ch);
                    *pos += 1;
                    mark(out, *pos, selection);
                }
            }
            Node::Element(inner) if inner.is_leaf() => {
                out.push('<');
                out.push_str(inner.node_type.name());
                out.push_str("/>");
                *pos += 1;
                mark(out, *pos, selection);
            }
            Node::Element(inner) => {
                out.push('<');
                out.push_str(inner.node_type.name());
                out.push('>');
                *pos += 1;
                mark(out, *pos, selection);
                render_children(inner, pos, selection, out);
                out.push_str("</");
                out.push_str(inner.node_type.name());
                out.push('>');
                *pos += 1;
                mark(out, *pos, selection);
            }
        }
    }
}

fn mark(out: &mut String, pos: usize, selection: Option<Selection>) {
    let Some(sel) = selection else { return };
    if sel.is_empty() {
        if sel.head == pos {
            out.push('|');
        }
    } else {
        if sel.anchor == pos {
            out.push('[');
        }
        if sel.head == pos {
            out.push(']');
        }
    }
}
