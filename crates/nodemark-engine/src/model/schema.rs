use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// What a node may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentModel {
    /// Block children (the document root, containers).
    Block,
    /// Text and inline nodes (paragraphs, atomic units).
    Inline,
    /// Nothing: the node is a leaf with size 1.
    Empty,
}

/// Static description of a node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeSpec {
    pub content: ContentModel,
    /// Whether the node sits in inline content (as opposed to block content).
    pub inline: bool,
}

impl NodeSpec {
    pub const fn block(content: ContentModel) -> Self {
        Self {
            content,
            inline: false,
        }
    }

    pub const fn inline(content: ContentModel) -> Self {
        Self {
            content,
            inline: true,
        }
    }
}

/// Name of a node type. Two nodes have the same type when their names match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeType(String);

impl NodeType {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

pub const DOC: &str = "doc";
pub const PARAGRAPH: &str = "p";
pub const HARD_BREAK: &str = "br";
pub const RULE: &str = "hr";

/// Registry of node types known to a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    specs: BTreeMap<NodeType, NodeSpec>,
}

impl Schema {
    /// Root `doc`, paragraph `p`, inline leaf `br` and block leaf `hr`.
    pub fn basic() -> Self {
        let mut schema = Self {
            specs: BTreeMap::new(),
        };
        schema.register(DOC, NodeSpec::block(ContentModel::Block));
        schema.register(PARAGRAPH, NodeSpec::block(ContentModel::Inline));
        schema.register(HARD_BREAK, NodeSpec::inline(ContentModel::Empty));
        schema.register(RULE, NodeSpec::block(ContentModel::Empty));
        schema
    }

    /// Adds an inline node type with inline content, suitable as an atomic unit.
    pub fn with_atom(mut self, name: &str) -> Self {
        self.register(name, NodeSpec::inline(ContentModel::Inline));
        self
    }

    pub fn register(&mut self, name: &str, spec: NodeSpec) {
        self.specs.insert(NodeType::new(name), spec);
    }

    pub fn spec(&self, node_type: &NodeType) -> Option<NodeSpec> {
        self.specs.get(node_type).copied()
    }

    pub fn node_type(&self, name: &str) -> Result<NodeType, EngineError> {
        let node_type = NodeType::new(name);
        if self.specs.contains_key(&node_type) {
            Ok(node_type)
        } else {
            Err(EngineError::UnknownNodeType {
                name: name.to_string(),
            })
        }
    }

    /// Looks up `name` and checks that it can act as an atomic unit.
    pub fn atom_type(&self, name: &str) -> Result<NodeType, EngineError> {
        let node_type = self.node_type(name)?;
        match self.spec(&node_type) {
            Some(NodeSpec {
                content: ContentModel::Inline,
                inline: true,
            }) => Ok(node_type),
            _ => Err(EngineError::InvalidAtomType { node_type }),
        }
    }

    pub fn root_type(&self) -> NodeType {
        NodeType::new(DOC)
    }
}
