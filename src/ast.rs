// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

// Position-aware mirror of a parsed YAML document.

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Sequence(SequenceNode),
    Map(MapNode),
    Scalar(ScalarNode),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SequenceNode {
    pub src_loc: SourceLocation,
    pub tag: Option<String>,
    pub values: Vec<Node>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MapNode {
    pub src_loc: SourceLocation,
    pub tag: Option<String>,
    pub entries: Vec<MapEntry>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MapEntry {
    pub key: Node,
    pub value: Node,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScalarNode {
    pub src_loc: SourceLocation,
    pub tag: Option<String>,
    pub style: ScalarStyle,
    pub value: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScalarStyle {
    Plain,
    // Single quoted, double quoted, literal or folded.
    Quoted,
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct SourceLocation {
    pub index: usize,
    // 1-based.
    pub line: usize,
    // 1-based.
    pub col: usize,
}

impl Node {
    pub fn src_loc(&self) -> &SourceLocation {
        match self {
            Node::Sequence(SequenceNode { src_loc, .. })
            | Node::Map(MapNode { src_loc, .. })
            | Node::Scalar(ScalarNode { src_loc, .. }) => src_loc,
        }
    }

    pub fn line(&self) -> usize {
        self.src_loc().line
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            Node::Sequence(SequenceNode { tag, .. })
            | Node::Map(MapNode { tag, .. })
            | Node::Scalar(ScalarNode { tag, .. }) => tag.as_deref(),
        }
    }

    /// Literal text of a scalar node, used for building dotted paths out of mapping keys.
    pub fn key_text(&self) -> Option<&str> {
        match self {
            Node::Scalar(scalar) => Some(&scalar.value),
            Node::Sequence(_) | Node::Map(_) => None,
        }
    }
}
