// Copyright (c) Chris Gunn.
// Licensed under the MIT license.


use std::str::Chars;

use saphyr_parser::{Event, Marker, Parser as YamlParser, ScanError, TScalarStyle, Tag};

use crate::ast::{MapEntry, MapNode, Node, ScalarNode, ScalarStyle, SequenceNode, SourceLocation};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("{0}")]
    Scan(#[from] ScanError),
    #[error("{line}:{col} yaml aliases are not supported")]
    Alias { line: usize, col: usize },
    #[error("template must only have a single document")]
    MultipleDocuments,
}

/// Parses a single YAML document into a [Node] tree that remembers where every node starts.
///
/// An empty stream produces a null scalar at line 1.
pub fn parse_yaml_str(input: &str) -> Result<Node, ParseError> {
    let yaml_parser = &mut YamlParser::new(input.chars());

    // Parse StreamStart.
    let (evt_strm_start, _) = yaml_parser.next_token()?;
    assert!(matches!(evt_strm_start, Event::StreamStart { .. }));

    // Parse docs.
    let mut docs = Vec::new();
    loop {
        let (event, _) = yaml_parser.peek()?;
        match event {
            Event::DocumentStart { .. } => {
                let doc = parse_doc(yaml_parser)?;
                docs.push(doc);
            }
            Event::StreamEnd { .. } => break,
            _ => unreachable!(),
        }
    }

    // Parse StreamEnd.
    let (evt_strm_end, _) = yaml_parser.next_token()?;
    assert!(matches!(evt_strm_end, Event::StreamEnd { .. }));

    let mut docs = docs.into_iter();
    match (docs.next(), docs.next()) {
        (None, _) => Ok(empty_document()),
        (Some(doc), None) => Ok(doc),
        (Some(_), Some(_)) => Err(ParseError::MultipleDocuments),
    }
}

fn empty_document() -> Node {
    Node::Scalar(ScalarNode {
        src_loc: SourceLocation { index: 0, line: 1, col: 1 },
        tag: None,
        style: ScalarStyle::Plain,
        value: "~".to_string(),
    })
}

fn parse_doc(yaml_parser: &mut YamlParser<Chars<'_>>) -> Result<Node, ParseError> {
    // Parse DocumentStart.
    let (doc_start, _) = yaml_parser.next_token()?;
    assert!(matches!(doc_start, Event::DocumentStart { .. }));

    // Parse node.
    let node = parse_node(yaml_parser)?;

    // Parse DocumentEnd.
    let (doc_end, _) = yaml_parser.next_token()?;
    assert!(matches!(doc_end, Event::DocumentEnd { .. }));

    Ok(node)
}

fn parse_node(yaml_parser: &mut YamlParser<Chars<'_>>) -> Result<Node, ParseError> {
    let (event, mark) = yaml_parser.peek()?;
    match event {
        Event::SequenceStart(..) => {
            let sequence = parse_sequence(yaml_parser)?;
            Ok(Node::Sequence(sequence))
        }
        Event::MappingStart(..) => {
            let map = parse_mapping(yaml_parser)?;
            Ok(Node::Map(map))
        }
        Event::Scalar(..) => {
            let scalar = parse_scalar(yaml_parser)?;
            Ok(Node::Scalar(scalar))
        }
        Event::Alias(..) => {
            let src_loc = to_source_location(mark);
            Err(ParseError::Alias {
                line: src_loc.line,
                col: src_loc.col,
            })
        }
        _ => unreachable!(),
    }
}

fn is_node_start(event: &Event) -> bool {
    matches!(
        event,
        Event::SequenceStart(..) | Event::MappingStart(..) | Event::Scalar(..) | Event::Alias(..)
    )
}

fn parse_sequence(yaml_parser: &mut YamlParser<Chars<'_>>) -> Result<SequenceNode, ParseError> {
    // Parse SequenceStart.
    let (seq_start, start) = yaml_parser.next_token()?;
    let Event::SequenceStart(_, tag) = seq_start else {
        unreachable!()
    };

    // Parse nodes.
    let mut values = Vec::new();
    loop {
        let (event, _) = yaml_parser.peek()?;
        if is_node_start(event) {
            let value = parse_node(yaml_parser)?;
            values.push(value);
        } else if matches!(event, Event::SequenceEnd { .. }) {
            break;
        } else {
            unreachable!()
        }
    }

    // Parse SequenceEnd.
    let (seq_end, _) = yaml_parser.next_token()?;
    assert!(matches!(seq_end, Event::SequenceEnd { .. }));

    let seq = SequenceNode {
        src_loc: to_source_location(&start),
        tag: tag.map(tag_to_string),
        values,
    };
    Ok(seq)
}

fn parse_mapping(yaml_parser: &mut YamlParser<Chars<'_>>) -> Result<MapNode, ParseError> {
    // Parse MappingStart.
    let (map_start, start) = yaml_parser.next_token()?;
    let Event::MappingStart(_, tag) = map_start else {
        unreachable!()
    };

    // Parse entries.
    let mut entries = Vec::new();
    loop {
        let (event, _) = yaml_parser.peek()?;
        if matches!(event, Event::MappingEnd { .. }) {
            break;
        }
        if !is_node_start(event) {
            unreachable!()
        }
        let key = parse_node(yaml_parser)?;

        let (event, _) = yaml_parser.peek()?;
        if !is_node_start(event) {
            unreachable!()
        }
        let value = parse_node(yaml_parser)?;

        entries.push(MapEntry { key, value });
    }

    // Parse MappingEnd.
    let (map_end, _) = yaml_parser.next_token()?;
    assert!(matches!(map_end, Event::MappingEnd { .. }));

    let mut src_loc = to_source_location(&start);

    // In YAML, you don't know that you are parsing a map until you see the first colon ':' character.
    // So, the MappingStart's mark may point past the start of the first key.
    if let Some(first) = entries.first() {
        if first.key.src_loc().index < src_loc.index {
            src_loc = first.key.src_loc().clone();
        }
    }

    let map = MapNode {
        src_loc,
        tag: tag.map(tag_to_string),
        entries,
    };
    Ok(map)
}

fn parse_scalar(yaml_parser: &mut YamlParser<Chars<'_>>) -> Result<ScalarNode, ParseError> {
    // Parse Scalar.
    let (scalar, start) = yaml_parser.next_token()?;
    let Event::Scalar(value, style, _, tag) = scalar else {
        unreachable!()
    };

    let style = match style {
        TScalarStyle::Plain => ScalarStyle::Plain,
        _ => ScalarStyle::Quoted,
    };

    let scalar = ScalarNode {
        src_loc: to_source_location(&start),
        tag: tag.map(tag_to_string),
        style,
        value: value.to_string(),
    };
    Ok(scalar)
}

// `!Ref` arrives as handle `!` and suffix `Ref`.
fn tag_to_string(tag: Tag) -> String {
    format!("{}{}", tag.handle, tag.suffix)
}

fn to_source_location(mark: &Marker) -> SourceLocation {
    SourceLocation {
        index: mark.index(),
        line: mark.line(),
        col: mark.col() + 1,
    }
}
