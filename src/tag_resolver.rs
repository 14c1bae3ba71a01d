// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

// Rewrites CloudFormation short-form tags (`!Ref x`) into their canonical mapping form (`Ref: x`).


use crate::{
    ast::{MapEntry, MapNode, Node, ScalarNode, ScalarStyle, SequenceNode, SourceLocation},
    intrinsic::{Intrinsic, PayloadRule},
    parser::parse_yaml_str,
};

// Tags that can also be rewritten in the raw text, before any parsing.
const TEXT_REWRITTEN: [Intrinsic; 3] = [Intrinsic::If, Intrinsic::Equals, Intrinsic::FindInMap];

/// Builds a new tree where every scalar tagged with a known intrinsic function is replaced by a one-key mapping
/// holding the canonical form.
///
/// Tagged sequences and mappings, and scalars with unknown tags, keep their tag. Their children are still resolved.
///
/// # Panic
/// Panics if a synthesized fragment does not parse, which means the fragment builder is broken.
pub fn resolve_tags(node: &Node) -> Node {
    match node {
        Node::Scalar(scalar) => {
            let intrinsic = node.tag().and_then(Intrinsic::from_tag);
            match intrinsic {
                Some(intrinsic) => {
                    let canonical = synthesize(intrinsic, scalar);
                    resolve_tags(&canonical)
                }
                None => node.clone(),
            }
        }
        Node::Sequence(seq) => Node::Sequence(SequenceNode {
            src_loc: seq.src_loc.clone(),
            tag: seq.tag.clone(),
            values: seq.values.iter().map(resolve_tags).collect(),
        }),
        Node::Map(map) => Node::Map(MapNode {
            src_loc: map.src_loc.clone(),
            tag: map.tag.clone(),
            entries: map
                .entries
                .iter()
                .map(|entry| MapEntry {
                    key: resolve_tags(&entry.key),
                    value: resolve_tags(&entry.value),
                })
                .collect(),
        }),
    }
}

fn synthesize(intrinsic: Intrinsic, scalar: &ScalarNode) -> Node {
    let fragment = format!("{}: {}", intrinsic.canonical_key(), render_payload(intrinsic, scalar));

    let node = parse_yaml_str(&fragment)
        .unwrap_or_else(|err| panic!("synthesized fragment {:?} failed to parse: {}", fragment, err));
    assert!(
        matches!(&node, Node::Map(map) if map.entries.len() == 1),
        "synthesized fragment {:?} is not a one-key mapping",
        fragment
    );

    relocate(node, &scalar.src_loc)
}

// Plain payloads are inserted as written so their type is inferred again. Anything else is inserted as a JSON
// string, which YAML reads back as the same double-quoted string.
fn render_payload(intrinsic: Intrinsic, scalar: &ScalarNode) -> String {
    if intrinsic.payload_rule() == PayloadRule::SplitOnFirstDot {
        if let Some((resource, attribute)) = scalar.value.split_once('.') {
            return json_literal(&[resource, attribute]);
        }
    }

    match scalar.style {
        ScalarStyle::Plain => scalar.value.clone(),
        ScalarStyle::Quoted => json_literal(&scalar.value),
    }
}

fn json_literal<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|err| panic!("string payload failed to encode: {}", err))
}

// Fragments are parsed on their own, so move them to where the tagged scalar was.
fn relocate(node: Node, src_loc: &SourceLocation) -> Node {
    match node {
        Node::Scalar(scalar) => Node::Scalar(ScalarNode {
            src_loc: src_loc.clone(),
            ..scalar
        }),
        Node::Sequence(seq) => Node::Sequence(SequenceNode {
            src_loc: src_loc.clone(),
            tag: seq.tag,
            values: seq.values.into_iter().map(|value| relocate(value, src_loc)).collect(),
        }),
        Node::Map(map) => Node::Map(MapNode {
            src_loc: src_loc.clone(),
            tag: map.tag,
            entries: map
                .entries
                .into_iter()
                .map(|entry| MapEntry {
                    key: relocate(entry.key, src_loc),
                    value: relocate(entry.value, src_loc),
                })
                .collect(),
        }),
    }
}

/// Replaces `!If`, `!Equals` and `!FindInMap` in raw template text with a line break and an indented canonical key.
///
/// Only whole tag tokens are replaced: `!Iffy` is left alone.
pub fn rewrite_condition_tags(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('!') {
        output.push_str(&rest[..pos]);
        let candidate = &rest[pos..];

        let matched = TEXT_REWRITTEN.into_iter().find_map(|intrinsic| {
            let tag = intrinsic.tag();
            let after = candidate.strip_prefix(tag.as_str())?;
            let at_boundary = after.chars().next().map_or(true, |c| !c.is_alphanumeric());
            at_boundary.then_some((intrinsic, tag.len()))
        });

        match matched {
            Some((intrinsic, len)) => {
                output.push('\n');
                output.push_str(&" ".repeat(8));
                output.push_str(&intrinsic.canonical_key());
                output.push(':');
                rest = &candidate[len..];
            }
            None => {
                output.push('!');
                rest = &candidate[1..];
            }
        }
    }

    output.push_str(rest);
    output
}
