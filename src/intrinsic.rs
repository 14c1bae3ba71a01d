// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

// CloudFormation short-form intrinsic function tags.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intrinsic {
    And,
    Base64,
    Cidr,
    Condition,
    Equals,
    FindInMap,
    GetAtt,
    GetAZs,
    If,
    ImportValue,
    Join,
    Not,
    Or,
    Ref,
    Select,
    Split,
    Sub,
    Transform,
}

/// How a scalar payload is turned into the canonical argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayloadRule {
    Verbatim,
    // `Resource.Attribute` becomes `[Resource, Attribute]`.
    SplitOnFirstDot,
}

impl Intrinsic {
    pub const ALL: [Intrinsic; 18] = [
        Intrinsic::And,
        Intrinsic::Base64,
        Intrinsic::Cidr,
        Intrinsic::Condition,
        Intrinsic::Equals,
        Intrinsic::FindInMap,
        Intrinsic::GetAtt,
        Intrinsic::GetAZs,
        Intrinsic::If,
        Intrinsic::ImportValue,
        Intrinsic::Join,
        Intrinsic::Not,
        Intrinsic::Or,
        Intrinsic::Ref,
        Intrinsic::Select,
        Intrinsic::Split,
        Intrinsic::Sub,
        Intrinsic::Transform,
    ];

    pub fn from_tag(tag: &str) -> Option<Intrinsic> {
        let name = tag.strip_prefix('!')?;
        Intrinsic::ALL.into_iter().find(|intrinsic| intrinsic.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Intrinsic::And => "And",
            Intrinsic::Base64 => "Base64",
            Intrinsic::Cidr => "Cidr",
            Intrinsic::Condition => "Condition",
            Intrinsic::Equals => "Equals",
            Intrinsic::FindInMap => "FindInMap",
            Intrinsic::GetAtt => "GetAtt",
            Intrinsic::GetAZs => "GetAZs",
            Intrinsic::If => "If",
            Intrinsic::ImportValue => "ImportValue",
            Intrinsic::Join => "Join",
            Intrinsic::Not => "Not",
            Intrinsic::Or => "Or",
            Intrinsic::Ref => "Ref",
            Intrinsic::Select => "Select",
            Intrinsic::Split => "Split",
            Intrinsic::Sub => "Sub",
            Intrinsic::Transform => "Transform",
        }
    }

    pub fn tag(self) -> String {
        format!("!{}", self.name())
    }

    pub fn canonical_key(self) -> String {
        match self {
            Intrinsic::Ref | Intrinsic::Condition => self.name().to_string(),
            _ => format!("Fn::{}", self.name()),
        }
    }

    pub fn payload_rule(self) -> PayloadRule {
        match self {
            Intrinsic::GetAtt => PayloadRule::SplitOnFirstDot,
            _ => PayloadRule::Verbatim,
        }
    }
}
