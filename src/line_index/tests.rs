use pretty_assertions::assert_eq;

use super::*;
use crate::parser::parse_yaml_str;

const MEMBERS_ONLY: Convention = Convention {
    sequences: SequenceRule::RecurseIndexed,
    record_scalars: false,
    nested_mappings: false,
};

const DETAILED: Convention = Convention {
    sequences: SequenceRule::RecordNonEmpty,
    record_scalars: true,
    nested_mappings: true,
};

fn entry(path: &str, start_line: usize) -> PathEntry {
    PathEntry {
        path: path.to_string(),
        start_line,
    }
}

fn index(input: &str, section: &str, convention: &Convention) -> Vec<PathEntry> {
    index_lines(&parse_yaml_str(input).unwrap(), section, convention)
}

#[test]
fn single_resource() {
    let entries = index("Resources:\n  A:\n    Type: X", "Resources", &MEMBERS_ONLY);
    assert_eq!(entries, vec![entry("A", 2)]);
}

#[test]
fn other_sections_are_ignored() {
    let input = "\
Parameters:
  Env:
    Type: String
Resources:
  Bucket:
    Type: AWS::S3::Bucket
  Queue:

    Type: AWS::SQS::Queue
";
    assert_eq!(
        index(input, "Resources", &MEMBERS_ONLY),
        vec![entry("Bucket", 5), entry("Queue", 7)]
    );
    assert_eq!(index(input, "Parameters", &MEMBERS_ONLY), vec![entry("Env", 2)]);
    assert_eq!(index(input, "Outputs", &DETAILED), vec![]);
}

#[test]
fn flow_mappings() {
    let entries = index("Resources: {A: {Type: X}, B: {Type: Y}}", "Resources", &MEMBERS_ONLY);
    assert_eq!(entries, vec![entry("A", 1), entry("B", 1)]);
}

#[test]
fn indexed_recursion_records_nested_members_only() {
    let input = "\
Resources:
  A:
    Type: X
    DependsOn:
      - B
      - C
";
    assert_eq!(index(input, "Resources", &MEMBERS_ONLY), vec![entry("A", 2)]);
}

#[test]
fn sequences_and_scalars_are_recorded() {
    let input = "\
Outputs:
  Name:
    Value: x
    Empty: []
    Items:
      - a
      - b
";
    assert_eq!(
        index(input, "Outputs", &DETAILED),
        vec![
            entry("Name", 2),
            entry("Outputs.Name.Value", 3),
            entry("Outputs.Name.Items", 6),
        ]
    );
}

#[test]
fn duplicate_leaf_names_keep_their_parents() {
    let input = "\
Mappings:
  RegionMap:
    us-east-1:
      AMI: ami-1
  SizeMap:
    small:
      AMI: ami-2
";
    let root = parse_yaml_str(input).unwrap();
    let index = LineIndex::build(&root, "Mappings", &DETAILED);

    assert_eq!(index.line_of("Mappings", &["RegionMap"]), Some(2));
    assert_eq!(index.line_of("Mappings", &["SizeMap"]), Some(5));
    assert_eq!(index.line_of("Mappings", &["RegionMap", "us-east-1"]), Some(3));
    assert_eq!(index.line_of("Mappings", &["SizeMap", "small"]), Some(6));
    assert_eq!(index.line_of("Mappings", &["SizeMap", "small", "AMI"]), Some(7));
    assert_eq!(index.line_of("Mappings", &["SizeMap", "us-east-1"]), None);
}

#[test]
fn one_entry_per_member() {
    let input = "\
Resources:
  A:
    Type: X
    Properties:
      Tags:
        - Key: k
          Value: v
";
    let entries = index(input, "Resources", &MEMBERS_ONLY);
    assert_eq!(entries.iter().filter(|entry| entry.path == "A").count(), 1);
}

#[test]
fn repeated_member_takes_the_last_occurrence() {
    let input = "\
Outputs:
  A:
    Value: x
    Description: old
  A:
    Value: y
";
    assert_eq!(
        index(input, "Outputs", &DETAILED),
        vec![entry("A", 5), entry("Outputs.A.Value", 6)]
    );

    let root = parse_yaml_str(input).unwrap();
    assert_eq!(LineIndex::build(&root, "Outputs", &DETAILED).line_of("Outputs", &["A"]), Some(5));
}

#[test]
fn dotted_keys_do_not_collide() {
    let input = "\
Mappings:
  a.b:
    c:
      n: 1
  a:
    b.c:
      n: 2
";
    let root = parse_yaml_str(input).unwrap();
    let index = LineIndex::build(&root, "Mappings", &DETAILED);

    assert_eq!(index.line_of("Mappings", &["a.b", "c"]), Some(3));
    assert_eq!(index.line_of("Mappings", &["a", "b.c"]), Some(6));
    assert_eq!(index.line_of("Mappings", &["a", "b", "c"]), None);
}
