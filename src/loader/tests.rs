use std::{fs, path::Path};

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use super::*;

const STACK: &str = r#"AWSTemplateFormatVersion: "2010-09-09"
Parameters:
  Env:
    Type: String
    Default: dev
Mappings:
  RegionMap:
    us-east-1:
      AMI: ami-123
      Size: 2
    eu-west-1: {AMI: ami-456, Size: 3}
Conditions:
  IsProd: !Equals [!Ref Env, prod]
Resources:
  Bucket:
    Type: AWS::S3::Bucket
    Condition: IsProd
    Properties:
      BucketName: !Sub "${Env}-bucket"
      Tags:
        - Key: Arn
          Value: !GetAtt Role.Arn
  Role:
    Type: AWS::IAM::Role
    DependsOn: [Bucket]
Outputs:
  BucketName:
    Value: !Ref Bucket
    Export:
      Name: !Sub "${AWS::StackName}-bucket"
"#;

fn path() -> &'static Path {
    Path::new("stack.yaml")
}

fn collect(loader: &TemplateLoader, content: &str, section: Section) -> Result<Vec<Value>> {
    let mut records = Vec::new();
    loader.records(path(), content, section, |record| {
        records.push(serde_json::to_value(record).unwrap())
    })?;
    Ok(records)
}

fn resources(loader: &TemplateLoader, content: &str) -> Result<Vec<ResourceRecord>> {
    let mut records = Vec::new();
    loader.resources(path(), content, |record| records.push(record))?;
    Ok(records)
}

fn format_reason(err: Error) -> String {
    match err {
        Error::TemplateFormat { reason, .. } => reason,
        other => panic!("expected a template format error, got {other:?}"),
    }
}

#[test]
fn end_to_end() {
    let content = "Resources:\n  Bucket:\n    Type: AWS::S3::Bucket\nOutputs:\n  BucketName:\n    Value: !Ref Bucket";
    let loader = TemplateLoader::default();

    let resources = resources(&loader, content).unwrap();
    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0].name, "Bucket");
    assert_eq!(resources[0].resource_type, "AWS::S3::Bucket");
    assert_eq!(resources[0].start_line, 2);

    let mut outputs = Vec::new();
    loader.outputs(path(), content, |record| outputs.push(record)).unwrap();
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs[0].name, "BucketName");
    assert_eq!(outputs[0].value, json!({"Ref": "Bucket"}));
    assert_eq!(outputs[0].start_line, 5);
}

#[test]
fn resource_records() {
    let records = resources(&TemplateLoader::default(), STACK).unwrap();

    let bucket = &records[0];
    assert_eq!(bucket.name, "Bucket");
    assert_eq!(bucket.start_line, 15);
    assert_eq!(bucket.condition, Some(json!("IsProd")));
    assert_eq!(
        bucket.properties_literal,
        Some(json!({
            "BucketName": {"Fn::Sub": "${Env}-bucket"},
            "Tags": [{"Key": "Arn", "Value": {"Fn::GetAtt": ["Role", "Arn"]}}],
        }))
    );
    assert_eq!(bucket.properties_resolved, None);
    assert_eq!(bucket.path, Path::new("stack.yaml"));

    let role = &records[1];
    assert_eq!(role.name, "Role");
    assert_eq!(role.resource_type, "AWS::IAM::Role");
    assert_eq!(role.start_line, 23);
    assert_eq!(role.depends_on, Some(json!(["Bucket"])));
    assert_eq!(role.properties_literal, None);
}

#[test]
fn parameter_records() {
    let records = collect(&TemplateLoader::default(), STACK, Section::Parameters).unwrap();
    assert_eq!(
        records,
        vec![json!({
            "name": "Env",
            "type": "String",
            "default_value": "dev",
            "max_length": null,
            "min_length": null,
            "max_value": null,
            "min_value": null,
            "no_echo": null,
            "allowed_pattern": null,
            "allowed_values": null,
            "description": null,
            "constraint_description": null,
            "start_line": 3,
            "path": "stack.yaml",
        })]
    );
}

#[test]
fn output_records() {
    let records = collect(&TemplateLoader::default(), STACK, Section::Outputs).unwrap();
    assert_eq!(
        records,
        vec![json!({
            "name": "BucketName",
            "value": {"Ref": "Bucket"},
            "description": null,
            "export": {"Name": {"Fn::Sub": "${AWS::StackName}-bucket"}},
            "start_line": 27,
            "path": "stack.yaml",
        })]
    );
}

#[test]
fn mapping_records() {
    let mut records = Vec::new();
    TemplateLoader::default()
        .mappings(path(), STACK, |record| records.push(record))
        .unwrap();

    let rows: Vec<(&str, &str, &str, &Value, usize)> = records
        .iter()
        .map(|r| (r.map.as_str(), r.key.as_str(), r.name.as_str(), &r.value, r.start_line))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("RegionMap", "us-east-1", "AMI", &json!("ami-123"), 8),
            ("RegionMap", "us-east-1", "Size", &json!(2), 8),
            ("RegionMap", "eu-west-1", "AMI", &json!("ami-456"), 11),
            ("RegionMap", "eu-west-1", "Size", &json!(3), 11),
        ]
    );
}

#[test]
fn mapping_keys_correlate_with_their_own_map() {
    let content = "\
Resources: {}
Mappings:
  A:
    us-east-1:
      Ami: a
  B:
    us-east-1:
      Ami: b
";
    let mut records = Vec::new();
    TemplateLoader::default()
        .mappings(path(), content, |record| records.push(record))
        .unwrap();

    let rows: Vec<(&str, &str, &Value, usize)> = records
        .iter()
        .map(|r| (r.map.as_str(), r.key.as_str(), &r.value, r.start_line))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("A", "us-east-1", &json!("a"), 4),
            ("B", "us-east-1", &json!("b"), 7),
        ]
    );
}

#[test]
fn dotted_mapping_keys_keep_their_own_lines() {
    let content = "\
Resources: {}
Mappings:
  a.b:
    c:
      n: 1
  a:
    b.c:
      n: 2
";
    let mut records = Vec::new();
    TemplateLoader::default()
        .mappings(path(), content, |record| records.push(record))
        .unwrap();

    let rows: Vec<(&str, &str, usize)> = records
        .iter()
        .map(|r| (r.map.as_str(), r.key.as_str(), r.start_line))
        .collect();
    assert_eq!(rows, vec![("a.b", "c", 4), ("a", "b.c", 7)]);
}

#[test]
fn repeated_resource_takes_the_last_occurrence() {
    let content = "Resources:\n  A:\n    Type: X\n  A:\n    Type: Y\n";
    let records = resources(&TemplateLoader::default(), content).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].resource_type, "Y");
    assert_eq!(records[0].start_line, 4);
}

#[test]
fn mapping_keys_are_coerced_to_strings() {
    let content = "Resources: {}\nMappings:\n  Sizes:\n    1:\n      true: 10\n";
    let mut records = Vec::new();
    TemplateLoader::default()
        .mappings(path(), content, |record| records.push(record))
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].key, "1");
    assert_eq!(records[0].name, "true");
    assert_eq!(records[0].start_line, 4);
}

#[test]
fn missing_resources_fails_every_section() {
    let content = "Parameters:\n  Env:\n    Type: String\n";
    let loader = TemplateLoader::default();

    for section in Section::ALL {
        let err = collect(&loader, content, section).unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to parse AWS CloudFormation template from file stack.yaml: Template format error: \
             At least one Resources member must be defined",
            "section {section}"
        );
    }
}

#[test]
fn empty_documents_fail_every_section() {
    let loader = TemplateLoader::default();
    for content in ["", "# just a comment\n", "---\n", "~\n"] {
        for section in Section::ALL {
            let err = collect(&loader, content, section).unwrap_err();
            assert_eq!(
                format_reason(err),
                "At least one Resources member must be defined",
                "section {section}, content {content:?}"
            );
        }
    }
}

#[test]
fn null_resources_fails_every_section() {
    let loader = TemplateLoader::default();
    for section in Section::ALL {
        let err = collect(&loader, "Resources:\n", section).unwrap_err();
        assert!(err.is_template_format(), "section {section}: {err:?}");
    }
}

#[test]
fn empty_resources_is_accepted() {
    let records = collect(&TemplateLoader::default(), "Resources: {}\n", Section::Resources).unwrap();
    assert_eq!(records, Vec::<Value>::new());
}

#[test]
fn resource_without_type() {
    let content = "Resources:\n  Bucket:\n    Properties: {}\n";
    let reason = format_reason(resources(&TemplateLoader::default(), content).unwrap_err());
    assert_eq!(reason, "Every Resources object must contain a Type member. Resource: Bucket");
}

#[test]
fn resource_with_null_properties() {
    let content = "Resources:\n  Bucket:\n    Type: AWS::S3::Bucket\n    Properties:\n";
    let reason = format_reason(resources(&TemplateLoader::default(), content).unwrap_err());
    assert_eq!(reason, "[/Resources/Bucket/Properties] 'null' values are not allowed in templates");
}

#[test]
fn invalid_member_emits_nothing() {
    let content = "Resources:\n  Good:\n    Type: AWS::S3::Bucket\n  Bad:\n    Properties: {}\n";
    let mut emitted = 0;
    let result = TemplateLoader::default().resources(path(), content, |_| emitted += 1);
    assert!(result.is_err());
    assert_eq!(emitted, 0);
}

#[test]
fn parameter_without_type() {
    let content = "Resources: {}\nParameters:\n  Env:\n    Default: dev\n";
    let err = collect(&TemplateLoader::default(), content, Section::Parameters).unwrap_err();
    assert_eq!(
        format_reason(err),
        "Every Parameters object must contain a Type member with non-null value. Parameter: Env"
    );
}

#[test]
fn output_with_null_value() {
    let content = "Resources: {}\nOutputs:\n  Name:\n    Value:\n";
    let err = collect(&TemplateLoader::default(), content, Section::Outputs).unwrap_err();
    assert_eq!(
        format_reason(err),
        "Every Outputs member must contain a Value object with non-null value. Output: Name"
    );
}

#[test]
fn collection_keys_are_rejected() {
    let content = "Resources:\n  ? [a, b]\n  : Type: X\n";
    let err = collect(&TemplateLoader::default(), content, Section::Resources).unwrap_err();
    assert!(err.is_template_format(), "{err:?}");
}

#[test]
fn invalid_yaml() {
    let err = collect(&TemplateLoader::default(), "Resources: [a\n", Section::Resources).unwrap_err();
    assert!(matches!(err, Error::Parse { .. }), "{err:?}");
}

#[test]
fn wrong_shape_is_a_decode_error() {
    let err = collect(&TemplateLoader::default(), "Resources: [a, b]\n", Section::Resources).unwrap_err();
    assert!(matches!(err, Error::Decode { .. }), "{err:?}");
}

#[test]
fn json_templates() {
    let content = r#"{
  "Resources": {
    "Queue": {"Type": "AWS::SQS::Queue", "Properties": {"DelaySeconds": 5}}
  }
}"#;
    let records = resources(&TemplateLoader::default(), content).unwrap();
    assert_eq!(records[0].name, "Queue");
    assert_eq!(records[0].start_line, 3);
    assert_eq!(records[0].properties_literal, Some(json!({"DelaySeconds": 5})));
}

#[test]
fn rewritten_templates_keep_original_lines() {
    let loader = TemplateLoader::new(LoadOptions {
        rewrite_condition_tags: true,
    });
    let records = resources(&loader, STACK).unwrap();
    assert_eq!(records[0].name, "Bucket");
    assert_eq!(records[0].start_line, 15);
    assert_eq!(records[1].start_line, 23);
}

struct NameResolver;

impl PropertyResolver for NameResolver {
    fn resolve(&self, path: &Path, content: &str, resource: &str) -> Option<Value> {
        assert_eq!(path, Path::new("stack.yaml"));
        assert_eq!(content, STACK);
        (resource == "Bucket").then(|| json!({"BucketName": "dev-bucket"}))
    }
}

#[test]
fn resolver_fills_resolved_properties() {
    let loader = TemplateLoader::default().with_resolver(Box::new(NameResolver));
    let records = resources(&loader, STACK).unwrap();
    assert_eq!(records[0].properties_resolved, Some(json!({"BucketName": "dev-bucket"})));
    assert_eq!(records[1].properties_resolved, None);
}

#[test]
fn failing_files_do_not_stop_the_others() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.yaml");
    let bad = dir.path().join("bad.yaml");
    let missing = dir.path().join("missing.yaml");
    fs::write(&good, "Resources:\n  Topic:\n    Type: AWS::SNS::Topic\n").unwrap();
    fs::write(&bad, "Parameters: {}\n").unwrap();

    let mut names = Vec::new();
    let errors = TemplateLoader::default().load_paths(
        &[bad.clone(), missing.clone(), good.clone()],
        Section::Resources,
        |record| match record {
            Record::Resource(resource) => names.push((resource.name, resource.path)),
            other => panic!("unexpected record {other:?}"),
        },
    );

    assert_eq!(names, vec![("Topic".to_string(), good)]);
    assert_eq!(errors.len(), 2);
    assert!(matches!(&errors[0], Error::TemplateFormat { path, .. } if *path == bad));
    assert!(matches!(&errors[1], Error::Io { path, .. } if *path == missing));
}
