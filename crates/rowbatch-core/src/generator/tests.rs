use super::*;

struct Ticket {
    code: Option<String>,
}

#[test]
fn allow_list_contains_only_local_generators() {
    let local = [
        IdGeneratorKind::Assigned,
        IdGeneratorKind::Uuid,
        IdGeneratorKind::UuidHex,
        IdGeneratorKind::Ulid,
    ];
    let remote = [
        IdGeneratorKind::Identity,
        IdGeneratorKind::Sequence,
        IdGeneratorKind::Increment,
        IdGeneratorKind::Table,
        IdGeneratorKind::Select,
        IdGeneratorKind::Foreign,
        IdGeneratorKind::Custom("snowflake"),
    ];

    assert!(local.iter().all(|k| k.is_local()));
    assert!(remote.iter().all(|k| !k.is_local()));
}

#[test]
fn assigned_generator_reads_entity_identifier() {
    let generator = AssignedGenerator::new(|t: &Ticket| t.code.clone().map(Value::Text));
    let ticket = Ticket {
        code: Some("T-1".to_string()),
    };

    assert_eq!(
        generator.generate(&ticket).unwrap(),
        Value::Text("T-1".to_string())
    );
}

#[test]
fn assigned_generator_rejects_missing_identifier() {
    let generator = AssignedGenerator::new(|t: &Ticket| t.code.clone().map(Value::Text));
    let err = generator.generate(&Ticket { code: None }).unwrap_err();

    assert!(matches!(err, GenerationError::UnassignedIdentifier));
}

#[test]
fn uuid_hex_is_32_hex_chars() {
    let id = UuidHexGenerator.generate(&()).unwrap();
    let text = id.as_text().unwrap();

    assert_eq!(text.len(), 32);
    assert!(text.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn ulid_generator_is_monotonic_across_calls() {
    let a = UlidGenerator.generate(&()).unwrap();
    let b = UlidGenerator.generate(&()).unwrap();

    match (a, b) {
        (Value::Ulid(a), Value::Ulid(b)) => assert!(a < b),
        other => panic!("expected ulids, got {other:?}"),
    }
}

#[test]
fn custom_kind_display_names_the_strategy() {
    assert_eq!(IdGeneratorKind::Custom("snowflake").to_string(), "Custom(snowflake)");
    assert_eq!(IdGeneratorKind::Sequence.to_string(), "Sequence");
}
