use chrono::{Datelike, Timelike};
use jsontok_core::{
    parse_typed, JsonError, Scalar, ScalarKind, StructDesc, TypeDesc, Typed, Value,
};

fn scalar(kind: ScalarKind) -> TypeDesc {
    TypeDesc::scalar(kind)
}

fn person() -> TypeDesc {
    TypeDesc::record(
        StructDesc::new("Person")
            .field("Name", scalar(ScalarKind::String))
            .field("Age", scalar(ScalarKind::U8))
            .field("Active", scalar(ScalarKind::Bool))
            .field("Nick", TypeDesc::optional(scalar(ScalarKind::String))),
    )
}

// ============================================================================
// Scalars
// ============================================================================

#[test]
fn typed_scalar_widths() {
    assert_eq!(
        parse_typed("-12", &scalar(ScalarKind::I16)).unwrap(),
        Typed::Scalar(Scalar::I16(-12))
    );
    assert_eq!(
        parse_typed("4000000000", &scalar(ScalarKind::U32)).unwrap(),
        Typed::Scalar(Scalar::U32(4_000_000_000))
    );
    assert_eq!(
        parse_typed("2.25", &scalar(ScalarKind::F64)).unwrap(),
        Typed::Scalar(Scalar::F64(2.25))
    );
}

#[test]
fn typed_scalar_out_of_range_is_coercion_error() {
    let err = parse_typed("300", &scalar(ScalarKind::U8)).unwrap_err();
    assert!(err.is_coercion());
    assert_eq!(err.to_string(), "Cannot convert \"300\" to u8 at position 0");
}

#[test]
fn typed_char_from_bare_token() {
    assert_eq!(
        parse_typed("x", &scalar(ScalarKind::Char)).unwrap(),
        Typed::Scalar(Scalar::Char('x'))
    );
}

#[test]
fn typed_bool_hint_accepts_other_casings() {
    assert_eq!(
        parse_typed("TRUE", &scalar(ScalarKind::Bool)).unwrap(),
        Typed::Bool(true)
    );
}

#[test]
fn typed_literals_ignore_numeric_hint() {
    assert_eq!(
        parse_typed("true", &scalar(ScalarKind::I32)).unwrap(),
        Typed::Bool(true)
    );
    assert_eq!(parse_typed("null", &scalar(ScalarKind::I32)).unwrap(), Typed::Null);
}

#[test]
fn typed_quoted_number_converts_to_hint() {
    assert_eq!(
        parse_typed(r#""42""#, &scalar(ScalarKind::I32)).unwrap(),
        Typed::Scalar(Scalar::I32(42))
    );
    let t = parse_typed(r#"{"age": "36"}"#, &person()).unwrap();
    assert_eq!(
        t.as_record().and_then(|r| r.get("Age")),
        Some(&Typed::Scalar(Scalar::U8(36)))
    );
}

#[test]
fn typed_quoted_text_under_numeric_hint_is_error() {
    let err = parse_typed(r#"{"age": "not a number"}"#, &person()).unwrap_err();
    assert!(err.is_coercion());
    assert!(matches!(
        err,
        JsonError::Coercion { ref text, ref target, .. }
            if text == "not a number" && target == "u8"
    ));
}

#[test]
fn typed_quoted_string_under_list_hint_is_error() {
    let err = parse_typed(r#""a""#, &TypeDesc::list(scalar(ScalarKind::String))).unwrap_err();
    assert!(err.is_coercion());
}

#[test]
fn typed_empty_token() {
    assert_eq!(
        parse_typed("", &scalar(ScalarKind::String)).unwrap(),
        Typed::Scalar(Scalar::Str(String::new()))
    );
    assert_eq!(
        parse_typed("", &TypeDesc::optional(scalar(ScalarKind::I32))).unwrap(),
        Typed::Null
    );
    assert!(parse_typed("", &scalar(ScalarKind::I32))
        .unwrap_err()
        .is_coercion());
}

// ============================================================================
// Date/time
// ============================================================================

#[test]
fn typed_date_time_from_string() {
    let t = parse_typed(r#""2024-06-15T08:30:00Z""#, &scalar(ScalarKind::DateTime)).unwrap();
    let Typed::Scalar(Scalar::DateTime(dt)) = t else {
        panic!("expected date/time, got {t:?}");
    };
    assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 6, 15));
    assert_eq!((dt.hour(), dt.minute()), (8, 30));
}

#[test]
fn typed_date_time_renders_rfc3339() {
    let t = parse_typed(r#""2024-06-15 08:30""#, &scalar(ScalarKind::DateTime)).unwrap();
    assert_eq!(t.to_string(), r#""2024-06-15T08:30:00+00:00""#);
}

#[test]
fn typed_bad_date_time_is_coercion_error() {
    let err = parse_typed(r#""someday""#, &scalar(ScalarKind::DateTime)).unwrap_err();
    assert!(matches!(
        err,
        JsonError::Coercion { ref target, .. } if target == "date_time"
    ));
}

// ============================================================================
// Arrays and lists
// ============================================================================

#[test]
fn typed_fixed_array_sized_by_elements() {
    let t = parse_typed("[1, 2, 3,]", &TypeDesc::fixed_array(scalar(ScalarKind::I32))).unwrap();
    let Typed::Array(items) = t else {
        panic!("expected fixed array, got {t:?}");
    };
    assert_eq!(
        &*items,
        &[
            Typed::Scalar(Scalar::I32(1)),
            Typed::Scalar(Scalar::I32(2)),
            Typed::Scalar(Scalar::I32(3)),
        ]
    );
}

#[test]
fn typed_list_of_strings() {
    let t = parse_typed(r#"["a", "b"]"#, &TypeDesc::list(scalar(ScalarKind::String))).unwrap();
    assert_eq!(
        t,
        Typed::List(vec![
            Typed::Scalar(Scalar::Str("a".into())),
            Typed::Scalar(Scalar::Str("b".into())),
        ])
    );
}

#[test]
fn typed_list_element_error_aborts() {
    let err = parse_typed("[1, x, 3]", &TypeDesc::list(scalar(ScalarKind::U8))).unwrap_err();
    assert_eq!(err.to_string(), "Cannot convert \"x\" to u8 at position 4");
}

#[test]
fn typed_array_under_scalar_hint_is_error() {
    let err = parse_typed("[1]", &scalar(ScalarKind::I32)).unwrap_err();
    assert!(matches!(
        err,
        JsonError::Coercion { ref text, position: 0, .. } if text == "array"
    ));
}

// ============================================================================
// Dictionaries
// ============================================================================

#[test]
fn typed_dictionary_keeps_keys_in_order() {
    let t = parse_typed(
        r#"{"b": 2, "a": 1, "b": 5}"#,
        &TypeDesc::dictionary(scalar(ScalarKind::I64)),
    )
    .unwrap();
    let Typed::Dictionary(map) = t else {
        panic!("expected dictionary, got {t:?}");
    };
    let entries: Vec<(&str, &Typed)> = map.iter().map(|(k, v)| (k.as_str(), v)).collect();
    assert_eq!(
        entries,
        vec![
            ("b", &Typed::Scalar(Scalar::I64(5))),
            ("a", &Typed::Scalar(Scalar::I64(1))),
        ]
    );
}

// ============================================================================
// Records
// ============================================================================

#[test]
fn typed_record_fields_match_case_insensitively() {
    let t = parse_typed(
        r#"{"name": "Ada", "AGE": 36, "active": true}"#,
        &person(),
    )
    .unwrap();
    let record = t.as_record().unwrap();
    assert_eq!(record.name, "Person");
    assert_eq!(record.get("Name"), Some(&Typed::Scalar(Scalar::Str("Ada".into()))));
    assert_eq!(record.get("Age"), Some(&Typed::Scalar(Scalar::U8(36))));
    assert_eq!(record.get("Active"), Some(&Typed::Bool(true)));
}

#[test]
fn typed_record_duplicate_keys_last_wins() {
    let t = parse_typed(r#"{"name": "first", "NAME": "second"}"#, &person()).unwrap();
    assert_eq!(
        t.as_record().and_then(|r| r.get("Name")),
        Some(&Typed::Scalar(Scalar::Str("second".into())))
    );
}

#[test]
fn typed_record_discards_unknown_keys() {
    let t = parse_typed(
        r#"{"extra": {"deep": [1, {"x": "y"}]}, "name": "Bo", "more": [true]}"#,
        &person(),
    )
    .unwrap();
    let record = t.as_record().unwrap();
    assert_eq!(record.len(), 4);
    assert!(record.get("extra").is_none());
    assert_eq!(record.get("Name"), Some(&Typed::Scalar(Scalar::Str("Bo".into()))));
}

#[test]
fn typed_record_skips_bare_words_under_unknown_keys() {
    let t = parse_typed(
        r#"{"unknown": abc, "name": "x", "other": [y, -], "age": 5}"#,
        &person(),
    )
    .unwrap();
    let record = t.as_record().unwrap();
    assert_eq!(record.get("Name"), Some(&Typed::Scalar(Scalar::Str("x".into()))));
    assert_eq!(record.get("Age"), Some(&Typed::Scalar(Scalar::U8(5))));
}

#[test]
fn typed_record_missing_fields_keep_defaults() {
    let t = parse_typed("{}", &person()).unwrap();
    let record = t.as_record().unwrap();
    assert_eq!(record.get("Name"), Some(&Typed::Null));
    assert_eq!(record.get("Age"), Some(&Typed::Scalar(Scalar::U8(0))));
    assert_eq!(record.get("Active"), Some(&Typed::Bool(false)));
    assert_eq!(record.get("Nick"), Some(&Typed::Null));
}

#[test]
fn typed_record_renders_in_declaration_order() {
    let t = parse_typed(r#"{"nick": "a", "age": 3, "name": "b"}"#, &person()).unwrap();
    assert_eq!(
        t.to_string(),
        r#"{"Name":"b","Age":3,"Active":false,"Nick":"a"}"#
    );
}

#[test]
fn typed_nested_records_and_any() {
    let desc = TypeDesc::record(
        StructDesc::new("Team")
            .field("Lead", person())
            .field("Members", TypeDesc::list(person()))
            .field("Extra", TypeDesc::Any),
    );
    let t = parse_typed(
        r#"{
            "lead": {"name": "Ann", "age": 40},
            "members": [{"name": "Ben"}, {"name": "Cy", "active": true}],
            "extra": {"k": [1, 2.5]}
        }"#,
        &desc,
    )
    .unwrap();
    let team = t.as_record().unwrap();
    let lead = team.get("Lead").and_then(Typed::as_record).unwrap();
    assert_eq!(lead.get("Age"), Some(&Typed::Scalar(Scalar::U8(40))));
    let Some(Typed::List(members)) = team.get("Members") else {
        panic!("members should be a list");
    };
    assert_eq!(members.len(), 2);
    assert_eq!(
        members[1].as_record().and_then(|r| r.get("Active")),
        Some(&Typed::Bool(true))
    );
    let Some(Typed::Untyped(extra)) = team.get("Extra") else {
        panic!("extra should be untyped");
    };
    assert_eq!(
        extra.get("k"),
        Some(&Value::Arr(vec![Value::Integer(1), Value::Float(2.5)]))
    );
}

#[test]
fn typed_optional_record_accepts_null() {
    let desc = TypeDesc::optional(person());
    assert_eq!(parse_typed("null", &desc).unwrap(), Typed::Null);
    assert!(parse_typed(r#"{"name": "x"}"#, &desc)
        .unwrap()
        .as_record()
        .is_some());
}

#[test]
fn typed_object_under_scalar_hint_is_error() {
    let err = parse_typed(r#"  {"a": 1}"#, &scalar(ScalarKind::I32)).unwrap_err();
    assert_eq!(err.to_string(), "Cannot convert \"object\" to i32 at position 2");
}

#[test]
fn typed_any_matches_untyped() {
    let t = parse_typed(r#"{"a": [1, "b"]}"#, &TypeDesc::Any).unwrap();
    assert_eq!(
        t,
        Typed::Untyped(jsontok_core::parse(r#"{"a": [1, "b"]}"#).unwrap())
    );
}

// ============================================================================
// Schema documents
// ============================================================================

#[test]
fn typed_from_schema_document() {
    let desc = TypeDesc::from_schema(
        r#"{
            "type": "record",
            "name": "Reading",
            "fields": [
                {"name": "sensor", "type": {"type": "scalar", "kind": "string"}},
                {"name": "values", "type": {"type": "list", "element": {"type": "scalar", "kind": "f32"}}},
                {"name": "at", "type": {"type": "optional", "inner": {"type": "scalar", "kind": "date_time"}}}
            ]
        }"#,
    )
    .unwrap();
    let t = parse_typed(
        r#"{"Sensor": "t1", "VALUES": [1.5, 2], "at": "2024-01-02"}"#,
        &desc,
    )
    .unwrap();
    assert_eq!(
        t.to_string(),
        r#"{"sensor":"t1","values":[1.5,2.0],"at":"2024-01-02T00:00:00+00:00"}"#
    );
}

#[test]
fn typed_bad_schema_is_schema_error() {
    let err = TypeDesc::from_schema(r#"{"type": "tuple"}"#).unwrap_err();
    assert!(matches!(err, JsonError::Schema(_)));
}
