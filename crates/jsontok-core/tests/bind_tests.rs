use chrono::{DateTime, TimeZone, Utc};
use indexmap::IndexMap;
use jsontok_core::{bind_record, from_str, JsonBind, JsonError, TypeDesc, Value};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, PartialEq)]
struct Address {
    city: String,
    zip: Option<String>,
}

bind_record!(Address { city: String, zip: Option<String> });

#[derive(Debug, PartialEq)]
struct Customer {
    id: u64,
    name: String,
    vip: bool,
    grade: char,
    balance: f64,
    address: Address,
    emails: Vec<String>,
    scores: Box<[i16]>,
    notes: Option<String>,
}

bind_record!(Customer {
    id: u64,
    name: String,
    vip: bool,
    grade: char,
    balance: f64,
    address: Address,
    emails: Vec<String>,
    scores: Box<[i16]>,
    notes: Option<String>,
});

#[derive(Debug, PartialEq)]
struct Event {
    title: String,
    starts: DateTime<Utc>,
    meta: Value,
}

bind_record!(Event { title: String, starts: DateTime<Utc>, meta: Value });

#[derive(Debug, PartialEq)]
struct Doc {
    name: String,
    tags: Vec<String>,
    labels: BTreeMap<String, String>,
    origin: Address,
}

bind_record!(Doc {
    name: String,
    tags: Vec<String>,
    labels: BTreeMap<String, String>,
    origin: Address,
});

// ============================================================================
// Records
// ============================================================================

#[test]
fn bind_full_record() {
    let customer: Customer = from_str(
        r#"{
            "ID": 9001,
            "Name": "Grace",
            "VIP": true,
            "grade": "A",
            "balance": 12.5,
            "Address": {"City": "Arlington", "zip": "22201"},
            "emails": ["g@example.com"],
            "scores": [3, -4, 5],
            "ignored": {"nested": [1, 2, 3]}
        }"#,
    )
    .unwrap();
    assert_eq!(
        customer,
        Customer {
            id: 9001,
            name: "Grace".into(),
            vip: true,
            grade: 'A',
            balance: 12.5,
            address: Address {
                city: "Arlington".into(),
                zip: Some("22201".into()),
            },
            emails: vec!["g@example.com".into()],
            scores: vec![3, -4, 5].into_boxed_slice(),
            notes: None,
        }
    );
}

#[test]
fn bind_missing_numeric_fields_default_to_zero() {
    let customer: Customer = from_str(
        r#"{"name": "x", "grade": "b", "address": {"city": "y"}, "emails": [], "scores": []}"#,
    )
    .unwrap();
    assert_eq!(customer.id, 0);
    assert!(!customer.vip);
    assert_eq!(customer.balance, 0.0);
    assert_eq!(customer.address.zip, None);
    assert!(customer.scores.is_empty());
}

#[test]
fn bind_missing_string_field_is_empty() {
    let address: Address = from_str(r#"{"zip": "1"}"#).unwrap();
    assert_eq!(
        address,
        Address {
            city: String::new(),
            zip: Some("1".into()),
        }
    );
}

#[test]
fn bind_missing_containers_and_records_are_empty() {
    let doc: Doc = from_str(r#"{"name": "x", "other": 1}"#).unwrap();
    assert_eq!(
        doc,
        Doc {
            name: "x".into(),
            tags: Vec::new(),
            labels: BTreeMap::new(),
            origin: Address {
                city: String::new(),
                zip: None,
            },
        }
    );
}

#[test]
fn bind_explicit_null_for_string_is_mismatch() {
    let err = from_str::<Address>(r#"{"city": null}"#).unwrap_err();
    assert!(err.is_coercion());
    assert_eq!(
        err.to_string(),
        "Type mismatch: expected string for field Address.city, found null"
    );
}

#[test]
fn bind_missing_date_time_is_epoch() {
    let event: Event = from_str(r#"{"title": "t"}"#).unwrap();
    assert_eq!(event.starts, DateTime::<Utc>::UNIX_EPOCH);
}

#[test]
fn bind_record_describes_its_fields() {
    let TypeDesc::Record(desc) = Address::describe() else {
        panic!("expected a record description");
    };
    assert_eq!(desc.name, "Address");
    let names: Vec<&str> = desc.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["city", "zip"]);
}

#[test]
fn bind_record_from_non_object_fails() {
    let err = from_str::<Address>("[1, 2]").unwrap_err();
    assert!(err.is_coercion());
}

#[test]
fn bind_date_time_and_untyped_field() {
    let event: Event = from_str(
        r#"{"title": "launch", "starts": "2025-01-31T12:00:00+01:00", "meta": {"tags": ["a"]}}"#,
    )
    .unwrap();
    assert_eq!(event.starts, Utc.with_ymd_and_hms(2025, 1, 31, 11, 0, 0).unwrap());
    assert_eq!(
        event.meta.get("tags"),
        Some(&Value::Arr(vec![Value::Str("a".into())]))
    );
}

#[test]
fn bind_missing_untyped_field_is_null() {
    let event: Event = from_str(r#"{"title": "t", "starts": "2025-01-01"}"#).unwrap();
    assert_eq!(event.meta, Value::Null);
}

// ============================================================================
// Scalars and containers
// ============================================================================

#[test]
fn bind_scalars() {
    assert_eq!(from_str::<i32>("-15").unwrap(), -15);
    assert_eq!(from_str::<u8>("255").unwrap(), 255);
    assert_eq!(from_str::<f32>("0.5").unwrap(), 0.5);
    assert!(from_str::<bool>("true").unwrap());
    assert_eq!(from_str::<char>("z").unwrap(), 'z');
    assert_eq!(from_str::<String>(r#""hi""#).unwrap(), "hi");
}

#[test]
fn bind_integer_out_of_range_fails() {
    let err = from_str::<i8>("128").unwrap_err();
    assert!(matches!(err, JsonError::Coercion { .. }));
}

#[test]
fn bind_quoted_number_converts() {
    assert_eq!(from_str::<u32>(r#""12""#).unwrap(), 12);
    assert!(from_str::<bool>(r#""TRUE""#).unwrap());
}

#[test]
fn bind_quoted_non_number_is_coercion_error() {
    let err = from_str::<u32>(r#""twelve""#).unwrap_err();
    assert!(matches!(
        err,
        JsonError::Coercion { ref target, .. } if target == "u32"
    ));
}

#[test]
fn bind_option_and_vec() {
    assert_eq!(from_str::<Option<u16>>("null").unwrap(), None);
    assert_eq!(from_str::<Option<u16>>("7").unwrap(), Some(7));
    assert_eq!(
        from_str::<Vec<Option<i64>>>("[1, null, 3]").unwrap(),
        vec![Some(1), None, Some(3)]
    );
}

#[test]
fn bind_maps() {
    let text = r#"{"one": 1, "two": 2}"#;
    let hash: HashMap<String, u32> = from_str(text).unwrap();
    assert_eq!(hash.get("two"), Some(&2));
    let tree: BTreeMap<String, u32> = from_str(text).unwrap();
    assert_eq!(tree.keys().collect::<Vec<_>>(), vec!["one", "two"]);
    let ordered: IndexMap<String, u32> = from_str(r#"{"b": 1, "a": 2}"#).unwrap();
    assert_eq!(ordered.keys().collect::<Vec<_>>(), vec!["b", "a"]);
}

#[test]
fn bind_value_is_untyped_parse() {
    let v: Value = from_str("[1, 2.5]").unwrap();
    assert_eq!(v, Value::Arr(vec![Value::Integer(1), Value::Float(2.5)]));
}
