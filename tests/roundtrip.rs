// Structural round-trip coverage for Array, Document, Timestamp, Duration
// and LatLon, per spec.md §8 property 1 ("decode(encode(v)) == v" for every
// non-lossy value in the domain).

use std::collections::BTreeMap;

use tson::{decode, encode, Document, Duration, DurationUnit, LatLon, Timestamp, Value};

#[test]
fn array_of_mixed_kinds_round_trips() {
    let value = Value::Array(vec![
        Value::Null,
        Value::Bool(true),
        Value::int(-5),
        Value::String("plain".to_string()),
        Value::Bytes(vec![1, 2, 3]),
        Value::Array(vec![Value::int(1u64), Value::int(2u64)]),
    ]);
    let bytes = encode(&value).unwrap();
    assert_eq!(decode(&bytes).unwrap(), value);
}

#[test]
fn nested_documents_round_trip() {
    let mut inner = Document::new();
    inner.insert("a".to_string(), Value::int(1u64));
    inner.insert("b".to_string(), Value::Bool(true));

    let mut outer = Document::new();
    outer.insert("inner".to_string(), Value::Document(inner));
    outer.insert("name".to_string(), Value::String("andes".to_string()));

    let value = Value::Document(outer);
    let bytes = encode(&value).unwrap();
    assert_eq!(decode(&bytes).unwrap(), value);
}

#[test]
fn document_with_more_than_four_entries_uses_large_form() {
    let mut doc = BTreeMap::new();
    for i in 0..6 {
        doc.insert(format!("key{}", i), Value::int(i as u64));
    }
    let value = Value::Document(doc);
    let bytes = encode(&value).unwrap();
    assert_eq!(bytes[0], 0x01, "expected the large-form Document opcode");
    assert_eq!(*bytes.last().unwrap(), 0x00, "expected a terminator byte");
    assert_eq!(decode(&bytes).unwrap(), value);
}

#[test]
fn repeated_keys_and_strings_across_document_siblings_round_trip() {
    let mut a = Document::new();
    a.insert("name".to_string(), Value::String("andes".to_string()));
    a.insert("kind".to_string(), Value::String("range".to_string()));

    let mut b = Document::new();
    b.insert("name".to_string(), Value::String("andes".to_string()));
    b.insert("kind".to_string(), Value::String("range".to_string()));

    let value = Value::Array(vec![Value::Document(a), Value::Document(b)]);
    let bytes = encode(&value).unwrap();
    assert_eq!(decode(&bytes).unwrap(), value);
}

#[test]
fn document_key_order_does_not_affect_encoding() {
    // BTreeMap insertion order never affects iteration order, so two
    // documents built by inserting the same keys in different orders must
    // produce byte-identical encodings (spec.md §8 property 4).
    let mut first = Document::new();
    first.insert("z".to_string(), Value::int(1u64));
    first.insert("a".to_string(), Value::int(2u64));

    let mut second = Document::new();
    second.insert("a".to_string(), Value::int(2u64));
    second.insert("z".to_string(), Value::int(1u64));

    assert_eq!(
        encode(&Value::Document(first)).unwrap(),
        encode(&Value::Document(second)).unwrap()
    );
}

#[test]
fn timestamps_before_and_after_epoch_round_trip() {
    for millis in [0i64, 1, -1, 22_662_000_000, -86_400_000] {
        let value = Value::Timestamp(Timestamp::from_millis_since_epoch(millis));
        let bytes = encode(&value).unwrap();
        assert_eq!(decode(&bytes).unwrap(), value);
    }
}

#[test]
fn durations_round_trip_every_unit() {
    let units = [
        DurationUnit::Hour,
        DurationUnit::Minute,
        DurationUnit::Second,
        DurationUnit::Millisecond,
        DurationUnit::Microsecond,
        DurationUnit::Nanosecond,
    ];
    for unit in units {
        for amount in [0i64, 1, -1, 500, -500] {
            let value = Value::Duration(Duration::new(amount, unit));
            let bytes = encode(&value).unwrap();
            let decoded = decode(&bytes).unwrap();
            // The wire form is already canonical, so the decoded duration
            // carries whatever unit canonicalization settled on, not
            // necessarily the input unit (spec.md §4.3).
            if let Value::Duration(got) = decoded {
                assert_eq!(got, Duration::new(amount, unit).canonicalize());
            } else {
                panic!("expected a Duration");
            }
        }
    }
}

#[test]
fn lat_lon_round_trips_within_tolerance() {
    let cases = [
        (46.083529, -118.283026),
        (0.0, 0.0),
        (89.999, 179.999),
        (-89.999, -179.999),
        (37.422, -122.084),
    ];
    for (lat, lon) in cases {
        let value = Value::LatLon(LatLon::new(lat, lon));
        let bytes = encode(&value).unwrap();
        match decode(&bytes).unwrap() {
            Value::LatLon(got) => {
                assert!((got.latitude - lat).abs() < 1e-5);
                assert!((got.longitude - lon).abs() < 1e-5);
            }
            other => panic!("expected LatLon, got {:?}", other),
        }
    }
}

#[test]
fn non_string_sized_strings_choose_the_right_opcode_family() {
    // Length 24 uses the small-string form, length 25 falls back to the
    // terminated form (spec.md §4.4 boundary at 24 bytes).
    let short = Value::String("a".repeat(24));
    let long = Value::String("a".repeat(25));
    assert_eq!(encode(&short).unwrap()[0], 0x27);
    assert_eq!(encode(&long).unwrap()[0], 0x0E);
    assert_eq!(decode(&encode(&short).unwrap()).unwrap(), short);
    assert_eq!(decode(&encode(&long).unwrap()).unwrap(), long);
}
