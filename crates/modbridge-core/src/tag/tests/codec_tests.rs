use crate::tag::{decode, encode, TagError, TagMap, TagValue, FORMAT_VERSION, MAX_DEPTH};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn roundtrip(value: &TagValue) -> TagValue {
    let bytes = encode(value).expect("encode should succeed");
    decode(&bytes).expect("decode should succeed")
}

fn nested_lists(depth: usize) -> TagValue {
    let mut value = TagValue::Null;
    for _ in 0..depth {
        value = TagValue::List(vec![value]);
    }
    value
}

// Random tree generator; depth is bounded so every tree stays well-formed.
fn random_tree(rng: &mut StdRng, depth: usize) -> TagValue {
    let choice = if depth == 0 { rng.gen_range(0..5) } else { rng.gen_range(0..7) };
    match choice {
        0 => TagValue::Null,
        1 => TagValue::Bool(rng.gen_bool(0.5)),
        2 => TagValue::Int(rng.r#gen::<i64>()),
        3 => TagValue::Float(f64::from_bits(rng.r#gen::<u64>())),
        4 => {
            let len = rng.gen_range(0..12);
            TagValue::String((0..len).map(|_| rng.gen_range('a'..='z')).collect())
        }
        5 => {
            let len = rng.gen_range(0..4);
            TagValue::List((0..len).map(|_| random_tree(rng, depth - 1)).collect())
        }
        _ => {
            let len = rng.gen_range(0..4);
            let mut map = TagMap::new();
            for i in 0..len {
                map.insert(format!("k{}_{}", i, rng.gen_range(0..1000)), random_tree(rng, depth - 1));
            }
            TagValue::Map(map)
        }
    }
}

#[test]
fn test_scalars_roundtrip() {
    let values = vec![
        TagValue::Null,
        TagValue::Bool(true),
        TagValue::Bool(false),
        TagValue::Int(0),
        TagValue::Int(i64::MIN),
        TagValue::Int(i64::MAX),
        TagValue::Float(-0.0),
        TagValue::Float(f64::INFINITY),
        TagValue::Float(f64::NAN),
        TagValue::String(String::new()),
        TagValue::String("héllo wörld ✓".to_string()),
    ];
    for value in values {
        assert_eq!(roundtrip(&value), value, "roundtrip failed for {}", value);
    }
}

#[test]
fn test_empty_containers_roundtrip() {
    assert_eq!(roundtrip(&TagValue::list()), TagValue::list());
    assert_eq!(roundtrip(&TagValue::map()), TagValue::map());
    let mixed = TagValue::map().with("empty_list", TagValue::list()).with("empty_map", TagValue::map());
    assert_eq!(roundtrip(&mixed), mixed);
}

#[test]
fn test_deep_nesting_roundtrip() {
    let mut value = TagValue::map().with("leaf", 42);
    for level in 0..8 {
        value = TagValue::map().with(&format!("level{}", level), TagValue::List(vec![value, TagValue::Int(level)]));
    }
    assert!(value.depth() >= 5);
    assert_eq!(roundtrip(&value), value);
}

#[test]
fn test_map_order_preserved() {
    let value = TagValue::map().with("zeta", 1).with("alpha", 2).with("mid", 3);
    let decoded = roundtrip(&value);
    let keys: Vec<&str> = decoded.as_map().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_map_equality_is_order_sensitive() {
    let a = TagValue::map().with("x", 1).with("y", 2);
    let b = TagValue::map().with("y", 2).with("x", 1);
    assert_ne!(a, b);
}

#[test]
fn test_random_trees_roundtrip() {
    let mut rng = StdRng::seed_from_u64(0x7a6);
    for _ in 0..200 {
        let value = random_tree(&mut rng, 6);
        assert_eq!(roundtrip(&value), value);
    }
}

#[test]
fn test_byte_layout_is_stable() {
    assert_eq!(encode(&TagValue::Int(1)).unwrap(), vec![FORMAT_VERSION, 0x02, 0, 0, 0, 0, 0, 0, 0, 1]);
    assert_eq!(encode(&TagValue::Bool(true)).unwrap(), vec![FORMAT_VERSION, 0x01, 1]);
    assert_eq!(
        encode(&TagValue::map().with("a", TagValue::Null)).unwrap(),
        vec![FORMAT_VERSION, 0x06, 0, 0, 0, 1, 0, 0, 0, 1, b'a', 0x00]
    );
    assert_eq!(
        encode(&TagValue::List(vec![TagValue::from("hi")])).unwrap(),
        vec![FORMAT_VERSION, 0x05, 0, 0, 0, 1, 0x04, 0, 0, 0, 2, b'h', b'i']
    );
}

#[test]
fn test_newer_version_is_rejected_without_partial_result() {
    let mut bytes = encode(&TagValue::map().with("a", 1)).unwrap();
    bytes[0] = FORMAT_VERSION + 1;
    match decode(&bytes) {
        Err(TagError::UnsupportedVersion { found, supported }) => {
            assert_eq!(found, FORMAT_VERSION + 1);
            assert_eq!(supported, FORMAT_VERSION);
        }
        other => panic!("expected UnsupportedVersion, got {:?}", other),
    }
}

#[test]
fn test_version_checked_before_body() {
    // Garbage body behind a too-new version must still report the version
    let bytes = vec![0xFF, 0xEE, 0xDD];
    assert!(matches!(decode(&bytes), Err(TagError::UnsupportedVersion { found: 0xFF, .. })));
}

#[test]
fn test_empty_and_zero_version_are_malformed() {
    assert!(matches!(decode(&[]), Err(TagError::Malformed { offset: 0, .. })));
    assert!(matches!(decode(&[0, 0]), Err(TagError::Malformed { offset: 0, .. })));
}

#[test]
fn test_trailing_bytes_rejected() {
    let mut bytes = encode(&TagValue::Null).unwrap();
    bytes.push(0x00);
    assert!(matches!(decode(&bytes), Err(TagError::Malformed { offset: 2, .. })));
}

#[test]
fn test_unknown_marker_rejected() {
    assert!(matches!(decode(&[FORMAT_VERSION, 0x7F]), Err(TagError::Malformed { offset: 1, .. })));
}

#[test]
fn test_invalid_boolean_rejected() {
    assert!(matches!(decode(&[FORMAT_VERSION, 0x01, 2]), Err(TagError::Malformed { .. })));
}

#[test]
fn test_truncated_payloads_rejected() {
    assert!(matches!(decode(&[FORMAT_VERSION, 0x02, 0, 0, 0]), Err(TagError::Malformed { .. })));
    assert!(matches!(decode(&[FORMAT_VERSION, 0x04, 0, 0, 0, 5, b'a']), Err(TagError::Malformed { .. })));
    assert!(matches!(decode(&[FORMAT_VERSION, 0x05, 0, 0]), Err(TagError::Malformed { .. })));
}

#[test]
fn test_oversized_count_rejected_before_allocation() {
    let bytes = vec![FORMAT_VERSION, 0x05, 0xFF, 0xFF, 0xFF, 0xFF, 0x00];
    assert!(matches!(decode(&bytes), Err(TagError::Malformed { .. })));
}

#[test]
fn test_surrogate_sequences_rejected() {
    // CESU-style encoding of an unpaired high surrogate (U+D800)
    let bytes = vec![FORMAT_VERSION, 0x04, 0, 0, 0, 3, 0xED, 0xA0, 0x80];
    match decode(&bytes) {
        Err(TagError::Malformed { reason, .. }) => assert!(reason.contains("UTF-8")),
        other => panic!("expected Malformed, got {:?}", other),
    }
}

#[test]
fn test_duplicate_map_key_rejected() {
    let bytes = vec![
        FORMAT_VERSION, 0x06, 0, 0, 0, 2,
        0, 0, 0, 1, b'k', 0x00,
        0, 0, 0, 1, b'k', 0x00,
    ];
    match decode(&bytes) {
        Err(TagError::Malformed { offset, reason }) => {
            assert_eq!(offset, 12);
            assert!(reason.contains("duplicate"));
        }
        other => panic!("expected Malformed, got {:?}", other),
    }
}

#[test]
fn test_nesting_limit() {
    let at_limit = nested_lists(MAX_DEPTH - 1);
    assert_eq!(roundtrip(&at_limit), at_limit);

    let too_deep = nested_lists(MAX_DEPTH);
    assert!(matches!(encode(&too_deep), Err(TagError::Unencodable { .. })));

    let mut bytes = vec![FORMAT_VERSION];
    for _ in 0..MAX_DEPTH {
        bytes.extend_from_slice(&[0x05, 0, 0, 0, 1]);
    }
    bytes.push(0x00);
    assert!(matches!(decode(&bytes), Err(TagError::Malformed { .. })));
}
