use syncmap::{json, MapError, MapResult, OrderedConcurrentMap};

#[test]
fn marshals_in_insertion_order() {
    let map = OrderedConcurrentMap::new();
    map.put("a", 1);
    map.put("b", 2);
    map.put("c", 3);
    assert_eq!(map.to_json().unwrap(), br#"{"a":1,"b":2,"c":3}"#);
}

#[test]
fn nested_ordered_maps_share_escaping() {
    let second = OrderedConcurrentMap::new();
    second.put("z", "<last>");
    second.put("y", "first & only");

    let first = OrderedConcurrentMap::new();
    first.put("k", "v");

    let outer = OrderedConcurrentMap::new();
    outer.put("second", second);
    outer.put("first", first);

    let html_safe = String::from_utf8(outer.to_json().unwrap()).unwrap();
    assert!(html_safe.starts_with(r#"{"second":{"z":""#));
    assert!(!html_safe.contains('<'));
    assert!(!html_safe.contains('&'));

    outer.set_escape_html(false);
    let plain = String::from_utf8(outer.to_json().unwrap()).unwrap();
    assert_eq!(
        plain,
        r#"{"second":{"z":"<last>","y":"first & only"},"first":{"k":"v"}}"#
    );
}

#[test]
fn round_trips_through_serde_json_text() {
    let original = OrderedConcurrentMap::new();
    for (i, key) in ["delta", "alpha", "charlie", "bravo"].iter().enumerate() {
        original.put(key.to_string(), i as i64);
    }
    let text = json::to_vec(&original, true).unwrap();
    let decoded: OrderedConcurrentMap<String, i64> = serde_json::from_slice(&text).unwrap();
    assert_eq!(decoded.keys(), original.keys());
    assert_eq!(decoded.to_json().unwrap(), text);
}

fn encode_readings(readings: &[(&'static str, f64)]) -> MapResult<Vec<u8>> {
    let map = OrderedConcurrentMap::new();
    for (name, value) in readings {
        map.put(*name, *value);
    }
    map.to_json()
}

#[test]
fn non_finite_readings_fail_the_whole_document() {
    assert_eq!(
        encode_readings(&[("a", 1.0), ("b", 2.5)]).unwrap(),
        br#"{"a":1.0,"b":2.5}"#
    );
    let err = encode_readings(&[("a", 1.0), ("b", f64::NAN)]).unwrap_err();
    assert!(matches!(err, MapError::Encoding(_)));
    assert!(err.to_string().contains("unsupported value"));
}
