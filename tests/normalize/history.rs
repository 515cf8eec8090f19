use dlws_rs::{RequestKind, normalize::{history_rows, to_rows}};
use serde_json::json;

#[test]
fn values_map_onto_declared_fields() {
    let reply = json!({
        "statusCode": 0,
        "fields": {"field": ["PX_LAST", "PX_VOLUME"]},
        "instrumentDatas": {"instrumentData": [
            {"code": "0", "instrument": {"id": "IBM US"}, "date": "2024-01-02",
             "data": [{"value": "10"}, {"value": "20"}]},
            {"code": "0", "instrument": {"id": "IBM US"}, "date": "2024-01-03",
             "data": [{"@value": 11}, {"@value": 21}]}
        ]}
    });

    let rows = history_rows(&reply);

    assert_eq!(rows.len(), 2);
    let keys: Vec<&str> = rows[0].keys().collect();
    assert_eq!(keys, ["identifier", "date", "PX_LAST", "PX_VOLUME"]);
    assert_eq!(rows[0].get("identifier"), Some(Some("IBM US")));
    assert_eq!(rows[0].get("date"), Some(Some("2024-01-02")));
    assert_eq!(rows[0].get("PX_LAST"), Some(Some("10")));
    assert_eq!(rows[1].get("PX_VOLUME"), Some(Some("21")));
}

#[test]
fn count_mismatch_falls_back_to_positional_columns() {
    let reply = json!({
        "fields": {"field": ["A", "B"]},
        "instrumentDatas": {"instrumentData": {
            "instrument": {"@id": "X"}, "date": "2024-01-02",
            "data": [{"value": 1}, {"value": 2}, {"value": 3}]
        }}
    });

    let rows = history_rows(&reply);

    assert_eq!(rows.len(), 1);
    let keys: Vec<&str> = rows[0].keys().collect();
    assert_eq!(keys, ["identifier", "date", "COL_1", "COL_2", "COL_3"]);
    assert_eq!(rows[0].get("COL_3"), Some(Some("3")));
    assert!(!rows[0].contains_key("A"));
}

#[test]
fn field_names_from_override_descriptors() {
    let reply = json!({
        "fields": {"fieldWithOverrides": [
            {"@mnemonic": "BEST_EPS", "overrides": {"override": {"field": "BEST_FPERIOD_OVERRIDE"}}},
            {"name": "BEST_SALES"}
        ]},
        "instrumentDatas": {"instrumentData": [
            {"code": "AAPL US", "date": "2024-03-28", "data": [{"value": "6.5"}, {"value": "390"}]}
        ]}
    });

    let rows = to_rows(RequestKind::History, &reply);

    assert_eq!(rows[0].get("identifier"), Some(Some("AAPL US")));
    assert_eq!(rows[0].get("BEST_EPS"), Some(Some("6.5")));
    assert_eq!(rows[0].get("BEST_SALES"), Some(Some("390")));
}

#[test]
fn missing_values_stay_empty_cells() {
    let reply = json!({
        "fields": {"field": ["PX_LAST"]},
        "instrumentDatas": {"instrumentData": [
            {"instrument": {"id": "Y"}, "data": [{"value": null}]}
        ]}
    });
    let rows = history_rows(&reply);
    assert_eq!(rows[0].get("date"), Some(Some("")));
    assert_eq!(rows[0].get("PX_LAST"), Some(None));
}

#[test]
fn empty_or_unrelated_replies_produce_no_rows() {
    for reply in [
        json!(null),
        json!({}),
        json!({"statusCode": 0}),
        json!({"instrumentDatas": null}),
        json!({"instrumentDatas": {"instrumentData": []}}),
    ] {
        assert!(history_rows(&reply).is_empty(), "reply: {reply}");
    }
}

#[test]
fn fewer_values_than_fields_use_positional_columns() {
    let reply = json!({
        "fields": {"field": ["A", "B", "C"]},
        "instrumentDatas": {"instrumentData": {
            "instrument": {"id": "X"}, "date": "2024-01-02",
            "data": [{"value": 1}, {"value": 2}]
        }}
    });

    let rows = history_rows(&reply);

    let keys: Vec<&str> = rows[0].keys().collect();
    assert_eq!(keys, ["identifier", "date", "COL_1", "COL_2"]);
    assert_eq!(rows[0].get("COL_2"), Some(Some("2")));
}
