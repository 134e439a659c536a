use serde_json::json;

use super::*;
use crate::tags::decode_tags;

fn row(pairs: &[(&str, Value)]) -> RowFields {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), v.clone()))
        .collect()
}

fn resolve(pairs: &[(&str, Value)], raw_tags: &str) -> ResolvedFields {
    resolve_fields(&row(pairs), &decode_tags(Some(raw_tags)))
}

// -----------------------------------------------------------------------
// expiration date
// -----------------------------------------------------------------------

#[test]
fn expiration_follows_tag_precedence_for_every_subset() {
    let keys = [
        ("ExpiresOn", "2030-01-01"),
        ("ExpireDate", "2030-02-02"),
        ("Expiration", "2030-03-03"),
    ];

    for mask in 0u8..8 {
        let present: Vec<_> = keys
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, kv)| *kv)
            .collect();
        // Reverse the order in the string so position cannot decide the winner.
        let raw = present
            .iter()
            .rev()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(",");

        let resolved = resolve(&[], &raw);
        let expected = present.first().map(|(_, v)| (*v).to_owned());
        assert_eq!(resolved.expiration_date, expected, "tags {raw:?}");
    }
}

#[test]
fn tag_expiration_beats_top_level_columns() {
    let resolved = resolve(
        &[
            ("ExpiresOn", json!("2020-01-01")),
            ("ExpireDate", json!("2019-01-01")),
        ],
        "Expiration=2031-05-05",
    );
    assert_eq!(resolved.expiration_date.as_deref(), Some("2031-05-05"));
    assert_eq!(
        resolved.expiration_source,
        Some(ExpirationSource::TagExpiration)
    );
}

#[test]
fn top_level_expires_on_beats_top_level_expire_date() {
    let resolved = resolve(
        &[
            ("ExpiresOn", json!("2020-01-01")),
            ("ExpireDate", json!("2019-01-01")),
        ],
        "",
    );
    assert_eq!(resolved.expiration_date.as_deref(), Some("2020-01-01"));

    let resolved = resolve(&[("ExpireDate", json!("2019-01-01"))], "");
    assert_eq!(resolved.expiration_date.as_deref(), Some("2019-01-01"));
    assert_eq!(
        resolved.expiration_source,
        Some(ExpirationSource::ColumnExpireDate)
    );
}

#[test]
fn no_expiration_sources_leaves_date_absent() {
    let resolved = resolve(&[("Name", json!("Deal"))], "Code=X");
    assert!(resolved.expiration_date.is_none());
    assert!(resolved.expiration_source.is_none());
}

#[test]
fn expires_at_fills_time_when_expires_on_wins() {
    let resolved = resolve(&[], "ExpiresOn=2025-12-31,ExpiresAt=23:59:59");
    assert_eq!(resolved.expiration_date.as_deref(), Some("2025-12-31"));
    assert_eq!(resolved.expiration_time.as_deref(), Some("23:59:59"));
}

#[test]
fn expires_at_ignored_when_another_source_wins() {
    let resolved = resolve(&[], "ExpireDate=2025-11-30,ExpiresAt=23:59:59");
    assert_eq!(resolved.expiration_date.as_deref(), Some("2025-11-30"));
    assert!(resolved.expiration_time.is_none());

    let resolved = resolve(&[("ExpiresOn", json!("2025-10-01"))], "ExpiresAt=10:00");
    assert_eq!(resolved.expiration_date.as_deref(), Some("2025-10-01"));
    assert!(resolved.expiration_time.is_none());
}

#[test]
fn empty_tag_expiration_falls_through() {
    let resolved = resolve(&[("ExpiresOn", json!("2024-04-04"))], "ExpiresOn=");
    assert_eq!(resolved.expiration_date.as_deref(), Some("2024-04-04"));
}

// -----------------------------------------------------------------------
// codes
// -----------------------------------------------------------------------

#[test]
fn virtual_code_follows_tag_precedence() {
    let cases = [
        ("VirtualCode=V,OnlineCode=O,WebCode=W,Code=C", "V"),
        ("OnlineCode=O,WebCode=W,Code=C", "O"),
        ("WebCode=W,Code=C", "W"),
        ("Code=C", "C"),
    ];
    for (raw, expected) in cases {
        let resolved = resolve(&[], raw);
        assert_eq!(resolved.virtual_code.as_deref(), Some(expected), "tags {raw:?}");
    }
}

#[test]
fn tag_code_never_overrides_top_level_code() {
    let resolved = resolve(&[("Code", json!("LARGE999"))], "Code=OTHER");
    assert_eq!(resolved.code.as_deref(), Some("LARGE999"));
    assert!(resolved.virtual_code.is_none());
}

#[test]
fn tag_code_used_as_virtual_code_when_code_column_blank() {
    let resolved = resolve(&[("Code", json!(""))], "Code=ONLINE1");
    assert!(resolved.code.is_none());
    assert_eq!(resolved.virtual_code.as_deref(), Some("ONLINE1"));
}

#[test]
fn virtual_code_column_is_last_fallback() {
    let resolved = resolve(&[("VirtualCode", json!("COL"))], "");
    assert_eq!(resolved.virtual_code.as_deref(), Some("COL"));

    let resolved = resolve(&[("VirtualCode", json!("COL"))], "WebCode=W");
    assert_eq!(resolved.virtual_code.as_deref(), Some("W"));
}

#[test]
fn numeric_code_column_is_rendered_as_text() {
    let resolved = resolve(&[("Code", json!(9193))], "");
    assert_eq!(resolved.code.as_deref(), Some("9193"));
}

// -----------------------------------------------------------------------
// lists and scalars
// -----------------------------------------------------------------------

#[test]
fn list_tags_split_on_colons() {
    let resolved = resolve(
        &[],
        "ProductCodes=S_PIZZA:S_PIZZA:14SCREEN,CategoryCodes=Pizza::Sides,ValidServiceMethods=Carryout:Delivery",
    );
    assert_eq!(
        resolved.eligible_products,
        vec!["S_PIZZA", "S_PIZZA", "14SCREEN"]
    );
    assert_eq!(resolved.eligible_categories, vec!["Pizza", "", "Sides"]);
    assert_eq!(resolved.valid_service_methods, vec!["Carryout", "Delivery"]);
}

#[test]
fn list_columns_used_when_tags_absent() {
    let resolved = resolve(&[("ValidServiceMethods", json!("Carryout"))], "");
    assert_eq!(resolved.valid_service_methods, vec!["Carryout"]);
}

#[test]
fn lists_default_to_empty() {
    let resolved = resolve(&[], "");
    assert!(resolved.eligible_products.is_empty());
    assert!(resolved.eligible_categories.is_empty());
    assert!(resolved.valid_service_methods.is_empty());
}

#[test]
fn scalar_tags_beat_columns() {
    let resolved = resolve(
        &[
            ("MinimumOrder", json!("10.00")),
            ("ServiceMethod", json!("Delivery")),
        ],
        "MinimumOrder=15.00,TimeRestriction=Late,ValidHours=22-02",
    );
    assert_eq!(resolved.minimum_order.as_deref(), Some("15.00"));
    assert_eq!(resolved.service_method.as_deref(), Some("Delivery"));
    assert_eq!(resolved.time_restriction.as_deref(), Some("Late"));
    assert_eq!(resolved.valid_hours.as_deref(), Some("22-02"));
}

#[test]
fn unknown_columns_pass_through_verbatim() {
    let resolved = resolve(
        &[
            ("ID", json!("P1")),
            ("Bundle", json!(false)),
            ("SortSeq", json!(3)),
        ],
        "",
    );
    assert_eq!(resolved.id.as_deref(), Some("P1"));
    assert_eq!(resolved.extra.get("Bundle"), Some(&json!(false)));
    assert_eq!(resolved.extra.get("SortSeq"), Some(&json!(3)));
    assert!(!resolved.extra.contains_key("ID"));
}

#[test]
fn resolve_does_not_mutate_inputs() {
    let fields = row(&[("Code", json!("A"))]);
    let tags = decode_tags(Some("VirtualCode=B"));
    let before = (fields.clone(), tags.clone());
    let first = resolve_fields(&fields, &tags);
    let second = resolve_fields(&fields, &tags);
    assert_eq!(first, second);
    assert_eq!((fields, tags), before);
}
