//! End-to-end decoding of a feed payload into [`Coupon`]s.
//!
//! Each row is unmarshaled, resolved against its tags, then enriched with
//! hints, a category, an identity and a display price. Rows are independent
//! and the output keeps input row order.

use menudeals_core::{Coupon, DecodedFeed, StoreInfo};
use serde_json::{Map, Value};

use crate::classify::classify;
use crate::columnar::{scalar_text, unmarshal_rows, RowFields};
use crate::diagnostics::{DecodeSink, TracingSink};
use crate::error::FeedError;
use crate::hints::extract_menu_hints;
use crate::identity::{normalize_price, resolve_identity};
use crate::resolve::resolve_fields;
use crate::tags::decode_tags;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Prefixed onto prices that arrive without a currency symbol.
    pub currency_symbol: String,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
        }
    }
}

/// Decodes the coupons in `payload` with default options, logging tolerated
/// anomalies through `tracing`.
///
/// # Errors
///
/// Returns [`FeedError::DecodeFault`] if `payload` is not a JSON object.
pub fn decode(payload: &Value) -> Result<Vec<Coupon>, FeedError> {
    decode_feed(payload, &DecodeOptions::default(), &mut TracingSink).map(|feed| feed.coupons)
}

/// Decodes store metadata and coupons from `payload`.
///
/// A payload object without a coupon table decodes to zero coupons.
///
/// # Errors
///
/// Returns [`FeedError::DecodeFault`] if `payload` is not a JSON object.
pub fn decode_feed(
    payload: &Value,
    options: &DecodeOptions,
    sink: &mut dyn DecodeSink,
) -> Result<DecodedFeed, FeedError> {
    let Value::Object(object) = payload else {
        return Err(FeedError::DecodeFault {
            reason: format!("expected a JSON object, found {}", json_kind(payload)),
        });
    };

    let coupons: Vec<Coupon> = unmarshal_rows(object, sink)
        .iter()
        .map(|row| decode_row(row, options))
        .collect();

    tracing::debug!(coupon_count = coupons.len(), "decoded coupon feed");

    Ok(DecodedFeed {
        store: store_info(object),
        coupons,
    })
}

/// Parses `raw` as JSON and decodes it.
///
/// # Errors
///
/// Returns [`FeedError::Json`] if `raw` is not JSON, or
/// [`FeedError::DecodeFault`] if it is JSON but not an object.
pub fn decode_str(
    raw: &str,
    options: &DecodeOptions,
    sink: &mut dyn DecodeSink,
) -> Result<DecodedFeed, FeedError> {
    let payload: Value = serde_json::from_str(raw).map_err(|source| FeedError::Json {
        context: "coupon feed payload".to_string(),
        source,
    })?;
    decode_feed(&payload, options, sink)
}

/// Builds one [`Coupon`] from an unmarshaled row.
#[must_use]
pub fn decode_row(row: &RowFields, options: &DecodeOptions) -> Coupon {
    let tags = decode_tags(row.text("Tags").as_deref());
    let fields = resolve_fields(row, &tags);

    let text =
        menudeals_core::coupons::join_search_text(fields.name.as_deref(), fields.description.as_deref());
    let menu_item_hints = extract_menu_hints(&text);
    let category = classify(&text);

    let identity = resolve_identity(
        fields.id.as_deref(),
        fields.code.as_deref(),
        fields.virtual_code.as_deref(),
        fields.name.as_deref(),
        fields.description.as_deref(),
        fields.price.as_deref(),
    );
    let display_price = normalize_price(fields.price.as_deref(), &options.currency_symbol);

    Coupon {
        id: fields.id,
        identity,
        name: fields.name,
        description: fields.description,
        price: fields.price,
        display_price,
        code: fields.code,
        virtual_code: fields.virtual_code,
        tags: fields.tags,
        expiration_date: fields.expiration_date,
        expiration_time: fields.expiration_time,
        eligible_products: fields.eligible_products,
        eligible_categories: fields.eligible_categories,
        minimum_order: fields.minimum_order,
        service_method: fields.service_method,
        valid_service_methods: fields.valid_service_methods,
        time_restriction: fields.time_restriction,
        valid_hours: fields.valid_hours,
        menu_item_hints,
        category,
        extra: fields.extra,
    }
}

/// Copies the store fields from the top level of the payload.
fn store_info(payload: &Map<String, Value>) -> StoreInfo {
    let field = |key: &str| payload.get(key).and_then(scalar_text);
    StoreInfo {
        store_id: field("StoreID"),
        business_date: field("BusinessDate"),
        market: field("Market"),
        store_as_of_time: field("StoreAsOfTime"),
        status: field("Status"),
        language_code: field("LanguageCode"),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::diagnostics::{CollectingSink, DecodeEvent};

    #[test]
    fn non_object_payload_is_a_decode_fault() {
        for payload in [json!(null), json!([1, 2]), json!("coupons"), json!(3)] {
            let err = decode(&payload).unwrap_err();
            assert!(
                matches!(err, FeedError::DecodeFault { .. }),
                "payload {payload}"
            );
        }
    }

    #[test]
    fn invalid_json_is_a_json_error() {
        let err = decode_str(
            "{not json",
            &DecodeOptions::default(),
            &mut CollectingSink::default(),
        )
        .unwrap_err();
        assert!(matches!(err, FeedError::Json { .. }));
    }

    #[test]
    fn object_without_table_decodes_to_no_coupons() {
        let mut sink = CollectingSink::default();
        let feed = decode_feed(
            &json!({ "StoreID": "4336", "Status": 0 }),
            &DecodeOptions::default(),
            &mut sink,
        )
        .unwrap();
        assert!(feed.coupons.is_empty());
        assert_eq!(feed.store.store_id.as_deref(), Some("4336"));
        assert_eq!(feed.store.status.as_deref(), Some("0"));
        assert_eq!(sink.events, vec![DecodeEvent::MissingColumns]);
    }

    #[test]
    fn currency_symbol_option_is_applied() {
        let options = DecodeOptions {
            currency_symbol: "€".to_string(),
        };
        let feed = decode_feed(
            &json!({ "Columns": ["Name", "Price"], "Data": [["Deal", "5.00"]] }),
            &options,
            &mut CollectingSink::default(),
        )
        .unwrap();
        assert_eq!(feed.coupons[0].display_price, "€5.00");
    }

    #[test]
    fn coupon_without_business_id_gets_content_identity() {
        let payload = json!({ "Columns": ["Name", "Price"], "Data": [["Deal", "5.00"]] });
        let first = decode(&payload).unwrap();
        let second = decode(&payload).unwrap();
        assert!(first[0].identity.starts_with("coupon-"));
        assert_eq!(first[0].identity, second[0].identity);
    }
}
