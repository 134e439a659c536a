use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Time-relevance bucket assigned to every coupon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponCategory {
    LateNight,
    Regular,
}

impl CouponCategory {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CouponCategory::LateNight => "late_night",
            CouponCategory::Regular => "regular",
        }
    }
}

impl std::fmt::Display for CouponCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A coupon decoded from one row of the upstream menu feed, with its tag
/// string resolved into typed fields.
///
/// Every optional field is `None` when the upstream row did not carry it (or
/// carried an empty string). Columns the decoder does not recognize are kept
/// verbatim in [`Coupon::extra`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    /// Upstream `ID` column, exactly as sent.
    pub id: Option<String>,
    /// Display identity: `id`, else `code`, else `virtual_code`, else a
    /// content hash of name/description/price. Stable across repeated decodes.
    pub identity: String,
    pub name: Option<String>,
    pub description: Option<String>,
    /// Raw upstream price, e.g. `"9.99"`.
    pub price: Option<String>,
    /// Price with a currency symbol, e.g. `"$9.99"`. Empty when no price.
    pub display_price: String,
    pub code: Option<String>,
    pub virtual_code: Option<String>,
    /// Unparsed `Tags` column.
    pub tags: Option<String>,
    /// Stored verbatim; no date validation is applied.
    pub expiration_date: Option<String>,
    pub expiration_time: Option<String>,
    pub eligible_products: Vec<String>,
    pub eligible_categories: Vec<String>,
    pub minimum_order: Option<String>,
    pub service_method: Option<String>,
    pub valid_service_methods: Vec<String>,
    pub time_restriction: Option<String>,
    pub valid_hours: Option<String>,
    pub menu_item_hints: Vec<String>,
    pub category: CouponCategory,
    /// Upstream columns with no typed counterpart, passed through untouched.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Coupon {
    /// Name and description joined by a single space, skipping empty parts.
    ///
    /// This is the text the hint extractor and the classifier scan.
    #[must_use]
    pub fn search_text(&self) -> String {
        join_search_text(self.name.as_deref(), self.description.as_deref())
    }

    #[must_use]
    pub fn is_late_night(&self) -> bool {
        self.category == CouponCategory::LateNight
    }
}

/// Joins optional name/description parts with a space, dropping empty ones.
#[must_use]
pub fn join_search_text(name: Option<&str>, description: Option<&str>) -> String {
    [name, description]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Store metadata copied from the top level of the feed payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreInfo {
    pub store_id: Option<String>,
    pub business_date: Option<String>,
    pub market: Option<String>,
    pub store_as_of_time: Option<String>,
    pub status: Option<String>,
    pub language_code: Option<String>,
}

/// Everything decoded from one feed payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodedFeed {
    pub store: StoreInfo,
    /// Same order as the upstream rows.
    pub coupons: Vec<Coupon>,
}

impl DecodedFeed {
    #[must_use]
    pub fn coupon_count(&self) -> usize {
        self.coupons.len()
    }

    /// Coupons in the late-night bucket, in feed order.
    pub fn late_night(&self) -> impl Iterator<Item = &Coupon> {
        self.coupons.iter().filter(|c| c.is_late_night())
    }
}
