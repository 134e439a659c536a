//! Merging of decoded tags with top-level row columns.
//!
//! Precedence, highest first:
//!
//! | Field | Sources |
//! |---|---|
//! | expiration date | `Tags.ExpiresOn`, `Tags.ExpireDate`, `Tags.Expiration`, column `ExpiresOn`, column `ExpireDate` |
//! | expiration time | `Tags.ExpiresAt`, only when `Tags.ExpiresOn` supplied the date |
//! | virtual code | `Tags.VirtualCode`, `Tags.OnlineCode`, `Tags.WebCode`, `Tags.Code` (only while column `Code` is empty), column `VirtualCode` |
//! | lists | `Tags.ProductCodes` / `Tags.CategoryCodes` / `Tags.ValidServiceMethods`, then the same-named column |
//! | other scalars | tag, then same-named column |
//!
//! `Tags.Code` never replaces a present `Code` column.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::columnar::RowFields;
use crate::tags::{split_list, TagSet};

/// Row columns with a typed counterpart; everything else passes through.
const KNOWN_COLUMNS: &[&str] = &[
    "Id",
    "Name",
    "Description",
    "Price",
    "Code",
    "VirtualCode",
    "Tags",
    "ExpiresOn",
    "ExpireDate",
    "MinimumOrder",
    "ServiceMethod",
    "ValidServiceMethods",
    "TimeRestriction",
    "ValidHours",
    "ProductCodes",
    "CategoryCodes",
];

/// Which source supplied the resolved expiration date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpirationSource {
    TagExpiresOn,
    TagExpireDate,
    TagExpiration,
    ColumnExpiresOn,
    ColumnExpireDate,
}

/// A coupon's typed fields before hints, category and identity are derived.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedFields {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub code: Option<String>,
    pub virtual_code: Option<String>,
    pub tags: Option<String>,
    pub expiration_date: Option<String>,
    pub expiration_source: Option<ExpirationSource>,
    pub expiration_time: Option<String>,
    pub eligible_products: Vec<String>,
    pub eligible_categories: Vec<String>,
    pub minimum_order: Option<String>,
    pub service_method: Option<String>,
    pub valid_service_methods: Vec<String>,
    pub time_restriction: Option<String>,
    pub valid_hours: Option<String>,
    pub extra: BTreeMap<String, Value>,
}

/// Resolves one row. Pure: reads `row` and `tags`, returns a new value.
#[must_use]
pub fn resolve_fields(row: &RowFields, tags: &TagSet) -> ResolvedFields {
    let tag = |key: &str| tags.non_empty(key).map(str::to_owned);
    let tag_or_column = |key: &str| tag(key).or_else(|| row.text(key));

    let code = row.text("Code");
    let (expiration_date, expiration_source) = resolve_expiration(row, tags);
    let expiration_time = if expiration_source == Some(ExpirationSource::TagExpiresOn) {
        tag("ExpiresAt")
    } else {
        None
    };

    let virtual_code = tag("VirtualCode")
        .or_else(|| tag("OnlineCode"))
        .or_else(|| tag("WebCode"))
        .or_else(|| if code.is_none() { tag("Code") } else { None })
        .or_else(|| row.text("VirtualCode"));

    let list = |key: &str| -> Vec<String> {
        tags.get(key)
            .map(split_list)
            .or_else(|| row.text(key).as_deref().map(split_list))
            .unwrap_or_default()
    };

    let extra = row
        .iter()
        .filter(|(name, _)| !is_known_column(name))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();

    ResolvedFields {
        id: row.text("Id"),
        name: row.text("Name"),
        description: row.text("Description"),
        price: row.text("Price"),
        code,
        virtual_code,
        tags: row.text("Tags"),
        expiration_date,
        expiration_source,
        expiration_time,
        eligible_products: list("ProductCodes"),
        eligible_categories: list("CategoryCodes"),
        minimum_order: tag_or_column("MinimumOrder"),
        service_method: tag_or_column("ServiceMethod"),
        valid_service_methods: list("ValidServiceMethods"),
        time_restriction: tag_or_column("TimeRestriction"),
        valid_hours: tag_or_column("ValidHours"),
        extra,
    }
}

fn resolve_expiration(
    row: &RowFields,
    tags: &TagSet,
) -> (Option<String>, Option<ExpirationSource>) {
    let candidates = [
        (
            tags.non_empty("ExpiresOn").map(str::to_owned),
            ExpirationSource::TagExpiresOn,
        ),
        (
            tags.non_empty("ExpireDate").map(str::to_owned),
            ExpirationSource::TagExpireDate,
        ),
        (
            tags.non_empty("Expiration").map(str::to_owned),
            ExpirationSource::TagExpiration,
        ),
        (row.text("ExpiresOn"), ExpirationSource::ColumnExpiresOn),
        (row.text("ExpireDate"), ExpirationSource::ColumnExpireDate),
    ];

    candidates
        .into_iter()
        .find_map(|(value, source)| value.map(|v| (v, source)))
        .map_or((None, None), |(v, source)| (Some(v), Some(source)))
}

fn is_known_column(name: &str) -> bool {
    KNOWN_COLUMNS.iter().any(|k| k.eq_ignore_ascii_case(name))
}

#[cfg(test)]
#[path = "resolve_test.rs"]
mod tests;
