//! Display identity and price formatting for decoded coupons.

use sha2::{Digest, Sha256};

/// Symbols that mark a price string as already formatted.
const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥'];

/// Picks the identity a UI should key a coupon by.
///
/// Business identifiers win in the order `id`, `code`, `virtual_code`. A
/// coupon with none of them gets `coupon-` plus the first 16 hex digits of
/// SHA-256 over name, description and price, so repeated decodes of the same
/// row agree.
#[must_use]
pub fn resolve_identity(
    id: Option<&str>,
    code: Option<&str>,
    virtual_code: Option<&str>,
    name: Option<&str>,
    description: Option<&str>,
    price: Option<&str>,
) -> String {
    [id, code, virtual_code]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map_or_else(
            || content_identity(name, description, price),
            str::to_owned,
        )
}

fn content_identity(name: Option<&str>, description: Option<&str>, price: Option<&str>) -> String {
    let input = format!(
        "{}\x00{}\x00{}",
        name.unwrap_or("").trim(),
        description.unwrap_or("").trim(),
        price.unwrap_or("").trim(),
    );
    let digest = format!("{:x}", Sha256::digest(input.as_bytes()));
    format!("coupon-{}", &digest[..16])
}

/// Formats a raw price for display.
///
/// A price that already carries a currency symbol (any of `$ € £ ¥`, or
/// `symbol` itself) is returned unchanged; otherwise `symbol` is prefixed.
/// Absent or blank prices give an empty string.
#[must_use]
pub fn normalize_price(raw: Option<&str>, symbol: &str) -> String {
    let Some(price) = raw.map(str::trim).filter(|p| !p.is_empty()) else {
        return String::new();
    };
    if price.contains(CURRENCY_SYMBOLS) || (!symbol.is_empty() && price.contains(symbol)) {
        price.to_owned()
    } else {
        format!("{symbol}{price}")
    }
}
