use menudeals_core::CouponCategory;

/// Phrases that mark a coupon as late-night only.
pub const LATE_NIGHT_PHRASES: &[&str] = &[
    "late night",
    "late-night",
    "after 10",
    "after 11",
    "midnight",
    "night only",
    "night owl",
    "after dark",
];

/// Buckets a coupon by its name + description text. Every input gets a
/// category; anything without a late-night phrase is [`CouponCategory::Regular`].
#[must_use]
pub fn classify(text: &str) -> CouponCategory {
    let lower = text.to_lowercase();
    if LATE_NIGHT_PHRASES.iter().any(|p| lower.contains(p)) {
        CouponCategory::LateNight
    } else {
        CouponCategory::Regular
    }
}
