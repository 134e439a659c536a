//! Decoder for the `Key=Value,Key2=Value2` mini-language carried in a
//! coupon's `Tags` column.
//!
//! The grammar has no quoting or escaping: a comma always ends a token, and
//! the first `=` inside a token separates the key from the value. Any later
//! `=` belongs to the value. Tokens without an `=` (or with a blank key) are
//! not pairs and are dropped.
//!
//! Values are kept verbatim apart from trimming surrounding whitespace; no
//! date or number validation happens here.

/// Tag keys that feed a typed [`menudeals_core::Coupon`] field.
pub const KNOWN_TAG_KEYS: &[&str] = &[
    "ExpiresOn",
    "ExpireDate",
    "Expiration",
    "ExpiresAt",
    "VirtualCode",
    "OnlineCode",
    "WebCode",
    "Code",
    "ProductCodes",
    "CategoryCodes",
    "ValidServiceMethods",
    "ServiceMethod",
    "MinimumOrder",
    "TimeRestriction",
    "ValidHours",
];

/// One decoded `key=value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry {
    pub key: String,
    pub value: String,
}

/// The decoded contents of one `Tags` string.
///
/// Keys are unique: when a key repeats, the later value replaces the earlier
/// one but the key keeps the position of its first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    entries: Vec<TagEntry>,
}

impl TagSet {
    /// Value for `key` (case-sensitive), if the tag string carried it.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    /// Like [`TagSet::get`] but treats an empty value as absent.
    #[must_use]
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    #[must_use]
    pub fn entries(&self) -> &[TagEntry] {
        &self.entries
    }

    /// Entries whose key has no typed coupon field.
    pub fn unrecognized(&self) -> impl Iterator<Item = &TagEntry> {
        self.entries
            .iter()
            .filter(|e| !KNOWN_TAG_KEYS.contains(&e.key.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, key: String, value: String) {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.key == key) {
            existing.value = value;
        } else {
            self.entries.push(TagEntry { key, value });
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    Key,
    Value,
}

/// Decodes a raw `Tags` string. `None` and `""` both yield an empty set.
#[must_use]
pub fn decode_tags(raw: Option<&str>) -> TagSet {
    let mut set = TagSet::default();
    let Some(raw) = raw else {
        return set;
    };

    let mut state = LexState::Key;
    let mut key = String::new();
    let mut value = String::new();

    for ch in raw.chars() {
        match (state, ch) {
            (LexState::Key, ',') => {
                // A token with no '=' is not a pair.
                key.clear();
            }
            (LexState::Key, '=') => state = LexState::Value,
            (LexState::Key, c) => key.push(c),
            (LexState::Value, ',') => {
                emit(&mut set, &mut key, &mut value);
                state = LexState::Key;
            }
            (LexState::Value, c) => value.push(c),
        }
    }

    if state == LexState::Value {
        emit(&mut set, &mut key, &mut value);
    }

    set
}

fn emit(set: &mut TagSet, key: &mut String, value: &mut String) {
    let k = key.trim();
    if !k.is_empty() {
        set.insert(k.to_owned(), value.trim().to_owned());
    }
    key.clear();
    value.clear();
}

/// Splits a colon-delimited tag value into its segments.
///
/// Segment count and order are preserved exactly: `"A::B"` gives
/// `["A", "", "B"]` and duplicates are kept.
#[must_use]
pub fn split_list(value: &str) -> Vec<String> {
    value.split(':').map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_simple_pairs() {
        let tags = decode_tags(Some("ExpiresOn=2025-12-31,VirtualCode=LP99"));
        assert_eq!(tags.len(), 2);
        assert_eq!(tags.get("ExpiresOn"), Some("2025-12-31"));
        assert_eq!(tags.get("VirtualCode"), Some("LP99"));
    }

    #[test]
    fn none_and_empty_yield_empty_set() {
        assert!(decode_tags(None).is_empty());
        assert!(decode_tags(Some("")).is_empty());
        assert!(decode_tags(Some(",,,")).is_empty());
    }

    #[test]
    fn splits_on_first_equals_only() {
        let tags = decode_tags(Some("Note=a=b=c"));
        assert_eq!(tags.get("Note"), Some("a=b=c"));
    }

    #[test]
    fn last_repeated_key_wins() {
        let tags = decode_tags(Some("Code=A,Other=x,Code=B"));
        assert_eq!(tags.get("Code"), Some("B"));
        assert_eq!(tags.len(), 2);
        assert_eq!(tags.entries()[0].key, "Code");
    }

    #[test]
    fn trims_whitespace_around_keys_and_values() {
        let tags = decode_tags(Some("ExpiresOn=2025-12-31, VirtualCode = LP99 "));
        assert_eq!(tags.get("VirtualCode"), Some("LP99"));
    }

    #[test]
    fn tokens_without_equals_are_dropped() {
        let tags = decode_tags(Some("Bundle,Code=X,=orphan,Flag"));
        assert_eq!(tags.len(), 1);
        assert_eq!(tags.get("Code"), Some("X"));
        assert!(!tags.contains("Bundle"));
        assert!(!tags.contains("Flag"));
    }

    #[test]
    fn empty_value_is_present_but_not_non_empty() {
        let tags = decode_tags(Some("VirtualCode="));
        assert_eq!(tags.get("VirtualCode"), Some(""));
        assert!(tags.non_empty("VirtualCode").is_none());
    }

    #[test]
    fn malformed_dates_are_stored_verbatim() {
        let tags = decode_tags(Some("ExpiresOn=31/13/20xx"));
        assert_eq!(tags.get("ExpiresOn"), Some("31/13/20xx"));
    }

    #[test]
    fn keys_are_case_sensitive() {
        let tags = decode_tags(Some("expireson=2025-01-01"));
        assert!(tags.get("ExpiresOn").is_none());
        assert_eq!(tags.get("expireson"), Some("2025-01-01"));
    }

    #[test]
    fn unrecognized_keys_are_retained() {
        let tags = decode_tags(Some("Code=A,Beta=1,Gamma=two"));
        let unknown: Vec<_> = tags.unrecognized().map(|e| e.key.as_str()).collect();
        assert_eq!(unknown, vec!["Beta", "Gamma"]);
    }

    #[test]
    fn split_list_preserves_every_segment() {
        for raw in ["A", "A:B", "A::B", ":", "S:S:S", "", "12:X:12:"] {
            let parts = split_list(raw);
            assert_eq!(parts.len(), raw.matches(':').count() + 1, "input {raw:?}");
            assert_eq!(parts.join(":"), raw);
        }
    }

    #[test]
    fn split_list_keeps_duplicates_in_order() {
        assert_eq!(split_list("S:P:S"), vec!["S", "P", "S"]);
    }
}
