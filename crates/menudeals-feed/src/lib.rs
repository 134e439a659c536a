//! Decoding of the upstream menu feed's coupon table, plus the per-caller
//! request limiter consulted before fetching that feed.

pub mod classify;
pub mod columnar;
pub mod diagnostics;
pub mod error;
pub mod hints;
pub mod identity;
pub mod pipeline;
pub mod rate_limit;
pub mod resolve;
pub mod tags;

pub use classify::classify;
pub use diagnostics::{CollectingSink, DecodeEvent, DecodeSink, TracingSink};
pub use error::FeedError;
pub use hints::extract_menu_hints;
pub use pipeline::{decode, decode_feed, decode_row, decode_str, DecodeOptions};
pub use rate_limit::{Clock, ManualClock, RateLimitDecision, SlidingWindowLimiter, SystemClock};
pub use tags::{decode_tags, TagEntry, TagSet};
