//! `decode` and `hints` command handlers.
//!
//! Both commands write JSON to stdout; diagnostics go to stderr through
//! `tracing`.

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use menudeals_core::{CouponCategory, DecodedFeed};
use menudeals_feed::{DecodeOptions, TracingSink};
use serde::Serialize;

/// What the hint extractor and classifier make of a piece of free text.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub(crate) struct TextReport {
    pub(crate) text: String,
    pub(crate) category: CouponCategory,
    pub(crate) hints: Vec<String>,
}

/// Decode the payload at `path` (`-` reads stdin) and print it as JSON.
pub(crate) fn run_decode(
    path: &Path,
    options: &DecodeOptions,
    compact: bool,
    late_night_only: bool,
) -> anyhow::Result<()> {
    let raw = read_input(path)?;
    let mut feed = menudeals_feed::decode_str(&raw, options, &mut TracingSink)
        .with_context(|| format!("failed to decode {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        coupons = feed.coupon_count(),
        late_night = feed.late_night().count(),
        "decoded coupon payload"
    );

    if late_night_only {
        feed.coupons.retain(menudeals_core::Coupon::is_late_night);
    }

    println!("{}", render_feed(&feed, compact)?);
    Ok(())
}

/// Print the hints and category for `text`.
pub(crate) fn run_hints(text: &str) -> anyhow::Result<()> {
    let report = describe_text(text);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub(crate) fn describe_text(text: &str) -> TextReport {
    TextReport {
        text: text.to_owned(),
        category: menudeals_feed::classify(text),
        hints: menudeals_feed::extract_menu_hints(text),
    }
}

pub(crate) fn render_feed(feed: &DecodedFeed, compact: bool) -> serde_json::Result<String> {
    if compact {
        serde_json::to_string(feed)
    } else {
        serde_json::to_string_pretty(feed)
    }
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read payload from stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
