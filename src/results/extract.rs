//! Listing extraction from raw provider hits
//!
//! Providers only hand back a URL, a title and a snippet. Everything else
//! (marketplace, price, condition, sale status) is recovered here with a set
//! of word-anchored patterns. Extraction never fails: a hit without a usable
//! price is dropped, and condition/status fall back to `Used`/`Active`.

use super::types::{Condition, Listing, ListingStatus, Platform, RawSearchResult};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use url::Url;

static PRICE_SYMBOL_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:\busd\b|us\s*\$|us\$|\$)\s*(\d{1,3}(?:,\d{3})+|\d+)(?:\.(\d{1,2}))?")
        .expect("valid symbol price pattern")
});

static PRICE_USD_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d{1,3}(?:,\d{3})+|\d+)(?:\.(\d{1,2}))?\s*\busd\b")
        .expect("valid usd suffix pattern")
});

static PRICE_CONTEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:price|asking|ask|obo|offer|now|for)\s*[:\-]?\s*(\d{1,3}(?:,\d{3})+|\d{2,})(?:\.(\d{1,2}))?\b",
    )
    .expect("valid context price pattern")
});

static CONDITION_NEW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:new|sealed)\b").expect("valid condition pattern"));
static CONDITION_GOOD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bgood\b").expect("valid condition pattern"));
static CONDITION_FAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bfair\b").expect("valid condition pattern"));

static STATUS_UNSOLD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:not\s+sold|unsold|never\s+sold)\b").expect("valid status pattern")
});
static STATUS_SOLD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bsold\b").expect("valid status pattern"));

/// Turn raw provider hits into priced listings, keeping input order.
pub fn parse_listings(items: &[RawSearchResult]) -> Vec<Listing> {
    items.iter().filter_map(parse_listing).collect()
}

/// Parse a single hit. Returns `None` when no price can be found.
pub fn parse_listing(item: &RawSearchResult) -> Option<Listing> {
    let text = format!("{} {}", item.title, item.description);
    let price = extract_best_price(&text)?;

    let lower = text.to_lowercase();
    let listing = Listing::new(detect_platform(&item.url), price, &item.url, &item.title)?
        .with_condition(detect_condition(&lower))
        .with_status(detect_status(&lower));

    Some(listing)
}

/// Lowest positive USD amount in the text.
///
/// Taking the minimum favours the current price in snippets such as
/// "was $150, now $99".
pub fn extract_best_price(text: &str) -> Option<f64> {
    [&*PRICE_SYMBOL_PREFIX, &*PRICE_USD_SUFFIX, &*PRICE_CONTEXT]
        .into_iter()
        .flat_map(|pattern| pattern.captures_iter(text))
        .filter_map(|caps| parse_price_match(&caps))
        .fold(None, |best: Option<f64>, price| match best {
            Some(current) if current <= price => Some(current),
            _ => Some(price),
        })
}

fn parse_price_match(caps: &Captures<'_>) -> Option<f64> {
    let whole = caps.get(1)?.as_str().replace(',', "");
    if whole.is_empty() {
        return None;
    }

    let amount = match caps.get(2).map(|m| m.as_str()) {
        Some(fraction) if fraction.len() == 1 => format!("{}.{}0", whole, fraction),
        Some(fraction) => format!("{}.{}", whole, fraction),
        None => whole,
    };

    amount
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite() && *price > 0.0)
}

/// Detect the marketplace from the URL host labels.
///
/// Matching whole labels handles regional domains (`ebay.co.uk`) and
/// subdomains (`marketplace.facebook.com`) without matching `notebay.com`.
pub fn detect_platform(raw_url: &str) -> Platform {
    let trimmed = raw_url.trim();
    let host = Url::parse(trimmed)
        .ok()
        .and_then(|url| url.host_str().map(str::to_lowercase))
        .filter(|host| !host.is_empty());

    let host = host.unwrap_or_else(|| trimmed.to_lowercase());
    let labels: Vec<&str> = host.trim_matches('.').split('.').collect();

    let has = |wanted: &str| labels.iter().any(|label| *label == wanted);

    if has("ebay") {
        Platform::Ebay
    } else if has("mercari") {
        Platform::Mercari
    } else if has("amazon") {
        Platform::Amazon
    } else if has("facebook") || has("fb") {
        Platform::Facebook
    } else {
        Platform::Other
    }
}

fn detect_condition(lower: &str) -> Condition {
    if CONDITION_NEW.is_match(lower) {
        Condition::New
    } else if CONDITION_GOOD.is_match(lower) {
        Condition::Good
    } else if CONDITION_FAIR.is_match(lower) {
        Condition::Fair
    } else {
        Condition::Used
    }
}

fn detect_status(lower: &str) -> ListingStatus {
    if STATUS_UNSOLD.is_match(lower) {
        ListingStatus::Active
    } else if STATUS_SOLD.is_match(lower) {
        ListingStatus::Sold
    } else {
        ListingStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(url: &str, title: &str, description: &str) -> RawSearchResult {
        RawSearchResult::new(url, title, description)
    }

    #[test]
    fn test_parse_bundle_listing() {
        let got = parse_listings(&[raw(
            "https://www.ebay.com/itm/1",
            "Console Bundle $1,299.99 Sold",
            "brand new sealed",
        )]);

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].platform(), Platform::Ebay);
        assert_eq!(got[0].price(), 1299.99);
        assert_eq!(got[0].condition(), Condition::New);
        assert_eq!(got[0].status(), ListingStatus::Sold);
        assert_eq!(got[0].title(), "Console Bundle $1,299.99 Sold");
    }

    #[test]
    fn test_parse_keeps_order_and_drops_unpriced() {
        let got = parse_listings(&[
            raw("https://www.ebay.com/itm/1", "Console $300", ""),
            raw("https://example.com/ignore", "No price here", "missing amount"),
            raw("https://www.mercari.com/us/item/2", "Controller", "Good condition only $80.00"),
        ]);

        assert_eq!(got.len(), 2);
        assert_eq!(got[0].platform(), Platform::Ebay);
        assert_eq!(got[1].platform(), Platform::Mercari);
        assert_eq!(got[1].price(), 80.0);
        assert_eq!(got[1].condition(), Condition::Good);
        assert_eq!(got[1].status(), ListingStatus::Active);
    }

    #[test]
    fn test_lowest_price_wins() {
        let got = parse_listing(&raw(
            "https://www.ebay.com/itm/2",
            "Deal was $150 now $99",
            "good condition",
        ))
        .unwrap();

        assert_eq!(got.price(), 99.0);
        assert_eq!(got.condition(), Condition::Good);
    }

    #[test]
    fn test_not_sold_is_active() {
        let got = parse_listing(&raw("https://www.ebay.com/itm/3", "Switch $200", "not sold yet"))
            .unwrap();
        assert_eq!(got.status(), ListingStatus::Active);

        let got = parse_listing(&raw("https://www.ebay.com/itm/4", "Switch $200", "never sold"))
            .unwrap();
        assert_eq!(got.status(), ListingStatus::Active);
    }

    #[test]
    fn test_price_pattern_families() {
        assert_eq!(extract_best_price("US$ 45"), Some(45.0));
        assert_eq!(extract_best_price("US $1,050.5"), Some(1050.5));
        assert_eq!(extract_best_price("USD 75.25"), Some(75.25));
        assert_eq!(extract_best_price("costs 120 USD"), Some(120.0));
        assert_eq!(extract_best_price("asking: 250 obo"), Some(250.0));
        assert_eq!(extract_best_price("price - 1,200"), Some(1200.0));
        assert_eq!(extract_best_price("$3.9"), Some(3.9));
    }

    #[test]
    fn test_context_price_needs_two_digits() {
        assert_eq!(extract_best_price("for 5 people"), None);
        assert_eq!(extract_best_price("works for 45"), Some(45.0));
    }

    #[test]
    fn test_zero_amounts_are_ignored() {
        assert_eq!(extract_best_price("$0 shipping, $0.00 fees"), None);
        assert_eq!(extract_best_price("$0 shipping, now $35"), Some(35.0));
    }

    #[test]
    fn test_condition_is_word_anchored() {
        let got = parse_listing(&raw("https://amazon.com/dp/1", "Renewed $150", "latest news"))
            .unwrap();
        assert_eq!(got.condition(), Condition::Used);

        let got = parse_listing(&raw("https://amazon.com/dp/1", "Lamp $15", "fair shape"))
            .unwrap();
        assert_eq!(got.condition(), Condition::Fair);
    }

    #[test]
    fn test_detect_platform() {
        assert_eq!(detect_platform("https://www.ebay.co.uk/itm/1"), Platform::Ebay);
        assert_eq!(
            detect_platform("https://marketplace.facebook.com/item/1"),
            Platform::Facebook
        );
        assert_eq!(detect_platform("https://m.fb.com/x"), Platform::Facebook);
        assert_eq!(detect_platform("https://www.amazon.com/dp/1"), Platform::Amazon);
        assert_eq!(detect_platform("https://notebay.com/itm/1"), Platform::Other);
        assert_eq!(detect_platform("mercari.com/us/item/9"), Platform::Mercari);
        assert_eq!(detect_platform(""), Platform::Other);
        assert_eq!(detect_platform("example.com/ref=ebay"), Platform::Other);
        assert_eq!(detect_platform("www.ebay.com/itm/1"), Platform::Ebay);
    }
}
