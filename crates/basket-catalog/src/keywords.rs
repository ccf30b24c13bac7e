/// Product keywords scanned for in promotion text when a retailer does not
/// configure its own list. Matching is case-insensitive substring.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "noodle",
    "dumplings",
    "pasta sauce",
    "laundry liquid",
    "lasagne",
    "sausages",
    "steak",
    "lamb",
    "chicken",
    "bacon",
    "apples",
    "kiwifruit",
    "celery",
    "broccoli",
    "onions",
    "carrots",
    "beans",
];

/// The configured keywords, or [`DEFAULT_KEYWORDS`] when none are set.
#[must_use]
pub fn effective_keywords(configured: &[String]) -> Vec<String> {
    let configured: Vec<String> = configured
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();
    if configured.is_empty() {
        DEFAULT_KEYWORDS.iter().map(|k| (*k).to_string()).collect()
    } else {
        configured
    }
}
