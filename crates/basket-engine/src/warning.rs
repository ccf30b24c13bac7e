use serde::Serialize;

/// A recoverable problem observed during a comparison run. Collected next to
/// the normal output rather than failing the call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// A catalog source could not be read; its entries were excluded.
    SourceUnavailable { source: String, reason: String },
    /// A record was missing a required field and was dropped.
    MalformedEntry {
        source: String,
        position: usize,
        product: String,
        reason: String,
    },
    /// No catalog entry matched this basket item.
    NoMatch { name: String },
    /// A match could not be attributed to a store.
    UngroupedMatch { name: String, reason: String },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::SourceUnavailable { source, reason } => {
                write!(f, "source '{source}' skipped: {reason}")
            }
            Warning::MalformedEntry {
                source,
                position,
                product,
                reason,
            } => write!(
                f,
                "source '{source}' record #{position} ('{product}') dropped: {reason}"
            ),
            Warning::NoMatch { name } => write!(f, "no listing found for '{name}'"),
            Warning::UngroupedMatch { name, reason } => {
                write!(f, "match for '{name}' not grouped: {reason}")
            }
        }
    }
}
