//! Symbol / limit selection and the fallback rules applied at the point of use

/// Candle window used when no limit was ever chosen
pub const DEFAULT_LIMIT: u32 = 200;

/// Largest window the backend serves in a single request
pub const MAX_LIMIT: u32 = 1000;

/// Choices offered by the limit selector
pub const LIMIT_CHOICES: [u32; 4] = [100, 200, 500, 1000];

/// What the user picked in the selectors. `None` means "never chosen".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub symbol: Option<String>,
    pub limit: Option<u32>,
}

/// Outcome of resolving the symbol selector against the current list
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolChoice {
    /// The explicit choice is still offered
    Explicit(String),
    /// Nothing was chosen, first available symbol is used
    FirstAvailable(String),
    /// The explicit choice vanished from the list; `fallback` is used instead
    Stale { previous: String, fallback: String },
    /// The backend offers no symbols at all
    Unavailable,
}

impl SymbolChoice {
    /// The symbol to fetch candles for, if any
    pub fn symbol(&self) -> Option<&str> {
        match self {
            SymbolChoice::Explicit(s) | SymbolChoice::FirstAvailable(s) => Some(s),
            SymbolChoice::Stale { fallback, .. } => Some(fallback),
            SymbolChoice::Unavailable => None,
        }
    }
}

/// Resolve the selector value against the latest symbol list.
///
/// A stale explicit choice falls back to the first available symbol, but the
/// caller is told so it can clear the selection and notify the user.
pub fn resolve_symbol(explicit: Option<&str>, available: &[String]) -> SymbolChoice {
    let first = match available.first() {
        Some(first) => first.clone(),
        None => return SymbolChoice::Unavailable,
    };

    match explicit {
        None => SymbolChoice::FirstAvailable(first),
        Some(chosen) if available.iter().any(|s| s == chosen) => {
            SymbolChoice::Explicit(chosen.to_string())
        }
        Some(chosen) => SymbolChoice::Stale {
            previous: chosen.to_string(),
            fallback: first,
        },
    }
}

/// Resolve the limit selector, falling back to `default`
pub fn resolve_limit(explicit: Option<u32>, default: u32) -> u32 {
    explicit.unwrap_or(default)
}

/// Parse a limit typed by the user
pub fn parse_limit(raw: &str) -> Result<u32, String> {
    let limit: u32 = raw
        .trim()
        .parse()
        .map_err(|_| format!("Invalid limit '{}'. Use a number between 1 and {}", raw, MAX_LIMIT))?;

    if limit == 0 || limit > MAX_LIMIT {
        return Err(format!("Limit must be between 1 and {}", MAX_LIMIT));
    }

    Ok(limit)
}
