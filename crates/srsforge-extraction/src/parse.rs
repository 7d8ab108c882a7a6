//! Defensive parsing of completion responses into [`Requirements`].
//!
//! Contract: raw response text in, one of three explicitly named outcomes
//! out. Parsing never fails the pipeline — only transport-level failures
//! do — so every outcome carries a usable `Requirements` value.

use serde_json::Value;
use srsforge_state::Requirements;

/// The four top-level keys the extraction prompt asks for, in declaration
/// order. Warning messages list missing keys in this order.
pub const REQUIRED_KEYS: [&str; 4] = [
    "functional_requirements",
    "api_endpoints",
    "db_schema",
    "auth_requirements",
];

/// Outcome of decoding one completion response.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedRequirements {
    /// All four top-level keys were present; no warning needed.
    Parsed(Requirements),
    /// Decoding succeeded but at least one key was absent and has been
    /// backfilled with its structural default.
    Backfilled {
        requirements: Requirements,
        /// Missing keys in [`REQUIRED_KEYS`] order, for the warning log.
        missing: Vec<&'static str>,
    },
    /// The response could not be decoded as a JSON object at all; the
    /// carried value is the parse-failure sentinel.
    Unparsable(Requirements),
}

impl ParsedRequirements {
    /// The requirements value, whichever outcome occurred.
    #[must_use]
    pub fn into_requirements(self) -> Requirements {
        match self {
            Self::Parsed(req) | Self::Unparsable(req) => req,
            Self::Backfilled { requirements, .. } => requirements,
        }
    }
}

/// Decode a raw completion response into requirements.
///
/// The model is asked for a bare JSON object but frequently wraps it in
/// explanatory text, so only the slice from the first `{` to the last `}`
/// is decoded. A response with no such slice, or whose slice is not a JSON
/// object matching the requirements shape, yields
/// [`ParsedRequirements::Unparsable`] with the sentinel value.
#[must_use]
pub fn parse_completion(raw: &str) -> ParsedRequirements {
    let Some(slice) = json_object_slice(raw) else {
        return ParsedRequirements::Unparsable(Requirements::parse_failure_sentinel());
    };

    let value: Value = match serde_json::from_str(slice) {
        Ok(value) => value,
        Err(_) => {
            return ParsedRequirements::Unparsable(Requirements::parse_failure_sentinel());
        }
    };

    let Some(object) = value.as_object() else {
        return ParsedRequirements::Unparsable(Requirements::parse_failure_sentinel());
    };

    let missing: Vec<&'static str> = REQUIRED_KEYS
        .iter()
        .filter(|key| !object.contains_key(**key))
        .copied()
        .collect();

    match serde_json::from_value::<Requirements>(value.clone()) {
        Ok(requirements) if missing.is_empty() => ParsedRequirements::Parsed(requirements),
        Ok(requirements) => ParsedRequirements::Backfilled {
            requirements,
            missing,
        },
        // Present keys with the wrong inner shape are as undecodable as no
        // JSON at all.
        Err(_) => ParsedRequirements::Unparsable(Requirements::parse_failure_sentinel()),
    }
}

/// The candidate JSON slice: first `{` through last `}`, if both exist in
/// that order.
fn json_object_slice(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}
