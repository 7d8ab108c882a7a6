//! Requirements extraction helpers.
//!
//! Two narrow concerns live here, both deliberately isolated from the
//! state machine so their heuristics can change without touching it:
//!
//! - [`parse_completion`]: turn a raw completion response into a
//!   [`Requirements`] value, tolerating the explanatory prose models like
//!   to wrap around JSON payloads.
//! - [`DocumentExtractor`]: the collaborator that turns a document path
//!   into plain text.

mod parse;
mod source;

pub use parse::{ParsedRequirements, REQUIRED_KEYS, parse_completion};
pub use source::{DocumentExtractor, PlainTextExtractor};

// Re-exported for callers that construct the sentinel directly in tests.
pub use srsforge_state::Requirements;
