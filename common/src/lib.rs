pub mod demo_parse;

pub use demo_parse::*;

/// The payload delivered instead of a [`ParseResult`] when a parse fails.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ErrorPayload {
    pub error: String,
}
