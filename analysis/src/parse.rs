use crate::aggregator::Aggregator;
use crate::sampler::DEFAULT_TICK_INTERVAL;
use crate::source::ReplaySource;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParseOptions {
    /// Frames between snapshots until the tick rate of the replay is known.
    pub tick_interval: u32,
    /// Report a round that is still in progress at the end of the stream
    /// instead of dropping it.
    pub flush_incomplete_round: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            flush_incomplete_round: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Header(String),
    Stream(String),
    Serialize(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Header(msg) => write!(f, "parsing header: {}", msg),
            Self::Stream(msg) => write!(f, "parsing demo: {}", msg),
            Self::Serialize(msg) => write!(f, "serializing result: {}", msg),
        }
    }
}

impl std::error::Error for ParseError {}

/// Runs a whole replay through the aggregation.
#[tracing::instrument(name = "Parse", skip(source, options))]
pub fn parse<S>(mut source: S, options: &ParseOptions) -> Result<common::ParseResult, ParseError>
where
    S: ReplaySource,
{
    let header = source.parse_header().map_err(|e| {
        tracing::error!("Parsing header: {}", e);
        ParseError::Header(e.to_string())
    })?;

    let mut aggregator = Aggregator::new(&header, options);

    source.parse_to_end(&mut aggregator).map_err(|e| {
        tracing::error!("Parsing to end: {}", e);
        ParseError::Stream(e.to_string())
    })?;

    Ok(aggregator.finish(source.game_state()))
}

/// Parses and serializes in one go, as delivered through [`parse_demo`].
pub fn parse_to_json<S>(source: S, options: &ParseOptions) -> Result<String, ParseError>
where
    S: ReplaySource,
{
    let result = parse(source, options)?;
    serde_json::to_string(&result).map_err(|e| ParseError::Serialize(e.to_string()))
}

/// Parses the replay and hands exactly one payload to `on_complete`: the
/// serialized result, or `{"error": ...}` if anything failed. No partial
/// result is ever delivered.
pub fn parse_demo<S, F>(source: S, options: &ParseOptions, on_complete: F)
where
    S: ReplaySource,
    F: FnOnce(String),
{
    let payload = match parse_to_json(source, options) {
        Ok(payload) => payload,
        Err(e) => error_payload(&e.to_string()),
    };

    on_complete(payload);
}

pub fn error_payload(message: &str) -> String {
    let payload = common::ErrorPayload {
        error: message.to_owned(),
    };

    serde_json::to_string(&payload).unwrap_or_else(|_| String::from(r#"{"error":"unknown error"}"#))
}
