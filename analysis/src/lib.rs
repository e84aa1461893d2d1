//! Reduces the event stream of a match replay into per tick player snapshots,
//! event logs, rounds and end of match player statistics.

pub mod aggregator;
pub mod mapping;
pub mod projectors;
pub mod rounds;
pub mod sampler;
pub mod scripted;
pub mod source;
pub mod trace;

#[cfg(feature = "csdemo")]
pub mod csdemo_source;

mod parse;
pub use parse::{error_payload, parse, parse_demo, parse_to_json, ParseError, ParseOptions};
