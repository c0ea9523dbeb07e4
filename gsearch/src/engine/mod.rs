//! Fetch engine protocols and connection management.
//!
//! This module provides:
//! - Traits for pluggable fetch engines and result parsers
//! - The connection manager that keeps one connection per session

mod connection;
mod protocols;

pub use connection::{ConnectionManager, FetchError};
#[cfg(test)]
pub use protocols::MockResultParser;
pub use protocols::{
    ConnectOptions, EngineConnection, EngineError, FetchEngine, ParsedEntry, ParsedPage,
    ParsedSitelink, ResultParser,
};
