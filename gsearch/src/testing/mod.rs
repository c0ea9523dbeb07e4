//! Testing utilities for code built on gsearch.
//!
//! This module provides:
//! - A scriptable fetch engine that records connects, reconnects and fetches
//! - A parser that returns canned pages

mod mocks;

pub use mocks::{MockFetchEngine, StaticParser};
