//! Search session orchestration.
//!
//! This module provides:
//! - The stateful [`SearchSession`] with pagination
//! - One-call helpers that open and close a session around a single search

mod client;
mod oneshot;
#[cfg(test)]
mod session_tests;

pub use client::SearchSession;
#[cfg(feature = "backends")]
pub use oneshot::{search, search_news, search_videos};
pub use oneshot::{search_news_with, search_videos_with, search_with};
