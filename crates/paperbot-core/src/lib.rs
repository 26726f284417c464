//! Core domain + application logic for paperbot.
//!
//! This crate is framework-agnostic. arXiv / OpenAI / Discord / Slack live
//! behind ports (traits) implemented in adapter crates.

pub mod config;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod logging;
pub mod messaging;
pub mod model;
pub mod pipeline;
pub mod ports;
pub mod query;
pub mod summarize;
pub mod window;

pub use errors::{Error, Result};
