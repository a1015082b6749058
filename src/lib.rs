//! CV matcher library

pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod matching;
pub mod models;

pub use config::MatchConfig;
pub use error::{MatcherError, Result};
pub use matching::MatchEngine;
