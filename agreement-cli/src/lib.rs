//! Agreement CLI library
//!
//! This library provides the command-line interface for the article
//! agreement analysis pipeline.

pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod progress;

pub use error::CliError;
