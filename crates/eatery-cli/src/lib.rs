//! Campus dining CLI library.
//!
//! This crate provides the CLI interface over the dining engine.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::{AccountConfig, Config};
