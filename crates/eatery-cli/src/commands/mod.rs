//! CLI subcommand implementations.

pub mod hours;
pub mod list;
pub mod status;
pub mod transactions;
pub mod util;
pub mod wait;

#[cfg(test)]
mod fixtures;
