//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eatery_core::PaymentMethod;

/// Campus dining status.
///
/// Reports which eateries are open, their weekly hours and expected waits,
/// and filters them by payment method, campus area and travel time.
#[derive(Debug, Parser)]
#[command(name = "eatery", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show open/closed status for every eatery.
    Status {
        /// Evaluate at this time instead of now (RFC 3339 or e.g. "in 2 hours").
        #[arg(long)]
        at: Option<String>,
    },

    /// Show an eatery's hours for the coming week.
    Hours {
        /// Eatery ID.
        id: String,

        /// First day of the week to show (YYYY-MM-DD, defaults to today).
        #[arg(long)]
        from: Option<String>,
    },

    /// Show expected wait times across a day.
    Wait {
        /// Eatery ID.
        id: String,

        /// Day to show (YYYY-MM-DD, defaults to today).
        #[arg(long)]
        day: Option<String>,

        /// Width of each time slot in minutes.
        #[arg(long, default_value_t = 15)]
        bucket_minutes: i64,
    },

    /// List eateries matching the given filters.
    List {
        /// Only eateries reachable, including the wait, in under 10 minutes.
        #[arg(long = "under-10")]
        under_10: bool,

        /// Only eateries accepting one of these payment methods.
        #[arg(long = "payment", value_name = "METHOD")]
        payment: Vec<PaymentMethod>,

        /// Only favorite eateries.
        #[arg(long)]
        favorites: bool,

        /// Include North campus.
        #[arg(long)]
        north: bool,

        /// Include West campus.
        #[arg(long)]
        west: bool,

        /// Include Central campus.
        #[arg(long)]
        central: bool,

        /// Evaluate at this time instead of now.
        #[arg(long)]
        at: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show recent account transactions.
    Transactions {
        /// Number of days of history.
        #[arg(long, default_value_t = 7)]
        days: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_accepts_repeated_payment_flags() {
        let cli = Cli::parse_from([
            "eatery", "list", "--payment", "brbs", "--payment", "swipes", "--north", "--under-10",
        ]);
        let Some(Commands::List {
            payment,
            north,
            under_10,
            west,
            ..
        }) = cli.command
        else {
            panic!("expected list command");
        };
        assert_eq!(payment, vec![PaymentMethod::Brbs, PaymentMethod::MealSwipes]);
        assert!(north);
        assert!(under_10);
        assert!(!west);
    }

    #[test]
    fn list_rejects_unknown_payment_method() {
        assert!(Cli::try_parse_from(["eatery", "list", "--payment", "bitcoin"]).is_err());
    }

    #[test]
    fn wait_defaults_to_quarter_hours() {
        let cli = Cli::parse_from(["eatery", "wait", "okenshields"]);
        let Some(Commands::Wait { bucket_minutes, .. }) = cli.command else {
            panic!("expected wait command");
        };
        assert_eq!(bucket_minutes, 15);
    }
}
