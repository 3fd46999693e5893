use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use eatery_core::{Eatery, EateryFilter};
use tracing_subscriber::EnvFilter;

use eatery_cli::commands::list::ListOptions;
use eatery_cli::commands::{hours, list, status, transactions, util, wait};
use eatery_cli::{Cli, Commands, Config};

/// Load config and the eatery list it points at.
fn load(config_path: Option<&Path>) -> Result<(Vec<Eatery>, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let eateries = util::load_eateries(&config.eateries_path)?;
    Ok((eateries, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // try_init so tests that already installed a subscriber don't panic
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let mut stdout = io::stdout().lock();

    match &cli.command {
        Some(Commands::Status { at }) => {
            let (eateries, _config) = load(cli.config.as_deref())?;
            let now = util::parse_instant(at.as_deref())?;
            status::run(&mut stdout, &eateries, now)?;
        }
        Some(Commands::Hours { id, from }) => {
            let (eateries, _config) = load(cli.config.as_deref())?;
            let from = util::parse_day(from.as_deref())?;
            hours::run(&mut stdout, util::find_eatery(&eateries, id)?, from)?;
        }
        Some(Commands::Wait {
            id,
            day,
            bucket_minutes,
        }) => {
            let (eateries, _config) = load(cli.config.as_deref())?;
            let day = util::parse_day(day.as_deref())?;
            wait::run(
                &mut stdout,
                util::find_eatery(&eateries, id)?,
                day,
                *bucket_minutes,
            )?;
        }
        Some(Commands::List {
            under_10,
            payment,
            favorites,
            north,
            west,
            central,
            at,
            json,
        }) => {
            let (eateries, config) = load(cli.config.as_deref())?;
            let metadata = util::favorites_metadata(&config.favorites)?;
            let options = ListOptions {
                filter: EateryFilter {
                    under_10_minutes: *under_10,
                    payment_methods: payment.iter().copied().collect(),
                    favorites_only: *favorites,
                    north: *north,
                    west: *west,
                    central: *central,
                },
                user_location: config.location,
                now: util::parse_instant(at.as_deref())?,
                json: *json,
            };
            list::run(&mut stdout, &eateries, &metadata, &options)?;
        }
        Some(Commands::Transactions { days }) => {
            let config = Config::load_from(cli.config.as_deref())
                .context("failed to load configuration")?;
            transactions::run(&mut stdout, &config.account, *days)?;
        }
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
