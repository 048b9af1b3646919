//! Subcommand modules for the `scafalign` binary.

pub mod resolve;
pub mod run;
pub mod split;

use tracing_subscriber::EnvFilter;

pub fn make_verbose_arg() -> clap::Arg {
    clap::Arg::new("verbose")
        .long("verbose")
        .short('v')
        .action(clap::ArgAction::SetTrue)
        .help("Log progress to stderr")
}

/// Logs go to stderr; `RUST_LOG` takes precedence over `--verbose`.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("scafalign=debug,info")
        } else {
            EnvFilter::new("scafalign=warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
