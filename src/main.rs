use clap::Parser;
use feedtree::cli::args::Cli;
use feedtree::cli::commands::execute_command;
use feedtree::cli::output;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::{self, format::FmtSpan};
use tracing_subscriber::prelude::*;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let code = match execute_command(&cli) {
        Ok(code) => code,
        Err(e) => {
            output::error(&e);
            e.exit_code()
        }
    };
    std::process::exit(code);
}

/// `-d` count to log level; anything past three is capped.
fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn init_logging(verbosity: u8) {
    let level = level_for(verbosity);

    // stdout carries data, so logs go to stderr
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(level);
    tracing_subscriber::registry().with(layer).init();

    if verbosity > 3 {
        tracing::warn!("-d given {} times, trace is the maximum", verbosity);
    }
    tracing::info!(%level, "logging initialised");
}
