//! Diagnostics go to stderr through `env_logger` so that report and JSON
//! output on stdout stay clean. `RUST_LOG` takes precedence over flags.

use env_logger::{Builder, Target};
use log::LevelFilter;

pub fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub fn init(verbose: u8, quiet: bool) {
    let mut builder = Builder::new();
    builder
        .filter_level(level_for(verbose, quiet))
        .format_timestamp(None)
        .format_target(false)
        .target(Target::Stderr)
        .parse_default_env();

    // A logger may already be installed when embedded in tests.
    let _ = builder.try_init();
}
