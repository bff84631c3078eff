//! An SVG to PNG, JPEG, and ICO (favicon) converter.

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use color_eyre::eyre;
use once_cell::sync::Lazy;
use termcolor::StandardStream;
use termcolor::WriteColor;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_tree::HierarchicalLayer;

use crate::args::CliArguments;
use crate::ui::Ui;

mod args;
mod convert;
mod ui;

/// The default optimization options to use for PNG output.
pub static DEFAULT_OPTIMIZE_OPTIONS: Lazy<oxipng::Options> =
    Lazy::new(oxipng::Options::max_compression);

/// The conversion succeeded.
pub const EXIT_OK: u8 = 0;

/// The requested operation failed gracefully.
pub const EXIT_OPERATION_FAILURE: u8 = 1;

/// An unexpected error occurred.
pub const EXIT_ERROR: u8 = 2;

/// A graceful error.
#[derive(Debug, thiserror::Error)]
#[error("an operation failed")]
pub struct OperationFailure;

fn main() -> ExitCode {
    match main_impl() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:?}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn main_impl() -> eyre::Result<ExitCode> {
    let args = CliArguments::parse();

    color_eyre::install()?;

    let cc = match args.color {
        clap::ColorChoice::Auto => termcolor::ColorChoice::Auto,
        clap::ColorChoice::Always => termcolor::ColorChoice::Always,
        clap::ColorChoice::Never => termcolor::ColorChoice::Never,
    };

    let ui = Ui::new(cc);

    // termcolor does not expose its detection mechanism, probe a throwaway
    // stream for color support instead.
    let tracing_ansi = StandardStream::stderr(cc).supports_color();

    tracing_subscriber::registry()
        .with(
            HierarchicalLayer::new(4)
                .with_targets(true)
                .with_ansi(tracing_ansi),
        )
        .with(
            Targets::new()
                .with_target(ferricon_core::TOOL_NAME, verbosity(args.verbose))
                .with_target("ferricon_core", verbosity(args.verbose)),
        )
        .init();

    let exit_code = match convert::run(&args, &ui) {
        Ok(()) => EXIT_OK,
        Err(err) => 'err: {
            for cause in err.chain() {
                if cause.downcast_ref::<OperationFailure>().is_some() {
                    break 'err EXIT_OPERATION_FAILURE;
                }
            }

            writeln!(
                ui.error()?,
                "ferricon ran into an unexpected error, this is most likely a bug"
            )?;
            writeln!(ui.error()?, "{err:?}")?;

            EXIT_OPERATION_FAILURE
        }
    };

    ui.flush()?;

    Ok(ExitCode::from(exit_code))
}

/// Maps the `-v` repetition count onto a level filter.
fn verbosity(count: u8) -> LevelFilter {
    match count {
        0 => LevelFilter::OFF,
        1 => LevelFilter::ERROR,
        2 => LevelFilter::WARN,
        3 => LevelFilter::INFO,
        4 => LevelFilter::DEBUG,
        5.. => LevelFilter::TRACE,
    }
}
