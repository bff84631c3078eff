use std::path::PathBuf;

use clap::ColorChoice;
use clap::Parser;
use clap::ValueEnum;
use ferricon_core::OutputFormat;

/// A trait for types which are delegates for CLI parsing of internal types.
pub trait OptionDelegate: Sized {
    /// The type this is an option for.
    type Native;

    /// Convert this into its native type.
    fn into_native(self) -> Self::Native;
}

/// The output container format.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatOption {
    /// Lossless raster output with transparency
    Png,

    /// Lossy raster output on a white background
    Jpeg,

    /// A 48x48 favicon container
    Ico,
}

impl OptionDelegate for FormatOption {
    type Native = OutputFormat;

    fn into_native(self) -> Self::Native {
        match self {
            Self::Png => OutputFormat::Png,
            Self::Jpeg => OutputFormat::Jpeg,
            Self::Ico => OutputFormat::Ico,
        }
    }
}

/// Convert an SVG image into PNG, JPEG, or ICO output.
#[derive(Parser, Debug, Clone)]
#[command(name = "ferricon", version)]
pub struct CliArguments {
    /// The SVG file to convert.
    pub input: PathBuf,

    /// The output width in pixels.
    #[arg(short = 'W', long)]
    pub width: Option<u32>,

    /// The output height in pixels.
    #[arg(short = 'H', long)]
    pub height: Option<u32>,

    /// The output format.
    #[arg(short, long, value_enum)]
    pub format: Option<FormatOption>,

    /// The directory to write the output file into.
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Optimize PNG output for minimal size.
    #[arg(long)]
    pub optimize: bool,

    /// Overwrite an existing output file without asking.
    #[arg(long)]
    pub force: bool,

    /// Use the given config file instead of the user config.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// When to use colorful output.
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,

    /// Produce more logging output, may be repeated.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_arguments() {
        CliArguments::command().debug_assert();
    }
}
