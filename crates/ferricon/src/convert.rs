//! The conversion driver.

use std::fs;
use std::io::Write;
use std::path::Path;

use color_eyre::eyre;
use color_eyre::eyre::WrapErr;
use ferricon_core::Canvas;
use ferricon_core::OutputFormat;
use ferricon_core::SvgRasterizer;
use ferricon_core::config::Config;
use ferricon_core::encode::Download;

use crate::DEFAULT_OPTIMIZE_OPTIONS;
use crate::OperationFailure;
use crate::args::CliArguments;
use crate::args::OptionDelegate;
use crate::ui::Ui;

/// Runs a single conversion according to the given arguments.
pub fn run(args: &CliArguments, ui: &Ui) -> eyre::Result<()> {
    let config = match &args.config {
        Some(path) => Config::load(path),
        None => Config::load_user(),
    }
    .wrap_err("loading configuration")?;

    let width = args.width.unwrap_or(config.width);
    let height = args.height.unwrap_or(config.height);
    let format = args
        .format
        .map(OptionDelegate::into_native)
        .unwrap_or(config.format);
    let optimize = args.optimize || config.optimize;

    let bytes = match fs::read(&args.input) {
        Ok(bytes) => bytes,
        Err(err) => {
            writeln!(
                ui.error()?,
                "Couldn't read '{}': {err}",
                args.input.display()
            )?;
            eyre::bail!(OperationFailure);
        }
    };

    let file_name = args
        .input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    tracing::debug!(input = %args.input.display(), width, height, %format, "converting");

    let mut canvas = Canvas::new();
    if let Err(err) = canvas.set_dimensions(width, height) {
        writeln!(ui.error()?, "{err}")?;
        eyre::bail!(OperationFailure);
    }
    canvas.set_format(format);

    let request = match canvas.set_resource(&bytes, &file_name) {
        Ok(request) => request,
        Err(err) => {
            writeln!(
                ui.error()?,
                "'{}' is not a valid SVG image: {err}",
                args.input.display()
            )?;
            eyre::bail!(OperationFailure);
        }
    };

    canvas
        .fulfill(&SvgRasterizer, request)
        .wrap_err("rasterizing input")?;

    let Download { bytes, file_name } = canvas.request_download().wrap_err("encoding output")?;

    let bytes = if optimize && format == OutputFormat::Png {
        tracing::debug!("optimizing png output");
        oxipng::optimize_from_memory(&bytes, &DEFAULT_OPTIMIZE_OPTIONS)
            .wrap_err("optimizing output")?
    } else {
        if optimize {
            writeln!(ui.warn()?, "--optimize only applies to png output")?;
        }
        bytes
    };

    fs::create_dir_all(&args.output)
        .wrap_err_with(|| format!("creating {}", args.output.display()))?;

    let path = args.output.join(file_name.as_str());
    if path.exists() && !args.force && !confirm_overwrite(ui, &path)? {
        writeln!(ui.error()?, "Operation aborted")?;
        eyre::bail!(OperationFailure);
    }

    fs::write(&path, &bytes).wrap_err_with(|| format!("writing {}", path.display()))?;

    writeln!(ui.stdout(), "Wrote {}", path.display())?;

    Ok(())
}

/// Asks the user whether an existing output file may be replaced.
fn confirm_overwrite(ui: &Ui, path: &Path) -> eyre::Result<bool> {
    if !ui.can_prompt() {
        writeln!(ui.error()?, "'{}' already exists", path.display())?;
        writeln!(ui.hint()?, "Pass --force to overwrite it")?;
        return Ok(false);
    }

    ui.prompt_yes_no(format!("Overwrite '{}'?", path.display()), false)
}
