//! Terminal output helpers.

use std::fmt::Display;
use std::io;
use std::io::BufRead;
use std::io::IsTerminal;
use std::io::Stdin;
use std::io::Write;

use color_eyre::eyre;
use termcolor::Color;
use termcolor::ColorChoice;
use termcolor::ColorSpec;
use termcolor::StandardStream;
use termcolor::StandardStreamLock;
use termcolor::WriteColor;

/// A terminal ui wrapper for output messaging and confirmation prompts.
#[derive(Debug)]
pub struct Ui {
    /// The unlocked stdin stream.
    stdin: Stdin,

    /// The unlocked stdout stream.
    stdout: StandardStream,

    /// The unlocked stderr stream.
    stderr: StandardStream,
}

/// Returns whether or not a given output stream is connected to a terminal.
fn check_terminal<T: IsTerminal>(t: T, choice: ColorChoice) -> ColorChoice {
    match choice {
        // When we use auto and the stream is not a terminal, we disable it
        // since termcolor does not check for this, in any other case we let
        // termcolor figure out what to do.
        ColorChoice::Auto if !t.is_terminal() => ColorChoice::Never,
        other => other,
    }
}

impl Ui {
    /// Creates a new [`Ui`] with the given color choice.
    pub fn new(choice: ColorChoice) -> Self {
        Self {
            stdin: io::stdin(),
            stdout: StandardStream::stdout(check_terminal(io::stdout(), choice)),
            stderr: StandardStream::stderr(check_terminal(io::stderr(), choice)),
        }
    }

    /// Returns an exclusive lock to stdout.
    pub fn stdout(&self) -> StandardStreamLock<'_> {
        self.stdout.lock()
    }

    /// Returns an exclusive lock to stderr.
    pub fn stderr(&self) -> StandardStreamLock<'_> {
        self.stderr.lock()
    }

    /// Returns a writer for emitting a user-facing error.
    pub fn error(&self) -> io::Result<StandardStreamLock<'_>> {
        annotated(self.stderr(), "error:", Color::Red)
    }

    /// Returns a writer for emitting a user-facing warning.
    pub fn warn(&self) -> io::Result<StandardStreamLock<'_>> {
        annotated(self.stderr(), "warning:", Color::Yellow)
    }

    /// Returns a writer for emitting a user-facing hint.
    pub fn hint(&self) -> io::Result<StandardStreamLock<'_>> {
        annotated(self.stderr(), "hint:", Color::Cyan)
    }

    /// Whether a prompt can be displayed and confirmed by the user.
    pub fn can_prompt(&self) -> bool {
        io::stdin().is_terminal() && io::stderr().is_terminal()
    }

    /// Prompts the user for a yes or no answer on stderr.
    pub fn prompt_yes_no(&self, prompt: impl Display, default: bool) -> eyre::Result<bool> {
        if !self.can_prompt() {
            eyre::bail!("cannot prompt for input since the output is not connected to a terminal");
        }

        let mut stderr = self.stderr();
        let mut stdin = self.stdin.lock();

        write!(stderr, "{prompt} [{}]: ", if default { "Y/n" } else { "y/N" })?;
        stderr.flush()?;

        let mut buffer = String::new();
        stdin.read_line(&mut buffer)?;

        Ok(match buffer.trim() {
            "" => default,
            "y" | "Y" => true,
            "n" | "N" => false,
            other if other.eq_ignore_ascii_case("yes") => true,
            other if other.eq_ignore_ascii_case("no") => false,
            other => eyre::bail!("expected [y]es or [n]o, got: {other:?}"),
        })
    }

    /// Flushes and resets both output streams.
    pub fn flush(&self) -> io::Result<()> {
        let mut out = self.stdout();
        out.reset()?;
        out.flush()?;

        let mut err = self.stderr();
        err.reset()?;
        err.flush()?;

        Ok(())
    }
}

/// Writes a bold colored header and returns the stream for the message.
fn annotated<'a>(
    mut w: StandardStreamLock<'a>,
    header: &str,
    color: Color,
) -> io::Result<StandardStreamLock<'a>> {
    w.set_color(ColorSpec::new().set_bold(true).set_fg(Some(color)))?;
    write!(w, "{header} ")?;
    w.reset()?;

    Ok(w)
}
