use crate::error::Error;
use std::io::{Stderr, Stdout, Write};
use std::path::PathBuf;

/// Write all outputs of the app
///
/// The generated template goes to stdout, or to a file when one is given.
/// Human-friendly messages always go to stderr so stdout can be piped.
pub(crate) struct Writer {
    output: Option<PathBuf>,
}

impl Writer {
    pub(crate) fn new(output: Option<PathBuf>) -> Self {
        Writer { output }
    }

    /// Output a human-friendly message
    pub(crate) fn text(&self, output: &str) -> Result<(), Error> {
        self.write(output, true)
    }

    /// Output pretty-printed JSON, indented with two spaces
    pub(crate) fn json(&self, output: &serde_json::Value) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(output).map_err(|e| {
            log::error!("Failed to serialize the template: {e:?}");
            Error::new("Failed to serialize the template", None)
        })?;

        let Some(path) = &self.output else {
            return self.write(&format!("{json}\n"), false);
        };

        std::fs::write(path, format!("{json}\n")).map_err(|e| {
            log::error!("Error while writing to {path:?}: {e:?}");
            Error::new(
                &format!("Failed to write {}", path.display()),
                Some("Check that the directory exists and is writable."),
            )
        })
    }

    /// General method for writing to stdout/stderr
    fn write(&self, output: &str, is_error: bool) -> Result<(), Error> {
        let mut stderr: Stderr = std::io::stderr();
        let mut stdout: Stdout = std::io::stdout();
        let stream: &mut dyn Write = if is_error { &mut stderr } else { &mut stdout };

        stream.write_all(output.as_bytes()).map_err(|e| {
            log::error!("Error while writing to std*: {e:?}");
            Error::new("Output error", None)
        })?;

        Ok(())
    }
}
