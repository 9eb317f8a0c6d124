//! JSON rendering for stdout.
//!
//! The CLI prints nothing but JSON on stdout so it can be wired straight
//! into an embedding host; logs and diagnostics go to stderr.

use std::io::{self, Write};

use crate::cli::OutputFormat;

/// Render a serializable value in the chosen format.
pub fn render<T: serde::Serialize + ?Sized>(format: &OutputFormat, data: &T) -> String {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(data).expect("serialization should not fail")
        }
        OutputFormat::JsonCompact => {
            serde_json::to_string(data).expect("serialization should not fail")
        }
    }
}

/// Print rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}
