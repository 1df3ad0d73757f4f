//! Output formatting module

pub mod table;

use anyhow::Result;
use owo_colors::{AnsiColors, OwoColorize};
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard};

use crate::config::OutputFormat;
use table::TableSpec;

/// Presentation options taken from the global flags
#[derive(Debug, Clone, Default)]
pub struct PrintOptions {
    pub format: OutputFormat,
    pub cols: Vec<String>,
    pub no_headers: bool,
    pub quiet: bool,
}

type Sink = Mutex<Box<dyn Write + Send>>;

/// Writes command results to stdout and status lines to stderr
pub struct Printer {
    pub options: PrintOptions,
    out: Sink,
    err: Sink,
}

/// Colored status glyph, plain when stderr is not a color terminal
fn mark(symbol: &str, color: AnsiColors) -> String {
    if console::colors_enabled_stderr() {
        symbol.color(color).bold().to_string()
    } else {
        symbol.to_string()
    }
}

fn lock(sink: &Sink) -> MutexGuard<'_, Box<dyn Write + Send>> {
    sink.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Printer {
    /// Printer bound to the process stdout/stderr
    pub fn stdio(options: PrintOptions) -> Self {
        Self::with_writers(options, Box::new(io::stdout()), Box::new(io::stderr()))
    }

    pub fn with_writers(
        options: PrintOptions,
        out: Box<dyn Write + Send>,
        err: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            options,
            out: Mutex::new(out),
            err: Mutex::new(err),
        }
    }

    /// Print an API response as a table or as JSON
    pub fn print(&self, value: &Value, spec: &TableSpec) -> Result<()> {
        match self.options.format {
            OutputFormat::Json => self.print_json(value),
            OutputFormat::Text => {
                let text =
                    table::to_table(value, spec, &self.options.cols, !self.options.no_headers)?;
                self.write_raw(&text)
            }
        }
    }

    /// Print as pretty JSON
    pub fn print_json<T: Serialize>(&self, data: &T) -> Result<()> {
        let text = serde_json::to_string_pretty(data)?;
        writeln!(lock(&self.out), "{}", text)?;
        Ok(())
    }

    /// Write text to stdout as-is
    pub fn write_raw(&self, text: &str) -> Result<()> {
        let mut out = lock(&self.out);
        out.write_all(text.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    /// Stderr handle for interactive prompts
    pub fn err_writer(&self) -> MutexGuard<'_, Box<dyn Write + Send>> {
        lock(&self.err)
    }

    fn status(&self, line: String) {
        // write errors on stderr are ignored
        let _ = writeln!(lock(&self.err), "{}", line);
    }

    /// Print success message
    pub fn success(&self, msg: &str) {
        if self.options.quiet {
            return;
        }
        self.status(format!("{} {}", mark("✓", AnsiColors::Green), msg));
    }

    /// Print info message
    pub fn info(&self, msg: &str) {
        if self.options.quiet {
            return;
        }
        self.status(format!("{} {}", mark("ℹ", AnsiColors::Blue), msg));
    }

    /// Print warning message
    pub fn warning(&self, msg: &str) {
        self.status(format!("{} {}", mark("⚠", AnsiColors::Yellow), msg));
    }
}

/// Print error message
pub fn error(msg: &str) {
    eprintln!("{} {}", mark("✗", AnsiColors::Red), msg);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use table::col;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Buffer {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    const SPEC: TableSpec = TableSpec {
        root: "",
        columns: &[col("Id", "id")],
        defaults: &["Id"],
    };

    fn printer(options: PrintOptions) -> (Printer, Buffer, Buffer) {
        let out = Buffer::default();
        let err = Buffer::default();
        let p = Printer::with_writers(options, Box::new(out.clone()), Box::new(err.clone()));
        (p, out, err)
    }

    #[test]
    fn test_text_output_is_a_table() {
        let (p, out, _) = printer(PrintOptions::default());
        p.print(&json!({"id": "abc"}), &SPEC).unwrap();
        assert_eq!(out.text(), "Id\nabc\n");
    }

    #[test]
    fn test_json_output_is_the_raw_response() {
        let (p, out, _) = printer(PrintOptions {
            format: OutputFormat::Json,
            ..Default::default()
        });
        p.print(&json!({"id": "abc", "extra": 1}), &SPEC).unwrap();
        let parsed: Value = serde_json::from_str(&out.text()).unwrap();
        assert_eq!(parsed["extra"], 1);
    }

    #[test]
    fn test_quiet_suppresses_status_but_not_warnings() {
        let (p, _, err) = printer(PrintOptions {
            quiet: true,
            ..Default::default()
        });
        p.success("done");
        p.info("fyi");
        p.warning("careful");
        let text = err.text();
        assert!(!text.contains("done"));
        assert!(!text.contains("fyi"));
        assert!(text.contains("careful"));
    }
}
