use std::io::Write;

/// Line-oriented status output.
pub trait StatusSink {
    /// Informational line (stdout).
    fn info(&mut self, line: &str);

    /// Error line (stderr).
    fn error(&mut self, line: &str);
}

/// Writes to the process stdout/stderr, one flushed line per call.
#[derive(Debug, Default)]
pub struct StdioSink;

impl StatusSink for StdioSink {
    fn info(&mut self, line: &str) {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{line}").ok();
        out.flush().ok();
    }

    fn error(&mut self, line: &str) {
        writeln!(std::io::stderr().lock(), "{line}").ok();
    }
}

impl<S: StatusSink + ?Sized> StatusSink for &mut S {
    fn info(&mut self, line: &str) {
        (**self).info(line)
    }

    fn error(&mut self, line: &str) {
        (**self).error(line)
    }
}
