//! Console progress output.

use std::io::{self, Stdout, Write};

use vizaudit::{ProjectReport, ScanObserver, percent_done};

/// Prints human-readable progress lines as the audit advances.
///
/// Write failures are ignored; progress output never aborts an audit.
#[derive(Debug)]
pub struct ConsoleProgress<W: Write = Stdout> {
    out: W,
}

impl ConsoleProgress<Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for ConsoleProgress<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> ConsoleProgress<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ScanObserver for ConsoleProgress<W> {
    fn project_started(&mut self, index: usize, total: usize, project_id: &str) {
        let _ = writeln!(self.out, "{index}/{total} Processing project: {project_id}");
    }

    fn object_started(&mut self, index: usize, total: usize, uri: &str) {
        let _ = writeln!(
            self.out,
            "  ({index}/{total}) Processing visualization object: {uri}"
        );
    }

    fn object_matched(&mut self, _uri: &str) {
        let _ = writeln!(self.out, "    >>> matches search criteria");
    }

    fn project_finished(&mut self, index: usize, total: usize, _report: &ProjectReport) {
        let _ = writeln!(self.out, "{}% Done", percent_done(index, total));
        let _ = writeln!(self.out);
    }
}
