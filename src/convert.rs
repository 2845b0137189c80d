use std::io::{BufRead, Write};
use tracing::{debug, info};

use crate::error::Result;
use crate::lease::LeaseRecord;
use crate::parser::LeaseParser;
use crate::render::Renderer;

/// Counts for one conversion run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub lines: usize,
    pub leases: usize,
    pub hosts: usize,
    pub warnings: usize,
}

/// Streams a leases file into a hosts file and an HTML report in one pass.
pub struct Converter<H: Write, R: Write> {
    renderer: Renderer,
    parser: LeaseParser,
    hosts: H,
    report: R,
    summary: Summary,
}

impl<H: Write, R: Write> Converter<H, R> {
    pub fn new(renderer: Renderer, hosts: H, report: R) -> Self {
        Self {
            renderer,
            parser: LeaseParser::new(),
            hosts,
            report,
            summary: Summary::default(),
        }
    }

    pub fn run<B: BufRead>(mut self, mut reader: B) -> Result<Summary> {
        self.report
            .write_all(self.renderer.report_header()?.as_bytes())?;

        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(strip_terminator(&buf));
            if let Some(lease) = self.parser.feed(&line) {
                self.emit(&lease)?;
            }
        }
        self.parser.finish();

        self.report
            .write_all(self.renderer.report_footer().as_bytes())?;
        self.hosts.flush()?;
        self.report.flush()?;

        self.summary.lines = self.parser.line_number();
        self.summary.warnings = self.parser.warning_count();
        if let Some(warning) = self.parser.last_warning() {
            debug!(line = warning.line, "last warning: {}", warning.kind);
        }
        info!(
            lines = self.summary.lines,
            leases = self.summary.leases,
            hosts = self.summary.hosts,
            warnings = self.summary.warnings,
            "conversion finished"
        );
        Ok(self.summary)
    }

    fn emit(&mut self, lease: &LeaseRecord) -> Result<()> {
        if lease.is_empty() {
            debug!(line = self.parser.line_number(), "empty lease block");
        }

        match self.renderer.host_entry(lease)? {
            Some(entry) => {
                self.hosts.write_all(entry.as_bytes())?;
                self.summary.hosts += 1;
            }
            None => debug!(
                address = %lease.address,
                "no hosts entry for hostname {:?}",
                lease.hostname
            ),
        }

        self.report
            .write_all(self.renderer.report_row(lease)?.as_bytes())?;
        self.summary.leases += 1;
        Ok(())
    }
}

fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
