use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::breakpoints::{locations, BreakpointRecord};
use crate::error::Error;
use crate::simulate::SimulatedLine;

pub const HEADER: &str = "sample\tchr\tstart\tend\tdonor1\tdonor2";

/// Tab-delimited breakpoint table, one row per sample and donor run.
///
/// Lines are homozygous, so both donor columns carry the same label.
pub struct BreakpointWriter<W: Write> {
    inner: W,
    rows: usize,
}

impl<W: Write> BreakpointWriter<W> {
    pub fn new(mut inner: W) -> io::Result<Self> {
        writeln!(inner, "{HEADER}")?;
        Ok(Self { inner, rows: 0 })
    }

    pub fn write_records(&mut self, sample: &str, records: &[BreakpointRecord]) -> io::Result<()> {
        for r in records {
            writeln!(
                self.inner,
                "{}\t{}\t{}\t{}\t{}\t{}",
                sample, r.chrom, r.start, r.end, r.donor, r.donor
            )?;
        }
        self.rows += records.len();
        Ok(())
    }

    pub fn write_line(&mut self, line: &SimulatedLine) -> io::Result<()> {
        for (chrom, chromosome) in &line.chromosomes {
            self.write_records(&line.sample, &locations(chromosome, *chrom))?;
        }
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn finish(mut self) -> io::Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

pub fn write_lines(path: impl AsRef<Path>, lines: &[SimulatedLine]) -> Result<usize, Error> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| Error::io(e, path))?;
    let mut writer = BreakpointWriter::new(BufWriter::new(file)).map_err(|e| Error::io(e, path))?;
    for line in lines {
        writer.write_line(line).map_err(|e| Error::io(e, path))?;
    }
    let rows = writer.rows();
    writer.finish().map_err(|e| Error::io(e, path))?;
    log::info!("Wrote {rows} breakpoint rows to {}", path.display());
    Ok(rows)
}
