use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::series::{Sample, Series};

/// Append-only destination for raw samples.
///
/// The acquisition loop calls [`append`](SampleSink::append) once per sample;
/// an error is counted and logged but never stops acquisition.
pub trait SampleSink: Send {
    fn append(&mut self, sample: &Sample) -> io::Result<()>;
}

/// Writes samples as `seconds,value` records, flushing after every record
pub struct CsvSampleLog<W: Write + Send> {
    writer: csv::Writer<W>,
}

impl<W: Write + Send> CsvSampleLog<W> {
    pub fn new(writer: W) -> Self {
        let writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
        Self { writer }
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> io::Result<W> {
        self.writer.into_inner().map_err(|e| e.into_error())
    }
}

impl CsvSampleLog<File> {
    /// Creates (or truncates) a log file at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(File::create(path)?))
    }
}

impl<W: Write + Send> SampleSink for CsvSampleLog<W> {
    fn append(&mut self, sample: &Sample) -> io::Result<()> {
        let t = format!("{:.3}", sample.t);
        let v = format!("{:.4}", sample.v);
        self.writer.write_record([t.as_str(), v.as_str()]).map_err(io::Error::from)?;
        self.writer.flush()
    }
}

/// Parses a log written by [`CsvSampleLog`] back into a series.
///
/// Blank lines and lines starting with `#` are skipped. A malformed record is
/// reported with its 1-based line number.
pub fn read_sample_log<R: Read>(reader: R) -> Result<Series> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(reader);

    reader
        .deserialize::<Sample>()
        .map(|record| record.map_err(sample_log_error))
        .collect()
}

fn sample_log_error(e: csv::Error) -> Error {
    match e.position() {
        Some(pos) if !e.is_io_error() => Error::invalid_data(format!("line {}: {e}", pos.line())),
        _ => Error::from(e),
    }
}
