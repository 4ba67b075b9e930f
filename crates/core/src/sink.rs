//! In-memory accumulation of book records and delimited table output.
//!
//! Nothing is written until the run is over: [`RecordSink::write_outputs`]
//! dumps the whole table once as TSV and once as CSV.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::Result;
use crate::record::{BookRecord, header};

/// Ordered table of extracted records.
#[derive(Debug, Clone, Default)]
pub struct RecordSink {
    records: Vec<BookRecord>,
    include_url: bool,
}

impl RecordSink {
    /// Creates an empty sink; `include_url` adds the `url` column on output.
    pub fn new(include_url: bool) -> Self {
        Self { records: Vec::new(), include_url }
    }

    /// Appends a record at the end of the table.
    pub fn append(&mut self, record: BookRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in arrival order.
    pub fn records(&self) -> &[BookRecord] {
        &self.records
    }

    /// Writes the table to any writer with the given field delimiter.
    pub fn write_delimited<W: Write>(&self, writer: W, delimiter: u8) -> Result<()> {
        let mut writer = csv::WriterBuilder::new().delimiter(delimiter).from_writer(writer);

        writer.write_record(header(self.include_url))?;
        for record in &self.records {
            writer.write_record(record.to_row(self.include_url))?;
        }
        writer.flush()?;

        Ok(())
    }

    /// Writes the table as tab-separated values.
    pub fn write_tsv(&self, path: &Path) -> Result<()> {
        self.write_delimited(fs::File::create(path)?, b'\t')
    }

    /// Writes the table as comma-separated values.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        self.write_delimited(fs::File::create(path)?, b',')
    }

    /// Writes `pages-<start>-<end>.tsv` and `.csv` under `dir`.
    ///
    /// Creates `dir` if needed and returns the two paths written.
    pub fn write_outputs(&self, dir: &Path, start_page: u32, end_page: u32) -> Result<(PathBuf, PathBuf)> {
        fs::create_dir_all(dir)?;

        let stem = output_stem(start_page, end_page);
        let tsv = dir.join(format!("{}.tsv", stem));
        let csv = dir.join(format!("{}.csv", stem));

        self.write_tsv(&tsv)?;
        self.write_csv(&csv)?;

        tracing::info!(records = self.len(), tsv = %tsv.display(), csv = %csv.display(), "wrote book tables");

        Ok((tsv, csv))
    }
}

/// File stem shared by both outputs of a crawl over `start..=end`.
pub fn output_stem(start_page: u32, end_page: u32) -> String {
    format!("pages-{}-{}", start_page, end_page)
}
