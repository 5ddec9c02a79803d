//! CSV spreadsheet writer

use crate::crawler::CrawlParams;
use crate::output::filename::output_filename;
use crate::output::traits::{OutputError, OutputResult, ResultWriter};
use crate::record::{ShopField, ShopRecord};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Byte-order mark so spreadsheet tools read the file as UTF-8
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Writes records as a UTF-8 CSV file in `params.save_path`
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvResultWriter;

impl ResultWriter for CsvResultWriter {
    fn write(&self, records: &[ShopRecord], params: &CrawlParams) -> OutputResult<PathBuf> {
        let timestamp = chrono::Local::now().naive_local();
        let path = params.save_path.join(output_filename(params, timestamp));
        let written = write_records_csv(records, &path)?;

        tracing::info!("Wrote {} records to {}", written, path.display());
        Ok(path)
    }
}

/// Writes every named record to `path`
///
/// Records whose shop name is the sentinel are skipped.
///
/// # Returns
///
/// * `Ok(usize)` - Number of rows written
/// * `Err(OutputError::NothingToWrite)` - No record had a name; no file is created
pub fn write_records_csv(records: &[ShopRecord], path: &Path) -> OutputResult<usize> {
    let rows: Vec<&ShopRecord> = records.iter().filter(|r| !r.is_nameless()).collect();
    if rows.is_empty() {
        return Err(OutputError::NothingToWrite);
    }

    let mut file = File::create(path)?;
    file.write_all(UTF8_BOM)?;

    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(ShopField::ALL.map(|field| field.header()))?;
    for record in &rows {
        writer.write_record(record.values())?;
    }
    writer.flush()?;

    Ok(rows.len())
}
