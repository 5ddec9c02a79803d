//! Output module for writing harvested records
//!
//! This module handles:
//! - Naming the output file after the run parameters
//! - Writing records as a spreadsheet-friendly CSV file

mod csv_writer;
mod filename;
mod traits;

pub use csv_writer::{write_records_csv, CsvResultWriter};
pub use filename::{output_filename, NEW_OPENINGS_TAG};
pub use traits::{OutputError, OutputResult, ResultWriter};
