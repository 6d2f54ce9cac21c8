use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::data_types::summary_table::SummaryTable;
use crate::util::json_io::save_json;

/// Will write the summary out to the given file path
/// # Arguments
/// * `summary` - the per-isolate summary
/// * `filename` - the filename for the output (tsv/csv)
pub fn write_summary(summary: &SummaryTable, filename: &Path) -> csv::Result<()> {
    // modify the delimiter to "," if it ends with .csv
    let is_csv: bool = filename.extension().unwrap_or_default() == "csv";
    let delimiter: u8 = if is_csv { b',' } else { b'\t' };
    let file = File::create(filename)?;
    write_delimited(summary, file, delimiter)
}

/// Writes the summary as delimited text to any writer; the header row is always written, even with no rows
/// # Arguments
/// * `summary` - the per-isolate summary
/// * `writer` - the output handle
/// * `delimiter` - the column delimiter
pub fn write_delimited<W: Write>(summary: &SummaryTable, writer: W, delimiter: u8) -> csv::Result<()> {
    let mut csv_writer: csv::Writer<W> = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    csv_writer.write_record(summary.headers())?;
    for record in summary.records() {
        csv_writer.write_record(record)?;
    }

    // save everything
    csv_writer.flush()?;
    Ok(())
}

/// Saves the summary rows as a JSON list of objects keyed by column name
/// # Arguments
/// * `summary` - the per-isolate summary
/// * `filename` - the output path, gzipped if it ends in `.gz`
pub fn write_summary_json(summary: &SummaryTable, filename: &Path) -> anyhow::Result<()> {
    save_json(&summary.to_json_rows(), filename)
}
