use anyhow::Context;
use log::debug;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::data_types::hit_collection::HitCollection;
use crate::data_types::hit_record::HitCategory;

/// Picks the delimiter from the file name; `.csv` and `.csv.gz` are comma separated, everything else is tab separated.
pub fn delimiter_for(filename: &Path) -> u8 {
    let name = filename.to_string_lossy().to_ascii_lowercase();
    let name = name.strip_suffix(".gz").unwrap_or(&name);
    if name.ends_with(".csv") { b',' } else { b'\t' }
}

/// Loads a hit table from disk, gunzipping if the file ends in `.gz`.
/// # Arguments
/// * `filename` - the TSV/CSV file with a header row
/// * `category` - the tool that produced the table
/// # Errors
/// * if the file cannot be opened or parsed
/// * if the table is missing the `Isolate ID` or `Gene` columns
pub fn load_hit_table(filename: &Path, category: HitCategory) -> anyhow::Result<HitCollection> {
    let file = File::open(filename)
        .with_context(|| format!("Error while opening {filename:?}:"))?;
    let fp: Box<dyn Read> = if filename.extension().unwrap_or_default() == "gz" {
        Box::new(flate2::read::MultiGzDecoder::new(file))
    } else {
        Box::new(file)
    };

    let collection = read_hit_table(fp, delimiter_for(filename), category)
        .with_context(|| format!("Error while reading {filename:?}:"))?;
    debug!("Loaded {} {category} hits from {filename:?}", collection.len());
    Ok(collection)
}

/// Parses a delimited hit table with a header row from any reader.
/// # Arguments
/// * `reader` - the raw table
/// * `delimiter` - the column delimiter
/// * `category` - the tool that produced the table
pub fn read_hit_table<R: Read>(reader: R, delimiter: u8, category: HitCategory) -> anyhow::Result<HitCollection> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true) // short rows get reported with a line number by the collection
        .from_reader(reader);

    let headers: Vec<String> = csv_reader.headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let rows: Vec<Vec<String>> = csv_reader.records()
        .map(|result| {
            let row = result?;
            Ok(row.iter().map(|cell| cell.to_string()).collect())
        })
        .collect::<anyhow::Result<_>>()?;

    Ok(HitCollection::from_table(category, headers.as_slice(), rows)?)
}
