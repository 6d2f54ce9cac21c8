use std::collections::BTreeSet;

use crate::data_types::hit_record::{HitCategory, HitRecord, GENE_COLUMN, ISOLATE_ID_COLUMN};
use crate::data_types::summary_error::SummaryError;

/// An ordered table of hits produced by a single detection tool
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HitCollection {
    /// The tool category these hits came from
    category: HitCategory,
    /// The hits, in input order
    records: Vec<HitRecord>
}

impl HitCollection {
    /// Constructor from already-typed records
    pub fn new(category: HitCategory, records: Vec<HitRecord>) -> Self {
        Self {
            category,
            records
        }
    }

    /// Builds a collection from a generic header + rows table.
    /// Every column except the isolate and gene columns is carried on each record as a passthrough field.
    /// # Arguments
    /// * `category` - the tool that produced this table
    /// * `headers` - the column headers, in order
    /// * `rows` - each row of cells, aligned to `headers`
    /// # Errors
    /// * if `Isolate ID` or `Gene` is not in the headers
    /// * if a row is too short to have a value for either of those columns; the error carries the file line, counting the header as line 1
    pub fn from_table<H, R, C>(category: HitCategory, headers: &[H], rows: R) -> Result<Self, SummaryError>
    where
        H: AsRef<str>,
        R: IntoIterator<Item = Vec<C>>,
        C: Into<String>
    {
        let find_column = |column: &str| {
            headers.iter()
                .position(|h| h.as_ref() == column)
                .ok_or_else(|| SummaryError::MalformedInput { category, column: column.to_string() })
        };
        let isolate_index = find_column(ISOLATE_ID_COLUMN)?;
        let gene_index = find_column(GENE_COLUMN)?;

        let mut records = vec![];
        for (row_index, row) in rows.into_iter().enumerate() {
            let mut isolate_id = None;
            let mut gene = None;
            let mut record_fields = vec![];
            for (column_index, cell) in row.into_iter().enumerate() {
                let cell: String = cell.into();
                if column_index == isolate_index {
                    isolate_id = Some(cell);
                } else if column_index == gene_index {
                    gene = Some(cell);
                } else if let Some(header) = headers.get(column_index) {
                    record_fields.push((header.as_ref().to_string(), cell));
                }
            }

            // data rows start on line 2, after the header
            let line = row_index + 2;
            let missing = |column: &str| SummaryError::MissingValue { category, line, column: column.to_string() };
            let isolate_id = isolate_id.ok_or_else(|| missing(ISOLATE_ID_COLUMN))?;
            let gene = gene.ok_or_else(|| missing(GENE_COLUMN))?;

            let record = record_fields.into_iter()
                .fold(HitRecord::new(isolate_id, gene), |r, (h, v)| r.with_field(h, v));
            records.push(record);
        }

        Ok(Self {
            category,
            records
        })
    }

    /// Returns the distinct isolates with at least one hit
    pub fn isolate_ids(&self) -> BTreeSet<&str> {
        self.records.iter()
            .map(|r| r.isolate_id())
            .collect()
    }

    // getters
    pub fn category(&self) -> HitCategory {
        self.category
    }

    pub fn records(&self) -> &[HitRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
