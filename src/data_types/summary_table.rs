use indexmap::IndexMap;
use strum::IntoEnumIterator;

use crate::data_types::hit_record::ISOLATE_ID_COLUMN;

/// Marker placed in the genotype cell of an isolate with no hits
pub const NEGATIVE_MARKER: &str = "None";

/// The value columns a summary may carry, in their fixed output order
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, strum_macros::AsRefStr, strum_macros::EnumIter)]
pub enum SummaryColumn {
    #[strum(serialize = "Genotype")]
    Genotype,
    #[strum(serialize = "Plasmid Genes")]
    PlasmidGenes,
    #[strum(serialize = "Predicted Phenotype")]
    PredictedPhenotype
}

/// One output row; the isolate ID is the key in the owning table
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SummaryRow {
    /// Joined gene and mutation names, or the negative marker
    genotype: String,
    /// Joined plasmid gene names, if this isolate had any
    plasmid_genes: Option<String>,
    /// Joined phenotype values, if any were reported
    predicted_phenotype: Option<String>
}

impl SummaryRow {
    /// Constructor
    pub fn new(genotype: String, plasmid_genes: Option<String>, predicted_phenotype: Option<String>) -> Self {
        Self {
            genotype,
            plasmid_genes,
            predicted_phenotype
        }
    }

    // getters
    pub fn genotype(&self) -> &str {
        &self.genotype
    }

    pub fn plasmid_genes(&self) -> Option<&str> {
        self.plasmid_genes.as_deref()
    }

    pub fn predicted_phenotype(&self) -> Option<&str> {
        self.predicted_phenotype.as_deref()
    }

    /// Returns true if this row was injected for an isolate with no hits
    pub fn is_negative(&self) -> bool {
        self.genotype == NEGATIVE_MARKER
    }

    /// Returns the cell for a given column; absent values come back as None
    pub fn cell(&self, column: SummaryColumn) -> Option<&str> {
        match column {
            SummaryColumn::Genotype => Some(self.genotype()),
            SummaryColumn::PlasmidGenes => self.plasmid_genes(),
            SummaryColumn::PredictedPhenotype => self.predicted_phenotype()
        }
    }
}

/// The final per-isolate summary.
/// Rows are kept sorted by isolate ID; `columns` lists which value columns exist in this table.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SummaryTable {
    /// The value columns present, always a subset of SummaryColumn in declaration order
    columns: Vec<SummaryColumn>,
    /// Isolate ID -> row, sorted by isolate ID
    rows: IndexMap<String, SummaryRow>
}

impl SummaryTable {
    /// Constructor, rows may be given in any order
    /// # Arguments
    /// * `columns` - the value columns present in this table
    /// * `rows` - (isolate ID, row) pairs
    pub fn new(columns: Vec<SummaryColumn>, rows: impl IntoIterator<Item = (String, SummaryRow)>) -> Self {
        let columns: Vec<SummaryColumn> = SummaryColumn::iter()
            .filter(|c| columns.contains(c))
            .collect();
        let mut rows: IndexMap<String, SummaryRow> = rows.into_iter().collect();
        rows.sort_keys();
        Self {
            columns,
            rows
        }
    }

    /// The header line for this table, starting with the isolate column
    pub fn headers(&self) -> Vec<&str> {
        std::iter::once(ISOLATE_ID_COLUMN)
            .chain(self.columns.iter().map(|c| c.as_ref()))
            .collect()
    }

    /// Flattens each row into cells aligned with `headers()`; absent values become empty strings
    pub fn records(&self) -> impl Iterator<Item = Vec<&str>> + '_ {
        self.rows.iter()
            .map(|(isolate_id, row)| {
                std::iter::once(isolate_id.as_str())
                    .chain(self.columns.iter().map(|&c| row.cell(c).unwrap_or_default()))
                    .collect()
            })
    }

    /// Converts each row into a column-name keyed map, mostly for JSON output
    pub fn to_json_rows(&self) -> Vec<IndexMap<&str, &str>> {
        let headers = self.headers();
        self.records()
            .map(|cells| headers.iter().copied().zip(cells).collect())
            .collect()
    }

    /// Returns true if the column exists in this table
    pub fn has_column(&self, column: SummaryColumn) -> bool {
        self.columns.contains(&column)
    }

    /// Looks up the row for an isolate
    pub fn row(&self, isolate_id: &str) -> Option<&SummaryRow> {
        self.rows.get(isolate_id)
    }

    /// Isolate IDs in output order
    pub fn isolate_ids(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(|k| k.as_str())
    }

    // getters
    pub fn columns(&self) -> &[SummaryColumn] {
        &self.columns
    }

    pub fn rows(&self) -> &IndexMap<String, SummaryRow> {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
