use indexmap::IndexMap;

/// Header for the isolate identifier column in every hit table
pub const ISOLATE_ID_COLUMN: &str = "Isolate ID";
/// Header for the detected gene (or mutation) column in every hit table
pub const GENE_COLUMN: &str = "Gene";
/// Header for the phenotype passthrough column
pub const PHENOTYPE_COLUMN: &str = "Predicted Phenotype";

/// The detection tool category that produced a hit
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, strum_macros::Display)]
pub enum HitCategory {
    /// Acquired resistance gene detection
    #[strum(serialize = "resfinder")]
    Resistance,
    /// Chromosomal point mutation detection
    #[strum(serialize = "pointfinder")]
    PointMutation,
    /// Plasmid replicon detection
    #[strum(serialize = "plasmidfinder")]
    Plasmid
}

/// One row of raw detection output.
/// Anything beyond the isolate and gene is carried as passthrough fields, in input column order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct HitRecord {
    /// The scanned sample this hit belongs to
    isolate_id: String,
    /// Name of the detected gene or mutation
    gene: String,
    /// All remaining columns, keyed by header
    fields: IndexMap<String, String>
}

impl HitRecord {
    /// Constructor for a hit without any passthrough fields
    pub fn new(isolate_id: impl Into<String>, gene: impl Into<String>) -> Self {
        Self {
            isolate_id: isolate_id.into(),
            gene: gene.into(),
            fields: Default::default()
        }
    }

    /// Builder-style helper that attaches a passthrough field
    /// # Arguments
    /// * `header` - the column name
    /// * `value` - the cell value for this row
    pub fn with_field(mut self, header: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(header.into(), value.into());
        self
    }

    /// Shortcut for attaching the phenotype passthrough field
    pub fn with_phenotype(self, phenotype: impl Into<String>) -> Self {
        self.with_field(PHENOTYPE_COLUMN, phenotype)
    }

    // getters
    pub fn isolate_id(&self) -> &str {
        &self.isolate_id
    }

    pub fn gene(&self) -> &str {
        &self.gene
    }

    pub fn fields(&self) -> &IndexMap<String, String> {
        &self.fields
    }

    /// Returns a passthrough field if this record has it
    pub fn field(&self, header: &str) -> Option<&str> {
        self.fields.get(header).map(|s| s.as_str())
    }

    /// Returns the phenotype value, unmodified, if present and not blank
    pub fn phenotype(&self) -> Option<&str> {
        self.field(PHENOTYPE_COLUMN)
            .filter(|p| !p.trim().is_empty())
    }
}
