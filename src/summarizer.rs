/*!
# Result Summarizer
Collapses the hit tables from the detection tools into one row per isolate.
Gene-detection and point-mutation hits are pooled into the `Genotype` column, plasmid hits become the `Plasmid Genes` column, and point-mutation phenotypes (when supplied) become `Predicted Phenotype`.

## Example usage
```rust
use amr_summary::data_types::hit_collection::HitCollection;
use amr_summary::data_types::hit_record::{HitCategory, HitRecord};
use amr_summary::data_types::isolate_set::IsolateSet;
use amr_summary::data_types::summary_table::SummaryColumn;
use amr_summary::summarizer::ResultSummarizerBuilder;

let isolates = IsolateSet::from_paths(&["genomes/iso1.fasta", "genomes/iso2.fasta"]).unwrap();
let resistance = HitCollection::new(HitCategory::Resistance, vec![
    HitRecord::new("iso1", "blaZ"),
    HitRecord::new("iso1", "aac(6')"),
]);
let plasmids = HitCollection::new(HitCategory::Plasmid, vec![
    HitRecord::new("iso1", "IncFIB(K)"),
]);

let summarizer = ResultSummarizerBuilder::default()
    .isolates(isolates)
    .resistance_hits(resistance)
    .plasmid_hits(Some(plasmids))
    .build().unwrap();

// iso2 had no hits, so it shows up with the negative marker
let summary = summarizer.create_summary(true);
assert_eq!(summary.columns(), &[SummaryColumn::Genotype, SummaryColumn::PlasmidGenes]);
assert_eq!(summary.row("iso1").unwrap().genotype(), "aac(6'), blaZ");
assert_eq!(summary.row("iso1").unwrap().plasmid_genes(), Some("IncFIB(K)"));
assert_eq!(summary.row("iso2").unwrap().genotype(), "None");
assert_eq!(summary.row("iso2").unwrap().plasmid_genes(), None);
```
*/
use derive_builder::Builder;
use itertools::Itertools;
use log::{debug, warn};
use std::collections::BTreeMap;

use crate::data_types::hit_collection::HitCollection;
use crate::data_types::hit_record::HitRecord;
use crate::data_types::isolate_set::IsolateSet;
use crate::data_types::summary_table::{SummaryColumn, SummaryRow, SummaryTable, NEGATIVE_MARKER};

/// Separator placed between joined gene names
pub const GENE_SEPARATOR: &str = ", ";

/// Isolate ID -> hits for that isolate, sorted by gene name
pub type GroupedHits<'a> = BTreeMap<&'a str, Vec<&'a HitRecord>>;

/// Which input table a compiled column was derived from
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ColumnOrigin {
    /// Pooled gene-detection and point-mutation hits
    Genotype,
    /// Plasmid-gene hits
    Plasmid
}

/// The header a compiled column currently carries
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ColumnLabel {
    /// Freshly compiled, still named after the input `Gene` column
    Gene,
    /// Renamed to its output column
    Output(SummaryColumn)
}

/// A single compiled column, one joined cell per isolate.
/// The origin tag travels with the column so that merging never has to guess which copy of a header is which.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CompiledColumn {
    /// The input table this column was compiled from
    origin: ColumnOrigin,
    /// The current header
    label: ColumnLabel,
    /// Isolate ID -> joined cell
    cells: BTreeMap<String, String>
}

impl CompiledColumn {
    /// Constructor
    pub fn new(origin: ColumnOrigin, label: ColumnLabel, cells: BTreeMap<String, String>) -> Self {
        Self {
            origin,
            label,
            cells
        }
    }

    /// Returns the same column under a new output header
    pub fn renamed(self, column: SummaryColumn) -> Self {
        Self {
            label: ColumnLabel::Output(column),
            ..self
        }
    }

    /// Returns true if this column came from `origin` and currently carries `label`
    pub fn is_tagged(&self, origin: ColumnOrigin, label: ColumnLabel) -> bool {
        self.origin == origin && self.label == label
    }

    // getters
    pub fn origin(&self) -> ColumnOrigin {
        self.origin
    }

    pub fn label(&self) -> ColumnLabel {
        self.label
    }

    pub fn cells(&self) -> &BTreeMap<String, String> {
        &self.cells
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Holds the inputs for one summary; these are never modified, so `create_summary` may be called repeatedly.
#[derive(Builder, Clone, Debug)]
#[builder(pattern = "owned")]
pub struct ResultSummarizer {
    /// Every isolate that was scanned, with or without hits
    isolates: IsolateSet,
    /// Gene-detection hits
    resistance_hits: HitCollection,
    /// Point-mutation hits, if point mutations were searched
    #[builder(default)]
    pointfinder_hits: Option<HitCollection>,
    /// Plasmid-gene hits, if plasmids were searched
    #[builder(default)]
    plasmid_hits: Option<HitCollection>
}

impl ResultSummarizer {
    /// Builds the per-isolate summary table.
    /// # Arguments
    /// * `include_negatives` - if true, every scanned isolate gets a row; isolates without hits get a `None` genotype
    pub fn create_summary(&self, include_negatives: bool) -> SummaryTable {
        // pool the gene and mutation hits into one genotype source
        let genotype_hits = self.resistance_hits.records().iter()
            .chain(self.pointfinder_hits.iter().flat_map(|p| p.records().iter()));
        let grouped = group_hits(genotype_hits);
        debug!("Grouped {} genotype hits into {} isolates", self.genotype_hit_count(), grouped.len());

        let mut genotype = compile_results(&grouped, ColumnOrigin::Genotype);
        let phenotypes = self.pointfinder_hits.as_ref()
            .map(|_p| compile_phenotypes(&grouped));
        let plasmids = compile_plasmids(self.plasmid_hits.as_ref());

        if include_negatives {
            genotype = inject_negatives(genotype, &self.isolates);
        }

        let genotype = genotype.renamed(SummaryColumn::Genotype);
        merge_columns(genotype, plasmids, phenotypes)
    }

    fn genotype_hit_count(&self) -> usize {
        self.resistance_hits.len() + self.pointfinder_hits.as_ref().map(|p| p.len()).unwrap_or(0)
    }
}

/// Groups hits by isolate, with each isolate's hits sorted by ascending gene name.
/// Hits with identical gene names keep their input order.
pub fn group_hits<'a>(hits: impl IntoIterator<Item = &'a HitRecord>) -> GroupedHits<'a> {
    let mut grouped: GroupedHits<'a> = Default::default();
    for hit in hits {
        grouped.entry(hit.isolate_id()).or_default().push(hit);
    }
    for isolate_hits in grouped.values_mut() {
        isolate_hits.sort_by(|a, b| a.gene().cmp(b.gene()));
    }
    grouped
}

/// Joins the gene names of pre-sorted hits into a single cell
pub fn join_genes(hits: &[&HitRecord]) -> String {
    hits.iter()
        .map(|h| h.gene())
        .join(GENE_SEPARATOR)
}

/// Compiles grouped hits into a `Gene` column tagged with `origin`; isolates without hits are not present
pub fn compile_results(grouped: &GroupedHits, origin: ColumnOrigin) -> CompiledColumn {
    let cells = grouped.iter()
        .map(|(&isolate_id, hits)| (isolate_id.to_string(), join_genes(hits)))
        .collect();
    CompiledColumn::new(origin, ColumnLabel::Gene, cells)
}

/// Compiles plasmid hits into the `Plasmid Genes` column.
/// A missing collection produces an empty column.
pub fn compile_plasmids(plasmid_hits: Option<&HitCollection>) -> CompiledColumn {
    let grouped = group_hits(plasmid_hits.into_iter().flat_map(|p| p.records().iter()));
    compile_results(&grouped, ColumnOrigin::Plasmid)
        .renamed(SummaryColumn::PlasmidGenes)
}

/// Collects the phenotype values for each isolate, following the gene order of the genotype.
/// Repeated values are reported once and isolates without any value are left out.
pub fn compile_phenotypes(grouped: &GroupedHits) -> BTreeMap<String, String> {
    grouped.iter()
        .filter_map(|(&isolate_id, hits)| {
            let phenotypes = hits.iter()
                .filter_map(|h| h.phenotype())
                .unique()
                .join(GENE_SEPARATOR);
            if phenotypes.is_empty() {
                None
            } else {
                Some((isolate_id.to_string(), phenotypes))
            }
        })
        .collect()
}

/// Adds a negative-marker cell for every scanned isolate missing from the column; existing cells are untouched.
pub fn inject_negatives(column: CompiledColumn, isolates: &IsolateSet) -> CompiledColumn {
    let mut cells = column.cells;
    let mut injected = 0;
    for isolate_id in isolates.iter() {
        if !cells.contains_key(isolate_id) {
            cells.insert(isolate_id.to_string(), NEGATIVE_MARKER.to_string());
            injected += 1;
        }
    }
    debug!("Added {injected} negative isolates");
    CompiledColumn::new(column.origin, column.label, cells)
}

/// Left-joins the genotype column with the plasmid column and attaches phenotypes.
/// Isolates only present in the plasmid column are dropped.
/// # Arguments
/// * `genotype` - the genotype-origin column, already renamed to `Genotype`
/// * `plasmids` - the plasmid-origin column, already renamed to `Plasmid Genes`
/// * `phenotypes` - Some(..) if point-mutation data was supplied
pub fn merge_columns(genotype: CompiledColumn, plasmids: CompiledColumn, phenotypes: Option<BTreeMap<String, String>>) -> SummaryTable {
    let mut columns = vec![SummaryColumn::Genotype];
    if phenotypes.is_some() {
        columns.push(SummaryColumn::PredictedPhenotype);
    }

    let compiled = [genotype, plasmids];
    let lookup = |origin: ColumnOrigin, column: SummaryColumn| {
        compiled.iter()
            .find(|c| c.is_tagged(origin, ColumnLabel::Output(column)))
            .map(|c| c.cells())
    };

    // an empty lookup here means the caller handed us mislabeled columns
    let empty = BTreeMap::new();
    let genotype_cells = lookup(ColumnOrigin::Genotype, SummaryColumn::Genotype).unwrap_or(&empty);
    let plasmid_cells = lookup(ColumnOrigin::Plasmid, SummaryColumn::PlasmidGenes)
        .filter(|cells| !cells.is_empty());

    if let Some(plasmid_cells) = plasmid_cells {
        columns.push(SummaryColumn::PlasmidGenes);
        let dropped = plasmid_cells.keys()
            .filter(|isolate_id| !genotype_cells.contains_key(*isolate_id))
            .count();
        if dropped > 0 {
            warn!("{dropped} isolates only have plasmid hits and are excluded from the summary");
        }
    }

    let rows = genotype_cells.iter()
        .map(|(isolate_id, genotype)| {
            let plasmid_genes = plasmid_cells.and_then(|cells| cells.get(isolate_id)).cloned();
            let phenotype = phenotypes.as_ref().and_then(|p| p.get(isolate_id)).cloned();
            (isolate_id.clone(), SummaryRow::new(genotype.clone(), plasmid_genes, phenotype))
        })
        .collect::<Vec<_>>();

    SummaryTable::new(columns, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::hit_record::HitCategory;

    fn resistance(hits: &[(&str, &str)]) -> HitCollection {
        HitCollection::new(HitCategory::Resistance, hits.iter().map(|&(i, g)| HitRecord::new(i, g)).collect())
    }

    fn plasmids(hits: &[(&str, &str)]) -> HitCollection {
        HitCollection::new(HitCategory::Plasmid, hits.iter().map(|&(i, g)| HitRecord::new(i, g)).collect())
    }

    fn points(hits: &[(&str, &str, &str)]) -> HitCollection {
        HitCollection::new(
            HitCategory::PointMutation,
            hits.iter().map(|&(i, g, p)| HitRecord::new(i, g).with_phenotype(p)).collect()
        )
    }

    fn summarizer(
        isolates: &[&str], res: HitCollection, point: Option<HitCollection>, plasmid: Option<HitCollection>
    ) -> ResultSummarizer {
        ResultSummarizerBuilder::default()
            .isolates(IsolateSet::from_names(isolates.iter().copied()))
            .resistance_hits(res)
            .pointfinder_hits(point)
            .plasmid_hits(plasmid)
            .build().unwrap()
    }

    #[test]
    fn test_gene_ordering() {
        let res = resistance(&[("iso1", "blaZ"), ("iso1", "aac(6')"), ("iso1", "blaOXA")]);
        let grouped = group_hits(res.records());
        let compiled = compile_results(&grouped, ColumnOrigin::Genotype);
        assert_eq!(compiled.label(), ColumnLabel::Gene);
        assert_eq!(compiled.origin(), ColumnOrigin::Genotype);
        assert_eq!(compiled.cells().get("iso1").unwrap(), "aac(6'), blaOXA, blaZ");
    }

    #[test]
    fn test_compile_skips_missing_isolates() {
        let res = resistance(&[("iso2", "blaZ"), ("iso1", "tet(K)"), ("iso2", "blaZ")]);
        let compiled = compile_results(&group_hits(res.records()), ColumnOrigin::Genotype);
        assert_eq!(compiled.cells().len(), 2);
        assert_eq!(compiled.cells().get("iso2").unwrap(), "blaZ, blaZ");
        assert!(!compiled.cells().contains_key("iso3"));
    }

    #[test]
    fn test_compile_plasmids_renamed() {
        let plasmid = plasmids(&[("iso1", "IncFII"), ("iso1", "ColRNAI")]);
        let compiled = compile_plasmids(Some(&plasmid));
        assert_eq!(compiled.label(), ColumnLabel::Output(SummaryColumn::PlasmidGenes));
        assert_eq!(compiled.origin(), ColumnOrigin::Plasmid);
        assert_eq!(compiled.cells().get("iso1").unwrap(), "ColRNAI, IncFII");
        assert!(compile_plasmids(None).is_empty());

        // same cells as the genotype compiler, only the tag and header differ
        let genotype = compile_results(&group_hits(plasmid.records()), ColumnOrigin::Genotype);
        assert_eq!(genotype.cells(), compiled.cells());
        assert!(!genotype.is_tagged(ColumnOrigin::Plasmid, ColumnLabel::Gene));
    }

    #[test]
    fn test_inject_negatives() {
        let res = resistance(&[("iso1", "blaZ")]);
        let compiled = compile_results(&group_hits(res.records()), ColumnOrigin::Genotype);
        let isolates = IsolateSet::from_names(["iso1", "iso2", "iso3"]);
        let injected = inject_negatives(compiled, &isolates);
        assert_eq!(injected.cells().len(), 3);
        assert_eq!(injected.cells().get("iso1").unwrap(), "blaZ");
        assert_eq!(injected.cells().get("iso2").unwrap(), NEGATIVE_MARKER);
        assert_eq!(injected.cells().get("iso3").unwrap(), NEGATIVE_MARKER);
        assert_eq!(injected.label(), ColumnLabel::Gene);
    }

    #[test]
    fn test_inject_keeps_unlisted_hits() {
        // hits for an isolate that was not in the scanned set are left alone
        let res = resistance(&[("other", "blaZ")]);
        let compiled = compile_results(&group_hits(res.records()), ColumnOrigin::Genotype);
        let injected = inject_negatives(compiled, &IsolateSet::from_names(["iso1"]));
        assert_eq!(injected.cells().get("other").unwrap(), "blaZ");
        assert_eq!(injected.cells().get("iso1").unwrap(), NEGATIVE_MARKER);
    }

    #[test]
    fn test_end_to_end() {
        let s = summarizer(
            &["iso1", "iso2", "iso3"],
            resistance(&[("iso1", "geneA"), ("iso1", "geneB"), ("iso2", "geneC")]),
            None,
            Some(plasmids(&[("iso1", "plasX")]))
        );
        let summary = s.create_summary(true);
        assert_eq!(summary.columns(), &[SummaryColumn::Genotype, SummaryColumn::PlasmidGenes]);
        assert_eq!(summary.isolate_ids().collect::<Vec<_>>(), vec!["iso1", "iso2", "iso3"]);
        assert_eq!(summary.row("iso1").unwrap(), &SummaryRow::new("geneA, geneB".to_string(), Some("plasX".to_string()), None));
        assert_eq!(summary.row("iso2").unwrap(), &SummaryRow::new("geneC".to_string(), None, None));
        assert_eq!(summary.row("iso3").unwrap(), &SummaryRow::new("None".to_string(), None, None));
    }

    #[test]
    fn test_without_negatives() {
        let s = summarizer(
            &["iso1", "iso2", "iso3"],
            resistance(&[("iso2", "geneC"), ("iso1", "geneA")]),
            None,
            None
        );
        let summary = s.create_summary(false);
        assert_eq!(summary.columns(), &[SummaryColumn::Genotype]);
        assert_eq!(summary.isolate_ids().collect::<Vec<_>>(), vec!["iso1", "iso2"]);
    }

    #[test]
    fn test_plasmid_only_isolates_dropped() {
        let s = summarizer(
            &["A", "B", "C"],
            resistance(&[("A", "blaZ"), ("B", "tet(K)")]),
            None,
            Some(plasmids(&[("A", "rep7"), ("C", "rep5")]))
        );
        let summary = s.create_summary(false);
        assert_eq!(summary.isolate_ids().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(summary.row("A").unwrap().plasmid_genes(), Some("rep7"));
        assert_eq!(summary.row("B").unwrap().plasmid_genes(), None);

        // with negatives, C is a scanned isolate and keeps its plasmid genes
        let summary = s.create_summary(true);
        assert_eq!(summary.isolate_ids().collect::<Vec<_>>(), vec!["A", "B", "C"]);
        assert_eq!(summary.row("C").unwrap().genotype(), "None");
        assert_eq!(summary.row("C").unwrap().plasmid_genes(), Some("rep5"));
    }

    #[test]
    fn test_empty_plasmid_table() {
        let s = summarizer(&["iso1"], resistance(&[("iso1", "blaZ")]), None, Some(plasmids(&[])));
        let summary = s.create_summary(true);
        assert_eq!(summary.columns(), &[SummaryColumn::Genotype]);
        assert_eq!(summary.row("iso1").unwrap().plasmid_genes(), None);
    }

    #[test]
    fn test_phenotype_passthrough() {
        let s = summarizer(
            &["A", "B"],
            resistance(&[("B", "blaZ")]),
            Some(points(&[("A", "gyrA (S83L)", "Resistant")])),
            None
        );
        let summary = s.create_summary(true);
        assert_eq!(summary.columns(), &[SummaryColumn::Genotype, SummaryColumn::PredictedPhenotype]);
        assert_eq!(summary.row("A").unwrap().genotype(), "gyrA (S83L)");
        assert_eq!(summary.row("A").unwrap().predicted_phenotype(), Some("Resistant"));
        assert_eq!(summary.row("B").unwrap().predicted_phenotype(), None);

        // no point mutation data, no phenotype column
        let s = summarizer(&["A"], resistance(&[("A", "blaZ")]), None, None);
        assert!(!s.create_summary(true).has_column(SummaryColumn::PredictedPhenotype));
    }

    #[test]
    fn test_phenotype_order_and_dedup() {
        let point = points(&[
            ("A", "parC (S80I)", "ciprofloxacin I/R"),
            ("A", "gyrA (S83L)", "nalidixic acid"),
            ("A", "gyrA (D87N)", "ciprofloxacin I/R"),
        ]);
        let grouped = group_hits(point.records());
        let phenotypes = compile_phenotypes(&grouped);
        assert_eq!(phenotypes.get("A").unwrap(), "ciprofloxacin I/R, nalidixic acid");
    }

    #[test]
    fn test_column_order_all_present() {
        let s = summarizer(
            &["A"],
            resistance(&[("A", "blaZ")]),
            Some(points(&[("A", "gyrA (S83L)", "Resistant")])),
            Some(plasmids(&[("A", "rep7")]))
        );
        let summary = s.create_summary(false);
        assert_eq!(summary.headers(), vec!["Isolate ID", "Genotype", "Plasmid Genes", "Predicted Phenotype"]);
        assert_eq!(summary.records().collect::<Vec<_>>(), vec![vec!["A", "blaZ, gyrA (S83L)", "rep7", "Resistant"]]);
    }

    #[test]
    fn test_idempotent() {
        let s = summarizer(
            &["iso1", "iso2"],
            resistance(&[("iso1", "blaZ")]),
            Some(points(&[("iso1", "gyrA (S83L)", "Resistant")])),
            Some(plasmids(&[("iso1", "rep7")]))
        );
        let first = s.create_summary(true);
        let second = s.create_summary(true);
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_builder_requires_inputs() {
        let result = ResultSummarizerBuilder::default()
            .isolates(IsolateSet::default())
            .build();
        assert!(result.is_err());
    }
}
