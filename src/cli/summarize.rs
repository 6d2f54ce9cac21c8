use anyhow::ensure;
use clap::Args;
use log::info;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::core::{check_optional_filename, check_required_filename, AFTER_HELP, FULL_VERSION};

#[derive(Args, Clone, Debug, Default, Serialize)]
#[clap(author, about,
    after_help = &**AFTER_HELP
)]
pub struct SummarizeSettings {
    #[clap(default_value = "")]
    #[clap(hide = true)]
    tool_version: String,

    /// Scanned genome file (FASTA); the isolate name is the file name without its extension
    #[clap(required = true)]
    #[clap(short = 'g')]
    #[clap(long = "genome")]
    #[clap(value_name = "FASTA")]
    #[clap(help_heading = Some("Input/Output"))]
    pub genome_filenames: Vec<PathBuf>,

    /// Gene detection hit table (TSV/CSV)
    #[clap(required = true)]
    #[clap(short = 'r')]
    #[clap(long = "resfinder")]
    #[clap(value_name = "TSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub resfinder_filename: PathBuf,

    /// Point mutation hit table (TSV/CSV); enables the phenotype column
    #[clap(short = 'p')]
    #[clap(long = "pointfinder")]
    #[clap(value_name = "TSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub pointfinder_filename: Option<PathBuf>,

    /// Plasmid gene hit table (TSV/CSV)
    #[clap(short = 'l')]
    #[clap(long = "plasmidfinder")]
    #[clap(value_name = "TSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub plasmidfinder_filename: Option<PathBuf>,

    /// Output summary file (CSV/TSV)
    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output-summary")]
    #[clap(value_name = "TSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_summary_filename: PathBuf,

    /// Optional output summary in JSON format
    #[clap(long = "output-json")]
    #[clap(value_name = "JSON")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_json_filename: Option<PathBuf>,

    /// Optional output debug folder
    #[clap(long = "output-debug")]
    #[clap(value_name = "DIR")]
    #[clap(help_heading = Some("Input/Output"))]
    pub debug_folder: Option<PathBuf>,

    /// Leaves isolates without any hits out of the summary
    #[clap(long = "exclude-negatives")]
    #[clap(help_heading = Some("Summary parameters"))]
    pub exclude_negatives: bool,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

pub fn check_summarize_settings(mut settings: SummarizeSettings) -> anyhow::Result<SummarizeSettings> {
    // hard code the version in
    settings.tool_version = FULL_VERSION.clone();
    info!("amr-summary version: {:?}", &settings.tool_version);
    info!("Sub-command: summarize");
    info!("Inputs:");

    // check for all the required input files
    ensure!(!settings.genome_filenames.is_empty(), "at least one --genome must be provided");
    for (i, genome_fn) in settings.genome_filenames.iter().enumerate() {
        check_required_filename(genome_fn, format!("Genome #{i}").as_str())?;
        info!("\tGenome #{i}: {genome_fn:?}");
    }

    check_required_filename(&settings.resfinder_filename, "ResFinder table")?;
    info!("\tResFinder: {:?}", &settings.resfinder_filename);

    check_optional_filename(settings.pointfinder_filename.as_deref(), "PointFinder table")?;
    if let Some(pointfinder_fn) = settings.pointfinder_filename.as_deref() {
        info!("\tPointFinder: {pointfinder_fn:?}");
    } else {
        info!("\tPointFinder: None");
    }

    check_optional_filename(settings.plasmidfinder_filename.as_deref(), "PlasmidFinder table")?;
    if let Some(plasmidfinder_fn) = settings.plasmidfinder_filename.as_deref() {
        info!("\tPlasmidFinder: {plasmidfinder_fn:?}");
    } else {
        info!("\tPlasmidFinder: None");
    }

    // outputs
    info!("Outputs:");
    info!("\tSummary: {:?}", &settings.output_summary_filename);
    if let Some(json_fn) = settings.output_json_filename.as_ref() {
        info!("\tJSON summary: {json_fn:?}");
    }
    if let Some(debug_folder) = settings.debug_folder.as_ref() {
        info!("\tDebug folder: {debug_folder:?}");
    }

    info!("Summary parameters:");
    info!("\tNegative isolates: {}", if settings.exclude_negatives { "EXCLUDED" } else { "INCLUDED" });

    Ok(settings)
}
