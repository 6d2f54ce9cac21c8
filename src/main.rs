use log::{LevelFilter, error, info};
use std::time::Instant;

use amr_summary::cli::core::{Commands, get_cli};
use amr_summary::cli::summarize::{SummarizeSettings, check_summarize_settings};
use amr_summary::data_types::hit_record::HitCategory;
use amr_summary::data_types::isolate_set::IsolateSet;
use amr_summary::data_types::summary_error::SummaryError;
use amr_summary::parsing::hit_table::load_hit_table;
use amr_summary::summarizer::ResultSummarizerBuilder;
use amr_summary::util::json_io::save_json;
use amr_summary::writers::summary::{write_summary, write_summary_json};

/// Picks an exit code for a loading failure; malformed tables are data errors, anything else is I/O
fn load_exit_code(e: &anyhow::Error) -> i32 {
    if e.downcast_ref::<SummaryError>().is_some() {
        exitcode::DATAERR
    } else {
        exitcode::IOERR
    }
}

fn run_summarize(settings: SummarizeSettings) {
    // start the timer
    let start_time = Instant::now();

    // set up logging before we check the other settings
    let filter_level: LevelFilter = match settings.verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace
    };
    env_logger::builder()
        .format_timestamp_millis()
        .filter_level(filter_level)
        .init();

    let settings = match check_summarize_settings(settings) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while verifying settings: {e:#}");
            std::process::exit(exitcode::CONFIG);
        }
    };

    // create a debug folder if specified
    if let Some(debug_folder) = settings.debug_folder.as_ref() {
        info!("Creating debug folder at {debug_folder:?}...");
        if let Err(e) = std::fs::create_dir_all(debug_folder) {
            error!("Error while creating debug folder: {e}");
            std::process::exit(exitcode::IOERR);
        }

        // save the CLI options
        let cli_json = debug_folder.join("cli_settings.json");
        info!("Saving CLI options to {cli_json:?}...");
        if let Err(e) = save_json(&settings, &cli_json) {
            error!("Error while saving CLI options: {e}");
            std::process::exit(exitcode::IOERR);
        }
    }

    // figure out which isolates were scanned
    let isolates = match IsolateSet::from_paths(settings.genome_filenames.as_slice()) {
        Ok(i) => i,
        Err(e) => {
            error!("Error while naming isolates: {e}");
            std::process::exit(exitcode::DATAERR);
        }
    };
    info!("Scanned isolates: {}", isolates.len());

    // load all the hit tables
    info!("Loading hit tables...");
    let resistance_hits = match load_hit_table(&settings.resfinder_filename, HitCategory::Resistance) {
        Ok(h) => h,
        Err(e) => {
            error!("Error while loading ResFinder hits: {e:#}");
            std::process::exit(load_exit_code(&e));
        }
    };

    let pointfinder_hits = settings.pointfinder_filename.as_deref().map(|point_fn| {
        match load_hit_table(point_fn, HitCategory::PointMutation) {
            Ok(h) => h,
            Err(e) => {
                error!("Error while loading PointFinder hits: {e:#}");
                std::process::exit(load_exit_code(&e));
            }
        }
    });

    let plasmid_hits = settings.plasmidfinder_filename.as_deref().map(|plasmid_fn| {
        match load_hit_table(plasmid_fn, HitCategory::Plasmid) {
            Ok(h) => h,
            Err(e) => {
                error!("Error while loading PlasmidFinder hits: {e:#}");
                std::process::exit(load_exit_code(&e));
            }
        }
    });

    for collection in std::iter::once(&resistance_hits).chain(pointfinder_hits.iter()).chain(plasmid_hits.iter()) {
        info!("\t{}: {} hits across {} isolates", collection.category(), collection.len(), collection.isolate_ids().len());
    }

    // build the summary
    let summarizer = match ResultSummarizerBuilder::default()
        .isolates(isolates)
        .resistance_hits(resistance_hits)
        .pointfinder_hits(pointfinder_hits)
        .plasmid_hits(plasmid_hits)
        .build() {
        Ok(s) => s,
        Err(e) => {
            error!("Error while building summarizer: {e:?}");
            std::process::exit(exitcode::SOFTWARE);
        }
    };

    info!("Summarizing results...");
    let summary = summarizer.create_summary(!settings.exclude_negatives);
    let negative_count = summary.rows().values().filter(|r| r.is_negative()).count();
    info!("Summary rows: {} ({negative_count} without hits)", summary.len());

    // now write things
    let summary_fn = &settings.output_summary_filename;
    info!("Saving output summary to {summary_fn:?}...");
    if let Err(e) = write_summary(&summary, summary_fn) {
        error!("Error while saving summary file: {e:#}");
        std::process::exit(exitcode::IOERR);
    }

    if let Some(json_fn) = settings.output_json_filename.as_deref() {
        info!("Saving JSON summary to {json_fn:?}...");
        if let Err(e) = write_summary_json(&summary, json_fn) {
            error!("Error while saving JSON summary: {e:#}");
            std::process::exit(exitcode::IOERR);
        }
    }

    info!("Summary completed in {} seconds.", start_time.elapsed().as_secs_f64());
}

fn main() {
    let cli = get_cli();
    match cli.command {
        Commands::Summarize(settings) => {
            run_summarize(*settings);
        }
    }

    info!("Process finished successfully.");
}
