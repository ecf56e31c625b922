
use indicatif::ProgressIterator;
use log::{LevelFilter, debug, error, info};
use std::time::Instant;

use okapi::cli::core::{Commands, get_cli};
use okapi::cli::haplotypes::{HaplotypeSettings, check_haplotype_settings};
use okapi::cli::source::{SourceSettings, check_source_settings};
use okapi::data_types::source::Source;
use okapi::haplotypes::container::{ContainerInput, ReportConfigBuilder, TranscriptHaplotypeContainer};
use okapi::storage::VariationDb;
use okapi::util::json_io::{load_json, save_json, write_json};
use okapi::util::progress_bar::get_progress_style;
use okapi::writers::haplotype_report::TranscriptReport;
use okapi::writers::haplotype_summary::HaplotypeSummaryWriter;

fn init_logging(verbosity: u8) {
    let filter_level: LevelFilter = match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace
    };
    env_logger::builder()
        .format_timestamp_millis()
        .filter_level(filter_level)
        .init();
}

fn run_source(settings: SourceSettings) {
    // start the timer
    let start_time = Instant::now();

    // set up logging before we check the other settings
    init_logging(settings.verbosity);

    let settings = match check_source_settings(settings) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while verifying settings: {e:#}");
            std::process::exit(exitcode::CONFIG);
        }
    };

    info!("Opening variation database...");
    let database = match VariationDb::open(&settings.database_filename) {
        Ok(db) => db,
        Err(e) => {
            error!("Error while opening variation database: {e}");
            std::process::exit(exitcode::IOERR);
        }
    };

    let adaptor = database.source_adaptor();
    let result = match (settings.source_id, settings.source_name.as_deref()) {
        (Some(db_id), _) => adaptor.fetch_by_dbid(db_id).map(|s| vec![s]),
        (None, Some(name)) => adaptor.fetch_by_name(name).map(|s| vec![s]),
        (None, None) => adaptor.fetch_all()
    };
    let sources: Vec<Source> = match result {
        Ok(s) => s,
        Err(e) => {
            error!("Error while loading sources: {e}");
            std::process::exit(exitcode::DATAERR);
        }
    };
    info!("Loaded {} source(s).", sources.len());
    for source in sources.iter() {
        debug!("{source:?}");
    }

    let save_result = match settings.output_filename.as_deref() {
        Some(filename) => {
            info!("Saving sources to {filename:?}...");
            save_json(&sources, filename)
        },
        None => write_json(&sources, std::io::stdout().lock())
    };
    if let Err(e) = save_result {
        error!("Error while saving sources: {e:#}");
        std::process::exit(exitcode::IOERR);
    }

    info!("Source lookup completed in {} seconds.", start_time.elapsed().as_secs_f64());
}

fn run_haplotypes(settings: HaplotypeSettings) {
    // start the timer
    let start_time = Instant::now();

    // set up logging before we check the other settings
    init_logging(settings.verbosity);

    let settings = match check_haplotype_settings(settings) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while verifying settings: {e:#}");
            std::process::exit(exitcode::CONFIG);
        }
    };

    // create the primary output folder
    info!("Creating output folder at {:?}...", settings.output_folder);
    match std::fs::create_dir_all(&settings.output_folder) {
        Ok(()) => {},
        Err(e) => {
            error!("Error while creating output folder: {e}");
            std::process::exit(exitcode::IOERR);
        }
    }

    // save the CLI options
    let cli_json = settings.output_folder.join("cli_settings.json");
    info!("Saving CLI options to {cli_json:?}...");
    if let Err(e) = save_json(&settings, &cli_json) {
        error!("Error while saving CLI options: {e}");
        std::process::exit(exitcode::IOERR);
    }

    // build our report configuration
    let report_config = match ReportConfigBuilder::default()
        .min_frequency(settings.min_frequency)
        .skip_reference(settings.skip_reference)
        .build() {
        Ok(rc) => rc,
        Err(e) => {
            error!("Error while building report config: {e:?}");
            std::process::exit(exitcode::SOFTWARE);
        }
    };

    let summary_fn = settings.output_folder.join("protein_haplotypes.tsv");
    let mut summary_writer = match HaplotypeSummaryWriter::new(&summary_fn) {
        Ok(w) => w,
        Err(e) => {
            error!("Error while building haplotype summary writer: {e:#}");
            std::process::exit(exitcode::IOERR);
        }
    };

    let style = get_progress_style();
    info!("Annotating haplotypes...");
    let mut reports: Vec<TranscriptReport> = Vec::with_capacity(settings.input_filenames.len());
    for input_fn in settings.input_filenames.iter().progress_with_style(style) {
        debug!("Loading {input_fn:?}...");
        let container = match load_json::<ContainerInput>(input_fn)
            .and_then(TranscriptHaplotypeContainer::from_input) {
            Ok(c) => c,
            Err(e) => {
                error!("Error while loading {input_fn:?}: {e:#}");
                std::process::exit(exitcode::DATAERR);
            }
        };

        for haplotype in container.reported_protein_haplotypes(&report_config).iter() {
            if let Err(e) = summary_writer.write_haplotype(haplotype) {
                error!("Error while writing haplotype summary: {e:#}");
                std::process::exit(exitcode::IOERR);
            }
        }

        match TranscriptReport::from_container(&container, &report_config) {
            Ok(r) => reports.push(r),
            Err(e) => {
                error!("Error while building report for {}: {e:#}", container.transcript().stable_id());
                std::process::exit(exitcode::SOFTWARE);
            }
        };
    }

    if let Err(e) = summary_writer.flush() {
        error!("Error while saving haplotype summary: {e:#}");
        std::process::exit(exitcode::IOERR);
    }
    info!("Reported protein haplotypes: {}", summary_writer.rows_written());

    let report_fn = settings.output_folder.join("protein_haplotypes.json");
    info!("Saving haplotype report to {report_fn:?}...");
    if let Err(e) = save_json(&reports, &report_fn) {
        error!("Error while saving haplotype report: {e:#}");
        std::process::exit(exitcode::IOERR);
    }

    info!("Annotation completed in {} seconds.", start_time.elapsed().as_secs_f64());
}

fn main() {
    let cli = get_cli();
    match cli.command {
        Commands::Source(settings) => {
            run_source(*settings);
        },
        Commands::Haplotypes(settings) => {
            run_haplotypes(*settings);
        }
    }

    info!("Process finished successfully.");
}
