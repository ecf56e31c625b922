
use clap::Args;
use log::info;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::core::{check_required_filename, AFTER_HELP, FULL_VERSION};

#[derive(Args, Clone, Default, Serialize)]
#[clap(author, about,
    after_help = &**AFTER_HELP
)]
pub struct SourceSettings {
    #[clap(default_value = "")]
    #[clap(hide = true)]
    okapi_version: String,

    /// Variation database (SQLite)
    #[clap(required = true)]
    #[clap(short = 'd')]
    #[clap(long = "database")]
    #[clap(value_name = "DB")]
    #[clap(help_heading = Some("Input/Output"))]
    pub database_filename: PathBuf,

    /// Source ID to fetch [default: all sources]
    #[clap(long = "source-id")]
    #[clap(value_name = "ID")]
    #[clap(help_heading = Some("Query"))]
    #[clap(conflicts_with = "source_name")]
    pub source_id: Option<u64>,

    /// Source name to fetch [default: all sources]
    #[clap(long = "name")]
    #[clap(value_name = "NAME")]
    #[clap(help_heading = Some("Query"))]
    pub source_name: Option<String>,

    /// Output JSON file [default: stdout]
    #[clap(short = 'o')]
    #[clap(long = "output")]
    #[clap(value_name = "JSON")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_filename: Option<PathBuf>,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

pub fn check_source_settings(mut settings: SourceSettings) -> anyhow::Result<SourceSettings> {
    // hard code the version in
    settings.okapi_version = FULL_VERSION.clone();
    info!("Okapi version: {:?}", &settings.okapi_version);
    info!("Sub-command: source");
    info!("Inputs:");

    check_required_filename(&settings.database_filename, "Variation database")?;
    info!("\tDatabase: {:?}", &settings.database_filename);

    info!("Query:");
    match (settings.source_id, settings.source_name.as_deref()) {
        (Some(db_id), _) => info!("\tSource ID: {db_id}"),
        (None, Some(name)) => info!("\tSource name: {name:?}"),
        (None, None) => info!("\tAll sources")
    };

    info!("Outputs:");
    if let Some(filename) = settings.output_filename.as_deref() {
        info!("\tOutput: {filename:?}");
    } else {
        info!("\tOutput: stdout");
    }

    Ok(settings)
}
