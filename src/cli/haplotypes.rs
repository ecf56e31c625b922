
use anyhow::{bail, ensure};
use clap::Args;
use log::info;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::core::{check_required_filename, AFTER_HELP, FULL_VERSION};

#[derive(Args, Clone, Default, Serialize)]
#[clap(author, about,
    after_help = &**AFTER_HELP
)]
pub struct HaplotypeSettings {
    #[clap(default_value = "")]
    #[clap(hide = true)]
    okapi_version: String,

    /// Transcript haplotype input file(s), JSON (optionally gzipped)
    #[clap(required = true)]
    #[clap(short = 'i')]
    #[clap(long = "input")]
    #[clap(value_name = "JSON")]
    #[clap(help_heading = Some("Input/Output"))]
    #[clap(num_args = 1..)]
    pub input_filenames: Vec<PathBuf>,

    /// Output directory containing the JSON report and summary
    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output-dir")]
    #[clap(value_name = "DIR")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_folder: PathBuf,

    /// Protein haplotypes below this frequency are not reported
    #[clap(long = "min-frequency")]
    #[clap(value_name = "FLOAT")]
    #[clap(help_heading = Some("Report filters"))]
    #[clap(default_value = "0.0")]
    pub min_frequency: f64,

    /// Skips the protein haplotype that matches the reference
    #[clap(long = "skip-reference")]
    #[clap(help_heading = Some("Report filters"))]
    pub skip_reference: bool,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

pub fn check_haplotype_settings(mut settings: HaplotypeSettings) -> anyhow::Result<HaplotypeSettings> {
    // hard code the version in
    settings.okapi_version = FULL_VERSION.clone();
    info!("Okapi version: {:?}", &settings.okapi_version);
    info!("Sub-command: haplotypes");
    info!("Inputs:");

    if settings.input_filenames.is_empty() {
        bail!("at least one --input file is required");
    }
    for filename in settings.input_filenames.iter() {
        check_required_filename(filename, "Input JSON")?;
        info!("\tInput: {filename:?}");
    }

    info!("Outputs:");
    info!("\tOutput folder: {:?}", &settings.output_folder);

    info!("Report filters:");
    ensure!(
        (0.0..=1.0).contains(&settings.min_frequency),
        "--min-frequency must be in the range [0, 1]"
    );
    info!("\tMinimum frequency: {}", settings.min_frequency);
    info!("\tSkip reference: {}", if settings.skip_reference { "ENABLED" } else { "DISABLED" });

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_haplotype_settings() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let input_fn = tmp_dir.path().join("input.json");
        std::fs::write(&input_fn, "{}").unwrap();

        let settings = HaplotypeSettings {
            input_filenames: vec![input_fn.clone()],
            output_folder: tmp_dir.path().join("out"),
            min_frequency: 0.1,
            ..Default::default()
        };
        let checked = check_haplotype_settings(settings.clone()).unwrap();
        assert_eq!(checked.okapi_version, *FULL_VERSION);

        let bad_frequency = HaplotypeSettings {
            min_frequency: 1.5,
            ..settings.clone()
        };
        assert!(check_haplotype_settings(bad_frequency).is_err());

        let missing_input = HaplotypeSettings {
            input_filenames: vec![tmp_dir.path().join("missing.json")],
            ..settings
        };
        assert!(check_haplotype_settings(missing_input).is_err());
    }
}
