/*!
# Writers module
Contains the logic for writing the output files for the haplotypes command.
*/
/// Builds the per-transcript JSON report
pub mod haplotype_report;
/// Generates the tabular protein haplotype summary; each line corresponds to a haplotype
pub mod haplotype_summary;
