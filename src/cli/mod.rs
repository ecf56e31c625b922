/*!
# CLI module
Command line interface functionality that is specific to Okapi.
*/

/// The main CLI module that contains the top-level CLI parser and help text
pub mod core;
/// The haplotypes CLI subcommand
pub mod haplotypes;
/// The source CLI subcommand
pub mod source;
