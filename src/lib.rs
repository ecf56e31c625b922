
/// Command line interface functionality
pub mod cli;
/// Contains various shared data types
pub mod data_types;
/// CDS and protein haplotypes of a transcript, with their diffs and flags
pub mod haplotypes;
/// Read and write access to the variation database
pub mod storage;
/// Various utility functions that tend to be very generic
pub mod util;
/// All output writers
pub mod writers;
