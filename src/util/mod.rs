
/// Sequence digests used as haplotype identifiers
pub mod digest;
/// Helper functions for read/writing JSON via serde
pub mod json_io;
/// Helper functions for generating the progress bars
pub mod progress_bar;
/// Global alignment of two sequences into alignment columns
pub mod sequence_alignment;
/// Translation of coding sequence into protein using the standard genetic code
pub mod translation;
