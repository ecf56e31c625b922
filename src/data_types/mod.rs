
/// Parsed diff tokens and annotated diff records
pub mod diffs;
/// SIFT/PolyPhen prediction matrices
pub mod predictions;
/// Variation sources, as loaded from the database
pub mod source;
/// Reference transcript sequences
pub mod transcript;
