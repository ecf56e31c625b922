/*!
# Haplotypes module
CDS and protein haplotypes of a transcript, how they differ from the reference, and the annotations derived from those differences.
*/
/// CDS-specific haplotype with frameshift detection
pub mod cds_haplotype;
/// Collection of all haplotypes observed for a transcript
pub mod container;
/// Protein-specific haplotype with SIFT/PolyPhen annotation
pub mod protein_haplotype;
/// Fields and diff generation shared by all haplotype types
pub mod transcript_haplotype;
