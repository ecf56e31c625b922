
use serde::{Deserialize, Serialize};

use crate::util::translation::{translate, STOP_RESIDUE};

/// Reference sequences of a transcript that haplotypes are compared against
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Transcript {
    /// Stable identifier, e.g. ENST00000304494
    stable_id: String,
    /// Translateable (coding) sequence
    cds_sequence: String,
    /// Reference peptide
    protein_sequence: String
}

/// Transcript as it appears in input files; the peptide is optional and translated from the CDS if absent
#[derive(Clone, Debug, Deserialize)]
pub struct TranscriptInput {
    pub stable_id: String,
    pub cds_sequence: String,
    #[serde(default)]
    pub protein_sequence: Option<String>
}

impl From<TranscriptInput> for Transcript {
    fn from(input: TranscriptInput) -> Self {
        match input.protein_sequence {
            Some(protein_sequence) => Self::new(input.stable_id, input.cds_sequence, protein_sequence),
            None => Self::from_cds(input.stable_id, input.cds_sequence)
        }
    }
}

impl Transcript {
    /// Constructor with an explicit peptide; sequences are upper-cased.
    /// The peptide is stop-terminated whenever the CDS ends in a stop codon, matching translated haplotypes.
    pub fn new(stable_id: String, cds_sequence: String, protein_sequence: String) -> Self {
        let cds_sequence = cds_sequence.to_ascii_uppercase();
        let mut protein_sequence = protein_sequence.to_ascii_uppercase();
        let stop = char::from(STOP_RESIDUE);
        if !protein_sequence.ends_with(stop) && translate(&cds_sequence).ends_with(stop) {
            protein_sequence.push(stop);
        }
        Self {
            stable_id,
            cds_sequence,
            protein_sequence
        }
    }

    /// Constructor that translates the peptide from the coding sequence
    pub fn from_cds(stable_id: String, cds_sequence: String) -> Self {
        let cds_sequence = cds_sequence.to_ascii_uppercase();
        let protein_sequence = translate(&cds_sequence);
        Self {
            stable_id,
            cds_sequence,
            protein_sequence
        }
    }

    // getters
    pub fn stable_id(&self) -> &str {
        &self.stable_id
    }

    pub fn cds_sequence(&self) -> &str {
        &self.cds_sequence
    }

    pub fn protein_sequence(&self) -> &str {
        &self.protein_sequence
    }
}
