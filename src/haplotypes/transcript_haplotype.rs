
use log::trace;
use serde::Serialize;
use serde::ser::SerializeStruct;
use std::cell::OnceCell;

use crate::data_types::diffs::{DiffToken, GAP_CHAR};
use crate::data_types::predictions::PredictionMatrices;
use crate::data_types::transcript::Transcript;
use crate::util::digest::md5_hex;
use crate::util::sequence_alignment::{global_alignment, AlignmentColumn};
use crate::util::translation::STOP_RESIDUE;

/// Discriminates the sequence space a haplotype lives in
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, strum_macros::AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HaplotypeKind {
    /// Coding sequence, nucleotide alphabet
    Cds,
    /// Translated peptide, amino acid alphabet
    Protein
}

/// Read-only data shared by every haplotype of a transcript.
/// Haplotypes borrow this, so it cannot change once any haplotype exists.
#[derive(Clone, Debug)]
pub struct HaplotypeContext {
    transcript: Transcript,
    matrices: PredictionMatrices
}

impl HaplotypeContext {
    pub fn new(transcript: Transcript, matrices: PredictionMatrices) -> Self {
        Self {
            transcript,
            matrices
        }
    }

    /// Returns the reference sequence for a given haplotype type
    pub fn reference_sequence(&self, kind: HaplotypeKind) -> &str {
        match kind {
            HaplotypeKind::Cds => self.transcript.cds_sequence(),
            HaplotypeKind::Protein => self.transcript.protein_sequence()
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn matrices(&self) -> &PredictionMatrices {
        &self.matrices
    }
}

/// Fields and behavior shared by CDS and protein haplotypes
#[derive(Clone, Debug)]
pub struct TranscriptHaplotype<'c> {
    /// The sequence space of this haplotype
    kind: HaplotypeKind,
    /// Full haplotype sequence
    sequence: String,
    /// MD5 hex digest of `sequence`
    hex: String,
    /// True if the haplotype contains an insertion or deletion relative to the reference
    indel: bool,
    /// Number of times this haplotype was observed
    count: u64,
    /// `count` as a fraction of all observations on the transcript
    frequency: f64,
    /// Shared transcript data
    context: &'c HaplotypeContext,
    /// Raw diff tokens relative to the reference, filled on first use
    raw_diffs: OnceCell<Vec<String>>
}

impl<'c> TranscriptHaplotype<'c> {
    /// Constructor
    /// # Arguments
    /// * `kind` - CDS or protein
    /// * `sequence` - the haplotype sequence, upper-cased on the way in
    /// * `count` - number of observations of this haplotype
    /// * `total_count` - number of observations across all haplotypes of the transcript
    /// * `context` - the shared transcript data
    pub fn new(kind: HaplotypeKind, sequence: &str, count: u64, total_count: u64, context: &'c HaplotypeContext) -> Self {
        let sequence = sequence.to_ascii_uppercase();
        let hex = md5_hex(&sequence);
        // equal lengths are compared position-wise, so only a length change can introduce gaps
        let indel = sequence.chars().count() != context.reference_sequence(kind).chars().count();
        let frequency = if total_count > 0 {
            count as f64 / total_count as f64
        } else {
            0.0
        };

        Self {
            kind, sequence, hex, indel, count, frequency, context,
            raw_diffs: OnceCell::new()
        }
    }

    /// Replaces the computed diffs with tokens from an external aligner.
    /// The indel status is re-derived from the provided tokens.
    /// # Arguments
    /// * `raw_diffs` - ordered diff tokens
    pub fn with_raw_diffs(mut self, raw_diffs: Vec<String>) -> Self {
        self.indel = raw_diffs.iter().any(|d| DiffToken::classify(d) == DiffToken::Indel);
        self.raw_diffs = OnceCell::from(raw_diffs);
        self
    }

    /// The reference this haplotype is compared against
    pub fn reference_seq(&self) -> &'c str {
        self.context.reference_sequence(self.kind)
    }

    /// Raw diff tokens relative to the reference, computed on first access
    pub fn raw_diffs(&self) -> &[String] {
        self.raw_diffs.get_or_init(|| {
            let diffs = compute_raw_diffs(self.reference_seq(), &self.sequence);
            trace!("{} {:?} haplotype {}: {} raw diffs", self.context.transcript().stable_id(), self.kind, self.hex, diffs.len());
            diffs
        })
    }

    /// Writes the shared public fields into a serialized struct
    pub(crate) fn serialize_fields<S: SerializeStruct>(&self, state: &mut S) -> Result<(), S::Error> {
        state.serialize_field("type", &self.kind)?;
        state.serialize_field("hex", &self.hex)?;
        state.serialize_field("sequence", &self.sequence)?;
        state.serialize_field("indel", &self.indel)?;
        state.serialize_field("count", &self.count)?;
        state.serialize_field("frequency", &self.frequency)?;
        Ok(())
    }

    // getters
    pub fn kind(&self) -> HaplotypeKind {
        self.kind
    }

    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    pub fn hex(&self) -> &str {
        &self.hex
    }

    pub fn indel(&self) -> bool {
        self.indel
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn context(&self) -> &'c HaplotypeContext {
        self.context
    }
}

/// Tracks a run of consecutive gapped alignment columns that becomes a single token
#[derive(Default)]
struct GapRun {
    /// 1-based reference position of the first column
    position: usize,
    reference: String,
    alternate: String
}

impl GapRun {
    fn push(&mut self, position: usize, reference: char, alternate: char) {
        if self.reference.is_empty() {
            self.position = position;
        }
        self.reference.push(reference);
        self.alternate.push(alternate);
    }

    fn flush(&mut self, diffs: &mut Vec<String>) {
        if !self.reference.is_empty() {
            diffs.push(format!("{}{}>{}", self.position, self.reference, self.alternate));
            self.reference.clear();
            self.alternate.clear();
        }
    }
}

/// Describes `sequence` relative to `reference` as ordered diff tokens.
/// Same-length sequences are compared position by position, otherwise the sequences are globally aligned.
/// A sequence ending in a stop where the reference has none is reported as a truncation when that takes fewer
/// edits than the alignment: substitutions up to the stop, the stop as a substitution, then a deletion of the
/// remaining reference.
/// # Arguments
/// * `reference` - the reference sequence
/// * `sequence` - the haplotype sequence
pub fn compute_raw_diffs(reference: &str, sequence: &str) -> Vec<String> {
    let ref_residues: Vec<char> = reference.chars().collect();
    let seq_residues: Vec<char> = sequence.chars().collect();

    if ref_residues.len() == seq_residues.len() {
        return substitution_diffs(&ref_residues, &seq_residues);
    }

    let columns = global_alignment(&ref_residues, &seq_residues);
    let alignment_cost = columns.iter()
        .filter(|c| !matches!(c, AlignmentColumn::Match(_)))
        .count();

    let stop = char::from(STOP_RESIDUE);
    if seq_residues.len() < ref_residues.len() && seq_residues.last() == Some(&stop) {
        let stop_index = seq_residues.len() - 1;
        if ref_residues[stop_index] != stop {
            let mut diffs = substitution_diffs(&ref_residues[..stop_index], &seq_residues[..stop_index]);
            if diffs.len() + 1 < alignment_cost {
                diffs.push(format!("{}{}>{}", stop_index+1, ref_residues[stop_index], stop));
                let mut gap_run = GapRun::default();
                for (offset, &r) in ref_residues[stop_index+1..].iter().enumerate() {
                    gap_run.push(stop_index+2+offset, r, GAP_CHAR);
                }
                gap_run.flush(&mut diffs);
                return diffs;
            }
        }
    }

    let mut diffs: Vec<String> = vec![];
    let mut gap_run = GapRun::default();
    // number of reference residues consumed so far
    let mut ref_offset: usize = 0;
    for column in columns {
        match column {
            AlignmentColumn::Match(_) => {
                gap_run.flush(&mut diffs);
                ref_offset += 1;
            },
            AlignmentColumn::Mismatch(r, s) => {
                gap_run.flush(&mut diffs);
                diffs.push(format!("{}{}>{}", ref_offset+1, r, s));
                ref_offset += 1;
            },
            AlignmentColumn::Deletion(r) => {
                gap_run.push(ref_offset+1, r, GAP_CHAR);
                ref_offset += 1;
            },
            AlignmentColumn::Insertion(s) => {
                gap_run.push(ref_offset+1, GAP_CHAR, s);
            }
        }
    }
    gap_run.flush(&mut diffs);

    diffs
}

/// Position-wise substitutions between two equal-length residue runs
fn substitution_diffs(reference: &[char], sequence: &[char]) -> Vec<String> {
    reference.iter().zip(sequence.iter())
        .enumerate()
        .filter(|(_i, (r, s))| r != s)
        .map(|(i, (r, s))| format!("{}{}>{}", i+1, r, s))
        .collect()
}
