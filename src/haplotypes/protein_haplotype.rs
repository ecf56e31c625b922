
use anyhow::ensure;
use log::{debug, trace};
use serde::{Serialize, Serializer};
use serde::ser::SerializeStruct;
use std::cell::OnceCell;

use crate::data_types::diffs::{DiffToken, HaplotypeDiff};
use crate::data_types::predictions::{PredictionTool, POLYPHEN_PROBABLY_DAMAGING, SIFT_DELETERIOUS};
use crate::haplotypes::transcript_haplotype::{HaplotypeContext, HaplotypeKind, TranscriptHaplotype};

/// Conditions reported on a protein haplotype
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, strum_macros::AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProteinFlag {
    /// At least one substitution is called deleterious by SIFT or probably damaging by PolyPhen
    DeleteriousSiftOrPolyphen,
    /// At least one diff gains or loses a stop
    StopChange,
    /// The haplotype contains an insertion or deletion
    Indel
}

/// A distinct translated sequence observed for a transcript
#[derive(Clone, Debug)]
pub struct ProteinHaplotype<'c> {
    /// Shared haplotype fields, always of kind Protein
    haplotype: TranscriptHaplotype<'c>,
    /// Annotated diffs, filled on first use
    diffs: OnceCell<Vec<HaplotypeDiff>>,
    /// Flags that hold, filled on first use
    flags: OnceCell<Vec<ProteinFlag>>
}

impl<'c> ProteinHaplotype<'c> {
    /// Flags are evaluated in this order and reported in this order
    const FLAG_PREDICATES: [(ProteinFlag, fn(&Self) -> bool); 3] = [
        (ProteinFlag::DeleteriousSiftOrPolyphen, Self::has_deleterious_sift_or_polyphen),
        (ProteinFlag::StopChange, Self::has_stop_change),
        (ProteinFlag::Indel, Self::has_indel),
    ];

    /// Constructor
    /// # Arguments
    /// * `sequence` - the translated haplotype sequence
    /// * `count` - number of observations of this haplotype
    /// * `total_count` - number of observations across all haplotypes of the transcript
    /// * `context` - the shared transcript data
    pub fn new(sequence: &str, count: u64, total_count: u64, context: &'c HaplotypeContext) -> Self {
        Self::wrap(TranscriptHaplotype::new(HaplotypeKind::Protein, sequence, count, total_count, context))
    }

    /// Wraps an existing generic haplotype.
    /// # Errors
    /// * if `haplotype` is not a protein haplotype
    pub fn from_haplotype(haplotype: TranscriptHaplotype<'c>) -> anyhow::Result<Self> {
        ensure!(
            haplotype.kind() == HaplotypeKind::Protein,
            "ProteinHaplotype requires a protein haplotype, found {}", haplotype.kind().as_ref()
        );
        Ok(Self::wrap(haplotype))
    }

    fn wrap(haplotype: TranscriptHaplotype<'c>) -> Self {
        Self {
            haplotype,
            diffs: OnceCell::new(),
            flags: OnceCell::new()
        }
    }

    /// The reference peptide of the transcript
    pub fn reference_seq(&self) -> &'c str {
        self.haplotype.reference_seq()
    }

    /// Returns all diffs relative to the reference, annotated with SIFT and PolyPhen where possible.
    /// Substitutions after the first indel are left unannotated.
    pub fn get_all_diffs(&self) -> &[HaplotypeDiff] {
        self.diffs.get_or_init(|| self.annotate_diffs())
    }

    fn annotate_diffs(&self) -> Vec<HaplotypeDiff> {
        let reference_len = self.reference_seq().chars().count();
        let matrices = self.haplotype.context().matrices();
        let mut indel_seen = false;

        self.haplotype.raw_diffs().iter()
            .map(|raw| {
                let mut diff = HaplotypeDiff::new(raw.clone());
                match DiffToken::classify(raw) {
                    DiffToken::Substitution { position, alternate, .. } if !indel_seen => {
                        if (1..=reference_len).contains(&position) {
                            for (tool, matrix) in matrices.iter() {
                                let (label, score) = matrix.get_prediction(position, alternate);
                                trace!("{raw} {}: {label:?} {score:?}", tool.as_ref());
                                diff.set_prediction(tool, label, score);
                            }
                        }
                    },
                    DiffToken::Substitution { .. } => {
                        trace!("Skipping predictions for {raw}, downstream of an indel");
                    },
                    DiffToken::Indel => {
                        indel_seen = true;
                    },
                    DiffToken::Other => {}
                }
                diff
            })
            .collect()
    }

    /// Returns the flags that hold for this haplotype, in a fixed order
    pub fn get_all_flags(&self) -> &[ProteinFlag] {
        self.flags.get_or_init(|| {
            let flags: Vec<ProteinFlag> = Self::FLAG_PREDICATES.iter()
                .filter(|(_flag, predicate)| predicate(self))
                .map(|&(flag, _predicate)| flag)
                .collect();
            debug!("Protein haplotype {} flags: {flags:?}", self.haplotype.hex());
            flags
        })
    }

    /// True if any substitution is deleterious according to SIFT or probably damaging according to PolyPhen
    pub fn has_deleterious_sift_or_polyphen(&self) -> bool {
        self.get_all_diffs().iter().any(|d| {
            d.prediction(PredictionTool::Sift) == Some(SIFT_DELETERIOUS) ||
            d.prediction(PredictionTool::PolyPhen) == Some(POLYPHEN_PROBABLY_DAMAGING)
        })
    }

    /// True if any diff involves a stop residue
    pub fn has_stop_change(&self) -> bool {
        self.get_all_diffs().iter().any(|d| d.has_stop())
    }

    pub fn has_indel(&self) -> bool {
        self.haplotype.indel()
    }

    /// Mean SIFT score across scored diffs; None if no diff has a SIFT score
    pub fn mean_sift_score(&self) -> Option<f64> {
        self.mean_score(PredictionTool::Sift)
    }

    /// Mean PolyPhen score across scored diffs; None if no diff has a PolyPhen score
    pub fn mean_polyphen_score(&self) -> Option<f64> {
        self.mean_score(PredictionTool::PolyPhen)
    }

    fn mean_score(&self, tool: PredictionTool) -> Option<f64> {
        let scores: Vec<f64> = self.get_all_diffs().iter()
            .filter_map(|d| d.score(tool))
            .collect();
        if scores.is_empty() {
            None
        } else {
            Some(scores.iter().sum::<f64>() / scores.len() as f64)
        }
    }

    /// Returns the serialized public fields as a JSON object
    pub fn to_map(&self) -> serde_json::Result<serde_json::Map<String, serde_json::Value>> {
        match serde_json::to_value(self)? {
            serde_json::Value::Object(map) => Ok(map),
            other => Err(serde::ser::Error::custom(format!("expected a JSON object, found {other}")))
        }
    }

    /// Access to the shared haplotype fields
    pub fn haplotype(&self) -> &TranscriptHaplotype<'c> {
        &self.haplotype
    }

    pub fn hex(&self) -> &str {
        self.haplotype.hex()
    }
}

impl Serialize for ProteinHaplotype<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // flags pull in the diffs, so both are populated before anything is written
        let flags = self.get_all_flags();
        let mut state = serializer.serialize_struct("ProteinHaplotype", 8)?;
        self.haplotype.serialize_fields(&mut state)?;
        state.serialize_field("diffs", self.get_all_diffs())?;
        state.serialize_field("flags", flags)?;
        state.end()
    }
}
