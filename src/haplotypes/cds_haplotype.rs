
use serde::{Serialize, Serializer};
use serde::ser::SerializeStruct;
use std::cell::OnceCell;

use crate::data_types::diffs::{net_length_change, DiffToken, HaplotypeDiff};
use crate::haplotypes::transcript_haplotype::{HaplotypeContext, HaplotypeKind, TranscriptHaplotype};
use crate::util::translation::translate;

/// Conditions reported on a CDS haplotype
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, strum_macros::AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CdsFlag {
    /// The haplotype contains an insertion or deletion
    Indel,
    /// The indels shift the reading frame
    Frameshift
}

/// A distinct coding sequence observed for a transcript
#[derive(Clone, Debug)]
pub struct CdsHaplotype<'c> {
    haplotype: TranscriptHaplotype<'c>,
    diffs: OnceCell<Vec<HaplotypeDiff>>,
    flags: OnceCell<Vec<CdsFlag>>
}

impl<'c> CdsHaplotype<'c> {
    const FLAG_PREDICATES: [(CdsFlag, fn(&Self) -> bool); 2] = [
        (CdsFlag::Indel, Self::has_indel),
        (CdsFlag::Frameshift, Self::has_frameshift),
    ];

    /// Constructor
    /// # Arguments
    /// * `sequence` - the coding sequence of the haplotype
    /// * `count` - number of observations of this haplotype
    /// * `total_count` - number of observations across all haplotypes of the transcript
    /// * `context` - the shared transcript data
    pub fn new(sequence: &str, count: u64, total_count: u64, context: &'c HaplotypeContext) -> Self {
        Self {
            haplotype: TranscriptHaplotype::new(HaplotypeKind::Cds, sequence, count, total_count, context),
            diffs: OnceCell::new(),
            flags: OnceCell::new()
        }
    }

    /// The reference coding sequence of the transcript
    pub fn reference_seq(&self) -> &'c str {
        self.haplotype.reference_seq()
    }

    /// The protein this haplotype translates to
    pub fn translation(&self) -> String {
        translate(self.haplotype.sequence())
    }

    /// Returns all diffs relative to the reference CDS; these are never annotated
    pub fn get_all_diffs(&self) -> &[HaplotypeDiff] {
        self.diffs.get_or_init(|| {
            self.haplotype.raw_diffs().iter()
                .map(|raw| HaplotypeDiff::new(raw.clone()))
                .collect()
        })
    }

    /// Returns the flags that hold for this haplotype, in a fixed order
    pub fn get_all_flags(&self) -> &[CdsFlag] {
        self.flags.get_or_init(|| {
            Self::FLAG_PREDICATES.iter()
                .filter(|(_flag, predicate)| predicate(self))
                .map(|&(flag, _predicate)| flag)
                .collect()
        })
    }

    pub fn has_indel(&self) -> bool {
        self.haplotype.indel()
    }

    /// True if the combined length change of all indels is not a multiple of 3
    pub fn has_frameshift(&self) -> bool {
        let net_change: i64 = self.get_all_diffs().iter()
            .filter(|d| DiffToken::classify(d.diff()) == DiffToken::Indel)
            .map(|d| net_length_change(d.diff()))
            .sum();
        net_change % 3 != 0
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

impl Serialize for CdsHaplotype<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let flags = self.get_all_flags();
        let mut state = serializer.serialize_struct("CdsHaplotype", 8)?;
        self.haplotype.serialize_fields(&mut state)?;
        state.serialize_field("diffs", self.get_all_diffs())?;
        state.serialize_field("flags", flags)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::predictions::PredictionMatrices;
    use crate::data_types::transcript::Transcript;

    fn build_context() -> HaplotypeContext {
        // M K P L *
        let transcript = Transcript::from_cds("ENST_TEST".to_string(), "ATGAAACCCCTGTAA".to_string());
        HaplotypeContext::new(transcript, PredictionMatrices::default())
    }

    #[test]
    fn test_reference() {
        let context = build_context();
        let haplotype = CdsHaplotype::new("ATGAAACCCCTGTAA", 5, 5, &context);
        assert_eq!(haplotype.reference_seq(), "ATGAAACCCCTGTAA");
        assert_eq!(haplotype.translation(), "MKPL*");
        assert!(haplotype.get_all_diffs().is_empty());
        assert!(haplotype.get_all_flags().is_empty());
    }

    #[test]
    fn test_in_frame_deletion() {
        let context = build_context();
        let haplotype = CdsHaplotype::new("ATGCCCCTGTAA", 1, 2, &context);
        let raw: Vec<&str> = haplotype.get_all_diffs().iter().map(|d| d.diff()).collect();
        assert_eq!(raw, vec!["4AAA>---"]);
        assert_eq!(haplotype.get_all_flags(), &[CdsFlag::Indel]);
        assert_eq!(haplotype.translation(), "MPL*");
    }

    #[test]
    fn test_frameshift() {
        let context = build_context();
        let haplotype = CdsHaplotype::new("ATGAAACCCCGTAA", 1, 2, &context);
        let raw: Vec<&str> = haplotype.get_all_diffs().iter().map(|d| d.diff()).collect();
        assert_eq!(raw, vec!["11T>-"]);
        assert_eq!(haplotype.get_all_flags(), &[CdsFlag::Indel, CdsFlag::Frameshift]);
    }

    #[test]
    fn test_serialize() {
        let context = build_context();
        let haplotype = CdsHaplotype::new("ATGAAACCCCTGTAG", 1, 4, &context);
        let map = haplotype.to_map().unwrap();
        assert_eq!(map["type"], "cds");
        assert_eq!(map["frequency"], 0.25);
        assert_eq!(map["diffs"], serde_json::json!([{"diff": "15A>G"}]));
        assert_eq!(map["flags"], serde_json::json!([]));
    }
}
