
use anyhow::{ensure, Context};
use derive_builder::Builder;
use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;

use crate::data_types::predictions::PredictionMatrices;
use crate::data_types::transcript::{Transcript, TranscriptInput};
use crate::haplotypes::cds_haplotype::CdsHaplotype;
use crate::haplotypes::protein_haplotype::ProteinHaplotype;
use crate::haplotypes::transcript_haplotype::HaplotypeContext;
use crate::util::digest::md5_hex;

/// A single observed coding sequence, as it appears in input files
#[derive(Clone, Debug, Deserialize)]
pub struct HaplotypeInput {
    pub sequence: String,
    #[serde(default = "default_count")]
    pub count: u64
}

fn default_count() -> u64 {
    1
}

/// Everything needed to build a container, as it appears in input files
#[derive(Clone, Debug, Deserialize)]
pub struct ContainerInput {
    pub transcript: TranscriptInput,
    #[serde(default)]
    pub prediction_matrices: PredictionMatrices,
    #[serde(default)]
    pub haplotypes: Vec<HaplotypeInput>
}

/// Controls which protein haplotypes end up in a report
#[derive(Builder, Clone, Copy, Debug, Default)]
#[builder(default)]
pub struct ReportConfig {
    /// Haplotypes with a frequency below this are dropped
    min_frequency: f64,
    /// If true, the haplotype identical to the reference is dropped
    skip_reference: bool
}

impl ReportConfig {
    pub fn min_frequency(&self) -> f64 {
        self.min_frequency
    }

    pub fn skip_reference(&self) -> bool {
        self.skip_reference
    }
}

/// An observed coding sequence and how often it was seen
#[derive(Clone, Debug)]
struct CdsObservation {
    sequence: String,
    count: u64
}

/// All observed haplotypes of a single transcript, plus the reference data they are compared against
#[derive(Clone, Debug)]
pub struct TranscriptHaplotypeContainer {
    /// Shared reference data handed to every haplotype
    context: HaplotypeContext,
    /// Observed coding sequences keyed by hex, in first-seen order
    cds_observations: IndexMap<String, CdsObservation>
}

impl TranscriptHaplotypeContainer {
    /// Creates an empty container
    /// # Arguments
    /// * `transcript` - the reference transcript
    /// * `matrices` - SIFT/PolyPhen matrices for the transcript's protein
    pub fn new(transcript: Transcript, matrices: PredictionMatrices) -> Self {
        Self {
            context: HaplotypeContext::new(transcript, matrices),
            cds_observations: Default::default()
        }
    }

    /// Builds a container from parsed input
    /// # Errors
    /// * if any haplotype sequence is invalid
    pub fn from_input(input: ContainerInput) -> anyhow::Result<Self> {
        let transcript: Transcript = input.transcript.into();
        let mut container = Self::new(transcript, input.prediction_matrices.sorted());
        for (index, haplotype) in input.haplotypes.iter().enumerate() {
            container.add_cds_haplotype(&haplotype.sequence, haplotype.count)
                .with_context(|| format!("Error while adding haplotype #{index} to {}:", container.transcript().stable_id()))?;
        }
        Ok(container)
    }

    /// Records observations of a coding sequence; identical sequences are merged.
    /// # Arguments
    /// * `sequence` - the coding sequence, any case
    /// * `count` - number of observations to add
    /// # Errors
    /// * if the sequence contains anything other than A, C, G, T, or N
    pub fn add_cds_haplotype(&mut self, sequence: &str, count: u64) -> anyhow::Result<()> {
        let sequence = sequence.to_ascii_uppercase();
        ensure!(
            sequence.bytes().all(|b| matches!(b, b'A' | b'C' | b'G' | b'T' | b'N')),
            "CDS haplotype contains non-ACGTN characters: {sequence:?}"
        );

        let hex = md5_hex(&sequence);
        let entry = self.cds_observations.entry(hex)
            .or_insert_with(|| CdsObservation { sequence, count: 0 });
        entry.count += count;
        Ok(())
    }

    /// Total number of observations across all haplotypes
    pub fn total_count(&self) -> u64 {
        self.cds_observations.values().map(|o| o.count).sum()
    }

    /// Returns the CDS haplotypes, most frequent first (ties broken by hex).
    /// Each call builds fresh haplotypes, so cached diffs are per returned value.
    pub fn cds_haplotypes(&self) -> Vec<CdsHaplotype<'_>> {
        let total_count = self.total_count();
        let mut haplotypes: Vec<CdsHaplotype> = self.cds_observations.values()
            .map(|o| CdsHaplotype::new(&o.sequence, o.count, total_count, &self.context))
            .collect();
        haplotypes.sort_by(|a, b| {
            b.haplotype().count().cmp(&a.haplotype().count())
                .then_with(|| a.hex().cmp(b.hex()))
        });
        haplotypes
    }

    /// Returns the protein haplotypes, most frequent first (ties broken by hex).
    /// CDS haplotypes with the same translation are merged and their counts summed.
    pub fn protein_haplotypes(&self) -> Vec<ProteinHaplotype<'_>> {
        let total_count = self.total_count();
        let mut translated: IndexMap<String, u64> = IndexMap::new();
        for cds_haplotype in self.cds_haplotypes() {
            *translated.entry(cds_haplotype.translation()).or_insert(0) += cds_haplotype.haplotype().count();
        }
        debug!(
            "{}: {} CDS haplotypes translate to {} protein haplotypes",
            self.transcript().stable_id(), self.cds_observations.len(), translated.len()
        );

        let mut haplotypes: Vec<ProteinHaplotype> = translated.iter()
            .map(|(sequence, &count)| ProteinHaplotype::new(sequence, count, total_count, &self.context))
            .collect();
        haplotypes.sort_by(|a, b| {
            b.haplotype().count().cmp(&a.haplotype().count())
                .then_with(|| a.hex().cmp(b.hex()))
        });
        haplotypes
    }

    /// Looks up a protein haplotype by the hex digest of its sequence
    pub fn protein_haplotype_by_hex(&self, hex: &str) -> Option<ProteinHaplotype<'_>> {
        self.protein_haplotypes().into_iter()
            .find(|p| p.hex() == hex)
    }

    /// Returns the protein haplotypes that pass the report filters
    /// # Arguments
    /// * `config` - the report filters
    pub fn reported_protein_haplotypes(&self, config: &ReportConfig) -> Vec<ProteinHaplotype<'_>> {
        let reference = self.transcript().protein_sequence();
        self.protein_haplotypes().into_iter()
            .filter(|p| p.haplotype().frequency() >= config.min_frequency())
            .filter(|p| !(config.skip_reference() && p.haplotype().sequence() == reference))
            .collect()
    }

    pub fn transcript(&self) -> &Transcript {
        self.context.transcript()
    }

    pub fn context(&self) -> &HaplotypeContext {
        &self.context
    }
}
