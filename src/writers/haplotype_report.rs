
use serde::Serialize;

use crate::haplotypes::container::{ReportConfig, TranscriptHaplotypeContainer};

/// Structured output for a single transcript
#[derive(Clone, Debug, Serialize)]
pub struct TranscriptReport {
    /// Stable ID of the transcript
    transcript_id: String,
    /// Number of observations across all haplotypes
    total_count: u64,
    /// The reported protein haplotypes, as produced by their serialization hook
    protein_haplotypes: Vec<serde_json::Map<String, serde_json::Value>>
}

impl TranscriptReport {
    /// Builds the report for a container
    /// # Arguments
    /// * `container` - the haplotypes of one transcript
    /// * `config` - controls which protein haplotypes are included
    /// # Errors
    /// * if a haplotype fails to serialize
    pub fn from_container(container: &TranscriptHaplotypeContainer, config: &ReportConfig) -> serde_json::Result<Self> {
        let protein_haplotypes = container.reported_protein_haplotypes(config).iter()
            .map(|p| p.to_map())
            .collect::<serde_json::Result<Vec<_>>>()?;
        Ok(Self {
            transcript_id: container.transcript().stable_id().to_string(),
            total_count: container.total_count(),
            protein_haplotypes
        })
    }

    pub fn transcript_id(&self) -> &str {
        &self.transcript_id
    }

    pub fn protein_haplotypes(&self) -> &[serde_json::Map<String, serde_json::Value>] {
        &self.protein_haplotypes
    }
}
