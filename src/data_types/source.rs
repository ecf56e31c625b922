
use serde::Serialize;

/// Germline/somatic origin of the variants a source provides
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, strum_macros::AsRefStr, strum_macros::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SomaticStatus {
    #[default]
    Germline,
    Somatic,
    Mixed
}

/// Optional source category
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, strum_macros::AsRefStr, strum_macros::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SourceType {
    /// Genotyping chip
    Chip,
    /// Locus-specific database
    Lsdb
}

/// A provider of variation data, e.g. dbSNP or COSMIC.
/// Instances are created by a source adaptor and never modified afterwards.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Source {
    /// Primary key in the `source` table
    db_id: u64,
    /// Short name, e.g. "dbSNP"
    name: String,
    /// Release version, if the source is versioned
    version: Option<u32>,
    /// Free text description
    description: String,
    /// Homepage of the source
    url: Option<String>,
    /// Source category
    #[serde(rename = "type")]
    source_type: Option<SourceType>,
    /// Germline/somatic origin of the data
    somatic_status: SomaticStatus,
    /// The kinds of data this source provides, in stored order
    data_types: Vec<String>
}

impl Source {
    /// Constructor, mostly used by the storage layer
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        db_id: u64, name: String, version: Option<u32>, description: String, url: Option<String>,
        source_type: Option<SourceType>, somatic_status: SomaticStatus, data_types: Vec<String>
    ) -> Self {
        Self {
            db_id, name, version, description, url, source_type, somatic_status, data_types
        }
    }

    // getters
    pub fn db_id(&self) -> u64 {
        self.db_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<u32> {
        self.version
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn source_type(&self) -> Option<SourceType> {
        self.source_type
    }

    pub fn somatic_status(&self) -> SomaticStatus {
        self.somatic_status
    }

    pub fn data_types(&self) -> &[String] {
        &self.data_types
    }
}

/// The fields of a source that has not been stored yet
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewSource {
    pub name: String,
    pub version: Option<u32>,
    pub description: String,
    pub url: Option<String>,
    pub source_type: Option<SourceType>,
    pub somatic_status: SomaticStatus,
    pub data_types: Vec<String>
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_enum_strings() {
        assert_eq!(SomaticStatus::from_str("mixed").unwrap(), SomaticStatus::Mixed);
        assert_eq!(SomaticStatus::Somatic.as_ref(), "somatic");
        assert!(SomaticStatus::from_str("unknown").is_err());
        assert_eq!(SourceType::from_str("lsdb").unwrap(), SourceType::Lsdb);
        assert_eq!(SourceType::Chip.as_ref(), "chip");
    }

    #[test]
    fn test_serialize() {
        let source = Source::new(
            1, "dbSNP".to_string(), Some(138), "Variants (including SNPs and indels) imported from dbSNP".to_string(),
            Some("http://www.ncbi.nlm.nih.gov/projects/SNP/".to_string()), None, SomaticStatus::Mixed,
            vec!["variation".to_string(), "variation_synonym".to_string()]
        );
        let value = serde_json::to_value(&source).unwrap();
        assert_eq!(value["name"], "dbSNP");
        assert_eq!(value["version"], 138);
        assert_eq!(value["type"], serde_json::Value::Null);
        assert_eq!(value["somatic_status"], "mixed");
        assert_eq!(value["data_types"], serde_json::json!(["variation", "variation_synonym"]));
    }
}
