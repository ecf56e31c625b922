
use anyhow::bail;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::util::translation::STOP_RESIDUE;

/// SIFT label that marks a substitution as deleterious
pub const SIFT_DELETERIOUS: &str = "deleterious";
/// PolyPhen label that marks a substitution as damaging
pub const POLYPHEN_PROBABLY_DAMAGING: &str = "probably damaging";

/// The deleteriousness predictors we annotate with
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize, strum_macros::AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PredictionTool {
    Sift,
    #[serde(rename = "polyphen")]
    #[strum(serialize = "polyphen")]
    PolyPhen
}

/// One cell of a prediction matrix, as it appears in input files
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PredictionEntry {
    /// 1-based protein position
    pub position: usize,
    /// Substituted amino acid
    pub residue: char,
    /// Qualitative prediction, e.g. "tolerated"
    #[serde(default)]
    pub prediction: Option<String>,
    /// Numerical score
    #[serde(default)]
    pub score: Option<f64>
}

/// The (label, score) stored for one position and residue
#[derive(Clone, Debug, Default, PartialEq)]
struct Prediction {
    label: Option<String>,
    score: Option<f64>
}

/// Position x residue lookup of predictions for a single tool and transcript
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(try_from = "Vec<PredictionEntry>")]
pub struct PredictionMatrix {
    /// Lookup from (1-based position, residue) to prediction
    predictions: FxHashMap<(usize, u8), Prediction>
}

impl TryFrom<Vec<PredictionEntry>> for PredictionMatrix {
    type Error = anyhow::Error;

    fn try_from(entries: Vec<PredictionEntry>) -> Result<Self, Self::Error> {
        let mut matrix = Self::default();
        for entry in entries {
            matrix.add_prediction(entry.position, entry.residue, entry.prediction, entry.score)?;
        }
        Ok(matrix)
    }
}

impl PredictionMatrix {
    /// Adds or replaces the prediction for a position and residue.
    /// # Arguments
    /// * `position` - 1-based protein position
    /// * `residue` - the substituted amino acid; case is normalized to upper
    /// * `label` - optional qualitative prediction
    /// * `score` - optional numerical score
    /// # Errors
    /// * if `residue` is not an amino acid letter or `*`
    pub fn add_prediction(&mut self, position: usize, residue: char, label: Option<String>, score: Option<f64>) -> anyhow::Result<()> {
        let residue = match u8::try_from(residue.to_ascii_uppercase()) {
            Ok(r) if r.is_ascii_uppercase() || r == STOP_RESIDUE => r,
            _ => bail!("invalid residue {residue:?} at position {position}")
        };
        self.predictions.insert((position, residue), Prediction { label, score });
        Ok(())
    }

    /// Returns the (label, score) for a substitution; either part may be absent.
    /// # Arguments
    /// * `position` - 1-based protein position
    /// * `residue` - the substituted amino acid
    pub fn get_prediction(&self, position: usize, residue: u8) -> (Option<&str>, Option<f64>) {
        match self.predictions.get(&(position, residue.to_ascii_uppercase())) {
            Some(prediction) => (prediction.label.as_deref(), prediction.score),
            None => (None, None)
        }
    }

    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }
}

/// The prediction matrices available for a transcript, iterated in tool order
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct PredictionMatrices {
    matrices: IndexMap<PredictionTool, PredictionMatrix>
}

impl PredictionMatrices {
    /// Registers the matrix for a tool, keeping the tools sorted
    pub fn insert(&mut self, tool: PredictionTool, matrix: PredictionMatrix) {
        self.matrices.insert(tool, matrix);
        self.matrices.sort_keys();
    }

    /// Returns the matrix for a tool if one was provided
    pub fn get(&self, tool: PredictionTool) -> Option<&PredictionMatrix> {
        self.matrices.get(&tool)
    }

    /// Iterates over all (tool, matrix) pairs in tool order (SIFT, then PolyPhen)
    pub fn iter(&self) -> impl Iterator<Item = (PredictionTool, &PredictionMatrix)> {
        self.matrices.iter().map(|(&tool, matrix)| (tool, matrix))
    }

    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    /// Restores tool order after deserialization, since input files may list tools in any order
    pub fn sorted(mut self) -> Self {
        self.matrices.sort_keys();
        self
    }
}
