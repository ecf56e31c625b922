
use serde::Serialize;

use crate::data_types::predictions::PredictionTool;
use crate::util::translation::STOP_RESIDUE;

/// Character used for alignment gaps in diff tokens
pub const GAP_CHAR: char = '-';

/// Classification of a raw diff token such as "19P>L" or "3P>-"
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiffToken {
    /// Single residue change, `<position><ref>><alt>`
    Substitution {
        /// 1-based reference position
        position: usize,
        reference: u8,
        alternate: u8
    },
    /// Any token containing an alignment gap
    Indel,
    /// Anything else; these get passed through without annotation
    Other
}

fn is_residue(c: u8) -> bool {
    c.is_ascii_uppercase() || c == STOP_RESIDUE
}

impl DiffToken {
    /// Classifies a raw token.
    /// # Arguments
    /// * `raw` - the token, e.g. "19P>L"
    pub fn classify(raw: &str) -> Self {
        if raw.contains(GAP_CHAR) {
            return DiffToken::Indel;
        }

        let digits = raw.bytes().take_while(|c| c.is_ascii_digit()).count();
        let (position, rest) = raw.split_at(digits);
        match (position.parse::<usize>(), rest.as_bytes()) {
            (Ok(position), &[reference, b'>', alternate]) if is_residue(reference) && is_residue(alternate) => {
                DiffToken::Substitution { position, reference, alternate }
            },
            _ => DiffToken::Other
        }
    }
}

/// Net length change of a gapped token; e.g. "3P>-" is -1 and "3->QR" is +2.
/// Returns 0 for tokens without a `>` separator.
/// # Arguments
/// * `raw` - the token
pub fn net_length_change(raw: &str) -> i64 {
    let body = raw.trim_start_matches(|c: char| c.is_ascii_digit());
    match body.split_once('>') {
        Some((reference, alternate)) => {
            let ref_len = reference.chars().filter(|&c| c != GAP_CHAR).count() as i64;
            let alt_len = alternate.chars().filter(|&c| c != GAP_CHAR).count() as i64;
            alt_len - ref_len
        },
        None => 0
    }
}

/// A single difference between a haplotype and its reference, with any predictions attached
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct HaplotypeDiff {
    /// The raw diff token
    diff: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sift_prediction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sift_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    polyphen_prediction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    polyphen_score: Option<f64>
}

impl HaplotypeDiff {
    /// Creates an unannotated diff record
    pub fn new(diff: String) -> Self {
        Self {
            diff,
            ..Default::default()
        }
    }

    /// Attaches whichever parts of a prediction are present; absent parts leave the record untouched.
    /// # Arguments
    /// * `tool` - the predictor the values came from
    /// * `label` - optional qualitative prediction
    /// * `score` - optional numerical score
    pub fn set_prediction(&mut self, tool: PredictionTool, label: Option<&str>, score: Option<f64>) {
        let (label_field, score_field) = match tool {
            PredictionTool::Sift => (&mut self.sift_prediction, &mut self.sift_score),
            PredictionTool::PolyPhen => (&mut self.polyphen_prediction, &mut self.polyphen_score)
        };
        if let Some(label) = label {
            *label_field = Some(label.to_string());
        }
        if score.is_some() {
            *score_field = score;
        }
    }

    /// Returns the label for a given tool, if annotated
    pub fn prediction(&self, tool: PredictionTool) -> Option<&str> {
        match tool {
            PredictionTool::Sift => self.sift_prediction.as_deref(),
            PredictionTool::PolyPhen => self.polyphen_prediction.as_deref()
        }
    }

    /// Returns the score for a given tool, if annotated
    pub fn score(&self, tool: PredictionTool) -> Option<f64> {
        match tool {
            PredictionTool::Sift => self.sift_score,
            PredictionTool::PolyPhen => self.polyphen_score
        }
    }

    /// True if the raw token contains a stop residue
    pub fn has_stop(&self) -> bool {
        self.diff.contains(char::from(STOP_RESIDUE))
    }

    pub fn diff(&self) -> &str {
        &self.diff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(DiffToken::classify("19P>L"), DiffToken::Substitution { position: 19, reference: b'P', alternate: b'L' });
        assert_eq!(DiffToken::classify("45*>Q"), DiffToken::Substitution { position: 45, reference: b'*', alternate: b'Q' });
        assert_eq!(DiffToken::classify("3P>-"), DiffToken::Indel);
        assert_eq!(DiffToken::classify("3->QR"), DiffToken::Indel);
        // multi-residue and malformed tokens fall through
        assert_eq!(DiffToken::classify("12AB>CD"), DiffToken::Other);
        assert_eq!(DiffToken::classify("P>L"), DiffToken::Other);
        assert_eq!(DiffToken::classify("19p>l"), DiffToken::Other);
        assert_eq!(DiffToken::classify(""), DiffToken::Other);
    }

    #[test]
    fn test_net_length_change() {
        assert_eq!(net_length_change("3P>-"), -1);
        assert_eq!(net_length_change("3->QR"), 2);
        assert_eq!(net_length_change("10ACG>---"), -3);
        assert_eq!(net_length_change("19P>L"), 0);
        assert_eq!(net_length_change("junk"), 0);
    }

    #[test]
    fn test_set_prediction() {
        let mut diff = HaplotypeDiff::new("19P>L".to_string());
        diff.set_prediction(PredictionTool::Sift, Some("tolerated"), Some(0.8));
        diff.set_prediction(PredictionTool::PolyPhen, None, None);
        assert_eq!(diff.prediction(PredictionTool::Sift), Some("tolerated"));
        assert_eq!(diff.score(PredictionTool::Sift), Some(0.8));
        assert_eq!(diff.prediction(PredictionTool::PolyPhen), None);
        assert_eq!(diff.score(PredictionTool::PolyPhen), None);
        assert!(!diff.has_stop());

        // absent fields are not serialized
        let value = serde_json::to_value(&diff).unwrap();
        assert_eq!(value, serde_json::json!({"diff": "19P>L", "sift_prediction": "tolerated", "sift_score": 0.8}));
    }
}
