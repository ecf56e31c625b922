
use itertools::Itertools;
use serde::Serialize;
use std::fs::File;
use std::path::Path;

use crate::haplotypes::protein_haplotype::ProteinHaplotype;

/// Separator between flags and diffs inside a single column
const LIST_SEPARATOR: &str = ",";

/// This is a wrapper for writing out one line per protein haplotype
pub struct HaplotypeSummaryWriter {
    /// Handle on the writer
    csv_writer: csv::Writer<File>,
    /// Number of rows written so far
    rows_written: u64
}

/// Contains all the data written to each row of our summary file
#[derive(Serialize)]
struct HaplotypeSummaryRow<'a> {
    /// Stable ID of the transcript
    transcript_id: &'a str,
    /// MD5 of the protein sequence
    hex: &'a str,
    /// Number of observations
    count: u64,
    /// Fraction of all observations on the transcript
    frequency: f64,
    /// Comma separated flag names
    flags: String,
    /// Comma separated diff tokens
    diffs: String,
    mean_sift_score: Option<f64>,
    mean_polyphen_score: Option<f64>
}

impl<'a> HaplotypeSummaryRow<'a> {
    fn new(haplotype: &'a ProteinHaplotype) -> Self {
        let th = haplotype.haplotype();
        Self {
            transcript_id: th.context().transcript().stable_id(),
            hex: th.hex(),
            count: th.count(),
            frequency: th.frequency(),
            flags: haplotype.get_all_flags().iter().map(|f| f.as_ref()).join(LIST_SEPARATOR),
            diffs: haplotype.get_all_diffs().iter().map(|d| d.diff()).join(LIST_SEPARATOR),
            mean_sift_score: haplotype.mean_sift_score(),
            mean_polyphen_score: haplotype.mean_polyphen_score()
        }
    }
}

impl HaplotypeSummaryWriter {
    /// Creates a new writer
    /// # Arguments
    /// * `filename` - path to the filename that will get opened, must be .csv/.tsv
    pub fn new(filename: &Path) -> csv::Result<Self> {
        // modify the delimiter to "," if it ends with .csv
        let is_csv: bool = filename.extension().unwrap_or_default() == "csv";
        let delimiter: u8 = if is_csv { b',' } else { b'\t' };
        let csv_writer: csv::Writer<File> = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_path(filename)?;
        Ok(Self {
            csv_writer,
            rows_written: 0
        })
    }

    /// Writes a single protein haplotype
    pub fn write_haplotype(&mut self, haplotype: &ProteinHaplotype) -> csv::Result<()> {
        self.csv_writer.serialize(HaplotypeSummaryRow::new(haplotype))?;
        self.rows_written += 1;
        Ok(())
    }

    /// Flushes anything buffered to disk
    pub fn flush(&mut self) -> std::io::Result<()> {
        self.csv_writer.flush()
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::predictions::{PredictionMatrices, PredictionMatrix, PredictionTool};
    use crate::data_types::transcript::Transcript;
    use crate::haplotypes::transcript_haplotype::HaplotypeContext;

    #[test]
    fn test_write_haplotypes() {
        let transcript = Transcript::from_cds("ENST_TEST".to_string(), "ATGAAACCCCTGTAA".to_string());
        let mut sift = PredictionMatrix::default();
        sift.add_prediction(4, 'V', Some("deleterious".to_string()), Some(0.01)).unwrap();
        let mut matrices = PredictionMatrices::default();
        matrices.insert(PredictionTool::Sift, sift);
        let context = HaplotypeContext::new(transcript, matrices);

        let reference = ProteinHaplotype::new("MKPL*", 3, 4, &context);
        let missense = ProteinHaplotype::new("MRPV*", 1, 4, &context);

        let tmp_dir = tempfile::tempdir().unwrap();
        let out_fn = tmp_dir.path().join("summary.tsv");
        let mut writer = HaplotypeSummaryWriter::new(&out_fn).unwrap();
        writer.write_haplotype(&reference).unwrap();
        writer.write_haplotype(&missense).unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.rows_written(), 2);

        let contents = std::fs::read_to_string(&out_fn).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "transcript_id\thex\tcount\tfrequency\tflags\tdiffs\tmean_sift_score\tmean_polyphen_score");
        let fields: Vec<&str> = lines[2].split('\t').collect();
        assert_eq!(fields[0], "ENST_TEST");
        assert_eq!(fields[2], "1");
        assert_eq!(fields[3], "0.25");
        assert_eq!(fields[4], "deleterious_sift_or_polyphen");
        assert_eq!(fields[5], "2K>R,4L>V");
        assert_eq!(fields[6], "0.01");
        assert_eq!(fields[7], "");
    }
}
