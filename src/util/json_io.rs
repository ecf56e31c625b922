
use anyhow::Context;
use std::io::{BufWriter, Write};
use std::fs::File;
use std::path::Path;

/// Helper function that loads a JSON file into some type, helpful generic.
/// Gzip-compressed inputs are detected by the `.gz` extension.
/// # Arguments
/// * `filename` - the file path to open and parse
/// # Errors
/// * if the file does not open properly
/// * if the deserialization throws errors
pub fn load_json<T: serde::de::DeserializeOwned>(filename: &Path) -> anyhow::Result<T> {
    let fp: Box<dyn std::io::Read> = if filename.extension().unwrap_or_default() == "gz" {
        Box::new(
            flate2::read::MultiGzDecoder::new(
                File::open(filename)
                    .with_context(|| format!("Error while opening {filename:?}:"))?
            )
        )
    } else {
        Box::new(
            File::open(filename)
                .with_context(|| format!("Error while opening {filename:?}:"))?
        )
    };
    let result: T = serde_json::from_reader(std::io::BufReader::new(fp))
        .with_context(|| format!("Error while deserializing {filename:?}:"))?;
    Ok(result)
}

/// This will save a generic serializable struct to JSON, gzip-compressed if the path ends with `.gz`.
/// # Arguments
/// * `data` - the data in memory
/// * `out_filename` - user provided path to write to
/// # Errors
/// * if opening or writing to the file throw errors
/// * if JSON serialization throws errors
pub fn save_json<T: serde::Serialize>(data: &T, out_filename: &Path) -> anyhow::Result<()> {
    let file: Box<dyn std::io::Write> = if out_filename.extension().unwrap_or_default() == "gz" {
        Box::new(
            flate2::write::GzEncoder::new(
                File::create(out_filename)?,
                flate2::Compression::best()
            )
        )
    } else {
        Box::new(File::create(out_filename)?)
    };
    write_json(data, file)
        .with_context(|| format!("Error while saving {out_filename:?}:"))
}

/// Writes pretty JSON to any writer, e.g. stdout when no output file is given.
/// # Arguments
/// * `data` - the data in memory
/// * `handle` - the destination
pub fn write_json<T: serde::Serialize, W: Write>(data: &T, handle: W) -> anyhow::Result<()> {
    let mut writer = BufWriter::new(handle);
    serde_json::to_writer_pretty(&mut writer, data)
        .context("Error while serializing JSON:")?;
    writeln!(writer)?;
    writer.flush()
        .context("Error while flushing JSON output:")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_json_round_trip_gz() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let data: BTreeMap<String, u64> = [("a".to_string(), 1), ("b".to_string(), 2)].into_iter().collect();

        // plain and compressed outputs should both load back to the same data
        for filename in ["data.json", "data.json.gz"] {
            let path = tmp_dir.path().join(filename);
            save_json(&data, &path).unwrap();
            let loaded: BTreeMap<String, u64> = load_json(&path).unwrap();
            assert_eq!(loaded, data);
        }
    }

    #[test]
    fn test_load_missing() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let result: anyhow::Result<BTreeMap<String, u64>> = load_json(&tmp_dir.path().join("missing.json"));
        assert!(result.is_err());
    }
}
