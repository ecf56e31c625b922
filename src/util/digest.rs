use md5::{Digest, Md5};

/// Computes the lower-case hex MD5 digest of a sequence.
/// This is the `hex` identifier that haplotypes are keyed on.
/// # Arguments
/// * `sequence` - the sequence to digest, used as-is (no case folding)
pub fn md5_hex(sequence: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(sequence.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_md5_hex() {
        assert_eq!(md5_hex(""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(md5_hex("abc"), "900150983cd24fb0d6963f7d28e17f72");
        // identical sequences always collapse to the same identifier
        assert_eq!(md5_hex("MKPL"), md5_hex(&String::from("MKPL")));
        assert_ne!(md5_hex("MKPL"), md5_hex("MKL"));
    }
}
