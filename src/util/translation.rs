
/// Standard genetic code (NCBI table 1), indexed by 16*b1 + 4*b2 + b3 with T=0, C=1, A=2, G=3
const STANDARD_CODE: &[u8; 64] = b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";

/// Residue used for stop codons
pub const STOP_RESIDUE: u8 = b'*';
/// Residue used when a codon contains anything other than A, C, G, or T
pub const UNKNOWN_RESIDUE: u8 = b'X';

fn base_index(base: u8) -> Option<usize> {
    match base.to_ascii_uppercase() {
        b'T' | b'U' => Some(0),
        b'C' => Some(1),
        b'A' => Some(2),
        b'G' => Some(3),
        _ => None
    }
}

/// Translates a single codon, returning `X` for ambiguous codons.
/// # Arguments
/// * `codon` - exactly three bases
pub fn translate_codon(codon: &[u8; 3]) -> u8 {
    match (base_index(codon[0]), base_index(codon[1]), base_index(codon[2])) {
        (Some(b1), Some(b2), Some(b3)) => STANDARD_CODE[16*b1 + 4*b2 + b3],
        _ => UNKNOWN_RESIDUE
    }
}

/// Translates a coding sequence into protein.
/// Translation ends after the first stop codon, which is kept as `*`.
/// A trailing partial codon is ignored.
/// # Arguments
/// * `cds` - the coding sequence, starting in frame
pub fn translate(cds: &str) -> String {
    let mut protein: Vec<u8> = Vec::with_capacity(cds.len() / 3 + 1);
    for chunk in cds.as_bytes().chunks_exact(3) {
        let codon: [u8; 3] = [chunk[0], chunk[1], chunk[2]];
        let residue = translate_codon(&codon);
        protein.push(residue);
        if residue == STOP_RESIDUE {
            break;
        }
    }

    // every residue comes from the ASCII table above
    protein.into_iter().map(char::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_codon() {
        assert_eq!(translate_codon(b"ATG"), b'M');
        assert_eq!(translate_codon(b"TGG"), b'W');
        assert_eq!(translate_codon(b"TAA"), b'*');
        assert_eq!(translate_codon(b"TAG"), b'*');
        assert_eq!(translate_codon(b"TGA"), b'*');
        assert_eq!(translate_codon(b"GGC"), b'G');
        assert_eq!(translate_codon(b"atg"), b'M');
        assert_eq!(translate_codon(b"ANG"), b'X');
    }

    #[test]
    fn test_translate() {
        assert_eq!(translate("ATGAAACCCCTGTAA"), "MKPL*");
        // stops after the first stop codon
        assert_eq!(translate("ATGAAATAGCCC"), "MK*");
        // partial codon is dropped
        assert_eq!(translate("ATGAAACC"), "MK");
        assert_eq!(translate(""), "");
    }
}
