
/// A single column of a pairwise alignment between a reference and an alternate sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlignmentColumn<T> {
    /// Both sequences share the residue
    Match(T),
    /// The residue differs; (reference, alternate)
    Mismatch(T, T),
    /// Reference residue is absent from the alternate
    Deletion(T),
    /// Alternate residue is absent from the reference
    Insertion(T)
}

/// Marks cells outside of the band
const UNREACHABLE: usize = usize::MAX;

/// Edit distance grid restricted to the diagonals within `band` of the main diagonal.
/// Rows are indexed by `reference` position and columns by `alternate` position, both offset by one.
/// Memory is O(n * band) instead of O(n * m).
struct BandedGrid {
    /// Maximum allowed |column - row| for a stored cell
    band: usize,
    /// Number of stored cells per row, always 2*`band`+1
    width: usize,
    /// Row-major storage; cell (i, j) lives at `i*width + (j + band - i)`
    values: Vec<usize>
}

impl BandedGrid {
    /// Fills the band for a pair of sequences
    /// # Arguments
    /// * `reference` - the first sequence
    /// * `alternate` - the second sequence
    /// * `band` - the band radius, must be at least the length difference of the sequences
    fn new<T: PartialEq>(reference: &[T], alternate: &[T], band: usize) -> Self {
        let width = 2*band + 1;
        let mut grid = Self {
            band, width,
            values: vec![UNREACHABLE; (reference.len()+1) * width]
        };

        for i in 0..=reference.len() {
            let first = i.saturating_sub(band);
            let last = alternate.len().min(i + band);
            for j in first..=last {
                let value = if i == 0 {
                    j
                } else if j == 0 {
                    i
                } else {
                    let diagonal = grid.get(i-1, j-1).saturating_add(usize::from(reference[i-1] != alternate[j-1]));
                    let deletion = grid.get(i-1, j).saturating_add(1);
                    let insertion = grid.get(i, j-1).saturating_add(1);
                    diagonal.min(deletion).min(insertion)
                };
                let index = grid.index(i, j);
                grid.values[index] = value;
            }
        }

        grid
    }

    fn index(&self, i: usize, j: usize) -> usize {
        i * self.width + (j + self.band - i)
    }

    /// Returns the cell value, or `UNREACHABLE` if it is outside the band
    fn get(&self, i: usize, j: usize) -> usize {
        if j + self.band < i || j > i + self.band {
            UNREACHABLE
        } else {
            self.values[self.index(i, j)]
        }
    }
}

/// Builds a banded grid that is guaranteed to contain an optimal alignment.
/// Any path touching diagonal `d` costs at least |d|, so a banded score no larger than the band is optimal.
/// Otherwise the band is doubled and the grid rebuilt, which keeps the work proportional to the edit distance.
fn optimal_banded_grid<T: PartialEq>(reference: &[T], alternate: &[T]) -> BandedGrid {
    let mut band = reference.len().abs_diff(alternate.len()).max(1);
    loop {
        let grid = BandedGrid::new(reference, alternate, band);
        let score = grid.get(reference.len(), alternate.len());
        if score <= band || band >= reference.len().max(alternate.len()) {
            return grid;
        }
        band *= 2;
    }
}

/// Globally aligns `alternate` against `reference` with unit costs and returns the alignment columns in order.
/// Ties in the traceback prefer deletions, then insertions, then the diagonal.
/// This keeps runs of gaps contiguous and shifted as far 3' as possible.
/// # Arguments
/// * `reference` - the reference sequence
/// * `alternate` - the sequence being described relative to `reference`
pub fn global_alignment<T: Copy + PartialEq>(reference: &[T], alternate: &[T]) -> Vec<AlignmentColumn<T>> {
    let grid = optimal_banded_grid(reference, alternate);
    let mut columns: Vec<AlignmentColumn<T>> = Vec::with_capacity(reference.len().max(alternate.len()));

    let mut i = reference.len();
    let mut j = alternate.len();
    while i > 0 || j > 0 {
        let current = grid.get(i, j);
        if i > 0 && grid.get(i-1, j).saturating_add(1) == current {
            columns.push(AlignmentColumn::Deletion(reference[i-1]));
            i -= 1;
        } else if j > 0 && grid.get(i, j-1).saturating_add(1) == current {
            columns.push(AlignmentColumn::Insertion(alternate[j-1]));
            j -= 1;
        } else {
            // neither gap explains the score, so this is a diagonal step and both i and j are > 0
            let c1 = reference[i-1];
            let c2 = alternate[j-1];
            columns.push(if c1 == c2 { AlignmentColumn::Match(c1) } else { AlignmentColumn::Mismatch(c1, c2) });
            i -= 1;
            j -= 1;
        }
    }

    columns.reverse();
    columns
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Number of non-matching columns, which equals the edit distance for an optimal alignment
    fn alignment_cost(reference: &[u8], alternate: &[u8]) -> usize {
        global_alignment(reference, alternate).iter()
            .filter(|c| !matches!(c, AlignmentColumn::Match(_)))
            .count()
    }

    #[test]
    fn test_alignment_cost() {
        let v1: Vec<u8> = vec![0, 1, 2, 4, 5];
        let v2: Vec<u8> = vec![0, 1, 3, 4, 5];
        let v3: Vec<u8> = vec![1, 2, 3, 5];
        let v4: Vec<u8> = vec![];

        assert_eq!(alignment_cost(&v1, &v1), 0);
        assert_eq!(alignment_cost(&v1, &v2), 1);
        assert_eq!(alignment_cost(&v1, &v3), 2);
        assert_eq!(alignment_cost(&v1, &v4), 5);
        assert_eq!(alignment_cost(&v2, &v3), 3);
        assert_eq!(alignment_cost(&v3, &v4), 4);
        assert_eq!(alignment_cost(&v4, &v4), 0);
    }

    #[test]
    fn test_alignment_deletion() {
        let columns = global_alignment(b"MKPL", b"MKL");
        assert_eq!(columns, vec![
            AlignmentColumn::Match(b'M'),
            AlignmentColumn::Match(b'K'),
            AlignmentColumn::Deletion(b'P'),
            AlignmentColumn::Match(b'L'),
        ]);
    }

    #[test]
    fn test_alignment_insertion() {
        let columns = global_alignment(b"MKL", b"MKQL");
        assert_eq!(columns, vec![
            AlignmentColumn::Match(b'M'),
            AlignmentColumn::Match(b'K'),
            AlignmentColumn::Insertion(b'Q'),
            AlignmentColumn::Match(b'L'),
        ]);
    }

    #[test]
    fn test_alignment_gap_shift() {
        // the deleted codon could be placed in several spots, it always lands on the 3' end
        let columns = global_alignment(b"AACCCCTGT", b"AACCCT");
        assert_eq!(columns[0..6], [
            AlignmentColumn::Match(b'A'),
            AlignmentColumn::Match(b'A'),
            AlignmentColumn::Match(b'C'),
            AlignmentColumn::Match(b'C'),
            AlignmentColumn::Match(b'C'),
            AlignmentColumn::Deletion(b'C'),
        ]);
    }

    #[test]
    fn test_alignment_mismatch_and_empty() {
        assert_eq!(global_alignment(b"MA", b"MV"), vec![
            AlignmentColumn::Match(b'M'),
            AlignmentColumn::Mismatch(b'A', b'V'),
        ]);
        assert_eq!(global_alignment(b"", b"MK"), vec![
            AlignmentColumn::Insertion(b'M'),
            AlignmentColumn::Insertion(b'K'),
        ]);
        assert_eq!(global_alignment(b"MK", b""), vec![
            AlignmentColumn::Deletion(b'M'),
            AlignmentColumn::Deletion(b'K'),
        ]);
        assert!(global_alignment(b"", b"").is_empty());
    }

    /// Plain full-grid edit distance to check the banded result against
    fn full_grid_cost(reference: &[u8], alternate: &[u8]) -> usize {
        let mut previous: Vec<usize> = (0..=alternate.len()).collect();
        for (i, &c1) in reference.iter().enumerate() {
            let mut current = vec![i+1; alternate.len()+1];
            for (j, &c2) in alternate.iter().enumerate() {
                current[j+1] = (previous[j] + usize::from(c1 != c2))
                    .min(previous[j+1] + 1)
                    .min(current[j] + 1);
            }
            previous = current;
        }
        previous[alternate.len()]
    }

    #[test]
    fn test_band_growth() {
        // these pairs need the band to grow past the length difference
        let pairs: [(&[u8], &[u8]); 4] = [
            (b"AAAA", b"TTTTA"),
            (b"ACGTACGT", b"TGCATGCA"),
            (b"MKPLQRST", b"STMKPLQR"),
            (b"A", b"TTTTTTTT"),
        ];
        for (reference, alternate) in pairs {
            assert_eq!(alignment_cost(reference, alternate), full_grid_cost(reference, alternate));
        }
    }

    #[test]
    fn test_long_single_deletion() {
        // 24 kb of non-repetitive-ish sequence with one base removed in the middle
        let reference: Vec<u8> = (0..24_000_u64)
            .map(|i| b"ACGT"[((i * 2_654_435_761) >> 7) as usize % 4])
            .collect();
        let mut alternate = reference.clone();
        alternate.remove(12_000);

        let columns = global_alignment(&reference, &alternate);
        assert_eq!(columns.len(), reference.len());
        let gaps: Vec<&AlignmentColumn<u8>> = columns.iter()
            .filter(|c| !matches!(c, AlignmentColumn::Match(_)))
            .collect();
        assert_eq!(gaps.len(), 1);
        assert!(matches!(gaps[0], AlignmentColumn::Deletion(_)));
    }

    #[test]
    fn test_char_alignment() {
        let reference: Vec<char> = "MKPL".chars().collect();
        let alternate: Vec<char> = "MKÞPL".chars().collect();
        assert_eq!(global_alignment(&reference, &alternate)[2], AlignmentColumn::Insertion('Þ'));
    }
}
