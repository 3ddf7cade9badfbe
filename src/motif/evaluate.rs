use crate::utils::SequenceSet;

/// Header tag carrying the true motif start of simulated records.
pub const PLANTED_START_KEY: &str = "motif_start=";

/// True motif starts parsed from the headers, if every record has one.
pub fn planted_starts(seqs: &SequenceSet) -> Option<Vec<usize>> {
    if seqs.is_empty() {
        return None;
    }
    seqs.iter()
        .map(|seq| {
            seq.description
                .split_whitespace()
                .find_map(|field| field.strip_prefix(PLANTED_START_KEY))
                .and_then(|value| value.parse::<usize>().ok())
        })
        .collect()
}

/// Number of discovered starts that overlap the planted motif.
pub fn count_recovered(found: &[usize], planted: &[usize], motif_len: usize) -> usize {
    found
        .iter()
        .zip(planted)
        .filter(|(found, planted)| found.abs_diff(**planted) < motif_len)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_planted_starts_all_present() {
        let data = ">s1 motif_start=4\nACGTACGTAC\n>s2 len=10 motif_start=0\nACGTACGTAC\n";
        let seqs = SequenceSet::from_reader(Cursor::new(data)).unwrap();
        assert_eq!(planted_starts(&seqs), Some(vec![4, 0]));
    }

    #[test]
    fn test_planted_starts_missing_or_invalid() {
        let data = ">s1 motif_start=4\nACGT\n>s2\nACGT\n";
        let seqs = SequenceSet::from_reader(Cursor::new(data)).unwrap();
        assert_eq!(planted_starts(&seqs), None);

        let data = ">s1 motif_start=x\nACGT\n";
        let seqs = SequenceSet::from_reader(Cursor::new(data)).unwrap();
        assert_eq!(planted_starts(&seqs), None);

        assert_eq!(planted_starts(&SequenceSet::default()), None);
    }

    #[test]
    fn test_count_recovered_counts_overlaps() {
        let planted = [10, 20, 30, 40];
        let found = [10, 24, 35, 0];
        assert_eq!(count_recovered(&found, &planted, 5), 2);
        assert_eq!(count_recovered(&found, &planted, 6), 3);
        assert_eq!(count_recovered(&[], &planted, 6), 0);
    }
}
