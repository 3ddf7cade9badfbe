use crate::cli::ValidateArgs;
use crate::motif::{planted_starts, SamplerParams};
use crate::utils::{Result, SequenceSet};
use itertools::Itertools;

pub fn validate(args: ValidateArgs) -> Result<()> {
    let seqs = SequenceSet::from_path(&args.fasta_path)?;
    let lengths: Vec<usize> = seqs.iter().map(|seq| seq.len()).collect();
    let stats = calculate_stats(&lengths);

    log::info!("Sequences: {}", seqs.len());
    log::info!(
        "Sequence Lengths - Range: [{},{}], Median: {:.2}, Mean: {:.2}, StdDev: {:.2}",
        stats.min,
        stats.max,
        stats.median,
        stats.mean,
        stats.std_dev
    );
    if planted_starts(&seqs).is_some() {
        log::info!("All records carry planted motif starts");
    }

    let params = SamplerParams {
        motif_len: args.motif_len,
        ..Default::default()
    };
    params.validate(&seqs)?;
    let windows: usize = seqs.iter().map(|seq| seq.num_windows(args.motif_len)).sum();
    log::info!(
        "Validation successful. Motif length={}, candidate windows={}",
        args.motif_len,
        windows
    );
    Ok(())
}

/// Summary of sequence lengths; all zero for an empty set.
fn calculate_stats(lengths: &[usize]) -> Stats {
    let sorted: Vec<usize> = lengths.iter().copied().sorted_unstable().collect();
    let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
        return Stats::default();
    };
    let n = sorted.len() as f64;
    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) as f64 / 2.0
    } else {
        sorted[mid] as f64
    };
    let mean = sorted.iter().sum::<usize>() as f64 / n;
    let variance = sorted
        .iter()
        .map(|&len| (len as f64 - mean).powi(2))
        .sum::<f64>()
        / n;
    Stats {
        min,
        max,
        mean,
        median,
        std_dev: variance.sqrt(),
    }
}

#[derive(Debug, Default, PartialEq)]
struct Stats {
    min: usize,
    max: usize,
    mean: f64,
    median: f64,
    std_dev: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_stats_odd() {
        let stats = calculate_stats(&[5, 1, 3]);
        assert_eq!(stats.min, 1);
        assert_eq!(stats.max, 5);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.mean, 3.0);
        assert!((stats.std_dev - (8.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_calculate_stats_even_and_empty() {
        let stats = calculate_stats(&[4, 2, 10, 8]);
        assert_eq!(stats.median, 6.0);
        assert_eq!(stats.mean, 6.0);
        assert_eq!(calculate_stats(&[]), Stats::default());
    }
}
