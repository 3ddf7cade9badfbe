//! Log-space scoring of motif instances against a count model.
//!
//! Scores are computed from raw counts: the sum of `ln(count)` over the
//! motif offsets minus `k` times the log of the count mass per row. The
//! mass differs depending on whether the scored sequence is part of the
//! model, hence the two denominators.

use super::pwm::Pwm;
use crate::utils::{Sequence, SequenceSet};

/// Log count mass per row with all `N` instances in the model (`big`) and
/// with one instance withheld (`small`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Denominators {
    pub big: f64,
    pub small: f64,
}

impl Denominators {
    pub fn new(num_sequences: usize, pseudocount: f64) -> Self {
        let n = num_sequences as f64;
        Denominators {
            big: (n + 4.0 * pseudocount).ln(),
            small: (n - 1.0 + 4.0 * pseudocount).ln(),
        }
    }
}

/// Log-likelihood of the instance of `seq` starting at `start`.
#[inline]
pub fn log_prob_of_instance(pwm: &Pwm, seq: &Sequence, start: usize, log_denominator: f64) -> f64 {
    let k = pwm.motif_len();
    let window = &seq.codes()[start..start + k];
    let log_counts: f64 = window
        .iter()
        .enumerate()
        .map(|(offset, &base)| {
            let count = pwm.count(offset, base);
            debug_assert!(count > 0.0, "count at offset {} dropped to {}", offset, count);
            count.ln()
        })
        .sum();
    log_counts - k as f64 * log_denominator
}

/// Sum of instance log-likelihoods over the whole assignment.
pub fn log_likelihood_of_assignment(
    pwm: &Pwm,
    starts: &[usize],
    seqs: &SequenceSet,
    log_denominator: f64,
) -> f64 {
    debug_assert_eq!(starts.len(), seqs.len());
    seqs.iter()
        .zip(starts)
        .map(|(seq, &start)| log_prob_of_instance(pwm, seq, start, log_denominator))
        .sum()
}

#[inline]
fn sum_log_probs(a: f64, b: f64) -> f64 {
    let (hi, lo) = if a > b { (a, b) } else { (b, a) };
    if hi == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }
    hi + (lo - hi).exp().ln_1p()
}

/// `ln(Σ exp(v))` folded pairwise; negative infinity for an empty slice.
pub fn log_sum_exp(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .reduce(sum_log_probs)
        .unwrap_or(f64::NEG_INFINITY)
}

/// Turns log-weights into probabilities in place and returns their log-sum.
pub fn normalize_log_probs(values: &mut [f64]) -> f64 {
    let norm = log_sum_exp(values);
    for v in values.iter_mut() {
        *v = (*v - norm).exp();
    }
    norm
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motif::pwm::Sign;

    #[test]
    fn test_denominators() {
        let denoms = Denominators::new(3, 0.5);
        assert!((denoms.big - 5f64.ln()).abs() < 1e-12);
        assert!((denoms.small - 4f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_log_prob_of_instance() {
        let seqs = SequenceSet::from_strs(&["ACGTA"]).unwrap();
        let mut pwm = Pwm::new(2, 0.5);
        pwm.apply_instance(&seqs[0], 0, Sign::Add);
        // model rows: A=1.5 at offset 0, C=1.5 at offset 1, mass 3
        let denom = 3f64.ln();
        let score = log_prob_of_instance(&pwm, &seqs[0], 0, denom);
        assert!((score - 2.0 * 0.5f64.ln()).abs() < 1e-12);

        let score = log_prob_of_instance(&pwm, &seqs[0], 1, denom);
        let expected = (0.5f64 / 3.0).ln() * 2.0;
        assert!((score - expected).abs() < 1e-12);
    }

    #[test]
    fn test_log_likelihood_of_assignment_sums_instances() {
        let seqs = SequenceSet::from_strs(&["ACGTA", "TACGT"]).unwrap();
        let starts = [0, 1];
        let pwm = Pwm::from_starts(3, 0.5, seqs.iter().zip(starts));
        let denoms = Denominators::new(2, 0.5);
        let total = log_likelihood_of_assignment(&pwm, &starts, &seqs, denoms.big);
        let expected = log_prob_of_instance(&pwm, &seqs[0], 0, denoms.big)
            + log_prob_of_instance(&pwm, &seqs[1], 1, denoms.big);
        assert_eq!(total, expected);
        assert!(total < 0.0);
    }

    #[test]
    fn test_log_sum_exp_matches_naive() {
        let values = [-1.0, -2.5, -0.3, -4.0];
        let naive = values.iter().map(|v: &f64| v.exp()).sum::<f64>().ln();
        assert!((log_sum_exp(&values) - naive).abs() < 1e-12);
        assert_eq!(log_sum_exp(&[-3.0]), -3.0);
        assert_eq!(log_sum_exp(&[]), f64::NEG_INFINITY);
        assert_eq!(
            log_sum_exp(&[f64::NEG_INFINITY, f64::NEG_INFINITY]),
            f64::NEG_INFINITY
        );
        assert_eq!(log_sum_exp(&[f64::NEG_INFINITY, -2.0]), -2.0);
    }

    #[test]
    fn test_log_sum_exp_large_magnitudes() {
        // exp() of these underflows to zero in the naive form
        let values = [-1000.0, -1000.0, -1001.0, -999.5];
        let lse = log_sum_exp(&values);
        assert!(lse.is_finite());
        assert!(lse > -999.5 && lse < -997.0);
    }

    #[test]
    fn test_normalize_log_probs_sums_to_one() {
        let mut values = vec![-1000.0, -998.2, -1003.7, -999.0, -1020.0, -997.1];
        normalize_log_probs(&mut values);
        let total: f64 = values.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(values.iter().all(|&p| (0.0..=1.0).contains(&p)));

        let mut single = vec![-42.0];
        normalize_log_probs(&mut single);
        assert!((single[0] - 1.0).abs() < 1e-12);
    }
}
