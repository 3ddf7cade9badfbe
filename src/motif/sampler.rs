//! Gibbs sampler over motif start positions.
//!
//! The sampler owns one working assignment (a start per sequence) and the
//! count model built from it. A sweep withholds each sequence in turn,
//! scores every window of that sequence against the remaining instances and
//! draws a new start from the resulting distribution. After each sweep the
//! full assignment is scored, and a value copy of the state is kept whenever
//! the score strictly improves. The sampler stops once `stall_limit` sweeps
//! pass without improvement.

use super::params::{InitStrategy, SamplerParams};
use super::pwm::{total_weight, Pwm, Sign};
use super::scoring::{
    log_likelihood_of_assignment, log_prob_of_instance, normalize_log_probs, Denominators,
};
use crate::utils::{MotifError, Result, SequenceSet};
use rand::distr::{weighted::WeightedIndex, Distribution};
use rand::Rng;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerState {
    Running,
    /// Stall limit reached
    Converged,
    /// Sweep cap reached before the stall limit
    SweepLimitReached,
}

impl SamplerState {
    pub fn is_terminal(self) -> bool {
        self != SamplerState::Running
    }
}

impl fmt::Display for SamplerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SamplerState::Running => "running",
            SamplerState::Converged => "converged",
            SamplerState::SweepLimitReached => "sweep-limit",
        };
        write!(f, "{}", label)
    }
}

/// Independent copy of the best state seen so far.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub starts: Vec<usize>,
    pub pwm: Pwm,
    pub log_likelihood: f64,
}

#[derive(Debug, Clone)]
pub struct SamplerRun {
    pub best: Snapshot,
    pub sweeps: usize,
    pub state: SamplerState,
}

pub struct GibbsSampler<'a, R: Rng> {
    seqs: &'a SequenceSet,
    rng: R,
    denoms: Denominators,
    stall_limit: usize,
    max_sweeps: Option<usize>,
    starts: Vec<usize>,
    pwm: Pwm,
    best: Snapshot,
    stall_count: usize,
    sweeps: usize,
    state: SamplerState,
    // Restart index used to tag log lines
    restart: usize,
    // Scratch buffer for per-window scores
    weights: Vec<f64>,
}

impl<'a, R: Rng> GibbsSampler<'a, R> {
    pub fn new(seqs: &'a SequenceSet, params: &SamplerParams, mut rng: R) -> Result<Self> {
        params.validate(seqs)?;
        let k = params.motif_len;

        let starts: Vec<usize> = match params.init {
            InitStrategy::Zero => vec![0; seqs.len()],
            InitStrategy::Random => seqs
                .iter()
                .map(|seq| rng.random_range(0..seq.num_windows(k)))
                .collect(),
        };
        let pwm = Pwm::from_starts(k, params.pseudocount, seqs.iter().zip(starts.iter().copied()));
        let denoms = Denominators::new(seqs.len(), params.pseudocount);
        let log_likelihood = log_likelihood_of_assignment(&pwm, &starts, seqs, denoms.big);
        let best = Snapshot {
            starts: starts.clone(),
            pwm: pwm.clone(),
            log_likelihood,
        };
        let max_windows = seqs.max_len().map_or(0, |len| len + 1 - k);

        Ok(GibbsSampler {
            seqs,
            rng,
            denoms,
            stall_limit: params.stall_limit,
            max_sweeps: params.max_sweeps,
            starts,
            pwm,
            best,
            stall_count: 0,
            sweeps: 0,
            state: SamplerState::Running,
            restart: 0,
            weights: Vec::with_capacity(max_windows),
        })
    }

    /// Tags the log lines of this sampler with a restart index.
    pub fn with_restart(mut self, restart: usize) -> Self {
        self.restart = restart;
        self
    }

    pub fn restart(&self) -> usize {
        self.restart
    }

    pub fn state(&self) -> SamplerState {
        self.state
    }

    pub fn starts(&self) -> &[usize] {
        &self.starts
    }

    pub fn pwm(&self) -> &Pwm {
        &self.pwm
    }

    pub fn best(&self) -> &Snapshot {
        &self.best
    }

    pub fn stall_count(&self) -> usize {
        self.stall_count
    }

    pub fn sweeps(&self) -> usize {
        self.sweeps
    }

    /// Runs one sweep and updates the best snapshot and the stall counter.
    /// Does nothing once the sampler has terminated.
    pub fn step(&mut self) -> Result<SamplerState> {
        if self.state.is_terminal() {
            return Ok(self.state);
        }

        self.sweep()?;
        self.sweeps += 1;

        let log_likelihood =
            log_likelihood_of_assignment(&self.pwm, &self.starts, self.seqs, self.denoms.big);
        if log_likelihood > self.best.log_likelihood {
            log::debug!(
                "Restart {}, sweep {}: log-likelihood improved {:.4} -> {:.4}",
                self.restart,
                self.sweeps,
                self.best.log_likelihood,
                log_likelihood
            );
            self.best = Snapshot {
                starts: self.starts.clone(),
                pwm: self.pwm.clone(),
                log_likelihood,
            };
            self.stall_count = 0;
        } else {
            self.stall_count += 1;
        }

        if self.stall_count >= self.stall_limit {
            self.state = SamplerState::Converged;
        } else if self.max_sweeps.is_some_and(|max| self.sweeps >= max) {
            self.state = SamplerState::SweepLimitReached;
        }
        Ok(self.state)
    }

    /// Sweeps until a terminal state and returns the best snapshot.
    pub fn run(mut self) -> Result<SamplerRun> {
        while !self.step()?.is_terminal() {}
        log::info!(
            "Restart {}: {} after {} sweeps, log-likelihood {:.4}",
            self.restart,
            self.state,
            self.sweeps,
            self.best.log_likelihood
        );
        Ok(SamplerRun {
            best: self.best,
            sweeps: self.sweeps,
            state: self.state,
        })
    }

    fn sweep(&mut self) -> Result<()> {
        for index in 0..self.seqs.len() {
            self.resample(index)?;
            debug_assert!(self.mass_is_conserved());
        }
        Ok(())
    }

    /// Draws a new start for sequence `index` conditioned on all others.
    fn resample(&mut self, index: usize) -> Result<()> {
        let seqs = self.seqs;
        let seq = &seqs[index];
        let k = self.pwm.motif_len();

        self.pwm.apply_instance(seq, self.starts[index], Sign::Remove);

        self.weights.clear();
        self.weights.extend(
            (0..seq.num_windows(k))
                .map(|start| log_prob_of_instance(&self.pwm, seq, start, self.denoms.small)),
        );
        normalize_log_probs(&mut self.weights);

        let dist: WeightedIndex<f64> = WeightedIndex::new(&self.weights).map_err(|e| {
            MotifError::Internal(format!(
                "Cannot sample a start for sequence {}: {}",
                seq.id, e
            ))
        })?;
        let start = dist.sample(&mut self.rng);

        self.starts[index] = start;
        self.pwm.apply_instance(seq, start, Sign::Add);
        Ok(())
    }

    fn mass_is_conserved(&self) -> bool {
        let expected = total_weight(self.seqs.len(), self.pwm.pseudocount());
        (0..self.pwm.motif_len()).all(|offset| (self.pwm.row_mass(offset) - expected).abs() < 1e-9)
    }
}
