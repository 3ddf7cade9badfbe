use crate::utils::{MotifError, Result, SequenceSet};
use std::str::FromStr;

/// How motif starts are chosen before the first sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStrategy {
    /// Every start at offset 0
    Zero,
    /// Uniform start per sequence drawn from the sampler's generator
    Random,
}

impl FromStr for InitStrategy {
    type Err = &'static str;
    fn from_str(init: &str) -> std::result::Result<Self, Self::Err> {
        match init {
            "zero" => Ok(InitStrategy::Zero),
            "random" => Ok(InitStrategy::Random),
            _ => Err("Invalid start initialization (expected zero or random)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SamplerParams {
    pub motif_len: usize,
    pub pseudocount: f64,
    /// Sweeps without improvement before the sampler stops
    pub stall_limit: usize,
    /// Optional hard cap on the number of sweeps per restart
    pub max_sweeps: Option<usize>,
    pub init: InitStrategy,
    pub seed: u64,
    pub restarts: usize,
    pub threads: usize,
}

impl Default for SamplerParams {
    fn default() -> Self {
        SamplerParams {
            motif_len: 10,
            pseudocount: 0.5,
            stall_limit: 100,
            max_sweeps: None,
            init: InitStrategy::Random,
            seed: 2950,
            restarts: 1,
            threads: 1,
        }
    }
}

impl SamplerParams {
    /// Rejects parameters that cannot be sampled on `seqs`.
    pub fn validate(&self, seqs: &SequenceSet) -> Result<()> {
        if self.motif_len == 0 {
            return Err(MotifError::config("Motif length must be at least 1"));
        }
        if !(self.pseudocount > 0.0 && self.pseudocount.is_finite()) {
            return Err(MotifError::config(format!(
                "Pseudocount must be a positive number, got {}",
                self.pseudocount
            )));
        }
        if self.stall_limit == 0 {
            return Err(MotifError::config("Stall limit must be at least 1"));
        }
        if self.max_sweeps == Some(0) {
            return Err(MotifError::config("Maximum sweep count must be at least 1"));
        }
        if self.restarts == 0 {
            return Err(MotifError::config("Number of restarts must be at least 1"));
        }
        if self.threads == 0 {
            return Err(MotifError::config("Number of threads must be at least 1"));
        }

        let Some(min_len) = seqs.min_len() else {
            return Err(MotifError::config("Sequence set is empty"));
        };
        if self.motif_len > min_len {
            let shortest = seqs
                .iter()
                .find(|seq| seq.len() == min_len)
                .map(|seq| seq.id.as_str())
                .unwrap_or_default();
            return Err(MotifError::config(format!(
                "Motif length {} exceeds the length {} of sequence {}",
                self.motif_len, min_len, shortest
            )));
        }
        Ok(())
    }
}
