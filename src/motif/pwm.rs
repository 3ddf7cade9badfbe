use crate::utils::Sequence;

/// Direction of a count update for one motif instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Add,
    Remove,
}

/// Position weight model: one row per motif offset, one column per base in
/// `BASES` order. Rows hold integer instance counts; the pseudocount is added
/// when a cell is read, so every cell stays at least the pseudocount no
/// matter how small it is.
#[derive(Debug, Clone, PartialEq)]
pub struct Pwm {
    instances: Vec<[u32; 4]>,
    pseudocount: f64,
}

impl Pwm {
    pub fn new(motif_len: usize, pseudocount: f64) -> Self {
        debug_assert!(pseudocount > 0.0);
        Pwm {
            instances: vec![[0; 4]; motif_len],
            pseudocount,
        }
    }

    /// Model holding one instance per sequence at the given starts.
    pub fn from_starts<'a, I>(motif_len: usize, pseudocount: f64, instances: I) -> Self
    where
        I: IntoIterator<Item = (&'a Sequence, usize)>,
    {
        let mut pwm = Pwm::new(motif_len, pseudocount);
        for (seq, start) in instances {
            pwm.apply_instance(seq, start, Sign::Add);
        }
        pwm
    }

    pub fn motif_len(&self) -> usize {
        self.instances.len()
    }

    pub fn pseudocount(&self) -> f64 {
        self.pseudocount
    }

    /// Pseudocounted counts of one offset.
    pub fn row(&self, offset: usize) -> [f64; 4] {
        self.instances[offset].map(|n| n as f64 + self.pseudocount)
    }

    #[inline]
    pub fn count(&self, offset: usize, base: u8) -> f64 {
        self.instances[offset][base as usize] as f64 + self.pseudocount
    }

    /// Adds or removes the instance of `seq` starting at `start`.
    pub fn apply_instance(&mut self, seq: &Sequence, start: usize, sign: Sign) {
        let window = &seq.codes()[start..start + self.motif_len()];
        for (row, &base) in self.instances.iter_mut().zip(window) {
            let cell = &mut row[base as usize];
            match sign {
                Sign::Add => *cell += 1,
                Sign::Remove => {
                    debug_assert!(*cell > 0, "removing an instance that was never added");
                    *cell = cell.saturating_sub(1);
                }
            }
        }
    }

    pub fn row_mass(&self, offset: usize) -> f64 {
        let instances: u32 = self.instances[offset].iter().sum();
        instances as f64 + 4.0 * self.pseudocount
    }

    pub fn min_count(&self) -> f64 {
        self.instances
            .iter()
            .flat_map(|row| row.iter().copied())
            .min()
            .map_or(f64::INFINITY, |n| n as f64 + self.pseudocount)
    }

    /// Probability table obtained by dividing every cell by `total_weight`.
    pub fn normalize(&self, total_weight: f64) -> Vec<[f64; 4]> {
        (0..self.motif_len())
            .map(|offset| self.row(offset).map(|count| count / total_weight))
            .collect()
    }
}

/// Count mass of every row once all `num_sequences` instances are included.
pub fn total_weight(num_sequences: usize, pseudocount: f64) -> f64 {
    num_sequences as f64 + 4.0 * pseudocount
}
