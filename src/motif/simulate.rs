//! Synthetic sequence sets with one planted motif per sequence.

use super::evaluate::PLANTED_START_KEY;
use crate::utils::{MotifError, Result, BASES};
use itertools::Itertools;
use rand::Rng;
use std::io::Write;

const FASTA_LINE_WIDTH: usize = 80;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedRecord {
    pub id: String,
    pub planted_start: usize,
    pub bases: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedSet {
    /// The motif before per-copy substitutions
    pub motif: String,
    pub records: Vec<SimulatedRecord>,
}

fn random_base<R: Rng>(rng: &mut R) -> u8 {
    BASES[rng.random_range(0..BASES.len())]
}

/// Uniform random background with a copy of one random motif planted at a
/// uniform start in every sequence. Each planted base is replaced by one of
/// the three other bases with probability `mutation_rate`.
pub fn simulate<R: Rng>(
    num_sequences: usize,
    sequence_len: usize,
    motif_len: usize,
    mutation_rate: f64,
    rng: &mut R,
) -> Result<SimulatedSet> {
    if num_sequences == 0 {
        return Err(MotifError::config("Number of sequences must be at least 1"));
    }
    if motif_len == 0 || motif_len > sequence_len {
        return Err(MotifError::config(format!(
            "Motif length must be between 1 and the sequence length {}, got {}",
            sequence_len, motif_len
        )));
    }
    if !(0.0..=1.0).contains(&mutation_rate) {
        return Err(MotifError::config(format!(
            "Mutation rate must be between 0.0 and 1.0, got {}",
            mutation_rate
        )));
    }

    let motif: Vec<u8> = (0..motif_len).map(|_| random_base(rng)).collect();

    let records = (0..num_sequences)
        .map(|i| {
            let mut bases: Vec<u8> = (0..sequence_len).map(|_| random_base(rng)).collect();
            let planted_start = rng.random_range(0..=sequence_len - motif_len);
            for (slot, &base) in bases[planted_start..].iter_mut().zip(&motif) {
                *slot = if rng.random_bool(mutation_rate) {
                    let shift = rng.random_range(1..BASES.len());
                    let index = BASES.iter().position(|&b| b == base).unwrap_or(0);
                    BASES[(index + shift) % BASES.len()]
                } else {
                    base
                };
            }
            SimulatedRecord {
                id: format!("sim{}", i + 1),
                planted_start,
                bases: String::from_utf8_lossy(&bases).into_owned(),
            }
        })
        .collect();

    Ok(SimulatedSet {
        motif: String::from_utf8_lossy(&motif).into_owned(),
        records,
    })
}

pub fn write_fasta<W: Write>(set: &SimulatedSet, writer: &mut W) -> Result<()> {
    for record in &set.records {
        writeln!(
            writer,
            ">{} {}{}",
            record.id, PLANTED_START_KEY, record.planted_start
        )?;
        for chunk in &record.bases.bytes().chunks(FASTA_LINE_WIDTH) {
            let line: Vec<u8> = chunk.collect();
            writer.write_all(&line)?;
            writer.write_all(b"\n")?;
        }
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motif::evaluate::planted_starts;
    use crate::utils::SequenceSet;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Cursor;

    #[test]
    fn test_simulate_plants_exact_motif() {
        let mut rng = StdRng::seed_from_u64(2950);
        let set = simulate(10, 200, 12, 0.0, &mut rng).unwrap();
        assert_eq!(set.records.len(), 10);
        assert_eq!(set.motif.len(), 12);
        for record in &set.records {
            assert_eq!(record.bases.len(), 200);
            let start = record.planted_start;
            assert!(start + 12 <= 200);
            assert_eq!(&record.bases[start..start + 12], set.motif);
        }
    }

    #[test]
    fn test_full_mutation_changes_every_planted_base() {
        let mut rng = StdRng::seed_from_u64(7);
        let set = simulate(5, 50, 8, 1.0, &mut rng).unwrap();
        for record in &set.records {
            let start = record.planted_start;
            let planted = &record.bases.as_bytes()[start..start + 8];
            assert!(planted.iter().zip(set.motif.bytes()).all(|(a, b)| *a != b));
        }
    }

    #[test]
    fn test_simulate_rejects_bad_input() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(simulate(0, 50, 8, 0.0, &mut rng).is_err());
        assert!(simulate(5, 5, 8, 0.0, &mut rng).is_err());
        assert!(simulate(5, 50, 0, 0.0, &mut rng).is_err());
        assert!(simulate(5, 50, 8, 1.5, &mut rng).is_err());
    }

    #[test]
    fn test_write_fasta_round_trips_through_reader() {
        let mut rng = StdRng::seed_from_u64(3);
        let set = simulate(3, 170, 10, 0.1, &mut rng).unwrap();
        let mut buffer = Vec::new();
        write_fasta(&set, &mut buffer).unwrap();

        let text = String::from_utf8(buffer.clone()).unwrap();
        assert!(text.lines().all(|line| line.len() <= FASTA_LINE_WIDTH));

        let seqs = SequenceSet::from_reader(Cursor::new(buffer)).unwrap();
        assert_eq!(seqs.len(), 3);
        assert_eq!(seqs[1].id, "sim2");
        assert_eq!(seqs[1].as_str(), set.records[1].bases);
        let expected: Vec<usize> = set.records.iter().map(|r| r.planted_start).collect();
        assert_eq!(planted_starts(&seqs), Some(expected));
    }
}
