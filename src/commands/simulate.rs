use crate::cli::SimulateArgs;
use crate::motif::simulate::{simulate as plant_motif, write_fasta};
use crate::utils::{create_writer, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub fn simulate(args: SimulateArgs) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(args.seed);
    let set = plant_motif(
        args.num_sequences,
        args.sequence_len,
        args.motif_len,
        args.mutation_rate,
        &mut rng,
    )?;
    log::info!(
        "Planted motif {} in {} sequences of length {}",
        set.motif,
        set.records.len(),
        args.sequence_len
    );
    let mut writer = create_writer(Some(args.output_path.as_path()))?;
    write_fasta(&set, &mut writer)?;
    Ok(())
}
