use crate::cli::DiscoverArgs;
use crate::motif::{count_recovered, planted_starts, search, SamplerParams};
use crate::utils::{create_writer, Result, SequenceSet};
use crate::writers::ReportWriter;

pub fn discover(args: DiscoverArgs) -> Result<()> {
    let seqs = SequenceSet::from_path(&args.fasta_path)?;
    log::info!(
        "Loaded {} sequences from {}",
        seqs.len(),
        args.fasta_path.display()
    );

    let params = SamplerParams {
        motif_len: args.motif_len,
        pseudocount: args.pseudocount,
        stall_limit: args.stall_limit,
        max_sweeps: args.max_sweeps,
        init: args.init,
        seed: args.seed,
        restarts: args.restarts,
        threads: args.num_threads,
    };
    let result = search(&seqs, &params)?;

    let recovered = planted_starts(&seqs)
        .map(|planted| count_recovered(&result.starts, &planted, params.motif_len));
    if let Some(recovered) = recovered {
        log::info!(
            "Recovered planted motif in {}/{} sequences",
            recovered,
            seqs.len()
        );
    }

    let mut writer = ReportWriter::new(create_writer(args.output_path.as_deref())?);
    writer.write_header()?;
    writer.write(&seqs, &result, recovered)?;
    Ok(())
}
