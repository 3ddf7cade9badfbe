//! Defines the `ReportWriter` struct for writing discovered motifs as text.
//!

use crate::motif::MotifResult;
use crate::utils::{Result, SequenceSet, BASES};
use itertools::Itertools;
use std::env;
use std::io::Write;

/// Writes one motif report: per-sequence instances, consensus and the
/// normalized position weight matrix.
pub struct ReportWriter<W: Write> {
    writer: W,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(writer: W) -> Self {
        ReportWriter { writer }
    }

    /// Writes the `##` metadata lines naming the program version and command line.
    pub fn write_header(&mut self) -> Result<()> {
        writeln!(
            self.writer,
            "##{}Version={}",
            env!("CARGO_PKG_NAME"),
            *crate::cli::FULL_VERSION
        )?;
        let command_line = env::args().join(" ");
        writeln!(
            self.writer,
            "##{}Command={}",
            env!("CARGO_PKG_NAME"),
            command_line
        )?;
        Ok(())
    }

    /// Writes the report body. `recovered` is the number of sequences whose
    /// planted motif was found, when planted starts are known.
    pub fn write(
        &mut self,
        seqs: &SequenceSet,
        result: &MotifResult,
        recovered: Option<usize>,
    ) -> Result<()> {
        writeln!(self.writer, "#index\tid\tstart\tmotif")?;
        for (index, ((seq, start), instance)) in seqs
            .iter()
            .zip(&result.starts)
            .zip(&result.instances)
            .enumerate()
        {
            writeln!(self.writer, "{}\t{}\t{}\t{}", index, seq.id, start, instance)?;
        }

        writeln!(self.writer, "Consensus motif: {}", result.consensus)?;
        writeln!(self.writer, "Log-likelihood: {:.4}", result.log_likelihood)?;
        writeln!(
            self.writer,
            "Sweeps: {} ({}, restart {})",
            result.sweeps, result.state, result.restart
        )?;
        if let Some(recovered) = recovered {
            writeln!(self.writer, "Recovered: {}/{}", recovered, seqs.len())?;
        }

        writeln!(
            self.writer,
            "#offset\t{}",
            BASES.iter().map(|&b| b as char).join("\t")
        )?;
        for (offset, row) in result.probabilities.iter().enumerate() {
            writeln!(
                self.writer,
                "{}\t{}",
                offset,
                row.iter().map(|p| format!("{:.4}", p)).join("\t")
            )?;
        }
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
