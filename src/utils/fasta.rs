//! In-memory FASTA sequence sets restricted to the DNA alphabet.
//!
//! Records are validated when they are loaded, so everything downstream can
//! index the count matrix with the pre-encoded bases without further checks.

use super::{open_fasta_reader, MotifError, Result};
use std::io::BufRead;
use std::ops::Index;
use std::path::Path;

/// Column order shared by the count matrix and the consensus tie-break.
pub const BASES: [u8; 4] = *b"ACGT";

/// Maps a base to its column index; lowercase (soft-masked) bases are accepted.
#[inline]
pub fn encode_base(base: u8) -> Option<u8> {
    match base {
        b'A' | b'a' => Some(0),
        b'C' | b'c' => Some(1),
        b'G' | b'g' => Some(2),
        b'T' | b't' => Some(3),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    pub id: String,
    /// Full header text without the leading `>`
    pub description: String,
    bases: String,
    codes: Vec<u8>,
}

/// Appends the column indices of `bases` to `codes`, or returns the
/// 0-based position of the first byte outside the alphabet.
fn encode_bases(bases: &[u8], codes: &mut Vec<u8>) -> std::result::Result<(), usize> {
    codes.reserve(bases.len());
    for (pos, &b) in bases.iter().enumerate() {
        codes.push(encode_base(b).ok_or(pos)?);
    }
    Ok(())
}

/// Printable form of a rejected input byte.
fn show_byte(b: u8) -> String {
    std::ascii::escape_default(b).to_string()
}

impl Sequence {
    fn from_codes(description: String, codes: Vec<u8>) -> Self {
        let id = description
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string();
        let bases = codes.iter().map(|&c| BASES[c as usize] as char).collect();
        Sequence {
            id,
            description,
            bases,
            codes,
        }
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.bases
    }

    /// Column indices of the bases (A=0, C=1, G=2, T=3).
    pub fn codes(&self) -> &[u8] {
        &self.codes
    }

    pub fn window(&self, start: usize, len: usize) -> &str {
        &self.bases[start..start + len]
    }

    /// Number of windows of length `k`, zero when `k` does not fit.
    pub fn num_windows(&self, k: usize) -> usize {
        (self.len() + 1).saturating_sub(k)
    }
}

/// Ordered, read-only collection of sequences.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SequenceSet {
    records: Vec<Sequence>,
}

impl SequenceSet {
    pub fn from_path(path: &Path) -> Result<Self> {
        let reader = open_fasta_reader(path)?;
        Self::from_reader(reader)
    }

    /// Parses FASTA records in file order. Sequence lines are trimmed and
    /// concatenated; blank lines are skipped. Lines are read as raw bytes, so
    /// any byte outside the alphabet, including non-UTF-8 data, is reported
    /// with its line number.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut records = Vec::new();
        // (header text, header line number, encoded bases)
        let mut current: Option<(String, usize, Vec<u8>)> = None;

        for (line_index, line) in reader.split(b'\n').enumerate() {
            let line_number = line_index + 1;
            let line = line?;
            let trimmed = line.trim_ascii();
            if trimmed.is_empty() {
                continue;
            }

            if let Some(header) = trimmed.strip_prefix(b">") {
                if let Some(record) = current.take() {
                    records.push(finish_record(record, records.len())?);
                }
                let header = String::from_utf8_lossy(header).trim().to_string();
                current = Some((header, line_number, Vec::new()));
                continue;
            }

            let Some((_, _, codes)) = current.as_mut() else {
                return Err(MotifError::input_format(
                    line_number,
                    "Sequence data found before the first '>' header",
                ));
            };
            encode_bases(trimmed, codes).map_err(|pos| {
                MotifError::input_format(
                    line_number,
                    format!(
                        "Invalid base '{}' at column {}",
                        show_byte(trimmed[pos]),
                        pos + 1
                    ),
                )
            })?;
        }

        if let Some(record) = current.take() {
            records.push(finish_record(record, records.len())?);
        }

        Ok(SequenceSet { records })
    }

    /// Builds a set from bare sequences; record `i` is named `seq{i}` and
    /// errors report the 1-based record number in place of a line number.
    pub fn from_strs<S: AsRef<str>>(seqs: &[S]) -> Result<Self> {
        let records = seqs
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let bases = s.as_ref().as_bytes();
                let mut codes = Vec::new();
                encode_bases(bases, &mut codes).map_err(|pos| {
                    MotifError::input_format(
                        i + 1,
                        format!(
                            "Invalid base '{}' at position {}",
                            show_byte(bases[pos]),
                            pos + 1
                        ),
                    )
                })?;
                Ok(Sequence::from_codes(format!("seq{}", i), codes))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(SequenceSet { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sequence> {
        self.records.iter()
    }

    pub fn min_len(&self) -> Option<usize> {
        self.records.iter().map(Sequence::len).min()
    }

    pub fn max_len(&self) -> Option<usize> {
        self.records.iter().map(Sequence::len).max()
    }
}

impl Index<usize> for SequenceSet {
    type Output = Sequence;

    fn index(&self, index: usize) -> &Self::Output {
        &self.records[index]
    }
}

impl<'a> IntoIterator for &'a SequenceSet {
    type Item = &'a Sequence;
    type IntoIter = std::slice::Iter<'a, Sequence>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn finish_record(
    (header, header_line, codes): (String, usize, Vec<u8>),
    index: usize,
) -> Result<Sequence> {
    if codes.is_empty() {
        return Err(MotifError::input_format(
            header_line,
            format!("Record '>{}' has no sequence lines", header),
        ));
    }
    let description = if header.is_empty() {
        format!("seq{}", index)
    } else {
        header
    };
    Ok(Sequence::from_codes(description, codes))
}
