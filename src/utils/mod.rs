mod fasta;
mod io_utils;
mod readers;
mod util;

pub use fasta::{encode_base, Sequence, SequenceSet, BASES};
pub use io_utils::create_writer;
pub use readers::open_fasta_reader;
pub use util::{handle_error_and_exit, MotifError, Result};
