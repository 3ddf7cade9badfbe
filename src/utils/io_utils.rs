use crate::utils::Result;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Opens `path` for buffered writing, or stdout when no path is given.
pub fn create_writer(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                io::Error::new(e.kind(), format!("{}: {}", path.display(), e))
            })?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}
