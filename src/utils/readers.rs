use super::{MotifError, Result};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufReader, Read as ioRead};
use std::path::Path;

pub fn open_fasta_reader(path: &Path) -> Result<BufReader<Box<dyn ioRead>>> {
    fn is_gzipped(path: &Path) -> bool {
        let path_str = path.to_string_lossy().to_lowercase();
        path_str.ends_with(".gz") || path_str.ends_with(".gzip")
    }
    let file = File::open(path).map_err(|e| {
        MotifError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })?;
    if is_gzipped(path) {
        let gz_decoder = MultiGzDecoder::new(file);
        if gz_decoder.header().is_some() {
            Ok(BufReader::new(Box::new(gz_decoder)))
        } else {
            Err(MotifError::input_format(
                1,
                format!("Invalid gzip header: {}", path.to_string_lossy()),
            ))
        }
    } else {
        Ok(BufReader::new(Box::new(file)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::{write::GzEncoder, Compression};
    use std::io::{BufRead, Write};

    #[test]
    fn test_open_plain_fasta() {
        let mut file = tempfile::Builder::new().suffix(".fa").tempfile().unwrap();
        writeln!(file, ">seq1\nACGT").unwrap();
        let reader = open_fasta_reader(file.path()).unwrap();
        let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec![">seq1", "ACGT"]);
    }

    #[test]
    fn test_open_gzipped_fasta() {
        let mut file = tempfile::Builder::new().suffix(".fa.gz").tempfile().unwrap();
        let mut encoder = GzEncoder::new(file.as_file_mut(), Compression::default());
        encoder.write_all(b">seq1\nACGT\n").unwrap();
        encoder.finish().unwrap();

        let reader = open_fasta_reader(file.path()).unwrap();
        let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec![">seq1", "ACGT"]);
    }

    #[test]
    fn test_open_missing_file() {
        let result = open_fasta_reader(Path::new("/nonexistent/input.fa"));
        assert!(matches!(result, Err(MotifError::Io(_))));
    }
}
