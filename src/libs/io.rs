use std::io::{BufRead, BufReader, BufWriter, Write};

use crate::libs::error::ScaffoldError;

/// Opens `input` for buffered reading. `stdin` reads standard input and a
/// `.gz` extension is decompressed on the fly.
///
/// ```
/// use std::io::BufRead;
/// let reader = scafalign::reader("tests/scafalign/report.cigar").unwrap();
/// assert!(reader.lines().count() > 0);
///
/// assert!(scafalign::reader("tests/scafalign/missing.fa").is_err());
/// ```
pub fn reader(input: &str) -> Result<Box<dyn BufRead>, ScaffoldError> {
    let reader: Box<dyn BufRead> = if input == "stdin" {
        Box::new(BufReader::new(std::io::stdin()))
    } else {
        let path = std::path::Path::new(input);
        let file = std::fs::File::open(path).map_err(|source| ScaffoldError::Open {
            path: path.display().to_string(),
            source,
        })?;

        if path.extension() == Some(std::ffi::OsStr::new("gz")) {
            Box::new(BufReader::new(flate2::read::MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        }
    };

    Ok(reader)
}

/// Opens `output` for buffered writing; `stdout` writes to standard output.
pub fn writer(output: &str) -> Result<Box<dyn Write>, ScaffoldError> {
    let writer: Box<dyn Write> = if output == "stdout" {
        Box::new(BufWriter::new(std::io::stdout()))
    } else {
        let file = std::fs::File::create(output).map_err(|source| ScaffoldError::Open {
            path: output.to_string(),
            source,
        })?;
        Box::new(BufWriter::new(file))
    };

    Ok(writer)
}
