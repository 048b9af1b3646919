use std::io::BufRead;

use crate::libs::error::ScaffoldError;

/// One FASTA record. `id` is the whole header line without the leading `>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub id: String,
    pub seq: Vec<u8>,
}

impl Sequence {
    pub fn new(id: &str, seq: &[u8]) -> Self {
        Self {
            id: id.to_string(),
            seq: seq.to_vec(),
        }
    }

    /// The first whitespace-delimited token of the header.
    pub fn name(&self) -> &str {
        self.id.split_whitespace().next().unwrap_or("")
    }
}

/// Lazy, single-pass iterator over the records of a FASTA stream.
pub struct Sequences<R> {
    reader: noodles_fasta::io::Reader<R>,
    source: String,
    done: bool,
}

impl<R: BufRead> Sequences<R> {
    pub fn new(inner: R, source: &str) -> Self {
        Self {
            reader: noodles_fasta::io::Reader::new(inner),
            source: source.to_string(),
            done: false,
        }
    }

    fn read_one(&mut self) -> Result<Option<Sequence>, ScaffoldError> {
        // blank lines before the first header are ignored
        let mut header = String::new();
        loop {
            header.clear();
            if self.reader.read_definition(&mut header)? == 0 {
                return Ok(None);
            }
            if !header.trim().is_empty() {
                break;
            }
        }

        let id = match header.strip_prefix('>') {
            Some(id) => id.trim_end().to_string(),
            None => {
                return Err(ScaffoldError::Format {
                    path: self.source.clone(),
                    message: format!("sequence data before any header: {:?}", header),
                })
            }
        };

        let mut seq = Vec::new();
        self.reader.read_sequence(&mut seq)?;

        Ok(Some(Sequence { id, seq }))
    }
}

impl<R: BufRead> Iterator for Sequences<R> {
    type Item = Result<Sequence, ScaffoldError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.read_one().transpose();
        if !matches!(result, Some(Ok(_))) {
            self.done = true;
        }
        result
    }
}

/// Opens a FASTA file (plain, gzipped or `stdin`) as a [`Sequences`] iterator.
pub fn open(input: &str) -> Result<Sequences<Box<dyn BufRead>>, ScaffoldError> {
    Ok(Sequences::new(crate::reader(input)?, input))
}
