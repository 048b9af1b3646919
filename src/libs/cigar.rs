use std::fmt;
use std::io::BufRead;

use crate::libs::error::ScaffoldError;
use crate::libs::fragment::FragmentName;

/// Leading token (before the first `:`) of data rows in ssaha2 `-output cigar`.
pub const CIGAR_MARKER: &str = "cigar";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strand {
    Forward,
    Reverse,
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strand::Forward => write!(f, "+"),
            Strand::Reverse => write!(f, "-"),
        }
    }
}

impl std::str::FromStr for Strand {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Strand::Forward),
            "-" => Ok(Strand::Reverse),
            _ => Err(anyhow::anyhow!("Invalid strand: {}", s)),
        }
    }
}

/// One candidate placement of a piece on the reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentRecord {
    pub q_name: String,
    pub q_start: i64,
    pub q_end: i64,
    pub q_strand: Strand,
    pub t_name: String,
    pub t_start: i64,
    pub t_end: i64,
    pub t_strand: Strand,
    /// `q_name` decoded back into scaffold, piece and gap
    pub fragment: FragmentName,
}

/// Parses a data row:
///
/// ```text
/// cigar::98 scf1_1_50 1 400 + chr1 10001 10400 + 400 M 400
/// ```
///
/// Fields past the target strand (the cigar operations) are ignored.
impl std::str::FromStr for AlignmentRecord {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        if fields.len() < 9 {
            return Err(anyhow::anyhow!("Invalid cigar line: fewer than 9 fields"));
        }
        if fields[0].split(':').next() != Some(CIGAR_MARKER) {
            return Err(anyhow::anyhow!("Not a cigar line: {}", fields[0]));
        }

        let parse_i64 = |s: &str| {
            s.parse::<i64>()
                .map_err(|_| anyhow::anyhow!("Invalid coordinate: {}", s))
        };

        Ok(AlignmentRecord {
            q_name: fields[1].to_string(),
            q_start: parse_i64(fields[2])?,
            q_end: parse_i64(fields[3])?,
            q_strand: fields[4].parse()?,
            t_name: fields[5].to_string(),
            t_start: parse_i64(fields[6])?,
            t_end: parse_i64(fields[7])?,
            t_strand: fields[8].parse()?,
            fragment: fields[1].parse()?,
        })
    }
}

impl AlignmentRecord {
    /// `<strand><t_start,t_end>`, the per-piece field of the summary line
    pub fn placement(&self) -> String {
        format!("{}<{},{}>", self.q_strand, self.t_start, self.t_end)
    }
}

/// Lazy iterator of [`AlignmentRecord`]s from an aligner report.
///
/// Rows that are not cigar data rows, or that do not parse, are skipped:
/// ssaha2 interleaves them with headers and progress messages.
pub struct CigarRecords<R> {
    lines: std::io::Lines<R>,
}

impl<R: BufRead> CigarRecords<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl<R: BufRead> Iterator for CigarRecords<R> {
    type Item = Result<AlignmentRecord, ScaffoldError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<AlignmentRecord>() {
                Ok(record) => return Some(Ok(record)),
                Err(e) => tracing::trace!("Skipping report line ({}): {}", e, line),
            }
        }
    }
}
