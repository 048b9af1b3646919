use lazy_static::lazy_static;
use regex::bytes::Regex as BytesRegex;
use regex::Regex;
use std::fmt;
use std::io::Write;

use crate::libs::error::ScaffoldError;
use crate::libs::fasta::Sequence;

/// Shortest run of ambiguous bases treated as a scaffolding gap.
pub const MIN_GAP_RUN: usize = 10;

lazy_static! {
    static ref RE_GAP_RUN: BytesRegex = BytesRegex::new(&format!("[Nn]{{{},}}", MIN_GAP_RUN)).unwrap();
    static ref RE_FRAGMENT_NAME: Regex = Regex::new(r"^(.*)_([0-9]+)_([0-9]+)$").unwrap();
}

/// Identity of a piece as carried through the aligner: `<scaffold>_<piece>_<gap>`.
///
/// ```
/// use scafalign::libs::fragment::FragmentName;
/// let name: FragmentName = "scaffold_12_3_250".parse().unwrap();
/// assert_eq!(name.scaffold, "scaffold_12");
/// assert_eq!(name.piece, 3);
/// assert_eq!(name.gap, 250);
/// assert_eq!(name.to_string(), "scaffold_12_3_250");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FragmentName {
    pub scaffold: String,
    pub piece: usize,
    /// Length of the ambiguous run following this piece, 0 for the last one
    pub gap: usize,
}

impl FragmentName {
    pub fn new(scaffold: &str, piece: usize, gap: usize) -> Self {
        Self {
            scaffold: scaffold.to_string(),
            piece,
            gap,
        }
    }
}

impl fmt::Display for FragmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.scaffold, self.piece, self.gap)
    }
}

impl std::str::FromStr for FragmentName {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = RE_FRAGMENT_NAME
            .captures(s)
            .ok_or_else(|| anyhow::anyhow!("Not a fragment name: {}", s))?;

        Ok(FragmentName {
            scaffold: caps[1].to_string(),
            piece: caps[2]
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid piece index: {}", &caps[2]))?,
            gap: caps[3]
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid gap length: {}", &caps[3]))?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub name: FragmentName,
    pub seq: Vec<u8>,
}

impl Fragment {
    pub fn to_record(&self) -> noodles_fasta::Record {
        let definition = noodles_fasta::record::Definition::new(self.name.to_string(), None);
        noodles_fasta::Record::new(
            definition,
            noodles_fasta::record::Sequence::from(self.seq.clone()),
        )
    }
}

/// Cuts a scaffold at every run of at least [`MIN_GAP_RUN`] `N`s.
///
/// Each piece remembers the length of the run after it. Runs at either end of
/// the scaffold have no piece on one side and are dropped, so the last piece
/// always has a gap of 0 and no piece is empty.
pub fn split_scaffold(scaffold: &Sequence) -> Vec<Fragment> {
    let name = scaffold.name();
    let mut fragments: Vec<Fragment> = Vec::new();
    let mut rest: &[u8] = &scaffold.seq;

    while let Some(m) = RE_GAP_RUN.find(rest) {
        let head = &rest[..m.start()];
        rest = &rest[m.end()..];
        if head.is_empty() {
            continue;
        }
        fragments.push(Fragment {
            name: FragmentName::new(name, fragments.len() + 1, m.end() - m.start()),
            seq: head.to_vec(),
        });
    }

    if !rest.is_empty() {
        fragments.push(Fragment {
            name: FragmentName::new(name, fragments.len() + 1, 0),
            seq: rest.to_vec(),
        });
    } else if let Some(last) = fragments.last_mut() {
        last.name.gap = 0;
    }

    fragments
}

/// Writes fragments as single-line FASTA records. Returns the number written.
pub fn write_fragments<W: Write>(writer: &mut W, fragments: &[Fragment]) -> std::io::Result<usize> {
    {
        let mut fa_out = noodles_fasta::io::writer::Builder::default()
            .set_line_base_count(usize::MAX)
            .build_from_writer(&mut *writer);

        for fragment in fragments {
            fa_out.write_record(&fragment.to_record())?;
        }
    }
    writer.flush()?;

    Ok(fragments.len())
}

/// Splits every scaffold of `scaffolds` and writes the pieces to `writer`.
///
/// Returns the number of scaffolds read and of fragments written.
pub fn split_all<I, W>(scaffolds: I, writer: &mut W) -> Result<(usize, usize), ScaffoldError>
where
    I: IntoIterator<Item = Result<Sequence, ScaffoldError>>,
    W: Write,
{
    let mut n_scaffolds = 0;
    let mut n_fragments = 0;

    for scaffold in scaffolds {
        let scaffold = scaffold?;
        let fragments = split_scaffold(&scaffold);
        tracing::debug!("{}: {} pieces", scaffold.name(), fragments.len());

        n_fragments += write_fragments(writer, &fragments)?;
        n_scaffolds += 1;
    }

    Ok((n_scaffolds, n_fragments))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(seq: &str) -> Vec<(usize, String, usize)> {
        split_scaffold(&Sequence::new("scf1 some description", seq.as_bytes()))
            .into_iter()
            .map(|f| {
                assert_eq!(f.name.scaffold, "scf1");
                (f.name.piece, String::from_utf8(f.seq).unwrap(), f.name.gap)
            })
            .collect()
    }

    #[test]
    fn test_no_gap_single_piece() {
        assert_eq!(split("ACGTACGT"), vec![(1, "ACGTACGT".to_string(), 0)]);
        // nine Ns are not a gap
        assert_eq!(
            split("ACGNNNNNNNNNTT"),
            vec![(1, "ACGNNNNNNNNNTT".to_string(), 0)]
        );
    }

    #[test]
    fn test_split_on_runs() {
        let seq = format!("AAAA{}CCCC{}GG", "N".repeat(10), "n".repeat(25));
        assert_eq!(
            split(&seq),
            vec![
                (1, "AAAA".to_string(), 10),
                (2, "CCCC".to_string(), 25),
                (3, "GG".to_string(), 0),
            ]
        );
    }

    #[test]
    fn test_short_runs_stay_inside_piece() {
        let seq = format!("ACNNNNAC{}TT", "N".repeat(12));
        assert_eq!(
            split(&seq),
            vec![(1, "ACNNNNAC".to_string(), 12), (2, "TT".to_string(), 0)]
        );
    }

    #[test]
    fn test_runs_at_ends() {
        let seq = format!("{}ACGT{}TTTT{}", "N".repeat(15), "N".repeat(20), "N".repeat(11));
        assert_eq!(
            split(&seq),
            vec![(1, "ACGT".to_string(), 20), (2, "TTTT".to_string(), 0)]
        );

        assert!(split(&"N".repeat(30)).is_empty());
        assert!(split("").is_empty());
    }

    #[test]
    fn test_concatenation_preserves_bases() {
        let seqs = [
            format!("AC{}GT{}CA", "N".repeat(10), "N".repeat(100)),
            format!("{}A{}C", "N".repeat(10), "N".repeat(10)),
            "NNNNNACGTNNNN".to_string(),
        ];
        for seq in &seqs {
            let expected = RE_GAP_RUN.replace_all(seq.as_bytes(), &b""[..]).to_vec();
            let joined: Vec<u8> = split_scaffold(&Sequence::new("x", seq.as_bytes()))
                .into_iter()
                .flat_map(|f| f.seq)
                .collect();
            assert_eq!(joined, expected, "{}", seq);
        }
    }

    #[test]
    fn test_fragment_name_round_trip() {
        for (scaffold, piece, gap) in [
            ("scf1", 1, 0),
            ("contig_with_underscores_7", 0, 123456),
            ("x", usize::MAX, usize::MAX),
        ] {
            let name = FragmentName::new(scaffold, piece, gap);
            let back: FragmentName = name.to_string().parse().unwrap();
            assert_eq!(back, name);
        }
    }

    #[test]
    fn test_fragment_name_rejects_other_ids() {
        assert!("scf1".parse::<FragmentName>().is_err());
        assert!("scf1_2".parse::<FragmentName>().is_err());
        assert!("scf1_a_2".parse::<FragmentName>().is_err());
    }

    #[test]
    fn test_write_fragments() {
        let seq = format!("AAAA{}CC", "N".repeat(10));
        let fragments = split_scaffold(&Sequence::new("scf1", seq.as_bytes()));

        let mut buf = Vec::new();
        let n = write_fragments(&mut buf, &fragments).unwrap();
        assert_eq!(n, 2);
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            ">scf1_1_10\nAAAA\n>scf1_2_0\nCC\n"
        );
    }

    #[test]
    fn test_split_all() {
        let input = format!(
            ">scf1 first\nAAAA{}\nCC\n>scf2\nGGGG\n",
            "N".repeat(10)
        );
        let scaffolds = crate::libs::fasta::Sequences::new(std::io::Cursor::new(input), "test");

        let mut buf = Vec::new();
        let (n_scaffolds, n_fragments) = split_all(scaffolds, &mut buf).unwrap();
        assert_eq!((n_scaffolds, n_fragments), (2, 3));
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            ">scf1_1_10\nAAAA\n>scf1_2_0\nCC\n>scf2_1_0\nGGGG\n"
        );
    }
}
